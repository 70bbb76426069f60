//! Python backend: plain classes with properties, or dataclasses, plus `Enum` subclasses.

mod constraints;
mod presets;

use std::collections::BTreeSet;

use bon::Builder;
use itertools::Itertools;
use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString};

use self::presets::PythonDefaultPreset;
use super::{Language, options_from_json};
use crate::{
  constrainer::{Constraints, NamingConvention, TypeMapping},
  error::Result,
  generator::{LanguageGenerator, render_models},
  models::{MetaModelSet, OutputModel},
  renderer::{PresetChain, PresetEntry},
};

const TYPING_PREFIX: &str = "from typing import ";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PyModelType {
  #[default]
  Class,
  Dataclass,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PythonOptions {
  #[builder(default)]
  pub model_type: PyModelType,
  #[builder(default)]
  pub naming_convention: NamingConvention,
}

pub struct PythonGenerator {
  options: PythonOptions,
  constraints: Constraints,
  mapping: TypeMapping,
  presets: Vec<PresetEntry>,
}

impl PythonGenerator {
  pub fn new(options: PythonOptions) -> Self {
    Self {
      constraints: constraints::default_constraints().with_naming_convention(&options.naming_convention),
      mapping: constraints::type_mapping(),
      presets: Vec::new(),
      options,
    }
  }

  pub fn from_json(options: Value) -> Result<Self> {
    Ok(Self::new(options_from_json(options)?))
  }

  pub fn options(&self) -> &PythonOptions {
    &self.options
  }

  #[must_use]
  pub fn with_preset(mut self, entry: PresetEntry) -> Self {
    self.presets.push(entry);
    self
  }

  #[must_use]
  pub fn with_type_mapping(mut self, customize: impl FnOnce(TypeMapping) -> TypeMapping) -> Self {
    self.mapping = customize(self.mapping);
    self
  }

  #[must_use]
  pub fn with_constraints(mut self, customize: impl FnOnce(Constraints) -> Constraints) -> Self {
    self.constraints = customize(self.constraints);
    self
  }
}

impl Default for PythonGenerator {
  fn default() -> Self {
    Self::new(PythonOptions::default())
  }
}

impl LanguageGenerator for PythonGenerator {
  fn language(&self) -> Language {
    Language::Python
  }

  fn generate(&self, models: &MetaModelSet) -> Result<Vec<OutputModel>> {
    let chain = PresetChain::new(PresetEntry::new(PythonDefaultPreset {
      options: self.options.clone(),
    }))
    .with_all(self.presets.iter().cloned());
    let mut outputs = render_models(Language::Python, &self.constraints, &self.mapping, &chain, models)?;
    for output in &mut outputs {
      output.dependencies = merge_typing_imports(std::mem::take(&mut output.dependencies));
    }
    Ok(outputs)
  }
}

/// Folds every `from typing import X` line into one sorted import, kept where the first one was.
fn merge_typing_imports(dependencies: Vec<String>) -> Vec<String> {
  let names: BTreeSet<String> = dependencies
    .iter()
    .filter_map(|line| line.strip_prefix(TYPING_PREFIX))
    .flat_map(|names| names.split(','))
    .map(|name| name.trim().to_string())
    .filter(|name| !name.is_empty())
    .collect();

  let mut merged = Vec::with_capacity(dependencies.len());
  let mut placed = false;
  for line in dependencies {
    if !line.starts_with(TYPING_PREFIX) {
      merged.push(line);
    } else if !placed {
      merged.push(format!("{TYPING_PREFIX}{}", names.iter().join(", ")));
      placed = true;
    }
  }
  merged
}
