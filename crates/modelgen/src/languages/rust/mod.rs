//! Rust backend: serde-annotated structs, enums and untagged unions.

mod constraints;
mod presets;

use bon::Builder;
use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString};

use self::presets::RustDefaultPreset;
use super::{Language, options_from_json};
use crate::{
  constrainer::{Constraints, NamingConvention, TypeMapping},
  error::Result,
  generator::{LanguageGenerator, render_models},
  models::{MetaModelSet, OutputModel},
  renderer::{PresetChain, PresetEntry},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RustModelType {
  #[default]
  Struct,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RustOptions {
  #[builder(default)]
  pub model_type: RustModelType,
  #[builder(default)]
  pub naming_convention: NamingConvention,
}

pub struct RustGenerator {
  options: RustOptions,
  constraints: Constraints,
  mapping: TypeMapping,
  presets: Vec<PresetEntry>,
}

impl RustGenerator {
  pub fn new(options: RustOptions) -> Self {
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

  pub fn options(&self) -> &RustOptions {
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

impl Default for RustGenerator {
  fn default() -> Self {
    Self::new(RustOptions::default())
  }
}

impl LanguageGenerator for RustGenerator {
  fn language(&self) -> Language {
    Language::Rust
  }

  fn generate(&self, models: &MetaModelSet) -> Result<Vec<OutputModel>> {
    let chain = PresetChain::new(PresetEntry::new(RustDefaultPreset {
      variant_names: self.constraints.enum_key.clone(),
    }))
    .with_all(self.presets.iter().cloned());
    render_models(Language::Rust, &self.constraints, &self.mapping, &chain, models)
  }
}
