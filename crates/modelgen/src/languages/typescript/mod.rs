//! TypeScript backend: interfaces, classes or type aliases, with `enum` or literal-union enums.

mod constraints;
mod presets;

use bon::Builder;
use serde::Deserialize;
use serde_json::Value;
use strum::{Display, EnumString};

use self::presets::TypeScriptDefaultPreset;
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
pub enum TsModelType {
  #[default]
  Class,
  Interface,
  Type,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TsEnumType {
  #[default]
  Enum,
  Union,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TsMapType {
  #[default]
  Map,
  Record,
  IndexedObject,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TypeScriptOptions {
  #[builder(default)]
  pub model_type: TsModelType,
  #[builder(default)]
  pub enum_type: TsEnumType,
  #[builder(default)]
  pub map_type: TsMapType,
  #[builder(default)]
  pub naming_convention: NamingConvention,
}

pub struct TypeScriptGenerator {
  options: TypeScriptOptions,
  constraints: Constraints,
  mapping: TypeMapping,
  presets: Vec<PresetEntry>,
}

impl TypeScriptGenerator {
  pub fn new(options: TypeScriptOptions) -> Self {
    Self {
      constraints: constraints::default_constraints().with_naming_convention(&options.naming_convention),
      mapping: constraints::type_mapping(options.map_type),
      presets: Vec::new(),
      options,
    }
  }

  /// Builds a generator from an options document such as `{"model_type": "interface"}`.
  pub fn from_json(options: Value) -> Result<Self> {
    Ok(Self::new(options_from_json(options)?))
  }

  pub fn options(&self) -> &TypeScriptOptions {
    &self.options
  }

  /// Appends a preset after the default one and any added before.
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

impl Default for TypeScriptGenerator {
  fn default() -> Self {
    Self::new(TypeScriptOptions::default())
  }
}

impl LanguageGenerator for TypeScriptGenerator {
  fn language(&self) -> Language {
    Language::TypeScript
  }

  fn generate(&self, models: &MetaModelSet) -> Result<Vec<OutputModel>> {
    let chain = PresetChain::new(PresetEntry::new(TypeScriptDefaultPreset {
      options: self.options.clone(),
    }))
    .with_all(self.presets.iter().cloned());
    render_models(Language::TypeScript, &self.constraints, &self.mapping, &chain, models)
  }
}
