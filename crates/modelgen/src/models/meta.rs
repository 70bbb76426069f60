use indexmap::IndexMap;
use serde_json::Value;
use strum::{Display, IntoStaticStr};

use super::{ModelId, OriginalInput};

/// Language-independent shape of a model.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaModel {
  pub name: String,
  pub nullable: bool,
  pub original: OriginalInput,
  pub kind: MetaKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetaKind {
  Object(ObjectModel),
  Array(Box<MetaModel>),
  Tuple(TupleModel),
  Union(Vec<MetaModel>),
  Enum(Vec<EnumValueModel>),
  Dictionary { key: Box<MetaModel>, value: Box<MetaModel> },
  Reference(ModelId),
  String,
  Float,
  Integer,
  Boolean,
  Any,
}

/// Variant tag shared by [`MetaKind`] and the constrained mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum Variant {
  Object,
  Array,
  Tuple,
  Union,
  Enum,
  Dictionary,
  Reference,
  String,
  Float,
  Integer,
  Boolean,
  Any,
}

impl MetaKind {
  pub fn variant(&self) -> Variant {
    match self {
      Self::Object(_) => Variant::Object,
      Self::Array(_) => Variant::Array,
      Self::Tuple(_) => Variant::Tuple,
      Self::Union(_) => Variant::Union,
      Self::Enum(_) => Variant::Enum,
      Self::Dictionary { .. } => Variant::Dictionary,
      Self::Reference(_) => Variant::Reference,
      Self::String => Variant::String,
      Self::Float => Variant::Float,
      Self::Integer => Variant::Integer,
      Self::Boolean => Variant::Boolean,
      Self::Any => Variant::Any,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectModel {
  pub properties: IndexMap<String, PropertyModel>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PropertyKind {
  #[default]
  Regular,
  /// Folded in from `patternProperties`.
  Pattern { pattern: String },
  /// Catch-all from `additionalProperties`.
  Additional,
}

impl PropertyKind {
  pub fn is_regular(&self) -> bool {
    matches!(self, Self::Regular)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyModel {
  pub name: String,
  pub required: bool,
  pub kind: PropertyKind,
  pub model: MetaModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TupleModel {
  pub values: Vec<MetaModel>,
  /// Trailing slot accepting any number of extra items.
  pub rest: Option<Box<MetaModel>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValueModel {
  pub key: String,
  pub value: Value,
}

impl EnumValueModel {
  pub fn new(value: Value) -> Self {
    let key = match &value {
      Value::String(text) => text.clone(),
      other => other.to_string(),
    };
    Self { key, value }
  }
}

/// One standalone model in promotion order.
#[derive(Debug, Clone, PartialEq)]
pub struct MetaModelEntry {
  pub id: ModelId,
  pub model: MetaModel,
}

/// Immutable output of the shared half of the pipeline.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaModelSet {
  entries: Vec<MetaModelEntry>,
}

impl MetaModelSet {
  pub fn new(entries: Vec<MetaModelEntry>) -> Self {
    Self { entries }
  }

  pub fn entries(&self) -> &[MetaModelEntry] {
    &self.entries
  }

  pub fn get(&self, id: ModelId) -> Option<&MetaModel> {
    self.entries.iter().find(|entry| entry.id == id).map(|entry| &entry.model)
  }

  pub fn position(&self, id: ModelId) -> Option<usize> {
    self.entries.iter().position(|entry| entry.id == id)
  }

  pub fn by_name(&self, name: &str) -> Option<&MetaModel> {
    self
      .entries
      .iter()
      .find(|entry| entry.model.name == name)
      .map(|entry| &entry.model)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &MetaModelEntry> {
    self.entries.iter()
  }
}
