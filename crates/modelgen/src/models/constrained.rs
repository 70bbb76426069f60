use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::{ModelId, OriginalInput, PropertyKind, Variant};

/// A [`MetaModel`](super::MetaModel) after one language's naming and type mapping.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedMetaModel {
  pub name: String,
  pub nullable: bool,
  pub original: OriginalInput,
  /// Target-language spelling of this model's type.
  pub type_name: String,
  pub dependencies: IndexSet<String>,
  pub kind: ConstrainedKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConstrainedKind {
  Object(ConstrainedObject),
  Array(Box<ConstrainedMetaModel>),
  Tuple(ConstrainedTuple),
  Union(Vec<ConstrainedMetaModel>),
  Enum(Vec<ConstrainedEnumValue>),
  Dictionary {
    key: Box<ConstrainedMetaModel>,
    value: Box<ConstrainedMetaModel>,
  },
  Reference(ConstrainedReference),
  String,
  Float,
  Integer,
  Boolean,
  Any,
}

impl ConstrainedKind {
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
pub struct ConstrainedObject {
  /// Keyed by constrained property name.
  pub properties: IndexMap<String, ConstrainedProperty>,
}

impl ConstrainedObject {
  pub fn regular_properties(&self) -> impl Iterator<Item = &ConstrainedProperty> {
    self.properties.values().filter(|property| property.kind.is_regular())
  }

  pub fn extra_properties(&self) -> impl Iterator<Item = &ConstrainedProperty> {
    self.properties.values().filter(|property| !property.kind.is_regular())
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedProperty {
  pub property_name: String,
  /// The key as written in the schema.
  pub unconstrained_name: String,
  pub required: bool,
  pub kind: PropertyKind,
  pub model: ConstrainedMetaModel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedTuple {
  pub values: Vec<ConstrainedMetaModel>,
  pub rest: Option<Box<ConstrainedMetaModel>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedEnumValue {
  pub key: String,
  /// Literal spelled for the target language.
  pub value: String,
  pub raw: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstrainedReference {
  pub target: ModelId,
  /// Constrained name of the referenced standalone model.
  pub target_name: String,
  pub target_variant: Variant,
}
