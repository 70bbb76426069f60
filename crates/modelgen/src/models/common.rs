use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;
use strum::{Display, EnumString, IntoStaticStr};

use super::OriginalInput;

/// Identity of a [`CommonModel`] inside its [`ModelArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(pub(crate) usize);

impl ModelId {
  pub fn index(self) -> usize {
    self.0
  }
}

impl fmt::Display for ModelId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// Primitive type tag of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaType {
  Object,
  Array,
  String,
  Number,
  Integer,
  Boolean,
  Null,
}

impl SchemaType {
  pub const ALL: [Self; 7] = [
    Self::Object,
    Self::Array,
    Self::String,
    Self::Number,
    Self::Integer,
    Self::Boolean,
    Self::Null,
  ];
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Items {
  Single(ModelId),
  Tuple(Vec<ModelId>),
}

impl Items {
  pub fn ids(&self) -> Vec<ModelId> {
    match self {
      Self::Single(id) => vec![*id],
      Self::Tuple(ids) => ids.clone(),
    }
  }
}

/// Normalized schema node produced by the interpreter.
///
/// Every child is another node of the same arena, so shared and recursive shapes are
/// expressed by identity instead of by copying.
#[derive(Debug, Clone)]
pub struct CommonModel {
  pub id: ModelId,
  /// Display name: `title`, then `$id`, then the name inferred from the node's location.
  pub name: String,
  /// Stable identity declared through `$id`.
  pub schema_id: Option<String>,
  pub types: IndexSet<SchemaType>,
  pub properties: IndexMap<String, ModelId>,
  pub pattern_properties: IndexMap<String, ModelId>,
  pub additional_properties: Option<ModelId>,
  pub items: Option<Items>,
  pub additional_items: Option<ModelId>,
  pub enum_values: Vec<Value>,
  pub required: IndexSet<String>,
  /// `oneOf`/`anyOf` branches, kept in declaration order.
  pub union: Vec<ModelId>,
  /// Set on reference markers: this node stands for the referenced model.
  pub reference: Option<ModelId>,
  pub original: OriginalInput,
}

impl CommonModel {
  pub(crate) fn new(id: ModelId, name: String, original: OriginalInput) -> Self {
    Self {
      id,
      name,
      schema_id: None,
      types: IndexSet::new(),
      properties: IndexMap::new(),
      pattern_properties: IndexMap::new(),
      additional_properties: None,
      items: None,
      additional_items: None,
      enum_values: Vec::new(),
      required: IndexSet::new(),
      union: Vec::new(),
      reference: None,
      original,
    }
  }

  pub fn add_type(&mut self, schema_type: SchemaType) {
    self.types.insert(schema_type);
  }

  pub fn has_type(&self, schema_type: SchemaType) -> bool {
    self.types.contains(&schema_type)
  }

  /// Types other than `null`.
  pub fn concrete_types(&self) -> Vec<SchemaType> {
    self.types.iter().copied().filter(|t| *t != SchemaType::Null).collect()
  }

  pub fn is_nullable(&self) -> bool {
    self.has_type(SchemaType::Null)
  }

  pub fn is_required(&self, property: &str) -> bool {
    self.required.contains(property)
  }

  pub fn is_reference(&self) -> bool {
    self.reference.is_some()
  }

  pub fn is_enum(&self) -> bool {
    !self.enum_values.is_empty()
  }

  /// Objects and enums carry enough identity to be emitted as their own model.
  pub fn is_model_like(&self) -> bool {
    !self.is_reference() && (self.has_type(SchemaType::Object) || self.is_enum())
  }

  /// Every child slot, in a stable order.
  pub fn children(&self) -> Vec<ModelId> {
    let mut children: Vec<ModelId> = self.properties.values().copied().collect();
    children.extend(self.pattern_properties.values().copied());
    children.extend(self.additional_properties);
    if let Some(items) = &self.items {
      children.extend(items.ids());
    }
    children.extend(self.additional_items);
    children.extend(self.union.iter().copied());
    children
  }
}

/// Owner of every [`CommonModel`] created while interpreting one document.
#[derive(Debug, Clone, Default)]
pub struct ModelArena {
  nodes: Vec<CommonModel>,
}

impl ModelArena {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn allocate(&mut self, name: impl Into<String>, original: OriginalInput) -> ModelId {
    let id = ModelId(self.nodes.len());
    self.nodes.push(CommonModel::new(id, name.into(), original));
    id
  }

  /// Creates a marker node standing for `target`.
  pub(crate) fn reference_to(&mut self, target: ModelId) -> ModelId {
    let (name, original) = {
      let node = self.get(target);
      (node.name.clone(), node.original.clone())
    };
    let id = self.allocate(name, original);
    self.get_mut(id).reference = Some(target);
    id
  }

  /// Copies a node under a fresh id. Children stay shared.
  pub(crate) fn duplicate(&mut self, source: ModelId) -> ModelId {
    let id = ModelId(self.nodes.len());
    let mut copy = self.get(source).clone();
    copy.id = id;
    self.nodes.push(copy);
    id
  }

  pub fn get(&self, id: ModelId) -> &CommonModel {
    &self.nodes[id.0]
  }

  pub fn get_mut(&mut self, id: ModelId) -> &mut CommonModel {
    &mut self.nodes[id.0]
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = &CommonModel> {
    self.nodes.iter()
  }
}
