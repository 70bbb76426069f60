//! Maps split [`CommonModel`] nodes onto the closed [`MetaModel`] variant set.

#[cfg(test)]
mod tests;

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{
  error::{ModelgenError, Result},
  models::{
    CommonModel, EnumValueModel, Items, MetaKind, MetaModel, MetaModelEntry, MetaModelSet, ModelArena, ModelId,
    ObjectModel, OriginalInput, PropertyKind, PropertyModel, SchemaType, TupleModel,
  },
};

const PATTERN_PROPERTY_SUFFIX: &str = "_PatternProperty";
const ADDITIONAL_PROPERTIES_NAME: &str = "additionalProperties";

/// Converts every standalone node, keeping promotion order.
pub fn convert_models(arena: &ModelArena, standalone: &[ModelId]) -> Result<MetaModelSet> {
  let mut converter = MetaModelConverter::new(arena);
  let entries = standalone
    .iter()
    .map(|id| {
      Ok(MetaModelEntry {
        id: *id,
        model: converter.convert(*id)?,
      })
    })
    .collect::<Result<Vec<_>>>()?;
  Ok(MetaModelSet::new(entries))
}

pub struct MetaModelConverter<'a> {
  arena: &'a ModelArena,
  in_progress: HashSet<ModelId>,
}

impl<'a> MetaModelConverter<'a> {
  pub fn new(arena: &'a ModelArena) -> Self {
    Self {
      arena,
      in_progress: HashSet::new(),
    }
  }

  /// Converts one node and everything inlined below it.
  ///
  /// Reference markers become [`MetaKind::Reference`] and are not followed, so only a cycle
  /// that bypassed the splitter can bring a node back into its own conversion; that case
  /// fails instead of recursing.
  pub fn convert(&mut self, id: ModelId) -> Result<MetaModel> {
    let arena = self.arena;
    let node = arena.get(id);
    if let Some(target) = node.reference {
      return Ok(MetaModel {
        name: node.name.clone(),
        nullable: false,
        original: node.original.clone(),
        kind: MetaKind::Reference(target),
      });
    }

    if !self.in_progress.insert(id) {
      return Err(ModelgenError::unsupported(
        "meta-model",
        "a cycle that was not split into a reference",
        &node.name,
      ));
    }
    let converted = self.convert_node(node);
    self.in_progress.remove(&id);
    converted
  }

  fn convert_node(&mut self, node: &CommonModel) -> Result<MetaModel> {
    let nullable = node.is_nullable();

    if node.is_enum() {
      let values = node.enum_values.iter().cloned().map(EnumValueModel::new).collect();
      return Ok(leaf(node, nullable, MetaKind::Enum(values)));
    }

    if !node.union.is_empty() {
      return self.convert_union(node, nullable);
    }

    let concrete = node.concrete_types();
    match concrete.as_slice() {
      [] => {
        if let Some(additional) = node.additional_properties
          && node.properties.is_empty()
          && node.pattern_properties.is_empty()
        {
          let kind = self.dictionary(&node.name, &node.original, additional)?;
          return Ok(leaf(node, nullable, kind));
        }
        Ok(leaf(node, nullable, MetaKind::Any))
      }
      [single] => {
        let kind = self.convert_type(node, *single)?;
        Ok(leaf(node, nullable, kind))
      }
      many if many.len() == SchemaType::ALL.len() - 1 => Ok(leaf(node, nullable, MetaKind::Any)),
      many => {
        let members = many
          .iter()
          .map(|schema_type| {
            Ok(MetaModel {
              name: format!("{}_{schema_type}", node.name),
              nullable: false,
              original: node.original.clone(),
              kind: self.convert_type(node, *schema_type)?,
            })
          })
          .collect::<Result<Vec<_>>>()?;
        Ok(leaf(node, nullable, MetaKind::Union(members)))
      }
    }
  }

  /// Union candidates in declaration order. Branches that only allow `null` fold into the
  /// nullability flag; a single remaining member replaces the union.
  fn convert_union(&mut self, node: &CommonModel, nullable: bool) -> Result<MetaModel> {
    let mut nullable = nullable;
    let mut members = Vec::with_capacity(node.union.len());
    for branch in &node.union {
      if is_pure_null(self.arena.get(*branch)) {
        nullable = true;
        continue;
      }
      members.push(self.convert(*branch)?);
    }

    match members.len() {
      0 => Ok(leaf(node, true, MetaKind::Any)),
      1 => {
        let mut only = members.remove(0);
        only.name.clone_from(&node.name);
        only.nullable |= nullable;
        Ok(only)
      }
      _ => Ok(leaf(node, nullable, MetaKind::Union(members))),
    }
  }

  fn convert_type(&mut self, node: &CommonModel, schema_type: SchemaType) -> Result<MetaKind> {
    let kind = match schema_type {
      SchemaType::Object => MetaKind::Object(self.convert_object(node)?),
      SchemaType::Array => self.convert_array(node)?,
      SchemaType::String => MetaKind::String,
      SchemaType::Number => MetaKind::Float,
      SchemaType::Integer => MetaKind::Integer,
      SchemaType::Boolean => MetaKind::Boolean,
      SchemaType::Null => MetaKind::Any,
    };
    Ok(kind)
  }

  fn convert_object(&mut self, node: &CommonModel) -> Result<ObjectModel> {
    let arena = self.arena;
    let mut properties: IndexMap<String, PropertyModel> = IndexMap::new();

    for (key, child) in &node.properties {
      let model = self.convert(*child)?;
      let name = unique_key(&properties, key);
      properties.insert(
        name.clone(),
        PropertyModel {
          name,
          required: node.is_required(key),
          kind: PropertyKind::Regular,
          model,
        },
      );
    }

    for (pattern, child) in &node.pattern_properties {
      let name = unique_key(&properties, &format!("{pattern}{PATTERN_PROPERTY_SUFFIX}"));
      let child_node = arena.get(*child);
      let kind = self.dictionary(&name, &child_node.original, *child)?;
      properties.insert(
        name.clone(),
        PropertyModel {
          model: MetaModel {
            name: name.clone(),
            nullable: false,
            original: child_node.original.clone(),
            kind,
          },
          name,
          required: false,
          kind: PropertyKind::Pattern {
            pattern: pattern.clone(),
          },
        },
      );
    }

    if let Some(additional) = node.additional_properties {
      let name = unique_key(&properties, ADDITIONAL_PROPERTIES_NAME);
      let original = arena.get(additional).original.clone();
      let kind = self.dictionary(&name, &original, additional)?;
      properties.insert(
        name.clone(),
        PropertyModel {
          model: MetaModel {
            name: name.clone(),
            nullable: false,
            original,
            kind,
          },
          name,
          required: false,
          kind: PropertyKind::Additional,
        },
      );
    }

    Ok(ObjectModel { properties })
  }

  fn convert_array(&mut self, node: &CommonModel) -> Result<MetaKind> {
    let kind = match &node.items {
      None => MetaKind::Array(Box::new(MetaModel {
        name: node.name.clone(),
        nullable: false,
        original: node.original.clone(),
        kind: MetaKind::Any,
      })),
      // `additionalItems` only constrains positions past a tuple, so a single item schema ignores it.
      Some(Items::Single(item)) => MetaKind::Array(Box::new(self.convert(*item)?)),
      Some(Items::Tuple(slots)) => {
        let values = slots.iter().map(|slot| self.convert(*slot)).collect::<Result<Vec<_>>>()?;
        let rest = node
          .additional_items
          .map(|additional| self.convert(additional).map(Box::new))
          .transpose()?;
        MetaKind::Tuple(TupleModel { values, rest })
      }
    };
    Ok(kind)
  }

  fn dictionary(&mut self, name: &str, original: &OriginalInput, value: ModelId) -> Result<MetaKind> {
    let value = self.convert(value)?;
    Ok(MetaKind::Dictionary {
      key: Box::new(MetaModel {
        name: name.to_string(),
        nullable: false,
        original: original.clone(),
        kind: MetaKind::String,
      }),
      value: Box::new(value),
    })
  }
}

fn leaf(node: &CommonModel, nullable: bool, kind: MetaKind) -> MetaModel {
  MetaModel {
    name: node.name.clone(),
    nullable,
    original: node.original.clone(),
    kind,
  }
}

fn is_pure_null(node: &CommonModel) -> bool {
  !node.is_reference()
    && !node.is_enum()
    && node.union.is_empty()
    && node.types.len() == 1
    && node.has_type(SchemaType::Null)
}

fn unique_key(properties: &IndexMap<String, PropertyModel>, key: &str) -> String {
  if !properties.contains_key(key) {
    return key.to_string();
  }
  (1..)
    .map(|n| format!("{key}_{n}"))
    .find(|candidate| !properties.contains_key(candidate))
    .unwrap_or_else(|| key.to_string())
}
