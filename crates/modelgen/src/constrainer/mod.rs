//! Per-language naming and type resolution over a [`MetaModelSet`].
//!
//! Model names share one scope across the whole set so every standalone model gets a distinct
//! identifier. Property keys and enum keys are scoped to the model that declares them.

mod type_mapping;

#[cfg(test)]
mod tests;

use std::{collections::HashMap, fmt, sync::Arc};

use indexmap::{IndexMap, IndexSet};
use serde::Deserialize;
use serde_json::Value;
use strum::Display;

pub use type_mapping::{MappedType, TypeContext, TypeMapFn, TypeMapping};

use crate::{
  error::{ModelgenError, Result},
  models::{
    ConstrainedEnumValue, ConstrainedKind, ConstrainedMetaModel, ConstrainedObject, ConstrainedProperty,
    ConstrainedReference, ConstrainedTuple, MetaKind, MetaModel, MetaModelSet, ModelId, Variant,
  },
  naming::{NameScope, NamingCase, NamingPipeline, Stage},
};

/// The identifier categories a language constrains separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum NameCategory {
  ModelName,
  PropertyKey,
  EnumKey,
}

pub type EnumValueFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Naming rules of one target language.
#[derive(Clone)]
pub struct Constraints {
  pub model_name: NamingPipeline,
  pub property_key: NamingPipeline,
  pub enum_key: NamingPipeline,
  /// Spells an enum literal in the target language.
  pub enum_value: EnumValueFn,
}

impl Constraints {
  pub fn new(model_name: NamingPipeline, property_key: NamingPipeline, enum_key: NamingPipeline) -> Self {
    Self {
      model_name,
      property_key,
      enum_key,
      enum_value: Arc::new(Value::to_string),
    }
  }

  pub fn pipeline(&self, category: NameCategory) -> &NamingPipeline {
    match category {
      NameCategory::ModelName => &self.model_name,
      NameCategory::PropertyKey => &self.property_key,
      NameCategory::EnumKey => &self.enum_key,
    }
  }

  fn pipeline_mut(&mut self, category: NameCategory) -> &mut NamingPipeline {
    match category {
      NameCategory::ModelName => &mut self.model_name,
      NameCategory::PropertyKey => &mut self.property_key,
      NameCategory::EnumKey => &mut self.enum_key,
    }
  }

  /// Replaces one stage of one category; the other stages keep running.
  #[must_use]
  pub fn with_stage(
    mut self,
    category: NameCategory,
    stage: Stage,
    f: impl Fn(&str) -> String + Send + Sync + 'static,
  ) -> Self {
    let pipeline = self.pipeline_mut(category).clone().with_stage(stage, f);
    *self.pipeline_mut(category) = pipeline;
    self
  }

  #[must_use]
  pub fn with_pipeline(mut self, category: NameCategory, pipeline: NamingPipeline) -> Self {
    *self.pipeline_mut(category) = pipeline;
    self
  }

  #[must_use]
  pub fn with_enum_value(mut self, f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
    self.enum_value = Arc::new(f);
    self
  }

  #[must_use]
  pub fn with_naming_convention(mut self, convention: &NamingConvention) -> Self {
    for (category, case) in [
      (NameCategory::ModelName, convention.model_name),
      (NameCategory::PropertyKey, convention.property_key),
      (NameCategory::EnumKey, convention.enum_key),
    ] {
      if let Some(case) = case {
        self = self.with_stage(category, Stage::NamingFormat, move |value| case.apply(value));
      }
    }
    if let Some(case) = convention.enum_value {
      let spell = Arc::clone(&self.enum_value);
      self.enum_value = Arc::new(move |value| match value {
        Value::String(text) => spell(&Value::String(case.apply(text))),
        other => spell(other),
      });
    }
    self
  }
}

impl fmt::Debug for Constraints {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Constraints")
      .field("model_name", &self.model_name)
      .field("property_key", &self.property_key)
      .field("enum_key", &self.enum_key)
      .finish_non_exhaustive()
  }
}

/// Case overrides loadable from an options document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NamingConvention {
  pub model_name: Option<NamingCase>,
  pub property_key: Option<NamingCase>,
  pub enum_key: Option<NamingCase>,
  /// Case applied to string enum literals before they are spelled.
  pub enum_value: Option<NamingCase>,
}

/// Constrains every standalone model of `models`, keeping entry order.
///
/// # Errors
///
/// Fails when a name cannot be made unique, when `mapping` lacks a case for a variant present
/// in the set, or when a reference points outside the set.
pub fn constrain_models(
  language: &str,
  constraints: &Constraints,
  mapping: &TypeMapping,
  models: &MetaModelSet,
) -> Result<Vec<ConstrainedMetaModel>> {
  let mut scope = NameScope::new();
  let mut standalone = HashMap::with_capacity(models.len());
  for entry in models.iter() {
    let name = constraints.model_name.constrain(&entry.model.name, &mut scope)?;
    standalone.insert(entry.id, (name, entry.model.kind.variant()));
  }

  let mut constrainer = Constrainer {
    language,
    constraints,
    mapping,
    standalone: &standalone,
    model_names: scope,
  };
  models
    .iter()
    .map(|entry| {
      let (name, _) = &standalone[&entry.id];
      constrainer.constrain_standalone(name, &entry.model)
    })
    .collect()
}

struct Constrainer<'a> {
  language: &'a str,
  constraints: &'a Constraints,
  mapping: &'a TypeMapping,
  standalone: &'a HashMap<ModelId, (String, Variant)>,
  /// Model-level identifiers handed out so far, standalone names first.
  model_names: NameScope,
}

/// Where in a standalone model the constrainer currently is.
#[derive(Clone, Copy)]
struct Position<'p> {
  owner: &'p str,
  property_key: Option<&'p str>,
}

impl Constrainer<'_> {
  fn constrain_standalone(&mut self, name: &str, model: &MetaModel) -> Result<ConstrainedMetaModel> {
    let position = Position {
      owner: name,
      property_key: None,
    };
    self.constrain(name.to_string(), model, position, true)
  }

  /// Nested unions may be declared next to their owner, so they take a unique model-level name
  /// prefixed by the owner. Other nested models are only formatted.
  fn constrain_nested(&mut self, model: &MetaModel, position: Position<'_>) -> Result<ConstrainedMetaModel> {
    let name = if matches!(model.kind, MetaKind::Union(_)) {
      let raw = format!("{}_{}", position.owner, model.name);
      self.constraints.model_name.constrain(&raw, &mut self.model_names)?
    } else {
      self.constraints.model_name.format(&model.name)
    };
    self.constrain(name, model, position, false)
  }

  fn constrain(
    &mut self,
    name: String,
    model: &MetaModel,
    position: Position<'_>,
    standalone: bool,
  ) -> Result<ConstrainedMetaModel> {
    let nested = Position {
      owner: position.owner,
      property_key: None,
    };
    let kind = match &model.kind {
      MetaKind::Object(object) => {
        let mut scope = NameScope::new();
        let mut properties = IndexMap::with_capacity(object.properties.len());
        for property in object.properties.values() {
          let property_name = self.constraints.property_key.constrain(&property.name, &mut scope)?;
          let child = self.constrain_nested(
            &property.model,
            Position {
              owner: position.owner,
              property_key: Some(&property_name),
            },
          )?;
          properties.insert(
            property_name.clone(),
            ConstrainedProperty {
              property_name,
              unconstrained_name: property.name.clone(),
              required: property.required,
              kind: property.kind.clone(),
              model: child,
            },
          );
        }
        ConstrainedKind::Object(ConstrainedObject { properties })
      }
      MetaKind::Array(item) => ConstrainedKind::Array(Box::new(self.constrain_nested(item, nested)?)),
      MetaKind::Tuple(tuple) => ConstrainedKind::Tuple(ConstrainedTuple {
        values: tuple
          .values
          .iter()
          .map(|value| self.constrain_nested(value, nested))
          .collect::<Result<_>>()?,
        rest: tuple
          .rest
          .as_deref()
          .map(|rest| self.constrain_nested(rest, nested).map(Box::new))
          .transpose()?,
      }),
      MetaKind::Union(members) => ConstrainedKind::Union(
        members
          .iter()
          .map(|member| self.constrain_nested(member, nested))
          .collect::<Result<_>>()?,
      ),
      MetaKind::Enum(values) => {
        let mut scope = NameScope::new();
        let values = values
          .iter()
          .map(|value| {
            Ok(ConstrainedEnumValue {
              key: self.constraints.enum_key.constrain(&value.key, &mut scope)?,
              value: (self.constraints.enum_value)(&value.value),
              raw: value.value.clone(),
            })
          })
          .collect::<Result<_>>()?;
        ConstrainedKind::Enum(values)
      }
      MetaKind::Dictionary { key, value } => ConstrainedKind::Dictionary {
        key: Box::new(self.constrain_nested(key, nested)?),
        value: Box::new(self.constrain_nested(value, nested)?),
      },
      MetaKind::Reference(target) => {
        let Some((target_name, target_variant)) = self.standalone.get(target) else {
          return Err(ModelgenError::unsupported(
            self.language,
            "a reference to a model outside the generated set",
            &model.name,
          ));
        };
        ConstrainedKind::Reference(ConstrainedReference {
          target: *target,
          target_name: target_name.clone(),
          target_variant: *target_variant,
        })
      }
      MetaKind::String => ConstrainedKind::String,
      MetaKind::Float => ConstrainedKind::Float,
      MetaKind::Integer => ConstrainedKind::Integer,
      MetaKind::Boolean => ConstrainedKind::Boolean,
      MetaKind::Any => ConstrainedKind::Any,
    };

    let mut constrained = ConstrainedMetaModel {
      name,
      nullable: model.nullable,
      original: model.original.clone(),
      type_name: String::new(),
      dependencies: child_dependencies(&kind),
      kind,
    };
    let context = TypeContext {
      model: &constrained,
      owner: position.owner,
      standalone,
      property_key: position.property_key,
    };
    let mapped = self.mapping.map(self.language, &context)?;
    constrained.type_name = mapped.type_name;
    constrained.dependencies.extend(mapped.dependencies);
    Ok(constrained)
  }
}

fn child_dependencies(kind: &ConstrainedKind) -> IndexSet<String> {
  let mut dependencies = IndexSet::new();
  let mut absorb = |child: &ConstrainedMetaModel| dependencies.extend(child.dependencies.iter().cloned());
  match kind {
    ConstrainedKind::Object(object) => object.properties.values().for_each(|property| absorb(&property.model)),
    ConstrainedKind::Array(item) => absorb(item),
    ConstrainedKind::Tuple(tuple) => {
      tuple.values.iter().for_each(&mut absorb);
      if let Some(rest) = &tuple.rest {
        absorb(rest);
      }
    }
    ConstrainedKind::Union(members) => members.iter().for_each(&mut absorb),
    ConstrainedKind::Dictionary { key, value } => {
      absorb(key);
      absorb(value);
    }
    ConstrainedKind::Enum(_)
    | ConstrainedKind::Reference(_)
    | ConstrainedKind::String
    | ConstrainedKind::Float
    | ConstrainedKind::Integer
    | ConstrainedKind::Boolean
    | ConstrainedKind::Any => {}
  }
  dependencies
}
