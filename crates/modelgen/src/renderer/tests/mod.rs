mod presets;

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use serde_json::json;

use super::{HookContext, HookKind, HookOutcome, Preset, block};
use crate::{
  error::Result,
  models::{ConstrainedKind, ConstrainedMetaModel, ConstrainedObject, ConstrainedProperty, OriginalInput, PropertyKind},
};

/// A pet model with a `name` string and a `tags` property flagged with `x-custom-type`.
pub(super) fn pet_model() -> ConstrainedMetaModel {
  let document = Arc::new(json!({
    "type": "object",
    "properties": {
      "name": { "type": "string" },
      "tags": { "type": "object", "x-custom-type": "dictionary" }
    }
  }));
  let leaf = |key: &str, type_name: &str, kind: ConstrainedKind| ConstrainedProperty {
    property_name: key.to_string(),
    unconstrained_name: key.to_string(),
    required: false,
    kind: PropertyKind::Regular,
    model: ConstrainedMetaModel {
      name: key.to_string(),
      nullable: false,
      original: OriginalInput::new(Arc::clone(&document), format!("/properties/{key}")),
      type_name: type_name.to_string(),
      dependencies: IndexSet::new(),
      kind,
    },
  };
  let mut properties = IndexMap::new();
  properties.insert("name".to_string(), leaf("name", "string", ConstrainedKind::String));
  properties.insert("tags".to_string(), leaf("tags", "any", ConstrainedKind::Any));
  ConstrainedMetaModel {
    name: "Pet".to_string(),
    nullable: false,
    original: OriginalInput::new(Arc::clone(&document), ""),
    type_name: "Pet".to_string(),
    dependencies: IndexSet::new(),
    kind: ConstrainedKind::Object(ConstrainedObject { properties }),
  }
}

/// Renders `model Name { key: type }` through the property hooks.
pub(super) struct SketchPreset;

impl Preset for SketchPreset {
  fn name(&self) -> &str {
    "sketch"
  }

  fn model(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let ConstrainedKind::Object(object) = &ctx.model().kind else {
      return Ok(HookOutcome::PassThrough);
    };
    let lines = ctx.scope.render_properties(HookKind::Property, object.properties.values())?;
    Ok(HookOutcome::Replace(block(&format!("model {}", ctx.model().name), &lines, 2)))
  }

  fn property(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!(
      "{}: {}",
      property.property_name, property.model.type_name
    )))
  }
}
