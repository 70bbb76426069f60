use itertools::Itertools;

use crate::{
  error::Result,
  models::{ConstrainedKind, ConstrainedMetaModel, ConstrainedProperty, ConstrainedTuple, PropertyKind},
  naming::{NameScope, NamingPipeline},
  renderer::{HookContext, HookKind, HookOutcome, HookTarget, Preset, block, comment_lines},
};

const INDENT: usize = 4;
const SERDE_IMPORT: &str = "use serde::{Deserialize, Serialize};";
const DERIVES: &str = "#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]";

pub(super) struct RustDefaultPreset {
  /// Formats union variant names.
  pub(super) variant_names: NamingPipeline,
}

impl Preset for RustDefaultPreset {
  fn name(&self) -> &str {
    "rust-default"
  }

  fn model(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let model = ctx.model();
    let mut items = vec![self.render_item(ctx, model, &model.name)?];

    let mut nested = Vec::new();
    collect_nested_unions(model, &mut nested);
    for union in nested {
      items.push(self.render_union(ctx, union)?);
    }
    Ok(HookOutcome::Replace(items.join("\n\n")))
  }

  fn annotations(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let model = ctx.model();
    let mut lines = model
      .original
      .description()
      .map(|text| comment_lines(text, "/// "))
      .unwrap_or_default();
    match &model.kind {
      ConstrainedKind::Object(_) | ConstrainedKind::Enum(_) | ConstrainedKind::Tuple(_) => {
        lines.push(DERIVES.to_string());
      }
      ConstrainedKind::Union(_) => {
        lines.push(DERIVES.to_string());
        lines.push("#[serde(untagged)]".to_string());
      }
      _ => {}
    }
    Ok(HookOutcome::Replace(lines.join("\n")))
  }

  fn property(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    let mut lines = property
      .model
      .original
      .description()
      .map(|text| comment_lines(text, "/// "))
      .unwrap_or_default();
    let field_type = match property.kind {
      PropertyKind::Regular => {
        let mut options = Vec::new();
        if property.property_name != property.unconstrained_name {
          options.push(format!("rename = {:?}", property.unconstrained_name));
        }
        let field_type = field_type(property);
        if field_type.starts_with("Option<") {
          options.push("skip_serializing_if = \"Option::is_none\"".to_string());
        }
        if !options.is_empty() {
          lines.push(format!("#[serde({})]", options.join(", ")));
        }
        field_type
      }
      PropertyKind::Pattern { .. } | PropertyKind::Additional => {
        lines.push("#[serde(flatten)]".to_string());
        property.model.type_name.clone()
      }
    };
    lines.push(format!("pub {}: {field_type},", property.property_name));
    Ok(HookOutcome::Replace(lines.join("\n")))
  }

  fn item(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(item) = ctx.item() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!("#[serde(rename = {})]\n{},", item.value, item.key)))
  }
}

impl RustDefaultPreset {
  /// Renders the standalone model itself.
  fn render_item(&self, ctx: &HookContext<'_>, model: &ConstrainedMetaModel, name: &str) -> Result<String> {
    let annotations = ctx.scope.run(HookKind::Annotations, HookTarget::Model)?;
    let declaration = match &model.kind {
      ConstrainedKind::Object(object) => {
        let mut fields = ctx.scope.render_properties(HookKind::Property, object.properties.values())?;
        let additional = ctx.scope.run(HookKind::AdditionalContent, HookTarget::Model)?;
        if !additional.is_empty() {
          fields.push(additional);
        }
        block(&format!("pub struct {name}"), &fields, INDENT)
      }
      ConstrainedKind::Enum(values) => {
        let variants = ctx.scope.render_items(values)?;
        block(&format!("pub enum {name}"), &variants, INDENT)
      }
      ConstrainedKind::Union(members) => block(&format!("pub enum {name}"), &self.variants(members)?, INDENT),
      ConstrainedKind::Tuple(ConstrainedTuple { values, .. }) => {
        let fields = values.iter().map(|value| format!("pub {}", value.type_name)).join(", ");
        format!("pub struct {name}({fields});")
      }
      _ => format!("pub type {name} = {};", model.type_name),
    };
    if !annotations.is_empty() && annotations.contains("Serialize") {
      ctx.scope.add_dependency(SERDE_IMPORT);
    }
    Ok(join_annotated(&annotations, declaration))
  }

  /// Renders a union that was nested inside the standalone model.
  fn render_union(&self, ctx: &HookContext<'_>, union: &ConstrainedMetaModel) -> Result<String> {
    let ConstrainedKind::Union(members) = &union.kind else {
      return Ok(String::new());
    };
    ctx.scope.add_dependency(SERDE_IMPORT);
    let declaration = block(&format!("pub enum {}", union.name), &self.variants(members)?, INDENT);
    Ok(format!("{DERIVES}\n#[serde(untagged)]\n{declaration}"))
  }

  /// One tuple variant per member, named after the member's type where it has one.
  fn variants(&self, members: &[ConstrainedMetaModel]) -> Result<Vec<String>> {
    let mut scope = NameScope::new();
    members
      .iter()
      .map(|member| {
        let raw = match &member.kind {
          ConstrainedKind::Reference(reference) => reference.target_name.as_str(),
          _ => member.name.as_str(),
        };
        let variant = self.variant_names.constrain(raw, &mut scope)?;
        Ok(format!("{variant}({}),", member.type_name))
      })
      .collect()
  }
}

fn field_type(property: &ConstrainedProperty) -> String {
  let type_name = &property.model.type_name;
  if property.required || type_name.starts_with("Option<") {
    type_name.clone()
  } else {
    format!("Option<{type_name}>")
  }
}

fn join_annotated(annotations: &str, declaration: String) -> String {
  if annotations.is_empty() {
    declaration
  } else {
    format!("{annotations}\n{declaration}")
  }
}

/// Unions below the standalone model, outermost first.
fn collect_nested_unions<'m>(model: &'m ConstrainedMetaModel, out: &mut Vec<&'m ConstrainedMetaModel>) {
  fn visit<'m>(child: &'m ConstrainedMetaModel, out: &mut Vec<&'m ConstrainedMetaModel>) {
    if matches!(child.kind, ConstrainedKind::Union(_)) {
      out.push(child);
    }
    collect_nested_unions(child, out);
  }

  match &model.kind {
    ConstrainedKind::Object(object) => {
      for property in object.properties.values() {
        visit(&property.model, out);
      }
    }
    ConstrainedKind::Array(item) => visit(item, out),
    ConstrainedKind::Tuple(tuple) => {
      for value in tuple.values.iter().chain(tuple.rest.as_deref()) {
        visit(value, out);
      }
    }
    ConstrainedKind::Union(members) => {
      for member in members {
        visit(member, out);
      }
    }
    ConstrainedKind::Dictionary { key, value } => {
      visit(key, out);
      visit(value, out);
    }
    ConstrainedKind::Enum(_)
    | ConstrainedKind::Reference(_)
    | ConstrainedKind::String
    | ConstrainedKind::Float
    | ConstrainedKind::Integer
    | ConstrainedKind::Boolean
    | ConstrainedKind::Any => {}
  }
}
