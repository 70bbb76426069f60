use itertools::Itertools;

use super::{TsEnumType, TsModelType, TypeScriptOptions, constraints::literal_type};
use crate::{
  error::Result,
  models::{ConstrainedKind, ConstrainedObject, ConstrainedProperty},
  renderer::{HookContext, HookKind, HookOutcome, Preset, block, comment_lines, indent},
};

const INDENT: usize = 2;

/// Renders every model the way the configured `model_type` / `enum_type` ask for.
pub(super) struct TypeScriptDefaultPreset {
  pub(super) options: TypeScriptOptions,
}

impl Preset for TypeScriptDefaultPreset {
  fn name(&self) -> &str {
    "typescript-default"
  }

  fn model(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let model = ctx.model();
    let rendered = match &model.kind {
      ConstrainedKind::Object(object) => match self.options.model_type {
        TsModelType::Interface => {
          let body = object_body(ctx, object, HookKind::Property)?;
          block(&format!("export interface {}", model.name), &body, INDENT)
        }
        TsModelType::Type => {
          let body = object_body(ctx, object, HookKind::Property)?;
          format!("{};", block(&format!("export type {} =", model.name), &body, INDENT))
        }
        TsModelType::Class => render_class(ctx, object)?,
      },
      ConstrainedKind::Enum(values) => match self.options.enum_type {
        TsEnumType::Enum => {
          let items = ctx.scope.render_items(values)?;
          block(&format!("export enum {}", model.name), &items, INDENT)
        }
        TsEnumType::Union => {
          let literals = values.iter().map(|value| literal_type(&value.raw)).join(" | ");
          format!("export type {} = {literals};", model.name)
        }
      },
      _ => format!("export type {} = {};", model.name, model.type_name),
    };
    Ok(HookOutcome::Replace(with_doc(model.original.description(), rendered)))
  }

  fn property(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    let line = format!("{};", declaration(property));
    let line = match self.options.model_type {
      TsModelType::Class => format!("private _{line}"),
      TsModelType::Interface | TsModelType::Type => line,
    };
    Ok(HookOutcome::Replace(with_doc(property.model.original.description(), line)))
  }

  fn ctor(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let ConstrainedKind::Object(object) = &ctx.model().kind else {
      return Ok(HookOutcome::PassThrough);
    };
    if object.properties.is_empty() {
      return Ok(HookOutcome::Replace("constructor(input: {}) {}".to_string()));
    }
    let parameters = object
      .properties
      .values()
      .map(|property| format!("{},", declaration(property)))
      .join("\n");
    let assignments = object
      .properties
      .values()
      .map(|property| format!("this._{0} = input.{0};", property.property_name))
      .join("\n");
    Ok(HookOutcome::Replace(format!(
      "constructor(input: {{\n{}\n}}) {{\n{}\n}}",
      indent(&parameters, INDENT),
      indent(&assignments, INDENT)
    )))
  }

  fn getter(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!(
      "get {0}(): {1} {{ return this._{0}; }}",
      property.property_name,
      accessor_type(property)
    )))
  }

  fn setter(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!(
      "set {0}({0}: {1}) {{ this._{0} = {0}; }}",
      property.property_name,
      accessor_type(property)
    )))
  }

  fn item(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(item) = ctx.item() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!("{} = {},", item.key, item.value)))
  }
}

/// Property lines followed by any additional content.
fn object_body(ctx: &HookContext<'_>, object: &ConstrainedObject, kind: HookKind) -> Result<Vec<String>> {
  let mut body = ctx.scope.render_properties(kind, object.properties.values())?;
  let additional = ctx.scope.run(HookKind::AdditionalContent, ctx.target)?;
  if !additional.is_empty() {
    body.push(additional);
  }
  Ok(body)
}

fn render_class(ctx: &HookContext<'_>, object: &ConstrainedObject) -> Result<String> {
  let mut sections = Vec::new();
  let fields = ctx.scope.render_properties(HookKind::Property, object.properties.values())?;
  if !fields.is_empty() {
    sections.push(fields.join("\n"));
  }
  let ctor = ctx.scope.run(HookKind::Ctor, ctx.target)?;
  if !ctor.is_empty() {
    sections.push(ctor);
  }
  let getters = ctx.scope.render_properties(HookKind::Getter, object.properties.values())?;
  let setters = ctx.scope.render_properties(HookKind::Setter, object.properties.values())?;
  let accessors: Vec<String> = getters.into_iter().interleave(setters).collect();
  if !accessors.is_empty() {
    sections.push(accessors.join("\n"));
  }
  let additional = ctx.scope.run(HookKind::AdditionalContent, ctx.target)?;
  if !additional.is_empty() {
    sections.push(additional);
  }

  let header = format!("export class {}", ctx.model().name);
  if sections.is_empty() {
    return Ok(block(&header, &[], INDENT));
  }
  Ok(block(&header, &[sections.join("\n\n")], INDENT))
}

/// `name?: type`, with `?` left out for required properties.
fn declaration(property: &ConstrainedProperty) -> String {
  let marker = if property.required { "" } else { "?" };
  format!("{}{marker}: {}", property.property_name, property.model.type_name)
}

fn accessor_type(property: &ConstrainedProperty) -> String {
  if property.required {
    property.model.type_name.clone()
  } else {
    format!("{} | undefined", property.model.type_name)
  }
}

fn with_doc(description: Option<&str>, content: String) -> String {
  match description {
    Some(text) if !text.trim().is_empty() => {
      let lines = comment_lines(text, " * ");
      format!("/**\n{}\n */\n{content}", lines.join("\n"))
    }
    _ => content,
  }
}
