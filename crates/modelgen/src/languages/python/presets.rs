use itertools::Itertools;

use super::{PyModelType, PythonOptions, constraints::typing_import};
use crate::{
  error::Result,
  models::{ConstrainedKind, ConstrainedObject, ConstrainedProperty, PropertyKind},
  renderer::{HookContext, HookKind, HookOutcome, Preset, indent},
};

const INDENT: usize = 4;

pub(super) struct PythonDefaultPreset {
  pub(super) options: PythonOptions,
}

impl Preset for PythonDefaultPreset {
  fn name(&self) -> &str {
    "python-default"
  }

  fn model(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let model = ctx.model();
    let docstring = model.original.description().map(docstring);
    let rendered = match &model.kind {
      ConstrainedKind::Object(object) => {
        let mut body: Vec<String> = docstring.into_iter().collect();
        match self.options.model_type {
          PyModelType::Class => body.extend(class_body(ctx)?),
          PyModelType::Dataclass => body.extend(dataclass_body(ctx, object)?),
        }
        let additional = ctx.scope.run(HookKind::AdditionalContent, ctx.target)?;
        if !additional.is_empty() {
          body.push(additional);
        }
        let class = class_block(&format!("class {}:", model.name), &body);
        match self.options.model_type {
          PyModelType::Class => class,
          PyModelType::Dataclass => {
            ctx.scope.add_dependency("from dataclasses import dataclass");
            format!("@dataclass\n{class}")
          }
        }
      }
      ConstrainedKind::Enum(values) => {
        ctx.scope.add_dependency("from enum import Enum");
        let mut body: Vec<String> = docstring.into_iter().collect();
        let items = ctx.scope.render_items(values)?;
        if !items.is_empty() {
          body.push(items.join("\n"));
        }
        class_block(&format!("class {}(Enum):", model.name), &body)
      }
      _ => format!("{} = {}", model.name, model.type_name),
    };
    Ok(HookOutcome::Replace(rendered))
  }

  fn property(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    let annotated = annotated_type(property);
    if annotated.starts_with("Optional[") {
      ctx.scope.add_dependency(typing_import("Optional"));
    }
    let line = match self.options.model_type {
      PyModelType::Dataclass if property.required => format!("{}: {annotated}", property.property_name),
      PyModelType::Dataclass => format!("{}: {annotated} = None", property.property_name),
      PyModelType::Class => format!("self._{}: {annotated} = {}", property.property_name, initializer(ctx, property)),
    };
    Ok(HookOutcome::Replace(line))
  }

  fn ctor(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let ConstrainedKind::Object(object) = &ctx.model().kind else {
      return Ok(HookOutcome::PassThrough);
    };
    ctx.scope.add_dependency(typing_import("Dict"));
    let assignments = ctx.scope.render_properties(HookKind::Property, object.properties.values())?;
    let body = if assignments.is_empty() {
      "pass".to_string()
    } else {
      assignments.join("\n")
    };
    Ok(HookOutcome::Replace(format!(
      "def __init__(self, input: Dict):\n{}",
      indent(&body, INDENT)
    )))
  }

  fn getter(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!(
      "@property\ndef {0}(self) -> {1}:\n{2}return self._{0}",
      property.property_name,
      annotated_type(property),
      " ".repeat(INDENT)
    )))
  }

  fn setter(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!(
      "@{0}.setter\ndef {0}(self, {0}: {1}):\n{2}self._{0} = {0}",
      property.property_name,
      annotated_type(property),
      " ".repeat(INDENT)
    )))
  }

  fn item(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(item) = ctx.item() else {
      return Ok(HookOutcome::PassThrough);
    };
    Ok(HookOutcome::Replace(format!("{} = {}", item.key, item.value)))
  }
}

/// Constructor followed by one getter/setter pair per property.
fn class_body(ctx: &HookContext<'_>) -> Result<Vec<String>> {
  let ConstrainedKind::Object(object) = &ctx.model().kind else {
    return Ok(Vec::new());
  };
  let mut sections = Vec::new();
  let ctor = ctx.scope.run(HookKind::Ctor, ctx.target)?;
  if !ctor.is_empty() {
    sections.push(ctor);
  }
  let getters = ctx.scope.render_properties(HookKind::Getter, object.properties.values())?;
  let setters = ctx.scope.render_properties(HookKind::Setter, object.properties.values())?;
  sections.extend(getters.into_iter().interleave(setters));
  Ok(sections)
}

/// Field declarations with required fields first, since defaults may not precede them.
fn dataclass_body(ctx: &HookContext<'_>, object: &ConstrainedObject) -> Result<Vec<String>> {
  let ordered = object
    .properties
    .values()
    .sorted_by_key(|property| !property.required);
  let fields = ctx.scope.render_properties(HookKind::Property, ordered)?;
  if fields.is_empty() {
    return Ok(Vec::new());
  }
  Ok(vec![fields.join("\n")])
}

/// Where the class constructor reads a property from.
fn initializer(ctx: &HookContext<'_>, property: &ConstrainedProperty) -> String {
  let known = || {
    let ConstrainedKind::Object(object) = &ctx.model().kind else {
      return String::new();
    };
    object
      .regular_properties()
      .map(|regular| string_literal(&regular.unconstrained_name))
      .join(", ")
  };
  match &property.kind {
    PropertyKind::Regular if property.required => format!("input[{}]", string_literal(&property.unconstrained_name)),
    PropertyKind::Regular => format!("input.get({})", string_literal(&property.unconstrained_name)),
    PropertyKind::Pattern { pattern } => {
      ctx.scope.add_dependency("import re");
      format!(
        "{{key: value for key, value in input.items() if re.search({}, key)}}",
        string_literal(pattern)
      )
    }
    PropertyKind::Additional => {
      format!("{{key: value for key, value in input.items() if key not in [{}]}}", known())
    }
  }
}

fn string_literal(text: &str) -> String {
  serde_json::Value::String(text.to_string()).to_string()
}

fn annotated_type(property: &ConstrainedProperty) -> String {
  let type_name = &property.model.type_name;
  if property.required || type_name.starts_with("Optional[") {
    type_name.clone()
  } else {
    format!("Optional[{type_name}]")
  }
}

/// A class header over its body sections, or `pass` when there is nothing to declare.
fn class_block(header: &str, sections: &[String]) -> String {
  if sections.is_empty() {
    return format!("{header}\n{}pass", " ".repeat(INDENT));
  }
  format!("{header}\n{}", indent(&sections.join("\n\n"), INDENT))
}

fn docstring(text: &str) -> String {
  format!("\"\"\"{}\"\"\"", text.trim())
}
