use std::sync::LazyLock;

use itertools::Itertools;
use serde_json::Value;

use super::TsMapType;
use crate::{
  constrainer::{Constraints, MappedType, TypeContext, TypeMapping},
  error::ModelgenError,
  models::{ConstrainedKind, ConstrainedMetaModel, Variant},
  naming::{NamingCase, NamingPipeline, ReservedWords},
};

/// TypeScript keywords plus the JavaScript words reserved for future use.
static RESERVED_WORDS: LazyLock<ReservedWords> = LazyLock::new(|| {
  ReservedWords::new(
    [
      "break", "case", "catch", "class", "const", "continue", "debugger", "default", "delete", "do", "else", "export",
      "extends", "false", "finally", "for", "function", "if", "import", "in", "instanceof", "new", "null", "return",
      "super", "switch", "this", "throw", "true", "try", "typeof", "var", "void", "while", "with", "any", "boolean",
      "constructor", "declare", "get", "module", "require", "number", "set", "string", "symbol", "type", "from", "of",
      "abstract", "arguments", "await", "byte", "char", "double", "enum", "eval", "final", "float", "goto",
      "implements", "int", "interface", "let", "long", "native", "package", "private", "protected", "public", "short",
      "static", "synchronized", "throws", "transient", "volatile", "yield",
    ],
    true,
  )
});

pub(super) fn default_constraints() -> Constraints {
  let pipeline = |exclude: &[char], case: NamingCase| {
    NamingPipeline::builder()
      .exclude(exclude.to_vec())
      .reserved(RESERVED_WORDS.clone())
      .case(case)
      .build()
  };
  Constraints::new(
    pipeline(&[' ', '_', '$'], NamingCase::Pascal),
    pipeline(&[' ', '_', '$'], NamingCase::Camel),
    pipeline(&['_', '$'], NamingCase::Constant),
  )
  .with_enum_value(enum_value)
}

/// Enum members may only carry strings or numbers; anything else is spelled as its JSON text.
fn enum_value(value: &Value) -> String {
  match value {
    Value::String(_) | Value::Number(_) => value.to_string(),
    other => Value::String(other.to_string()).to_string(),
  }
}

/// A literal as it appears in a union of literal types.
pub(super) fn literal_type(value: &Value) -> String {
  value.to_string()
}

pub(super) fn type_mapping(map_type: TsMapType) -> TypeMapping {
  TypeMapping::empty()
    .with(Variant::Object, |ctx| Ok(nullable(ctx, ctx.model.name.clone())))
    .with(Variant::Reference, |ctx| {
      let ConstrainedKind::Reference(reference) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      let mapped = nullable(ctx, reference.target_name.clone());
      if reference.target_name == ctx.owner {
        return Ok(mapped);
      }
      let import = format!("import {{ {0} }} from './{0}';", reference.target_name);
      Ok(mapped.with_dependency(import))
    })
    .with(Variant::Any, |ctx| Ok(nullable(ctx, "any")))
    .with(Variant::Float, |ctx| Ok(nullable(ctx, "number")))
    .with(Variant::Integer, |ctx| Ok(nullable(ctx, "number")))
    .with(Variant::String, |ctx| Ok(nullable(ctx, "string")))
    .with(Variant::Boolean, |ctx| Ok(nullable(ctx, "boolean")))
    .with(Variant::Tuple, |ctx| {
      let ConstrainedKind::Tuple(tuple) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      let values = tuple.values.iter().map(|value| value.type_name.clone());
      let rest = tuple.rest.iter().map(|rest| format!("...{}[]", grouped(rest)));
      Ok(nullable(ctx, format!("[{}]", values.chain(rest).join(", "))))
    })
    .with(Variant::Array, |ctx| {
      let ConstrainedKind::Array(item) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      Ok(nullable(ctx, format!("{}[]", grouped(item))))
    })
    .with(Variant::Enum, |ctx| {
      let ConstrainedKind::Enum(values) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      if ctx.standalone {
        return Ok(MappedType::new(ctx.model.name.clone()));
      }
      let literals = values.iter().map(|value| literal_type(&value.raw)).join(" | ");
      Ok(nullable(ctx, literals))
    })
    .with(Variant::Union, |ctx| {
      let ConstrainedKind::Union(members) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      let members = members.iter().map(|member| member.type_name.as_str()).join(" | ");
      Ok(nullable(ctx, members))
    })
    .with(Variant::Dictionary, move |ctx| {
      let ConstrainedKind::Dictionary { key, value } = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      let spelled = match map_type {
        TsMapType::Map => format!("Map<{}, {}>", key.type_name, value.type_name),
        TsMapType::Record => format!("Record<{}, {}>", key.type_name, value.type_name),
        TsMapType::IndexedObject => format!("{{ [name: {}]: {} }}", key.type_name, value.type_name),
      };
      Ok(nullable(ctx, spelled))
    })
}

/// Appends `| null` to nullable slots. Standalone declarations carry their own name instead.
fn nullable(ctx: &TypeContext<'_>, type_name: impl Into<String>) -> MappedType {
  let type_name = type_name.into();
  let declared = ctx.standalone && matches!(ctx.model.kind, ConstrainedKind::Object(_) | ConstrainedKind::Enum(_));
  if ctx.model.nullable && !declared {
    return MappedType::new(format!("{type_name} | null"));
  }
  MappedType::new(type_name)
}

/// Parenthesizes composite types so a postfix `[]` applies to the whole type.
fn grouped(model: &ConstrainedMetaModel) -> String {
  if model.type_name.contains(" | ") {
    format!("({})", model.type_name)
  } else {
    model.type_name.clone()
  }
}

fn mismatch(ctx: &TypeContext<'_>) -> ModelgenError {
  ModelgenError::unsupported("typescript", "a model whose kind does not match its mapping case", &ctx.model.name)
}
