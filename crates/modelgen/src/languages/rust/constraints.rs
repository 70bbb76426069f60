use std::sync::LazyLock;

use itertools::Itertools;
use serde_json::Value;

use crate::{
  constrainer::{Constraints, MappedType, TypeContext, TypeMapping},
  error::ModelgenError,
  models::{ConstrainedKind, Variant},
  naming::{NamingCase, NamingPipeline, ReservedWords},
};

pub(super) const HASH_MAP_IMPORT: &str = "use std::collections::HashMap;";

static RESERVED_WORDS: LazyLock<ReservedWords> = LazyLock::new(|| {
  ReservedWords::new(
    [
      "as", "break", "const", "continue", "crate", "else", "enum", "extern", "false", "fn", "for", "if", "impl", "in",
      "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "static", "struct", "super", "trait", "true",
      "type", "unsafe", "use", "where", "while", "async", "await", "dyn", "try", "abstract", "become", "box", "do",
      "final", "macro", "override", "priv", "typeof", "unsized", "virtual", "yield", "gen", "self",
    ],
    true,
  )
  // Type names that would shadow the prelude or the derives on every generated item.
  .extended(["Clone", "Copy", "Debug", "Display", "Send", "Sync", "Vec", "String", "Option", "Box", "HashMap"])
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
    pipeline(&[' ', '_'], NamingCase::Snake),
    pipeline(&[' ', '_'], NamingCase::Pascal),
  )
  .with_enum_value(serde_name)
}

/// The string serde matches a variant against, spelled as a Rust string literal.
fn serde_name(value: &Value) -> String {
  match value {
    Value::String(text) => format!("{text:?}"),
    other => format!("{:?}", other.to_string()),
  }
}

pub(super) fn type_mapping() -> TypeMapping {
  TypeMapping::empty()
    .with(Variant::Object, |ctx| Ok(optional(ctx, ctx.model.name.clone())))
    .with(Variant::Enum, |ctx| Ok(optional(ctx, ctx.model.name.clone())))
    .with(Variant::Reference, |ctx| {
      let ConstrainedKind::Reference(reference) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      Ok(optional(ctx, format!("Box<crate::{}>", reference.target_name)))
    })
    .with(Variant::Any, |ctx| Ok(optional(ctx, "serde_json::Value")))
    .with(Variant::Float, |ctx| Ok(optional(ctx, "f64")))
    .with(Variant::Integer, |ctx| Ok(optional(ctx, "i64")))
    .with(Variant::String, |ctx| Ok(optional(ctx, "String")))
    .with(Variant::Boolean, |ctx| Ok(optional(ctx, "bool")))
    .with(Variant::Array, |ctx| {
      let ConstrainedKind::Array(item) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      Ok(optional(ctx, format!("Vec<{}>", item.type_name)))
    })
    .with(Variant::Tuple, |ctx| {
      let ConstrainedKind::Tuple(tuple) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      if tuple.rest.is_some() {
        return Err(ModelgenError::unsupported(
          "rust",
          "tuples accepting additional items",
          &ctx.model.name,
        ));
      }
      let values = tuple.values.iter().map(|value| value.type_name.as_str()).join(", ");
      Ok(optional(ctx, format!("({values})")))
    })
    .with(Variant::Union, |ctx| Ok(optional(ctx, ctx.model.name.clone())))
    .with(Variant::Dictionary, |ctx| {
      let ConstrainedKind::Dictionary { key, value } = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      Ok(optional(ctx, format!("HashMap<{}, {}>", key.type_name, value.type_name)).with_dependency(HASH_MAP_IMPORT))
    })
}

/// Wraps nullable slots in `Option`. Standalone items are declared under their own name.
fn optional(ctx: &TypeContext<'_>, type_name: impl Into<String>) -> MappedType {
  let type_name = type_name.into();
  if ctx.model.nullable && !ctx.standalone {
    return MappedType::new(format!("Option<{type_name}>"));
  }
  MappedType::new(type_name)
}

fn mismatch(ctx: &TypeContext<'_>) -> ModelgenError {
  ModelgenError::unsupported("rust", "a model whose kind does not match its mapping case", &ctx.model.name)
}
