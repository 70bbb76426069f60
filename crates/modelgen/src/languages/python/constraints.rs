use std::sync::LazyLock;

use itertools::Itertools;
use serde_json::Value;

use crate::{
  constrainer::{Constraints, MappedType, TypeContext, TypeMapping},
  error::ModelgenError,
  models::{ConstrainedKind, Variant},
  naming::{DedupStrategy, NamingCase, NamingPipeline, ReservedWords},
};

static RESERVED_WORDS: LazyLock<ReservedWords> = LazyLock::new(|| {
  ReservedWords::new(
    [
      "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
      "elif", "else", "except", "finally", "for", "from", "global", "if", "import", "in", "is", "lambda", "nonlocal",
      "not", "or", "pass", "raise", "return", "try", "while", "with", "yield", "self",
    ],
    true,
  )
});

pub(super) fn default_constraints() -> Constraints {
  let pipeline = |case: NamingCase| {
    NamingPipeline::builder()
      .exclude(vec![' ', '_'])
      .reserved(RESERVED_WORDS.clone())
      .case(case)
      .dedup(DedupStrategy::NumericSuffix {
        separator: "_".to_string(),
        start: 1,
      })
      .build()
  };
  Constraints::new(
    pipeline(NamingCase::Pascal),
    pipeline(NamingCase::Snake),
    pipeline(NamingCase::Constant),
  )
  .with_enum_value(literal)
}

/// A JSON value spelled as a Python literal.
pub(super) fn literal(value: &Value) -> String {
  match value {
    Value::Null => "None".to_string(),
    Value::Bool(true) => "True".to_string(),
    Value::Bool(false) => "False".to_string(),
    Value::Number(_) | Value::String(_) => value.to_string(),
    other => Value::String(other.to_string()).to_string(),
  }
}

pub(super) fn typing_import(name: &str) -> String {
  format!("from typing import {name}")
}

pub(super) fn type_mapping() -> TypeMapping {
  TypeMapping::empty()
    .with(Variant::Object, |ctx| Ok(optional(ctx, ctx.model.name.clone())))
    .with(Variant::Reference, |ctx| {
      let ConstrainedKind::Reference(reference) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      Ok(optional(ctx, format!("'{}'", reference.target_name)))
    })
    .with(Variant::Any, |ctx| Ok(optional(ctx, "Any").with_dependency(typing_import("Any"))))
    .with(Variant::Float, |ctx| Ok(optional(ctx, "float")))
    .with(Variant::Integer, |ctx| Ok(optional(ctx, "int")))
    .with(Variant::String, |ctx| Ok(optional(ctx, "str")))
    .with(Variant::Boolean, |ctx| Ok(optional(ctx, "bool")))
    .with(Variant::Array, |ctx| {
      let ConstrainedKind::Array(item) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      Ok(optional(ctx, format!("List[{}]", item.type_name)).with_dependency(typing_import("List")))
    })
    .with(Variant::Tuple, |ctx| {
      let ConstrainedKind::Tuple(tuple) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      if tuple.rest.is_some() {
        return Err(ModelgenError::unsupported(
          "python",
          "tuples accepting additional items",
          &ctx.model.name,
        ));
      }
      let values = tuple.values.iter().map(|value| value.type_name.as_str()).join(", ");
      Ok(optional(ctx, format!("tuple[{values}]")))
    })
    .with(Variant::Enum, |ctx| {
      let ConstrainedKind::Enum(values) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      if ctx.standalone {
        return Ok(MappedType::new(ctx.model.name.clone()));
      }
      let literals = values.iter().map(|value| literal(&value.raw)).join(", ");
      Ok(optional(ctx, format!("Literal[{literals}]")).with_dependency(typing_import("Literal")))
    })
    .with(Variant::Union, |ctx| {
      let ConstrainedKind::Union(members) = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      let members = members.iter().map(|member| member.type_name.as_str()).join(", ");
      Ok(optional(ctx, format!("Union[{members}]")).with_dependency(typing_import("Union")))
    })
    .with(Variant::Dictionary, |ctx| {
      let ConstrainedKind::Dictionary { key, value } = &ctx.model.kind else {
        return Err(mismatch(ctx));
      };
      Ok(optional(ctx, format!("dict[{}, {}]", key.type_name, value.type_name)))
    })
}

/// Wraps nullable slots in `Optional`.
fn optional(ctx: &TypeContext<'_>, type_name: impl Into<String>) -> MappedType {
  let type_name = type_name.into();
  if ctx.model.nullable && !ctx.standalone {
    return MappedType::new(format!("Optional[{type_name}]")).with_dependency(typing_import("Optional"));
  }
  MappedType::new(type_name)
}

fn mismatch(ctx: &TypeContext<'_>) -> ModelgenError {
  ModelgenError::unsupported("python", "a model whose kind does not match its mapping case", &ctx.model.name)
}
