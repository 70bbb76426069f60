mod constraints;

use serde_json::Value;

use super::{Constraints, MappedType, TypeMapping};
use crate::{
  converter::convert_models,
  diagnostics::NoopDiagnostics,
  input::{InputProcessor, RawInput},
  interpreter::{InterpreterOptions, ModelSplitter, SplitOptions},
  models::{ConstrainedKind, MetaModelSet, Variant},
  naming::{DedupStrategy, NamingCase, NamingPipeline, ReservedWords},
};

pub(super) fn meta_models(document: Value) -> MetaModelSet {
  let mut input = InputProcessor::default()
    .process(RawInput::Value(document), &InterpreterOptions::default(), &NoopDiagnostics)
    .expect("document should interpret");
  let roots = input.roots.clone();
  let standalone =
    ModelSplitter::new(SplitOptions::default(), &NoopDiagnostics).split(&mut input.arena, &roots, &mut input.warnings);
  convert_models(&input.arena, &standalone).expect("models should convert")
}

pub(super) fn test_constraints() -> Constraints {
  Constraints::new(
    NamingPipeline::builder()
      .exclude(vec![' ', '_'])
      .reserved(ReservedWords::new(["return", "class"], true))
      .build(),
    NamingPipeline::builder()
      .exclude(vec![' ', '_'])
      .case(NamingCase::Camel)
      .reserved(ReservedWords::new(["return", "class"], true))
      .dedup(DedupStrategy::NumericSuffix {
        separator: "_".to_string(),
        start: 1,
      })
      .build(),
    NamingPipeline::builder()
      .exclude(vec![' ', '_'])
      .case(NamingCase::Constant)
      .build(),
  )
}

/// Spells every variant the way a small structural language would.
pub(super) fn test_mapping() -> TypeMapping {
  TypeMapping::empty()
    .with(Variant::Object, |ctx| Ok(MappedType::new(&ctx.model.name)))
    .with(Variant::Enum, |ctx| Ok(MappedType::new(&ctx.model.name)))
    .with(Variant::Array, |ctx| {
      let ConstrainedKind::Array(item) = &ctx.model.kind else {
        unreachable!()
      };
      Ok(MappedType::new(format!("list<{}>", item.type_name)))
    })
    .with(Variant::Tuple, |_| Ok("tuple".into()))
    .with(Variant::Union, |ctx| {
      let ConstrainedKind::Union(members) = &ctx.model.kind else {
        unreachable!()
      };
      let names: Vec<_> = members.iter().map(|member| member.type_name.as_str()).collect();
      Ok(MappedType::new(names.join(" | ")))
    })
    .with(Variant::Dictionary, |ctx| {
      let ConstrainedKind::Dictionary { key, value } = &ctx.model.kind else {
        unreachable!()
      };
      Ok(MappedType::new(format!("map<{}, {}>", key.type_name, value.type_name)))
    })
    .with(Variant::Reference, |ctx| {
      let ConstrainedKind::Reference(reference) = &ctx.model.kind else {
        unreachable!()
      };
      let mapped = MappedType::new(&reference.target_name);
      if reference.target_name == ctx.owner {
        return Ok(mapped);
      }
      Ok(mapped.with_dependency(format!("use {}", reference.target_name)))
    })
    .with(Variant::String, |_| Ok("str".into()))
    .with(Variant::Float, |_| Ok("float".into()))
    .with(Variant::Integer, |_| Ok("int".into()))
    .with(Variant::Boolean, |_| Ok("bool".into()))
    .with(Variant::Any, |_| Ok("any".into()))
}
