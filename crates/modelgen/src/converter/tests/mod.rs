mod conversions;

use serde_json::Value;

use super::convert_models;
use crate::{
  diagnostics::NoopDiagnostics,
  input::{InputProcessor, RawInput},
  interpreter::{InterpreterOptions, ModelSplitter, SplitOptions},
  models::MetaModelSet,
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
