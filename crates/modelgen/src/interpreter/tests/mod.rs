mod interpret;

use serde_json::Value;

use super::{InterpreterOptions, ModelSplitter, ProcessedInput, SplitOptions};
use crate::{
  diagnostics::NoopDiagnostics,
  input::{InputProcessor, RawInput},
  models::{CommonModel, ModelId},
};

pub(super) fn process(document: Value) -> ProcessedInput {
  process_with(document, &InterpreterOptions::default())
}

pub(super) fn process_with(document: Value, options: &InterpreterOptions) -> ProcessedInput {
  InputProcessor::default()
    .process(RawInput::Value(document), options, &NoopDiagnostics)
    .expect("document should interpret")
}

pub(super) fn root(input: &ProcessedInput) -> &CommonModel {
  input.arena.get(input.roots[0])
}

pub(super) fn child<'a>(input: &'a ProcessedInput, id: ModelId) -> &'a CommonModel {
  input.arena.get(id)
}

pub(super) fn split(input: &mut ProcessedInput, options: SplitOptions) -> Vec<ModelId> {
  let roots = input.roots.clone();
  ModelSplitter::new(options, &NoopDiagnostics).split(&mut input.arena, &roots, &mut input.warnings)
}
