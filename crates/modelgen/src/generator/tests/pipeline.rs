use std::sync::Arc;

use serde_json::json;

use super::{collecting, two_node_cycle};
use crate::{
  diagnostics::{self, CollectingDiagnostics, DiagnosticLevel},
  error::ModelgenError,
  generator::{GenerationWarning, ModelPipeline},
  input::{Dialect, RawInput},
  interpreter::InterpreterOptions,
  languages::typescript::TypeScriptGenerator,
  models::Variant,
};

#[test]
fn test_stats_count_models_by_variant() {
  let processed = ModelPipeline::default()
    .process(RawInput::Value(json!({
      "type": "object",
      "properties": {
        "address": { "type": "object", "properties": { "street": { "type": "string" } } },
        "status": { "enum": ["on", "off"] }
      }
    })))
    .expect("document should process");
  assert_eq!(processed.dialect, Dialect::JsonSchema);
  assert_eq!(processed.stats.models_generated, 3);
  assert_eq!(processed.stats.count(Variant::Object), 2);
  assert_eq!(processed.stats.count(Variant::Enum), 1);
  assert_eq!(processed.stats.cycles_detected, 0);
  assert_eq!(processed.models.len(), 3);
}

#[test]
fn test_two_node_cycle_is_detected_and_terminates() {
  let processed = ModelPipeline::default()
    .process(RawInput::Value(two_node_cycle()))
    .expect("cycle should process");
  assert_eq!(processed.models.len(), 2);
  assert_eq!(processed.stats.cycles_detected, 1);
  assert_eq!(processed.stats.cycle_details, vec![vec!["A".to_string(), "B".to_string()]]);
}

#[test]
fn test_self_reference_counts_as_cycle() {
  let processed = ModelPipeline::default()
    .process(RawInput::Value(json!({
      "type": "object",
      "properties": { "children": { "type": "array", "items": { "$ref": "#" } } }
    })))
    .expect("document should process");
  assert_eq!(processed.models.len(), 1);
  assert_eq!(processed.stats.cycles_detected, 1);
}

#[test]
fn test_duplicate_ids_surface_as_warnings() {
  let processed = ModelPipeline::default()
    .process(RawInput::Value(json!({
      "type": "object",
      "properties": {
        "one": { "$id": "Shared", "type": "object" },
        "two": { "$id": "Shared", "type": "object" }
      }
    })))
    .expect("document should process");
  assert!(
    processed
      .stats
      .warnings
      .iter()
      .any(|warning| matches!(warning, GenerationWarning::DuplicateSchemaId { .. }))
  );
}

#[test]
fn test_injected_sink_receives_messages() {
  let (sink, shared) = collecting();
  let pipeline = ModelPipeline::builder().diagnostics(shared).build();
  pipeline
    .generate(RawInput::Value(json!({ "type": "string" })), &TypeScriptGenerator::default())
    .expect("document should render");

  let info = sink.at_level(DiagnosticLevel::Info);
  assert_eq!(info, vec!["processed JSON Schema document into 1 model(s)".to_string()]);
  assert!(
    sink
      .at_level(DiagnosticLevel::Debug)
      .iter()
      .any(|message| message == "typescript produced 1 model(s)")
  );
}

#[test]
fn test_injected_sink_takes_precedence_over_installed_default() {
  let installed = Arc::new(CollectingDiagnostics::default());
  diagnostics::install(installed.clone());

  let (sink, shared) = collecting();
  let result = ModelPipeline::builder().diagnostics(shared).build().process(RawInput::Value(json!({
    "title": "PrecedenceProbe",
    "type": "object",
    "properties": { "next": { "$ref": "#" } }
  })));
  diagnostics::reset();
  result.expect("document should process");

  let probe = "reference cycle between models: PrecedenceProbe";
  assert!(sink.at_level(DiagnosticLevel::Debug).iter().any(|message| message == probe));
  assert!(installed.messages().iter().all(|(_, message)| message != probe));
}

#[test]
fn test_processed_models_are_reused_across_generators() {
  let pipeline = ModelPipeline::builder()
    .options(InterpreterOptions::builder().allow_inline_enums(true).build())
    .build();
  let processed = pipeline
    .process(RawInput::json(
      r#"{ "type": "object", "properties": { "mode": { "enum": ["a", "b"] } } }"#,
    ))
    .expect("document should process");
  assert_eq!(processed.models.len(), 1);

  let first = pipeline
    .generate_from(&processed, &TypeScriptGenerator::default())
    .expect("first render");
  let second = pipeline
    .generate_from(&processed, &TypeScriptGenerator::default())
    .expect("second render");
  assert_eq!(first, second);
}

#[test]
fn test_malformed_text_is_an_input_error() {
  let err = ModelPipeline::default()
    .process(RawInput::json("{ not json"))
    .unwrap_err();
  assert!(matches!(err, ModelgenError::InputFormat(_)));
}

#[test]
fn test_missing_reference_is_a_resolution_error() {
  let err = ModelPipeline::default()
    .process(RawInput::Value(json!({ "$ref": "#/definitions/Missing" })))
    .unwrap_err();
  assert!(matches!(err, ModelgenError::ReferenceResolution { .. }));
}
