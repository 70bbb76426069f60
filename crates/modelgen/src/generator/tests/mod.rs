mod pipeline;

use std::sync::Arc;

use serde_json::{Value, json};

use crate::diagnostics::{CollectingDiagnostics, Diagnostics};

pub(super) fn two_node_cycle() -> Value {
  json!({
    "$ref": "#/definitions/A",
    "definitions": {
      "A": { "type": "object", "properties": { "b": { "$ref": "#/definitions/B" } } },
      "B": { "type": "object", "properties": { "a": { "$ref": "#/definitions/A" } } }
    }
  })
}

pub(super) fn collecting() -> (Arc<CollectingDiagnostics>, Arc<dyn Diagnostics>) {
  let sink = Arc::new(CollectingDiagnostics::default());
  let shared: Arc<dyn Diagnostics> = sink.clone();
  (sink, shared)
}
