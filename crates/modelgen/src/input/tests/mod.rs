
use serde_json::Value;

use super::{InputProcessor, NormalizedDocument, RawInput};

pub(super) fn normalize(document: Value) -> NormalizedDocument {
  InputProcessor::default()
    .normalize(RawInput::Value(document))
    .expect("document should normalize")
}

pub(super) fn root_names(normalized: &NormalizedDocument) -> Vec<&str> {
  normalized.roots.iter().map(|root| root.name.as_str()).collect()
}
