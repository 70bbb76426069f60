use std::sync::Arc;

use serde_json::Value;

use super::{Dialect, NormalizedDocument, RootSchema, SchemaNormalizer};
use crate::error::{ModelgenError, Result};

const SUPPORTED_DRAFTS: [&str; 3] = ["draft-04", "draft-06", "draft-07"];

/// JSON Schema draft 4, 6 and 7 documents.
///
/// Claims every object without another dialect's marker, so it must be consulted last.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonSchemaNormalizer;

impl JsonSchemaNormalizer {
  pub fn is_supported_schema_uri(uri: &str) -> bool {
    let trimmed = uri.trim_end_matches('#').trim_end_matches('/');
    let Some(rest) = trimmed
      .strip_prefix("http://json-schema.org/")
      .or_else(|| trimmed.strip_prefix("https://json-schema.org/"))
    else {
      return false;
    };
    SUPPORTED_DRAFTS
      .iter()
      .any(|draft| rest == format!("{draft}/schema"))
  }
}

impl SchemaNormalizer for JsonSchemaNormalizer {
  fn dialect(&self) -> Dialect {
    Dialect::JsonSchema
  }

  fn should_process(&self, input: &Value) -> bool {
    input.is_boolean() || input.is_object()
  }

  fn normalize(&self, input: Value) -> Result<NormalizedDocument> {
    if let Some(uri) = input.get("$schema") {
      let supported = uri.as_str().is_some_and(Self::is_supported_schema_uri);
      if !supported {
        return Err(ModelgenError::input_format(format!(
          "unsupported JSON Schema dialect {uri}; expected draft-04, draft-06 or draft-07"
        )));
      }
    }

    Ok(NormalizedDocument {
      dialect: Dialect::JsonSchema,
      document: Arc::new(input),
      roots: vec![RootSchema::new("", "root")],
    })
  }
}
