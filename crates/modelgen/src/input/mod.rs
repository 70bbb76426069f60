//! Input processors: turn a parsed document of some schema dialect into named root schemas.
//!
//! Each dialect is handled by a [`SchemaNormalizer`]. The [`InputProcessor`] picks the first
//! normalizer that claims the document, reflects inferred names onto every schema location
//! and hands the result to the [`Interpreter`](crate::interpreter::Interpreter).

mod asyncapi;
mod avro;
mod json_schema;
mod names;
mod openapi;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use percent_encoding::percent_decode_str;
use serde_json::Value;
use strum::Display;

pub use asyncapi::AsyncApiNormalizer;
pub use avro::AvroNormalizer;
pub use json_schema::JsonSchemaNormalizer;
pub use names::{NameIndex, reflect_names};
pub use openapi::{OpenApiNormalizer, SwaggerNormalizer};

use crate::{
  diagnostics::Diagnostics,
  error::{ModelgenError, Result},
  interpreter::{Interpreter, InterpreterOptions, ProcessedInput},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Dialect {
  #[strum(to_string = "JSON Schema")]
  JsonSchema,
  #[strum(to_string = "OpenAPI")]
  OpenApi,
  #[strum(to_string = "Swagger")]
  Swagger,
  #[strum(to_string = "AsyncAPI")]
  AsyncApi,
  #[strum(to_string = "Avro")]
  Avro,
}

/// Document handed to the pipeline, either already parsed or as text.
#[derive(Debug, Clone)]
pub enum RawInput {
  Value(Value),
  Json(String),
  Yaml(String),
  /// Text of unknown format: JSON is tried first, then YAML.
  Text(String),
}

impl RawInput {
  pub fn json(text: impl Into<String>) -> Self {
    Self::Json(text.into())
  }

  pub fn yaml(text: impl Into<String>) -> Self {
    Self::Yaml(text.into())
  }

  pub fn text(text: impl Into<String>) -> Self {
    Self::Text(text.into())
  }

  pub fn into_value(self) -> Result<Value> {
    match self {
      Self::Value(value) => Ok(value),
      Self::Json(text) => parse_json(&text),
      Self::Yaml(text) => parse_yaml(&text),
      Self::Text(text) => {
        reject_foreign_text(&text)?;
        parse_json(&text).or_else(|_| parse_yaml(&text))
      }
    }
  }
}

impl From<Value> for RawInput {
  fn from(value: Value) -> Self {
    Self::Value(value)
  }
}

fn parse_json(text: &str) -> Result<Value> {
  reject_foreign_text(text)?;
  serde_json::from_str(text).map_err(|e| ModelgenError::input_format(format!("malformed JSON: {e}")))
}

fn parse_yaml(text: &str) -> Result<Value> {
  reject_foreign_text(text)?;
  serde_yaml::from_str(text).map_err(|e| ModelgenError::input_format(format!("malformed YAML: {e}")))
}

fn reject_foreign_text(text: &str) -> Result<()> {
  let trimmed = text.trim_start();
  if trimmed.starts_with("<?xml") || trimmed.starts_with("<xs:schema") {
    return Err(ModelgenError::input_format(
      "XSD documents need an external parser and are not supported",
    ));
  }
  Ok(())
}

/// A schema location that becomes a standalone model on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootSchema {
  /// JSON pointer into [`NormalizedDocument::document`].
  pub pointer: String,
  pub name: String,
}

impl RootSchema {
  pub fn new(pointer: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      pointer: pointer.into(),
      name: name.into(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct NormalizedDocument {
  pub dialect: Dialect,
  /// JSON Schema view of the input; pointers in `roots` refer into it.
  pub document: Arc<Value>,
  pub roots: Vec<RootSchema>,
}

/// Adapter for one input dialect.
pub trait SchemaNormalizer: Send + Sync {
  fn dialect(&self) -> Dialect;

  /// Whether the document carries this dialect's marker.
  fn should_process(&self, input: &Value) -> bool;

  /// Fails with [`ModelgenError::InputFormat`] when the marker names an unsupported version.
  fn normalize(&self, input: Value) -> Result<NormalizedDocument>;
}

/// Dispatches a document to the first normalizer that claims it.
pub struct InputProcessor {
  normalizers: Vec<Box<dyn SchemaNormalizer>>,
}

impl Default for InputProcessor {
  fn default() -> Self {
    Self {
      normalizers: vec![
        Box::new(AsyncApiNormalizer),
        Box::new(OpenApiNormalizer),
        Box::new(SwaggerNormalizer),
        Box::new(AvroNormalizer),
        Box::new(JsonSchemaNormalizer),
      ],
    }
  }
}

impl InputProcessor {
  pub fn new(normalizers: Vec<Box<dyn SchemaNormalizer>>) -> Self {
    Self { normalizers }
  }

  /// Adds a normalizer that is consulted before the built-in ones.
  #[must_use]
  pub fn with_normalizer(mut self, normalizer: Box<dyn SchemaNormalizer>) -> Self {
    self.normalizers.insert(0, normalizer);
    self
  }

  pub fn normalize(&self, input: RawInput) -> Result<NormalizedDocument> {
    let value = input.into_value()?;
    if let Some(object) = value.as_object()
      && object.contains_key("typescript")
    {
      return Err(ModelgenError::input_format(
        "TypeScript declarations need an external parser and are not supported",
      ));
    }
    if !(value.is_object() || value.is_boolean()) {
      return Err(ModelgenError::input_format(
        "expected a JSON object or boolean schema at the document root",
      ));
    }

    let normalizer = self
      .normalizers
      .iter()
      .find(|normalizer| normalizer.should_process(&value))
      .ok_or_else(|| ModelgenError::input_format("no input processor recognizes the document"))?;
    normalizer.normalize(value)
  }

  /// Normalizes the document and interprets every root schema it declares.
  pub fn process(
    &self,
    input: RawInput,
    options: &InterpreterOptions,
    diagnostics: &dyn Diagnostics,
  ) -> Result<ProcessedInput> {
    let normalized = self.normalize(input)?;
    diagnostics.debug(&format!(
      "processing {} document with {} root schema(s)",
      normalized.dialect,
      normalized.roots.len()
    ));
    Interpreter::interpret_document(normalized, options, diagnostics)
  }
}

/// Percent-decodes and unescapes one JSON pointer segment.
pub(crate) fn unescape_pointer_segment(segment: &str) -> String {
  percent_decode_str(segment).decode_utf8_lossy().replace("~1", "/").replace("~0", "~")
}

pub(crate) fn escape_pointer_segment(segment: &str) -> String {
  segment.replace('~', "~0").replace('/', "~1")
}

pub(crate) fn child_pointer(parent: &str, segments: &[&str]) -> String {
  let mut pointer = parent.to_string();
  for segment in segments {
    pointer.push('/');
    pointer.push_str(&escape_pointer_segment(segment));
  }
  pointer
}
