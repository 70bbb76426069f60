use std::{fmt, sync::Arc};

use serde_json::Value;

static NULL: Value = Value::Null;

/// Read-only handle on the raw schema node a model was interpreted from.
///
/// The processed document is shared; the handle only stores the JSON pointer of the node,
/// so cloning it is cheap and nothing can mutate the input afterwards.
#[derive(Clone)]
pub struct OriginalInput {
  document: Arc<Value>,
  pointer: Arc<str>,
}

impl OriginalInput {
  pub fn new(document: Arc<Value>, pointer: impl Into<Arc<str>>) -> Self {
    Self {
      document,
      pointer: pointer.into(),
    }
  }

  /// Handle for models that were synthesized by the pipeline instead of read from a document.
  pub fn detached() -> Self {
    Self::new(Arc::new(Value::Null), "")
  }

  pub fn value(&self) -> &Value {
    self.document.pointer(&self.pointer).unwrap_or(&NULL)
  }

  /// JSON pointer of the node inside the processed document (`""` is the document root).
  pub fn pointer(&self) -> &str {
    &self.pointer
  }

  /// Looks up a keyword on the raw node, typically a vendor extension such as `x-custom-type`.
  pub fn lookup_extension(&self, key: &str) -> Option<&Value> {
    self.value().as_object().and_then(|object| object.get(key))
  }

  pub fn lookup_extension_str(&self, key: &str) -> Option<&str> {
    self.lookup_extension(key).and_then(Value::as_str)
  }

  pub fn description(&self) -> Option<&str> {
    self.lookup_extension_str("description")
  }
}

impl PartialEq for OriginalInput {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.document, &other.document) && self.pointer == other.pointer
  }
}

impl fmt::Debug for OriginalInput {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_tuple("OriginalInput").field(&self.pointer).finish()
  }
}
