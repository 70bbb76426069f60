use std::sync::Arc;

use super::{ConstrainedMetaModel, OriginalInput};

/// Final artifact for one standalone model in one target language.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputModel {
  pub model_name: String,
  /// Rendered source text, without the dependency lines.
  pub result: String,
  /// Import statements the rendered source needs, in first-use order.
  pub dependencies: Vec<String>,
  pub meta_model: Arc<ConstrainedMetaModel>,
  /// Raw schema node this model was interpreted from.
  pub input: OriginalInput,
}

impl OutputModel {
  /// Dependencies followed by the rendered source, ready to be written to a file.
  pub fn complete_source(&self) -> String {
    if self.dependencies.is_empty() {
      return format!("{}\n", self.result);
    }
    format!("{}\n\n{}\n", self.dependencies.join("\n"), self.result)
  }
}
