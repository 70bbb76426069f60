use thiserror::Error;

/// Fatal failures surfaced by the model pipeline.
#[derive(Debug, Error)]
pub enum ModelgenError {
  /// No input processor recognizes the document, or its dialect marker is unsupported.
  #[error("invalid input: {0}")]
  InputFormat(String),

  /// A `$ref` could not be located inside the document.
  #[error("cannot resolve reference '{reference}' (at {location})")]
  ReferenceResolution { reference: String, location: String },

  /// A language backend has no way of expressing a construct present in the model set.
  #[error("{language} cannot express {construct} (model '{model}')")]
  UnsupportedConstruct {
    language: String,
    construct: String,
    model: String,
  },

  /// De-duplication ran out of attempts for an identifier.
  #[error("could not derive a unique name for '{name}' after {attempts} attempts")]
  NamingExhaustion { name: String, attempts: usize },

  /// An options document could not be deserialized.
  #[error("invalid options: {0}")]
  InvalidOptions(String),
}

impl ModelgenError {
  pub(crate) fn input_format(message: impl Into<String>) -> Self {
    Self::InputFormat(message.into())
  }

  pub(crate) fn unsupported(language: &str, construct: impl Into<String>, model: &str) -> Self {
    Self::UnsupportedConstruct {
      language: language.to_string(),
      construct: construct.into(),
      model: model.to_string(),
    }
  }
}

pub type Result<T, E = ModelgenError> = std::result::Result<T, E>;
