//! Target-language backends. Each one bundles naming constraints, a type mapping and a
//! default preset, and is configured through a serde-loadable options struct.

pub mod python;
pub mod rust;
pub mod typescript;

#[cfg(test)]
mod tests;

use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::{ModelgenError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, IntoStaticStr, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Language {
  TypeScript,
  Rust,
  Python,
}

impl Language {
  /// File extension of generated sources, without the dot.
  pub fn extension(self) -> &'static str {
    match self {
      Self::TypeScript => "ts",
      Self::Rust => "rs",
      Self::Python => "py",
    }
  }
}

/// Deserializes a language options document, rejecting unknown keys.
pub fn options_from_json<T: DeserializeOwned>(value: Value) -> Result<T> {
  serde_json::from_value(value).map_err(|err| ModelgenError::InvalidOptions(err.to_string()))
}
