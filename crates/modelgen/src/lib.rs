//! Data model generation from JSON Schema, OpenAPI, Swagger, AsyncAPI and Avro documents.
//!
//! A document flows through the same stages for every target language:
//!
//! 1. [`input`] detects the dialect and finds the root schemas;
//! 2. [`interpreter`] builds [`CommonModel`](models::CommonModel) nodes and splits out the
//!    ones that stand on their own;
//! 3. [`converter`] maps them onto the closed [`MetaModel`](models::MetaModel) variants;
//! 4. each backend in [`languages`] constrains names and types, then renders through the
//!    [`renderer`] preset chain.
//!
//! ```no_run
//! use modelgen::{ModelPipeline, RawInput, languages::typescript::TypeScriptGenerator};
//!
//! # fn example() -> modelgen::Result<()> {
//! let models = ModelPipeline::default().generate(
//!   RawInput::json(r#"{ "type": "object", "properties": { "email": { "type": "string" } } }"#),
//!   &TypeScriptGenerator::default(),
//! )?;
//! assert_eq!(models[0].model_name, "Root");
//! # Ok(())
//! # }
//! ```

#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]

pub mod constrainer;
pub mod converter;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod input;
pub mod interpreter;
pub mod languages;
pub mod models;
pub mod naming;
pub mod renderer;

pub use error::{ModelgenError, Result};
pub use generator::{
  GenerationStats, GenerationWarning, LanguageGenerator, LanguageOutput, ModelPipeline, Orchestrator, ProcessedModels,
};
pub use input::{Dialect, RawInput};
pub use languages::Language;
pub use models::OutputModel;
