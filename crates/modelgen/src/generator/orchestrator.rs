//! Runs one [`ModelPipeline`] pass and fans the result out to several languages.
//!
//! ```no_run
//! use modelgen::{
//!   Orchestrator, RawInput,
//!   languages::{python::PythonGenerator, typescript::TypeScriptGenerator},
//! };
//!
//! # fn example() -> modelgen::Result<()> {
//! let orchestrator = Orchestrator::default()
//!   .with_generator(TypeScriptGenerator::default())
//!   .with_generator(PythonGenerator::default());
//! let (outputs, stats) = orchestrator.generate(RawInput::json(r#"{ "type": "object" }"#))?;
//! for output in outputs {
//!   println!("{}: {:?}", output.language, output.result.map(|models| models.len()));
//! }
//! println!("{} models, {} warnings", stats.models_generated, stats.warnings.len());
//! # Ok(())
//! # }
//! ```

use std::thread;

use super::{GenerationStats, LanguageGenerator, ModelPipeline};
use crate::{
  error::{ModelgenError, Result},
  input::RawInput,
  languages::Language,
  models::OutputModel,
};

/// Outcome of one language. A failed language leaves the others untouched.
#[derive(Debug)]
pub struct LanguageOutput {
  pub language: Language,
  pub result: Result<Vec<OutputModel>>,
}

#[derive(Default)]
pub struct Orchestrator {
  pipeline: ModelPipeline,
  generators: Vec<Box<dyn LanguageGenerator>>,
}

impl Orchestrator {
  pub fn new(pipeline: ModelPipeline) -> Self {
    Self {
      pipeline,
      generators: Vec::new(),
    }
  }

  #[must_use]
  pub fn with_generator(mut self, generator: impl LanguageGenerator + 'static) -> Self {
    self.generators.push(Box::new(generator));
    self
  }

  pub fn languages(&self) -> Vec<Language> {
    self.generators.iter().map(|generator| generator.language()).collect()
  }

  /// Processes `input` once, then runs every language on its own thread.
  ///
  /// Outputs follow the order in which generators were added.
  ///
  /// # Errors
  ///
  /// Only failures of the shared pass are returned here; language failures are reported
  /// per [`LanguageOutput`].
  pub fn generate(&self, input: RawInput) -> Result<(Vec<LanguageOutput>, GenerationStats)> {
    let processed = self.pipeline.process(input)?;
    let models = &processed.models;

    let outputs = thread::scope(|scope| {
      let handles: Vec<_> = self
        .generators
        .iter()
        .map(|generator| (generator.language(), scope.spawn(move || generator.generate(models))))
        .collect();
      handles
        .into_iter()
        .map(|(language, handle)| LanguageOutput {
          language,
          result: handle.join().unwrap_or_else(|_| {
            Err(ModelgenError::unsupported(
              language.into(),
              "this document (the backend panicked)",
              "",
            ))
          }),
        })
        .collect::<Vec<_>>()
    });

    let sink = self.pipeline.sink();
    for output in &outputs {
      if let Err(err) = &output.result {
        sink.warn(&format!("{} generation failed: {err}", output.language));
      }
    }

    Ok((outputs, processed.stats))
  }
}
