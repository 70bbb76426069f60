use std::sync::Arc;

use bon::Builder;
use serde_json::Value;

use super::{GenerationStats, LanguageGenerator, model_graph::ModelGraph};
use crate::{
  converter::convert_models,
  diagnostics::{self, Diagnostics},
  error::Result,
  input::{Dialect, InputProcessor, RawInput},
  interpreter::{InterpreterOptions, ModelSplitter, SplitOptions},
  models::{MetaModelSet, OutputModel},
};

/// Language-independent result of one input document.
#[derive(Debug, Clone)]
pub struct ProcessedModels {
  pub dialect: Dialect,
  pub document: Arc<Value>,
  /// Standalone models in promotion order, root first.
  pub models: Arc<MetaModelSet>,
  pub stats: GenerationStats,
}

/// Normalize, interpret, split and convert, in that order.
///
/// ```no_run
/// use modelgen::{ModelPipeline, RawInput, languages::typescript::TypeScriptGenerator};
///
/// # fn example() -> modelgen::Result<()> {
/// let pipeline = ModelPipeline::builder().build();
/// let processed = pipeline.process(RawInput::json(r#"{ "type": "object" }"#))?;
/// let outputs = pipeline.generate_from(&processed, &TypeScriptGenerator::default())?;
/// println!("{}", outputs[0].result);
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct ModelPipeline {
  #[builder(default)]
  processor: InputProcessor,
  #[builder(default)]
  options: InterpreterOptions,
  /// Overrides the process-wide sink for this pipeline only.
  diagnostics: Option<Arc<dyn Diagnostics>>,
}

impl Default for ModelPipeline {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl ModelPipeline {
  pub fn options(&self) -> &InterpreterOptions {
    &self.options
  }

  pub(crate) fn sink(&self) -> Arc<dyn Diagnostics> {
    self.diagnostics.clone().unwrap_or_else(diagnostics::current)
  }

  /// Runs the shared half of the pipeline.
  ///
  /// # Errors
  ///
  /// Fails when the document is not recognized, when a reference cannot be resolved, or when
  /// conversion meets a cycle that was not split.
  pub fn process(&self, input: RawInput) -> Result<ProcessedModels> {
    let sink = self.sink();
    let mut processed = self.processor.process(input, &self.options, sink.as_ref())?;

    let splitter = ModelSplitter::new(SplitOptions::from(&self.options), sink.as_ref());
    let standalone = splitter.split(&mut processed.arena, &processed.roots, &mut processed.warnings);
    let models = convert_models(&processed.arena, &standalone)?;

    let mut stats = GenerationStats::default();
    stats.record_models(&models);
    let cycles = ModelGraph::new(&models).detect_cycles();
    for cycle in &cycles {
      sink.debug(&format!("reference cycle between models: {}", cycle.join(" -> ")));
    }
    stats.record_cycles(cycles);
    stats.record_warnings(processed.warnings);
    sink.info(&format!(
      "processed {} document into {} model(s)",
      processed.dialect, stats.models_generated
    ));

    Ok(ProcessedModels {
      dialect: processed.dialect,
      document: processed.document,
      models: Arc::new(models),
      stats,
    })
  }

  /// Processes `input` and renders it with `generator`.
  pub fn generate(&self, input: RawInput, generator: &dyn LanguageGenerator) -> Result<Vec<OutputModel>> {
    let processed = self.process(input)?;
    self.generate_from(&processed, generator)
  }

  /// Renders models that were already processed, so several languages can share one pass.
  pub fn generate_from(&self, processed: &ProcessedModels, generator: &dyn LanguageGenerator) -> Result<Vec<OutputModel>> {
    let outputs = generator.generate(&processed.models)?;
    self
      .sink()
      .debug(&format!("{} produced {} model(s)", generator.language(), outputs.len()));
    Ok(outputs)
  }
}
