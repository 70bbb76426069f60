//! Runs the shared model pipeline once and hands the result to one or more language backends.

pub mod metrics;
mod model_graph;
pub mod orchestrator;
pub mod pipeline;

#[cfg(test)]
mod tests;

use std::sync::Arc;

pub use metrics::{GenerationStats, GenerationWarning};
pub use orchestrator::{LanguageOutput, Orchestrator};
pub use pipeline::{ModelPipeline, ProcessedModels};

use crate::{
  constrainer::{Constraints, TypeMapping, constrain_models},
  error::Result,
  languages::Language,
  models::{MetaModelSet, OutputModel},
  renderer::{PresetChain, RenderScope},
};

/// The per-language half of the pipeline: constrain, then render.
pub trait LanguageGenerator: Send + Sync {
  fn language(&self) -> Language;

  /// Produces one [`OutputModel`] per standalone model, in the set's order.
  fn generate(&self, models: &MetaModelSet) -> Result<Vec<OutputModel>>;
}

/// Constrains `models` for `language` and renders each one through `presets`.
pub fn render_models(
  language: Language,
  constraints: &Constraints,
  mapping: &TypeMapping,
  presets: &PresetChain,
  models: &MetaModelSet,
) -> Result<Vec<OutputModel>> {
  let name: &'static str = language.into();
  constrain_models(name, constraints, mapping, models)?
    .into_iter()
    .map(|model| {
      let model = Arc::new(model);
      let scope = RenderScope::new(name, presets, &model);
      let result = scope.render_model()?;
      let dependencies = scope.into_dependencies();
      Ok(OutputModel {
        model_name: model.name.clone(),
        result,
        dependencies,
        input: model.original.clone(),
        meta_model: model,
      })
    })
    .collect()
}
