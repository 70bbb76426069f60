use std::path::Path;

use modelgen::{ModelPipeline, ProcessedModels};

use crate::utils::input_file::InputFile;

/// One row per standalone model: name, variant and the JSON pointer it came from.
pub fn describe_models(processed: &ProcessedModels) -> Vec<String> {
  let width = processed
    .models
    .iter()
    .map(|entry| entry.model.name.len())
    .max()
    .unwrap_or_default();
  processed
    .models
    .iter()
    .map(|entry| {
      format!(
        "{:<width$}  {:<10}  #{}",
        entry.model.name,
        entry.model.kind.variant().to_string(),
        entry.model.original.pointer(),
      )
    })
    .collect()
}

pub async fn inspect_models(input: &Path) -> anyhow::Result<()> {
  let raw = InputFile::open(input).await?.to_raw_input()?;
  let processed = ModelPipeline::default().process(raw)?;

  println!("{} document, {} model(s)", processed.dialect, processed.models.len());
  for row in describe_models(&processed) {
    println!("  {row}");
  }
  Ok(())
}
