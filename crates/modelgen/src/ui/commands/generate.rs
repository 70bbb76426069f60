use std::path::{Path, PathBuf};

use itertools::Itertools;
use modelgen::{
  GenerationStats, Language, LanguageGenerator, ModelPipeline, OutputModel,
  languages::{python::PythonGenerator, rust::RustGenerator, typescript::TypeScriptGenerator},
};
use num_format::{Locale, ToFormattedString};
use serde_json::{Map, Value};

use crate::{
  ui::GenerateCommand,
  utils::input_file::{InputFile, InputFormat},
};

#[derive(Debug, Clone)]
pub struct GenerateConfig {
  pub input: PathBuf,
  pub language: Language,
  pub output: PathBuf,
  pub model_type: Option<String>,
  pub enum_type: Option<String>,
  pub verbose: bool,
  pub quiet: bool,
}

impl GenerateConfig {
  pub fn from_command(command: GenerateCommand) -> anyhow::Result<Self> {
    let GenerateCommand {
      input,
      language,
      output,
      model_type,
      enum_type,
      verbose,
      quiet,
    } = command;

    if enum_type.is_some() && language != Language::TypeScript {
      anyhow::bail!("--enum-type is only supported for typescript, not {language}");
    }

    Ok(Self {
      input,
      language,
      output,
      model_type,
      enum_type,
      verbose,
      quiet,
    })
  }

  /// Options document for the selected backend, holding only the flags that were given.
  pub fn language_options(&self) -> Value {
    let mut options = Map::new();
    if let Some(model_type) = &self.model_type {
      options.insert("model_type".to_string(), Value::String(model_type.clone()));
    }
    if let Some(enum_type) = &self.enum_type {
      options.insert("enum_type".to_string(), Value::String(enum_type.clone()));
    }
    Value::Object(options)
  }

  pub fn create_generator(&self) -> anyhow::Result<Box<dyn LanguageGenerator>> {
    let options = self.language_options();
    Ok(match self.language {
      Language::TypeScript => Box::new(TypeScriptGenerator::from_json(options)?),
      Language::Rust => Box::new(RustGenerator::from_json(options)?),
      Language::Python => Box::new(PythonGenerator::from_json(options)?),
    })
  }
}

/// Writes each model to `{model_name}.{extension}` under `dir`, creating it when missing.
pub async fn write_models(dir: &Path, language: Language, models: &[OutputModel]) -> anyhow::Result<Vec<PathBuf>> {
  tokio::fs::create_dir_all(dir).await?;
  let mut written = Vec::with_capacity(models.len());
  for model in models {
    let path = dir.join(format!("{}.{}", model.model_name, language.extension()));
    tokio::fs::write(&path, model.complete_source()).await?;
    written.push(path);
  }
  Ok(written)
}

/// One-line account of a run, e.g. `3 models (1 Enum, 2 Object), 0 cycles, 1 warning`.
pub fn summary_line(stats: &GenerationStats) -> String {
  let by_variant = stats
    .models_by_variant
    .iter()
    .map(|(variant, count)| format!("{} {variant}", count.to_formatted_string(&Locale::en)))
    .join(", ");
  let models = stats.models_generated.to_formatted_string(&Locale::en);
  let models = if by_variant.is_empty() {
    format!("{models} models")
  } else {
    format!("{models} models ({by_variant})")
  };
  format!(
    "{models}, {} {}, {} {}",
    stats.cycles_detected,
    plural(stats.cycles_detected, "cycle"),
    stats.warnings.len(),
    plural(stats.warnings.len(), "warning"),
  )
}

fn plural(count: usize, noun: &str) -> String {
  if count == 1 {
    noun.to_string()
  } else {
    format!("{noun}s")
  }
}

struct GenerateLogger<'a> {
  config: &'a GenerateConfig,
}

impl<'a> GenerateLogger<'a> {
  fn new(config: &'a GenerateConfig) -> Self {
    Self { config }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{message}");
    }
  }

  fn log_loading(&self, format: InputFormat) {
    self.info(&format!("Loading {format} document from: {}", self.config.input.display()));
  }

  fn log_generating(&self) {
    self.info(&format!("Generating {} models...", self.config.language));
  }

  fn print_statistics(&self, stats: &GenerationStats) {
    if self.config.quiet {
      return;
    }
    println!("{}", summary_line(stats));

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!("  Cycle {}: {}", i + 1, cycle.join(" -> "));
      }
    }

    for warning in &stats.warnings {
      if warning.is_skipped_item() {
        eprintln!("Skipped: {warning}");
      } else if self.config.verbose {
        eprintln!("Warning: {warning}");
      }
    }
  }

  fn log_written(&self, paths: &[PathBuf]) {
    if self.config.verbose {
      for path in paths {
        self.info(&format!("  wrote {}", path.display()));
      }
    }
    self.info(&format!(
      "Wrote {} file(s) to: {}",
      paths.len(),
      self.config.output.display()
    ));
  }
}

pub async fn generate_code(config: GenerateConfig) -> anyhow::Result<Vec<PathBuf>> {
  let logger = GenerateLogger::new(&config);

  let file = InputFile::open(&config.input).await?;
  logger.log_loading(file.format());
  let input = file.to_raw_input()?;
  let generator = config.create_generator()?;

  logger.log_generating();
  let pipeline = ModelPipeline::default();
  let processed = pipeline.process(input)?;
  let models = pipeline.generate_from(&processed, generator.as_ref())?;
  logger.print_statistics(&processed.stats);

  let paths = write_models(&config.output, config.language, &models).await?;
  logger.log_written(&paths);
  Ok(paths)
}
