use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use modelgen::Language;

#[derive(Parser, Debug)]
#[command(name = "modelgen")]
#[command(author, version, about = "Schema to data model generator")]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// Generate model sources for one target language
  Generate(GenerateCommand),
  /// List the models a document splits into, without rendering them
  Inspect {
    /// Path to the schema document (JSON, or YAML by extension)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}

#[derive(Args, Debug, Clone)]
pub struct GenerateCommand {
  /// Path to the schema document (JSON, or YAML by extension)
  #[arg(short, long, value_name = "FILE")]
  pub input: PathBuf,

  /// Target language: typescript, rust or python
  #[arg(short, long, value_name = "LANGUAGE")]
  pub language: Language,

  /// Directory that receives one file per model
  #[arg(short, long, value_name = "DIR")]
  pub output: PathBuf,

  /// Model shape, e.g. interface for TypeScript or dataclass for Python
  #[arg(long, value_name = "TYPE")]
  pub model_type: Option<String>,

  /// Enum rendering (TypeScript only): enum or union
  #[arg(long, value_name = "TYPE")]
  pub enum_type: Option<String>,

  /// Enable verbose output with pipeline diagnostics
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}
