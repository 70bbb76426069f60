mod generate;

use std::path::{Path, PathBuf};

use modelgen::Language;

use crate::ui::commands::GenerateConfig;

pub(super) const PETSTORE: &str = include_str!("../../../../fixtures/petstore.json");
pub(super) const SIGNUP: &str = include_str!("../../../../fixtures/signup.yaml");

/// Copies `content` into `dir` under `name` and returns its path.
pub(super) async fn fixture_file(dir: &Path, name: &str, content: &str) -> PathBuf {
  let path = dir.join(name);
  tokio::fs::write(&path, content).await.expect("fixture should be written");
  path
}

pub(super) fn quiet_config(input: PathBuf, language: Language, output: PathBuf) -> GenerateConfig {
  GenerateConfig {
    input,
    language,
    output,
    model_type: None,
    enum_type: None,
    verbose: false,
    quiet: true,
  }
}
