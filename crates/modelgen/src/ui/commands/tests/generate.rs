use modelgen::{GenerationStats, GenerationWarning, Language};
use serde_json::json;

use super::{PETSTORE, SIGNUP, fixture_file, quiet_config};
use crate::ui::{
  GenerateCommand,
  commands::{GenerateConfig, generate::summary_line, generate_code},
};

fn command(language: Language) -> GenerateCommand {
  GenerateCommand {
    input: "schema.json".into(),
    language,
    output: "out".into(),
    model_type: None,
    enum_type: None,
    verbose: false,
    quiet: false,
  }
}

#[test]
fn test_options_hold_only_given_flags() {
  let config = GenerateConfig::from_command(command(Language::TypeScript)).expect("valid command");
  assert_eq!(config.language_options(), json!({}));

  let config = GenerateConfig::from_command(GenerateCommand {
    model_type: Some("interface".to_string()),
    enum_type: Some("union".to_string()),
    ..command(Language::TypeScript)
  })
  .expect("valid command");
  assert_eq!(
    config.language_options(),
    json!({ "model_type": "interface", "enum_type": "union" })
  );
}

#[test]
fn test_enum_type_is_typescript_only() {
  let err = GenerateConfig::from_command(GenerateCommand {
    enum_type: Some("union".to_string()),
    ..command(Language::Python)
  })
  .unwrap_err();
  assert!(err.to_string().contains("--enum-type"));
}

#[test]
fn test_unknown_model_type_is_rejected() {
  let config = GenerateConfig::from_command(GenerateCommand {
    model_type: Some("record".to_string()),
    ..command(Language::Rust)
  })
  .expect("flags parse before the backend sees them");
  assert!(config.create_generator().is_err());
}

#[test]
fn test_summary_line() {
  let mut stats = GenerationStats::default();
  assert_eq!(summary_line(&stats), "0 models, 0 cycles, 0 warnings");

  stats.models_by_variant.insert("Object".to_string(), 1_200);
  stats.models_by_variant.insert("Enum".to_string(), 3);
  stats.models_generated = 1_203;
  stats.record_cycle(vec!["A".to_string(), "B".to_string()]);
  stats.record_warning(GenerationWarning::KeywordIgnored {
    name: "Root".to_string(),
    keyword: "not".to_string(),
  });
  assert_eq!(
    summary_line(&stats),
    "1,203 models (3 Enum, 1,200 Object), 1 cycle, 1 warning"
  );
}

#[tokio::test]
async fn test_typescript_files_per_model() {
  let dir = tempfile::tempdir().expect("temp dir");
  let input = fixture_file(dir.path(), "petstore.json", PETSTORE).await;
  let output = dir.path().join("models");

  let config = GenerateConfig {
    enum_type: Some("union".to_string()),
    ..quiet_config(input, Language::TypeScript, output.clone())
  };
  let written = generate_code(config).await.expect("generation should succeed");
  assert_eq!(written.len(), 4);

  let status = tokio::fs::read_to_string(output.join("Status.ts"))
    .await
    .expect("enum file");
  assert_eq!(status, "export type Status = \"available\" | \"pending\" | \"sold\";\n");

  let pet = tokio::fs::read_to_string(output.join("Pet.ts")).await.expect("pet file");
  assert!(pet.starts_with("import"), "dependencies come first:\n{pet}");
  assert!(pet.contains("export class Pet"));
  assert!(output.join("Owner.ts").exists());
}

#[tokio::test]
async fn test_yaml_input_to_python_dataclass() {
  let dir = tempfile::tempdir().expect("temp dir");
  let input = fixture_file(dir.path(), "signup.yaml", SIGNUP).await;
  let output = dir.path().join("py");

  let config = GenerateConfig {
    model_type: Some("dataclass".to_string()),
    ..quiet_config(input, Language::Python, output.clone())
  };
  let written = generate_code(config).await.expect("generation should succeed");
  assert_eq!(written, vec![output.join("UserSignedUp.py")]);

  let source = tokio::fs::read_to_string(&written[0]).await.expect("model file");
  assert!(source.contains("from dataclasses import dataclass"));
  assert!(source.contains("@dataclass\nclass UserSignedUp:"));
}

#[tokio::test]
async fn test_missing_input_fails_before_writing() {
  let dir = tempfile::tempdir().expect("temp dir");
  let output = dir.path().join("never");
  let config = quiet_config(dir.path().join("missing.json"), Language::Rust, output.clone());

  assert!(generate_code(config).await.is_err());
  assert!(!output.exists());
}
