mod typescript;

use serde_json::Value;

use crate::{
  generator::{LanguageGenerator, ModelPipeline},
  input::RawInput,
  models::OutputModel,
};

pub(super) fn render(generator: &dyn LanguageGenerator, document: Value) -> Vec<OutputModel> {
  ModelPipeline::default()
    .generate(RawInput::Value(document), generator)
    .expect("document should render")
}

pub(super) fn output<'a>(outputs: &'a [OutputModel], name: &str) -> &'a OutputModel {
  outputs
    .iter()
    .find(|output| output.model_name == name)
    .unwrap_or_else(|| panic!("no output named {name}"))
}
