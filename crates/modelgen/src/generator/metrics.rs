use std::collections::BTreeMap;

use strum::Display;

use crate::models::{MetaModelSet, Variant};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GenerationStats {
  pub models_generated: usize,
  pub models_by_variant: BTreeMap<String, usize>,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub warnings: Vec<GenerationWarning>,
}

impl GenerationStats {
  pub fn record_model(&mut self, variant: Variant) {
    self.models_generated += 1;
    *self.models_by_variant.entry(variant.to_string()).or_default() += 1;
  }

  pub fn record_models(&mut self, models: &MetaModelSet) {
    for entry in models.iter() {
      self.record_model(entry.model.kind.variant());
    }
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_warning(&mut self, warning: GenerationWarning) {
    self.warnings.push(warning);
  }

  pub fn record_warnings(&mut self, warnings: impl IntoIterator<Item = GenerationWarning>) {
    self.warnings.extend(warnings);
  }

  pub fn count(&self, variant: Variant) -> usize {
    self.models_by_variant.get(&variant.to_string()).copied().unwrap_or_default()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum GenerationWarning {
  #[strum(to_string = "Schema '{name}' shares $id '{schema_id}' with an earlier model and was collapsed into it")]
  DuplicateSchemaId { schema_id: String, name: String },
  #[strum(to_string = "Cannot merge recursive reference '{source_name}' into '{target}'; the branch was skipped")]
  RecursiveMergeSkipped { target: String, source_name: String },
  #[strum(to_string = "Schema '{name}': '{keyword}' is not supported and was ignored")]
  KeywordIgnored { name: String, keyword: String },
  #[strum(to_string = "Schema '{name}': properties next to '{keyword}' were not merged into recursive branch '{branch}'")]
  UnionSiblingIgnored { name: String, keyword: String, branch: String },
}

impl GenerationWarning {
  pub fn is_skipped_item(&self) -> bool {
    matches!(self, Self::RecursiveMergeSkipped { .. })
  }
}
