use std::collections::HashSet;

use crate::{
  diagnostics::Diagnostics,
  generator::GenerationWarning,
  models::{Items, ModelArena, ModelId},
};

/// Folds one interpreted node into another (`allOf`, `then`/`else`, `dependencies`).
///
/// Children shared with other parents are never edited in place: when both sides carry a
/// child for the same slot, the target's child is duplicated first and the duplicate
/// receives the merge.
pub(crate) struct Merger<'a> {
  arena: &'a mut ModelArena,
  diagnostics: &'a dyn Diagnostics,
  warnings: &'a mut Vec<GenerationWarning>,
  visited: HashSet<(ModelId, ModelId)>,
}

impl<'a> Merger<'a> {
  pub(crate) fn new(
    arena: &'a mut ModelArena,
    diagnostics: &'a dyn Diagnostics,
    warnings: &'a mut Vec<GenerationWarning>,
  ) -> Self {
    Self {
      arena,
      diagnostics,
      warnings,
      visited: HashSet::new(),
    }
  }

  /// Merges `source` into `target`. The target keeps its name and `$id`.
  pub(crate) fn merge(&mut self, target: ModelId, source: ModelId, adopt_required: bool) {
    if target == source || !self.visited.insert((target, source)) {
      return;
    }

    let source_node = self.arena.get(source).clone();
    let target_node = self.arena.get(target);
    if source_node.is_reference() || target_node.is_reference() {
      let warning = GenerationWarning::RecursiveMergeSkipped {
        target: target_node.name.clone(),
        source_name: source_node.name.clone(),
      };
      self.diagnostics.warn(&warning.to_string());
      self.warnings.push(warning);
      return;
    }

    {
      let node = self.arena.get_mut(target);
      node.types.extend(source_node.types.iter().copied());
      for value in &source_node.enum_values {
        if !node.enum_values.contains(value) {
          node.enum_values.push(value.clone());
        }
      }
      if adopt_required {
        node.required.extend(source_node.required.iter().cloned());
      }
      for branch in &source_node.union {
        if !node.union.contains(branch) {
          node.union.push(*branch);
        }
      }
    }

    for (key, source_child) in &source_node.properties {
      let existing = self.arena.get(target).properties.get(key).copied();
      let merged = self.merge_child(existing, *source_child);
      self.arena.get_mut(target).properties.insert(key.clone(), merged);
    }

    for (pattern, source_child) in &source_node.pattern_properties {
      let existing = self.arena.get(target).pattern_properties.get(pattern).copied();
      let merged = self.merge_child(existing, *source_child);
      self.arena.get_mut(target).pattern_properties.insert(pattern.clone(), merged);
    }

    if let Some(source_child) = source_node.additional_properties {
      let existing = self.arena.get(target).additional_properties;
      let merged = self.merge_child(existing, source_child);
      self.arena.get_mut(target).additional_properties = Some(merged);
    }

    if let Some(source_child) = source_node.additional_items {
      let existing = self.arena.get(target).additional_items;
      let merged = self.merge_child(existing, source_child);
      self.arena.get_mut(target).additional_items = Some(merged);
    }

    if let Some(source_items) = &source_node.items {
      let existing = self.arena.get(target).items.clone();
      let merged = self.merge_items(existing, source_items);
      self.arena.get_mut(target).items = Some(merged);
    }
  }

  fn merge_child(&mut self, existing: Option<ModelId>, source: ModelId) -> ModelId {
    match existing {
      None => source,
      Some(existing) if existing == source => existing,
      Some(existing) => {
        let copy = self.arena.duplicate(existing);
        self.merge(copy, source, true);
        copy
      }
    }
  }

  fn merge_items(&mut self, existing: Option<Items>, source: &Items) -> Items {
    match (existing, source) {
      (None, source) => source.clone(),
      (Some(Items::Single(existing)), Items::Single(source)) => Items::Single(self.merge_child(Some(existing), *source)),
      (Some(Items::Tuple(existing)), Items::Tuple(source)) => {
        let mut merged = Vec::with_capacity(existing.len().max(source.len()));
        for idx in 0..existing.len().max(source.len()) {
          let slot = match (existing.get(idx), source.get(idx)) {
            (Some(left), Some(right)) => self.merge_child(Some(*left), *right),
            (Some(only), None) | (None, Some(only)) => *only,
            (None, None) => continue,
          };
          merged.push(slot);
        }
        Items::Tuple(merged)
      }
      // Single and tuple forms do not combine; the declaration already present wins.
      (Some(existing), _) => existing,
    }
  }
}
