use std::collections::{HashMap, HashSet};

use bon::Builder;
use indexmap::IndexSet;
use serde::Deserialize;

use super::InterpreterOptions;
use crate::{
  diagnostics::Diagnostics,
  generator::GenerationWarning,
  models::{Items, ModelArena, ModelId, SchemaType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitOptions {
  /// Promote enums to standalone models.
  #[builder(default = true)]
  pub split_enums: bool,
}

impl Default for SplitOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

impl From<&InterpreterOptions> for SplitOptions {
  fn from(options: &InterpreterOptions) -> Self {
    Self {
      split_enums: !options.allow_inline_enums,
    }
  }
}

/// Decides which interpreted nodes are emitted as standalone models.
///
/// Roots always stand alone. Below them, every object or enum found in a child slot is
/// promoted and its slot is rewritten to a reference marker. Targets of cycle markers are
/// promoted as well. Nodes declaring the same `$id` collapse into the first one seen.
pub struct ModelSplitter<'a> {
  options: SplitOptions,
  diagnostics: &'a dyn Diagnostics,
}

impl<'a> ModelSplitter<'a> {
  pub fn new(options: SplitOptions, diagnostics: &'a dyn Diagnostics) -> Self {
    Self { options, diagnostics }
  }

  /// Returns the standalone models in promotion order, roots first in declaration order.
  pub fn split(
    &self,
    arena: &mut ModelArena,
    roots: &[ModelId],
    warnings: &mut Vec<GenerationWarning>,
  ) -> Vec<ModelId> {
    let mut walk = SplitWalk {
      arena,
      options: self.options,
      diagnostics: self.diagnostics,
      warnings,
      standalone: Vec::new(),
      promoted: HashSet::new(),
      by_schema_id: HashMap::new(),
      visited: HashSet::new(),
    };
    for root in roots {
      let root = walk.arena.get(*root).reference.unwrap_or(*root);
      walk.promote(root);
    }
    walk.standalone
  }
}

struct SplitWalk<'s> {
  arena: &'s mut ModelArena,
  options: SplitOptions,
  diagnostics: &'s dyn Diagnostics,
  warnings: &'s mut Vec<GenerationWarning>,
  standalone: Vec<ModelId>,
  promoted: HashSet<ModelId>,
  by_schema_id: HashMap<String, ModelId>,
  visited: HashSet<ModelId>,
}

impl SplitWalk<'_> {
  fn promote(&mut self, id: ModelId) -> ModelId {
    let canonical = self.canonical(id);
    if self.promoted.insert(canonical) {
      self.diagnostics.debug(&format!(
        "splitting model '{}' since it should be on its own",
        self.arena.get(canonical).name
      ));
      self.standalone.push(canonical);
      self.walk(canonical);
    }
    canonical
  }

  /// First node registered under the same `$id`, or `id` itself.
  fn canonical(&mut self, id: ModelId) -> ModelId {
    let node = self.arena.get(id);
    let Some(schema_id) = node.schema_id.clone() else {
      return id;
    };
    match self.by_schema_id.get(&schema_id) {
      Some(existing) if *existing != id => {
        let warning = GenerationWarning::DuplicateSchemaId {
          schema_id,
          name: node.name.clone(),
        };
        self.diagnostics.debug(&warning.to_string());
        self.warnings.push(warning);
        *existing
      }
      Some(existing) => *existing,
      None => {
        self.by_schema_id.insert(schema_id, id);
        id
      }
    }
  }

  fn should_promote(&self, id: ModelId) -> bool {
    let node = self.arena.get(id);
    node.is_model_like() && (self.options.split_enums || node.has_type(SchemaType::Object))
  }

  fn walk(&mut self, id: ModelId) {
    if !self.visited.insert(id) {
      return;
    }

    if let Some(target) = self.arena.get(id).reference {
      let canonical = self.promote(target);
      self.arena.get_mut(id).reference = Some(canonical);
      return;
    }

    self.split_types(id);
    let node = self.arena.get(id).clone();

    for (key, child) in &node.properties {
      let child = self.split_child(*child);
      self.arena.get_mut(id).properties.insert(key.clone(), child);
    }
    for (pattern, child) in &node.pattern_properties {
      let child = self.split_child(*child);
      self.arena.get_mut(id).pattern_properties.insert(pattern.clone(), child);
    }
    if let Some(child) = node.additional_properties {
      let child = self.split_child(child);
      self.arena.get_mut(id).additional_properties = Some(child);
    }
    match &node.items {
      Some(Items::Single(child)) => {
        let child = self.split_child(*child);
        self.arena.get_mut(id).items = Some(Items::Single(child));
      }
      Some(Items::Tuple(children)) => {
        let children = children.iter().map(|child| self.split_child(*child)).collect();
        self.arena.get_mut(id).items = Some(Items::Tuple(children));
      }
      None => {}
    }
    if let Some(child) = node.additional_items {
      let child = self.split_child(child);
      self.arena.get_mut(id).additional_items = Some(child);
    }
    let union: Vec<ModelId> = node.union.iter().map(|child| self.split_child(*child)).collect();
    self.arena.get_mut(id).union = union;
  }

  /// Turns a node allowing `object` next to other types into a union with one member per type,
  /// so the object member is promoted like any other object.
  fn split_types(&mut self, id: ModelId) {
    let node = self.arena.get(id);
    let concrete = node.concrete_types();
    if node.is_enum()
      || !node.union.is_empty()
      || concrete.len() < 2
      || concrete.len() == SchemaType::ALL.len() - 1
      || !concrete.contains(&SchemaType::Object)
    {
      return;
    }
    let name = node.name.clone();
    let nullable = node.is_nullable();

    let members = concrete
      .into_iter()
      .map(|schema_type| {
        let member = self.arena.duplicate(id);
        let node = self.arena.get_mut(member);
        node.name = format!("{name}_{schema_type}");
        node.schema_id = None;
        node.types = IndexSet::from([schema_type]);
        if schema_type != SchemaType::Object {
          node.properties.clear();
          node.pattern_properties.clear();
          node.additional_properties = None;
          node.required.clear();
        }
        if schema_type != SchemaType::Array {
          node.items = None;
          node.additional_items = None;
        }
        member
      })
      .collect();

    let node = self.arena.get_mut(id);
    node.types = if nullable { IndexSet::from([SchemaType::Null]) } else { IndexSet::new() };
    node.properties.clear();
    node.pattern_properties.clear();
    node.additional_properties = None;
    node.required.clear();
    node.items = None;
    node.additional_items = None;
    node.union = members;
  }

  /// Returns what the parent slot should hold after splitting `child`.
  fn split_child(&mut self, child: ModelId) -> ModelId {
    if self.arena.get(child).is_reference() {
      self.walk(child);
      return child;
    }
    if self.should_promote(child) {
      let canonical = self.promote(child);
      return self.arena.reference_to(canonical);
    }
    self.walk(child);
    child
  }
}
