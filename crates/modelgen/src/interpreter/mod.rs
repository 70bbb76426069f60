//! Turns the raw schema tree of a normalized document into [`CommonModel`] nodes.
//!
//! Each schema location is interpreted at most once and keyed by its JSON pointer. A `$ref`
//! whose target is still being expanded yields a reference marker instead of recursing, so
//! cyclic documents terminate. [`ModelSplitter`] then decides which nodes stand on their own.

mod merge;
mod references;
mod splitter;

#[cfg(test)]
mod tests;

use std::{collections::HashMap, sync::Arc};

use bon::Builder;
use serde::Deserialize;
use serde_json::{Map, Value};

pub use splitter::{ModelSplitter, SplitOptions};

use self::{merge::Merger, references::ReferenceResolver};
use crate::{
  diagnostics::Diagnostics,
  error::{ModelgenError, Result},
  generator::GenerationWarning,
  input::{Dialect, NameIndex, NormalizedDocument, child_pointer, reflect_names},
  models::{Items, ModelArena, ModelId, OriginalInput, SchemaType},
};

/// Keywords that may sit next to `$ref` without being reported as ignored.
const REF_ANNOTATIONS: [&str; 8] = [
  "$ref",
  "$id",
  "$schema",
  "$comment",
  "description",
  "title",
  "definitions",
  "$defs",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Builder, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "snake_case")]
pub struct InterpreterOptions {
  /// Drop the trailing rest slot that `additionalItems` adds to tuples.
  #[builder(default)]
  pub ignore_additional_items: bool,
  /// Drop `additionalProperties` entirely.
  #[builder(default)]
  pub ignore_additional_properties: bool,
  /// Keep enums inline in their parent instead of promoting them to standalone models.
  #[builder(default)]
  pub allow_inline_enums: bool,
}

impl InterpreterOptions {
  pub fn from_json(value: Value) -> Result<Self> {
    serde_json::from_value(value).map_err(|e| ModelgenError::InvalidOptions(e.to_string()))
  }
}

/// Interpreted form of one document: every node plus the roots in declaration order.
#[derive(Debug, Clone)]
pub struct ProcessedInput {
  pub dialect: Dialect,
  pub document: Arc<Value>,
  pub arena: ModelArena,
  pub roots: Vec<ModelId>,
  pub warnings: Vec<GenerationWarning>,
}

pub struct Interpreter<'a> {
  document: Arc<Value>,
  names: NameIndex,
  options: &'a InterpreterOptions,
  diagnostics: &'a dyn Diagnostics,
  arena: ModelArena,
  resolver: ReferenceResolver,
  interpreted: HashMap<String, ModelId>,
  warnings: Vec<GenerationWarning>,
  anonymous: usize,
}

impl<'a> Interpreter<'a> {
  pub fn new(
    document: Arc<Value>,
    names: NameIndex,
    options: &'a InterpreterOptions,
    diagnostics: &'a dyn Diagnostics,
  ) -> Self {
    Self {
      resolver: ReferenceResolver::new(Arc::clone(&document)),
      document,
      names,
      options,
      diagnostics,
      arena: ModelArena::new(),
      interpreted: HashMap::new(),
      warnings: Vec::new(),
      anonymous: 0,
    }
  }

  /// Interprets every root of a normalized document.
  pub fn interpret_document(
    normalized: NormalizedDocument,
    options: &'a InterpreterOptions,
    diagnostics: &'a dyn Diagnostics,
  ) -> Result<ProcessedInput> {
    let names = reflect_names(&normalized.document, &normalized.roots);
    let mut interpreter = Self::new(Arc::clone(&normalized.document), names, options, diagnostics);

    let mut roots = Vec::with_capacity(normalized.roots.len());
    for root in &normalized.roots {
      diagnostics.debug(&format!("interpreting root '{}' at #{}", root.name, root.pointer));
      if let Some(id) = interpreter.interpret(&root.pointer)?
        && !roots.contains(&id)
      {
        roots.push(id);
      }
    }

    Ok(ProcessedInput {
      dialect: normalized.dialect,
      document: normalized.document,
      arena: interpreter.arena,
      roots,
      warnings: interpreter.warnings,
    })
  }

  /// Interprets the schema at `pointer`. `false` schemas produce no model.
  pub fn interpret(&mut self, pointer: &str) -> Result<Option<ModelId>> {
    if let Some(active) = self.resolver.active(pointer) {
      self
        .diagnostics
        .debug(&format!("breaking reference cycle at #{pointer}"));
      return Ok(Some(self.arena.reference_to(active)));
    }
    if let Some(id) = self.interpreted.get(pointer) {
      return Ok(Some(*id));
    }

    let document = Arc::clone(&self.document);
    let Some(schema) = document.pointer(pointer) else {
      return Err(ModelgenError::ReferenceResolution {
        reference: format!("#{pointer}"),
        location: format!("#{pointer}"),
      });
    };

    let object = match schema {
      Value::Bool(false) => return Ok(None),
      Value::Object(object) => object,
      _ => {
        let id = self.allocate(pointer, None);
        self.interpreted.insert(pointer.to_string(), id);
        return Ok(Some(id));
      }
    };

    if let Some(reference) = object.get("$ref").and_then(Value::as_str) {
      self.report_ref_siblings(pointer, object);
      let target = self.resolver.resolve(reference, pointer)?;
      return self.interpret(&target);
    }

    let id = self.allocate(pointer, Some(object));
    self.interpreted.insert(pointer.to_string(), id);
    self.resolver.enter(pointer, id);
    let outcome = self.interpret_object(id, pointer, object);
    self.resolver.leave(pointer);
    outcome?;
    Ok(Some(id))
  }

  fn allocate(&mut self, pointer: &str, object: Option<&Map<String, Value>>) -> ModelId {
    let title = object.and_then(|o| o.get("title")).and_then(Value::as_str);
    let schema_id = object
      .and_then(|o| o.get("$id").or_else(|| o.get("id")))
      .and_then(Value::as_str)
      .filter(|id| !id.starts_with('#'));
    let name = match title.or(schema_id).or_else(|| self.names.name_of(pointer)) {
      Some(name) if !name.is_empty() => name.to_string(),
      _ => {
        self.anonymous += 1;
        format!("anonymous_schema_{}", self.anonymous)
      }
    };

    let original = OriginalInput::new(Arc::clone(&self.document), pointer);
    let id = self.arena.allocate(name, original);
    self.arena.get_mut(id).schema_id = schema_id.map(ToString::to_string);
    id
  }

  fn report_ref_siblings(&mut self, pointer: &str, object: &Map<String, Value>) {
    for keyword in object.keys() {
      if REF_ANNOTATIONS.contains(&keyword.as_str()) || keyword.starts_with("x-") {
        continue;
      }
      let warning = GenerationWarning::KeywordIgnored {
        name: self.names.name_of(pointer).unwrap_or(pointer).to_string(),
        keyword: format!("{keyword} (next to $ref)"),
      };
      self.diagnostics.warn(&warning.to_string());
      self.warnings.push(warning);
    }
  }

  fn interpret_object(&mut self, id: ModelId, pointer: &str, object: &Map<String, Value>) -> Result<()> {
    self.interpret_types(id, object);

    if let Some(Value::Array(required)) = object.get("required") {
      let node = self.arena.get_mut(id);
      node.required.extend(required.iter().filter_map(Value::as_str).map(ToString::to_string));
    }

    self.interpret_pattern_properties(id, pointer, object)?;
    self.interpret_additional_properties(id, pointer, object)?;
    self.interpret_additional_items(id, pointer, object)?;
    self.interpret_items(id, pointer, object)?;
    self.interpret_properties(id, pointer, object)?;

    if let Some(Value::Array(branches)) = object.get("allOf") {
      for idx in 0..branches.len() {
        self.combine(id, &child_pointer(pointer, &["allOf", &idx.to_string()]), true)?;
      }
    }

    self.interpret_unions(id, pointer, object)?;

    if let Some(Value::Object(dependencies)) = object.get("dependencies") {
      for (key, dependency) in dependencies {
        if dependency.is_object() {
          self.combine(id, &child_pointer(pointer, &["dependencies", key]), false)?;
        }
      }
    }

    self.interpret_enum(id, object);

    for keyword in ["then", "else"] {
      if object.get(keyword).is_some_and(Value::is_object) {
        self.combine(id, &child_pointer(pointer, &[keyword]), false)?;
      }
    }

    self.interpret_not(id, object);
    self.interpret_nullable(id, object);
    Ok(())
  }

  fn interpret_types(&mut self, id: ModelId, object: &Map<String, Value>) {
    let declared: Vec<&str> = match object.get("type") {
      Some(Value::String(kind)) => vec![kind.as_str()],
      Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).collect(),
      _ => Vec::new(),
    };
    let node = self.arena.get_mut(id);
    for kind in declared {
      match kind.parse::<SchemaType>() {
        Ok(schema_type) => node.add_type(schema_type),
        Err(_) => self.diagnostics.warn(&format!("unknown type '{kind}' on '{}' ignored", node.name)),
      }
    }
  }

  fn interpret_nullable(&mut self, id: ModelId, object: &Map<String, Value>) {
    let nullable = ["nullable", "x-nullable"]
      .iter()
      .any(|keyword| object.get(*keyword).and_then(Value::as_bool).unwrap_or(false));
    let node = self.arena.get_mut(id);
    if nullable && !node.types.is_empty() {
      node.add_type(SchemaType::Null);
    }
  }

  fn interpret_properties(&mut self, id: ModelId, pointer: &str, object: &Map<String, Value>) -> Result<()> {
    let Some(Value::Object(properties)) = object.get("properties") else {
      return Ok(());
    };
    self.arena.get_mut(id).add_type(SchemaType::Object);
    for key in properties.keys() {
      if let Some(child) = self.interpret(&child_pointer(pointer, &["properties", key]))? {
        self.arena.get_mut(id).properties.insert(key.clone(), child);
      }
    }
    Ok(())
  }

  fn interpret_pattern_properties(&mut self, id: ModelId, pointer: &str, object: &Map<String, Value>) -> Result<()> {
    let Some(Value::Object(patterns)) = object.get("patternProperties") else {
      return Ok(());
    };
    self.arena.get_mut(id).add_type(SchemaType::Object);
    for pattern in patterns.keys() {
      if let Some(child) = self.interpret(&child_pointer(pointer, &["patternProperties", pattern]))? {
        self.arena.get_mut(id).pattern_properties.insert(pattern.clone(), child);
      }
    }
    Ok(())
  }

  fn interpret_additional_properties(&mut self, id: ModelId, pointer: &str, object: &Map<String, Value>) -> Result<()> {
    if self.options.ignore_additional_properties || !object.contains_key("additionalProperties") {
      return Ok(());
    }
    let child = self.interpret(&child_pointer(pointer, &["additionalProperties"]))?;
    self.arena.get_mut(id).additional_properties = child;
    Ok(())
  }

  fn interpret_items(&mut self, id: ModelId, pointer: &str, object: &Map<String, Value>) -> Result<()> {
    let items = match object.get("items") {
      None => return Ok(()),
      Some(Value::Array(items)) => {
        let mut slots = Vec::with_capacity(items.len());
        for idx in 0..items.len() {
          let slot = match self.interpret(&child_pointer(pointer, &["items", &idx.to_string()]))? {
            Some(slot) => slot,
            None => self.any_node(&child_pointer(pointer, &["items", &idx.to_string()])),
          };
          slots.push(slot);
        }
        Items::Tuple(slots)
      }
      Some(_) => match self.interpret(&child_pointer(pointer, &["items"]))? {
        Some(item) => Items::Single(item),
        None => return Ok(()),
      },
    };
    let node = self.arena.get_mut(id);
    node.add_type(SchemaType::Array);
    node.items = Some(items);
    Ok(())
  }

  fn interpret_additional_items(&mut self, id: ModelId, pointer: &str, object: &Map<String, Value>) -> Result<()> {
    if self.options.ignore_additional_items || !object.contains_key("additionalItems") {
      return Ok(());
    }
    let child = self.interpret(&child_pointer(pointer, &["additionalItems"]))?;
    self.arena.get_mut(id).additional_items = child;
    Ok(())
  }

  /// `oneOf`/`anyOf` branches become union candidates. Properties and `required` declared next
  /// to the branches are merged into a copy of every branch. A branch that closes a cycle
  /// keeps its own shape and the skipped merge is reported.
  fn interpret_unions(&mut self, id: ModelId, pointer: &str, object: &Map<String, Value>) -> Result<()> {
    let shares_shape =
      (object.contains_key("properties") || object.contains_key("required")) && !object.contains_key("allOf");
    let mut candidates = Vec::new();
    for keyword in ["oneOf", "anyOf"] {
      let Some(Value::Array(branches)) = object.get(keyword) else {
        continue;
      };
      for idx in 0..branches.len() {
        let Some(branch) = self.interpret(&child_pointer(pointer, &[keyword, &idx.to_string()]))? else {
          continue;
        };
        let branch = if !shares_shape {
          branch
        } else if self.arena.get(branch).is_reference() {
          let warning = GenerationWarning::UnionSiblingIgnored {
            name: self.arena.get(id).name.clone(),
            keyword: keyword.to_string(),
            branch: self.arena.get(branch).name.clone(),
          };
          self.diagnostics.warn(&warning.to_string());
          self.warnings.push(warning);
          branch
        } else {
          let copy = self.arena.duplicate(branch);
          Merger::new(&mut self.arena, self.diagnostics, &mut self.warnings).merge(copy, id, true);
          copy
        };
        if !candidates.contains(&branch) {
          candidates.push(branch);
        }
      }
    }
    self.arena.get_mut(id).union.extend(candidates);
    Ok(())
  }

  fn interpret_enum(&mut self, id: ModelId, object: &Map<String, Value>) {
    let node = self.arena.get_mut(id);
    if let Some(Value::Array(values)) = object.get("enum") {
      for value in values {
        if !node.enum_values.contains(value) {
          node.enum_values.push(value.clone());
        }
      }
    } else if let Some(value) = object.get("const") {
      node.enum_values = vec![value.clone()];
    }
  }

  /// Only the `type` part of `not` is honored: the excluded types are removed.
  fn interpret_not(&mut self, id: ModelId, object: &Map<String, Value>) {
    let Some(Value::Object(not)) = object.get("not") else {
      return;
    };
    let excluded: Vec<SchemaType> = match not.get("type") {
      Some(Value::String(kind)) => kind.parse::<SchemaType>().into_iter().collect(),
      Some(Value::Array(kinds)) => kinds
        .iter()
        .filter_map(Value::as_str)
        .filter_map(|kind| kind.parse::<SchemaType>().ok())
        .collect(),
      _ => Vec::new(),
    };
    let node = self.arena.get_mut(id);
    if excluded.is_empty() {
      return;
    }
    if node.types.is_empty() {
      node.types.extend(SchemaType::ALL);
    }
    node.types.retain(|kind| !excluded.contains(kind));
  }

  fn combine(&mut self, id: ModelId, pointer: &str, adopt_required: bool) -> Result<()> {
    if let Some(source) = self.interpret(pointer)? {
      Merger::new(&mut self.arena, self.diagnostics, &mut self.warnings).merge(id, source, adopt_required);
    }
    Ok(())
  }

  fn any_node(&mut self, pointer: &str) -> ModelId {
    self.allocate(pointer, None)
  }
}
