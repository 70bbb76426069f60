use std::collections::HashMap;

use serde_json::Value;

use super::{RootSchema, child_pointer};

/// Names inferred for schema locations, keyed by JSON pointer.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
  names: HashMap<String, String>,
}

impl NameIndex {
  pub fn name_of(&self, pointer: &str) -> Option<&str> {
    self.names.get(pointer).map(String::as_str)
  }

  pub fn len(&self) -> usize {
    self.names.len()
  }

  pub fn is_empty(&self) -> bool {
    self.names.is_empty()
  }
}

/// Assigns a name to every schema reachable from `roots` without following references.
///
/// A root is named by its own name and its children start from an empty prefix. Every other
/// location joins its parent's prefix with a segment describing how it was reached
/// (`address_street`, `tags_item`, `allOf_0`, ...). A name that was already handed out gains
/// an `_{occurrence}` suffix.
pub fn reflect_names(document: &Value, roots: &[RootSchema]) -> NameIndex {
  let mut reflector = Reflector::default();
  for root in roots {
    let Some(schema) = document.pointer(&root.pointer) else {
      continue;
    };
    reflector.occurrences.insert(root.name.clone(), 0);
    reflector.index.names.insert(root.pointer.clone(), root.name.clone());
    reflector.visit_children(schema, &root.pointer, "");
  }
  reflector.index
}

#[derive(Default)]
struct Reflector {
  index: NameIndex,
  occurrences: HashMap<String, usize>,
}

impl Reflector {
  fn visit(&mut self, schema: &Value, pointer: &str, name: &str) {
    if !schema.is_object() {
      return;
    }
    if !self.index.names.contains_key(pointer) {
      let occurrence = self
        .occurrences
        .entry(name.to_string())
        .and_modify(|count| *count += 1)
        .or_insert(0);
      let inferred = if *occurrence == 0 {
        name.to_string()
      } else {
        format!("{name}_{occurrence}")
      };
      self.index.names.insert(pointer.to_string(), inferred);
    }
    self.visit_children(schema, pointer, name);
  }

  fn visit_children(&mut self, schema: &Value, pointer: &str, prefix: &str) {
    let Some(object) = schema.as_object() else {
      return;
    };

    for keyword in ["allOf", "oneOf", "anyOf"] {
      if let Some(Value::Array(branches)) = object.get(keyword) {
        for (idx, branch) in branches.iter().enumerate() {
          let idx = idx.to_string();
          let child = child_pointer(pointer, &[keyword, &idx]);
          self.visit(branch, &child, &join_name(prefix, &[keyword, &idx]));
        }
      }
    }

    let singles = [
      ("not", "not"),
      ("additionalItems", "additionalItem"),
      ("additionalProperties", "additionalProperty"),
      ("contains", "contain"),
      ("propertyNames", "propertyName"),
      ("if", "if"),
      ("then", "then"),
      ("else", "else"),
    ];
    for (keyword, segment) in singles {
      if let Some(child) = object.get(keyword) {
        self.visit(child, &child_pointer(pointer, &[keyword]), &join_name(prefix, &[segment]));
      }
    }

    match object.get("items") {
      Some(Value::Array(items)) => {
        for (idx, item) in items.iter().enumerate() {
          let idx = idx.to_string();
          let child = child_pointer(pointer, &["items", &idx]);
          self.visit(item, &child, &join_name(prefix, &["item", &idx]));
        }
      }
      Some(item) => self.visit(item, &child_pointer(pointer, &["items"]), &join_name(prefix, &["item"])),
      None => {}
    }

    if let Some(Value::Object(properties)) = object.get("properties") {
      for (key, property) in properties {
        self.visit(property, &child_pointer(pointer, &["properties", key]), &join_name(prefix, &[key]));
      }
    }

    if let Some(Value::Object(dependencies)) = object.get("dependencies") {
      for (key, dependency) in dependencies {
        self.visit(
          dependency,
          &child_pointer(pointer, &["dependencies", key]),
          &join_name(prefix, &[key]),
        );
      }
    }

    if let Some(Value::Object(patterns)) = object.get("patternProperties") {
      for (idx, (pattern, schema)) in patterns.iter().enumerate() {
        let idx = idx.to_string();
        self.visit(
          schema,
          &child_pointer(pointer, &["patternProperties", pattern]),
          &join_name(prefix, &["pattern_property", &idx]),
        );
      }
    }

    for keyword in ["definitions", "$defs"] {
      if let Some(Value::Object(definitions)) = object.get(keyword) {
        for (key, definition) in definitions {
          self.visit(definition, &child_pointer(pointer, &[keyword, key]), &join_name(prefix, &[key]));
        }
      }
    }
  }
}

fn join_name(prefix: &str, parts: &[&str]) -> String {
  let pattern = parts.join("_");
  if prefix.is_empty() {
    pattern
  } else {
    format!("{prefix}_{pattern}")
  }
}
