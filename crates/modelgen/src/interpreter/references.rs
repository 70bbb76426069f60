use std::{collections::HashMap, sync::Arc};

use serde_json::Value;

use crate::{
  error::{ModelgenError, Result},
  input::{child_pointer, escape_pointer_segment, unescape_pointer_segment},
  models::ModelId,
};

/// Keywords whose values are data, not schemas, and must not be scanned for `$id`.
const DATA_KEYWORDS: [&str; 5] = ["enum", "const", "example", "examples", "default"];

/// Locates `$ref` targets inside one document and tracks the schemas currently being expanded.
#[derive(Debug)]
pub(crate) struct ReferenceResolver {
  document: Arc<Value>,
  ids: HashMap<String, String>,
  stack: Vec<(String, ModelId)>,
}

impl ReferenceResolver {
  pub(crate) fn new(document: Arc<Value>) -> Self {
    let mut ids = HashMap::new();
    index_ids(&document, "", &mut ids);
    Self {
      document,
      ids,
      stack: Vec::new(),
    }
  }

  /// Turns a `$ref` into the JSON pointer of its target.
  ///
  /// Local fragments (`#/definitions/Pet`), exact `$id` matches and `$id` plus fragment are
  /// resolvable. Everything else fails with the reference text.
  pub(crate) fn resolve(&self, reference: &str, location: &str) -> Result<String> {
    let unresolved = || ModelgenError::ReferenceResolution {
      reference: reference.to_string(),
      location: if location.is_empty() { "#".to_string() } else { format!("#{location}") },
    };

    let pointer = if let Some(fragment) = reference.strip_prefix('#') {
      canonical_pointer(fragment)
    } else if let Some(pointer) = self.ids.get(reference) {
      Some(pointer.clone())
    } else if let Some((base, fragment)) = reference.split_once('#')
      && let Some(base_pointer) = self.ids.get(base)
    {
      canonical_pointer(fragment).map(|fragment| format!("{base_pointer}{fragment}"))
    } else {
      None
    };

    match pointer {
      Some(pointer) if self.document.pointer(&pointer).is_some() => Ok(pointer),
      _ => Err(unresolved()),
    }
  }

  pub(crate) fn enter(&mut self, pointer: &str, id: ModelId) {
    self.stack.push((pointer.to_string(), id));
  }

  pub(crate) fn leave(&mut self, pointer: &str) {
    if let Some(position) = self.stack.iter().rposition(|(entry, _)| entry == pointer) {
      self.stack.truncate(position);
    }
  }

  /// The model being built for `pointer`, if its expansion is still in progress.
  pub(crate) fn active(&self, pointer: &str) -> Option<ModelId> {
    self
      .stack
      .iter()
      .find_map(|(entry, id)| (entry == pointer).then_some(*id))
  }
}

/// Re-escapes a fragment so that percent-encoded and `~`-escaped spellings agree.
fn canonical_pointer(fragment: &str) -> Option<String> {
  if fragment.is_empty() {
    return Some(String::new());
  }
  let rest = fragment.strip_prefix('/')?;
  let mut pointer = String::with_capacity(fragment.len());
  for segment in rest.split('/') {
    pointer.push('/');
    pointer.push_str(&escape_pointer_segment(&unescape_pointer_segment(segment)));
  }
  Some(pointer)
}

fn index_ids(value: &Value, pointer: &str, ids: &mut HashMap<String, String>) {
  match value {
    Value::Object(object) => {
      if let Some(Value::String(id)) = object.get("$id").or_else(|| object.get("id"))
        && !id.starts_with('#')
      {
        let id = id.trim_end_matches('#').to_string();
        ids.entry(id).or_insert_with(|| pointer.to_string());
      }
      for (key, child) in object {
        if DATA_KEYWORDS.contains(&key.as_str()) {
          continue;
        }
        index_ids(child, &child_pointer(pointer, &[key]), ids);
      }
    }
    Value::Array(items) => {
      for (idx, item) in items.iter().enumerate() {
        index_ids(item, &child_pointer(pointer, &[&idx.to_string()]), ids);
      }
    }
    _ => {}
  }
}
