use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::{Map, Value};

use super::{Dialect, NormalizedDocument, RootSchema, SchemaNormalizer, child_pointer};
use crate::error::{ModelgenError, Result};

const HTTP_METHODS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

static PATH_SPECIAL_CHARS_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"[^\w\s*/]+").expect("path character class is valid"));

/// Turns `/pets/{petId}` into `pets_petId`.
pub(crate) fn format_path_name(path: &str) -> String {
  let stripped = PATH_SPECIAL_CHARS_RE.replace_all(path, "");
  stripped.trim_start_matches('/').replace('/', "_")
}

fn format_media_name(media: &str) -> String {
  media.replacen('/', "_", 1)
}

/// Follows a local `$ref` once, returning the target and its pointer.
fn follow_local<'a>(document: &'a Value, node: &'a Value, pointer: &str) -> (&'a Value, String) {
  if let Some(reference) = node.get("$ref").and_then(Value::as_str)
    && let Some(target_pointer) = reference.strip_prefix('#')
    && let Some(target) = document.pointer(target_pointer)
  {
    return (target, target_pointer.to_string());
  }
  (node, pointer.to_string())
}

struct RootCollector<'a> {
  document: &'a Value,
  roots: Vec<RootSchema>,
}

impl<'a> RootCollector<'a> {
  fn new(document: &'a Value) -> Self {
    Self {
      document,
      roots: Vec::new(),
    }
  }

  fn push(&mut self, pointer: String, name: String) {
    if self.document.pointer(&pointer).is_some() && !self.roots.iter().any(|root| root.pointer == pointer) {
      self.roots.push(RootSchema::new(pointer, name));
    }
  }

  fn push_map(&mut self, pointer: &str) {
    if let Some(Value::Object(schemas)) = self.document.pointer(pointer) {
      for key in schemas.keys() {
        self.push(child_pointer(pointer, &[key]), key.clone());
      }
    }
  }
}

fn version_of<'a>(input: &'a Value, key: &str) -> Option<&'a str> {
  input.get(key).and_then(Value::as_str)
}

/// OpenAPI 3.x documents: component schemas plus every request/response/callback media schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenApiNormalizer;

impl OpenApiNormalizer {
  fn collect_paths(collector: &mut RootCollector<'_>, paths_pointer: &str, paths: &Map<String, Value>, prefix: &str) {
    for (path, item) in paths {
      let item_pointer = child_pointer(paths_pointer, &[path]);
      let (item, item_pointer) = follow_local(collector.document, item, &item_pointer);
      let path_name = if prefix.is_empty() {
        format_path_name(path)
      } else {
        format!("{prefix}_{}", format_path_name(path))
      };

      for method in HTTP_METHODS {
        let Some(operation) = item.get(method) else {
          continue;
        };
        let operation_pointer = child_pointer(&item_pointer, &[method]);
        let operation_name = format!("{path_name}_{method}");
        Self::collect_operation(collector, operation, &operation_pointer, &operation_name);
      }
    }
  }

  fn collect_operation(collector: &mut RootCollector<'_>, operation: &Value, pointer: &str, name: &str) {
    if let Some(body) = operation.get("requestBody") {
      let (body, body_pointer) = follow_local(collector.document, body, &child_pointer(pointer, &["requestBody"]));
      Self::collect_content(collector, body, &body_pointer, &format!("{name}_request"));
    }

    if let Some(Value::Object(responses)) = operation.get("responses") {
      for (status, response) in responses {
        let response_pointer = child_pointer(pointer, &["responses", status]);
        let (response, response_pointer) = follow_local(collector.document, response, &response_pointer);
        let status_name = status.replacen('/', "_", 1);
        Self::collect_content(collector, response, &response_pointer, &format!("{name}_{status_name}"));
      }
    }

    if let Some(Value::Object(callbacks)) = operation.get("callbacks") {
      for (callback_name, callback) in callbacks {
        let callback_pointer = child_pointer(pointer, &["callbacks", callback_name]);
        let (callback, callback_pointer) = follow_local(collector.document, callback, &callback_pointer);
        if let Some(paths) = callback.as_object() {
          let prefix = format!("{name}_callback_{callback_name}");
          Self::collect_paths(collector, &callback_pointer, paths, &prefix);
        }
      }
    }
  }

  fn collect_content(collector: &mut RootCollector<'_>, holder: &Value, pointer: &str, name: &str) {
    let Some(Value::Object(content)) = holder.get("content") else {
      return;
    };
    for (media, media_object) in content {
      if media_object.get("schema").is_none() {
        continue;
      }
      let schema_pointer = child_pointer(pointer, &["content", media, "schema"]);
      collector.push(schema_pointer, format!("{name}_{}", format_media_name(media)));
    }
  }
}

impl SchemaNormalizer for OpenApiNormalizer {
  fn dialect(&self) -> Dialect {
    Dialect::OpenApi
  }

  fn should_process(&self, input: &Value) -> bool {
    input.get("openapi").is_some()
  }

  fn normalize(&self, input: Value) -> Result<NormalizedDocument> {
    let version = version_of(&input, "openapi").unwrap_or_default();
    if !version.starts_with("3.") {
      return Err(ModelgenError::input_format(format!(
        "unsupported OpenAPI version '{version}'; expected 3.x"
      )));
    }

    let mut collector = RootCollector::new(&input);
    collector.push_map("/components/schemas");
    if let Some(Value::Object(paths)) = input.get("paths") {
      Self::collect_paths(&mut collector, "/paths", paths, "");
    }
    let roots = collector.roots;

    Ok(NormalizedDocument {
      dialect: Dialect::OpenApi,
      document: Arc::new(input),
      roots,
    })
  }
}

/// Swagger 2.0 documents: definitions, body parameters and response schemas.
#[derive(Debug, Default, Clone, Copy)]
pub struct SwaggerNormalizer;

impl SwaggerNormalizer {
  fn collect_operation(collector: &mut RootCollector<'_>, operation: &Value, pointer: &str, name: &str) {
    if let Some(Value::Array(parameters)) = operation.get("parameters") {
      for (idx, parameter) in parameters.iter().enumerate() {
        let parameter_pointer = child_pointer(pointer, &["parameters", &idx.to_string()]);
        let (parameter, parameter_pointer) = follow_local(collector.document, parameter, &parameter_pointer);
        let is_body = parameter.get("in").and_then(Value::as_str) == Some("body");
        if is_body && parameter.get("schema").is_some() {
          collector.push(child_pointer(&parameter_pointer, &["schema"]), format!("{name}_body"));
        }
      }
    }

    if let Some(Value::Object(responses)) = operation.get("responses") {
      for (status, response) in responses {
        let response_pointer = child_pointer(pointer, &["responses", status]);
        let (response, response_pointer) = follow_local(collector.document, response, &response_pointer);
        if response.get("schema").is_some() {
          collector.push(child_pointer(&response_pointer, &["schema"]), format!("{name}_{status}"));
        }
      }
    }
  }
}

impl SchemaNormalizer for SwaggerNormalizer {
  fn dialect(&self) -> Dialect {
    Dialect::Swagger
  }

  fn should_process(&self, input: &Value) -> bool {
    input.get("swagger").is_some()
  }

  fn normalize(&self, input: Value) -> Result<NormalizedDocument> {
    let version = version_of(&input, "swagger").unwrap_or_default();
    if version != "2.0" {
      return Err(ModelgenError::input_format(format!(
        "unsupported Swagger version '{version}'; expected 2.0"
      )));
    }

    let mut collector = RootCollector::new(&input);
    collector.push_map("/definitions");
    if let Some(Value::Object(paths)) = input.get("paths") {
      for (path, item) in paths {
        let item_pointer = child_pointer("/paths", &[path]);
        for method in HTTP_METHODS {
          if let Some(operation) = item.get(method) {
            let name = format!("{}_{method}", format_path_name(path));
            Self::collect_operation(&mut collector, operation, &child_pointer(&item_pointer, &[method]), &name);
          }
        }
      }
    }
    let roots = collector.roots;

    Ok(NormalizedDocument {
      dialect: Dialect::Swagger,
      document: Arc::new(input),
      roots,
    })
  }
}
