use std::sync::Arc;

use serde_json::{Map, Value, json};

use super::{Dialect, NormalizedDocument, RootSchema, SchemaNormalizer, child_pointer};
use crate::error::{ModelgenError, Result};

const NAMED_TYPES: [&str; 4] = ["record", "error", "enum", "fixed"];

/// Avro schemas, translated into an equivalent JSON Schema document.
///
/// Every named type (record, enum, fixed) becomes an entry under `definitions` and is
/// referenced through `$ref`, so shared and recursive records keep their identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct AvroNormalizer;

impl SchemaNormalizer for AvroNormalizer {
  fn dialect(&self) -> Dialect {
    Dialect::Avro
  }

  fn should_process(&self, input: &Value) -> bool {
    let is_named = input
      .get("type")
      .and_then(Value::as_str)
      .is_some_and(|kind| NAMED_TYPES.contains(&kind));
    is_named && input.get("name").is_some_and(Value::is_string) && input.get("$schema").is_none()
  }

  fn normalize(&self, input: Value) -> Result<NormalizedDocument> {
    let mut translator = AvroTranslator::default();
    let root = translator.translate(&input)?;
    let root_name = short_name(input.get("name").and_then(Value::as_str).unwrap_or("root")).to_string();

    let root_pointer = match root.get("$ref").and_then(Value::as_str) {
      Some(reference) => reference.trim_start_matches('#').to_string(),
      None => child_pointer("/definitions", &[&root_name]),
    };
    Ok(NormalizedDocument {
      dialect: Dialect::Avro,
      document: Arc::new(json!({ "definitions": translator.definitions })),
      roots: vec![RootSchema::new(root_pointer, root_name)],
    })
  }
}

fn short_name(full_name: &str) -> &str {
  full_name.rsplit('.').next().unwrap_or(full_name)
}

fn definition_ref(name: &str) -> Value {
  json!({ "$ref": format!("#{}", child_pointer("/definitions", &[name])) })
}

#[derive(Default)]
struct AvroTranslator {
  definitions: Map<String, Value>,
}

impl AvroTranslator {
  fn translate(&mut self, avro: &Value) -> Result<Value> {
    match avro {
      Value::String(name) => self.translate_name(name),
      Value::Array(branches) => self.translate_union(branches),
      Value::Object(object) => self.translate_complex(object),
      other => Err(ModelgenError::input_format(format!("unexpected Avro type {other}"))),
    }
  }

  fn translate_name(&self, name: &str) -> Result<Value> {
    let schema = match name {
      "null" => json!({ "type": "null" }),
      "boolean" => json!({ "type": "boolean" }),
      "int" => json!({ "type": "integer", "format": "int32" }),
      "long" => json!({ "type": "integer", "format": "int64" }),
      "float" => json!({ "type": "number", "format": "float" }),
      "double" => json!({ "type": "number", "format": "double" }),
      "bytes" | "string" => json!({ "type": "string" }),
      named => definition_ref(short_name(named)),
    };
    Ok(schema)
  }

  fn translate_union(&mut self, branches: &[Value]) -> Result<Value> {
    let has_null = branches.iter().any(|branch| branch.as_str() == Some("null"));
    let members = branches
      .iter()
      .filter(|branch| branch.as_str() != Some("null"))
      .map(|branch| self.translate(branch))
      .collect::<Result<Vec<_>>>()?;

    let mut schema = match members.as_slice() {
      [] => return Ok(json!({ "type": "null" })),
      [single] => single.clone(),
      _ => json!({ "oneOf": members }),
    };
    if has_null {
      let primitive = schema.get("type").and_then(Value::as_str).map(ToString::to_string);
      schema = match primitive {
        Some(kind) => {
          schema["type"] = json!([kind, "null"]);
          schema
        }
        None => json!({ "anyOf": [schema, { "type": "null" }] }),
      };
    }
    Ok(schema)
  }

  fn translate_complex(&mut self, object: &Map<String, Value>) -> Result<Value> {
    let kind = object.get("type").cloned().unwrap_or(Value::Null);
    let Some(kind_name) = kind.as_str() else {
      return self.translate(&kind);
    };

    match kind_name {
      "record" | "error" => self.translate_record(object),
      "enum" => {
        let name = Self::declared_name(object)?;
        let mut schema = json!({ "type": "string", "enum": object.get("symbols").cloned().unwrap_or(json!([])) });
        copy_doc(object, &mut schema, &name);
        self.definitions.insert(name.clone(), schema);
        Ok(definition_ref(&name))
      }
      "fixed" => {
        let name = Self::declared_name(object)?;
        self.definitions.insert(name.clone(), json!({ "type": "string" }));
        Ok(definition_ref(&name))
      }
      "array" => {
        let items = self.translate(object.get("items").unwrap_or(&Value::Null))?;
        Ok(json!({ "type": "array", "items": items }))
      }
      "map" => {
        let values = self.translate(object.get("values").unwrap_or(&Value::Null))?;
        Ok(json!({ "type": "object", "additionalProperties": values }))
      }
      primitive => self.translate_name(primitive),
    }
  }

  fn translate_record(&mut self, object: &Map<String, Value>) -> Result<Value> {
    let name = Self::declared_name(object)?;
    // Registered before the fields so self references resolve.
    self.definitions.insert(name.clone(), json!({ "type": "object" }));

    let mut properties = Map::new();
    let mut required = Vec::new();
    for field in object.get("fields").and_then(Value::as_array).into_iter().flatten() {
      let Some(field_name) = field.get("name").and_then(Value::as_str) else {
        return Err(ModelgenError::input_format(format!("Avro record '{name}' has a field without a name")));
      };
      let mut schema = self.translate(field.get("type").unwrap_or(&Value::Null))?;
      if let Some(doc) = field.get("doc")
        && schema.get("$ref").is_none()
      {
        schema["description"] = doc.clone();
      }
      if field.get("default").is_none() {
        required.push(Value::String(field_name.to_string()));
      }
      properties.insert(field_name.to_string(), schema);
    }

    let mut schema = json!({ "type": "object", "properties": properties, "required": required });
    copy_doc(object, &mut schema, &name);
    self.definitions.insert(name.clone(), schema);
    Ok(definition_ref(&name))
  }

  fn declared_name(object: &Map<String, Value>) -> Result<String> {
    object
      .get("name")
      .and_then(Value::as_str)
      .map(|name| short_name(name).to_string())
      .ok_or_else(|| ModelgenError::input_format("Avro named type without a name"))
  }
}

fn copy_doc(object: &Map<String, Value>, schema: &mut Value, name: &str) {
  if let Some(doc) = object.get("doc") {
    schema["description"] = doc.clone();
  }
  schema["title"] = Value::String(name.to_string());
}
