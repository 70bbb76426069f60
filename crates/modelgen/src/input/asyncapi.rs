use std::sync::Arc;

use serde_json::Value;

use super::{Dialect, NormalizedDocument, RootSchema, SchemaNormalizer, child_pointer};
use crate::error::{ModelgenError, Result};

/// AsyncAPI 2.x and 3.x documents: every message payload and component schema.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsyncApiNormalizer;

#[derive(Default)]
struct PayloadCollector {
  roots: Vec<RootSchema>,
  anonymous: usize,
}

impl PayloadCollector {
  fn push(&mut self, pointer: String, name: String) {
    if !self.roots.iter().any(|root| root.pointer == pointer) {
      self.roots.push(RootSchema::new(pointer, name));
    }
  }

  fn anonymous_name(&mut self) -> String {
    self.anonymous += 1;
    format!("anonymous_schema_{}", self.anonymous)
  }

  /// Registers the payload of one message object, following a local `$ref` to the message.
  fn message(&mut self, document: &Value, message: &Value, pointer: &str, fallback: Option<&str>) -> Result<()> {
    let (message, pointer) = match message.get("$ref").and_then(Value::as_str) {
      Some(reference) => {
        let target_pointer = reference.strip_prefix('#').unwrap_or(reference);
        match document.pointer(target_pointer) {
          Some(target) => (target, target_pointer.to_string()),
          None => return Ok(()),
        }
      }
      None => (message, pointer.to_string()),
    };

    if let Some(Value::Array(branches)) = message.get("oneOf") {
      for (idx, branch) in branches.iter().enumerate() {
        let branch_pointer = child_pointer(&pointer, &["oneOf", &idx.to_string()]);
        self.message(document, branch, &branch_pointer, None)?;
      }
      return Ok(());
    }

    let Some(payload) = message.get("payload") else {
      return Ok(());
    };
    let payload_pointer = match payload.get("schemaFormat").and_then(Value::as_str) {
      Some(format) if is_json_schema_format(format) => child_pointer(&pointer, &["payload", "schema"]),
      Some(format) => {
        return Err(ModelgenError::input_format(format!(
          "unsupported AsyncAPI payload schema format '{format}'"
        )));
      }
      None => child_pointer(&pointer, &["payload"]),
    };

    let name = message
      .get("name")
      .or_else(|| message.get("messageId"))
      .and_then(Value::as_str)
      .map(ToString::to_string)
      .or_else(|| fallback.map(ToString::to_string))
      .unwrap_or_else(|| self.anonymous_name());
    self.push(payload_pointer, name);
    Ok(())
  }
}

fn is_json_schema_format(format: &str) -> bool {
  format.starts_with("application/vnd.aai.asyncapi")
    || format.starts_with("application/schema+json")
    || format.starts_with("application/schema+yaml")
}

impl SchemaNormalizer for AsyncApiNormalizer {
  fn dialect(&self) -> Dialect {
    Dialect::AsyncApi
  }

  fn should_process(&self, input: &Value) -> bool {
    input.get("asyncapi").is_some()
  }

  fn normalize(&self, input: Value) -> Result<NormalizedDocument> {
    let version = input.get("asyncapi").and_then(Value::as_str).unwrap_or_default();
    let is_v3 = version.starts_with("3.");
    if !(version.starts_with("2.") || is_v3) {
      return Err(ModelgenError::input_format(format!(
        "unsupported AsyncAPI version '{version}'; expected 2.x or 3.x"
      )));
    }

    let mut collector = PayloadCollector::default();

    if let Some(Value::Object(schemas)) = input.pointer("/components/schemas") {
      for key in schemas.keys() {
        collector.push(child_pointer("/components/schemas", &[key]), key.clone());
      }
    }

    if let Some(Value::Object(messages)) = input.pointer("/components/messages") {
      for (key, message) in messages {
        let pointer = child_pointer("/components/messages", &[key]);
        collector.message(&input, message, &pointer, Some(key))?;
      }
    }

    if let Some(Value::Object(channels)) = input.get("channels") {
      for (channel, item) in channels {
        let channel_pointer = child_pointer("/channels", &[channel]);
        if is_v3 {
          if let Some(Value::Object(messages)) = item.get("messages") {
            for (key, message) in messages {
              let pointer = child_pointer(&channel_pointer, &["messages", key]);
              collector.message(&input, message, &pointer, Some(key))?;
            }
          }
        } else {
          for operation in ["publish", "subscribe"] {
            if let Some(message) = item.get(operation).and_then(|op| op.get("message")) {
              let pointer = child_pointer(&channel_pointer, &[operation, "message"]);
              collector.message(&input, message, &pointer, None)?;
            }
          }
        }
      }
    }

    Ok(NormalizedDocument {
      dialect: Dialect::AsyncApi,
      document: Arc::new(input),
      roots: collector.roots,
    })
  }
}
