use serde_json::json;

use super::{child, process, process_with, root};
use crate::{
  generator::GenerationWarning,
  interpreter::InterpreterOptions,
  models::{Items, SchemaType},
};

#[test]
fn test_absent_type_is_any() {
  let input = process(json!({}));
  assert!(root(&input).types.is_empty());
  assert_eq!(root(&input).name, "root");
}

#[test]
fn test_properties_imply_object() {
  let input = process(json!({ "properties": { "email": { "type": "string" } }, "required": ["email"] }));
  let model = root(&input);
  assert!(model.has_type(SchemaType::Object));
  assert!(model.is_required("email"));
  let email = child(&input, model.properties["email"]);
  assert_eq!(email.concrete_types(), vec![SchemaType::String]);
  assert_eq!(email.name, "email");
}

#[test]
fn test_items_imply_array_and_tuple_form() {
  let input = process(json!({ "items": { "type": "string" } }));
  assert!(root(&input).has_type(SchemaType::Array));
  assert!(matches!(root(&input).items, Some(Items::Single(_))));

  let input = process(json!({
    "type": "array",
    "items": [{ "type": "string" }, { "type": "number" }],
    "additionalItems": { "type": "boolean" }
  }));
  let Some(Items::Tuple(slots)) = &root(&input).items else {
    panic!("expected tuple items");
  };
  assert_eq!(slots.len(), 2);
  assert!(root(&input).additional_items.is_some());
}

#[test]
fn test_ignore_additional_items_option() {
  let options = InterpreterOptions::builder().ignore_additional_items(true).build();
  let input = process_with(
    json!({ "type": "array", "items": [{ "type": "string" }], "additionalItems": true }),
    &options,
  );
  assert!(root(&input).additional_items.is_none());
}

#[test]
fn test_all_of_merges_properties_and_required() {
  let input = process(json!({
    "allOf": [
      { "type": "object", "properties": { "a": { "type": "string" } }, "required": ["a"] },
      { "type": "object", "properties": { "b": { "type": "integer" } } }
    ]
  }));
  let model = root(&input);
  assert!(model.has_type(SchemaType::Object));
  assert_eq!(model.properties.keys().collect::<Vec<_>>(), vec!["a", "b"]);
  assert!(model.is_required("a"));
}

#[test]
fn test_conflicting_all_of_properties_merge_without_touching_shared_nodes() {
  let input = process(json!({
    "definitions": { "Shared": { "type": "string" } },
    "type": "object",
    "properties": { "value": { "$ref": "#/definitions/Shared" } },
    "allOf": [{ "properties": { "value": { "type": "null" } } }]
  }));
  let model = root(&input);
  let merged = child(&input, model.properties["value"]);
  assert!(merged.has_type(SchemaType::String));
  assert!(merged.has_type(SchemaType::Null));

  let shared = input
    .arena
    .iter()
    .find(|node| node.original.pointer() == "/definitions/Shared")
    .expect("shared definition interpreted");
  assert!(!shared.has_type(SchemaType::Null));
}

#[test]
fn test_then_else_do_not_adopt_required() {
  let input = process(json!({
    "type": "object",
    "if": { "properties": { "kind": { "const": "a" } } },
    "then": { "properties": { "a": { "type": "string" } }, "required": ["a"] },
    "else": { "properties": { "b": { "type": "string" } } }
  }));
  let model = root(&input);
  assert!(model.properties.contains_key("a"));
  assert!(model.properties.contains_key("b"));
  assert!(!model.is_required("a"));
}

#[test]
fn test_one_of_and_any_of_become_union_candidates_in_order() {
  let input = process(json!({
    "oneOf": [{ "type": "string" }, { "type": "number" }],
    "anyOf": [{ "type": "boolean" }]
  }));
  let kinds: Vec<_> = root(&input)
    .union
    .iter()
    .map(|id| child(&input, *id).concrete_types())
    .collect();
  assert_eq!(
    kinds,
    vec![vec![SchemaType::String], vec![SchemaType::Number], vec![SchemaType::Boolean]]
  );
}

#[test]
fn test_one_of_with_properties_merges_shared_shape_into_branches() {
  let input = process(json!({
    "type": "object",
    "properties": { "id": { "type": "string" } },
    "oneOf": [
      { "type": "object", "properties": { "cat": { "type": "boolean" } } },
      { "type": "object", "properties": { "dog": { "type": "boolean" } } }
    ]
  }));
  let model = root(&input);
  assert_eq!(model.union.len(), 2);
  for branch in &model.union {
    assert!(child(&input, *branch).properties.contains_key("id"));
  }
}

#[test]
fn test_any_of_with_properties_merges_shared_shape_into_branches() {
  let input = process(json!({
    "type": "object",
    "properties": { "id": { "type": "string" } },
    "required": ["id"],
    "anyOf": [
      { "type": "object", "properties": { "a": { "type": "string" } } },
      { "type": "object", "properties": { "b": { "type": "string" } } }
    ]
  }));
  let model = root(&input);
  assert_eq!(model.union.len(), 2);
  for branch in &model.union {
    let branch = child(&input, *branch);
    assert!(branch.properties.contains_key("id"));
    assert!(branch.is_required("id"));
  }
  assert!(input.warnings.is_empty());
}

#[test]
fn test_recursive_branch_reports_ignored_siblings() {
  let input = process(json!({
    "type": "object",
    "properties": { "id": { "type": "string" } },
    "anyOf": [{ "$ref": "#" }, { "type": "object" }]
  }));
  let model = root(&input);
  assert!(child(&input, model.union[0]).is_reference());
  assert!(child(&input, model.union[1]).properties.contains_key("id"));
  assert!(input.warnings.iter().any(|warning| matches!(
    warning,
    GenerationWarning::UnionSiblingIgnored { keyword, .. } if keyword == "anyOf"
  )));
}

#[test]
fn test_const_becomes_single_value_enum() {
  let input = process(json!({ "const": "fixed" }));
  assert_eq!(root(&input).enum_values, vec![json!("fixed")]);
}

#[test]
fn test_mixed_enum_values_are_kept_verbatim() {
  let input = process(json!({ "enum": ["a", 1, true, null, "a"] }));
  assert_eq!(root(&input).enum_values, vec![json!("a"), json!(1), json!(true), json!(null)]);
}

#[test]
fn test_not_removes_types() {
  let input = process(json!({ "type": ["string", "number"], "not": { "type": "number" } }));
  assert_eq!(root(&input).concrete_types(), vec![SchemaType::String]);
}

#[test]
fn test_nullable_keyword_adds_null() {
  let input = process(json!({ "type": "string", "nullable": true }));
  assert!(root(&input).is_nullable());

  let input = process(json!({ "nullable": true }));
  assert!(root(&input).types.is_empty());
}

#[test]
fn test_boolean_schemas() {
  let input = process(json!({
    "type": "object",
    "properties": { "anything": true, "nothing": false },
    "additionalProperties": false
  }));
  let model = root(&input);
  assert!(model.properties.contains_key("anything"));
  assert!(!model.properties.contains_key("nothing"));
  assert!(child(&input, model.properties["anything"]).types.is_empty());
  assert!(model.additional_properties.is_none());
}

#[test]
fn test_additional_properties_true_is_any_node() {
  let input = process(json!({ "type": "object", "additionalProperties": true }));
  let additional = root(&input).additional_properties.expect("additional properties node");
  assert!(child(&input, additional).types.is_empty());

  let options = InterpreterOptions::builder().ignore_additional_properties(true).build();
  let input = process_with(json!({ "type": "object", "additionalProperties": true }), &options);
  assert!(root(&input).additional_properties.is_none());
}

#[test]
fn test_title_wins_over_id_and_inferred_name() {
  let input = process(json!({
    "type": "object",
    "properties": {
      "a": { "type": "object", "title": "Titled", "$id": "IdName" },
      "b": { "type": "object", "$id": "IdOnly" },
      "c": { "type": "object" }
    }
  }));
  let model = root(&input);
  assert_eq!(child(&input, model.properties["a"]).name, "Titled");
  assert_eq!(child(&input, model.properties["a"]).schema_id.as_deref(), Some("IdName"));
  assert_eq!(child(&input, model.properties["b"]).name, "IdOnly");
  assert_eq!(child(&input, model.properties["c"]).name, "c");
}

#[test]
fn test_inferred_names_follow_location() {
  let input = process(json!({
    "type": "object",
    "properties": {
      "address": { "type": "object", "properties": { "street": { "type": "object" } } },
      "tags": { "type": "array", "items": { "type": "object" } }
    }
  }));
  let model = root(&input);
  let address = child(&input, model.properties["address"]);
  assert_eq!(child(&input, address.properties["street"]).name, "address_street");
  let tags = child(&input, model.properties["tags"]);
  let Some(Items::Single(item)) = tags.items else {
    panic!("expected single items");
  };
  assert_eq!(child(&input, item).name, "tags_item");
}

#[test]
fn test_original_input_exposes_extensions() {
  let input = process(json!({
    "type": "object",
    "properties": { "meta": { "type": "object", "x-custom-type": "dictionary" } }
  }));
  let meta = child(&input, root(&input).properties["meta"]);
  assert_eq!(meta.original.pointer(), "/properties/meta");
  assert_eq!(meta.original.lookup_extension_str("x-custom-type"), Some("dictionary"));
}

#[test]
fn test_interpreter_options_reject_unknown_fields() {
  let err = InterpreterOptions::from_json(json!({ "ignore_everything": true })).unwrap_err();
  assert!(matches!(err, crate::error::ModelgenError::InvalidOptions(_)));

  let options = InterpreterOptions::from_json(json!({ "allow_inline_enums": true })).unwrap();
  assert!(options.allow_inline_enums);
}
