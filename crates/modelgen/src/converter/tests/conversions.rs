use serde_json::{Value, json};

use super::meta_models;
use crate::{
  converter::{MetaModelConverter, convert_models},
  error::ModelgenError,
  models::{MetaKind, MetaModel, ModelArena, OriginalInput, PropertyKind, Variant},
};

fn root(document: Value) -> MetaModel {
  meta_models(document).entries()[0].model.clone()
}

fn property<'a>(model: &'a MetaModel, key: &str) -> &'a MetaModel {
  let MetaKind::Object(object) = &model.kind else {
    panic!("expected object, got {:?}", model.kind.variant());
  };
  &object.properties[key].model
}

#[test]
fn test_primitive_leaves() {
  let cases = [
    (json!({ "type": "string" }), Variant::String),
    (json!({ "type": "number" }), Variant::Float),
    (json!({ "type": "integer" }), Variant::Integer),
    (json!({ "type": "boolean" }), Variant::Boolean),
    (json!({}), Variant::Any),
    (json!({ "type": "null" }), Variant::Any),
  ];
  for (document, expected) in cases {
    assert_eq!(root(document.clone()).kind.variant(), expected, "failed for {document}");
  }
}

#[test]
fn test_string_or_null_is_nullable_string() {
  let model = root(json!({ "type": ["string", "null"] }));
  assert_eq!(model.kind, MetaKind::String);
  assert!(model.nullable);
}

#[test]
fn test_multi_type_becomes_positional_union() {
  let model = root(json!({ "type": ["string", "integer", "null"] }));
  let MetaKind::Union(members) = &model.kind else {
    panic!("expected union");
  };
  assert!(model.nullable);
  let names: Vec<_> = members.iter().map(|member| member.name.as_str()).collect();
  assert_eq!(names, vec!["root_string", "root_integer"]);
}

#[test]
fn test_every_type_is_any() {
  let model = root(json!({ "type": ["object", "array", "string", "number", "integer", "boolean"] }));
  assert_eq!(model.kind, MetaKind::Any);
}

#[test]
fn test_enum_values_are_not_coerced() {
  let model = root(json!({ "enum": ["a", 1, true] }));
  let MetaKind::Enum(values) = &model.kind else {
    panic!("expected enum");
  };
  let keys: Vec<_> = values.iter().map(|value| value.key.as_str()).collect();
  assert_eq!(keys, vec!["a", "1", "true"]);
  assert_eq!(values[1].value, json!(1));
}

#[test]
fn test_union_members_stay_positional_without_dedup() {
  let model = root(json!({ "oneOf": [{ "type": "string" }, { "type": "string" }, { "type": "number" }] }));
  let MetaKind::Union(members) = &model.kind else {
    panic!("expected union");
  };
  let variants: Vec<_> = members.iter().map(|member| member.kind.variant()).collect();
  assert_eq!(variants, vec![Variant::String, Variant::String, Variant::Float]);
}

#[test]
fn test_null_branch_folds_into_nullable() {
  let model = root(json!({ "anyOf": [{ "type": "integer" }, { "type": "null" }] }));
  assert_eq!(model.kind, MetaKind::Integer);
  assert!(model.nullable);
  assert_eq!(model.name, "root");
}

#[test]
fn test_object_properties_and_extras() {
  let model = root(json!({
    "type": "object",
    "properties": { "name": { "type": "string" } },
    "patternProperties": { "^x-": { "type": "integer" } },
    "additionalProperties": { "type": "boolean" },
    "required": ["name"]
  }));
  let MetaKind::Object(object) = &model.kind else {
    panic!("expected object");
  };
  let keys: Vec<_> = object.properties.keys().map(String::as_str).collect();
  assert_eq!(keys, vec!["name", "^x-_PatternProperty", "additionalProperties"]);
  assert!(object.properties["name"].required);
  assert_eq!(
    object.properties["^x-_PatternProperty"].kind,
    PropertyKind::Pattern {
      pattern: "^x-".to_string()
    }
  );
  assert_eq!(object.properties["additionalProperties"].kind, PropertyKind::Additional);
  let MetaKind::Dictionary { key, value } = &object.properties["additionalProperties"].model.kind else {
    panic!("expected dictionary");
  };
  assert_eq!(key.kind, MetaKind::String);
  assert_eq!(value.kind, MetaKind::Boolean);
}

#[test]
fn test_additional_properties_key_collision_gets_suffix() {
  let model = root(json!({
    "type": "object",
    "properties": { "additionalProperties": { "type": "string" } },
    "additionalProperties": { "type": "integer" }
  }));
  let MetaKind::Object(object) = &model.kind else {
    panic!("expected object");
  };
  assert!(object.properties.contains_key("additionalProperties_1"));
}

#[test]
fn test_only_additional_properties_is_dictionary() {
  let model = root(json!({ "additionalProperties": { "type": "string" } }));
  let MetaKind::Dictionary { value, .. } = &model.kind else {
    panic!("expected dictionary, got {:?}", model.kind.variant());
  };
  assert_eq!(value.kind, MetaKind::String);
}

#[test]
fn test_arrays_and_tuples() {
  let model = root(json!({ "type": "array" }));
  let MetaKind::Array(item) = &model.kind else {
    panic!("expected array");
  };
  assert_eq!(item.kind, MetaKind::Any);

  let model = root(json!({ "type": "array", "items": { "type": "string" }, "additionalItems": { "type": "number" } }));
  let MetaKind::Array(item) = &model.kind else {
    panic!("expected array");
  };
  assert_eq!(item.kind, MetaKind::String);

  let model = root(json!({
    "type": "array",
    "items": [{ "type": "string" }, { "type": "integer" }],
    "additionalItems": { "type": "boolean" }
  }));
  let MetaKind::Tuple(tuple) = &model.kind else {
    panic!("expected tuple");
  };
  assert_eq!(tuple.values.len(), 2);
  assert_eq!(tuple.rest.as_ref().map(|rest| rest.kind.clone()), Some(MetaKind::Boolean));
}

#[test]
fn test_promoted_children_become_references() {
  let models = meta_models(json!({
    "type": "object",
    "properties": { "address": { "type": "object", "properties": { "street": { "type": "string" } } } }
  }));
  assert_eq!(models.len(), 2);
  let root = &models.entries()[0].model;
  let address = property(root, "address");
  assert_eq!(address.kind, MetaKind::Reference(models.entries()[1].id));
  assert!(models.get(models.entries()[1].id).is_some());
}

#[test]
fn test_cycle_through_references_terminates() {
  let models = meta_models(json!({
    "type": "object",
    "properties": { "children": { "type": "array", "items": { "$ref": "#" } } }
  }));
  assert_eq!(models.len(), 1);
  let MetaKind::Array(item) = &property(&models.entries()[0].model, "children").kind else {
    panic!("expected array");
  };
  assert_eq!(item.kind, MetaKind::Reference(models.entries()[0].id));
}

#[test]
fn test_unsplit_cycle_fails_loudly() {
  let mut arena = ModelArena::new();
  let id = arena.allocate("Loop", OriginalInput::detached());
  arena.get_mut(id).add_type(crate::models::SchemaType::Object);
  arena.get_mut(id).properties.insert("again".to_string(), id);

  let err = MetaModelConverter::new(&arena).convert(id).unwrap_err();
  assert!(matches!(err, ModelgenError::UnsupportedConstruct { .. }));
  assert!(convert_models(&arena, &[id]).is_err());
}
