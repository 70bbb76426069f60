use serde_json::json;

use super::{meta_models, test_constraints, test_mapping};
use crate::{
  constrainer::{NameCategory, NamingConvention, constrain_models},
  models::{ConstrainedKind, ConstrainedMetaModel},
  naming::{NamingCase, Stage},
};

fn constrained(document: serde_json::Value) -> Vec<ConstrainedMetaModel> {
  constrain_models("test", &test_constraints(), &test_mapping(), &meta_models(document)).expect("should constrain")
}

fn property_names(model: &ConstrainedMetaModel) -> Vec<&str> {
  let ConstrainedKind::Object(object) = &model.kind else {
    panic!("expected object, got {:?}", model.kind.variant());
  };
  object.properties.keys().map(String::as_str).collect()
}

#[test]
fn test_model_names_share_one_scope() {
  let models = constrained(json!({
    "title": "pet",
    "type": "object",
    "properties": {
      "owner": { "title": "Pet", "type": "object", "properties": { "id": { "type": "integer" } } }
    }
  }));
  let names: Vec<_> = models.iter().map(|model| model.name.as_str()).collect();
  assert_eq!(names, vec!["Pet", "ReservedPet"]);
}

#[test]
fn test_reserved_model_name() {
  let models = constrained(json!({ "title": "return", "type": "object" }));
  assert_eq!(models[0].name, "ReservedReturn");
  assert_eq!(models[0].type_name, "ReservedReturn");
}

#[test]
fn test_property_keys_are_scoped_per_model() {
  let models = constrained(json!({
    "type": "object",
    "properties": {
      "first name": { "type": "string" },
      "first_name": { "type": "string" },
      "class": { "type": "string" },
      "child": { "type": "object", "properties": { "first name": { "type": "string" } } }
    }
  }));
  assert_eq!(property_names(&models[0]), vec!["firstName", "firstName1", "reservedClass", "child"]);
  assert_eq!(property_names(&models[1]), vec!["firstName"]);
}

#[test]
fn test_unconstrained_name_is_kept() {
  let models = constrained(json!({
    "type": "object",
    "properties": { "first name": { "type": "string" } },
    "required": ["first name"]
  }));
  let ConstrainedKind::Object(object) = &models[0].kind else {
    panic!("expected object");
  };
  let property = &object.properties["firstName"];
  assert_eq!(property.unconstrained_name, "first name");
  assert!(property.required);
}

#[test]
fn test_enum_keys_and_values() {
  let models = constrained(json!({ "enum": ["in stock", 1, true, "in-stock"] }));
  let ConstrainedKind::Enum(values) = &models[0].kind else {
    panic!("expected enum");
  };
  let keys: Vec<_> = values.iter().map(|value| value.key.as_str()).collect();
  assert_eq!(keys[0], "IN_STOCK");
  assert_eq!(keys[1], "NUMBER_1");
  assert_eq!(keys[2], "TRUE");
  assert_ne!(keys[3], keys[0]);
  assert_eq!(values[0].value, "\"in stock\"");
  assert_eq!(values[1].value, "1");
  assert_eq!(values[1].raw, json!(1));
}

#[test]
fn test_stage_override_keeps_other_stages() {
  let constraints = test_constraints().with_stage(NameCategory::PropertyKey, Stage::NamingFormat, |value| {
    value.to_uppercase()
  });
  let models = constrain_models(
    "test",
    &constraints,
    &test_mapping(),
    &meta_models(json!({ "type": "object", "properties": { "9lives": { "type": "string" } } })),
  )
  .expect("should constrain");
  assert_eq!(property_names(&models[0]), vec!["NUMBER_9LIVES"]);
}

#[test]
fn test_naming_convention_overrides_case() {
  let convention = NamingConvention {
    property_key: Some(NamingCase::Snake),
    enum_value: Some(NamingCase::Constant),
    ..NamingConvention::default()
  };
  let constraints = test_constraints().with_naming_convention(&convention);
  let models = constrain_models(
    "test",
    &constraints,
    &test_mapping(),
    &meta_models(json!({
      "type": "object",
      "properties": {
        "firstName": { "type": "string" },
        "status": { "enum": ["on hold"] }
      }
    })),
  )
  .expect("should constrain");
  assert_eq!(property_names(&models[0]), vec!["first_name", "status"]);
  let ConstrainedKind::Enum(values) = &models[1].kind else {
    panic!("expected enum");
  };
  assert_eq!(values[0].value, "\"ON_HOLD\"");
}

#[test]
fn test_naming_convention_rejects_unknown_fields() {
  let result = serde_json::from_value::<NamingConvention>(json!({ "model": "pascal" }));
  assert!(result.is_err());
}
