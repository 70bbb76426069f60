use serde_json::json;

use super::{output, render};
use crate::{
  error::{ModelgenError, Result},
  generator::{LanguageGenerator, ModelPipeline},
  input::RawInput,
  languages::typescript::{TsEnumType, TsMapType, TsModelType, TypeScriptGenerator, TypeScriptOptions},
  models::Variant,
  renderer::{HookContext, HookOutcome, Preset, PresetEntry},
};

fn generator(model_type: TsModelType) -> TypeScriptGenerator {
  TypeScriptGenerator::new(TypeScriptOptions::builder().model_type(model_type).build())
}

#[test]
fn test_interface_with_optional_string() {
  let outputs = render(
    &generator(TsModelType::Interface),
    json!({ "type": "object", "properties": { "email": { "type": "string" } } }),
  );
  assert_eq!(outputs.len(), 1);
  assert_eq!(outputs[0].model_name, "Root");
  assert_eq!(outputs[0].result, "export interface Root {\n  email?: string;\n}");
  assert!(outputs[0].dependencies.is_empty());
}

#[test]
fn test_class_with_accessors() {
  let outputs = render(
    &TypeScriptGenerator::default(),
    json!({ "type": "object", "properties": { "name": { "type": "string" } }, "required": ["name"] }),
  );
  insta::assert_snapshot!(outputs[0].result, @r"
  export class Root {
    private _name: string;

    constructor(input: {
      name: string,
    }) {
      this._name = input.name;
    }

    get name(): string { return this._name; }
    set name(name: string) { this._name = name; }
  }
  ");
}

#[test]
fn test_type_alias_for_objects() {
  let outputs = render(
    &generator(TsModelType::Type),
    json!({ "type": "object", "properties": { "count": { "type": "integer" } }, "required": ["count"] }),
  );
  assert_eq!(outputs[0].result, "export type Root = {\n  count: number;\n};");
}

#[test]
fn test_enum_styles() {
  let document = json!({ "title": "Status", "enum": ["available", "sold_out"] });

  let outputs = render(&TypeScriptGenerator::default(), document.clone());
  assert_eq!(
    outputs[0].result,
    "export enum Status {\n  AVAILABLE = \"available\",\n  SOLD_OUT = \"sold_out\",\n}"
  );

  let options = TypeScriptOptions::builder().enum_type(TsEnumType::Union).build();
  let outputs = render(&TypeScriptGenerator::new(options), document);
  assert_eq!(outputs[0].result, "export type Status = \"available\" | \"sold_out\";");
}

#[test]
fn test_map_types() {
  let document = json!({ "additionalProperties": { "type": "integer" } });
  let cases = [
    (TsMapType::Map, "export type Root = Map<string, number>;"),
    (TsMapType::Record, "export type Root = Record<string, number>;"),
    (TsMapType::IndexedObject, "export type Root = { [name: string]: number };"),
  ];
  for (map_type, expected) in cases {
    let options = TypeScriptOptions::builder().map_type(map_type).build();
    let outputs = render(&TypeScriptGenerator::new(options), document.clone());
    assert_eq!(outputs[0].result, expected, "failed for {map_type}");
  }
}

#[test]
fn test_nullable_and_union_properties() {
  let outputs = render(
    &generator(TsModelType::Interface),
    json!({
      "type": "object",
      "properties": {
        "nick": { "type": ["string", "null"] },
        "ids": { "type": "array", "items": { "type": ["string", "integer"] } }
      }
    }),
  );
  assert_eq!(
    outputs[0].result,
    "export interface Root {\n  nick?: string | null;\n  ids?: (string | number)[];\n}"
  );
}

#[test]
fn test_references_import_their_target() {
  let outputs = render(
    &generator(TsModelType::Interface),
    json!({
      "type": "object",
      "properties": {
        "address": { "type": "object", "properties": { "street": { "type": "string" } } },
        "parent": { "$ref": "#" }
      }
    }),
  );
  let root = output(&outputs, "Root");
  assert_eq!(root.dependencies, vec!["import { Address } from './Address';".to_string()]);
  assert_eq!(
    root.result,
    "export interface Root {\n  address?: Address;\n  parent?: Root;\n}"
  );
  assert_eq!(
    output(&outputs, "Address").result,
    "export interface Address {\n  street?: string;\n}"
  );
}

#[test]
fn test_object_in_type_array_is_declared_on_its_own() {
  let outputs = render(
    &generator(TsModelType::Interface),
    json!({
      "type": "object",
      "properties": {
        "value": { "type": ["object", "string"], "properties": { "a": { "type": "string" } } }
      }
    }),
  );
  let mut names: Vec<_> = outputs.iter().map(|output| output.model_name.as_str()).collect();
  names.sort_unstable();
  assert_eq!(names, vec!["Root", "Value", "ValueObject"]);

  let value = output(&outputs, "Value");
  assert_eq!(value.result, "export type Value = ValueObject | string;");
  assert_eq!(value.dependencies, vec!["import { ValueObject } from './ValueObject';".to_string()]);
  assert_eq!(
    output(&outputs, "ValueObject").result,
    "export interface ValueObject {\n  a?: string;\n}"
  );
}

#[test]
fn test_description_becomes_jsdoc() {
  let outputs = render(
    &generator(TsModelType::Interface),
    json!({ "type": "object", "description": "A person.", "properties": {} }),
  );
  assert_eq!(outputs[0].result, "/**\n * A person.\n */\nexport interface Root {}");
}

struct CustomTypePreset;

impl Preset for CustomTypePreset {
  fn property(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let Some(property) = ctx.property() else {
      return Ok(HookOutcome::PassThrough);
    };
    if ctx.original().lookup_extension_str("x-custom-type") == Some("dictionary") {
      return Ok(HookOutcome::Replace(format!(
        "{}?: Map<string, any>;",
        property.property_name
      )));
    }
    Ok(HookOutcome::PassThrough)
  }
}

#[test]
fn test_vendor_extension_preset_overrides_one_property() {
  let generator = generator(TsModelType::Interface).with_preset(PresetEntry::new(CustomTypePreset));
  let outputs = render(
    &generator,
    json!({
      "type": "object",
      "properties": {
        "name": { "type": "string" },
        "tags": { "x-custom-type": "dictionary" }
      }
    }),
  );
  assert_eq!(
    outputs[0].result,
    "export interface Root {\n  name?: string;\n  tags?: Map<string, any>;\n}"
  );
}

#[test]
fn test_options_load_from_json() {
  let generator = TypeScriptGenerator::from_json(json!({ "model_type": "interface", "map_type": "record" }))
    .expect("options should load");
  assert_eq!(generator.options().model_type, TsModelType::Interface);
  assert_eq!(generator.options().map_type, TsMapType::Record);
  assert_eq!(generator.options().enum_type, TsEnumType::Enum);

  let err = TypeScriptGenerator::from_json(json!({ "model_type": "interface", "colour": "blue" }))
    .err()
    .expect("unknown option should be rejected");
  assert!(matches!(err, ModelgenError::InvalidOptions(ref message) if message.contains("colour")));
}

#[test]
fn test_naming_convention_option() {
  let generator = TypeScriptGenerator::from_json(json!({
    "model_type": "interface",
    "naming_convention": { "property_key": "snake" }
  }))
  .expect("options should load");
  let outputs = render(
    &generator,
    json!({ "type": "object", "properties": { "firstName": { "type": "string" } } }),
  );
  assert_eq!(outputs[0].result, "export interface Root {\n  first_name?: string;\n}");
}

#[test]
fn test_removed_mapping_case_is_reported() {
  let generator = generator(TsModelType::Interface).with_type_mapping(|mapping| mapping.without(Variant::String));
  let err = ModelPipeline::default()
    .generate(
      RawInput::Value(json!({ "type": "object", "properties": { "name": { "type": "string" } } })),
      &generator,
    )
    .unwrap_err();
  assert!(matches!(err, ModelgenError::UnsupportedConstruct { ref language, .. } if language == "typescript"));
  assert_eq!(generator.language().to_string(), "typescript");
}

#[test]
fn test_reserved_property_names() {
  let outputs = render(
    &generator(TsModelType::Interface),
    json!({ "type": "object", "properties": { "delete": { "type": "boolean" } } }),
  );
  assert_eq!(outputs[0].result, "export interface Root {\n  reservedDelete?: boolean;\n}");
}
