use serde_json::json;

use super::{SketchPreset, pet_model};
use crate::{
  error::Result,
  renderer::{HookContext, HookKind, HookOutcome, HookTarget, Preset, PresetChain, PresetEntry, RenderScope},
};

/// Renders dictionary-flagged properties as `Map<string, any>`.
struct CustomTypePreset;

impl Preset for CustomTypePreset {
  fn property(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    match ctx.lookup_extension("x-custom-type").and_then(|value| value.as_str()) {
      Some("dictionary") => {
        let Some(property) = ctx.property() else {
          return Ok(HookOutcome::PassThrough);
        };
        Ok(HookOutcome::Replace(format!("{}: Map<string, any>", property.property_name)))
      }
      _ => Ok(HookOutcome::PassThrough),
    }
  }
}

/// Wraps whatever came before in the configured marker.
struct WrapPreset;

impl Preset for WrapPreset {
  fn model(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
    let marker = ctx.option_str("marker").unwrap_or("?");
    Ok(HookOutcome::Replace(format!("{marker}{}{marker}", ctx.previous)))
  }
}

struct SilencePreset;

impl Preset for SilencePreset {
  fn property(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::Replace(String::new()))
  }
}

#[test]
fn test_default_preset_alone() {
  let model = pet_model();
  let chain = PresetChain::new(PresetEntry::new(SketchPreset));
  let rendered = RenderScope::new("sketch", &chain, &model).render_model().unwrap();
  assert_eq!(rendered, "model Pet {\n  name: string\n  tags: any\n}");
}

#[test]
fn test_extension_preset_only_touches_flagged_property() {
  let model = pet_model();
  let chain = PresetChain::new(PresetEntry::new(SketchPreset)).with(PresetEntry::new(CustomTypePreset));
  let rendered = RenderScope::new("sketch", &chain, &model).render_model().unwrap();
  assert_eq!(rendered, "model Pet {\n  name: string\n  tags: Map<string, any>\n}");
}

#[test]
fn test_presets_apply_in_chain_order() {
  let model = pet_model();
  let chain = PresetChain::new(PresetEntry::new(SketchPreset))
    .with(PresetEntry::new(WrapPreset).with_options(json!({ "marker": "<" })))
    .with(PresetEntry::new(WrapPreset).with_options(json!({ "marker": "[" })));
  let scope = RenderScope::new("sketch", &chain, &model);
  let rendered = scope.run(HookKind::Model, HookTarget::Model).unwrap();
  assert!(rendered.starts_with("[<model Pet {"));
  assert!(rendered.ends_with("}<["));
}

#[test]
fn test_empty_replacement_drops_content() {
  let model = pet_model();
  let chain = PresetChain::new(PresetEntry::new(SketchPreset)).with(PresetEntry::new(SilencePreset));
  let rendered = RenderScope::new("sketch", &chain, &model).render_model().unwrap();
  assert_eq!(rendered, "model Pet {}");
}

#[test]
fn test_unimplemented_hooks_produce_nothing() {
  let model = pet_model();
  let chain = PresetChain::new(PresetEntry::new(SketchPreset));
  let scope = RenderScope::new("sketch", &chain, &model);
  assert_eq!(scope.run(HookKind::Getter, HookTarget::Model).unwrap(), "");
  assert_eq!(chain.len(), 1);
}

#[test]
fn test_presets_register_dependencies() {
  struct ImportPreset;
  impl Preset for ImportPreset {
    fn model(&self, ctx: &HookContext<'_>) -> Result<HookOutcome> {
      ctx.scope.add_dependency("import { Extra } from './Extra';");
      Ok(HookOutcome::PassThrough)
    }
  }

  let model = pet_model();
  let chain = PresetChain::new(PresetEntry::new(SketchPreset)).with(PresetEntry::new(ImportPreset));
  let scope = RenderScope::new("sketch", &chain, &model);
  scope.render_model().unwrap();
  assert_eq!(scope.into_dependencies(), vec!["import { Extra } from './Extra';".to_string()]);
}
