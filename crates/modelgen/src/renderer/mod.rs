//! Preset engine shared by every language backend.
//!
//! Each renderable construct goes through one [`HookKind`]. The hook's implementations run in
//! chain order: the language's default preset first, then the user presets in configuration
//! order. An implementation either passes the accumulated content through or replaces it, so
//! the last preset that replaces decides what gets emitted.

#[cfg(test)]
mod tests;

use std::{cell::RefCell, fmt, sync::Arc};

use indexmap::IndexSet;
use serde_json::Value;
use strum::{Display, EnumIter};

use crate::{
  error::Result,
  models::{ConstrainedEnumValue, ConstrainedMetaModel, ConstrainedProperty, OriginalInput},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum HookKind {
  /// The whole model, declaration included.
  Model,
  /// Trailing content inside the model body.
  AdditionalContent,
  Property,
  Ctor,
  Getter,
  Setter,
  /// One enum member.
  Item,
  /// Attributes, decorators or derives placed before a declaration.
  Annotations,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookOutcome {
  /// Keep whatever the previous presets produced.
  PassThrough,
  /// Use this content instead. An empty string is a valid replacement.
  Replace(String),
}

/// What a hook invocation is about.
#[derive(Debug, Clone, Copy)]
pub enum HookTarget<'a> {
  Model,
  Property(&'a ConstrainedProperty),
  Item(&'a ConstrainedEnumValue),
}

/// Everything a preset sees during one hook invocation.
pub struct HookContext<'a> {
  pub scope: &'a RenderScope<'a>,
  pub target: HookTarget<'a>,
  /// Content accumulated by the presets that ran before this one.
  pub previous: &'a str,
  /// The options this preset was registered with.
  pub options: &'a Value,
}

impl<'a> HookContext<'a> {
  /// The standalone model being rendered.
  pub fn model(&self) -> &'a ConstrainedMetaModel {
    self.scope.model()
  }

  pub fn property(&self) -> Option<&'a ConstrainedProperty> {
    match self.target {
      HookTarget::Property(property) => Some(property),
      _ => None,
    }
  }

  pub fn item(&self) -> Option<&'a ConstrainedEnumValue> {
    match self.target {
      HookTarget::Item(item) => Some(item),
      _ => None,
    }
  }

  /// Raw schema node of the target: the property's schema for property hooks, the model's
  /// otherwise.
  pub fn original(&self) -> &'a OriginalInput {
    match self.target {
      HookTarget::Property(property) => &property.model.original,
      HookTarget::Model | HookTarget::Item(_) => &self.model().original,
    }
  }

  pub fn lookup_extension(&self, key: &str) -> Option<&'a Value> {
    self.original().lookup_extension(key)
  }

  pub fn option_str(&self, key: &str) -> Option<&'a str> {
    self.options.get(key).and_then(Value::as_str)
  }
}

/// A set of hook implementations. Unimplemented hooks pass through.
pub trait Preset: Send + Sync {
  fn name(&self) -> &str {
    "preset"
  }

  fn model(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }

  fn additional_content(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }

  fn property(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }

  fn ctor(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }

  fn getter(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }

  fn setter(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }

  fn item(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }

  fn annotations(&self, _ctx: &HookContext<'_>) -> Result<HookOutcome> {
    Ok(HookOutcome::PassThrough)
  }
}

fn invoke(preset: &dyn Preset, kind: HookKind, ctx: &HookContext<'_>) -> Result<HookOutcome> {
  match kind {
    HookKind::Model => preset.model(ctx),
    HookKind::AdditionalContent => preset.additional_content(ctx),
    HookKind::Property => preset.property(ctx),
    HookKind::Ctor => preset.ctor(ctx),
    HookKind::Getter => preset.getter(ctx),
    HookKind::Setter => preset.setter(ctx),
    HookKind::Item => preset.item(ctx),
    HookKind::Annotations => preset.annotations(ctx),
  }
}

/// A preset plus the options it is invoked with.
#[derive(Clone)]
pub struct PresetEntry {
  pub preset: Arc<dyn Preset>,
  pub options: Value,
}

impl PresetEntry {
  pub fn new(preset: impl Preset + 'static) -> Self {
    Self {
      preset: Arc::new(preset),
      options: Value::Null,
    }
  }

  #[must_use]
  pub fn with_options(mut self, options: Value) -> Self {
    self.options = options;
    self
  }
}

impl fmt::Debug for PresetEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("PresetEntry")
      .field("preset", &self.preset.name())
      .field("options", &self.options)
      .finish()
  }
}

/// Ordered presets of one generator, default preset first.
#[derive(Debug, Clone)]
pub struct PresetChain {
  entries: Vec<PresetEntry>,
}

impl PresetChain {
  pub fn new(default: PresetEntry) -> Self {
    Self { entries: vec![default] }
  }

  #[must_use]
  pub fn with(mut self, entry: PresetEntry) -> Self {
    self.entries.push(entry);
    self
  }

  #[must_use]
  pub fn with_all(mut self, entries: impl IntoIterator<Item = PresetEntry>) -> Self {
    self.entries.extend(entries);
    self
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}

/// Rendering state for one standalone model.
pub struct RenderScope<'a> {
  language: &'a str,
  chain: &'a PresetChain,
  model: &'a ConstrainedMetaModel,
  dependencies: RefCell<IndexSet<String>>,
}

impl<'a> RenderScope<'a> {
  pub fn new(language: &'a str, chain: &'a PresetChain, model: &'a ConstrainedMetaModel) -> Self {
    Self {
      language,
      chain,
      model,
      dependencies: RefCell::new(model.dependencies.clone()),
    }
  }

  pub fn language(&self) -> &'a str {
    self.language
  }

  pub fn model(&self) -> &'a ConstrainedMetaModel {
    self.model
  }

  /// Runs every preset of the chain for `kind`, starting from empty content.
  pub fn run(&self, kind: HookKind, target: HookTarget<'_>) -> Result<String> {
    let mut content = String::new();
    for entry in &self.chain.entries {
      let ctx = HookContext {
        scope: self,
        target,
        previous: &content,
        options: &entry.options,
      };
      if let HookOutcome::Replace(replacement) = invoke(entry.preset.as_ref(), kind, &ctx)? {
        content = replacement;
      }
    }
    Ok(content)
  }

  pub fn render_model(&self) -> Result<String> {
    self.run(HookKind::Model, HookTarget::Model)
  }

  /// Runs `kind` once per property, dropping empty results.
  pub fn render_properties<'p>(
    &self,
    kind: HookKind,
    properties: impl IntoIterator<Item = &'p ConstrainedProperty>,
  ) -> Result<Vec<String>> {
    let mut rendered = Vec::new();
    for property in properties {
      let content = self.run(kind, HookTarget::Property(property))?;
      if !content.is_empty() {
        rendered.push(content);
      }
    }
    Ok(rendered)
  }

  pub fn render_items<'i>(&self, items: impl IntoIterator<Item = &'i ConstrainedEnumValue>) -> Result<Vec<String>> {
    let mut rendered = Vec::new();
    for item in items {
      let content = self.run(HookKind::Item, HookTarget::Item(item))?;
      if !content.is_empty() {
        rendered.push(content);
      }
    }
    Ok(rendered)
  }

  /// Registers an extra dependency line for the rendered file.
  pub fn add_dependency(&self, dependency: impl Into<String>) {
    self.dependencies.borrow_mut().insert(dependency.into());
  }

  pub fn into_dependencies(self) -> Vec<String> {
    self.dependencies.into_inner().into_iter().collect()
  }
}

/// Indents every non-empty line of `content` by `width` spaces.
pub fn indent(content: &str, width: usize) -> String {
  let padding = " ".repeat(width);
  content
    .lines()
    .map(|line| {
      if line.is_empty() {
        String::new()
      } else {
        format!("{padding}{line}")
      }
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Renders `header { body }` with `body` indented, collapsing to `header {}` when empty.
pub fn block(header: &str, body: &[String], width: usize) -> String {
  if body.is_empty() {
    return format!("{header} {{}}");
  }
  format!("{header} {{\n{}\n}}", indent(&body.join("\n"), width))
}

/// Splits a description into comment lines carrying `prefix`.
pub fn comment_lines(text: &str, prefix: &str) -> Vec<String> {
  text
    .lines()
    .map(|line| {
      if line.trim().is_empty() {
        prefix.trim_end().to_string()
      } else {
        format!("{prefix}{}", line.trim_end())
      }
    })
    .collect()
}
