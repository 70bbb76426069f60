use std::{fmt, sync::Arc};

use crate::{
  error::{ModelgenError, Result},
  models::{ConstrainedMetaModel, Variant},
};

/// What a type-mapping case sees when resolving one model.
#[derive(Debug, Clone, Copy)]
pub struct TypeContext<'a> {
  /// The model being mapped; every child already carries its own `type_name`.
  pub model: &'a ConstrainedMetaModel,
  /// Constrained name of the standalone model this one belongs to.
  pub owner: &'a str,
  /// Whether `model` is the standalone model itself rather than something nested in it.
  pub standalone: bool,
  /// Constrained key of the property holding `model`, if any.
  pub property_key: Option<&'a str>,
}

/// A resolved type spelling plus the declarations it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedType {
  pub type_name: String,
  pub dependencies: Vec<String>,
}

impl MappedType {
  pub fn new(type_name: impl Into<String>) -> Self {
    Self {
      type_name: type_name.into(),
      dependencies: Vec::new(),
    }
  }

  #[must_use]
  pub fn with_dependency(mut self, dependency: impl Into<String>) -> Self {
    self.dependencies.push(dependency.into());
    self
  }
}

impl From<String> for MappedType {
  fn from(type_name: String) -> Self {
    Self::new(type_name)
  }
}

impl From<&str> for MappedType {
  fn from(type_name: &str) -> Self {
    Self::new(type_name)
  }
}

pub type TypeMapFn = Arc<dyn Fn(&TypeContext<'_>) -> Result<MappedType> + Send + Sync>;

/// One mapping case per [`Variant`]. A removed case is reported, never papered over.
#[derive(Clone, Default)]
pub struct TypeMapping {
  object: Option<TypeMapFn>,
  array: Option<TypeMapFn>,
  tuple: Option<TypeMapFn>,
  union: Option<TypeMapFn>,
  enumeration: Option<TypeMapFn>,
  dictionary: Option<TypeMapFn>,
  reference: Option<TypeMapFn>,
  string: Option<TypeMapFn>,
  float: Option<TypeMapFn>,
  integer: Option<TypeMapFn>,
  boolean: Option<TypeMapFn>,
  any: Option<TypeMapFn>,
}

impl TypeMapping {
  /// A mapping without any case.
  pub fn empty() -> Self {
    Self::default()
  }

  #[must_use]
  pub fn with(
    mut self,
    variant: Variant,
    case: impl Fn(&TypeContext<'_>) -> Result<MappedType> + Send + Sync + 'static,
  ) -> Self {
    *self.slot_mut(variant) = Some(Arc::new(case));
    self
  }

  #[must_use]
  pub fn without(mut self, variant: Variant) -> Self {
    *self.slot_mut(variant) = None;
    self
  }

  pub fn has(&self, variant: Variant) -> bool {
    self.slot(variant).is_some()
  }

  /// Resolves the type of `context.model`.
  ///
  /// # Errors
  ///
  /// [`ModelgenError::UnsupportedConstruct`] when no case is registered for the model's
  /// variant, or whatever the case itself reports.
  pub fn map(&self, language: &str, context: &TypeContext<'_>) -> Result<MappedType> {
    let variant = context.model.kind.variant();
    match self.slot(variant) {
      Some(case) => case(context),
      None => Err(ModelgenError::unsupported(
        language,
        format!("{variant} models (no type mapping)"),
        &context.model.name,
      )),
    }
  }

  fn slot(&self, variant: Variant) -> &Option<TypeMapFn> {
    match variant {
      Variant::Object => &self.object,
      Variant::Array => &self.array,
      Variant::Tuple => &self.tuple,
      Variant::Union => &self.union,
      Variant::Enum => &self.enumeration,
      Variant::Dictionary => &self.dictionary,
      Variant::Reference => &self.reference,
      Variant::String => &self.string,
      Variant::Float => &self.float,
      Variant::Integer => &self.integer,
      Variant::Boolean => &self.boolean,
      Variant::Any => &self.any,
    }
  }

  fn slot_mut(&mut self, variant: Variant) -> &mut Option<TypeMapFn> {
    match variant {
      Variant::Object => &mut self.object,
      Variant::Array => &mut self.array,
      Variant::Tuple => &mut self.tuple,
      Variant::Union => &mut self.union,
      Variant::Enum => &mut self.enumeration,
      Variant::Dictionary => &mut self.dictionary,
      Variant::Reference => &mut self.reference,
      Variant::String => &mut self.string,
      Variant::Float => &mut self.float,
      Variant::Integer => &mut self.integer,
      Variant::Boolean => &mut self.boolean,
      Variant::Any => &mut self.any,
    }
  }
}

impl fmt::Debug for TypeMapping {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TypeMapping")
      .field("object", &self.object.is_some())
      .field("array", &self.array.is_some())
      .field("tuple", &self.tuple.is_some())
      .field("union", &self.union.is_some())
      .field("enum", &self.enumeration.is_some())
      .field("dictionary", &self.dictionary.is_some())
      .field("reference", &self.reference.is_some())
      .field("string", &self.string.is_some())
      .field("float", &self.float.is_some())
      .field("integer", &self.integer.is_some())
      .field("boolean", &self.boolean.is_some())
      .field("any", &self.any.is_some())
      .finish()
  }
}
