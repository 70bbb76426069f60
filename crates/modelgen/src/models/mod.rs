//! Intermediate representations flowing through the pipeline.

mod common;
mod constrained;
mod meta;
mod original;
mod output;

pub use common::{CommonModel, Items, ModelArena, ModelId, SchemaType};
pub use constrained::{
  ConstrainedEnumValue, ConstrainedKind, ConstrainedMetaModel, ConstrainedObject, ConstrainedProperty,
  ConstrainedReference, ConstrainedTuple,
};
pub use meta::{
  EnumValueModel, MetaKind, MetaModel, MetaModelEntry, MetaModelSet, ObjectModel, PropertyKind, PropertyModel,
  TupleModel, Variant,
};
pub use original::OriginalInput;
pub use output::OutputModel;
