//! Identifier rewriting shared by every language backend.

pub mod identifiers;
pub mod pipeline;


pub use identifiers::{NamingCase, replace_special_characters, to_camel_case, to_pascal_case};
pub use pipeline::{DedupStrategy, NameScope, NamingPipeline, ReservedWords, Stage, StageFn};
