pub mod generate;
pub mod inspect;

#[cfg(test)]
mod tests;

pub use generate::{GenerateConfig, generate_code};
pub use inspect::inspect_models;
