use std::{
  collections::{BTreeSet, HashSet},
  fmt,
  sync::Arc,
};

use strum::{Display, EnumIter};

use super::identifiers::{NamingCase, replace_special_characters, starts_with_digit};
use crate::error::{ModelgenError, Result};

pub type StageFn = Arc<dyn Fn(&str) -> String + Send + Sync>;

/// The rewriting stages every identifier passes through, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
  SpecialCharacters,
  NumberStart,
  EmptyValue,
  ReservedKeywords,
  NamingFormat,
}

/// Keywords an identifier may not collide with.
#[derive(Debug, Clone, Default)]
pub struct ReservedWords {
  words: HashSet<String>,
  case_insensitive: bool,
}

impl ReservedWords {
  pub fn new<'a>(words: impl IntoIterator<Item = &'a str>, case_insensitive: bool) -> Self {
    let words = words
      .into_iter()
      .map(|word| {
        if case_insensitive {
          word.to_lowercase()
        } else {
          word.to_string()
        }
      })
      .collect();
    Self {
      words,
      case_insensitive,
    }
  }

  #[must_use]
  pub fn extended<'a>(mut self, words: impl IntoIterator<Item = &'a str>) -> Self {
    for word in words {
      let word = if self.case_insensitive {
        word.to_lowercase()
      } else {
        word.to_string()
      };
      self.words.insert(word);
    }
    self
  }

  pub fn contains(&self, value: &str) -> bool {
    if self.case_insensitive {
      self.words.contains(&value.to_lowercase())
    } else {
      self.words.contains(value)
    }
  }
}

/// How a name already taken in its scope is disambiguated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DedupStrategy {
  /// Prepend the marker again on every attempt (`reserved_name`, `reserved_reserved_name`, ...).
  Prefix(String),
  /// Append `separator` and an increasing number starting at `start`.
  NumericSuffix { separator: String, start: usize },
}

impl Default for DedupStrategy {
  fn default() -> Self {
    Self::Prefix("reserved_".to_string())
  }
}

/// Identifiers already handed out within one naming scope.
#[derive(Debug, Clone, Default)]
pub struct NameScope {
  used: BTreeSet<String>,
}

impl NameScope {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.used.contains(name)
  }

  pub fn insert(&mut self, name: impl Into<String>) -> bool {
    self.used.insert(name.into())
  }

  pub fn len(&self) -> usize {
    self.used.len()
  }

  pub fn is_empty(&self) -> bool {
    self.used.is_empty()
  }
}

/// Ordered rewriting of raw names into valid, unique identifiers for one naming category.
///
/// Every stage can be swapped out through [`NamingPipeline::with_stage`]; the remaining stages
/// keep running in their fixed order around the replacement.
#[derive(Clone)]
pub struct NamingPipeline {
  special_characters: StageFn,
  number_start: StageFn,
  empty_value: StageFn,
  reserved_keywords: StageFn,
  naming_format: StageFn,
  dedup: DedupStrategy,
  max_attempts: usize,
}

#[bon::bon]
impl NamingPipeline {
  /// Builds the default stage set.
  ///
  /// # Arguments
  ///
  /// * `exclude` - special characters left in place by the first stage
  /// * `reserved` - keywords of the target language
  /// * `case` - naming convention applied by the format stage
  /// * `dedup` - disambiguation strategy for names already taken in a scope
  /// * `max_attempts` - how many disambiguation attempts are made before giving up
  #[builder]
  pub fn new(
    #[builder(default)] exclude: Vec<char>,
    #[builder(default)] reserved: ReservedWords,
    #[builder(default)] case: NamingCase,
    #[builder(default)] dedup: DedupStrategy,
    #[builder(default = 100)] max_attempts: usize,
  ) -> Self {
    let special_characters: StageFn = Arc::new(move |value| replace_special_characters(value, &exclude, "_"));
    let reserved_keywords: StageFn = Arc::new(move |value| {
      if reserved.contains(value) {
        format!("reserved_{value}")
      } else {
        value.to_string()
      }
    });
    Self {
      special_characters,
      number_start: Arc::new(|value| {
        if starts_with_digit(value) {
          format!("number_{value}")
        } else {
          value.to_string()
        }
      }),
      empty_value: Arc::new(|value| {
        if value.is_empty() {
          "empty".to_string()
        } else {
          value.to_string()
        }
      }),
      reserved_keywords,
      naming_format: Arc::new(move |value| case.apply(value)),
      dedup,
      max_attempts,
    }
  }
}

impl NamingPipeline {
  #[must_use]
  pub fn with_stage(mut self, stage: Stage, f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
    let f: StageFn = Arc::new(f);
    match stage {
      Stage::SpecialCharacters => self.special_characters = f,
      Stage::NumberStart => self.number_start = f,
      Stage::EmptyValue => self.empty_value = f,
      Stage::ReservedKeywords => self.reserved_keywords = f,
      Stage::NamingFormat => self.naming_format = f,
    }
    self
  }

  #[must_use]
  pub fn with_dedup(mut self, dedup: DedupStrategy) -> Self {
    self.dedup = dedup;
    self
  }

  #[must_use]
  pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
    self.max_attempts = max_attempts;
    self
  }

  /// Runs the rewriting stages without registering the result in any scope.
  pub fn format(&self, raw: &str) -> String {
    let value = (self.special_characters)(raw);
    let value = (self.number_start)(&value);
    let value = (self.empty_value)(&value);
    let value = (self.reserved_keywords)(&value);
    let mut value = (self.naming_format)(&value);

    // Case conversion may drop separators, exposing an empty or digit-leading value.
    if value.is_empty() {
      value = (self.naming_format)(&(self.empty_value)(&value));
    }
    if starts_with_digit(&value) {
      value = (self.naming_format)(&(self.number_start)(&value));
    }
    value
  }

  /// Produces an identifier that is valid and not yet taken in `scope`, and claims it.
  ///
  /// # Errors
  ///
  /// Returns [`ModelgenError::NamingExhaustion`] when no free name is found within the
  /// configured number of attempts.
  pub fn constrain(&self, raw: &str, scope: &mut NameScope) -> Result<String> {
    let base = self.format(raw);
    let mut candidate = base.clone();
    let mut attempts = 0;
    while scope.contains(&candidate) {
      if attempts >= self.max_attempts {
        return Err(ModelgenError::NamingExhaustion {
          name: raw.to_string(),
          attempts,
        });
      }
      attempts += 1;
      candidate = match &self.dedup {
        DedupStrategy::Prefix(prefix) => (self.naming_format)(&format!("{prefix}{candidate}")),
        DedupStrategy::NumericSuffix { separator, start } => {
          (self.naming_format)(&format!("{base}{separator}{}", start + attempts - 1))
        }
      };
    }
    scope.insert(candidate.clone());
    Ok(candidate)
  }
}

impl fmt::Debug for NamingPipeline {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("NamingPipeline")
      .field("dedup", &self.dedup)
      .field("max_attempts", &self.max_attempts)
      .finish_non_exhaustive()
  }
}

impl Default for NamingPipeline {
  fn default() -> Self {
    Self::builder().build()
  }
}
