use std::{
  char::{ToLowercase, ToUppercase},
  collections::HashMap,
  iter::Peekable,
  sync::LazyLock,
};

use any_ascii::any_ascii;
use inflections::Inflect;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Word spelled out for each special character an identifier may not contain.
static SPECIAL_CHARACTER_WORDS: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
  [
    (' ', "space"),
    ('!', "exclamation"),
    ('"', "quotation"),
    ('#', "hash"),
    ('$', "dollar"),
    ('%', "percent"),
    ('&', "ampersand"),
    ('\'', "apostrophe"),
    ('(', "roundleft"),
    (')', "roundright"),
    ('*', "asterisk"),
    ('+', "plus"),
    (',', "comma"),
    ('-', "minus"),
    ('.', "dot"),
    ('/', "slash"),
    (':', "colon"),
    (';', "semicolon"),
    ('<', "less"),
    ('=', "equal"),
    ('>', "greater"),
    ('?', "question"),
    ('@', "at"),
    ('[', "squareleft"),
    ('\\', "backslash"),
    (']', "squareright"),
    ('^', "circumflex"),
    ('_', "underscore"),
    ('`', "graveaccent"),
    ('{', "curlyleft"),
    ('|', "vertical"),
    ('}', "curlyright"),
    ('~', "tilde"),
  ]
  .into_iter()
  .collect()
});

/// Replaces every special character with its spelled-out word surrounded by `separator`.
///
/// The input is transliterated to ASCII first. Characters listed in `exclude` are kept as-is.
///
/// ```text
/// replace_special_characters("a!b", &[], "_") == "a_exclamation_b"
/// ```
pub fn replace_special_characters(input: &str, exclude: &[char], separator: &str) -> String {
  let ascii = any_ascii(input);
  let mut output = String::with_capacity(ascii.len());
  for c in ascii.chars() {
    match SPECIAL_CHARACTER_WORDS.get(&c) {
      Some(word) if !exclude.contains(&c) => {
        output.push_str(separator);
        output.push_str(word);
        output.push_str(separator);
      }
      _ => output.push(c),
    }
  }
  output
}

pub fn starts_with_digit(value: &str) -> bool {
  value.starts_with(|c: char| c.is_ascii_digit())
}

/// Case convention applied by the naming-format stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum NamingCase {
  #[default]
  Pascal,
  Camel,
  Snake,
  Constant,
  /// Leave the value untouched.
  Preserve,
}

impl NamingCase {
  pub fn apply(self, value: &str) -> String {
    match self {
      Self::Pascal => to_pascal_case(value),
      Self::Camel => to_camel_case(value),
      Self::Snake => value.to_snake_case(),
      Self::Constant => value.to_constant_case(),
      Self::Preserve => value.to_string(),
    }
  }
}

/// PascalCase that keeps word boundaries already present in mixed-case input
/// (`someValue` → `SomeValue`, `reserved_return` → `ReservedReturn`). `$` survives.
pub fn to_pascal_case(value: &str) -> String {
  value
    .chars()
    .capitalize_words_with_boundaries()
    .filter(|c| c.is_ascii_alphanumeric() || *c == '$')
    .collect()
}

pub fn to_camel_case(value: &str) -> String {
  let pascal = to_pascal_case(value);
  let mut chars = pascal.chars().peekable();
  let mut camel = String::with_capacity(pascal.len());
  // Lowercase the leading run of capitals, keeping the last one when it starts a new word.
  while let Some(c) = chars.next() {
    let next_is_lower = chars.peek().is_some_and(char::is_ascii_lowercase);
    if c.is_ascii_uppercase() && (camel.is_empty() || !next_is_lower) {
      camel.push(c.to_ascii_lowercase());
    } else {
      camel.push(c);
      camel.extend(chars);
      break;
    }
  }
  camel
}

/// An extension trait for char iterators to add word capitalization.
pub trait CapitalizeWordsExt: Iterator<Item = char> {
  fn capitalize_words_with_boundaries(self) -> CapitalizeWordsWithBoundaries<Self>
  where
    Self: Sized;
}

impl<I> CapitalizeWordsExt for I
where
  I: Iterator<Item = char>,
{
  fn capitalize_words_with_boundaries(self) -> CapitalizeWordsWithBoundaries<Self>
  where
    Self: Sized,
  {
    CapitalizeWordsWithBoundaries {
      iter: self.peekable(),
      capitalize_next: true,
      prev_was_lower: false,
      pending_upper: None,
      pending_lower: None,
    }
  }
}

/// Uppercases the first letter of every word and lowercases the rest. A word starts after a
/// non-alphanumeric character, at a lower-to-upper transition, or at the last capital of an
/// acronym followed by lowercase letters.
pub struct CapitalizeWordsWithBoundaries<I>
where
  I: Iterator<Item = char>,
{
  iter: Peekable<I>,
  capitalize_next: bool,
  prev_was_lower: bool,
  pending_upper: Option<ToUppercase>,
  pending_lower: Option<ToLowercase>,
}

impl<I> Iterator for CapitalizeWordsWithBoundaries<I>
where
  I: Iterator<Item = char>,
{
  type Item = char;

  #[inline]
  fn next(&mut self) -> Option<Self::Item> {
    if let Some(upper_iter) = self.pending_upper.as_mut() {
      if let Some(c) = upper_iter.next() {
        return Some(c);
      }
      self.pending_upper = None;
    }

    if let Some(lower_iter) = self.pending_lower.as_mut() {
      if let Some(c) = lower_iter.next() {
        return Some(c);
      }
      self.pending_lower = None;
    }

    let c = self.iter.next()?;

    if !c.is_ascii_alphanumeric() {
      self.capitalize_next = self.iter.peek().is_some_and(char::is_ascii_alphanumeric);
      self.prev_was_lower = false;
      return Some(c);
    }

    let is_lower = c.is_ascii_lowercase();
    let is_upper = c.is_ascii_uppercase();

    let should_capitalize = self.capitalize_next
      || (self.prev_was_lower && is_upper)
      || (is_upper && self.iter.peek().is_some_and(char::is_ascii_lowercase));

    self.prev_was_lower = is_lower;
    self.capitalize_next = false;

    if should_capitalize {
      let mut upper = c.to_uppercase();
      let first = upper.next();
      self.pending_upper = Some(upper);
      first
    } else {
      let mut lower = c.to_lowercase();
      let first = lower.next();
      self.pending_lower = Some(lower);
      first
    }
  }
}
