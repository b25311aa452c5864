//! Identifier case formats and conversion between them.
//!
//! Field names are declared in `lower_underscore`, enum values in
//! `UPPER_UNDERSCORE`; the external JSON side defaults to `lowerCamel` for both.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A naming convention for identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseFormat {
    /// `lower-hyphen`
    LowerHyphen,
    /// `lower_underscore`
    LowerUnderscore,
    /// `lowerCamel`
    #[default]
    LowerCamel,
    /// `UpperCamel`
    UpperCamel,
    /// `UPPER_UNDERSCORE`
    UpperUnderscore,
}

impl CaseFormat {
    /// Convert `text`, assumed to be in this format, to the `target` format.
    ///
    /// Identical formats return the input unchanged. Characters that are
    /// neither separators nor letters (digits, `$`) are carried through as
    /// part of the word they appear in.
    #[must_use]
    pub fn convert(self, target: Self, text: &str) -> String {
        if self == target {
            return text.to_string();
        }
        target.join(&self.split(text))
    }

    fn split(self, text: &str) -> Vec<&str> {
        match self {
            Self::LowerHyphen => text.split('-').collect(),
            Self::LowerUnderscore | Self::UpperUnderscore => text.split('_').collect(),
            Self::LowerCamel | Self::UpperCamel => {
                let mut words = Vec::new();
                let mut start = 0;
                for (i, c) in text.char_indices() {
                    if c.is_ascii_uppercase() && i > start {
                        words.push(&text[start..i]);
                        start = i;
                    }
                }
                words.push(&text[start..]);
                words
            }
        }
    }

    fn join(self, words: &[&str]) -> String {
        match self {
            Self::LowerHyphen => lowered(words).join("-"),
            Self::LowerUnderscore => lowered(words).join("_"),
            Self::UpperUnderscore => words
                .iter()
                .map(|w| w.to_ascii_uppercase())
                .collect::<Vec<_>>()
                .join("_"),
            Self::LowerCamel => {
                let mut out = String::new();
                for (i, word) in words.iter().enumerate() {
                    if i == 0 {
                        out.push_str(&word.to_ascii_lowercase());
                    } else {
                        out.push_str(&capitalized(word));
                    }
                }
                out
            }
            Self::UpperCamel => words.iter().map(|w| capitalized(w)).collect(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LowerHyphen => "lower_hyphen",
            Self::LowerUnderscore => "lower_underscore",
            Self::LowerCamel => "lower_camel",
            Self::UpperCamel => "upper_camel",
            Self::UpperUnderscore => "upper_underscore",
        }
    }
}

impl fmt::Display for CaseFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lowered(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_ascii_lowercase()).collect()
}

fn capitalized(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        let mut out = first.to_ascii_uppercase().to_string();
        out.push_str(&chars.as_str().to_ascii_lowercase());
        out
    })
}
