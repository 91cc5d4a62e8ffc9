//! Process-wide reference data for text normalization.
//!
//! The stopword list and the emoji name table are loaded once, explicitly,
//! and handed to the [`TextNormalizer`](super::normalize::TextNormalizer).
//! Nothing is fetched lazily, so a pipeline built from the same
//! [`ReferenceData`] always normalizes the same way, offline.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

#[cfg(feature = "json-output")]
use crate::error::Result;

/// Variation selector that text often adds after an emoji, or leaves out.
const VARIATION_SELECTOR: char = '\u{fe0f}';

/// `"dog face"` → `"dog_face"`, `"flag: Japan"` → `"flag_japan"`.
fn snake_name(name: &str) -> String {
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Mapping from emoji to a textual name.
///
/// Serializes as a plain JSON object of emoji to name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "HashMap<String, String>", into = "HashMap<String, String>")]
pub struct EmojiTable {
    names: HashMap<String, String>,
    max_key_len: usize,
}

impl From<HashMap<String, String>> for EmojiTable {
    fn from(names: HashMap<String, String>) -> Self {
        Self::from_pairs(names)
    }
}

impl From<EmojiTable> for HashMap<String, String> {
    fn from(table: EmojiTable) -> Self {
        table.names
    }
}

impl EmojiTable {
    /// Empty table: emoji pass through to the character filter.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Every emoji in the Unicode emoji database, skin tones included,
    /// keyed with and without the trailing variation selector.
    pub fn builtin() -> Self {
        let mut names = HashMap::new();
        for emoji in emojis::iter() {
            let tones = emoji.skin_tones().into_iter().flatten();
            for variant in tones.chain(std::iter::once(emoji)) {
                let name = snake_name(variant.name());
                let key = variant.as_str();
                let bare: String = key.chars().filter(|&c| c != VARIATION_SELECTOR).collect();
                if !bare.is_empty() && bare != key {
                    names.entry(bare).or_insert_with(|| name.clone());
                }
                names.insert(key.to_string(), name);
            }
        }
        Self::from_pairs(names)
    }

    /// Builds a table from `(emoji, name)` pairs. Empty keys are skipped.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let names: HashMap<String, String> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| !k.is_empty())
            .collect();
        let max_key_len = names.keys().map(String::len).max().unwrap_or(0);
        Self { names, max_key_len }
    }

    /// Loads a table from a JSON object such as `{"😂": "face_with_tears_of_joy"}`.
    #[cfg(feature = "json-output")]
    pub fn from_json_str(json: &str) -> Result<Self> {
        let names: HashMap<String, String> = serde_json::from_str(json)?;
        Ok(Self::from_pairs(names))
    }

    /// Adds or replaces one entry.
    #[must_use]
    pub fn with_entry(mut self, emoji: impl Into<String>, name: impl Into<String>) -> Self {
        let emoji = emoji.into();
        if !emoji.is_empty() {
            self.max_key_len = self.max_key_len.max(emoji.len());
            self.names.insert(emoji, name.into());
        }
        self
    }

    /// Name for an emoji, if known.
    pub fn name(&self, emoji: &str) -> Option<&str> {
        self.names.get(emoji).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Byte length of the longest key, 0 for an empty table.
    pub fn max_key_len(&self) -> usize {
        self.max_key_len
    }

    /// Longest emoji at the start of `text`, with its name.
    pub fn longest_prefix<'t>(&self, text: &'t str) -> Option<(&'t str, &str)> {
        let limit = self.max_key_len.min(text.len());
        (1..=limit)
            .rev()
            .filter(|&end| text.is_char_boundary(end))
            .find_map(|end| {
                let key = &text[..end];
                self.name(key).map(|name| (key, name))
            })
    }
}

/// Stopwords plus emoji names, loaded once per pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    stopwords: HashSet<String>,
    emoji: EmojiTable,
}

impl ReferenceData {
    /// Custom reference data. Stopwords are lowercased.
    pub fn new<I, S>(stopwords: I, emoji: EmojiTable) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            stopwords: stopwords
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
            emoji,
        }
    }

    /// English stopwords from the `stop-words` crate and the full emoji table.
    pub fn english() -> Self {
        let words: Vec<String> = stop_words::get(stop_words::LANGUAGE::English);
        Self::new(words, EmojiTable::builtin())
    }

    /// Replaces the emoji table.
    #[must_use]
    pub fn with_emoji(mut self, emoji: EmojiTable) -> Self {
        self.emoji = emoji;
        self
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    pub fn stopwords(&self) -> &HashSet<String> {
        &self.stopwords
    }

    pub fn emoji(&self) -> &EmojiTable {
        &self.emoji
    }
}
