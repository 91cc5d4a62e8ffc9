//! Deterministic cleaning of message text.
//!
//! [`TextNormalizer::normalize`] applies, in this exact order:
//!
//! 1. lowercase
//! 2. emoji → `:name:`
//! 3. `@mention` → `@user`
//! 4. `#hashtag` → removed
//! 5. URL-like runs → ` link `
//! 6. drop characters outside ASCII letters, digits, `@ # ? ! , . : '` and whitespace
//! 7. drop digit runs
//! 8. drop stopwords, rejoin with single spaces
//!
//! Steps 6 and 7 can glue fragments into a new `http`/`www` run, so any
//! token still containing one after step 7 is replaced by `link` as well.
//!
//! Normalization is a pure per-message function; messages can be normalized
//! in any order or in parallel.
//!
//! # Example
//!
//! ```rust
//! use chattopics::core::normalize::TextNormalizer;
//! use chattopics::core::reference::{EmojiTable, ReferenceData};
//!
//! let normalizer = TextNormalizer::new(ReferenceData::new(["the"], EmojiTable::builtin()));
//! assert_eq!(
//!     normalizer.normalize("Check THE site https://example.com @bob 🚀 #launch 2024"),
//!     "check site link @user :rocket:"
//! );
//! ```

use regex::Regex;

use super::reference::ReferenceData;

const MENTION_PATTERN: &str = r"@\w+";
const HASHTAG_PATTERN: &str = r"#\w+";
const URL_PATTERN: &str = r"(?:https?://|www\.)\S*|http\S*";
const DISALLOWED_PATTERN: &str = r"[^a-zA-Z0-9@#?!,.:'\s]";
const DIGITS_PATTERN: &str = r"\d+";

/// Cleans free text into a normalized token stream.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    reference: ReferenceData,
    mention_regex: Regex,
    hashtag_regex: Regex,
    url_regex: Regex,
    disallowed_regex: Regex,
    digits_regex: Regex,
}

impl TextNormalizer {
    /// Compiles the patterns for the given reference data.
    pub fn new(reference: ReferenceData) -> Self {
        Self {
            reference,
            mention_regex: Regex::new(MENTION_PATTERN).expect("mention pattern is valid"),
            hashtag_regex: Regex::new(HASHTAG_PATTERN).expect("hashtag pattern is valid"),
            url_regex: Regex::new(URL_PATTERN).expect("url pattern is valid"),
            disallowed_regex: Regex::new(DISALLOWED_PATTERN).expect("allow-list pattern is valid"),
            digits_regex: Regex::new(DIGITS_PATTERN).expect("digit pattern is valid"),
        }
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Normalizes one message. Any input is accepted.
    pub fn normalize(&self, text: &str) -> String {
        let text = text.to_lowercase();

        let text = self.replace_emoji(&text);

        let text = self.mention_regex.replace_all(&text, "@user");
        let text = self.hashtag_regex.replace_all(&text, "");
        let text = self.url_regex.replace_all(&text, " link ");
        let text = self.disallowed_regex.replace_all(&text, "");
        let text = self.digits_regex.replace_all(&text, "");

        text.split_whitespace()
            .map(|token| {
                if token.contains("http") || token.contains("www") {
                    "link"
                } else {
                    token
                }
            })
            .filter(|token| !self.reference.is_stopword(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Replaces each emoji with `:name:`, preferring the longest match.
    fn replace_emoji(&self, text: &str) -> String {
        let table = self.reference.emoji();
        if table.is_empty() {
            return text.to_string();
        }

        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            match table.longest_prefix(rest) {
                Some((emoji, name)) => {
                    out.push(':');
                    out.push_str(&name.to_lowercase());
                    out.push(':');
                    rest = &rest[emoji.len()..];
                }
                None => {
                    out.push(c);
                    rest = &rest[c.len_utf8()..];
                }
            }
        }
        out
    }

    /// Normalizes every text, preserving order.
    pub fn normalize_all<'a, I>(&self, texts: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|t| self.normalize(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::reference::EmojiTable;

    fn normalizer() -> TextNormalizer {
        TextNormalizer::new(ReferenceData::new(
            ["the", "a", "is", "to", "and"],
            EmojiTable::builtin(),
        ))
    }

    #[test]
    fn test_lowercase_and_stopwords() {
        assert_eq!(normalizer().normalize("The Cat IS Here"), "cat here");
    }

    #[test]
    fn test_emoji_to_text() {
        // Underscores are outside the allow-list, so they disappear in step 6.
        assert_eq!(normalizer().normalize("lol 😂"), "lol :facewithtearsofjoy:");
        assert_eq!(normalizer().normalize("🚀🚀"), ":rocket::rocket:");
    }

    #[test]
    fn test_emoji_across_the_database() {
        assert_eq!(
            normalizer().normalize("lunch 🍔 with 🦀 and 🐶 😺"),
            "lunch :hamburger: with :crab: :dogface: :grinningcat:"
        );
    }

    #[test]
    fn test_emoji_with_and_without_variation_selector() {
        assert_eq!(normalizer().normalize("❤\u{fe0f} ❤"), ":redheart: :redheart:");
    }

    #[test]
    fn test_unknown_emoji_removed_by_allow_list() {
        let n = TextNormalizer::new(ReferenceData::new(
            Vec::<String>::new(),
            EmojiTable::from_pairs([("🍕", "pizza")]),
        ));
        assert_eq!(n.normalize("hi 🦀 🍕"), "hi :pizza:");
    }

    #[test]
    fn test_mentions_and_hashtags() {
        assert_eq!(normalizer().normalize("@alice see #weekend plans"), "@user see plans");
    }

    #[test]
    fn test_urls_replaced() {
        assert_eq!(
            normalizer().normalize("look https://example.com/x?y=1 and www.foo.org now"),
            "look link link now"
        );
    }

    #[test]
    fn test_url_keeps_glued_prefix() {
        assert_eq!(normalizer().normalize("see:https://x.io"), "see: link");
        assert_eq!(normalizer().normalize("(www.foo.org)"), "link");
    }

    #[test]
    fn test_url_spliced_by_character_removal() {
        let out = normalizer().normalize("ht-tp ww-w");
        assert!(!out.contains("http"));
        assert!(!out.contains("www"));
    }

    #[test]
    fn test_allow_list_and_digits() {
        assert_eq!(
            normalizer().normalize("Price: $20, ok?! it's 100% (done)"),
            "price: , ok?! it's done"
        );
    }

    #[test]
    fn test_digits_removed_everywhere() {
        let out = normalizer().normalize("abc123def 4 5six");
        assert!(!out.chars().any(|c| c.is_ascii_digit()));
        assert_eq!(out, "abcdef six");
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert_eq!(normalizer().normalize(""), "");
        assert_eq!(normalizer().normalize("   \n\t "), "");
        assert_eq!(normalizer().normalize("the a is"), "");
    }

    #[test]
    fn test_non_ascii_letters_removed() {
        assert_eq!(normalizer().normalize("café naïve"), "caf nave");
    }

    #[test]
    fn test_without_emoji_table() {
        let n = TextNormalizer::new(ReferenceData::new(Vec::<String>::new(), EmojiTable::empty()));
        assert_eq!(n.normalize("hi 😂"), "hi");
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let out = normalizer().normalize_all(["B", "A", "C"]);
        assert_eq!(out, vec!["b", "a", "c"]);
    }
}
