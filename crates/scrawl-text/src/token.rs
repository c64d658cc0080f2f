#![forbid(unsafe_code)]

//! Tokenization of one physical line into break-respecting units.
//!
//! A token is a maximal substring with no internal break opportunity:
//! a run of blanks (one blank per token under the builtin rules, since
//! blanks break on both sides), an emoji cluster, or a stretch of text
//! the rules refuse to split. Concatenating a line's tokens in order
//! reproduces the line exactly — tokenization never drops or reorders
//! a code point.
//!
//! Input is normalized to NFC first so combining sequences compare and
//! measure as their composed forms; the reproduction guarantee is stated
//! against the normalized line.

use std::borrow::Cow;

use tracing::trace;
use unicode_normalization::{IsNormalized, UnicodeNormalization, is_nfc_quick};

use crate::classes::{ClassId, ClassSet};
use crate::emoji::EmojiPattern;
use crate::rules::RuleSet;

/// What a token is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Entirely breakable blanks.
    Whitespace,
    /// One emoji cluster.
    Emoji,
    /// Anything else.
    Text,
}

/// One segment of a physical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    text: String,
    kind: TokenKind,
}

impl Token {
    fn new(text: String, kind: TokenKind) -> Self {
        Self { text, kind }
    }

    /// The token's text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The token's kind.
    #[must_use]
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// True for blank tokens.
    #[must_use]
    pub fn is_whitespace(&self) -> bool {
        self.kind == TokenKind::Whitespace
    }

    /// The token's only code point, when it has exactly one.
    #[must_use]
    pub fn single_char(&self) -> Option<char> {
        let mut chars = self.text.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Normalize to NFC, borrowing when the line already is.
fn normalize(line: &str) -> Cow<'_, str> {
    match is_nfc_quick(line.chars()) {
        IsNormalized::Yes => Cow::Borrowed(line),
        _ => Cow::Owned(line.nfc().collect()),
    }
}

/// Split one physical line (no newlines) into tokens.
///
/// Splits occur only at rule break opportunities and emoji cluster
/// edges; empty tokens are never produced.
pub(crate) fn tokenize(line: &str, rules: &RuleSet, emoji: &EmojiPattern) -> Vec<Token> {
    let normalized = normalize(line);
    let cps: Vec<char> = normalized.chars().collect();
    let masks: Vec<ClassSet> = cps.iter().map(|&ch| rules.classify(ch)).collect();

    let mut tokens = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < cps.len() {
        if let Some(len) = emoji.match_len(&cps[i..]) {
            flush(&mut tokens, &cps, &masks, start, i);
            tokens.push(Token::new(
                cps[i..i + len].iter().collect(),
                TokenKind::Emoji,
            ));
            i += len;
            start = i;
            continue;
        }
        if i > start && rules.is_break(masks[i - 1], masks[i]) {
            flush(&mut tokens, &cps, &masks, start, i);
            start = i;
        }
        i += 1;
    }
    flush(&mut tokens, &cps, &masks, start, cps.len());

    trace!(tokens = tokens.len(), chars = cps.len(), "tokenized line");
    tokens
}

fn flush(tokens: &mut Vec<Token>, cps: &[char], masks: &[ClassSet], start: usize, end: usize) {
    if start == end {
        return;
    }
    let text: String = cps[start..end].iter().collect();
    let kind = if masks[start..end]
        .iter()
        .all(|m| m.contains(ClassId::Whitespace))
    {
        TokenKind::Whitespace
    } else {
        TokenKind::Text
    };
    tokens.push(Token::new(text, kind));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advanced() -> (RuleSet, EmojiPattern) {
        (
            RuleSet::advanced().expect("builtin rules compile"),
            EmojiPattern::new(),
        )
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(Token::as_str).collect()
    }

    #[test]
    fn splits_words_and_blanks() {
        let (rules, emoji) = advanced();
        let tokens = tokenize("hello world", &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["hello", " ", "world"]);
        assert_eq!(tokens[1].kind(), TokenKind::Whitespace);
        assert_eq!(tokens[0].kind(), TokenKind::Text);
    }

    #[test]
    fn consecutive_blanks_are_separate_tokens() {
        let (rules, emoji) = advanced();
        let tokens = tokenize("a  b", &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["a", " ", " ", "b"]);
    }

    #[test]
    fn hyphenated_word_splits_after_hyphens() {
        let (rules, emoji) = advanced();
        let tokens = tokenize("state-of-the-art", &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["state-", "of-", "the-", "art"]);
    }

    #[test]
    fn ideographs_are_single_tokens() {
        let (rules, emoji) = advanced();
        let tokens = tokenize("你好世界", &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["你", "好", "世", "界"]);
    }

    #[test]
    fn cjk_punctuation_clings_to_ideographs() {
        let (rules, emoji) = advanced();
        let tokens = tokenize("「你好。」next", &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["「你", "好。」", "next"]);
    }

    #[test]
    fn emoji_cluster_is_one_token() {
        let (rules, emoji) = advanced();
        let family = "👨\u{200D}👩\u{200D}👧";
        let input = format!("hi{family}yo");
        let tokens = tokenize(&input, &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["hi", family, "yo"]);
        assert_eq!(tokens[1].kind(), TokenKind::Emoji);
    }

    #[test]
    fn adjacent_emoji_are_separate_tokens() {
        let (rules, emoji) = advanced();
        let tokens = tokenize("😀🎉", &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["😀", "🎉"]);
    }

    #[test]
    fn empty_line_has_no_tokens() {
        let (rules, emoji) = advanced();
        assert!(tokenize("", &rules, &emoji).is_empty());
    }

    #[test]
    fn concatenation_is_lossless() {
        let (rules, emoji) = advanced();
        for line in [
            "hello world",
            "  leading and trailing  ",
            "「你好。」和 state-of-the-art 🇺🇸!",
            "（注）テスト、実行。",
        ] {
            let joined: String = tokenize(line, &rules, &emoji)
                .iter()
                .map(Token::as_str)
                .collect();
            assert_eq!(joined, line);
        }
    }

    #[test]
    fn combining_sequence_is_composed_before_splitting() {
        let (rules, emoji) = advanced();
        // "e" + combining acute normalizes to the single composed form.
        let tokens = tokenize("cafe\u{0301} x", &rules, &emoji);
        assert_eq!(texts(&tokens), vec!["café", " ", "x"]);
    }

    #[test]
    fn single_char_accessor() {
        let (rules, emoji) = advanced();
        let tokens = tokenize("a 你", &rules, &emoji);
        assert_eq!(tokens[0].single_char(), Some('a'));
        assert_eq!(tokens[2].single_char(), Some('你'));
        let long = tokenize("ab", &rules, &emoji);
        assert_eq!(long[0].single_char(), None);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;
        use unicode_normalization::UnicodeNormalization;

        fn mixed_line() -> impl Strategy<Value = String> {
            proptest::collection::vec(
                prop_oneof![
                    proptest::char::range('a', 'z').prop_map(String::from),
                    Just("你".to_string()),
                    Just("ア".to_string()),
                    Just(" ".to_string()),
                    Just("-".to_string()),
                    Just("。".to_string()),
                    Just("「".to_string()),
                    Just("😀".to_string()),
                    Just("🇺🇸".to_string()),
                    Just("👍🏽".to_string()),
                ],
                0..40,
            )
            .prop_map(|parts| parts.concat())
        }

        proptest! {
            #[test]
            fn tokens_concatenate_to_the_normalized_line(line in mixed_line()) {
                let rules = RuleSet::advanced().expect("builtin rules compile");
                let emoji = EmojiPattern::new();
                let joined: String = tokenize(&line, &rules, &emoji)
                    .iter()
                    .map(Token::as_str)
                    .collect();
                let normalized: String = line.nfc().collect();
                prop_assert_eq!(joined, normalized);
            }

            #[test]
            fn no_token_is_empty(line in mixed_line()) {
                let rules = RuleSet::advanced().expect("builtin rules compile");
                let emoji = EmojiPattern::new();
                for token in tokenize(&line, &rules, &emoji) {
                    prop_assert!(!token.as_str().is_empty());
                }
            }
        }
    }
}
