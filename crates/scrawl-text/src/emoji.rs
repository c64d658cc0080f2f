#![forbid(unsafe_code)]

//! Emoji cluster recognition.
//!
//! An emoji cluster is a run of code points rendered as a single glyph:
//! a regional-indicator flag pair, or a pictographic base extended with
//! skin-tone modifiers, variation selectors, keycap marks, tag sequences
//! and zero-width-joiner chains. Clusters are atomic for the wrapper —
//! there is never a break opportunity inside one, and the word splitter
//! emits an over-wide cluster whole rather than cut it.
//!
//! Matching works directly on code points with an explicit longest-match
//! scan; the pictographic table is a pragmatic subset of the blocks that
//! carry emoji, the same approach terminal width implementations take.
//!
//! # Example
//! ```
//! use scrawl_text::emoji::EmojiPattern;
//!
//! let emoji = EmojiPattern::new();
//! assert!(emoji.is_cluster("🇺🇸"));
//! assert!(emoji.is_cluster("👨\u{200D}👩\u{200D}👧"));
//! assert!(emoji.is_match("look 👍🏽 here"));
//! assert!(!emoji.is_match("plain text"));
//! ```

const ZWJ: char = '\u{200D}';
const VS16: char = '\u{FE0F}';
const KEYCAP: char = '\u{20E3}';
const TAG_END: char = '\u{E007F}';

fn is_regional_indicator(ch: char) -> bool {
    ('\u{1F1E6}'..='\u{1F1FF}').contains(&ch)
}

fn is_skin_tone(ch: char) -> bool {
    ('\u{1F3FB}'..='\u{1F3FF}').contains(&ch)
}

fn is_keycap_base(ch: char) -> bool {
    ch.is_ascii_digit() || ch == '#' || ch == '*'
}

fn is_tag(ch: char) -> bool {
    ('\u{E0020}'..='\u{E007E}').contains(&ch)
}

/// Blocks whose members act as pictographic cluster bases. Sorted,
/// disjoint, binary-searched. Regional indicators are deliberately
/// absent (flag pairs have their own arm in the matcher).
const PICTOGRAPHIC_RANGES: &[(u32, u32)] = &[
    (0x00A9, 0x00A9),
    (0x00AE, 0x00AE),
    (0x203C, 0x203C),
    (0x2049, 0x2049),
    (0x2122, 0x2122),
    (0x2139, 0x2139),
    (0x2194, 0x2199),
    (0x21A9, 0x21AA),
    (0x231A, 0x231B),
    (0x2328, 0x2328),
    (0x23CF, 0x23CF),
    (0x23E9, 0x23F3),
    (0x23F8, 0x23FA),
    (0x24C2, 0x24C2),
    (0x25AA, 0x25AB),
    (0x25B6, 0x25B6),
    (0x25C0, 0x25C0),
    (0x25FB, 0x25FE),
    (0x2600, 0x27BF),
    (0x2934, 0x2935),
    (0x2B05, 0x2B07),
    (0x2B1B, 0x2B1C),
    (0x2B50, 0x2B50),
    (0x2B55, 0x2B55),
    (0x3030, 0x3030),
    (0x303D, 0x303D),
    (0x3297, 0x3297),
    (0x3299, 0x3299),
    (0x1F004, 0x1F004),
    (0x1F0CF, 0x1F0CF),
    (0x1F170, 0x1F171),
    (0x1F17E, 0x1F17F),
    (0x1F18E, 0x1F18E),
    (0x1F191, 0x1F19A),
    (0x1F201, 0x1F202),
    (0x1F21A, 0x1F21A),
    (0x1F22F, 0x1F22F),
    (0x1F232, 0x1F23A),
    (0x1F250, 0x1F251),
    (0x1F300, 0x1FAFF),
];

fn is_pictographic(ch: char) -> bool {
    let cp = ch as u32;
    PICTOGRAPHIC_RANGES
        .binary_search_by(|&(lo, hi)| {
            if cp < lo {
                std::cmp::Ordering::Greater
            } else if cp > hi {
                std::cmp::Ordering::Less
            } else {
                std::cmp::Ordering::Equal
            }
        })
        .is_ok()
}

/// Compiled emoji cluster matcher.
///
/// Stateless after construction; freely shared. Matches are maximal
/// (longest cluster wins) and atomic (a match is consumed whole).
#[derive(Debug, Clone, Copy, Default)]
pub struct EmojiPattern {
    _priv: (),
}

impl EmojiPattern {
    /// Build the matcher.
    #[must_use]
    pub fn new() -> Self {
        Self { _priv: () }
    }

    /// Length in code points of the cluster starting at `cps[0]`, if any.
    ///
    /// Greedy: ZWJ chains extend the match as far as they reach, so
    /// `👩 ZWJ 🚀` is one cluster of five code points, never two.
    #[must_use]
    pub fn match_len(&self, cps: &[char]) -> Option<usize> {
        let mut len = self.match_unit(cps)?;
        while cps.get(len) == Some(&ZWJ) {
            match self.match_unit(&cps[len + 1..]) {
                Some(unit) => len += 1 + unit,
                None => break,
            }
        }
        Some(len)
    }

    /// One joinable unit: a flag pair or a pictographic-with-extensions.
    fn match_unit(&self, cps: &[char]) -> Option<usize> {
        let first = *cps.first()?;

        if is_regional_indicator(first) {
            return cps
                .get(1)
                .copied()
                .filter(|&ch| is_regional_indicator(ch))
                .map(|_| 2);
        }

        // Keycap bases are only emoji when the enclosing keycap follows.
        if is_keycap_base(first) {
            return match (cps.get(1), cps.get(2)) {
                (Some(&VS16), Some(&KEYCAP)) => Some(3),
                (Some(&KEYCAP), _) => Some(2),
                _ => None,
            };
        }

        if !is_pictographic(first) {
            return None;
        }
        let mut len = 1;
        while cps.get(len).copied().is_some_and(is_skin_tone) {
            len += 1;
        }
        if cps.get(len) == Some(&VS16) {
            len += 1;
            if cps.get(len) == Some(&KEYCAP) {
                len += 1;
            }
        }
        // Tag sequences (subdivision flags) must close with the cancel tag.
        if cps.get(len).copied().is_some_and(is_tag) {
            let mut end = len;
            while cps.get(end).copied().is_some_and(is_tag) {
                end += 1;
            }
            if cps.get(end) == Some(&TAG_END) {
                len = end + 1;
            }
        }
        Some(len)
    }

    /// True when the whole string is exactly one cluster.
    #[must_use]
    pub fn is_cluster(&self, text: &str) -> bool {
        let cps: Vec<char> = text.chars().collect();
        !cps.is_empty() && self.match_len(&cps) == Some(cps.len())
    }

    /// True when the string contains at least one cluster anywhere.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        let cps: Vec<char> = text.chars().collect();
        (0..cps.len()).any(|i| self.match_len(&cps[i..]).is_some())
    }
}
