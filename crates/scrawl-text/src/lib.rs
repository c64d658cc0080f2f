#![forbid(unsafe_code)]

//! Unicode-aware line breaking and greedy text wrapping for scrawl.
//!
//! Given a string, a width oracle for the current font and a pixel
//! budget, the engine reflows the string so no output line exceeds the
//! budget — except where a single unbreakable unit (an emoji cluster, an
//! unavoidable lone code point) forces an overflow. Break opportunities
//! are classified across mixed scripts: blank-delimited Latin text, CJK
//! ideographs with kinsoku-style punctuation context, and multi-code-point
//! emoji sequences that must never be cut.
//!
//! The pieces, bottom up:
//! - [`classes`] - named character classes over code-point ranges
//! - [`rules`] - break rules compiled into a [`rules::RuleSet`]
//! - [`emoji`] - atomic emoji cluster matching
//! - [`token`] - lossless tokenization of one physical line
//! - [`wrap`] - the greedy fill loop, hard splitter and blank trimmer
//!
//! [`WrapEngine`] ties them together and [`wrap_text`] is the one-call
//! entry point over a process-wide engine.
//!
//! # Example
//! ```
//! use scrawl_font::MonospaceMetrics;
//! use scrawl_text::wrap_text;
//!
//! let font = MonospaceMetrics::unit();
//! assert_eq!(wrap_text("hello world", &font, 5.0), "hello\nworld");
//!
//! // Explicit newlines are preserved; fitting lines pass through.
//! assert_eq!(wrap_text("short\nlines", &font, 40.0), "short\nlines");
//!
//! // Degenerate budgets are a no-op, not an error.
//! assert_eq!(wrap_text("anything", &font, -1.0), "anything");
//! assert_eq!(wrap_text("anything", &font, f32::INFINITY), "anything");
//! ```

pub mod classes;
pub mod emoji;
pub mod rules;
pub mod token;
pub mod wrap;

use std::sync::OnceLock;

use tracing::warn;

pub use scrawl_font::{CacheStats, CachedMetrics, FontMetrics, MonospaceMetrics};

pub use classes::{ClassId, ClassSet};
pub use emoji::EmojiPattern;
pub use rules::{BreakRule, RuleCompileError, RuleSet};
pub use token::{Token, TokenKind};

/// A ready-to-use wrapping engine: one compiled rule set plus the emoji
/// matcher.
///
/// Construction compiles the advanced contextual rules and silently
/// degrades to the simplified set if that fails — wrapping keeps working
/// either way, it just loses the punctuation context. All state is
/// immutable after construction, so one engine is freely shared across
/// threads; [`shared_engine`] holds the process-wide instance.
#[derive(Debug, Clone)]
pub struct WrapEngine {
    rules: RuleSet,
    emoji: EmojiPattern,
}

impl WrapEngine {
    /// Build an engine with the builtin rules (advanced, with fallback).
    #[must_use]
    pub fn new() -> Self {
        Self::from_compile(RuleSet::advanced())
    }

    /// Build an engine from a compile result, falling back to the
    /// simplified rules on failure.
    #[must_use]
    pub fn from_compile(compiled: Result<RuleSet, RuleCompileError>) -> Self {
        let rules = compiled.unwrap_or_else(|err| {
            warn!(error = %err, "break rule compilation failed, using simplified rules");
            RuleSet::simplified()
        });
        Self::with_rules(rules)
    }

    /// Build an engine over an explicit rule set.
    #[must_use]
    pub fn with_rules(rules: RuleSet) -> Self {
        Self {
            rules,
            emoji: EmojiPattern::new(),
        }
    }

    /// The engine's rule set.
    #[must_use]
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// The engine's emoji matcher.
    #[must_use]
    pub fn emoji(&self) -> &EmojiPattern {
        &self.emoji
    }

    /// Wrap `text` into the budget and rejoin with newlines.
    ///
    /// Splits on explicit newlines, keeps every physical line that
    /// already fits, wraps the rest, and joins the result — so the
    /// output has at least as many physical lines as the input, in the
    /// same order. A non-finite or negative budget returns the input
    /// unchanged.
    #[must_use]
    pub fn wrap<M: FontMetrics + ?Sized>(&self, text: &str, metrics: &M, max_width: f32) -> String {
        if !max_width.is_finite() || max_width < 0.0 {
            return text.to_string();
        }
        self.wrap_lines(text, metrics, max_width).join("\n")
    }

    /// Wrap `text` and return the physical output lines.
    #[must_use]
    pub fn wrap_lines<M: FontMetrics + ?Sized>(
        &self,
        text: &str,
        metrics: &M,
        max_width: f32,
    ) -> Vec<String> {
        if !max_width.is_finite() || max_width < 0.0 {
            return text.split('\n').map(str::to_string).collect();
        }
        wrap::wrap_physical_lines(text, max_width, &self.rules, &self.emoji, metrics)
    }

    /// Number of physical lines `text` occupies after wrapping.
    #[must_use]
    pub fn wrapped_line_count<M: FontMetrics + ?Sized>(
        &self,
        text: &str,
        metrics: &M,
        max_width: f32,
    ) -> usize {
        self.wrap_lines(text, metrics, max_width).len()
    }

    /// Split one already-newline-free line into tokens.
    #[must_use]
    pub fn tokenize(&self, line: &str) -> Vec<Token> {
        token::tokenize(line, &self.rules, &self.emoji)
    }

    /// Wrap one physical line into output lines.
    #[must_use]
    pub fn wrap_line<M: FontMetrics + ?Sized>(
        &self,
        line: &str,
        metrics: &M,
        max_width: f32,
    ) -> Vec<String> {
        wrap::wrap_line(line, max_width, &self.rules, &self.emoji, metrics)
    }

    /// Truncate a single line to the budget at atom granularity.
    #[must_use]
    pub fn truncate_to_width<M: FontMetrics + ?Sized>(
        &self,
        text: &str,
        metrics: &M,
        max_width: f32,
    ) -> String {
        wrap::truncate_to_width(text, max_width, &self.emoji, metrics)
    }

    /// Truncate a single line to the budget, marking cuts with `ellipsis`.
    #[must_use]
    pub fn truncate_with_ellipsis<M: FontMetrics + ?Sized>(
        &self,
        text: &str,
        metrics: &M,
        max_width: f32,
        ellipsis: &str,
    ) -> String {
        wrap::truncate_with_ellipsis(text, max_width, ellipsis, &self.emoji, metrics)
    }
}

impl Default for WrapEngine {
    fn default() -> Self {
        Self::new()
    }
}

static SHARED: OnceLock<WrapEngine> = OnceLock::new();

/// The process-wide engine, built on first use and immutable after.
#[must_use]
pub fn shared_engine() -> &'static WrapEngine {
    SHARED.get_or_init(WrapEngine::new)
}

/// Wrap `text` into `max_width` pixels using the shared engine.
#[must_use]
pub fn wrap_text<M: FontMetrics + ?Sized>(text: &str, metrics: &M, max_width: f32) -> String {
    shared_engine().wrap(text, metrics, max_width)
}

/// Number of physical lines `text` occupies after wrapping, using the
/// shared engine.
#[must_use]
pub fn wrapped_line_count<M: FontMetrics + ?Sized>(
    text: &str,
    metrics: &M,
    max_width: f32,
) -> usize {
    shared_engine().wrapped_line_count(text, metrics, max_width)
}
