#![forbid(unsafe_code)]

//! Greedy width-budget wrapping.
//!
//! The wrapper consumes a line's token stream left to right, growing the
//! current output line while the measured width allows it. Whitespace
//! tokens are always accepted — stranding a blank at the head of the next
//! line would move the break, so excess trailing blanks are dealt with by
//! the trimmer when a line is flushed. A token that cannot fit on a
//! non-empty line flushes the line and is retried on the empty one; a
//! token that cannot fit even alone is hard-split at code-point
//! granularity, except emoji clusters which always ship whole.
//!
//! Every iteration either consumes a token or flushes a non-empty line
//! before retrying, so the loop terminates on any finite stream.

use scrawl_font::{CachedMetrics, FontMetrics};
use tracing::trace;

use crate::emoji::EmojiPattern;
use crate::rules::RuleSet;
use crate::token::tokenize;

/// Wrap every physical line of `text`, returning the output lines.
///
/// Degenerate budgets are the caller's business: this assumes a finite,
/// non-negative `max_width`. One measurement session is shared across
/// all physical lines of the pass.
pub(crate) fn wrap_physical_lines<M: FontMetrics + ?Sized>(
    text: &str,
    max_width: f32,
    rules: &RuleSet,
    emoji: &EmojiPattern,
    metrics: &M,
) -> Vec<String> {
    let session = CachedMetrics::new(metrics);
    let mut out = Vec::new();
    for line in text.split('\n') {
        if session.line_width(line) <= max_width {
            out.push(line.to_string());
        } else {
            out.extend(wrap_line(line, max_width, rules, emoji, &session));
        }
    }
    out
}

/// Wrap one physical line into output lines within the width budget.
pub(crate) fn wrap_line<M: FontMetrics + ?Sized>(
    line: &str,
    max_width: f32,
    rules: &RuleSet,
    emoji: &EmojiPattern,
    metrics: &M,
) -> Vec<String> {
    let tokens = tokenize(line, rules, emoji);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;

    let mut index = 0;
    while index < tokens.len() {
        let token = &tokens[index];
        // Single code points extend the running width; anything longer
        // (emoji sequences in particular) gets a full remeasure, since
        // cluster widths are not the sum of their parts.
        let test_width = match token.single_char() {
            Some(ch) => current_width + metrics.char_width(ch),
            None => {
                let mut test = current.clone();
                test.push_str(token.as_str());
                metrics.line_width(&test)
            }
        };

        if token.is_whitespace() || test_width <= max_width {
            current.push_str(token.as_str());
            current_width = test_width;
            index += 1;
        } else if current.is_empty() {
            // The token alone blows the budget: hard-split it, keep the
            // tail open so following tokens can still join it.
            let mut fragments = wrap_word(token.as_str(), max_width, emoji, metrics);
            let tail = fragments.pop().unwrap_or_default();
            lines.extend(fragments);
            current_width = metrics.line_width(&tail);
            current = tail;
            index += 1;
        } else {
            lines.push(trim_line(std::mem::take(&mut current), max_width, metrics));
            current_width = 0.0;
            // Retry the same token against the now-empty line.
        }
    }

    if !current.is_empty() {
        lines.push(trim_line(current, max_width, metrics));
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    trace!(
        tokens = tokens.len(),
        lines = lines.len(),
        "wrapped physical line"
    );
    lines
}

/// Hard-split one token at code-point boundaries.
///
/// Produces the fewest fragments that each fit the budget, except that a
/// single code point or emoji cluster wider than the budget is emitted
/// whole. The token must not contain whitespace; tokenization upholds
/// this, and debug builds check it.
pub(crate) fn wrap_word<M: FontMetrics + ?Sized>(
    word: &str,
    max_width: f32,
    emoji: &EmojiPattern,
    metrics: &M,
) -> Vec<String> {
    debug_assert!(
        !word.chars().any(char::is_whitespace),
        "word splitter input must not contain whitespace: {word:?}"
    );

    if emoji.is_match(word) {
        return vec![word.to_string()];
    }

    let mut fragments = Vec::new();
    let mut current = String::new();
    let mut current_width = 0.0_f32;
    for ch in word.chars() {
        let width = metrics.char_width(ch);
        if !current.is_empty() && current_width + width > max_width {
            fragments.push(std::mem::take(&mut current));
            current_width = 0.0;
        }
        current.push(ch);
        current_width += width;
    }
    if !current.is_empty() {
        fragments.push(current);
    }
    fragments
}

/// Trim trailing whitespace from `line`, but only as much as needed.
///
/// A line already within the budget is returned untouched. Otherwise the
/// trailing blanks are stripped and re-added one at a time onto the
/// running width while they still fit, so the line keeps the longest
/// trailing-blank prefix that the budget allows.
pub(crate) fn trim_line<M: FontMetrics + ?Sized>(
    line: String,
    max_width: f32,
    metrics: &M,
) -> String {
    if metrics.line_width(&line) <= max_width {
        return line;
    }

    let stripped = line.trim_end_matches(char::is_whitespace);
    let stripped_end = stripped.len();
    let mut trimmed = line[..stripped_end].to_string();
    let mut trimmed_width = metrics.line_width(&trimmed);
    for blank in line[stripped_end..].chars() {
        let test_width = trimmed_width + metrics.char_width(blank);
        if test_width > max_width {
            break;
        }
        trimmed.push(blank);
        trimmed_width = test_width;
    }
    trimmed
}

/// Truncate `text` to the budget without cutting a code point or emoji
/// cluster in half.
pub(crate) fn truncate_to_width<M: FontMetrics + ?Sized>(
    text: &str,
    max_width: f32,
    emoji: &EmojiPattern,
    metrics: &M,
) -> String {
    let cps: Vec<char> = text.chars().collect();
    let mut out = String::new();
    let mut width = 0.0_f32;
    let mut i = 0;
    while i < cps.len() {
        let len = emoji.match_len(&cps[i..]).unwrap_or(1);
        let atom: String = cps[i..i + len].iter().collect();
        let atom_width = if len == 1 {
            metrics.char_width(cps[i])
        } else {
            metrics.line_width(&atom)
        };
        if width + atom_width > max_width {
            break;
        }
        out.push_str(&atom);
        width += atom_width;
        i += len;
    }
    out
}

/// Truncate `text` to the budget, appending `ellipsis` when anything was
/// cut. Falls back to plain truncation when the ellipsis alone is wider
/// than the budget.
pub(crate) fn truncate_with_ellipsis<M: FontMetrics + ?Sized>(
    text: &str,
    max_width: f32,
    ellipsis: &str,
    emoji: &EmojiPattern,
    metrics: &M,
) -> String {
    if metrics.line_width(text) <= max_width {
        return text.to_string();
    }
    let ellipsis_width = metrics.line_width(ellipsis);
    if ellipsis_width >= max_width {
        return truncate_to_width(text, max_width, emoji, metrics);
    }
    let mut out = truncate_to_width(text, max_width - ellipsis_width, emoji, metrics);
    out.push_str(ellipsis);
    out
}
