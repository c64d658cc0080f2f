#![forbid(unsafe_code)]

//! Per-pass measurement cache.
//!
//! Oracle calls are the hot path of a wrapping pass: the same code points
//! are measured over and over while lines fill up. A [`CachedMetrics`]
//! session wraps a borrowed oracle and memoizes its answers for the
//! lifetime of the session — per-char advances in a hash map, whole-line
//! measurements in a bounded LRU keyed by a 64-bit FxHash. A session is
//! created at the start of a wrapping pass and dropped with it; nothing is
//! cached across passes (the oracle, and therefore the font, may change
//! between calls).
//!
//! # Example
//! ```
//! use scrawl_font::{CachedMetrics, FontMetrics, MonospaceMetrics};
//!
//! let font = MonospaceMetrics::unit();
//! let session = CachedMetrics::new(&font);
//!
//! assert_eq!(session.line_width("hello"), 5.0);
//! assert_eq!(session.line_width("hello"), 5.0);
//!
//! let stats = session.stats();
//! assert_eq!(stats.hits, 1);
//! assert_eq!(stats.misses, 1);
//! ```

use std::cell::{Cell, RefCell};
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;

use lru::LruCache;
use rustc_hash::{FxHashMap, FxHasher};

use crate::metrics::FontMetrics;

/// Default capacity of the whole-line LRU.
pub const DEFAULT_LINE_CACHE_CAPACITY: usize = 1024;

/// Counters describing how well a measurement session is caching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to ask the oracle.
    pub misses: u64,
    /// Entries currently held (chars + lines).
    pub size: usize,
    /// Maximum line entries before LRU eviction.
    pub capacity: usize,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache (0.0 to 1.0).
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// A memoizing view over a borrowed [`FontMetrics`] oracle.
///
/// Implements [`FontMetrics`] itself, so callers that accept any oracle can
/// be handed a session transparently. Interior mutability keeps the oracle
/// contract (`&self`) intact; sessions are single-threaded by construction
/// and not `Sync`.
///
/// The per-char map is unbounded (bounded in practice by the distinct code
/// points of one pass); whole-line entries are evicted LRU. Line keys are
/// 64-bit FxHashes rather than owned strings, trading a ~1-in-2^64 collision
/// for not copying every candidate line.
#[derive(Debug)]
pub struct CachedMetrics<'a, M: FontMetrics + ?Sized> {
    oracle: &'a M,
    chars: RefCell<FxHashMap<char, f32>>,
    lines: RefCell<LruCache<u64, f32>>,
    hits: Cell<u64>,
    misses: Cell<u64>,
}

impl<'a, M: FontMetrics + ?Sized> CachedMetrics<'a, M> {
    /// Start a session with the default line capacity.
    #[must_use]
    pub fn new(oracle: &'a M) -> Self {
        Self::with_line_capacity(oracle, DEFAULT_LINE_CACHE_CAPACITY)
    }

    /// Start a session with a custom line capacity (minimum 1).
    #[must_use]
    pub fn with_line_capacity(oracle: &'a M, capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity is at least 1");
        Self {
            oracle,
            chars: RefCell::new(FxHashMap::default()),
            lines: RefCell::new(LruCache::new(capacity)),
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    /// The wrapped oracle.
    #[must_use]
    pub fn oracle(&self) -> &'a M {
        self.oracle
    }

    /// Current session counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let lines = self.lines.borrow();
        CacheStats {
            hits: self.hits.get(),
            misses: self.misses.get(),
            size: self.chars.borrow().len() + lines.len(),
            capacity: lines.cap().get(),
        }
    }

    fn record_hit(&self) {
        self.hits.set(self.hits.get() + 1);
    }

    fn record_miss(&self) {
        self.misses.set(self.misses.get() + 1);
    }
}

fn line_key(line: &str) -> u64 {
    let mut hasher = FxHasher::default();
    line.hash(&mut hasher);
    hasher.finish()
}

impl<M: FontMetrics + ?Sized> FontMetrics for CachedMetrics<'_, M> {
    fn char_width(&self, ch: char) -> f32 {
        if let Some(&width) = self.chars.borrow().get(&ch) {
            self.record_hit();
            return width;
        }
        let width = self.oracle.char_width(ch);
        self.chars.borrow_mut().insert(ch, width);
        self.record_miss();
        width
    }

    fn line_width(&self, line: &str) -> f32 {
        let key = line_key(line);
        if let Some(&width) = self.lines.borrow_mut().get(&key) {
            self.record_hit();
            return width;
        }
        let width = self.oracle.line_width(line);
        self.lines.borrow_mut().put(key, width);
        self.record_miss();
        width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonospaceMetrics;

    #[test]
    fn char_lookups_hit_after_first_miss() {
        let font = MonospaceMetrics::unit();
        let session = CachedMetrics::new(&font);
        assert_eq!(session.char_width('a'), 1.0);
        assert_eq!(session.char_width('a'), 1.0);
        assert_eq!(session.char_width('你'), 2.0);
        let stats = session.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn line_lookups_are_cached() {
        let font = MonospaceMetrics::unit();
        let session = CachedMetrics::new(&font);
        assert_eq!(session.line_width("hello world"), 11.0);
        assert_eq!(session.line_width("hello world"), 11.0);
        assert_eq!(session.stats().hits, 1);
    }

    #[test]
    fn distinct_lines_are_distinct_entries() {
        let font = MonospaceMetrics::unit();
        let session = CachedMetrics::new(&font);
        session.line_width("a");
        session.line_width("b");
        session.line_width("c");
        let stats = session.stats();
        assert_eq!(stats.misses, 3);
        assert_eq!(stats.size, 3);
    }

    #[test]
    fn line_capacity_is_bounded() {
        let font = MonospaceMetrics::unit();
        let session = CachedMetrics::with_line_capacity(&font, 2);
        session.line_width("a");
        session.line_width("b");
        session.line_width("c");
        assert_eq!(session.stats().size, 2);
        assert_eq!(session.stats().capacity, 2);
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let font = MonospaceMetrics::unit();
        let session = CachedMetrics::with_line_capacity(&font, 0);
        assert_eq!(session.stats().capacity, 1);
    }

    #[test]
    fn hit_rate_with_no_lookups_is_zero() {
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }

    #[test]
    fn hit_rate_reflects_counters() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            size: 0,
            capacity: 1,
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn cached_widths_equal_oracle_widths(s in "[a-zA-Z0-9 你好世界]{0,40}") {
                let font = MonospaceMetrics::unit();
                let session = CachedMetrics::new(&font);
                // Measure twice so the second round is answered from cache.
                let first = session.line_width(&s);
                let second = session.line_width(&s);
                prop_assert_eq!(first, font.line_width(&s));
                prop_assert_eq!(second, first);
                for ch in s.chars() {
                    prop_assert_eq!(session.char_width(ch), font.char_width(ch));
                }
            }
        }
    }
}
