#![forbid(unsafe_code)]

//! Font measurement seam for the scrawl text engine.
//!
//! Text wrapping needs to know how wide strings are, but it must not know
//! how widths are produced: on a canvas they come from the platform's text
//! measurement, in a terminal from cell counts, in tests from a fixed table.
//! This crate defines that boundary:
//! - [`FontMetrics`] - the width oracle trait (per code point and per line)
//! - [`MonospaceMetrics`] - deterministic reference oracle (cells × advance)
//! - [`CachedMetrics`] - a measurement session that memoizes oracle calls
//!   for the duration of one wrapping pass
//!
//! # Example
//! ```
//! use scrawl_font::{FontMetrics, MonospaceMetrics, CachedMetrics};
//!
//! let font = MonospaceMetrics::unit();
//! assert_eq!(font.line_width("hello"), 5.0);
//! assert_eq!(font.char_width('世'), 2.0);
//!
//! // A session caches repeated lookups against the same font.
//! let session = CachedMetrics::new(&font);
//! session.char_width('e');
//! session.char_width('e');
//! assert_eq!(session.stats().hits, 1);
//! ```

pub mod cache;
pub mod metrics;

pub use cache::{CacheStats, CachedMetrics, DEFAULT_LINE_CACHE_CAPACITY};
pub use metrics::{FontMetrics, MonospaceMetrics};
