//! Block table processing logic.
//!
//! - [`split`] - range to block normalization
//! - [`overlap`] - which range owns a contested block
//! - [`filter`] - placeholder allocation removal
//! - [`matcher`] - longest-prefix match and the counting pass

mod filter;
mod matcher;
mod overlap;
mod split;

// Re-export public functions
pub use filter::{filter_blocks, is_countable, is_placeholder_net_name};
pub use matcher::{CountStats, PrefixMatcher};
pub use overlap::resolve_overlaps;
pub use split::{range_size, split_range, summarize_range};
