//! Registry dump input and the table cache.
//!
//! - [`parser`] - `inetnum` dump reader building the block table
//! - [`cache`] - JSON snapshot of the filtered table

mod cache;
mod parser;

// Re-export public types and functions
pub use cache::{read_block_cache, write_block_cache, SourceIdentity};
pub use parser::{
    decode_latin1, parse_inetnum, parse_inetnum_value, read_inetnum_file, InetnumParser,
    ParseStats,
};
