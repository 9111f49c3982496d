//! Overlapping range resolution.
//!
//! Registry dumps declare sub-allocations inside larger allocations. When a
//! newly split range produces a block that an earlier range already owns,
//! the range with fewer addresses is the more specific one and keeps it.

use crate::models::{Block, BlockTable};

/// Keep only the blocks the new range is allowed to write.
///
/// A block already in `table` stays with its current owner unless that
/// owner's original range is strictly larger than `num_addr_orig`. Equal
/// sizes keep the first writer.
pub fn resolve_overlaps(
    new_blocks: Vec<Block>,
    num_addr_orig: u64,
    table: &BlockTable,
) -> Vec<Block> {
    new_blocks
        .into_iter()
        .filter(|block| match table.get(block) {
            Some(existing) => {
                let wins = existing.num_addr_orig > num_addr_orig;
                if !wins {
                    log::trace!(
                        "{block} kept by range of {} addresses over {num_addr_orig}",
                        existing.num_addr_orig
                    );
                }
                wins
            }
            None => true,
        })
        .collect()
}
