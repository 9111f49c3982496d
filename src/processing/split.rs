//! Range to block normalization.
//!
//! Turns an `inetnum` start/end pair into the minimal set of CIDR blocks
//! covering it, then cuts any block coarser than the minimum prefix into
//! blocks of exactly that prefix.

use crate::error::InetnumError;
use crate::models::{Block, MAX_LENGTH};
use std::net::Ipv4Addr;

/// Number of addresses from `start` to `end` inclusive.
pub fn range_size(start: Ipv4Addr, end: Ipv4Addr) -> Result<u64, InetnumError> {
    let (lo, hi) = (u32::from(start) as u64, u32::from(end) as u64);
    if lo > hi {
        return Err(InetnumError::InvalidRange { start, end });
    }
    Ok(hi - lo + 1)
}

/// Minimal ordered set of blocks exactly covering `start..=end`.
///
/// Repeatedly takes the largest block that is aligned at the current start
/// and does not run past `end`.
pub fn summarize_range(start: Ipv4Addr, end: Ipv4Addr) -> Result<Vec<Block>, InetnumError> {
    let hi = u32::from(end) as u64;
    let mut next = u32::from(start) as u64;
    if next > hi {
        return Err(InetnumError::InvalidRange { start, end });
    }

    let mut blocks = Vec::new();
    while next <= hi {
        // next == 0 is aligned on every boundary
        let align_bits = next.trailing_zeros().min(MAX_LENGTH as u32);
        let remaining = hi - next + 1;
        let fit_bits = 63 - remaining.leading_zeros();
        let host_bits = align_bits.min(fit_bits);

        blocks.push(Block::containing(
            Ipv4Addr::from(next as u32),
            MAX_LENGTH - host_bits as u8,
        )?);
        next += 1u64 << host_bits;
    }
    Ok(blocks)
}

/// Split `start..=end` into blocks no coarser than `/min_prefix`.
///
/// The result is ordered by address, blocks never overlap and together
/// cover exactly the input range.
pub fn split_range(
    start: Ipv4Addr,
    end: Ipv4Addr,
    min_prefix: u8,
) -> Result<Vec<Block>, InetnumError> {
    if min_prefix > MAX_LENGTH {
        return Err(InetnumError::InvalidPrefix(min_prefix.to_string()));
    }
    let mut result = Vec::new();
    for block in summarize_range(start, end)? {
        if block.mask() < min_prefix {
            result.extend(block.subnets(min_prefix)?);
        } else {
            result.push(block);
        }
    }
    Ok(result)
}
