//! CIDR address block.
//!
//! Provides [`Block`], the (network address, prefix length) key of the
//! block table, along with the mask arithmetic used to split ranges and
//! to build lookup candidates.

use crate::error::InetnumError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Convert a prefix length to a subnet mask as u32.
///
/// # Examples
/// ```
/// use inetnum_ip_count::models::get_cidr_mask;
/// assert_eq!(get_cidr_mask(24).unwrap(), 0xFFFFFF00);
/// ```
pub fn get_cidr_mask(len: u8) -> Result<u32, InetnumError> {
    if len > MAX_LENGTH {
        Err(InetnumError::InvalidPrefix(len.to_string()))
    } else {
        let right_len = MAX_LENGTH - len;
        let all_bits = u32::MAX as u64;

        let mask = (all_bits >> right_len) << right_len;

        Ok(mask as u32)
    }
}

/// Get the network address for a given IP and prefix length.
pub fn cut_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, InetnumError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from(u32::from(addr) & mask))
}

/// Calculate the broadcast (highest) address for a given IP and prefix length.
pub fn broadcast_addr(addr: Ipv4Addr, len: u8) -> Result<Ipv4Addr, InetnumError> {
    let mask = get_cidr_mask(len)?;
    Ok(Ipv4Addr::from((u32::from(addr) & mask) | !mask))
}

/// Number of addresses in a block of the given prefix length.
pub fn num_addresses(len: u8) -> Result<u64, InetnumError> {
    if len > MAX_LENGTH {
        Err(InetnumError::InvalidPrefix(len.to_string()))
    } else {
        Ok(1u64 << (MAX_LENGTH - len))
    }
}

/// Network address plus prefix length.
///
/// Only [`Block::new`] and [`Block::containing`] build one, and both clear
/// the host bits, so equal address sets always give equal keys.
#[derive(Eq, PartialEq, Ord, PartialOrd, Debug, Copy, Clone, Hash)]
pub struct Block {
    addr: Ipv4Addr,
    mask: u8,
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Block, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Block::new(&s).map_err(de::Error::custom)
    }
}

impl Block {
    /// Create a new [`Block`] from a CIDR string (e.g., "10.0.0.0/24").
    ///
    /// Host bits are cleared, so "10.1.2.3/8" gives `10.0.0.0/8`.
    pub fn new(addr_cidr: &str) -> Result<Block, InetnumError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| InetnumError::InvalidBlock(addr_cidr.to_string()))?;
        let addr = Ipv4Addr::from_str(addr)
            .map_err(|_| InetnumError::InvalidAddress(addr.to_string()))?;
        let mask: u8 = mask
            .parse()
            .map_err(|_| InetnumError::InvalidBlock(addr_cidr.to_string()))?;
        Block::containing(addr, mask)
    }

    /// The block of prefix length `mask` that `addr` falls in.
    pub fn containing(addr: Ipv4Addr, mask: u8) -> Result<Block, InetnumError> {
        Ok(Block {
            addr: cut_addr(addr, mask)?,
            mask,
        })
    }

    /// Prefix length (0-32).
    pub fn mask(&self) -> u8 {
        self.mask
    }

    /// Lowest (network) address in the block.
    pub fn lo(&self) -> Ipv4Addr {
        self.addr
    }

    /// Highest (broadcast) address in the block.
    pub fn hi(&self) -> Ipv4Addr {
        broadcast_addr(self.addr, self.mask).unwrap_or(self.addr)
    }

    /// Number of addresses covered, 2^32 for a /0.
    pub fn num_addresses(&self) -> u64 {
        num_addresses(self.mask).unwrap_or(1)
    }

    /// True when the top `mask` bits of `ip` equal the block's network bits.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        match cut_addr(ip, self.mask) {
            Ok(network) => network == self.addr,
            Err(_) => false,
        }
    }

    /// All blocks of prefix length `new_mask` that make up this block.
    pub fn subnets(&self, new_mask: u8) -> Result<Vec<Block>, InetnumError> {
        if new_mask < self.mask || new_mask > MAX_LENGTH {
            return Err(InetnumError::InvalidPrefix(format!(
                "cannot cut {self} into /{new_mask}"
            )));
        }
        let count = 1u64 << (new_mask - self.mask);
        let step = num_addresses(new_mask)?;
        let base = u32::from(self.addr) as u64;
        Ok((0..count)
            .map(|i| Block {
                addr: Ipv4Addr::from((base + i * step) as u32),
                mask: new_mask,
            })
            .collect())
    }
}

impl FromStr for Block {
    type Err = InetnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Block::new(s)
    }
}

impl std::fmt::Display for Block {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}
