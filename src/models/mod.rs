//! Domain models.
//!
//! - [`Block`] - canonical CIDR key with mask arithmetic
//! - [`Record`] and [`Attribute`] - registry data attached to a block
//! - [`BlockTable`] - the block to record map every phase works on

mod block;
mod record;
mod table;

// Re-export public types
pub use block::{
    broadcast_addr, cut_addr, get_cidr_mask, num_addresses, Block, MAX_LENGTH,
};
pub use record::{Attribute, Record};
pub use table::BlockTable;
