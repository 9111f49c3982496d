//! Block table: canonical block to registry record.

use super::{Attribute, Block, Record};
use crate::error::InetnumError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// Hash map keyed by [`Block`], built once, filtered once, then only
/// counters change.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BlockTable {
    entries: HashMap<Block, Record>,
}

impl BlockTable {
    pub fn new() -> BlockTable {
        BlockTable {
            entries: HashMap::new(),
        }
    }

    /// Build a table from records, keyed on each record's own block.
    ///
    /// Every block must appear once; a repeated block is an error.
    pub fn from_records(
        records: impl IntoIterator<Item = Record>,
    ) -> Result<BlockTable, InetnumError> {
        let mut entries = HashMap::new();
        for record in records {
            let block = record.block;
            if entries.insert(block, record).is_some() {
                return Err(InetnumError::InvalidBlock(format!(
                    "{block} appears more than once"
                )));
            }
        }
        Ok(BlockTable { entries })
    }

    /// Set one attribute on the entry for `block`, creating the entry if absent.
    pub fn upsert(&mut self, block: Block, attribute: Attribute) {
        self.entries
            .entry(block)
            .or_insert_with(|| Record::new(block))
            .set(attribute);
    }

    /// Hand `block` to a new source range, dropping whatever an earlier
    /// range stored there.
    pub fn claim(&mut self, block: Block, inetnum: &str, num_addr_orig: u64) {
        let mut record = Record::new(block);
        record.set(Attribute::Inetnum(inetnum.to_string()));
        record.set(Attribute::OriginalRangeSize(num_addr_orig));
        self.entries.insert(block, record);
    }

    pub fn get(&self, block: &Block) -> Option<&Record> {
        self.entries.get(block)
    }

    pub fn contains(&self, block: &Block) -> bool {
        self.entries.contains_key(block)
    }

    /// Keep only the entries for which `keep` returns true.
    ///
    /// Returns the number of removed entries.
    pub fn filter_in_place<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&Record) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|_, record| keep(record));
        before - self.entries.len()
    }

    /// Bump the counter of an existing entry. Never creates entries.
    ///
    /// Returns the new count, or `None` when `block` is not in the table.
    pub fn increment(&mut self, block: &Block) -> Option<u64> {
        self.entries.get_mut(block).map(|record| {
            record.ip_count += 1;
            record.ip_count
        })
    }

    pub fn reset_counts(&mut self) {
        for record in self.entries.values_mut() {
            record.ip_count = 0;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Unordered iteration over the records.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.entries.values()
    }

    /// Records ordered by block.
    pub fn sorted_records(&self) -> Vec<&Record> {
        let mut records: Vec<&Record> = self.entries.values().collect();
        records.sort_by_key(|r| r.block);
        records
    }
}

impl Serialize for BlockTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.sorted_records())
    }
}

impl<'de> Deserialize<'de> for BlockTable {
    fn deserialize<D>(deserializer: D) -> Result<BlockTable, D::Error>
    where
        D: Deserializer<'de>,
    {
        let records = Vec::<Record>::deserialize(deserializer)?;
        BlockTable::from_records(records).map_err(de::Error::custom)
    }
}
