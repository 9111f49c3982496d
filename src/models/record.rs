//! Attributes attached to one block of the table.

use super::Block;
use serde::{Deserialize, Serialize};

/// One typed attribute write, as read from a registry record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    NetName(String),
    Country(String),
    Descr(String),
    /// Raw `inetnum` value of the source range.
    Inetnum(String),
    /// Size of the source range before it was split.
    OriginalRangeSize(u64),
}

/// Registry data for a single [`Block`] plus its match counter.
///
/// Fields not yet seen while parsing stay `None`; see [`Record::is_complete`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Same as the table key, kept for output.
    #[serde(rename = "cidr")]
    pub block: Block,
    #[serde(rename = "netname")]
    pub net_name: Option<String>,
    pub country: Option<String>,
    /// First `descr` line of the source range.
    pub descr: Option<String>,
    pub inetnum: Option<String>,
    /// Number of addresses in the range this block was split from.
    pub num_addr_orig: u64,
    /// Addresses matched to this block; not persisted.
    #[serde(skip)]
    pub ip_count: u64,
}

impl Record {
    pub fn new(block: Block) -> Record {
        Record {
            block,
            net_name: None,
            country: None,
            descr: None,
            inetnum: None,
            num_addr_orig: 0,
            ip_count: 0,
        }
    }

    /// Apply one attribute write.
    pub fn set(&mut self, attribute: Attribute) {
        match attribute {
            Attribute::NetName(v) => self.net_name = Some(v),
            Attribute::Country(v) => self.country = Some(v),
            Attribute::Descr(v) => self.descr = Some(v),
            Attribute::Inetnum(v) => self.inetnum = Some(v),
            Attribute::OriginalRangeSize(v) => self.num_addr_orig = v,
        }
    }

    /// A record can be queried once its net name and country are known.
    pub fn is_complete(&self) -> bool {
        self.net_name.is_some() && self.country.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_complete() {
        let mut record = Record::new(Block::new("1.2.3.0/24").unwrap());
        assert!(!record.is_complete());
        record.set(Attribute::NetName("EXAMPLE-NET".to_string()));
        assert!(!record.is_complete());
        record.set(Attribute::Country("US".to_string()));
        record.set(Attribute::OriginalRangeSize(256));
        assert!(record.is_complete());
        assert_eq!(record.num_addr_orig, 256);
        assert_eq!(record.ip_count, 0);
    }

    #[test]
    fn test_counter_not_serialized() {
        let mut record = Record::new(Block::new("1.2.3.0/24").unwrap());
        record.ip_count = 7;
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"cidr\":\"1.2.3.0/24\""));
        assert!(!json.contains("ip_count"));
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ip_count, 0);
        assert_eq!(back.block, record.block);
    }
}
