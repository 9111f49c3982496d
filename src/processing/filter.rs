//! Placeholder allocation removal.
//!
//! Handles removing unassigned/reserved registry entries and records that
//! never got a net name or country.

use crate::config::{PLACEHOLDER_NET_NAMES, PLACEHOLDER_NET_NAME_PREFIXES, RESERVED_COUNTRY};
use crate::models::{BlockTable, Record};

/// True for net names registries use for space that is not really delegated.
pub fn is_placeholder_net_name(net_name: &str) -> bool {
    PLACEHOLDER_NET_NAMES.contains(&net_name)
        || PLACEHOLDER_NET_NAME_PREFIXES
            .iter()
            .any(|prefix| net_name.starts_with(prefix))
}

/// Keep predicate: a complete record that is not a placeholder and not `ZZ`.
pub fn is_countable(record: &Record) -> bool {
    match (&record.net_name, &record.country) {
        (Some(net_name), Some(country)) => {
            !is_placeholder_net_name(net_name) && country != RESERVED_COUNTRY
        }
        _ => false,
    }
}

/// Drop every entry that must not take part in counting.
///
/// Runs once, after the dump is loaded and before any lookup.
/// Returns the number of removed entries.
pub fn filter_blocks(table: &mut BlockTable) -> usize {
    let mut incomplete = 0;
    let removed = table.filter_in_place(|record| {
        if !record.is_complete() {
            incomplete += 1;
        }
        is_countable(record)
    });
    if incomplete > 0 {
        log::warn!(
            "Removed {incomplete} block(s) missing netname or country, e.g. from truncated records"
        );
    }
    log::info!(
        "Removed {removed} placeholder/incomplete block(s), {} left",
        table.len()
    );
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Attribute, Block};

    fn add(
        table: &mut BlockTable,
        cidr: &str,
        net_name: Option<&str>,
        country: Option<&str>,
    ) -> Block {
        let block = Block::new(cidr).unwrap();
        table.claim(block, cidr, block.num_addresses());
        if let Some(n) = net_name {
            table.upsert(block, Attribute::NetName(n.to_string()));
        }
        if let Some(c) = country {
            table.upsert(block, Attribute::Country(c.to_string()));
        }
        block
    }

    #[test]
    fn test_placeholder_names() {
        assert!(is_placeholder_net_name("IANA-BLOCK"));
        assert!(is_placeholder_net_name("ARIN-CIDR-BLOCK"));
        assert!(is_placeholder_net_name("RIPE-CIDR-BLOCK"));
        assert!(is_placeholder_net_name("ERX-NETBLOCK"));
        assert!(is_placeholder_net_name("IANA-NETBLOCK-10"));
        assert!(is_placeholder_net_name("STUB-203-0-113"));
        assert!(!is_placeholder_net_name("EXAMPLE-NET"));
        assert!(!is_placeholder_net_name("IANA-BLOCK-2"));
        assert!(!is_placeholder_net_name("MY-STUB-NET"));
    }

    #[test]
    fn test_filter_blocks() {
        let mut table = BlockTable::new();
        let iana = add(&mut table, "10.0.0.0/16", Some("IANA-NETBLOCK-10"), Some("AU"));
        let real = add(&mut table, "10.1.0.0/16", Some("EXAMPLE-NET"), Some("US"));
        let zz = add(&mut table, "10.2.0.0/16", Some("EXAMPLE-NET"), Some("ZZ"));
        let no_country = add(&mut table, "10.3.0.0/16", Some("EXAMPLE-NET"), None);
        let no_name = add(&mut table, "10.4.0.0/16", None, Some("US"));

        assert_eq!(filter_blocks(&mut table), 4);
        assert!(table.contains(&real));
        for gone in [iana, zz, no_country, no_name] {
            assert!(!table.contains(&gone), "{gone} should be removed");
        }
    }
}
