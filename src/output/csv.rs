//! CSV report of matched blocks.

use crate::error::InetnumError;
use crate::models::{Block, BlockTable, Record};
use itertools::Itertools;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Report columns, in order.
pub const REPORT_HEADER: [&str; 7] = [
    "ip_count",
    "cidr",
    "country",
    "netname",
    "descr",
    "inetnum",
    "num_addr_orig",
];

/// One report line.
#[derive(Serialize, Debug, PartialEq, Eq)]
pub struct ReportRow<'a> {
    pub ip_count: u64,
    pub cidr: Block,
    pub country: &'a str,
    pub netname: &'a str,
    pub descr: &'a str,
    pub inetnum: &'a str,
    pub num_addr_orig: u64,
}

impl<'a> From<&'a Record> for ReportRow<'a> {
    fn from(r: &'a Record) -> Self {
        ReportRow {
            ip_count: r.ip_count,
            cidr: r.block,
            country: r.country.as_deref().unwrap_or_default(),
            netname: r.net_name.as_deref().unwrap_or_default(),
            descr: r.descr.as_deref().unwrap_or_default(),
            inetnum: r.inetnum.as_deref().unwrap_or_default(),
            num_addr_orig: r.num_addr_orig,
        }
    }
}

/// Blocks with at least one match, highest count first, ties by block.
pub fn report_rows(table: &BlockTable) -> Vec<ReportRow<'_>> {
    table
        .iter()
        .filter(|r| r.ip_count > 0)
        .sorted_by(|a, b| {
            b.ip_count
                .cmp(&a.ip_count)
                .then_with(|| a.block.cmp(&b.block))
        })
        .map(ReportRow::from)
        .collect()
}

/// Write the header and `rows` as CSV.
pub fn write_report<W: Write>(writer: W, rows: &[ReportRow<'_>]) -> Result<(), InetnumError> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(REPORT_HEADER)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write the report for `table` to `path`. Returns the number of rows.
pub fn write_report_file(path: &Path, table: &BlockTable) -> Result<usize, InetnumError> {
    let rows = report_rows(table);
    let file = File::create(path).map_err(|e| InetnumError::io(path.display().to_string(), e))?;
    write_report(file, &rows)?;
    log::info!("Wrote {} report rows to {}", rows.len(), path.display());
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attribute;

    fn add(table: &mut BlockTable, cidr: &str, count: u64) -> Block {
        let block = Block::new(cidr).unwrap();
        table.claim(block, cidr, block.num_addresses());
        table.upsert(block, Attribute::NetName(format!("NET-{cidr}")));
        table.upsert(block, Attribute::Country("US".to_string()));
        for _ in 0..count {
            table.increment(&block);
        }
        block
    }

    #[test]
    fn test_report_rows_order() {
        let mut table = BlockTable::new();
        add(&mut table, "10.2.0.0/16", 2);
        add(&mut table, "10.0.0.0/16", 5);
        add(&mut table, "10.1.0.0/16", 2);
        add(&mut table, "10.3.0.0/16", 0);

        let rows = report_rows(&table);
        let order: Vec<String> = rows.iter().map(|r| r.cidr.to_string()).collect();
        assert_eq!(order, vec!["10.0.0.0/16", "10.1.0.0/16", "10.2.0.0/16"]);
        assert_eq!(rows[0].ip_count, 5);
    }

    #[test]
    fn test_write_report() {
        let mut table = BlockTable::new();
        let block = add(&mut table, "1.2.3.0/24", 3);
        table.upsert(block, Attribute::Descr("Example, Inc.".to_string()));

        let mut out = Vec::new();
        write_report(&mut out, &report_rows(&table)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "ip_count,cidr,country,netname,descr,inetnum,num_addr_orig\n\
             3,1.2.3.0/24,US,NET-1.2.3.0/24,\"Example, Inc.\",1.2.3.0/24,256\n"
        );
    }

    #[test]
    fn test_empty_report_has_header() {
        let mut out = Vec::new();
        write_report(&mut out, &report_rows(&BlockTable::new())).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ip_count,cidr,country,netname,descr,inetnum,num_addr_orig\n"
        );
    }
}
