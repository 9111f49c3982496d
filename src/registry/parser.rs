//! Registry `inetnum` dump reader.
//!
//! Line oriented `key: value` records, blank line between records, `#`
//! comments. Only `inetnum`, `netname`, `country` and `descr` are used.

use crate::config::PROGRESS_EVERY;
use crate::error::InetnumError;
use crate::models::{Attribute, Block, BlockTable, MAX_LENGTH};
use crate::processing::{range_size, resolve_overlaps, split_range};
use colored::Colorize;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::OnceLock;

/// Regex for `<start> - <end>` inetnum values.
static INETNUM_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_inetnum_regex() -> &'static Regex {
    INETNUM_REGEX.get_or_init(|| {
        Regex::new(r"^\s*([0-9.]+)\s*-\s*([0-9.]+)\s*$").expect("Invalid Regex")
    })
}

/// Parse an `inetnum` value such as `1.2.3.0 - 1.2.3.255`.
pub fn parse_inetnum_value(value: &str) -> Result<(Ipv4Addr, Ipv4Addr), InetnumError> {
    let caps = get_inetnum_regex()
        .captures(value)
        .ok_or_else(|| InetnumError::InvalidAddress(value.to_string()))?;
    let parse = |s: &str| {
        s.parse::<Ipv4Addr>()
            .map_err(|_| InetnumError::InvalidAddress(s.to_string()))
    };
    Ok((parse(&caps[1])?, parse(&caps[2])?))
}

/// Decode one ISO-8859-1 line; every byte is the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Counters of one parse run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    /// `inetnum` lines seen.
    pub ranges: usize,
    /// `inetnum` values skipped as unparseable or inverted.
    pub invalid_ranges: usize,
    /// Blocks claimed by a range.
    pub blocks_written: usize,
    /// Blocks left to a more specific earlier range.
    pub blocks_shadowed: usize,
}

/// Incremental dump parser that owns the table while it is being built.
pub struct InetnumParser {
    table: BlockTable,
    min_prefix: u8,
    /// Blocks of the range being read; `None` outside a range or after a
    /// skipped `inetnum`.
    current: Option<Vec<Block>>,
    descr_seen: bool,
    stats: ParseStats,
}

impl InetnumParser {
    pub fn new(min_prefix: u8) -> Result<InetnumParser, InetnumError> {
        if min_prefix > MAX_LENGTH {
            return Err(InetnumError::InvalidPrefix(min_prefix.to_string()));
        }
        Ok(InetnumParser {
            table: BlockTable::new(),
            min_prefix,
            current: None,
            descr_seen: false,
            stats: ParseStats::default(),
        })
    }

    pub fn feed_line(&mut self, line: &str) {
        self.stats.lines += 1;
        if self.stats.lines % PROGRESS_EVERY == 0 {
            log::info!(
                "Loading networks: {} rows, {} blocks",
                self.stats.lines,
                self.table.len()
            );
        }

        if line.starts_with('#') {
            return;
        }
        if line.trim().is_empty() {
            self.current = None;
            return;
        }
        let Some((key, value)) = line.split_once(':') else {
            return;
        };
        let value = value.trim();
        match key.trim() {
            "inetnum" => self.start_range(value),
            "netname" => self.write(Attribute::NetName(value.to_string())),
            "country" => self.write(Attribute::Country(value.to_string())),
            "descr" => {
                if self.current.is_some() && !self.descr_seen {
                    self.descr_seen = true;
                    self.write(Attribute::Descr(value.to_string()));
                }
            }
            _ => {}
        }
    }

    fn start_range(&mut self, value: &str) {
        self.stats.ranges += 1;
        self.descr_seen = false;
        self.current = match self.split(value) {
            Ok((blocks, num_addr_orig)) => {
                let total = blocks.len();
                let kept = resolve_overlaps(blocks, num_addr_orig, &self.table);
                for block in &kept {
                    self.table.claim(*block, value, num_addr_orig);
                }
                self.stats.blocks_written += kept.len();
                self.stats.blocks_shadowed += total - kept.len();
                Some(kept)
            }
            Err(e) => {
                log::warn!(
                    "{skip} inetnum '{value}' at line {line}: {e}",
                    skip = "Skipping".yellow(),
                    line = self.stats.lines
                );
                self.stats.invalid_ranges += 1;
                None
            }
        };
    }

    fn split(&self, value: &str) -> Result<(Vec<Block>, u64), InetnumError> {
        let (start, end) = parse_inetnum_value(value)?;
        let num_addr_orig = range_size(start, end)?;
        Ok((split_range(start, end, self.min_prefix)?, num_addr_orig))
    }

    /// Write one attribute onto every block the current range owns.
    fn write(&mut self, attribute: Attribute) {
        if let Some(blocks) = &self.current {
            for block in blocks {
                self.table.upsert(*block, attribute.clone());
            }
        }
    }

    pub fn finish(self) -> (BlockTable, ParseStats) {
        log::info!(
            "Parsed {lines} rows: {ranges} ranges ({invalid} skipped), {written} blocks written, {shadowed} shadowed, {blocks} in table",
            lines = self.stats.lines,
            ranges = self.stats.ranges,
            invalid = self.stats.invalid_ranges,
            written = self.stats.blocks_written,
            shadowed = self.stats.blocks_shadowed,
            blocks = self.table.len(),
        );
        (self.table, self.stats)
    }
}

/// Parse a whole dump from `reader`.
pub fn parse_inetnum<R: BufRead>(
    mut reader: R,
    min_prefix: u8,
) -> Result<(BlockTable, ParseStats), InetnumError> {
    let mut parser = InetnumParser::new(min_prefix)?;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| InetnumError::io("inetnum input", e))?;
        if read == 0 {
            break;
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        parser.feed_line(&decode_latin1(&buf));
    }
    Ok(parser.finish())
}

/// Parse the dump at `path`.
pub fn read_inetnum_file(
    path: &Path,
    min_prefix: u8,
) -> Result<(BlockTable, ParseStats), InetnumError> {
    log::info!("Reading inetnum dump {}", path.display());
    let file = File::open(path).map_err(|e| InetnumError::io(path.display().to_string(), e))?;
    parse_inetnum(BufReader::new(file), min_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(s: &str) -> Block {
        Block::new(s).unwrap()
    }

    fn parse(text: &str) -> (BlockTable, ParseStats) {
        parse_inetnum(text.as_bytes(), 16).unwrap()
    }

    #[test]
    fn test_parse_inetnum_value() {
        assert_eq!(
            parse_inetnum_value("1.2.3.0 - 1.2.3.255").unwrap(),
            (Ipv4Addr::new(1, 2, 3, 0), Ipv4Addr::new(1, 2, 3, 255))
        );
        assert_eq!(
            parse_inetnum_value("1.2.3.0-1.2.3.255").unwrap(),
            (Ipv4Addr::new(1, 2, 3, 0), Ipv4Addr::new(1, 2, 3, 255))
        );
        assert!(parse_inetnum_value("1.2.3.0").is_err());
        assert!(parse_inetnum_value("1.2.3.0 - 1.2.3.256").is_err());
    }

    #[test]
    fn test_decode_latin1() {
        assert_eq!(decode_latin1(b"Soci\xe9t\xe9"), "Société");
        assert_eq!(decode_latin1(b"plain"), "plain");
    }

    #[test]
    fn test_single_record() {
        let (table, stats) = parse(
            "# comment\n\
             inetnum:        1.2.3.0 - 1.2.3.255\n\
             netname:        EXAMPLE-NET\n\
             descr:          Example first line\n\
             descr:          Example second line\n\
             country:        US\n\
             admin-c:        XX1-AP\n\
             \n",
        );
        assert_eq!(stats.ranges, 1);
        assert_eq!(table.len(), 1);
        let record = table.get(&block("1.2.3.0/24")).unwrap();
        assert_eq!(record.net_name.as_deref(), Some("EXAMPLE-NET"));
        assert_eq!(record.country.as_deref(), Some("US"));
        assert_eq!(record.descr.as_deref(), Some("Example first line"));
        assert_eq!(record.inetnum.as_deref(), Some("1.2.3.0 - 1.2.3.255"));
        assert_eq!(record.num_addr_orig, 256);
    }

    #[test]
    fn test_attributes_land_on_all_split_blocks() {
        let (table, _) = parse(
            "inetnum: 10.0.0.0 - 10.1.255.255\nnetname: TEN\ncountry: AU\n",
        );
        assert_eq!(table.len(), 2);
        for b in ["10.0.0.0/16", "10.1.0.0/16"] {
            let record = table.get(&block(b)).unwrap();
            assert_eq!(record.net_name.as_deref(), Some("TEN"));
            assert_eq!(record.num_addr_orig, 131_072);
        }
    }

    #[test]
    fn test_overlapping_ranges() {
        let wide = "inetnum: 1.2.0.0 - 1.2.255.255\nnetname: WIDE\ncountry: AU\ndescr: wide\n\n";
        let narrow = "inetnum: 1.2.0.0 - 1.2.255.255\nnetname: NARROW\ncountry: NZ\n\n";
        let narrower = "inetnum: 1.2.0.0 - 1.2.127.255\nnetname: HALF\ncountry: NZ\n\n";

        // equal size: first writer keeps the block
        let (table, stats) = parse(&format!("{wide}{narrow}"));
        assert_eq!(stats.blocks_shadowed, 1);
        assert_eq!(
            table.get(&block("1.2.0.0/16")).unwrap().net_name.as_deref(),
            Some("WIDE")
        );

        let (table, _) = parse(&format!("{narrower}{wide}"));
        assert_eq!(
            table.get(&block("1.2.0.0/17")).unwrap().net_name.as_deref(),
            Some("HALF")
        );
        assert_eq!(
            table.get(&block("1.2.0.0/16")).unwrap().net_name.as_deref(),
            Some("WIDE")
        );
    }

    #[test]
    fn test_winner_does_not_inherit_loser_fields() {
        let (table, _) = parse(
            "inetnum: 1.2.3.0 - 1.2.4.255\nnetname: OLD\ncountry: AU\ndescr: old descr\n\n\
             inetnum: 1.2.3.0 - 1.2.3.255\nnetname: NEW\ncountry: AU\n\n",
        );
        let record = table.get(&block("1.2.3.0/24")).unwrap();
        assert_eq!(record.net_name.as_deref(), Some("NEW"));
        assert_eq!(record.num_addr_orig, 256);
        assert_eq!(record.descr, None);

        let record = table.get(&block("1.2.4.0/24")).unwrap();
        assert_eq!(record.net_name.as_deref(), Some("OLD"));
        assert_eq!(record.num_addr_orig, 512);
        assert_eq!(record.descr.as_deref(), Some("old descr"));
    }

    #[test]
    fn test_invalid_range_skipped() {
        let (table, stats) = parse(
            "inetnum: 1.2.3.255 - 1.2.3.0\nnetname: BROKEN\ncountry: US\n\n\
             inetnum: 5.6.7.0 - 5.6.7.255\nnetname: GOOD\ncountry: US\n\n",
        );
        assert_eq!(stats.invalid_ranges, 1);
        assert_eq!(table.len(), 1);
        assert!(table.get(&block("5.6.7.0/24")).is_some());
    }

    #[test]
    fn test_attributes_outside_range_ignored() {
        let (table, _) = parse("netname: ORPHAN\ncountry: US\n\ninetnum: 5.6.7.0 - 5.6.7.255\n");
        let record = table.get(&block("5.6.7.0/24")).unwrap();
        assert_eq!(record.net_name, None);
        assert!(!record.is_complete());
    }

    #[test]
    fn test_crlf_and_colon_in_value() {
        let (table, _) = parse(
            "inetnum: 5.6.7.0 - 5.6.7.255\r\nnetname: CRLF-NET\r\ncountry: JP\r\ndescr: Office: Tokyo\r\n",
        );
        let record = table.get(&block("5.6.7.0/24")).unwrap();
        assert_eq!(record.net_name.as_deref(), Some("CRLF-NET"));
        assert_eq!(record.descr.as_deref(), Some("Office: Tokyo"));
    }

    #[test]
    fn test_latin1_bytes() {
        let bytes: &[u8] = b"inetnum: 5.6.7.0 - 5.6.7.255\nnetname: FR-NET\ncountry: FR\ndescr: Soci\xe9t\xe9\n";
        let (table, _) = parse_inetnum(bytes, 16).unwrap();
        let record = table.get(&block("5.6.7.0/24")).unwrap();
        assert_eq!(record.descr.as_deref(), Some("Société"));
    }

    #[test]
    fn test_invalid_min_prefix() {
        assert!(parse_inetnum("".as_bytes(), 33).is_err());
    }
}
