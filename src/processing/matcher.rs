//! Longest-prefix match of single addresses against the block table.

use crate::config::{MATCH_PREFIX_LONGEST, MATCH_PREFIX_SHORTEST, PROGRESS_EVERY};
use crate::error::InetnumError;
use crate::models::{Block, BlockTable, MAX_LENGTH};
use colored::Colorize;
use std::io::BufRead;
use std::net::Ipv4Addr;

/// Tries prefix lengths from `longest` down to `shortest`; the first block
/// found in the table is the most specific one containing the address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixMatcher {
    longest: u8,
    shortest: u8,
}

impl Default for PrefixMatcher {
    fn default() -> Self {
        PrefixMatcher {
            longest: MATCH_PREFIX_LONGEST,
            shortest: MATCH_PREFIX_SHORTEST,
        }
    }
}

impl PrefixMatcher {
    pub fn new(longest: u8, shortest: u8) -> Result<PrefixMatcher, InetnumError> {
        if longest > MAX_LENGTH || shortest > longest {
            return Err(InetnumError::InvalidPrefix(format!(
                "search window /{longest} down to /{shortest}"
            )));
        }
        Ok(PrefixMatcher { longest, shortest })
    }

    /// Candidate blocks for `addr`, most specific first.
    pub fn candidates(&self, addr: Ipv4Addr) -> impl Iterator<Item = Block> {
        (self.shortest..=self.longest)
            .rev()
            .filter_map(move |mask| Block::containing(addr, mask).ok())
    }

    /// Most specific block in `table` containing `addr`.
    pub fn find(&self, addr: Ipv4Addr, table: &BlockTable) -> Option<Block> {
        self.candidates(addr).find(|block| table.contains(block))
    }

    /// Count one address. Returns the matched block, `None` on a miss.
    pub fn count(&self, addr: Ipv4Addr, table: &mut BlockTable) -> Option<Block> {
        let block = self.find(addr, table)?;
        table.increment(&block);
        Some(block)
    }

    /// Counting pass over an address list, one address per line.
    ///
    /// Blank lines are skipped. Lines that are not an IPv4 address and
    /// addresses with no covering block are counted, never fatal.
    pub fn count_addresses<I, S>(&self, lines: I, table: &mut BlockTable) -> CountStats
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut stats = CountStats::default();
        for line in lines {
            let line = line.as_ref().trim();
            if line.is_empty() {
                continue;
            }
            stats.total += 1;
            match line.parse::<Ipv4Addr>() {
                Ok(addr) => match self.count(addr, table) {
                    Some(_) => stats.matched += 1,
                    None => {
                        log::trace!("No block found for {addr}");
                        stats.missed += 1;
                    }
                },
                Err(_) => {
                    log::debug!("Skipping invalid address line '{line}'");
                    stats.invalid += 1;
                }
            }
            if stats.total % PROGRESS_EVERY == 0 {
                log::info!("Processing: {} addresses", stats.total);
            }
        }
        stats.log();
        stats
    }

    /// Counting pass streamed from `reader`.
    ///
    /// Lines are decoded lossily, so bytes that are not UTF-8 make the line
    /// invalid instead of stopping the pass. Only a failing read is an error.
    pub fn count_reader<R: BufRead>(
        &self,
        reader: R,
        table: &mut BlockTable,
    ) -> Result<CountStats, InetnumError> {
        let mut read_error = None;
        let lines = reader.split(b'\n').map_while(|line| match line {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                read_error = Some(e);
                None
            }
        });
        let stats = self.count_addresses(lines, table);
        match read_error {
            Some(e) => Err(InetnumError::io("address list", e)),
            None => Ok(stats),
        }
    }
}

/// Outcome of a counting pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CountStats {
    /// Non-blank input lines.
    pub total: usize,
    pub matched: usize,
    /// Valid addresses with no covering block.
    pub missed: usize,
    /// Lines that are not an IPv4 address.
    pub invalid: usize,
}

impl CountStats {
    pub fn miss_rate(&self) -> f64 {
        let looked_up = self.matched + self.missed;
        if looked_up == 0 {
            0.0
        } else {
            self.missed as f64 / looked_up as f64
        }
    }

    fn log(&self) {
        log::info!(
            "Counted {total} address(es): {matched} matched, {missed} missed ({rate:.2}%), {invalid} invalid",
            total = self.total,
            matched = self.matched.to_string().green(),
            missed = self.missed.to_string().yellow(),
            rate = self.miss_rate() * 100.0,
            invalid = self.invalid,
        );
    }
}
