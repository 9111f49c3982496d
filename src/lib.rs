//! Count addresses per registry allocation block.
//!
//! Pipeline: registry dump -> split into blocks -> overlap resolution into a
//! [`BlockTable`] -> placeholder filter -> longest-prefix match per address
//! -> ranked report.

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod registry;

use std::error::Error;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Instant;

pub use config::Settings;
pub use error::InetnumError;
pub use models::{Block, BlockTable, Record};
pub use processing::{CountStats, PrefixMatcher};

/// Load the filtered block table, from cache when it matches the dump.
///
/// A cache that cannot be used is logged and replaced by a full parse.
pub fn load_block_table(settings: &Settings) -> Result<BlockTable, Box<dyn Error>> {
    let inetnum_file = &settings.inetnum_file;
    let source = registry::SourceIdentity::of(inetnum_file, settings.min_prefix)?;
    let cache_file = settings.cache_file();

    if !settings.no_cache {
        match registry::read_block_cache(&cache_file, &source) {
            Ok(table) => return Ok(table),
            Err(e) => log::warn!("Cache not used, parsing dump: {e}"),
        }
    }

    let start = Instant::now();
    let (mut table, _stats) = registry::read_inetnum_file(inetnum_file, settings.min_prefix)?;
    processing::filter_blocks(&mut table);
    log::info!(
        "Loaded {} networks in {:.2} seconds",
        table.len(),
        start.elapsed().as_secs_f64()
    );

    if !settings.no_cache {
        if let Err(e) = registry::write_block_cache(&cache_file, &source, &table) {
            log::warn!("Could not write cache: {e}");
        }
    }
    Ok(table)
}

/// Run the counting pass over the address list at `ip_file`.
pub fn count_ip_file(
    ip_file: &Path,
    table: &mut BlockTable,
    matcher: &PrefixMatcher,
) -> Result<CountStats, Box<dyn Error>> {
    log::info!("Counting addresses from {}", ip_file.display());
    let file =
        File::open(ip_file).map_err(|e| InetnumError::io(ip_file.display().to_string(), e))?;
    Ok(matcher.count_reader(BufReader::new(file), table)?)
}

/// Full run: load the table, count, write the report, print the top rows.
pub fn run(settings: &Settings) -> Result<CountStats, Box<dyn Error>> {
    let mut table = load_block_table(settings)?;
    let matcher = PrefixMatcher::default();
    let stats = count_ip_file(&settings.ip_file, &mut table, &matcher)?;

    output::write_report_file(&settings.output, &table)?;
    output::print_summary(&output::report_rows(&table), settings.top);
    Ok(stats)
}
