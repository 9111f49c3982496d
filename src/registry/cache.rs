//! Cache of the filtered block table.
//!
//! Parsing a full registry dump takes a while, so the filtered table is
//! stored as JSON next to the dump and reused while the dump is unchanged.

use crate::error::InetnumError;
use crate::models::BlockTable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What a cached table was built from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SourceIdentity {
    pub path: String,
    pub len: u64,
    pub modified: Option<DateTime<Utc>>,
    /// The table depends on the split granularity as well as on the dump.
    pub min_prefix: u8,
}

impl SourceIdentity {
    /// Identity of the dump at `path` as it is on disk now.
    pub fn of(path: &Path, min_prefix: u8) -> Result<SourceIdentity, InetnumError> {
        let meta =
            std::fs::metadata(path).map_err(|e| InetnumError::io(path.display().to_string(), e))?;
        Ok(SourceIdentity {
            path: path.display().to_string(),
            len: meta.len(),
            modified: meta.modified().ok().map(DateTime::<Utc>::from),
            min_prefix,
        })
    }
}

#[derive(Deserialize)]
struct CacheFile {
    source: SourceIdentity,
    created: DateTime<Utc>,
    blocks: BlockTable,
}

#[derive(Serialize)]
struct CacheFileRef<'a> {
    source: &'a SourceIdentity,
    created: DateTime<Utc>,
    blocks: &'a BlockTable,
}

/// Read a cached table built from `source`.
///
/// # Returns
/// * `Ok(BlockTable)` - cached table, all counters zero
/// * `Err` - cache missing, unreadable, corrupt or built from another dump
pub fn read_block_cache(
    cache_file: &Path,
    source: &SourceIdentity,
) -> Result<BlockTable, InetnumError> {
    let json = std::fs::read_to_string(cache_file)
        .map_err(|e| InetnumError::Cache(format!("{}: {e}", cache_file.display())))?;

    let mut deserializer = serde_json::Deserializer::from_str(&json);
    let cache: CacheFile = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        InetnumError::Cache(format!(
            "Error parsing {} path={} error={}",
            cache_file.display(),
            e.path(),
            e
        ))
    })?;

    if cache.source != *source {
        return Err(InetnumError::Cache(format!(
            "{} was built from {:?}, dump is now {:?}",
            cache_file.display(),
            cache.source,
            source
        )));
    }
    log::info!(
        "Reading from cache file: {} ({} blocks, written {})",
        cache_file.display(),
        cache.blocks.len(),
        cache.created.format("%Y-%m-%d %H:%M:%S")
    );
    Ok(cache.blocks)
}

/// Store `table` as the cache for `source`.
pub fn write_block_cache(
    cache_file: &Path,
    source: &SourceIdentity,
    table: &BlockTable,
) -> Result<(), InetnumError> {
    let cache = CacheFileRef {
        source,
        created: Utc::now(),
        blocks: table,
    };
    let json = serde_json::to_string(&cache)
        .map_err(|e| InetnumError::Cache(format!("Error serializing JSON: {e}")))?;
    log::info!("Writing data to cache file: {}", cache_file.display());
    std::fs::write(cache_file, json)
        .map_err(|e| InetnumError::io(cache_file.display().to_string(), e))
}
