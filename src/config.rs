//! Constants and command-line settings.

use clap::Parser;
use std::path::PathBuf;

/// Ranges coarser than this are cut into blocks of exactly this size.
pub const MIN_SUBNET_PREFIX: u8 = 16;

/// Most specific prefix tried when matching an address.
pub const MATCH_PREFIX_LONGEST: u8 = 31;
/// Least specific prefix tried when matching an address.
pub const MATCH_PREFIX_SHORTEST: u8 = 7;

/// Net names of placeholder allocations, matched exactly.
pub const PLACEHOLDER_NET_NAMES: [&str; 4] = [
    "IANA-BLOCK",
    "ARIN-CIDR-BLOCK",
    "RIPE-CIDR-BLOCK",
    "ERX-NETBLOCK",
];
/// Net name prefixes of placeholder allocations.
pub const PLACEHOLDER_NET_NAME_PREFIXES: [&str; 2] = ["IANA-NETBLOCK", "STUB-"];
/// Country code used by registries for unassigned space.
pub const RESERVED_COUNTRY: &str = "ZZ";

/// Log a progress line every this many input lines.
pub const PROGRESS_EVERY: usize = 1_000_000;

/// Suffix appended to the dump path to name its cache file.
pub const CACHE_SUFFIX: &str = ".cache.json";

pub const DEFAULT_INETNUM_FILE: &str = ".data/apnic.db.inetnum";
pub const DEFAULT_IP_FILE: &str = ".data/ips.txt";
pub const DEFAULT_RESULT_FILE: &str = "results.csv";

/// Count addresses per registry allocation block.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Settings {
    /// Registry inetnum dump (RPSL text, Latin-1)
    #[arg(short, long, env = "INETNUM_FILE", default_value = DEFAULT_INETNUM_FILE)]
    pub inetnum_file: PathBuf,

    /// Address list, one IPv4 address per line
    #[arg(short = 'a', long, env = "IP_FILE", default_value = DEFAULT_IP_FILE)]
    pub ip_file: PathBuf,

    /// CSV report destination
    #[arg(short, long, env = "RESULT_FILE", default_value = DEFAULT_RESULT_FILE)]
    pub output: PathBuf,

    /// Ranges coarser than this prefix length are split down to it
    #[arg(long, env = "MIN_SUBNET_PREFIX", default_value_t = MIN_SUBNET_PREFIX,
          value_parser = clap::value_parser!(u8).range(0..=32))]
    pub min_prefix: u8,

    /// Always parse the dump, never read or write the cache
    #[arg(long)]
    pub no_cache: bool,

    /// Number of report rows echoed to the terminal
    #[arg(long, default_value_t = 20)]
    pub top: usize,

    /// log4rs configuration file
    #[arg(long, env = "LOG_CONFIG", default_value = "log4rs.yml")]
    pub log_config: PathBuf,
}

impl Settings {
    /// Location of the cache file belonging to the configured dump.
    pub fn cache_file(&self) -> PathBuf {
        let mut name = self.inetnum_file.clone().into_os_string();
        name.push(CACHE_SUFFIX);
        PathBuf::from(name)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            inetnum_file: PathBuf::from(DEFAULT_INETNUM_FILE),
            ip_file: PathBuf::from(DEFAULT_IP_FILE),
            output: PathBuf::from(DEFAULT_RESULT_FILE),
            min_prefix: MIN_SUBNET_PREFIX,
            no_cache: false,
            top: 20,
            log_config: PathBuf::from("log4rs.yml"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_file_next_to_dump() {
        let settings = Settings {
            inetnum_file: PathBuf::from("data/apnic.db.inetnum"),
            ..Default::default()
        };
        assert_eq!(
            settings.cache_file(),
            PathBuf::from("data/apnic.db.inetnum.cache.json")
        );
    }

    #[test]
    fn test_parse_args() {
        let settings = Settings::parse_from([
            "inetnum-ip-count",
            "--inetnum-file",
            "dump.txt",
            "--min-prefix",
            "20",
            "--no-cache",
        ]);
        assert_eq!(settings.inetnum_file, PathBuf::from("dump.txt"));
        assert_eq!(settings.min_prefix, 20);
        assert!(settings.no_cache);
    }

    #[test]
    fn test_reject_prefix_above_32() {
        let result = Settings::try_parse_from(["inetnum-ip-count", "--min-prefix", "33"]);
        assert!(result.is_err());
    }
}
