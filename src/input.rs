//! Provides a means to read, parse and hold configuration options for scans.
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use serde_derive::Deserialize;

use crate::error::ScanError;
use crate::nmap::NmapMode;
use crate::services;

const LOWEST_PORT_NUMBER: u16 = 1;

/// Expands a port spec into the sequence of ports to probe.
///
/// Two forms, with deliberately asymmetric validation:
///
/// - Range `start-end`: both bounds must be valid port numbers with
///   `start <= end`, otherwise the whole spec fails with
///   [`ScanError::InvalidPortRange`]. Emits the range in ascending order.
/// - Comma list `80,443,8080`: tokens that do not parse as valid port
///   numbers are silently dropped; survivors keep their original order and
///   duplicates are permitted. An all-filtered list is valid and empty.
pub fn parse_port_spec(input: &str) -> Result<Vec<u16>, ScanError> {
    let spec = input.trim();

    if spec.contains('-') {
        let invalid = || ScanError::InvalidPortRange(spec.to_owned());
        let (start, end) = spec.split_once('-').ok_or_else(invalid)?;
        let start: u16 = start.trim().parse().map_err(|_| invalid())?;
        let end: u16 = end.trim().parse().map_err(|_| invalid())?;
        if start < LOWEST_PORT_NUMBER || start > end {
            return Err(invalid());
        }
        return Ok((start..=end).collect());
    }

    Ok(spec
        .split(',')
        .filter_map(|token| token.trim().parse::<u16>().ok())
        .filter(|&port| port >= LOWEST_PORT_NUMBER)
        .collect())
}

/// The sequence of ports to probe: the parsed spec when one was given,
/// otherwise the service catalog in table order.
pub fn ports_to_scan(spec: Option<&str>) -> Result<Vec<u16>, ScanError> {
    match spec {
        Some(spec) => parse_port_spec(spec),
        None => Ok(services::default_ports()),
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "portprobe",
    version = env!("CARGO_PKG_VERSION"),
    max_term_width = 120,
    help_template = "{bin} {version}\n{about}\n\nUSAGE:\n    {usage}\n\nOPTIONS:\n{options}",
)]
/// Concurrent TCP port prober with banner capture and optional nmap handoff.
/// WARNING Only probe hosts you are authorized to test.
pub struct Opts {
    /// Target IP or domain to probe.
    #[arg(short, long)]
    pub target: Option<String>,

    /// Ports to probe, as a comma list ('80,443') or an inclusive
    /// range ('1-1000'). Defaults to the built-in well-known port table.
    #[arg(short, long)]
    pub ports: Option<String>,

    /// Silent mode: suppress live per-probe output. Results are still
    /// collected and reported.
    #[arg(short, long)]
    pub silent: bool,

    /// Hand probed ports to nmap for service detection.
    #[arg(short, long, value_enum, ignore_case = true)]
    pub nmap: Option<NmapMode>,

    /// Number of concurrent probe workers.
    #[arg(short, long, default_value = "100")]
    pub workers: u16,

    /// Connection timeout in milliseconds before a port is assumed closed.
    #[arg(long, default_value = "1000")]
    pub connect_timeout_ms: u64,

    /// Banner read timeout in milliseconds per open port.
    #[arg(long, default_value = "2000")]
    pub banner_timeout_ms: u64,

    /// Save results to a file under scan_results/.
    #[arg(short, long)]
    pub output: bool,

    /// Whether to ignore the configuration file or not.
    #[arg(long)]
    pub no_config: bool,

    /// Custom path to config file.
    #[arg(short, long, value_parser)]
    pub config_path: Option<PathBuf>,

    /// Hide the startup banner.
    #[arg(long)]
    pub no_banner: bool,
}

impl Opts {
    /// Reads the command line arguments into an Opts struct.
    #[must_use]
    pub fn read() -> Self {
        Opts::parse()
    }

    /// Merge values found within the user configuration file into the
    /// command line arguments.
    pub fn merge(&mut self, config: &Config) {
        if !self.no_config {
            self.merge_required(config);
            self.merge_optional(config);
        }
    }

    fn merge_required(&mut self, config: &Config) {
        macro_rules! merge_required {
            ($($field: ident),+) => {
                $(
                    if let Some(e) = &config.$field {
                        self.$field = e.clone();
                    }
                )+
            }
        }

        merge_required!(
            silent,
            workers,
            connect_timeout_ms,
            banner_timeout_ms,
            output
        );
    }

    fn merge_optional(&mut self, config: &Config) {
        macro_rules! merge_optional {
            ($($field: ident),+) => {
                $(
                    if config.$field.is_some() {
                        self.$field = config.$field.clone();
                    }
                )+
            }
        }

        merge_optional!(target, ports, nmap);
    }
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            target: None,
            ports: None,
            silent: false,
            nmap: None,
            workers: 100,
            connect_timeout_ms: 1_000,
            banner_timeout_ms: 2_000,
            output: false,
            no_config: true,
            config_path: None,
            no_banner: false,
        }
    }
}

/// Struct used to deserialize the options specified within our config file.
/// These are merged with the command line arguments to produce the final
/// Opts struct.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    target: Option<String>,
    ports: Option<String>,
    silent: Option<bool>,
    nmap: Option<NmapMode>,
    workers: Option<u16>,
    connect_timeout_ms: Option<u64>,
    banner_timeout_ms: Option<u64>,
    output: Option<bool>,
}

impl Config {
    /// Reads the TOML configuration file, if any, into a Config struct.
    ///
    /// # Format
    ///
    /// target = "192.168.0.1"
    /// ports = "1-1000"
    /// silent = true
    /// workers = 50
    #[must_use]
    pub fn read(custom_config_path: Option<PathBuf>) -> Self {
        let mut content = String::new();
        let config_path = custom_config_path.unwrap_or_else(default_config_path);
        if config_path.exists() {
            content = fs::read_to_string(config_path).unwrap_or_default();
        }

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(e) => {
                println!("Found {e} in configuration file.\nAborting scan.\n");
                std::process::exit(1);
            }
        }
    }
}

/// Constructs default path to config toml
#[must_use]
pub fn default_config_path() -> PathBuf {
    let Some(mut config_path) = dirs::home_dir() else {
        panic!("Could not infer config file path.");
    };
    config_path.push(".portprobe.toml");
    config_path
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};
    use parameterized::parameterized;

    use super::{parse_port_spec, ports_to_scan, Config, Opts};
    use crate::error::ScanError;
    use crate::nmap::NmapMode;
    use crate::services;

    #[test]
    fn verify_cli() {
        Opts::command().debug_assert();
    }

    #[test]
    fn parse_basic_invocation() {
        let opts = Opts::parse_from(["portprobe", "-t", "127.0.0.1", "-p", "1-100"]);
        assert_eq!(opts.target.as_deref(), Some("127.0.0.1"));
        assert_eq!(opts.ports.as_deref(), Some("1-100"));
        assert_eq!(opts.workers, 100);
    }

    #[test]
    fn parse_nmap_mode_ignores_case() {
        let opts = Opts::parse_from(["portprobe", "-t", "h", "-n", "QUICK"]);
        assert_eq!(opts.nmap, Some(NmapMode::Quick));
    }

    #[parameterized(input = {
        "20-22",
        "1-1",
        "80",
    }, expected = {
        vec![20, 21, 22],
        vec![1],
        vec![80],
    })]
    fn port_spec_valid_forms(input: &str, expected: Vec<u16>) {
        assert_eq!(parse_port_spec(input), Ok(expected));
    }

    #[test]
    fn list_spec_drops_invalid_tokens_silently() {
        assert_eq!(parse_port_spec("80,70000,443"), Ok(vec![80, 443]));
        assert_eq!(parse_port_spec("80,abc,0,443"), Ok(vec![80, 443]));
    }

    #[test]
    fn list_spec_keeps_order_and_duplicates() {
        assert_eq!(parse_port_spec("443,80,443"), Ok(vec![443, 80, 443]));
    }

    #[test]
    fn list_spec_all_filtered_is_empty_not_error() {
        assert_eq!(parse_port_spec("abc,0,70000"), Ok(vec![]));
    }

    #[test]
    fn range_spec_start_above_end_fails() {
        let err = parse_port_spec("22-20").unwrap_err();
        assert!(matches!(err, ScanError::InvalidPortRange(_)));
    }

    #[test]
    fn range_spec_out_of_bounds_fails() {
        assert!(parse_port_spec("1-70000").is_err());
        assert!(parse_port_spec("0-10").is_err());
        assert!(parse_port_spec("a-10").is_err());
    }

    #[test]
    fn no_spec_defaults_to_service_catalog() {
        let ports = ports_to_scan(None).unwrap();
        assert_eq!(ports, services::default_ports());
    }

    #[test]
    fn opts_no_merge_when_config_is_ignored() {
        let mut opts = Opts::default();
        let config: Config = toml::from_str("silent = true\nworkers = 7").unwrap();

        opts.merge(&config);

        assert!(!opts.silent);
        assert_eq!(opts.workers, 100);
    }

    #[test]
    fn opts_merge_config_values() {
        let mut opts = Opts {
            no_config: false,
            ..Opts::default()
        };
        let config: Config =
            toml::from_str("target = \"192.168.0.1\"\nports = \"1-10\"\nworkers = 7").unwrap();

        opts.merge(&config);

        assert_eq!(opts.target.as_deref(), Some("192.168.0.1"));
        assert_eq!(opts.ports.as_deref(), Some("1-10"));
        assert_eq!(opts.workers, 7);
    }
}
