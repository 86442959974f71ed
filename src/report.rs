//! Aggregated scan outcome and the human-readable results file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;

use crate::probe::{PortStatus, ProbeResult};

/// The complete outcome of one scan invocation.
///
/// Results sit in completion order, not port order; nothing downstream may
/// rely on their ordering. Read-only once the scan completes.
#[derive(Debug)]
pub struct ScanReport {
    /// The probed host, exactly as the caller supplied it.
    pub target: String,
    /// When the scan began.
    pub started_at: DateTime<Local>,
    /// One entry per dispatched probe, in completion order.
    pub results: Vec<ProbeResult>,
    /// Raw nmap stdout, appended verbatim to the results file when present.
    pub nmap_output: Option<String>,
}

impl ScanReport {
    /// Builds a report timestamped now, with no nmap output yet.
    #[must_use]
    pub fn new(target: String, results: Vec<ProbeResult>) -> Self {
        Self {
            target,
            started_at: Local::now(),
            results,
            nmap_output: None,
        }
    }

    /// Ports that answered, in ascending order for downstream consumers.
    #[must_use]
    pub fn open_ports(&self) -> Vec<u16> {
        let mut ports: Vec<u16> = self
            .results
            .iter()
            .filter(|r| r.status == PortStatus::Open)
            .map(|r| r.port)
            .collect();
        ports.sort_unstable();
        ports
    }

    /// One human-readable line per result, as written to the results file.
    fn result_lines(&self) -> Vec<String> {
        self.results
            .iter()
            .flat_map(|result| {
                let mut lines = vec![format_result(result)];
                if let Some(banner) = &result.banner {
                    lines.push(format!("  Service banner: {banner}"));
                }
                lines
            })
            .collect()
    }

    /// Writes the report under `base_dir/<date>/scan_<n>.txt` and returns
    /// the file path.
    pub fn save(&self, base_dir: &Path) -> std::io::Result<PathBuf> {
        let date_dir = base_dir.join(self.started_at.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&date_dir)?;

        let scan_number = fs::read_dir(&date_dir)?.count() + 1;
        let file_path = date_dir.join(format!("scan_{scan_number}.txt"));

        let mut file = fs::File::create(&file_path)?;
        writeln!(file, "Scan performed on: {}", self.target)?;
        writeln!(
            file,
            "Scan date: {}\n",
            self.started_at.format("%Y-%m-%d %H:%M:%S")
        )?;
        writeln!(file, "{}", self.result_lines().join("\n"))?;
        if let Some(nmap) = &self.nmap_output {
            writeln!(file, "\n=== Nmap Scan ===")?;
            file.write_all(nmap.as_bytes())?;
        }

        info!("results saved to {}", file_path.display());
        Ok(file_path)
    }
}

fn format_result(result: &ProbeResult) -> String {
    match result.status {
        PortStatus::Open => format!(
            "Port {}: OPEN ({})",
            result.port,
            result.service.as_deref().unwrap_or("Unknown")
        ),
        PortStatus::Closed => format!("Port {}: CLOSED", result.port),
        PortStatus::Error => format!(
            "Port {}: ERROR ({})",
            result.port,
            result.error.as_deref().unwrap_or("unknown error")
        ),
    }
}

/// Default directory for saved results, relative to the working directory.
#[must_use]
pub fn results_dir() -> PathBuf {
    PathBuf::from("scan_results")
}
