//! Handoff to nmap for detailed service detection.
//!
//! The engine only builds nmap's input and consumes its output; a missing
//! or failing nmap never aborts the scan that produced the port list.

use std::env;
use std::path::PathBuf;

use clap::ValueEnum;
use itertools::Itertools;
use log::debug;
use once_cell::sync::Lazy;
use serde_derive::Deserialize;
use tokio::process::Command;

use crate::error::NmapError;

/// Timing profile for the nmap run.
#[derive(Deserialize, Debug, ValueEnum, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NmapMode {
    /// Aggressive timing (`-T4`).
    Quick,
    /// Slow, stealthier timing (`-T1`).
    Detailed,
}

impl NmapMode {
    fn timing_flag(self) -> &'static str {
        match self {
            Self::Quick => "-T4",
            Self::Detailed => "-T1",
        }
    }
}

static NMAP_PATH: Lazy<Option<PathBuf>> = Lazy::new(find_nmap);

/// Locates nmap on PATH once per process.
fn find_nmap() -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join("nmap"))
        .find(|candidate| candidate.is_file())
}

/// Runs nmap with service-version detection against the given ports and
/// returns its raw standard output.
pub async fn run_nmap(target: &str, ports: &[u16], mode: NmapMode) -> Result<String, NmapError> {
    let nmap = NMAP_PATH.as_ref().ok_or(NmapError::Unavailable)?;
    let port_list = ports.iter().join(",");
    debug!("running {} {} -sV -p {port_list} {target}", nmap.display(), mode.timing_flag());

    let output = Command::new(nmap)
        .arg(mode.timing_flag())
        .arg("-sV")
        .arg("-p")
        .arg(&port_list)
        .arg(target)
        .output()
        .await
        .map_err(|e| NmapError::Failed(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(NmapError::Failed(format!(
            "exit status {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
