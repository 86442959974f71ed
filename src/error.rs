//! Error taxonomy for the probing engine.
//!
//! Validation errors abort a scan before any probe is dispatched. Per-probe
//! failures are never errors at this level: they are recorded as
//! [`PortStatus::Error`](crate::probe::PortStatus::Error) results instead.

use thiserror::Error;

/// Fatal input-validation failures. A scan call reports one of these and
/// performs no network work.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScanError {
    /// The target is neither a dotted-quad literal nor a resolvable name.
    #[error("invalid target {0:?}: not an IP address or resolvable host")]
    InvalidTarget(String),

    /// A port range with malformed or out-of-order bounds.
    #[error("invalid port range {0:?}: expected start-end with 1-65535 and start <= end")]
    InvalidPortRange(String),
}

/// Failures from the external nmap handoff. Both variants degrade to
/// "no external output" rather than aborting the scan.
#[derive(Debug, Error)]
pub enum NmapError {
    /// No nmap binary on PATH.
    #[error("nmap not found on PATH")]
    Unavailable,

    /// nmap was found but could not be spawned or exited unsuccessfully.
    #[error("nmap run failed: {0}")]
    Failed(String),
}
