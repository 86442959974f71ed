//! A single bounded-time connection attempt against one (host, port) pair.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use log::debug;
use tokio::io::AsyncReadExt;
use tokio::net::TcpStream;
use tokio::time;

use crate::services;
use crate::target::Target;

/// The most a banner read will take off the wire.
const BANNER_BYTE_BUDGET: usize = 1024;

/// Outcome classification of one probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortStatus {
    /// The connection was accepted.
    Open,
    /// The connection was refused or timed out.
    Closed,
    /// The attempt failed for a reason other than refusal or timeout.
    Error,
}

/// One outcome per attempted port. Immutable once produced.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// The probed port.
    pub port: u16,
    /// Outcome classification.
    pub status: PortStatus,
    /// Service catalog label, set on open ports only.
    pub service: Option<String>,
    /// Greeting captured from the service, when it sent one.
    pub banner: Option<String>,
    /// Failure description, set on error results only.
    pub error: Option<String>,
    /// Wall time of the connection attempt.
    pub duration: Duration,
}

impl ProbeResult {
    fn open(port: u16, banner: Option<String>, duration: Duration) -> Self {
        Self {
            port,
            status: PortStatus::Open,
            service: Some(services::lookup(port).to_owned()),
            banner,
            error: None,
            duration,
        }
    }

    fn closed(port: u16, duration: Duration) -> Self {
        Self {
            port,
            status: PortStatus::Closed,
            service: None,
            banner: None,
            error: None,
            duration,
        }
    }

    fn error(port: u16, detail: String, duration: Duration) -> Self {
        Self {
            port,
            status: PortStatus::Error,
            service: None,
            banner: None,
            error: Some(detail),
            duration,
        }
    }
}

/// Probes one port on the target.
///
/// Refusal and timeout both classify as closed; anything else that goes
/// wrong is captured as an error result. This function never fails out to
/// the caller — every outcome is a [`ProbeResult`].
///
/// On an open port a second connection attempts a best-effort banner read
/// under its own `banner_timeout`; a missing or unreadable banner never
/// downgrades the open status.
pub async fn probe(
    target: &Target,
    port: u16,
    connect_timeout: Duration,
    banner_timeout: Duration,
) -> ProbeResult {
    let start = Instant::now();

    let addr = match lookup_addr(target, port).await {
        Ok(addr) => addr,
        Err(detail) => return ProbeResult::error(port, detail, start.elapsed()),
    };

    match time::timeout(connect_timeout, TcpStream::connect(addr)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            let duration = start.elapsed();
            debug!("port {port} open after {duration:?}");
            let banner = grab_banner(addr, banner_timeout).await;
            ProbeResult::open(port, banner, duration)
        }
        // Connect refusals and timeouts are the ordinary closed-port paths.
        Ok(Err(e)) if is_probe_refusal(&e) => ProbeResult::closed(port, start.elapsed()),
        Err(_) => ProbeResult::closed(port, start.elapsed()),
        Ok(Err(e)) => {
            debug!("port {port} probe error: {e}");
            ProbeResult::error(port, e.to_string(), start.elapsed())
        }
    }
}

/// Turns the target into a socket address for this probe.
///
/// Targets that validated on dotted-quad shape alone carry no address;
/// resolving them per probe mirrors the connection-time failure they
/// would produce, which the caller records as an error result.
async fn lookup_addr(target: &Target, port: u16) -> Result<SocketAddr, String> {
    if let Some(addr) = target.addr() {
        return Ok(SocketAddr::new(addr, port));
    }

    match tokio::net::lookup_host((target.host(), port)).await {
        Ok(mut addrs) => addrs
            .next()
            .ok_or_else(|| format!("no address for {}", target.host())),
        Err(e) => Err(e.to_string()),
    }
}

fn is_probe_refusal(e: &std::io::Error) -> bool {
    use std::io::ErrorKind;
    matches!(
        e.kind(),
        ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::TimedOut
            | ErrorKind::HostUnreachable
            | ErrorKind::NetworkUnreachable
    )
}

/// Best-effort banner capture on a fresh connection.
///
/// Reads at most [`BANNER_BYTE_BUDGET`] bytes, decodes with replacement
/// and trims. Every failure path, including an empty read, yields `None`.
async fn grab_banner(addr: SocketAddr, banner_timeout: Duration) -> Option<String> {
    let attempt = async {
        let mut stream = TcpStream::connect(addr).await.ok()?;
        let mut buf = [0u8; BANNER_BYTE_BUDGET];
        let n = stream.read(&mut buf).await.ok()?;
        if n == 0 {
            return None;
        }
        let banner = String::from_utf8_lossy(&buf[..n]).trim().to_string();
        (!banner.is_empty()).then_some(banner)
    };

    match time::timeout(banner_timeout, attempt).await {
        Ok(banner) => banner,
        Err(_) => None,
    }
}
