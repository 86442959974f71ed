//! Core functionality for actual scanning behaviour.
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use futures::stream::{self, StreamExt};
use log::debug;

use crate::probe::{probe, PortStatus, ProbeResult};
use crate::report::ScanReport;
use crate::target::Target;

/// Per-probe settings shared across the worker pool.
#[derive(Debug)]
struct ProbeRunner {
    target: Target,
    connect_timeout: Duration,
    banner_timeout: Duration,
    silent: bool,
}

impl ProbeRunner {
    async fn run_probe(&self, port: u16) -> ProbeResult {
        let result = probe(&self.target, port, self.connect_timeout, self.banner_timeout).await;
        self.fmt_result(&result);
        result
    }

    /// Live per-probe line, suppressed in silent mode. Capture never is.
    fn fmt_result(&self, result: &ProbeResult) {
        if self.silent {
            return;
        }
        match result.status {
            PortStatus::Open => {
                let service = result.service.as_deref().unwrap_or("Unknown");
                println!(
                    "{}",
                    format!("Port {}: OPEN ({service})", result.port).green()
                );
                if let Some(banner) = &result.banner {
                    println!("{}", format!("  Service banner: {banner}").cyan());
                }
                println!(
                    "{}",
                    format!(
                        "Scan completed in {:.2}s for port {}",
                        result.duration.as_secs_f64(),
                        result.port
                    )
                    .cyan()
                );
            }
            PortStatus::Closed => {
                println!("{}", format!("Port {}: CLOSED", result.port).red());
            }
            PortStatus::Error => {
                let detail = result.error.as_deref().unwrap_or("unknown error");
                println!("{}", format!("Port {}: ERROR ({detail})", result.port).red());
            }
        }
    }
}

/// The scan orchestrator.
///
/// Dispatches one probe per port across a fixed-size worker pool and
/// aggregates every outcome into a [`ScanReport`]. Results arrive in
/// completion order; callers that need port order sort afterwards.
#[derive(Debug)]
pub struct Scanner {
    ports: Vec<u16>,
    workers: u16,
    runner: Arc<ProbeRunner>,
}

impl Scanner {
    /// Builds an orchestrator over a validated target and port sequence.
    #[must_use]
    pub fn new(
        target: Target,
        ports: Vec<u16>,
        workers: u16,
        connect_timeout: Duration,
        banner_timeout: Duration,
        silent: bool,
    ) -> Self {
        Self {
            ports,
            workers,
            runner: Arc::new(ProbeRunner {
                target,
                connect_timeout,
                banner_timeout,
                silent,
            }),
        }
    }

    /// Runs every probe to completion and returns the full report.
    ///
    /// Exactly one result is recorded per dispatched port, whatever the
    /// worker count, and the call does not return while any probe is
    /// still in flight. An empty port set yields an empty report.
    pub async fn run(&self) -> ScanReport {
        let workers = usize::from(self.workers.max(1));
        debug!(
            "start scanning {} on {} ports with {workers} workers",
            self.runner.target.host(),
            self.ports.len()
        );

        let results: Vec<ProbeResult> = stream::iter(self.ports.iter().copied())
            .map(|port| {
                let runner = Arc::clone(&self.runner);
                async move { runner.run_probe(port).await }
            })
            .buffer_unordered(workers)
            .collect()
            .await;

        debug!(
            "scan of {} finished: {} open of {} probed",
            self.runner.target.host(),
            results
                .iter()
                .filter(|r| r.status == PortStatus::Open)
                .count(),
            results.len()
        );

        ScanReport::new(self.runner.target.host().to_owned(), results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::resolve;
    use std::collections::HashSet;

    const CONNECT: Duration = Duration::from_millis(200);
    const BANNER: Duration = Duration::from_millis(200);

    fn scanner(target: Target, ports: Vec<u16>, workers: u16) -> Scanner {
        Scanner::new(target, ports, workers, CONNECT, BANNER, true)
    }

    #[tokio::test]
    async fn one_result_per_dispatched_port() {
        let target = resolve("127.0.0.1").await.unwrap();
        let ports: Vec<u16> = (40_000..40_050).collect();

        let report = scanner(target, ports.clone(), 10).run().await;

        assert_eq!(report.results.len(), ports.len());
        let probed: HashSet<u16> = report.results.iter().map(|r| r.port).collect();
        assert_eq!(probed, ports.into_iter().collect());
    }

    #[tokio::test]
    async fn count_invariant_holds_under_oversubscription() {
        // More workers than ports, and more ports than workers.
        let target = resolve("127.0.0.1").await.unwrap();

        for workers in [1, 3, 200] {
            let ports: Vec<u16> = (40_000..40_100).collect();
            let report = scanner(target.clone(), ports, workers).run().await;
            assert_eq!(report.results.len(), 100);
        }
    }

    #[tokio::test]
    async fn thousand_ports_hundred_workers_lose_nothing() {
        let target = resolve("127.0.0.1").await.unwrap();
        let ports: Vec<u16> = (30_000..31_000).collect();

        let report = scanner(target, ports, 100).run().await;

        assert_eq!(report.results.len(), 1_000);
        let distinct: HashSet<u16> = report.results.iter().map(|r| r.port).collect();
        assert_eq!(distinct.len(), 1_000);
    }

    #[tokio::test]
    async fn empty_port_set_yields_empty_report() {
        let target = resolve("127.0.0.1").await.unwrap();
        let report = scanner(target, vec![], 10).run().await;
        assert!(report.results.is_empty());
        assert!(report.nmap_output.is_none());
    }

    #[tokio::test]
    async fn duplicate_ports_are_each_probed() {
        let target = resolve("127.0.0.1").await.unwrap();
        let report = scanner(target, vec![40_000, 40_000, 40_000], 2).run().await;
        assert_eq!(report.results.len(), 3);
    }

    #[tokio::test]
    async fn unresolvable_literal_fills_report_with_errors() {
        let target = resolve("999.999.999.999").await.unwrap();
        let report = scanner(target, vec![80, 443], 2).run().await;

        assert_eq!(report.results.len(), 2);
        assert!(report
            .results
            .iter()
            .all(|r| r.status == PortStatus::Error));
    }
}
