//! Concurrent TCP port probing engine.
//!
//! portprobe determines reachability of a set of ports on one target,
//! grabs service banners from the ports that answer, and can hand the
//! discovered ports to nmap for detailed service detection.
//!
//! ## Architecture Overview
//!
//! 1. **Input validation**: [`target::resolve`] validates the host and
//!    [`input::parse_port_spec`] expands the port spec. Both fail the scan
//!    up front; no probe is dispatched on bad input.
//! 2. **Probing**: [`scanner::Scanner`] drives one [`probe::probe`] per
//!    port through a fixed-size worker pool. Each probe owns its own
//!    connection and converts every failure into data.
//! 3. **Aggregation**: outcomes stream into a [`report::ScanReport`] in
//!    completion order.
//! 4. **Handoff**: [`nmap::run_nmap`] optionally enriches the report;
//!    its absence degrades the scan, never aborts it.
//!
//! ## Basic Usage Example
//!
//! ```rust
//! use std::time::Duration;
//!
//! use portprobe::scanner::Scanner;
//! use portprobe::target;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let target = target::resolve("127.0.0.1").await?;
//!
//!     let scanner = Scanner::new(
//!         target,
//!         vec![40_001, 40_002],            // Ports to probe
//!         10,                              // Concurrent workers
//!         Duration::from_millis(500),      // Connect timeout
//!         Duration::from_millis(500),      // Banner timeout
//!         true,                            // Silent (no live output)
//!     );
//!
//!     let report = scanner.run().await;
//!     assert_eq!(report.results.len(), 2);
//!     Ok(())
//! }
//! ```
#![allow(clippy::needless_doctest_main)]
#![warn(missing_docs)]

pub mod error;

pub mod input;

pub mod nmap;

pub mod output;

pub mod probe;

pub mod report;

pub mod scanner;

pub mod services;

pub mod target;
