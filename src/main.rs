//! portprobe binary: thin CLI over the probing engine.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use colored::Colorize;
use log::{debug, warn};

use portprobe::input::{self, Config, Opts};
use portprobe::{detail, success, warning};
use portprobe::nmap;
use portprobe::report;
use portprobe::scanner::Scanner;
use portprobe::target;

const BANNER: &str = r"
                  _                       _
 _ __   ___  _ __| |_ _ __  _ __ ___ | |__   ___
| '_ \ / _ \| '__| __| '_ \| '__/ _ \| '_ \ / _ \
| |_) | (_) | |  | |_| |_) | | | (_) | |_) |  __/
| .__/ \___/|_|   \__| .__/|_|  \___/|_.__/ \___|
|_|                  |_|
";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let mut opts = Opts::read();
    let config = Config::read(opts.config_path.clone());
    opts.merge(&config);
    debug!("merged options: {opts:?}");

    if !opts.silent && !opts.no_banner {
        println!("{}", BANNER.red());
        println!("{}", "=== portprobe ===".cyan());
    }

    let Some(host) = opts.target.as_deref() else {
        bail!("no target given; pass one with --target");
    };

    // Validation failures abort here, before any probe is dispatched.
    let target = target::resolve(host).await?;
    let ports = input::ports_to_scan(opts.ports.as_deref())?;

    detail!(
        format!("Scanning {host} for {} specified ports...", ports.len()),
        opts.silent
    );

    let scanner = Scanner::new(
        target,
        ports.clone(),
        opts.workers,
        Duration::from_millis(opts.connect_timeout_ms),
        Duration::from_millis(opts.banner_timeout_ms),
        opts.silent,
    );
    let mut report = scanner.run().await;

    if let Some(mode) = opts.nmap {
        if ports.is_empty() {
            warning!("No ports to hand to nmap, skipping.", opts.silent);
        } else {
            detail!("Launching nmap scan...", opts.silent);
            match nmap::run_nmap(host, &ports, mode).await {
                Ok(raw) => {
                    if !opts.silent {
                        println!("{}", raw.cyan());
                    }
                    report.nmap_output = Some(raw);
                }
                // Missing or failing nmap degrades the run, never aborts it.
                Err(e) => {
                    warn!("nmap handoff failed: {e}");
                    warning!(
                        "Nmap unavailable or failed; continuing without detailed scan.",
                        opts.silent
                    );
                }
            }
        }
    }

    if opts.output {
        let path = report
            .save(&report::results_dir())
            .context("could not save results file")?;
        success!(format!("Results saved to '{}'.", path.display()), opts.silent);
    }

    let open = report.open_ports();
    detail!(
        format!(
            "Scan completed: {} open of {} probed on {}.",
            open.len(),
            report.results.len(),
            report.target
        ),
        opts.silent
    );

    Ok(())
}
