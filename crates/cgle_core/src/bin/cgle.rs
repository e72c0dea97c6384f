//! Runs the delayed CGLE at the default resolution and summarizes the diagnostics.

use anyhow::{Context, Result};
use cgle_core::spectrum::dominant_frequency;
use cgle_core::{simulate, GridSettings};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// `warn` unless `directives` (normally `RUST_LOG`) says otherwise.
fn log_filter(directives: &str) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(directives)
}

fn main() -> Result<()> {
    let directives = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(&directives))
        .init();

    let settings = GridSettings::entry_point();
    let output = simulate(settings).context("CGLE simulation failed")?;
    println!("Simulation completed successfully");

    let params = &output.params;
    println!(
        "grid: n={} M={} N={}  k={:.6}  epsilon={:.5}  tau={:.5}",
        params.n, params.segments, params.delay_steps, params.k, params.epsilon, params.tau
    );
    println!("trace samples   : {}", output.results.re.len());

    match dominant_frequency(&output.results.re, params.k) {
        Ok(omega) => println!("dominant omega  : {omega:.4} (omega0 = {:.4})", params.omega0),
        Err(err) => log::warn!("no frequency estimate: {err}"),
    }

    let (early, late) = output.poincare.split_halves();
    if output.poincare.is_empty() {
        println!("poincare section: empty");
    } else {
        println!(
            "poincare section: {} points ({} early, {} late)",
            output.poincare.len(),
            early.len(),
            late.len()
        );
    }

    Ok(())
}
