//! Fixed-timestep host loop around the simulation driver.
//!
//! `run` paces ticks on a tokio interval and stops on Ctrl-C or after a tick
//! budget; `step` advances as fast as possible.

use std::io::Write;
use std::time::Duration;

use anyhow::{Context, Result};
use tfviz_core::{SimulationDriver, Snapshot, TickReport, export_json, export_json_line};
use tokio::time::MissedTickBehavior;

pub struct RunOptions {
    pub ticks: Option<u64>,
    pub rate_hz: f64,
    pub report_every: u64,
    pub json: bool,
}

/// Totals over a run, printed when it ends.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub regenerations: usize,
    pub pulses_spawned: usize,
}

impl RunSummary {
    fn record(&mut self, report: &TickReport) {
        self.ticks += 1;
        self.regenerations += report.regenerations;
        self.pulses_spawned += report.pulses_spawned;
    }
}

fn log_report(report: &TickReport) {
    for layer in &report.layers_processed {
        tracing::info!("layer {layer} processed at tick {}", report.tick);
    }
    if report.regenerations > 0 {
        tracing::debug!(
            "tick {}: {} head(s) regenerated",
            report.tick,
            report.regenerations
        );
    }
    if report.pulses_spawned > 0 {
        tracing::debug!("tick {}: {} pulse(s) spawned", report.tick, report.pulses_spawned);
    }
}

pub fn status_line(snapshot: &Snapshot) -> String {
    format!(
        "tick {}: processed {}/{} layers, {} pulses, mean activation {:.3}",
        snapshot.tick,
        snapshot.processed_layers(),
        snapshot.layers.len(),
        snapshot.live_pulses(),
        snapshot.mean_token_activation()
    )
}

fn emit(snapshot: &Snapshot, json: bool, out: &mut impl Write) -> Result<()> {
    if json {
        let text = export_json_line(snapshot).context("failed to serialize snapshot")?;
        writeln!(out, "{text}")?;
    } else {
        writeln!(out, "{}", status_line(snapshot))?;
    }
    Ok(())
}

/// Advance `ticks` times with no pacing.
pub fn step(sim: &mut SimulationDriver, ticks: u64) -> RunSummary {
    let mut summary = RunSummary::default();
    for _ in 0..ticks {
        let report = sim.tick();
        log_report(&report);
        summary.record(&report);
    }
    summary
}

/// Tick at `rate_hz` until the budget is spent or Ctrl-C arrives.
pub async fn run(
    sim: &mut SimulationDriver,
    opts: &RunOptions,
    out: &mut impl Write,
) -> Result<RunSummary> {
    let period = Duration::try_from_secs_f64(1.0 / opts.rate_hz)
        .ok()
        .filter(|p| !p.is_zero())
        .with_context(|| format!("tick rate {} Hz has no usable period", opts.rate_hz))?;
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let mut summary = RunSummary::default();
    loop {
        if opts.ticks.is_some_and(|budget| summary.ticks >= budget) {
            break;
        }
        tokio::select! {
            _ = interval.tick() => {
                let report = sim.tick();
                log_report(&report);
                summary.record(&report);
                if opts.report_every > 0 && summary.ticks % opts.report_every == 0 {
                    emit(&sim.snapshot(), opts.json, out)?;
                    out.flush()?;
                }
            }
            _ = &mut shutdown => {
                tracing::info!("interrupted after {} ticks", summary.ticks);
                break;
            }
        }
    }
    Ok(summary)
}

/// Write the current snapshot as versioned JSON.
pub fn write_snapshot(sim: &SimulationDriver, out: &mut impl Write) -> Result<()> {
    let json = export_json(&sim.snapshot()).context("failed to serialize snapshot")?;
    writeln!(out, "{json}")?;
    Ok(())
}
