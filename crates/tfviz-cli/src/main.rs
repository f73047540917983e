mod config;
mod host;

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tfviz_core::{PhaseEvent, ReadingDemo, SimulationDriver};

use crate::config::AppConfig;
use crate::host::RunOptions;

#[derive(Parser)]
#[command(name = "tfviz", about = "Transformer attention simulation host")]
struct Cli {
    /// Config file (TOML). Falls back to $TFVIZ_CONFIG, then built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed both RNGs for a reproducible run (at most i64::MAX so it fits in TOML)
    #[arg(long, global = true, value_parser = clap::value_parser!(u64).range(..=i64::MAX as u64))]
    seed: Option<u64>,

    /// Enable verbose debug output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the simulation in real time
    Run {
        /// Stop after this many ticks (default: until Ctrl-C)
        #[arg(long)]
        ticks: Option<u64>,

        /// Tick rate in Hz (default: from config)
        #[arg(long)]
        rate: Option<f64>,

        /// Print a status line every N ticks (0 disables)
        #[arg(long, default_value_t = 60)]
        report_every: u64,

        /// Print JSON snapshots instead of status lines
        #[arg(long)]
        json: bool,
    },

    /// Advance headlessly and write the final snapshot as JSON
    Step {
        /// Number of ticks to advance
        #[arg(long, default_value_t = 60)]
        ticks: u64,

        /// Write to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run the token reading/generation demo
    Read {
        /// Number of ticks to advance
        #[arg(long, default_value_t = 1600)]
        ticks: u64,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    Ok(config::load(cli.config.as_deref())?.with_seed(cli.seed))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match &cli.command {
        Commands::Run {
            ticks,
            rate,
            report_every,
            json,
        } => cmd_run(&cli, *ticks, *rate, *report_every, *json).await,
        Commands::Step { ticks, output } => cmd_step(&cli, *ticks, output.as_deref()),
        Commands::Read { ticks } => cmd_read(&cli, *ticks),
        Commands::Config => cmd_config(&cli),
    }
}

fn build_driver(config: &AppConfig) -> Result<SimulationDriver> {
    let sim = SimulationDriver::initialize(config.simulation.clone())
        .context("failed to build simulation")?;
    tracing::info!(
        "simulation ready: {} tokens, {} layers x {} heads",
        sim.tokens().len(),
        sim.layers().len(),
        config.simulation.heads_per_layer
    );
    Ok(sim)
}

async fn cmd_run(
    cli: &Cli,
    ticks: Option<u64>,
    rate: Option<f64>,
    report_every: u64,
    json: bool,
) -> Result<()> {
    let mut config = load_config(cli)?;
    if let Some(rate) = rate {
        config.simulation.tick_rate_hz = rate;
    }
    let mut sim = build_driver(&config)?;

    let opts = RunOptions {
        ticks,
        rate_hz: sim.config().tick_rate_hz,
        report_every,
        json,
    };
    let mut stdout = std::io::stdout().lock();
    let summary = host::run(&mut sim, &opts, &mut stdout).await?;

    if !json {
        writeln!(
            stdout,
            "done. ticks={}, regenerations={}, pulses={}",
            summary.ticks, summary.regenerations, summary.pulses_spawned
        )?;
    }
    Ok(())
}

fn cmd_step(cli: &Cli, ticks: u64, output: Option<&Path>) -> Result<()> {
    let config = load_config(cli)?;
    let mut sim = build_driver(&config)?;
    let summary = host::step(&mut sim, ticks);
    tracing::debug!(
        "stepped {} ticks: {} regenerations, {} pulses",
        summary.ticks,
        summary.regenerations,
        summary.pulses_spawned
    );

    match output {
        Some(path) => {
            let mut file = std::fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            host::write_snapshot(&sim, &mut file)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("wrote snapshot at tick {} to {}", sim.ticks(), path.display());
        }
        None => host::write_snapshot(&sim, &mut std::io::stdout().lock())?,
    }
    Ok(())
}

fn cmd_read(cli: &Cli, ticks: u64) -> Result<()> {
    let config = load_config(cli)?;
    let mut demo = ReadingDemo::new(config.reading).context("failed to build reading demo")?;

    for t in 1..=ticks {
        match demo.tick() {
            Some(PhaseEvent::CursorAdvanced { cursor }) => {
                tracing::debug!("tick {t}: reading '{}'", demo.label(cursor));
            }
            Some(PhaseEvent::GenerationStarted) => println!("tick {t}: generation started"),
            Some(PhaseEvent::TokenEmitted {
                token,
                source,
                completed,
            }) => {
                println!("tick {t}: emitted '{token}' (source '{}')", demo.label(source));
                if let Some(sentence) = completed {
                    println!("tick {t}: sentence complete: {}", sentence.join(" "));
                }
            }
            None => {}
        }
    }

    let phase = if demo.machine().is_generating() {
        "generating"
    } else {
        "reading"
    };
    println!("done. tick={ticks}, phase={phase}");
    Ok(())
}

fn cmd_config(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    config.simulation.validate().context("invalid [simulation] config")?;
    config.reading.validate().context("invalid [reading] config")?;
    print!("{}", config.to_toml()?);
    Ok(())
}
