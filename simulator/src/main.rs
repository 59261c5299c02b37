use anyhow::Context;
use clap::{Parser, Subcommand};
use commonware_codec::Encode;
use crapsline_execution::{Config, ValidatedConfig};
use crapsline_simulator::{replay, simulate, Script, Strategy, Summary};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Table configuration (YAML). Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON.
    #[arg(long)]
    json: bool,

    /// Print every roll report, hex encoded.
    #[arg(long)]
    reports: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a recorded script of bets and rolls.
    Replay {
        #[arg(short, long)]
        script: PathBuf,
    },
    /// Roll seeded dice for a number of shooters.
    Simulate {
        /// 32-byte seed, hex encoded.
        #[arg(long)]
        seed: String,

        #[arg(long, default_value_t = 100)]
        shooters: u64,

        /// Betting strategy (YAML).
        #[arg(long)]
        strategy: PathBuf,
    },
}

fn read_yaml<T: serde::de::DeserializeOwned>(path: &PathBuf) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_yaml::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn main() -> anyhow::Result<()> {
    // Parse args
    let args = Args::parse();

    // Load config
    let config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Config::from_yaml(&raw).context("failed to parse config")?
        }
        None => Config::default(),
    };
    let ValidatedConfig { rules, log_level } = config.validate().context("invalid config")?;

    // Create logger
    if args.json {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(log_level)
            .init();
    } else {
        tracing_subscriber::fmt().with_max_level(log_level).init();
    }

    let summary: Summary = match &args.command {
        Command::Replay { script } => {
            let script: Script = read_yaml(script)?;
            info!(steps = script.steps.len(), "replaying script");
            replay(rules, &script).context("replay failed")?
        }
        Command::Simulate {
            seed,
            shooters,
            strategy,
        } => {
            let bytes = commonware_utils::from_hex_formatted(seed).context("invalid seed hex")?;
            let seed: [u8; 32] = bytes
                .try_into()
                .map_err(|_| anyhow::anyhow!("seed must be 32 bytes"))?;
            let strategy: Strategy = read_yaml(strategy)?;
            info!(shooters, bets = strategy.bets.len(), "simulating");
            simulate(rules, seed, *shooters, &strategy).context("simulation failed")?
        }
    };

    if args.reports {
        for report in &summary.reports {
            println!("{}", commonware_utils::hex(&report.encode()));
        }
    }
    print!(
        "{}",
        serde_yaml::to_string(&summary).context("failed to render summary")?
    );
    println!("net: {}", summary.net());
    Ok(())
}
