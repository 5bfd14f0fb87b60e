use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrollease_core::AppConfig;

mod commands;

#[derive(Parser)]
#[command(name = "scrollease")]
#[command(author, version, about = "Simulate smooth scroll animations")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one animation on a simulated surface and print every frame
    Simulate(commands::simulate::SimulateArgs),
    /// Print sample tables of the easing curves
    Curves {
        /// Samples per curve, including both ends
        #[arg(short = 'n', long, default_value_t = 11)]
        samples: usize,
    },
    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.general.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Some(Commands::Simulate(args)) => commands::simulate::run(&config, args).await,
        Some(Commands::Curves { samples }) => commands::curves::run(samples),
        Some(Commands::Config) | None => commands::config::run(&config),
    }
}
