use anyhow::Result;
use clap::{Parser, Subcommand};
use pdsync_cli::commands;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "pdsync")]
#[command(about = "pdsync - PDS frame synchronizer and SARP message extractor", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pipeline configuration (JSON); built-in PDS defaults otherwise
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture frames from a bit stream and its sync events
    Sync {
        /// Input bit file, one byte per bit ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// JSON array of sync events
        #[arg(short, long)]
        events: String,

        /// Output JSON file for frames
        #[arg(short, long)]
        output: Option<String>,

        /// Input holds Biphase-L symbols; decimate before syncing
        #[arg(long)]
        biphase: bool,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,
    },

    /// Split frames into sub-messages and check their word sync
    Extract {
        /// Input JSON file of frames (as written by `sync`)
        #[arg(short, long)]
        input: String,

        /// Output JSON file for classified sub-messages
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Run synchronizer and extractor end to end
    Run {
        /// Input bit file, one byte per bit ("-" for stdin)
        #[arg(short, long)]
        input: String,

        /// JSON array of sync events
        #[arg(short, long)]
        events: String,

        /// Output JSON report
        #[arg(short, long)]
        output: Option<String>,

        /// Input holds Biphase-L symbols; decimate before syncing
        #[arg(long)]
        biphase: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    // Execute command
    match cli.command {
        Commands::Sync {
            input,
            events,
            output,
            biphase,
            stats_only,
        } => commands::sync::execute(
            &config,
            &input,
            &events,
            output.as_deref(),
            biphase,
            stats_only,
        ),

        Commands::Extract { input, output } => {
            commands::extract::execute(&config, &input, output.as_deref())
        }

        Commands::Run {
            input,
            events,
            output,
            biphase,
        } => commands::run::execute(&config, &input, &events, output.as_deref(), biphase),
    }
}
