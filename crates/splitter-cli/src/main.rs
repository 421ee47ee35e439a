use std::path::PathBuf;

use clap::{Parser, Subcommand};
use splitter_cli::{commands, logging};

#[derive(Parser)]
#[command(
    name = "splitter",
    version,
    about = "Run the record splitter transform over NDJSON files"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a stage file against its declared input schema
    Check {
        /// Path to stage YAML file
        stage: PathBuf,
    },
    /// Split every row of an NDJSON file
    Run {
        /// Path to stage YAML file
        stage: PathBuf,
        /// Input rows, one JSON object per line
        #[arg(short, long)]
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Check { stage } => commands::check::execute(&stage),
        Commands::Run { stage, input, output } => {
            commands::run::execute(&stage, &input, output.as_deref())
        }
    }
}
