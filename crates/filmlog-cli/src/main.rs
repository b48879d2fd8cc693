use clap::{ArgAction, Parser, Subcommand};
use commands::{config, ingest, serve};
use filmlog_config::PathManager;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "filmlog")]
#[command(about = "filmlog - Keep a searchable record of every film you log")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Directory holding config.toml (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Also write logs to a daily rotating file in the log directory
    #[arg(long, action = ArgAction::SetTrue, global = true)]
    log_file: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ingest the activity feed once and store new watch events
    #[command(long_about = "Read the configured activity feed, skip entries that are already stored, enrich new ones with TMDB metadata, and persist them. Failures on single entries are reported and do not stop the run.")]
    Ingest {
        /// Feed file path or URL, overriding feed.location
        #[arg(long, value_name = "LOCATION")]
        feed: Option<String>,

        /// Store events without calling TMDB
        #[arg(long, action = ArgAction::SetTrue)]
        skip_enrichment: bool,

        /// Use a throwaway in-memory store instead of Postgres
        #[arg(long, action = ArgAction::SetTrue)]
        in_memory: bool,
    },
    /// Serve the read API
    #[command(long_about = "Start the HTTP API serving stored watch events. GET /api/rss ingests the configured feed before answering. Stops gracefully on Ctrl-C or SIGTERM.")]
    Serve {
        /// Address to bind, overriding server.host
        #[arg(long)]
        host: Option<String>,

        /// Port to bind, overriding server.port and PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks secrets)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a configuration template
    Init {
        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Check that the configuration is complete
    Validate,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    // A missing .env is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let paths = match &cli.config_dir {
        Some(dir) => PathManager::with_base(dir),
        None => PathManager::default(),
    };

    let log_file = cli.log_file.then(|| paths.log_file());
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Ingest {
            feed,
            skip_enrichment,
            in_memory,
        } => ingest::run_ingest(&paths, feed, skip_enrichment, in_memory, &output).await,
        Commands::Serve { host, port } => serve::run_serve(&paths, host, port, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &paths, &output),
    }
}
