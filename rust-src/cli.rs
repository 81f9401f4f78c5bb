//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{self, Context};
use crate::config::get_config_path;
use crate::logging;
use crate::models::Period;


/// Mobile Data Guard - mobile data usage monitor and guard
#[derive(Parser)]
#[command(name = "mdg")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: <config dir>/mobile-data-guard/config.toml)
    #[arg(long, global = true, env = "MDG_CONFIG")]
    config: Option<PathBuf>,

    /// Database file, overriding the config
    #[arg(long, global = true, env = "MDG_DB")]
    db: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}


#[derive(Subcommand)]
enum Commands {
    /// Run the sampling and policy loop until SIGTERM/SIGINT
    Daemon,

    /// Take one usage sample now
    Sample {
        /// Period label for the sample: daily, weekly or monthly
        #[arg(short, long)]
        period: Option<Period>,
    },

    /// Show usage dashboard with period totals and top apps
    Usage {
        /// Auto-refresh dashboard every 5 seconds
        #[arg(long)]
        live: bool,
    },

    /// List the top data consumers from the latest sample
    Apps,

    /// Block metered background data for an app
    Block {
        /// App UID
        uid: u32,
    },

    /// Lift a background data block
    Unblock {
        /// App UID
        uid: u32,
    },

    /// Manage per-app data limits
    Limit {
        #[command(subcommand)]
        command: LimitCommands,
    },

    /// Request a mobile data state change
    Data {
        #[command(subcommand)]
        command: DataCommands,
    },

    /// Show mobile data toggle history
    History {
        /// Number of entries to show
        #[arg(short = 'n', long, default_value_t = 20)]
        limit: usize,
    },

    /// Export all samples as CSV
    Export {
        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open file after export
        #[arg(long)]
        open: bool,
    },

    /// Delete samples and toggle history older than N days
    Prune {
        /// Age in days (default: monitor.retention_days)
        #[arg(short, long)]
        days: Option<u64>,
    },

    /// Delete all stored data after backing up the database
    Reset {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Show a summary of stored data
    Stats,

    /// Inspect or create the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}


#[derive(Subcommand)]
enum LimitCommands {
    /// Set limits for an app (unspecified values use config defaults)
    Set {
        /// App UID
        uid: u32,

        /// Daily limit in MB (0 = unset)
        #[arg(long)]
        daily: Option<u64>,

        /// Weekly limit in MB (0 = unset)
        #[arg(long)]
        weekly: Option<u64>,

        /// Monthly limit in MB (0 = unset)
        #[arg(long)]
        monthly: Option<u64>,
    },

    /// Remove limits for an app
    Remove {
        /// App UID
        uid: u32,
    },

    /// List configured limits
    List,
}


#[derive(Subcommand)]
enum DataCommands {
    /// Open settings to turn mobile data on
    Enable,

    /// Open settings to turn mobile data off
    Disable,
}


#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the config file path
    Path,

    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}


/// Run the CLI
pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let Some(command) = cli.command else {
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    let config_path = cli.config.unwrap_or_else(get_config_path);
    let ctx = Context::load(config_path, cli.db)?;

    match command {
        Commands::Daemon => commands::daemon::run(&ctx),
        Commands::Sample { period } => commands::sample::run(&ctx, period),
        Commands::Usage { live } => commands::usage::run(&ctx, live),
        Commands::Apps => commands::apps::run(&ctx),
        Commands::Block { uid } => commands::block::run(&ctx, uid, true),
        Commands::Unblock { uid } => commands::block::run(&ctx, uid, false),
        Commands::Limit { command } => match command {
            LimitCommands::Set { uid, daily, weekly, monthly } => {
                commands::limit::set(&ctx, uid, daily, weekly, monthly)
            }
            LimitCommands::Remove { uid } => commands::limit::remove(&ctx, uid),
            LimitCommands::List => commands::limit::list(&ctx),
        },
        Commands::Data { command } => match command {
            DataCommands::Enable => commands::data::run(&ctx, true),
            DataCommands::Disable => commands::data::run(&ctx, false),
        },
        Commands::History { limit } => commands::history::run(&ctx, limit),
        Commands::Export { output, open } => commands::export::run(&ctx, output, open),
        Commands::Prune { days } => commands::prune::run(&ctx, days),
        Commands::Reset { force } => commands::reset::run(&ctx, force),
        Commands::Stats => commands::stats::run(&ctx),
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(&ctx),
            ConfigCommands::Path => commands::config::path(&ctx),
            ConfigCommands::Init { force } => commands::config::init(&ctx, force),
        },
    }
}
