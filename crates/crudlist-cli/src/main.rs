//! crudlist - in-memory record list on the command line
//!
//! Nothing is written back on exit; use `export` inside the shell to keep a
//! snapshot.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod render;
mod shell;

#[derive(Parser)]
#[command(name = "crudlist")]
#[command(about = "In-memory CRUD record list")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to $CRUDLIST_CONFIG or the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Seed file to start from instead of the configured one
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List records
    List {
        /// Only records with the flag set
        #[arg(long, conflicts_with = "open")]
        done: bool,

        /// Only records with the flag cleared
        #[arg(long)]
        open: bool,
    },

    /// Show one record
    Show {
        /// Record ID
        id: String,
    },

    /// Interactive session over the seeded records
    Shell,

    /// Validate a member join form
    Member {
        /// First name
        #[arg(long, default_value = "")]
        first: String,

        /// Last name
        #[arg(long, default_value = "")]
        last: String,

        /// E-mail address
        #[arg(long, default_value = "")]
        email: String,
    },

    /// Output JSON schema for config file
    Schema,

    /// Show or edit configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Print the config file path in use
    Path,
    /// Reset to default configuration
    Reset,
    /// Get a specific config value
    Get {
        /// Config key (e.g., "demo_seed", "api.port")
        key: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.config.as_deref(), cli.seed.clone(), cli.json)?;

    match cli.command {
        Commands::List { done, open } => {
            let flag = match (done, open) {
                (true, _) => Some(true),
                (_, true) => Some(false),
                _ => None,
            };
            commands::list(&ctx, flag)
        }
        Commands::Show { id } => commands::show(&ctx, &id),
        Commands::Shell => commands::shell(ctx),
        Commands::Member { first, last, email } => commands::member(&ctx, &first, &last, &email),
        Commands::Schema => commands::schema(),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => commands::config_show(&ctx),
            Some(ConfigCommands::Path) => commands::config_path(&ctx),
            Some(ConfigCommands::Reset) => commands::config_reset(&ctx),
            Some(ConfigCommands::Get { key }) => commands::config_get(&ctx, &key),
        },
    }
}
