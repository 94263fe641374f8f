//! netskelctl
//!
//! Administration of the Netskel client registry.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use netskel_core::config::{self, CONFIG_ENV};
use netskel_core::{ClientRecord, ClientRegistry};
use netskelctl::output::{
    format_client_details, format_clients, format_json, print_error, print_success, print_warning,
};
use netskelctl::RegistryAdmin;

#[derive(Parser)]
#[command(name = "netskelctl")]
#[command(author, version, about = "Netskel client registry administration")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Include disabled clients
    #[arg(short = 'a', long, global = true)]
    all: bool,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all known clients
    List,

    /// Show every field of clients matching a UUID or search text
    Info {
        /// Text matched case-insensitively against UUIDs and field values
        search: String,
    },

    /// List clients not seen for at least the given number of days
    Audit { days: u64 },

    /// Re-enable a disabled client
    Enable { uuid: String },

    /// Disable a client
    Disable { uuid: String },

    /// Delete a client permanently
    Delete { uuid: String },

    /// Set a single field; an empty value removes it
    Put {
        uuid: String,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::resolve_config(cli.config.as_deref())
        .context("Failed to load configuration")?;

    // Only the server creates the registry; a missing one reads as empty.
    let db_path = config.client_db_path();
    let mut registry = if db_path.exists() {
        ClientRegistry::open(&db_path, config.lock_timeout)
            .with_context(|| format!("Failed to open client registry {:?}", db_path))?
    } else {
        print_warning(&format!("Client registry {:?} does not exist yet", db_path));
        ClientRegistry::in_memory().context("Failed to create empty client registry")?
    };

    let mut admin = RegistryAdmin::new(&mut registry, cli.all);

    match cli.command {
        Commands::List => {
            let records = admin.list()?;
            if cli.json {
                println!("{}", format_json(&records)?);
            } else {
                println!("{}", format_clients(&records));
            }
        }

        Commands::Info { search } => {
            let records = admin.info(&search)?;
            print_details(&records, cli.json)?;
        }

        Commands::Audit { days } => {
            let records = admin.audit(days)?;
            print_details(&records, cli.json)?;
        }

        Commands::Enable { uuid } => {
            let client = admin.enable(&uuid)?;
            print_success(&format!("Enabled {}", client));
        }

        Commands::Disable { uuid } => {
            let client = admin.disable(&uuid)?;
            print_success(&format!("Disabled {}", client));
        }

        Commands::Delete { uuid } => {
            let client = admin.delete(&uuid)?;
            print_success(&format!("Deleted {}", client));
        }

        Commands::Put { uuid, field, value } => {
            let client = admin.put(&uuid, &field, &value)?;
            if value.is_empty() {
                print_success(&format!("Removed {} from {}", field, client));
            } else {
                print_success(&format!("Set {} on {}", field, client));
            }
        }
    }

    Ok(())
}

fn print_details(records: &[ClientRecord], json: bool) -> Result<()> {
    if json {
        println!("{}", format_json(records)?);
        return Ok(());
    }

    for record in records {
        print!("{}", format_client_details(record));
    }
    Ok(())
}
