//! Netskel forced-command server
//!
//! sshd runs this binary for every client session, passing the client's
//! command line the way it would to a login shell: `netskel-server -c "<request>"`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use netskel_core::config::{self, ServerConfig, CONFIG_ENV};
use netskel_core::ClientRegistry;
use netskel_protocol::ERROR_TOKEN;
use netskel_server::session::remote_addr_from_env;
use netskel_server::Dispatcher;

#[derive(Parser)]
#[command(name = "netskel-server")]
#[command(about = "Netskel forced-command server")]
#[command(version)]
struct Args {
    /// Client request, as passed by sshd
    #[arg(short = 'c')]
    command: Option<String>,

    /// Path to configuration file
    #[arg(long, env = CONFIG_ENV)]
    config: Option<PathBuf>,

    /// Log level (overrides config)
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(_) => return fail(),
    };

    let Some(request) = args.command.as_deref() else {
        return fail();
    };

    match run(&args, request) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("{:#}", e);
            fail()
        }
    }
}

fn fail() -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    let _ = writeln!(stdout, "{}", ERROR_TOKEN);
    let _ = stdout.flush();
    ExitCode::FAILURE
}

fn run(args: &Args, request: &str) -> Result<bool> {
    let config = match config::resolve_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(None, args.log_level.as_deref().unwrap_or("info"));
            return Err(e).context("Failed to load configuration");
        }
    };

    let level = args.log_level.as_deref().unwrap_or(&config.log_level);
    init_logging(config.log_file_path().as_deref(), level);

    let span = tracing::info_span!("netskel", pid = std::process::id());
    let _enter = span.enter();

    serve(&config, request)
}

fn serve(config: &ServerConfig, request: &str) -> Result<bool> {
    let db_path = config.client_db_path();
    let mut registry = ClientRegistry::open(&db_path, config.lock_timeout)
        .with_context(|| format!("Failed to open client registry {:?}", db_path))?;

    let remote_addr = remote_addr_from_env();
    let mut stdout = std::io::stdout().lock();

    Dispatcher::new(config, &mut registry)
        .respond(request, &remote_addr, &mut stdout)
        .context("Failed to write response")
}

/// Send logs to `log_file`, or stderr when unset or unwritable
///
/// stdout carries protocol data only.
fn init_logging(log_file: Option<&Path>, level: &str) {
    let filter = EnvFilter::new(std::env::var("RUST_LOG").unwrap_or_else(|_| level.into()));

    let file = log_file.and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(file),
            Err(e) => {
                eprintln!("Cannot open log file {:?}: {}", path, e);
                None
            }
        }
    });

    let _ = match file {
        Some(file) => tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Mutex::new(file)),
            )
            .try_init(),
        None => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };
}
