use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

use clap::Parser;
use routeguard::config::{ConfigError, GuardConfig};
use routeguard::guard::GuardError;
use routeguard::session::{Session, SessionError};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read config file {}: {source}", path.display())]
    ReadConfig { path: PathBuf, source: io::Error },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Parser, Debug)]
#[command(name = "routeguard", about = "Draft editor session with a route-leave confirmation guard")]
struct Cli {
    /// JSON guard config; environment variables are used when absent.
    #[arg(long, env = "ROUTEGUARD_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    message: Option<String>,

    #[arg(long, default_value = "/admin/article/add")]
    start: String,
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "routeguard failed");
            eprintln!("routeguard: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|source| CliError::ReadConfig { path: path.clone(), source })?;
            GuardConfig::from_json(&raw)?
        }
        None => GuardConfig::from_env()?,
    };
    config.text = config.text.with_overrides(cli.message.as_deref(), cli.title.as_deref());

    let out = Rc::new(RefCell::new(io::stdout()));
    let mut session = Session::new(&cli.start, config, out)?;
    tracing::info!(start = %cli.start, "editor session started");
    session.run(io::stdin().lock())?;
    Ok(())
}
