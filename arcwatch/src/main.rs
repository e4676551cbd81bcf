use anyhow::{Context, Result};
use arcwatch_core::cli::conf::{self as conf_cli, ConfigCmd};
use arcwatch_core::conf::{ArcwatchConfig, DEFAULT_CONFIG_PATH, load_config};
use arcwatch_core::logging::{LogFormat, default_log_format, init_logging};
use arcwatch_core::server;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "arcwatch",
    version,
    about = "Arcwatch: live geolocated request arcs for your web server"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the arcwatch server (default)
    Run {
        /// Path to arcwatch.hcl; defaults apply when omitted and absent
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the listen port
        #[arg(long, env = "PORT")]
        port: Option<u16>,

        /// json or pretty; defaults to pretty on a terminal
        #[arg(long)]
        log_format: Option<LogFormat>,
    },

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: ConfigCmd,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { cmd }) => conf_cli::run(cmd),

        Some(Command::Run {
            config,
            port,
            log_format,
        }) => run(config, port, log_format),

        None => run(None, None, None),
    }
}

fn run(config: Option<PathBuf>, port: Option<u16>, log_format: Option<LogFormat>) -> Result<()> {
    init_logging(log_format.unwrap_or_else(default_log_format));

    let mut cfg = resolve_config(config.as_deref())?;
    if let Some(port) = port {
        cfg.server.listen = with_port(&cfg.server.listen, port);
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")?;

    runtime
        .block_on(server::run(cfg))
        .context("arcwatch server failed")
}

/// An explicit path must load; the implicit default may be absent.
fn resolve_config(explicit: Option<&Path>) -> Result<ArcwatchConfig> {
    if let Some(path) = explicit {
        return load_config(path).with_context(|| format!("failed to load {}", path.display()));
    }

    let default = Path::new(DEFAULT_CONFIG_PATH);
    if default.exists() {
        load_config(default).with_context(|| format!("failed to load {}", default.display()))
    } else {
        info!("no {DEFAULT_CONFIG_PATH} found, using defaults");
        Ok(ArcwatchConfig::default())
    }
}

fn with_port(listen: &str, port: u16) -> String {
    match listen.rsplit_once(':') {
        Some((host, _)) => format!("{host}:{port}"),
        None => format!("0.0.0.0:{port}"),
    }
}
