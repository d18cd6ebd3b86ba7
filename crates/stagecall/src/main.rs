//! stagecall - Ableton Live bridge for AI assistants
//!
//! Subcommands:
//! - `stagecall mcp` - serve MCP tools over stdio (for assistant clients)
//! - `stagecall ping` - probe an AbletonOSC endpoint once
//! - `stagecall send <address> [args...]` - send a raw OSC message
//!
//! Configuration is loaded from (in order, later wins):
//! 1. Compiled defaults
//! 2. ~/.config/stagecall/config.toml
//! 3. ./stagecall.toml (or --config path)
//! 4. Environment variables (ABLETON_OSC_*, STAGECALL_*)
//!
//! Exit codes: 0 clean shutdown, 1 unrecoverable startup failure,
//! 2 configuration error.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use liveconf::BridgeConfig;
use liveosc::OscEndpoints;

use stagecall::{commands, mcp, Session};

/// Ableton Live bridge: MCP tools over OSC
#[derive(Parser)]
#[command(name = "stagecall")]
#[command(about = "Ableton Live bridge: MCP tools over OSC")]
#[command(version)]
struct Cli {
    /// Path to config file (overrides ./stagecall.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve MCP over stdio (for Claude Code and other stdio clients)
    Mcp {
        /// Show the effective configuration and exit
        #[arg(long)]
        show_config: bool,
    },

    /// Probe an AbletonOSC endpoint with /test
    #[command(after_help = "EXAMPLES:\n    stagecall ping\n    stagecall ping --host 127.0.0.1 --send-port 11000")]
    Ping {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        send_port: Option<u16>,

        #[arg(long)]
        receive_port: Option<u16>,

        /// Timeout in milliseconds
        #[arg(short, long, default_value = "2000")]
        timeout: u64,
    },

    /// Send a raw OSC message and print any same-address reply
    Send {
        /// OSC address, e.g. /song/get/tempo
        address: String,

        /// Arguments (ints, floats, true/false, or strings)
        args: Vec<String>,

        /// Timeout in milliseconds
        #[arg(short, long, default_value = "2000")]
        timeout: u64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Stdio transport keeps stdout for protocol frames; everything logs
    // to stderr regardless of subcommand.
    let (config, sources) = match liveconf::load_from(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("configuration error: {e}");
            return ExitCode::from(2);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("STAGECALL_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter));
    match &config.log.file {
        Some(path) => match std::fs::File::options().create(true).append(true).open(path) {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_writer(std::sync::Mutex::new(file))
                    .with_ansi(false)
                    .with_env_filter(filter)
                    .init();
            }
            Err(e) => {
                eprintln!("configuration error: cannot open log file {}: {e}", path.display());
                return ExitCode::from(2);
            }
        },
        None => {
            tracing_subscriber::fmt()
                .with_writer(std::io::stderr)
                .with_env_filter(filter)
                .init();
        }
    }

    for path in &sources.files {
        tracing::info!(file = %path.display(), "loaded config");
    }
    if !sources.env_overrides.is_empty() {
        tracing::info!(overrides = ?sources.env_overrides, "environment overrides");
    }

    match run(cli.command, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(1)
        }
    }
}

async fn run(command: Commands, config: BridgeConfig) -> Result<()> {
    match command {
        Commands::Mcp { show_config } => {
            if show_config {
                println!("{}", config.to_toml());
                return Ok(());
            }
            let session = Session::new(config);
            mcp::serve(session).await
        }
        Commands::Ping { host, send_port, receive_port, timeout } => {
            let endpoints = endpoints_with(&config, host, send_port, receive_port);
            commands::ping(endpoints, Duration::from_millis(timeout)).await
        }
        Commands::Send { address, args, timeout } => {
            let endpoints = endpoints_with(&config, None, None, None);
            commands::send_raw(endpoints, &address, &args, Duration::from_millis(timeout)).await
        }
    }
}

fn endpoints_with(
    config: &BridgeConfig,
    host: Option<String>,
    send_port: Option<u16>,
    receive_port: Option<u16>,
) -> OscEndpoints {
    OscEndpoints {
        host: host.unwrap_or_else(|| config.osc.host.clone()),
        send_port: send_port.unwrap_or(config.osc.send_port),
        receive_port: receive_port.unwrap_or(config.osc.receive_port),
    }
}
