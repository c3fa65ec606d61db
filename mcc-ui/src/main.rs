//! Media Control Console (mcc-ui) - Main entry point
//!
//! `login` runs the session gate and follows its redirect into the
//! dashboard; `dashboard` mounts the realtime control client directly;
//! `logout` clears the stored session token.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mcc_common::config::{ConfigOverrides, ConfigResolver, ConsoleConfig};
use mcc_ui::console::{apply_operator_command, parse_operator_command, ParseError, HELP};
use mcc_ui::render::render_dashboard;
use mcc_ui::{Credentials, Dashboard, FileTokenStore, HttpApi, Redirect, SessionGate, WsConnector};

/// Command-line arguments for mcc-ui
#[derive(Parser, Debug)]
#[command(name = "mcc-ui")]
#[command(about = "Admin console for a remote media player")]
#[command(version)]
struct Args {
    /// Config file (default: <config dir>/mcc/config.toml)
    #[arg(long, global = true, env = "MCC_CONFIG")]
    config: Option<PathBuf>,

    /// Base URL of the media/auth HTTP service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// WebSocket URL of the realtime status channel
    #[arg(long, global = true)]
    realtime_url: Option<String>,

    /// File holding the session token
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Log in and continue to the dashboard
    Login {
        #[arg(short, long, env = "MCC_USERNAME")]
        username: String,

        #[arg(short, long, env = "MCC_PASSWORD", hide_env_values = true)]
        password: String,

        /// Store the token without opening the dashboard
        #[arg(long)]
        no_dashboard: bool,
    },
    /// Remove the stored session token
    Logout,
    /// Open the dashboard (default)
    Dashboard,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so the rendered dashboard owns stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mcc_ui=info,mcc_common=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let overrides = ConfigOverrides {
        api_url: args.api_url.clone(),
        realtime_url: args.realtime_url.clone(),
        token_file: args.token_file.clone(),
        request_timeout_secs: None,
    };
    let mut resolver = ConfigResolver::new(overrides);
    if let Some(path) = &args.config {
        resolver = resolver.with_config_file(path);
    }
    let config = resolver.resolve().context("Failed to load configuration")?;

    info!(api_url = %config.api_url, realtime_url = %config.realtime_url, "Starting MCC console");

    let store = FileTokenStore::new(&config.token_file);
    let gate = SessionGate::new(HttpApi::new(&config)?, store);

    match args.command.unwrap_or(CliCommand::Dashboard) {
        CliCommand::Login {
            username,
            password,
            no_dashboard,
        } => {
            let redirect = gate
                .submit(Credentials::new(username, password))
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Login successful");

            match redirect {
                Redirect::Dashboard if !no_dashboard => {
                    run_dashboard(&config, gate.current_token()).await?;
                }
                Redirect::Dashboard => {}
            }
        }
        CliCommand::Logout => {
            gate.logout().context("Failed to clear session token")?;
            println!("Logged out");
        }
        CliCommand::Dashboard => {
            run_dashboard(&config, gate.current_token()).await?;
        }
    }

    Ok(())
}

/// Mount the dashboard, re-render on every change and feed stdin commands
/// to it until `quit`, end of input or Ctrl+C.
async fn run_dashboard(config: &ConsoleConfig, token: Option<String>) -> Result<()> {
    let library = HttpApi::new(config)?.with_token(token.clone());
    let connector = WsConnector::new(&config.realtime_url).with_token(token);

    let handle = Dashboard::mount(library, connector);
    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("{}", render_dashboard(&updates.borrow_and_update()));
    println!("{}", HELP);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                println!();
                print!("{}", render_dashboard(&snapshot));
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => match parse_operator_command(&line) {
                    Ok(command) => {
                        if !apply_operator_command(&handle, command) {
                            break;
                        }
                    }
                    Err(ParseError::Empty) => {}
                    Err(e) => eprintln!("{}", e),
                },
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read operator input");
                    break;
                }
            },
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, closing dashboard");
                break;
            }
        }
    }

    handle.unmount().await;
    Ok(())
}
