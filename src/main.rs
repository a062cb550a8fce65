//! Command-line entry point.
//!
//! A thin wrapper around the `kontagent` library for poking at the API by
//! hand:
//! - `send` builds a query and sends it (or prints it with `--dry-run`)
//! - `tag` prints a fresh tracking tag
//! - `append` / `strip` rewrite tracking parameters on a URL

use std::process;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use kontagent::config::{
    DEFAULT_API_VERSION, ENV_API_KEY, ENV_API_SERVER, ENV_API_VERSION, ENV_TIMEOUT_SECS,
};
use kontagent::initialization::init_logger_with;
use kontagent::links::{append_params, strip_params};
use kontagent::{
    generate_long_tag, generate_short_tag, AnalyticsInterface, Config, Dispatcher, LogFormat,
    LogLevel,
};

#[derive(Debug, Parser)]
#[command(name = "kontagent", version, about = "Kontagent analytics API client")]
struct Cli {
    /// API server host (optionally host:port or with scheme)
    #[arg(long, env = ENV_API_SERVER, default_value = "")]
    api_server: String,

    /// API key
    #[arg(long, env = ENV_API_KEY, default_value = "", hide_env_values = true)]
    api_key: String,

    /// API version path segment
    #[arg(long, env = ENV_API_VERSION, default_value = DEFAULT_API_VERSION)]
    api_version: String,

    /// Request timeout in seconds (no timeout when unset)
    #[arg(long, env = ENV_TIMEOUT_SECS)]
    timeout_secs: Option<u64>,

    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    log_level: LogLevel,

    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a query for MESSAGE_TYPE and send it
    Send {
        /// Message type code, e.g. apr, ins, gci
        message_type: String,

        /// Query parameters as KEY=VALUE
        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Print the query as JSON instead of sending it
        #[arg(long)]
        dry_run: bool,
    },
    /// Print a new tracking tag
    Tag {
        /// 32-bit tag instead of 64-bit
        #[arg(long)]
        short: bool,
    },
    /// Add KEY=VALUE parameters to a URL
    Append {
        url: String,

        #[arg(value_parser = parse_key_val)]
        params: Vec<(String, String)>,
    },
    /// Remove kt_* tracking parameters from a URL
    Strip { url: String },
}

fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((k, v)) if !k.is_empty() => Ok((k.to_string(), v.to_string())),
        _ => Err(format!("expected KEY=VALUE, got {raw:?}")),
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            api_server: self.api_server.clone(),
            api_key: self.api_key.clone(),
            api_version: self.api_version.clone(),
            request_timeout: self.timeout_secs.map(Duration::from_secs),
            ..Default::default()
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config();

    match cli.command {
        Command::Send {
            message_type,
            params,
            dry_run,
        } => {
            let api = AnalyticsInterface::from_config(&config)
                .context("Set --api-server and --api-key (or KONTAGENT_API_SERVER / KONTAGENT_API_KEY)")?;
            let query = api
                .construct_query(&message_type, params.into_iter().map(|(k, v)| (k, Some(v))))
                .context("Failed to build query")?;

            if dry_run {
                println!("{}", serde_json::to_string_pretty(&query)?);
            } else {
                let dispatcher = Dispatcher::new(&config).context("Failed to create HTTP client")?;
                let body = dispatcher
                    .send(&query)
                    .await
                    .with_context(|| format!("Failed to send {message_type} query"))?;
                println!("{body}");
            }
        }
        Command::Tag { short } => {
            let tag = if short {
                generate_short_tag()
            } else {
                generate_long_tag()
            };
            println!("{tag}");
        }
        Command::Append { url, params } => {
            let tagged = append_params(&url, params.into_iter().map(|(k, v)| (k, Some(v))));
            println!("{tagged}");
        }
        Command::Strip { url } => {
            println!("{}", strip_params(&url));
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // A .env next to the working directory may hold KONTAGENT_API_KEY
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    init_logger_with(cli.log_level.clone().into(), cli.log_format.clone())
        .context("Failed to initialize logger")?;

    if let Err(e) = run(cli).await {
        eprintln!("kontagent error: {:#}", e);
        process::exit(1);
    }
    Ok(())
}
