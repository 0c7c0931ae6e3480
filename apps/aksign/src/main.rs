//! AKSign CLI - sign, verify and inspect AK/SK admin requests.
//!
//! # Usage
//!
//! ```text
//! ADMIN_ACCESS_KEY=... ADMIN_SECRET_KEY=... aksign sign --param akList=a,b
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ADMIN_ACCESS_KEY` | *(unset)* | Admin access key used to sign and verify |
//! | `ADMIN_SECRET_KEY` | *(unset)* | Admin secret key used to sign and verify |
//! | `AKSIGN_TIMESTAMP_TOLERANCE_SECS` | `300` | Accepted clock skew when verifying |
//! | `AKSIGN_NONCE_TTL_SECS` | `300` | How long a verified nonce is remembered |
//! | `AKSIGN_ALLOW_WEAK_NONCE` | `false` | Allow a clock-seeded fallback RNG |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod commands;

use aksign_core::AkSignConfig;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{keygen, sign, string_to_sign, verify};

#[derive(Debug, Parser)]
#[command(name = "aksign")]
#[command(about = "Sign and verify AK/SK admin requests", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign business parameters with the admin credentials
    Sign {
        /// Business parameter as KEY=VALUE (repeatable)
        #[arg(short, long = "param", value_parser = sign::parse_param)]
        params: Vec<(String, String)>,
        /// Output the merged parameters as JSON instead of a query string
        #[arg(long)]
        json: bool,
    },
    /// Verify a signed query string against the admin credentials
    Verify {
        /// Query string, e.g. `accessKey=..&timestamp=..&nonce=..&sign=..`
        #[arg(long)]
        query: String,
        /// Verify as of this Unix time instead of now
        #[arg(long)]
        now: Option<i64>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the signature base string (and optionally its signature)
    StringToSign {
        /// Access key
        #[arg(long)]
        access_key: String,
        /// Unix time in seconds
        #[arg(long)]
        timestamp: i64,
        /// Nonce
        #[arg(long)]
        nonce: String,
        /// Also sign the base string with this secret key
        #[arg(long)]
        secret_key: Option<String>,
    },
    /// Generate a fresh access key / secret key pair
    Keygen {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so command output on stdout stays machine-readable.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AkSignConfig::from_env().context("failed to load configuration")?;
    init_tracing(&config.log_level)?;

    let output = match cli.command {
        Commands::Sign { params, json } => sign::run(&config, params, json)?,
        Commands::Verify { query, now, json } => verify::run(&config, &query, now, json)?,
        Commands::StringToSign {
            access_key,
            timestamp,
            nonce,
            secret_key,
        } => string_to_sign::run(&access_key, timestamp, &nonce, secret_key.as_deref()),
        Commands::Keygen { json } => keygen::run(&config, json)?,
    };

    println!("{output}");
    Ok(())
}
