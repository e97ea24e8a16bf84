//! Configuration management for zip-link.
//!
//! All options come from command-line arguments or environment variables,
//! parsed once at startup with clap and validated before anything connects
//! to storage.
//!
//! # Environment Variables
//!
//! - `S3_BUCKET` - Bucket holding the `<id>.zip` archives (required)
//! - `S3_ENDPOINT` - Custom endpoint for S3-compatible services
//! - `S3_REGION` - Region (default: us-east-1)
//! - `S3_ACCESS_KEY_ID` / `S3_SECRET_ACCESS_KEY` - Static credential pair
//! - `STORE_TIMEOUT_SECS` - Deadline for each storage call (default: 5)
//! - `HOST` - Server bind address (default: 0.0.0.0)
//! - `PORT` - Server port (default: 3000)
//! - `FRONTEND_URL` - Allowed CORS origin, `*` for any (default: `*`)

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::link::DEFAULT_STORE_TIMEOUT;
use crate::store::StoreCredentials;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Origin value meaning "any origin".
pub const ANY_ORIGIN: &str = "*";

// =============================================================================
// CLI
// =============================================================================

/// zip-link - short-lived download links for archives in object storage.
#[derive(Parser, Debug)]
#[command(name = "zip-link")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP server
    Serve(ServeConfig),

    /// Verify storage connectivity and optionally look up one archive
    Check(CheckConfig),

    /// Issue a signed link for one identifier and print it
    Sign(SignConfig),
}

// =============================================================================
// Storage Arguments
// =============================================================================

/// Object store connection settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct StoreArgs {
    /// Bucket containing the `<identifier>.zip` archives.
    #[arg(long, env = "S3_BUCKET")]
    pub s3_bucket: String,

    /// Custom endpoint URL for S3-compatible services (MinIO, R2, ...).
    ///
    /// If not specified, uses the default AWS S3 endpoint.
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// Region of the bucket.
    #[arg(long, default_value = DEFAULT_REGION, env = "S3_REGION")]
    pub s3_region: String,

    /// Access key id. Falls back to the default AWS credential chain when unset.
    #[arg(long, env = "S3_ACCESS_KEY_ID")]
    pub s3_access_key_id: Option<String>,

    /// Secret access key paired with `--s3-access-key-id`.
    #[arg(long, env = "S3_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub s3_secret_access_key: Option<String>,

    /// Deadline in seconds for each storage call.
    #[arg(long, default_value_t = DEFAULT_STORE_TIMEOUT.as_secs(), env = "STORE_TIMEOUT_SECS")]
    pub store_timeout_secs: u64,
}

impl StoreArgs {
    pub fn validate(&self) -> Result<(), String> {
        if self.s3_bucket.trim().is_empty() {
            return Err("S3 bucket name is required. Set --s3-bucket or S3_BUCKET".to_string());
        }

        if let Some(ref endpoint) = self.s3_endpoint {
            let parsed = url::Url::parse(endpoint)
                .map_err(|e| format!("Invalid S3 endpoint '{}': {}", endpoint, e))?;
            if parsed.scheme() != "http" && parsed.scheme() != "https" {
                return Err(format!(
                    "Invalid S3 endpoint '{}': scheme must be http or https",
                    endpoint
                ));
            }
        }

        match (&self.s3_access_key_id, &self.s3_secret_access_key) {
            (Some(_), None) | (None, Some(_)) => {
                return Err(
                    "S3 credentials must be given as a pair: set both --s3-access-key-id \
                     and --s3-secret-access-key, or neither"
                        .to_string(),
                );
            }
            _ => {}
        }

        if self.store_timeout_secs == 0 {
            return Err("store_timeout_secs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Static credentials, if both halves were supplied.
    pub fn credentials(&self) -> Option<StoreCredentials> {
        match (&self.s3_access_key_id, &self.s3_secret_access_key) {
            (Some(id), Some(secret)) => Some(StoreCredentials {
                access_key_id: id.clone(),
                secret_access_key: secret.clone(),
            }),
            _ => None,
        }
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

// =============================================================================
// Serve
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "PORT")]
    pub port: u16,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Frontend origin allowed by CORS and targeted by `/redirect`.
    ///
    /// `*` allows any origin and disables `/redirect`.
    #[arg(long, default_value = ANY_ORIGIN, env = "FRONTEND_URL")]
    pub frontend_url: String,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()?;

        if self.frontend_url != ANY_ORIGIN {
            let parsed = url::Url::parse(&self.frontend_url)
                .map_err(|e| format!("Invalid frontend URL '{}': {}", self.frontend_url, e))?;
            if parsed.host_str().is_none() {
                return Err(format!(
                    "Invalid frontend URL '{}': missing host",
                    self.frontend_url
                ));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The configured frontend origin, or `None` when any origin is allowed.
    pub fn frontend_origin(&self) -> Option<&str> {
        if self.frontend_url == ANY_ORIGIN {
            None
        } else {
            Some(&self.frontend_url)
        }
    }
}

// =============================================================================
// Check
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Identifier whose archive should be looked up.
    #[arg(long)]
    pub identifier: Option<String>,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl CheckConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()
    }
}

// =============================================================================
// Sign
// =============================================================================

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignOutputFormat {
    /// Print only the URL
    #[default]
    Url,
    /// Print url, key, ttl and expiry as JSON
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct SignConfig {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Identifier to issue a link for.
    pub identifier: String,

    /// Output format.
    #[arg(long, value_enum, default_value_t = SignOutputFormat::Url)]
    pub format: SignOutputFormat,
}

impl SignConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.store.validate()
    }
}

// =============================================================================
// Tests
// =============================================================================
