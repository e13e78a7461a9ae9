//! Configuration management for the album API.
//!
//! This module provides a configuration system that supports:
//! - Command-line arguments via clap
//! - Environment variables with `ALBUMS_` prefix (a `.env` file is loaded first)
//! - Sensible defaults for all optional settings
//!
//! # Commands
//!
//! - `albums-api serve` - Run the HTTP server
//! - `albums-api check` - Verify the S3 store is reachable
//!
//! # Environment Variables
//!
//! - `ALBUMS_HOST` - Server bind address (default: 0.0.0.0)
//! - `ALBUMS_PORT` - Server port (default: 8080)
//! - `ALBUMS_AUTH_SECRET` - Shared secret required to create albums (required)
//! - `ALBUMS_STORE` - Store backend, `s3` or `memory` (default: s3)
//! - `ALBUMS_S3_BUCKET` - S3 bucket holding the album documents
//! - `ALBUMS_S3_PREFIX` - Key prefix of the album collection (default: albums/)
//! - `ALBUMS_S3_ENDPOINT` - Custom S3 endpoint for S3-compatible services
//! - `ALBUMS_S3_REGION` - AWS region (default: us-east-1)
//! - `ALBUMS_CREATE_TIMEOUT` - Seconds a create may take (default: 10)
//! - `ALBUMS_REQUEST_TIMEOUT` - Seconds any other album operation may take (default: 10)
//! - `ALBUMS_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::album::{DEFAULT_CREATE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::store::DEFAULT_PREFIX;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default AWS region.
pub const DEFAULT_REGION: &str = "us-east-1";

// =============================================================================
// CLI Arguments
// =============================================================================

/// Albums API - a REST service for album records.
#[derive(Parser, Debug, Clone)]
#[command(name = "albums-api")]
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

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the HTTP server.
    Serve(ServeConfig),

    /// Check connectivity to the S3 album store.
    Check(CheckConfig),
}

/// Where albums are persisted.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// JSON documents in an S3 bucket
    S3,
    /// In-process map; contents are lost on restart
    Memory,
}

/// S3 connection settings shared by all commands.
#[derive(Args, Debug, Clone)]
pub struct S3Config {
    /// S3 bucket holding the album documents.
    #[arg(long = "s3-bucket", env = "ALBUMS_S3_BUCKET")]
    pub bucket: Option<String>,

    /// Key prefix of the album collection.
    #[arg(long = "s3-prefix", default_value = DEFAULT_PREFIX, env = "ALBUMS_S3_PREFIX")]
    pub prefix: String,

    /// Custom S3 endpoint URL for S3-compatible services (MinIO, etc.).
    #[arg(long = "s3-endpoint", env = "ALBUMS_S3_ENDPOINT")]
    pub endpoint: Option<String>,

    /// AWS region for S3.
    #[arg(long = "s3-region", default_value = DEFAULT_REGION, env = "ALBUMS_S3_REGION")]
    pub region: String,
}

impl S3Config {
    /// Validate the S3 settings.
    pub fn validate(&self) -> Result<(), String> {
        match self.bucket.as_deref() {
            None | Some("") => {
                return Err(
                    "S3 bucket name is required. Set --s3-bucket or ALBUMS_S3_BUCKET".to_string(),
                )
            }
            Some(_) => {}
        }

        if let Some(ref endpoint) = self.endpoint {
            url::Url::parse(endpoint)
                .map_err(|e| format!("Invalid S3 endpoint '{}': {}", endpoint, e))?;
        }

        Ok(())
    }

    /// The bucket name, or "" if unset (call validate() first).
    pub fn bucket_or_empty(&self) -> &str {
        self.bucket.as_deref().unwrap_or("")
    }
}

/// Settings for `albums-api serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "ALBUMS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "ALBUMS_PORT")]
    pub port: u16,

    // =========================================================================
    // Authentication Configuration
    // =========================================================================
    /// Shared secret a client must present as a bearer token to create albums.
    #[arg(long, env = "ALBUMS_AUTH_SECRET", hide_env_values = true)]
    pub auth_secret: Option<String>,

    // =========================================================================
    // Store Configuration
    // =========================================================================
    /// Store backend.
    #[arg(long, value_enum, default_value_t = StoreBackend::S3, env = "ALBUMS_STORE")]
    pub store: StoreBackend,

    #[command(flatten)]
    pub s3: S3Config,

    /// Seconds a create may take before it is abandoned.
    #[arg(long = "create-timeout", default_value_t = DEFAULT_CREATE_TIMEOUT.as_secs(), env = "ALBUMS_CREATE_TIMEOUT")]
    pub create_timeout_secs: u64,

    /// Seconds a list, get, update or delete may take before it is abandoned.
    #[arg(long = "request-timeout", default_value_t = DEFAULT_REQUEST_TIMEOUT.as_secs(), env = "ALBUMS_REQUEST_TIMEOUT")]
    pub request_timeout_secs: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "ALBUMS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.auth_secret.as_deref().map_or(true, str::is_empty) {
            return Err(
                "No auth secret provided. Set --auth-secret or ALBUMS_AUTH_SECRET".to_string(),
            );
        }

        if self.store == StoreBackend::S3 {
            self.s3.validate()?;
        }

        if self.create_timeout_secs == 0 {
            return Err("create_timeout must be greater than 0".to_string());
        }

        if self.request_timeout_secs == 0 {
            return Err("request_timeout must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the auth secret, or "" if unset (call validate() first).
    pub fn auth_secret_or_empty(&self) -> &str {
        self.auth_secret.as_deref().unwrap_or("")
    }

    pub fn create_timeout(&self) -> Duration {
        Duration::from_secs(self.create_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Deadline for a single S3 call: long enough for the slowest operation.
    pub fn store_operation_timeout(&self) -> Duration {
        self.create_timeout().max(self.request_timeout())
    }
}

/// Settings for `albums-api check`.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub s3: S3Config,

    /// List the ids of all stored albums.
    #[arg(long, default_value_t = false)]
    pub list_albums: bool,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
