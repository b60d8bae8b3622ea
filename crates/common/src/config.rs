//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Google's published JWKS endpoint for identity-token signing keys
pub const DEFAULT_GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// AWS region hosting the Cognito user pool
    pub aws_region: String,

    /// Optional AWS endpoint override (LocalStack)
    pub aws_endpoint_url: Option<String>,

    /// JWKS endpoint for Google-issued tokens
    pub google_jwks_url: String,
    /// Expected audience for Google tokens; validated only when set
    pub google_audience: Option<String>,

    /// Upper bound for each upstream call, in seconds. Must stay well
    /// under the API Gateway authorizer timeout.
    pub upstream_timeout_secs: u64,

    /// Runtime configuration
    pub log_level: String,
    pub rust_log: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let config = Self {
            aws_region: env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            aws_endpoint_url: env::var("AWS_ENDPOINT_URL").ok(),

            google_jwks_url: env::var("GOOGLE_JWKS_URL")
                .unwrap_or_else(|_| DEFAULT_GOOGLE_JWKS_URL.to_string()),
            google_audience: env::var("GOOGLE_AUDIENCE").ok(),

            upstream_timeout_secs: env::var("UPSTREAM_TIMEOUT_SECS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),

            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "keenmind=debug".to_string()),
        };

        Ok(config)
    }

    /// Timeout applied to each JWKS fetch and identity-provider lookup
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }
}
