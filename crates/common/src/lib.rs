//! Shared configuration for the Keenmind cloud backend

mod config;

pub use config::{Config, DEFAULT_GOOGLE_JWKS_URL};
