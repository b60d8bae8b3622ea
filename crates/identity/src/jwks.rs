//! JWKS client with a process-lifetime signing-key cache

use std::collections::HashMap;
use std::time::Duration;

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::VerifyError;

/// Single JSON Web Key as published by the JWKS endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    #[serde(default)]
    pub alg: Option<String>,
    #[serde(rename = "use", default)]
    pub key_use: Option<String>,
    /// RSA modulus (base64url)
    #[serde(default)]
    pub n: Option<String>,
    /// RSA exponent (base64url)
    #[serde(default)]
    pub e: Option<String>,
}

/// Key set returned by the JWKS endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Fetches and caches signing keys by `kid`.
///
/// Cache entries live for the process lifetime: key rotation is rare
/// and Lambda processes are short-lived. Two concurrent misses may
/// fetch the key set twice; both fetches converge on the same keys,
/// so no coordination is needed beyond the lock.
pub struct JwksClient {
    http: reqwest::Client,
    jwks_url: String,
    keys: RwLock<HashMap<String, DecodingKey>>,
}

impl JwksClient {
    /// Create a client against the given JWKS endpoint. `timeout`
    /// bounds each fetch.
    pub fn new(jwks_url: impl Into<String>, timeout: Duration) -> Result<Self, VerifyError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerifyError::UpstreamUnavailable(format!("HTTP client: {}", e)))?;

        Ok(Self {
            http,
            jwks_url: jwks_url.into(),
            keys: RwLock::new(HashMap::new()),
        })
    }

    /// Resolve the decoding key for a `kid`, fetching the key set on
    /// a cache miss.
    pub async fn resolve(&self, kid: &str) -> Result<DecodingKey, VerifyError> {
        if let Some(key) = self.keys.read().await.get(kid) {
            return Ok(key.clone());
        }

        let set = self.fetch().await?;
        self.seed(&set).await;

        self.keys.read().await.get(kid).cloned().ok_or_else(|| {
            VerifyError::UntrustedSignature(format!("no signing key published for kid {}", kid))
        })
    }

    /// Load every usable RSA key from an already-parsed key set into
    /// the cache. Called on fetch, and directly by tests.
    pub async fn seed(&self, set: &JwkSet) {
        let mut keys = self.keys.write().await;
        for jwk in &set.keys {
            if jwk.kty != "RSA" {
                continue;
            }
            let (Some(n), Some(e)) = (&jwk.n, &jwk.e) else {
                continue;
            };
            match DecodingKey::from_rsa_components(n, e) {
                Ok(key) => {
                    keys.insert(jwk.kid.clone(), key);
                }
                Err(err) => {
                    tracing::warn!(kid = %jwk.kid, error = %err, "Skipping unusable JWK");
                }
            }
        }
    }

    async fn fetch(&self) -> Result<JwkSet, VerifyError> {
        tracing::debug!(url = %self.jwks_url, "Fetching JWKS");

        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| VerifyError::UpstreamUnavailable(format!("JWKS fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(VerifyError::UpstreamUnavailable(format!(
                "JWKS endpoint returned {}",
                status
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| VerifyError::UpstreamUnavailable(format!("JWKS parse failed: {}", e)))
    }
}
