//! Identity verification for the Keenmind token authorizer
//!
//! Two collaborating strategies validate a bearer token: local RS256
//! verification against Google's published JWKS, and a live user
//! lookup against the Cognito identity provider. Both implement
//! `TokenVerifier` so the authorizer can be wired with test doubles.

mod cognito;
mod error;
mod google;
mod jwks;
mod mock;

pub use cognito::CognitoVerifier;
pub use error::VerifyError;
pub use google::{GoogleClaims, GoogleVerifier};
pub use jwks::{Jwk, JwkSet, JwksClient};
pub use mock::MockVerifier;

use std::collections::HashMap;

/// Identity produced by a successful verification.
///
/// Never constructed on a failure path; a failed check yields a
/// `VerifyError` instead.
#[derive(Debug, Clone)]
pub struct VerifiedIdentity {
    /// Subject the boundary service attributes the request to
    pub principal_id: String,
    /// Claims backing the identity (token claims or user attributes)
    pub claims: HashMap<String, serde_json::Value>,
}

/// A bearer-token validation strategy
#[async_trait::async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError>;
}
