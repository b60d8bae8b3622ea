//! Mock token verifier
//!
//! Deterministic verifier used in tests. Records how many times it
//! was called so tests can assert that the authorizer short-circuits
//! without a lookup.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{TokenVerifier, VerifiedIdentity, VerifyError};

/// Mock verifier with a fixed token → principal table
pub struct MockVerifier {
    outcomes: HashMap<String, String>,
    unavailable: bool,
    calls: AtomicUsize,
}

impl MockVerifier {
    /// Create a mock that rejects every token
    pub fn new() -> Self {
        Self {
            outcomes: HashMap::new(),
            unavailable: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Accept `token`, resolving it to `principal`
    pub fn with_valid_token(mut self, token: &str, principal: &str) -> Self {
        self.outcomes.insert(token.to_string(), principal.to_string());
        self
    }

    /// Fail every call as if the provider were unreachable
    pub fn unavailable() -> Self {
        Self {
            outcomes: HashMap::new(),
            unavailable: true,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `verify` calls made so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockVerifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TokenVerifier for MockVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(VerifyError::UpstreamUnavailable(
                "mock provider unavailable".to_string(),
            ));
        }

        match self.outcomes.get(token) {
            Some(principal) => Ok(VerifiedIdentity {
                principal_id: principal.clone(),
                claims: HashMap::new(),
            }),
            None => Err(VerifyError::UntrustedSignature(
                "token not known to mock".to_string(),
            )),
        }
    }
}
