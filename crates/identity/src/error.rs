//! Verification errors
//!
//! Causes are recorded in logs only. The authorizer collapses every
//! variant to the same DENY decision, so nothing here reaches the
//! caller.

#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("Malformed token: {0}")]
    MalformedToken(String),

    #[error("Untrusted signature: {0}")]
    UntrustedSignature(String),

    #[error("Token expired or not yet valid")]
    ExpiredOrNotYetValid,

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("No resolvable user identity")]
    UnknownUser,
}
