//! Dual-mode bearer-token authorization for the Keenmind cloud API
//!
//! Decides ALLOW or DENY for each API Gateway request. The bearer
//! token is validated either locally against Google's JWKS or through
//! a live Cognito user lookup, selected by the `X-Auth-Source`
//! header. Every failure path resolves to a DENY decision; no error
//! ever crosses the component boundary.

mod policy;
mod request;

pub use policy::{PolicyDecision, PolicyDocument, Statement, DENIED_PRINCIPAL};
pub use request::{AuthRequest, AuthSource, AuthorizerEvent};

use std::sync::Arc;

use keenmind_identity::TokenVerifier;

/// The authorizer with its two injected validation strategies
pub struct TokenAuthorizer {
    google: Arc<dyn TokenVerifier>,
    cognito: Arc<dyn TokenVerifier>,
}

impl TokenAuthorizer {
    /// Wire the authorizer with its verifier collaborators.
    /// Constructed once at process start; test doubles slot in here.
    pub fn new(google: Arc<dyn TokenVerifier>, cognito: Arc<dyn TokenVerifier>) -> Self {
        Self { google, cognito }
    }

    /// Decide ALLOW or DENY for one request.
    ///
    /// Infallible by contract: a missing credential, a bad signature,
    /// and an unreachable provider all collapse to the same generic
    /// DENY. Causes go to the logs only.
    pub async fn authorize(&self, request: &AuthRequest) -> PolicyDecision {
        let Some(token) = request.bearer_token.as_deref() else {
            tracing::info!(
                method_arn = %request.method_arn,
                "Missing or malformed bearer credential"
            );
            return PolicyDecision::deny();
        };

        let verifier = match request.auth_source {
            AuthSource::Google => &self.google,
            AuthSource::Cognito => &self.cognito,
        };

        match verifier.verify(token).await {
            Ok(identity) => {
                tracing::info!(
                    method_arn = %request.method_arn,
                    auth_source = ?request.auth_source,
                    user_id = %identity.principal_id,
                    "Authorization granted"
                );

                let mut decision =
                    PolicyDecision::allow(&identity.principal_id, &request.method_arn);
                if let Some(email) = identity.claims.get("email").and_then(|v| v.as_str()) {
                    decision
                        .context
                        .insert("email".to_string(), email.to_string());
                }
                decision
            }
            Err(e) => {
                tracing::warn!(
                    method_arn = %request.method_arn,
                    auth_source = ?request.auth_source,
                    error = %e,
                    "Authorization denied"
                );
                PolicyDecision::deny()
            }
        }
    }
}
