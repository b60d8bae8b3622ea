//! Google-issued token verification
//!
//! Tokens are verified locally: the `kid` from the (unverified) token
//! header selects a public key from the cached JWKS, then the
//! signature and expiry are checked. RS256 is the only accepted
//! algorithm; anything else is rejected before key resolution.

use std::collections::HashMap;

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use serde::{Deserialize, Serialize};

use crate::jwks::JwksClient;
use crate::{TokenVerifier, VerifiedIdentity, VerifyError};

/// Claims carried by a Google identity token
#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleClaims {
    /// Subject (stable Google account ID)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Expires at
    pub exp: u64,
    /// Issued at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    /// Audience
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
    /// Issuer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Verifies Google-signed bearer tokens against the public JWKS
pub struct GoogleVerifier {
    jwks: JwksClient,
    audience: Option<String>,
}

impl GoogleVerifier {
    /// Create a verifier. `audience` is enforced only when set.
    pub fn new(jwks: JwksClient, audience: Option<String>) -> Self {
        Self { jwks, audience }
    }
}

#[async_trait::async_trait]
impl TokenVerifier for GoogleVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        // Unverified header inspection: only the kid is needed to
        // select a signing key. Signature checks happen below.
        let header =
            decode_header(token).map_err(|e| VerifyError::MalformedToken(e.to_string()))?;

        if header.alg != Algorithm::RS256 {
            return Err(VerifyError::UntrustedSignature(format!(
                "algorithm {:?} is not accepted",
                header.alg
            )));
        }

        let kid = header
            .kid
            .ok_or_else(|| VerifyError::MalformedToken("token header has no kid".to_string()))?;

        let key = self.jwks.resolve(&kid).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        if let Some(aud) = &self.audience {
            validation.set_audience(&[aud]);
        } else {
            validation.validate_aud = false;
        }

        let token_data = decode::<GoogleClaims>(token, &key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature | ErrorKind::ImmatureSignature => {
                    VerifyError::ExpiredOrNotYetValid
                }
                ErrorKind::InvalidSignature => VerifyError::UntrustedSignature(e.to_string()),
                _ => VerifyError::MalformedToken(e.to_string()),
            }
        })?;

        let claims = token_data.claims;
        let principal_id = claims
            .sub
            .clone()
            .or_else(|| claims.email.clone())
            .ok_or(VerifyError::UnknownUser)?;

        tracing::debug!(kid = %kid, user_id = %principal_id, "Google token verified");

        Ok(VerifiedIdentity {
            principal_id,
            claims: claims_map(&claims),
        })
    }
}

fn claims_map(claims: &GoogleClaims) -> HashMap<String, serde_json::Value> {
    match serde_json::to_value(claims) {
        Ok(serde_json::Value::Object(map)) => map.into_iter().collect(),
        _ => HashMap::new(),
    }
}
