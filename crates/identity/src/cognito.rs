//! Cognito access-token verification
//!
//! The bearer token is submitted as-is to the identity provider's
//! `GetUser` operation, which validates it server-side. No local
//! signature verification happens on this path: one network
//! round-trip per request buys zero local key management.

use std::collections::HashMap;
use std::time::Duration;

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_cognitoidentityprovider::config::SharedCredentialsProvider;
use aws_sdk_cognitoidentityprovider::error::SdkError;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;

use crate::{TokenVerifier, VerifiedIdentity, VerifyError};

/// Verifies Cognito access tokens through a live user lookup
pub struct CognitoVerifier {
    client: CognitoClient,
    timeout: Duration,
}

impl CognitoVerifier {
    /// Create a verifier against the real AWS endpoint, or a custom
    /// endpoint (LocalStack) when one is configured.
    pub async fn new(region: String, endpoint_url: Option<String>, timeout: Duration) -> Self {
        let aws_config = match endpoint_url {
            Some(endpoint_url) => {
                tracing::info!("Using custom AWS endpoint: {}", endpoint_url);

                // For LocalStack, use dummy credentials
                let credentials = Credentials::new(
                    "test-access-key",
                    "test-secret-key",
                    None,
                    None,
                    "localstack-identity-provider",
                );

                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region))
                    .endpoint_url(endpoint_url)
                    .credentials_provider(SharedCredentialsProvider::new(credentials))
                    .load()
                    .await
            }
            None => {
                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region))
                    .load()
                    .await
            }
        };

        Self {
            client: CognitoClient::new(&aws_config),
            timeout,
        }
    }
}

#[async_trait::async_trait]
impl TokenVerifier for CognitoVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, VerifyError> {
        let lookup = self.client.get_user().access_token(token).send();

        let response = tokio::time::timeout(self.timeout, lookup)
            .await
            .map_err(|_| {
                VerifyError::UpstreamUnavailable("identity provider lookup timed out".to_string())
            })?
            .map_err(|e| match &e {
                SdkError::ServiceError(_) => {
                    tracing::debug!(error = %e, "Identity provider rejected access token");
                    VerifyError::UntrustedSignature(
                        "identity provider rejected the access token".to_string(),
                    )
                }
                _ => VerifyError::UpstreamUnavailable(format!("GetUser failed: {}", e)),
            })?;

        let username = response.username().to_string();
        if username.is_empty() {
            return Err(VerifyError::UnknownUser);
        }

        let mut claims = HashMap::new();
        claims.insert(
            "username".to_string(),
            serde_json::Value::String(username.clone()),
        );
        for attribute in response.user_attributes() {
            claims.insert(
                attribute.name().to_string(),
                serde_json::Value::String(attribute.value().unwrap_or_default().to_string()),
            );
        }

        tracing::debug!(user_id = %username, "Cognito token verified");

        Ok(VerifiedIdentity {
            principal_id: username,
            claims,
        })
    }
}
