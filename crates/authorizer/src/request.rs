//! Inbound authorizer request types

use std::collections::HashMap;

use serde::Deserialize;

/// API Gateway custom-authorizer invocation payload.
///
/// REQUEST-type authorizers deliver the full header map; TOKEN-type
/// authorizers deliver `authorizationToken` only. Both shapes are
/// accepted, headers taking precedence.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerEvent {
    #[serde(rename = "type", default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub authorization_token: Option<String>,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    pub method_arn: String,
}

/// Which identity provider issued the bearer token.
///
/// Unrecognized or absent hints fall back to `Cognito`. That default
/// is part of the contract, not incidental fallthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    Cognito,
    Google,
}

impl AuthSource {
    /// Map the `X-Auth-Source` header value (case-insensitive)
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("google") => AuthSource::Google,
            _ => AuthSource::Cognito,
        }
    }
}

/// Immutable per-invocation view of the inbound request
#[derive(Debug, Clone)]
pub struct AuthRequest {
    /// Token extracted from a well-formed `Bearer <token>` header,
    /// `None` when the credential is missing or malformed
    pub bearer_token: Option<String>,
    pub auth_source: AuthSource,
    pub method_arn: String,
}

impl AuthRequest {
    /// Build the request view from the raw event headers
    pub fn from_event(event: &AuthorizerEvent) -> Self {
        let raw_authorization =
            header_value(event, "authorization").or(event.authorization_token.as_deref());

        Self {
            bearer_token: raw_authorization
                .and_then(extract_bearer_token)
                .map(str::to_string),
            auth_source: AuthSource::from_header(header_value(event, "x-auth-source")),
            method_arn: event.method_arn.clone(),
        }
    }
}

fn header_value<'a>(event: &'a AuthorizerEvent, name: &str) -> Option<&'a str> {
    event
        .headers
        .as_ref()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

/// Extract the token from a `Bearer <token>` header value. Any other
/// scheme counts as a missing credential.
fn extract_bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
