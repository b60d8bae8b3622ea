//! End-to-end authorizer flows: raw gateway event in, policy JSON out

mod common;

use std::sync::Arc;

use keenmind_authorizer::{
    AuthRequest, AuthorizerEvent, PolicyDecision, TokenAuthorizer, DENIED_PRINCIPAL,
};
use keenmind_identity::{MockVerifier, TokenVerifier};

use common::METHOD_ARN;

fn wire(google: &Arc<MockVerifier>, cognito: &Arc<MockVerifier>) -> TokenAuthorizer {
    TokenAuthorizer::new(
        Arc::clone(google) as Arc<dyn TokenVerifier>,
        Arc::clone(cognito) as Arc<dyn TokenVerifier>,
    )
}

fn event_json(authorization: Option<&str>, auth_source: Option<&str>) -> serde_json::Value {
    let mut headers = serde_json::Map::new();
    if let Some(authorization) = authorization {
        headers.insert("Authorization".to_string(), authorization.into());
    }
    if let Some(auth_source) = auth_source {
        headers.insert("X-Auth-Source".to_string(), auth_source.into());
    }

    serde_json::json!({
        "type": "REQUEST",
        "methodArn": METHOD_ARN,
        "headers": headers
    })
}

async fn run_event(
    authorizer: &TokenAuthorizer,
    event_json: serde_json::Value,
) -> PolicyDecision {
    let event: AuthorizerEvent = serde_json::from_value(event_json).unwrap();
    authorizer.authorize(&AuthRequest::from_event(&event)).await
}

#[tokio::test]
async fn test_cognito_flow_allows_and_emits_policy() {
    let google = Arc::new(MockVerifier::new());
    let cognito = Arc::new(MockVerifier::new().with_valid_token("valid-access-token", "user-42"));
    let authorizer = wire(&google, &cognito);

    let decision = run_event(
        &authorizer,
        event_json(Some("Bearer valid-access-token"), None),
    )
    .await;

    assert!(decision.is_allow());
    assert_eq!(decision.principal_id, "user-42");

    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["principalId"], "user-42");
    assert_eq!(json["policyDocument"]["Version"], "2012-10-17");
    assert_eq!(
        json["policyDocument"]["Statement"][0]["Action"],
        "execute-api:Invoke"
    );
    assert_eq!(json["policyDocument"]["Statement"][0]["Effect"], "Allow");
    assert_eq!(json["policyDocument"]["Statement"][0]["Resource"], METHOD_ARN);
    assert_eq!(json["context"]["userId"], "user-42");
}

#[tokio::test]
async fn test_missing_header_denies_without_policy_document() {
    let google = Arc::new(MockVerifier::new());
    let cognito = Arc::new(MockVerifier::new());
    let authorizer = wire(&google, &cognito);

    let decision = run_event(&authorizer, event_json(None, None)).await;

    assert_eq!(decision.principal_id, DENIED_PRINCIPAL);
    let json = serde_json::to_value(&decision).unwrap();
    assert!(json.get("policyDocument").is_none());
}

#[tokio::test]
async fn test_wrong_scheme_denies_without_any_lookup() {
    let google = Arc::new(MockVerifier::new());
    let cognito = Arc::new(MockVerifier::new());
    let authorizer = wire(&google, &cognito);

    let decision = run_event(&authorizer, event_json(Some("Token abc"), None)).await;

    assert_eq!(decision.principal_id, DENIED_PRINCIPAL);
    assert_eq!(google.calls(), 0);
    assert_eq!(cognito.calls(), 0);
}

#[tokio::test]
async fn test_google_header_routes_to_google_verifier() {
    let google = Arc::new(MockVerifier::new().with_valid_token("g-token", "g-111"));
    let cognito = Arc::new(MockVerifier::new());
    let authorizer = wire(&google, &cognito);

    let decision = run_event(
        &authorizer,
        event_json(Some("Bearer g-token"), Some("Google")),
    )
    .await;

    assert!(decision.is_allow());
    assert_eq!(decision.principal_id, "g-111");
    assert_eq!(google.calls(), 1);
    assert_eq!(cognito.calls(), 0);
}

#[tokio::test]
async fn test_unrecognized_source_routes_to_cognito() {
    let google = Arc::new(MockVerifier::new());
    let cognito = Arc::new(MockVerifier::new().with_valid_token("tok", "user-42"));
    let authorizer = wire(&google, &cognito);

    let decision = run_event(
        &authorizer,
        event_json(Some("Bearer tok"), Some("facebook")),
    )
    .await;

    assert!(decision.is_allow());
    assert_eq!(cognito.calls(), 1);
    assert_eq!(google.calls(), 0);
}

#[tokio::test]
async fn test_revoked_cognito_token_denies_generically() {
    let google = Arc::new(MockVerifier::new());
    let cognito = Arc::new(MockVerifier::new());
    let authorizer = wire(&google, &cognito);

    let decision = run_event(
        &authorizer,
        event_json(Some("Bearer revoked-token"), None),
    )
    .await;

    assert_eq!(decision.principal_id, DENIED_PRINCIPAL);
    assert!(!decision.is_allow());
    // The deny response carries nothing that identifies the cause
    let json = serde_json::to_value(&decision).unwrap();
    assert_eq!(json["context"].as_object().unwrap().len(), 1);
    assert!(json["context"]["authorizedAt"].is_string());
}

#[tokio::test]
async fn test_token_type_event_still_authorizes() {
    let google = Arc::new(MockVerifier::new());
    let cognito = Arc::new(MockVerifier::new().with_valid_token("tok", "user-42"));
    let authorizer = wire(&google, &cognito);

    let decision = run_event(
        &authorizer,
        serde_json::json!({
            "type": "TOKEN",
            "methodArn": METHOD_ARN,
            "authorizationToken": "Bearer tok"
        }),
    )
    .await;

    assert!(decision.is_allow());
    assert_eq!(decision.principal_id, "user-42");
}
