//! IAM policy construction for authorizer responses
//!
//! Pure transforms from a verification outcome to the JSON shape API
//! Gateway consumes.

use std::collections::HashMap;

use chrono::Utc;
use serde::Serialize;

pub const POLICY_VERSION: &str = "2012-10-17";
pub const INVOKE_ACTION: &str = "execute-api:Invoke";

/// Principal reported on every denied decision. Deliberately generic:
/// the caller must not learn why authorization failed.
pub const DENIED_PRINCIPAL: &str = "user";

/// Authorizer response consumed by API Gateway.
///
/// The policy document is omitted entirely on DENY; some gateway
/// integrations reject an explicit Deny statement that carries a
/// resource ARN.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDecision {
    pub principal_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_document: Option<PolicyDocument>,
    pub context: HashMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version")]
    pub version: String,
    #[serde(rename = "Statement")]
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Statement {
    #[serde(rename = "Action")]
    pub action: String,
    #[serde(rename = "Effect")]
    pub effect: String,
    #[serde(rename = "Resource")]
    pub resource: String,
}

impl PolicyDecision {
    /// Grant the verified principal access to the requested resource
    pub fn allow(principal_id: &str, resource: &str) -> Self {
        let mut context = HashMap::new();
        context.insert("userId".to_string(), principal_id.to_string());
        context.insert("authorizedAt".to_string(), decision_timestamp());

        Self {
            principal_id: principal_id.to_string(),
            policy_document: Some(PolicyDocument {
                version: POLICY_VERSION.to_string(),
                statement: vec![Statement {
                    action: INVOKE_ACTION.to_string(),
                    effect: "Allow".to_string(),
                    resource: resource.to_string(),
                }],
            }),
            context,
        }
    }

    /// Deny access. Generic principal, no policy document, whatever
    /// the underlying cause.
    pub fn deny() -> Self {
        let mut context = HashMap::new();
        context.insert("authorizedAt".to_string(), decision_timestamp());

        Self {
            principal_id: DENIED_PRINCIPAL.to_string(),
            policy_document: None,
            context,
        }
    }

    pub fn is_allow(&self) -> bool {
        self.policy_document.is_some()
    }
}

/// Wall-clock stamp recorded on every decision for auditing
#[mutants::skip]
fn decision_timestamp() -> String {
    Utc::now().to_rfc3339()
}
