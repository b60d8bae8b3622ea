//! Keenmind token authorizer - AWS Lambda runtime

use std::sync::Arc;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::info;

use keenmind_authorizer::{AuthRequest, AuthorizerEvent, PolicyDecision, TokenAuthorizer};
use keenmind_common::Config;
use keenmind_identity::{CognitoVerifier, GoogleVerifier, JwksClient, TokenVerifier};

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .json()
        .without_time()
        .init();

    info!("Initializing Keenmind token authorizer Lambda");

    let config = Config::from_env().map_err(|e| Error::from(format!("Config error: {}", e)))?;
    let timeout = config.upstream_timeout();

    let jwks = JwksClient::new(&config.google_jwks_url, timeout)
        .map_err(|e| Error::from(format!("JWKS client error: {}", e)))?;
    let google: Arc<dyn TokenVerifier> =
        Arc::new(GoogleVerifier::new(jwks, config.google_audience.clone()));
    let cognito: Arc<dyn TokenVerifier> = Arc::new(
        CognitoVerifier::new(
            config.aws_region.clone(),
            config.aws_endpoint_url.clone(),
            timeout,
        )
        .await,
    );

    let authorizer = Arc::new(TokenAuthorizer::new(google, cognito));

    info!("Keenmind token authorizer ready");

    run(service_fn(move |event: LambdaEvent<AuthorizerEvent>| {
        let authorizer = Arc::clone(&authorizer);
        async move {
            let request = AuthRequest::from_event(&event.payload);
            Ok::<PolicyDecision, Error>(authorizer.authorize(&request).await)
        }
    }))
    .await
}
