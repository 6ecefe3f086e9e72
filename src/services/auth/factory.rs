/// Factory: build `AuthGate` from application `Config`.
use std::sync::Arc;

use crate::config::AuthConfig;
use crate::services::auth::{AuthGate, HttpKeySetFetcher, TokenVerifier};

pub fn build_auth_gate(config: &AuthConfig) -> anyhow::Result<Arc<AuthGate>> {
    let fetcher = HttpKeySetFetcher::new(config.jwks_url(), config.jwks_timeout)?;
    tracing::info!(jwks_url = %fetcher.url(), issuer = %config.issuer(), "auth gate configured");

    let verifier = TokenVerifier::new(Arc::new(fetcher), &config.issuer(), &config.audience);

    Ok(Arc::new(AuthGate::new(verifier)))
}
