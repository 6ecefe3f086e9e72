use axum::http::HeaderMap;

use crate::middleware::bearer_auth::bearer_token;
use crate::services::auth::{AuthError, AuthPayload, TokenVerifier, check_permissions};

/// Auth gate: bearer extraction -> token verification -> permission check.
///
/// Handlers do not call this directly; they declare the permission through
/// the `Authorized<P>` extractor which runs `authorize` before the body.
#[derive(Debug)]
pub struct AuthGate {
    verifier: TokenVerifier,
}

impl AuthGate {
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        permission: &str,
    ) -> Result<AuthPayload, AuthError> {
        let token = bearer_token(headers)?;
        let payload = self.verifier.verify(token).await?;
        tracing::debug!(
            sub = %payload.sub,
            iss = %payload.iss,
            aud = ?payload.aud,
            azp = ?payload.azp,
            scope = ?payload.scope,
            iat = ?payload.iat,
            exp = payload.exp,
            "token verified"
        );
        check_permissions(permission, &payload)?;

        Ok(payload)
    }
}
