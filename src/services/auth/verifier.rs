use std::sync::Arc;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};

use crate::services::auth::{AuthError, AuthPayload, KeySetFetcher};

/// RS256 access-token verifier backed by the provider's JWKS.
///
/// - Key material comes from `KeySetFetcher` on every call (no cache).
/// - `jsonwebtoken::Validation` checks signature, `exp`, `iss` and `aud`.
pub struct TokenVerifier {
    keys: Arc<dyn KeySetFetcher>,
    validation: Validation,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn KeySetFetcher>, issuer: &str, audience: &str) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);

        Self { keys, validation }
    }

    /// Verify `token` and return its claims.
    ///
    /// Steps run in a fixed order and the first failure wins:
    /// fetch keys -> read `kid` -> match key -> verify signature and claims.
    pub async fn verify(&self, token: &str) -> Result<AuthPayload, AuthError> {
        let jwks = self.keys.fetch().await?;

        let header = jsonwebtoken::decode_header(token)
            .map_err(|e| AuthError::UnparsableToken(Some(e)))?;
        let kid = header.kid.as_deref().ok_or(AuthError::MissingKeyId)?;

        let jwk = jwks.find(kid).ok_or_else(|| {
            tracing::debug!(kid, "no published key matches token kid");
            AuthError::UnknownKey
        })?;
        let key = DecodingKey::from_jwk(jwk).map_err(|e| AuthError::UnparsableToken(Some(e)))?;

        let data = jsonwebtoken::decode::<AuthPayload>(token, &key, &self.validation)
            .map_err(classify)?;

        Ok(data.claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::TokenExpired,
        ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer | ErrorKind::MissingRequiredClaim(_) => {
            AuthError::InvalidClaims
        }
        _ => AuthError::UnparsableToken(Some(err)),
    }
}
