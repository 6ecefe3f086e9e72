//! Token signing helpers shared by the auth and handler tests.
use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header, jwk::JwkSet};
use serde_json::{Value, json};

use crate::services::auth::{AuthError, AuthGate, KeySetFetcher, TokenVerifier};

pub const TEST_KID: &str = "test-key-1";
pub const TEST_AUDIENCE: &str = "coffeeshop";
pub const TEST_ISSUER: &str = "https://tenant.example.auth0.com/";

const SIGNING_KEY_PEM: &[u8] = include_bytes!("../../../tests/fixtures/token_signing_key.pem");

// Public half of tests/fixtures/token_signing_key.pem
const MODULUS: &str = "nXkUzqpuYFBZpQPB6Vw1161ZXynd2tSKqGEmfH7it7_ycIy45JaX3INljsqxBtZnvwG1Hb7ogCw8tuNgWFwlIbzTtzMtsAbOBKFkXv22MDOYepFKBs_2DEFwl1jUvmVqlJsVrFGd9KOpvrVzDq-TQiRsM6fPNk5MSVIl8oGTSBjLgX37mfOVeBRAZpLDCUo_vlHJ2xUIx7RPXqb4i4j6Ub7dbj3VHcnkwktqT9jyCHMr_3f7GBxov-sYtZSJ6I8is3tM74ZHktN-uih3If_8qwR4DUt1rDkZrgB6EjPAHILP3WC3J_9EPhStCKfXCm7eBYt2KBkf23uMeL15GWyk8Q";

pub fn jwks_json() -> Value {
    json!({
        "keys": [
            {
                "kty": "RSA",
                "use": "sig",
                "alg": "RS256",
                "kid": TEST_KID,
                "n": MODULUS,
                "e": "AQAB"
            }
        ]
    })
}

/// Key set served from memory instead of the provider.
pub struct StaticKeySet(pub JwkSet);

impl StaticKeySet {
    pub fn fixture() -> Self {
        Self(serde_json::from_value(jwks_json()).unwrap())
    }
}

#[async_trait]
impl KeySetFetcher for StaticKeySet {
    async fn fetch(&self) -> Result<JwkSet, AuthError> {
        Ok(self.0.clone())
    }
}

pub fn verifier() -> TokenVerifier {
    TokenVerifier::new(
        Arc::new(StaticKeySet::fixture()),
        TEST_ISSUER,
        TEST_AUDIENCE,
    )
}

pub fn gate() -> AuthGate {
    AuthGate::new(verifier())
}

pub fn now() -> u64 {
    chrono::Utc::now().timestamp() as u64
}

/// Well-formed claims for the test tenant, valid for an hour.
pub fn claims(permissions: &[&str]) -> Value {
    json!({
        "iss": TEST_ISSUER,
        "sub": "auth0|barista",
        "aud": TEST_AUDIENCE,
        "iat": now(),
        "exp": now() + 3600,
        "permissions": permissions,
    })
}

pub fn sign_with_kid(kid: Option<&str>, claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);

    let key = EncodingKey::from_rsa_pem(SIGNING_KEY_PEM).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

pub fn sign(claims: &Value) -> String {
    sign_with_kid(Some(TEST_KID), claims)
}

pub fn bearer(permissions: &[&str]) -> String {
    format!("Bearer {}", sign(&claims(permissions)))
}
