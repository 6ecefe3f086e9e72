use axum::http::StatusCode;
use thiserror::Error;

/// Failure modes of the auth gate.
///
/// Every variant maps to a fixed machine-readable `code()` and an HTTP status.
/// The `Display` text is the human-readable description sent to the client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is expected.")]
    HeaderMissing,

    #[error("{0}")]
    MalformedHeader(&'static str),

    #[error("Unable to fetch the identity provider key set.")]
    KeySetUnavailable(#[source] reqwest::Error),

    #[error("Unable to parse authentication token.")]
    UnparsableToken(#[source] Option<jsonwebtoken::errors::Error>),

    #[error("Authorization malformed.")]
    MissingKeyId,

    #[error("Unable to find the appropriate key.")]
    UnknownKey,

    #[error("Token expired.")]
    TokenExpired,

    #[error("Incorrect claims. Please, check the audience and issuer.")]
    InvalidClaims,

    #[error("Permissions not included in JWT.")]
    PermissionsMissing,

    #[error("Permission not found.")]
    PermissionDenied,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::HeaderMissing => "authorization_header_missing",
            Self::MalformedHeader(_)
            | Self::UnparsableToken(_)
            | Self::MissingKeyId
            | Self::UnknownKey => "invalid_header",
            Self::KeySetUnavailable(_) => "jwks_unavailable",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            // sic: the provider-facing contract uses a space here
            Self::PermissionsMissing => "invalid header",
            Self::PermissionDenied => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::HeaderMissing
            | Self::MalformedHeader(_)
            | Self::MissingKeyId
            | Self::TokenExpired
            | Self::InvalidClaims
            | Self::PermissionDenied => StatusCode::UNAUTHORIZED,
            Self::UnparsableToken(_) | Self::UnknownKey | Self::PermissionsMissing => {
                StatusCode::BAD_REQUEST
            }
            Self::KeySetUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}
