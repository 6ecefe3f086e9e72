pub mod claims;
pub mod error;
pub mod factory;
pub mod gate;
pub mod jwks;
pub mod permissions;
pub mod verifier;

#[cfg(test)]
pub mod test_support;

pub use claims::{Audience, AuthPayload};
pub use error::AuthError;
pub use factory::build_auth_gate;
pub use gate::AuthGate;
pub use jwks::{HttpKeySetFetcher, KeySetFetcher};
pub use permissions::check_permissions;
pub use verifier::TokenVerifier;
