/*
 * Responsibility
 * - Authorization ヘッダから Bearer トークンを取り出す (ヘッダ抽出 → 形式チェック → 拒否)
 * - 署名検証・権限チェックは services::auth 側の責務
 */
use axum::http::{HeaderMap, header};

use crate::services::auth::AuthError;

/// Return the token part of `Authorization: Bearer <token>`.
///
/// The header is split on whitespace and must yield exactly two parts, the
/// first of which is `bearer` in any case.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::HeaderMissing)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Authorization header must be bearer token."))?;

    let mut parts = raw.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) => {
            if !scheme.eq_ignore_ascii_case("bearer") {
                return Err(AuthError::MalformedHeader(
                    "Authorization header must start with \"Bearer\".",
                ));
            }
            Ok(token)
        }
        _ => Err(AuthError::MalformedHeader(
            "Authorization header must be bearer token.",
        )),
    }
}
