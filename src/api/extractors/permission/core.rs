/*
 * 主な責務
 *  - Handler が必要とする権限を型で宣言させる extractor (Authorized<P>)
 *  - AuthGate (bearer 抽出 → JWT 検証 → 権限チェック) を handler 本体の前に実行する
 *  - 失敗時は AuthError をそのまま AppError として返す (短絡)
 * 置かないもの
 *  - 具体的な権限名 (types.rs 側)
 *  - 検証ロジック本体 (services::auth 側)
 */
use std::marker::PhantomData;

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::AppError;
use crate::services::auth::AuthPayload;
use crate::state::AppState;

use super::types::Permission;

/// Verified caller holding permission `P`.
pub struct Authorized<P> {
    pub payload: AuthPayload,
    _marker: PhantomData<P>,
}

impl<P> FromRequestParts<AppState> for Authorized<P>
where
    P: Permission,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let payload = state.auth.authorize(&parts.headers, P::NAME).await?;

        Ok(Self {
            payload,
            _marker: PhantomData,
        })
    }
}

impl<P: Permission> std::fmt::Debug for Authorized<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorized")
            .field("permission", &P::NAME)
            .field("sub", &self.payload.sub)
            .finish()
    }
}
