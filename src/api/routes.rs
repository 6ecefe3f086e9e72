/*
 * Responsibility
 * - URL 構造を定義 (/health, /drinks, /drinks-detail, /drinks/{id})
 * - 認可は route ではなく handler 引数の Authorized<P> で宣言する
 * - 未定義の path (404) / 未対応の method (405) も共通の JSON エラーで返す
 */
use axum::{
    Router,
    http::StatusCode,
    routing::{get, patch},
};

use crate::{
    error::{AppError, ErrorResponse},
    state::AppState,
};

use crate::api::handlers::{
    drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
    health::health,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/drinks", get(list_drinks).post(create_drink))
        .route("/drinks-detail", get(list_drinks_detail))
        .route("/drinks/{id}", patch(update_drink).delete(delete_drink))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
}

async fn not_found() -> AppError {
    AppError::NotFound
}

async fn method_not_allowed() -> ErrorResponse {
    ErrorResponse::new(StatusCode::METHOD_NOT_ALLOWED, "method not allowed")
}
