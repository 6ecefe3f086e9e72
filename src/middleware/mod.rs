/*
 * Responsibility
 * - middleware の公開インターフェース
 * - bearer_auth: Authorization ヘッダの解析, cors / http: Router 全体に掛ける layer
 */
pub mod bearer_auth;
pub mod cors;
pub mod http;
