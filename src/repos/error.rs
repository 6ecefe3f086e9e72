/**
 * Responsibility
 * - repo が上位に伝える意味の定義
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("db error")]
    Db(#[from] sqlx::Error),
    #[error("stored recipe is not valid json")]
    Recipe(#[from] serde_json::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;
