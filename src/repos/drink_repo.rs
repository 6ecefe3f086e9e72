/*
 * Responsibility
 * - drinks の永続化インターフェース (DrinkRepo trait)
 * - Drink / Ingredient モデル
 * - handler は AppState 経由でこの trait だけを参照する (Postgres / in-memory を差し替え可能)
 */
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::repos::error::RepoResult;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Drink {
    pub id: i64,
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewDrink {
    pub title: String,
    pub recipe: Vec<Ingredient>,
}

/// Drink persistence.
///
/// Every call is atomic on its own; there are no multi-call transactions.
#[async_trait]
pub trait DrinkRepo: Send + Sync + 'static {
    // Backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // All drinks ordered by id.
    async fn list(&self) -> RepoResult<Vec<Drink>>;

    async fn get(&self, id: i64) -> RepoResult<Option<Drink>>;

    // Persist a new drink; the store assigns the id.
    async fn insert(&self, drink: NewDrink) -> RepoResult<Drink>;

    // Overwrite title and recipe of `drink.id`.
    // Returns `None` if the row disappeared since it was read.
    async fn update(&self, drink: &Drink) -> RepoResult<Option<Drink>>;

    // Returns false if nothing was deleted.
    async fn delete(&self, id: i64) -> RepoResult<bool>;

    // Drop every drink and start ids over.
    async fn reset(&self) -> RepoResult<()>;
}

/// Reset the store and seed the sample drink.
pub async fn reset_with_sample(repo: &dyn DrinkRepo) -> RepoResult<Drink> {
    repo.reset().await?;

    repo.insert(NewDrink {
        title: "water".to_string(),
        recipe: vec![Ingredient {
            name: "water".to_string(),
            color: "blue".to_string(),
            parts: 1.0,
        }],
    })
    .await
}
