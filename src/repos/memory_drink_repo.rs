/*
 * Responsibility
 * - DATABASE_URL 未設定時 (ローカル開発・テスト) に使う in-memory の DrinkRepo
 * - プロセス終了で内容は消える
 */
use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::repos::{
    drink_repo::{Drink, DrinkRepo, NewDrink},
    error::RepoResult,
};

#[derive(Debug, Default)]
pub struct MemoryDrinkRepo {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    last_id: i64,
    drinks: BTreeMap<i64, Drink>,
}

impl MemoryDrinkRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DrinkRepo for MemoryDrinkRepo {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn list(&self) -> RepoResult<Vec<Drink>> {
        Ok(self.inner.read().await.drinks.values().cloned().collect())
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Drink>> {
        Ok(self.inner.read().await.drinks.get(&id).cloned())
    }

    async fn insert(&self, drink: NewDrink) -> RepoResult<Drink> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;

        let drink = Drink {
            id: inner.last_id,
            title: drink.title,
            recipe: drink.recipe,
        };
        inner.drinks.insert(drink.id, drink.clone());

        Ok(drink)
    }

    async fn update(&self, drink: &Drink) -> RepoResult<Option<Drink>> {
        let mut inner = self.inner.write().await;

        Ok(inner.drinks.get_mut(&drink.id).map(|stored| {
            *stored = drink.clone();
            stored.clone()
        }))
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        Ok(self.inner.write().await.drinks.remove(&id).is_some())
    }

    async fn reset(&self) -> RepoResult<()> {
        *self.inner.write().await = Inner::default();
        Ok(())
    }
}
