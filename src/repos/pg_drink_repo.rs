/*
 * Responsibility
 * - drinks テーブル向け SQLx 操作 (Postgres)
 * - recipe は JSON 文字列として TEXT カラムに保存する
 */
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::repos::{
    drink_repo::{Drink, DrinkRepo, NewDrink},
    error::RepoResult,
};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS drinks (
        id BIGSERIAL PRIMARY KEY,
        title VARCHAR(80) NOT NULL,
        recipe TEXT NOT NULL
    )
"#;

#[derive(Debug, FromRow)]
struct DrinkRow {
    id: i64,
    title: String,
    recipe: String,
}

impl DrinkRow {
    fn into_drink(self) -> RepoResult<Drink> {
        Ok(Drink {
            id: self.id,
            title: self.title,
            recipe: serde_json::from_str(&self.recipe)?,
        })
    }
}

#[derive(Clone, Debug)]
pub struct PgDrinkRepo {
    pool: PgPool,
}

impl PgDrinkRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> RepoResult<Self> {
        let pool = PgPool::connect(database_url).await?;
        let repo = Self::new(pool);
        repo.ensure_schema().await?;

        Ok(repo)
    }

    pub async fn ensure_schema(&self) -> RepoResult<()> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DrinkRepo for PgDrinkRepo {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn list(&self) -> RepoResult<Vec<Drink>> {
        let rows = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(DrinkRow::into_drink).collect()
    }

    async fn get(&self, id: i64) -> RepoResult<Option<Drink>> {
        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            SELECT id, title, recipe
            FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DrinkRow::into_drink).transpose()
    }

    async fn insert(&self, drink: NewDrink) -> RepoResult<Drink> {
        let recipe = serde_json::to_string(&drink.recipe)?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            INSERT INTO drinks (title, recipe)
            VALUES ($1, $2)
            RETURNING id, title, recipe
            "#,
        )
        .bind(&drink.title)
        .bind(recipe)
        .fetch_one(&self.pool)
        .await?;

        row.into_drink()
    }

    async fn update(&self, drink: &Drink) -> RepoResult<Option<Drink>> {
        let recipe = serde_json::to_string(&drink.recipe)?;

        let row = sqlx::query_as::<_, DrinkRow>(
            r#"
            UPDATE drinks
            SET
                title = $2,
                recipe = $3
            WHERE id = $1
            RETURNING id, title, recipe
            "#,
        )
        .bind(drink.id)
        .bind(&drink.title)
        .bind(recipe)
        .fetch_optional(&self.pool)
        .await?;

        row.map(DrinkRow::into_drink).transpose()
    }

    async fn delete(&self, id: i64) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM drinks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn reset(&self) -> RepoResult<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS drinks")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;

        Ok(())
    }
}
