use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::{Meal, MealChanges, MealMark, NewMeal};

#[async_trait]
pub trait MealStore: Send + Sync {
    async fn insert(&self, meal: NewMeal) -> anyhow::Result<Meal>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Meal>>;
    /// Owner's meals, oldest first.
    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>>;
    /// Owner's `(eaten_at, in_diet)` pairs, oldest first.
    async fn timeline(&self, user_id: Uuid) -> anyhow::Result<Vec<MealMark>>;
    async fn update(&self, id: Uuid, changes: MealChanges) -> anyhow::Result<()>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
    async fn count(&self, user_id: Uuid, in_diet: Option<bool>) -> anyhow::Result<i64>;
}

#[derive(Clone)]
pub struct PgMealStore {
    db: PgPool,
}

impl PgMealStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MealStore for PgMealStore {
    async fn insert(&self, meal: NewMeal) -> anyhow::Result<Meal> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            INSERT INTO meals (id, user_id, name, description, eaten_at, in_diet)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, name, description, eaten_at, in_diet, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(meal.user_id)
        .bind(&meal.name)
        .bind(&meal.description)
        .bind(meal.eaten_at)
        .bind(meal.in_diet)
        .fetch_one(&self.db)
        .await
        .context("insert meal")?;
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        let row = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, eaten_at, in_diet, created_at, updated_at
            FROM meals
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find meal by id")?;
        Ok(row)
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        let rows = sqlx::query_as::<_, Meal>(
            r#"
            SELECT id, user_id, name, description, eaten_at, in_diet, created_at, updated_at
            FROM meals
            WHERE user_id = $1
            ORDER BY eaten_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("list meals by owner")?;
        Ok(rows)
    }

    async fn timeline(&self, user_id: Uuid) -> anyhow::Result<Vec<MealMark>> {
        let rows = sqlx::query_as::<_, MealMark>(
            r#"
            SELECT eaten_at, in_diet
            FROM meals
            WHERE user_id = $1
            ORDER BY eaten_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await
        .context("load meal timeline")?;
        Ok(rows)
    }

    async fn update(&self, id: Uuid, changes: MealChanges) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE meals
               SET name        = COALESCE($2, name),
                   description = COALESCE($3, description),
                   eaten_at    = COALESCE($4, eaten_at),
                   in_diet     = COALESCE($5, in_diet),
                   updated_at  = now()
             WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.description)
        .bind(changes.eaten_at)
        .bind(changes.in_diet)
        .execute(&self.db)
        .await
        .context("update meal")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = sqlx::query(r#"DELETE FROM meals WHERE id = $1"#)
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete meal")?;
        Ok(res.rows_affected() > 0)
    }

    async fn count(&self, user_id: Uuid, in_diet: Option<bool>) -> anyhow::Result<i64> {
        let (n,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM meals
            WHERE user_id = $1
              AND ($2::boolean IS NULL OR in_diet = $2)
            "#,
        )
        .bind(user_id)
        .bind(in_diet)
        .fetch_one(&self.db)
        .await
        .context("count meals")?;
        Ok(n)
    }
}
