//! In-memory stores backing `AppState::fake()`, plus stores that fail on purpose.

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::meals::repo::MealStore;
use crate::meals::repo_types::{Meal, MealChanges, MealMark, NewMeal};
use crate::users::repo::{CreateUserError, UserStore};
use crate::users::repo_types::{NewUser, User};

#[derive(Default)]
pub struct MemoryUserStore {
    rows: RwLock<Vec<User>>,
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<User, CreateUserError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|u| u.email == user.email) {
            return Err(CreateUserError::EmailTaken);
        }
        let row = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            session_id: user.session_id,
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_session(&self, token: &str) -> anyhow::Result<Option<User>> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|u| u.session_id == token).cloned())
    }

    async fn rotate_session(&self, user_id: Uuid, token: &str) -> anyhow::Result<()> {
        let mut rows = self.rows.write().await;
        if let Some(u) = rows.iter_mut().find(|u| u.id == user_id) {
            u.session_id = token.to_string();
        }
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.rows.read().await.clone())
    }
}

#[derive(Default)]
pub struct MemoryMealStore {
    rows: RwLock<Vec<Meal>>,
}

impl MemoryMealStore {
    async fn owned_sorted(&self, user_id: Uuid) -> Vec<Meal> {
        let mut meals: Vec<Meal> = self
            .rows
            .read()
            .await
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        meals.sort_by_key(|m| m.eaten_at);
        meals
    }
}

#[async_trait]
impl MealStore for MemoryMealStore {
    async fn insert(&self, meal: NewMeal) -> anyhow::Result<Meal> {
        let row = Meal {
            id: Uuid::new_v4(),
            user_id: meal.user_id,
            name: meal.name,
            description: meal.description,
            eaten_at: meal.eaten_at,
            in_diet: meal.in_diet,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.rows.write().await.push(row.clone());
        Ok(row)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        Ok(self.rows.read().await.iter().find(|m| m.id == id).cloned())
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        Ok(self.owned_sorted(user_id).await)
    }

    async fn timeline(&self, user_id: Uuid) -> anyhow::Result<Vec<MealMark>> {
        Ok(self
            .owned_sorted(user_id)
            .await
            .into_iter()
            .map(|m| MealMark {
                eaten_at: m.eaten_at,
                in_diet: m.in_diet,
            })
            .collect())
    }

    async fn update(&self, id: Uuid, changes: MealChanges) -> anyhow::Result<()> {
        let mut rows = self.rows.write().await;
        if let Some(m) = rows.iter_mut().find(|m| m.id == id) {
            if let Some(name) = changes.name {
                m.name = name;
            }
            if let Some(description) = changes.description {
                m.description = description;
            }
            if let Some(eaten_at) = changes.eaten_at {
                m.eaten_at = eaten_at;
            }
            if let Some(in_diet) = changes.in_diet {
                m.in_diet = in_diet;
            }
            m.updated_at = Some(OffsetDateTime::now_utc());
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|m| m.id != id);
        Ok(rows.len() < before)
    }

    async fn count(&self, user_id: Uuid, in_diet: Option<bool>) -> anyhow::Result<i64> {
        let rows = self.rows.read().await;
        let n = rows
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter(|m| in_diet.map_or(true, |flag| m.in_diet == flag))
            .count();
        Ok(n as i64)
    }
}

/// Misses on lookup but loses the insert race, as a concurrent registration would.
#[derive(Default)]
pub struct RacedUserStore {
    inner: MemoryUserStore,
}

#[async_trait]
impl UserStore for RacedUserStore {
    async fn create(&self, _user: NewUser) -> Result<User, CreateUserError> {
        Err(CreateUserError::EmailTaken)
    }

    async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
        Ok(None)
    }

    async fn find_by_session(&self, token: &str) -> anyhow::Result<Option<User>> {
        self.inner.find_by_session(token).await
    }

    async fn rotate_session(&self, user_id: Uuid, token: &str) -> anyhow::Result<()> {
        self.inner.rotate_session(user_id, token).await
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        self.inner.list().await
    }
}

/// Behaves like `MemoryMealStore` except that every delete fails.
#[derive(Default)]
pub struct BrokenDeleteMealStore {
    inner: MemoryMealStore,
}

#[async_trait]
impl MealStore for BrokenDeleteMealStore {
    async fn insert(&self, meal: NewMeal) -> anyhow::Result<Meal> {
        self.inner.insert(meal).await
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Meal>> {
        self.inner.find_by_id(id).await
    }

    async fn list_by_owner(&self, user_id: Uuid) -> anyhow::Result<Vec<Meal>> {
        self.inner.list_by_owner(user_id).await
    }

    async fn timeline(&self, user_id: Uuid) -> anyhow::Result<Vec<MealMark>> {
        self.inner.timeline(user_id).await
    }

    async fn update(&self, id: Uuid, changes: MealChanges) -> anyhow::Result<()> {
        self.inner.update(id, changes).await
    }

    async fn delete(&self, _id: Uuid) -> anyhow::Result<bool> {
        anyhow::bail!("connection reset by peer")
    }

    async fn count(&self, user_id: Uuid, in_diet: Option<bool>) -> anyhow::Result<i64> {
        self.inner.count(user_id, in_diet).await
    }
}
