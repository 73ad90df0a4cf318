use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use super::repo_types::{NewUser, User};

const UNIQUE_VIOLATION: &str = "23505";
const EMAIL_CONSTRAINT: &str = "users_email_key";

/// A unique violation on the email constraint; other clashes are plain failures.
fn is_email_clash(code: Option<&str>, constraint: Option<&str>) -> bool {
    code == Some(UNIQUE_VIOLATION) && constraint == Some(EMAIL_CONSTRAINT)
}

#[derive(Debug, Error)]
pub enum CreateUserError {
    #[error("email already registered")]
    EmailTaken,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, user: NewUser) -> Result<User, CreateUserError>;
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_session(&self, token: &str) -> anyhow::Result<Option<User>>;
    async fn rotate_session(&self, user_id: Uuid, token: &str) -> anyhow::Result<()>;
    async fn list(&self) -> anyhow::Result<Vec<User>>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, CreateUserError> {
        let res = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, session_id, name, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, session_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&user.session_id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.db)
        .await;

        match res {
            Ok(u) => Ok(u),
            Err(sqlx::Error::Database(db_err))
                if is_email_clash(db_err.code().as_deref(), db_err.constraint()) =>
            {
                Err(CreateUserError::EmailTaken)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert user").into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, session_id, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn find_by_session(&self, token: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, session_id, created_at
            FROM users
            WHERE session_id = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.db)
        .await
        .context("find user by session")?;
        Ok(user)
    }

    async fn rotate_session(&self, user_id: Uuid, token: &str) -> anyhow::Result<()> {
        sqlx::query(r#"UPDATE users SET session_id = $2 WHERE id = $1"#)
            .bind(user_id)
            .bind(token)
            .execute(&self.db)
            .await
            .context("rotate session")?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<User>> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, session_id, created_at
            FROM users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list users")?;
        Ok(users)
    }
}
