//! PostgreSQL user repository implementation.

use crate::{traits::UserRepository, DatabasePoolInterface};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use radiusx_core::{ListParams, NewUser, RadiusxError, RadiusxResult, Role, User, UserId, UserUpdate};
use shaku::Component;
use sqlx::FromRow;
use std::sync::Arc;
use tracing::debug;

const USER_COLUMNS: &str = "id, name, email, password, role, created_at, updated_at";

/// PostgreSQL user repository implementation.
#[derive(Component, Clone)]
#[shaku(interface = UserRepository)]
pub struct PgUserRepository {
    #[shaku(inject)]
    pool: Arc<dyn DatabasePoolInterface>,
}

impl PgUserRepository {
    /// Creates a new PostgreSQL user repository.
    #[must_use]
    pub fn new(pool: Arc<dyn DatabasePoolInterface>) -> Self {
        Self { pool }
    }
}

/// Database row representation of a user.
#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RadiusxError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role: Role = row
            .role
            .parse()
            .map_err(|_| RadiusxError::database(format!("unknown role '{}' in store", row.role)))?;

        Ok(User {
            id: UserId::from_db(row.id)?,
            name: row.name,
            email: row.email,
            password: row.password,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn i64_param(value: u64, name: &str) -> RadiusxResult<i64> {
    i64::try_from(value).map_err(|_| RadiusxError::validation(format!("{name} is out of range")))
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create_user(&self, user: &NewUser) -> RadiusxResult<User> {
        debug!("Creating user with email: {}", user.email);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO users (name, email, password, role)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .bind(user.role.as_str())
        .fetch_one(self.pool.inner())
        .await?;

        User::try_from(row)
    }

    async fn get_user_by_id(&self, id: UserId) -> RadiusxResult<User> {
        debug!("Finding user by id: {}", id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 LIMIT 1"
        ))
        .bind(id.to_db()?)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| RadiusxError::not_found("user", id))
    }

    async fn get_user_by_email(&self, email: &str) -> RadiusxResult<User> {
        debug!("Finding user by email: {}", email);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1 LIMIT 1"
        ))
        .bind(email)
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| RadiusxError::not_found("user", email))
    }

    async fn list_users(&self, params: ListParams) -> RadiusxResult<Vec<User>> {
        debug!(skip = params.skip(), limit = params.limit(), "Listing users");

        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2"
        ))
        .bind(i64_param(params.limit(), "limit")?)
        .bind(i64_param(params.offset(), "offset")?)
        .fetch_all(self.pool.inner())
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn update_user(&self, update: &UserUpdate) -> RadiusxResult<User> {
        debug!("Updating user: {}", update.id);

        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE users SET
                name       = COALESCE(NULLIF($2, ''), name),
                email      = COALESCE(NULLIF($3, ''), email),
                password   = COALESCE(NULLIF($4, ''), password),
                role       = COALESCE($5, role),
                updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(update.id.to_db()?)
        .bind(update.name())
        .bind(update.email())
        .bind(update.password())
        .bind(update.role.map(|role| role.as_str()))
        .fetch_optional(self.pool.inner())
        .await?;

        row.map(User::try_from)
            .transpose()?
            .ok_or_else(|| RadiusxError::not_found("user", update.id))
    }

    async fn delete_user(&self, id: UserId) -> RadiusxResult<()> {
        debug!("Deleting user: {}", id);

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.to_db()?)
            .execute(self.pool.inner())
            .await?;

        if result.rows_affected() == 0 {
            return Err(RadiusxError::not_found("user", id));
        }
        Ok(())
    }
}
