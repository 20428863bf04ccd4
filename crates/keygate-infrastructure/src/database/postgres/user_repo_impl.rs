// ============================================================================
// Keygate Infrastructure - PostgreSQL User Repository
// File: crates/keygate-infrastructure/src/database/postgres/user_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};
use uuid::Uuid;

use keygate_core::domain::User;
use keygate_core::error::DomainError;
use keygate_core::repositories::UserRepository;
use keygate_shared::utils::mask_email;

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, \
                            is_active, created_at, modified_at, removed_at";

pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
    pub removed_at: Option<DateTime<Utc>>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            created_at: row.created_at,
            modified_at: row.modified_at,
            removed_at: row.removed_at,
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1) AND removed_at IS NULL",
            USER_COLUMNS
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error finding user by email: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|r| r.into()))
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>, DomainError> {
        let sql = format!(
            "SELECT {} FROM users WHERE id = $1 AND removed_at IS NULL",
            USER_COLUMNS
        );

        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                error!("Database error finding user by id: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.map(|r| r.into()))
    }

    async fn create(&self, user: &User) -> Result<User, DomainError> {
        info!("Creating user with email: {}", mask_email(&user.email));

        let sql = format!(
            r#"
            INSERT INTO users (
                id, email, password_hash, first_name, last_name,
                is_active, created_at, modified_at, removed_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            USER_COLUMNS
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.is_active)
            .bind(user.created_at)
            .bind(user.modified_at)
            .bind(user.removed_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e: sqlx::Error| {
                if is_unique_violation(&e) {
                    return DomainError::EmailAlreadyExists(user.email.clone());
                }
                error!("Database error creating user: {}", e);
                DomainError::DatabaseError(e.to_string())
            })?;

        Ok(row.into())
    }
}
