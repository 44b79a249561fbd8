//! Repository for admin user database operations.

use sqlx::PgPool;

use crate::entities::AdminUserEntity;

/// Repository for admin user operations.
#[derive(Clone)]
pub struct AdminUserRepository {
    pool: PgPool,
}

impl AdminUserRepository {
    /// Creates a new admin user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Finds an admin by username (case-insensitive).
    pub async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AdminUserEntity>, sqlx::Error> {
        sqlx::query_as::<_, AdminUserEntity>(
            r#"
            SELECT id, username, password_hash, created_at
            FROM admin_users
            WHERE lower(username) = lower($1)
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
    }

    /// Creates an admin user with an already-hashed password.
    ///
    /// Used by the bootstrap path when the configured default admin does
    /// not exist yet.
    pub async fn create(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<AdminUserEntity, sqlx::Error> {
        sqlx::query_as::<_, AdminUserEntity>(
            r#"
            INSERT INTO admin_users (username, password_hash)
            VALUES ($1, $2)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }
}
