//! Admin bootstrap service for initial setup.
//!
//! Creates the first admin user on startup if configured. Idempotent:
//! if the configured username already exists, nothing happens.

use shared::password::{hash_password, PasswordError};
use sqlx::PgPool;
use tracing::{info, warn};

use persistence::repositories::AdminUserRepository;

use crate::config::AdminBootstrapConfig;

/// Error types for admin bootstrap.
#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordError),
}

/// Bootstrap the first admin user if configured and not already present.
///
/// Called after migrations on startup.
pub async fn bootstrap_admin(
    pool: &PgPool,
    config: &AdminBootstrapConfig,
) -> Result<(), BootstrapError> {
    if config.bootstrap_username.is_empty() {
        return Ok(());
    }

    if config.bootstrap_password.is_empty() {
        warn!(
            "REG__ADMIN__BOOTSTRAP_USERNAME is set but REG__ADMIN__BOOTSTRAP_PASSWORD is empty - skipping bootstrap"
        );
        return Ok(());
    }

    let repo = AdminUserRepository::new(pool.clone());

    if repo
        .find_by_username(&config.bootstrap_username)
        .await?
        .is_some()
    {
        info!("Bootstrap admin already exists - skipping bootstrap");
        return Ok(());
    }

    let password_hash = hash_password(&config.bootstrap_password)?;
    let admin = repo.create(&config.bootstrap_username, &password_hash).await?;

    info!(
        username = %admin.username,
        admin_id = %admin.id,
        "Bootstrap admin user created successfully"
    );

    warn!(
        "SECURITY: Remove REG__ADMIN__BOOTSTRAP_USERNAME and REG__ADMIN__BOOTSTRAP_PASSWORD \
         from configuration after initial setup."
    );

    Ok(())
}
