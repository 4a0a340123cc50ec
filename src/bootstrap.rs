use anyhow::Context;

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};

use secrecy::{ExposeSecret, Secret};

use sqlx::PgPool;

use uuid::Uuid;

use crate::domain::EmailAddress;
use crate::model::NewTheme;
use crate::repo::{NewUser, ThemeRepo, UsersRepo};
use crate::settings::AdminSettings;
use crate::telemetry::spawn_blocking_with_tracing;

pub const DEFAULT_THEME_NAME: &str = "Blog Admin Theme";
const DEFAULT_THEME_TITLE: &str = "Blog Admin";

/// Create the configured administrator, or reset their password to the configured one
#[tracing::instrument(name = "Ensure administrator", skip(pool, admin))]
pub async fn ensure_admin(pool: &PgPool, admin: &AdminSettings) -> anyhow::Result<Uuid> {
    let email: EmailAddress = admin.email()?;
    let password = admin.password().clone();

    let password_hash = spawn_blocking_with_tracing(move || hash_password(&password))
        .await
        .context("Failed to spawn blocking task")??;

    let id = UsersRepo::upsert(
        pool,
        &NewUser {
            email: email.clone(),
            password_hash,
        },
    )
    .await
    .context("Failed to store administrator")?;

    tracing::info!("Administrator {} is ready", email);
    Ok(id)
}

fn hash_password(password: &Secret<String>) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let hash = Argon2::default()
        .hash_password(password.expose_secret().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

/// Create the default active theme when no theme is stored.
/// Returns the new theme's ID, `None` when themes already exist
#[tracing::instrument(name = "Ensure default theme", skip(pool))]
pub async fn ensure_default_theme(pool: &PgPool) -> anyhow::Result<Option<i64>> {
    let mut tx = pool.begin().await?;

    if ThemeRepo::count(&mut *tx).await? > 0 {
        return Ok(None);
    }

    let id = ThemeRepo::insert(
        &mut tx,
        &NewTheme {
            name: DEFAULT_THEME_NAME.into(),
            title: DEFAULT_THEME_TITLE.into(),
            active: true,
        },
    )
    .await
    .context("Failed to create default theme")?;
    tx.commit().await?;

    tracing::info!("Created default theme {:?}", DEFAULT_THEME_NAME);
    Ok(Some(id))
}
