use std::net::TcpListener;

use anyhow::Context;

use sqlx::PgPool;

use quill::settings::Settings;
use quill::{app, bootstrap, publisher, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = telemetry::create_subscriber("info".into(), std::io::stdout);
    telemetry::set_subscriber(subscriber)?;

    let settings = Settings::load().context("Failed to load settings")?;

    let pool = PgPool::connect_with(settings.database.with_db())
        .await
        .context("Failed to connect to the database")?;
    sqlx::migrate!()
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    match &settings.admin {
        Some(admin) => {
            bootstrap::ensure_admin(&pool, admin).await?;
        }
        None => tracing::warn!("No administrator configured, the admin API is unusable"),
    }
    bootstrap::ensure_default_theme(&pool).await?;

    let listener = TcpListener::bind(settings.app.addr())?;
    tracing::info!("Listening on {}", listener.local_addr()?);

    let server = app::run(listener, pool.clone(), settings.media.clone())?;
    let sweeper = publisher::run_until_stopped(pool, settings.publisher.interval());

    tokio::select! {
        result = server => result.context("Failed to run app"),
        result = sweeper => result.context("Publisher stopped"),
    }
}
