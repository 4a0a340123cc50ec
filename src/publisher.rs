use std::time::Duration;

use chrono::Utc;

use sqlx::PgPool;

use tokio::time::MissedTickBehavior;

use crate::model::PublishedPost;
use crate::repo::PostRepo;

/// Promote every draft whose `published_at` has passed, logging each promoted post
#[tracing::instrument(name = "Publish due posts", skip(pool))]
pub async fn publish_due_posts(pool: &PgPool) -> sqlx::Result<Vec<PublishedPost>> {
    let published = PostRepo::publish_due(pool, Utc::now()).await?;

    for post in &published {
        tracing::info!(post.id = post.id, "Published scheduled post \"{}\"", post.title);
    }
    if !published.is_empty() {
        tracing::info!("Published {} scheduled posts", published.len());
    }

    Ok(published)
}

/// Sweep for due drafts every `interval` until the task is dropped.
/// A failed sweep is logged and retried on the next tick
pub async fn run_until_stopped(pool: PgPool, interval: Duration) -> anyhow::Result<()> {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!("Publisher sweeping every {:?}", interval);
    loop {
        ticker.tick().await;

        if let Err(error) = publish_due_posts(&pool).await {
            tracing::error!(error.cause_chain = ?error, "Failed to publish due posts");
        }
    }
}
