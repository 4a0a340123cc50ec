use sqlx::{PgExecutor, Postgres, QueryBuilder};

use crate::model::{NewSubscriber, Subscriber, SubscriberQuery};
use crate::repo::like_pattern;

/// Repository for interfacing with the subscribers table
pub struct SubscriberRepo;

impl SubscriberRepo {
    #[tracing::instrument(name = "Insert subscriber", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        new_subscriber: &NewSubscriber,
    ) -> sqlx::Result<Subscriber> {
        let name: &str = new_subscriber
            .name
            .as_ref()
            .map(|name| name.as_ref())
            .unwrap_or("");

        sqlx::query_as::<_, Subscriber>(
            "insert into subscribers(email, name) values ($1, $2)
             returning id, email, name, is_active, created_at",
        )
        .bind(new_subscriber.email.as_ref())
        .bind(name)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Count subscribers", skip(executor))]
    pub async fn count<'con>(
        executor: impl PgExecutor<'con>,
        query: &SubscriberQuery,
    ) -> sqlx::Result<i64> {
        let mut builder = QueryBuilder::new("select count(*) from subscribers");
        push_filters(&mut builder, query);

        builder.build_query_scalar().fetch_one(executor).await
    }

    /// Newest subscribers first
    #[tracing::instrument(name = "Fetch page of subscribers", skip(executor))]
    pub async fn fetch_page<'con>(
        executor: impl PgExecutor<'con>,
        query: &SubscriberQuery,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Subscriber>> {
        let mut builder = QueryBuilder::new(
            "select id, email, name, is_active, created_at from subscribers",
        );
        push_filters(&mut builder, query);
        builder.push(" order by created_at desc, id desc");
        builder.push(" limit ").push_bind(limit);
        builder.push(" offset ").push_bind(offset);

        builder.build_query_as().fetch_all(executor).await
    }

    /// Set `is_active` on every listed subscriber, returning how many rows changed
    #[tracing::instrument(name = "Set subscribers active flag", skip(executor))]
    pub async fn set_active<'con>(
        executor: impl PgExecutor<'con>,
        ids: &[i64],
        is_active: bool,
    ) -> sqlx::Result<u64> {
        let updated = sqlx::query("update subscribers set is_active=$2 where id = any($1)")
            .bind(ids)
            .bind(is_active)
            .execute(executor)
            .await?
            .rows_affected();
        Ok(updated)
    }
}

fn push_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &SubscriberQuery) {
    builder.push(" where true");

    if let Some(is_active) = query.is_active {
        builder.push(" and is_active = ").push_bind(is_active);
    }
    if let Some(search) = query.search.as_deref().map(str::trim) {
        if !search.is_empty() {
            builder
                .push(" and email ilike ")
                .push_bind(like_pattern(search));
        }
    }
}
