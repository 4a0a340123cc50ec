use sqlx::PgExecutor;

use crate::model::{Category, CategoryForm};

/// Repository for interfacing with the categories table
pub struct CategoryRepo;

impl CategoryRepo {
    #[tracing::instrument(name = "Insert category", skip(executor))]
    pub async fn insert<'con>(
        executor: impl PgExecutor<'con>,
        form: &CategoryForm,
    ) -> sqlx::Result<i64> {
        sqlx::query_scalar(
            "insert into categories(name, slug, description) values ($1, $2, $3) returning id",
        )
        .bind(&form.name)
        .bind(form.slug.as_ref())
        .bind(&form.description)
        .fetch_one(executor)
        .await
    }

    #[tracing::instrument(name = "Update category", skip(executor))]
    pub async fn update<'con>(
        executor: impl PgExecutor<'con>,
        id: i64,
        form: &CategoryForm,
    ) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "update categories set name=$2, slug=$3, description=$4 where id=$1
             returning id, name, slug, description",
        )
        .bind(id)
        .bind(&form.name)
        .bind(form.slug.as_ref())
        .bind(&form.description)
        .fetch_optional(executor)
        .await
    }

    #[tracing::instrument(name = "Delete category", skip(executor))]
    pub async fn delete<'con>(executor: impl PgExecutor<'con>, id: i64) -> sqlx::Result<bool> {
        let deleted = sqlx::query("delete from categories where id=$1")
            .bind(id)
            .execute(executor)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    #[tracing::instrument(name = "Fetch category by id", skip(executor))]
    pub async fn fetch_by_id<'con>(
        executor: impl PgExecutor<'con>,
        id: i64,
    ) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>("select id, name, slug, description from categories where id=$1")
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch category by slug", skip(executor))]
    pub async fn fetch_by_slug<'con>(
        executor: impl PgExecutor<'con>,
        slug: &str,
    ) -> sqlx::Result<Option<Category>> {
        sqlx::query_as::<_, Category>(
            "select id, name, slug, description from categories where slug=$1",
        )
        .bind(slug)
        .fetch_optional(executor)
        .await
    }

    #[tracing::instrument(name = "Count categories", skip(executor))]
    pub async fn count<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<i64> {
        sqlx::query_scalar("select count(*) from categories")
            .fetch_one(executor)
            .await
    }

    /// Categories ordered by name
    #[tracing::instrument(name = "Fetch page of categories", skip(executor))]
    pub async fn fetch_page<'con>(
        executor: impl PgExecutor<'con>,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Category>> {
        sqlx::query_as::<_, Category>(
            "select id, name, slug, description from categories
             order by name, id limit $1 offset $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(executor)
        .await
    }
}
