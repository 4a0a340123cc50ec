use std::collections::HashMap;

use chrono::{DateTime, Utc};

use sqlx::{PgConnection, PgExecutor, Postgres, QueryBuilder};

use crate::domain::Slug;
use crate::model::{Category, OrderField, Post, PostForm, PostQuery, PublishedPost};
use crate::repo::like_pattern;

#[derive(sqlx::FromRow)]
struct PostCategoryRow {
    post_id: i64,
    #[sqlx(flatten)]
    category: Category,
}

/// Repository for interfacing with post-related tables
pub struct PostRepo;

impl PostRepo {
    #[tracing::instrument(name = "Insert post", skip(conn, form), fields(slug = %form.slug))]
    pub async fn insert(conn: &mut PgConnection, form: &PostForm) -> sqlx::Result<i64> {
        let id: i64 = sqlx::query_scalar(
            "insert into posts(title, slug, content, excerpt, featured_image, side_image_1, side_image_2, status, is_featured, published_at)
             values ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             returning id",
        )
        .bind(&form.title)
        .bind(form.slug.as_ref())
        .bind(&form.content)
        .bind(&form.excerpt)
        .bind(&form.featured_image)
        .bind(&form.side_image_1)
        .bind(&form.side_image_2)
        .bind(form.status)
        .bind(form.is_featured)
        .bind(form.published_at)
        .fetch_one(&mut *conn)
        .await?;

        Self::set_categories(&mut *conn, id, &form.categories).await?;
        Self::set_tags(&mut *conn, id, &form.tags).await?;

        Ok(id)
    }

    /// Replace every field of a post, `false` if no post has that ID
    #[tracing::instrument(name = "Update post", skip(conn, form), fields(slug = %form.slug))]
    pub async fn update(conn: &mut PgConnection, id: i64, form: &PostForm) -> sqlx::Result<bool> {
        let updated = sqlx::query(
            "update posts
             set title=$2, slug=$3, content=$4, excerpt=$5, featured_image=$6, side_image_1=$7,
                 side_image_2=$8, status=$9, is_featured=$10, published_at=$11
             where id=$1",
        )
        .bind(id)
        .bind(&form.title)
        .bind(form.slug.as_ref())
        .bind(&form.content)
        .bind(&form.excerpt)
        .bind(&form.featured_image)
        .bind(&form.side_image_1)
        .bind(&form.side_image_2)
        .bind(form.status)
        .bind(form.is_featured)
        .bind(form.published_at)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        if updated == 0 {
            return Ok(false);
        }

        Self::set_categories(&mut *conn, id, &form.categories).await?;
        Self::set_tags(&mut *conn, id, &form.tags).await?;

        Ok(true)
    }

    #[tracing::instrument(name = "Delete post", skip(executor))]
    pub async fn delete<'con>(executor: impl PgExecutor<'con>, id: i64) -> sqlx::Result<bool> {
        let deleted = sqlx::query("delete from posts where id=$1")
            .bind(id)
            .execute(executor)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    #[tracing::instrument(name = "Fetch post by id", skip(conn))]
    pub async fn fetch_by_id(conn: &mut PgConnection, id: i64) -> sqlx::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>("select * from posts where id=$1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Self::with_relations(conn, post).await
    }

    /// Published post by slug, drafts are never returned
    #[tracing::instrument(name = "Fetch published post by slug", skip(conn))]
    pub async fn fetch_published_by_slug(
        conn: &mut PgConnection,
        slug: &str,
    ) -> sqlx::Result<Option<Post>> {
        let post = sqlx::query_as::<_, Post>(
            "select * from posts where slug=$1 and status='published'",
        )
        .bind(slug)
        .fetch_optional(&mut *conn)
        .await?;

        Self::with_relations(conn, post).await
    }

    #[tracing::instrument(name = "Count posts", skip(executor))]
    pub async fn count<'con>(executor: impl PgExecutor<'con>, query: &PostQuery) -> sqlx::Result<i64> {
        let mut builder = QueryBuilder::new("select count(*) from posts p");
        push_filters(&mut builder, query);

        builder.build_query_scalar().fetch_one(executor).await
    }

    #[tracing::instrument(name = "Fetch page of posts", skip(conn))]
    pub async fn fetch_page(
        conn: &mut PgConnection,
        query: &PostQuery,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<Post>> {
        let mut builder = QueryBuilder::new("select p.* from posts p");
        push_filters(&mut builder, query);

        builder.push(" order by ");
        for ordering in query.orderings() {
            let column = match ordering.field {
                OrderField::PublishedAt => "p.published_at",
                OrderField::Title => "p.title",
            };
            let direction = if ordering.descending { "desc" } else { "asc" };
            builder.push(format!("{} {}, ", column, direction));
        }
        builder.push("p.id desc");

        builder.push(" limit ").push_bind(limit);
        builder.push(" offset ").push_bind(offset);

        let mut posts: Vec<Post> = builder.build_query_as().fetch_all(&mut *conn).await?;
        Self::attach_relations(conn, &mut posts).await?;

        Ok(posts)
    }

    /// Promote every draft whose publish time has passed, in a single statement
    #[tracing::instrument(name = "Publish due drafts", skip(executor))]
    pub async fn publish_due<'con>(
        executor: impl PgExecutor<'con>,
        now: DateTime<Utc>,
    ) -> sqlx::Result<Vec<PublishedPost>> {
        sqlx::query_as::<_, PublishedPost>(
            "update posts set status='published'
             where status='draft' and published_at <= $1
             returning id, title",
        )
        .bind(now)
        .fetch_all(executor)
        .await
    }

    async fn set_categories(
        conn: &mut PgConnection,
        post_id: i64,
        category_ids: &[i64],
    ) -> sqlx::Result<()> {
        sqlx::query("delete from post_categories where post_id=$1")
            .bind(post_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            "insert into post_categories(post_id, category_id)
             select $1, unnest($2::bigint[])
             on conflict do nothing",
        )
        .bind(post_id)
        .bind(category_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn set_tags(conn: &mut PgConnection, post_id: i64, names: &[String]) -> sqlx::Result<()> {
        let mut tag_ids = Vec::with_capacity(names.len());
        for name in names {
            let slug = Slug::derive(name)
                .map(|slug| slug.to_string())
                .unwrap_or_else(|_| name.to_lowercase());
            let id: i64 = sqlx::query_scalar(
                "insert into tags(name, slug) values ($1, $2)
                 on conflict (name) do update set name=excluded.name
                 returning id",
            )
            .bind(name)
            .bind(slug)
            .fetch_one(&mut *conn)
            .await?;
            tag_ids.push(id);
        }

        sqlx::query("delete from post_tags where post_id=$1")
            .bind(post_id)
            .execute(&mut *conn)
            .await?;

        sqlx::query(
            "insert into post_tags(post_id, tag_id)
             select $1, unnest($2::bigint[])
             on conflict do nothing",
        )
        .bind(post_id)
        .bind(&tag_ids)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    async fn with_relations(
        conn: &mut PgConnection,
        post: Option<Post>,
    ) -> sqlx::Result<Option<Post>> {
        match post {
            Some(post) => {
                let mut posts = vec![post];
                Self::attach_relations(conn, &mut posts).await?;
                Ok(posts.pop())
            }
            None => Ok(None),
        }
    }

    async fn attach_relations(conn: &mut PgConnection, posts: &mut [Post]) -> sqlx::Result<()> {
        if posts.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = posts.iter().map(|post| post.id).collect();

        let category_rows = sqlx::query_as::<_, PostCategoryRow>(
            "select pc.post_id, c.id, c.name, c.slug, c.description
             from post_categories pc join categories c on c.id = pc.category_id
             where pc.post_id = any($1)
             order by c.name",
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let tag_rows = sqlx::query_as::<_, (i64, String)>(
            "select pt.post_id, t.name
             from post_tags pt join tags t on t.id = pt.tag_id
             where pt.post_id = any($1)
             order by t.name",
        )
        .bind(&ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut categories: HashMap<i64, Vec<Category>> = HashMap::new();
        for row in category_rows {
            categories.entry(row.post_id).or_default().push(row.category);
        }
        let mut tags: HashMap<i64, Vec<String>> = HashMap::new();
        for (post_id, name) in tag_rows {
            tags.entry(post_id).or_default().push(name);
        }

        for post in posts.iter_mut() {
            post.categories = categories.remove(&post.id).unwrap_or_default();
            post.tags = tags.remove(&post.id).unwrap_or_default();
        }

        Ok(())
    }
}

fn push_filters<'q>(builder: &mut QueryBuilder<'q, Postgres>, query: &PostQuery) {
    builder.push(" where true");

    if let Some(status) = query.status {
        builder.push(" and p.status = ").push_bind(status);
    }
    for category in &query.categories {
        builder
            .push(
                " and exists (select 1 from post_categories pc join categories c on c.id = pc.category_id
                  where pc.post_id = p.id and c.slug = ",
            )
            .push_bind(category.clone())
            .push(")");
    }
    if let Some(tag) = &query.tag {
        builder
            .push(
                " and exists (select 1 from post_tags pt join tags t on t.id = pt.tag_id
                  where pt.post_id = p.id and t.name = ",
            )
            .push_bind(tag.clone())
            .push(")");
    }
    if let Some(is_featured) = query.is_featured {
        builder.push(" and p.is_featured = ").push_bind(is_featured);
    }
    for term in &query.search_terms {
        let pattern = like_pattern(term);
        builder
            .push(" and (p.title ilike ")
            .push_bind(pattern.clone())
            .push(" or p.content ilike ")
            .push_bind(pattern.clone())
            .push(" or p.excerpt ilike ")
            .push_bind(pattern)
            .push(")");
    }
}
