use sqlx::{PgConnection, PgExecutor};

use crate::model::{ExtendedThemeForm, NewTheme, Theme};

const SELECT_THEME: &str = "select t.id, t.name, t.active, t.title, t.created_at,
        e.hero_image,
        coalesce(e.hero_image_alt, '') as hero_image_alt,
        coalesce(e.hero_box_color, '#FFFFFF') as hero_box_color,
        coalesce(e.show_navbar, true) as show_navbar
    from themes t left join extended_themes e on e.theme_id = t.id";

/// Repository for the admin theme and its extended hero-section record
pub struct ThemeRepo;

impl ThemeRepo {
    /// Insert a theme together with its extended record.
    /// NOTE: Run inside a transaction, an active theme deactivates all others
    #[tracing::instrument(name = "Insert theme", skip(conn))]
    pub async fn insert(conn: &mut PgConnection, new_theme: &NewTheme) -> sqlx::Result<i64> {
        if new_theme.active {
            sqlx::query("update themes set active=false where active")
                .execute(&mut *conn)
                .await?;
        }

        let id: i64 = sqlx::query_scalar(
            "insert into themes(name, title, active) values ($1, $2, $3) returning id",
        )
        .bind(&new_theme.name)
        .bind(&new_theme.title)
        .bind(new_theme.active)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query("insert into extended_themes(theme_id) values ($1)")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        Ok(id)
    }

    /// Make `id` the only active theme, `false` if no theme has that ID.
    /// NOTE: Run inside a transaction
    #[tracing::instrument(name = "Activate theme", skip(conn))]
    pub async fn activate(conn: &mut PgConnection, id: i64) -> sqlx::Result<bool> {
        sqlx::query("update themes set active=false where active and id<>$1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        let updated = sqlx::query("update themes set active=true where id=$1")
            .bind(id)
            .execute(&mut *conn)
            .await?
            .rows_affected();

        Ok(updated > 0)
    }

    #[tracing::instrument(name = "Update extended theme", skip(executor))]
    pub async fn update_extended<'con>(
        executor: impl PgExecutor<'con>,
        theme_id: i64,
        form: &ExtendedThemeForm,
    ) -> sqlx::Result<bool> {
        let updated = sqlx::query(
            "insert into extended_themes(theme_id, hero_image, hero_image_alt, hero_box_color, show_navbar)
             select id, $2, $3, $4, $5 from themes where id=$1
             on conflict (theme_id) do update
             set hero_image=excluded.hero_image, hero_image_alt=excluded.hero_image_alt,
                 hero_box_color=excluded.hero_box_color, show_navbar=excluded.show_navbar",
        )
        .bind(theme_id)
        .bind(&form.hero_image)
        .bind(&form.hero_image_alt)
        .bind(form.hero_box_color.as_ref())
        .bind(form.show_navbar)
        .execute(executor)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    /// Delete a theme, its extended record goes with it
    #[tracing::instrument(name = "Delete theme", skip(executor))]
    pub async fn delete<'con>(executor: impl PgExecutor<'con>, id: i64) -> sqlx::Result<bool> {
        let deleted = sqlx::query("delete from themes where id=$1")
            .bind(id)
            .execute(executor)
            .await?
            .rows_affected();
        Ok(deleted > 0)
    }

    #[tracing::instrument(name = "Fetch theme by id", skip(executor))]
    pub async fn fetch_by_id<'con>(
        executor: impl PgExecutor<'con>,
        id: i64,
    ) -> sqlx::Result<Option<Theme>> {
        sqlx::query_as::<_, Theme>(&format!("{} where t.id=$1", SELECT_THEME))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch active theme", skip(executor))]
    pub async fn fetch_active<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<Option<Theme>> {
        sqlx::query_as::<_, Theme>(&format!("{} where t.active", SELECT_THEME))
            .fetch_optional(executor)
            .await
    }

    #[tracing::instrument(name = "Fetch all themes", skip(executor))]
    pub async fn fetch_all<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<Vec<Theme>> {
        sqlx::query_as::<_, Theme>(&format!("{} order by t.name", SELECT_THEME))
            .fetch_all(executor)
            .await
    }

    #[tracing::instrument(name = "Count themes", skip(executor))]
    pub async fn count<'con>(executor: impl PgExecutor<'con>) -> sqlx::Result<i64> {
        sqlx::query_scalar("select count(*) from themes")
            .fetch_one(executor)
            .await
    }
}
