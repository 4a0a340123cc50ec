use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpResponse, Responder};

use sqlx::PgPool;

use crate::error::RestResult;
use crate::media::ImageResolver;
use crate::repo::ThemeRepo;
use crate::view::theme_view;

/// Hero-section settings of the active theme, `null` when no theme is active
#[tracing::instrument(name = "Fetch active theme", skip(pool, images))]
#[get("/")]
async fn active(pool: web::Data<PgPool>, images: ImageResolver) -> RestResult<impl Responder> {
    let themes = ThemeRepo::fetch_active(pool.get_ref())
        .await?
        .into_iter()
        .collect();

    let view = theme_view(themes, images, false).await?.pop();

    Ok(HttpResponse::Ok().json(view))
}

/// Theme API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/theme").service(active)
}
