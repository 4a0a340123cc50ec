use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use crate::error::{RestError, RestResult};
use crate::repo::CategoryRepo;
use crate::view::Pager;

#[derive(Debug, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

/// All categories ordered by name, paginated
#[tracing::instrument(name = "List categories", skip(req, pool))]
#[get("/")]
async fn list(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    params: web::Query<PageParams>,
) -> RestResult<impl Responder> {
    let pool = pool.get_ref();

    let count = CategoryRepo::count(pool).await?;
    let pager = Pager::new(params.page.as_deref(), count)?;
    let categories = CategoryRepo::fetch_page(pool, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(pager.page(&req, categories)))
}

#[tracing::instrument(name = "Fetch category detail", skip(pool))]
#[get("/{slug}/")]
async fn detail(pool: web::Data<PgPool>, path: web::Path<(String,)>) -> RestResult<impl Responder> {
    let (slug,) = path.into_inner();

    let category = CategoryRepo::fetch_by_slug(pool.get_ref(), &slug)
        .await?
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Ok().json(category))
}

/// Categories API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/categories").service(list).service(detail)
}
