use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use crate::error::RestResult;
use crate::media::ImageResolver;
use crate::model::PostQuery;
use crate::repo::PostRepo;
use crate::view::{post_list_items, Pager};

#[derive(Debug, Deserialize)]
pub struct FeaturedParams {
    category: Option<String>,
    page: Option<String>,
}

/// Featured published posts, newest first
#[tracing::instrument(name = "List featured posts", skip(req, pool, images))]
#[get("/")]
async fn list(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    params: web::Query<FeaturedParams>,
) -> RestResult<impl Responder> {
    let query = PostQuery {
        is_featured: Some(true),
        categories: params
            .category
            .iter()
            .filter(|slug| !slug.is_empty())
            .cloned()
            .collect(),
        ..PostQuery::published()
    };

    let count = PostRepo::count(pool.get_ref(), &query).await?;
    let pager = Pager::new(params.page.as_deref(), count)?;

    let posts = {
        let mut conn = pool.acquire().await?;
        PostRepo::fetch_page(&mut conn, &query, pager.limit(), pager.offset()).await?
    };
    let results = post_list_items(posts, images).await?;

    Ok(HttpResponse::Ok().json(pager.page(&req, results)))
}

/// Featured posts API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/featured-posts").service(list)
}
