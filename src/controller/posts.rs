use actix_web::dev::HttpServiceFactory;
use actix_web::{get, web, HttpRequest, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use crate::controller::parse_flag;
use crate::error::{RestError, RestResult};
use crate::media::ImageResolver;
use crate::model::{PostOrdering, PostQuery};
use crate::repo::PostRepo;
use crate::view::{post_details, post_list_items, Pager};

/// Query parameters accepted by the post listing
#[derive(Debug, Default, Deserialize)]
pub struct PostListParams {
    category: Option<String>,
    #[serde(rename = "categories__slug")]
    categories_slug: Option<String>,
    #[serde(rename = "tags__name")]
    tags_name: Option<String>,
    is_featured: Option<String>,
    search: Option<String>,
    ordering: Option<String>,
    page: Option<String>,
}

impl PostListParams {
    fn to_query(&self) -> PostQuery {
        let mut query = PostQuery::published().with_search(self.search.as_deref());

        query.categories = [&self.categories_slug, &self.category]
            .into_iter()
            .flatten()
            .filter(|slug| !slug.is_empty())
            .cloned()
            .collect();
        query.tag = self.tags_name.clone().filter(|tag| !tag.is_empty());
        query.is_featured = parse_flag(self.is_featured.as_deref());
        query.ordering = self
            .ordering
            .as_deref()
            .map(PostOrdering::parse_list)
            .unwrap_or_default();

        query
    }
}

/// Published posts, filtered, searched, ordered and paginated
#[tracing::instrument(name = "List posts", skip(req, pool, images))]
#[get("/")]
async fn list(
    req: HttpRequest,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    params: web::Query<PostListParams>,
) -> RestResult<impl Responder> {
    let query = params.to_query();

    let count = PostRepo::count(pool.get_ref(), &query).await?;
    let pager = Pager::new(params.page.as_deref(), count)?;

    let posts = {
        let mut conn = pool.acquire().await?;
        PostRepo::fetch_page(&mut conn, &query, pager.limit(), pager.offset()).await?
    };
    let results = post_list_items(posts, images).await?;

    Ok(HttpResponse::Ok().json(pager.page(&req, results)))
}

/// Single published post by slug
#[tracing::instrument(name = "Fetch post detail", skip(pool, images))]
#[get("/{slug}/")]
async fn detail(
    pool: web::Data<PgPool>,
    images: ImageResolver,
    path: web::Path<(String,)>,
) -> RestResult<impl Responder> {
    let (slug,) = path.into_inner();

    let post = {
        let mut conn = pool.acquire().await?;
        PostRepo::fetch_published_by_slug(&mut conn, &slug)
            .await?
            .ok_or(RestError::NotFound)?
    };

    let view = post_details(vec![post], images)
        .await?
        .pop()
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Ok().json(view))
}

/// Published posts API endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/posts").service(list).service(detail)
}
