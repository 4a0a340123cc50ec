use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse, Responder};

use chrono::{DateTime, Utc};

use serde::Deserialize;
use serde_json::json;

use sqlx::PgPool;

use crate::auth::Administrator;
use crate::controller::admin::{generate_webp, non_blank, within};
use crate::controller::parse_flag;
use crate::domain::{PostStatus, Slug};
use crate::error::{foreign_key_violation, unique_violation, RestError, RestResult, ValidationErrors};
use crate::media::ImageResolver;
use crate::model::{Post, PostForm, PostQuery};
use crate::publisher;
use crate::repo::PostRepo;
use crate::view::{post_details, Pager};

const TITLE_MAX: usize = 200;
const SLUG_MAX: usize = 250;
const TAG_MAX: usize = 100;

const REQUIRED: &str = "This field is required.";
const BLANK: &str = "This field may not be blank.";

/// JSON body for creating or replacing a post
#[derive(Debug, Default, Deserialize)]
pub struct PostBody {
    title: Option<String>,
    slug: Option<String>,
    content: Option<String>,
    excerpt: Option<String>,
    featured_image: Option<String>,
    side_image_1: Option<String>,
    side_image_2: Option<String>,
    status: Option<String>,
    is_featured: Option<bool>,
    published_at: Option<DateTime<Utc>>,
    categories: Option<Vec<i64>>,
    tags: Option<Vec<String>>,
}

impl TryFrom<PostBody> for PostForm {
    type Error = ValidationErrors;

    fn try_from(body: PostBody) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let title = match body.title.as_deref().map(str::trim) {
            None => Err(REQUIRED.to_string()),
            Some("") => Err(BLANK.to_string()),
            Some(title) => within(title, TITLE_MAX).map(|_| title.to_string()),
        };
        let title = errors.check("title", title);

        let slug = title.as_deref().and_then(|title| {
            let slug = Slug::explicit_or_derive(body.slug.as_deref(), title)
                .and_then(|slug| slug.within(SLUG_MAX));
            errors.check("slug", slug)
        });

        let content = match body.content {
            None => Err(REQUIRED.to_string()),
            Some(content) if content.trim().is_empty() => Err(BLANK.to_string()),
            Some(content) => Ok(content),
        };
        let content = errors.check("content", content);

        let status = match body.status.as_deref() {
            None => Ok(PostStatus::default()),
            Some(status) => status
                .parse::<PostStatus>()
                .map_err(|_| format!("\"{}\" is not a valid choice.", status)),
        };
        let status = errors.check("status", status);

        let mut tags: Vec<String> = Vec::new();
        for tag in body.tags.unwrap_or_default() {
            let tag = tag.trim().to_string();
            if tag.is_empty() || tags.contains(&tag) {
                continue;
            }
            if let Err(message) = within(&tag, TAG_MAX) {
                errors.add("tags", message);
                continue;
            }
            tags.push(tag);
        }

        let mut categories = body.categories.unwrap_or_default();
        categories.sort_unstable();
        categories.dedup();

        errors.finish()?;
        match (title, slug, content, status) {
            (Some(title), Some(slug), Some(content), Some(status)) => Ok(Self {
                title,
                slug,
                content,
                excerpt: body.excerpt.unwrap_or_default(),
                featured_image: non_blank(body.featured_image),
                side_image_1: non_blank(body.side_image_1),
                side_image_2: non_blank(body.side_image_2),
                status,
                is_featured: body.is_featured.unwrap_or(false),
                published_at: body.published_at.unwrap_or_else(Utc::now),
                categories,
                tags,
            }),
            _ => Err(ValidationErrors::single("non_field_errors", "Invalid data.")),
        }
    }
}

/// Map constraint violations of a post write onto field errors
fn write_error(e: sqlx::Error) -> RestError {
    if unique_violation(&e).is_some() {
        return RestError::invalid("slug", "post with this slug already exists.");
    }
    if foreign_key_violation(&e) {
        return RestError::invalid("categories", "Invalid pk - object does not exist.");
    }
    e.into()
}

#[derive(Debug, Deserialize)]
pub struct AdminPostParams {
    status: Option<String>,
    is_featured: Option<String>,
    category: Option<String>,
    search: Option<String>,
    page: Option<String>,
}

async fn fetch_post(pool: &PgPool, id: i64) -> RestResult<Post> {
    let mut conn = pool.acquire().await?;
    PostRepo::fetch_by_id(&mut conn, id)
        .await?
        .ok_or(RestError::NotFound)
}

async fn detail_response(
    post: Post,
    images: ImageResolver,
    status: actix_web::http::StatusCode,
) -> RestResult<HttpResponse> {
    let view = post_details(vec![post], images)
        .await?
        .pop()
        .ok_or(RestError::NotFound)?;
    Ok(HttpResponse::build(status).json(view))
}

/// Every post regardless of status
#[tracing::instrument(name = "Admin list posts", skip(req, pool, images))]
#[get("/")]
async fn list(
    _admin: Administrator,
    req: HttpRequest,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    params: web::Query<AdminPostParams>,
) -> RestResult<impl Responder> {
    let query = PostQuery {
        status: params.status.as_deref().and_then(|s| s.parse().ok()),
        is_featured: parse_flag(params.is_featured.as_deref()),
        categories: non_blank(params.category.clone()).into_iter().collect(),
        ..Default::default()
    }
    .with_search(params.search.as_deref());

    let count = PostRepo::count(pool.get_ref(), &query).await?;
    let pager = Pager::new(params.page.as_deref(), count)?;

    let posts = {
        let mut conn = pool.acquire().await?;
        PostRepo::fetch_page(&mut conn, &query, pager.limit(), pager.offset()).await?
    };
    let results = post_details(posts, images).await?;

    Ok(HttpResponse::Ok().json(pager.page(&req, results)))
}

#[tracing::instrument(name = "Admin create post", skip(pool, images))]
#[post("/")]
async fn create(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    body: web::Json<PostBody>,
) -> RestResult<HttpResponse> {
    let form: PostForm = body.into_inner().try_into()?;

    let id = {
        let mut tx = pool.begin().await?;
        let id = PostRepo::insert(&mut tx, &form).await.map_err(write_error)?;
        tx.commit().await?;
        id
    };

    let post = fetch_post(pool.get_ref(), id).await?;
    generate_webp(images.clone(), post.images().map(String::from).collect()).await;

    detail_response(post, images, actix_web::http::StatusCode::CREATED).await
}

/// Run the publisher sweep immediately
#[tracing::instrument(name = "Admin publish due posts", skip(pool))]
#[post("/publish-due/")]
async fn publish_due(_admin: Administrator, pool: web::Data<PgPool>) -> RestResult<impl Responder> {
    let published = publisher::publish_due_posts(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(json!({ "published": published.len() })))
}

#[tracing::instrument(name = "Admin fetch post", skip(pool, images))]
#[get("/{id}/")]
async fn detail(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    path: web::Path<(i64,)>,
) -> RestResult<HttpResponse> {
    let (id,) = path.into_inner();

    let post = fetch_post(pool.get_ref(), id).await?;
    detail_response(post, images, actix_web::http::StatusCode::OK).await
}

#[tracing::instrument(name = "Admin replace post", skip(pool, images))]
#[put("/{id}/")]
async fn replace(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    path: web::Path<(i64,)>,
    body: web::Json<PostBody>,
) -> RestResult<HttpResponse> {
    let (id,) = path.into_inner();
    let form: PostForm = body.into_inner().try_into()?;

    {
        let mut tx = pool.begin().await?;
        if !PostRepo::update(&mut tx, id, &form).await.map_err(write_error)? {
            return Err(RestError::NotFound);
        }
        tx.commit().await?;
    }

    let post = fetch_post(pool.get_ref(), id).await?;
    generate_webp(images.clone(), post.images().map(String::from).collect()).await;

    detail_response(post, images, actix_web::http::StatusCode::OK).await
}

#[tracing::instrument(name = "Admin delete post", skip(pool))]
#[delete("/{id}/")]
async fn remove(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    path: web::Path<(i64,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    if !PostRepo::delete(pool.get_ref(), id).await? {
        return Err(RestError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Post management endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/posts")
        .service(list)
        .service(create)
        .service(publish_due)
        .service(detail)
        .service(replace)
        .service(remove)
}
