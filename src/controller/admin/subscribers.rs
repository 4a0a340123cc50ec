use actix_web::dev::HttpServiceFactory;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use serde::Deserialize;
use serde_json::json;

use sqlx::PgPool;

use crate::auth::Administrator;
use crate::controller::admin::{non_blank, IdsBody};
use crate::controller::parse_flag;
use crate::error::RestResult;
use crate::model::SubscriberQuery;
use crate::repo::SubscriberRepo;
use crate::view::Pager;

#[derive(Debug, Deserialize)]
pub struct SubscriberParams {
    is_active: Option<String>,
    search: Option<String>,
    page: Option<String>,
}

/// Subscribers, newest first
#[tracing::instrument(name = "Admin list subscribers", skip(req, pool))]
#[get("/")]
async fn list(
    _admin: Administrator,
    req: HttpRequest,
    pool: web::Data<PgPool>,
    params: web::Query<SubscriberParams>,
) -> RestResult<impl Responder> {
    let pool = pool.get_ref();
    let query = SubscriberQuery {
        is_active: parse_flag(params.is_active.as_deref()),
        search: non_blank(params.search.clone()),
    };

    let count = SubscriberRepo::count(pool, &query).await?;
    let pager = Pager::new(params.page.as_deref(), count)?;
    let subscribers = SubscriberRepo::fetch_page(pool, &query, pager.limit(), pager.offset()).await?;

    Ok(HttpResponse::Ok().json(pager.page(&req, subscribers)))
}

async fn set_active(pool: &PgPool, ids: &[i64], is_active: bool) -> RestResult<HttpResponse> {
    let updated = SubscriberRepo::set_active(pool, ids, is_active).await?;
    tracing::info!("Marked {} subscribers as active={}", updated, is_active);

    Ok(HttpResponse::Ok().json(json!({ "updated": updated })))
}

#[tracing::instrument(name = "Admin mark subscribers active", skip(pool))]
#[post("/mark-active/")]
async fn mark_active(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    body: web::Json<IdsBody>,
) -> RestResult<HttpResponse> {
    set_active(pool.get_ref(), &body.ids, true).await
}

#[tracing::instrument(name = "Admin mark subscribers inactive", skip(pool))]
#[post("/mark-inactive/")]
async fn mark_inactive(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    body: web::Json<IdsBody>,
) -> RestResult<HttpResponse> {
    set_active(pool.get_ref(), &body.ids, false).await
}

/// Subscriber management endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/subscribers")
        .service(list)
        .service(mark_active)
        .service(mark_inactive)
}
