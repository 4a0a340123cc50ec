use actix_web::dev::HttpServiceFactory;
use actix_web::{delete, get, post, put, web, HttpRequest, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use crate::auth::Administrator;
use crate::controller::admin::within;
use crate::controller::categories::PageParams;
use crate::domain::Slug;
use crate::error::{unique_violation, RestError, RestResult, ValidationErrors};
use crate::model::CategoryForm;
use crate::repo::CategoryRepo;
use crate::view::Pager;

const NAME_MAX: usize = 100;
const SLUG_MAX: usize = 120;

/// JSON body for creating or replacing a category
#[derive(Debug, Default, Deserialize)]
pub struct CategoryBody {
    name: Option<String>,
    slug: Option<String>,
    description: Option<String>,
}

impl TryFrom<CategoryBody> for CategoryForm {
    type Error = ValidationErrors;

    fn try_from(body: CategoryBody) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let name = match body.name.as_deref().map(str::trim) {
            None => Err("This field is required.".to_string()),
            Some("") => Err("This field may not be blank.".to_string()),
            Some(name) => within(name, NAME_MAX).map(|_| name.to_string()),
        };
        let name = errors.check("name", name);

        let slug = name.as_deref().and_then(|name| {
            let slug = Slug::explicit_or_derive(body.slug.as_deref(), name)
                .and_then(|slug| slug.within(SLUG_MAX));
            errors.check("slug", slug)
        });

        errors.finish()?;
        match (name, slug) {
            (Some(name), Some(slug)) => Ok(Self {
                name,
                slug,
                description: body.description.unwrap_or_default(),
            }),
            _ => Err(ValidationErrors::single("non_field_errors", "Invalid data.")),
        }
    }
}

fn write_error(e: sqlx::Error) -> RestError {
    match unique_violation(&e) {
        Some(_) => RestError::invalid("slug", "category with this slug already exists."),
        None => e.into(),
    }
}

#[tracing::instrument(name = "Admin list categories", skip(req, pool))]
#[get("/")]
async fn list(
    _admin: Administrator,
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

#[tracing::instrument(name = "Admin create category", skip(pool))]
#[post("/")]
async fn create(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    body: web::Json<CategoryBody>,
) -> RestResult<impl Responder> {
    let form: CategoryForm = body.into_inner().try_into()?;
    let pool = pool.get_ref();

    let id = CategoryRepo::insert(pool, &form)
        .await
        .map_err(write_error)?;
    let category = CategoryRepo::fetch_by_id(pool, id)
        .await?
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Created().json(category))
}

#[tracing::instrument(name = "Admin replace category", skip(pool))]
#[put("/{id}/")]
async fn replace(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    path: web::Path<(i64,)>,
    body: web::Json<CategoryBody>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();
    let form: CategoryForm = body.into_inner().try_into()?;

    let category = CategoryRepo::update(pool.get_ref(), id, &form)
        .await
        .map_err(write_error)?
        .ok_or(RestError::NotFound)?;

    Ok(HttpResponse::Ok().json(category))
}

#[tracing::instrument(name = "Admin delete category", skip(pool))]
#[delete("/{id}/")]
async fn remove(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    path: web::Path<(i64,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    if !CategoryRepo::delete(pool.get_ref(), id).await? {
        return Err(RestError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Category management endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/categories")
        .service(list)
        .service(create)
        .service(replace)
        .service(remove)
}
