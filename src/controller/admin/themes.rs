use actix_web::dev::HttpServiceFactory;
use actix_web::http::StatusCode;
use actix_web::{delete, get, post, put, web, HttpResponse, Responder};

use serde::Deserialize;

use sqlx::PgPool;

use crate::auth::Administrator;
use crate::controller::admin::{generate_webp, non_blank, within};
use crate::domain::HexColor;
use crate::error::{unique_violation, RestError, RestResult, ValidationErrors};
use crate::media::ImageResolver;
use crate::model::{ExtendedThemeForm, NewTheme, Theme};
use crate::repo::ThemeRepo;
use crate::view::theme_view;

const NAME_MAX: usize = 50;
const TITLE_MAX: usize = 50;
const ALT_MAX: usize = 255;

/// JSON body for creating a theme
#[derive(Debug, Default, Deserialize)]
pub struct ThemeBody {
    name: Option<String>,
    title: Option<String>,
    active: Option<bool>,
}

impl TryFrom<ThemeBody> for NewTheme {
    type Error = ValidationErrors;

    fn try_from(body: ThemeBody) -> Result<Self, Self::Error> {
        let mut errors = ValidationErrors::new();

        let name = match body.name.as_deref().map(str::trim) {
            None => Err("This field is required.".to_string()),
            Some("") => Err("This field may not be blank.".to_string()),
            Some(name) => within(name, NAME_MAX).map(|_| name.to_string()),
        };
        let name = errors.check("name", name);

        let title = body.title.unwrap_or_default().trim().to_string();
        errors.check("title", within(&title, TITLE_MAX));

        errors.finish()?;
        match name {
            Some(name) => Ok(Self {
                name,
                title,
                active: body.active.unwrap_or(false),
            }),
            None => Err(ValidationErrors::single("non_field_errors", "Invalid data.")),
        }
    }
}

/// JSON body for updating the hero section, absent fields keep their value
#[derive(Debug, Default, Deserialize)]
pub struct ExtendedThemeBody {
    /// An empty string clears the image
    hero_image: Option<String>,
    hero_image_alt: Option<String>,
    hero_box_color: Option<String>,
    show_navbar: Option<bool>,
}

impl ExtendedThemeBody {
    /// Apply the provided fields on top of the stored values
    fn apply(self, current: ExtendedThemeForm) -> Result<ExtendedThemeForm, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut form = current;

        if let Some(hero_image) = self.hero_image {
            form.hero_image = non_blank(Some(hero_image));
        }
        if let Some(alt) = self.hero_image_alt {
            if errors.check("hero_image_alt", within(&alt, ALT_MAX)).is_some() {
                form.hero_image_alt = alt;
            }
        }
        if let Some(color) = self.hero_box_color {
            if let Some(color) = errors.check("hero_box_color", color.parse::<HexColor>()) {
                form.hero_box_color = color;
            }
        }
        if let Some(show_navbar) = self.show_navbar {
            form.show_navbar = show_navbar;
        }

        errors.finish()?;
        Ok(form)
    }
}

async fn theme_response(
    theme: Theme,
    images: ImageResolver,
    status: StatusCode,
) -> RestResult<HttpResponse> {
    let view = theme_view(vec![theme], images, true)
        .await?
        .pop()
        .ok_or(RestError::NotFound)?;
    Ok(HttpResponse::build(status).json(view))
}

async fn fetch_theme(pool: &PgPool, id: i64) -> RestResult<Theme> {
    ThemeRepo::fetch_by_id(pool, id)
        .await?
        .ok_or(RestError::NotFound)
}

/// Every theme with its hero section
#[tracing::instrument(name = "Admin list themes", skip(pool, images))]
#[get("/")]
async fn list(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    images: ImageResolver,
) -> RestResult<impl Responder> {
    let themes = ThemeRepo::fetch_all(pool.get_ref()).await?;
    let views = theme_view(themes, images, true).await?;

    Ok(HttpResponse::Ok().json(views))
}

#[tracing::instrument(name = "Admin create theme", skip(pool, images))]
#[post("/")]
async fn create(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    body: web::Json<ThemeBody>,
) -> RestResult<HttpResponse> {
    let new_theme: NewTheme = body.into_inner().try_into()?;

    let id = {
        let mut tx = pool.begin().await?;
        let id = ThemeRepo::insert(&mut tx, &new_theme)
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => RestError::invalid("name", "theme with this name already exists."),
                None => e.into(),
            })?;
        tx.commit().await?;
        id
    };

    let theme = fetch_theme(pool.get_ref(), id).await?;
    theme_response(theme, images, StatusCode::CREATED).await
}

/// Make a theme the only active one
#[tracing::instrument(name = "Admin activate theme", skip(pool, images))]
#[post("/{id}/activate/")]
async fn activate(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    path: web::Path<(i64,)>,
) -> RestResult<HttpResponse> {
    let (id,) = path.into_inner();

    {
        let mut tx = pool.begin().await?;
        if !ThemeRepo::activate(&mut tx, id).await? {
            return Err(RestError::NotFound);
        }
        tx.commit().await?;
    }

    let theme = fetch_theme(pool.get_ref(), id).await?;
    theme_response(theme, images, StatusCode::OK).await
}

#[tracing::instrument(name = "Admin update hero section", skip(pool, images))]
#[put("/{id}/extended/")]
async fn update_extended(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    images: ImageResolver,
    path: web::Path<(i64,)>,
    body: web::Json<ExtendedThemeBody>,
) -> RestResult<HttpResponse> {
    let (id,) = path.into_inner();
    let pool = pool.get_ref();

    let current = fetch_theme(pool, id).await?;
    let form = body.into_inner().apply(ExtendedThemeForm::from(&current))?;

    if !ThemeRepo::update_extended(pool, id, &form).await? {
        return Err(RestError::NotFound);
    }

    let theme = fetch_theme(pool, id).await?;
    generate_webp(images.clone(), theme.hero_image.iter().cloned().collect()).await;

    theme_response(theme, images, StatusCode::OK).await
}

#[tracing::instrument(name = "Admin delete theme", skip(pool))]
#[delete("/{id}/")]
async fn remove(
    _admin: Administrator,
    pool: web::Data<PgPool>,
    path: web::Path<(i64,)>,
) -> RestResult<impl Responder> {
    let (id,) = path.into_inner();

    if !ThemeRepo::delete(pool.get_ref(), id).await? {
        return Err(RestError::NotFound);
    }
    Ok(HttpResponse::NoContent().finish())
}

/// Theme management endpoints
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/themes")
        .service(list)
        .service(create)
        .service(activate)
        .service(update_extended)
        .service(remove)
}
