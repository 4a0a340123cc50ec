use std::future::{ready, Ready};

use actix_web::{dev, web, FromRequest, HttpRequest};

use anyhow::Context;

use crate::error::{RestError, RestResult};
use crate::media::ImageResolver;
use crate::settings::MediaSettings;

pub mod admin;
pub mod categories;
pub mod featured_posts;
pub mod media;
pub mod posts;
pub mod subscribe;
pub mod theme;

/// Public read API mounted under `/api/v1`
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .service(posts::scope())
        .service(categories::scope())
        .service(featured_posts::scope())
        .service(subscribe::scope())
        .service(theme::scope())
}

impl FromRequest for ImageResolver {
    type Error = RestError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut dev::Payload) -> Self::Future {
        ready(image_resolver(req))
    }
}

/// Resolver for image URLs on the origin the request was sent to
fn image_resolver(req: &HttpRequest) -> RestResult<ImageResolver> {
    // NOTE: Must be registered with the application at startup
    let settings = req
        .app_data::<web::Data<MediaSettings>>()
        .context("MediaSettings not registered for application")?;

    let info = req.connection_info();
    Ok(ImageResolver::new(
        settings.get_ref().clone(),
        info.scheme(),
        info.host(),
    ))
}

/// Parse a boolean filter the way browsers send them, anything unrecognized is no filter
pub(crate) fn parse_flag(value: Option<&str>) -> Option<bool> {
    match value?.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
