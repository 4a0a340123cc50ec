use actix_web::dev::HttpServiceFactory;
use actix_web::web;

use serde::Deserialize;

use crate::media::ImageResolver;
use crate::telemetry::spawn_blocking_with_tracing;

pub mod categories;
pub mod posts;
pub mod subscribers;
pub mod themes;

/// Body of the bulk subscriber actions
#[derive(Debug, Deserialize)]
pub struct IdsBody {
    pub ids: Vec<i64>,
}

/// Create missing WebP siblings of freshly saved images.
/// Failures are logged, the admin request succeeds regardless
async fn generate_webp(images: ImageResolver, references: Vec<String>) {
    if references.is_empty() {
        return;
    }
    if let Err(error) =
        spawn_blocking_with_tracing(move || images.generate_webp(&references)).await
    {
        tracing::error!(error.cause_chain = ?error, "WebP generation task failed");
    }
}

/// Blank optional strings mean "no value"
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Reject values longer than `max` characters
fn within(field_value: &str, max: usize) -> Result<(), String> {
    if field_value.chars().count() > max {
        Err(format!(
            "Ensure this field has no more than {} characters.",
            max
        ))
    } else {
        Ok(())
    }
}

/// Authenticated administrative API
pub fn scope() -> impl HttpServiceFactory {
    web::scope("/admin/api")
        .service(posts::scope())
        .service(categories::scope())
        .service(subscribers::scope())
        .service(themes::scope())
}
