use actix_web::dev::HttpServiceFactory;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};

use anyhow::Context;

use crate::error::{RestError, RestResult};
use crate::media::{negotiate_webp, storage_path};
use crate::settings::MediaSettings;

/// Serve an uploaded file, or its `.webp` sibling for clients that accept WebP
#[tracing::instrument(name = "Serve media file", skip(req, settings))]
async fn serve(
    req: HttpRequest,
    settings: web::Data<MediaSettings>,
    path: web::Path<String>,
) -> RestResult<HttpResponse> {
    let name = path.into_inner();
    let root = settings.root();

    let accept = req
        .headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok());

    let file = match negotiate_webp(root, &name, accept) {
        Some(webp) => webp,
        None => storage_path(root, &name).ok_or(RestError::NotFound)?,
    };

    match tokio::fs::metadata(&file).await {
        Ok(metadata) if metadata.is_file() => {}
        _ => return Err(RestError::NotFound),
    }

    let body = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read media file {}", file.display()))?;
    let content_type = mime_guess::from_path(&file).first_or_octet_stream();

    Ok(HttpResponse::Ok()
        .content_type(content_type.to_string())
        .insert_header((header::VARY, "Accept"))
        .body(body))
}

/// Uploaded media, mounted at the configured media URL
pub fn scope(settings: &MediaSettings) -> impl HttpServiceFactory {
    web::resource(format!("{}{{path:.+}}", settings.url())).route(web::get().to(serve))
}
