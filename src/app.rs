use std::net::TcpListener;

use actix_web::dev::Server;
use actix_web::{get, HttpResponse, Responder};
use actix_web::{web, App, HttpServer};

use sqlx::PgPool;

use tracing_actix_web::TracingLogger;

use crate::controller::{self, admin};
use crate::settings::MediaSettings;

/// Simple health-check endpoint
#[tracing::instrument(name = "Health check")]
#[get("/health_check")]
async fn health_check() -> impl Responder {
    HttpResponse::Ok().finish()
}

/// Run the application on a specified TCP listener
pub fn run(listener: TcpListener, pool: PgPool, media: MediaSettings) -> anyhow::Result<Server> {
    // Wrap application data
    let pool = web::Data::new(pool);
    let media = web::Data::new(media);

    // Start the server
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(pool.clone())
            .app_data(media.clone())
            .service(health_check)
            .service(controller::api_scope())
            .service(admin::scope())
            .service(controller::media::scope(media.get_ref()))
    })
    .listen(listener)?
    .run();

    Ok(server)
}
