use actix_web::web;
use crate::web::error::json_error_handler;
use crate::web::handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(
            web::scope("/api")
                .route("/chat", web::post().to(handlers::chat))
                .route("/generate-tests", web::post().to(handlers::generate_tests))
                .route("/share", web::post().to(handlers::share))
                .route("/shared", web::get().to(handlers::list_shared))
                .route("/shared/{share_id}", web::get().to(handlers::get_shared)),
        )
        .route("/", web::get().to(handlers::health_check))
        .route("/health", web::get().to(handlers::health_check));
}
