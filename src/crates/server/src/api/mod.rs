//! HTTP 路由

pub mod artworks;
pub mod endpoints;
pub mod users;

use crate::consts;
use crate::middleware::other;
use actix_web::web;

pub fn configure_service(svc: &mut web::ServiceConfig) {
    svc.app_data(web::JsonConfig::default().error_handler(other::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(other::query_error_handler))
        .route("/", web::get().to(endpoints::get_endpoints))
        .service(
            web::scope(consts::URL_PATH_API)
                .route("", web::get().to(endpoints::get_endpoints))
                .service(artworks::scope())
                .service(users::scope()),
        );
}
