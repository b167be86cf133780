use crate::error::ApiError;
use actix_cors::Cors;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, HttpResponse};
use application::query::get_artworks::INVALID_QUERY_PARAMETERS;
use log::{debug, warn};
use serde_json::json;

pub fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "DELETE", "HEAD"])
        .allow_any_header()
        .max_age(3600)
}

/// 请求体不是合法 JSON 时统一返回 400
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    warn!("{} {}: malformed body: {}", req.method(), req.path(), err);
    ApiError::BadRequest("Bad request".to_string()).into()
}

pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!("{}: bad query string: {}", req.path(), err);
    ApiError::BadRequest(INVALID_QUERY_PARAMETERS.to_string()).into()
}

pub async fn route_not_found(req: HttpRequest) -> HttpResponse {
    debug!("no route for {} {}", req.method(), req.path());
    HttpResponse::NotFound().json(json!({ "msg": "Route not found" }))
}
