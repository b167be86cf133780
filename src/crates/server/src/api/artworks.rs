use crate::consts;
use crate::error::ApiError;
use crate::AppState;
use actix_web::{web, web::Json, Scope};
use application::query::get_artworks::ArtworkQuery;
use application::query::QueryError;
use model::artwork::{Artwork, ArtworkPage};
use serde::Deserialize;

const FAILED_TO_FETCH_DATA: &str = "Failed to fetch data";
const INVALID_IDENTIFIER: &str = "Invalid identifier";

#[derive(Debug, Deserialize)]
pub struct ArtworkParams {
    page: Option<String>,
    limit: Option<String>,
    search: Option<String>,
    #[serde(rename = "sortBy")]
    sort_by: Option<String>,
}

impl From<ArtworkParams> for ArtworkQuery {
    fn from(params: ArtworkParams) -> Self {
        ArtworkQuery {
            page: params.page,
            limit: params.limit,
            search: params.search,
            sort_by: params.sort_by,
        }
    }
}

pub async fn list_artworks(
    state: web::Data<AppState>,
    params: web::Query<ArtworkParams>,
) -> Result<Json<ArtworkPage>, ApiError> {
    let page = state
        .get_artworks()
        .handle(params.into_inner().into())
        .await
        .map_err(|e| ApiError::from_query(e, FAILED_TO_FETCH_DATA))?;
    Ok(Json(page))
}

pub async fn get_artwork(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<Json<Artwork>, ApiError> {
    let id = path.into_inner();
    // UpstreamError 的消息里已带有博物馆名称
    let artwork = state.get_artwork().handle(&id).await.map_err(|e| match e {
        QueryError::UpstreamError(msg) => ApiError::dependency(&msg, id.clone()),
        other => ApiError::from_query(other, FAILED_TO_FETCH_DATA),
    })?;
    Ok(Json(artwork))
}

/// `/api/artworks/` 没有 ID
async fn missing_artwork_id() -> Result<Json<Artwork>, ApiError> {
    Err(ApiError::BadRequest(INVALID_IDENTIFIER.to_string()))
}

pub fn scope() -> Scope {
    web::scope(consts::URL_PATH_ARTWORKS)
        .route("", web::get().to(list_artworks))
        .route("/", web::get().to(missing_artwork_id))
        .route("/{id}", web::get().to(get_artwork))
}
