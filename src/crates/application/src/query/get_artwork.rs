use crate::query::dao::{ArtworkSource, SourceError};
use crate::query::QueryError;
use lazy_static::lazy_static;
use log::{error, warn};
use model::artwork::Artwork;
use regex::Regex;
use std::sync::Arc;

lazy_static! {
    static ref ARTWORK_ID_RX: Regex = Regex::new(r"^[A-Za-z0-9]+$").unwrap();
}

/// 单个作品查询：按 ID 格式分派到对应的博物馆
#[derive(Clone)]
pub struct GetArtwork {
    sources: Vec<Arc<dyn ArtworkSource>>,
}

impl GetArtwork {
    pub fn new(sources: Vec<Arc<dyn ArtworkSource>>) -> Self {
        Self { sources }
    }

    pub async fn handle(&self, id: &str) -> Result<Artwork, QueryError> {
        let id = id.trim();
        if !ARTWORK_ID_RX.is_match(id) {
            return Err(QueryError::InvalidInput("Invalid identifier".to_string()));
        }

        let source = self
            .sources
            .iter()
            .find(|s| s.accepts_id(id))
            .ok_or_else(|| QueryError::InvalidInput("Invalid identifier".to_string()))?;

        source.fetch_by_id(id).await.map_err(|e| match e {
            SourceError::NotFound => {
                warn!("Artwork not found in {}: {}", source.label(), id);
                QueryError::NotFound("Artwork not found".to_string())
            }
            other => {
                error!("Error fetching artwork from {}: {}", source.label(), other);
                QueryError::UpstreamError(format!("Failed to fetch artwork from {}", source.label()))
            }
        })
    }
}
