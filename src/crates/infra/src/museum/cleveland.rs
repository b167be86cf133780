use super::{first_non_empty, get_json, UNKNOWN};
use application::query::dao::{ArtworkSource, SourceError, SourceQuery};
use async_trait::async_trait;
use model::artwork::Artwork;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

pub const CLEVELAND_LABEL: &str = "Cleveland Museum of Art";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<CmaRecord>,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    data: Option<CmaRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CmaRecord {
    id: Option<Value>,
    title: Option<String>,
    description: Option<String>,
    creditline: Option<String>,
    tombstone: Option<String>,
    medium: Option<String>,
    #[serde(rename = "type")]
    object_type: Option<String>,
    measurements: Option<String>,
    technique: Option<String>,
    creators: Option<Vec<CmaCreator>>,
    images: Option<CmaImages>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CmaCreator {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CmaImages {
    web: Option<CmaImage>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CmaImage {
    url: Option<String>,
}

impl From<CmaRecord> for Artwork {
    fn from(r: CmaRecord) -> Self {
        let id = match r.id {
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => n.to_string(),
            _ => UNKNOWN.to_string(),
        };
        let first_creator = r
            .creators
            .as_ref()
            .and_then(|c| c.first())
            .and_then(|c| c.description.as_deref());
        let img_url = r
            .images
            .as_ref()
            .and_then(|i| i.web.as_ref())
            .and_then(|w| w.url.as_deref());

        Artwork {
            id,
            title: first_non_empty([r.title.as_deref()]).unwrap_or_else(|| "Untitled".to_string()),
            artist: first_non_empty([first_creator, r.creditline.as_deref()])
                .unwrap_or_else(|| UNKNOWN.to_string()),
            img_url: first_non_empty([img_url]).unwrap_or_default(),
            medium: first_non_empty([r.medium.as_deref(), r.object_type.as_deref()])
                .unwrap_or_else(|| UNKNOWN.to_string()),
            dimensions: first_non_empty([r.measurements.as_deref()])
                .unwrap_or_else(|| UNKNOWN.to_string()),
            techniques: vec![first_non_empty([r.technique.as_deref()])
                .unwrap_or_else(|| UNKNOWN.to_string())],
            summary: first_non_empty([
                r.description.as_deref(),
                r.creditline.as_deref(),
                r.tombstone.as_deref(),
            ])
            .unwrap_or_else(|| "No summary available".to_string()),
            source: CLEVELAND_LABEL.to_string(),
        }
    }
}

/// 克利夫兰艺术博物馆 Open Access API 客户端
///
/// 搜索接口按 `q` + `skip`/`limit` 取记录；作品 ID 为纯数字。
#[derive(Clone)]
pub struct ClevelandClient {
    client: Client,
    base_url: String,
}

impl ClevelandClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ArtworkSource for ClevelandClient {
    fn label(&self) -> &'static str {
        CLEVELAND_LABEL
    }

    fn accepts_id(&self, id: &str) -> bool {
        !id.is_empty() && id.chars().all(|c| c.is_ascii_digit())
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<Artwork>, SourceError> {
        let mut params: Vec<(&str, String)> = vec![
            ("skip", "0".to_string()),
            ("limit", query.window.to_string()),
            ("has_image", "1".to_string()),
        ];
        if let Some(search) = &query.search {
            params.push(("q", search.clone()));
        }

        let url = format!("{}/artworks/", self.base_url);
        let response: SearchResponse = get_json(&self.client, &url, &params).await?;
        Ok(response.data.into_iter().map(Artwork::from).collect())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Artwork, SourceError> {
        let url = format!("{}/artworks/{}", self.base_url, id);
        let response: ObjectResponse = get_json(&self.client, &url, &[] as &[(&str, &str)]).await?;
        response.data.map(Artwork::from).ok_or(SourceError::NotFound)
    }
}
