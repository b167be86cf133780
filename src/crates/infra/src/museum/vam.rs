use super::{first_non_empty, get_json, UNKNOWN};
use application::query::dao::{ArtworkSource, SourceError, SourceQuery};
use async_trait::async_trait;
use model::artwork::Artwork;
use reqwest::Client;
use serde::Deserialize;

pub const VAM_LABEL: &str = "Victoria and Albert Museum";
/// 不带搜索词时 V&A 需要一个默认查询
pub const DEFAULT_QUERY: &str = "art";
/// V&A 搜索接口允许的最大 page_size
pub const MAX_PAGE_SIZE: u32 = 100;

const NO_DESCRIPTION: &str = "No Description Available";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    records: Vec<SearchRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchRecord {
    #[serde(rename = "systemNumber")]
    system_number: Option<String>,
    #[serde(rename = "objectType")]
    object_type: Option<String>,
    #[serde(rename = "_primaryTitle")]
    primary_title: Option<String>,
    #[serde(rename = "_primaryMaker")]
    primary_maker: Option<PrimaryMaker>,
    #[serde(rename = "_primaryDate")]
    primary_date: Option<String>,
    #[serde(rename = "_primaryPlace")]
    primary_place: Option<String>,
    #[serde(rename = "_images")]
    images: Option<Images>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrimaryMaker {
    name: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Images {
    _primary_thumbnail: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectResponse {
    record: Option<ObjectRecord>,
    #[serde(default)]
    meta: Option<ObjectMeta>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ObjectMeta {
    images: Option<Images>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ObjectRecord {
    system_number: Option<String>,
    titles: Vec<Title>,
    artist_maker_person: Vec<NamedMaker>,
    artist_maker_organisations: Vec<NamedMaker>,
    summary_description: Option<String>,
    brief_description: Option<String>,
    physical_description: Option<String>,
    materials: Vec<Term>,
    techniques: Vec<Term>,
    materials_and_techniques: Option<String>,
    dimensions: Vec<Dimension>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Title {
    title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NamedMaker {
    name: Option<Term>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Term {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Dimension {
    dimension: Option<String>,
    value: Option<String>,
    unit: Option<String>,
}

fn thumbnail(images: Option<&Images>) -> String {
    first_non_empty([images.and_then(|i| i._primary_thumbnail.as_deref())]).unwrap_or_default()
}

fn terms(items: &[Term]) -> Vec<String> {
    items
        .iter()
        .filter_map(|t| first_non_empty([t.text.as_deref()]))
        .collect()
}

fn maker_name(makers: &[NamedMaker]) -> Option<&str> {
    makers
        .iter()
        .filter_map(|m| m.name.as_ref().and_then(|n| n.text.as_deref()))
        .find(|s| !s.trim().is_empty())
}

/// 例如 "Height: 10 cm; Width: 5 cm"
fn render_dimensions(dimensions: &[Dimension]) -> Option<String> {
    let parts: Vec<String> = dimensions
        .iter()
        .filter_map(|d| {
            let value = first_non_empty([d.value.as_deref()])?;
            let mut part = match first_non_empty([d.dimension.as_deref()]) {
                Some(name) => format!("{}: {}", name, value),
                None => value,
            };
            if let Some(unit) = first_non_empty([d.unit.as_deref()]) {
                part.push(' ');
                part.push_str(&unit);
            }
            Some(part)
        })
        .collect();
    (!parts.is_empty()).then(|| parts.join("; "))
}

impl From<SearchRecord> for Artwork {
    fn from(r: SearchRecord) -> Self {
        let summary = [r.primary_date.as_deref(), r.primary_place.as_deref()]
            .into_iter()
            .filter_map(|s| first_non_empty([s]))
            .collect::<Vec<_>>()
            .join(", ");

        Artwork {
            id: r.system_number.unwrap_or_else(|| UNKNOWN.to_string()),
            title: first_non_empty([r.primary_title.as_deref()])
                .unwrap_or_else(|| "Untitled".to_string()),
            artist: first_non_empty([r.primary_maker.as_ref().and_then(|m| m.name.as_deref())])
                .unwrap_or_else(|| UNKNOWN.to_string()),
            img_url: thumbnail(r.images.as_ref()),
            medium: first_non_empty([r.object_type.as_deref()])
                .unwrap_or_else(|| UNKNOWN.to_string()),
            dimensions: UNKNOWN.to_string(),
            techniques: vec![UNKNOWN.to_string()],
            summary: if summary.is_empty() {
                NO_DESCRIPTION.to_string()
            } else {
                summary
            },
            source: VAM_LABEL.to_string(),
        }
    }
}

impl ObjectRecord {
    fn into_artwork(self, images: Option<&Images>) -> Artwork {
        let materials = terms(&self.materials);
        let materials = (!materials.is_empty()).then(|| materials.join(", "));
        let mut techniques = terms(&self.techniques);
        if techniques.is_empty() {
            techniques.push(
                first_non_empty([self.materials_and_techniques.as_deref()])
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            );
        }

        Artwork {
            id: self
                .system_number
                .clone()
                .unwrap_or_else(|| UNKNOWN.to_string()),
            title: first_non_empty(self.titles.iter().map(|t| t.title.as_deref()))
                .unwrap_or_else(|| "Untitled".to_string()),
            artist: first_non_empty([
                maker_name(&self.artist_maker_person),
                maker_name(&self.artist_maker_organisations),
            ])
            .unwrap_or_else(|| UNKNOWN.to_string()),
            img_url: thumbnail(images),
            medium: first_non_empty([
                self.materials_and_techniques.as_deref(),
                materials.as_deref(),
            ])
            .unwrap_or_else(|| UNKNOWN.to_string()),
            dimensions: render_dimensions(&self.dimensions).unwrap_or_else(|| UNKNOWN.to_string()),
            techniques,
            summary: first_non_empty([
                self.summary_description.as_deref(),
                self.brief_description.as_deref(),
                self.physical_description.as_deref(),
            ])
            .unwrap_or_else(|| NO_DESCRIPTION.to_string()),
            source: VAM_LABEL.to_string(),
        }
    }
}

/// V&A Collections API v2 客户端
///
/// 搜索接口按页（`page` + `page_size`）取记录；作品 ID 为 systemNumber，如 `O1234`。
#[derive(Clone)]
pub struct VamClient {
    client: Client,
    base_url: String,
}

impl VamClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ArtworkSource for VamClient {
    fn label(&self) -> &'static str {
        VAM_LABEL
    }

    fn accepts_id(&self, id: &str) -> bool {
        id.chars().all(|c| c.is_ascii_alphanumeric()) && id.chars().any(|c| c.is_ascii_alphabetic())
    }

    async fn search(&self, query: &SourceQuery) -> Result<Vec<Artwork>, SourceError> {
        let q = query.search.as_deref().unwrap_or(DEFAULT_QUERY);
        let page_size = query.window.clamp(1, MAX_PAGE_SIZE);
        let params = [
            ("q", q.to_string()),
            ("page", "1".to_string()),
            ("page_size", page_size.to_string()),
            ("images_exist", "1".to_string()),
        ];

        let url = format!("{}/objects/search", self.base_url);
        let response: SearchResponse = get_json(&self.client, &url, &params).await?;
        Ok(response.records.into_iter().map(Artwork::from).collect())
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Artwork, SourceError> {
        let url = format!("{}/object/{}", self.base_url, id);
        let response: ObjectResponse = get_json(&self.client, &url, &[] as &[(&str, &str)]).await?;
        let images = response.meta.as_ref().and_then(|m| m.images.as_ref());
        response
            .record
            .map(|r| r.into_artwork(images))
            .ok_or(SourceError::NotFound)
    }
}
