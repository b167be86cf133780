use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 归一化后的作品，由任一上游的原始响应转换而来，不持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub img_url: String,
    pub medium: String,
    pub dimensions: String,
    pub techniques: Vec<String>,
    pub summary: String,
    /// 来源博物馆名称
    pub source: String,
}

impl Artwork {
    pub fn has_image(&self) -> bool {
        !self.img_url.trim().is_empty()
    }
}

/// 聚合分页结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtworkPage {
    pub records: Vec<Artwork>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_records: usize,
}

/// 排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Title,
    Artist,
}

impl SortKey {
    pub fn field<'a>(&self, artwork: &'a Artwork) -> &'a str {
        match self {
            SortKey::Title => &artwork.title,
            SortKey::Artist => &artwork.artist,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Artist => "artist",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(SortKey::Title),
            "artist" => Ok(SortKey::Artist),
            other => Err(format!("unsupported sort key: {}", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
