use crate::query::QueryError;
use async_trait::async_trait;
use model::artwork::Artwork;
use model::user::UserView;
use thiserror::Error;

/// 上游博物馆 API 调用错误
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("record not found")]
    NotFound,
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("decode error: {0}")]
    Decode(String),
}

/// 聚合查询时发给每个上游的请求
#[derive(Debug, Clone, PartialEq)]
pub struct SourceQuery {
    /// 搜索词，None 表示不限
    pub search: Option<String>,
    /// 需要的前 N 条记录
    pub window: u32,
}

/// 上游作品数据源
#[async_trait]
pub trait ArtworkSource: Send + Sync {
    /// 博物馆名称，同时作为 Artwork.source
    fn label(&self) -> &'static str;

    /// 该数据源是否负责此 ID 格式
    fn accepts_id(&self, id: &str) -> bool;

    /// 搜索前 window 条带图记录并归一化
    async fn search(&self, query: &SourceQuery) -> Result<Vec<Artwork>, SourceError>;

    /// 根据 ID 获取单个作品
    async fn fetch_by_id(&self, id: &str) -> Result<Artwork, SourceError>;
}

#[async_trait]
pub trait UserDao: Send + Sync {
    /// 全部用户，按创建时间排序
    async fn list(&self) -> Result<Vec<UserView>, QueryError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<UserView>, QueryError>;
}
