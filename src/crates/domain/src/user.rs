use super::value::{ArtworkId, UserId};
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use indexmap::IndexMap;
use thiserror::Error;

/// 用户领域错误
///
/// 用户及其收藏夹中可能发生的所有错误类型。
#[derive(Error, Debug)]
pub enum UserError {
    #[error("user not found: {0}")]
    UserNotFound(String),
    #[error("collection not found: {0}")]
    CollectionNotFound(String),
    #[error("collection already exists: {0}")]
    CollectionExists(String),
    #[error("artwork {0} already in collection")]
    ArtworkExists(String),
    #[error("invalid collection name: {0:?}")]
    InvalidCollectionName(String),
    #[error("invalid artwork id: {0}")]
    InvalidArtworkId(String),
    #[error("version conflict: {0}")]
    VersionConflictErr(i64),
    #[error("{0}")]
    DbErr(String),
    #[error("{0}")]
    OtherErr(String),
}

/// 收藏夹：名称 -> 有序且不重复的作品 ID 列表
///
/// 使用 IndexMap 保留收藏夹的创建顺序。
pub type Collections = IndexMap<String, Vec<ArtworkId>>;

/// 校验并规范化收藏夹名称（去掉首尾空白，不允许为空）
pub fn collection_name(name: &str) -> Result<String, UserError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(UserError::InvalidCollectionName(name.to_string()));
    }
    Ok(trimmed.to_string())
}

/// 用户聚合根
///
/// 用户拥有若干个命名收藏夹，每个收藏夹是一个有序、无重复的作品 ID 列表。
/// 聚合根负责维护这些不变量，仓储只负责持久化。
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,                  // 不透明的用户标识
    pub name: String,                // 显示名称
    pub collections: Collections,    // 收藏夹
    pub created_at: NaiveDateTime,   // 创建时间
    pub version: i64,                // 当前版本，用于乐观锁
}

impl User {
    pub fn new(id: UserId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            collections: Collections::new(),
            created_at: Utc::now().naive_utc(),
            version: 0,
        }
    }

    pub fn collection(&self, name: &str) -> Option<&Vec<ArtworkId>> {
        self.collections.get(name)
    }

    pub fn has_collections(&self) -> bool {
        !self.collections.is_empty()
    }

    /// 新建一个空收藏夹
    pub fn create_collection(&mut self, name: &str) -> Result<&Collections, UserError> {
        let name = collection_name(name)?;
        if self.collections.contains_key(&name) {
            return Err(UserError::CollectionExists(name));
        }
        self.collections.insert(name, Vec::new());
        Ok(&self.collections)
    }

    /// 向已有收藏夹追加作品
    pub fn add_artwork(
        &mut self,
        name: &str,
        artwork_id: ArtworkId,
    ) -> Result<&[ArtworkId], UserError> {
        let name = collection_name(name)?;
        let collection = self
            .collections
            .get_mut(&name)
            .ok_or(UserError::CollectionNotFound(name))?;

        if collection.contains(&artwork_id) {
            return Err(UserError::ArtworkExists(artwork_id.to_string()));
        }
        collection.push(artwork_id);
        Ok(collection.as_slice())
    }

    /// 从收藏夹移除作品，作品不存在时不报错；返回是否真的移除了
    pub fn remove_artwork(&mut self, name: &str, artwork_id: &ArtworkId) -> Result<bool, UserError> {
        let name = collection_name(name)?;
        let collection = self
            .collections
            .get_mut(&name)
            .ok_or(UserError::CollectionNotFound(name))?;

        let before = collection.len();
        collection.retain(|id| id != artwork_id);
        Ok(collection.len() != before)
    }
}

/// 用户仓储接口
///
/// 由基础设施层实现（文档存储）。
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// 获取用户总数
    async fn count(&self) -> Result<u64, UserError>;

    /// 根据用户ID查找用户
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// 保存用户（创建或更新），成功后 version 自增
    async fn save(&self, user: &mut User) -> Result<(), UserError>;
}
