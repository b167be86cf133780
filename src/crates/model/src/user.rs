use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 用户读模型
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub collections: IndexMap<String, Vec<String>>,
}

/// 用户收藏夹查询结果
#[derive(Debug, Clone)]
pub enum UserCollections {
    /// 用户至少有一个收藏夹
    Found {
        username: String,
        collections: IndexMap<String, Vec<String>>,
    },
    /// 用户存在但没有任何收藏夹
    Empty,
}
