//! 基于 sled 的文档存储
//!
//! 每个用户是 `users` 树中的一个 JSON 文档，键为用户 ID。

pub mod user;

use log::info;
use std::path::Path;

const USERS_TREE: &str = "users";

/// 进程级共享的文档存储句柄
///
/// 启动时打开一次，克隆开销很小（内部为 Arc），关闭前调用 `flush`。
#[derive(Clone)]
pub struct DocumentStore {
    db: sled::Db,
    users: sled::Tree,
}

impl DocumentStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, sled::Error> {
        let db = sled::open(path.as_ref())?;
        info!("document store opened at {}", path.as_ref().display());
        Self::from_db(db)
    }

    /// 临时存储，进程退出后删除
    pub fn temporary() -> Result<Self, sled::Error> {
        let db = sled::Config::new().temporary(true).open()?;
        Self::from_db(db)
    }

    fn from_db(db: sled::Db) -> Result<Self, sled::Error> {
        let users = db.open_tree(USERS_TREE)?;
        Ok(Self { db, users })
    }

    pub fn users(&self) -> &sled::Tree {
        &self.users
    }

    /// 将缓冲的写入刷到磁盘
    pub async fn flush(&self) -> Result<usize, sled::Error> {
        self.db.flush_async().await
    }
}
