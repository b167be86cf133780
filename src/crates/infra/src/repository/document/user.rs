use super::DocumentStore;
use application::query::dao::UserDao;
use application::query::QueryError;
use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use domain::user::{Collections, User, UserError, UserRepository};
use domain::value::{ArtworkId, UserId};
use indexmap::IndexMap;
use log::warn;
use model::user::UserView;
use serde::{Deserialize, Serialize};

/// 存储在 sled 中的用户文档
#[derive(Debug, Clone, Serialize, Deserialize)]
struct UserDocument {
    id: String,
    name: String,
    #[serde(default)]
    collections: IndexMap<String, Vec<String>>,
    #[serde(default = "now")]
    created_at: NaiveDateTime,
    #[serde(default)]
    version: i64,
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

impl From<&User> for UserDocument {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            name: user.name.clone(),
            collections: user
                .collections
                .iter()
                .map(|(name, ids)| (name.clone(), ids.iter().map(|id| id.to_string()).collect()))
                .collect(),
            created_at: user.created_at,
            version: user.version,
        }
    }
}

impl From<UserDocument> for User {
    /// 旧数据中可能有空字符串或重复的作品 ID，加载时剔除，下次保存即被清理
    fn from(doc: UserDocument) -> Self {
        let mut collections = Collections::new();
        for (name, raw_ids) in doc.collections {
            let mut ids: Vec<ArtworkId> = Vec::with_capacity(raw_ids.len());
            for raw in raw_ids {
                match ArtworkId::try_from(raw) {
                    Ok(id) if !ids.contains(&id) => ids.push(id),
                    Ok(id) => warn!("dropping duplicate artwork {} in '{}' of user {}", id, name, doc.id),
                    Err(_) => warn!("dropping blank artwork id in '{}' of user {}", name, doc.id),
                }
            }
            collections.insert(name, ids);
        }

        User {
            id: UserId::from(doc.id),
            name: doc.name,
            collections,
            created_at: doc.created_at,
            version: doc.version,
        }
    }
}

fn to_view(user: &User) -> UserView {
    let doc = UserDocument::from(user);
    UserView {
        id: doc.id,
        name: doc.name,
        collections: doc.collections,
    }
}

fn decode(bytes: &[u8]) -> Result<UserDocument, UserError> {
    serde_json::from_slice(bytes).map_err(|e| UserError::DbErr(format!("corrupt user document: {}", e)))
}

#[derive(Clone)]
pub struct SledUserRepository {
    store: DocumentStore,
}

impl SledUserRepository {
    pub fn new(store: DocumentStore) -> Self {
        Self { store }
    }

    fn load(&self, id: &str) -> Result<Option<User>, UserError> {
        let value = self
            .store
            .users()
            .get(id.as_bytes())
            .map_err(|e| UserError::DbErr(e.to_string()))?;
        value.map(|bytes| decode(&bytes).map(User::from)).transpose()
    }

    fn load_all(&self) -> Result<Vec<User>, UserError> {
        let mut users = Vec::new();
        for entry in self.store.users().iter() {
            let (_, bytes) = entry.map_err(|e| UserError::DbErr(e.to_string()))?;
            users.push(User::from(decode(&bytes)?));
        }
        users.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        Ok(users)
    }
}

#[async_trait]
impl UserRepository for SledUserRepository {
    async fn count(&self) -> Result<u64, UserError> {
        Ok(self.store.users().len() as u64)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        self.load(id.as_str())
    }

    /// 乐观锁保存：存储中的 version 必须等于聚合的 version，
    /// 写入时用 compare-and-swap 防止两次读取之间被其它请求改写
    async fn save(&self, user: &mut User) -> Result<(), UserError> {
        let tree = self.store.users();
        let key = user.id.as_str().as_bytes();

        let current = tree.get(key).map_err(|e| UserError::DbErr(e.to_string()))?;
        let stored_version = match &current {
            Some(bytes) => decode(bytes)?.version,
            None => 0,
        };
        if stored_version != user.version {
            return Err(UserError::VersionConflictErr(user.version));
        }

        let mut doc = UserDocument::from(&*user);
        doc.version = user.version + 1;
        let bytes = serde_json::to_vec(&doc).map_err(|e| UserError::DbErr(e.to_string()))?;

        tree.compare_and_swap(key, current.as_ref(), Some(bytes))
            .map_err(|e| UserError::DbErr(e.to_string()))?
            .map_err(|_| UserError::VersionConflictErr(user.version))?;

        user.version = doc.version;
        Ok(())
    }
}

#[async_trait]
impl UserDao for SledUserRepository {
    async fn list(&self) -> Result<Vec<UserView>, QueryError> {
        let users = self
            .load_all()
            .map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(users.iter().map(to_view).collect())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<UserView>, QueryError> {
        let user = self.load(id).map_err(|e| QueryError::DbError(e.to_string()))?;
        Ok(user.as_ref().map(to_view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn user(id: &str, name: &str) -> User {
        User::new(UserId::from(id), name)
    }

    #[tokio::test]
    async fn save_and_find_round_trip() {
        let store = DocumentStore::temporary().unwrap();
        let repo = SledUserRepository::new(store);

        let mut ada = user("u1", "Ada");
        ada.create_collection("favourites").unwrap();
        ada.add_artwork("favourites", ArtworkId::try_from("O1").unwrap())
            .unwrap();
        repo.save(&mut ada).await.unwrap();
        assert_eq!(ada.version, 1);

        let found = repo.find_by_id(&UserId::from("u1")).await.unwrap().unwrap();
        assert_eq!(found.name, "Ada");
        assert_eq!(found.version, 1);
        assert_eq!(found.collection("favourites").unwrap()[0].as_str(), "O1");
        assert!(repo.find_by_id(&UserId::from("u2")).await.unwrap().is_none());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn stale_copy_is_rejected() {
        let repo = SledUserRepository::new(DocumentStore::temporary().unwrap());
        let mut original = user("u1", "Ada");
        repo.save(&mut original).await.unwrap();

        let mut first = repo.find_by_id(&UserId::from("u1")).await.unwrap().unwrap();
        let mut second = first.clone();

        first.create_collection("a").unwrap();
        repo.save(&mut first).await.unwrap();

        second.create_collection("b").unwrap();
        let err = repo.save(&mut second).await.unwrap_err();
        assert!(matches!(err, UserError::VersionConflictErr(1)));

        let stored = repo.find_by_id(&UserId::from("u1")).await.unwrap().unwrap();
        assert!(stored.collection("a").is_some());
        assert!(stored.collection("b").is_none());
    }

    #[tokio::test]
    async fn legacy_documents_are_cleaned_on_load() {
        let store = DocumentStore::temporary().unwrap();
        let legacy = serde_json::json!({
            "id": "legacy",
            "name": "Old Timer",
            "collections": {"favourites": ["", "O1", "O1", "42"]}
        });
        store
            .users()
            .insert("legacy", serde_json::to_vec(&legacy).unwrap())
            .unwrap();

        let repo = SledUserRepository::new(store);
        let view = UserDao::get_by_id(&repo, "legacy").await.unwrap().unwrap();
        assert_eq!(view.collections["favourites"], vec!["O1", "42"]);

        let mut user = repo.find_by_id(&UserId::from("legacy")).await.unwrap().unwrap();
        assert_eq!(user.version, 0);
        repo.save(&mut user).await.unwrap();
        assert_eq!(user.version, 1);
    }

    #[tokio::test]
    async fn list_orders_by_creation_time() {
        let repo = SledUserRepository::new(DocumentStore::temporary().unwrap());
        let mut b = user("b", "Second");
        let mut a = user("a", "First");
        a.created_at = b.created_at - chrono::Duration::seconds(10);
        repo.save(&mut b).await.unwrap();
        repo.save(&mut a).await.unwrap();

        let names: Vec<String> = UserDao::list(&repo)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["First", "Second"]);
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("db");

        {
            let store = DocumentStore::open(&db_path).unwrap();
            let repo = SledUserRepository::new(store.clone());
            let mut ada = user("u1", "Ada");
            repo.save(&mut ada).await.unwrap();
            store.flush().await.unwrap();
        }

        let repo = SledUserRepository::new(DocumentStore::open(&db_path).unwrap());
        let found = repo.find_by_id(&UserId::from("u1")).await.unwrap();
        assert!(found.is_some());
    }
}
