use crate::query::dao::UserDao;
use crate::query::QueryError;
use model::user::{UserCollections, UserView};
use std::sync::Arc;

pub const USER_NOT_FOUND: &str = "User not found";

/// 用户及收藏夹查询服务
#[derive(Clone)]
pub struct GetUsers {
    user_dao: Arc<dyn UserDao>,
}

impl GetUsers {
    pub fn new(user_dao: Arc<dyn UserDao>) -> Self {
        Self { user_dao }
    }

    pub async fn list(&self) -> Result<Vec<UserView>, QueryError> {
        self.user_dao.list().await
    }

    async fn get_user(&self, user_id: &str) -> Result<UserView, QueryError> {
        self.user_dao
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| QueryError::NotFound(USER_NOT_FOUND.to_string()))
    }

    /// 用户全部收藏夹
    pub async fn get_collections(&self, user_id: &str) -> Result<UserCollections, QueryError> {
        let user = self.get_user(user_id).await?;
        if user.collections.is_empty() {
            return Ok(UserCollections::Empty);
        }
        Ok(UserCollections::Found {
            username: user.name,
            collections: user.collections,
        })
    }

    /// 单个收藏夹；不存在与为空都返回 NotFound，只是消息不同
    pub async fn get_collection(
        &self,
        user_id: &str,
        collection_name: &str,
    ) -> Result<Vec<String>, QueryError> {
        let name = domain::user::collection_name(collection_name)
            .map_err(|_| QueryError::NotFound(format!("Collection '{}' not found", collection_name)))?;
        let mut user = self.get_user(user_id).await?;
        let collection = user
            .collections
            .shift_remove(&name)
            .ok_or_else(|| QueryError::NotFound(format!("Collection '{}' not found", name)))?;

        if collection.is_empty() {
            return Err(QueryError::NotFound(format!("No artwork found in '{}'", name)));
        }
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use indexmap::IndexMap;

    struct FixedUsers(Vec<UserView>);

    #[async_trait]
    impl UserDao for FixedUsers {
        async fn list(&self) -> Result<Vec<UserView>, QueryError> {
            Ok(self.0.clone())
        }

        async fn get_by_id(&self, id: &str) -> Result<Option<UserView>, QueryError> {
            Ok(self.0.iter().find(|u| u.id == id).cloned())
        }
    }

    fn service() -> GetUsers {
        let mut collections = IndexMap::new();
        collections.insert("favourites".to_string(), vec!["O1".to_string(), "42".to_string()]);
        collections.insert("later".to_string(), vec![]);
        GetUsers::new(Arc::new(FixedUsers(vec![
            UserView {
                id: "u1".to_string(),
                name: "Ada".to_string(),
                collections,
            },
            UserView {
                id: "u2".to_string(),
                name: "Grace".to_string(),
                collections: IndexMap::new(),
            },
        ])))
    }

    #[tokio::test]
    async fn lists_all_users() {
        assert_eq!(service().list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn missing_user_is_not_found() {
        let err = service().get_collections("nobody").await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(msg) if msg == USER_NOT_FOUND));
    }

    #[tokio::test]
    async fn user_without_collections_is_empty() {
        assert!(matches!(
            service().get_collections("u2").await.unwrap(),
            UserCollections::Empty
        ));
        match service().get_collections("u1").await.unwrap() {
            UserCollections::Found { username, collections } => {
                assert_eq!(username, "Ada");
                assert_eq!(collections.len(), 2);
            }
            UserCollections::Empty => panic!("expected collections"),
        }
    }

    #[tokio::test]
    async fn empty_and_missing_collections_have_distinct_messages() {
        let svc = service();
        let err = svc.get_collection("u1", "later").await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(msg) if msg == "No artwork found in 'later'"));

        let err = svc.get_collection("u1", "gone").await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(msg) if msg == "Collection 'gone' not found"));

        assert_eq!(svc.get_collection("u1", "favourites").await.unwrap(), vec!["O1", "42"]);
    }

    #[tokio::test]
    async fn collection_names_are_trimmed_like_writes() {
        let svc = service();
        assert_eq!(svc.get_collection("u1", " favourites ").await.unwrap(), vec!["O1", "42"]);

        let err = svc.get_collection("u1", "   ").await.unwrap_err();
        assert!(matches!(err, QueryError::NotFound(_)));
    }
}
