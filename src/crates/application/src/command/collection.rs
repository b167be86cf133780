use crate::error::AppError;
use domain::user::{collection_name, User, UserError, UserRepository};
use domain::value::{ArtworkId, UserId};
use indexmap::IndexMap;
use log::info;
use std::sync::Arc;

/// 新建收藏夹命令
#[derive(Debug)]
pub struct CreateCollectionCmd {
    pub user_id: String,
    pub collection_name: String,
}

/// 收藏夹内增删作品命令
#[derive(Debug)]
pub struct CollectionArtworkCmd {
    pub user_id: String,
    pub collection_name: String,
    pub artwork_id: String,
}

/// 收藏夹应用服务
///
/// 每个命令都是对单个用户文档的读取-修改-保存，并发冲突由仓储的乐观锁拒绝。
pub struct CollectionAppService {
    user_repository: Arc<dyn UserRepository>,
}

impl CollectionAppService {
    pub fn new(user_repository: Arc<dyn UserRepository>) -> Self {
        Self { user_repository }
    }

    async fn load_user(&self, user_id: &str) -> Result<User, AppError> {
        self.user_repository
            .find_by_id(&UserId::from(user_id))
            .await?
            .ok_or_else(|| AppError::UserError(UserError::UserNotFound(user_id.to_string())))
    }

    /// 新建收藏夹，返回用户全部收藏夹
    pub async fn create_collection(
        &self,
        cmd: CreateCollectionCmd,
    ) -> Result<IndexMap<String, Vec<String>>, AppError> {
        let name = collection_name(&cmd.collection_name)?;
        let mut user = self.load_user(&cmd.user_id).await?;

        user.create_collection(&name)?;
        self.user_repository.save(&mut user).await?;
        info!("user {} created collection '{}'", user.id, name);

        Ok(collections_view(&user))
    }

    /// 向收藏夹添加作品，返回更新后的列表
    pub async fn add_artwork(&self, cmd: CollectionArtworkCmd) -> Result<Vec<String>, AppError> {
        let artwork_id = ArtworkId::try_from(cmd.artwork_id.as_str())
            .map_err(|_| UserError::InvalidArtworkId(cmd.artwork_id.clone()))?;
        let name = collection_name(&cmd.collection_name)?;
        let mut user = self.load_user(&cmd.user_id).await?;

        let updated: Vec<String> = user
            .add_artwork(&name, artwork_id)?
            .iter()
            .map(|id| id.to_string())
            .collect();
        self.user_repository.save(&mut user).await?;

        Ok(updated)
    }

    /// 从收藏夹移除作品；作品本就不在收藏夹中时也视为成功
    pub async fn remove_artwork(&self, cmd: CollectionArtworkCmd) -> Result<(), AppError> {
        let artwork_id = ArtworkId::try_from(cmd.artwork_id.as_str())
            .map_err(|_| UserError::InvalidArtworkId(cmd.artwork_id.clone()))?;
        let name = collection_name(&cmd.collection_name)?;
        let mut user = self.load_user(&cmd.user_id).await?;

        if user.remove_artwork(&name, &artwork_id)? {
            self.user_repository.save(&mut user).await?;
        }
        Ok(())
    }
}

fn collections_view(user: &User) -> IndexMap<String, Vec<String>> {
    user.collections
        .iter()
        .map(|(name, ids)| (name.clone(), ids.iter().map(|id| id.to_string()).collect()))
        .collect()
}
