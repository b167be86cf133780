use super::shared::IdGenerator;
use crate::error::AppError;
use domain::user::{User, UserRepository};
use domain::value::{ArtworkId, UserId};
use log::warn;
use std::sync::Arc;

/// 创建用户命令（启动时的种子数据使用）
#[derive(Debug, Default)]
pub struct CreateUserCmd {
    pub name: String,
    pub collections: Vec<(String, Vec<String>)>,
}

/// 用户应用服务
pub struct UserAppService {
    user_repository: Arc<dyn UserRepository>,
    id_generator: Arc<dyn IdGenerator>,
}

impl UserAppService {
    pub fn new(user_repository: Arc<dyn UserRepository>, id_generator: Arc<dyn IdGenerator>) -> Self {
        Self {
            user_repository,
            id_generator,
        }
    }

    pub async fn count(&self) -> Result<u64, AppError> {
        Ok(self.user_repository.count().await?)
    }

    /// 创建用户；收藏夹中的重复或空白作品 ID 会被跳过
    pub async fn create_user(&self, cmd: CreateUserCmd) -> Result<User, AppError> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("user name is required".to_string()));
        }

        let user_id = UserId::from(self.id_generator.next_id().await?);
        let mut user = User::new(user_id, name);

        for (collection, artwork_ids) in cmd.collections {
            user.create_collection(&collection)?;
            for raw_id in artwork_ids {
                let Ok(artwork_id) = ArtworkId::try_from(raw_id.as_str()) else {
                    warn!("skipping blank artwork id in collection '{}'", collection);
                    continue;
                };
                if let Err(e) = user.add_artwork(&collection, artwork_id) {
                    warn!("skipping artwork in collection '{}': {}", collection, e);
                }
            }
        }

        self.user_repository.save(&mut user).await?;
        Ok(user)
    }
}
