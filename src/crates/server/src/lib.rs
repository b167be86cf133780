pub mod api;
pub mod consts;
pub mod error;
pub mod middleware;

use application::command::collection::CollectionAppService;
use application::command::shared::IdGenerator;
use application::command::user::UserAppService;
use application::query::dao::{ArtworkSource, UserDao};
use application::query::get_artwork::GetArtwork;
use application::query::get_artworks::GetArtworks;
use application::query::get_users::GetUsers;
use application::query::shared::SortKeyNormalizer;
use domain::user::UserRepository;
use infra::config::AppConfigImpl;
use infra::id_generator::SnowflakeIdGenerator;
use infra::museum::build_http_client;
use infra::normalize::SortKeyNormalizerImpl;
use infra::repository::document::user::SledUserRepository;
use infra::repository::document::DocumentStore;
use infra::seed::load_seed_file;
use infra::{ClevelandClient, VamClient};
use std::io;
use std::sync::Arc;

pub struct AppState {
    pub app_cfg: AppConfigImpl,
    pub store: DocumentStore,
    pub id_generator: Arc<dyn IdGenerator>,
    pub vam: Arc<dyn ArtworkSource>,
    pub cleveland: Arc<dyn ArtworkSource>,
    pub sort_normalizer: Arc<dyn SortKeyNormalizer>,
}

impl AppState {
    pub fn init_store(app_cfg: &AppConfigImpl) -> io::Result<DocumentStore> {
        let path = app_cfg.store().db_path();
        DocumentStore::open(&path).map_err(|e| {
            io::Error::other(format!(
                "failed to open document store at {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// 使用真实的博物馆客户端
    pub fn new(store: DocumentStore, app_cfg: AppConfigImpl) -> io::Result<Self> {
        let upstream = app_cfg.upstream();
        let client = build_http_client(&upstream.user_agent).map_err(io::Error::other)?;
        let vam: Arc<dyn ArtworkSource> =
            Arc::new(VamClient::new(client.clone(), upstream.vam_base_url));
        let cleveland: Arc<dyn ArtworkSource> =
            Arc::new(ClevelandClient::new(client, upstream.cma_base_url));
        Self::with_sources(store, app_cfg, vam, cleveland)
    }

    /// 指定作品来源，测试中用于替换上游
    pub fn with_sources(
        store: DocumentStore,
        app_cfg: AppConfigImpl,
        vam: Arc<dyn ArtworkSource>,
        cleveland: Arc<dyn ArtworkSource>,
    ) -> io::Result<Self> {
        let id_generator: Arc<dyn IdGenerator> =
            Arc::new(SnowflakeIdGenerator::new(1).map_err(io::Error::other)?);
        Ok(Self {
            app_cfg,
            store,
            id_generator,
            vam,
            cleveland,
            sort_normalizer: Arc::new(SortKeyNormalizerImpl::new()),
        })
    }

    fn user_repository(&self) -> Arc<SledUserRepository> {
        Arc::new(SledUserRepository::new(self.store.clone()))
    }

    pub fn get_artworks(&self) -> GetArtworks {
        GetArtworks::new(
            self.vam.clone(),
            self.cleveland.clone(),
            self.sort_normalizer.clone(),
            self.app_cfg.upstream().max_window,
        )
    }

    pub fn get_artwork(&self) -> GetArtwork {
        GetArtwork::new(vec![self.cleveland.clone(), self.vam.clone()])
    }

    pub fn get_users(&self) -> GetUsers {
        let dao: Arc<dyn UserDao> = self.user_repository();
        GetUsers::new(dao)
    }

    pub fn collection_service(&self) -> CollectionAppService {
        let repo: Arc<dyn UserRepository> = self.user_repository();
        CollectionAppService::new(repo)
    }

    pub fn user_service(&self) -> UserAppService {
        let repo: Arc<dyn UserRepository> = self.user_repository();
        UserAppService::new(repo, self.id_generator.clone())
    }
}

/// 存储为空且配置了种子文件时，导入初始用户
pub async fn seed_users(state: &AppState) {
    use log::{info, warn};

    let Some(seed_file) = state.app_cfg.store().seed_file else {
        return;
    };

    let user_service = state.user_service();
    match user_service.count().await {
        Ok(0) => info!("Document store is empty, seeding users from {}", seed_file),
        Ok(n) => {
            info!("Document store already holds {} users, skipping seed", n);
            return;
        }
        Err(e) => {
            warn!("Failed to count users: {}", e);
            return;
        }
    }

    let commands = match load_seed_file(&seed_file) {
        Ok(commands) => commands,
        Err(e) => {
            warn!("{}: {}", seed_file, e);
            return;
        }
    };

    let mut created = 0;
    for cmd in commands {
        let name = cmd.name.clone();
        match user_service.create_user(cmd).await {
            Ok(user) => {
                info!("Seeded user {} ({})", user.name, user.id);
                created += 1;
            }
            Err(e) => warn!("Failed to seed user '{}': {}", name, e),
        }
    }
    info!("Seeded {} users", created);
}
