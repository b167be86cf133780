use config::{Config, Environment, File};
use dotenvy::dotenv;
use serde::Deserialize;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

/// V&A 公开 API
pub const VAM_BASE_URL: &str = "https://api.vam.ac.uk/v2";
/// 克利夫兰艺术博物馆公开 API
pub const CMA_BASE_URL: &str = "https://openaccess-api.clevelandart.org/api";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    /// 服务器配置
    server: RawServerConfig,
    /// 文档存储配置
    store: RawStoreConfig,
    /// 上游博物馆 API 配置
    upstream: RawUpstreamConfig,
}

/// 服务器配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawServerConfig {
    /// 监听地址
    host: String,
    /// 监听端口
    port: u16,
}

impl Default for RawServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 9091,
        }
    }
}

/// 文档存储配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawStoreConfig {
    /// sled 数据库目录
    path: String,
    /// 种子用户 JSON 文件，空字符串表示不导入
    seed_file: String,
}

impl Default for RawStoreConfig {
    fn default() -> Self {
        Self {
            path: "./data/gallery".to_string(),
            seed_file: "".to_string(),
        }
    }
}

/// 上游配置（原始配置）
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawUpstreamConfig {
    vam_base_url: String,
    cma_base_url: String,
    /// 每次聚合向每个上游请求的最大记录数
    max_window: u32,
    user_agent: String,
}

impl Default for RawUpstreamConfig {
    fn default() -> Self {
        Self {
            vam_base_url: VAM_BASE_URL.to_string(),
            cma_base_url: CMA_BASE_URL.to_string(),
            max_window: 100,
            user_agent: concat!("gallery/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// 监听地址
    pub host: String,
    /// 监听端口
    pub port: u16,
}

/// 文档存储配置
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub path: String,
    pub seed_file: Option<String>,
}

impl StoreConfig {
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }
}

/// 上游博物馆 API 配置
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub vam_base_url: String,
    pub cma_base_url: String,
    pub max_window: u32,
    pub user_agent: String,
}

#[derive(Debug, Clone)]
pub struct AppConfigImpl {
    pub server: Arc<RwLock<ServerConfig>>,
    pub store: Arc<RwLock<StoreConfig>>,
    pub upstream: Arc<RwLock<UpstreamConfig>>,
}

impl Default for AppConfigImpl {
    fn default() -> Self {
        AppConfigImpl::new(RawConfig::default())
    }
}

impl AppConfigImpl {
    fn new(data: RawConfig) -> Self {
        let server_config = ServerConfig {
            host: data.server.host,
            port: data.server.port,
        };
        let seed_file = Some(data.store.seed_file.trim().to_string()).filter(|s| !s.is_empty());
        let store_config = StoreConfig {
            path: data.store.path,
            seed_file,
        };
        let upstream_config = UpstreamConfig {
            vam_base_url: data.upstream.vam_base_url.trim_end_matches('/').to_string(),
            cma_base_url: data.upstream.cma_base_url.trim_end_matches('/').to_string(),
            max_window: data.upstream.max_window.max(1),
            user_agent: data.upstream.user_agent,
        };
        AppConfigImpl {
            server: Arc::new(RwLock::new(server_config)),
            store: Arc::new(RwLock::new(store_config)),
            upstream: Arc::new(RwLock::new(upstream_config)),
        }
    }

    pub fn load() -> Result<AppConfigImpl, Box<dyn Error>> {
        dotenv().ok();

        let config = Config::builder()
            .add_source(File::with_name("config").required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        let raw: RawConfig = config.try_deserialize()?; // serde 自动填充默认值
        Ok(AppConfigImpl::new(raw))
    }

    pub fn server(&self) -> ServerConfig {
        let cfg_val = self.server.read().unwrap();
        cfg_val.clone()
    }

    pub fn store(&self) -> StoreConfig {
        let cfg_val = self.store.read().unwrap();
        cfg_val.clone()
    }

    pub fn upstream(&self) -> UpstreamConfig {
        let cfg_val = self.upstream.read().unwrap();
        cfg_val.clone()
    }
}
