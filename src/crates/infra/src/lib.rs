pub mod repository;

pub mod id_generator;

pub mod museum;
pub use museum::{cleveland::ClevelandClient, vam::VamClient};

pub mod config;
pub use config::{ServerConfig, StoreConfig, UpstreamConfig};

pub mod normalize;

pub mod seed;
