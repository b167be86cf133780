use thiserror::Error;

pub mod dao;
pub mod get_artwork;
pub mod get_artworks;
pub mod get_users;
pub mod shared;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Upstream error: {0}")]
    UpstreamError(String),
    #[error("Database error: {0}")]
    DbError(String),
}
