use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use application::error::AppError;
use application::query::QueryError;
use domain::user::UserError;
use log::error;
use serde_json::json;
use thiserror::Error;

/// HTTP 层错误
///
/// 客户端错误和未找到以 `{"msg": ...}` 返回；依赖故障以 `{"error": ...}` 返回 500，
/// 具体原因只写日志。
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{public}")]
    Dependency { public: String, cause: String },
}

impl ApiError {
    pub fn dependency(public: &str, cause: impl Into<String>) -> Self {
        let cause = cause.into();
        error!("{}: {}", public, cause);
        ApiError::Dependency {
            public: public.to_string(),
            cause,
        }
    }

    /// 查询错误转换；`public` 为依赖故障时返回给客户端的消息
    pub fn from_query(err: QueryError, public: &str) -> Self {
        match err {
            QueryError::InvalidInput(msg) => ApiError::BadRequest(msg),
            QueryError::NotFound(msg) => ApiError::NotFound(msg),
            QueryError::UpstreamError(cause) | QueryError::DbError(cause) => {
                ApiError::dependency(public, cause)
            }
        }
    }

    /// 命令错误转换；`public` 为依赖故障时返回给客户端的消息
    pub fn from_app(err: AppError, public: &str) -> Self {
        match err {
            AppError::InvalidInput(msg) => ApiError::BadRequest(msg),
            AppError::AggregateNotFound(kind, _) => ApiError::NotFound(format!("{} not found", kind)),
            AppError::UserError(user_err) => match user_err {
                UserError::UserNotFound(_) => ApiError::NotFound("User not found".to_string()),
                UserError::CollectionNotFound(name) => {
                    ApiError::NotFound(format!("Collection '{}' not found", name))
                }
                UserError::CollectionExists(name) => {
                    ApiError::BadRequest(format!("Collection '{}' already exists", name))
                }
                UserError::ArtworkExists(_) => {
                    ApiError::BadRequest("Artwork already in collection".to_string())
                }
                UserError::InvalidCollectionName(_) => {
                    ApiError::BadRequest("Invalid collection name".to_string())
                }
                UserError::InvalidArtworkId(_) => {
                    ApiError::BadRequest("Invalid artwork id".to_string())
                }
                other @ (UserError::VersionConflictErr(_)
                | UserError::DbErr(_)
                | UserError::OtherErr(_)) => ApiError::dependency(public, other.to_string()),
            },
            other @ (AppError::RepositoryError(_, _) | AppError::UnknownError(_)) => {
                ApiError::dependency(public, other.to_string())
            }
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Dependency { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            ApiError::BadRequest(msg) | ApiError::NotFound(msg) => json!({ "msg": msg }),
            ApiError::Dependency { public, .. } => json!({ "error": public }),
        };
        HttpResponse::build(self.status_code()).json(body)
    }
}
