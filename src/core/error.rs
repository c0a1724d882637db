//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sqlx::error::ErrorKind;
use thiserror::Error;
use tracing::error;

use super::response::ErrorResponse;

/// 对外统一的 5xx 提示，不暴露底层原因
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub type CoreResult<T> = Result<T, CoreError>;

/// 核心错误类型
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    /// 连接池超时、连接关闭、网络或 TLS 失败
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// 唯一键、非空、检查约束等被数据库拒绝
    #[error("constraint violation: {0}")]
    ConstraintViolation(String),

    /// 其余查询失败
    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            // 调用方无法区分输入错误、约束冲突和数据库不可用
            CoreError::ValidationError(_)
            | CoreError::ConstraintViolation(_)
            | CoreError::StorageUnavailable(_)
            | CoreError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            CoreError::NotFound(_) => "Not found",
            other => {
                error!("Request failed: {}", other);
                INTERNAL_ERROR_MESSAGE
            }
        };

        (status, axum::Json(ErrorResponse::new(message))).into_response()
    }
}

impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation
                | ErrorKind::ForeignKeyViolation
                | ErrorKind::NotNullViolation
                | ErrorKind::CheckViolation => {
                    CoreError::ConstraintViolation(db_err.message().to_string())
                }
                _ => CoreError::Storage(err.to_string()),
            },
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_) => CoreError::StorageUnavailable(err.to_string()),
            _ => CoreError::Storage(err.to_string()),
        }
    }
}
