//! 规则服务错误类型定义

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use rule_engine::{ErrorKind, RuleError};
use serde_json::json;

/// 规则服务错误类型
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error(transparent)]
    Rule(#[from] RuleError),
}

impl ServiceError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Rule(e) => match e.kind() {
                ErrorKind::Parse | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::Eval => StatusCode::UNPROCESSABLE_ENTITY,
            },
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Rule(e) => match e.kind() {
                ErrorKind::Parse => "PARSE_ERROR",
                ErrorKind::InvalidInput => "INVALID_INPUT",
                ErrorKind::Eval => "EVAL_ERROR",
            },
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        tracing::warn!(code = self.error_code(), error = %self, "请求处理失败");

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": self.to_string(),
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 服务层 Result 类型别名
pub type Result<T> = std::result::Result<T, ServiceError>;
