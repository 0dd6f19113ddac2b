//! 规则服务响应 DTO 定义

use rule_engine::AstNode;
use serde::Serialize;

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self::with_message(data, "操作成功")
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: message.into(),
            data: Some(data),
        }
    }
}

/// 创建规则响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleResponse {
    pub rule_string: String,
    pub ast: AstNode,
    /// 规则引用的字段
    pub fields: Vec<String>,
}

/// 合并规则响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombineRulesResponse {
    pub combined_ast: AstNode,
}

/// 规则求值响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRuleResponse {
    pub result: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evaluation_trace: Option<Vec<String>>,
}
