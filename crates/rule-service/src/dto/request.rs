//! 规则服务请求 DTO 定义

use rule_engine::{AstNode, MAX_TREE_DEPTH, RuleError, parse};
use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::Validate;

/// 请求体最大嵌套深度：语法树深度上限加上外层包装
pub const MAX_BODY_NESTING: usize = MAX_TREE_DEPTH + 4;

/// 解码请求体 JSON
///
/// axum 的 `Json` 提取器受 serde_json 默认 128 层递归限制，
/// 合并上百条规则得到的语法树无法回传，因此改用深度受限的解码。
pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, RuleError> {
    rule_engine::json::from_slice_bounded(body, MAX_BODY_NESTING)
}

/// 创建规则请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateRuleRequest {
    #[validate(length(min = 1, max = 4096, message = "规则字符串长度必须在1-4096个字符之间"))]
    pub rule_string: String,
}

/// 待合并的单条规则：优先使用已编译的 ast，否则解析 ruleString
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RuleInput {
    #[serde(default)]
    pub ast: Option<Value>,
    #[serde(default)]
    #[validate(length(min = 1, max = 4096, message = "规则字符串长度必须在1-4096个字符之间"))]
    pub rule_string: Option<String>,
}

impl RuleInput {
    pub fn into_ast(self) -> Result<AstNode, RuleError> {
        match (self.ast, self.rule_string) {
            (Some(ast), _) => AstNode::from_value(ast),
            (None, Some(rule_string)) => parse(&rule_string),
            (None, None) => Err(RuleError::InvalidInput(
                "每条规则必须提供 ast 或 ruleString".into(),
            )),
        }
    }
}

/// 合并规则请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CombineRulesRequest {
    /// 上限与 MAX_TREE_DEPTH 一致，少于两条由合并本身报 InvalidInput
    #[validate(length(max = 256, message = "一次最多合并256条规则"), nested)]
    pub rules: Vec<RuleInput>,
    /// AND 或 OR
    pub operator: String,
}

/// 规则求值请求
///
/// ast 和 data 保持原始 JSON，转换失败按规则错误返回
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRuleRequest {
    pub ast: Value,
    pub data: Value,
}

/// 求值查询参数
#[derive(Debug, Default, Deserialize)]
pub struct EvaluateQuery {
    /// 是否返回评估追踪
    #[serde(default)]
    pub trace: bool,
}
