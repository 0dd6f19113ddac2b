//! 规则引擎错误类型

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuleError {
    #[error("规则解析失败: {0}")]
    Parse(String),

    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("规则树结构无效: {0}")]
    MalformedTree(String),

    #[error("条件格式无效: {0}")]
    MalformedCondition(String),

    #[error("不支持的比较操作符: {0}")]
    UnsupportedOperator(String),

    #[error("不支持的逻辑操作符: {0}")]
    UnsupportedConnective(String),

    #[error("字段不存在: {0}")]
    FieldNotFound(String),

    #[error("类型不匹配: 字段 {field} 期望 {expected}, 实际 {actual}")]
    TypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("无效的数值字面量: {0}")]
    InvalidLiteral(String),

    #[error("JSON 序列化错误: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// 错误分类
///
/// 对外只暴露三类失败：表达式解析失败、合并输入无效、求值失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Parse,
    InvalidInput,
    Eval,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "ParseError"),
            Self::InvalidInput => write!(f, "InvalidInput"),
            Self::Eval => write!(f, "EvalError"),
        }
    }
}

impl RuleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse(_) => ErrorKind::Parse,
            Self::InvalidInput(_) | Self::MalformedTree(_) | Self::JsonError(_) => {
                ErrorKind::InvalidInput
            }
            Self::MalformedCondition(_)
            | Self::UnsupportedOperator(_)
            | Self::UnsupportedConnective(_)
            | Self::FieldNotFound(_)
            | Self::TypeMismatch { .. }
            | Self::InvalidLiteral(_) => ErrorKind::Eval,
        }
    }
}

pub type Result<T> = std::result::Result<T, RuleError>;
