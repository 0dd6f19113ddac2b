//! 资格规则引擎
//!
//! 将 `age > 30 AND department = 'Sales'` 这类布尔表达式编译为二叉语法树，
//! 支持：
//! - 表达式解析（AND/OR 无优先级，先出现者先拆分，括号分组）
//! - 多条规则按同一连接符左结合合并
//! - 对记录求值（不短路）
//! - 与 `{ nodeType, value, left, right }` 结构互相转换
//!
//! 所有入口都把树深度限制在 [`MAX_TREE_DEPTH`] 以内。

pub mod ast;
pub mod combiner;
pub mod error;
pub mod evaluator;
pub mod json;
pub mod models;
pub mod operators;
pub mod parser;


pub use ast::{AstNode, MAX_TREE_DEPTH, NodeType, WireNode};
pub use combiner::{combine, combine_str};
pub use error::{ErrorKind, Result, RuleError};
pub use evaluator::{ConditionEvaluator, Evaluator, evaluate};
pub use models::{EvaluationReport, FieldValue, Record};
pub use operators::{Comparator, Connective};
pub use parser::parse;
