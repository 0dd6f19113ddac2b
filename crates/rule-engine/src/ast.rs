//! 规则语法树
//!
//! 二叉树结构：叶子节点为条件字符串，内部节点为 AND/OR 连接符。
//! 树构建后不可变，子树通过 `Arc` 共享，合并规则时无需深拷贝。

use crate::error::{Result, RuleError};
use crate::json;
use crate::operators::Connective;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// 语法树最大深度（单个叶子为 1）
///
/// 解析、合并和结构表示解码都会拒绝更深的树，求值与序列化因此可以安全递归。
/// 左结合合并 n 条单条件规则得到深度 n 的树，即最多合并 256 条。
pub const MAX_TREE_DEPTH: usize = 256;

/// 语法树节点
///
/// 通过 serde 直接反序列化时受 serde_json 默认 128 层递归限制，
/// 深层树请使用 [`AstNode::from_json`]。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "WireNode", try_from = "WireNode")]
pub enum AstNode {
    /// 条件叶子，如 "age > 30"
    Operand { condition: String },
    /// 逻辑连接节点
    Operator {
        connective: Connective,
        left: Arc<AstNode>,
        right: Arc<AstNode>,
    },
}

impl AstNode {
    pub fn operand(condition: impl Into<String>) -> Self {
        Self::Operand {
            condition: condition.into(),
        }
    }

    pub fn operator(
        connective: Connective,
        left: impl Into<Arc<AstNode>>,
        right: impl Into<Arc<AstNode>>,
    ) -> Self {
        Self::Operator {
            connective,
            left: left.into(),
            right: right.into(),
        }
    }

    pub fn and(left: impl Into<Arc<AstNode>>, right: impl Into<Arc<AstNode>>) -> Self {
        Self::operator(Connective::And, left, right)
    }

    pub fn or(left: impl Into<Arc<AstNode>>, right: impl Into<Arc<AstNode>>) -> Self {
        Self::operator(Connective::Or, left, right)
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Self::Operand { .. })
    }

    /// 叶子节点的条件字符串
    pub fn condition(&self) -> Option<&str> {
        match self {
            Self::Operand { condition } => Some(condition),
            Self::Operator { .. } => None,
        }
    }

    pub fn connective(&self) -> Option<Connective> {
        match self {
            Self::Operator { connective, .. } => Some(*connective),
            Self::Operand { .. } => None,
        }
    }

    pub fn left(&self) -> Option<&AstNode> {
        match self {
            Self::Operator { left, .. } => Some(left),
            Self::Operand { .. } => None,
        }
    }

    pub fn right(&self) -> Option<&AstNode> {
        match self {
            Self::Operator { right, .. } => Some(right),
            Self::Operand { .. } => None,
        }
    }

    /// 树的深度（单个叶子为 1）
    pub fn depth(&self) -> usize {
        match self {
            Self::Operand { .. } => 1,
            Self::Operator { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    /// 叶子条件数量
    pub fn operand_count(&self) -> usize {
        match self {
            Self::Operand { .. } => 1,
            Self::Operator { left, right, .. } => left.operand_count() + right.operand_count(),
        }
    }

    /// 树中引用的所有字段名（取每个条件的第一段）
    pub fn fields(&self) -> BTreeSet<&str> {
        let mut fields = BTreeSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields<'a>(&'a self, fields: &mut BTreeSet<&'a str>) {
        match self {
            Self::Operand { condition } => {
                if let Some(field) = condition.split(' ').next().filter(|f| !f.is_empty()) {
                    fields.insert(field);
                }
            }
            Self::Operator { left, right, .. } => {
                left.collect_fields(fields);
                right.collect_fields(fields);
            }
        }
    }

    /// 从 JSON 结构表示反序列化，支持到 [`MAX_TREE_DEPTH`] 层
    pub fn from_json(json: &str) -> Result<Self> {
        let wire: WireNode = json::from_slice_bounded(json.as_bytes(), MAX_TREE_DEPTH)?;
        Self::try_from(wire)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let depth = json::value_depth(&value);
        if depth > MAX_TREE_DEPTH {
            return Err(RuleError::MalformedTree(format!(
                "树深度 {} 超过上限 {}",
                depth, MAX_TREE_DEPTH
            )));
        }
        let wire = WireNode::deserialize(serde_stacker::Deserializer::new(value))?;
        Self::try_from(wire)
    }

    /// 序列化为 JSON 结构表示
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&WireNode::from(self))?)
    }
}

/// 渲染为完整加括号的表达式，可被解析器重新解析为同一棵树
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Operand { condition } => f.write_str(condition),
            Self::Operator {
                connective,
                left,
                right,
            } => write!(f, "({} {} {})", left, connective, right),
        }
    }
}

/// 节点类型标记
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Operand,
    Operator,
}

/// 语法树的存储/传输结构
///
/// `{ "nodeType": "operand"|"operator", "value": ..., "left": ..., "right": ... }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireNode {
    pub node_type: NodeType,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub left: Option<Box<WireNode>>,
    #[serde(default)]
    pub right: Option<Box<WireNode>>,
}

impl From<&AstNode> for WireNode {
    fn from(node: &AstNode) -> Self {
        match node {
            AstNode::Operand { condition } => Self {
                node_type: NodeType::Operand,
                value: Some(condition.clone()),
                left: None,
                right: None,
            },
            AstNode::Operator {
                connective,
                left,
                right,
            } => Self {
                node_type: NodeType::Operator,
                value: Some(connective.to_string()),
                left: Some(Box::new(Self::from(left.as_ref()))),
                right: Some(Box::new(Self::from(right.as_ref()))),
            },
        }
    }
}

impl From<AstNode> for WireNode {
    fn from(node: AstNode) -> Self {
        Self::from(&node)
    }
}

impl TryFrom<WireNode> for AstNode {
    type Error = RuleError;

    fn try_from(wire: WireNode) -> Result<Self> {
        Self::from_wire(wire, 1)
    }
}

impl AstNode {
    fn from_wire(wire: WireNode, depth: usize) -> Result<Self> {
        if depth > MAX_TREE_DEPTH {
            return Err(RuleError::MalformedTree(format!(
                "树深度超过上限 {}",
                MAX_TREE_DEPTH
            )));
        }
        match wire.node_type {
            NodeType::Operand => {
                if wire.left.is_some() || wire.right.is_some() {
                    return Err(RuleError::MalformedTree(format!(
                        "操作数节点不能包含子节点: {:?}",
                        wire.value
                    )));
                }
                let condition = wire
                    .value
                    .filter(|v| !v.trim().is_empty())
                    .ok_or_else(|| RuleError::MalformedTree("操作数节点缺少条件字符串".into()))?;
                Ok(AstNode::Operand { condition })
            }
            NodeType::Operator => {
                let value = wire
                    .value
                    .ok_or_else(|| RuleError::MalformedTree("操作符节点缺少连接符".into()))?;
                let connective: Connective = value
                    .parse()
                    .map_err(|_| RuleError::UnsupportedConnective(value.clone()))?;
                let left = wire.left.ok_or_else(|| {
                    RuleError::MalformedTree(format!("{} 节点缺少左子树", value))
                })?;
                let right = wire.right.ok_or_else(|| {
                    RuleError::MalformedTree(format!("{} 节点缺少右子树", value))
                })?;
                Ok(AstNode::operator(
                    connective,
                    AstNode::from_wire(*left, depth + 1)?,
                    AstNode::from_wire(*right, depth + 1)?,
                ))
            }
        }
    }
}
