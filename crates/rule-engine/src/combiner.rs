//! 规则合并
//!
//! 将多棵语法树用同一个连接符从左到右折叠为一棵树：
//! `[A, B, C]` 合并为 `(A op B) op C`。

use crate::ast::{AstNode, MAX_TREE_DEPTH};
use crate::error::{Result, RuleError};
use crate::operators::Connective;

/// 合并多条规则
///
/// 输入树通过 `Arc` 共享进新树，不做深拷贝，也不校验各子树是否可求值。
/// 合并结果的深度不能超过 [`MAX_TREE_DEPTH`]。
pub fn combine(trees: &[AstNode], connective: Connective) -> Result<AstNode> {
    let [first, rest @ ..] = trees else {
        return Err(RuleError::InvalidInput("至少需要两条规则才能合并, 实际 0 条".into()));
    };
    if rest.is_empty() {
        return Err(RuleError::InvalidInput(
            "至少需要两条规则才能合并, 实际 1 条".into(),
        ));
    }
    // 左结合合并 n 棵树，深度至少为 n
    if trees.len() > MAX_TREE_DEPTH {
        return Err(RuleError::InvalidInput(format!(
            "一次最多合并 {} 条规则, 实际 {} 条",
            MAX_TREE_DEPTH,
            trees.len()
        )));
    }

    let depth = rest
        .iter()
        .fold(first.depth(), |depth, tree| depth.max(tree.depth()) + 1);
    if depth > MAX_TREE_DEPTH {
        return Err(RuleError::InvalidInput(format!(
            "合并后语法树深度 {} 超过上限 {}",
            depth, MAX_TREE_DEPTH
        )));
    }

    Ok(rest.iter().fold(first.clone(), |acc, tree| {
        AstNode::operator(connective, acc, tree.clone())
    }))
}

/// 以文本形式的连接符合并，连接符必须严格为 "AND" 或 "OR"
pub fn combine_str(trees: &[AstNode], connective: &str) -> Result<AstNode> {
    let connective: Connective = connective.parse()?;
    combine(trees, connective)
}
