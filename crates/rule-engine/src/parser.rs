//! 规则表达式解析器
//!
//! 对原始文本做递归下降：在括号深度为 0 处寻找第一个 AND/OR，
//! 左右两侧分别递归解析。AND 与 OR 没有优先级之分，先出现者先拆分。

use crate::ast::{AstNode, MAX_TREE_DEPTH};
use crate::error::{Result, RuleError};
use crate::operators::Connective;
use tracing::trace;

/// 将规则字符串解析为语法树
///
/// 叶子条件在解析阶段不做校验，格式错误的条件在求值时才会失败。
/// 结果树深度超过 [`MAX_TREE_DEPTH`] 时返回解析错误。
pub fn parse(expression: &str) -> Result<AstNode> {
    parse_at(expression, 1)
}

fn parse_at(expression: &str, depth: usize) -> Result<AstNode> {
    if depth > MAX_TREE_DEPTH {
        return Err(RuleError::Parse(format!(
            "表达式嵌套过深, 语法树深度超过上限 {}",
            MAX_TREE_DEPTH
        )));
    }

    let expr = strip_enclosing_parens(expression);
    if expr.is_empty() {
        return Err(RuleError::Parse(format!("表达式为空: {:?}", expression)));
    }

    let Some((pos, connective)) = find_connective(expr)? else {
        trace!(condition = expr, "识别为条件叶子");
        return Ok(AstNode::operand(expr));
    };

    let left_part = expr[..pos].trim();
    let right_part = expr[pos + connective.keyword().len()..].trim();
    trace!(%connective, left = left_part, right = right_part, "拆分表达式");

    if left_part.is_empty() || right_part.is_empty() {
        return Err(RuleError::Parse(format!(
            "{} 两侧都必须有条件: {:?}",
            connective, expr
        )));
    }

    let left = parse_at(left_part, depth + 1)?;
    let right = parse_at(right_part, depth + 1)?;
    Ok(AstNode::operator(connective, left, right))
}

/// 去掉包裹整个表达式的括号（仅当首尾括号互相匹配时）
fn strip_enclosing_parens(expression: &str) -> &str {
    let mut expr = expression.trim();
    while expr.starts_with('(')
        && expr.ends_with(')')
        && matching_close(expr) == Some(expr.len() - 1)
    {
        expr = expr[1..expr.len() - 1].trim();
    }
    expr
}

/// 返回与首个 '(' 配对的 ')' 的位置
fn matching_close(expr: &str) -> Option<usize> {
    let bytes = expr.as_bytes();
    let mut depth = 0usize;
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' if at_token_start(bytes, i) => quote = Some(b),
            b'(' => depth += 1,
            b')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// 在括号深度为 0、引号之外的位置寻找第一个独立的 AND/OR 关键字
fn find_connective(expr: &str) -> Result<Option<(usize, Connective)>> {
    let bytes = expr.as_bytes();
    let mut depth: i32 = 0;
    let mut quote: Option<u8> = None;

    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'\'' | b'"' if at_token_start(bytes, i) => quote = Some(b),
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth < 0 {
                    return Err(RuleError::Parse(format!(
                        "括号不匹配: 位置 {} 出现多余的 ')': {:?}",
                        i, expr
                    )));
                }
            }
            _ if depth == 0 => {
                for connective in [Connective::And, Connective::Or] {
                    if keyword_at(bytes, i, connective.keyword()) {
                        return Ok(Some((i, connective)));
                    }
                }
            }
            _ => {}
        }
    }

    if let Some(q) = quote {
        return Err(RuleError::Parse(format!(
            "引号未闭合: 缺少 {}: {:?}",
            q as char, expr
        )));
    }
    if depth != 0 {
        return Err(RuleError::Parse(format!(
            "括号不匹配: 缺少 {} 个 ')': {:?}",
            depth, expr
        )));
    }
    Ok(None)
}

fn keyword_at(bytes: &[u8], i: usize, keyword: &str) -> bool {
    let end = i + keyword.len();
    bytes[i..].starts_with(keyword.as_bytes())
        && (i == 0 || is_delimiter(bytes[i - 1]))
        && (end == bytes.len() || is_delimiter(bytes[end]))
}

fn at_token_start(bytes: &[u8], i: usize) -> bool {
    i == 0 || is_delimiter(bytes[i - 1])
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'(' || b == b')'
}
