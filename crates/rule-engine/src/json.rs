//! 深度受限的 JSON 解码
//!
//! 合并生成的语法树是左倾的，深度等于规则数，超过 serde_json 默认的
//! 128 层递归上限。这里先按字节扫描嵌套深度，超过上限直接拒绝；
//! 通过检查后关闭 serde_json 的递归限制，由 serde_stacker 在需要时扩展栈。

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, RuleError};

/// 计算 JSON 文本中对象/数组的最大嵌套深度（字符串内的括号不计）
pub fn nesting_depth(bytes: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &b in bytes {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' | b'[' => {
                depth += 1;
                max_depth = max_depth.max(depth);
            }
            b'}' | b']' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max_depth
}

/// 计算已解析 JSON 值的嵌套深度，显式栈遍历，不依赖调用栈
pub fn value_depth(value: &Value) -> usize {
    let mut max_depth = 0usize;
    let mut stack = vec![(value, 0usize)];

    while let Some((value, depth)) = stack.pop() {
        match value {
            Value::Object(map) => {
                max_depth = max_depth.max(depth + 1);
                stack.extend(map.values().map(|v| (v, depth + 1)));
            }
            Value::Array(items) => {
                max_depth = max_depth.max(depth + 1);
                stack.extend(items.iter().map(|v| (v, depth + 1)));
            }
            _ => {}
        }
    }
    max_depth
}

/// 解码 JSON，嵌套深度超过 `max_nesting` 时返回 `MalformedTree`
pub fn from_slice_bounded<T: DeserializeOwned>(bytes: &[u8], max_nesting: usize) -> Result<T> {
    let nesting = nesting_depth(bytes);
    if nesting > max_nesting {
        return Err(RuleError::MalformedTree(format!(
            "JSON 嵌套深度 {} 超过上限 {}",
            nesting, max_nesting
        )));
    }

    let mut de = serde_json::Deserializer::from_slice(bytes);
    de.disable_recursion_limit();
    let value = T::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}
