//! 字面量类型
//!
//! 数字与字符串字面量的类型只由词法形式决定。

use super::{FloatTy, IntTy, Type};

/// 数字字面量的类型
///
/// - 显式后缀优先: `7u8`, `1.5f32`
/// - 十六进制: `i32`
/// - 含小数点或指数: `f64`
/// - 其余: `i32`
///
/// 下划线与前导负号不影响结果。
pub fn number_type(raw: &str) -> Type {
    let text: String = raw
        .trim_start_matches('-')
        .chars()
        .filter(|c| *c != '_')
        .collect::<String>()
        .to_ascii_lowercase();

    if text.starts_with("0x") {
        return Type::Int(IntTy::I32);
    }

    if let Some(ty) = IntTy::ALL.into_iter().find(|ty| text.ends_with(ty.name())) {
        return Type::Int(ty);
    }
    if let Some(ty) = FloatTy::ALL.into_iter().find(|ty| text.ends_with(ty.name())) {
        return Type::Float(ty);
    }

    if text.contains('.') || text.contains('e') {
        Type::Float(FloatTy::F64)
    } else {
        Type::Int(IntTy::I32)
    }
}

/// 字符串字面量的值与类型
///
/// 引号之前可以有前缀；前缀含 `c`/`C` 时是 `char`，否则是 `str`。
/// 值是两个引号之间的原文。
pub fn string_literal(raw: &str) -> (String, Type) {
    let Some(quote) = raw.chars().last() else {
        return (String::new(), Type::Str);
    };
    let Some(open) = raw.find(quote) else {
        return (String::new(), Type::Str);
    };

    let prefix = &raw[..open];
    let close = raw.len() - quote.len_utf8();
    let value = if open < close {
        raw[open + quote.len_utf8()..close].to_string()
    } else {
        String::new()
    };

    let ty = if prefix.to_ascii_lowercase().contains('c') {
        Type::Char
    } else {
        Type::Str
    };
    (value, ty)
}
