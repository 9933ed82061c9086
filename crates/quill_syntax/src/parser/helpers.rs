//! Parser Helper Functions
//!
//! 辅助解析函数：关键字、标识符、类型路径、参数

use super::ParserError;
use crate::ast::{DefaultValue, Param};
use crate::lexer::RawToken;
use chumsky::prelude::*;

/// 关键字在词法上就是标识符
pub fn keyword(word: &str) -> impl Parser<RawToken, (), Error = ParserError> + Clone {
    just(RawToken::Name(word.to_string())).ignored()
}

pub fn op(text: &str) -> impl Parser<RawToken, (), Error = ParserError> + Clone {
    just(RawToken::Op(text.to_string())).ignored()
}

/// 解析标识符
pub fn ident_parser() -> impl Parser<RawToken, String, Error = ParserError> + Clone {
    select! { RawToken::Name(name) => name }
}

/// 点分路径: `geometry.Point`
pub fn path_parser() -> impl Parser<RawToken, String, Error = ParserError> + Clone {
    ident_parser()
        .separated_by(just(RawToken::Dot))
        .at_least(1)
        .map(|parts| parts.join("."))
}

/// 默认值字面量: `1`, `-2.5`, `'x'`, `True`
pub fn default_parser() -> impl Parser<RawToken, DefaultValue, Error = ParserError> + Clone {
    let number = op("-")
        .or_not()
        .then(select! { RawToken::Number(raw) => raw })
        .map(|(neg, raw)| match neg {
            Some(()) => DefaultValue::Number(format!("-{}", raw)),
            None => DefaultValue::Number(raw),
        });

    let string = select! { RawToken::Str(raw) => DefaultValue::Str(raw) };

    let boolean = keyword("True")
        .to(DefaultValue::Bool(true))
        .or(keyword("False").to(DefaultValue::Bool(false)));

    choice((number, string, boolean))
}

/// 参数/字段: `name [: type] [= default]`
pub fn param_parser() -> impl Parser<RawToken, Param, Error = ParserError> + Clone {
    ident_parser()
        .then(op(":").ignore_then(path_parser()).or_not())
        .then(op("=").ignore_then(default_parser()).or_not())
        .map_with_span(|((name, ty), default), span| Param {
            name,
            ty,
            default,
            span,
        })
}

/// `( param, ... )`
pub fn param_list_parser() -> impl Parser<RawToken, Vec<Param>, Error = ParserError> + Clone {
    param_parser()
        .separated_by(just(RawToken::Comma))
        .allow_trailing()
        .delimited_by(just(RawToken::LParen), just(RawToken::RParen))
}
