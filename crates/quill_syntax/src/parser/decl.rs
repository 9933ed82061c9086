//! Declaration Parser
//!
//! 声明解析：模块、函数签名、结构体、变量

use super::helpers::{ident_parser, keyword, op, param_list_parser, path_parser};
use super::ParserError;
use crate::ast::Decl;
use crate::lexer::RawToken;
use chumsky::prelude::*;

/// 解析声明 (公共接口)
pub fn decl_parser() -> impl Parser<RawToken, Decl, Error = ParserError> {
    // 模块: module geometry.shapes
    let module = keyword("module")
        .ignore_then(path_parser())
        .map_with_span(|path, span| Decl::Module { path, span });

    // 函数签名: fn add(a: i32, b: i32 = 1) -> i32
    let func = keyword("fn")
        .ignore_then(ident_parser())
        .then(param_list_parser())
        .then(op("->").ignore_then(path_parser()).or_not())
        .map_with_span(|((name, params), return_type), span| Decl::Function {
            name,
            params,
            return_type,
            span,
        });

    // 结构体: struct Point(x: i32, y: i32)
    let struct_decl = keyword("struct")
        .ignore_then(ident_parser())
        .then(param_list_parser())
        .map_with_span(|(name, fields), span| Decl::Struct { name, fields, span });

    // 变量: let origin: Point
    let variable = keyword("let")
        .ignore_then(ident_parser())
        .then(op(":").ignore_then(path_parser()).or_not())
        .map_with_span(|(name, ty), span| Decl::Variable { name, ty, span });

    choice((module, func, struct_decl, variable))
}
