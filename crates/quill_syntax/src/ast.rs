//! 声明 AST
//!
//! 声明文件（prelude）只描述符号表：模块、函数签名、结构体字段与变量。
//! 表达式本身不经过 AST，直接由语义层从分组 token 合成。

use quill_diagnostics::Span;

/// 顶层声明
#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    /// `module geometry.shapes`：为之后的结构体名加上限定前缀
    Module { path: String, span: Span },
    /// `fn add(a: i32, b: i32 = 1) -> i32`
    Function {
        name: String,
        params: Vec<Param>,
        return_type: Option<String>,
        span: Span,
    },
    /// `struct Point(x: i32, y: i32)`
    Struct {
        name: String,
        fields: Vec<Param>,
        span: Span,
    },
    /// `let origin: Point`
    Variable {
        name: String,
        ty: Option<String>,
        span: Span,
    },
}

impl Decl {
    pub fn span(&self) -> &Span {
        match self {
            Decl::Module { span, .. }
            | Decl::Function { span, .. }
            | Decl::Struct { span, .. }
            | Decl::Variable { span, .. } => span,
        }
    }

    /// 声明引入的名字（module 不引入名字）
    pub fn name(&self) -> Option<&str> {
        match self {
            Decl::Module { .. } => None,
            Decl::Function { name, .. }
            | Decl::Struct { name, .. }
            | Decl::Variable { name, .. } => Some(name),
        }
    }
}

/// 参数或字段
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    /// 类型名原文，可能带模块限定: `geometry.Point`
    pub ty: Option<String>,
    pub default: Option<DefaultValue>,
    pub span: Span,
}

/// 参数默认值，只允许字面量
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// 字符串原文（含前缀与引号）
    Str(String),
    /// 数字原文（负数带前导 `-`）
    Number(String),
    Bool(bool),
}
