//! Semantic Analysis Error Types
//!
//! 语义分析错误定义。消息以错误分类开头（`SyntaxError:` / `NameError:` /
//! `TypeError:`），直接作为诊断消息输出。

use quill_diagnostics::{Diagnostic, Span};
use std::fmt;
use thiserror::Error;

/// 错误分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// token 序列不匹配任何语法形式
    SyntaxError,
    /// 名字未定义，或定义的种类与语法位置不符
    NameError,
    /// 参数个数、参数类型、结果类型不匹配
    TypeError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::SyntaxError => write!(f, "SyntaxError"),
            ErrorKind::NameError => write!(f, "NameError"),
            ErrorKind::TypeError => write!(f, "TypeError"),
        }
    }
}

/// 语义分析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    // ============ 语法错误 ============
    /// 无法识别的表达式形式
    #[error("SyntaxError: invalid syntax")]
    InvalidSyntax { span: Span },

    /// 带默认值的参数之后出现无默认值的参数
    #[error("SyntaxError: non-default argument follows default argument")]
    DefaultBeforeRequired { name: String, span: Span },

    // ============ 名称解析错误 ============
    /// 未定义的名字
    #[error("NameError: name `{name}` is not defined")]
    UndefinedName { name: String, span: Span },

    /// 被调用的名字既不是函数也不是结构体
    #[error("NameError: name `{name}` is not a function or structure")]
    NotCallable { name: String, span: Span },

    /// 未定义的类型
    #[error("NameError: type `{name}` is not defined")]
    UnknownType { name: String, span: Span },

    /// 重复定义
    #[error("NameError: name `{name}` is already defined")]
    DuplicateDefinition {
        name: String,
        span: Span,
        previous_span: Span,
    },

    // ============ 类型错误 ============
    /// 名字存在但不是类型
    #[error("TypeError: name `{name}` is not a type")]
    NotAType { name: String, span: Span },

    /// 实参过多
    #[error("TypeError: {name}() takes {max} positional arguments but {given} were given")]
    TooManyArguments {
        name: String,
        max: usize,
        given: usize,
        span: Span,
    },

    /// 缺少必需的位置参数
    #[error(
        "TypeError: {name}() missing {} required positional argument{}: {}",
        count(.missing),
        plural(.missing),
        format_missing(.missing)
    )]
    MissingArguments {
        name: String,
        missing: Vec<String>,
        span: Span,
    },

    /// 类型不匹配
    #[error("TypeError: expected type `{expected}`, got `{found}`")]
    TypeMismatch {
        expected: String,
        found: String,
        span: Span,
    },

    /// 二元运算符不支持该组操作数类型
    #[error("TypeError: unsupported operand type(s) for {op}: `{left}` and `{right}`")]
    InvalidBinaryOp {
        op: String,
        left: String,
        right: String,
        span: Span,
    },

    /// 一元运算符不支持该操作数类型
    #[error("TypeError: unsupported operand type(s) for unary {op}: `{operand}`")]
    InvalidUnaryOp {
        op: String,
        operand: String,
        span: Span,
    },
}

fn count(names: &[String]) -> usize {
    names.len()
}

fn plural(names: &[String]) -> &'static str {
    if names.len() == 1 {
        ""
    } else {
        "s"
    }
}

/// 缺失参数列表: `x` / `x` and `y` / `x`, `y` and `z`
pub fn format_missing(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("`{}`", n)).collect();
    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

impl SemanticError {
    /// 获取错误发生的位置
    pub fn span(&self) -> &Span {
        match self {
            Self::InvalidSyntax { span } => span,
            Self::DefaultBeforeRequired { span, .. } => span,
            Self::UndefinedName { span, .. } => span,
            Self::NotCallable { span, .. } => span,
            Self::UnknownType { span, .. } => span,
            Self::DuplicateDefinition { span, .. } => span,
            Self::NotAType { span, .. } => span,
            Self::TooManyArguments { span, .. } => span,
            Self::MissingArguments { span, .. } => span,
            Self::TypeMismatch { span, .. } => span,
            Self::InvalidBinaryOp { span, .. } => span,
            Self::InvalidUnaryOp { span, .. } => span,
        }
    }

    /// 错误分类
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidSyntax { .. } | Self::DefaultBeforeRequired { .. } => {
                ErrorKind::SyntaxError
            }
            Self::UndefinedName { .. }
            | Self::NotCallable { .. }
            | Self::UnknownType { .. }
            | Self::DuplicateDefinition { .. } => ErrorKind::NameError,
            Self::NotAType { .. }
            | Self::TooManyArguments { .. }
            | Self::MissingArguments { .. }
            | Self::TypeMismatch { .. }
            | Self::InvalidBinaryOp { .. }
            | Self::InvalidUnaryOp { .. } => ErrorKind::TypeError,
        }
    }

    /// 转换为诊断
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.to_string()).span(self.span().clone());
        match self {
            Self::DuplicateDefinition { previous_span, .. } => diag.with_note(format!(
                "previous definition at bytes {}..{}",
                previous_span.start, previous_span.end
            )),
            _ => diag,
        }
    }
}
