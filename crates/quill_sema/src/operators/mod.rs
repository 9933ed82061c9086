//! Quill 运算符系统
//!
//! - 运算符识别：[`is_operator`] 按前缀集合 / 二元集合判断 token
//! - 类型规则：表驱动的 [`BinaryOpRegistry`] / [`UnaryOpRegistry`]
//! - 表达式组装：[`OperatorAssembler`] 按优先级爬升组装运算，
//!   操作数通过 [`OperandSynthesizer`] 回调到表达式合成器
//!
//! ## 使用示例
//!
//! ```rust
//! use quill_sema::operators::{BinaryOp, BinaryOpRegistry};
//! use quill_sema::types::{IntTy, Type};
//!
//! let registry = BinaryOpRegistry::new();
//! let result = registry.lookup(
//!     BinaryOp::Add,
//!     &Type::Int(IntTy::I32),
//!     &Type::Int(IntTy::I32),
//!     &(0..1),
//! );
//! assert_eq!(result.unwrap(), Type::Int(IntTy::I32));
//! ```

use quill_syntax::{Token, TokenKind};
use std::fmt;

pub mod assemble;
pub mod binary;
pub mod unary;

pub use assemble::{OperandSynthesizer, OperatorAssembler};
pub use binary::{BinaryOpRegistry, BinaryOpSignature};
pub use unary::{UnaryOpRegistry, UnaryOpSignature};

/// 运算符集合
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorSet {
    /// 只能出现在子表达式开头的一元运算符
    Leading,
    /// 把 token 序列切分成左右两部分的二元运算符
    Binary,
}

/// token 是否属于给定的运算符集合
pub fn is_operator(token: &Token, set: OperatorSet) -> bool {
    match set {
        OperatorSet::Leading => UnaryOp::from_token(token).is_some(),
        OperatorSet::Binary => BinaryOp::from_token(token).is_some(),
    }
}

/// 运算符在 token 中的拼写：符号是 Op，单词运算符是 Name
fn spelling(token: &Token) -> Option<&str> {
    match &token.kind {
        TokenKind::Op(text) | TokenKind::Name(text) => Some(text),
        _ => None,
    }
}

/// 一元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-`
    Neg,
    /// `+`
    Pos,
    /// `~`
    BitNot,
    /// `not` / `!`
    Not,
}

impl UnaryOp {
    pub fn from_token(token: &Token) -> Option<Self> {
        let op = match (&token.kind, spelling(token)?) {
            (TokenKind::Op(_), "-") => UnaryOp::Neg,
            (TokenKind::Op(_), "+") => UnaryOp::Pos,
            (TokenKind::Op(_), "~") => UnaryOp::BitNot,
            (TokenKind::Op(_), "!") | (TokenKind::Name(_), "not") => UnaryOp::Not,
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Neg => "-",
            UnaryOp::Pos => "+",
            UnaryOp::BitNot => "~",
            UnaryOp::Not => "not",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// 二元运算符
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    BitOr,
    BitXor,
    BitAnd,
    Shl,
    Shr,
    Add,
    Sub,
    Mul,
    Div,
    FloorDiv,
    Mod,
    Pow,
}

impl BinaryOp {
    pub fn from_token(token: &Token) -> Option<Self> {
        use BinaryOp::*;

        let op = match (&token.kind, spelling(token)?) {
            (TokenKind::Name(_), "or") | (TokenKind::Op(_), "||") => Or,
            (TokenKind::Name(_), "and") | (TokenKind::Op(_), "&&") => And,
            (TokenKind::Op(_), text) => match text {
                "==" => Eq,
                "!=" => Ne,
                "<" => Lt,
                ">" => Gt,
                "<=" => Le,
                ">=" => Ge,
                "|" => BitOr,
                "^" => BitXor,
                "&" => BitAnd,
                "<<" => Shl,
                ">>" => Shr,
                "+" => Add,
                "-" => Sub,
                "*" => Mul,
                "/" => Div,
                "//" => FloorDiv,
                "%" => Mod,
                "**" => Pow,
                _ => return None,
            },
            _ => return None,
        };
        Some(op)
    }

    pub fn symbol(&self) -> &'static str {
        use BinaryOp::*;

        match self {
            Or => "or",
            And => "and",
            Eq => "==",
            Ne => "!=",
            Lt => "<",
            Gt => ">",
            Le => "<=",
            Ge => ">=",
            BitOr => "|",
            BitXor => "^",
            BitAnd => "&",
            Shl => "<<",
            Shr => ">>",
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            FloorDiv => "//",
            Mod => "%",
            Pow => "**",
        }
    }

    /// 优先级，数字越大结合越紧
    pub fn precedence(&self) -> u8 {
        use BinaryOp::*;

        match self {
            Or => 1,
            And => 2,
            Eq | Ne | Lt | Gt | Le | Ge => 3,
            BitOr => 4,
            BitXor => 5,
            BitAnd => 6,
            Shl | Shr => 7,
            Add | Sub => 8,
            Mul | Div | FloorDiv | Mod => 9,
            Pow => 10,
        }
    }

    pub fn is_right_assoc(&self) -> bool {
        matches!(self, BinaryOp::Pow)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
