//! Token 模型
//!
//! 分组之后的 token：括号内容与逗号分隔的元组已经折叠成复合 token，
//! 表达式分析器只面对这种嵌套结构，不再关心括号匹配。

use quill_diagnostics::Span;
use std::fmt;

/// 括号种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Delimiter {
    /// `( ... )`
    Paren,
    /// `[ ... ]`
    Bracket,
    /// `{ ... }`
    Brace,
}

impl Delimiter {
    pub fn open(&self) -> char {
        match self {
            Delimiter::Paren => '(',
            Delimiter::Bracket => '[',
            Delimiter::Brace => '{',
        }
    }

    pub fn close(&self) -> char {
        match self {
            Delimiter::Paren => ')',
            Delimiter::Bracket => ']',
            Delimiter::Brace => '}',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // --- 叶子 token，载荷是原文 ---
    /// 字符串字面量原文，包含可选前缀与引号: `c'H'`
    Str(String),
    /// 数字字面量原文: `10`, `2.5`, `7u8`
    Number(String),
    /// 标识符或关键字
    Name(String),
    /// 运算符: `+`, `==`, `and` 不在这里（它是 Name）
    Op(String),
    Dot,
    Comment(String),
    Newline,
    EndMarker,

    // --- 复合 token，载荷永远是嵌套的 token 序列 ---
    /// `a, b, c`：按逗号切分后的子序列，尾随逗号产生一个空的末尾子序列
    Tuple(Vec<Vec<Token>>),
    /// 括号组，内容是一个 token 序列（含逗号时是单个 Tuple token）
    Group(Delimiter, Vec<Token>),
}

/// 带位置信息的 token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// 所在行号，从 1 开始
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span, line: usize) -> Self {
        Self { kind, span, line }
    }

    /// 标识符文本
    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Name(name) => Some(name),
            _ => None,
        }
    }

    /// 运算符文本
    pub fn op(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::Op(op) => Some(op),
            _ => None,
        }
    }

    /// 括号组的种类与内容
    pub fn group(&self) -> Option<(Delimiter, &[Token])> {
        match &self.kind {
            TokenKind::Group(delimiter, inner) => Some((*delimiter, inner)),
            _ => None,
        }
    }

    pub fn is_paren_group(&self) -> bool {
        matches!(self.kind, TokenKind::Group(Delimiter::Paren, _))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self.kind, TokenKind::Tuple(_) | TokenKind::Group(..))
    }
}

fn write_run(f: &mut fmt::Formatter<'_>, run: &[Token]) -> fmt::Result {
    for (i, token) in run.iter().enumerate() {
        if i > 0 {
            write!(f, " ")?;
        }
        write!(f, "{}", token)?;
    }
    Ok(())
}

// 近似还原源码，用于诊断与调试输出
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TokenKind::Str(text)
            | TokenKind::Number(text)
            | TokenKind::Name(text)
            | TokenKind::Op(text)
            | TokenKind::Comment(text) => write!(f, "{}", text),
            TokenKind::Dot => write!(f, "."),
            TokenKind::Newline => write!(f, "\\n"),
            TokenKind::EndMarker => Ok(()),
            TokenKind::Tuple(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write_run(f, item)?;
                }
                Ok(())
            }
            TokenKind::Group(delimiter, inner) => {
                write!(f, "{}", delimiter.open())?;
                write_run(f, inner)?;
                write!(f, "{}", delimiter.close())
            }
        }
    }
}
