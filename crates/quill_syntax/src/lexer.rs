use logos::Logos;
use quill_diagnostics::Span;
use std::fmt;
use thiserror::Error;

/// 原始 token（分组之前）
#[derive(Logos, Debug, PartialEq, Eq, Hash, Clone)] // 关键：chumsky 的 Simple 错误要求 Eq 和 Hash
#[logos(skip r"[ \t\r\f]+")]
pub enum RawToken {
    // 字符串与字符: 'H', "Hello", c'H'（前缀写在引号之前）
    #[regex(r#"[a-zA-Z]?"([^"\\\n]|\\.)*""#, |lex| lex.slice().to_string())]
    #[regex(r#"[a-zA-Z]?'([^'\\\n]|\\.)*'"#, |lex| lex.slice().to_string())]
    Str(String),

    // 数字保留原文，类型在语义阶段按词法形式推导
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?([eE][+-]?[0-9]+)?([iu](8|16|32|64)|f(32|64))?", |lex| lex.slice().to_string())]
    #[regex(r"0[xX][0-9a-fA-F][0-9a-fA-F_]*", |lex| lex.slice().to_string())]
    Number(String),

    // 标识符与关键字（True/False/and/or/not 也在这里，由语义层区分）
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Name(String),

    #[regex(r"\*\*|//|==|!=|<=|>=|<<|>>|&&|\|\||->|[-+*/%<>=!~&|^:]", |lex| lex.slice().to_string())]
    Op(String),

    #[token(".")]
    Dot,
    #[token(",")]
    Comma,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[regex(r"#[^\n]*", |lex| lex.slice().to_string())]
    Comment(String),

    #[token("\n")]
    Newline,
}

impl fmt::Display for RawToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawToken::Str(text)
            | RawToken::Number(text)
            | RawToken::Name(text)
            | RawToken::Op(text)
            | RawToken::Comment(text) => write!(f, "{}", text),
            RawToken::Dot => write!(f, "."),
            RawToken::Comma => write!(f, ","),
            RawToken::LParen => write!(f, "("),
            RawToken::RParen => write!(f, ")"),
            RawToken::LBracket => write!(f, "["),
            RawToken::RBracket => write!(f, "]"),
            RawToken::LBrace => write!(f, "{{"),
            RawToken::RBrace => write!(f, "}}"),
            RawToken::Newline => write!(f, "newline"),
        }
    }
}

/// 词法与分组错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("SyntaxError: invalid character `{text}`")]
    InvalidCharacter { text: String, span: Span, line: usize },

    #[error("SyntaxError: unmatched `{found}`")]
    UnmatchedClose { found: char, span: Span, line: usize },

    #[error("SyntaxError: closing `{found}` does not match opening `{expected}`")]
    MismatchedClose {
        expected: char,
        found: char,
        span: Span,
        line: usize,
    },

    #[error("SyntaxError: `{open}` was never closed")]
    Unclosed { open: char, span: Span, line: usize },
}

impl LexError {
    pub fn span(&self) -> &Span {
        match self {
            Self::InvalidCharacter { span, .. }
            | Self::UnmatchedClose { span, .. }
            | Self::MismatchedClose { span, .. }
            | Self::Unclosed { span, .. } => span,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::InvalidCharacter { line, .. }
            | Self::UnmatchedClose { line, .. }
            | Self::MismatchedClose { line, .. }
            | Self::Unclosed { line, .. } => *line,
        }
    }
}

/// 词法分析：源码 -> (原始 token, 字节范围)
pub fn lex(source: &str) -> Result<Vec<(RawToken, Span)>, LexError> {
    RawToken::lexer(source)
        .spanned()
        .map(|(tok, span)| match tok {
            Ok(tok) => Ok((tok, span)),
            Err(()) => Err(LexError::InvalidCharacter {
                text: source[span.clone()].to_string(),
                line: line_of(source, span.start),
                span,
            }),
        })
        .collect()
}

/// 字节偏移所在的行号（从 1 开始）
pub fn line_of(source: &str, offset: usize) -> usize {
    let end = offset.min(source.len());
    source.as_bytes()[..end].iter().filter(|&&b| b == b'\n').count() + 1
}
