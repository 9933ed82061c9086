//! Parser Module
//!
//! 声明文件解析：logos token 流 -> chumsky -> `Vec<Decl>`

pub mod decl;
pub mod helpers;

use crate::ast::Decl;
use crate::lexer::{lex, line_of, LexError, RawToken};
use chumsky::prelude::*;
use chumsky::Stream;
use quill_diagnostics::Span;
use thiserror::Error;

pub type ParserError = Simple<RawToken>;

/// 主入口：解析整个声明文件
pub fn program_parser() -> impl Parser<RawToken, Vec<Decl>, Error = ParserError> {
    decl::decl_parser().repeated().then_ignore(end())
}

/// 声明文件解析错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("SyntaxError: {message}")]
    Syntax {
        message: String,
        span: Span,
        line: usize,
    },
}

impl ParseError {
    pub fn span(&self) -> &Span {
        match self {
            ParseError::Lex(err) => err.span(),
            ParseError::Syntax { span, .. } => span,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            ParseError::Lex(err) => err.line(),
            ParseError::Syntax { line, .. } => *line,
        }
    }

    fn from_simple(source: &str, err: ParserError) -> Self {
        let message = match err.found() {
            Some(found) => format!("unexpected `{}`", found),
            None => "unexpected end of input".to_string(),
        };
        let span = err.span();
        ParseError::Syntax {
            message,
            line: line_of(source, span.start),
            span,
        }
    }
}

/// 解析声明文件
pub fn parse_declarations(source: &str) -> Result<Vec<Decl>, Vec<ParseError>> {
    let tokens: Vec<(RawToken, Span)> = lex(source)
        .map_err(|e| vec![ParseError::from(e)])?
        .into_iter()
        .filter(|(tok, _)| !matches!(tok, RawToken::Newline | RawToken::Comment(_)))
        .collect();

    let len = source.len();
    let stream = Stream::from_iter(len..len, tokens.into_iter());

    program_parser().parse(stream).map_err(|errors| {
        errors
            .into_iter()
            .map(|e| ParseError::from_simple(source, e))
            .collect()
    })
}
