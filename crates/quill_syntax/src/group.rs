//! 括号分组
//!
//! 把原始 token 流折叠成嵌套结构：
//! - 括号内容变成 [`TokenKind::Group`]
//! - 同一层级出现逗号时，这一层的内容变成单个 [`TokenKind::Tuple`]
//! - 括号内的换行与所有注释被丢弃；顶层换行保留为 [`TokenKind::Newline`]
//! - 末尾追加 [`TokenKind::EndMarker`]

use crate::lexer::{lex, LexError, RawToken};
use crate::token::{Delimiter, Token, TokenKind};
use quill_diagnostics::{Span, SpanExt};

/// 词法分析 + 分组
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let raw = lex(source)?;
    group(raw, source.len())
}

/// 按顶层换行切分，去掉换行与结束标记，跳过空行
pub fn split_lines(tokens: Vec<Token>) -> Vec<Vec<Token>> {
    let mut lines = Vec::new();
    let mut current = Vec::new();
    for token in tokens {
        match token.kind {
            TokenKind::Newline | TokenKind::EndMarker => {
                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(token),
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// 一层括号（或顶层）正在收集的内容
struct Frame {
    /// 左括号：种类、位置、行号；顶层为 None
    open: Option<(Delimiter, Span, usize)>,
    /// 已经被逗号结束的子序列
    items: Vec<Vec<Token>>,
    current: Vec<Token>,
    /// 第一个逗号的位置（用于空元组 `(,)` 的 span）
    comma: Option<(Span, usize)>,
}

impl Frame {
    fn new(open: Option<(Delimiter, Span, usize)>) -> Self {
        Self {
            open,
            items: Vec::new(),
            current: Vec::new(),
            comma: None,
        }
    }

    fn comma(&mut self, span: Span, line: usize) {
        if self.comma.is_none() {
            self.comma = Some((span, line));
        }
        self.items.push(std::mem::take(&mut self.current));
    }

    /// 结束这一层，含逗号时折叠成单个 Tuple token
    fn finish(self) -> Vec<Token> {
        let Some((comma_span, comma_line)) = self.comma else {
            return self.current;
        };

        let mut items = self.items;
        items.push(self.current);

        let mut span: Option<Span> = None;
        let mut line = None;
        for token in items.iter().flatten() {
            line.get_or_insert(token.line);
            span = Some(match span {
                Some(s) => s.join(&token.span),
                None => token.span.clone(),
            });
        }
        let span = span.map_or(comma_span.clone(), |s| s.join(&comma_span));

        vec![Token::new(
            TokenKind::Tuple(items),
            span,
            line.unwrap_or(comma_line),
        )]
    }
}

struct Grouper {
    top: Frame,
    open: Vec<Frame>,
    output: Vec<Token>,
    line: usize,
}

impl Grouper {
    fn current(&mut self) -> &mut Frame {
        match self.open.last_mut() {
            Some(frame) => frame,
            None => &mut self.top,
        }
    }

    fn push(&mut self, token: Token) {
        self.current().current.push(token);
    }

    fn flush_line(&mut self) {
        let frame = std::mem::replace(&mut self.top, Frame::new(None));
        self.output.extend(frame.finish());
    }

    fn close(&mut self, found: Delimiter, span: Span) -> Result<(), LexError> {
        let Some(frame) = self.open.pop() else {
            return Err(LexError::UnmatchedClose {
                found: found.close(),
                span,
                line: self.line,
            });
        };
        let Some((delimiter, open_span, open_line)) = frame.open.clone() else {
            return Err(LexError::UnmatchedClose {
                found: found.close(),
                span,
                line: self.line,
            });
        };
        if delimiter != found {
            return Err(LexError::MismatchedClose {
                expected: delimiter.open(),
                found: found.close(),
                span,
                line: self.line,
            });
        }

        let inner = frame.finish();
        self.push(Token::new(
            TokenKind::Group(delimiter, inner),
            open_span.join(&span),
            open_line,
        ));
        Ok(())
    }
}

/// 分组：原始 token 流 -> 嵌套 token 流
pub fn group(raw: Vec<(RawToken, Span)>, eof: usize) -> Result<Vec<Token>, LexError> {
    let mut grouper = Grouper {
        top: Frame::new(None),
        open: Vec::new(),
        output: Vec::new(),
        line: 1,
    };

    for (tok, span) in raw {
        let line = grouper.line;
        let kind = match tok {
            RawToken::Newline => {
                if grouper.open.is_empty() {
                    grouper.flush_line();
                    grouper
                        .output
                        .push(Token::new(TokenKind::Newline, span, line));
                }
                grouper.line += 1;
                continue;
            }
            RawToken::Comment(_) => continue,
            RawToken::Comma => {
                grouper.current().comma(span, line);
                continue;
            }
            RawToken::LParen | RawToken::LBracket | RawToken::LBrace => {
                let delimiter = match tok {
                    RawToken::LParen => Delimiter::Paren,
                    RawToken::LBracket => Delimiter::Bracket,
                    _ => Delimiter::Brace,
                };
                grouper.open.push(Frame::new(Some((delimiter, span, line))));
                continue;
            }
            RawToken::RParen => {
                grouper.close(Delimiter::Paren, span)?;
                continue;
            }
            RawToken::RBracket => {
                grouper.close(Delimiter::Bracket, span)?;
                continue;
            }
            RawToken::RBrace => {
                grouper.close(Delimiter::Brace, span)?;
                continue;
            }
            RawToken::Str(text) => TokenKind::Str(text),
            RawToken::Number(text) => TokenKind::Number(text),
            RawToken::Name(text) => TokenKind::Name(text),
            RawToken::Op(text) => TokenKind::Op(text),
            RawToken::Dot => TokenKind::Dot,
        };
        grouper.push(Token::new(kind, span, line));
    }

    if let Some((delimiter, span, line)) = grouper.open.first().and_then(|f| f.open.clone()) {
        return Err(LexError::Unclosed {
            open: delimiter.open(),
            span,
            line,
        });
    }

    grouper.flush_line();
    let line = grouper.line;
    grouper
        .output
        .push(Token::new(TokenKind::EndMarker, eof..eof, line));
    Ok(grouper.output)
}
