//! Expression Synthesizer
//!
//! 从分组 token 合成带类型的表达式节点。

use super::node::{Collection, ExprBuilder};
use super::{Aborted, AnalysisResult, ExprAnalyzer, TypedExpr, UNDETERMINED_RETURN};
use crate::error::SemanticError;
use crate::symbol::{compose_name, RESERVED_WORDS};
use crate::types::{number_type, string_literal, ResultType, Type};
use quill_syntax::{Delimiter, Token, TokenKind};
use std::rc::Rc;
use tracing::{instrument, trace};

/// 去掉尾随逗号产生的空子序列
pub(crate) fn trim_trailing(items: &[Vec<Token>]) -> &[Vec<Token>] {
    match items.split_last() {
        Some((last, rest)) if last.is_empty() => rest,
        _ => items,
    }
}

impl ExprAnalyzer<'_> {
    /// 合成表达式
    ///
    /// - 结果类型无法推导：警告，分析继续
    /// - 给出了期望类型且结果类型不同：TypeError，失败
    #[instrument(level = "debug", skip_all, fields(len = tokens.len()))]
    pub fn generate_expression(
        &mut self,
        tokens: &[Token],
        expected: Option<&Type>,
    ) -> AnalysisResult<TypedExpr> {
        let node = self.synthesize_run(tokens)?;

        match (node.result_type(), expected) {
            (ResultType::Undefined, _) => self.warn(UNDETERMINED_RETURN, tokens.first()),
            (ResultType::Known(found), Some(expected)) if found != *expected => {
                let error = SemanticError::TypeMismatch {
                    expected: expected.to_string(),
                    found: found.to_string(),
                    span: tokens[0].span.clone(),
                };
                return Err(self.fail(error, tokens.first()));
            }
            _ => {}
        }

        trace!(ty = %node.result_type(), "synthesized expression");
        Ok(node)
    }

    /// 合成但不做结果类型的后处理
    ///
    /// 分析期间新增了任何错误都返回失败。
    pub(crate) fn synthesize_run(&mut self, tokens: &[Token]) -> AnalysisResult<TypedExpr> {
        let watermark = self.sink.error_count();

        let node = match tokens {
            [] => Err(self.fail(SemanticError::InvalidSyntax { span: 0..0 }, None)),
            [token] => self.synthesize_token(token),
            _ => match compose_name(tokens) {
                Some(name) => self.resolve_name(name, tokens),
                None if self.is_name_call_expression(tokens, true) => {
                    self.generate_call_or_init(tokens)
                }
                None => {
                    let operators = Rc::clone(&self.operators);
                    operators.assemble(tokens, self)
                }
            },
        }?;

        if self.sink.error_count() > watermark {
            return Err(Aborted);
        }
        Ok(node)
    }

    fn synthesize_token(&mut self, token: &Token) -> AnalysisResult<TypedExpr> {
        let track = self.options.track_effects;

        match &token.kind {
            // 'Hello', "Hello", c'H'
            TokenKind::Str(raw) => {
                let (value, ty) = string_literal(raw);
                Ok(ExprBuilder::literal(value, ty).finish(track))
            }
            TokenKind::Number(raw) => {
                Ok(ExprBuilder::literal(raw.as_str(), number_type(raw)).finish(track))
            }
            TokenKind::Name(name) if name == "True" || name == "False" => {
                Ok(ExprBuilder::literal(name.as_str(), Type::Bool).finish(track))
            }
            TokenKind::Name(name) if RESERVED_WORDS.contains(&name.as_str()) => {
                let span = token.span.clone();
                Err(self.fail(SemanticError::InvalidSyntax { span }, Some(token)))
            }
            TokenKind::Name(name) => self.resolve_name(name.clone(), std::slice::from_ref(token)),
            TokenKind::Tuple(items) => {
                let nodes = self.tuple_elements(items, token)?;
                Ok(ExprBuilder::collection(Collection::Tuple, nodes).finish(track))
            }
            TokenKind::Group(delimiter, inner) => self.synthesize_group(*delimiter, inner),
            TokenKind::Op(_)
            | TokenKind::Dot
            | TokenKind::Comment(_)
            | TokenKind::Newline
            | TokenKind::EndMarker => {
                let span = token.span.clone();
                Err(self.fail(SemanticError::InvalidSyntax { span }, Some(token)))
            }
        }
    }

    /// 名字引用：函数取返回类型，其余取声明类型
    fn resolve_name(&mut self, name: String, tokens: &[Token]) -> AnalysisResult<TypedExpr> {
        let symbols = self.symbols;
        match symbols.lookup(&name) {
            Some(symbol) => {
                trace!(name = %name, kind = ?symbol.kind(), "resolved name");
                Ok(ExprBuilder::name(name, symbol.value_type()).finish(self.options.track_effects))
            }
            None => {
                let span = tokens.last().map(|t| t.span.clone()).unwrap_or(0..0);
                Err(self.fail(SemanticError::UndefinedName { name, span }, tokens.last()))
            }
        }
    }

    fn tuple_elements(&mut self, items: &[Vec<Token>], at: &Token) -> AnalysisResult<Vec<TypedExpr>> {
        let items = trim_trailing(items);
        let mut nodes = Vec::with_capacity(items.len());
        for item in items {
            if item.is_empty() {
                let span = at.span.clone();
                return Err(self.fail(SemanticError::InvalidSyntax { span }, Some(at)));
            }
            nodes.push(self.generate_expression(item, None)?);
        }
        Ok(nodes)
    }

    /// 括号组：`()` 透传，`[]` 是 list，`{}` 是 set（空的 `{}` 是 dict）
    fn synthesize_group(&mut self, delimiter: Delimiter, inner: &[Token]) -> AnalysisResult<TypedExpr> {
        let track = self.options.track_effects;

        if inner.is_empty() {
            let builder = match delimiter {
                Delimiter::Paren => ExprBuilder::collection(Collection::Tuple, Vec::new()),
                Delimiter::Bracket => ExprBuilder::collection(Collection::List, Vec::new()),
                Delimiter::Brace => ExprBuilder::dict(),
            };
            return Ok(builder.finish(track));
        }

        let node = self.synthesize_run(inner)?;
        let collection = match delimiter {
            Delimiter::Paren => return Ok(node),
            Delimiter::Bracket => Collection::List,
            Delimiter::Brace => Collection::Set,
        };

        // [a, b] 的元素是元组的各项；[a] 只有一个元素
        let inner_is_tuple = matches!(inner, [token] if matches!(token.kind, TokenKind::Tuple(_)));
        let items = match node.into_tuple_items() {
            Ok(items) if inner_is_tuple => items,
            Ok(items) => vec![ExprBuilder::collection(Collection::Tuple, items).finish(track)],
            Err(node) => vec![node],
        };
        Ok(ExprBuilder::collection(collection, items).finish(track))
    }
}
