//! Expression Classifier
//!
//! 向前看的语法判断，不构建节点。判断为真的序列交给合成器时
//! 不会再出现 SyntaxError；名字解析失败仍然会在这里报告。

use super::synth::trim_trailing;
use super::ExprAnalyzer;
use crate::error::SemanticError;
use crate::operators::{is_operator, OperatorSet};
use crate::symbol::{compose_name, local_name, SymbolKind, RESERVED_WORDS};
use quill_syntax::{Token, TokenKind};

impl ExprAnalyzer<'_> {
    /// 是否是值表达式
    ///
    /// 1. 单个 token：字面量、布尔值、能解析的名字、元素全是值的元组、
    ///    空的或内容是值的括号组
    /// 2. 以一元运算符开头：其余部分是值
    /// 3. 在第一个二元运算符处切开：左边是名字调用或值，右边是值
    /// 4. 没有二元运算符：整个序列是名字调用
    pub fn is_value_expression(&mut self, tokens: &[Token]) -> bool {
        let (first, rest) = match tokens {
            [] => return false,
            [token] => return self.is_value_token(token),
            [first, rest @ ..] => (first, rest),
        };

        if is_operator(first, OperatorSet::Leading) && self.is_value_expression(rest) {
            return true;
        }

        match tokens
            .iter()
            .position(|t| is_operator(t, OperatorSet::Binary))
        {
            Some(k) => {
                let (left, right) = (&tokens[..k], &tokens[k + 1..]);
                (self.is_call_value(left) || self.is_value_expression(left))
                    && self.is_value_expression(right)
            }
            None => match compose_name(tokens) {
                Some(name) => self.resolves(&name, tokens),
                None => self.is_call_value(tokens),
            },
        }
    }

    fn is_value_token(&mut self, token: &Token) -> bool {
        match &token.kind {
            TokenKind::Str(_) | TokenKind::Number(_) => true,
            TokenKind::Name(name) if name == "True" || name == "False" => true,
            TokenKind::Name(name) if RESERVED_WORDS.contains(&name.as_str()) => false,
            TokenKind::Name(name) => self.resolves(name, std::slice::from_ref(token)),
            TokenKind::Tuple(items) => trim_trailing(items)
                .iter()
                .all(|item| self.is_value_expression(item)),
            TokenKind::Group(_, inner) => inner.is_empty() || self.is_value_expression(inner),
            _ => false,
        }
    }

    /// 名字能解析；否则报告 NameError
    fn resolves(&mut self, name: &str, tokens: &[Token]) -> bool {
        if self.symbols.exists(name) {
            return true;
        }
        let span = tokens.last().map(|t| t.span.clone()).unwrap_or(0..0);
        self.report(
            SemanticError::UndefinedName {
                name: name.to_string(),
                span,
            },
            tokens.last(),
        );
        false
    }

    /// 没有尾随 token 的名字调用，且每个实参都是值
    fn is_call_value(&mut self, tokens: &[Token]) -> bool {
        if !self.is_name_call_expression(tokens, true) {
            return false;
        }
        let Some(TokenKind::Group(_, inner)) = tokens.last().map(|t| &t.kind) else {
            return false;
        };
        match inner.as_slice() {
            [] => true,
            [Token {
                kind: TokenKind::Tuple(items),
                ..
            }] => {
                let items = trim_trailing(items);
                items.iter().all(|item| self.is_value_expression(item))
            }
            run => self.is_value_expression(run),
        }
    }

    /// 是否是类型表达式：名字且解析为结构体
    pub fn is_type_expression(&mut self, tokens: &[Token]) -> bool {
        let Some(name) = compose_name(tokens) else {
            let span = tokens.last().map(|t| t.span.clone()).unwrap_or(0..0);
            self.report(SemanticError::InvalidSyntax { span }, tokens.last());
            return false;
        };

        let span = tokens.last().map(|t| t.span.clone()).unwrap_or(0..0);
        let error = match self.symbols.kind_of(&name) {
            Some(SymbolKind::Struct) => return true,
            Some(_) => SemanticError::NotAType {
                name: local_name(&name).to_string(),
                span,
            },
            None => SemanticError::UndefinedName {
                name: local_name(&name).to_string(),
                span,
            },
        };
        self.report(error, tokens.last());
        false
    }

    /// 是否是名字调用：名字后面紧跟一个圆括号组
    ///
    /// `strict` 为真时括号组之后不能再有 token。
    pub fn is_name_call_expression(&self, tokens: &[Token], strict: bool) -> bool {
        let Some(at) = tokens.iter().position(Token::is_paren_group) else {
            return false;
        };
        if compose_name(&tokens[..at]).is_none() {
            return false;
        }
        !strict || at + 1 == tokens.len()
    }
}
