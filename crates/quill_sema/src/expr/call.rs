//! Call / Struct-Init Resolution
//!
//! 名字调用的两种含义：函数调用与结构体初始化。结构体的每个字段都是
//! 必需的位置参数；函数按声明给出的必需个数与最大个数检查。

use super::node::ExprBuilder;
use super::synth::trim_trailing;
use super::{Aborted, AnalysisResult, BoundField, ExprAnalyzer, TypedExpr};
use crate::error::SemanticError;
use crate::symbol::{compose_name, local_name, FunctionSymbol, ParamInfo, StructSymbol, Symbol};
use crate::types::ResultType;
use indexmap::IndexMap;
use quill_syntax::{Token, TokenKind};
use tracing::debug;

/// 被调用者
enum Callee<'s> {
    Function(&'s FunctionSymbol),
    Struct(&'s StructSymbol),
}

impl<'s> Callee<'s> {
    fn name(&self) -> &'s str {
        match self {
            Callee::Function(func) => &func.name,
            Callee::Struct(def) => &def.name,
        }
    }

    /// 参数（字段）按声明顺序
    fn params(&self) -> &'s IndexMap<String, ParamInfo> {
        match self {
            Callee::Function(func) => &func.params,
            Callee::Struct(def) => &def.fields,
        }
    }

    /// (必需个数, 最大个数)
    fn arity(&self) -> (usize, usize) {
        match self {
            Callee::Function(func) => (func.positional_required, func.max_args),
            Callee::Struct(def) => (def.fields.len(), def.fields.len()),
        }
    }
}

impl ExprAnalyzer<'_> {
    /// 合成函数调用或结构体初始化
    pub fn generate_call_or_init(&mut self, tokens: &[Token]) -> AnalysisResult<TypedExpr> {
        let Some(at) = tokens.iter().position(Token::is_paren_group) else {
            return Err(self.syntax_error(tokens.last()));
        };
        let (head, paren) = (&tokens[..at], &tokens[at]);
        if at + 1 != tokens.len() {
            return Err(self.syntax_error(tokens.get(at + 1)));
        }
        let Some(name) = compose_name(head) else {
            return Err(self.syntax_error(head.first().or(Some(paren))));
        };

        let symbols = self.symbols;
        let callee = match symbols.lookup(&name) {
            Some(Symbol::Function(func)) => Callee::Function(func),
            Some(Symbol::Struct(def)) => Callee::Struct(def),
            _ => {
                let error = SemanticError::NotCallable {
                    name: local_name(&name).to_string(),
                    span: head[head.len() - 1].span.clone(),
                };
                return Err(self.fail(error, head.last()));
            }
        };

        let args = self.argument_runs(paren)?;
        self.check_arity(&callee, args.len(), paren)?;
        debug!(callee = %name, args = args.len(), "resolving call");

        let watermark = self.sink.error_count();
        let mut values = Vec::with_capacity(args.len());
        for (run, info) in args.iter().zip(callee.params().values()) {
            let value = self.generate_expression(run, None)?;

            // 类型不符时继续分析剩余实参，最后整体失败
            if let (ResultType::Known(expected), ResultType::Known(found)) =
                (info.expected_type(), value.result_type())
            {
                if expected != found {
                    let error = SemanticError::TypeMismatch {
                        expected: expected.to_string(),
                        found: found.to_string(),
                        span: run[0].span.clone(),
                    };
                    self.report(error, run.first());
                }
            }
            values.push(value);
        }
        if self.sink.error_count() > watermark {
            return Err(Aborted);
        }

        let track = self.options.track_effects;
        let node = match callee {
            Callee::Function(func) => {
                ExprBuilder::call(name, values, func.return_type.clone()).finish(track)
            }
            Callee::Struct(def) => {
                let fields = def
                    .fields
                    .iter()
                    .zip(values)
                    .map(|((field, info), value)| {
                        let bound = BoundField {
                            expected: info.expected_type(),
                            value,
                        };
                        (field.clone(), bound)
                    })
                    .collect();
                ExprBuilder::struct_init(name, def.qualified_name.clone(), fields).finish(track)
            }
        };
        Ok(node)
    }

    /// 括号内容切分成实参序列
    ///
    /// - 空：没有实参
    /// - 单个元组：每个元素一个实参，尾随的空元素丢弃
    /// - 其它：整体是一个实参
    fn argument_runs<'t>(&mut self, paren: &'t Token) -> AnalysisResult<Vec<&'t [Token]>> {
        let inner: &'t [Token] = match &paren.kind {
            TokenKind::Group(_, inner) => inner,
            _ => &[],
        };

        match inner {
            [] => Ok(Vec::new()),
            [Token {
                kind: TokenKind::Tuple(items),
                ..
            }] => {
                let items = trim_trailing(items);
                // f(1,,2)
                if items.iter().any(Vec::is_empty) {
                    return Err(self.syntax_error(Some(paren)));
                }
                Ok(items.iter().map(Vec::as_slice).collect())
            }
            run => Ok(vec![run]),
        }
    }

    fn check_arity(&mut self, callee: &Callee<'_>, given: usize, paren: &Token) -> AnalysisResult<()> {
        let (required, max) = callee.arity();

        if given > max {
            let error = SemanticError::TooManyArguments {
                name: callee.name().to_string(),
                max,
                given,
                span: paren.span.clone(),
            };
            return Err(self.fail(error, Some(paren)));
        }

        if given < required {
            let missing = callee
                .params()
                .keys()
                .skip(given)
                .take(required - given)
                .cloned()
                .collect();
            let error = SemanticError::MissingArguments {
                name: callee.name().to_string(),
                missing,
                span: paren.span.clone(),
            };
            return Err(self.fail(error, Some(paren)));
        }

        Ok(())
    }

    fn syntax_error(&mut self, token: Option<&Token>) -> Aborted {
        let span = token.map(|t| t.span.clone()).unwrap_or(0..0);
        self.fail(SemanticError::InvalidSyntax { span }, token)
    }
}
