//! Expression Analysis
//!
//! 表达式分析核心：先分类、再合成。
//!
//! - [`classify`]: 纯语法判断，这个 token 序列是值表达式、类型表达式还是名字调用？
//! - [`synth`]: 构建带类型的表达式树，解析名字、推导字面量类型
//! - [`call`]: 函数调用与结构体初始化，检查参数个数与参数类型
//!
//! 失败路径先把原因写入 [`DiagnosticSink`]，再返回 `Err(Aborted)`；
//! 调用方只看 `Result`，诊断日志只面向用户。

use crate::error::SemanticError;
use crate::operators::{OperandSynthesizer, OperatorAssembler};
use crate::symbol::SymbolLookup;
use crate::types::Type;
use quill_diagnostics::{Diagnostic, DiagnosticSink};
use quill_syntax::Token;
use std::rc::Rc;
use thiserror::Error;
use tracing::debug;

pub mod call;
pub mod classify;
pub mod node;
pub mod synth;

#[cfg(test)]
mod tests;

pub use node::{BoundField, TypedExpr, TypedExprKind};

/// 无法推导结果类型时的警告
pub const UNDETERMINED_RETURN: &str = "return type cannot be determined";

/// 表达式分析失败标记，原因已经写入诊断日志
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("expression analysis aborted")]
pub struct Aborted;

pub type AnalysisResult<T> = Result<T, Aborted>;

/// 分析选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// 在输出节点上保留 `has_effect`
    pub track_effects: bool,
}

/// 按字面量规则定型的节点（用于参数默认值）
pub fn literal_node(value: impl Into<String>, ty: Type) -> TypedExpr {
    node::ExprBuilder::literal(value, ty).finish(false)
}

/// 表达式分析器
pub struct ExprAnalyzer<'a> {
    symbols: &'a dyn SymbolLookup,
    sink: &'a mut DiagnosticSink,
    path: String,
    options: AnalyzerOptions,
    operators: Rc<OperatorAssembler>,
}

impl<'a> ExprAnalyzer<'a> {
    pub fn new(
        symbols: &'a dyn SymbolLookup,
        sink: &'a mut DiagnosticSink,
        path: impl Into<String>,
    ) -> Self {
        Self {
            symbols,
            sink,
            path: path.into(),
            options: AnalyzerOptions::default(),
            operators: Rc::new(OperatorAssembler::new()),
        }
    }

    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    /// 共享运算符注册表，避免每个分析器重建
    pub fn with_operators(mut self, operators: Rc<OperatorAssembler>) -> Self {
        self.operators = operators;
        self
    }

    pub fn options(&self) -> AnalyzerOptions {
        self.options
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// 记录错误，位置取出错 token
    pub(crate) fn report(&mut self, error: SemanticError, token: Option<&Token>) {
        debug!(kind = %error.kind(), "{}", error);
        self.push(Diagnostic::error(error.to_string()), token);
    }

    pub(crate) fn warn(&mut self, message: &str, token: Option<&Token>) {
        debug!("warning: {}", message);
        self.push(Diagnostic::warning(message), token);
    }

    /// 记录错误并返回失败标记
    pub(crate) fn fail(&mut self, error: SemanticError, token: Option<&Token>) -> Aborted {
        self.report(error, token);
        Aborted
    }

    fn push(&mut self, mut diagnostic: Diagnostic, token: Option<&Token>) {
        if !self.path.is_empty() {
            diagnostic = diagnostic.with_file(self.path.clone());
        }
        if let Some(token) = token {
            diagnostic = diagnostic.span(token.span.clone()).line(token.line);
        }
        self.sink.add(diagnostic);
    }
}

impl OperandSynthesizer for ExprAnalyzer<'_> {
    fn synthesize(&mut self, tokens: &[Token]) -> AnalysisResult<TypedExpr> {
        self.synthesize_run(tokens)
    }

    fn is_strict_call(&self, tokens: &[Token]) -> bool {
        self.is_name_call_expression(tokens, true)
    }

    fn generate_call(&mut self, tokens: &[Token]) -> AnalysisResult<TypedExpr> {
        self.generate_call_or_init(tokens)
    }

    fn report(&mut self, error: SemanticError, token: Option<&Token>) {
        ExprAnalyzer::report(self, error, token);
    }

    fn track_effects(&self) -> bool {
        self.options.track_effects
    }
}
