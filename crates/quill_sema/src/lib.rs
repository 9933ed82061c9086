//! Quill Semantic Analysis
//!
//! 表达式分析核心，负责：
//! - 名称解析 (Resolver)：声明文件 -> 符号表
//! - 表达式分类 (classify)：这个 token 序列是不是值表达式 / 类型表达式 / 名字调用
//! - 表达式合成 (synth / call)：构建带类型的表达式节点
//! - 运算符 (operators)：类型规则与优先级组装
//!
//! # 失败约定
//!
//! 表达式分析的每一步都返回 [`AnalysisResult`]。失败时原因已经写入
//! [`quill_diagnostics::DiagnosticSink`]，调用方只需要传播 `Err(Aborted)`。

pub mod error;
pub mod expr;
pub mod operators;
pub mod resolver;
pub mod scope;
pub mod symbol;
pub mod types;

// 重新导出核心类型
pub use error::{ErrorKind, SemanticError};
pub use expr::{
    Aborted, AnalysisResult, AnalyzerOptions, BoundField, ExprAnalyzer, TypedExpr, TypedExprKind,
    UNDETERMINED_RETURN,
};
pub use operators::{BinaryOpRegistry, OperatorAssembler, UnaryOpRegistry};
pub use resolver::Resolver;
pub use scope::{Scope, ScopeId, ScopeKind, ScopeStack, SymbolId};
pub use symbol::{
    FunctionSymbol, ParamInfo, StructSymbol, Symbol, SymbolKind, SymbolLookup, VariableSymbol,
};
pub use types::{ResultType, Type};

use quill_syntax::Decl;

/// 从声明构建符号表
///
/// # Errors
///
/// 返回所有收集到的语义错误
pub fn resolve_declarations(decls: &[Decl]) -> Result<ScopeStack, Vec<SemanticError>> {
    let mut resolver = Resolver::new();
    resolver.resolve(decls)?;
    Ok(resolver.into_scopes())
}
