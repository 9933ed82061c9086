//! Quill Driver
//!
//! 串联分析流程：
//! 1. 声明文件（prelude）-> 符号表
//! 2. 源文件按顶层行切分，每行作为一个表达式交给分析器

pub mod error;

pub use error::{CompileError, CompileResult};

use quill_diagnostics::{DiagnosticSink, Span};
use quill_sema::{
    resolve_declarations, AnalyzerOptions, ExprAnalyzer, OperatorAssembler, ScopeStack, Symbol,
    SymbolLookup, Type, TypedExpr,
};
use quill_syntax::{parse_declarations, split_lines, tokenize, Token, TokenKind};
use std::rc::Rc;
use tracing::{debug, info};

/// 单行的分析结果
#[derive(Debug)]
pub struct LineAnalysis {
    /// 行号，从 1 开始
    pub line: usize,
    /// 该行表达式在源码中的范围
    pub span: Span,
    /// 分析失败时为 None，原因在诊断日志里
    pub expr: Option<TypedExpr>,
}

/// 整个源文件的分析结果
#[derive(Debug)]
pub struct Analysis {
    pub lines: Vec<LineAnalysis>,
    pub sink: DiagnosticSink,
}

impl Analysis {
    pub fn has_errors(&self) -> bool {
        self.sink.has_errors()
    }

    /// 成功合成的表达式
    pub fn exprs(&self) -> impl Iterator<Item = &TypedExpr> {
        self.lines.iter().filter_map(|line| line.expr.as_ref())
    }
}

/// 解析声明文件，构建符号表
pub fn load_prelude(source: &str) -> CompileResult<ScopeStack> {
    let decls = parse_declarations(source).map_err(CompileError::ParseErrors)?;
    debug!(decls = decls.len(), "parsed prelude");
    resolve_declarations(&decls).map_err(CompileError::SemanticErrors)
}

/// 从文件加载声明
pub fn load_prelude_file(path: &str) -> CompileResult<ScopeStack> {
    let source = std::fs::read_to_string(path)?;
    load_prelude(&source)
}

/// 分析源码中的每个顶层行
pub fn analyze_source(
    symbols: &dyn SymbolLookup,
    path: &str,
    source: &str,
    options: AnalyzerOptions,
) -> CompileResult<Analysis> {
    let tokens = tokenize(source)?;
    let runs = split_lines(tokens);
    info!(path, lines = runs.len(), "analyzing source");

    let operators = Rc::new(OperatorAssembler::new());
    let mut sink = DiagnosticSink::new();
    let mut lines = Vec::with_capacity(runs.len());
    {
        let mut analyzer = ExprAnalyzer::new(symbols, &mut sink, path)
            .with_options(options)
            .with_operators(operators);
        for run in &runs {
            let expr = analyzer.generate_expression(run, None).ok();
            lines.push(LineAnalysis {
                line: run[0].line,
                span: run_span(run),
                expr,
            });
        }
    }

    debug!(
        errors = sink.error_count(),
        warnings = sink.warning_count(),
        "analysis finished"
    );
    Ok(Analysis { lines, sink })
}

/// 分析一个表达式；换行不切分
pub fn analyze_expression(
    symbols: &dyn SymbolLookup,
    source: &str,
    expected: Option<&Type>,
    options: AnalyzerOptions,
) -> CompileResult<Analysis> {
    let run: Vec<Token> = tokenize(source)?
        .into_iter()
        .filter(|t| !matches!(t.kind, TokenKind::Newline | TokenKind::EndMarker))
        .collect();

    let mut sink = DiagnosticSink::new();
    let expr = ExprAnalyzer::new(symbols, &mut sink, "")
        .with_options(options)
        .generate_expression(&run, expected)
        .ok();

    let line = LineAnalysis {
        line: run.first().map_or(1, |t| t.line),
        span: run_span(&run),
        expr,
    };
    Ok(Analysis {
        lines: vec![line],
        sink,
    })
}

/// 类型名 -> 类型：内置类型，否则符号表中的结构体
pub fn resolve_type_name(symbols: &dyn SymbolLookup, name: &str) -> CompileResult<Type> {
    if let Some(ty) = Type::from_name(name) {
        return Ok(ty);
    }
    match symbols.lookup(name) {
        Some(Symbol::Struct(def)) => Ok(def.ty()),
        Some(_) => Err(CompileError::SemanticErrors(vec![
            quill_sema::SemanticError::NotAType {
                name: name.to_string(),
                span: 0..0,
            },
        ])),
        None => Err(CompileError::SemanticErrors(vec![
            quill_sema::SemanticError::UnknownType {
                name: name.to_string(),
                span: 0..0,
            },
        ])),
    }
}

fn run_span(run: &[Token]) -> Span {
    match (run.first(), run.last()) {
        (Some(first), Some(last)) => first.span.start..last.span.end,
        _ => 0..0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_type_name() {
        let symbols = load_prelude("struct Point(x: i32, y: i32)\nfn f()").unwrap();
        assert_eq!(resolve_type_name(&symbols, "u16").unwrap().to_string(), "u16");
        assert_eq!(
            resolve_type_name(&symbols, "Point").unwrap(),
            Type::Named("Point".to_string())
        );
        assert!(matches!(
            resolve_type_name(&symbols, "f"),
            Err(CompileError::SemanticErrors(_))
        ));
        assert!(resolve_type_name(&symbols, "Vector").is_err());
    }

    #[test]
    fn test_run_span() {
        let run = split_lines(tokenize("  add(1, 2) + 3").unwrap()).remove(0);
        assert_eq!(run_span(&run), 2..15);
        assert_eq!(run_span(&[]), 0..0);
    }
}
