//! Driver Errors
//!
//! 驱动层的错误类型，集成统一诊断系统。表达式分析的错误不走这里，
//! 它们直接写入分析结果的诊断日志。

use quill_diagnostics::{Diagnostic, DiagnosticSink, Emitter};
use quill_sema::SemanticError;
use quill_syntax::{line_of, LexError, ParseError};
use thiserror::Error;

/// 驱动错误
#[derive(Debug, Error)]
pub enum CompileError {
    /// 词法错误
    #[error("Lexical error: {0}")]
    LexError(#[from] LexError),

    /// 声明文件解析错误（可能有多个）
    #[error("Parse errors:\n{}", format_errors(.0))]
    ParseErrors(Vec<ParseError>),

    /// 声明文件语义错误（可能有多个）
    #[error("Semantic errors:\n{}", format_errors(.0))]
    SemanticErrors(Vec<SemanticError>),

    /// IO 错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl CompileError {
    /// 转换为诊断列表并收集到 DiagnosticSink
    ///
    /// 给出源码时补上行号。
    pub fn collect_to_sink(
        &self,
        sink: &mut DiagnosticSink,
        file_path: Option<&str>,
        source: Option<&str>,
    ) {
        let mut add_diag = |mut diag: Diagnostic| {
            if let (Some(src), Some(span), None) = (source, &diag.span, diag.line) {
                diag.line = Some(line_of(src, span.start));
            }
            if let Some(path) = file_path {
                sink.add(diag.with_file(path));
            } else {
                sink.add(diag);
            }
        };

        match self {
            CompileError::LexError(err) => {
                add_diag(
                    Diagnostic::error(err.to_string())
                        .span(err.span().clone())
                        .line(err.line()),
                );
            }
            CompileError::ParseErrors(errors) => {
                for err in errors {
                    add_diag(
                        Diagnostic::error(err.to_string())
                            .span(err.span().clone())
                            .line(err.line()),
                    );
                }
            }
            CompileError::SemanticErrors(errors) => {
                for err in errors {
                    add_diag(err.to_diagnostic());
                }
            }
            CompileError::IoError(err) => {
                add_diag(Diagnostic::error(format!("IO error: {}", err)));
            }
        }
    }

    /// 使用统一诊断系统输出错误
    pub fn emit(&self, file_path: Option<&str>, source: Option<&str>, use_colors: bool) {
        let mut sink = DiagnosticSink::new();
        self.collect_to_sink(&mut sink, file_path, source);

        let mut emitter = if use_colors {
            Emitter::new()
        } else {
            Emitter::without_colors()
        };
        if let (Some(path), Some(src)) = (file_path, source) {
            emitter = emitter.with_source(path, src);
        }
        emitter.emit_all(sink.diagnostics());
    }
}

/// 格式化错误列表
fn format_errors<E: std::fmt::Display>(errors: &[E]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("  {}. {}", i + 1, e))
        .collect::<Vec<_>>()
        .join("\n")
}

/// 驱动结果类型
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_errors_get_lines() {
        let source = "let a\nfn f(x: Missing)";
        let error = CompileError::SemanticErrors(vec![SemanticError::UnknownType {
            name: "Missing".to_string(),
            span: 14..21,
        }]);

        let mut sink = DiagnosticSink::new();
        error.collect_to_sink(&mut sink, Some("prelude.qd"), Some(source));

        let diag = &sink.diagnostics()[0];
        assert_eq!(diag.message, "NameError: type `Missing` is not defined");
        assert_eq!(diag.line, Some(2));
        assert_eq!(diag.location().as_deref(), Some("prelude.qd:2"));
    }

    #[test]
    fn test_display_lists_every_error() {
        let error = CompileError::SemanticErrors(vec![
            SemanticError::UnknownType {
                name: "A".to_string(),
                span: 0..1,
            },
            SemanticError::UnknownType {
                name: "B".to_string(),
                span: 2..3,
            },
        ]);
        assert_eq!(
            error.to_string(),
            "Semantic errors:\n  1. NameError: type `A` is not defined\n  2. NameError: type `B` is not defined"
        );
    }
}
