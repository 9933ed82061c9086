//! DiagnosticSink - 诊断收集器
//!
//! 只追加的诊断日志。分析器通过 [`DiagnosticSink::error_count`] 的前后对比判断
//! 某个表达式分析期间是否出现过错误，日志本身不参与控制流。

use crate::diagnostic::Diagnostic;
use crate::level::DiagnosticLevel;

/// 诊断收集器
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    /// 收集的诊断列表
    diagnostics: Vec<Diagnostic>,
    /// 错误数量
    errors: usize,
}

impl DiagnosticSink {
    /// 创建新的诊断收集器
    pub fn new() -> Self {
        Self::default()
    }

    /// 添加诊断
    pub fn add(&mut self, diagnostic: Diagnostic) {
        if diagnostic.level.is_error() {
            self.errors += 1;
        }
        self.diagnostics.push(diagnostic);
    }

    /// 添加错误
    pub fn error(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::error(message));
    }

    /// 添加警告
    pub fn warning(&mut self, message: impl Into<String>) {
        self.add(Diagnostic::warning(message));
    }

    /// 是否有错误
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// 获取所有诊断
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// 取出所有诊断
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// 获取错误数量
    pub fn error_count(&self) -> usize {
        self.errors
    }

    /// 获取警告数量
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| matches!(d.level, DiagnosticLevel::Warning))
            .count()
    }

    /// 所有错误诊断
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.level.is_error())
    }

    /// 获取诊断数量
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

impl Extend<Diagnostic> for DiagnosticSink {
    fn extend<T: IntoIterator<Item = Diagnostic>>(&mut self, iter: T) {
        for diagnostic in iter {
            self.add(diagnostic);
        }
    }
}
