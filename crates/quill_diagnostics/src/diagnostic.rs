//! Diagnostic - 诊断信息
//!
//! 一条诊断对应汇报接口 `report(path, message, offending_token, severity)` 的一次调用：
//! 文件路径、消息、出错 token 的位置以及级别。

use crate::level::DiagnosticLevel;
use crate::span::Span;

/// 诊断信息
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// 诊断级别
    pub level: DiagnosticLevel,
    /// 主要消息（含错误分类前缀，如 `TypeError: ...`）
    pub message: String,
    /// 源文件路径（可选）
    pub file: Option<String>,
    /// 出错 token 的字节范围（可选）
    pub span: Option<Span>,
    /// 出错 token 所在行号，从 1 开始（可选）
    pub line: Option<usize>,
    /// 补充注释
    pub notes: Vec<String>,
    /// 修复建议
    pub help: Vec<String>,
}

impl Diagnostic {
    /// 创建新的诊断
    pub fn new(level: DiagnosticLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            file: None,
            span: None,
            line: None,
            notes: Vec::new(),
            help: Vec::new(),
        }
    }

    /// 创建错误诊断
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Error, message)
    }

    /// 创建警告诊断
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Warning, message)
    }

    /// 创建注释诊断
    pub fn note(message: impl Into<String>) -> Self {
        Self::new(DiagnosticLevel::Note, message)
    }

    /// 设置位置信息
    pub fn span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// 设置行号
    pub fn line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    /// 设置文件路径
    pub fn with_file(mut self, path: impl Into<String>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// 添加注释
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// 添加建议
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// `path:line` 形式的位置描述
    pub fn location(&self) -> Option<String> {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => Some(format!("{}:{}", file, line)),
            (Some(file), None) => Some(file.clone()),
            (None, Some(line)) => Some(format!("<input>:{}", line)),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::error("TypeError: expected type `i32`, got `str`")
            .span(0..10)
            .line(3)
            .with_file("main.q")
            .with_note("argument `x` of `f`")
            .with_help("convert the argument first");

        assert_eq!(diag.level, DiagnosticLevel::Error);
        assert_eq!(diag.span, Some(0..10));
        assert_eq!(diag.notes.len(), 1);
        assert_eq!(diag.help, vec!["convert the argument first".to_string()]);
        assert_eq!(diag.location().as_deref(), Some("main.q:3"));
    }

    #[test]
    fn test_different_levels() {
        assert_eq!(Diagnostic::error("e").level, DiagnosticLevel::Error);
        assert_eq!(Diagnostic::warning("w").level, DiagnosticLevel::Warning);
        assert_eq!(Diagnostic::note("n").level, DiagnosticLevel::Note);
    }

    #[test]
    fn test_location_without_file() {
        assert_eq!(Diagnostic::warning("w").location(), None);
        assert_eq!(
            Diagnostic::warning("w").line(7).location().as_deref(),
            Some("<input>:7")
        );
    }
}
