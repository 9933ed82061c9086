//! Emitter - 诊断输出器
//!
//! 负责将诊断信息格式化输出。附带源码时使用 ariadne 渲染源码片段，
//! 否则退化为单行文本输出。

use crate::diagnostic::Diagnostic;
use crate::level::DiagnosticLevel;
use ariadne::{Color, Config, Label, Report, ReportKind, Source};
use colored::*;

/// 诊断输出器
pub struct Emitter {
    /// 是否使用颜色
    use_colors: bool,
    /// (文件路径, 源码)，用于渲染源码片段
    source: Option<(String, String)>,
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter {
    /// 创建新的输出器
    pub fn new() -> Self {
        Self {
            use_colors: true,
            source: None,
        }
    }

    /// 创建无颜色的输出器
    pub fn without_colors() -> Self {
        Self {
            use_colors: false,
            source: None,
        }
    }

    /// 附带源码，诊断带位置时输出源码片段
    pub fn with_source(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.source = Some((path.into(), source.into()));
        self
    }

    /// 输出单个诊断到 stderr
    pub fn emit(&self, diagnostic: &Diagnostic) {
        eprint!("{}", self.render(diagnostic));
    }

    /// 输出所有诊断
    pub fn emit_all(&self, diagnostics: &[Diagnostic]) {
        for diagnostic in diagnostics {
            self.emit(diagnostic);
            eprintln!(); // 诊断之间空行
        }
    }

    /// 渲染为字符串
    pub fn render(&self, diagnostic: &Diagnostic) -> String {
        if let Some(snippet) = self.render_snippet(diagnostic) {
            return snippet;
        }
        if self.use_colors {
            self.render_colored(diagnostic)
        } else {
            self.render_plain(diagnostic)
        }
    }

    /// 使用 ariadne 渲染源码片段
    fn render_snippet(&self, diagnostic: &Diagnostic) -> Option<String> {
        let (path, source) = self.source.as_ref()?;
        let span = diagnostic.span.clone()?;
        let end = span.end.min(source.len());
        let start = span.start.min(end);

        let kind = match diagnostic.level {
            DiagnosticLevel::Error => ReportKind::Error,
            DiagnosticLevel::Warning => ReportKind::Warning,
            DiagnosticLevel::Note => ReportKind::Advice,
        };
        let color = match diagnostic.level {
            DiagnosticLevel::Error => Color::Red,
            DiagnosticLevel::Warning => Color::Yellow,
            DiagnosticLevel::Note => Color::Cyan,
        };

        let mut report = Report::build(kind, path.as_str(), start)
            .with_config(Config::default().with_color(self.use_colors))
            .with_message(&diagnostic.message)
            .with_label(
                Label::new((path.as_str(), start..end))
                    .with_message(diagnostic.level.name())
                    .with_color(color),
            );
        for note in &diagnostic.notes {
            report = report.with_note(note);
        }
        for help in &diagnostic.help {
            report = report.with_help(help);
        }

        let mut buf = Vec::new();
        report
            .finish()
            .write((path.as_str(), Source::from(source.clone())), &mut buf)
            .ok()?;
        String::from_utf8(buf).ok()
    }

    /// 带颜色的单行诊断
    fn render_colored(&self, diagnostic: &Diagnostic) -> String {
        let mut out = format!(
            "{}: {}\n",
            diagnostic.level.colored_name(),
            diagnostic.message.bold()
        );

        if let Some(location) = diagnostic.location() {
            out.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!(
                "  {} {}\n",
                "=".blue().bold(),
                format!("note: {}", note).bright_black()
            ));
        }
        for help in &diagnostic.help {
            out.push_str(&format!(
                "  {} {}\n",
                "=".green().bold(),
                format!("help: {}", help).green()
            ));
        }
        out
    }

    /// 纯文本诊断
    fn render_plain(&self, diagnostic: &Diagnostic) -> String {
        let mut out = format!("{}: {}\n", diagnostic.level, diagnostic.message);

        if let Some(location) = diagnostic.location() {
            out.push_str(&format!("  --> {}\n", location));
        }
        for note in &diagnostic.notes {
            out.push_str(&format!("  = note: {}\n", note));
        }
        for help in &diagnostic.help {
            out.push_str(&format!("  = help: {}\n", help));
        }
        out
    }
}
