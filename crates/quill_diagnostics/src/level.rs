//! DiagnosticLevel - 诊断级别
//!
//! 表达式分析只产生两类会影响结果的诊断：错误（中止当前表达式）与警告（继续分析）。
//! Note 用于补充说明。

use colored::*;
use std::fmt;

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticLevel {
    /// 错误 - 当前表达式分析失败
    Error,
    /// 警告 - 不影响分析结果（例如无法确定返回类型）
    Warning,
    /// 注释 - 补充说明
    Note,
}

impl DiagnosticLevel {
    /// 获取级别名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }

    /// 获取带颜色的级别名称
    pub fn colored_name(&self) -> ColoredString {
        match self {
            Self::Error => self.name().red().bold(),
            Self::Warning => self.name().yellow().bold(),
            Self::Note => self.name().bright_black().bold(),
        }
    }

    /// 是否为错误
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_name() {
        assert_eq!(DiagnosticLevel::Error.name(), "error");
        assert_eq!(DiagnosticLevel::Warning.name(), "warning");
        assert_eq!(DiagnosticLevel::Note.name(), "note");
    }

    #[test]
    fn test_only_errors_are_errors() {
        assert!(DiagnosticLevel::Error.is_error());
        assert!(!DiagnosticLevel::Warning.is_error());
        assert!(!DiagnosticLevel::Note.is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", DiagnosticLevel::Error), "error");
        assert_eq!(format!("{}", DiagnosticLevel::Warning), "warning");
    }
}
