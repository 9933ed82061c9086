//! Quill Diagnostics
//!
//! 统一的诊断系统。表达式分析器把所有错误与警告写入 [`DiagnosticSink`]，
//! 驱动层在分析结束后通过 [`Emitter`] 输出。
//!
//! # 核心类型
//!
//! - [`Diagnostic`] - 诊断信息主体
//! - [`DiagnosticLevel`] - 诊断级别（Error/Warning/Note）
//! - [`DiagnosticSink`] - 只追加的诊断收集器
//! - [`Emitter`] - 诊断输出器
//! - [`Span`] - 源码位置信息
//!
//! # 示例
//!
//! ```rust
//! use quill_diagnostics::{Diagnostic, DiagnosticSink, Emitter};
//!
//! let mut sink = DiagnosticSink::new();
//!
//! sink.add(
//!     Diagnostic::error("TypeError: expected type `i32`, got `str`")
//!         .span(10..20)
//!         .with_file("main.q"),
//! );
//!
//! if sink.has_errors() {
//!     let emitter = Emitter::without_colors();
//!     emitter.emit_all(sink.diagnostics());
//! }
//! ```

pub mod diagnostic;
pub mod emitter;
pub mod level;
pub mod sink;
pub mod span;

// 重新导出核心类型
pub use diagnostic::Diagnostic;
pub use emitter::Emitter;
pub use level::DiagnosticLevel;
pub use sink::DiagnosticSink;
pub use span::{Span, SpanExt};
