//! Span - 源码位置信息

/// 源码位置范围 (字节偏移)
pub type Span = std::ops::Range<usize>;

/// Span 辅助函数
pub trait SpanExt {
    /// 覆盖两个位置的最小范围
    fn join(&self, other: &Span) -> Span;

    /// 字节宽度
    fn width(&self) -> usize;
}

impl SpanExt for Span {
    fn join(&self, other: &Span) -> Span {
        self.start.min(other.start)..self.end.max(other.end)
    }

    fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}
