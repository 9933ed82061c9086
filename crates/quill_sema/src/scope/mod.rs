//! Scope Management
//!
//! 作用域管理，处理嵌套作用域和符号查找。
//! 采用栈式作用域设计，全局作用域之下可以嵌套函数与块作用域。

use std::collections::HashMap;

pub mod stack;
pub use stack::ScopeStack;

/// 符号 ID，用于在符号表中唯一标识
pub type SymbolId = usize;

/// 作用域 ID
pub type ScopeId = usize;

/// 单个作用域
#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    pub kind: ScopeKind,
    symbols: HashMap<String, SymbolId>,
}

/// 作用域类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    /// 全局作用域
    Global,
    /// 函数作用域
    Function,
    /// 块作用域
    Block,
}

impl Scope {
    pub fn new(id: ScopeId, parent: Option<ScopeId>, kind: ScopeKind) -> Self {
        Self {
            id,
            parent,
            kind,
            symbols: HashMap::new(),
        }
    }

    /// 在当前作用域定义符号
    pub fn define(&mut self, name: String, symbol_id: SymbolId) {
        self.symbols.insert(name, symbol_id);
    }

    /// 在当前作用域查找符号（不向上查找）
    pub fn lookup_local(&self, name: &str) -> Option<SymbolId> {
        self.symbols.get(name).copied()
    }
}
