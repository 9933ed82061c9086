use super::{Scope, ScopeId, ScopeKind, SymbolId};
use crate::error::SemanticError;
use crate::symbol::{Symbol, SymbolLookup};

/// 作用域栈 - 管理嵌套作用域
#[derive(Debug)]
pub struct ScopeStack {
    scopes: Vec<Scope>,
    current: ScopeId,
    // 存储所有的符号
    symbols: Vec<Symbol>,
}

impl ScopeStack {
    /// 创建新的作用域栈，初始化全局作用域
    pub fn new() -> Self {
        let global_scope = Scope::new(0, None, ScopeKind::Global);
        Self {
            scopes: vec![global_scope],
            current: 0,
            symbols: Vec::new(),
        }
    }

    /// 进入新作用域
    pub fn enter_scope(&mut self, kind: ScopeKind) -> ScopeId {
        let id = self.scopes.len();
        let new_scope = Scope::new(id, Some(self.current), kind);
        self.scopes.push(new_scope);
        self.current = id;
        id
    }

    /// 退出当前作用域，返回到父作用域；全局作用域不变
    pub fn exit_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current].parent {
            self.current = parent;
        }
    }

    /// 获取当前作用域类型
    pub fn current_scope_kind(&self) -> ScopeKind {
        self.scopes[self.current].kind
    }

    /// 在当前作用域定义符号
    ///
    /// 如果已存在同名符号，返回 DuplicateDefinition 错误
    pub fn define(&mut self, symbol: Symbol) -> Result<SymbolId, SemanticError> {
        let name = symbol.name().to_string();
        self.check_free(&name, symbol.span())?;

        let id = self.symbols.len();
        self.symbols.push(symbol);
        self.scopes[self.current].define(name, id);
        Ok(id)
    }

    /// 给已定义的符号增加一个别名（模块限定名）
    pub fn alias(&mut self, name: String, id: SymbolId) -> Result<(), SemanticError> {
        let span = match self.symbols.get(id) {
            Some(symbol) => symbol.span().clone(),
            None => return Ok(()),
        };
        self.check_free(&name, &span)?;
        self.scopes[self.current].define(name, id);
        Ok(())
    }

    fn check_free(&self, name: &str, span: &quill_diagnostics::Span) -> Result<(), SemanticError> {
        match self.scopes[self.current].lookup_local(name) {
            Some(prev_id) => Err(SemanticError::DuplicateDefinition {
                name: name.to_string(),
                span: span.clone(),
                previous_span: self.symbols[prev_id].span().clone(),
            }),
            None => Ok(()),
        }
    }

    /// 查找符号 ID（从当前作用域向上查找）
    pub fn lookup_id(&self, name: &str) -> Option<SymbolId> {
        let mut current_id = self.current;
        loop {
            if let Some(symbol_id) = self.scopes[current_id].lookup_local(name) {
                return Some(symbol_id);
            }

            match self.scopes[current_id].parent {
                Some(parent) => current_id = parent,
                None => return None,
            }
        }
    }

    /// 仅在当前作用域查找（不向上查找）
    pub fn lookup_local(&self, name: &str) -> Option<&Symbol> {
        self.scopes[self.current]
            .lookup_local(name)
            .and_then(|id| self.symbols.get(id))
    }

    /// 仅在全局作用域查找符号
    pub fn lookup_global(&self, name: &str) -> Option<&Symbol> {
        self.scopes[0]
            .lookup_local(name)
            .and_then(|id| self.symbols.get(id))
    }

    /// 根据 ID 获取符号
    pub fn get_symbol(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id)
    }

    /// 获取所有符号（按定义顺序）
    pub fn all_symbols(&self) -> &[Symbol] {
        &self.symbols
    }
}

impl SymbolLookup for ScopeStack {
    /// 从当前作用域向上查找
    fn lookup(&self, name: &str) -> Option<&Symbol> {
        self.lookup_id(name).and_then(|id| self.symbols.get(id))
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
