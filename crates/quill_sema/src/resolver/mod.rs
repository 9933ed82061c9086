//! Name Resolver
//!
//! 把声明文件转换成符号表。
//!
//! - Pass 1: 收集所有结构体名，类型名的解析不依赖声明顺序
//! - Pass 2: 定义函数、结构体与变量；处于 `module` 之下的声明额外以限定名注册

pub mod decl;
mod types;

use crate::error::SemanticError;
use crate::scope::ScopeStack;
use std::collections::HashMap;
use quill_syntax::Decl;
use tracing::debug;

/// 名称解析器
pub struct Resolver {
    pub(crate) scopes: ScopeStack,
    pub(crate) errors: Vec<SemanticError>,
    /// 结构体名（本地名与限定名）-> 限定名
    pub(crate) struct_names: HashMap<String, String>,
    /// 当前 `module` 前缀
    pub(crate) module: Option<String>,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            scopes: ScopeStack::new(),
            errors: Vec::new(),
            struct_names: HashMap::new(),
            module: None,
        }
    }

    /// 解析全部声明
    pub fn resolve(&mut self, decls: &[Decl]) -> Result<(), Vec<SemanticError>> {
        debug!(decls = decls.len(), "resolving declarations");

        // Pass 1: 收集结构体名
        for decl in decls {
            decl::collect_struct_name(self, decl);
        }
        self.module = None;

        // Pass 2: 定义符号
        for decl in decls {
            decl::define_decl(self, decl);
        }

        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }

    /// 带当前模块前缀的名字
    pub(crate) fn qualify(&self, name: &str) -> String {
        match &self.module {
            Some(module) => format!("{}.{}", module, name),
            None => name.to_string(),
        }
    }

    // --- Accessors ---

    pub fn scopes(&self) -> &ScopeStack {
        &self.scopes
    }

    pub fn into_scopes(self) -> ScopeStack {
        self.scopes
    }

    pub fn errors(&self) -> &[SemanticError] {
        &self.errors
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}
