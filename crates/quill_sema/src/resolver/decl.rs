use super::types::resolve_type_name;
use super::Resolver;
use crate::error::SemanticError;
use crate::expr::{literal_node, TypedExpr};
use crate::symbol::{FunctionSymbol, ParamInfo, StructSymbol, Symbol, VariableSymbol};
use crate::types::{number_type, string_literal, ResultType, Type};
use indexmap::IndexMap;
use quill_diagnostics::Span;
use quill_syntax::{Decl, DefaultValue, Param};
use tracing::debug;

/// 收集结构体名（Pass 1）
pub fn collect_struct_name(resolver: &mut Resolver, decl: &Decl) {
    match decl {
        Decl::Module { path, .. } => resolver.module = Some(path.clone()),
        Decl::Struct { name, .. } => {
            let qualified = resolver.qualify(name);
            resolver
                .struct_names
                .insert(qualified.clone(), qualified.clone());
            resolver.struct_names.insert(name.clone(), qualified);
        }
        _ => {}
    }
}

/// 定义符号（Pass 2）
pub fn define_decl(resolver: &mut Resolver, decl: &Decl) {
    let symbol = match decl {
        Decl::Module { path, .. } => {
            resolver.module = Some(path.clone());
            return;
        }
        Decl::Function {
            name,
            params,
            return_type,
            span,
        } => {
            let params = resolve_params(resolver, params, true);
            let return_type = resolve_annotation(resolver, return_type.as_deref(), span);
            Symbol::Function(FunctionSymbol::new(
                name.clone(),
                params,
                return_type,
                span.clone(),
            ))
        }
        Decl::Struct { name, fields, span } => {
            let mut def = StructSymbol::new(name.clone(), resolver.qualify(name), span.clone());
            for (field, info) in resolve_params(resolver, fields, false) {
                def.add_field(field, info);
            }
            Symbol::Struct(def)
        }
        Decl::Variable { name, ty, span } => {
            let ty = resolve_annotation(resolver, ty.as_deref(), span);
            Symbol::Variable(VariableSymbol::new(name.clone(), ty, span.clone()))
        }
    };

    let name = symbol.name().to_string();
    debug!(name = %name, kind = ?symbol.kind(), "defining symbol");
    match resolver.scopes.define(symbol) {
        Ok(id) => {
            let qualified = resolver.qualify(&name);
            if qualified != name {
                if let Err(e) = resolver.scopes.alias(qualified, id) {
                    resolver.errors.push(e);
                }
            }
        }
        Err(e) => resolver.errors.push(e),
    }
}

/// 类型标注；省略时结果类型无法推导
fn resolve_annotation(resolver: &mut Resolver, ty: Option<&str>, span: &Span) -> ResultType {
    match ty {
        Some(name) => match resolve_type_name(resolver, name, span) {
            Some(ty) => ResultType::Known(ty),
            None => ResultType::Undefined,
        },
        None => ResultType::Undefined,
    }
}

/// 参数或字段列表，保持声明顺序
///
/// 函数参数中，带默认值的参数之后不能再出现无默认值的参数。
fn resolve_params(
    resolver: &mut Resolver,
    params: &[Param],
    ordered_defaults: bool,
) -> IndexMap<String, ParamInfo> {
    let mut resolved: IndexMap<String, ParamInfo> = IndexMap::new();
    let mut seen_default = false;

    for param in params {
        let ty = param
            .ty
            .as_deref()
            .and_then(|name| resolve_type_name(resolver, name, &param.span));
        let default = param.default.as_ref().map(default_node);

        if let (Some(declared), Some(value)) = (&ty, &default) {
            if let ResultType::Known(found) = value.result_type() {
                if found != *declared {
                    resolver.errors.push(SemanticError::TypeMismatch {
                        expected: declared.to_string(),
                        found: found.to_string(),
                        span: param.span.clone(),
                    });
                }
            }
        }

        if ordered_defaults {
            if default.is_some() {
                seen_default = true;
            } else if seen_default {
                resolver.errors.push(SemanticError::DefaultBeforeRequired {
                    name: param.name.clone(),
                    span: param.span.clone(),
                });
            }
        }

        if let Some(previous) = resolved.get(&param.name) {
            resolver.errors.push(SemanticError::DuplicateDefinition {
                name: param.name.clone(),
                span: param.span.clone(),
                previous_span: previous.span.clone(),
            });
            continue;
        }
        resolved.insert(
            param.name.clone(),
            ParamInfo::new(ty, default, param.span.clone()),
        );
    }

    resolved
}

/// 默认值按字面量表达式的规则定型
fn default_node(value: &DefaultValue) -> TypedExpr {
    match value {
        DefaultValue::Number(raw) => literal_node(raw.as_str(), number_type(raw)),
        DefaultValue::Str(raw) => {
            let (text, ty) = string_literal(raw);
            literal_node(text, ty)
        }
        DefaultValue::Bool(true) => literal_node("True", Type::Bool),
        DefaultValue::Bool(false) => literal_node("False", Type::Bool),
    }
}
