use super::Resolver;
use crate::error::SemanticError;
use crate::types::Type;
use quill_diagnostics::Span;

/// 解析类型名：内置类型，否则已收集的结构体
pub fn resolve_type_name(resolver: &mut Resolver, name: &str, span: &Span) -> Option<Type> {
    if let Some(ty) = Type::from_name(name) {
        return Some(ty);
    }
    if let Some(qualified) = resolver.struct_names.get(name) {
        return Some(Type::Named(qualified.clone()));
    }

    resolver.errors.push(SemanticError::UnknownType {
        name: name.to_string(),
        span: span.clone(),
    });
    None
}
