//! Typed Expression Nodes
//!
//! 合成器的输出。节点一旦返回就是完整的；中间状态（常量标记、副作用标记）
//! 只存在于 crate 内部的 [`ExprBuilder`] 中，在 `finish` 时定型。

use crate::operators::{BinaryOp, UnaryOp};
use crate::types::{ResultType, Type};
use bitflags::bitflags;
use indexmap::IndexMap;

/// 带类型的表达式节点
#[derive(Debug, Clone, PartialEq)]
pub struct TypedExpr {
    pub kind: TypedExprKind,
    ty: ResultType,
    /// 只有字面量以及完全由字面量组成的集合/运算是常量
    pub is_constant: bool,
    /// 仅在开启副作用追踪时为 `Some`
    pub has_effect: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypedExprKind {
    /// 字面量：值（字符串去掉引号）与字面量类型
    Literal { value: String, ty: Type },
    /// 名字引用
    Name(String),
    Tuple(Vec<TypedExpr>),
    List(Vec<TypedExpr>),
    Set(Vec<TypedExpr>),
    /// 只有空的 `{}` 字面量
    Dict,
    /// 函数调用
    Call { callee: String, args: Vec<TypedExpr> },
    /// 结构体初始化，字段按声明顺序绑定
    StructInit {
        callee: String,
        qualified_name: String,
        fields: IndexMap<String, BoundField>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<TypedExpr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<TypedExpr>,
        rhs: Box<TypedExpr>,
    },
}

/// 结构体字段绑定
#[derive(Debug, Clone, PartialEq)]
pub struct BoundField {
    /// 字段期望的类型
    pub expected: ResultType,
    pub value: TypedExpr,
}

/// 集合种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Collection {
    Tuple,
    List,
    Set,
}

impl TypedExpr {
    /// 结果类型；`self` 由节点自身决定
    pub fn result_type(&self) -> ResultType {
        match &self.ty {
            ResultType::SelfType => self.kind.self_type(),
            other => other.clone(),
        }
    }

    /// 节点上记录的原始结果类型（可能是 `self`）
    pub fn declared_type(&self) -> &ResultType {
        &self.ty
    }

    /// 元组节点拆成各项，其余节点原样返回
    pub(crate) fn into_tuple_items(self) -> Result<Vec<TypedExpr>, TypedExpr> {
        match self.kind {
            TypedExprKind::Tuple(items) => Ok(items),
            kind => Err(TypedExpr { kind, ..self }),
        }
    }

    /// 结构上是否有副作用：调用与结构体初始化有，其余取决于子节点
    pub(crate) fn effectful(&self) -> bool {
        match &self.kind {
            TypedExprKind::Call { .. } | TypedExprKind::StructInit { .. } => true,
            TypedExprKind::Tuple(items) | TypedExprKind::List(items) | TypedExprKind::Set(items) => {
                items.iter().any(TypedExpr::effectful)
            }
            TypedExprKind::Unary { operand, .. } => operand.effectful(),
            TypedExprKind::Binary { lhs, rhs, .. } => lhs.effectful() || rhs.effectful(),
            TypedExprKind::Literal { .. } | TypedExprKind::Name(_) | TypedExprKind::Dict => false,
        }
    }
}

impl TypedExprKind {
    fn self_type(&self) -> ResultType {
        match self {
            TypedExprKind::Literal { ty, .. } => ResultType::Known(ty.clone()),
            TypedExprKind::Tuple(_) => ResultType::Known(Type::Tuple),
            TypedExprKind::List(_) => ResultType::Known(Type::List),
            TypedExprKind::Set(_) => ResultType::Known(Type::Set),
            TypedExprKind::Dict => ResultType::Known(Type::Dict),
            _ => ResultType::Undefined,
        }
    }
}

bitflags! {
    /// 构建期间的临时标记
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub(crate) struct ExprFlags: u8 {
        const CONSTANT = 1 << 0;
        const HAS_EFFECT = 1 << 1;
    }
}

/// 节点构建器
#[derive(Debug)]
pub(crate) struct ExprBuilder {
    kind: TypedExprKind,
    ty: ResultType,
    flags: ExprFlags,
}

impl ExprBuilder {
    fn new(kind: TypedExprKind, ty: ResultType, flags: ExprFlags) -> Self {
        Self { kind, ty, flags }
    }

    /// 子节点全是常量时为常量，任一子节点有副作用时有副作用
    fn inherit<'a>(children: impl IntoIterator<Item = &'a TypedExpr>) -> ExprFlags {
        let mut flags = ExprFlags::CONSTANT;
        for child in children {
            if !child.is_constant {
                flags.remove(ExprFlags::CONSTANT);
            }
            if child.effectful() {
                flags.insert(ExprFlags::HAS_EFFECT);
            }
        }
        flags
    }

    pub(crate) fn literal(value: impl Into<String>, ty: Type) -> Self {
        Self::new(
            TypedExprKind::Literal {
                value: value.into(),
                ty,
            },
            ResultType::SelfType,
            ExprFlags::CONSTANT,
        )
    }

    pub(crate) fn name(name: impl Into<String>, ty: ResultType) -> Self {
        Self::new(TypedExprKind::Name(name.into()), ty, ExprFlags::empty())
    }

    pub(crate) fn collection(kind: Collection, items: Vec<TypedExpr>) -> Self {
        let flags = Self::inherit(&items);
        let kind = match kind {
            Collection::Tuple => TypedExprKind::Tuple(items),
            Collection::List => TypedExprKind::List(items),
            Collection::Set => TypedExprKind::Set(items),
        };
        Self::new(kind, ResultType::SelfType, flags)
    }

    pub(crate) fn dict() -> Self {
        Self::new(TypedExprKind::Dict, ResultType::SelfType, ExprFlags::CONSTANT)
    }

    pub(crate) fn call(callee: String, args: Vec<TypedExpr>, ty: ResultType) -> Self {
        Self::new(
            TypedExprKind::Call { callee, args },
            ty,
            ExprFlags::HAS_EFFECT,
        )
    }

    pub(crate) fn struct_init(
        callee: String,
        qualified_name: String,
        fields: IndexMap<String, BoundField>,
    ) -> Self {
        let ty = ResultType::Known(Type::Named(qualified_name.clone()));
        Self::new(
            TypedExprKind::StructInit {
                callee,
                qualified_name,
                fields,
            },
            ty,
            ExprFlags::HAS_EFFECT,
        )
    }

    pub(crate) fn unary(op: UnaryOp, operand: TypedExpr, ty: ResultType) -> Self {
        let flags = Self::inherit([&operand]);
        Self::new(
            TypedExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            ty,
            flags,
        )
    }

    pub(crate) fn binary(op: BinaryOp, lhs: TypedExpr, rhs: TypedExpr, ty: ResultType) -> Self {
        let flags = Self::inherit([&lhs, &rhs]);
        Self::new(
            TypedExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            ty,
            flags,
        )
    }

    /// 定型：副作用标记只在追踪时保留
    pub(crate) fn finish(self, track_effects: bool) -> TypedExpr {
        TypedExpr {
            kind: self.kind,
            ty: self.ty,
            is_constant: self.flags.contains(ExprFlags::CONSTANT),
            has_effect: track_effects.then(|| self.flags.contains(ExprFlags::HAS_EFFECT)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntTy;

    fn int(value: &str) -> TypedExpr {
        ExprBuilder::literal(value, Type::Int(IntTy::I32)).finish(true)
    }

    #[test]
    fn test_literal_resolves_self_type() {
        let node = int("1");
        assert_eq!(node.declared_type(), &ResultType::SelfType);
        assert_eq!(node.result_type(), ResultType::Known(Type::Int(IntTy::I32)));
        assert!(node.is_constant);
        assert_eq!(node.has_effect, Some(false));
    }

    #[test]
    fn test_collection_flags() {
        let name = ExprBuilder::name("x", ResultType::Known(Type::Bool)).finish(true);
        let list = ExprBuilder::collection(Collection::List, vec![int("1"), name]).finish(true);
        assert_eq!(list.result_type(), ResultType::Known(Type::List));
        assert!(!list.is_constant);
        assert_eq!(list.has_effect, Some(false));

        let literals = ExprBuilder::collection(Collection::Set, vec![int("1"), int("2")]).finish(false);
        assert!(literals.is_constant);
        assert_eq!(literals.has_effect, None);
    }

    #[test]
    fn test_effect_propagates_from_calls() {
        let call = ExprBuilder::call("f".to_string(), vec![], ResultType::Undefined).finish(false);
        assert!(!call.is_constant);
        assert_eq!(call.result_type(), ResultType::Undefined);

        let tuple = ExprBuilder::collection(Collection::Tuple, vec![int("1"), call]).finish(true);
        assert_eq!(tuple.has_effect, Some(true));
        assert!(!tuple.is_constant);
    }

    #[test]
    fn test_dict_and_struct_init() {
        let dict = ExprBuilder::dict().finish(true);
        assert_eq!(dict.result_type(), ResultType::Known(Type::Dict));
        assert!(dict.is_constant);

        let init = ExprBuilder::struct_init(
            "Point".to_string(),
            "geometry.Point".to_string(),
            IndexMap::new(),
        )
        .finish(true);
        assert_eq!(
            init.result_type(),
            ResultType::Known(Type::Named("geometry.Point".to_string()))
        );
        assert_eq!(init.has_effect, Some(true));
        assert!(!init.is_constant);
    }
}
