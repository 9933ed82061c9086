//! Types
//!
//! 表达式的静态类型与结果类型。
//!
//! - [`Type`]: 具体类型
//! - [`ResultType`]: 节点上记录的结果类型，可能是具体类型、`self`（由节点自身决定）
//!   或 `undefined`（无法推导，只产生警告）

use std::fmt;

pub mod literal;

pub use literal::{number_type, string_literal};

/// 整数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntTy {
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl IntTy {
    pub const ALL: [IntTy; 8] = [
        IntTy::I8,
        IntTy::I16,
        IntTy::I32,
        IntTy::I64,
        IntTy::U8,
        IntTy::U16,
        IntTy::U32,
        IntTy::U64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IntTy::I8 => "i8",
            IntTy::I16 => "i16",
            IntTy::I32 => "i32",
            IntTy::I64 => "i64",
            IntTy::U8 => "u8",
            IntTy::U16 => "u16",
            IntTy::U32 => "u32",
            IntTy::U64 => "u64",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

/// 浮点类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FloatTy {
    F32,
    F64,
}

impl FloatTy {
    pub const ALL: [FloatTy; 2] = [FloatTy::F32, FloatTy::F64];

    pub fn name(&self) -> &'static str {
        match self {
            FloatTy::F32 => "f32",
            FloatTy::F64 => "f64",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.name() == name)
    }
}

/// 具体类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int(IntTy),
    Float(FloatTy),
    Bool,
    Char,
    Str,
    Tuple,
    List,
    Set,
    Dict,
    Void,
    /// 结构体，载荷是带模块前缀的完整名字
    Named(String),
}

impl Type {
    /// 内置类型名 -> 类型；结构体名不在这里解析
    pub fn from_name(name: &str) -> Option<Type> {
        if let Some(ty) = IntTy::from_name(name) {
            return Some(Type::Int(ty));
        }
        if let Some(ty) = FloatTy::from_name(name) {
            return Some(Type::Float(ty));
        }
        let ty = match name {
            "bool" => Type::Bool,
            "char" => Type::Char,
            "str" => Type::Str,
            "tuple" => Type::Tuple,
            "list" => Type::List,
            "set" => Type::Set,
            "dict" => Type::Dict,
            "void" => Type::Void,
            _ => return None,
        };
        Some(ty)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int(ty) => write!(f, "{}", ty.name()),
            Type::Float(ty) => write!(f, "{}", ty.name()),
            Type::Bool => write!(f, "bool"),
            Type::Char => write!(f, "char"),
            Type::Str => write!(f, "str"),
            Type::Tuple => write!(f, "tuple"),
            Type::List => write!(f, "list"),
            Type::Set => write!(f, "set"),
            Type::Dict => write!(f, "dict"),
            Type::Void => write!(f, "void"),
            Type::Named(name) => write!(f, "{}", name),
        }
    }
}

/// 节点的结果类型
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultType {
    Known(Type),
    /// 由节点自身（字面量类型或集合种类）决定
    SelfType,
    /// 无法推导
    Undefined,
}

impl ResultType {
    pub fn known(&self) -> Option<&Type> {
        match self {
            ResultType::Known(ty) => Some(ty),
            _ => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, ResultType::Undefined)
    }
}

impl From<Type> for ResultType {
    fn from(ty: Type) -> Self {
        ResultType::Known(ty)
    }
}

impl fmt::Display for ResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultType::Known(ty) => write!(f, "{}", ty),
            ResultType::SelfType => write!(f, "self"),
            ResultType::Undefined => write!(f, "undefined"),
        }
    }
}
