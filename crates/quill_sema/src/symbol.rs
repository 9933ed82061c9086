//! Symbol Definitions
//!
//! 符号系统定义。表达式分析只读取符号，从不修改：结构体初始化时
//! 根据不可变的描述符生成新的 `StructInit` 节点。

use crate::expr::TypedExpr;
use crate::types::{ResultType, Type};
use indexmap::IndexMap;
use quill_diagnostics::Span;
use quill_syntax::{Token, TokenKind};

/// 保留字：不能作为名字出现
pub const RESERVED_WORDS: [&str; 5] = ["True", "False", "and", "or", "not"];

/// 符号种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Function,
    Struct,
    Variable,
}

/// 符号 - 声明文件中所有命名实体的统一表示
#[derive(Debug, Clone, PartialEq)]
pub enum Symbol {
    Function(FunctionSymbol),
    Struct(StructSymbol),
    Variable(VariableSymbol),
}

impl Symbol {
    /// 获取符号名称
    pub fn name(&self) -> &str {
        match self {
            Symbol::Function(f) => &f.name,
            Symbol::Struct(s) => &s.name,
            Symbol::Variable(v) => &v.name,
        }
    }

    /// 获取符号的源码位置
    pub fn span(&self) -> &Span {
        match self {
            Symbol::Function(f) => &f.span,
            Symbol::Struct(s) => &s.span,
            Symbol::Variable(v) => &v.span,
        }
    }

    pub fn kind(&self) -> SymbolKind {
        match self {
            Symbol::Function(_) => SymbolKind::Function,
            Symbol::Struct(_) => SymbolKind::Struct,
            Symbol::Variable(_) => SymbolKind::Variable,
        }
    }

    /// 名字作为值出现时的类型：函数取返回类型，结构体取自身类型
    pub fn value_type(&self) -> ResultType {
        match self {
            Symbol::Function(f) => f.return_type.clone(),
            Symbol::Struct(s) => ResultType::Known(s.ty()),
            Symbol::Variable(v) => v.ty.clone(),
        }
    }
}

/// 参数或字段
#[derive(Debug, Clone, PartialEq)]
pub struct ParamInfo {
    /// 声明的类型
    pub ty: Option<Type>,
    /// 默认值（已按字面量规则定型）
    pub default: Option<TypedExpr>,
    pub span: Span,
}

impl ParamInfo {
    pub fn new(ty: Option<Type>, default: Option<TypedExpr>, span: Span) -> Self {
        Self { ty, default, span }
    }

    /// 期望的实参类型：声明类型，否则默认值的类型
    pub fn expected_type(&self) -> ResultType {
        match (&self.ty, &self.default) {
            (Some(ty), _) => ResultType::Known(ty.clone()),
            (None, Some(default)) => default.result_type(),
            (None, None) => ResultType::Undefined,
        }
    }

    pub fn has_default(&self) -> bool {
        self.default.is_some()
    }
}

/// 函数符号
///
/// 对应 `fn add(a: i32, b: i32 = 1) -> i32`
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionSymbol {
    pub name: String,
    /// 参数按声明顺序排列，顺序决定位置绑定
    pub params: IndexMap<String, ParamInfo>,
    /// 前导的无默认值参数个数
    pub positional_required: usize,
    pub max_args: usize,
    pub return_type: ResultType,
    pub span: Span,
}

impl FunctionSymbol {
    pub fn new(
        name: String,
        params: IndexMap<String, ParamInfo>,
        return_type: ResultType,
        span: Span,
    ) -> Self {
        let positional_required = params.values().take_while(|p| !p.has_default()).count();
        let max_args = params.len();
        Self {
            name,
            params,
            positional_required,
            max_args,
            return_type,
            span,
        }
    }
}

/// 结构体符号
///
/// 对应 `struct Point(x: i32, y: i32)`；所有字段都是必需的位置参数
#[derive(Debug, Clone, PartialEq)]
pub struct StructSymbol {
    pub name: String,
    /// 带模块前缀的完整名字
    pub qualified_name: String,
    pub fields: IndexMap<String, ParamInfo>,
    pub span: Span,
}

impl StructSymbol {
    pub fn new(name: String, qualified_name: String, span: Span) -> Self {
        Self {
            name,
            qualified_name,
            fields: IndexMap::new(),
            span,
        }
    }

    /// 添加字段，返回同名的旧字段
    pub fn add_field(&mut self, name: String, info: ParamInfo) -> Option<ParamInfo> {
        self.fields.insert(name, info)
    }

    pub fn ty(&self) -> Type {
        Type::Named(self.qualified_name.clone())
    }
}

/// 变量符号
///
/// 对应 `let origin: Point`
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub name: String,
    pub ty: ResultType,
    pub span: Span,
}

impl VariableSymbol {
    pub fn new(name: String, ty: ResultType, span: Span) -> Self {
        Self { name, ty, span }
    }
}

/// 符号表只读查询接口
pub trait SymbolLookup {
    /// 查找符号描述符
    fn lookup(&self, name: &str) -> Option<&Symbol>;

    fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn kind_of(&self, name: &str) -> Option<SymbolKind> {
        self.lookup(name).map(Symbol::kind)
    }

    /// 名字存在且种类属于 `kinds`
    fn is_kind(&self, name: &str, kinds: &[SymbolKind]) -> bool {
        self.kind_of(name).is_some_and(|kind| kinds.contains(&kind))
    }
}

/// `Name (Dot Name)*` 组成的名字，保留字不算名字
pub fn compose_name(tokens: &[Token]) -> Option<String> {
    if tokens.is_empty() || tokens.len() % 2 == 0 {
        return None;
    }

    let mut parts = Vec::with_capacity(tokens.len() / 2 + 1);
    for (i, token) in tokens.iter().enumerate() {
        match (&token.kind, i % 2) {
            (TokenKind::Name(name), 0) if !RESERVED_WORDS.contains(&name.as_str()) => {
                parts.push(name.as_str())
            }
            (TokenKind::Dot, 1) => {}
            _ => return None,
        }
    }
    Some(parts.join("."))
}

/// 去掉模块前缀的名字，用于诊断消息
pub fn local_name(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::IntTy;
    use quill_syntax::{split_lines, tokenize};

    fn run(source: &str) -> Vec<Token> {
        split_lines(tokenize(source).unwrap()).remove(0)
    }

    fn param(ty: Option<Type>) -> ParamInfo {
        ParamInfo::new(ty, None, 0..1)
    }

    #[test]
    fn test_compose_name() {
        assert_eq!(compose_name(&run("x")), Some("x".to_string()));
        assert_eq!(
            compose_name(&run("geometry.Point")),
            Some("geometry.Point".to_string())
        );
        assert_eq!(compose_name(&run("geometry.")), None);
        assert_eq!(compose_name(&run("a b")), None);
        assert_eq!(compose_name(&run("True")), None);
        assert_eq!(compose_name(&run("a.not")), None);
        assert_eq!(compose_name(&[]), None);
    }

    #[test]
    fn test_local_name() {
        assert_eq!(local_name("geometry.Point"), "Point");
        assert_eq!(local_name("add"), "add");
    }

    #[test]
    fn test_function_counts() {
        let mut params = IndexMap::new();
        params.insert("a".to_string(), param(Some(Type::Int(IntTy::I32))));
        params.insert(
            "b".to_string(),
            ParamInfo::new(
                None,
                Some(crate::expr::literal_node("1", Type::Int(IntTy::I32))),
                2..3,
            ),
        );

        let func = FunctionSymbol::new(
            "add".to_string(),
            params,
            ResultType::Known(Type::Int(IntTy::I32)),
            0..10,
        );
        assert_eq!(func.positional_required, 1);
        assert_eq!(func.max_args, 2);
        assert_eq!(
            func.params["b"].expected_type(),
            ResultType::Known(Type::Int(IntTy::I32))
        );
    }

    #[test]
    fn test_symbol_value_type() {
        let mut point = StructSymbol::new("Point".to_string(), "geometry.Point".to_string(), 0..5);
        assert!(point.add_field("x".to_string(), param(None)).is_none());
        assert!(point.add_field("x".to_string(), param(None)).is_some());

        let symbol = Symbol::Struct(point);
        assert_eq!(symbol.kind(), SymbolKind::Struct);
        assert_eq!(
            symbol.value_type(),
            ResultType::Known(Type::Named("geometry.Point".to_string()))
        );

        let var = Symbol::Variable(VariableSymbol::new(
            "anything".to_string(),
            ResultType::Undefined,
            0..3,
        ));
        assert_eq!(var.value_type(), ResultType::Undefined);
        assert_eq!(param(None).expected_type(), ResultType::Undefined);
    }
}
