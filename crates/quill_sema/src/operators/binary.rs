//! 二元运算符注册表
//!
//! 使用表驱动方法管理二元运算符的类型签名

use super::BinaryOp;
use crate::error::SemanticError;
use crate::types::{FloatTy, IntTy, Type};
use quill_diagnostics::Span;

/// 二元运算符签名
///
/// 描述一个二元运算符对特定类型的操作
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOpSignature {
    pub op: BinaryOp,
    pub lhs: Type,
    pub rhs: Type,
    pub result: Type,
}

/// 二元运算符注册表
///
/// 集中管理所有二元运算符的类型规则
#[derive(Debug)]
pub struct BinaryOpRegistry {
    signatures: Vec<BinaryOpSignature>,
}

const ARITHMETIC: [BinaryOp; 7] = [
    BinaryOp::Add,
    BinaryOp::Sub,
    BinaryOp::Mul,
    BinaryOp::Div,
    BinaryOp::FloorDiv,
    BinaryOp::Mod,
    BinaryOp::Pow,
];

const ORDERING: [BinaryOp; 6] = [
    BinaryOp::Eq,
    BinaryOp::Ne,
    BinaryOp::Lt,
    BinaryOp::Gt,
    BinaryOp::Le,
    BinaryOp::Ge,
];

const BITWISE: [BinaryOp; 5] = [
    BinaryOp::BitOr,
    BinaryOp::BitXor,
    BinaryOp::BitAnd,
    BinaryOp::Shl,
    BinaryOp::Shr,
];

impl BinaryOpRegistry {
    /// 创建默认注册表（包含所有内置运算符）
    pub fn new() -> Self {
        let mut registry = Self {
            signatures: Vec::new(),
        };
        registry.register_builtins();
        registry
    }

    /// 注册内置运算符
    fn register_builtins(&mut self) {
        self.register_arithmetic();
        self.register_comparison();
        self.register_logical();
        self.register_bitwise();
    }

    /// 注册算术运算符
    ///
    /// 包括：+, -, *, /, //, %, **
    fn register_arithmetic(&mut self) {
        for op in ARITHMETIC {
            // 同类型数值运算
            for int in IntTy::ALL {
                self.add(op, Type::Int(int), Type::Int(int), Type::Int(int));
            }
            for float in FloatTy::ALL {
                self.add(op, Type::Float(float), Type::Float(float), Type::Float(float));
            }

            // 数值提升: int/float -> float
            for int in IntTy::ALL {
                for float in FloatTy::ALL {
                    self.add(op, Type::Int(int), Type::Float(float), Type::Float(float));
                    self.add(op, Type::Float(float), Type::Int(int), Type::Float(float));
                }
            }
        }

        // 字符串连接: str + str -> str
        self.add(BinaryOp::Add, Type::Str, Type::Str, Type::Str);
    }

    /// 注册比较运算符
    ///
    /// 包括：==, !=, <, >, <=, >=；任意两个相同类型的相等比较在查找时兜底
    fn register_comparison(&mut self) {
        for op in ORDERING {
            for int in IntTy::ALL {
                self.add(op, Type::Int(int), Type::Int(int), Type::Bool);
            }
            for float in FloatTy::ALL {
                self.add(op, Type::Float(float), Type::Float(float), Type::Bool);
            }
            self.add(op, Type::Str, Type::Str, Type::Bool);
            self.add(op, Type::Char, Type::Char, Type::Bool);
        }
    }

    /// 注册逻辑运算符
    ///
    /// 包括：and / &&, or / ||
    fn register_logical(&mut self) {
        for op in [BinaryOp::And, BinaryOp::Or] {
            self.add(op, Type::Bool, Type::Bool, Type::Bool);
        }
    }

    /// 注册位运算符
    ///
    /// 包括：|, ^, &, <<, >>
    fn register_bitwise(&mut self) {
        for op in BITWISE {
            for int in IntTy::ALL {
                self.add(op, Type::Int(int), Type::Int(int), Type::Int(int));
            }
        }
        for op in [BinaryOp::BitOr, BinaryOp::BitXor, BinaryOp::BitAnd] {
            self.add(op, Type::Bool, Type::Bool, Type::Bool);
        }
    }

    /// 添加运算符签名
    fn add(&mut self, op: BinaryOp, lhs: Type, rhs: Type, result: Type) {
        self.signatures.push(BinaryOpSignature {
            op,
            lhs,
            rhs,
            result,
        });
    }

    /// 查找运算符签名
    ///
    /// 根据运算符和操作数类型查找结果类型，失败返回 `InvalidBinaryOp`
    pub fn lookup(
        &self,
        op: BinaryOp,
        lhs: &Type,
        rhs: &Type,
        span: &Span,
    ) -> Result<Type, SemanticError> {
        // 查找精确匹配
        if let Some(sig) = self
            .signatures
            .iter()
            .find(|sig| sig.op == op && sig.lhs == *lhs && sig.rhs == *rhs)
        {
            return Ok(sig.result.clone());
        }

        // 相同类型总可以比较相等
        if matches!(op, BinaryOp::Eq | BinaryOp::Ne) && lhs == rhs {
            return Ok(Type::Bool);
        }

        Err(SemanticError::InvalidBinaryOp {
            op: op.symbol().to_string(),
            left: lhs.to_string(),
            right: rhs.to_string(),
            span: span.clone(),
        })
    }
}

impl Default for BinaryOpRegistry {
    fn default() -> Self {
        Self::new()
    }
}
