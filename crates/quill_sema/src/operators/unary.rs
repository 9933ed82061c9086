//! 一元运算符注册表
//!
//! 使用表驱动方法管理一元运算符的类型签名

use super::UnaryOp;
use crate::error::SemanticError;
use crate::types::{FloatTy, IntTy, Type};
use quill_diagnostics::Span;

/// 一元运算符签名
#[derive(Debug, Clone, PartialEq)]
pub struct UnaryOpSignature {
    pub op: UnaryOp,
    pub operand: Type,
    pub result: Type,
}

/// 一元运算符注册表
#[derive(Debug)]
pub struct UnaryOpRegistry {
    signatures: Vec<UnaryOpSignature>,
}

impl UnaryOpRegistry {
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
        // 正负号：数值类型保持不变
        for op in [UnaryOp::Neg, UnaryOp::Pos] {
            for int in IntTy::ALL {
                self.add(op, Type::Int(int), Type::Int(int));
            }
            for float in FloatTy::ALL {
                self.add(op, Type::Float(float), Type::Float(float));
            }
        }

        // 按位取反：~int -> int
        for int in IntTy::ALL {
            self.add(UnaryOp::BitNot, Type::Int(int), Type::Int(int));
        }

        // 逻辑非：not bool -> bool
        self.add(UnaryOp::Not, Type::Bool, Type::Bool);
    }

    /// 添加运算符签名
    fn add(&mut self, op: UnaryOp, operand: Type, result: Type) {
        self.signatures.push(UnaryOpSignature {
            op,
            operand,
            result,
        });
    }

    /// 查找运算符签名，失败返回 `InvalidUnaryOp`
    pub fn lookup(&self, op: UnaryOp, operand: &Type, span: &Span) -> Result<Type, SemanticError> {
        self.signatures
            .iter()
            .find(|sig| sig.op == op && sig.operand == *operand)
            .map(|sig| sig.result.clone())
            .ok_or_else(|| SemanticError::InvalidUnaryOp {
                op: op.symbol().to_string(),
                operand: operand.to_string(),
                span: span.clone(),
            })
    }
}

impl Default for UnaryOpRegistry {
    fn default() -> Self {
        Self::new()
    }
}
