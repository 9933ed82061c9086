//! 运算表达式组装
//!
//! 把含运算符的 token 序列切分成操作数与二元运算符，操作数交给
//! [`OperandSynthesizer`] 合成，再按优先级爬升组装成运算节点。
//! 前缀一元运算符绑定得比任何二元运算符都紧。

use super::{BinaryOp, BinaryOpRegistry, UnaryOp, UnaryOpRegistry};
use crate::error::SemanticError;
use crate::expr::node::ExprBuilder;
use crate::expr::{Aborted, AnalysisResult, TypedExpr};
use crate::symbol::compose_name;
use crate::types::ResultType;
use quill_syntax::Token;
use std::collections::VecDeque;
use std::iter::Peekable;
use std::vec::IntoIter;
use tracing::trace;

/// 运算符模块回调表达式合成器的接口
pub trait OperandSynthesizer {
    /// 合成单个 token 或点分名字
    fn synthesize(&mut self, tokens: &[Token]) -> AnalysisResult<TypedExpr>;

    /// 是否是后面没有其它 token 的名字调用
    fn is_strict_call(&self, tokens: &[Token]) -> bool;

    /// 合成函数调用或结构体初始化
    fn generate_call(&mut self, tokens: &[Token]) -> AnalysisResult<TypedExpr>;

    /// 记录错误
    fn report(&mut self, error: SemanticError, token: Option<&Token>);

    /// 是否保留副作用标记
    fn track_effects(&self) -> bool;
}

/// 一个操作数：前缀一元运算符 + 操作数 token
struct Operand<'t> {
    prefix: Vec<(UnaryOp, &'t Token)>,
    run: &'t [Token],
}

type OpStream<'t> = Peekable<IntoIter<(BinaryOp, &'t Token)>>;

/// 运算表达式组装器
#[derive(Debug, Default)]
pub struct OperatorAssembler {
    binary: BinaryOpRegistry,
    unary: UnaryOpRegistry,
}

impl OperatorAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn binary_registry(&self) -> &BinaryOpRegistry {
        &self.binary
    }

    pub fn unary_registry(&self) -> &UnaryOpRegistry {
        &self.unary
    }

    /// 组装运算表达式
    pub fn assemble(
        &self,
        tokens: &[Token],
        synth: &mut dyn OperandSynthesizer,
    ) -> AnalysisResult<TypedExpr> {
        let (operands, ops) = self.split(tokens, synth)?;
        trace!(operands = operands.len(), "assembling operator expression");

        let mut values = VecDeque::with_capacity(operands.len());
        for operand in operands {
            values.push_back(self.operand(operand, synth)?);
        }

        let mut ops = ops.into_iter().peekable();
        self.climb(&mut values, &mut ops, 0, synth)
    }

    /// 切分：操作数之间恰好一个二元运算符
    fn split<'t>(
        &self,
        tokens: &'t [Token],
        synth: &mut dyn OperandSynthesizer,
    ) -> AnalysisResult<(Vec<Operand<'t>>, Vec<(BinaryOp, &'t Token)>)> {
        let mut operands = Vec::new();
        let mut ops = Vec::new();
        let mut prefix = Vec::new();
        let mut start: Option<usize> = None;

        for (i, token) in tokens.iter().enumerate() {
            match start {
                None => {
                    if let Some(op) = UnaryOp::from_token(token) {
                        prefix.push((op, token));
                    } else if BinaryOp::from_token(token).is_some() {
                        return Err(syntax_error(synth, Some(token)));
                    } else {
                        start = Some(i);
                    }
                }
                Some(begin) => {
                    if let Some(op) = BinaryOp::from_token(token) {
                        operands.push(Operand {
                            prefix: std::mem::take(&mut prefix),
                            run: &tokens[begin..i],
                        });
                        ops.push((op, token));
                        start = None;
                    }
                }
            }
        }

        match start {
            Some(begin) => operands.push(Operand {
                prefix,
                run: &tokens[begin..],
            }),
            // 以运算符结尾
            None => return Err(syntax_error(synth, tokens.last())),
        }
        Ok((operands, ops))
    }

    fn operand(
        &self,
        operand: Operand<'_>,
        synth: &mut dyn OperandSynthesizer,
    ) -> AnalysisResult<TypedExpr> {
        let run = operand.run;
        let mut node = if run.len() == 1 || compose_name(run).is_some() {
            synth.synthesize(run)?
        } else if synth.is_strict_call(run) {
            synth.generate_call(run)?
        } else {
            return Err(syntax_error(synth, run.first()));
        };

        // 离操作数最近的运算符先作用
        for (op, token) in operand.prefix.into_iter().rev() {
            node = self.apply_unary(op, node, token, synth)?;
        }
        Ok(node)
    }

    fn climb(
        &self,
        values: &mut VecDeque<TypedExpr>,
        ops: &mut OpStream<'_>,
        min_precedence: u8,
        synth: &mut dyn OperandSynthesizer,
    ) -> AnalysisResult<TypedExpr> {
        let Some(mut lhs) = values.pop_front() else {
            return Err(syntax_error(synth, None));
        };

        while let Some(&(op, token)) = ops.peek() {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            ops.next();

            let next_min = if op.is_right_assoc() {
                precedence
            } else {
                precedence + 1
            };
            let rhs = self.climb(values, ops, next_min, synth)?;
            lhs = self.apply_binary(op, lhs, rhs, token, synth)?;
        }

        Ok(lhs)
    }

    fn apply_unary(
        &self,
        op: UnaryOp,
        operand: TypedExpr,
        token: &Token,
        synth: &mut dyn OperandSynthesizer,
    ) -> AnalysisResult<TypedExpr> {
        let ty = match operand.result_type() {
            ResultType::Known(ty) => match self.unary.lookup(op, &ty, &token.span) {
                Ok(result) => ResultType::Known(result),
                Err(err) => {
                    synth.report(err, Some(token));
                    return Err(Aborted);
                }
            },
            _ => ResultType::Undefined,
        };
        Ok(ExprBuilder::unary(op, operand, ty).finish(synth.track_effects()))
    }

    fn apply_binary(
        &self,
        op: BinaryOp,
        lhs: TypedExpr,
        rhs: TypedExpr,
        token: &Token,
        synth: &mut dyn OperandSynthesizer,
    ) -> AnalysisResult<TypedExpr> {
        let ty = match (lhs.result_type(), rhs.result_type()) {
            (ResultType::Known(left), ResultType::Known(right)) => {
                match self.binary.lookup(op, &left, &right, &token.span) {
                    Ok(result) => ResultType::Known(result),
                    Err(err) => {
                        synth.report(err, Some(token));
                        return Err(Aborted);
                    }
                }
            }
            _ => ResultType::Undefined,
        };
        Ok(ExprBuilder::binary(op, lhs, rhs, ty).finish(synth.track_effects()))
    }
}

fn syntax_error(synth: &mut dyn OperandSynthesizer, token: Option<&Token>) -> Aborted {
    let span = token.map(|t| t.span.clone()).unwrap_or(0..0);
    synth.report(SemanticError::InvalidSyntax { span }, token);
    Aborted
}
