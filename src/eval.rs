//! Formula evaluation.
//!
//! Reduces a [`Node`] tree to a number against a [`FormulaContext`].
//! Evaluation is pure: the same tree and context always give the same
//! result, and the context is never modified.

use crate::ast::{BinaryOperator, Node, UnaryOperator};
use crate::context::FormulaContext;
use crate::error::{EvaluationError, FormulaError};
use crate::parser::parse;

/// Evaluate a parsed formula.
///
/// Fails on the first undefined variable or on division by exactly zero;
/// no partial result is returned.
///
/// # Examples
///
/// ```rust
/// use zzformula::{evaluate, parse, EvaluationError, FormulaContext};
///
/// let node = parse("(STR + DEX) / 2").unwrap();
/// let context: FormulaContext = [("STR", 10.0), ("DEX", 14.0)].into_iter().collect();
/// assert_eq!(evaluate(&node, &context), Ok(12.0));
///
/// let node = parse("STR / (DEX - DEX)").unwrap();
/// assert_eq!(evaluate(&node, &context), Err(EvaluationError::DivisionByZero));
/// ```
pub fn evaluate(node: &Node, context: &FormulaContext) -> Result<f64, EvaluationError> {
    match node {
        Node::Number(value) => Ok(*value),
        Node::Variable(name) => context
            .get(name.as_str())
            .ok_or_else(|| EvaluationError::UndefinedVariable(name.clone())),
        Node::BinaryOp { op, left, right } => {
            let lhs = evaluate(left, context)?;
            let rhs = evaluate(right, context)?;
            match op {
                BinaryOperator::Add => Ok(lhs + rhs),
                BinaryOperator::Subtract => Ok(lhs - rhs),
                BinaryOperator::Multiply => Ok(lhs * rhs),
                BinaryOperator::Divide if rhs == 0.0 => Err(EvaluationError::DivisionByZero),
                BinaryOperator::Divide => Ok(lhs / rhs),
            }
        }
        Node::UnaryOp {
            op: UnaryOperator::Negate,
            operand,
        } => Ok(-evaluate(operand, context)?),
    }
}

/// Parse and evaluate a formula in one step.
///
/// # Examples
///
/// ```rust
/// use zzformula::{evaluate_formula, FormulaContext};
///
/// let context: FormulaContext = [("STR", 15.0), ("CON", 12.0)].into_iter().collect();
/// assert_eq!(evaluate_formula("STR * 10 + CON * 5", &context).unwrap(), 210.0);
/// ```
pub fn evaluate_formula(formula: &str, context: &FormulaContext) -> Result<f64, FormulaError> {
    let node = parse(formula)?;
    Ok(evaluate(&node, context)?)
}
