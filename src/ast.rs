//! Formula syntax tree.
//!
//! A parsed formula is a [`Node`] tree: numbers and variables at the
//! leaves, unary negation and the four binary operators above them. The
//! tree is built once by the parser and never mutated.

use crate::code::Code;
use std::collections::HashSet;

/// Binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn symbol(self) -> char {
        match self {
            BinaryOperator::Add => '+',
            BinaryOperator::Subtract => '-',
            BinaryOperator::Multiply => '*',
            BinaryOperator::Divide => '/',
        }
    }
}

/// Unary operator. Unary plus never reaches the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperator {
    Negate,
}

/// A node of a parsed formula.
///
/// # Examples
///
/// ```rust
/// use zzformula::ast::{BinaryOperator, Node};
/// use zzformula::{parse, Code};
///
/// let node = parse("str * 2").unwrap();
/// assert_eq!(
///     node,
///     Node::BinaryOp {
///         op: BinaryOperator::Multiply,
///         left: Box::new(Node::Variable(Code::new("STR"))),
///         right: Box::new(Node::Number(2.0)),
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Number(f64),
    Variable(Code),
    BinaryOp {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Node>,
    },
}

impl Node {
    /// Every variable the formula references, in order of first
    /// occurrence, without duplicates.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzformula::{parse, Code};
    ///
    /// let node = parse("dex + str * dex").unwrap();
    /// assert_eq!(node.variables(), vec![Code::new("DEX"), Code::new("STR")]);
    /// ```
    pub fn variables(&self) -> Vec<Code> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::new();
        self.collect_variables(&mut seen, &mut ordered);
        ordered
    }

    fn collect_variables(&self, seen: &mut HashSet<Code>, ordered: &mut Vec<Code>) {
        match self {
            Node::Number(_) => {}
            Node::Variable(name) => {
                if seen.insert(name.clone()) {
                    ordered.push(name.clone());
                }
            }
            Node::BinaryOp { left, right, .. } => {
                left.collect_variables(seen, ordered);
                right.collect_variables(seen, ordered);
            }
            Node::UnaryOp { operand, .. } => operand.collect_variables(seen, ordered),
        }
    }
}

/// Fully parenthesized rendering, e.g. `((STR * 10) + (CON * 5))`.
impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Number(n) => write!(f, "{}", n),
            Node::Variable(name) => write!(f, "{}", name),
            Node::BinaryOp { op, left, right } => {
                write!(f, "({} {} {})", left, op.symbol(), right)
            }
            Node::UnaryOp {
                op: UnaryOperator::Negate,
                operand,
            } => write!(f, "(-{})", operand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Box<Node> {
        Box::new(Node::Variable(Code::new(name)))
    }

    #[test]
    fn test_variables_first_occurrence_order() {
        let node = Node::BinaryOp {
            op: BinaryOperator::Add,
            left: Box::new(Node::BinaryOp {
                op: BinaryOperator::Multiply,
                left: var("WIS"),
                right: var("STR"),
            }),
            right: Box::new(Node::UnaryOp {
                op: UnaryOperator::Negate,
                operand: var("WIS"),
            }),
        };
        assert_eq!(node.variables(), vec![Code::new("WIS"), Code::new("STR")]);
    }

    #[test]
    fn test_number_has_no_variables() {
        assert!(Node::Number(3.0).variables().is_empty());
    }

    #[test]
    fn test_display_parenthesizes() {
        let node = Node::BinaryOp {
            op: BinaryOperator::Subtract,
            left: Box::new(Node::Number(10.0)),
            right: Box::new(Node::UnaryOp {
                op: UnaryOperator::Negate,
                operand: var("DEX"),
            }),
        };
        assert_eq!(node.to_string(), "(10 - (-DEX))");
    }
}
