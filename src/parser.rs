//! Recursive-descent formula parser.
//!
//! Grammar, lowest to highest binding strength:
//!
//! ```text
//! expression := term ( ('+' | '-') term )*
//! term       := factor ( ('*' | '/') factor )*
//! factor     := '+' factor | '-' factor
//!             | NUMBER | VARIABLE
//!             | '(' expression ')'
//! ```
//!
//! Binary operators are left-associative. Unary operators nest, so
//! `--5` is `-(-5)` and `STR ++ DEX` is `STR + (+DEX)`; unary plus is
//! dropped from the tree.
//!
//! Nesting is capped at [`MAX_DEPTH`] levels.

use crate::ast::{BinaryOperator, Node, UnaryOperator};
use crate::error::SyntaxError;
use crate::token::{Token, TokenKind, Tokenizer};

/// Parse a formula into a syntax tree.
///
/// # Examples
///
/// ```rust
/// use zzformula::parse;
///
/// let node = parse("2 + 3 * 4").unwrap();
/// assert_eq!(node.to_string(), "(2 + (3 * 4))");
///
/// assert!(parse("(STR + 2").is_err());
/// assert!(parse("   ").is_err());
/// ```
pub fn parse(formula: &str) -> Result<Node, SyntaxError> {
    let mut parser = Parser::new(formula)?;
    let (node, _) = parser.parse_expression()?;

    if parser.current.kind != TokenKind::End {
        return Err(SyntaxError::at(
            format!(
                "Unexpected token '{}' at position {} after end of expression",
                parser.current.kind, parser.current.position
            ),
            parser.current.position,
        ));
    }

    Ok(node)
}

/// Deepest tree, and deepest parenthesis or unary nesting, a formula may
/// have. Evaluation and [`Node::variables`] recurse once per level.
pub const MAX_DEPTH: usize = 256;

/// A parsed subtree and its height.
type Parsed = (Node, usize);

struct Parser {
    tokenizer: Tokenizer,
    current: Token,
    depth: usize,
}

impl Parser {
    fn new(formula: &str) -> Result<Self, SyntaxError> {
        let mut tokenizer = Tokenizer::new(formula);
        let current = tokenizer.next_token()?;
        Ok(Self {
            tokenizer,
            current,
            depth: 0,
        })
    }

    fn advance(&mut self) -> Result<Token, SyntaxError> {
        let next = self.tokenizer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn expect(&mut self, expected: TokenKind) -> Result<(), SyntaxError> {
        if self.current.kind == expected {
            self.advance()?;
            Ok(())
        } else {
            Err(SyntaxError::at(
                format!(
                    "Expected '{}' at position {}, found {}",
                    expected,
                    self.current.position,
                    describe(&self.current.kind)
                ),
                self.current.position,
            ))
        }
    }

    fn parse_expression(&mut self) -> Result<Parsed, SyntaxError> {
        let (mut left, mut height) = self.parse_term()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Add,
                TokenKind::Minus => BinaryOperator::Subtract,
                _ => break,
            };
            let position = self.advance()?.position;
            let (right, right_height) = self.parse_term()?;
            height = checked_height(height.max(right_height) + 1, position)?;
            left = Node::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok((left, height))
    }

    fn parse_term(&mut self) -> Result<Parsed, SyntaxError> {
        let (mut left, mut height) = self.parse_factor()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::Divide,
                _ => break,
            };
            let position = self.advance()?.position;
            let (right, right_height) = self.parse_factor()?;
            height = checked_height(height.max(right_height) + 1, position)?;
            left = Node::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok((left, height))
    }

    fn parse_factor(&mut self) -> Result<Parsed, SyntaxError> {
        let token = self.advance()?;
        self.depth += 1;
        let parsed = checked_height(self.depth, token.position)
            .and_then(|_| self.parse_factor_token(token));
        self.depth -= 1;
        parsed
    }

    fn parse_factor_token(&mut self, token: Token) -> Result<Parsed, SyntaxError> {
        match token.kind {
            TokenKind::Plus => self.parse_factor(),
            TokenKind::Minus => {
                let (operand, height) = self.parse_factor()?;
                let node = Node::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(operand),
                };
                Ok((node, checked_height(height + 1, token.position)?))
            }
            TokenKind::Number(value) => Ok((Node::Number(value), 1)),
            TokenKind::Variable(name) => Ok((Node::Variable(name), 1)),
            TokenKind::LParen => {
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            TokenKind::End => Err(SyntaxError::at(
                format!("Unexpected end of formula at position {}", token.position),
                token.position,
            )),
            kind => Err(SyntaxError::at(
                format!("Unexpected token '{}' at position {}", kind, token.position),
                token.position,
            )),
        }
    }
}

fn checked_height(height: usize, position: usize) -> Result<usize, SyntaxError> {
    if height > MAX_DEPTH {
        return Err(SyntaxError::at(
            format!("Formula is nested too deeply at position {}", position),
            position,
        ));
    }
    Ok(height)
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::End => kind.to_string(),
        other => format!("'{}'", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Code;

    fn num(n: f64) -> Box<Node> {
        Box::new(Node::Number(n))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(parse("2 + 3 * 4").unwrap().to_string(), "(2 + (3 * 4))");
        assert_eq!(parse("2 * 3 + 4").unwrap().to_string(), "((2 * 3) + 4)");
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(parse("(2 + 3) * 4").unwrap().to_string(), "((2 + 3) * 4)");
    }

    #[test]
    fn test_left_associativity() {
        assert_eq!(
            parse("10 - 3 - 2").unwrap(),
            Node::BinaryOp {
                op: BinaryOperator::Subtract,
                left: Box::new(Node::BinaryOp {
                    op: BinaryOperator::Subtract,
                    left: num(10.0),
                    right: num(3.0),
                }),
                right: num(2.0),
            }
        );
        assert_eq!(parse("8 / 4 / 2").unwrap().to_string(), "((8 / 4) / 2)");
    }

    #[test]
    fn test_case_insensitive_variables() {
        for formula in ["str", "STR", "StR"] {
            assert_eq!(parse(formula).unwrap(), Node::Variable(Code::new("STR")));
        }
    }

    #[test]
    fn test_unary_minus_nests() {
        assert_eq!(
            parse("--5").unwrap(),
            Node::UnaryOp {
                op: UnaryOperator::Negate,
                operand: Box::new(Node::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: num(5.0),
                }),
            }
        );
    }

    #[test]
    fn test_unary_plus_is_dropped() {
        assert_eq!(parse("++DEX").unwrap(), Node::Variable(Code::new("DEX")));
        assert_eq!(parse("STR ++ DEX").unwrap().to_string(), "(STR + DEX)");
    }

    #[test]
    fn test_unary_binds_tighter_than_multiply() {
        assert_eq!(parse("-STR * 2").unwrap().to_string(), "((-STR) * 2)");
    }

    #[test]
    fn test_empty_formula_fails() {
        let err = parse("").unwrap_err();
        assert_eq!(err.message, "Unexpected end of formula at position 0");

        let err = parse("   ").unwrap_err();
        assert_eq!(err.position, Some(3));
    }

    #[test]
    fn test_missing_closing_paren() {
        let err = parse("(STR + 2").unwrap_err();
        assert_eq!(err.message, "Expected ')' at position 8, found end of formula");
        assert_eq!(err.position, Some(8));
    }

    #[test]
    fn test_trailing_tokens() {
        let err = parse("STR 2").unwrap_err();
        assert_eq!(
            err.message,
            "Unexpected token '2' at position 4 after end of expression"
        );

        let err = parse("(STR))").unwrap_err();
        assert_eq!(err.position, Some(5));
    }

    #[test]
    fn test_dangling_operator() {
        let err = parse("STR *").unwrap_err();
        assert_eq!(err.message, "Unexpected end of formula at position 5");
    }

    #[test]
    fn test_operator_in_factor_position() {
        let err = parse("STR * / 2").unwrap_err();
        assert_eq!(err.message, "Unexpected token '/' at position 6");
    }

    #[test]
    fn test_unexpected_character_propagates() {
        let err = parse("STR & DEX").unwrap_err();
        assert_eq!(err.message, "Unexpected character '&' at position 4");
    }

    #[test]
    fn test_deep_unary_chain_is_rejected() {
        let formula = format!("{}1", "-".repeat(10_000));
        let err = parse(&formula).unwrap_err();
        assert_eq!(err.message, "Formula is nested too deeply at position 256");
        assert_eq!(err.position, Some(256));
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let formula = "(".repeat(200_000);
        let err = parse(&formula).unwrap_err();
        assert!(err.message.starts_with("Formula is nested too deeply"));
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let formula = format!("{}1", "1 + ".repeat(10_000));
        let err = parse(&formula).unwrap_err();
        assert!(err.message.starts_with("Formula is nested too deeply"));
    }

    #[test]
    fn test_nesting_up_to_limit_is_accepted() {
        let formula = format!("{}STR{}", "(".repeat(100), ")".repeat(100));
        assert_eq!(parse(&formula).unwrap(), Node::Variable(Code::new("STR")));

        let formula = format!("{}1", "-".repeat(MAX_DEPTH - 1));
        assert!(parse(&formula).is_ok());
    }

    #[test]
    fn test_empty_parens_fail() {
        let err = parse("()").unwrap_err();
        assert_eq!(err.message, "Unexpected token ')' at position 1");
    }
}
