//! Tokenizer module.
//!
//! Turns formula text into a pull-based stream of [`Token`]s. Whitespace
//! is skipped, variable names are uppercased, and every token remembers
//! the character offset it started at so the parser can point at it.

use crate::code::Code;
use crate::error::SyntaxError;

/// Kind of a lexical token, carrying the literal value where there is one.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Number(f64),
    Variable(Code),
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    End,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::Variable(name) => write!(f, "{}", name),
            TokenKind::Plus => f.write_str("+"),
            TokenKind::Minus => f.write_str("-"),
            TokenKind::Star => f.write_str("*"),
            TokenKind::Slash => f.write_str("/"),
            TokenKind::LParen => f.write_str("("),
            TokenKind::RParen => f.write_str(")"),
            TokenKind::End => f.write_str("end of formula"),
        }
    }
}

/// A token and the character offset where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: usize,
}

/// Lazy tokenizer over a single formula.
///
/// Once the input is exhausted every further call to
/// [`next_token`](Tokenizer::next_token) returns an `End` token at the
/// same position.
///
/// # Examples
///
/// ```rust
/// use zzformula::token::{TokenKind, Tokenizer};
/// use zzformula::Code;
///
/// let mut tokens = Tokenizer::new("str * 2");
/// assert_eq!(tokens.next_token().unwrap().kind, TokenKind::Variable(Code::new("STR")));
/// assert_eq!(tokens.next_token().unwrap().kind, TokenKind::Star);
/// assert_eq!(tokens.next_token().unwrap().kind, TokenKind::Number(2.0));
/// assert_eq!(tokens.next_token().unwrap().kind, TokenKind::End);
/// assert_eq!(tokens.next_token().unwrap().kind, TokenKind::End);
/// ```
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            pos: 0,
        }
    }

    /// Read the next token.
    ///
    /// Fails on characters outside the formula alphabet and on numeric
    /// literals with more than one decimal point (or no digits at all).
    pub fn next_token(&mut self) -> Result<Token, SyntaxError> {
        self.skip_whitespace();

        let start = self.pos;
        let Some(&ch) = self.chars.get(start) else {
            return Ok(Token {
                kind: TokenKind::End,
                position: start,
            });
        };

        let kind = match ch {
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            c if c.is_ascii_digit() || c == '.' => self.read_number()?,
            c if c.is_ascii_alphabetic() => self.read_variable(),
            c => {
                return Err(SyntaxError::at(
                    format!("Unexpected character '{}' at position {}", c, start),
                    start,
                ))
            }
        };

        Ok(Token {
            kind,
            position: start,
        })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.pos += 1;
        kind
    }

    fn skip_whitespace(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn read_while(&mut self, pred: impl Fn(char) -> bool) -> String {
        let start = self.pos;
        while self.chars.get(self.pos).is_some_and(|&c| pred(c)) {
            self.pos += 1;
        }
        self.chars[start..self.pos].iter().collect()
    }

    fn read_number(&mut self) -> Result<TokenKind, SyntaxError> {
        let start = self.pos;
        let text = self.read_while(|c| c.is_ascii_digit() || c == '.');

        let dots = text.matches('.').count();
        match text.parse::<f64>() {
            Ok(value) if dots <= 1 => Ok(TokenKind::Number(value)),
            _ => Err(SyntaxError::at(
                format!("Invalid number '{}' at position {}", text, start),
                start,
            )),
        }
    }

    fn read_variable(&mut self) -> TokenKind {
        let name = self.read_while(|c| c.is_ascii_alphabetic());
        TokenKind::Variable(Code::from(name))
    }
}

/// Yields tokens up to and excluding `End`, stopping after the first error.
impl Iterator for Tokenizer {
    type Item = Result<Token, SyntaxError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token() {
            Ok(Token {
                kind: TokenKind::End,
                ..
            }) => None,
            Err(err) => {
                self.pos = self.chars.len();
                Some(Err(err))
            }
            ok => Some(ok),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Tokenizer::new(input)
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_tokenize_all_operators() {
        assert_eq!(
            kinds("+-*/()"),
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::LParen,
                TokenKind::RParen,
            ]
        );
    }

    #[test]
    fn test_tokenize_numbers() {
        assert_eq!(
            kinds("42 3.5 .5"),
            vec![
                TokenKind::Number(42.0),
                TokenKind::Number(3.5),
                TokenKind::Number(0.5),
            ]
        );
    }

    #[test]
    fn test_variables_are_uppercased() {
        assert_eq!(
            kinds("str DeX"),
            vec![
                TokenKind::Variable(Code::new("STR")),
                TokenKind::Variable(Code::new("DEX")),
            ]
        );
    }

    #[test]
    fn test_variable_stops_at_digit() {
        assert_eq!(
            kinds("ab2"),
            vec![TokenKind::Variable(Code::new("AB")), TokenKind::Number(2.0)]
        );
    }

    #[test]
    fn test_positions_skip_whitespace() {
        let tokens: Vec<Token> = Tokenizer::new("  STR +\t10")
            .collect::<Result<_, _>>()
            .unwrap();
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![2, 6, 8]);
    }

    #[test]
    fn test_unexpected_character() {
        let mut tokenizer = Tokenizer::new("STR % 2");
        tokenizer.next_token().unwrap();
        let err = tokenizer.next_token().unwrap_err();
        assert_eq!(err.message, "Unexpected character '%' at position 4");
        assert_eq!(err.position, Some(4));
    }

    #[test]
    fn test_multiple_decimal_points_rejected() {
        let err = Tokenizer::new("1.2.3").next_token().unwrap_err();
        assert_eq!(err.message, "Invalid number '1.2.3' at position 0");
    }

    #[test]
    fn test_lone_dot_rejected() {
        let err = Tokenizer::new(" .").next_token().unwrap_err();
        assert_eq!(err.message, "Invalid number '.' at position 1");
    }

    #[test]
    fn test_end_is_idempotent() {
        let mut tokenizer = Tokenizer::new("7");
        tokenizer.next_token().unwrap();
        for _ in 0..3 {
            let token = tokenizer.next_token().unwrap();
            assert_eq!(token.kind, TokenKind::End);
            assert_eq!(token.position, 1);
        }
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let items: Vec<_> = Tokenizer::new("1 $ 2").collect();
        assert_eq!(items.len(), 2);
        assert!(items[1].is_err());
    }
}
