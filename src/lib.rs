//! # zzformula - Formula Language and Validation for RPG Rule Sets
//!
//! Tabletop rule sets describe derived numbers (stats, speciality and
//! combat skills) as small arithmetic formulas over skill codes. This
//! crate provides:
//! - **Parsing** of formulas into a syntax tree, with positioned errors
//! - **Evaluation** of a tree against variable values
//! - **Validation** of single formulas and of whole rule sets, including
//!   circular dependencies between formulas
//! - **Calculators** that turn a character into skill totals and stats
//!
//! ## Formula Language
//!
//! ```text
//! expression := term ( ('+' | '-') term )*
//! term       := factor ( ('*' | '/') factor )*
//! factor     := '+' factor | '-' factor | NUMBER | VARIABLE | '(' expression ')'
//! ```
//!
//! Variables are runs of ASCII letters and are case-insensitive: `str`,
//! `Str` and `STR` all name the same skill.
//!
//! ## Example
//!
//! ```rust
//! use zzformula::*;
//!
//! let node = parse("STR * 10 + CON * 5").unwrap();
//! let context: FormulaContext = [("STR", 15.0), ("CON", 12.0)].into_iter().collect();
//! assert_eq!(evaluate(&node, &context), Ok(210.0));
//!
//! let result = validate("STR + WIS", None);
//! assert!(result.is_valid);
//! assert_eq!(result.referenced_variables, vec![Code::new("STR"), Code::new("WIS")]);
//! ```
//!
//! ## Modules
//!
//! - [`code`] - Case-normalized identifier type
//! - [`token`] - Tokenizer
//! - [`ast`] - Syntax tree
//! - [`parser`] - Recursive-descent parser
//! - [`context`] - Variable values
//! - [`eval`] - Evaluator
//! - [`validate`] - Single-formula validation
//! - [`graph`] - Dependency graph and cycle detection
//! - [`rules`] - Rule set records
//! - [`crossref`] - Whole rule set validation
//! - [`calculator`] - Character calculators
//! - [`error`] - Error types

pub mod ast;
pub mod calculator;
pub mod code;
pub mod context;
pub mod crossref;
pub mod error;
pub mod eval;
pub mod graph;
pub mod parser;
pub mod rules;
pub mod token;
pub mod validate;

// Re-export main types for convenience
pub use ast::{BinaryOperator, Node, UnaryOperator};
pub use code::Code;
pub use context::FormulaContext;
pub use error::{
    CalculationError, EntityKind, EvaluationError, FormulaError, RuleSetError, SyntaxError,
};
pub use eval::{evaluate, evaluate_formula};
pub use parser::parse;
pub use validate::{validate, ValidationResult};

pub use graph::{detect_cycles, evaluation_order, DependencyGraph, DependencyRecord};

pub use crossref::{validate_rule_set, EntityRef, Issue, IssueCategory, Severity, ValidationReport};
pub use rules::RuleSet;

pub use calculator::{calculate_character, Character, CharacterSheet};
