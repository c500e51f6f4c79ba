//! Error types for parsing, evaluation and calculation.
//!
//! Syntax and evaluation failures are separate types so that callers
//! which only parse (the validator) never have to match on evaluation
//! variants. `FormulaError` joins them for the parse-then-evaluate path,
//! and `CalculationError` adds the entity that was being calculated.

use crate::code::Code;
use thiserror::Error;

/// A formula could not be tokenized or parsed.
///
/// The message is user-facing and already contains the position when
/// one is known.
///
/// # Examples
///
/// ```rust
/// use zzformula::parse;
///
/// let err = parse("STR + #").unwrap_err();
/// assert_eq!(err.to_string(), "Unexpected character '#' at position 6");
/// assert_eq!(err.position, Some(6));
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    /// Human-readable description.
    pub message: String,
    /// Character offset of the offending input, when available.
    pub position: Option<usize>,
}

impl SyntaxError {
    /// Create a syntax error pointing at `position`.
    pub fn at(message: impl Into<String>, position: usize) -> Self {
        Self {
            message: message.into(),
            position: Some(position),
        }
    }
}

/// Errors that abort evaluation of a whole formula.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvaluationError {
    /// The formula references a variable the context does not define.
    #[error("Undefined variable: {0}")]
    UndefinedVariable(Code),

    /// The right operand of a division evaluated to exactly zero.
    #[error("Division by zero")]
    DivisionByZero,
}

/// Either half of the parse-then-evaluate pipeline failed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormulaError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    Evaluation(#[from] EvaluationError),
}

/// The kind of rule-set entity a calculation or issue refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum EntityKind {
    MainSkill,
    SpecialitySkill,
    CombatSkill,
    Stat,
    MaterialCategory,
    Material,
    CurrencyTier,
    EquipmentSlot,
    Item,
    Race,
}

impl EntityKind {
    /// Lowercase label used in messages.
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::MainSkill => "main skill",
            EntityKind::SpecialitySkill => "speciality skill",
            EntityKind::CombatSkill => "combat skill",
            EntityKind::Stat => "stat",
            EntityKind::MaterialCategory => "material category",
            EntityKind::Material => "material",
            EntityKind::CurrencyTier => "currency tier",
            EntityKind::EquipmentSlot => "equipment slot",
            EntityKind::Item => "item",
            EntityKind::Race => "race",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A single entity's formula failed to calculate.
///
/// Downstream tooling matches on this text, so the layout is fixed:
/// `Failed to calculate <kind> "<name>" (<id>): <error>`.
///
/// # Examples
///
/// ```rust
/// use zzformula::{CalculationError, EntityKind, EvaluationError, FormulaError};
///
/// let err = CalculationError {
///     kind: EntityKind::Stat,
///     name: "Health".to_string(),
///     id: "HP".to_string(),
///     source: FormulaError::Evaluation(EvaluationError::DivisionByZero),
/// };
/// assert_eq!(
///     err.to_string(),
///     "Failed to calculate stat \"Health\" (HP): Division by zero"
/// );
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Failed to calculate {kind} \"{name}\" ({id}): {source}")]
pub struct CalculationError {
    pub kind: EntityKind,
    pub name: String,
    pub id: String,
    pub source: FormulaError,
}

/// Loading a rule set or character from JSON failed.
#[derive(Debug, Error)]
pub enum RuleSetError {
    #[error("Invalid rule set JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to read rule set: {0}")]
    Io(#[from] std::io::Error),
}
