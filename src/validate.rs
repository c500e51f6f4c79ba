//! Single-formula validation.
//!
//! Checks that a formula parses and, optionally, that every variable it
//! references is known. Failures are reported in the returned
//! [`ValidationResult`]; validation itself never fails.

use crate::code::Code;
use crate::parser::parse;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::trace;

/// Outcome of validating one formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    /// Referenced variables in first-occurrence order, without duplicates.
    pub referenced_variables: Vec<Code>,
}

impl ValidationResult {
    fn invalid(error: String) -> Self {
        Self {
            is_valid: false,
            errors: vec![error],
            referenced_variables: Vec::new(),
        }
    }
}

/// Validate a formula.
///
/// When `available_variables` is `None` only syntax is checked, which
/// lets callers list what a formula references before any variables
/// are known.
///
/// # Examples
///
/// ```rust
/// use std::collections::HashSet;
/// use zzformula::{validate, Code};
///
/// let known: HashSet<Code> = ["STR", "DEX"].into_iter().map(Code::from).collect();
/// let result = validate("STR + CON + WIS", Some(&known));
///
/// assert!(!result.is_valid);
/// assert_eq!(result.errors, vec!["Undefined variables: CON, WIS".to_string()]);
/// assert_eq!(
///     result.referenced_variables,
///     vec![Code::new("STR"), Code::new("CON"), Code::new("WIS")]
/// );
/// ```
pub fn validate(formula: &str, available_variables: Option<&HashSet<Code>>) -> ValidationResult {
    if formula.trim().is_empty() {
        return ValidationResult::invalid("Formula cannot be empty".to_string());
    }

    let node = match parse(formula) {
        Ok(node) => node,
        Err(err) => {
            trace!(formula, error = %err, "formula failed to parse");
            return ValidationResult::invalid(err.message);
        }
    };

    let referenced_variables = node.variables();
    let mut errors = Vec::new();

    if let Some(available) = available_variables {
        let undefined: Vec<&str> = referenced_variables
            .iter()
            .filter(|name| !available.contains(*name))
            .map(Code::as_str)
            .collect();

        match undefined.as_slice() {
            [] => {}
            [single] => errors.push(format!("Undefined variable: {}", single)),
            many => errors.push(format!("Undefined variables: {}", many.join(", "))),
        }
    }

    ValidationResult {
        is_valid: errors.is_empty(),
        errors,
        referenced_variables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(codes: &[&str]) -> HashSet<Code> {
        codes.iter().copied().map(Code::from).collect()
    }

    fn codes(names: &[&str]) -> Vec<Code> {
        names.iter().copied().map(Code::from).collect()
    }

    #[test]
    fn test_valid_formula_with_known_variables() {
        let result = validate("STR * 10 + CON * 5", Some(&known(&["STR", "CON"])));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.referenced_variables, codes(&["STR", "CON"]));
    }

    #[test]
    fn test_empty_formula() {
        for formula in ["", "   ", "\t\n"] {
            let result = validate(formula, None);
            assert!(!result.is_valid);
            assert_eq!(result.errors, vec!["Formula cannot be empty".to_string()]);
            assert!(result.referenced_variables.is_empty());
        }
    }

    #[test]
    fn test_parse_failure_uses_parser_message() {
        let result = validate("(STR + DEX", Some(&known(&["STR", "DEX"])));
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Expected ')' at position 10, found end of formula".to_string()]
        );
        assert!(result.referenced_variables.is_empty());
    }

    #[test]
    fn test_single_undefined_variable() {
        let result = validate("STR + WIS", Some(&known(&["STR"])));
        assert_eq!(result.errors, vec!["Undefined variable: WIS".to_string()]);
    }

    #[test]
    fn test_plural_undefined_variables_in_first_occurrence_order() {
        let result = validate("WIS + str + CON + wis", Some(&known(&["STR"])));
        assert_eq!(result.errors, vec!["Undefined variables: WIS, CON".to_string()]);
        assert_eq!(result.referenced_variables, codes(&["WIS", "STR", "CON"]));
    }

    #[test]
    fn test_no_available_set_skips_undefined_check() {
        let result = validate("FOO + BAR", None);
        assert!(result.is_valid);
        assert_eq!(result.referenced_variables, codes(&["FOO", "BAR"]));
    }

    #[test]
    fn test_constant_formula() {
        let result = validate("42", Some(&known(&[])));
        assert!(result.is_valid);
        assert!(result.referenced_variables.is_empty());
    }

    #[test]
    fn test_deeply_nested_formula_is_invalid() {
        let result = validate(&format!("{}1", "-".repeat(10_000)), None);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors,
            vec!["Formula is nested too deeply at position 256".to_string()]
        );
        assert!(result.referenced_variables.is_empty());
    }
}
