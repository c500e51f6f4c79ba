//! Variable values for formula evaluation.
//!
//! A `FormulaContext` maps codes to their current numeric values. The
//! evaluator only reads it; callers assemble a fresh one per calculation.

use crate::code::Code;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Variable values a formula is evaluated against.
///
/// Keys are [`Code`]s, so lookups are case-insensitive. A value of zero
/// is a real value, distinct from a missing variable.
///
/// # Examples
///
/// ```rust
/// use zzformula::FormulaContext;
///
/// let mut context = FormulaContext::new();
/// context.set("str", 15.0);
///
/// assert_eq!(context.get("STR"), Some(15.0));
/// assert_eq!(context.get("DEX"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormulaContext {
    values: HashMap<Code, f64>,
}

impl FormulaContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a variable, replacing any previous value.
    pub fn set(&mut self, name: impl Into<Code>, value: f64) {
        self.values.insert(name.into(), value);
    }

    /// Add `value` to a variable, treating a missing one as zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use zzformula::FormulaContext;
    ///
    /// let mut context = FormulaContext::new();
    /// context.add("STR", 10.0);
    /// context.add("STR", 2.0);
    /// assert_eq!(context.get("STR"), Some(12.0));
    /// ```
    pub fn add(&mut self, name: impl Into<Code>, value: f64) {
        *self.values.entry(name.into()).or_insert(0.0) += value;
    }

    /// Look up a variable by name, in any case.
    pub fn get(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(value) => Some(*value),
            None => self.values.get(name.to_ascii_uppercase().as_str()).copied(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Code, f64)> {
        self.values.iter().map(|(code, value)| (code, *value))
    }

    /// Add every value of `other` into this context, summing shared keys.
    pub fn merge(&mut self, other: &FormulaContext) {
        for (code, value) in other.iter() {
            self.add(code, value);
        }
    }
}

impl<K: Into<Code>> FromIterator<(K, f64)> for FormulaContext {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut context = Self::new();
        context.extend(iter);
        context
    }
}

/// Later entries replace earlier ones, like [`FormulaContext::set`].
impl<K: Into<Code>> Extend<(K, f64)> for FormulaContext {
    fn extend<I: IntoIterator<Item = (K, f64)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name, value);
        }
    }
}
