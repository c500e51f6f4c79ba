//! Property-based tests for the formula language using proptest.
//!
//! These tests check invariants that hold for every formula:
//! - Evaluation is deterministic
//! - `*` and `/` bind tighter than `+` and `-`, and both are left-associative
//! - Variable names are case-insensitive
//! - Division by a zero-valued operand always fails
//! - Undefined variables are always named in the error
//! - Acyclic dependency records never report a cycle

use proptest::prelude::*;
use std::collections::HashSet;
use zzformula::*;

// =============================================================================
// Strategies
// =============================================================================

const VARIABLES: [&str; 4] = ["STR", "DEX", "CON", "WIS"];

fn arb_context() -> impl Strategy<Value = FormulaContext> {
    prop::collection::vec(-100i32..100, VARIABLES.len()).prop_map(|values| {
        VARIABLES
            .iter()
            .zip(values)
            .map(|(name, value)| (*name, f64::from(value)))
            .collect()
    })
}

/// Random well-formed formulas over small integers and known variables.
fn arb_formula() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        (0u32..50).prop_map(|n| n.to_string()),
        prop::sample::select(VARIABLES.to_vec()).prop_map(str::to_string),
    ];
    leaf.prop_recursive(4, 32, 2, |inner| {
        prop_oneof![
            (inner.clone(), prop::sample::select(vec!["+", "-", "*", "/"]), inner.clone())
                .prop_map(|(l, op, r)| format!("{} {} {}", l, op, r)),
            inner.clone().prop_map(|e| format!("({})", e)),
            inner.prop_map(|e| format!("-{}", e)),
        ]
    })
}

fn mixed_case(name: &str, mask: u8) -> String {
    name.chars()
        .enumerate()
        .map(|(i, c)| {
            if mask & (1 << i) != 0 {
                c.to_ascii_lowercase()
            } else {
                c
            }
        })
        .collect()
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_evaluation_is_deterministic(formula in arb_formula(), context in arb_context()) {
        let node = parse(&formula).unwrap();
        let first = evaluate(&node, &context);
        let second = evaluate(&parse(&formula).unwrap(), &context);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert!(a == b || (a.is_nan() && b.is_nan())),
            (a, b) => prop_assert_eq!(a, b),
        }
    }

    #[test]
    fn prop_generated_formulas_validate(formula in arb_formula()) {
        let known: HashSet<Code> = VARIABLES.iter().copied().map(Code::from).collect();
        let result = validate(&formula, Some(&known));
        prop_assert!(result.is_valid, "{:?}", result.errors);
    }

    #[test]
    fn prop_multiplication_binds_tighter(a in -50i32..50, b in -50i32..50, c in -50i32..50) {
        let formula = format!("{} + {} * {}", a, b, c);
        let expected = f64::from(a) + f64::from(b) * f64::from(c);
        prop_assert_eq!(evaluate_formula(&formula, &FormulaContext::new()), Ok(expected));
    }

    #[test]
    fn prop_subtraction_is_left_associative(a in -50i32..50, b in -50i32..50, c in -50i32..50) {
        let formula = format!("{} - {} - {}", a, b, c);
        let expected = (f64::from(a) - f64::from(b)) - f64::from(c);
        prop_assert_eq!(evaluate_formula(&formula, &FormulaContext::new()), Ok(expected));
    }

    #[test]
    fn prop_variables_are_case_insensitive(
        name in prop::sample::select(VARIABLES.to_vec()),
        mask in any::<u8>(),
    ) {
        let written = mixed_case(name, mask);
        prop_assert_eq!(parse(&written).unwrap(), Node::Variable(Code::new(name)));
    }

    #[test]
    fn prop_division_by_zero_always_fails(formula in arb_formula(), context in arb_context()) {
        let mut context = context;
        context.set("ZERO", 0.0);
        let divided = format!("({}) / ZERO", formula);
        let result = evaluate(&parse(&divided).unwrap(), &context);
        prop_assert_eq!(result, Err(EvaluationError::DivisionByZero));
    }

    #[test]
    fn prop_undefined_variable_is_named(formula in arb_formula(), context in arb_context()) {
        let with_missing = format!("MISSING + ({})", formula);
        let result = evaluate(&parse(&with_missing).unwrap(), &context);
        prop_assert_eq!(
            result,
            Err(EvaluationError::UndefinedVariable(Code::new("MISSING")))
        );
    }

    #[test]
    fn prop_dag_has_no_cycles(edges in prop::collection::vec((0usize..12, 0usize..12), 0..40)) {
        // Only edges from higher to lower ids, so the graph is acyclic.
        let mut refs: Vec<Vec<usize>> = vec![Vec::new(); 12];
        for (from, to) in edges {
            if from > to {
                refs[from].push(to);
            }
        }
        let records: Vec<DependencyRecord<usize>> = refs
            .into_iter()
            .enumerate()
            .map(|(id, refs)| DependencyRecord::new(id, refs))
            .collect();

        prop_assert!(detect_cycles(&records).is_empty());
        prop_assert!(evaluation_order(&records).is_ok());
    }

    #[test]
    fn prop_back_edge_creates_cycle(len in 2usize..8) {
        // 0 -> 1 -> ... -> len-1 -> 0
        let records: Vec<DependencyRecord<usize>> = (0..len)
            .map(|id| DependencyRecord::new(id, vec![(id + 1) % len]))
            .collect();

        let cycles = detect_cycles(&records);
        prop_assert_eq!(cycles.len(), 1);
        prop_assert_eq!(cycles[0].len(), len + 1);
        prop_assert_eq!(cycles[0].first(), cycles[0].last());
    }
}
