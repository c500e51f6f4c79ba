//! Rule set cross-reference validation.
//!
//! Runs every check a rule set needs before it can be used: formula
//! syntax and variable scope, circular formula dependencies, references
//! between entities, code uniqueness and currency tier ordering. All
//! checks run to completion; one bad entity never hides problems in
//! another.

use crate::code::Code;
use crate::error::EntityKind;
use crate::graph::{detect_cycles, DependencyRecord};
use crate::rules::RuleSet;
use crate::validate::validate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        })
    }
}

/// Which check produced an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    FormulaValidation,
    CircularDependency,
    ReferenceValidation,
    UniquenessValidation,
    CurrencyTierOrder,
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            IssueCategory::FormulaValidation => "Formula Validation",
            IssueCategory::CircularDependency => "Circular Dependency",
            IssueCategory::ReferenceValidation => "Reference Validation",
            IssueCategory::UniquenessValidation => "Uniqueness Validation",
            IssueCategory::CurrencyTierOrder => "Currency Tier Order",
        })
    }
}

/// The entity an issue is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub entity_type: EntityKind,
    pub id: String,
    pub name: String,
}

impl EntityRef {
    pub fn new(entity_type: EntityKind, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            entity_type,
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub category: IssueCategory,
    pub message: String,
    pub entity: Option<EntityRef>,
}

/// Result of validating a whole rule set.
///
/// `is_valid` only reflects errors; warnings are informational.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<Issue>,
    pub warnings: Vec<Issue>,
}

impl ValidationReport {
    /// Errors of one category, in report order.
    pub fn errors_in(&self, category: IssueCategory) -> impl Iterator<Item = &Issue> {
        self.errors.iter().filter(move |i| i.category == category)
    }
}

#[derive(Default)]
struct Collector {
    errors: Vec<Issue>,
    warnings: Vec<Issue>,
}

impl Collector {
    fn error(&mut self, category: IssueCategory, message: String, entity: Option<EntityRef>) {
        self.errors.push(Issue {
            severity: Severity::Error,
            category,
            message,
            entity,
        });
    }

    fn warning(&mut self, category: IssueCategory, message: String) {
        self.warnings.push(Issue {
            severity: Severity::Warning,
            category,
            message,
            entity: None,
        });
    }

    fn reference(&mut self, message: String, entity: EntityRef) {
        self.error(IssueCategory::ReferenceValidation, message, Some(entity));
    }
}

/// Validate every formula and reference in a rule set.
///
/// # Examples
///
/// ```rust
/// use zzformula::{validate_rule_set, RuleSet};
///
/// let rules = RuleSet::from_json(r#"{
///     "main_skills": [{ "code": "STR", "name": "Strength" }],
///     "stats": [
///         { "id": "ATK", "name": "Attack", "formula": "STR * 2 + DEF" },
///         { "id": "DEF", "name": "Defence", "formula": "ATK / 2" }
///     ]
/// }"#).unwrap();
///
/// let report = validate_rule_set(&rules);
/// assert!(!report.is_valid);
/// assert!(report
///     .errors
///     .iter()
///     .any(|e| e.message == "Circular dependency detected: ATK → DEF → ATK"));
/// ```
pub fn validate_rule_set(rules: &RuleSet) -> ValidationReport {
    let mut out = Collector::default();

    let records = validate_formulas(rules, &mut out);
    validate_cycles(rules, &records, &mut out);
    validate_materials(rules, &mut out);
    validate_items(rules, &mut out);
    validate_races(rules, &mut out);
    validate_uniqueness(rules, &mut out);
    validate_currency_tiers(rules, &mut out);

    debug!(
        errors = out.errors.len(),
        warnings = out.warnings.len(),
        "rule set validated"
    );

    ValidationReport {
        is_valid: out.errors.is_empty(),
        errors: out.errors,
        warnings: out.warnings,
    }
}

/// Validates each formula against the variables its kind may read and
/// returns the dependency record of every formula entity.
fn validate_formulas(rules: &RuleSet, out: &mut Collector) -> Vec<DependencyRecord<Code>> {
    let main_codes = rules.main_skill_codes();
    let mut combat_scope = main_codes.clone();
    combat_scope.extend(rules.speciality_skill_codes());

    let stats = rules
        .stats
        .iter()
        .map(|s| (EntityKind::Stat, &s.id, &s.name, &s.formula, &main_codes));
    let specialities = rules
        .speciality_skills
        .iter()
        .map(|s| (EntityKind::SpecialitySkill, &s.code, &s.name, &s.formula, &main_codes));
    let combat = rules
        .combat_skills
        .iter()
        .map(|s| (EntityKind::CombatSkill, &s.code, &s.name, &s.formula, &combat_scope));

    let mut records = Vec::new();
    for (kind, id, name, formula, scope) in stats.chain(specialities).chain(combat) {
        let result = validate(formula, Some(scope));
        for error in result.errors {
            out.error(
                IssueCategory::FormulaValidation,
                format!("Invalid formula for {} \"{}\" ({}): {}", kind, name, id, error),
                Some(EntityRef::new(kind, id.as_str(), name.as_str())),
            );
        }
        records.push(DependencyRecord::new(id.clone(), result.referenced_variables));
    }
    records
}

fn validate_cycles(rules: &RuleSet, records: &[DependencyRecord<Code>], out: &mut Collector) {
    let mut owners: HashMap<&Code, EntityRef> = HashMap::new();
    for stat in &rules.stats {
        owners
            .entry(&stat.id)
            .or_insert_with(|| EntityRef::new(EntityKind::Stat, stat.id.as_str(), &stat.name));
    }
    for skill in &rules.speciality_skills {
        owners.entry(&skill.code).or_insert_with(|| {
            EntityRef::new(EntityKind::SpecialitySkill, skill.code.as_str(), &skill.name)
        });
    }
    for skill in &rules.combat_skills {
        owners.entry(&skill.code).or_insert_with(|| {
            EntityRef::new(EntityKind::CombatSkill, skill.code.as_str(), &skill.name)
        });
    }

    for cycle in detect_cycles(records) {
        let path = cycle
            .iter()
            .map(Code::as_str)
            .collect::<Vec<_>>()
            .join(" → ");
        let entity = cycle.first().and_then(|id| owners.get(id)).cloned();
        out.error(
            IssueCategory::CircularDependency,
            format!("Circular dependency detected: {}", path),
            entity,
        );
    }
}

fn validate_materials(rules: &RuleSet, out: &mut Collector) {
    let categories: HashSet<&str> = rules
        .material_categories
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    let tiers: HashSet<&str> = rules.currency_tiers.iter().map(|t| t.id.as_str()).collect();
    let skills = rules.all_skill_codes();

    for material in &rules.materials {
        let entity = || EntityRef::new(EntityKind::Material, &material.id, &material.name);

        if !categories.contains(material.category_id.as_str()) {
            out.reference(
                format!(
                    "Material \"{}\" references unknown category \"{}\"",
                    material.name, material.category_id
                ),
                entity(),
            );
        }

        for level in &material.levels {
            if !tiers.contains(level.currency_tier_id.as_str()) {
                out.reference(
                    format!(
                        "Material \"{}\" level {} references unknown currency tier \"{}\"",
                        material.name, level.level, level.currency_tier_id
                    ),
                    entity(),
                );
            }
            for bonus in &level.bonuses {
                if !skills.contains(&bonus.skill_code) {
                    out.reference(
                        format!(
                            "Material \"{}\" level {} grants a bonus to unknown skill \"{}\"",
                            material.name, level.level, bonus.skill_code
                        ),
                        entity(),
                    );
                }
            }
        }
    }
}

fn validate_items(rules: &RuleSet, out: &mut Collector) {
    let slots: HashSet<&str> = rules
        .equipment_slots
        .iter()
        .map(|s| s.slot_type.as_str())
        .collect();

    for item in &rules.items {
        let entity = || EntityRef::new(EntityKind::Item, &item.id, &item.name);

        if !slots.contains(item.slot_type.as_str()) {
            out.reference(
                format!(
                    "Item \"{}\" references unknown equipment slot \"{}\"",
                    item.name, item.slot_type
                ),
                entity(),
            );
        }

        match rules.material(&item.material_id) {
            None => out.reference(
                format!(
                    "Item \"{}\" references unknown material \"{}\"",
                    item.name, item.material_id
                ),
                entity(),
            ),
            Some(material) if material.level(item.material_level).is_none() => out.reference(
                format!(
                    "Item \"{}\" references unknown level {} of material \"{}\"",
                    item.name, item.material_level, material.name
                ),
                entity(),
            ),
            Some(_) => {}
        }
    }
}

fn validate_races(rules: &RuleSet, out: &mut Collector) {
    let main_codes = rules.main_skill_codes();

    for race in &rules.races {
        for modifier in &race.skill_modifiers {
            if !main_codes.contains(&modifier.skill_code) {
                out.reference(
                    format!(
                        "Race \"{}\" modifies unknown main skill \"{}\"",
                        race.name, modifier.skill_code
                    ),
                    EntityRef::new(EntityKind::Race, &race.id, &race.name),
                );
            }
        }
    }
}

fn validate_uniqueness(rules: &RuleSet, out: &mut Collector) {
    let main = rules
        .main_skills
        .iter()
        .map(|s| (&s.code, EntityKind::MainSkill, &s.name));
    let specialities = rules
        .speciality_skills
        .iter()
        .map(|s| (&s.code, EntityKind::SpecialitySkill, &s.name));
    let combat = rules
        .combat_skills
        .iter()
        .map(|s| (&s.code, EntityKind::CombatSkill, &s.name));

    let mut order: Vec<&Code> = Vec::new();
    let mut by_code: HashMap<&Code, Vec<(EntityKind, &String)>> = HashMap::new();
    for (code, kind, name) in main.chain(specialities).chain(combat) {
        let entries = by_code.entry(code).or_default();
        if entries.is_empty() {
            order.push(code);
        }
        entries.push((kind, name));
    }

    for code in order {
        let entries = &by_code[code];
        if entries.len() < 2 {
            continue;
        }
        let users = entries
            .iter()
            .map(|(kind, name)| format!("{} \"{}\"", kind, name))
            .collect::<Vec<_>>()
            .join(", ");
        let (first_kind, first_name) = entries[0];
        out.error(
            IssueCategory::UniquenessValidation,
            format!("Skill code \"{}\" is used by multiple skills: {}", code, users),
            Some(EntityRef::new(first_kind, code.as_str(), first_name.as_str())),
        );
    }
}

fn validate_currency_tiers(rules: &RuleSet, out: &mut Collector) {
    let mut by_order: BTreeMap<i64, Vec<&str>> = BTreeMap::new();
    for tier in &rules.currency_tiers {
        by_order.entry(tier.order).or_default().push(&tier.name);
    }

    for (order, names) in &by_order {
        if names.len() > 1 {
            out.warning(
                IssueCategory::CurrencyTierOrder,
                format!(
                    "Currency tiers share order {}: {}",
                    order,
                    names.join(", ")
                ),
            );
        }
    }

    let orders: Vec<i64> = by_order.keys().copied().collect();
    for pair in orders.windows(2) {
        if pair[1].abs_diff(pair[0]) > 1 {
            out.warning(
                IssueCategory::CurrencyTierOrder,
                format!(
                    "Gap in currency tier order between {} and {}",
                    pair[0], pair[1]
                ),
            );
        }
    }
}
