//! Character calculators.
//!
//! Assemble the variable contexts for a character and run each skill and
//! stat formula against them:
//!
//! ```text
//! base levels + race modifiers + equipment ─┐
//!                                           ├─> main skill totals
//! main skill totals ─> speciality skills    │
//! main + speciality  ─> combat skills       │
//! main skill totals  ─> stats <─────────────┘
//! ```
//!
//! Each formula is calculated on its own. A failing formula is reported
//! in [`Calculated::errors`] and does not stop its siblings.

use crate::code::Code;
use crate::context::FormulaContext;
use crate::error::{CalculationError, EntityKind, RuleSetError};
use crate::eval::evaluate_formula;
use crate::rules::RuleSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A character's own choices: race, trained main skill levels and gear.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Character {
    pub race_id: Option<String>,
    pub main_skill_levels: FormulaContext,
    pub equipped_items: Vec<String>,
}

impl Character {
    pub fn from_json(json: &str) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// One successfully calculated formula.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculatedValue {
    pub id: Code,
    pub name: String,
    pub value: f64,
}

/// Results of calculating every formula of one entity kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Calculated {
    /// Successful results, in rule-set order.
    pub values: Vec<CalculatedValue>,
    pub errors: Vec<CalculationError>,
}

impl Calculated {
    pub fn get(&self, id: &str) -> Option<f64> {
        let id = Code::new(id);
        self.values.iter().find(|v| v.id == id).map(|v| v.value)
    }

    /// Successful results as formula variables.
    pub fn to_context(&self) -> FormulaContext {
        self.values.iter().map(|v| (&v.id, v.value)).collect()
    }

    fn record(&mut self, id: &Code, name: &str, result: Result<f64, CalculationError>) {
        match result {
            Ok(value) => self.values.push(CalculatedValue {
                id: id.clone(),
                name: name.to_string(),
                value,
            }),
            Err(err) => {
                debug!(error = %err, "calculation failed");
                self.errors.push(err);
            }
        }
    }
}

/// Everything calculated for one character.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterSheet {
    pub main_skills: FormulaContext,
    pub speciality_skills: Calculated,
    pub combat_skills: Calculated,
    pub stats: Calculated,
}

impl CharacterSheet {
    /// Every calculation failure on the sheet.
    pub fn errors(&self) -> impl Iterator<Item = &CalculationError> {
        self.speciality_skills
            .errors
            .iter()
            .chain(&self.combat_skills.errors)
            .chain(&self.stats.errors)
    }
}

fn calculate(
    kind: EntityKind,
    id: &Code,
    name: &str,
    formula: &str,
    context: &FormulaContext,
) -> Result<f64, CalculationError> {
    evaluate_formula(formula, context).map_err(|source| CalculationError {
        kind,
        name: name.to_string(),
        id: id.to_string(),
        source,
    })
}

/// Sum the material bonuses of every equipped item.
///
/// Items, materials or material levels missing from the rule set are
/// skipped; the rule-set validator reports them.
pub fn equipment_bonuses(rules: &RuleSet, item_ids: &[String]) -> FormulaContext {
    let mut bonuses = FormulaContext::new();

    for item_id in item_ids {
        let Some(item) = rules.item(item_id) else {
            warn!(item = %item_id, "equipped item not found in rule set");
            continue;
        };
        let Some(level) = rules
            .material(&item.material_id)
            .and_then(|m| m.level(item.material_level))
        else {
            warn!(
                item = %item.id,
                material = %item.material_id,
                level = item.material_level,
                "material level not found for equipped item"
            );
            continue;
        };
        for bonus in &level.bonuses {
            bonuses.add(&bonus.skill_code, bonus.value);
        }
    }

    bonuses
}

/// Total level of every main skill: trained level, racial modifier and
/// equipment bonus. Untrained skills count as zero.
///
/// # Examples
///
/// ```rust
/// use zzformula::calculator::{main_skill_totals, Character};
/// use zzformula::RuleSet;
///
/// let rules = RuleSet::from_json(r#"{
///     "main_skills": [
///         { "code": "STR", "name": "Strength" },
///         { "code": "CON", "name": "Constitution" }
///     ],
///     "races": [{ "id": "dwarf", "name": "Dwarf",
///                 "skill_modifiers": [{ "skill_code": "CON", "value": 2 }] }]
/// }"#).unwrap();
/// let character = Character::from_json(r#"{
///     "race_id": "dwarf",
///     "main_skill_levels": { "STR": 10, "CON": 8 }
/// }"#).unwrap();
///
/// let totals = main_skill_totals(&rules, &character);
/// assert_eq!(totals.get("STR"), Some(10.0));
/// assert_eq!(totals.get("CON"), Some(10.0));
/// ```
pub fn main_skill_totals(rules: &RuleSet, character: &Character) -> FormulaContext {
    let mut totals = FormulaContext::new();
    for skill in &rules.main_skills {
        let base = character
            .main_skill_levels
            .get(skill.code.as_str())
            .unwrap_or(0.0);
        totals.set(&skill.code, base);
    }

    if let Some(race_id) = &character.race_id {
        match rules.race(race_id) {
            Some(race) => {
                for modifier in &race.skill_modifiers {
                    if totals.contains(modifier.skill_code.as_str()) {
                        totals.add(&modifier.skill_code, modifier.value);
                    }
                }
            }
            None => warn!(race = %race_id, "character race not found in rule set"),
        }
    }

    let equipment = equipment_bonuses(rules, &character.equipped_items);
    for (code, value) in equipment.iter() {
        if totals.contains(code.as_str()) {
            totals.add(code, value);
        }
    }

    totals
}

/// Calculate every speciality skill from main skill totals, then add
/// the equipment bonuses aimed at it.
pub fn speciality_skill_totals(
    rules: &RuleSet,
    main_totals: &FormulaContext,
    equipment: &FormulaContext,
) -> Calculated {
    let mut out = Calculated::default();
    for skill in &rules.speciality_skills {
        let result = calculate(
            EntityKind::SpecialitySkill,
            &skill.code,
            &skill.name,
            &skill.formula,
            main_totals,
        )
        .map(|value| value + equipment.get(skill.code.as_str()).unwrap_or(0.0));
        out.record(&skill.code, &skill.name, result);
    }
    out
}

/// Calculate every combat skill from main and speciality skill totals,
/// then add the equipment bonuses aimed at it.
///
/// Speciality skills that failed to calculate are absent from the
/// context, so combat skills reading them fail as undefined variables.
pub fn combat_skill_totals(
    rules: &RuleSet,
    main_totals: &FormulaContext,
    speciality: &Calculated,
    equipment: &FormulaContext,
) -> Calculated {
    let mut context = main_totals.clone();
    context.extend(speciality.values.iter().map(|v| (&v.id, v.value)));

    let mut out = Calculated::default();
    for skill in &rules.combat_skills {
        let result = calculate(
            EntityKind::CombatSkill,
            &skill.code,
            &skill.name,
            &skill.formula,
            &context,
        )
        .map(|value| value + equipment.get(skill.code.as_str()).unwrap_or(0.0));
        out.record(&skill.code, &skill.name, result);
    }
    out
}

/// Calculate every stat from main skill totals.
pub fn stat_values(rules: &RuleSet, main_totals: &FormulaContext) -> Calculated {
    let mut out = Calculated::default();
    for stat in &rules.stats {
        let result = calculate(EntityKind::Stat, &stat.id, &stat.name, &stat.formula, main_totals);
        out.record(&stat.id, &stat.name, result);
    }
    out
}

/// Run every calculator for a character.
///
/// # Examples
///
/// ```rust
/// use zzformula::calculator::{calculate_character, Character};
/// use zzformula::RuleSet;
///
/// let rules = RuleSet::from_json(r#"{
///     "main_skills": [
///         { "code": "STR", "name": "Strength" },
///         { "code": "CON", "name": "Constitution" }
///     ],
///     "stats": [{ "id": "HP", "name": "Health", "formula": "STR * 10 + CON * 5" }]
/// }"#).unwrap();
/// let character = Character::from_json(r#"{ "main_skill_levels": { "STR": 15, "CON": 12 } }"#).unwrap();
///
/// let sheet = calculate_character(&rules, &character);
/// assert_eq!(sheet.stats.get("HP"), Some(210.0));
/// assert_eq!(sheet.errors().count(), 0);
/// ```
pub fn calculate_character(rules: &RuleSet, character: &Character) -> CharacterSheet {
    let equipment = equipment_bonuses(rules, &character.equipped_items);
    let main_skills = main_skill_totals(rules, character);
    let speciality_skills = speciality_skill_totals(rules, &main_skills, &equipment);
    let combat_skills = combat_skill_totals(rules, &main_skills, &speciality_skills, &equipment);
    let stats = stat_values(rules, &main_skills);

    debug!(
        main = main_skills.len(),
        speciality = speciality_skills.values.len(),
        combat = combat_skills.values.len(),
        stats = stats.values.len(),
        "character calculated"
    );

    CharacterSheet {
        main_skills,
        speciality_skills,
        combat_skills,
        stats,
    }
}
