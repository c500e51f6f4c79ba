//! Rule set model.
//!
//! Plain records describing a game's skills, stats, materials, items and
//! races. The crate never persists these itself; a store hands over a
//! [`RuleSet`], usually deserialized from JSON.

use crate::code::Code;
use crate::error::RuleSetError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MainSkill {
    pub code: Code,
    pub name: String,
}

/// A skill whose value is a formula over main skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialitySkill {
    pub code: Code,
    pub name: String,
    pub formula: String,
}

/// A skill whose value is a formula over main and speciality skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatSkill {
    pub code: Code,
    pub name: String,
    pub formula: String,
}

/// A derived value such as hit points, computed from main skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub id: Code,
    pub name: String,
    pub formula: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialCategory {
    pub id: String,
    pub name: String,
}

/// A price band. `order` ranks tiers from cheapest upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyTier {
    pub id: String,
    pub name: String,
    pub order: i64,
}

/// A flat bonus to one skill granted by a material level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillBonus {
    pub skill_code: Code,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialLevel {
    pub level: u32,
    pub currency_tier_id: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub bonuses: Vec<SkillBonus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub id: String,
    pub name: String,
    pub category_id: String,
    #[serde(default)]
    pub levels: Vec<MaterialLevel>,
}

impl Material {
    pub fn level(&self, level: u32) -> Option<&MaterialLevel> {
        self.levels.iter().find(|l| l.level == level)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSlot {
    pub slot_type: String,
    pub name: String,
}

/// An item made of one material at one level, worn in one slot type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    pub slot_type: String,
    pub material_id: String,
    pub material_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillModifier {
    pub skill_code: Code,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Race {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub skill_modifiers: Vec<SkillModifier>,
}

/// A complete rule set.
///
/// Every list defaults to empty when absent from the JSON input.
///
/// # Examples
///
/// ```rust
/// use zzformula::RuleSet;
///
/// let rules = RuleSet::from_json(r#"{
///     "main_skills": [{ "code": "str", "name": "Strength" }],
///     "stats": [{ "id": "HP", "name": "Health", "formula": "STR * 10" }]
/// }"#).unwrap();
///
/// assert_eq!(rules.main_skills[0].code.as_str(), "STR");
/// assert!(rules.items.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSet {
    pub main_skills: Vec<MainSkill>,
    pub speciality_skills: Vec<SpecialitySkill>,
    pub combat_skills: Vec<CombatSkill>,
    pub stats: Vec<Stat>,
    pub material_categories: Vec<MaterialCategory>,
    pub currency_tiers: Vec<CurrencyTier>,
    pub materials: Vec<Material>,
    pub equipment_slots: Vec<EquipmentSlot>,
    pub items: Vec<Item>,
    pub races: Vec<Race>,
}

impl RuleSet {
    pub fn from_json(json: &str) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, RuleSetError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_json(&self) -> Result<String, RuleSetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn main_skill_codes(&self) -> HashSet<Code> {
        self.main_skills.iter().map(|s| s.code.clone()).collect()
    }

    pub fn speciality_skill_codes(&self) -> HashSet<Code> {
        self.speciality_skills.iter().map(|s| s.code.clone()).collect()
    }

    /// Main, speciality and combat skill codes together.
    pub fn all_skill_codes(&self) -> HashSet<Code> {
        let mut codes = self.main_skill_codes();
        codes.extend(self.speciality_skill_codes());
        codes.extend(self.combat_skills.iter().map(|s| s.code.clone()));
        codes
    }

    pub fn material(&self, id: &str) -> Option<&Material> {
        self.materials.iter().find(|m| m.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn race(&self, id: &str) -> Option<&Race> {
        self.races.iter().find(|r| r.id == id)
    }
}
