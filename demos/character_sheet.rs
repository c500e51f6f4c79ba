//! Character sheet example: from rule set and character to final numbers
//!
//! This example shows:
//! - Race modifiers and equipment bonuses feeding main skill totals
//! - Speciality and combat skills built on top of main skills
//! - Failed formulas reported alongside the values that did calculate

use zzformula::calculator::{calculate_character, Character};
use zzformula::RuleSet;

const RULES: &str = r#"{
    "main_skills": [
        { "code": "STR", "name": "Strength" },
        { "code": "DEX", "name": "Dexterity" },
        { "code": "CON", "name": "Constitution" }
    ],
    "speciality_skills": [
        { "code": "ATH", "name": "Athletics", "formula": "(STR + DEX) / 2" }
    ],
    "combat_skills": [
        { "code": "AXE", "name": "Axe Fighting", "formula": "ATH + STR / 2" }
    ],
    "stats": [
        { "id": "HP", "name": "Health", "formula": "STR * 10 + CON * 5" },
        { "id": "SPD", "name": "Speed", "formula": "DEX / (CON - CON)" }
    ],
    "currency_tiers": [{ "id": "ag", "name": "Silver", "order": 1 }],
    "material_categories": [{ "id": "metal", "name": "Metal" }],
    "materials": [{
        "id": "iron", "name": "Iron", "category_id": "metal",
        "levels": [{ "level": 1, "currency_tier_id": "ag", "price": 12,
                     "bonuses": [{ "skill_code": "STR", "value": 1 },
                                 { "skill_code": "AXE", "value": 3 }] }]
    }],
    "equipment_slots": [{ "slot_type": "hand", "name": "Main Hand" }],
    "items": [{ "id": "axe", "name": "Iron Axe", "slot_type": "hand",
                "material_id": "iron", "material_level": 1 }],
    "races": [{ "id": "dwarf", "name": "Dwarf",
                "skill_modifiers": [{ "skill_code": "CON", "value": 2 }] }]
}"#;

const CHARACTER: &str = r#"{
    "race_id": "dwarf",
    "main_skill_levels": { "STR": 14, "DEX": 9, "CON": 12 },
    "equipped_items": ["axe"]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rules = RuleSet::from_json(RULES)?;
    let character = Character::from_json(CHARACTER)?;
    let sheet = calculate_character(&rules, &character);

    println!("=== Main skills ===");
    for skill in &rules.main_skills {
        if let Some(value) = sheet.main_skills.get(skill.code.as_str()) {
            println!("  {:<14} {}", skill.name, value);
        }
    }

    for (title, calculated) in [
        ("Speciality skills", &sheet.speciality_skills),
        ("Combat skills", &sheet.combat_skills),
        ("Stats", &sheet.stats),
    ] {
        println!("\n=== {} ===", title);
        for value in &calculated.values {
            println!("  {:<14} {}", value.name, value.value);
        }
    }

    println!("\n=== Errors ===");
    for err in sheet.errors() {
        println!("  {}", err);
    }

    Ok(())
}
