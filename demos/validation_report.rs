//! Rule set validation example: checking a hand-written rule set
//!
//! This example shows:
//! - Loading a rule set from JSON
//! - Running every cross-reference check
//! - Printing errors and warnings grouped by severity

use zzformula::*;

const RULES: &str = r#"{
    "main_skills": [
        { "code": "STR", "name": "Strength" },
        { "code": "DEX", "name": "Dexterity" }
    ],
    "speciality_skills": [
        { "code": "ACR", "name": "Acrobatics", "formula": "DEX * 2 +" },
        { "code": "ATH", "name": "Athletics", "formula": "(STR + DEX) / 2" }
    ],
    "combat_skills": [
        { "code": "DGR", "name": "Dagger", "formula": "DEX + PAR / 2" },
        { "code": "PAR", "name": "Parry", "formula": "DGR + STR" }
    ],
    "stats": [
        { "id": "HP", "name": "Health", "formula": "STR * 10 + LUCK" }
    ],
    "currency_tiers": [
        { "id": "cu", "name": "Copper", "order": 1 },
        { "id": "au", "name": "Gold", "order": 3 }
    ],
    "races": [{ "id": "elf", "name": "Elf",
                "skill_modifiers": [{ "skill_code": "ATH", "value": 1 }] }]
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let rules = RuleSet::from_json(RULES)?;
    let report = validate_rule_set(&rules);

    println!("=== Rule set validation ===\n");
    println!("Valid: {}\n", report.is_valid);

    for issue in report.errors.iter().chain(&report.warnings) {
        match &issue.entity {
            Some(entity) => println!(
                "[{}] {} ({} {}): {}",
                issue.severity, issue.category, entity.entity_type, entity.id, issue.message
            ),
            None => println!("[{}] {}: {}", issue.severity, issue.category, issue.message),
        }
    }

    println!("\n=== Single formula checks ===\n");
    let known = rules.main_skill_codes();
    let deep = format!("{}STR", "-".repeat(1_000));
    for formula in ["STR + DEX", "str * luck", "(STR +", deep.as_str()] {
        let result = validate(formula, Some(&known));
        let shown: String = formula.chars().take(20).collect();
        if result.is_valid {
            println!("✓ {}", shown);
        } else {
            println!("✗ {}: {}", shown, result.errors.join("; "));
        }
    }

    Ok(())
}
