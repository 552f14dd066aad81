//! Built-in character sheets matching the server's join payload.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AttackSpec {
    pub name: String,
    pub attack_bonus: i32,
    pub damage_dice: String,
    pub damage_bonus: i32,
    pub damage_type: String,
    pub reach: i32,
}

/// Join payload for a new character. Send-only; the server echoes state
/// back through snapshots.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterSheet {
    pub name: String,
    pub owner_id: String,
    pub max_hp: i32,
    pub armor_class: i32,
    pub speed: i32,
    pub ability_scores: AbilityScores,
    pub attacks: Vec<AttackSpec>,
}

pub const PRESET_NAMES: &[&str] = &["fighter", "rogue", "barbarian", "monk"];

pub fn preset(name: &str) -> Option<CharacterSheet> {
    match name.to_lowercase().as_str() {
        "fighter" => Some(fighter()),
        "rogue" => Some(rogue()),
        "barbarian" => Some(barbarian()),
        "monk" => Some(monk()),
        _ => None,
    }
}

pub fn fighter() -> CharacterSheet {
    CharacterSheet {
        name: "Gronk the Fighter".to_string(),
        owner_id: "fighter".to_string(),
        max_hp: 30,
        armor_class: 16,
        speed: 30,
        ability_scores: AbilityScores {
            strength: 16,
            dexterity: 12,
            constitution: 14,
            intelligence: 8,
            wisdom: 10,
            charisma: 10,
        },
        attacks: vec![AttackSpec {
            name: "Longsword".to_string(),
            attack_bonus: 5,
            damage_dice: "1d8".to_string(),
            damage_bonus: 3,
            damage_type: "slashing".to_string(),
            reach: 5,
        }],
    }
}

pub fn rogue() -> CharacterSheet {
    CharacterSheet {
        name: "Shadow the Rogue".to_string(),
        owner_id: "rogue".to_string(),
        max_hp: 22,
        armor_class: 14,
        speed: 30,
        ability_scores: AbilityScores {
            strength: 10,
            dexterity: 16,
            constitution: 12,
            intelligence: 14,
            wisdom: 10,
            charisma: 12,
        },
        attacks: vec![AttackSpec {
            name: "Dagger".to_string(),
            attack_bonus: 5,
            damage_dice: "1d4".to_string(),
            damage_bonus: 3,
            damage_type: "piercing".to_string(),
            reach: 5,
        }],
    }
}

pub fn barbarian() -> CharacterSheet {
    CharacterSheet {
        name: "Ragna the Barbarian".to_string(),
        owner_id: "barbarian".to_string(),
        max_hp: 38,
        armor_class: 13,
        speed: 30,
        ability_scores: AbilityScores {
            strength: 18,
            dexterity: 10,
            constitution: 16,
            intelligence: 6,
            wisdom: 10,
            charisma: 8,
        },
        attacks: vec![AttackSpec {
            name: "Greataxe".to_string(),
            attack_bonus: 6,
            damage_dice: "1d12".to_string(),
            damage_bonus: 4,
            damage_type: "slashing".to_string(),
            reach: 5,
        }],
    }
}

pub fn monk() -> CharacterSheet {
    CharacterSheet {
        name: "Kira the Monk".to_string(),
        owner_id: "monk".to_string(),
        max_hp: 20,
        armor_class: 17,
        speed: 40,
        ability_scores: AbilityScores {
            strength: 10,
            dexterity: 18,
            constitution: 12,
            intelligence: 10,
            wisdom: 16,
            charisma: 8,
        },
        attacks: vec![AttackSpec {
            name: "Unarmed Strike".to_string(),
            attack_bonus: 6,
            damage_dice: "1d6".to_string(),
            damage_bonus: 4,
            damage_type: "bludgeoning".to_string(),
            reach: 5,
        }],
    }
}
