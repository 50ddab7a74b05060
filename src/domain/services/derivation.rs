//! Derivation engine - Sheet values computed from a build
//!
//! Every function here is pure. Callers recompute from the current
//! snapshot on each read instead of patching previous results.

use std::collections::BTreeMap;

use crate::domain::entities::{
    BuildState, DerivedCharacter, SpellProgression, SpellcastingBlock, WeaponAttack,
};
use crate::domain::value_objects::{Ability, AbilityScores, ResolvedEquipmentItem};

use super::matching::normalize;
use super::skills::SKILLS;

/// Proficiency bonus of a level-1 character
pub const PROFICIENCY_BONUS: i32 = 2;
/// Builds always produce level-1 characters
pub const STARTING_LEVEL: u8 = 1;
/// Skill that raises passive perception
const PERCEPTION_SKILL: &str = "Perception";

/// `floor((score - 10) / 2)`
pub fn modifier(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Render a bonus with its sign, e.g. `+2` or `-1`
pub fn format_modifier(value: i32) -> String {
    if value >= 0 {
        format!("+{}", value)
    } else {
        value.to_string()
    }
}

/// Base scores plus racial bonuses
pub fn final_abilities(state: &BuildState) -> AbilityScores {
    state
        .base_abilities
        .map(|ability, base| base + state.racial_bonus(ability))
}

pub fn ability_modifiers(abilities: &AbilityScores) -> AbilityScores {
    abilities.map(|_, score| modifier(score))
}

pub fn hit_points_max(hit_die: i32, modifiers: &AbilityScores) -> i32 {
    hit_die + modifiers.constitution
}

/// Half the maximum hit points, rounded up
pub fn wound_threshold(hit_points_max: i32) -> i32 {
    -(-hit_points_max).div_euclid(2)
}

/// Unarmored AC
pub fn armor_class(modifiers: &AbilityScores) -> i32 {
    10 + modifiers.dexterite
}

pub fn initiative(modifiers: &AbilityScores) -> i32 {
    modifiers.dexterite
}

pub fn passive_perception(modifiers: &AbilityScores, selected_skills: &[String]) -> i32 {
    let proficient = selected_skills.iter().any(|s| s == PERCEPTION_SKILL);
    10 + modifiers.sagesse + if proficient { PROFICIENCY_BONUS } else { 0 }
}

/// Bonus for a skill check; unknown skills get no ability modifier
pub fn skill_bonus(skill: &str, modifiers: &AbilityScores, selected_skills: &[String]) -> i32 {
    let ability_mod = super::skills::skill_ability(skill)
        .map(|ability| modifiers.get(ability))
        .unwrap_or(0);
    let proficient = selected_skills.iter().any(|s| s == skill);
    ability_mod + if proficient { PROFICIENCY_BONUS } else { 0 }
}

/// Bonus for a saving throw. Class data names saves by their label
/// ("Dextérité"), matched without regard to case or accents.
pub fn saving_throw_bonus(ability: Ability, modifiers: &AbilityScores, saving_throws: &[String]) -> i32 {
    let label = normalize(ability.label());
    let proficient = saving_throws.iter().any(|s| normalize(s) == label);
    modifiers.get(ability) + if proficient { PROFICIENCY_BONUS } else { 0 }
}

/// Spell save DC and attack bonus. Present only for casters with a
/// casting ability.
pub fn spellcasting(state: &BuildState, modifiers: &AbilityScores) -> Option<SpellcastingBlock> {
    if !state.has_spellcasting {
        return None;
    }
    let ability = state.spellcasting_ability?;
    let spell_mod = modifiers.get(ability);
    Some(SpellcastingBlock {
        ability,
        spell_save_dc: 8 + PROFICIENCY_BONUS + spell_mod,
        spell_attack_bonus: PROFICIENCY_BONUS + spell_mod,
        progression: SpellProgression::NotComputed,
    })
}

/// Ability that drives a weapon: projectiles use dexterity, finesse
/// weapons the better of force and dexterity, everything else force
pub fn weapon_ability(weapon: &ResolvedEquipmentItem, modifiers: &AbilityScores) -> Ability {
    if weapon.has_property("projectile") {
        Ability::Dexterite
    } else if weapon.has_property("finesse") && modifiers.dexterite > modifiers.force {
        Ability::Dexterite
    } else {
        Ability::Force
    }
}

/// Attack line for a weapon with damage dice, `None` for anything else
pub fn weapon_attack(weapon: &ResolvedEquipmentItem, modifiers: &AbilityScores) -> Option<WeaponAttack> {
    if !weapon.is_weapon() {
        return None;
    }
    let dice = weapon.damage.as_deref()?;
    let ability = weapon_ability(weapon, modifiers);
    let ability_mod = modifiers.get(ability);
    let damage_type = weapon.damage_type.as_deref().unwrap_or_default();
    let damage = format!("{}{} {}", dice, format_modifier(ability_mod), damage_type)
        .trim()
        .to_string();

    Some(WeaponAttack {
        name: weapon.name.clone(),
        ability,
        attack_bonus: ability_mod + PROFICIENCY_BONUS,
        damage,
    })
}

/// Assemble the full sheet for a build snapshot
pub fn compute_derived(state: &BuildState) -> DerivedCharacter {
    let abilities = final_abilities(state);
    let modifiers = ability_modifiers(&abilities);
    let hp_max = hit_points_max(state.hit_die, &modifiers);

    let saving_throw_bonuses: BTreeMap<Ability, i32> = Ability::ALL
        .into_iter()
        .map(|a| (a, saving_throw_bonus(a, &modifiers, &state.saving_throws)))
        .collect();
    let skill_bonuses: BTreeMap<String, i32> = SKILLS
        .iter()
        .map(|(name, _)| {
            (name.to_string(), skill_bonus(name, &modifiers, &state.selected_skills))
        })
        .collect();
    let weapon_attacks = state
        .selected_equipment
        .iter()
        .filter_map(|item| weapon_attack(item, &modifiers))
        .collect();

    DerivedCharacter {
        name: state.name.clone(),
        species: state.species_display(),
        subspecies: state.subspecies_name.clone(),
        civilization: state.civilization_name.clone().unwrap_or_default(),
        class_name: state.class_name.clone().unwrap_or_default(),
        level: STARTING_LEVEL,
        experience: 0,
        background: state.background.clone(),
        alignment: state.alignment.clone(),

        abilities,
        ability_modifiers: modifiers,

        hit_points_max: hp_max,
        hit_points_current: hp_max,
        hit_points_temporary: 0,
        wound_threshold: wound_threshold(hp_max),
        armor_class: armor_class(&modifiers),
        initiative: initiative(&modifiers),
        proficiency_bonus: PROFICIENCY_BONUS,
        weapon_attacks,

        speed: state.species_speed,
        speed_climb: (state.species_speed / 2.0).floor(),
        speed_swim: (state.species_speed / 2.0).floor(),
        jump_height: 3 + modifiers.force,
        jump_length: 3 + modifiers.force,

        passive_perception: passive_perception(&modifiers, &state.selected_skills),
        has_darkvision: state.has_darkvision,
        darkvision_radius: state.darkvision_radius,

        saving_throws: state.saving_throws.clone(),
        saving_throw_bonuses,
        skills: state.selected_skills.clone(),
        skill_bonuses,
        armor_proficiencies: state.armor_proficiencies.clone(),
        weapon_proficiencies: state.weapon_proficiencies.clone(),
        tool_proficiencies: state.tool_proficiencies.clone(),
        languages: state.languages.iter().cloned().collect(),

        racial_traits: state.species_traits.clone(),
        class_features: state.class_features.clone(),
        resistances: state.species_resistances.clone(),
        immunities: Vec::new(),

        spellcasting: spellcasting(state, &modifiers),

        equipment: state.selected_equipment.clone(),
        currency: state.currency,

        description: state.description.clone(),
        traits: state.traits.clone(),
        ideal: state.ideal.clone(),
        bonds: state.bonds.clone(),
        flaws: state.flaws.clone(),
        handicap: state.handicap.clone(),
        story: state.story.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weapon(name: &str, dice: &str, damage_type: &str, properties: &[&str]) -> ResolvedEquipmentItem {
        ResolvedEquipmentItem {
            item_type: Some("Weapon".into()),
            damage: Some(dice.into()),
            damage_type: Some(damage_type.into()),
            properties: Some(properties.iter().map(|p| p.to_string()).collect()),
            ..ResolvedEquipmentItem::bare(name, 1)
        }
    }

    #[test]
    fn test_modifier_samples() {
        assert_eq!(modifier(10), 0);
        assert_eq!(modifier(8), -1);
        assert_eq!(modifier(15), 2);
        assert_eq!(modifier(20), 5);
        assert_eq!(modifier(7), -2);
        assert_eq!(modifier(1), -5);
    }

    #[test]
    fn test_format_modifier() {
        assert_eq!(format_modifier(3), "+3");
        assert_eq!(format_modifier(0), "+0");
        assert_eq!(format_modifier(-1), "-1");
    }

    #[test]
    fn test_final_abilities_add_racial_bonuses() {
        let mut state = BuildState::new();
        state.base_abilities = AbilityScores::default().with(Ability::Force, 14);
        state.racial_bonuses.insert(Ability::Force, 2);
        state.racial_bonuses.insert(Ability::Charisme, 1);

        let finals = final_abilities(&state);
        for ability in Ability::ALL {
            assert_eq!(
                finals.get(ability),
                state.base_abilities.get(ability) + state.racial_bonus(ability)
            );
        }
        assert_eq!(finals.force, 16);
        assert_eq!(finals.charisme, 11);
    }

    #[test]
    fn test_hit_points_and_wound_threshold() {
        let mods = ability_modifiers(&AbilityScores::default());
        let hp = hit_points_max(8, &mods);
        assert_eq!(hp, 8);
        assert_eq!(wound_threshold(hp), 4);
        assert_eq!(wound_threshold(7), 4);
        assert_eq!(wound_threshold(-1), 0);
    }

    #[test]
    fn test_dexterity_bonus_scenario() {
        let mut state = BuildState::new();
        state.racial_bonuses.insert(Ability::Dexterite, 2);

        let sheet = compute_derived(&state);
        assert_eq!(sheet.abilities.dexterite, 12);
        assert_eq!(sheet.ability_modifiers.dexterite, 1);
        assert_eq!(sheet.armor_class, 11);
        assert_eq!(sheet.initiative, 1);
    }

    #[test]
    fn test_passive_perception_with_skill() {
        let mods = AbilityScores::uniform(0).with(Ability::Sagesse, 2);
        assert_eq!(passive_perception(&mods, &[]), 12);
        assert_eq!(passive_perception(&mods, &["Perception".to_string()]), 14);
    }

    #[test]
    fn test_spellcasting_block() {
        let mut state = BuildState::new();
        state.has_spellcasting = true;
        state.spellcasting_ability = Some(Ability::Intelligence);
        state.base_abilities.intelligence = 14;

        let block = compute_derived(&state).spellcasting.expect("caster should have a block");
        assert_eq!(block.spell_save_dc, 12);
        assert_eq!(block.spell_attack_bonus, 4);
        assert_eq!(block.progression, SpellProgression::NotComputed);

        state.spellcasting_ability = None;
        assert!(compute_derived(&state).spellcasting.is_none());
    }

    #[test]
    fn test_weapon_ability_selection() {
        let mods = AbilityScores::uniform(0)
            .with(Ability::Force, 1)
            .with(Ability::Dexterite, 3);

        let bow = weapon("Arc court", "1d6", "perforant", &["Munitions", "Projectiles (24/96)"]);
        let rapier = weapon("Rapière", "1d8", "perforant", &["Finesse"]);
        let axe = weapon("Hache d'armes", "1d8", "tranchant", &["Polyvalente (1d10)"]);

        assert_eq!(weapon_ability(&bow, &mods), Ability::Dexterite);
        assert_eq!(weapon_ability(&rapier, &mods), Ability::Dexterite);
        assert_eq!(weapon_ability(&axe, &mods), Ability::Force);

        let strong = mods.with(Ability::Force, 4);
        assert_eq!(weapon_ability(&rapier, &strong), Ability::Force);
    }

    #[test]
    fn test_weapon_attack_line() {
        let mods = AbilityScores::uniform(0).with(Ability::Force, 3);
        let axe = weapon("Hache à deux mains", "1d12", "tranchant", &["Lourde"]);

        let attack = weapon_attack(&axe, &mods).expect("weapon should produce an attack");
        assert_eq!(attack.attack_bonus, 5);
        assert_eq!(attack.damage, "1d12+3 tranchant");

        let rope = ResolvedEquipmentItem::bare("Corde", 1);
        assert!(weapon_attack(&rope, &mods).is_none());
    }

    #[test]
    fn test_saving_throw_bonus_matches_labels() {
        let mods = AbilityScores::uniform(1);
        let saves = vec!["Dexterite".to_string(), "Sagesse".to_string()];
        assert_eq!(saving_throw_bonus(Ability::Dexterite, &mods, &saves), 3);
        assert_eq!(saving_throw_bonus(Ability::Force, &mods, &saves), 1);
    }

    #[test]
    fn test_derived_sheet_movement() {
        let mut state = BuildState::new();
        state.base_abilities.force = 14;
        let sheet = compute_derived(&state);
        assert_eq!(sheet.speed, 9.0);
        assert_eq!(sheet.speed_climb, 4.0);
        assert_eq!(sheet.jump_length, 5);
        assert_eq!(sheet.level, 1);
        assert_eq!(sheet.skill_bonuses.len(), 18);
    }
}
