//! Catalog records - Read-only reference data published by the catalog service
//!
//! These mirror the catalog's JSON shapes. The engine trusts them as given.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{
    CivilizationId, ClassId, EquipmentChoiceSlot, EquipmentId, LanguageId, SpeciesId,
    SubspeciesId, TraitInfo,
};

// =============================================================================
// Species
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDetail {
    pub id: SpeciesId,
    pub name: String,
    pub base_stats: BaseStats,
    #[serde(default)]
    pub traits: Vec<TraitInfo>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub subspecies: Vec<Subspecies>,
}

impl SpeciesDetail {
    pub fn find_subspecies(&self, id: &SubspeciesId) -> Option<&Subspecies> {
        self.subspecies.iter().find(|s| &s.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseStats {
    /// Raw bonus map keyed by ability name
    #[serde(default)]
    pub ability_bonuses: BTreeMap<String, i32>,
    pub speed_meters: f64,
    pub size_category: String,
    #[serde(default)]
    pub has_darkvision: bool,
    #[serde(default)]
    pub darkvision_radius_meters: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subspecies {
    pub id: SubspeciesId,
    pub name: String,
    #[serde(default)]
    pub additional_stats: AdditionalStats,
    #[serde(default)]
    pub additional_traits: Vec<TraitInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalStats {
    #[serde(default)]
    pub ability_bonuses: BTreeMap<String, i32>,
}

// =============================================================================
// Civilizations
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CivilizationDetail {
    pub id: CivilizationId,
    pub name: String,
    #[serde(default)]
    pub linguistics: Linguistics,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Linguistics {
    #[serde(default)]
    pub official_languages: Vec<String>,
    #[serde(default)]
    pub writing_systems: Vec<String>,
}

// =============================================================================
// Classes
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDetail {
    pub id: ClassId,
    pub name: String,
    pub hit_die: i32,
    #[serde(default)]
    pub spellcasting: Option<ClassSpellcasting>,
    pub proficiencies: Proficiencies,
    #[serde(default)]
    pub starting_equipment: Vec<EquipmentChoiceSlot>,
    #[serde(default)]
    pub progression_table: Vec<LevelProgression>,
}

impl ClassDetail {
    /// Feature names granted at `level`
    pub fn features_at(&self, level: u8) -> impl Iterator<Item = &String> {
        self.progression_table
            .iter()
            .filter(move |row| row.level == level)
            .flat_map(|row| row.features.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSpellcasting {
    pub ability: String,
    #[serde(rename = "type", default)]
    pub casting_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Proficiencies {
    #[serde(default)]
    pub armor: Vec<String>,
    #[serde(default)]
    pub weapons: Vec<String>,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub saving_throws: Vec<String>,
    #[serde(default)]
    pub skills: SkillChoice,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillChoice {
    pub choose_count: usize,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgression {
    pub level: u8,
    #[serde(default)]
    pub prof_bonus: i32,
    #[serde(default)]
    pub features: Vec<String>,
}

// =============================================================================
// Languages
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSummary {
    pub id: LanguageId,
    pub name: String,
    #[serde(default)]
    pub category: String,
}

// =============================================================================
// Equipment
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CostInfo {
    pub value: u32,
    pub unit: String,
}

/// Equipment list entry, without the type-specific payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentSummary {
    pub id: EquipmentId,
    pub name: String,
    #[serde(rename = "type")]
    pub equipment_type: String,
    #[serde(default)]
    pub subtype: String,
    #[serde(default)]
    pub cost: CostInfo,
}

/// Full equipment entry.
///
/// On the wire the payload sits in a loosely-typed `data` object whose
/// shape depends on `type`; it is decoded into [`EquipmentData`] on load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "EquipmentEntryWire", into = "EquipmentEntryWire")]
pub struct CatalogEquipmentEntry {
    pub id: EquipmentId,
    pub name: String,
    pub subtype: String,
    pub cost: CostInfo,
    pub weight_kg: f64,
    pub data: EquipmentData,
}

impl CatalogEquipmentEntry {
    pub fn equipment_type(&self) -> &str {
        self.data.type_name()
    }

    pub fn summary(&self) -> EquipmentSummary {
        EquipmentSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            equipment_type: self.equipment_type().to_string(),
            subtype: self.subtype.clone(),
            cost: self.cost.clone(),
        }
    }
}

/// Type-specific equipment payload, keyed by the entry type
#[derive(Debug, Clone, PartialEq)]
pub enum EquipmentData {
    Weapon(WeaponData),
    Armor(ArmorData),
    Gear(GearData),
    Tool(ToolData),
    Mount(MountData),
    /// Any type without a known or readable payload
    Untyped { type_name: String },
}

impl EquipmentData {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Weapon(_) => "Weapon",
            Self::Armor(_) => "Armor",
            Self::Gear(_) => "Gear",
            Self::Tool(_) => "Tool",
            Self::Mount(_) => "Mount",
            Self::Untyped { type_name } => type_name,
        }
    }

    fn decode(type_name: String, data: Option<serde_json::Value>) -> Self {
        fn payload<T: serde::de::DeserializeOwned>(data: Option<serde_json::Value>) -> Option<T> {
            data.and_then(|value| serde_json::from_value(value).ok())
        }

        let decoded = match type_name.as_str() {
            "Weapon" => payload(data).map(Self::Weapon),
            "Armor" => payload(data).map(Self::Armor),
            "Gear" => payload(data).map(Self::Gear),
            "Tool" => payload(data).map(Self::Tool),
            "Mount" => payload(data).map(Self::Mount),
            _ => None,
        };
        decoded.unwrap_or(Self::Untyped { type_name })
    }

    fn encode(&self) -> Option<serde_json::Value> {
        let value = match self {
            Self::Weapon(d) => serde_json::to_value(d),
            Self::Armor(d) => serde_json::to_value(d),
            Self::Gear(d) => serde_json::to_value(d),
            Self::Tool(d) => serde_json::to_value(d),
            Self::Mount(d) => serde_json::to_value(d),
            Self::Untyped { .. } => return None,
        };
        value.ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    pub damage_dice: String,
    pub damage_type: String,
    #[serde(default)]
    pub properties: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorData {
    pub ac_base: Option<i32>,
    /// Shields add to the AC instead of setting it
    pub ac_bonus: Option<i32>,
    pub add_dex_mod: Option<bool>,
    pub max_dex_bonus: Option<i32>,
    pub str_requirement: Option<i32>,
    pub stealth_disadvantage: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GearData {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolData {
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MountData {
    pub speed: String,
    pub carry_capacity_kg: f64,
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EquipmentEntryWire {
    id: EquipmentId,
    name: String,
    #[serde(rename = "type")]
    equipment_type: String,
    #[serde(default)]
    subtype: String,
    #[serde(default)]
    cost: CostInfo,
    #[serde(default)]
    weight_kg: f64,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

impl From<EquipmentEntryWire> for CatalogEquipmentEntry {
    fn from(wire: EquipmentEntryWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            subtype: wire.subtype,
            cost: wire.cost,
            weight_kg: wire.weight_kg,
            data: EquipmentData::decode(wire.equipment_type, wire.data),
        }
    }
}

impl From<CatalogEquipmentEntry> for EquipmentEntryWire {
    fn from(entry: CatalogEquipmentEntry) -> Self {
        Self {
            equipment_type: entry.equipment_type().to_string(),
            data: entry.data.encode(),
            id: entry.id,
            name: entry.name,
            subtype: entry.subtype,
            cost: entry.cost,
            weight_kg: entry.weight_kg,
        }
    }
}
