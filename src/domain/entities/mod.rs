//! Domain entities - The build record, catalog records and finalized characters

mod build_state;
mod catalog;
mod character;

pub use build_state::{BuildState, DEFAULT_SIZE, DEFAULT_SPEED_METERS};
pub use catalog::{
    AdditionalStats, ArmorData, BaseStats, CatalogEquipmentEntry, ClassDetail, ClassSpellcasting,
    CivilizationDetail, CostInfo, EquipmentData, EquipmentSummary, GearData, LanguageSummary,
    LevelProgression, Linguistics, MountData, Proficiencies, SkillChoice, SpeciesDetail,
    Subspecies, ToolData, WeaponData,
};
pub use character::{
    DerivedCharacter, SavedCharacter, SpellProgression, SpellcastingBlock, WeaponAttack,
};
