use crate::domain::entities::{
    CatalogEquipmentEntry, CivilizationDetail, ClassDetail, EquipmentSummary, LanguageSummary,
    SpeciesDetail,
};
use crate::domain::value_objects::{CivilizationId, ClassId, EquipmentId, SpeciesId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Catalog entry not found: {0}")]
    NotFound(String),
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the game reference data.
///
/// Calls are synchronous; adapters serve data that was fetched
/// beforehand.
pub trait CatalogPort: Send + Sync {
    fn list_equipment(&self) -> Result<Vec<EquipmentSummary>, CatalogError>;
    fn get_equipment_detail(&self, id: &EquipmentId) -> Result<CatalogEquipmentEntry, CatalogError>;
    fn get_species_detail(&self, id: &SpeciesId) -> Result<SpeciesDetail, CatalogError>;
    fn get_class_detail(&self, id: &ClassId) -> Result<ClassDetail, CatalogError>;
    fn get_civilization_detail(&self, id: &CivilizationId) -> Result<CivilizationDetail, CatalogError>;
    fn list_languages(&self) -> Result<Vec<LanguageSummary>, CatalogError>;
}
