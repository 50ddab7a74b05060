//! In-memory catalog adapter
//!
//! Serves reference data that was fetched or bundled ahead of time. A
//! [`CatalogSnapshot`] is the JSON document form of the same data.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::ports::outbound::{CatalogError, CatalogPort};
use crate::domain::entities::{
    CatalogEquipmentEntry, CivilizationDetail, ClassDetail, EquipmentSummary, LanguageSummary,
    SpeciesDetail,
};
use crate::domain::value_objects::{CivilizationId, ClassId, EquipmentId, SpeciesId};

/// Reference data as one JSON document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSnapshot {
    pub species: Vec<SpeciesDetail>,
    pub civilizations: Vec<CivilizationDetail>,
    pub classes: Vec<ClassDetail>,
    pub equipment: Vec<CatalogEquipmentEntry>,
    pub languages: Vec<LanguageSummary>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    data: CatalogSnapshot,
    /// Reason every call fails with, to stand in for an unreachable service
    outage: Option<String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(data: CatalogSnapshot) -> Self {
        Self { data, outage: None }
    }

    /// Load a snapshot document from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog file {}", path.display()))?;
        let data: CatalogSnapshot = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse catalog file {}", path.display()))?;
        info!(
            species = data.species.len(),
            classes = data.classes.len(),
            equipment = data.equipment.len(),
            "Catalog loaded"
        );
        Ok(Self::from_snapshot(data))
    }

    /// A catalog whose every call reports the service as unavailable
    pub fn unavailable() -> Self {
        Self {
            data: CatalogSnapshot::default(),
            outage: Some("catalog service unreachable".to_string()),
        }
    }

    pub fn with_species(mut self, species: SpeciesDetail) -> Self {
        self.data.species.push(species);
        self
    }

    pub fn with_civilization(mut self, civilization: CivilizationDetail) -> Self {
        self.data.civilizations.push(civilization);
        self
    }

    pub fn with_class(mut self, class: ClassDetail) -> Self {
        self.data.classes.push(class);
        self
    }

    pub fn with_equipment(mut self, entry: CatalogEquipmentEntry) -> Self {
        self.data.equipment.push(entry);
        self
    }

    pub fn with_language(mut self, language: LanguageSummary) -> Self {
        self.data.languages.push(language);
        self
    }

    fn available(&self) -> Result<&CatalogSnapshot, CatalogError> {
        match &self.outage {
            Some(reason) => Err(CatalogError::Unavailable(reason.clone())),
            None => Ok(&self.data),
        }
    }
}

fn find<'a, T, K: PartialEq + std::fmt::Display>(
    items: &'a [T],
    id: &K,
    key: impl Fn(&T) -> &K,
) -> Result<&'a T, CatalogError> {
    items
        .iter()
        .find(|item| key(item) == id)
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
}

impl CatalogPort for InMemoryCatalog {
    fn list_equipment(&self) -> Result<Vec<EquipmentSummary>, CatalogError> {
        Ok(self.available()?.equipment.iter().map(|e| e.summary()).collect())
    }

    fn get_equipment_detail(&self, id: &EquipmentId) -> Result<CatalogEquipmentEntry, CatalogError> {
        find(&self.available()?.equipment, id, |e| &e.id).cloned()
    }

    fn get_species_detail(&self, id: &SpeciesId) -> Result<SpeciesDetail, CatalogError> {
        find(&self.available()?.species, id, |s| &s.id).cloned()
    }

    fn get_class_detail(&self, id: &ClassId) -> Result<ClassDetail, CatalogError> {
        find(&self.available()?.classes, id, |c| &c.id).cloned()
    }

    fn get_civilization_detail(&self, id: &CivilizationId) -> Result<CivilizationDetail, CatalogError> {
        find(&self.available()?.civilizations, id, |c| &c.id).cloned()
    }

    fn list_languages(&self) -> Result<Vec<LanguageSummary>, CatalogError> {
        Ok(self.available()?.languages.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::EquipmentData;

    const SNAPSHOT: &str = r#"{
        "equipment": [
            {
                "id": "eq-dague",
                "name": "Dague",
                "type": "Weapon",
                "subtype": "Simple",
                "cost": { "value": 2, "unit": "po" },
                "weightKg": 0.5,
                "data": { "damage_dice": "1d4", "damage_type": "perforant", "properties": ["Finesse", "Légère"] }
            },
            { "id": "eq-corde", "name": "Corde de chanvre", "type": "Gear", "weightKg": 5.0 }
        ],
        "languages": [{ "id": "lang-commun", "name": "Commun", "category": "Standard" }]
    }"#;

    #[test]
    fn test_snapshot_document_decodes() {
        let catalog = InMemoryCatalog::from_snapshot(serde_json::from_str(SNAPSHOT).unwrap());

        let summaries = catalog.list_equipment().unwrap();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].equipment_type, "Weapon");

        let dagger = catalog.get_equipment_detail(&EquipmentId::new("eq-dague")).unwrap();
        assert!(matches!(dagger.data, EquipmentData::Weapon(ref w) if w.damage_dice == "1d4"));
        assert_eq!(catalog.list_languages().unwrap()[0].name, "Commun");
    }

    #[test]
    fn test_unknown_id_is_not_found() {
        let catalog = InMemoryCatalog::new();
        assert_eq!(
            catalog.get_class_detail(&ClassId::new("barde")),
            Err(CatalogError::NotFound("barde".to_string()))
        );
    }

    #[test]
    fn test_unavailable_catalog() {
        let catalog = InMemoryCatalog::unavailable();
        assert!(matches!(catalog.list_equipment(), Err(CatalogError::Unavailable(_))));
        assert!(matches!(catalog.list_languages(), Err(CatalogError::Unavailable(_))));
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, SNAPSHOT).unwrap();

        let catalog = InMemoryCatalog::from_json_file(&path).unwrap();
        assert_eq!(catalog.list_equipment().unwrap().len(), 2);
        assert!(InMemoryCatalog::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
