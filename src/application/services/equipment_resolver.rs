//! Equipment Resolver - Turns free-text starting-equipment references
//! into catalog-backed equipment items
//!
//! Class data names items loosely ("Javeline x5", "Arc long (martial)").
//! The resolver indexes the catalog by normalized name and matches each
//! reference through progressively looser strategies.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, instrument, warn};

use crate::application::ports::outbound::CatalogPort;
use crate::domain::entities::{CatalogEquipmentEntry, EquipmentData, EquipmentSummary};
use crate::domain::services::matching::{
    extract_item_name, extract_quantity, normalize, strip_parentheticals,
};
use crate::domain::value_objects::{
    EquipmentChoiceSlot, EquipmentId, EquipmentOption, ResolvedEquipmentItem,
};

/// Items produced for the current selections, with the references that
/// matched nothing in the catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EquipmentResolution {
    pub items: Vec<ResolvedEquipmentItem>,
    pub unresolved: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct EquipmentResolver {
    /// Normalized name -> id, in catalog order
    index: Vec<(String, EquipmentId)>,
    exact: HashMap<String, EquipmentId>,
    summaries: HashMap<EquipmentId, EquipmentSummary>,
    details: HashMap<EquipmentId, CatalogEquipmentEntry>,
}

impl EquipmentResolver {
    /// Index a catalog equipment list. On duplicate normalized names the
    /// first entry wins.
    pub fn new(summaries: Vec<EquipmentSummary>) -> Self {
        let mut resolver = Self::default();
        for summary in summaries {
            let key = normalize(&summary.name);
            if key.is_empty() {
                continue;
            }
            if let Some(existing) = resolver.exact.get(&key) {
                warn!(
                    name = %summary.name,
                    kept = %existing,
                    ignored = %summary.id,
                    "Duplicate equipment name in catalog"
                );
                continue;
            }
            resolver.exact.insert(key.clone(), summary.id.clone());
            resolver.index.push((key, summary.id.clone()));
            resolver.summaries.insert(summary.id.clone(), summary);
        }
        resolver
    }

    pub fn with_details(mut self, details: impl IntoIterator<Item = CatalogEquipmentEntry>) -> Self {
        for detail in details {
            self.details.insert(detail.id.clone(), detail);
        }
        self
    }

    /// Build a resolver holding the details of every item the slots
    /// reference. Catalog failures degrade to unresolved items.
    #[instrument(skip(catalog, slots), fields(slot_count = slots.len()))]
    pub fn from_catalog(catalog: &dyn CatalogPort, slots: &[EquipmentChoiceSlot]) -> Self {
        let summaries = match catalog.list_equipment() {
            Ok(summaries) => summaries,
            Err(e) => {
                warn!(error = %e, "Equipment list unavailable, nothing will resolve");
                Vec::new()
            }
        };
        let resolver = Self::new(summaries);

        let mut wanted: Vec<EquipmentId> = Vec::new();
        let mut seen = HashSet::new();
        for reference in slots.iter().flat_map(|slot| slot.all_references()) {
            match resolver.find_id(reference) {
                Some(id) => {
                    if seen.insert(id.clone()) {
                        wanted.push(id);
                    }
                }
                None => debug!(reference = %reference, "No catalog match for reference"),
            }
        }

        let details: Vec<CatalogEquipmentEntry> = wanted
            .iter()
            .filter_map(|id| match catalog.get_equipment_detail(id) {
                Ok(detail) => Some(detail),
                Err(e) => {
                    warn!(id = %id, error = %e, "Equipment detail unavailable");
                    None
                }
            })
            .collect();

        debug!(indexed = resolver.index.len(), detailed = details.len(), "Equipment resolver ready");
        resolver.with_details(details)
    }

    /// Catalog id for an item reference.
    ///
    /// Tries an exact normalized match, then containment either way in
    /// catalog order, then an exact match with qualifiers removed.
    pub fn find_id(&self, reference: &str) -> Option<EquipmentId> {
        let wanted = normalize(&extract_item_name(reference));
        if wanted.is_empty() {
            return None;
        }

        if let Some(id) = self.exact.get(&wanted) {
            return Some(id.clone());
        }

        if let Some((_, id)) = self
            .index
            .iter()
            .find(|(name, _)| name.contains(&wanted) || wanted.contains(name.as_str()))
        {
            return Some(id.clone());
        }

        let bare = strip_parentheticals(&wanted);
        self.exact.get(&bare).cloned()
    }

    /// The equipment line for one reference, paired with whether the
    /// catalog matched it
    pub fn resolve_reference(&self, reference: &str) -> (ResolvedEquipmentItem, bool) {
        let name = extract_item_name(reference);
        let quantity = extract_quantity(reference);
        let mut item = ResolvedEquipmentItem::bare(name, quantity);

        let Some(id) = self.find_id(reference) else {
            return (item, false);
        };

        if let Some(summary) = self.summaries.get(&id) {
            item.item_type = Some(summary.equipment_type.clone());
            item.subtype = Some(summary.subtype.clone()).filter(|s| !s.is_empty());
        }

        if let Some(detail) = self.details.get(&id) {
            item.weight = Some(detail.weight_kg);
            item.item_type = Some(detail.equipment_type().to_string());
            if !detail.subtype.is_empty() {
                item.subtype = Some(detail.subtype.clone());
            }
            match &detail.data {
                EquipmentData::Weapon(weapon) => {
                    item.damage = Some(weapon.damage_dice.clone());
                    item.damage_type = Some(weapon.damage_type.clone());
                    item.properties = Some(weapon.properties.clone());
                }
                EquipmentData::Armor(armor) => {
                    item.base_ac = armor.ac_base;
                    item.add_dex_mod = armor.add_dex_mod;
                    item.max_dex_bonus = armor.max_dex_bonus;
                }
                _ => {}
            }
        }

        (item, true)
    }

    /// Items granted by the slots under the given selections.
    ///
    /// Fixed slots always contribute; option slots contribute only their
    /// selected option.
    pub fn resolve_slots(
        &self,
        slots: &[EquipmentChoiceSlot],
        selections: &BTreeMap<usize, EquipmentOption>,
    ) -> EquipmentResolution {
        let mut resolution = EquipmentResolution::default();

        for (index, slot) in slots.iter().enumerate() {
            let references = if slot.is_fixed() {
                slot.fixed_items()
            } else {
                match selections.get(&index) {
                    Some(option) => slot.option_items(*option),
                    None => continue,
                }
            };

            for reference in references {
                let (item, found) = self.resolve_reference(reference);
                if !found {
                    warn!(reference = %reference, "Equipment reference not found in catalog");
                    resolution.unresolved.push(item.name.clone());
                }
                resolution.items.push(item);
            }
        }

        resolution
    }
}

/// Whether every option slot has a selection
pub fn all_choices_made(
    slots: &[EquipmentChoiceSlot],
    selections: &BTreeMap<usize, EquipmentOption>,
) -> bool {
    slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| !slot.is_fixed())
        .all(|(index, _)| selections.contains_key(&index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ArmorData, CostInfo, WeaponData};

    fn summary(id: &str, name: &str, kind: &str) -> EquipmentSummary {
        EquipmentSummary {
            id: EquipmentId::new(id),
            name: name.to_string(),
            equipment_type: kind.to_string(),
            subtype: String::new(),
            cost: CostInfo::default(),
        }
    }

    fn detail(id: &str, name: &str, weight: f64, data: EquipmentData) -> CatalogEquipmentEntry {
        CatalogEquipmentEntry {
            id: EquipmentId::new(id),
            name: name.to_string(),
            subtype: String::new(),
            cost: CostInfo::default(),
            weight_kg: weight,
            data,
        }
    }

    fn resolver() -> EquipmentResolver {
        EquipmentResolver::new(vec![
            summary("eq-epee", "Épée longue", "Weapon"),
            summary("eq-jav", "Javeline", "Weapon"),
            summary("eq-sac", "Sac à dos", "Gear"),
            summary("eq-cotte", "Cotte de mailles", "Armor"),
            summary("eq-arc", "Arc long", "Weapon"),
        ])
        .with_details([
            detail(
                "eq-jav",
                "Javeline",
                1.0,
                EquipmentData::Weapon(WeaponData {
                    damage_dice: "1d6".into(),
                    damage_type: "perforant".into(),
                    properties: vec!["Lancer (9/36)".into()],
                }),
            ),
            detail(
                "eq-cotte",
                "Cotte de mailles",
                27.5,
                EquipmentData::Armor(ArmorData {
                    ac_base: Some(16),
                    add_dex_mod: Some(false),
                    ..ArmorData::default()
                }),
            ),
        ])
    }

    #[test]
    fn test_accent_insensitive_match_resolves_same_id() {
        let r = resolver();
        let id = EquipmentId::new("eq-epee");
        assert_eq!(r.find_id("Épée longue"), Some(id.clone()));
        assert_eq!(r.find_id("epee longue"), Some(id.clone()));
        assert_eq!(r.find_id("EPEE  LONGUE"), Some(id));
    }

    #[test]
    fn test_containment_and_qualifier_fallbacks() {
        let r = resolver();
        assert_eq!(r.find_id("Un sac à dos d'explorateur"), Some(EquipmentId::new("eq-sac")));
        assert_eq!(r.find_id("Arc"), Some(EquipmentId::new("eq-arc")));
        assert_eq!(r.find_id("Javeline x5"), Some(EquipmentId::new("eq-jav")));
        assert_eq!(r.find_id("Luth"), None);
        assert_eq!(r.find_id("   "), None);
    }

    #[test]
    fn test_duplicate_names_keep_first() {
        let r = EquipmentResolver::new(vec![
            summary("first", "Dague", "Weapon"),
            summary("second", "dague", "Weapon"),
        ]);
        assert_eq!(r.find_id("Dague"), Some(EquipmentId::new("first")));
    }

    #[test]
    fn test_resolved_item_carries_catalog_data() {
        let r = resolver();
        let (javelins, found) = r.resolve_reference("Javeline x5");
        assert!(found);
        assert_eq!(javelins.name, "Javeline");
        assert_eq!(javelins.quantity, 5);
        assert_eq!(javelins.damage.as_deref(), Some("1d6"));
        assert!(javelins.is_weapon());

        let (mail, _) = r.resolve_reference("Cotte de mailles");
        assert_eq!(mail.base_ac, Some(16));
        assert_eq!(mail.weight, Some(27.5));
        assert_eq!(mail.item_type.as_deref(), Some("Armor"));

        let (pack, found) = r.resolve_reference("Sac à dos");
        assert!(found);
        assert_eq!(pack.item_type.as_deref(), Some("Gear"));
        assert_eq!(pack.weight, None);
    }

    #[test]
    fn test_resolve_slots_uses_selected_options_and_reports_misses() {
        let slots = vec![
            EquipmentChoiceSlot::default()
                .with_option(EquipmentOption::A, ["Épée longue"])
                .with_option(EquipmentOption::B, ["Arc long", "Flèches (20)"]),
            EquipmentChoiceSlot::fixed(["Sac à dos", "Luth"]),
            EquipmentChoiceSlot::default()
                .with_option(EquipmentOption::A, ["Javeline x5"])
                .with_option(EquipmentOption::B, ["Cotte de mailles"]),
        ];
        let mut selections = BTreeMap::new();
        selections.insert(0, EquipmentOption::B);

        let resolution = resolver().resolve_slots(&slots, &selections);
        let names: Vec<_> = resolution.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Arc long", "Flèches", "Sac à dos", "Luth"]);
        assert_eq!(resolution.unresolved, vec!["Flèches".to_string(), "Luth".to_string()]);

        let arrows = &resolution.items[1];
        assert_eq!(arrows.quantity, 20);
        assert!(arrows.item_type.is_none());
    }

    #[test]
    fn test_all_choices_made() {
        let slots = vec![
            EquipmentChoiceSlot::fixed(["Sac à dos"]),
            EquipmentChoiceSlot::default().with_option(EquipmentOption::A, ["Dague"]),
        ];
        let mut selections = BTreeMap::new();
        assert!(!all_choices_made(&slots, &selections));
        selections.insert(1, EquipmentOption::A);
        assert!(all_choices_made(&slots, &selections));
    }
}
