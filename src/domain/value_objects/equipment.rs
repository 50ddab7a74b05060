//! Starting-equipment slots and resolved equipment items

use serde::{Deserialize, Serialize};

/// One of the mutually-exclusive options of an equipment slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EquipmentOption {
    A,
    B,
    C,
}

impl EquipmentOption {
    pub const ALL: [EquipmentOption; 3] = [EquipmentOption::A, EquipmentOption::B, EquipmentOption::C];
}

impl std::fmt::Display for EquipmentOption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        };
        f.write_str(label)
    }
}

/// A line of a class's starting equipment, as published by the catalog.
///
/// A slot with a non-empty `fixed` list grants every listed item. Otherwise
/// the player picks one of the `A`/`B`/`C` lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentChoiceSlot {
    #[serde(default)]
    pub choice_a: Option<Vec<String>>,
    #[serde(default)]
    pub choice_b: Option<Vec<String>>,
    #[serde(default)]
    pub choice_c: Option<Vec<String>>,
    #[serde(default)]
    pub fixed: Option<Vec<String>>,
}

impl EquipmentChoiceSlot {
    pub fn fixed(items: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            fixed: Some(items.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    pub fn with_option(
        mut self,
        option: EquipmentOption,
        items: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let items = Some(items.into_iter().map(Into::into).collect());
        match option {
            EquipmentOption::A => self.choice_a = items,
            EquipmentOption::B => self.choice_b = items,
            EquipmentOption::C => self.choice_c = items,
        }
        self
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed.as_ref().is_some_and(|items| !items.is_empty())
    }

    /// Items of an option, empty when the slot does not offer it
    pub fn option_items(&self, option: EquipmentOption) -> &[String] {
        let items = match option {
            EquipmentOption::A => &self.choice_a,
            EquipmentOption::B => &self.choice_b,
            EquipmentOption::C => &self.choice_c,
        };
        items.as_deref().unwrap_or(&[])
    }

    pub fn has_option(&self, option: EquipmentOption) -> bool {
        !self.option_items(option).is_empty()
    }

    pub fn available_options(&self) -> Vec<EquipmentOption> {
        EquipmentOption::ALL
            .into_iter()
            .filter(|option| self.has_option(*option))
            .collect()
    }

    pub fn fixed_items(&self) -> &[String] {
        self.fixed.as_deref().unwrap_or(&[])
    }

    /// Every item reference the slot mentions, fixed or optional
    pub fn all_references(&self) -> impl Iterator<Item = &String> {
        self.fixed_items()
            .iter()
            .chain(EquipmentOption::ALL.into_iter().flat_map(|o| self.option_items(o)))
    }
}

/// An equipment line of the build, enriched from the catalog when the
/// reference could be matched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedEquipmentItem {
    pub name: String,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub item_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Vec<String>>,
    #[serde(default, rename = "baseAC", skip_serializing_if = "Option::is_none")]
    pub base_ac: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub add_dex_mod: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dex_bonus: Option<i32>,
}

impl ResolvedEquipmentItem {
    /// An item known only by name and quantity
    pub fn bare(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity,
            ..Self::default()
        }
    }

    pub fn is_weapon(&self) -> bool {
        self.item_type.as_deref() == Some("Weapon") && self.damage.is_some()
    }

    /// Case-insensitive containment check against the weapon properties
    pub fn has_property(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.properties
            .as_ref()
            .is_some_and(|props| props.iter().any(|p| p.to_lowercase().contains(&tag)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_wire_shape() {
        let json = r#"{"choiceA":["Hache à deux mains"],"choiceB":["Épée longue","Bouclier"],"choiceC":null,"fixed":null}"#;
        let slot: EquipmentChoiceSlot = serde_json::from_str(json).unwrap();
        assert!(!slot.is_fixed());
        assert_eq!(slot.available_options(), vec![EquipmentOption::A, EquipmentOption::B]);
        assert_eq!(slot.option_items(EquipmentOption::B).len(), 2);
        assert!(slot.option_items(EquipmentOption::C).is_empty());
    }

    #[test]
    fn test_empty_fixed_list_is_not_fixed() {
        let slot = EquipmentChoiceSlot {
            fixed: Some(vec![]),
            ..EquipmentChoiceSlot::default()
        };
        assert!(!slot.is_fixed());
    }

    #[test]
    fn test_has_property_ignores_case() {
        let item = ResolvedEquipmentItem {
            properties: Some(vec!["Munitions".into(), "Projectiles (24/96)".into()]),
            ..ResolvedEquipmentItem::bare("Arc court", 1)
        };
        assert!(item.has_property("projectile"));
        assert!(!item.has_property("finesse"));
    }
}
