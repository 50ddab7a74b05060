//! Language choice rules
//!
//! Species and civilization data list languages as plain names, with
//! placeholder entries such as "Une langue au choix" standing for a free
//! pick. The final set is the fixed names plus up to one free pick per
//! placeholder.

use std::collections::BTreeSet;

/// Wordings that mark a language entry as a free pick
const CHOICE_KEYWORDS: [&str; 6] = ["choix", "au choix", "choice", "any", "libre", "à choisir"];

/// Offered for free picks when the catalog language list is unavailable
pub const FALLBACK_LANGUAGES: [&str; 15] = [
    "Commun",
    "Draconique",
    "Elfique",
    "Nain",
    "Géant",
    "Gnome",
    "Gobelin",
    "Halfelin",
    "Infernal",
    "Orc",
    "Primordial",
    "Sylvestre",
    "Céleste",
    "Abyssal",
    "Profond",
];

pub fn is_choice_placeholder(language: &str) -> bool {
    let lowered = language.trim().to_lowercase();
    CHOICE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

/// Fixed languages and free-pick quota derived from species and civilization data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguagePlan {
    pub fixed: Vec<String>,
    pub choice_count: usize,
}

impl LanguagePlan {
    pub fn from_sources(species: &[String], civilization: &[String]) -> Self {
        let mut plan = Self::default();
        for language in species.iter().chain(civilization) {
            if is_choice_placeholder(language) {
                plan.choice_count += 1;
            } else if !plan.fixed.contains(language) {
                plan.fixed.push(language.clone());
            }
        }
        plan
    }

    pub fn is_fixed(&self, language: &str) -> bool {
        self.fixed.iter().any(|l| l == language)
    }

    /// Languages of `current` the player picked freely
    pub fn chosen<'a>(&self, current: impl IntoIterator<Item = &'a String>) -> Vec<String> {
        current
            .into_iter()
            .filter(|l| !self.is_fixed(l) && !is_choice_placeholder(l))
            .cloned()
            .collect()
    }

    /// Fixed languages plus at most `choice_count` of `chosen`
    pub fn compose(&self, chosen: &[String]) -> BTreeSet<String> {
        self.fixed
            .iter()
            .cloned()
            .chain(
                chosen
                    .iter()
                    .filter(|l| !self.is_fixed(l) && !is_choice_placeholder(l))
                    .take(self.choice_count)
                    .cloned(),
            )
            .collect()
    }

    /// Rebuild `current` against this plan, keeping the free picks made
    /// under `previous`
    pub fn reconcile(&self, previous: &LanguagePlan, current: &BTreeSet<String>) -> BTreeSet<String> {
        self.compose(&previous.chosen(current))
    }

    pub fn can_choose_more(&self, current: &BTreeSet<String>) -> bool {
        self.remaining_choices(current) > 0
    }

    pub fn remaining_choices(&self, current: &BTreeSet<String>) -> usize {
        self.choice_count.saturating_sub(self.chosen(current).len())
    }

    /// Catalog languages still open for a free pick
    pub fn available_for_choice(
        &self,
        all_languages: &[String],
        current: &BTreeSet<String>,
    ) -> Vec<String> {
        all_languages
            .iter()
            .filter(|l| !self.is_fixed(l) && !current.contains(*l))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_placeholder_detection() {
        assert!(is_choice_placeholder("Une langue au choix"));
        assert!(is_choice_placeholder("Any"));
        assert!(is_choice_placeholder("Langue à choisir"));
        assert!(!is_choice_placeholder("Elfique"));
    }

    #[test]
    fn test_plan_counts_placeholders_and_dedupes_fixed() {
        let plan = LanguagePlan::from_sources(
            &strings(&["Commun", "Elfique", "Une langue au choix"]),
            &strings(&["Commun", "Langue libre"]),
        );
        assert_eq!(plan.fixed, strings(&["Commun", "Elfique"]));
        assert_eq!(plan.choice_count, 2);
    }

    #[test]
    fn test_compose_caps_free_picks() {
        let plan = LanguagePlan::from_sources(&strings(&["Commun", "au choix"]), &[]);
        let languages = plan.compose(&strings(&["Nain", "Orc"]));
        assert_eq!(languages.len(), 2);
        assert!(languages.contains("Commun"));
        assert!(languages.contains("Nain"));
    }

    #[test]
    fn test_reconcile_drops_previous_fixed_languages() {
        let elf = LanguagePlan::from_sources(&strings(&["Commun", "Elfique", "au choix"]), &[]);
        let dwarf = LanguagePlan::from_sources(&strings(&["Commun", "Nain"]), &strings(&["choix"]));
        let current = elf.compose(&strings(&["Orc"]));

        let next = dwarf.reconcile(&elf, &current);
        assert_eq!(next, strings(&["Commun", "Nain", "Orc"]).into_iter().collect());
    }

    #[test]
    fn test_available_for_choice_excludes_known() {
        let plan = LanguagePlan::from_sources(&strings(&["Commun", "au choix"]), &[]);
        let current: BTreeSet<String> = plan.compose(&strings(&["Nain"]));
        let open = plan.available_for_choice(&strings(&["Commun", "Nain", "Orc"]), &current);
        assert_eq!(open, strings(&["Orc"]));
        assert_eq!(plan.remaining_choices(&current), 0);
    }
}
