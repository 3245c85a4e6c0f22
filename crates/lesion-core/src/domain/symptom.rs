//! Symptom checklist supplied alongside an image.
//!
//! Symptoms are never fed to the classifier. They are echoed in the report
//! so the reader sees both inputs side by side.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Marker returned by [`summarize`] for an empty selection.
pub const NO_SYMPTOMS: &str = "No symptoms selected.";

/// An entry of the fixed symptom checklist.
///
/// Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Symptom {
    RednessOrInflammation,
    BleedingOrOozing,
    RoughOrScalySkin,
    ItchingOrIrritation,
    DarkIrregularSpot,
    WartLikeGrowth,
    SlowGrowingBump,
}

impl Symptom {
    /// The full checklist, in display order.
    pub const ALL: [Self; 7] = [
        Self::RednessOrInflammation,
        Self::BleedingOrOozing,
        Self::RoughOrScalySkin,
        Self::ItchingOrIrritation,
        Self::DarkIrregularSpot,
        Self::WartLikeGrowth,
        Self::SlowGrowingBump,
    ];

    /// Human-readable checklist text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RednessOrInflammation => "Redness or inflammation",
            Self::BleedingOrOozing => "Bleeding or oozing",
            Self::RoughOrScalySkin => "Rough or scaly skin",
            Self::ItchingOrIrritation => "Itching or irritation",
            Self::DarkIrregularSpot => "Dark irregular spot",
            Self::WartLikeGrowth => "Wart-like growth",
            Self::SlowGrowingBump => "Slow-growing bump",
        }
    }

    /// Kebab-case identifier, e.g. `itching-or-irritation`.
    #[must_use]
    pub fn slug(self) -> String {
        self.name().to_lowercase().replace(' ', "-")
    }

    /// Leading keyword of the name, e.g. `itching` or `wart-like`.
    fn keyword(self) -> String {
        self.name()
            .split(' ')
            .next()
            .unwrap_or_default()
            .to_lowercase()
    }
}

impl fmt::Display for Symptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no known symptom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSymptom(pub String);

impl fmt::Display for UnknownSymptom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown symptom '{}'", self.0)
    }
}

impl std::error::Error for UnknownSymptom {}

impl FromStr for Symptom {
    type Err = UnknownSymptom;

    /// Accepts the checklist text, its slug, or its leading keyword,
    /// ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|sym| {
                sym.name().to_lowercase() == wanted || sym.slug() == wanted || sym.keyword() == wanted
            })
            .ok_or_else(|| UnknownSymptom(s.to_string()))
    }
}

/// The set of checked symptoms.
///
/// Iteration always follows checklist order, whatever order symptoms were
/// selected in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymptomSelection(BTreeSet<Symptom>);

impl SymptomSelection {
    /// Creates an empty selection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a symptom as checked.
    pub fn select(&mut self, symptom: Symptom) {
        self.0.insert(symptom);
    }

    /// Returns true if no symptom is checked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of checked symptoms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether a symptom is checked.
    #[must_use]
    pub fn contains(&self, symptom: Symptom) -> bool {
        self.0.contains(&symptom)
    }

    /// Checked symptoms in checklist order.
    pub fn iter(&self) -> impl Iterator<Item = Symptom> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Symptom> for SymptomSelection {
    fn from_iter<I: IntoIterator<Item = Symptom>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Formats a symptom selection for display.
///
/// Returns the checked names joined by `", "`, or [`NO_SYMPTOMS`] when
/// nothing is checked.
#[must_use]
pub fn summarize(selection: &SymptomSelection) -> String {
    if selection.is_empty() {
        return NO_SYMPTOMS.to_string();
    }
    selection
        .iter()
        .map(Symptom::name)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summarize_empty() {
        assert_eq!(summarize(&SymptomSelection::new()), NO_SYMPTOMS);
    }

    #[test]
    fn test_summarize_single() {
        let selection: SymptomSelection = [Symptom::ItchingOrIrritation].into_iter().collect();
        assert_eq!(summarize(&selection), "Itching or irritation");
    }

    #[test]
    fn test_summarize_uses_checklist_order() {
        let selection: SymptomSelection = [Symptom::SlowGrowingBump, Symptom::RednessOrInflammation]
            .into_iter()
            .collect();
        assert_eq!(
            summarize(&selection),
            "Redness or inflammation, Slow-growing bump"
        );
    }

    #[test]
    fn test_duplicate_selection_collapses() {
        let mut selection = SymptomSelection::new();
        selection.select(Symptom::BleedingOrOozing);
        selection.select(Symptom::BleedingOrOozing);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn test_parse_accepts_name_slug_and_keyword() {
        assert_eq!(
            "Itching or irritation".parse::<Symptom>().unwrap(),
            Symptom::ItchingOrIrritation
        );
        assert_eq!(
            "wart-like-growth".parse::<Symptom>().unwrap(),
            Symptom::WartLikeGrowth
        );
        assert_eq!("DARK".parse::<Symptom>().unwrap(), Symptom::DarkIrregularSpot);
        assert_eq!(
            "slow-growing".parse::<Symptom>().unwrap(),
            Symptom::SlowGrowingBump
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "fever".parse::<Symptom>().unwrap_err();
        assert_eq!(err.to_string(), "unknown symptom 'fever'");
    }

    #[test]
    fn test_keywords_are_unique() {
        let mut keywords: Vec<_> = Symptom::ALL.iter().map(|s| s.keyword()).collect();
        keywords.sort();
        keywords.dedup();
        assert_eq!(keywords.len(), Symptom::ALL.len());
    }
}
