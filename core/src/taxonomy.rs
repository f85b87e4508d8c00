//! Decline reason reference data.
//!
//! Reasons are seeded at construction time and read-only at runtime. A
//! decline transition must reference an active reason; reasons that
//! mandate notes reject declines without them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fallback locale used when a requested locale has no label.
pub const FALLBACK_LOCALE: &str = "en";

/// A coded, localized justification for rejecting a booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclineReason {
    /// Stable key referenced by decline transitions.
    pub code: String,
    /// Localized labels, keyed by locale (`"en"`, `"de"`, ...).
    pub labels: HashMap<String, String>,
    /// Whether free-text notes are mandatory for this reason.
    pub requires_notes: bool,
    /// Display ordering in the decline UI.
    pub sort_order: i32,
    /// Inactive reasons are hidden and rejected on decline.
    pub is_active: bool,
}

impl DeclineReason {
    /// Label for the given locale, falling back to English.
    #[must_use]
    pub fn label(&self, locale: &str) -> &str {
        self.labels
            .get(locale)
            .or_else(|| self.labels.get(FALLBACK_LOCALE))
            .map_or(self.code.as_str(), String::as_str)
    }
}

/// Read-only registry of decline reasons.
#[derive(Debug, Clone)]
pub struct DeclineTaxonomy {
    reasons: Vec<DeclineReason>,
}

impl DeclineTaxonomy {
    /// Build a taxonomy from an explicit reason list.
    ///
    /// Reasons are sorted by `sort_order` once, at construction.
    #[must_use]
    pub fn new(mut reasons: Vec<DeclineReason>) -> Self {
        reasons.sort_by_key(|r| r.sort_order);
        Self { reasons }
    }

    /// The standard seed used by the partner portal.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            seed("schedule_conflict", "Schedule conflict", "Terminkonflikt", false, 10),
            seed("capacity_reached", "No capacity left", "Keine Kapazität frei", false, 20),
            seed(
                "trainer_unavailable",
                "Trainer unavailable",
                "Trainer nicht verfügbar",
                false,
                30,
            ),
            seed("duplicate_booking", "Duplicate booking", "Doppelbuchung", false, 40),
            seed("other", "Other reason", "Sonstiger Grund", true, 90),
        ])
    }

    /// Look up an active reason by code.
    #[must_use]
    pub fn active(&self, code: &str) -> Option<&DeclineReason> {
        self.reasons.iter().find(|r| r.is_active && r.code == code)
    }

    /// All active reasons in display order.
    pub fn active_reasons(&self) -> impl Iterator<Item = &DeclineReason> {
        self.reasons.iter().filter(|r| r.is_active)
    }
}

impl Default for DeclineTaxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

fn seed(code: &str, en: &str, de: &str, requires_notes: bool, sort_order: i32) -> DeclineReason {
    let mut labels = HashMap::new();
    labels.insert("en".to_string(), en.to_string());
    labels.insert("de".to_string(), de.to_string());
    DeclineReason {
        code: code.to_string(),
        labels,
        requires_notes,
        sort_order,
        is_active: true,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_seed_is_sorted_and_active() {
        let taxonomy = DeclineTaxonomy::standard();
        let orders: Vec<i32> = taxonomy.active_reasons().map(|r| r.sort_order).collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted);
        assert!(taxonomy.active("schedule_conflict").is_some());
    }

    #[test]
    fn schedule_conflict_needs_no_notes() {
        let taxonomy = DeclineTaxonomy::standard();
        let reason = taxonomy.active("schedule_conflict").unwrap();
        assert!(!reason.requires_notes);
    }

    #[test]
    fn other_requires_notes() {
        let taxonomy = DeclineTaxonomy::standard();
        assert!(taxonomy.active("other").unwrap().requires_notes);
    }

    #[test]
    fn inactive_reasons_are_hidden() {
        let mut reason = seed("legacy", "Legacy", "Veraltet", false, 5);
        reason.is_active = false;
        let taxonomy = DeclineTaxonomy::new(vec![reason]);
        assert!(taxonomy.active("legacy").is_none());
        assert_eq!(taxonomy.active_reasons().count(), 0);
    }

    #[test]
    fn label_falls_back_to_english() {
        let taxonomy = DeclineTaxonomy::standard();
        let reason = taxonomy.active("other").unwrap();
        assert_eq!(reason.label("de"), "Sonstiger Grund");
        assert_eq!(reason.label("fr"), "Other reason");
    }
}
