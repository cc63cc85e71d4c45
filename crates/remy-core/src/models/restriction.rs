// ABOUTME: Dietary restriction vocabulary with free-form passthrough
// ABOUTME: Normalizes user-entered restriction labels into a closed-ish enum
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

use serde::{Deserialize, Serialize};
use std::fmt;

/// Dietary restriction for meal compliance checks.
///
/// Restrictions are merged as a union across sources (request, family
/// member, stored profile); the system only ever becomes more restrictive.
/// Labels outside the known vocabulary pass through as `Custom` so
/// free-form restrictions (e.g. "halal") still reach the LLM as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DietaryRestriction {
    /// No meat or fish
    Vegetarian,
    /// No animal products
    Vegan,
    /// No gluten-containing ingredients
    GlutenFree,
    /// No dairy products
    DairyFree,
    /// No nuts
    NutFree,
    /// Ketogenic (< 20g carbs per serving)
    Keto,
    /// Low sodium content
    LowSodium,
    /// Custom restriction carrying the original label
    Custom(String),
}

impl DietaryRestriction {
    /// Parse a user-entered label into a restriction.
    ///
    /// Matching is case-insensitive and tolerates both hyphenated and
    /// spaced forms ("gluten-free", "gluten free"). Unknown labels are
    /// preserved as `Custom` with the trimmed lowercase text.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let normalized = label.trim().to_lowercase();
        match normalized.replace(' ', "-").as_str() {
            "vegetarian" => Self::Vegetarian,
            "vegan" => Self::Vegan,
            "gluten-free" => Self::GlutenFree,
            "dairy-free" => Self::DairyFree,
            "nut-free" => Self::NutFree,
            "keto" | "ketogenic" => Self::Keto,
            "low-sodium" => Self::LowSodium,
            _ => Self::Custom(normalized),
        }
    }

    /// Canonical lowercase label for prompt text and logging
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Vegetarian => "vegetarian",
            Self::Vegan => "vegan",
            Self::GlutenFree => "gluten-free",
            Self::DairyFree => "dairy-free",
            Self::NutFree => "nut-free",
            Self::Keto => "keto",
            Self::LowSodium => "low-sodium",
            Self::Custom(text) => text,
        }
    }

    /// Whether this restriction is outside the known keyword vocabulary
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }

    /// Parse a comma-separated restriction list, skipping empty entries
    #[must_use]
    pub fn parse_list(text: &str) -> Vec<Self> {
        text.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(Self::from_label)
            .collect()
    }
}

impl fmt::Display for DietaryRestriction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_labels_case_insensitively() {
        assert_eq!(
            DietaryRestriction::from_label("  Gluten Free "),
            DietaryRestriction::GlutenFree
        );
        assert_eq!(
            DietaryRestriction::from_label("VEGAN"),
            DietaryRestriction::Vegan
        );
    }

    #[test]
    fn unknown_labels_pass_through_as_custom() {
        let restriction = DietaryRestriction::from_label("Halal");
        assert_eq!(restriction, DietaryRestriction::Custom("halal".into()));
        assert!(restriction.is_custom());
        assert_eq!(restriction.label(), "halal");
    }

    #[test]
    fn parse_list_skips_blank_entries() {
        let parsed = DietaryRestriction::parse_list("vegan, , gluten-free,");
        assert_eq!(
            parsed,
            vec![
                DietaryRestriction::Vegan,
                DietaryRestriction::GlutenFree,
            ]
        );
    }
}
