// ABOUTME: Hero ingredient selection for cost-weighted meal plans
// ABOUTME: Picks low-cost versatile ingredients compatible with the restrictions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Hero Ingredient Selection
//!
//! A hero ingredient is a low-cost, versatile ingredient selected to appear
//! across multiple meals to reduce shopping cost. Selection only activates
//! when the user's cost weight exceeds the activation threshold, and every
//! candidate is screened against the merged dietary restrictions so the
//! prompt never pushes an ingredient the plan cannot use.

use crate::dietary::DietaryRuleEngine;
use remy_core::{CulturalMeal, DietaryRestriction};
use tracing::debug;

/// Cost weight above which hero selection activates
pub const COST_ACTIVATION_THRESHOLD: f64 = 0.6;

/// A candidate hero ingredient with the cuisines it plays well in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeroCandidate {
    name: &'static str,
    cuisines: &'static [&'static str],
}

const HERO_CANDIDATES: [HeroCandidate; 12] = [
    HeroCandidate {
        name: "rice",
        cuisines: &["chinese", "japanese", "indian", "mexican", "peruvian", "thai"],
    },
    HeroCandidate {
        name: "dried lentils",
        cuisines: &["indian", "lebanese", "mediterranean"],
    },
    HeroCandidate {
        name: "black beans",
        cuisines: &["mexican", "peruvian"],
    },
    HeroCandidate {
        name: "potatoes",
        cuisines: &["peruvian", "indian", "french"],
    },
    HeroCandidate {
        name: "onions",
        cuisines: &["chinese", "italian", "mexican", "indian", "french"],
    },
    HeroCandidate {
        name: "cabbage",
        cuisines: &["chinese", "korean", "vietnamese"],
    },
    HeroCandidate {
        name: "carrots",
        cuisines: &["chinese", "french", "vietnamese"],
    },
    HeroCandidate {
        name: "eggs",
        cuisines: &["chinese", "italian", "french", "japanese"],
    },
    HeroCandidate {
        name: "canned tomatoes",
        cuisines: &["italian", "mexican", "indian"],
    },
    HeroCandidate {
        name: "tofu",
        cuisines: &["chinese", "japanese", "thai", "korean"],
    },
    HeroCandidate {
        name: "oats",
        cuisines: &[],
    },
    HeroCandidate {
        name: "peanut butter",
        cuisines: &["thai", "vietnamese"],
    },
];

/// Select hero ingredients for a cost-weighted plan.
///
/// Returns an empty list when the cost weight is at or below the
/// activation threshold. Candidates violating any restriction are
/// screened out, candidates matching the user's cultural background or
/// on-hand ingredients are preferred, and the list is capped at three to
/// five entries scaled by the cost weight.
#[must_use]
pub fn select_hero_ingredients(
    cultural_background: &[String],
    available_ingredients: &[String],
    cost_weight: f64,
    restrictions: &[DietaryRestriction],
    dietary: &DietaryRuleEngine,
) -> Vec<String> {
    if cost_weight <= COST_ACTIVATION_THRESHOLD {
        return Vec::new();
    }

    let cultures_lower: Vec<String> = cultural_background
        .iter()
        .map(|culture| culture.to_lowercase())
        .collect();
    let available_lower: Vec<String> = available_ingredients
        .iter()
        .map(|ingredient| ingredient.to_lowercase())
        .collect();

    let mut scored: Vec<(i32, &'static str)> = HERO_CANDIDATES
        .iter()
        .filter(|candidate| {
            let probe =
                CulturalMeal::new(candidate.name, "").with_ingredients(vec![candidate.name.into()]);
            dietary.check_full_compliance(&probe, restrictions)
        })
        .map(|candidate| {
            let culture_fit = candidate
                .cuisines
                .iter()
                .filter(|cuisine| cultures_lower.iter().any(|culture| culture.contains(*cuisine)))
                .count() as i32;
            let on_hand = i32::from(
                available_lower
                    .iter()
                    .any(|ingredient| ingredient.contains(candidate.name)),
            );
            (culture_fit * 2 + on_hand * 3, candidate.name)
        })
        .collect();

    scored.sort_by(|a, b| b.0.cmp(&a.0));

    // Cost weight 0.61 keeps three heroes; 1.0 allows five
    let cap = 3 + ((cost_weight - COST_ACTIVATION_THRESHOLD) / 0.2).floor() as usize;
    let selected: Vec<String> = scored
        .into_iter()
        .take(cap.min(5))
        .map(|(_, name)| name.to_string())
        .collect();

    debug!(count = selected.len(), cost_weight, "selected hero ingredients");
    selected
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inactive_below_cost_threshold() {
        let dietary = DietaryRuleEngine::new();
        let selected = select_hero_ingredients(&[], &[], 0.5, &[], &dietary);
        assert!(selected.is_empty());
    }

    #[test]
    fn respects_dietary_restrictions() {
        let dietary = DietaryRuleEngine::new();
        let selected = select_hero_ingredients(
            &["Chinese".to_string()],
            &[],
            0.9,
            &[DietaryRestriction::Vegan, DietaryRestriction::NutFree],
            &dietary,
        );
        assert!(!selected.is_empty());
        assert!(!selected.contains(&"eggs".to_string()));
        assert!(!selected.contains(&"peanut butter".to_string()));
    }

    #[test]
    fn prefers_culturally_aligned_ingredients() {
        let dietary = DietaryRuleEngine::new();
        let selected =
            select_hero_ingredients(&["Mexican".to_string()], &[], 0.7, &[], &dietary);
        assert!(selected.contains(&"rice".to_string()) || selected.contains(&"black beans".to_string()));
    }

    #[test]
    fn cap_scales_with_cost_weight() {
        let dietary = DietaryRuleEngine::new();
        let modest = select_hero_ingredients(&[], &[], 0.65, &[], &dietary);
        let aggressive = select_hero_ingredients(&[], &[], 1.0, &[], &dietary);
        assert!(modest.len() <= 3);
        assert!(aggressive.len() <= 5);
        assert!(aggressive.len() >= modest.len());
    }
}
