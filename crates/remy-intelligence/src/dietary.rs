// ABOUTME: Keyword-based dietary compliance rules and restriction merging
// ABOUTME: Pure classification over ingredient and instruction text
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Dietary Rule Engine
//!
//! Classifies meals against dietary restrictions using case-insensitive
//! keyword matching over the concatenated ingredient and instruction text,
//! plus the keto carbohydrate rule. Restriction sets from different sources
//! are merged as a union; the system only ever becomes more restrictive.
//!
//! Unknown (`Custom`) restrictions are compliant by default. The original
//! system silently failed open; here every fail-open hit is logged at debug
//! level so unsupported labels remain observable.

use crate::config::{DietaryRuleConfig, KeywordRule};
use remy_core::{CulturalMeal, DietaryRestriction};
use tracing::debug;

/// Keyword-driven compliance checker for dietary restrictions
#[derive(Debug, Clone, Default)]
pub struct DietaryRuleEngine {
    config: DietaryRuleConfig,
}

impl DietaryRuleEngine {
    /// Create an engine with the production keyword tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with substitute tables (used by tests)
    #[must_use]
    pub const fn with_config(config: DietaryRuleConfig) -> Self {
        Self { config }
    }

    /// The keyword tables backing this engine
    #[must_use]
    pub const fn config(&self) -> &DietaryRuleConfig {
        &self.config
    }

    /// Check whether a meal satisfies a single restriction
    #[must_use]
    pub fn is_compliant(&self, meal: &CulturalMeal, restriction: &DietaryRestriction) -> bool {
        let text = meal.searchable_text();
        match restriction {
            DietaryRestriction::Vegetarian => !self.config.meat.matches(&text),
            DietaryRestriction::Vegan => {
                !self.config.meat.matches(&text)
                    && !self.config.dairy.matches(&text)
                    && !self.config.egg.matches(&text)
            }
            DietaryRestriction::GlutenFree => !self.config.gluten.matches(&text),
            DietaryRestriction::DairyFree => !self.config.dairy.matches(&text),
            DietaryRestriction::NutFree => !self.config.nut.matches(&text),
            DietaryRestriction::Keto => meal.nutrition.carbs_g < self.config.keto_carb_limit_g,
            DietaryRestriction::LowSodium => !self.config.high_sodium.matches(&text),
            DietaryRestriction::Custom(label) => {
                debug!(restriction = %label, meal = %meal.name, "unknown restriction, assuming compliant");
                true
            }
        }
    }

    /// Check whether a meal satisfies every restriction in the set
    #[must_use]
    pub fn check_full_compliance(
        &self,
        meal: &CulturalMeal,
        restrictions: &[DietaryRestriction],
    ) -> bool {
        restrictions
            .iter()
            .all(|restriction| self.is_compliant(meal, restriction))
    }

    /// Ingredient entries that violate the given restriction.
    ///
    /// Only keyword-attributable restrictions produce entries; keto and
    /// custom restrictions return an empty list (no single ingredient is
    /// responsible), which also means the adaptation engine cannot plan
    /// substitutions for them.
    #[must_use]
    pub fn violations(&self, meal: &CulturalMeal, restriction: &DietaryRestriction) -> Vec<String> {
        let rules: Vec<&KeywordRule> = match restriction {
            DietaryRestriction::Vegetarian => vec![&self.config.meat],
            DietaryRestriction::Vegan => {
                vec![&self.config.meat, &self.config.dairy, &self.config.egg]
            }
            DietaryRestriction::GlutenFree => vec![&self.config.gluten],
            DietaryRestriction::DairyFree => vec![&self.config.dairy],
            DietaryRestriction::NutFree => vec![&self.config.nut],
            DietaryRestriction::Keto
            | DietaryRestriction::LowSodium
            | DietaryRestriction::Custom(_) => return Vec::new(),
        };

        meal.ingredients
            .iter()
            .filter(|ingredient| {
                let lower = ingredient.to_lowercase();
                rules.iter().any(|rule| rule.matches(&lower))
            })
            .cloned()
            .collect()
    }

    /// Which keyword category an offending ingredient falls into
    #[must_use]
    pub fn categorize(&self, ingredient: &str) -> Option<IngredientCategory> {
        let lower = ingredient.to_lowercase();
        if self.config.meat.matches(&lower) {
            Some(IngredientCategory::Meat)
        } else if self.config.dairy.matches(&lower) {
            Some(IngredientCategory::Dairy)
        } else if self.config.egg.matches(&lower) {
            Some(IngredientCategory::Egg)
        } else if self.config.gluten.matches(&lower) {
            Some(IngredientCategory::Gluten)
        } else if self.config.nut.matches(&lower) {
            Some(IngredientCategory::Nut)
        } else {
            None
        }
    }
}

/// Keyword category an ingredient matched during violation analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientCategory {
    /// Meat or fish
    Meat,
    /// Dairy product
    Dairy,
    /// Egg
    Egg,
    /// Gluten-containing grain product
    Gluten,
    /// Tree nut or peanut
    Nut,
}

/// Union-merge restrictions from the three sources.
///
/// Request-level restrictions come first, then family-member, then
/// profile-level: the documented precedence ordering for logging and
/// prompt presentation. Duplicates keep their first position; nothing is
/// ever subtracted.
#[must_use]
pub fn merge_restrictions(
    request: &[DietaryRestriction],
    member: &[DietaryRestriction],
    profile: &[DietaryRestriction],
) -> Vec<DietaryRestriction> {
    let mut merged: Vec<DietaryRestriction> = Vec::new();
    for restriction in request.iter().chain(member).chain(profile) {
        if !merged.contains(restriction) {
            merged.push(restriction.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use remy_core::MealNutrition;

    fn meal_with(ingredients: &[&str], carbs_g: f64) -> CulturalMeal {
        CulturalMeal::new("Test Meal", "Test")
            .with_ingredients(ingredients.iter().map(ToString::to_string).collect())
            .with_nutrition(MealNutrition::new(400.0, 20.0, carbs_g, 15.0))
    }

    #[test]
    fn vegan_implies_vegetarian() {
        let engine = DietaryRuleEngine::new();
        let meals = [
            meal_with(&["tofu", "rice"], 40.0),
            meal_with(&["chicken breast"], 10.0),
            meal_with(&["cheddar cheese", "tortilla"], 30.0),
            meal_with(&["egg", "spinach"], 5.0),
        ];
        for meal in &meals {
            if engine.is_compliant(meal, &DietaryRestriction::Vegan) {
                assert!(engine.is_compliant(meal, &DietaryRestriction::Vegetarian));
            }
        }
    }

    #[test]
    fn keto_uses_carb_rule_not_keywords() {
        let engine = DietaryRuleEngine::new();
        assert!(engine.is_compliant(&meal_with(&["bread"], 19.0), &DietaryRestriction::Keto));
        assert!(!engine.is_compliant(&meal_with(&["spinach"], 25.0), &DietaryRestriction::Keto));
    }

    #[test]
    fn unknown_restriction_fails_open() {
        let engine = DietaryRuleEngine::new();
        let meal = meal_with(&["pork belly"], 5.0);
        assert!(engine.is_compliant(&meal, &DietaryRestriction::from_label("halal")));
    }

    #[test]
    fn instructions_are_scanned_too() {
        let engine = DietaryRuleEngine::new();
        let meal = CulturalMeal::new("Stealth", "Test")
            .with_ingredients(vec!["mystery protein".into()])
            .with_instructions(vec!["Brown the bacon in a skillet.".into()]);
        assert!(!engine.is_compliant(&meal, &DietaryRestriction::Vegetarian));
    }

    #[test]
    fn violations_name_offending_ingredients() {
        let engine = DietaryRuleEngine::new();
        let meal = meal_with(&["ground beef", "cheddar cheese", "tortilla"], 30.0);
        let violations = engine.violations(&meal, &DietaryRestriction::Vegan);
        assert_eq!(violations, vec!["ground beef", "cheddar cheese"]);
    }

    #[test]
    fn merge_is_a_union_preserving_request_order() {
        let request = vec![DietaryRestriction::Vegan];
        let member = vec![DietaryRestriction::GlutenFree, DietaryRestriction::Vegan];
        let profile: Vec<DietaryRestriction> = Vec::new();

        let merged = merge_restrictions(&request, &member, &profile);
        assert_eq!(
            merged,
            vec![DietaryRestriction::Vegan, DietaryRestriction::GlutenFree]
        );
        assert!(merged.len() >= request.len().max(member.len()).max(profile.len()));
    }
}
