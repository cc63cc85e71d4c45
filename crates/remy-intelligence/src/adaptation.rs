// ABOUTME: Single-pass meal adaptation for dietary compliance
// ABOUTME: Plans minimal substitutions that preserve maximum cultural authenticity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Meal Adaptation Engine
//!
//! Best-effort local repair for meals that almost satisfy the user's
//! dietary restrictions. The engine runs one explicit pass (check, plan,
//! prioritize, gate, apply, re-verify) and never retries with alternate
//! substitutes; when the pass cannot reach compliance it signals
//! `fallback_to_generation` so the caller requests a freshly generated
//! meal instead of serving a half-adapted dish.

use crate::config::AdaptationConfig;
use crate::dietary::{DietaryRuleEngine, IngredientCategory};
use remy_core::{CulturalMeal, DietaryRestriction, GoalWeights};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Kind of change applied to a meal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ModificationKind {
    /// Swap one ingredient for a compliant replacement
    IngredientSubstitution,
    /// Remove an ingredient outright
    IngredientRemoval,
    /// Add a new ingredient
    IngredientAddition,
    /// Change a cooking method
    CookingMethod,
    /// Scale portions
    PortionAdjustment,
}

/// One planned change to a meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealModification {
    /// What kind of change this is
    pub kind: ModificationKind,
    /// Original ingredient or method text
    pub original: String,
    /// Replacement text
    pub replacement: String,
    /// Why the change is needed
    pub reason: String,
    /// Authenticity cost, 0.0 (invisible swap) to 1.0 (total identity loss)
    pub impact_on_authenticity: f64,
    /// Whether the change is required for dietary compliance
    pub dietary_necessity: bool,
}

/// Terminal outcome of one adaptation pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaptationResult {
    /// Whether the adapted meal is fully compliant
    pub success: bool,
    /// The adapted meal (the original on failure)
    pub adapted_meal: CulturalMeal,
    /// Planned modifications; on failure these are the modifications that
    /// were considered before the attempt was abandoned
    pub modifications: Vec<MealModification>,
    /// Authenticity retained after modification, 0.0-1.0
    pub authenticity_retained: f64,
    /// How well the adapted meal satisfies each goal axis
    pub goal_satisfaction: GoalWeights,
    /// Human-readable notes describing the outcome
    pub adaptation_notes: Vec<String>,
    /// Signal that the caller must request a freshly generated meal
    pub fallback_to_generation: bool,
}

/// Single-pass dietary repair engine
#[derive(Debug, Clone, Default)]
pub struct MealAdaptationEngine {
    config: AdaptationConfig,
    dietary: DietaryRuleEngine,
}

impl MealAdaptationEngine {
    /// Create an engine with the production tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with substitute tables (used by tests)
    #[must_use]
    pub const fn with_config(config: AdaptationConfig, dietary: DietaryRuleEngine) -> Self {
        Self { config, dietary }
    }

    /// Attempt to adapt a meal for dietary compliance.
    ///
    /// Success guarantees `authenticity_retained` is at least the
    /// configured threshold; every failure path sets
    /// `fallback_to_generation`.
    #[must_use]
    pub fn adapt_meal_if_needed(
        &self,
        meal: &CulturalMeal,
        restrictions: &[DietaryRestriction],
        goal_weights: &GoalWeights,
    ) -> AdaptationResult {
        debug!(meal = %meal.name, restrictions = restrictions.len(), "attempting meal adaptation");

        if self.dietary.check_full_compliance(meal, restrictions) {
            return AdaptationResult {
                success: true,
                adapted_meal: meal.clone(),
                modifications: Vec::new(),
                authenticity_retained: 1.0,
                goal_satisfaction: Self::goal_satisfaction(meal, goal_weights),
                adaptation_notes: vec!["No adaptation required - meal already compliant".into()],
                fallback_to_generation: false,
            };
        }

        let modifications = self.plan_modifications(meal, restrictions);
        if modifications.is_empty() {
            debug!(meal = %meal.name, "no viable modifications found");
            return Self::failure(meal, Vec::new(), "No viable adaptations found");
        }

        let average_impact = modifications
            .iter()
            .map(|modification| modification.impact_on_authenticity)
            .sum::<f64>()
            / modifications.len() as f64;

        if average_impact > (1.0 - self.config.authenticity_threshold) {
            debug!(meal = %meal.name, average_impact, "authenticity loss too high");
            return Self::failure(
                meal,
                modifications,
                "Authenticity loss exceeds acceptable threshold",
            );
        }

        let adapted = self.apply_modifications(meal, &modifications);

        if !self.dietary.check_full_compliance(&adapted, restrictions) {
            debug!(meal = %meal.name, "adapted meal still not compliant");
            return Self::failure(meal, modifications, "Adaptation failed to achieve compliance");
        }

        let authenticity_retained = 1.0 - average_impact;
        info!(
            meal = %meal.name,
            authenticity_retained,
            modifications = modifications.len(),
            "meal adaptation successful"
        );

        let notes = self.adaptation_notes(&modifications, &meal.culture);
        AdaptationResult {
            success: true,
            goal_satisfaction: Self::goal_satisfaction(&adapted, goal_weights),
            adapted_meal: adapted,
            modifications,
            authenticity_retained,
            adaptation_notes: notes,
            fallback_to_generation: false,
        }
    }

    /// Enumerate the substitutions each restriction requires.
    ///
    /// Duplicate (kind, original) pairs are removed, the list is sorted by
    /// (necessity desc, authenticity impact asc), and capped at the
    /// configured maximum.
    fn plan_modifications(
        &self,
        meal: &CulturalMeal,
        restrictions: &[DietaryRestriction],
    ) -> Vec<MealModification> {
        let mut modifications: Vec<MealModification> = Vec::new();

        for restriction in restrictions {
            for ingredient in self.dietary.violations(meal, restriction) {
                if let Some(modification) =
                    self.modification_for(&ingredient, restriction, &meal.culture)
                {
                    modifications.push(modification);
                }
            }
        }

        // Dedupe by (kind, original), keeping the first occurrence
        let mut seen: Vec<(ModificationKind, String)> = Vec::new();
        modifications.retain(|modification| {
            let key = (modification.kind, modification.original.to_lowercase());
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        });

        modifications.sort_by(|a, b| {
            b.dietary_necessity
                .cmp(&a.dietary_necessity)
                .then_with(|| {
                    a.impact_on_authenticity
                        .partial_cmp(&b.impact_on_authenticity)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });
        modifications.truncate(self.config.max_modifications);
        modifications
    }

    fn modification_for(
        &self,
        ingredient: &str,
        restriction: &DietaryRestriction,
        culture: &str,
    ) -> Option<MealModification> {
        let category = self.dietary.categorize(ingredient)?;
        let rules = &self.config.substitutions;
        let lower = ingredient.to_lowercase();
        let culture_lower = culture.to_lowercase();

        let relevant = matches!(
            (restriction, category),
            (
                DietaryRestriction::Vegetarian | DietaryRestriction::Vegan,
                IngredientCategory::Meat
            ) | (
                DietaryRestriction::Vegan | DietaryRestriction::DairyFree,
                IngredientCategory::Dairy
            ) | (DietaryRestriction::Vegan, IngredientCategory::Egg)
                | (DietaryRestriction::GlutenFree, IngredientCategory::Gluten)
                | (DietaryRestriction::NutFree, IngredientCategory::Nut)
        );
        if !relevant {
            return None;
        }

        let (kind, replacement, impact, reason) = match category {
            IngredientCategory::Meat => (
                ModificationKind::IngredientSubstitution,
                rules
                    .meat_by_culture
                    .get(&culture_lower)
                    .map_or_else(
                        || rules.meat_generic.substitute(&lower),
                        |table| table.substitute(&lower),
                    )
                    .to_string(),
                self.meat_impact(&culture_lower),
                format!("Substitute meat for {restriction} compliance"),
            ),
            IngredientCategory::Dairy => (
                ModificationKind::IngredientSubstitution,
                if lower.contains("cheese") && culture_lower.contains("italian") {
                    rules.italian_cheese.clone()
                } else {
                    rules.dairy.substitute(&lower).to_string()
                },
                self.dairy_impact(&lower),
                format!("Substitute dairy for {restriction} compliance"),
            ),
            IngredientCategory::Egg => (
                ModificationKind::IngredientSubstitution,
                rules.egg_replacement.clone(),
                self.config.authenticity.egg_impact,
                format!("Substitute egg for {restriction} compliance"),
            ),
            IngredientCategory::Gluten => (
                ModificationKind::IngredientSubstitution,
                rules.gluten.substitute(&lower).to_string(),
                self.gluten_impact(&lower, &culture_lower),
                "Substitute gluten-containing ingredient".to_string(),
            ),
            IngredientCategory::Nut => (
                ModificationKind::IngredientRemoval,
                rules.nut_replacement.clone(),
                self.config.authenticity.nut_removal_impact,
                "Remove nuts for nut-free compliance".to_string(),
            ),
        };

        Some(MealModification {
            kind,
            original: ingredient.to_string(),
            replacement,
            reason,
            impact_on_authenticity: impact,
            dietary_necessity: true,
        })
    }

    fn meat_impact(&self, culture: &str) -> f64 {
        let friendly = self
            .config
            .authenticity
            .vegetarian_friendly_cultures
            .iter()
            .any(|entry| culture.contains(entry.as_str()));
        if friendly {
            self.config.authenticity.meat_impact_friendly
        } else {
            self.config.authenticity.meat_impact_other
        }
    }

    fn dairy_impact(&self, ingredient: &str) -> f64 {
        if ingredient.contains("cheese")
            || ingredient.contains("cheddar")
            || ingredient.contains("mozzarella")
            || ingredient.contains("parmesan")
        {
            self.config.authenticity.cheese_impact
        } else if ingredient.contains("cream") {
            self.config.authenticity.cream_impact
        } else {
            self.config.authenticity.dairy_impact_other
        }
    }

    fn gluten_impact(&self, ingredient: &str, culture: &str) -> f64 {
        let asian = ["chinese", "japanese", "thai", "korean", "vietnamese"]
            .iter()
            .any(|entry| culture.contains(entry));
        if culture.contains("italian") && ingredient.contains("pasta") {
            self.config.authenticity.italian_pasta_impact
        } else if asian && ingredient.contains("noodles") {
            self.config.authenticity.asian_noodle_impact
        } else {
            self.config.authenticity.gluten_impact_other
        }
    }

    /// Apply planned modifications, producing the adapted copy
    fn apply_modifications(
        &self,
        meal: &CulturalMeal,
        modifications: &[MealModification],
    ) -> CulturalMeal {
        let mut adapted = meal.clone();

        for modification in modifications {
            match modification.kind {
                ModificationKind::IngredientSubstitution => {
                    if let Some(entry) = adapted.ingredients.iter_mut().find(|entry| {
                        entry
                            .to_lowercase()
                            .contains(&modification.original.to_lowercase())
                    }) {
                        *entry = modification.replacement.clone();
                    }
                    for instruction in &mut adapted.instructions {
                        *instruction = replace_case_insensitive(
                            instruction,
                            &modification.original,
                            &modification.replacement,
                        );
                    }
                }
                ModificationKind::IngredientRemoval => {
                    let needle = modification.original.to_lowercase();
                    adapted
                        .ingredients
                        .retain(|entry| !entry.to_lowercase().contains(&needle));
                    adapted.instructions = adapted
                        .instructions
                        .iter()
                        .filter_map(|instruction| strip_sentences_mentioning(instruction, &needle))
                        .collect();
                }
                ModificationKind::IngredientAddition => {
                    adapted.ingredients.push(modification.replacement.clone());
                    adapted
                        .instructions
                        .push(format!("Add {} as specified.", modification.replacement));
                }
                ModificationKind::CookingMethod => {
                    for instruction in &mut adapted.instructions {
                        *instruction = replace_case_insensitive(
                            instruction,
                            &modification.original,
                            &modification.replacement,
                        );
                    }
                }
                ModificationKind::PortionAdjustment => {
                    let factor = modification.replacement.parse::<f64>().unwrap_or(1.0);
                    adapted.nutrition.calories *= factor;
                    adapted.nutrition.protein_g *= factor;
                    adapted.nutrition.carbs_g *= factor;
                    adapted.nutrition.fat_g *= factor;
                }
            }
        }

        adapted.adaptation_notes = modifications
            .iter()
            .map(|modification| {
                format!(
                    "{:?}: {} -> {} ({})",
                    modification.kind,
                    modification.original,
                    modification.replacement,
                    modification.reason
                )
            })
            .collect();

        self.adjust_nutrition(&mut adapted, modifications);
        adapted
    }

    /// Fixed per-substitution nutrition deltas with configured floors.
    ///
    /// This is deliberately not a nutrition database lookup; the deltas
    /// keep macros plausible after plant-based swaps.
    fn adjust_nutrition(&self, meal: &mut CulturalMeal, modifications: &[MealModification]) {
        let mut calorie_delta = 0.0;
        let mut protein_delta = 0.0;
        let mut fat_delta = 0.0;

        for modification in modifications {
            if modification.kind != ModificationKind::IngredientSubstitution {
                continue;
            }
            match self.dietary.categorize(&modification.original) {
                Some(IngredientCategory::Meat) => {
                    calorie_delta -= 50.0;
                    protein_delta -= 5.0;
                }
                Some(IngredientCategory::Dairy)
                    if modification.original.to_lowercase().contains("cream") =>
                {
                    calorie_delta -= 30.0;
                    fat_delta -= 5.0;
                }
                _ => {}
            }
        }

        meal.nutrition.calories =
            (meal.nutrition.calories + calorie_delta).max(self.config.calorie_floor);
        meal.nutrition.protein_g =
            (meal.nutrition.protein_g + protein_delta).max(self.config.protein_floor_g);
        meal.nutrition.carbs_g = meal.nutrition.carbs_g.max(self.config.carb_floor_g);
        meal.nutrition.fat_g = (meal.nutrition.fat_g + fat_delta).max(self.config.fat_floor_g);
    }

    /// Simplified per-axis satisfaction estimate for the adapted meal
    fn goal_satisfaction(meal: &CulturalMeal, _weights: &GoalWeights) -> GoalWeights {
        GoalWeights {
            cost: 0.7,
            health: if meal.nutrition.protein_g >= 20.0 {
                0.8
            } else {
                0.6
            },
            cultural: meal.authenticity_score,
            variety: 0.8,
            time: if meal.cook_time_minutes <= 30 { 0.9 } else { 0.6 },
        }
    }

    fn adaptation_notes(&self, modifications: &[MealModification], culture: &str) -> Vec<String> {
        let mut notes = vec![
            format!("Adapted {culture} dish to meet dietary requirements"),
            format!(
                "{} modifications applied to ensure compliance",
                modifications.len()
            ),
        ];

        // Anchor the adapted dish to what keeps it recognizably itself
        let culture_key = culture.to_lowercase();
        if let Some(spices) = self.config.authenticity.essential_spices.get(&culture_key) {
            notes.push(format!("Preserve signature seasonings: {}", spices.join(", ")));
        }
        if let Some(methods) = self.config.authenticity.essential_methods.get(&culture_key) {
            notes.push(format!("Keep traditional methods: {}", methods.join(", ")));
        }

        let substitutions: Vec<String> = modifications
            .iter()
            .filter(|m| m.kind == ModificationKind::IngredientSubstitution)
            .map(|m| format!("{} -> {}", m.original, m.replacement))
            .collect();
        if !substitutions.is_empty() {
            notes.push(format!("Key substitutions: {}", substitutions.join(", ")));
        }

        let removals: Vec<String> = modifications
            .iter()
            .filter(|m| m.kind == ModificationKind::IngredientRemoval)
            .map(|m| m.original.clone())
            .collect();
        if !removals.is_empty() {
            notes.push(format!("Ingredients removed: {}", removals.join(", ")));
        }

        notes
    }

    fn failure(
        meal: &CulturalMeal,
        modifications: Vec<MealModification>,
        reason: &str,
    ) -> AdaptationResult {
        AdaptationResult {
            success: false,
            adapted_meal: meal.clone(),
            modifications,
            authenticity_retained: 0.0,
            goal_satisfaction: GoalWeights {
                cost: 0.0,
                health: 0.0,
                cultural: 0.0,
                variety: 0.0,
                time: 0.0,
            },
            adaptation_notes: vec![reason.to_string()],
            fallback_to_generation: true,
        }
    }
}

/// Replace every occurrence of `needle` in `text`, matching
/// case-insensitively while preserving the surrounding text.
fn replace_case_insensitive(text: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return text.to_string();
    }
    let lower_text = text.to_lowercase();
    let lower_needle = needle.to_lowercase();
    let mut result = String::with_capacity(text.len());
    let mut cursor = 0;

    while let Some(found) = lower_text[cursor..].find(&lower_needle) {
        let start = cursor + found;
        result.push_str(&text[cursor..start]);
        result.push_str(replacement);
        cursor = start + lower_needle.len();
    }
    result.push_str(&text[cursor..]);
    result
}

/// Drop the sentences of an instruction that mention `needle`.
///
/// Returns `None` when nothing survives.
fn strip_sentences_mentioning(instruction: &str, needle: &str) -> Option<String> {
    if !instruction.to_lowercase().contains(needle) {
        return Some(instruction.to_string());
    }
    let kept: Vec<&str> = instruction
        .split_inclusive('.')
        .filter(|sentence| !sentence.to_lowercase().contains(needle))
        .collect();
    let joined = kept.join("").trim().to_string();
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remy_core::MealNutrition;

    fn taco_meal(culture: &str) -> CulturalMeal {
        CulturalMeal::new("Tacos", culture)
            .with_ingredients(vec![
                "ground beef".into(),
                "cheddar cheese".into(),
                "tortilla".into(),
            ])
            .with_instructions(vec![
                "Brown the ground beef.".into(),
                "Top with cheddar cheese.".into(),
            ])
            .with_nutrition(MealNutrition::new(550.0, 28.0, 35.0, 25.0))
            .with_authenticity(0.85)
            .with_timing(25, 10, 15)
    }

    #[test]
    fn compliant_meal_needs_no_adaptation() {
        let engine = MealAdaptationEngine::new();
        let meal = CulturalMeal::new("Quinoa Bowl", "Peruvian")
            .with_ingredients(vec!["quinoa".into(), "avocado".into()])
            .with_nutrition(MealNutrition::new(400.0, 15.0, 50.0, 12.0));
        let result = engine.adapt_meal_if_needed(
            &meal,
            &[DietaryRestriction::Vegan],
            &GoalWeights::default(),
        );
        assert!(result.success);
        assert!(result.modifications.is_empty());
        assert!((result.authenticity_retained - 1.0).abs() < f64::EPSILON);
        assert!(!result.fallback_to_generation);
    }

    #[test]
    fn vegan_taco_plans_meat_and_dairy_changes_but_fails_threshold() {
        // Mexican culture: meat impact 0.6, cheese impact 0.7. The 0.65
        // average exceeds the 0.4 allowance, so the pass gives up.
        let engine = MealAdaptationEngine::new();
        let result = engine.adapt_meal_if_needed(
            &taco_meal("Mexican"),
            &[DietaryRestriction::Vegan],
            &GoalWeights::default(),
        );
        assert!(!result.success);
        assert!(result.fallback_to_generation);
        assert!(result.modifications.len() >= 2);
    }

    #[test]
    fn milk_based_indian_dish_adapts_successfully() {
        // Indian culture is vegetarian-friendly (meat impact 0.3) and milk
        // carries the generic dairy impact 0.4, so the 0.35 average passes.
        let engine = MealAdaptationEngine::new();
        let meal = CulturalMeal::new("Chicken Korma", "Indian")
            .with_ingredients(vec![
                "chicken thighs".into(),
                "whole milk".into(),
                "garam masala".into(),
                "rice".into(),
            ])
            .with_instructions(vec![
                "Sear the chicken thighs.".into(),
                "Simmer in whole milk with garam masala.".into(),
            ])
            .with_nutrition(MealNutrition::new(620.0, 32.0, 40.0, 28.0))
            .with_authenticity(0.9)
            .with_timing(45, 15, 30);

        let result = engine.adapt_meal_if_needed(
            &meal,
            &[DietaryRestriction::Vegan],
            &GoalWeights::default(),
        );

        assert!(result.success, "notes: {:?}", result.adaptation_notes);
        assert!(result.authenticity_retained >= 0.6);
        assert!(!result.fallback_to_generation);
        assert_eq!(result.modifications.len(), 2);
        let adapted_text = result.adapted_meal.searchable_text();
        assert!(!adapted_text.contains("chicken"));
        assert!(!adapted_text.contains("milk") || adapted_text.contains("coconut milk"));
    }

    #[test]
    fn successful_adaptation_respects_authenticity_bound() {
        let engine = MealAdaptationEngine::new();
        let meal = CulturalMeal::new("Pad See Ew", "Thai")
            .with_ingredients(vec![
                "chicken breast".into(),
                "broccoli".into(),
                "rice".into(),
            ])
            .with_instructions(vec!["Stir-fry the chicken breast with broccoli.".into()])
            .with_nutrition(MealNutrition::new(500.0, 30.0, 45.0, 18.0))
            .with_authenticity(0.8);

        let result = engine.adapt_meal_if_needed(
            &meal,
            &[DietaryRestriction::Vegetarian],
            &GoalWeights::default(),
        );
        assert!(result.success);
        assert!(result.authenticity_retained >= 0.6);
    }

    #[test]
    fn keto_violation_has_no_substitution_path() {
        let engine = MealAdaptationEngine::new();
        let meal = CulturalMeal::new("Rice Bowl", "Japanese")
            .with_ingredients(vec!["rice".into(), "vegetables".into()])
            .with_nutrition(MealNutrition::new(400.0, 10.0, 60.0, 8.0));
        let result = engine.adapt_meal_if_needed(
            &meal,
            &[DietaryRestriction::Keto],
            &GoalWeights::default(),
        );
        assert!(!result.success);
        assert!(result.fallback_to_generation);
        assert!(result.modifications.is_empty());
    }

    #[test]
    fn nut_removal_strips_ingredient_and_instruction_sentences() {
        let engine = MealAdaptationEngine::new();
        let meal = CulturalMeal::new("Salad", "Mediterranean")
            .with_ingredients(vec![
                "lettuce".into(),
                "walnut pieces".into(),
                "olive oil".into(),
            ])
            .with_instructions(vec![
                "Toss the lettuce with olive oil. Scatter walnut pieces on top.".into(),
            ])
            .with_nutrition(MealNutrition::new(300.0, 8.0, 15.0, 22.0))
            .with_authenticity(0.7);

        let result = engine.adapt_meal_if_needed(
            &meal,
            &[DietaryRestriction::NutFree],
            &GoalWeights::default(),
        );
        assert!(result.success);
        let text = result.adapted_meal.searchable_text();
        assert!(!text.contains("walnut"));
        assert!(text.contains("lettuce"));
    }

    #[test]
    fn replace_case_insensitive_preserves_surrounding_text() {
        let replaced = replace_case_insensitive("Brown the Ground Beef well", "ground beef", "lentils");
        assert_eq!(replaced, "Brown the lentils well");
    }
}
