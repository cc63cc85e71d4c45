// ABOUTME: Meal plan filter configuration threaded through prompt construction
// ABOUTME: Goal resolution merges overrides into a new value, never in place
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

use super::profile::{FamilyMember, GoalWeights, ProfileType};
use super::restriction::DietaryRestriction;
use serde::{Deserialize, Serialize};

/// Household budget tier used by goal-driven filter overrides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetTier {
    /// Tight grocery budget
    Low,
    /// Typical grocery budget
    Medium,
    /// Generous grocery budget
    High,
}

/// How much preparation effort the user wants to invest
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepTimePreference {
    /// Quick-prep, one-pot style meals
    Minimal,
    /// Typical weeknight effort
    Moderate,
    /// Involved, multi-step cooking is welcome
    EnjoysCooking,
    /// Large sessions producing many servings
    BatchCooking,
}

/// How much meal-to-meal variety the user wants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarietyPreference {
    /// Familiar, repeated meals
    Consistent,
    /// Some rotation
    Moderate,
    /// Diverse cuisines and methods
    HighVariety,
}

/// Aggregate configuration for one plan-generation request.
///
/// Constructed once per request and read-only through the pipeline;
/// goal resolution produces adjusted copies via [`FilterOverrides::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanFilters {
    /// Number of days the plan must cover
    pub num_days: usize,
    /// Meals per day (breakfast, lunch, dinner, snacks)
    pub meals_per_day: usize,
    /// Ceiling on total per-meal time in minutes (prep + cook)
    pub max_cook_time: u32,
    /// Ceiling on per-meal difficulty, 1.0-5.0 in 0.5 increments
    pub max_difficulty: f64,
    /// Categorical primary goal (e.g. "Save Money")
    #[serde(default)]
    pub primary_goal: Option<String>,
    /// Nutrition focus tag derived from the primary goal
    #[serde(default)]
    pub nutrition_focus: Option<String>,
    /// Merged dietary restrictions (request ∪ member ∪ profile)
    #[serde(default)]
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Ingredients the user already has on hand
    #[serde(default)]
    pub available_ingredients: Vec<String>,
    /// Ingredients to avoid entirely
    #[serde(default)]
    pub exclude_ingredients: Vec<String>,
    /// Cultural background tags driving the ranking pass
    #[serde(default)]
    pub cultural_background: Vec<String>,
    /// Effective goal weights (request > profile > defaults)
    #[serde(default)]
    pub goal_weights: GoalWeights,
    /// Low-cost versatile ingredients selected for reuse across meals
    #[serde(default)]
    pub hero_ingredients: Vec<String>,
    /// Number of people the plan feeds
    #[serde(default = "default_family_size")]
    pub family_size: u32,
    /// Individual or family profile
    #[serde(default)]
    pub profile_type: ProfileType,
    /// Family members the plan is for
    #[serde(default)]
    pub family_members: Vec<FamilyMember>,
    /// Member names the plan targets; `["Everyone"]` means the whole family
    #[serde(default)]
    pub plan_targets: Vec<String>,
    /// Encourage ingredient reuse across meals to reduce cost
    #[serde(default)]
    pub encourage_overlap: bool,
    /// Minimum percentage of meals that should use available ingredients
    #[serde(default)]
    pub ingredient_usage_percent: Option<u8>,
    /// Budget tier override from the primary goal
    #[serde(default)]
    pub budget_constraints: Option<BudgetTier>,
    /// Prep-effort preference
    #[serde(default)]
    pub prep_time_preference: Option<PrepTimePreference>,
    /// Variety preference
    #[serde(default)]
    pub variety_preference: Option<VarietyPreference>,
}

const fn default_family_size() -> u32 {
    1
}

impl MealPlanFilters {
    /// Create filters with the required structural fields and sensible rest
    #[must_use]
    pub fn new(num_days: usize, meals_per_day: usize, max_cook_time: u32, max_difficulty: f64) -> Self {
        Self {
            num_days,
            meals_per_day,
            max_cook_time,
            max_difficulty,
            primary_goal: None,
            nutrition_focus: None,
            dietary_restrictions: Vec::new(),
            available_ingredients: Vec::new(),
            exclude_ingredients: Vec::new(),
            cultural_background: Vec::new(),
            goal_weights: GoalWeights::default(),
            hero_ingredients: Vec::new(),
            family_size: 1,
            profile_type: ProfileType::Individual,
            family_members: Vec::new(),
            plan_targets: Vec::new(),
            encourage_overlap: false,
            ingredient_usage_percent: None,
            budget_constraints: None,
            prep_time_preference: None,
            variety_preference: None,
        }
    }

    /// Whether the plan targets specific family members rather than everyone
    #[must_use]
    pub fn targets_specific_members(&self) -> bool {
        !self.plan_targets.is_empty()
            && !self.plan_targets.iter().any(|target| target == "Everyone")
    }
}

/// Partial filter adjustments produced by primary-goal resolution.
///
/// Applying overrides returns a new filters value; the caller's filters are
/// never mutated, keeping the pipeline composable across concurrent
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FilterOverrides {
    /// Replacement nutrition focus tag
    pub nutrition_focus: Option<String>,
    /// Toggle ingredient-overlap encouragement
    pub encourage_overlap: Option<bool>,
    /// Replacement available-ingredient usage percentage
    pub ingredient_usage_percent: Option<u8>,
    /// Replacement budget tier
    pub budget_constraints: Option<BudgetTier>,
    /// Replacement prep-effort preference
    pub prep_time_preference: Option<PrepTimePreference>,
    /// Replacement variety preference
    pub variety_preference: Option<VarietyPreference>,
}

impl FilterOverrides {
    /// Merge these overrides into `filters`, returning the adjusted copy
    #[must_use]
    pub fn apply(&self, filters: &MealPlanFilters) -> MealPlanFilters {
        let mut adjusted = filters.clone();
        if let Some(focus) = &self.nutrition_focus {
            adjusted.nutrition_focus = Some(focus.clone());
        }
        if let Some(overlap) = self.encourage_overlap {
            adjusted.encourage_overlap = overlap;
        }
        if let Some(percent) = self.ingredient_usage_percent {
            adjusted.ingredient_usage_percent = Some(percent);
        }
        if let Some(budget) = self.budget_constraints {
            adjusted.budget_constraints = Some(budget);
        }
        if let Some(prep) = self.prep_time_preference {
            adjusted.prep_time_preference = Some(prep);
        }
        if let Some(variety) = self.variety_preference {
            adjusted.variety_preference = Some(variety);
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_returns_new_value_without_mutating_input() {
        let filters = MealPlanFilters::new(3, 2, 45, 3.0);
        let overrides = FilterOverrides {
            encourage_overlap: Some(true),
            ingredient_usage_percent: Some(85),
            budget_constraints: Some(BudgetTier::Low),
            ..FilterOverrides::default()
        };

        let adjusted = overrides.apply(&filters);

        assert!(!filters.encourage_overlap);
        assert!(filters.ingredient_usage_percent.is_none());
        assert!(adjusted.encourage_overlap);
        assert_eq!(adjusted.ingredient_usage_percent, Some(85));
        assert_eq!(adjusted.budget_constraints, Some(BudgetTier::Low));
    }

    #[test]
    fn everyone_sentinel_targets_whole_family() {
        let mut filters = MealPlanFilters::new(3, 2, 45, 3.0);
        assert!(!filters.targets_specific_members());

        filters.plan_targets = vec!["Everyone".into()];
        assert!(!filters.targets_specific_members());

        filters.plan_targets = vec!["Maya".into()];
        assert!(filters.targets_specific_members());
    }
}
