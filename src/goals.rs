// ABOUTME: Primary-goal lookup table and weight-priority classification
// ABOUTME: Maps categorical goals to directives and filter overrides, never mutating filters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Goal/Weight Resolution
//!
//! A fixed table maps each categorical primary goal to a nutrition-focus
//! tag, an ordered list of directive sentences, and a set of filter
//! overrides. Resolution is a pure lookup with a "balanced nutrition"
//! fallback; it never throws and never mutates the caller's filters.
//!
//! Weight-based directives are generated independently and appended after
//! the main-goal block, framed as refinements for when the main goal
//! leaves a choice open. That ordering is a design invariant: it tells the
//! downstream LLM how to prioritize when instructions conflict.

use remy_core::{
    BudgetTier, FamilyMember, FilterOverrides, MealPlanFilters, PrepTimePreference, ProfileType,
    VarietyPreference,
};
use std::sync::OnceLock;
use tracing::debug;

/// Priority tier for one goal weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightPriority {
    /// Weight >= 0.7
    VeryHigh,
    /// Weight >= 0.5
    High,
    /// Weight >= 0.3
    Moderate,
    /// Weight >= 0.15
    Low,
    /// Everything below
    Minimal,
}

impl WeightPriority {
    /// Classify a weight into its tier
    #[must_use]
    pub fn from_weight(weight: f64) -> Self {
        if weight >= 0.7 {
            Self::VeryHigh
        } else if weight >= 0.5 {
            Self::High
        } else if weight >= 0.3 {
            Self::Moderate
        } else if weight >= 0.15 {
            Self::Low
        } else {
            Self::Minimal
        }
    }

    /// Uppercase label used in prompt text
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::VeryHigh => "VERY HIGH PRIORITY",
            Self::High => "HIGH PRIORITY",
            Self::Moderate => "MODERATE PRIORITY",
            Self::Low => "LOW PRIORITY",
            Self::Minimal => "MINIMAL PRIORITY",
        }
    }
}

/// One entry of the unified goal table
#[derive(Debug, Clone)]
pub struct UnifiedGoal {
    /// Canonical goal value (matched case-insensitively)
    pub value: &'static str,
    /// Display label
    pub label: &'static str,
    /// Nutrition-focus tag auto-set on the filters
    pub nutrition_focus: &'static str,
    /// Ordered directive sentences; the first opens the prompt
    pub directives: &'static [&'static str],
    /// Filter overrides this goal applies
    pub overrides: FilterOverrides,
}

fn family_goals() -> &'static [UnifiedGoal] {
    static GOALS: OnceLock<Vec<UnifiedGoal>> = OnceLock::new();
    GOALS.get_or_init(|| {
        vec![
            UnifiedGoal {
                value: "Save Money",
                label: "Save Money",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Generate a weekly meal plan using budget-friendly recipes for a family",
                    "Prioritize affordable ingredients that can be bought in bulk",
                    "Minimize waste by using ingredients across multiple meals",
                    "Maximize leftovers that can be repurposed for lunches or next day meals",
                    "Include batch cooking opportunities to save time and money",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(true),
                    ingredient_usage_percent: Some(85),
                    budget_constraints: Some(BudgetTier::Low),
                    variety_preference: Some(VarietyPreference::Consistent),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Quick & Simple Meals",
                label: "Quick & Simple",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Generate a weekly meal plan for time-constrained families requiring rapid preparation without sacrificing nutrition",
                    "Prioritize recipes with total time under 30 minutes and broad family appeal",
                    "Minimize active cooking time through one-pot techniques, sheet pan methods, and parallel preparation",
                    "Include prep strategies that reduce the daily cooking burden through batching and pre-cutting",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(true),
                    ingredient_usage_percent: Some(70),
                    prep_time_preference: Some(PrepTimePreference::Minimal),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Complex Meals",
                label: "Complex Meals",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Design an ambitious weekly meal plan for families passionate about culinary exploration",
                    "Include recipes with complexity scores of 4-5 demanding skilled knife work and timing coordination",
                    "Incorporate restaurant-caliber dishes spanning global cuisines that build technique mastery",
                    "Provide mise en place instructions and family task assignments for each meal",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(false),
                    variety_preference: Some(VarietyPreference::HighVariety),
                    prep_time_preference: Some(PrepTimePreference::EnjoysCooking),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Cook Big Batches",
                label: "Big Batch Cooking",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Engineer a batch cooking meal plan that maximizes food production efficiency through large-scale preparation",
                    "Design recipes yielding 8-12 servings that hold quality through freezer-stable storage",
                    "Build the plan around scalable base components that pivot into multiple distinct meals",
                    "Compress the week's cooking into one or two sessions through parallel processing",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(true),
                    ingredient_usage_percent: Some(75),
                    prep_time_preference: Some(PrepTimePreference::BatchCooking),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Baby-Friendly",
                label: "Baby-Friendly",
                nutrition_focus: "baby_nutrition",
                directives: &[
                    "Develop a meal progression plan for infants and toddlers following pediatric nutrition guidelines",
                    "Structure meals across texture stages from smooth purees to family foods with clear consistency notes",
                    "CRITICAL SAFETY: eliminate honey, added salt and sugar, whole nuts, and choking-risk foods",
                    "Emphasize iron bioavailability, DHA omega-3s, zinc, and vitamin D through strategic pairing",
                ],
                overrides: FilterOverrides {
                    variety_preference: Some(VarietyPreference::Moderate),
                    prep_time_preference: Some(PrepTimePreference::Minimal),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Young Kid-Friendly",
                label: "Kid-Friendly",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Create a meal plan for young children that pairs child development psychology with nutrition",
                    "Use sensory appeal: vibrant colors, playful shapes, interactive assembly, and textural variety",
                    "Keep flavors within pediatric preference windows with mild seasoning and natural sweetness",
                    "Embed vegetables through purees and grating while keeping base flavors recognizable",
                ],
                overrides: FilterOverrides {
                    variety_preference: Some(VarietyPreference::Moderate),
                    prep_time_preference: Some(PrepTimePreference::Moderate),
                    ..FilterOverrides::default()
                },
            },
        ]
    })
}

fn individual_goals() -> &'static [UnifiedGoal] {
    static GOALS: OnceLock<Vec<UnifiedGoal>> = OnceLock::new();
    GOALS.get_or_init(|| {
        vec![
            UnifiedGoal {
                value: "Save Money",
                label: "Save Money",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Create a cost-efficient single-person meal plan that maximizes nutrition per dollar",
                    "Use ingredients with long shelf stability and multiple use cases to prevent single-person waste",
                    "Rotate each purchased ingredient through 4-6 distinct recipes before it can spoil",
                    "Target low per-meal costs through bulk-to-portion conversion and seasonal pricing",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(true),
                    ingredient_usage_percent: Some(80),
                    budget_constraints: Some(BudgetTier::Low),
                    variety_preference: Some(VarietyPreference::Consistent),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Meal Prep",
                label: "Meal Prep",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Design a weekly meal prep plan that compresses the week's cooking into one session",
                    "Stage recipes by storage stability: fridge for days 1-4, freezer rotation for days 5-7",
                    "Create versatile base components transformable into multiple cuisines through seasoning",
                    "Keep daily assembly under 15 minutes from prepped components",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(true),
                    ingredient_usage_percent: Some(75),
                    prep_time_preference: Some(PrepTimePreference::BatchCooking),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Gain Muscle",
                label: "Gain Muscle",
                nutrition_focus: "muscle_gain",
                directives: &[
                    "Create high-protein meal plans for one person focusing on muscle growth",
                    "Each meal should contain 40-50g of protein minimum",
                    "Ensure total daily protein intake of 150-180g",
                    "Include post-workout meal timing suggestions",
                    "Balance protein with complex carbs and healthy fats for recovery",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(true),
                    ingredient_usage_percent: Some(60),
                    prep_time_preference: Some(PrepTimePreference::Moderate),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Lose Weight",
                label: "Lose Weight",
                nutrition_focus: "weight_loss",
                directives: &[
                    "Suggest calorie-conscious meals for one person with portion control",
                    "Focus on high-volume, low-calorie foods that promote satiety",
                    "Provide single-serving portions to prevent overeating",
                    "Emphasize protein and fiber for fullness",
                    "Avoid meal prep fatigue with variety",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(false),
                    ingredient_usage_percent: Some(60),
                    variety_preference: Some(VarietyPreference::HighVariety),
                    prep_time_preference: Some(PrepTimePreference::Minimal),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Eat Healthier",
                label: "Eat Healthier",
                nutrition_focus: "general_wellness",
                directives: &[
                    "Build a nutrition optimization plan that elevates dietary quality through whole foods",
                    "Maximize nutrient density per calorie with vegetables and bioavailable protein sources",
                    "Rotate weekly for broad micronutrient coverage without portion monotony",
                    "Balance nutritional ideals with practicality through 20-minute recipes and minimal prep",
                ],
                overrides: FilterOverrides {
                    encourage_overlap: Some(false),
                    ingredient_usage_percent: Some(50),
                    variety_preference: Some(VarietyPreference::HighVariety),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Energy & Performance",
                label: "Energy & Performance",
                nutrition_focus: "energy_performance",
                directives: &[
                    "Provide meal plans for one active person that boost energy",
                    "Support an active lifestyle with complex carbs and healthy fats",
                    "Time meals around workout and activity schedules",
                    "Include pre and post-workout nutrition guidance",
                    "Balance macronutrients for optimal performance",
                ],
                overrides: FilterOverrides {
                    ingredient_usage_percent: Some(60),
                    prep_time_preference: Some(PrepTimePreference::EnjoysCooking),
                    ..FilterOverrides::default()
                },
            },
            UnifiedGoal {
                value: "Digestive Health",
                label: "Digestive Health",
                nutrition_focus: "digestive_health",
                directives: &[
                    "Suggest meals for one person that are easy to digest",
                    "Include high fiber foods and fermented options",
                    "Support gut health while avoiding common irritants",
                    "Focus on anti-inflammatory foods with gentle cooking methods",
                    "Include probiotic and prebiotic rich options",
                ],
                overrides: FilterOverrides {
                    ingredient_usage_percent: Some(60),
                    variety_preference: Some(VarietyPreference::Moderate),
                    ..FilterOverrides::default()
                },
            },
        ]
    })
}

/// Goals applicable to the given profile type
#[must_use]
pub fn goals_for_profile_type(profile_type: Option<ProfileType>) -> Vec<&'static UnifiedGoal> {
    match profile_type {
        Some(ProfileType::Family) => family_goals().iter().collect(),
        Some(ProfileType::Individual) => individual_goals().iter().collect(),
        None => family_goals().iter().chain(individual_goals()).collect(),
    }
}

/// Look up a goal by value, case-insensitively, scoped to the profile type
#[must_use]
pub fn unified_goal(value: &str, profile_type: Option<ProfileType>) -> Option<&'static UnifiedGoal> {
    goals_for_profile_type(profile_type)
        .into_iter()
        .find(|goal| goal.value.eq_ignore_ascii_case(value))
}

/// Nutrition-focus tag for a primary goal, defaulting to general wellness
#[must_use]
pub fn nutrition_focus_for(primary_goal: &str) -> &'static str {
    unified_goal(primary_goal, None).map_or("general_wellness", |goal| goal.nutrition_focus)
}

/// Outcome of resolving a primary goal against the current filters
#[derive(Debug, Clone)]
pub struct GoalResolution {
    /// Directive block that opens the prompt
    pub prompt_fragment: String,
    /// Adjusted filters, returned as a new value; the input is untouched
    pub filters: MealPlanFilters,
}

/// Resolve the primary goal into directives and adjusted filters.
///
/// Unknown goal values fall back to balanced nutrition; this function
/// never fails. The caller's filters are never mutated; the adjusted
/// copy is returned in the resolution.
#[must_use]
pub fn resolve_goal(primary_goal: &str, filters: &MealPlanFilters) -> GoalResolution {
    let profile_type = Some(filters.profile_type);

    unified_goal(primary_goal, profile_type)
        .or_else(|| unified_goal(primary_goal, None))
        .map_or_else(
            || {
                debug!(goal = %primary_goal, "unknown primary goal, using balanced fallback");
                let overrides = FilterOverrides {
                    nutrition_focus: Some("general_wellness".to_string()),
                    ingredient_usage_percent: Some(60),
                    ..FilterOverrides::default()
                };
                GoalResolution {
                    prompt_fragment:
                        "Generate a balanced meal plan with practical nutrition".to_string(),
                    filters: overrides.apply(filters),
                }
            },
            |goal| {
                let mut fragment = String::new();
                if let Some((first, rest)) = goal.directives.split_first() {
                    fragment.push_str(first);
                    for directive in rest {
                        fragment.push_str("\n- ");
                        fragment.push_str(directive);
                    }
                }
                let overrides = FilterOverrides {
                    nutrition_focus: Some(goal.nutrition_focus.to_string()),
                    ..goal.overrides.clone()
                };
                GoalResolution {
                    prompt_fragment: fragment,
                    filters: overrides.apply(filters),
                }
            },
        )
}

/// Family dietary needs aggregated from member records
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FamilyDietaryNeeds {
    /// Unique preference tags across members
    pub preferences: Vec<String>,
    /// Preference tags that look like dietary restrictions
    pub restrictions: Vec<String>,
    /// Unique member goals
    pub goals: Vec<String>,
}

/// Aggregate preferences, embedded restrictions, and goals across members.
///
/// Restriction detection mirrors the profile store's tolerant matching:
/// any preference mentioning a known diet keyword, an allergy, or an
/// intolerance counts as a restriction.
#[must_use]
pub fn extract_family_dietary_needs(members: &[FamilyMember]) -> FamilyDietaryNeeds {
    const RESTRICTION_MARKERS: [&str; 10] = [
        "vegetarian",
        "vegan",
        "gluten-free",
        "dairy-free",
        "nut-free",
        "keto",
        "halal",
        "kosher",
        "allerg",
        "intoleran",
    ];

    let mut needs = FamilyDietaryNeeds::default();
    for member in members {
        for preference in &member.preferences {
            let trimmed = preference.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !needs.preferences.iter().any(|existing| existing == trimmed) {
                needs.preferences.push(trimmed.to_string());
            }
            let lower = trimmed.to_lowercase();
            if RESTRICTION_MARKERS
                .iter()
                .any(|marker| lower.contains(marker))
                && !needs.restrictions.iter().any(|existing| existing == trimmed)
            {
                needs.restrictions.push(trimmed.to_string());
            }
        }
        for goal in &member.goals {
            if !needs.goals.iter().any(|existing| existing == goal) {
                needs.goals.push(goal.clone());
            }
        }
    }
    needs
}

#[cfg(test)]
mod tests {
    use super::*;
    use remy_core::AgeGroup;

    #[test]
    fn weight_priority_tiers_match_thresholds() {
        assert_eq!(WeightPriority::from_weight(0.7), WeightPriority::VeryHigh);
        assert_eq!(WeightPriority::from_weight(0.69), WeightPriority::High);
        assert_eq!(WeightPriority::from_weight(0.5), WeightPriority::High);
        assert_eq!(WeightPriority::from_weight(0.3), WeightPriority::Moderate);
        assert_eq!(WeightPriority::from_weight(0.15), WeightPriority::Low);
        assert_eq!(WeightPriority::from_weight(0.1), WeightPriority::Minimal);
    }

    #[test]
    fn save_money_applies_overlap_overrides() {
        let filters = MealPlanFilters::new(5, 3, 45, 3.0);
        let resolution = resolve_goal("Save Money", &filters);

        assert!(resolution.filters.encourage_overlap);
        assert_eq!(resolution.filters.ingredient_usage_percent, Some(80));
        assert_eq!(
            resolution.filters.nutrition_focus.as_deref(),
            Some("general_wellness")
        );
        assert!(resolution.prompt_fragment.contains("cost-efficient"));
        // The caller's filters are untouched
        assert!(!filters.encourage_overlap);
    }

    #[test]
    fn unknown_goal_falls_back_to_balanced_nutrition() {
        let filters = MealPlanFilters::new(3, 2, 30, 2.0);
        let resolution = resolve_goal("Become a Wizard", &filters);
        assert!(resolution.prompt_fragment.contains("balanced"));
        assert_eq!(resolution.filters.ingredient_usage_percent, Some(60));
    }

    #[test]
    fn lookup_is_case_insensitive_and_profile_scoped() {
        assert!(unified_goal("save money", None).is_some());
        assert!(unified_goal("Gain Muscle", Some(ProfileType::Individual)).is_some());
        assert!(unified_goal("Gain Muscle", Some(ProfileType::Family)).is_none());
        assert_eq!(nutrition_focus_for("Lose Weight"), "weight_loss");
        assert_eq!(nutrition_focus_for("Unknown"), "general_wellness");
    }

    #[test]
    fn family_needs_detect_embedded_restrictions() {
        let members = vec![
            FamilyMember {
                name: "Maya".into(),
                age_group: AgeGroup::Adult,
                preferences: vec!["vegetarian".into(), "loves spicy food".into()],
                dietary_restrictions: vec![],
                goals: vec!["Eat Healthier".into()],
            },
            FamilyMember {
                name: "Sam".into(),
                age_group: AgeGroup::Child,
                preferences: vec!["peanut allergy".into(), "loves spicy food".into()],
                dietary_restrictions: vec![],
                goals: vec![],
            },
        ];

        let needs = extract_family_dietary_needs(&members);
        assert_eq!(needs.preferences.len(), 3);
        assert_eq!(
            needs.restrictions,
            vec!["vegetarian".to_string(), "peanut allergy".to_string()]
        );
        assert_eq!(needs.goals, vec!["Eat Healthier".to_string()]);
    }
}
