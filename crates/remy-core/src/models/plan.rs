// ABOUTME: Typed parse target for the LLM's structured meal plan response
// ABOUTME: Defines PlannedMeal, MealType, and the dietary validation metadata block
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

use super::meal::MealNutrition;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Meal slot within a day, in serving order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    /// First meal of the day
    Breakfast,
    /// Midday meal
    Lunch,
    /// Evening meal
    Dinner,
    /// First snack slot
    Snack,
    /// Second snack slot
    SecondSnack,
}

impl MealType {
    /// All slots in serving order; `meals_per_day` selects a prefix
    pub const ALL: [Self; 5] = [
        Self::Breakfast,
        Self::Lunch,
        Self::Dinner,
        Self::Snack,
        Self::SecondSnack,
    ];

    /// JSON object key for this slot
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
            Self::Snack => "snack",
            Self::SecondSnack => "second_snack",
        }
    }

    /// The first `count` meal slots, capped at the five known slots
    #[must_use]
    pub fn slots(count: usize) -> &'static [Self] {
        &Self::ALL[..count.min(Self::ALL.len())]
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-meal time breakdown the prompt asks the LLM to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TimeBreakdown {
    /// Preparation minutes
    pub prep_minutes: u32,
    /// Active cooking minutes
    pub active_minutes: u32,
    /// Passive minutes (oven, simmer, rest)
    pub passive_minutes: u32,
    /// Total minutes
    pub total_minutes: u32,
}

/// One meal from the parsed LLM response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedMeal {
    /// Recipe title
    pub title: String,
    /// Total time in minutes (prep + cook)
    pub cook_time_minutes: u32,
    /// Difficulty rating, 1.0-5.0 in 0.5 increments after repair
    pub difficulty: f64,
    /// Ingredient list with amounts
    #[serde(default)]
    pub ingredients: Vec<String>,
    /// Ordered preparation steps
    #[serde(default)]
    pub instructions: Vec<String>,
    /// Per-serving nutrition
    #[serde(default)]
    pub nutrition: MealNutrition,
    /// Optional structured time breakdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_breakdown: Option<TimeBreakdown>,
    /// Notes appended when the adaptation engine repairs the meal
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adaptation_notes: Vec<String>,
}

/// One meal found non-compliant during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MealViolation {
    /// Day key, e.g. "day_2"
    pub day: String,
    /// Meal slot key, e.g. "dinner"
    pub meal_type: String,
    /// Restriction label that failed
    pub restriction: String,
    /// Offending ingredient text, when keyword-attributable
    #[serde(default)]
    pub offending: Vec<String>,
}

/// Dietary validation metadata attached to a plan after validation.
///
/// Advisory: compliance below the caller's threshold never drops meals;
/// the caller decides whether to adapt, regenerate, or surface a warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DietaryValidation {
    /// Percentage of meals compliant with every restriction, 0-100
    pub compliance_score: f64,
    /// Number of fully compliant meals
    pub compliant_meals: u32,
    /// Total meals checked
    pub total_meals: u32,
    /// Per-meal violations
    #[serde(default)]
    pub violations: Vec<MealViolation>,
    /// When the plan was validated
    #[serde(default = "Utc::now")]
    pub validated_at: DateTime<Utc>,
}

/// Parsed structured response from the LLM completion service.
///
/// The caller owns JSON parsing; this type is the already-parsed shape the
/// validator consumes. Day keys map to meal-slot keys to meals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealPlanResponse {
    /// Day key ("day_1"…) to meal-slot key to meal
    pub meal_plan: BTreeMap<String, BTreeMap<String, PlannedMeal>>,
    /// Consolidated shopping list
    #[serde(default)]
    pub shopping_list: Vec<String>,
    /// Preparation tips
    #[serde(default)]
    pub prep_tips: Vec<String>,
    /// Estimated savings from ingredient overlap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_savings: Option<f64>,
    /// Validation metadata attached by the response validator
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_validation: Option<DietaryValidation>,
}

impl MealPlanResponse {
    /// Total number of meals across all days
    #[must_use]
    pub fn meal_count(&self) -> usize {
        self.meal_plan.values().map(BTreeMap::len).sum()
    }

    /// Iterate (day key, meal-slot key, meal) in deterministic order
    pub fn meals(&self) -> impl Iterator<Item = (&str, &str, &PlannedMeal)> {
        self.meal_plan.iter().flat_map(|(day, slots)| {
            slots
                .iter()
                .map(move |(slot, meal)| (day.as_str(), slot.as_str(), meal))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn meal_type_slots_select_a_prefix() {
        assert_eq!(MealType::slots(2), &[MealType::Breakfast, MealType::Lunch]);
        assert_eq!(MealType::slots(9).len(), 5);
    }

    #[test]
    fn parses_llm_response_shape() {
        let raw = json!({
            "meal_plan": {
                "day_1": {
                    "breakfast": {
                        "title": "Oatmeal",
                        "cook_time_minutes": 10,
                        "difficulty": 1.0,
                        "ingredients": ["oats", "milk"],
                        "instructions": ["Simmer oats in milk."],
                        "nutrition": {"calories": 300.0, "protein_g": 10.0, "carbs_g": 50.0, "fat_g": 6.0}
                    }
                }
            },
            "shopping_list": ["oats"],
            "prep_tips": []
        });

        let parsed: MealPlanResponse =
            serde_json::from_value(raw).expect("response shape should parse");
        assert_eq!(parsed.meal_count(), 1);
        let (day, slot, meal) = parsed.meals().next().expect("one meal");
        assert_eq!(day, "day_1");
        assert_eq!(slot, "breakfast");
        assert_eq!(meal.title, "Oatmeal");
    }
}
