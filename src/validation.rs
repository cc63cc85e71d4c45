// ABOUTME: Post-generation validation and repair of the LLM's meal plan response
// ABOUTME: Fatal day-count check, difficulty rounding repair, and compliance scoring
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Response Validator/Repair
//!
//! Enforces the structural contract of the LLM's JSON response after the
//! caller has parsed it:
//!
//! - **Day count** must match the request exactly. A mismatch is fatal:
//!   the caller discards and regenerates; fabricating missing days is out
//!   of scope for this validator.
//! - **Difficulty** out of bounds is repaired in place: rounded to the
//!   nearest 0.5, then clamped to the ceiling, with each adjustment
//!   logged.
//! - **Dietary compliance** below the warning threshold is advisory: the
//!   validator attaches a `dietary_validation` metadata block and never
//!   silently drops meals.
//!
//! Timing and difficulty cross-checks against the complexity estimator
//! are collected as advisory warnings in the report.

use chrono::Utc;
use remy_core::{
    AppError, AppResult, CulturalMeal, DietaryValidation, MealNutrition, MealPlanFilters,
    MealPlanResponse, MealViolation, PlannedMeal,
};
use remy_intelligence::{ComplexityEstimator, DietaryRuleEngine};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Compliance percentage below which a warning is logged
const COMPLIANCE_WARNING_THRESHOLD: f64 = 80.0;

/// Difficulty deviation above which a cross-check advisory is emitted
const DIFFICULTY_DEVIATION_LIMIT: f64 = 1.0;

/// One in-place difficulty repair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAdjustment {
    /// Day key
    pub day: String,
    /// Meal slot key
    pub meal_type: String,
    /// Difficulty as returned by the LLM
    pub from: f64,
    /// Difficulty after rounding and clamping
    pub to: f64,
}

/// Everything the validator learned about a plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceReport {
    /// Dietary compliance summary (also attached to the plan)
    pub dietary: DietaryValidation,
    /// Difficulty repairs applied
    pub difficulty_adjustments: Vec<DifficultyAdjustment>,
    /// Advisory findings (time ceiling, difficulty estimate deviation)
    pub advisories: Vec<String>,
}

/// A validated plan with its repaired content and report
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedPlan {
    /// The repaired plan, with `dietary_validation` metadata attached
    pub plan: MealPlanResponse,
    /// What the validator found and fixed
    pub report: ComplianceReport,
}

/// Validator for parsed LLM meal plan responses
#[derive(Debug, Clone, Default)]
pub struct ResponseValidator {
    dietary: DietaryRuleEngine,
    complexity: ComplexityEstimator,
}

impl ResponseValidator {
    /// Create a validator with the production rule tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with substitute engines (used by tests)
    #[must_use]
    pub const fn with_engines(dietary: DietaryRuleEngine, complexity: ComplexityEstimator) -> Self {
        Self {
            dietary,
            complexity,
        }
    }

    /// Validate and repair a parsed response.
    ///
    /// Consumes the response by value and returns the repaired copy; the
    /// caller's original is never aliased. The only fatal outcome is a
    /// day-count mismatch.
    pub fn validate_and_repair(
        &self,
        mut response: MealPlanResponse,
        filters: &MealPlanFilters,
    ) -> AppResult<ValidatedPlan> {
        let day_count = response.meal_plan.len();
        if day_count != filters.num_days {
            return Err(AppError::day_count_mismatch(filters.num_days, day_count));
        }

        let difficulty_adjustments = Self::repair_difficulties(&mut response, filters);
        let dietary = self.score_compliance(&response, filters);
        let advisories = self.cross_check(&response, filters);

        if dietary.compliance_score < COMPLIANCE_WARNING_THRESHOLD {
            warn!(
                compliance = dietary.compliance_score,
                restrictions = filters.dietary_restrictions.len(),
                "meal plan below dietary compliance threshold"
            );
        } else {
            info!(
                compliance = dietary.compliance_score,
                "meal plan passed dietary validation"
            );
        }

        response.dietary_validation = Some(dietary.clone());

        Ok(ValidatedPlan {
            plan: response,
            report: ComplianceReport {
                dietary,
                difficulty_adjustments,
                advisories,
            },
        })
    }

    /// Round every difficulty to the nearest 0.5 and clamp to the ceiling
    fn repair_difficulties(
        response: &mut MealPlanResponse,
        filters: &MealPlanFilters,
    ) -> Vec<DifficultyAdjustment> {
        let mut adjustments = Vec::new();
        for (day, slots) in &mut response.meal_plan {
            for (meal_type, meal) in slots.iter_mut() {
                let rounded = (meal.difficulty * 2.0).round() / 2.0;
                let repaired = rounded.min(filters.max_difficulty);
                if (repaired - meal.difficulty).abs() > f64::EPSILON {
                    info!(
                        day = %day,
                        meal_type = %meal_type,
                        from = meal.difficulty,
                        to = repaired,
                        "adjusted meal difficulty"
                    );
                    adjustments.push(DifficultyAdjustment {
                        day: day.clone(),
                        meal_type: meal_type.clone(),
                        from: meal.difficulty,
                        to: repaired,
                    });
                    meal.difficulty = repaired;
                }
            }
        }
        adjustments
    }

    /// Per-meal, per-restriction compliance scoring
    fn score_compliance(
        &self,
        response: &MealPlanResponse,
        filters: &MealPlanFilters,
    ) -> DietaryValidation {
        let mut compliant = 0_u32;
        let mut total = 0_u32;
        let mut violations = Vec::new();

        for (day, meal_type, meal) in response.meals() {
            total += 1;
            let probe = planned_meal_probe(meal);
            let mut meal_compliant = true;
            for restriction in &filters.dietary_restrictions {
                if self.dietary.is_compliant(&probe, restriction) {
                    continue;
                }
                meal_compliant = false;
                violations.push(MealViolation {
                    day: day.to_string(),
                    meal_type: meal_type.to_string(),
                    restriction: restriction.label().to_string(),
                    offending: self.dietary.violations(&probe, restriction),
                });
            }
            if meal_compliant {
                compliant += 1;
            }
        }

        let compliance_score = if total == 0 {
            100.0
        } else {
            100.0 * f64::from(compliant) / f64::from(total)
        };

        DietaryValidation {
            compliance_score,
            compliant_meals: compliant,
            total_meals: total,
            violations,
            validated_at: Utc::now(),
        }
    }

    /// Advisory cross-checks: time ceiling and difficulty plausibility
    fn cross_check(&self, response: &MealPlanResponse, filters: &MealPlanFilters) -> Vec<String> {
        let mut advisories = Vec::new();
        for (day, meal_type, meal) in response.meals() {
            if meal.cook_time_minutes > filters.max_cook_time {
                advisories.push(format!(
                    "{day}/{meal_type}: cook time {}min exceeds limit {}min",
                    meal.cook_time_minutes, filters.max_cook_time
                ));
            }

            if meal.ingredients.is_empty() && meal.instructions.is_empty() {
                continue;
            }
            let estimated_factors = self.complexity.estimate_factors_from_text(
                &meal.title,
                &meal.ingredients,
                &meal.instructions,
            );
            let estimated = self.complexity.calculate_complexity(&estimated_factors);
            if (estimated - meal.difficulty).abs() > DIFFICULTY_DEVIATION_LIMIT {
                advisories.push(format!(
                    "{day}/{meal_type}: stated difficulty {} deviates from estimated {estimated}",
                    meal.difficulty
                ));
            }
        }
        advisories
    }
}

/// View a planned meal as a `CulturalMeal` for the rule engines
#[must_use]
pub fn planned_meal_probe(meal: &PlannedMeal) -> CulturalMeal {
    CulturalMeal::new(meal.title.clone(), "")
        .with_ingredients(meal.ingredients.clone())
        .with_instructions(meal.instructions.clone())
        .with_nutrition(MealNutrition::new(
            meal.nutrition.calories,
            meal.nutrition.protein_g,
            meal.nutrition.carbs_g,
            meal.nutrition.fat_g,
        ))
        .with_timing(meal.cook_time_minutes, 0, meal.cook_time_minutes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use remy_core::DietaryRestriction;
    use std::collections::BTreeMap;

    fn planned(title: &str, difficulty: f64, ingredients: &[&str]) -> PlannedMeal {
        PlannedMeal {
            title: title.to_string(),
            cook_time_minutes: 30,
            difficulty,
            ingredients: ingredients.iter().map(ToString::to_string).collect(),
            instructions: vec!["Cook everything together.".to_string()],
            nutrition: MealNutrition::new(400.0, 20.0, 40.0, 15.0),
            time_breakdown: None,
            adaptation_notes: Vec::new(),
        }
    }

    fn response(days: &[(&str, Vec<(&str, PlannedMeal)>)]) -> MealPlanResponse {
        let meal_plan = days
            .iter()
            .map(|(day, slots)| {
                let slot_map: BTreeMap<String, PlannedMeal> = slots
                    .iter()
                    .map(|(slot, meal)| ((*slot).to_string(), meal.clone()))
                    .collect();
                ((*day).to_string(), slot_map)
            })
            .collect();
        MealPlanResponse {
            meal_plan,
            shopping_list: Vec::new(),
            prep_tips: Vec::new(),
            estimated_savings: None,
            dietary_validation: None,
        }
    }

    #[test]
    fn day_count_mismatch_is_fatal() {
        let validator = ResponseValidator::new();
        let filters = MealPlanFilters::new(3, 1, 45, 3.0);
        let plan = response(&[
            ("day_1", vec![("dinner", planned("Stew", 2.0, &["beans"]))]),
            ("day_2", vec![("dinner", planned("Soup", 2.0, &["peas"]))]),
        ]);

        let err = validator
            .validate_and_repair(plan, &filters)
            .expect_err("two days against three requested must fail");
        assert!(err.code.requires_regeneration());
    }

    #[test]
    fn difficulty_is_rounded_then_clamped() {
        let validator = ResponseValidator::new();
        let filters = MealPlanFilters::new(1, 2, 45, 3.0);
        let plan = response(&[(
            "day_1",
            vec![
                ("breakfast", planned("Pancakes", 3.7, &["oats"])),
                ("lunch", planned("Salad", 2.24, &["lettuce"])),
            ],
        )]);

        let validated = validator
            .validate_and_repair(plan, &filters)
            .expect("day count matches");

        for (_, _, meal) in validated.plan.meals() {
            assert!(meal.difficulty <= 3.0);
            assert!(((meal.difficulty * 2.0).fract()).abs() < f64::EPSILON);
        }
        // 3.7 rounds to 3.5 then clamps to 3.0; 2.24 rounds to 2.0
        assert_eq!(validated.report.difficulty_adjustments.len(), 2);
        assert!((validated.report.difficulty_adjustments[0].to - 3.0).abs() < f64::EPSILON);
        assert!((validated.report.difficulty_adjustments[1].to - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn compliance_metadata_is_attached_not_fatal() {
        let validator = ResponseValidator::new();
        let mut filters = MealPlanFilters::new(1, 2, 45, 3.0);
        filters.dietary_restrictions = vec![DietaryRestriction::Vegetarian];
        let plan = response(&[(
            "day_1",
            vec![
                ("breakfast", planned("Bacon Hash", 2.0, &["bacon", "potato"])),
                ("lunch", planned("Bean Bowl", 2.0, &["beans", "rice"])),
            ],
        )]);

        let validated = validator
            .validate_and_repair(plan, &filters)
            .expect("low compliance is advisory, not fatal");

        let dietary = validated
            .plan
            .dietary_validation
            .as_ref()
            .expect("metadata attached");
        assert!((dietary.compliance_score - 50.0).abs() < f64::EPSILON);
        assert_eq!(dietary.compliant_meals, 1);
        assert_eq!(dietary.total_meals, 2);
        assert_eq!(validated.report.dietary.violations.len(), 1);
        assert_eq!(validated.report.dietary.violations[0].offending, vec!["bacon"]);
    }

    #[test]
    fn cook_time_overruns_become_advisories() {
        let validator = ResponseValidator::new();
        let filters = MealPlanFilters::new(1, 1, 20, 3.0);
        let plan = response(&[(
            "day_1",
            vec![("dinner", planned("Braise", 3.0, &["carrots"]))],
        )]);

        let validated = validator
            .validate_and_repair(plan, &filters)
            .expect("time overrun is advisory");
        assert!(validated
            .report
            .advisories
            .iter()
            .any(|advisory| advisory.contains("cook time 30min exceeds limit 20min")));
    }
}
