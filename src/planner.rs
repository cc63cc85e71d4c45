// ABOUTME: High-level facade wiring goal resolution, ranking, prompts, and repair
// ABOUTME: One request in, one prompt out; one parsed response in, one repaired plan out
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Weight-Based Meal Planner
//!
//! The facade the HTTP layer calls. `build_meal_plan_request` resolves the
//! effective weights and restrictions, runs the cultural ranking pass, and
//! produces the final prompt string; after the external LLM call, the
//! caller parses the JSON and hands it to `repair_plan`, which validates
//! the structure and runs the adaptation engine over non-compliant meals.
//!
//! Every request owns its filters and weights; nothing here is shared
//! mutable state, so concurrent plan generations need no synchronization.

use crate::goals::resolve_goal;
use crate::prompts::{PromptTemplateData, PromptTemplateEngine};
use crate::validation::{planned_meal_probe, ComplianceReport, ResponseValidator};
use remy_core::{
    AppError, AppResult, DietaryRestriction, GoalWeights, MealPlanFilters, MealPlanResponse,
    UserProfile,
};
use remy_intelligence::config::SubstitutionRules;
use remy_intelligence::ranking::{
    CulturalMealRankingEngine, MealCatalogProvider, UserCulturalProfile,
};
use remy_intelligence::{
    conflict, hero, ComplexityEstimator, DietaryRuleEngine, IntelligenceConfig,
    MealAdaptationEngine, MealScore,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// How many ranked meals feed the prompt
const RANKED_MEALS_TOP_N: usize = 10;

/// Minimum total score a ranked meal must reach to be used
const RANKED_MEALS_THRESHOLD: f64 = 0.7;

/// One plan-generation request as received from the caller
#[derive(Debug, Clone)]
pub struct PlanRequest {
    /// Requesting user
    pub user_id: Uuid,
    /// Request-level filters (day count, ceilings, restrictions, ...)
    pub filters: MealPlanFilters,
    /// Request-level goal weights, when the client sent any
    pub goal_weights: Option<GoalWeights>,
    /// Stored profile, when one exists
    pub profile: Option<UserProfile>,
}

/// Prompt plus the effective configuration that produced it
#[derive(Debug, Clone)]
pub struct PreparedPrompt {
    /// The prompt string to send to the LLM completion service
    pub prompt: String,
    /// Filters after goal resolution and restriction merging
    pub effective_filters: MealPlanFilters,
    /// The ranked meals that informed the prompt
    pub ranked_meals: Vec<MealScore>,
}

/// Outcome of adapting one non-compliant meal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRepairOutcome {
    /// Day key
    pub day: String,
    /// Meal slot key
    pub meal_type: String,
    /// Whether adaptation succeeded and the meal was replaced in place
    pub adapted: bool,
    /// Whether the caller must request a freshly generated meal
    pub needs_regeneration: bool,
    /// Notes from the adaptation engine
    pub notes: Vec<String>,
}

/// Repaired plan plus per-meal adaptation outcomes
#[derive(Debug, Clone)]
pub struct PlanRepairOutcome {
    /// The repaired plan
    pub plan: MealPlanResponse,
    /// Validation report (difficulty repairs, compliance, advisories)
    pub report: ComplianceReport,
    /// Per-meal adaptation outcomes for meals that failed compliance
    pub meal_repairs: Vec<MealRepairOutcome>,
}

/// Facade composing the planning pipeline
pub struct WeightBasedMealPlanner {
    catalog: Arc<dyn MealCatalogProvider>,
    ranking: CulturalMealRankingEngine,
    adaptation: MealAdaptationEngine,
    validator: ResponseValidator,
    templates: PromptTemplateEngine,
    dietary: DietaryRuleEngine,
    substitutions: SubstitutionRules,
}

impl WeightBasedMealPlanner {
    /// Create a planner over the given catalog provider
    #[must_use]
    pub fn new(catalog: Arc<dyn MealCatalogProvider>) -> Self {
        Self::with_config(catalog, IntelligenceConfig::default())
    }

    /// Create a planner with substitute intelligence tables (used by tests)
    #[must_use]
    pub fn with_config(catalog: Arc<dyn MealCatalogProvider>, config: IntelligenceConfig) -> Self {
        let dietary = DietaryRuleEngine::with_config(config.dietary);
        let substitutions = config.adaptation.substitutions.clone();
        Self {
            catalog,
            ranking: CulturalMealRankingEngine::with_config(config.ranking, dietary.clone()),
            adaptation: MealAdaptationEngine::with_config(config.adaptation, dietary.clone()),
            validator: ResponseValidator::with_engines(
                dietary.clone(),
                ComplexityEstimator::with_config(config.complexity),
            ),
            templates: PromptTemplateEngine::new(),
            dietary,
            substitutions,
        }
    }

    /// Build the prompt for one plan-generation request.
    ///
    /// Resolves weights (request > profile > defaults), merges dietary
    /// restrictions as a union across request, targeted family members,
    /// and profile, resolves the primary goal into directives and filter
    /// overrides, selects hero ingredients when the cost weight warrants
    /// them, runs the cultural ranking pass, and renders the template.
    pub async fn build_meal_plan_request(&self, request: &PlanRequest) -> AppResult<PreparedPrompt> {
        if request.filters.num_days == 0 || request.filters.meals_per_day == 0 {
            return Err(AppError::invalid_input(
                "num_days and meals_per_day must be at least 1",
            ));
        }
        let profile = request.profile.as_ref();

        let goal_weights = GoalWeights::resolve(
            request.goal_weights,
            profile.and_then(|profile| profile.goal_weights),
        );

        let restrictions = Self::merged_restrictions(request);
        let cultural_background = if request.filters.cultural_background.is_empty() {
            profile.map(|profile| profile.cultural_background.clone()).unwrap_or_default()
        } else {
            request.filters.cultural_background.clone()
        };

        let primary_goal = request
            .filters
            .primary_goal
            .clone()
            .or_else(|| profile.and_then(|profile| profile.primary_goal.clone()))
            .unwrap_or_else(|| "Save Money".to_string());

        // Goal resolution returns a new filters value; the request stays intact
        let resolution = resolve_goal(&primary_goal, &request.filters);
        let mut effective = resolution.filters;
        effective.goal_weights = goal_weights;
        effective.dietary_restrictions = restrictions.clone();
        effective.cultural_background = cultural_background.clone();
        effective.primary_goal = Some(primary_goal.clone());

        effective.hero_ingredients = hero::select_hero_ingredients(
            &cultural_background,
            &effective.available_ingredients,
            goal_weights.cost,
            &restrictions,
            &self.dietary,
        );

        let ranked_meals = if cultural_background.is_empty() {
            Vec::new()
        } else {
            let cultural_profile = Self::cultural_profile(&cultural_background, goal_weights, &restrictions);
            self.ranking
                .get_ranked_meals(
                    self.catalog.as_ref(),
                    request.user_id,
                    &cultural_profile,
                    RANKED_MEALS_TOP_N,
                    RANKED_MEALS_THRESHOLD,
                )
                .await
        };
        info!(
            user_id = %request.user_id,
            ranked = ranked_meals.len(),
            cultures = cultural_background.len(),
            "ranking pass complete"
        );

        let conflict_guidance = conflict::find_conflicts(
            &cultural_background,
            &restrictions,
            self.dietary.config(),
            &self.substitutions,
        );

        let template_data = PromptTemplateData {
            meal_plan_days: effective.num_days,
            meals_per_day: effective.meals_per_day,
            max_cook_time: effective.max_cook_time,
            max_difficulty: effective.max_difficulty,
            primary_goal,
            nutrition_goal: effective
                .nutrition_focus
                .clone()
                .unwrap_or_else(|| "general_wellness".to_string()),
            goal_weights,
            cultural_background,
            ranked_meals: ranked_meals.clone(),
            dietary_restrictions: restrictions,
            hero_ingredients: effective.hero_ingredients.clone(),
            conflict_guidance,
        };
        let prompt = self.templates.generate_prompt(&template_data);

        Ok(PreparedPrompt {
            prompt,
            effective_filters: effective,
            ranked_meals,
        })
    }

    /// Validate the parsed LLM response and adapt non-compliant meals.
    ///
    /// Day-count mismatch propagates as the fatal error. Meals that fail
    /// compliance go through one adaptation pass each; successes are
    /// replaced in place, failures are surfaced as `needs_regeneration`
    /// so the caller can request fresh meals for those slots.
    pub fn repair_plan(
        &self,
        response: MealPlanResponse,
        filters: &MealPlanFilters,
    ) -> AppResult<PlanRepairOutcome> {
        let validated = self.validator.validate_and_repair(response, filters)?;
        let mut plan = validated.plan;
        let report = validated.report;

        // Group violations by (day, meal slot) so each meal adapts once
        let mut failing: BTreeMap<(String, String), ()> = BTreeMap::new();
        for violation in &report.dietary.violations {
            failing.insert((violation.day.clone(), violation.meal_type.clone()), ());
        }

        let culture = filters
            .cultural_background
            .first()
            .cloned()
            .unwrap_or_default();
        let mut meal_repairs = Vec::new();

        for (day, meal_type) in failing.into_keys() {
            let Some(meal) = plan
                .meal_plan
                .get_mut(&day)
                .and_then(|slots| slots.get_mut(&meal_type))
            else {
                continue;
            };

            let mut probe = planned_meal_probe(meal);
            probe.culture.clone_from(&culture);
            let result = self.adaptation.adapt_meal_if_needed(
                &probe,
                &filters.dietary_restrictions,
                &filters.goal_weights,
            );

            if result.success {
                debug!(day = %day, meal_type = %meal_type, "meal adapted in place");
                meal.ingredients.clone_from(&result.adapted_meal.ingredients);
                meal.instructions.clone_from(&result.adapted_meal.instructions);
                meal.nutrition = result.adapted_meal.nutrition;
                meal.adaptation_notes.clone_from(&result.adapted_meal.adaptation_notes);
            }
            meal_repairs.push(MealRepairOutcome {
                day,
                meal_type,
                adapted: result.success,
                needs_regeneration: result.fallback_to_generation,
                notes: result.adaptation_notes,
            });
        }

        Ok(PlanRepairOutcome {
            plan,
            report,
            meal_repairs,
        })
    }

    /// Union of request, targeted-member, and profile restrictions.
    ///
    /// When the plan targets specific members, only those members'
    /// restrictions join the union; request-level restrictions always
    /// apply regardless of targeting.
    fn merged_restrictions(request: &PlanRequest) -> Vec<DietaryRestriction> {
        let member_labels: Vec<String> = request.profile.as_ref().map_or_else(Vec::new, |profile| {
            let targeted = request.filters.targets_specific_members();
            let members: Vec<_> = profile
                .members
                .iter()
                .filter(|member| {
                    !targeted
                        || request
                            .filters
                            .plan_targets
                            .iter()
                            .any(|target| target == &member.name)
                })
                .cloned()
                .collect();

            // Older profiles embed restrictions inside member preferences
            let embedded = crate::goals::extract_family_dietary_needs(&members).restrictions;
            members
                .iter()
                .flat_map(|member| member.dietary_restrictions.iter().cloned())
                .chain(embedded)
                .collect()
        });
        let member_restrictions: Vec<DietaryRestriction> = member_labels
            .iter()
            .map(|label| DietaryRestriction::from_label(label))
            .collect();

        let profile_restrictions: Vec<DietaryRestriction> =
            request.profile.as_ref().map_or_else(Vec::new, |profile| {
                profile
                    .dietary_restrictions
                    .iter()
                    .map(|label| DietaryRestriction::from_label(label))
                    .collect()
            });

        remy_intelligence::merge_restrictions(
            &request.filters.dietary_restrictions,
            &member_restrictions,
            &profile_restrictions,
        )
    }

    fn cultural_profile(
        cultural_background: &[String],
        goal_weights: GoalWeights,
        restrictions: &[DietaryRestriction],
    ) -> UserCulturalProfile {
        let cultural_preferences: BTreeMap<String, f64> = cultural_background
            .iter()
            .map(|culture| (culture.clone(), 1.0))
            .collect();
        UserCulturalProfile {
            cultural_preferences,
            priority_weights: goal_weights,
            dietary_restrictions: restrictions.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use remy_core::{CulturalMeal, FamilyMember, MealNutrition};

    struct EmptyCatalog;

    #[async_trait]
    impl MealCatalogProvider for EmptyCatalog {
        async fn meals_for_culture(&self, _culture: &str) -> AppResult<Vec<CulturalMeal>> {
            Ok(Vec::new())
        }
    }

    fn request() -> PlanRequest {
        PlanRequest {
            user_id: Uuid::new_v4(),
            filters: MealPlanFilters::new(3, 2, 45, 3.0),
            goal_weights: None,
            profile: None,
        }
    }

    #[tokio::test]
    async fn zero_day_request_is_rejected() {
        let planner = WeightBasedMealPlanner::new(Arc::new(EmptyCatalog));
        let mut req = request();
        req.filters.num_days = 0;
        let err = planner
            .build_meal_plan_request(&req)
            .await
            .expect_err("zero days is malformed input");
        assert_eq!(err.code, remy_core::ErrorCode::InvalidInput);
    }

    #[tokio::test]
    async fn empty_catalog_still_produces_a_prompt() {
        let planner = WeightBasedMealPlanner::new(Arc::new(EmptyCatalog));
        let mut req = request();
        req.filters.cultural_background = vec!["Peruvian".to_string()];

        let prepared = planner
            .build_meal_plan_request(&req)
            .await
            .expect("prompt generation never depends on catalog availability");

        assert!(prepared.ranked_meals.is_empty());
        // Fallback suggestion list takes the ranked-meals slot
        assert!(prepared.prompt.contains("TOP-RANKED PERUVIAN MEALS"));
        assert!(prepared.prompt.contains("Lomo Saltado"));
    }

    #[tokio::test]
    async fn member_targeting_unions_restrictions() {
        let planner = WeightBasedMealPlanner::new(Arc::new(EmptyCatalog));
        let mut req = request();
        req.filters.dietary_restrictions = vec![DietaryRestriction::NutFree];
        req.filters.plan_targets = vec!["Maya".to_string()];
        req.profile = Some(UserProfile {
            profile_name: "Family".into(),
            members: vec![
                FamilyMember {
                    name: "Maya".into(),
                    age_group: remy_core::AgeGroup::Adult,
                    preferences: vec![],
                    dietary_restrictions: vec!["vegan".into()],
                    goals: vec![],
                },
                FamilyMember {
                    name: "Sam".into(),
                    age_group: remy_core::AgeGroup::Adult,
                    preferences: vec![],
                    dietary_restrictions: vec!["keto".into()],
                    goals: vec![],
                },
            ],
            ..UserProfile::default()
        });

        let prepared = planner
            .build_meal_plan_request(&req)
            .await
            .expect("builds");

        let restrictions = &prepared.effective_filters.dietary_restrictions;
        assert!(restrictions.contains(&DietaryRestriction::NutFree));
        assert!(restrictions.contains(&DietaryRestriction::Vegan));
        // Sam is not targeted, so keto never joins the union
        assert!(!restrictions.contains(&DietaryRestriction::Keto));
    }

    #[tokio::test]
    async fn request_weights_override_profile_weights() {
        let planner = WeightBasedMealPlanner::new(Arc::new(EmptyCatalog));
        let mut req = request();
        req.goal_weights = Some(GoalWeights {
            cost: 0.9,
            ..GoalWeights::default()
        });
        req.profile = Some(UserProfile {
            goal_weights: Some(GoalWeights {
                cost: 0.1,
                ..GoalWeights::default()
            }),
            ..UserProfile::default()
        });

        let prepared = planner.build_meal_plan_request(&req).await.expect("builds");
        assert!((prepared.effective_filters.goal_weights.cost - 0.9).abs() < f64::EPSILON);
        // cost 0.9 activates hero ingredient selection
        assert!(!prepared.effective_filters.hero_ingredients.is_empty());
    }

    #[test]
    fn repair_plan_adapts_noncompliant_meals() {
        let planner = WeightBasedMealPlanner::new(Arc::new(EmptyCatalog));
        let mut filters = MealPlanFilters::new(1, 1, 45, 3.0);
        filters.dietary_restrictions = vec![DietaryRestriction::Vegetarian];
        filters.cultural_background = vec!["Indian".to_string()];

        let meal = remy_core::PlannedMeal {
            title: "Chicken Curry".into(),
            cook_time_minutes: 40,
            difficulty: 2.5,
            ingredients: vec!["chicken thighs".into(), "garam masala".into(), "rice".into()],
            instructions: vec!["Simmer the chicken thighs in sauce.".into()],
            nutrition: MealNutrition::new(600.0, 35.0, 45.0, 20.0),
            time_breakdown: None,
            adaptation_notes: Vec::new(),
        };
        let mut slots = BTreeMap::new();
        slots.insert("dinner".to_string(), meal);
        let mut meal_plan = BTreeMap::new();
        meal_plan.insert("day_1".to_string(), slots);
        let response = MealPlanResponse {
            meal_plan,
            shopping_list: Vec::new(),
            prep_tips: Vec::new(),
            estimated_savings: None,
            dietary_validation: None,
        };

        let outcome = planner.repair_plan(response, &filters).expect("one day as requested");

        assert_eq!(outcome.meal_repairs.len(), 1);
        let repair = &outcome.meal_repairs[0];
        assert!(repair.adapted, "notes: {:?}", repair.notes);
        assert!(!repair.needs_regeneration);
        let repaired_meal = &outcome.plan.meal_plan["day_1"]["dinner"];
        assert!(!repaired_meal
            .ingredients
            .iter()
            .any(|ingredient| ingredient.to_lowercase().contains("chicken")));
        assert!(!repaired_meal.adaptation_notes.is_empty());
    }
}
