// ABOUTME: Weighted cultural meal ranking with greedy variety selection
// ABOUTME: Scores catalog candidates against the user's five priority weights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Cultural Meal Ranking Engine
//!
//! Scores candidate meals from the external cultural catalog against a
//! weighted user profile and returns a ranked, thresholded subset. The
//! variety component is order-dependent by design: the engine selects
//! greedily, re-scoring the remaining candidates' variety against the
//! already-selected set after every pick, so the result never degenerates
//! into five near-duplicate dishes.
//!
//! An empty result is a first-class outcome; the caller falls back to the
//! static per-culture suggestion list instead of erroring.

use crate::config::RankingConfig;
use crate::dietary::DietaryRuleEngine;
use async_trait::async_trait;
use rayon::prelude::*;
use remy_core::{AppResult, CulturalMeal, DietaryRestriction, GoalWeights};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};
use uuid::Uuid;

/// External cultural meal catalog boundary.
///
/// Implementations may be cached or stale; the engine tolerates empty
/// results and treats per-culture fetch failures as empty catalogs.
#[async_trait]
pub trait MealCatalogProvider: Send + Sync {
    /// Candidate meals for one culture tag
    async fn meals_for_culture(&self, culture: &str) -> AppResult<Vec<CulturalMeal>>;
}

/// Weighted profile the ranking pass scores against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserCulturalProfile {
    /// Preference weight per culture tag, 0.0-1.0
    pub cultural_preferences: BTreeMap<String, f64>,
    /// The user's five priority weights
    pub priority_weights: GoalWeights,
    /// Merged dietary restrictions, applied as hard candidate constraints
    pub dietary_restrictions: Vec<DietaryRestriction>,
}

/// Per-axis component scores for one candidate meal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ComponentScores {
    /// Authenticity weighted by the user's preference for the culture
    pub cultural_score: f64,
    /// Inverse ingredient cost proxy
    pub cost_score: f64,
    /// Protein density and macro balance
    pub health_score: f64,
    /// Inverse total time against the reference ceiling
    pub time_score: f64,
    /// Dissimilarity from already-selected meals
    pub variety_score: f64,
}

/// A scored candidate meal; ephemeral, recomputed per ranking request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealScore {
    /// The candidate meal
    pub meal: CulturalMeal,
    /// Component scores that built the total
    pub component_scores: ComponentScores,
    /// Weighted linear combination of the component scores
    pub total_score: f64,
}

struct BaseScored {
    meal: CulturalMeal,
    cultural: f64,
    cost: f64,
    health: f64,
    time: f64,
    insertion_order: usize,
}

/// Ranks cultural catalog meals against a weighted profile
pub struct CulturalMealRankingEngine {
    config: RankingConfig,
    dietary: DietaryRuleEngine,
}

impl Default for CulturalMealRankingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CulturalMealRankingEngine {
    /// Create an engine with the production configuration
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: RankingConfig::default(),
            dietary: DietaryRuleEngine::new(),
        }
    }

    /// Create an engine with substitute configuration (used by tests)
    #[must_use]
    pub const fn with_config(config: RankingConfig, dietary: DietaryRuleEngine) -> Self {
        Self { config, dietary }
    }

    /// Rank the user's cultural candidates and return the top subset.
    ///
    /// Every returned score satisfies `total_score >= relevance_threshold`
    /// and the result is sorted non-increasing by `total_score` (a property
    /// of the greedy selection: variety only shrinks as meals are picked).
    /// Ties break by authenticity descending, then catalog insertion order.
    pub async fn get_ranked_meals(
        &self,
        provider: &dyn MealCatalogProvider,
        user_id: Uuid,
        profile: &UserCulturalProfile,
        top_n: usize,
        relevance_threshold: f64,
    ) -> Vec<MealScore> {
        let mut candidates: Vec<(CulturalMeal, f64)> = Vec::new();

        // BTreeMap iteration keeps culture order stable across runs
        for (culture, preference) in &profile.cultural_preferences {
            match provider.meals_for_culture(culture).await {
                Ok(meals) => {
                    debug!(%user_id, culture = %culture, count = meals.len(), "fetched cultural candidates");
                    candidates.extend(meals.into_iter().map(|meal| (meal, *preference)));
                }
                Err(err) => {
                    warn!(%user_id, culture = %culture, error = %err, "catalog fetch failed, skipping culture");
                }
            }
        }

        // Hard constraints: non-compliant candidates never reach scoring
        let before = candidates.len();
        candidates.retain(|(meal, _)| {
            self.dietary
                .check_full_compliance(meal, &profile.dietary_restrictions)
        });
        if candidates.len() < before {
            debug!(
                %user_id,
                excluded = before - candidates.len(),
                "excluded dietary-non-compliant candidates"
            );
        }

        let base: Vec<BaseScored> = candidates
            .into_par_iter()
            .enumerate()
            .map(|(index, (meal, preference))| BaseScored {
                cultural: meal.authenticity_score.clamp(0.0, 1.0) * preference.clamp(0.0, 1.0),
                cost: self.cost_score(&meal),
                health: self.health_score(&meal),
                time: self.time_score(&meal),
                insertion_order: index,
                meal,
            })
            .collect();

        self.select_greedily(base, &profile.priority_weights, top_n, relevance_threshold)
    }

    /// Greedy selection loop: pick the best-scoring candidate, then
    /// re-score the remaining candidates' variety against the selection.
    fn select_greedily(
        &self,
        mut pool: Vec<BaseScored>,
        weights: &GoalWeights,
        top_n: usize,
        relevance_threshold: f64,
    ) -> Vec<MealScore> {
        let mut selected: Vec<MealScore> = Vec::new();

        while selected.len() < top_n && !pool.is_empty() {
            let mut best: Option<(usize, ComponentScores, f64)> = None;

            for (index, candidate) in pool.iter().enumerate() {
                let variety = variety_score(&candidate.meal, &selected);
                let components = ComponentScores {
                    cultural_score: candidate.cultural,
                    cost_score: candidate.cost,
                    health_score: candidate.health,
                    time_score: candidate.time,
                    variety_score: variety,
                };
                let total = weights.cultural * components.cultural_score
                    + weights.cost * components.cost_score
                    + weights.health * components.health_score
                    + weights.time * components.time_score
                    + weights.variety * components.variety_score;

                let better = match &best {
                    None => true,
                    Some((best_index, _, best_total)) => {
                        total > *best_total
                            || ((total - best_total).abs() < f64::EPSILON
                                && Self::wins_tie(candidate, &pool[*best_index]))
                    }
                };
                if better {
                    best = Some((index, components, total));
                }
            }

            let Some((index, components, total)) = best else {
                break;
            };
            // The per-round maximum is non-increasing, so once it drops
            // below the threshold nothing later can qualify.
            if total < relevance_threshold {
                break;
            }
            let candidate = pool.swap_remove(index);
            selected.push(MealScore {
                meal: candidate.meal,
                component_scores: components,
                total_score: total,
            });
        }

        selected
    }

    fn wins_tie(candidate: &BaseScored, incumbent: &BaseScored) -> bool {
        if (candidate.meal.authenticity_score - incumbent.meal.authenticity_score).abs()
            > f64::EPSILON
        {
            return candidate.meal.authenticity_score > incumbent.meal.authenticity_score;
        }
        candidate.insertion_order < incumbent.insertion_order
    }

    /// Inverse cost proxy: fewer, more common ingredients score higher
    fn cost_score(&self, meal: &CulturalMeal) -> f64 {
        let count_component =
            1.0 - (meal.ingredients.len() as f64 / self.config.ingredient_count_norm).min(1.0);
        let rare_hits = meal
            .ingredients
            .iter()
            .filter(|ingredient| {
                let lower = ingredient.to_lowercase();
                self.config
                    .rare_ingredients
                    .iter()
                    .any(|rare| lower.contains(rare.as_str()))
            })
            .count();
        let rarity_component = if meal.ingredients.is_empty() {
            1.0
        } else {
            1.0 - (rare_hits as f64 / meal.ingredients.len() as f64).min(1.0)
        };
        let weight = self.config.cost_count_weight;
        (count_component * weight + rarity_component * (1.0 - weight)).clamp(0.0, 1.0)
    }

    /// Protein density blended with macro balance against generic targets
    fn health_score(&self, meal: &CulturalMeal) -> f64 {
        let protein_component =
            (meal.nutrition.protein_g / self.config.protein_norm_g).clamp(0.0, 1.0);

        let (protein_share, carb_share, fat_share) = meal.nutrition.macro_shares();
        let (target_protein, target_carb, target_fat) = self.config.macro_targets;
        let distance = (protein_share - target_protein).abs()
            + (carb_share - target_carb).abs()
            + (fat_share - target_fat).abs();
        // Worst-case share distance is 2.0
        let balance_component = (1.0 - distance / 2.0).clamp(0.0, 1.0);

        let weight = self.config.health_protein_weight;
        (protein_component * weight + balance_component * (1.0 - weight)).clamp(0.0, 1.0)
    }

    /// Inverse total time against the reference ceiling
    fn time_score(&self, meal: &CulturalMeal) -> f64 {
        let total = f64::from(meal.estimated_prep_time + meal.estimated_cook_time);
        (1.0 - total / self.config.time_ceiling_minutes).clamp(0.0, 1.0)
    }

}

/// Dissimilarity from the already-selected meals.
///
/// 1.0 for the first pick; afterwards one minus the highest Jaccard
/// overlap of ingredients-and-techniques with any selected meal.
fn variety_score(meal: &CulturalMeal, selected: &[MealScore]) -> f64 {
    if selected.is_empty() {
        return 1.0;
    }
    let candidate_set = feature_set(meal);
    let max_overlap = selected
        .iter()
        .map(|score| jaccard(&candidate_set, &feature_set(&score.meal)))
        .fold(0.0_f64, f64::max);
    (1.0 - max_overlap).clamp(0.0, 1.0)
}

fn feature_set(meal: &CulturalMeal) -> HashSet<String> {
    meal.ingredients
        .iter()
        .chain(meal.cooking_techniques.iter())
        .map(|item| item.to_lowercase())
        .collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count() as f64;
    let union = a.union(b).count() as f64;
    intersection / union
}
