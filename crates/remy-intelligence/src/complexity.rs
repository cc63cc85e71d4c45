// ABOUTME: Deterministic recipe complexity scoring and cooking time estimation
// ABOUTME: Three-factor difficulty model with skill-bound time multipliers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Complexity & Timing Estimator
//!
//! Scores a recipe's difficulty on a 1-5 scale (0.5 increments) from three
//! structural factors (technique complexity, ingredient count, and timing
//! precision) and estimates total time as prep + active + passive minutes,
//! where only the skill-bound prep and active buckets are scaled by the
//! difficulty multiplier (oven and simmer time is physics-bound).
//!
//! Estimation is advisory, not load-bearing: degenerate inputs produce the
//! minimum-complexity defaults instead of errors.

use crate::config::ComplexityConfig;
use remy_core::MealType;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Structural inputs to the complexity score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeComplexityFactors {
    /// Hardest technique used, 1.0-5.0
    pub technique_complexity: f64,
    /// Number of ingredients
    pub ingredient_count: usize,
    /// Equipment the recipe requires
    #[serde(default)]
    pub equipment_required: Vec<String>,
    /// Whether timing errors ruin the dish
    pub timing_critical: bool,
    /// Whether the recipe has multiple coordinated stages
    pub multi_step: bool,
    /// Skills the recipe demands
    #[serde(default)]
    pub skill_required: Vec<String>,
}

impl Default for RecipeComplexityFactors {
    fn default() -> Self {
        Self {
            technique_complexity: 1.0,
            ingredient_count: 0,
            equipment_required: Vec::new(),
            timing_critical: false,
            multi_step: false,
            skill_required: Vec::new(),
        }
    }
}

/// Prep-work minutes by activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PrepWork {
    /// Chopping and knife work
    pub chopping: u32,
    /// Marinating (counted as prep, not passive, because it must be staged)
    pub marinating: u32,
    /// Mixing, breading, and assembly
    pub mixing: u32,
    /// Equipment setup and staging
    pub setup: u32,
}

/// Active cooking minutes by activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActiveTime {
    /// Hands-on cooking
    pub cooking: u32,
    /// Attentive monitoring
    pub monitoring: u32,
}

/// Passive minutes by activity, never scaled by skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PassiveTime {
    /// Oven time
    pub baking: u32,
    /// Simmering
    pub simmering: u32,
    /// Resting
    pub resting: u32,
}

/// Structured time inputs for a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CookingTimeFactors {
    /// Preparation work
    pub prep_work: PrepWork,
    /// Active cooking
    pub active_time: ActiveTime,
    /// Passive waiting
    pub passive_time: PassiveTime,
}

impl CookingTimeFactors {
    const fn prep_minutes(&self) -> u32 {
        self.prep_work.chopping
            + self.prep_work.marinating
            + self.prep_work.mixing
            + self.prep_work.setup
    }

    const fn active_minutes(&self) -> u32 {
        self.active_time.cooking + self.active_time.monitoring
    }

    const fn passive_minutes(&self) -> u32 {
        self.passive_time.baking + self.passive_time.simmering + self.passive_time.resting
    }
}

/// Computed time estimate for a recipe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEstimate {
    /// Total minutes
    pub total_time: u32,
    /// Scaled prep minutes
    pub prep_time: u32,
    /// Scaled active minutes
    pub active_time: u32,
    /// Unscaled passive minutes
    pub passive_time: u32,
}

/// Techniques found in recipe text with their average complexity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechniqueAnalysis {
    /// Technique names in discovery order
    pub techniques: Vec<String>,
    /// Mean complexity of the found techniques, 1.0 when none found
    pub avg_complexity: f64,
}

/// Descriptor for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DifficultyLevel {
    /// Level score, 1.0-5.0
    pub score: f64,
    /// Human-readable description
    pub description: &'static str,
    /// Time multiplier applied to skill-bound work at this level
    pub time_multiplier: f64,
}

/// Deterministic complexity and timing estimator
#[derive(Debug, Clone, Default)]
pub struct ComplexityEstimator {
    config: ComplexityConfig,
}

impl ComplexityEstimator {
    /// Create an estimator with the production tables
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an estimator with substitute tables (used by tests)
    #[must_use]
    pub const fn with_config(config: ComplexityConfig) -> Self {
        Self { config }
    }

    /// Compute the 1-5 complexity score (0.5 increments) from factors.
    ///
    /// The score is the mean of three sub-scores: technique complexity,
    /// the ingredient-count bucket, and timing precision.
    #[must_use]
    pub fn calculate_complexity(&self, factors: &RecipeComplexityFactors) -> f64 {
        let technique = factors.technique_complexity.clamp(1.0, 5.0);
        let ingredients = Self::ingredient_count_score(factors.ingredient_count);
        let timing = Self::timing_precision_score(factors.timing_critical, factors.multi_step);

        let mean = (technique + ingredients + timing) / 3.0;
        round_to_half(mean).clamp(1.0, 5.0)
    }

    /// Ingredient-count bucket: ≤3→1, 4-6→2, 7-10→3, 11-15→4, >15→5
    #[must_use]
    pub const fn ingredient_count_score(count: usize) -> f64 {
        match count {
            0..=3 => 1.0,
            4..=6 => 2.0,
            7..=10 => 3.0,
            11..=15 => 4.0,
            _ => 5.0,
        }
    }

    const fn timing_precision_score(timing_critical: bool, multi_step: bool) -> f64 {
        1.0 + if timing_critical { 2.0 } else { 0.0 } + if multi_step { 2.0 } else { 0.0 }
    }

    /// Multiplier applied to skill-bound time at the given complexity.
    ///
    /// Complexity 1 ⇒ ×1.0, complexity 5 ⇒ ×1.4. Fractional levels
    /// interpolate linearly.
    #[must_use]
    pub fn difficulty_multiplier(&self, complexity: f64) -> f64 {
        1.0 + (complexity.clamp(1.0, 5.0) - 1.0) * self.config.multiplier_per_level
    }

    /// Total-time estimate with the difficulty multiplier applied to the
    /// prep and active buckets only. Passive time passes through unscaled.
    #[must_use]
    pub fn calculate_total_time(
        &self,
        factors: &CookingTimeFactors,
        complexity: f64,
    ) -> TimeEstimate {
        let multiplier = self.difficulty_multiplier(complexity);
        let prep_time = scale_minutes(factors.prep_minutes(), multiplier);
        let active_time = scale_minutes(factors.active_minutes(), multiplier);
        let passive_time = factors.passive_minutes();
        TimeEstimate {
            total_time: prep_time + active_time + passive_time,
            prep_time,
            active_time,
            passive_time,
        }
    }

    /// Scan recipe text for known techniques.
    ///
    /// Ingredients contribute a knife-work signal: four or more whole
    /// ingredients imply chopping even when no technique verb names it.
    #[must_use]
    pub fn analyze_techniques(&self, text: &str, ingredients: &[String]) -> TechniqueAnalysis {
        let lower = text.to_lowercase();
        let mut techniques: Vec<String> = Vec::new();
        let mut total = 0.0;

        for (name, score) in &self.config.technique_scores {
            if lower.contains(name.as_str()) && !techniques.contains(name) {
                techniques.push(name.clone());
                total += score;
            }
        }

        if ingredients.len() >= 4 && !techniques.iter().any(|t| t == "knife work") {
            techniques.push("knife work".to_string());
            total += 2.0;
        }

        let avg_complexity = if techniques.is_empty() {
            1.0
        } else {
            total / techniques.len() as f64
        };

        TechniqueAnalysis {
            techniques,
            avg_complexity,
        }
    }

    /// Estimate complexity factors from free recipe text.
    ///
    /// Degenerate input (no ingredients and no instructions) returns the
    /// minimum-complexity defaults rather than erroring.
    #[must_use]
    pub fn estimate_factors_from_text(
        &self,
        description: &str,
        ingredients: &[String],
        instructions: &[String],
    ) -> RecipeComplexityFactors {
        if ingredients.is_empty() && instructions.is_empty() {
            debug!("degenerate recipe text, using minimum-complexity defaults");
            return RecipeComplexityFactors::default();
        }

        let corpus = {
            let mut text = description.to_lowercase();
            for step in instructions {
                text.push(' ');
                text.push_str(&step.to_lowercase());
            }
            text
        };

        let analysis = self.analyze_techniques(&corpus, ingredients);
        let timing_critical = self
            .config
            .time_critical_verbs
            .iter()
            .any(|verb| corpus.contains(verb.as_str()));
        let multi_step = instructions.len() >= self.config.multi_step_instruction_threshold
            || analysis.techniques.len() >= self.config.multi_step_technique_threshold;

        RecipeComplexityFactors {
            technique_complexity: analysis.avg_complexity.clamp(1.0, 5.0),
            ingredient_count: ingredients.len(),
            equipment_required: Vec::new(),
            timing_critical,
            multi_step,
            skill_required: analysis.techniques,
        }
    }

    /// Estimate structured time factors from free recipe text
    #[must_use]
    pub fn estimate_time_factors(
        &self,
        description: &str,
        ingredients: &[String],
        instructions: &[String],
        meal_type: MealType,
    ) -> CookingTimeFactors {
        if ingredients.is_empty() && instructions.is_empty() {
            return Self::base_time_factors(meal_type, 1.0);
        }

        let corpus = {
            let mut text = description.to_lowercase();
            for step in instructions {
                text.push(' ');
                text.push_str(&step.to_lowercase());
            }
            text
        };

        // Roughly 1.5 minutes of knife work per choppable ingredient
        let choppable = ingredients
            .iter()
            .filter(|ingredient| needs_chopping(&ingredient.to_lowercase()))
            .count() as u32;
        let chopping = choppable * 3 / 2;

        let marinating = if corpus.contains("marinate") { 30 } else { 0 };
        let mixing = if corpus.contains("mix") || corpus.contains("whisk") || corpus.contains("bread")
        {
            5
        } else {
            2
        };
        let setup = 3;

        let cooking = (instructions.len() as u32 * 3).max(5);
        let monitoring = if corpus.contains("stir") || corpus.contains("flip") {
            5
        } else {
            2
        };

        let baking = if corpus.contains("bake") || corpus.contains("roast") {
            25
        } else {
            0
        };
        let simmering = if corpus.contains("simmer") { 15 } else { 0 };
        let resting = if corpus.contains("rest") { 5 } else { 0 };

        CookingTimeFactors {
            prep_work: PrepWork {
                chopping,
                marinating,
                mixing,
                setup,
            },
            active_time: ActiveTime {
                cooking,
                monitoring,
            },
            passive_time: PassiveTime {
                baking,
                simmering,
                resting,
            },
        }
    }

    /// Reference time factors for a meal slot at the given complexity.
    ///
    /// Used when a meal has no recipe text to estimate from.
    #[must_use]
    pub fn base_time_factors(meal_type: MealType, complexity: f64) -> CookingTimeFactors {
        let level = complexity.clamp(1.0, 5.0) as u32;
        let (chopping, cooking, passive) = match meal_type {
            MealType::Breakfast => (2, 8, 0),
            MealType::Lunch => (4, 12, 0),
            MealType::Dinner => (6, 15, 10),
            MealType::Snack | MealType::SecondSnack => (1, 4, 0),
        };
        CookingTimeFactors {
            prep_work: PrepWork {
                chopping: chopping + level,
                marinating: 0,
                mixing: 2,
                setup: 2,
            },
            active_time: ActiveTime {
                cooking: cooking + level * 2,
                monitoring: level,
            },
            passive_time: PassiveTime {
                baking: passive,
                simmering: 0,
                resting: 0,
            },
        }
    }

    /// Descriptor for the difficulty level containing `score`
    #[must_use]
    pub fn difficulty_level(&self, score: f64) -> DifficultyLevel {
        let level = score.clamp(1.0, 5.0).floor();
        let description = match level as u32 {
            1 => "Simple assembly and reheating, minimal knife work",
            2 => "Basic methods (sauté, boil, bake) with simple timing",
            3 => "Multiple methods combined, moderate prep and coordination",
            4 => "Advanced techniques with multi-step timing coordination",
            _ => "Professional-level techniques with precise timing control",
        };
        DifficultyLevel {
            score: level,
            description,
            time_multiplier: self.difficulty_multiplier(level),
        }
    }
}

/// Round to the nearest 0.5 increment
fn round_to_half(value: f64) -> f64 {
    (value * 2.0).round() / 2.0
}

fn scale_minutes(minutes: u32, multiplier: f64) -> u32 {
    (f64::from(minutes) * multiplier).round() as u32
}

fn needs_chopping(ingredient: &str) -> bool {
    const WHOLE_PRODUCE: [&str; 12] = [
        "onion", "garlic", "carrot", "celery", "pepper", "tomato", "potato", "mushroom", "herb",
        "cabbage", "squash", "shallot",
    ];
    WHOLE_PRODUCE.iter().any(|item| ingredient.contains(item))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn factors(
        technique: f64,
        count: usize,
        timing_critical: bool,
        multi_step: bool,
    ) -> RecipeComplexityFactors {
        RecipeComplexityFactors {
            technique_complexity: technique,
            ingredient_count: count,
            equipment_required: Vec::new(),
            timing_critical,
            multi_step,
            skill_required: Vec::new(),
        }
    }

    #[test]
    fn simple_recipe_scores_near_minimum() {
        let estimator = ComplexityEstimator::new();
        let score = estimator.calculate_complexity(&factors(1.0, 3, false, false));
        assert!((1.0..=1.5).contains(&score));
    }

    #[test]
    fn elaborate_recipe_scores_near_maximum() {
        let estimator = ComplexityEstimator::new();
        let score = estimator.calculate_complexity(&factors(5.0, 12, true, true));
        assert!(score >= 4.5);
    }

    #[test]
    fn complexity_is_deterministic_half_stepped_and_bounded() {
        let estimator = ComplexityEstimator::new();
        let input = factors(3.0, 8, true, false);
        let first = estimator.calculate_complexity(&input);
        let second = estimator.calculate_complexity(&input);
        assert!((first - second).abs() < f64::EPSILON);
        assert!((first * 2.0).fract().abs() < f64::EPSILON);
        assert!((1.0..=5.0).contains(&first));
    }

    #[test]
    fn passive_time_is_never_scaled() {
        let estimator = ComplexityEstimator::new();
        let time = CookingTimeFactors {
            prep_work: PrepWork {
                chopping: 5,
                marinating: 0,
                mixing: 3,
                setup: 2,
            },
            active_time: ActiveTime {
                cooking: 10,
                monitoring: 3,
            },
            passive_time: PassiveTime {
                baking: 20,
                simmering: 0,
                resting: 5,
            },
        };
        let easy = estimator.calculate_total_time(&time, 1.0);
        let hard = estimator.calculate_total_time(&time, 5.0);

        assert_eq!(easy.passive_time, 25);
        assert_eq!(hard.passive_time, 25);
        assert!(hard.prep_time > easy.prep_time);
        assert!(hard.active_time > easy.active_time);
        // complexity 5 scales skill-bound work by 1.4
        assert_eq!(hard.prep_time, 14);
        assert_eq!(hard.active_time, 18);
    }

    #[test]
    fn text_estimation_detects_timing_critical_verbs() {
        let estimator = ComplexityEstimator::new();
        let ingredients: Vec<String> =
            ["onion", "garlic", "white wine", "butter"].map(String::from).to_vec();
        let instructions: Vec<String> = [
            "Sauté onions until golden.",
            "Add wine to deglaze, then simmer until reduced by half.",
        ]
        .map(String::from)
        .to_vec();

        let estimated = estimator.estimate_factors_from_text(
            "Pan sauce with reduction",
            &ingredients,
            &instructions,
        );
        assert!(estimated.timing_critical);
        assert_eq!(estimated.ingredient_count, 4);
        assert!(estimated.technique_complexity > 1.0);
    }

    #[test]
    fn degenerate_input_returns_minimum_defaults() {
        let estimator = ComplexityEstimator::new();
        let estimated = estimator.estimate_factors_from_text("", &[], &[]);
        assert!((estimator.calculate_complexity(&estimated) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn time_estimation_from_text_fills_all_buckets() {
        let estimator = ComplexityEstimator::new();
        let ingredients: Vec<String> = ["onion", "garlic", "tomatoes", "spaghetti"]
            .map(String::from)
            .to_vec();
        let instructions: Vec<String> = [
            "Chop onion and garlic.",
            "Sauté onion in oil, then add tomatoes and simmer 15 minutes.",
            "Mix the sauce into the cooked spaghetti.",
        ]
        .map(String::from)
        .to_vec();

        let factors = estimator.estimate_time_factors(
            "Spaghetti with marinara sauce",
            &ingredients,
            &instructions,
            MealType::Dinner,
        );
        assert!(factors.prep_work.chopping > 0);
        assert!(factors.active_time.cooking > 0);
        assert_eq!(factors.passive_time.simmering, 15);

        let estimate = estimator.calculate_total_time(&factors, 2.0);
        assert_eq!(
            estimate.total_time,
            estimate.prep_time + estimate.active_time + estimate.passive_time
        );
    }

    #[test]
    fn base_time_factors_scale_with_meal_slot() {
        let snack = ComplexityEstimator::base_time_factors(MealType::Snack, 2.0);
        let dinner = ComplexityEstimator::base_time_factors(MealType::Dinner, 2.0);
        let estimator = ComplexityEstimator::new();
        assert!(
            estimator.calculate_total_time(&dinner, 2.0).total_time
                > estimator.calculate_total_time(&snack, 2.0).total_time
        );
    }

    #[test]
    fn difficulty_levels_have_increasing_multipliers() {
        let estimator = ComplexityEstimator::new();
        let mut last = 0.0;
        for score in 1..=5 {
            let level = estimator.difficulty_level(f64::from(score));
            assert!(level.time_multiplier > last);
            last = level.time_multiplier;
        }
        assert!((estimator.difficulty_level(5.0).time_multiplier - 1.4).abs() < 1e-9);
    }
}
