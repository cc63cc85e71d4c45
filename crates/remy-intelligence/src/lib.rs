// ABOUTME: Meal intelligence algorithms, scoring, and adaptation engines
// ABOUTME: Extracted from the main crate for parallel compilation and modularity
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

#![deny(unsafe_code)]

//! # Remy Intelligence
//!
//! Scoring and repair engines for the meal planning pipeline:
//!
//! - **dietary**: keyword-based compliance rules and restriction merging
//! - **complexity**: deterministic difficulty and timing estimation
//! - **ranking**: weighted cultural meal ranking with greedy variety selection
//! - **adaptation**: single-pass dietary repair preserving authenticity
//! - **conflict**: dietary/cultural conflict detection for prompt guidance
//! - **hero**: cost-driven hero ingredient selection
//!
//! All engines are pure computation over owned data; the only async surface
//! is the external [`ranking::MealCatalogProvider`] boundary.

/// Single-pass meal adaptation for dietary compliance
pub mod adaptation;
/// Deterministic recipe complexity and timing estimation
pub mod complexity;
/// Injected configuration tables for all engines
pub mod config;
/// Dietary/cultural conflict detection for prompt guidance
pub mod conflict;
/// Keyword-based dietary compliance rules
pub mod dietary;
/// Hero ingredient selection for cost optimization
pub mod hero;
/// Weighted cultural meal ranking
pub mod ranking;

pub use adaptation::{AdaptationResult, MealAdaptationEngine, MealModification, ModificationKind};
pub use complexity::{
    ComplexityEstimator, CookingTimeFactors, DifficultyLevel, RecipeComplexityFactors,
    TechniqueAnalysis, TimeEstimate,
};
pub use config::{
    AdaptationConfig, ComplexityConfig, DietaryRuleConfig, IntelligenceConfig, RankingConfig,
};
pub use conflict::{find_conflicts, DishConflict};
pub use dietary::{merge_restrictions, DietaryRuleEngine};
pub use hero::select_hero_ingredients;
pub use ranking::{
    ComponentScores, CulturalMealRankingEngine, MealCatalogProvider, MealScore,
    UserCulturalProfile,
};
