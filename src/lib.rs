// ABOUTME: Main library entry point for the Remy meal intelligence platform
// ABOUTME: Composes goal resolution, prompt construction, ranking, and validation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

#![deny(unsafe_code)]

//! # Remy Planner
//!
//! Weight-based meal-plan prompt construction and validation. The library
//! takes a structured set of competing objectives (cost, health, cultural
//! authenticity, variety, time) plus hard dietary constraints, resolves
//! them into one natural-language instruction set for an LLM completion
//! service, and validates/repairs the structured JSON response for
//! compliance with the original constraints.
//!
//! ## Pipeline
//!
//! 1. **Goal resolution** ([`goals`]) merges the categorical primary goal
//!    with the continuous priority weights into directives and filter
//!    adjustments.
//! 2. **Ranking** (`remy_intelligence::ranking`) scores candidate cultural
//!    meals against the weighted profile.
//! 3. **Prompt construction** ([`prompts`]) composes one deterministic
//!    prompt string with an embedded JSON schema example.
//! 4. An external caller sends the prompt to the LLM and parses the JSON
//!    reply into [`remy_core::MealPlanResponse`].
//! 5. **Validation** ([`validation`]) enforces day count, repairs
//!    difficulty ratings, and scores dietary compliance; the adaptation
//!    engine repairs near-miss meals or signals fallback to generation.
//!
//! The library performs no I/O of its own: the cultural meal catalog, the
//! LLM completion service, and the profile store are external
//! collaborators specified at the boundary. Every request owns its filters
//! and weights, so concurrent plan generations share no mutable state.

/// Primary-goal lookup table and weight-priority tiers
pub mod goals;
/// High-level facade wiring the pipeline together
pub mod planner;
/// Deterministic prompt template engine
pub mod prompts;
/// Post-generation response validation and repair
pub mod validation;

pub use goals::{resolve_goal, GoalResolution, UnifiedGoal, WeightPriority};
pub use planner::{
    MealRepairOutcome, PlanRepairOutcome, PlanRequest, PreparedPrompt, WeightBasedMealPlanner,
};
pub use prompts::{PromptTemplateData, PromptTemplateEngine};
pub use validation::{ComplianceReport, DifficultyAdjustment, ResponseValidator, ValidatedPlan};

pub use remy_core;
pub use remy_intelligence;
