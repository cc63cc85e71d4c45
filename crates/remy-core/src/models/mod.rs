// ABOUTME: Domain model module for the Remy meal intelligence platform
// ABOUTME: Groups meal, profile, restriction, filter, and plan-response types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! Core data models shared across the planning pipeline.

/// Aggregate request configuration threaded through prompt construction
pub mod filters;
/// Cultural meal and nutrition records
pub mod meal;
/// Typed parse target for the LLM's structured JSON response
pub mod plan;
/// User, family member, and goal-weight types
pub mod profile;
/// Dietary restriction vocabulary
pub mod restriction;
