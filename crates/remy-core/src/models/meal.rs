// ABOUTME: Cultural meal and nutrition data models
// ABOUTME: Defines CulturalMeal and MealNutrition used by ranking and adaptation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

use serde::{Deserialize, Serialize};

/// Macro nutrition for a single meal (per serving)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MealNutrition {
    /// Total calories per serving
    pub calories: f64,
    /// Protein in grams per serving
    pub protein_g: f64,
    /// Carbohydrates in grams per serving
    pub carbs_g: f64,
    /// Fat in grams per serving
    pub fat_g: f64,
}

impl MealNutrition {
    /// Create nutrition values from the four macro fields
    #[must_use]
    pub const fn new(calories: f64, protein_g: f64, carbs_g: f64, fat_g: f64) -> Self {
        Self {
            calories,
            protein_g,
            carbs_g,
            fat_g,
        }
    }

    /// Calorie share of each macro as (protein, carbs, fat) fractions.
    ///
    /// Protein and carbs contribute 4 cal/g, fat 9 cal/g. Returns an even
    /// split when the computed calorie total is zero.
    #[must_use]
    pub fn macro_shares(&self) -> (f64, f64, f64) {
        let protein_cal = self.protein_g * 4.0;
        let carb_cal = self.carbs_g * 4.0;
        let fat_cal = self.fat_g * 9.0;
        let total = protein_cal + carb_cal + fat_cal;
        if total <= 0.0 {
            return (1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0);
        }
        (protein_cal / total, carb_cal / total, fat_cal / total)
    }
}

/// A candidate meal from a cultural cuisine catalog.
///
/// Fetched from the external catalog provider and treated as immutable
/// within a ranking pass; adaptation produces a modified copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CulturalMeal {
    /// Dish name
    pub name: String,
    /// Culture tag this meal belongs to (e.g. "Peruvian")
    pub culture: String,
    /// Ingredient list, free text per entry
    pub ingredients: Vec<String>,
    /// Ordered preparation steps
    pub instructions: Vec<String>,
    /// Cooking techniques used (e.g. "stir-frying")
    pub cooking_techniques: Vec<String>,
    /// Per-serving nutrition
    pub nutrition: MealNutrition,
    /// How closely the meal matches traditional preparation, 0.0-1.0
    pub authenticity_score: f64,
    /// Total cook time in minutes as listed in the catalog
    pub cook_time_minutes: u32,
    /// Estimated preparation time in minutes
    pub estimated_prep_time: u32,
    /// Estimated active cooking time in minutes
    pub estimated_cook_time: u32,
    /// Notes appended when the adaptation engine modifies the meal
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub adaptation_notes: Vec<String>,
}

impl CulturalMeal {
    /// Create a meal with empty component lists and zeroed nutrition
    #[must_use]
    pub fn new(name: impl Into<String>, culture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            culture: culture.into(),
            ingredients: Vec::new(),
            instructions: Vec::new(),
            cooking_techniques: Vec::new(),
            nutrition: MealNutrition::default(),
            authenticity_score: 0.0,
            cook_time_minutes: 0,
            estimated_prep_time: 0,
            estimated_cook_time: 0,
            adaptation_notes: Vec::new(),
        }
    }

    /// Set the ingredient list
    #[must_use]
    pub fn with_ingredients(mut self, ingredients: Vec<String>) -> Self {
        self.ingredients = ingredients;
        self
    }

    /// Set the instruction steps
    #[must_use]
    pub fn with_instructions(mut self, instructions: Vec<String>) -> Self {
        self.instructions = instructions;
        self
    }

    /// Set the cooking techniques
    #[must_use]
    pub fn with_techniques(mut self, techniques: Vec<String>) -> Self {
        self.cooking_techniques = techniques;
        self
    }

    /// Set per-serving nutrition
    #[must_use]
    pub const fn with_nutrition(mut self, nutrition: MealNutrition) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Set the authenticity score
    #[must_use]
    pub const fn with_authenticity(mut self, score: f64) -> Self {
        self.authenticity_score = score;
        self
    }

    /// Set catalog timing estimates (total, prep, active cook) in minutes
    #[must_use]
    pub const fn with_timing(mut self, total: u32, prep: u32, cook: u32) -> Self {
        self.cook_time_minutes = total;
        self.estimated_prep_time = prep;
        self.estimated_cook_time = cook;
        self
    }

    /// Concatenated lowercase ingredient and instruction text.
    ///
    /// This is the corpus every keyword-based dietary rule scans.
    #[must_use]
    pub fn searchable_text(&self) -> String {
        let mut text = String::new();
        for part in self.ingredients.iter().chain(self.instructions.iter()) {
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(&part.to_lowercase());
        }
        text
    }
}
