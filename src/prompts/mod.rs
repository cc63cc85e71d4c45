// ABOUTME: Deterministic prompt template engine loaded at compile time
// ABOUTME: Fills named placeholders with goal, weight, ranking, and schema sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Prompt Template Engine
//!
//! Composes the final LLM prompt from a fixed template with named
//! placeholders, loaded at compile time from a markdown asset. The engine
//! is a pure function of its input: equal `PromptTemplateData` produces
//! byte-identical prompts. Every placeholder is always substituted;
//! sections with no data render an explicit "none" sentinel rather than
//! disappearing, because downstream JSON-schema completeness depends on
//! the LLM seeing every structural block.

use crate::goals::{unified_goal, WeightPriority};
use remy_core::{DietaryRestriction, GoalWeights, MealType};
use remy_intelligence::conflict::DishConflict;
use remy_intelligence::MealScore;
use std::collections::BTreeMap;
use tracing::debug;

/// Master template with `{PLACEHOLDER}` tokens
const MEAL_PLAN_TEMPLATE: &str = include_str!("meal_plan_template.md");

/// Everything the template engine needs to render one prompt
#[derive(Debug, Clone)]
pub struct PromptTemplateData {
    /// Number of days the plan must cover
    pub meal_plan_days: usize,
    /// Meals per day
    pub meals_per_day: usize,
    /// Per-meal total time ceiling in minutes
    pub max_cook_time: u32,
    /// Per-meal difficulty ceiling
    pub max_difficulty: f64,
    /// Categorical primary goal
    pub primary_goal: String,
    /// Nutrition-focus tag
    pub nutrition_goal: String,
    /// Effective goal weights
    pub goal_weights: GoalWeights,
    /// Cultural background tags
    pub cultural_background: Vec<String>,
    /// Ranked meals from the cultural ranking pass (may be empty)
    pub ranked_meals: Vec<MealScore>,
    /// Merged dietary restrictions
    pub dietary_restrictions: Vec<DietaryRestriction>,
    /// Selected hero ingredients (may be empty)
    pub hero_ingredients: Vec<String>,
    /// Dietary/cultural conflicts with suggested alternatives
    pub conflict_guidance: Vec<DishConflict>,
}

/// Deterministic template substitution engine
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptTemplateEngine;

impl PromptTemplateEngine {
    /// Create the engine
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Render the prompt. Pure; no I/O, no clock, no randomness.
    #[must_use]
    pub fn generate_prompt(&self, data: &PromptTemplateData) -> String {
        let replacements: [(&str, String); 15] = [
            ("{MAIN_GOAL_PROMPT}", Self::main_goal_prompt(&data.primary_goal)),
            ("{MEAL_PLAN_DAYS}", data.meal_plan_days.to_string()),
            ("{MEALS_PER_DAY}", data.meals_per_day.to_string()),
            ("{DYNAMIC_WEIGHTS_LIST}", Self::weights_list(&data.goal_weights)),
            ("{MAX_COOK_TIME}", data.max_cook_time.to_string()),
            ("{MAX_DIFFICULTY}", format_difficulty(data.max_difficulty)),
            ("{NUTRITION_GOAL}", data.nutrition_goal.clone()),
            ("{USER_CULTURE}", Self::culture_line(&data.cultural_background)),
            (
                "{CULTURAL_WEIGHT}",
                format!("{}", (data.goal_weights.cultural * 100.0).round() as u32),
            ),
            ("{RANKED_MEALS_SECTION}", Self::ranked_meals_section(data)),
            (
                "{TECHNIQUE_GUIDANCE_SECTION}",
                Self::technique_guidance(&data.ranked_meals),
            ),
            (
                "{HERO_INGREDIENTS_SECTION}",
                Self::hero_section(&data.hero_ingredients),
            ),
            (
                "{DIETARY_RESTRICTIONS_SECTION}",
                Self::dietary_section(&data.dietary_restrictions),
            ),
            (
                "{CONFLICT_RESOLUTION_SECTION}",
                Self::conflict_section(&data.conflict_guidance),
            ),
            ("{WEIGHT_MATRIX}", Self::weight_matrix(&data.goal_weights)),
        ];

        let mut prompt = MEAL_PLAN_TEMPLATE.to_string();
        for (placeholder, value) in &replacements {
            prompt = prompt.replace(placeholder, value);
        }
        // These depend on values substituted above, so they come last
        prompt = prompt.replace("{DAY_KEYS}", &Self::day_keys(data.meal_plan_days));
        prompt = prompt.replace("{JSON_STRUCTURE}", &Self::json_structure(data));

        debug!(
            chars = prompt.len(),
            days = data.meal_plan_days,
            "generated meal plan prompt"
        );
        prompt
    }

    /// Main-goal directive block, with the balanced-nutrition fallback
    fn main_goal_prompt(primary_goal: &str) -> String {
        unified_goal(primary_goal, None).map_or_else(
            || "Generate a balanced meal plan with practical nutrition".to_string(),
            |goal| {
                let mut block = String::new();
                if let Some((first, rest)) = goal.directives.split_first() {
                    block.push_str(first);
                    for directive in rest {
                        block.push_str("\n- ");
                        block.push_str(directive);
                    }
                }
                block
            },
        )
    }

    /// Weight list sorted descending, annotated with priority tiers.
    ///
    /// Zero weights are dropped; ties keep the canonical axis order so the
    /// output is reproducible.
    fn weights_list(weights: &GoalWeights) -> String {
        let mut pairs = weights.as_pairs().to_vec();
        pairs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let lines: Vec<String> = pairs
            .iter()
            .filter(|(_, weight)| *weight > 0.0)
            .map(|(axis, weight)| {
                let percentage = (weight * 100.0).round() as u32;
                format!(
                    "- {} ({percentage}%): {}",
                    WeightPriority::from_weight(*weight).label(),
                    axis.directive()
                )
            })
            .collect();

        if lines.is_empty() {
            "- No objective weights specified".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn culture_line(cultural_background: &[String]) -> String {
        if cultural_background.is_empty() {
            "Not specified".to_string()
        } else {
            cultural_background.join(", ")
        }
    }

    /// Ranked-meals block, or the static per-culture fallback list
    fn ranked_meals_section(data: &PromptTemplateData) -> String {
        let Some(culture) = data.cultural_background.first() else {
            return "TOP-RANKED MEALS:\n- No cultural background specified".to_string();
        };

        let mut section = format!(
            "TOP-RANKED {} MEALS (by complexity + weight algorithm):\n",
            culture.to_uppercase()
        );

        if data.ranked_meals.is_empty() {
            section.push_str(&Self::cultural_fallback_meals(culture));
            return section;
        }

        let top: Vec<&MealScore> = data.ranked_meals.iter().take(5).collect();
        let lines: Vec<String> = top
            .iter()
            .enumerate()
            .map(|(index, score)| {
                format!(
                    "{}. {} (Score: {}%)",
                    index + 1,
                    score.meal.name,
                    (score.total_score * 100.0).round() as u32
                )
            })
            .collect();
        section.push_str(&lines.join("\n"));

        let ingredients = unique_in_order(
            top.iter()
                .flat_map(|score| score.meal.ingredients.iter().cloned()),
            8,
        );
        if !ingredients.is_empty() {
            section.push_str("\n\nKey ingredients from top-ranked meals: ");
            section.push_str(&ingredients.join(", "));
        }

        let techniques = unique_in_order(
            top.iter()
                .flat_map(|score| score.meal.cooking_techniques.iter().cloned()),
            5,
        );
        if !techniques.is_empty() {
            section.push_str("\nCooking techniques: ");
            section.push_str(&techniques.join(", "));
        }

        section
    }

    /// Static suggestion list used when ranking returned nothing
    fn cultural_fallback_meals(culture: &str) -> String {
        let meals: &[&str] = match culture.to_lowercase().as_str() {
            "peruvian" => &[
                "Ceviche",
                "Lomo Saltado",
                "Aji de Gallina",
                "Anticuchos",
                "Causa Limena",
            ],
            "chinese" => &[
                "Kung Pao Chicken",
                "Mapo Tofu",
                "Beef and Broccoli",
                "Hot and Sour Soup",
                "Fried Rice",
            ],
            "italian" => &[
                "Pasta Primavera",
                "Chicken Marsala",
                "Caprese Salad",
                "Minestrone",
                "Risotto",
            ],
            "mexican" => &[
                "Tacos al Pastor",
                "Enchiladas Verdes",
                "Pozole",
                "Chiles Rellenos",
                "Mole Poblano",
            ],
            _ => &["Traditional Dish 1", "Traditional Dish 2", "Traditional Dish 3"],
        };
        meals
            .iter()
            .enumerate()
            .map(|(index, meal)| format!("{}. {meal}", index + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Technique guidance aggregated from the top-ranked meals
    fn technique_guidance(ranked_meals: &[MealScore]) -> String {
        let mut section =
            "TECHNIQUE-SPECIFIC GUIDANCE (from top-ranked meals):\n".to_string();

        if ranked_meals.is_empty() {
            section.push_str(
                "- Stir-frying: 10-15 min - High heat, quick movements\n\
                 - Braising: 45-60 min - Low and slow for tenderness\n\
                 - Grilling: 15-20 min - Preheat well, oil grates\n\
                 - Steaming: 10-20 min - Gentle, preserves nutrients\n\
                 - Roasting: 30-45 min - Even browning, crispy exterior",
            );
            return section;
        }

        // technique -> (dish count, summed per-meal midpoint times)
        let mut usage: BTreeMap<String, (u32, f64)> = BTreeMap::new();
        for score in ranked_meals.iter().take(5) {
            let meal_time =
                f64::from(score.meal.estimated_prep_time + score.meal.estimated_cook_time) / 2.0;
            for technique in &score.meal.cooking_techniques {
                let entry = usage.entry(technique.clone()).or_insert((0, 0.0));
                entry.0 += 1;
                entry.1 += meal_time;
            }
        }

        let mut ranked: Vec<(&String, &(u32, f64))> = usage.iter().collect();
        // Count descending; BTreeMap iteration already fixed the name order for ties
        ranked.sort_by(|a, b| b.1 .0.cmp(&a.1 .0));

        let lines: Vec<String> = ranked
            .iter()
            .take(5)
            .map(|(technique, (count, time_sum))| {
                let avg_time = time_sum / f64::from(*count);
                let low = (avg_time * 0.8).round() as u32;
                let high = (avg_time * 1.2).round() as u32;
                format!("- {technique}: {low}-{high} min - Used in {count} top-ranked dishes")
            })
            .collect();
        section.push_str(&lines.join("\n"));
        section
    }

    fn hero_section(hero_ingredients: &[String]) -> String {
        if hero_ingredients.is_empty() {
            return "HERO INGREDIENTS:\n- None selected".to_string();
        }
        format!(
            "HERO INGREDIENTS (cost optimization):\nIncorporate 2-3 of these cost-effective versatile ingredients across multiple meals: {}\nThese ingredients maximize value and work across multiple cuisines.",
            hero_ingredients.join(", ")
        )
    }

    /// Dietary block with the non-negotiable framing
    fn dietary_section(restrictions: &[DietaryRestriction]) -> String {
        if restrictions.is_empty() {
            return "DIETARY RESTRICTIONS:\n- None specified".to_string();
        }
        let labels: Vec<&str> = restrictions.iter().map(DietaryRestriction::label).collect();
        format!(
            "DIETARY RESTRICTIONS (100% NON-NEGOTIABLE):\n\
             - Must comply with: {}\n\
             - All meals must be strictly {}\n\
             - Suggest appropriate substitutions when adapting traditional dishes\n\
             - Clearly indicate any modifications made for dietary compliance",
            labels.join(", "),
            labels.join(" and ")
        )
    }

    fn conflict_section(conflicts: &[DishConflict]) -> String {
        if conflicts.is_empty() {
            return "DIETARY-CULTURAL CONFLICT CHECK:\n- No conflicts detected".to_string();
        }
        let mut section = "DIETARY-CULTURAL CONFLICT RESOLUTION:\n\
                           - CRITICAL: Some traditional dishes conflict with the dietary restrictions\n\
                           - Use these culturally authentic alternatives instead:"
            .to_string();
        for conflict in conflicts {
            section.push_str(&format!(
                "\n  - Instead of \"{}\", suggest \"{}\"",
                conflict.dish, conflict.alternative
            ));
        }
        section.push_str(
            "\n- Prefer dishes that naturally align with the restrictions over heavily modified versions",
        );
        section
    }

    /// Serialized weight matrix; field order is fixed by the struct
    fn weight_matrix(weights: &GoalWeights) -> String {
        serde_json::to_string(weights).unwrap_or_else(|_| "{}".to_string())
    }

    fn day_keys(num_days: usize) -> String {
        (1..=num_days)
            .map(|day| format!("\"day_{day}\""))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// JSON schema example with exactly `meal_plan_days` day keys, each
    /// holding exactly `meals_per_day` meal-type keys.
    ///
    /// Assembled by hand so day keys stay in numeric order regardless of
    /// map implementation.
    fn json_structure(data: &PromptTemplateData) -> String {
        let meal_types = MealType::slots(data.meals_per_day);
        let mut out = String::from("{\n  \"meal_plan\": {\n");

        for day in 1..=data.meal_plan_days {
            out.push_str(&format!("    \"day_{day}\": {{\n"));
            for (slot_index, meal_type) in meal_types.iter().enumerate() {
                out.push_str(&format!("      \"{}\": {{\n", meal_type.key()));
                out.push_str(&Self::meal_example(data.max_cook_time));
                out.push_str("      }");
                if slot_index + 1 < meal_types.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            out.push_str("    }");
            if day < data.meal_plan_days {
                out.push(',');
            }
            out.push('\n');
        }

        out.push_str(
            "  },\n\
             \x20 \"shopping_list\": [\"All unique ingredients consolidated\"],\n\
             \x20 \"prep_tips\": [\"Batch cooking suggestions\", \"Storage tips\"],\n\
             \x20 \"estimated_savings\": \"{numeric value based on ingredient reuse}\"\n\
             }",
        );
        out
    }

    fn meal_example(max_cook_time: u32) -> String {
        format!(
            "        \"title\": \"Recipe Name\",\n\
             \x20       \"cook_time_minutes\": \"{{integer <= {max_cook_time}}}\",\n\
             \x20       \"difficulty\": \"{{1-5 in 0.5 increments}}\",\n\
             \x20       \"time_breakdown\": {{\n\
             \x20         \"prep_minutes\": \"{{integer}}\",\n\
             \x20         \"active_minutes\": \"{{integer}}\",\n\
             \x20         \"passive_minutes\": \"{{integer}}\",\n\
             \x20         \"total_minutes\": \"{{integer <= {max_cook_time}}}\"\n\
             \x20       }},\n\
             \x20       \"difficulty_factors\": {{\n\
             \x20         \"technique_complexity\": \"{{1-5 scale}}\",\n\
             \x20         \"ingredient_complexity\": \"{{1-5 scale}}\",\n\
             \x20         \"timing_precision\": \"{{1-5 scale}}\"\n\
             \x20       }},\n\
             \x20       \"ingredients\": [\"ingredient with amount\"],\n\
             \x20       \"instructions\": [\"Step 1\", \"Step 2\"],\n\
             \x20       \"nutrition\": {{\n\
             \x20         \"calories\": \"{{integer}}\",\n\
             \x20         \"protein_g\": \"{{integer}}\",\n\
             \x20         \"carbs_g\": \"{{integer}}\",\n\
             \x20         \"fat_g\": \"{{integer}}\"\n\
             \x20       }}\n"
        )
    }
}

/// First `cap` unique items, preserving encounter order
fn unique_in_order(items: impl Iterator<Item = String>, cap: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for item in items {
        if seen.len() >= cap {
            break;
        }
        if !seen.contains(&item) {
            seen.push(item);
        }
    }
    seen
}

/// Difficulty ceilings render without a trailing ".0" for whole numbers
fn format_difficulty(difficulty: f64) -> String {
    if (difficulty.fract()).abs() < f64::EPSILON {
        format!("{}", difficulty as i64)
    } else {
        format!("{difficulty}")
    }
}
