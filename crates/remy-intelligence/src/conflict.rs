// ABOUTME: Dietary and cultural conflict detection for prompt guidance
// ABOUTME: Scans representative cultural dishes against the user's restrictions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Conflict Detection
//!
//! Checks a small table of representative dishes per culture against the
//! merged dietary restrictions. When a traditional dish conflicts, the
//! guidance block names a compliant alternative derived from the
//! substitution tables, so the LLM steers toward dishes that naturally
//! align with the restrictions instead of heavily modified versions.

use crate::config::{DietaryRuleConfig, SubstitutionRules};
use remy_core::DietaryRestriction;
use tracing::debug;

/// Representative dishes per culture used for conflict probing
#[must_use]
pub fn cultural_dish_examples(culture: &str) -> &'static [&'static str] {
    match culture.to_lowercase().as_str() {
        "chinese" => &[
            "beef stir-fry",
            "pork dumplings",
            "chicken fried rice",
        ],
        "italian" => &["chicken parmesan", "beef bolognese", "cheese pizza"],
        "mexican" => &["beef tacos", "chicken quesadilla", "pork carnitas"],
        "indian" => &["chicken curry", "lamb biryani", "paneer makhani"],
        "japanese" => &["chicken teriyaki", "beef sukiyaki", "pork ramen"],
        "thai" => &[
            "pad thai with shrimp",
            "green curry with chicken",
            "pork larb",
        ],
        "korean" => &["beef bulgogi", "pork kimchi stew", "chicken bibimbap"],
        "vietnamese" => &["beef pho", "pork banh mi", "chicken vermicelli"],
        "greek" => &["lamb gyros", "chicken souvlaki", "feta cheese salad"],
        "lebanese" => &["lamb kebab", "chicken shawarma", "beef kibbeh"],
        "french" => &["coq au vin", "beef bourguignon", "cheese souffle"],
        "peruvian" => &[
            "beef lomo saltado",
            "chicken aji de gallina",
            "beef heart anticuchos",
        ],
        _ => &[],
    }
}

/// Whether a dish name conflicts with any restriction by keyword
#[must_use]
pub fn has_quick_conflict(
    dish: &str,
    restrictions: &[DietaryRestriction],
    config: &DietaryRuleConfig,
) -> bool {
    let lower = dish.to_lowercase();
    restrictions.iter().any(|restriction| match restriction {
        DietaryRestriction::Vegetarian => config.meat.matches(&lower),
        DietaryRestriction::Vegan => {
            config.meat.matches(&lower)
                || config.dairy.matches(&lower)
                || config.egg.matches(&lower)
        }
        DietaryRestriction::GlutenFree => config.gluten.matches(&lower),
        DietaryRestriction::DairyFree => config.dairy.matches(&lower),
        DietaryRestriction::NutFree => config.nut.matches(&lower),
        DietaryRestriction::Keto
        | DietaryRestriction::LowSodium
        | DietaryRestriction::Custom(_) => false,
    })
}

/// A conflicting dish with its suggested compliant alternative
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishConflict {
    /// The traditional dish
    pub dish: String,
    /// Compliant alternative framing for the prompt
    pub alternative: String,
}

/// Find conflicts between the cultures' representative dishes and the
/// restrictions, capped at five entries
#[must_use]
pub fn find_conflicts(
    cultures: &[String],
    restrictions: &[DietaryRestriction],
    dietary_config: &DietaryRuleConfig,
    substitutions: &SubstitutionRules,
) -> Vec<DishConflict> {
    if restrictions.is_empty() {
        return Vec::new();
    }

    let mut conflicts = Vec::new();
    for culture in cultures {
        for dish in cultural_dish_examples(culture) {
            if !has_quick_conflict(dish, restrictions, dietary_config) {
                continue;
            }
            debug!(dish, culture = %culture, "cultural dish conflicts with restrictions");
            conflicts.push(DishConflict {
                dish: (*dish).to_string(),
                alternative: suggest_alternative(dish, culture, dietary_config, substitutions),
            });
            if conflicts.len() >= 5 {
                return conflicts;
            }
        }
    }
    conflicts
}

/// Derive a compliant alternative by swapping the offending word in the
/// dish name for its substitute (e.g. "beef tacos" -> "mushroom tacos")
fn suggest_alternative(
    dish: &str,
    culture: &str,
    dietary_config: &DietaryRuleConfig,
    substitutions: &SubstitutionRules,
) -> String {
    let lower = dish.to_lowercase();
    let culture_lower = culture.to_lowercase();

    if let Some(keyword) = first_match(&lower, &dietary_config.meat.keywords) {
        let replacement = substitutions.meat_by_culture.get(&culture_lower).map_or_else(
            || substitutions.meat_generic.substitute(&lower),
            |table| table.substitute(&lower),
        );
        return format!(
            "{} (traditional method preserved)",
            lower.replace(keyword.as_str(), replacement)
        );
    }
    if let Some(keyword) = first_match(&lower, &dietary_config.dairy.keywords) {
        let replacement = substitutions.dairy.substitute(&lower);
        return lower.replace(keyword.as_str(), replacement);
    }
    if let Some(keyword) = first_match(&lower, &dietary_config.gluten.keywords) {
        let replacement = substitutions.gluten.substitute(&lower);
        return lower.replace(keyword.as_str(), replacement);
    }
    format!("a naturally compliant variation of {dish}")
}

fn first_match<'a>(text: &str, keywords: &'a [String]) -> Option<&'a String> {
    keywords.iter().find(|keyword| text.contains(keyword.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meat_dishes_conflict_with_vegetarian() {
        let config = DietaryRuleConfig::default();
        assert!(has_quick_conflict(
            "beef tacos",
            &[DietaryRestriction::Vegetarian],
            &config
        ));
        assert!(!has_quick_conflict(
            "vegetable fajitas",
            &[DietaryRestriction::Vegetarian],
            &config
        ));
    }

    #[test]
    fn conflicts_are_capped_and_offer_alternatives() {
        let config = DietaryRuleConfig::default();
        let substitutions = SubstitutionRules::default();
        let cultures = vec!["Chinese".to_string(), "Mexican".to_string()];

        let conflicts = find_conflicts(
            &cultures,
            &[DietaryRestriction::Vegan],
            &config,
            &substitutions,
        );

        assert!(!conflicts.is_empty());
        assert!(conflicts.len() <= 5);
        for conflict in &conflicts {
            assert!(!conflict.alternative.is_empty());
            assert!(!has_quick_conflict(
                &conflict.alternative,
                &[DietaryRestriction::Vegetarian],
                &config
            ));
        }
    }

    #[test]
    fn no_restrictions_means_no_conflicts() {
        let config = DietaryRuleConfig::default();
        let substitutions = SubstitutionRules::default();
        let conflicts = find_conflicts(
            &["Italian".to_string()],
            &[],
            &config,
            &substitutions,
        );
        assert!(conflicts.is_empty());
    }
}
