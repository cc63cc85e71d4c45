// ABOUTME: Injected configuration tables for the intelligence engines
// ABOUTME: Keyword sets, technique scores, substitution rules, and thresholds
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

//! # Intelligence Configuration
//!
//! Every engine takes its tables as injected configuration rather than
//! reading ambient globals, so tests can substitute alternate rule sets.
//! The `Default` implementations carry the production tables.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Aggregate configuration for all intelligence engines
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntelligenceConfig {
    /// Dietary compliance rule tables
    pub dietary: DietaryRuleConfig,
    /// Complexity and timing estimation tables
    pub complexity: ComplexityConfig,
    /// Ranking normalizers and reference values
    pub ranking: RankingConfig,
    /// Adaptation substitution and authenticity tables
    pub adaptation: AdaptationConfig,
}

/// One keyword category with exception phrases.
///
/// Exception phrases are masked out of the text before the keyword scan so
/// compliant replacements ("coconut milk", "gluten-free pasta", "eggplant")
/// never re-trip the keyword they contain. Without this, a dairy
/// substitution could never pass re-verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordRule {
    /// Keywords whose presence violates the restriction
    pub keywords: Vec<String>,
    /// Phrases containing a keyword that do NOT violate the restriction
    pub exceptions: Vec<String>,
}

impl KeywordRule {
    fn new(keywords: &[&str], exceptions: &[&str]) -> Self {
        Self {
            keywords: strings(keywords),
            exceptions: strings(exceptions),
        }
    }

    /// Whether the text contains a violating keyword outside any exception
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let masked = self.mask(text);
        self.keywords
            .iter()
            .any(|keyword| masked.contains(keyword.as_str()))
    }

    /// Text with exception phrases blanked out, longest phrase first
    #[must_use]
    pub fn mask(&self, text: &str) -> String {
        let mut exceptions: Vec<&String> = self.exceptions.iter().collect();
        exceptions.sort_by_key(|phrase| std::cmp::Reverse(phrase.len()));
        let mut masked = text.to_string();
        for phrase in exceptions {
            masked = masked.replace(phrase.as_str(), " ");
        }
        masked
    }
}

/// Keyword tables backing the dietary rule engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietaryRuleConfig {
    /// Ingredients that violate vegetarian and vegan restrictions
    pub meat: KeywordRule,
    /// Ingredients that violate dairy-free and vegan restrictions
    pub dairy: KeywordRule,
    /// Ingredients that violate the vegan restriction beyond meat and dairy
    pub egg: KeywordRule,
    /// Ingredients that violate the gluten-free restriction
    pub gluten: KeywordRule,
    /// Ingredients that violate the nut-free restriction
    pub nut: KeywordRule,
    /// Ingredients that violate the low-sodium restriction
    pub high_sodium: KeywordRule,
    /// Maximum carbohydrate grams per serving for keto compliance
    pub keto_carb_limit_g: f64,
}

impl Default for DietaryRuleConfig {
    fn default() -> Self {
        Self {
            meat: KeywordRule::new(
                &[
                    "beef", "pork", "chicken", "turkey", "lamb", "fish", "salmon", "tuna",
                    "shrimp", "bacon", "ham", "sausage",
                ],
                &[],
            ),
            dairy: KeywordRule::new(
                &[
                    "milk",
                    "cheese",
                    "butter",
                    "cream",
                    "yogurt",
                    "cheddar",
                    "mozzarella",
                    "parmesan",
                ],
                &[
                    "coconut milk",
                    "oat milk",
                    "soy milk",
                    "almond milk",
                    "cashew cream",
                    "coconut cream",
                    "coconut yogurt",
                    "vegan butter",
                    "vegan parmesan",
                    "dairy-free cheese",
                    "peanut butter",
                ],
            ),
            egg: KeywordRule::new(&["egg"], &["eggplant", "flax egg"]),
            gluten: KeywordRule::new(
                &[
                    "wheat", "flour", "bread", "pasta", "noodles", "barley", "rye", "gluten",
                ],
                &[
                    "gluten-free pasta",
                    "gluten-free bread",
                    "gluten-free",
                    "rice noodles",
                    "kelp noodles",
                    "rice flour",
                    "almond flour",
                    "coconut flour",
                ],
            ),
            nut: KeywordRule::new(
                &[
                    "almond",
                    "peanut",
                    "walnut",
                    "cashew",
                    "pistachio",
                    "hazelnut",
                    "pecan",
                    "nuts",
                ],
                &[],
            ),
            high_sodium: KeywordRule::new(
                &[
                    "soy sauce",
                    "salt",
                    "sodium",
                    "canned",
                    "processed",
                    "pickle",
                    "olives",
                ],
                &["unsalted", "low-sodium", "salt-free"],
            ),
            keto_carb_limit_g: 20.0,
        }
    }
}

/// Tables and thresholds for complexity and timing estimation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexityConfig {
    /// Technique name to complexity score (1.0-5.0)
    pub technique_scores: BTreeMap<String, f64>,
    /// Verbs that mark a recipe as timing-critical
    pub time_critical_verbs: Vec<String>,
    /// Instruction count at which a recipe counts as multi-step
    pub multi_step_instruction_threshold: usize,
    /// Distinct technique count at which a recipe counts as multi-step
    pub multi_step_technique_threshold: usize,
    /// Multiplier added per complexity level above 1 for skill-bound time
    pub multiplier_per_level: f64,
}

impl Default for ComplexityConfig {
    fn default() -> Self {
        let technique_scores = [
            ("mixing", 1.0),
            ("boiling", 1.0),
            ("microwaving", 1.0),
            ("steaming", 2.0),
            ("baking", 2.0),
            ("roasting", 2.5),
            ("sautéing", 3.0),
            ("sauté", 3.0),
            ("stir-frying", 3.0),
            ("grilling", 3.0),
            ("pan-searing", 3.5),
            ("braising", 4.0),
            ("searing", 4.0),
            ("deglazing", 4.0),
            ("reduction", 4.0),
            ("tempering", 4.5),
            ("fermentation", 5.0),
            ("pastry", 5.0),
        ]
        .into_iter()
        .map(|(name, score)| (name.to_string(), score))
        .collect();
        Self {
            technique_scores,
            time_critical_verbs: strings(&["simmer", "sear", "reduce", "caramelize", "temper"]),
            multi_step_instruction_threshold: 5,
            multi_step_technique_threshold: 3,
            multiplier_per_level: 0.1,
        }
    }
}

/// Normalizers and reference values for component scoring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Ingredient count treated as the expensive-meal ceiling
    pub ingredient_count_norm: f64,
    /// Protein grams treated as full health credit
    pub protein_norm_g: f64,
    /// Total minutes treated as the slow-meal ceiling
    pub time_ceiling_minutes: f64,
    /// Ingredients that mark a meal as costly regardless of count
    pub rare_ingredients: Vec<String>,
    /// Target calorie shares for (protein, carbs, fat)
    pub macro_targets: (f64, f64, f64),
    /// Blend of count vs. rarity inside the cost score
    pub cost_count_weight: f64,
    /// Blend of protein density vs. macro balance inside the health score
    pub health_protein_weight: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            ingredient_count_norm: 15.0,
            protein_norm_g: 30.0,
            time_ceiling_minutes: 90.0,
            rare_ingredients: strings(&[
                "saffron",
                "truffle",
                "lobster",
                "wagyu",
                "caviar",
                "duck",
                "veal",
                "scallops",
            ]),
            macro_targets: (0.25, 0.45, 0.30),
            cost_count_weight: 0.7,
            health_protein_weight: 0.6,
        }
    }
}

/// Culture-aware ingredient substitution preferences.
///
/// Each entry pairs an ingredient keyword with its preferred replacement;
/// the first matching keyword wins, and `fallback` covers the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionTable {
    /// (ingredient keyword, replacement) pairs, checked in order
    pub by_keyword: Vec<(String, String)>,
    /// Replacement when no keyword matches
    pub fallback: String,
}

impl SubstitutionTable {
    /// Replacement for the given lowercase ingredient text
    #[must_use]
    pub fn substitute(&self, ingredient: &str) -> &str {
        self.by_keyword
            .iter()
            .find(|(keyword, _)| ingredient.contains(keyword.as_str()))
            .map_or(self.fallback.as_str(), |(_, replacement)| replacement)
    }
}

fn table(pairs: &[(&str, &str)], fallback: &str) -> SubstitutionTable {
    SubstitutionTable {
        by_keyword: pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
        fallback: fallback.to_string(),
    }
}

/// Ingredient substitution knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstitutionRules {
    /// Meat replacements keyed by culture group, with a generic fallback
    pub meat_by_culture: BTreeMap<String, SubstitutionTable>,
    /// Generic meat replacements
    pub meat_generic: SubstitutionTable,
    /// Dairy replacements (culture-independent apart from cheese handling)
    pub dairy: SubstitutionTable,
    /// Cheese replacement override for Italian dishes
    pub italian_cheese: String,
    /// Gluten replacements
    pub gluten: SubstitutionTable,
    /// Replacement text for removed nuts
    pub nut_replacement: String,
    /// Egg replacement for vegan repairs
    pub egg_replacement: String,
}

impl Default for SubstitutionRules {
    fn default() -> Self {
        let mut meat_by_culture = BTreeMap::new();
        meat_by_culture.insert(
            "italian".to_string(),
            table(
                &[
                    ("ground", "mushroom and walnut mixture"),
                    ("chicken", "firm tofu or seitan"),
                ],
                "plant-based protein",
            ),
        );
        for culture in ["chinese", "japanese", "thai", "korean", "vietnamese"] {
            meat_by_culture.insert(
                culture.to_string(),
                table(
                    &[("pork", "seasoned tofu or tempeh"), ("chicken", "firm tofu")],
                    "tofu or mushroom protein",
                ),
            );
        }
        Self {
            meat_by_culture,
            meat_generic: table(
                &[
                    ("ground", "lentils or mushroom crumbles"),
                    ("chicken", "tofu or tempeh"),
                    ("beef", "mushrooms or seitan"),
                ],
                "plant-based protein substitute",
            ),
            dairy: table(
                &[
                    ("milk", "coconut milk or oat milk"),
                    ("cream", "cashew cream or coconut cream"),
                    ("cheese", "nutritional yeast or dairy-free cheese"),
                    ("cheddar", "nutritional yeast or dairy-free cheese"),
                    ("mozzarella", "nutritional yeast or dairy-free cheese"),
                    ("parmesan", "nutritional yeast or dairy-free cheese"),
                    ("butter", "olive oil or vegan butter"),
                    ("yogurt", "coconut yogurt"),
                ],
                "dairy-free alternative",
            ),
            italian_cheese: "nutritional yeast or vegan parmesan".to_string(),
            gluten: table(
                &[
                    ("pasta", "rice noodles or gluten-free pasta"),
                    ("flour", "rice flour or almond flour"),
                    ("bread", "gluten-free bread"),
                    ("noodles", "rice noodles or kelp noodles"),
                ],
                "gluten-free alternative",
            ),
            nut_replacement: "remove or substitute with seeds".to_string(),
            egg_replacement: "flax egg or soft tofu".to_string(),
        }
    }
}

/// Cultural authenticity preservation rules and impact scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticityRules {
    /// Spices and seasonings that define each culture's identity
    pub essential_spices: BTreeMap<String, Vec<String>>,
    /// Cooking methods that preserve each culture's identity
    pub essential_methods: BTreeMap<String, Vec<String>>,
    /// Cultures with strong traditional vegetarian repertoires
    pub vegetarian_friendly_cultures: Vec<String>,
    /// Meat substitution impact in vegetarian-friendly cultures
    pub meat_impact_friendly: f64,
    /// Meat substitution impact elsewhere
    pub meat_impact_other: f64,
    /// Cheese substitution impact
    pub cheese_impact: f64,
    /// Cream substitution impact
    pub cream_impact: f64,
    /// Other dairy substitution impact
    pub dairy_impact_other: f64,
    /// Pasta substitution impact in Italian dishes
    pub italian_pasta_impact: f64,
    /// Noodle substitution impact in East/Southeast Asian dishes
    pub asian_noodle_impact: f64,
    /// Other gluten substitution impact
    pub gluten_impact_other: f64,
    /// Nut removal impact
    pub nut_removal_impact: f64,
    /// Egg substitution impact (vegan repairs)
    pub egg_impact: f64,
}

impl Default for AuthenticityRules {
    fn default() -> Self {
        let spice_entries: [(&str, &[&str]); 6] = [
            ("italian", &["basil", "oregano", "garlic", "olive oil", "parmesan"]),
            ("mexican", &["cumin", "chili", "lime", "cilantro", "onion"]),
            ("chinese", &["soy sauce", "ginger", "garlic", "scallions", "sesame oil"]),
            ("indian", &["turmeric", "cumin", "coriander", "garam masala", "ginger"]),
            ("thai", &["fish sauce", "lime", "chili", "coconut milk", "lemongrass"]),
            ("japanese", &["soy sauce", "miso", "rice vinegar", "mirin", "dashi"]),
        ];
        let method_entries: [(&str, &[&str]); 6] = [
            ("italian", &["sautéing", "simmering", "al dente pasta"]),
            ("mexican", &["charring", "slow cooking", "fresh assembly"]),
            ("chinese", &["stir-frying", "steaming", "braising"]),
            ("indian", &["tempering spices", "slow cooking", "layering flavors"]),
            ("thai", &["balancing sweet-sour-spicy", "quick cooking", "fresh herbs"]),
            ("japanese", &["gentle cooking", "umami building", "clean flavors"]),
        ];
        Self {
            essential_spices: spice_entries
                .into_iter()
                .map(|(culture, items)| (culture.to_string(), strings(items)))
                .collect(),
            essential_methods: method_entries
                .into_iter()
                .map(|(culture, items)| (culture.to_string(), strings(items)))
                .collect(),
            vegetarian_friendly_cultures: strings(&["indian", "thai", "mediterranean"]),
            meat_impact_friendly: 0.3,
            meat_impact_other: 0.6,
            cheese_impact: 0.7,
            cream_impact: 0.5,
            dairy_impact_other: 0.4,
            italian_pasta_impact: 0.8,
            asian_noodle_impact: 0.6,
            gluten_impact_other: 0.5,
            nut_removal_impact: 0.4,
            egg_impact: 0.5,
        }
    }
}

/// Thresholds, caps, and tables for the adaptation engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptationConfig {
    /// Minimum authenticity a successful adaptation must retain
    pub authenticity_threshold: f64,
    /// Maximum modifications applied per meal
    pub max_modifications: usize,
    /// Substitution knowledge base
    pub substitutions: SubstitutionRules,
    /// Authenticity preservation rules
    pub authenticity: AuthenticityRules,
    /// Calorie floor after nutrition adjustment
    pub calorie_floor: f64,
    /// Protein floor in grams after nutrition adjustment
    pub protein_floor_g: f64,
    /// Carbohydrate floor in grams after nutrition adjustment
    pub carb_floor_g: f64,
    /// Fat floor in grams after nutrition adjustment
    pub fat_floor_g: f64,
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        Self {
            authenticity_threshold: 0.6,
            max_modifications: 5,
            substitutions: SubstitutionRules::default(),
            authenticity: AuthenticityRules::default(),
            calorie_floor: 200.0,
            protein_floor_g: 5.0,
            carb_floor_g: 10.0,
            fat_floor_g: 5.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_table_prefers_first_match() {
        let rules = SubstitutionRules::default();
        assert_eq!(
            rules.meat_generic.substitute("ground beef"),
            "lentils or mushroom crumbles"
        );
        assert_eq!(
            rules.meat_generic.substitute("pork shoulder"),
            "plant-based protein substitute"
        );
    }

    #[test]
    fn default_tables_cover_all_restriction_categories() {
        let config = DietaryRuleConfig::default();
        assert!(config.meat.keywords.contains(&"beef".to_string()));
        assert!(config.gluten.keywords.contains(&"gluten".to_string()));
        assert!(config.nut.keywords.contains(&"nuts".to_string()));
        assert!((config.keto_carb_limit_g - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn exception_phrases_do_not_trip_keywords() {
        let config = DietaryRuleConfig::default();
        assert!(config.dairy.matches("simmer in whole milk"));
        assert!(!config.dairy.matches("simmer in coconut milk or oat milk"));
        assert!(!config.egg.matches("roasted eggplant"));
        assert!(config.egg.matches("two eggs, beaten"));
        assert!(!config.gluten.matches("serve over gluten-free pasta"));
    }
}
