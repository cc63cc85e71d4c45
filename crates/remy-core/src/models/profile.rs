// ABOUTME: User profile, family member, and goal-weight models
// ABOUTME: Normalizes both stored goal-weight serialization shapes at the boundary
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Remy Meal Intelligence

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

/// One of the five competing planning objectives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GoalAxis {
    /// Grocery cost efficiency
    Cost,
    /// Nutritional quality
    Health,
    /// Cultural authenticity
    Cultural,
    /// Ingredient and technique diversity
    Variety,
    /// Prep and cooking time
    Time,
}

impl GoalAxis {
    /// All axes in canonical order (used for deterministic tie-breaking)
    pub const ALL: [Self; 5] = [
        Self::Cost,
        Self::Health,
        Self::Cultural,
        Self::Variety,
        Self::Time,
    ];

    /// Lowercase key used in serialized weight maps
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::Cost => "cost",
            Self::Health => "health",
            Self::Cultural => "cultural",
            Self::Variety => "variety",
            Self::Time => "time",
        }
    }

    /// One-line description used when annotating weight priorities in prompts
    #[must_use]
    pub const fn directive(&self) -> &'static str {
        match self {
            Self::Cost => "Cost savings through smart ingredient choices and reuse",
            Self::Health => "Nutritional density and balanced macronutrients",
            Self::Cultural => "Incorporate authentic cultural flavors and techniques",
            Self::Variety => "Use diverse ingredients and cooking methods",
            Self::Time => "Minimize prep and cooking time for efficiency",
        }
    }

    fn from_key(key: &str) -> Option<Self> {
        match key {
            "cost" => Some(Self::Cost),
            "health" => Some(Self::Health),
            "cultural" => Some(Self::Cultural),
            "variety" => Some(Self::Variety),
            "time" => Some(Self::Time),
            _ => None,
        }
    }
}

/// Priority intensities for the five planning objectives.
///
/// Each weight is an independent intensity in 0.0-1.0; the weights are not
/// a probability distribution and are never required to sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoalWeights {
    /// Grocery cost priority
    pub cost: f64,
    /// Nutrition priority
    pub health: f64,
    /// Cultural authenticity priority
    pub cultural: f64,
    /// Variety priority
    pub variety: f64,
    /// Time efficiency priority
    pub time: f64,
}

impl Default for GoalWeights {
    fn default() -> Self {
        Self {
            cost: 0.5,
            health: 0.5,
            cultural: 0.5,
            variety: 0.5,
            time: 0.5,
        }
    }
}

impl GoalWeights {
    /// Weight for the given axis
    #[must_use]
    pub const fn get(&self, axis: GoalAxis) -> f64 {
        match axis {
            GoalAxis::Cost => self.cost,
            GoalAxis::Health => self.health,
            GoalAxis::Cultural => self.cultural,
            GoalAxis::Variety => self.variety,
            GoalAxis::Time => self.time,
        }
    }

    fn set(&mut self, axis: GoalAxis, weight: f64) {
        match axis {
            GoalAxis::Cost => self.cost = weight,
            GoalAxis::Health => self.health = weight,
            GoalAxis::Cultural => self.cultural = weight,
            GoalAxis::Variety => self.variety = weight,
            GoalAxis::Time => self.time = weight,
        }
    }

    /// All (axis, weight) pairs in canonical axis order
    #[must_use]
    pub fn as_pairs(&self) -> [(GoalAxis, f64); 5] {
        [
            (GoalAxis::Cost, self.cost),
            (GoalAxis::Health, self.health),
            (GoalAxis::Cultural, self.cultural),
            (GoalAxis::Variety, self.variety),
            (GoalAxis::Time, self.time),
        ]
    }

    /// Parse weights from a persisted profile value.
    ///
    /// Profiles have historically stored goal weights in two shapes: an
    /// object map (`{"cost": 0.8, ...}`) and an array of `"key:value"`
    /// strings (`["cost:0.8", ...]`). Both are accepted here so the rest of
    /// the pipeline only ever sees the canonical struct. Entries with an
    /// unknown key, an unparseable number, or a value outside 0.0-1.0 are
    /// skipped; missing axes keep the 0.5 default.
    #[must_use]
    pub fn from_stored(stored: &Value) -> Self {
        let mut weights = Self::default();
        match stored {
            Value::Object(map) => {
                for (key, value) in map {
                    let Some(axis) = GoalAxis::from_key(key) else {
                        debug!(key = %key, "skipping unknown goal weight key");
                        continue;
                    };
                    match value.as_f64() {
                        Some(weight) if (0.0..=1.0).contains(&weight) => {
                            weights.set(axis, weight);
                        }
                        _ => debug!(key = %key, "skipping out-of-range goal weight"),
                    }
                }
            }
            Value::Array(entries) => {
                for entry in entries {
                    let Some(text) = entry.as_str() else {
                        debug!("skipping non-string goal entry");
                        continue;
                    };
                    let Some((key, value)) = text.split_once(':') else {
                        debug!(entry = %text, "skipping goal entry without ':'");
                        continue;
                    };
                    let Some(axis) = GoalAxis::from_key(key.trim()) else {
                        debug!(key = %key, "skipping unknown goal weight key");
                        continue;
                    };
                    match value.trim().parse::<f64>() {
                        Ok(weight) if (0.0..=1.0).contains(&weight) => {
                            weights.set(axis, weight);
                        }
                        _ => debug!(entry = %text, "skipping out-of-range goal weight"),
                    }
                }
            }
            _ => debug!("stored goals are neither object nor array, using defaults"),
        }
        weights
    }

    /// Resolve effective weights from request and profile sources.
    ///
    /// Request values take precedence over profile values, which take
    /// precedence over the 0.5 defaults.
    #[must_use]
    pub fn resolve(request: Option<Self>, profile: Option<Self>) -> Self {
        request.or(profile).unwrap_or_default()
    }

    /// Serialize to the array-of-`"key:value"` storage shape
    #[must_use]
    pub fn to_stored_pairs(&self) -> Vec<String> {
        self.as_pairs()
            .iter()
            .map(|(axis, weight)| format!("{}:{weight}", axis.key()))
            .collect()
    }
}

/// Age bracket for a family member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    /// Under 12
    Child,
    /// 12-17
    Teen,
    /// 18-64
    #[default]
    Adult,
    /// 65 and over
    Senior,
}

/// Individual or family profile marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProfileType {
    /// Single-person profile
    #[default]
    Individual,
    /// Multi-member family profile
    Family,
}

/// One member of a family profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FamilyMember {
    /// Member name (used as the plan-target key)
    pub name: String,
    /// Age bracket
    #[serde(default)]
    pub age_group: AgeGroup,
    /// Free-form preference tags (may embed dietary restrictions)
    #[serde(default)]
    pub preferences: Vec<String>,
    /// Member-specific dietary restriction labels
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Member-specific goals
    #[serde(default)]
    pub goals: Vec<String>,
}

/// Persisted user profile as seen by the planning core.
///
/// The storage representation is the out-of-scope profile store's concern;
/// this is the deserialized boundary type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct UserProfile {
    /// Owning user id
    #[serde(default)]
    pub user_id: Uuid,
    /// Display name for the profile
    pub profile_name: String,
    /// Whether this is an individual or family profile
    #[serde(default)]
    pub profile_type: ProfileType,
    /// Categorical top-level objective (e.g. "Save Money")
    #[serde(default)]
    pub primary_goal: Option<String>,
    /// Number of people the plan feeds
    #[serde(default)]
    pub family_size: u32,
    /// Family members, empty for individual profiles
    #[serde(default)]
    pub members: Vec<FamilyMember>,
    /// Profile-level dietary restriction labels
    #[serde(default)]
    pub dietary_restrictions: Vec<String>,
    /// Cultural background tags (e.g. "Peruvian")
    #[serde(default)]
    pub cultural_background: Vec<String>,
    /// Stored goal weights, already normalized from the storage shape
    #[serde(default)]
    pub goal_weights: Option<GoalWeights>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_object_shape() {
        let stored = json!({"cost": 0.8, "health": 0.3, "bogus": 0.9});
        let weights = GoalWeights::from_stored(&stored);
        assert!((weights.cost - 0.8).abs() < 1e-9);
        assert!((weights.health - 0.3).abs() < 1e-9);
        // Unknown keys are skipped, untouched axes keep the default
        assert!((weights.cultural - 0.5).abs() < 1e-9);
    }

    #[test]
    fn parses_array_shape() {
        let stored = json!(["cost:0.9", "time:0.2", "health:nonsense", "malformed"]);
        let weights = GoalWeights::from_stored(&stored);
        assert!((weights.cost - 0.9).abs() < 1e-9);
        assert!((weights.time - 0.2).abs() < 1e-9);
        assert!((weights.health - 0.5).abs() < 1e-9);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let stored = json!({"cost": 1.5, "health": -0.1});
        let weights = GoalWeights::from_stored(&stored);
        assert_eq!(weights, GoalWeights::default());
    }

    #[test]
    fn request_weights_win_over_profile() {
        let request = GoalWeights {
            cost: 0.9,
            ..GoalWeights::default()
        };
        let profile = GoalWeights {
            cost: 0.1,
            ..GoalWeights::default()
        };
        let resolved = GoalWeights::resolve(Some(request), Some(profile));
        assert!((resolved.cost - 0.9).abs() < 1e-9);

        let fallback = GoalWeights::resolve(None, Some(profile));
        assert!((fallback.cost - 0.1).abs() < 1e-9);

        assert_eq!(GoalWeights::resolve(None, None), GoalWeights::default());
    }

    #[test]
    fn storage_round_trip() {
        let weights = GoalWeights {
            cost: 0.8,
            health: 0.6,
            cultural: 0.4,
            variety: 0.2,
            time: 0.1,
        };
        let stored = json!(weights.to_stored_pairs());
        assert_eq!(GoalWeights::from_stored(&stored), weights);
    }
}
