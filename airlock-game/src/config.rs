//! Game configuration: the probability table driving evidence generation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CREW_ACCUSATION_ACCURACY, DETECTIVE_CLUE_ACCURACY, FINDING_FOLLOW_CHANCE,
    IMPOSTOR_LIE_QUALITY, LIGHTS_OUT_SIGHTING_REDUCTION, SABOTAGE_CHANCE, SIGHTING_BASE_CHANCE,
    SIGHTING_IMPOSTOR_BIAS, SIGHTING_JITTER_CHANCE, SIGHTING_VICTIM_BIAS,
    STALEMATE_ROUND_FACTOR, STALEMATE_ROUND_OFFSET,
};

/// Errors raised when configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
    #[error("sighting biases sum to {sum:.2}, exceeding 1.0")]
    BiasOverflow { sum: f32 },
}

/// Tunable probabilities for one game.
///
/// Every field deserializes with a default so a partial JSON overlay is a
/// valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of impostors requested; clamped by `sanitize_impostors`.
    #[serde(default = "GameConfig::default_impostors")]
    pub impostors: usize,
    /// Chance each living witness produces a sighting.
    #[serde(default = "GameConfig::default_sighting_chance")]
    pub sighting_chance: f32,
    /// Probability mass steering sightings toward nearby impostors.
    #[serde(default = "GameConfig::default_impostor_bias")]
    pub impostor_bias: f32,
    /// Additional mass steering sightings toward the victim.
    #[serde(default = "GameConfig::default_victim_bias")]
    pub victim_bias: f32,
    /// Chance a sighting's location drifts to an adjacent room.
    #[serde(default = "GameConfig::default_jitter_chance")]
    pub jitter_chance: f32,
    /// Chance the fabricated body location is drawn from the plausible set.
    #[serde(default = "GameConfig::default_lie_quality")]
    pub lie_quality: f32,
    /// Chance a detective clue is correct rather than inverted.
    #[serde(default = "GameConfig::default_detective_accuracy")]
    pub detective_accuracy: f32,
    /// Chance an impostor triggers a sabotage this round.
    #[serde(default = "GameConfig::default_sabotage_chance")]
    pub sabotage_chance: f32,
    /// Multiplicative sighting reduction while lights are out.
    #[serde(default = "GameConfig::default_lights_out_reduction")]
    pub lights_out_reduction: f32,
    /// Chance an automated crew ballot lands on a real impostor.
    #[serde(default = "GameConfig::default_accusation_accuracy")]
    pub accusation_accuracy: f32,
    /// Chance a role holder votes the target of a suspicious finding.
    #[serde(default = "GameConfig::default_finding_follow_chance")]
    pub finding_follow_chance: f32,
}

impl GameConfig {
    const fn default_impostors() -> usize {
        1
    }

    const fn default_sighting_chance() -> f32 {
        SIGHTING_BASE_CHANCE
    }

    const fn default_impostor_bias() -> f32 {
        SIGHTING_IMPOSTOR_BIAS
    }

    const fn default_victim_bias() -> f32 {
        SIGHTING_VICTIM_BIAS
    }

    const fn default_jitter_chance() -> f32 {
        SIGHTING_JITTER_CHANCE
    }

    const fn default_lie_quality() -> f32 {
        IMPOSTOR_LIE_QUALITY
    }

    const fn default_detective_accuracy() -> f32 {
        DETECTIVE_CLUE_ACCURACY
    }

    const fn default_sabotage_chance() -> f32 {
        SABOTAGE_CHANCE
    }

    const fn default_lights_out_reduction() -> f32 {
        LIGHTS_OUT_SIGHTING_REDUCTION
    }

    const fn default_accusation_accuracy() -> f32 {
        CREW_ACCUSATION_ACCURACY
    }

    const fn default_finding_follow_chance() -> f32 {
        FINDING_FOLLOW_CHANCE
    }

    /// Validate configuration invariants before sanitization.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` when any probability leaves `[0, 1]` or the
    /// sighting biases overflow.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("sighting_chance", self.sighting_chance),
            ("impostor_bias", self.impostor_bias),
            ("victim_bias", self.victim_bias),
            ("jitter_chance", self.jitter_chance),
            ("lie_quality", self.lie_quality),
            ("detective_accuracy", self.detective_accuracy),
            ("sabotage_chance", self.sabotage_chance),
            ("lights_out_reduction", self.lights_out_reduction),
            ("accusation_accuracy", self.accusation_accuracy),
            ("finding_follow_chance", self.finding_follow_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        let sum = self.impostor_bias + self.victim_bias;
        if sum > 1.0 {
            return Err(ConfigError::BiasOverflow { sum });
        }
        Ok(())
    }

    /// Clamp every probability into `[0, 1]` in place.
    pub fn sanitize(&mut self) {
        for value in [
            &mut self.sighting_chance,
            &mut self.impostor_bias,
            &mut self.victim_bias,
            &mut self.jitter_chance,
            &mut self.lie_quality,
            &mut self.detective_accuracy,
            &mut self.sabotage_chance,
            &mut self.lights_out_reduction,
            &mut self.accusation_accuracy,
            &mut self.finding_follow_chance,
        ] {
            if !value.is_finite() {
                *value = 0.0;
            }
            *value = value.clamp(0.0, 1.0);
        }
        if self.impostor_bias + self.victim_bias > 1.0 {
            self.victim_bias = 1.0 - self.impostor_bias;
        }
    }

    /// Resolve the impostor count against a roster of `participants`.
    ///
    /// An out-of-range request clamps to 1 rather than failing the game.
    #[must_use]
    pub fn sanitize_impostors(&self, participants: usize) -> usize {
        let k = self.impostors;
        if k >= 1 && k < participants.div_ceil(2) {
            k
        } else {
            1
        }
    }

    /// Round cutoff after which the game is forced to a terminal outcome.
    #[must_use]
    pub fn stalemate_cutoff(participants: usize) -> u32 {
        u32::try_from(participants).unwrap_or(u32::MAX) * STALEMATE_ROUND_FACTOR
            + STALEMATE_ROUND_OFFSET
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            impostors: Self::default_impostors(),
            sighting_chance: Self::default_sighting_chance(),
            impostor_bias: Self::default_impostor_bias(),
            victim_bias: Self::default_victim_bias(),
            jitter_chance: Self::default_jitter_chance(),
            lie_quality: Self::default_lie_quality(),
            detective_accuracy: Self::default_detective_accuracy(),
            sabotage_chance: Self::default_sabotage_chance(),
            lights_out_reduction: Self::default_lights_out_reduction(),
            accusation_accuracy: Self::default_accusation_accuracy(),
            finding_follow_chance: Self::default_finding_follow_chance(),
        }
    }
}
