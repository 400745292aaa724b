//! Centralized balance and tuning constants for the Airlock round engine.
//!
//! These values define the probability tables for evidence generation.
//! Keeping them together ensures that the deduction difficulty can only be
//! adjusted via code changes reviewed in version control.

// Roster limits ------------------------------------------------------------
pub(crate) const MIN_PARTICIPANTS: usize = 4;

// Sighting tuning ----------------------------------------------------------
pub(crate) const SIGHTING_BASE_CHANCE: f32 = 0.5;
pub(crate) const SIGHTING_IMPOSTOR_BIAS: f32 = 0.4;
pub(crate) const SIGHTING_VICTIM_BIAS: f32 = 0.3;
pub(crate) const SIGHTING_JITTER_CHANCE: f32 = 0.25;

// Murder tuning ------------------------------------------------------------
pub(crate) const IMPOSTOR_LIE_QUALITY: f32 = 0.75;

// Sabotage tuning ----------------------------------------------------------
pub(crate) const SABOTAGE_CHANCE: f32 = 0.33;
pub(crate) const LIGHTS_OUT_SIGHTING_REDUCTION: f32 = 0.5;

// Investigation tuning -----------------------------------------------------
pub(crate) const DETECTIVE_CLUE_ACCURACY: f32 = 0.80;

// Ballot tuning ------------------------------------------------------------
pub(crate) const CREW_ACCUSATION_ACCURACY: f32 = 0.25;
pub(crate) const FINDING_FOLLOW_CHANCE: f32 = 0.80;

// Meeting-report reveal tuning ---------------------------------------------
pub(crate) const REVEAL_MEDIC_SUSPICIOUS: f32 = 0.7;
pub(crate) const REVEAL_DETECTIVE_SUSPICIOUS: f32 = 0.6;
pub(crate) const REVEAL_BASELINE: f32 = 0.25;

// Task assignment ----------------------------------------------------------
pub(crate) const TASKS_PER_ROUND_MIN: usize = 2;
pub(crate) const TASKS_PER_ROUND_MAX: usize = 4;

// Stalemate cutoff: rounds = participants * factor + offset ----------------
pub(crate) const STALEMATE_ROUND_FACTOR: u32 = 2;
pub(crate) const STALEMATE_ROUND_OFFSET: u32 = 2;
