//! Impostor sabotage rolls and their effect on evidence quality.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::roster::Roster;
use crate::round::RoundContext;

/// The sabotage systems an impostor can trip during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SabotageKind {
    LightsOut,
}

impl SabotageKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LightsOut => "Lights Out",
        }
    }
}

/// Roll the once-per-round sabotage attempt.
///
/// Runs before sightings so the reduced visibility applies to every
/// witness. Does nothing when no impostor is alive.
pub fn maybe_sabotage<R: Rng>(
    roster: &Roster,
    cfg: &GameConfig,
    ctx: &mut RoundContext,
    rng: &mut R,
) {
    if roster.living_impostor_count() == 0 {
        return;
    }
    if rng.r#gen::<f32>() < cfg.sabotage_chance {
        ctx.sabotage = Some(SabotageKind::LightsOut);
        ctx.fact(String::from(
            "ALERT: The lights went out during this round. Visibility was poor.",
        ));
    }
}

/// Sighting chance after the active sabotage (if any) is applied.
#[must_use]
pub fn effective_sighting_chance(cfg: &GameConfig, sabotage: Option<SabotageKind>) -> f32 {
    match sabotage {
        Some(SabotageKind::LightsOut) => cfg.sighting_chance * (1.0 - cfg.lights_out_reduction),
        None => cfg.sighting_chance,
    }
}
