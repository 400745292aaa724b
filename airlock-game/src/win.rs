//! Terminal-state evaluation.

use serde::{Deserialize, Serialize};

use crate::roster::Roster;

/// Outcome of a win-condition check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Continues,
    CrewWins,
    ImpostorsWin,
    /// Degenerate stalemate with no surviving impostor and no crew win.
    Draw,
}

impl Verdict {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continues)
    }

    #[must_use]
    pub const fn headline(self) -> &'static str {
        match self {
            Self::Continues => "The round ends without a decision.",
            Self::CrewWins => "All impostors are gone. The crew wins!",
            Self::ImpostorsWin => "The impostors have taken over. Impostors win!",
            Self::Draw => "Nobody is left standing to claim the win. Draw.",
        }
    }
}

/// Standing win check, run after every elimination and on setup failure.
///
/// Crew wins exactly when no impostor lives; impostors win when they
/// match or outnumber the living crew-aligned participants.
#[must_use]
pub fn evaluate(roster: &Roster) -> Verdict {
    let impostors = roster.living_impostor_count();
    let crew = roster.living_crew_count();
    if impostors == 0 {
        Verdict::CrewWins
    } else if impostors >= crew {
        Verdict::ImpostorsWin
    } else {
        Verdict::Continues
    }
}

/// Forced outcome once the round cutoff is exceeded: any surviving
/// impostor wins by default, otherwise the game is a draw.
#[must_use]
pub fn evaluate_stalemate(roster: &Roster) -> Verdict {
    if roster.living_impostor_count() > 0 {
        Verdict::ImpostorsWin
    } else {
        Verdict::Draw
    }
}
