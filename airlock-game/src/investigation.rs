//! Medic scans and Detective hunches, stored as private findings.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::GameConfig;
use crate::roster::{Finding, Role, Roster, ScanReading};
use crate::round::RoundContext;

/// Run the special-role actions for this round.
///
/// Each result lands only in the actor's private finding; the shared fact
/// log records that an action happened, never what it found. Skipped
/// silently for dead role holders or when no eligible target exists.
pub fn run_investigations<R: Rng>(
    roster: &mut Roster,
    cfg: &GameConfig,
    ctx: &mut RoundContext,
    rng: &mut R,
) {
    if let Some(medic) = living_holder(roster, Role::Medic) {
        if let Some(target) = pick_target(roster, ctx, medic, rng) {
            let reading = scan_reading(roster, cfg, target);
            roster.0[medic].finding = Some(Finding::MedicScan {
                target: roster.0[target].name.clone(),
                reading,
            });
            ctx.fact(String::from("The Medic quietly ran a scan this round."));
        }
    }

    if let Some(detective) = living_holder(roster, Role::Detective) {
        if let Some(target) = pick_target(roster, ctx, detective, rng) {
            let truth = roster.0[target].role.is_impostor();
            let suspicious = if rng.r#gen::<f32>() < cfg.detective_accuracy {
                truth
            } else {
                !truth
            };
            roster.0[detective].finding = Some(Finding::DetectiveClue {
                target: roster.0[target].name.clone(),
                suspicious,
            });
            ctx.fact(String::from(
                "The Detective followed up on a hunch this round.",
            ));
        }
    }
}

fn living_holder(roster: &Roster, role: Role) -> Option<usize> {
    roster.living().find(|(_, p)| p.role == role).map(|(idx, _)| idx)
}

fn pick_target<R: Rng>(
    roster: &Roster,
    ctx: &RoundContext,
    actor: usize,
    rng: &mut R,
) -> Option<usize> {
    let candidates: Vec<usize> = roster
        .living_indices()
        .filter(|&idx| idx != actor && Some(idx) != ctx.victim)
        .collect();
    candidates.choose(rng).copied()
}

/// Scans never lie. With more than one configured impostor the signal on
/// an impostor degrades to the coarser strong-reading label.
fn scan_reading(roster: &Roster, cfg: &GameConfig, target: usize) -> ScanReading {
    if roster.0[target].role.is_impostor() {
        if cfg.impostors > 1 {
            ScanReading::StrongReading
        } else {
            ScanReading::Suspicious
        }
    } else {
        ScanReading::Clear
    }
}
