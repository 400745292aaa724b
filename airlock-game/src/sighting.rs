//! Witness sighting generation: noisy, biased, occasionally wrong.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::catalog::EvidenceCatalog;
use crate::config::GameConfig;
use crate::roster::Roster;
use crate::round::RoundContext;
use crate::sabotage::effective_sighting_chance;

/// How long ago the witness claims the sighting happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recency {
    Recently,
    AWhileAgo,
    BeforeTheBody,
}

impl Recency {
    const ALL: [Self; 3] = [Self::Recently, Self::AWhileAgo, Self::BeforeTheBody];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recently => "recently",
            Self::AWhileAgo => "a little while ago",
            Self::BeforeTheBody => "just before the body was found",
        }
    }
}

/// One witness statement. `location` is the subject's claimed location,
/// possibly jittered, so sightings corroborate alibis rather than truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SightingRecord {
    pub witness: String,
    pub subject: String,
    pub location: String,
    pub recency: Recency,
    pub is_body_sighting: bool,
}

impl SightingRecord {
    /// Render the record the way the witness would say it at the meeting.
    #[must_use]
    pub fn statement(&self) -> String {
        if self.is_body_sighting {
            format!(
                "{} says: 'I saw {}'s body in {} {}.'",
                self.witness,
                self.subject,
                self.location,
                self.recency.label()
            )
        } else {
            format!(
                "{} says: 'I saw {} in {} {}.'",
                self.witness,
                self.subject,
                self.location,
                self.recency.label()
            )
        }
    }
}

/// Generate this round's sightings into the context.
///
/// Every living participant other than the victim rolls independently
/// against the sabotage-adjusted sighting chance; duplicates are allowed.
/// Subject selection burns a single roll per witness, checked against the
/// bias thresholds in priority order.
pub fn generate_sightings<R: Rng>(
    roster: &Roster,
    catalog: &EvidenceCatalog,
    cfg: &GameConfig,
    ctx: &mut RoundContext,
    rng: &mut R,
) {
    let chance = effective_sighting_chance(cfg, ctx.sabotage);
    let witnesses: Vec<usize> = roster
        .living_indices()
        .filter(|&idx| Some(idx) != ctx.victim)
        .collect();

    let mut produced = 0usize;
    for witness in witnesses {
        if rng.r#gen::<f32>() >= chance {
            continue;
        }
        let Some(subject) = select_subject(roster, ctx, witness, cfg, rng) else {
            continue;
        };
        let record = build_record(roster, catalog, ctx, witness, subject, cfg, rng);
        ctx.fact(record.statement());
        ctx.sightings.push(record);
        produced += 1;
    }

    if produced == 0 {
        ctx.fact(String::from(
            "No one reports seeing anything useful this round.",
        ));
    }
}

/// Pick who the witness saw. A single roll r is checked against the bias
/// thresholds in priority order.
fn select_subject<R: Rng>(
    roster: &Roster,
    ctx: &RoundContext,
    witness: usize,
    cfg: &GameConfig,
    rng: &mut R,
) -> Option<usize> {
    let witness_location = &roster.0[witness].current_location;
    let r: f32 = rng.r#gen();

    // Rule 1: a living impostor near the witness or lurking at the scene.
    let nearby_impostors: Vec<usize> = roster
        .living_impostor_indices()
        .filter(|&idx| idx != witness)
        .filter(|&idx| {
            let location = &roster.0[idx].current_location;
            location == witness_location || *location == ctx.body_location
        })
        .collect();
    if r < cfg.impostor_bias {
        if let Some(&subject) = nearby_impostors.choose(rng) {
            return Some(subject);
        }
    }

    // Rule 2: the victim, when the witness plausibly crossed their path.
    if let Some(victim) = ctx.victim {
        let victim_location = &roster.0[victim].current_location;
        let coincides =
            victim_location == witness_location || ctx.body_location == *witness_location;
        if r < cfg.impostor_bias + cfg.victim_bias && coincides && victim != witness {
            return Some(victim);
        }
    }

    // Rule 3: anyone unremarkable; impostors only as a last resort.
    let bystanders: Vec<usize> = roster
        .living_indices()
        .filter(|&idx| idx != witness && Some(idx) != ctx.victim)
        .filter(|&idx| roster.0[idx].role.is_crew_aligned())
        .collect();
    if let Some(&subject) = bystanders.choose(rng) {
        return Some(subject);
    }
    let leftovers: Vec<usize> = roster
        .living_impostor_indices()
        .filter(|&idx| idx != witness && !nearby_impostors.contains(&idx))
        .collect();
    leftovers.choose(rng).copied()
}

fn build_record<R: Rng>(
    roster: &Roster,
    catalog: &EvidenceCatalog,
    ctx: &RoundContext,
    witness: usize,
    subject: usize,
    cfg: &GameConfig,
    rng: &mut R,
) -> SightingRecord {
    let subject_p = &roster.0[subject];
    let is_body_sighting = Some(subject) == ctx.victim && !subject_p.alive;

    // The body flag changes the phrasing only; the reported room is always
    // the subject's claimed location, jitter aside.
    let mut location = subject_p.claimed_location.clone();
    if rng.r#gen::<f32>() < cfg.jitter_chance {
        if let Some(room) = catalog.adjacent_to(&location).choose(rng) {
            location = (*room).to_string();
        }
    }

    let recency = *Recency::ALL.choose(rng).unwrap_or(&Recency::Recently);
    SightingRecord {
        witness: roster.0[witness].name.clone(),
        subject: subject_p.name.clone(),
        location,
        recency,
        is_body_sighting,
    }
}
