//! Victim selection, body-location fabrication and the acting impostor's
//! cover story.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::alibi::refresh_alibi;
use crate::catalog::{EvidenceCatalog, FILLER_TASK};
use crate::config::GameConfig;
use crate::roster::Roster;
use crate::round::RoundContext;

/// A round that cannot produce a murder. Recoverable: the orchestrator
/// skips evidence generation and re-evaluates win conditions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupAbort {
    #[error("no living impostor can act this round")]
    NoLivingImpostor,
    #[error("no living crew-aligned victim is available")]
    NoEligibleVictim,
}

/// Resolve the off-stage murder for this round.
///
/// On success the victim is dead, the acting impostor's current and
/// claimed state point at the fabricated body location, a reporter is
/// chosen, every other living participant's alibi is refreshed and the
/// discovery facts are logged.
///
/// # Errors
///
/// Returns [`SetupAbort`] when no living impostor or no eligible victim
/// exists; the roster is left untouched in that case.
pub fn resolve_murder<R: Rng>(
    roster: &mut Roster,
    catalog: &EvidenceCatalog,
    cfg: &GameConfig,
    ctx: &mut RoundContext,
    rng: &mut R,
) -> Result<(), SetupAbort> {
    let impostors: Vec<usize> = roster.living_impostor_indices().collect();
    let &actor = impostors.choose(rng).ok_or(SetupAbort::NoLivingImpostor)?;

    let victims: Vec<usize> = roster.living_crew_indices().collect();
    let &victim = victims.choose(rng).ok_or(SetupAbort::NoEligibleVictim)?;

    roster.0[victim].alive = false;

    let body_location = fabricate_body_location(roster, catalog, cfg, actor, victim, rng);

    // The cover story: the actor was "working" where the body turned up.
    let fake_task = catalog
        .tasks_at(&body_location)
        .choose(rng)
        .map_or_else(|| FILLER_TASK.to_string(), |label| format!("faking '{label}'"));
    let actor_p = &mut roster.0[actor];
    actor_p.current_location = body_location.clone();
    actor_p.claimed_location = body_location.clone();
    actor_p.current_task = fake_task.clone();
    actor_p.claimed_task = fake_task;

    let reporters: Vec<usize> = roster.living_indices().filter(|&idx| idx != victim).collect();
    let reporter = reporters.choose(rng).copied().unwrap_or(actor);

    {
        let victim_p = &roster.0[victim];
        ctx.fact(format!(
            "Victim: {} (was {}) has been found dead.",
            victim_p.name,
            victim_p.role.label()
        ));
        ctx.fact(format!("Body discovered in: {body_location}."));
        ctx.fact(format!(
            "{}'s last known true location: {} (supposedly doing '{}').",
            victim_p.name, victim_p.current_location, victim_p.current_task
        ));
        ctx.fact(format!("Body reported by: {}.", roster.0[reporter].name));
    }

    // Everyone not involved in the discovery keeps a current alibi.
    let bystanders: Vec<usize> = roster
        .living_indices()
        .filter(|&idx| idx != actor)
        .collect();
    for idx in bystanders {
        refresh_alibi(&mut roster.0[idx], catalog, rng);
    }

    ctx.victim = Some(victim);
    ctx.acting_impostor = Some(actor);
    ctx.reporter = Some(reporter);
    ctx.body_location = body_location;
    Ok(())
}

/// Pick where the body is said to have been found.
///
/// A good lie stays near the truth: the victim's real room, the actor's
/// real room, or a room adjacent to the victim's. A bad lie is any room.
fn fabricate_body_location<R: Rng>(
    roster: &Roster,
    catalog: &EvidenceCatalog,
    cfg: &GameConfig,
    actor: usize,
    victim: usize,
    rng: &mut R,
) -> String {
    let victim_location = roster.0[victim].current_location.clone();
    if rng.r#gen::<f32>() < cfg.lie_quality {
        let mut candidates = vec![victim_location.clone(), roster.0[actor].current_location.clone()];
        let adjacent = catalog.adjacent_to(&victim_location);
        if let Some(room) = adjacent.choose(rng) {
            candidates.push((*room).to_string());
        }
        candidates.sort();
        candidates.dedup();
        candidates
            .choose(rng)
            .cloned()
            .unwrap_or(victim_location)
    } else {
        let rooms: Vec<&str> = catalog.locations().collect();
        rooms
            .choose(rng)
            .map_or(victim_location, |room| (*room).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alibi::{assign_tasks, refresh_alibi};
    use crate::roles::assign_roles;
    use crate::roster::Role;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn prepared_roster(n: usize, k: usize, seed: u64) -> (Roster, EvidenceCatalog) {
        let catalog = EvidenceCatalog::default_catalog();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut roster = Roster::from_name_pool(n, &mut rng);
        assign_roles(&mut roster, k, &mut rng);
        for idx in 0..roster.len() {
            if roster.0[idx].role.is_crew_aligned() {
                assign_tasks(&mut roster.0[idx], &catalog, &mut rng);
            }
            refresh_alibi(&mut roster.0[idx], &catalog, &mut rng);
        }
        (roster, catalog)
    }

    #[test]
    fn victim_is_living_crew_and_dies_exactly_once() {
        for seed in 0..40 {
            let (mut roster, catalog) = prepared_roster(6, 1, seed);
            let mut ctx = RoundContext::new();
            let mut rng = ChaCha20Rng::seed_from_u64(seed + 1000);
            resolve_murder(&mut roster, &catalog, &GameConfig::default(), &mut ctx, &mut rng)
                .expect("murder resolves");

            let victim = ctx.victim.expect("victim set");
            let actor = ctx.acting_impostor.expect("actor set");
            assert_ne!(victim, actor, "impostor never selects themselves");
            assert!(roster.0[victim].role.is_crew_aligned());
            assert!(!roster.0[victim].alive);
            assert_eq!(roster.iter().filter(|p| !p.alive).count(), 1);
        }
    }

    #[test]
    fn actor_claims_the_body_location() {
        let (mut roster, catalog) = prepared_roster(5, 1, 9);
        let mut ctx = RoundContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(77);
        resolve_murder(&mut roster, &catalog, &GameConfig::default(), &mut ctx, &mut rng)
            .expect("murder resolves");

        let actor = &roster.0[ctx.acting_impostor.unwrap()];
        assert_eq!(actor.claimed_location, ctx.body_location);
        assert_eq!(actor.current_location, ctx.body_location);
        assert!(
            actor.claimed_task.starts_with("faking '") || actor.claimed_task == FILLER_TASK
        );
    }

    #[test]
    fn reporter_is_living_and_never_the_victim() {
        for seed in 0..40 {
            let (mut roster, catalog) = prepared_roster(5, 1, seed);
            let mut ctx = RoundContext::new();
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            resolve_murder(&mut roster, &catalog, &GameConfig::default(), &mut ctx, &mut rng)
                .expect("murder resolves");
            let reporter = ctx.reporter.expect("reporter set");
            assert_ne!(reporter, ctx.victim.unwrap());
            assert!(roster.0[reporter].alive);
        }
    }

    #[test]
    fn aborts_without_living_impostor() {
        let (mut roster, catalog) = prepared_roster(5, 1, 2);
        for p in &mut roster.0 {
            if p.role == Role::Impostor {
                p.alive = false;
            }
        }
        let mut ctx = RoundContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let err =
            resolve_murder(&mut roster, &catalog, &GameConfig::default(), &mut ctx, &mut rng)
                .unwrap_err();
        assert_eq!(err, SetupAbort::NoLivingImpostor);
        assert!(ctx.victim.is_none());
    }

    #[test]
    fn aborts_without_eligible_victim() {
        let (mut roster, catalog) = prepared_roster(5, 1, 3);
        for p in &mut roster.0 {
            if p.role.is_crew_aligned() {
                p.alive = false;
            }
        }
        let mut ctx = RoundContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let err =
            resolve_murder(&mut roster, &catalog, &GameConfig::default(), &mut ctx, &mut rng)
                .unwrap_err();
        assert_eq!(err, SetupAbort::NoEligibleVictim);
        assert!(roster.iter().filter(|p| !p.alive).count() > 0);
    }

    #[test]
    fn good_lie_stays_near_the_truth() {
        // With lie_quality = 1.0 the body location is always drawn from the
        // plausible candidate set.
        let cfg = GameConfig {
            lie_quality: 1.0,
            ..GameConfig::default()
        };
        for seed in 0..30 {
            let (mut roster, catalog) = prepared_roster(6, 1, seed);
            let snapshot: Vec<(String, String)> = roster
                .iter()
                .map(|p| (p.name.clone(), p.current_location.clone()))
                .collect();
            let mut ctx = RoundContext::new();
            let mut rng = ChaCha20Rng::seed_from_u64(seed * 7 + 1);
            resolve_murder(&mut roster, &catalog, &cfg, &mut ctx, &mut rng)
                .expect("murder resolves");

            let victim_location = &snapshot[ctx.victim.unwrap()].1;
            let actor_location = &snapshot[ctx.acting_impostor.unwrap()].1;
            let mut plausible: Vec<String> =
                vec![victim_location.clone(), actor_location.clone()];
            plausible.extend(
                catalog
                    .adjacent_to(victim_location)
                    .into_iter()
                    .map(str::to_string),
            );
            assert!(
                plausible.contains(&ctx.body_location),
                "body location {} not in plausible set {plausible:?}",
                ctx.body_location
            );
        }
    }
}
