//! Ballot collection policy and the deterministic tally.

use std::collections::BTreeMap;

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::config::GameConfig;
use crate::roster::Roster;
use crate::round::RoundContext;

/// One cast vote, already validated against the eligible set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ballot {
    pub voter: String,
    pub target: String,
}

/// A ballot the engine cannot accept. Automated sources returning one of
/// these is a programming error, never coerced into a valid vote.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BallotError {
    #[error("{voter} voted for unknown or ineligible target '{target}'")]
    InvalidTarget { voter: String, target: String },
}

/// Names a living voter may legally put on a ballot: everyone alive except
/// the voter and the round's victim.
#[must_use]
pub fn eligible_targets(roster: &Roster, ctx: &RoundContext, voter: usize) -> Vec<usize> {
    roster
        .living_indices()
        .filter(|&idx| idx != voter && Some(idx) != ctx.victim)
        .collect()
}

/// The automated ballot policy.
///
/// Impostors dump suspicion on a uniform crew-aligned target. A special
/// role holding a suspicious finding usually follows it. Everyone else
/// lands on a real impostor with probability `accusation_accuracy`, and on
/// a uniform eligible target otherwise. Returns `None` when the voter has
/// no legal target.
pub fn automated_ballot<R: Rng>(
    roster: &Roster,
    cfg: &GameConfig,
    ctx: &RoundContext,
    voter: usize,
    rng: &mut R,
) -> Option<String> {
    let eligible = eligible_targets(roster, ctx, voter);
    if eligible.is_empty() {
        return None;
    }

    let pick = |idx: usize| roster.0[idx].name.clone();

    if roster.0[voter].role.is_impostor() {
        let crew: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|&idx| roster.0[idx].role.is_crew_aligned())
            .collect();
        return crew
            .choose(rng)
            .or_else(|| eligible.choose(rng))
            .copied()
            .map(pick);
    }

    if let Some(finding) = &roster.0[voter].finding {
        if finding.is_suspicious() && rng.r#gen::<f32>() < cfg.finding_follow_chance {
            if let Some(idx) = roster.index_of(finding.target()) {
                if eligible.contains(&idx) {
                    return Some(pick(idx));
                }
            }
        }
    }

    if rng.r#gen::<f32>() < cfg.accusation_accuracy {
        let impostors: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|&idx| roster.0[idx].role.is_impostor())
            .collect();
        if let Some(&idx) = impostors.choose(rng) {
            return Some(pick(idx));
        }
    }
    eligible.choose(rng).copied().map(pick)
}

/// Count ballots and decide the ejection. Randomness-free: a unique
/// maximum ejects its target, a tie or an empty ballot set ejects no one.
/// Both outcomes land in the fact log.
pub fn tally_votes(ballots: &[Ballot], ctx: &mut RoundContext) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for ballot in ballots {
        *counts.entry(ballot.target.as_str()).or_default() += 1;
        ctx.fact(format!("{} votes for {}.", ballot.voter, ballot.target));
    }

    let Some(max) = counts.values().copied().max() else {
        ctx.fact(String::from("No votes were cast. No one is ejected."));
        return None;
    };
    let leaders: Vec<&str> = counts
        .iter()
        .filter(|&(_, &count)| count == max)
        .map(|(&name, _)| name)
        .collect();
    if let [leader] = leaders[..] {
        ctx.fact(format!("{leader} is ejected with {max} vote(s)."));
        Some(leader.to_string())
    } else {
        ctx.fact(String::from("The vote is tied. No one is ejected."));
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Finding, Participant, Role, ScanReading};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn ballots(pairs: &[(&str, &str)]) -> Vec<Ballot> {
        pairs
            .iter()
            .map(|(voter, target)| Ballot {
                voter: (*voter).to_string(),
                target: (*target).to_string(),
            })
            .collect()
    }

    fn roster_of(roles: &[(&str, Role)]) -> Roster {
        Roster(
            roles
                .iter()
                .map(|(name, role)| {
                    let mut p = Participant::new(name);
                    p.role = *role;
                    p
                })
                .collect(),
        )
    }

    #[test]
    fn unique_maximum_ejects_its_target() {
        let mut ctx = RoundContext::new();
        let outcome = tally_votes(&ballots(&[("A", "B"), ("C", "B"), ("D", "E")]), &mut ctx);
        assert_eq!(outcome.as_deref(), Some("B"));
        assert!(ctx.facts.iter().any(|f| f.contains("B is ejected")));
    }

    #[test]
    fn tie_at_the_maximum_ejects_no_one() {
        let mut ctx = RoundContext::new();
        let outcome = tally_votes(&ballots(&[("A", "B"), ("C", "D")]), &mut ctx);
        assert_eq!(outcome, None);
        assert!(ctx.facts.iter().any(|f| f.contains("tied")));
    }

    #[test]
    fn empty_ballot_set_ejects_no_one() {
        let mut ctx = RoundContext::new();
        let outcome = tally_votes(&[], &mut ctx);
        assert_eq!(outcome, None);
        assert!(ctx.facts.iter().any(|f| f.contains("No votes were cast")));
    }

    #[test]
    fn impostors_only_accuse_the_crew() {
        let roster = roster_of(&[
            ("Red", Role::Impostor),
            ("Blue", Role::Crew),
            ("Green", Role::Impostor),
            ("Pink", Role::Crew),
        ]);
        let ctx = RoundContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        for _ in 0..40 {
            let target = automated_ballot(&roster, &GameConfig::default(), &ctx, 0, &mut rng)
                .expect("target exists");
            assert!(target == "Blue" || target == "Pink");
        }
    }

    #[test]
    fn suspicious_finding_is_always_followed_at_full_chance() {
        let mut roster = roster_of(&[
            ("Red", Role::Impostor),
            ("Blue", Role::Medic),
            ("Green", Role::Crew),
        ]);
        roster.0[1].finding = Some(Finding::MedicScan {
            target: String::from("Red"),
            reading: ScanReading::Suspicious,
        });
        let cfg = GameConfig {
            finding_follow_chance: 1.0,
            ..GameConfig::default()
        };
        let ctx = RoundContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for _ in 0..20 {
            let target =
                automated_ballot(&roster, &cfg, &ctx, 1, &mut rng).expect("target exists");
            assert_eq!(target, "Red");
        }
    }

    #[test]
    fn clear_finding_is_never_followed() {
        let mut roster = roster_of(&[
            ("Red", Role::Impostor),
            ("Blue", Role::Medic),
            ("Green", Role::Crew),
        ]);
        roster.0[1].finding = Some(Finding::MedicScan {
            target: String::from("Green"),
            reading: ScanReading::Clear,
        });
        let cfg = GameConfig {
            finding_follow_chance: 1.0,
            accusation_accuracy: 1.0,
            ..GameConfig::default()
        };
        let ctx = RoundContext::new();
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for _ in 0..20 {
            // With full accusation accuracy the fallback always lands on
            // the impostor, so following the clear finding would show up.
            let target =
                automated_ballot(&roster, &cfg, &ctx, 1, &mut rng).expect("target exists");
            assert_eq!(target, "Red");
        }
    }

    #[test]
    fn voter_without_legal_target_abstains() {
        let mut roster = roster_of(&[("Red", Role::Impostor), ("Blue", Role::Crew)]);
        roster.0[1].alive = false;
        let mut ctx = RoundContext::new();
        ctx.victim = Some(1);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(
            automated_ballot(&roster, &GameConfig::default(), &ctx, 0, &mut rng),
            None
        );
    }
}
