//! Round orchestration: the ordered pipeline that turns one round of
//! hidden-role play into evidence, a meeting, a vote and a verdict.

use hmac::{Hmac, Mac};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::cell::{RefCell, RefMut};

use crate::alibi::{assign_tasks, refresh_alibi};
use crate::catalog::EvidenceCatalog;
use crate::config::GameConfig;
use crate::constants::{REVEAL_BASELINE, REVEAL_DETECTIVE_SUSPICIOUS, REVEAL_MEDIC_SUSPICIOUS};
use crate::investigation::run_investigations;
use crate::murder::resolve_murder;
use crate::roles::assign_roles;
use crate::roster::{Finding, Roster};
use crate::sabotage::{SabotageKind, maybe_sabotage};
use crate::sighting::{SightingRecord, generate_sightings};
use crate::vote::{Ballot, BallotError, automated_ballot, eligible_targets, tally_votes};
use crate::win::{Verdict, evaluate, evaluate_stalemate};

/// Everything one round produces. Recreated from scratch each round;
/// participants are referenced by roster index.
#[derive(Debug, Clone, Default)]
pub struct RoundContext {
    pub victim: Option<usize>,
    pub acting_impostor: Option<usize>,
    pub reporter: Option<usize>,
    pub body_location: String,
    pub sabotage: Option<SabotageKind>,
    pub sightings: Vec<SightingRecord>,
    /// Append-only public record of the round, in generation order.
    pub facts: Vec<String>,
}

impl RoundContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fact(&mut self, fact: String) {
        self.facts.push(fact);
    }
}

/// Deterministic bundle of RNG streams segregated by round phase.
///
/// Streams are derived from one user seed so a draw in one phase never
/// shifts another phase's sequence.
#[derive(Debug, Clone)]
pub struct RngBundle {
    setup: RefCell<CountingRng<SmallRng>>,
    alibi: RefCell<CountingRng<SmallRng>>,
    murder: RefCell<CountingRng<SmallRng>>,
    sabotage: RefCell<CountingRng<SmallRng>>,
    sighting: RefCell<CountingRng<SmallRng>>,
    investigation: RefCell<CountingRng<SmallRng>>,
    ballot: RefCell<CountingRng<SmallRng>>,
    reveal: RefCell<CountingRng<SmallRng>>,
}

impl RngBundle {
    /// Construct the bundle from a user-visible seed.
    #[must_use]
    pub fn from_user_seed(seed: u64) -> Self {
        let stream = |tag: &[u8]| RefCell::new(CountingRng::new(derive_stream_seed(seed, tag)));
        Self {
            setup: stream(b"setup"),
            alibi: stream(b"alibi"),
            murder: stream(b"murder"),
            sabotage: stream(b"sabotage"),
            sighting: stream(b"sighting"),
            investigation: stream(b"investigation"),
            ballot: stream(b"ballot"),
            reveal: stream(b"reveal"),
        }
    }

    #[must_use]
    pub fn setup(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.setup.borrow_mut()
    }

    #[must_use]
    pub fn alibi(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.alibi.borrow_mut()
    }

    #[must_use]
    pub fn murder(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.murder.borrow_mut()
    }

    #[must_use]
    pub fn sabotage(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.sabotage.borrow_mut()
    }

    #[must_use]
    pub fn sighting(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.sighting.borrow_mut()
    }

    #[must_use]
    pub fn investigation(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.investigation.borrow_mut()
    }

    #[must_use]
    pub fn ballot(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.ballot.borrow_mut()
    }

    #[must_use]
    pub fn reveal(&self) -> RefMut<'_, CountingRng<SmallRng>> {
        self.reveal.borrow_mut()
    }
}

/// Counting wrapper for RNG streams providing instrumentation.
#[derive(Debug, Clone)]
pub struct CountingRng<R> {
    rng: R,
    draws: u64,
}

impl CountingRng<SmallRng> {
    fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            draws: 0,
        }
    }
}

impl<R: RngCore> CountingRng<R> {
    /// Number of draw calls performed against this stream.
    #[must_use]
    pub const fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngCore> RngCore for CountingRng<R> {
    fn next_u32(&mut self) -> u32 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.draws = self.draws.saturating_add(1);
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.draws = self.draws.saturating_add(1);
        self.rng.fill_bytes(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.draws = self.draws.saturating_add(1);
        self.rng.try_fill_bytes(dest)
    }
}

fn derive_stream_seed(user_seed: u64, domain_tag: &[u8]) -> u64 {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(&user_seed.to_le_bytes()).expect("64-bit seed is valid key");
    mac.update(domain_tag);
    let digest = mac.finalize().into_bytes();
    let seed_bytes: [u8; 8] = digest[..8].try_into().expect("digest slice length");
    u64::from_le_bytes(seed_bytes)
}

/// One living participant's public statement at the meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantStatement {
    pub name: String,
    pub claimed_location: String,
    pub claimed_task: String,
    /// A private finding the holder chose to share aloud, already rendered.
    pub shared_finding: Option<String>,
}

/// The packaged meeting a presenter receives after evidence generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingReport {
    pub round: u32,
    pub victim: Option<String>,
    pub body_location: Option<String>,
    pub reporter: Option<String>,
    pub sabotage: Option<SabotageKind>,
    pub statements: Vec<ParticipantStatement>,
    pub sightings: Vec<SightingRecord>,
    pub facts: Vec<String>,
}

/// Receives meeting reports and the final verdict. Fire and forget: the
/// engine never reads anything back.
pub trait Presenter {
    fn present(&mut self, report: &MeetingReport);

    fn announce(&mut self, verdict: Verdict, roster: &Roster);
}

/// What an external ballot source is told about the voter before casting.
#[derive(Debug)]
pub struct BallotRequest<'a> {
    pub voter: &'a str,
    pub eligible: Vec<&'a str>,
    pub finding: Option<&'a Finding>,
}

/// Supplies one vote per living voter. `None` abstains. A returned name
/// is validated by the engine against the eligible set and rejected as a
/// [`BallotError`] when it does not match; the engine never coerces it.
pub trait BallotSource {
    fn cast(&mut self, request: &BallotRequest<'_>) -> Option<String>;
}

/// Where this game's ballots come from: the built-in role-aware policy,
/// or an external source such as an interactive prompt.
pub enum BallotDriver<'a> {
    Automated,
    External(&'a mut dyn BallotSource),
}

/// One full game: roster, catalog, probability table and the seeded
/// stream bundle, advanced round by round until a terminal verdict.
#[derive(Debug)]
pub struct Game {
    cfg: GameConfig,
    catalog: EvidenceCatalog,
    roster: Roster,
    rng: RngBundle,
    round: u32,
    verdict: Verdict,
}

impl Game {
    /// Bootstrap a game: draw names, assign roles, derive the streams.
    ///
    /// The configuration is sanitized and the impostor count clamped
    /// against the final roster size before roles are dealt.
    #[must_use]
    pub fn new(
        mut cfg: GameConfig,
        catalog: EvidenceCatalog,
        participants: usize,
        seed: u64,
    ) -> Self {
        cfg.sanitize();
        let rng = RngBundle::from_user_seed(seed);
        let mut roster = Roster::from_name_pool(participants, &mut *rng.setup());
        cfg.impostors = cfg.sanitize_impostors(roster.len());
        let impostors = assign_roles(&mut roster, cfg.impostors, &mut *rng.setup());
        log::info!(
            "game seeded: {} participants, {} impostor(s)",
            roster.len(),
            impostors.len()
        );
        Self {
            cfg,
            catalog,
            roster,
            rng,
            round: 0,
            verdict: Verdict::Continues,
        }
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    #[must_use]
    pub const fn cfg(&self) -> &GameConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Play rounds until a terminal verdict or the stalemate cutoff,
    /// then reveal every role and announce the outcome.
    ///
    /// # Errors
    ///
    /// Propagates [`BallotError`] when an external ballot source returns
    /// an ineligible target.
    pub fn run<P: Presenter>(
        &mut self,
        presenter: &mut P,
        ballots: &mut BallotDriver<'_>,
    ) -> Result<Verdict, BallotError> {
        let cutoff = GameConfig::stalemate_cutoff(self.roster.len());
        while !self.verdict.is_terminal() {
            if self.round >= cutoff {
                log::info!("round cutoff {cutoff} reached, forcing a terminal outcome");
                self.verdict = evaluate_stalemate(&self.roster);
                break;
            }
            self.verdict = self.play_round(presenter, ballots)?;
        }
        self.roster.reveal_all();
        presenter.announce(self.verdict, &self.roster);
        Ok(self.verdict)
    }

    /// Execute one round of the pipeline and return the standing verdict.
    ///
    /// Phase order is fixed: alibis, murder, sabotage, sightings,
    /// investigations, meeting, ballots, tally, ejection, win check. A
    /// murder precondition failure skips straight to the win check.
    ///
    /// # Errors
    ///
    /// Propagates [`BallotError`] when an external ballot source returns
    /// an ineligible target.
    pub fn play_round<P: Presenter>(
        &mut self,
        presenter: &mut P,
        ballots: &mut BallotDriver<'_>,
    ) -> Result<Verdict, BallotError> {
        self.round += 1;
        log::debug!("round {} begins", self.round);
        let mut ctx = RoundContext::new();

        self.refresh_round_state();

        if let Err(abort) = resolve_murder(
            &mut self.roster,
            &self.catalog,
            &self.cfg,
            &mut ctx,
            &mut *self.rng.murder(),
        ) {
            log::warn!("round {} aborted: {abort}", self.round);
            self.verdict = evaluate(&self.roster);
            return Ok(self.verdict);
        }

        maybe_sabotage(&self.roster, &self.cfg, &mut ctx, &mut *self.rng.sabotage());
        generate_sightings(
            &self.roster,
            &self.catalog,
            &self.cfg,
            &mut ctx,
            &mut *self.rng.sighting(),
        );
        run_investigations(
            &mut self.roster,
            &self.cfg,
            &mut ctx,
            &mut *self.rng.investigation(),
        );

        let report = self.build_report(&ctx);
        presenter.present(&report);

        let cast = self.collect_ballots(&ctx, ballots)?;
        let ejected = tally_votes(&cast, &mut ctx);
        if let Some(name) = ejected {
            self.eject(&name, &mut ctx);
        }

        self.verdict = evaluate(&self.roster);
        log::debug!(
            "round {} verdict: {:?}, {} living",
            self.round,
            self.verdict,
            self.roster.living_indices().count()
        );
        Ok(self.verdict)
    }

    /// Fresh tasks for the crew-aligned and a current alibi for everyone
    /// still breathing.
    fn refresh_round_state(&mut self) {
        let mut rng = self.rng.alibi();
        let living: Vec<usize> = self.roster.living_indices().collect();
        for idx in living {
            if self.roster.0[idx].role.is_crew_aligned() {
                assign_tasks(&mut self.roster.0[idx], &self.catalog, &mut *rng);
            }
            refresh_alibi(&mut self.roster.0[idx], &self.catalog, &mut *rng);
        }
    }

    fn build_report(&self, ctx: &RoundContext) -> MeetingReport {
        let mut rng = self.rng.reveal();
        let statements = self
            .roster
            .living()
            .map(|(_, p)| {
                let shared_finding = p.finding.as_ref().and_then(|finding| {
                    let chance = match finding {
                        Finding::MedicScan { .. } if finding.is_suspicious() => {
                            REVEAL_MEDIC_SUSPICIOUS
                        }
                        Finding::DetectiveClue { .. } if finding.is_suspicious() => {
                            REVEAL_DETECTIVE_SUSPICIOUS
                        }
                        _ => REVEAL_BASELINE,
                    };
                    (rng.r#gen::<f32>() < chance).then(|| finding.statement())
                });
                ParticipantStatement {
                    name: p.name.clone(),
                    claimed_location: p.claimed_location.clone(),
                    claimed_task: p.claimed_task.clone(),
                    shared_finding,
                }
            })
            .collect();

        MeetingReport {
            round: self.round,
            victim: ctx.victim.map(|idx| self.roster.0[idx].name.clone()),
            body_location: (!ctx.body_location.is_empty()).then(|| ctx.body_location.clone()),
            reporter: ctx.reporter.map(|idx| self.roster.0[idx].name.clone()),
            sabotage: ctx.sabotage,
            statements,
            sightings: ctx.sightings.clone(),
            facts: ctx.facts.clone(),
        }
    }

    fn collect_ballots(
        &self,
        ctx: &RoundContext,
        driver: &mut BallotDriver<'_>,
    ) -> Result<Vec<Ballot>, BallotError> {
        let voters: Vec<usize> = self
            .roster
            .living_indices()
            .filter(|&idx| Some(idx) != ctx.victim)
            .collect();

        let mut cast = Vec::with_capacity(voters.len());
        for voter in voters {
            let eligible = eligible_targets(&self.roster, ctx, voter);
            if eligible.is_empty() {
                continue;
            }
            let ballot = match driver {
                BallotDriver::Automated => automated_ballot(
                    &self.roster,
                    &self.cfg,
                    ctx,
                    voter,
                    &mut *self.rng.ballot(),
                )
                .map(|target| Ballot {
                    voter: self.roster.0[voter].name.clone(),
                    target,
                }),
                BallotDriver::External(source) => {
                    self.external_ballot(voter, &eligible, *source)?
                }
            };
            if let Some(ballot) = ballot {
                cast.push(ballot);
            }
        }
        Ok(cast)
    }

    /// Ask an external source for one ballot and validate the answer.
    fn external_ballot(
        &self,
        voter: usize,
        eligible: &[usize],
        source: &mut dyn BallotSource,
    ) -> Result<Option<Ballot>, BallotError> {
        let request = BallotRequest {
            voter: &self.roster.0[voter].name,
            eligible: eligible
                .iter()
                .map(|&idx| self.roster.0[idx].name.as_str())
                .collect(),
            finding: self.roster.0[voter].finding.as_ref(),
        };
        let Some(target) = source.cast(&request) else {
            return Ok(None);
        };
        let Some(target_idx) = self
            .roster
            .index_of(&target)
            .filter(|idx| eligible.contains(idx))
        else {
            return Err(BallotError::InvalidTarget {
                voter: self.roster.0[voter].name.clone(),
                target,
            });
        };
        Ok(Some(Ballot {
            voter: self.roster.0[voter].name.clone(),
            target: self.roster.0[target_idx].name.clone(),
        }))
    }

    /// Kill and unmask the ejected participant.
    fn eject(&mut self, name: &str, ctx: &mut RoundContext) {
        if let Some(idx) = self.roster.index_of(name) {
            self.roster.0[idx].alive = false;
            self.roster.0[idx].revealed = true;
            let role = self.roster.0[idx].role.label();
            ctx.fact(format!("{name} was ejected. They were {role}."));
            log::info!("round {}: {name} ejected ({role})", self.round);
        }
    }
}
