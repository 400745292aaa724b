//! Statistical checks on the sighting roll over a large sample.

use airlock_game::sighting::generate_sightings;
use airlock_game::{
    EvidenceCatalog, GameConfig, Participant, Role, Roster, RoundContext, SabotageKind,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

const DRAWS: usize = 10_000;
const TOLERANCE: f64 = 0.03;

fn two_person_roster() -> Roster {
    let mut red = Participant::new("Red");
    red.role = Role::Impostor;
    red.current_location = String::from("Electrical");
    red.claimed_location = String::from("Electrical");
    red.claimed_task = String::from("fixing wires");
    let mut blue = Participant::new("Blue");
    blue.current_location = String::from("Medbay");
    blue.claimed_location = String::from("Medbay");
    blue.claimed_task = String::from("submitting scan");
    Roster(vec![red, blue])
}

fn observed_rate(sabotage: Option<SabotageKind>, seed: u64) -> f64 {
    let roster = two_person_roster();
    let catalog = EvidenceCatalog::default_catalog();
    let cfg = GameConfig::default();
    let mut rng = ChaCha20Rng::seed_from_u64(seed);

    let mut produced = 0usize;
    let mut rolls = 0usize;
    for _ in 0..DRAWS / 2 {
        let mut ctx = RoundContext::new();
        ctx.sabotage = sabotage;
        generate_sightings(&roster, &catalog, &cfg, &mut ctx, &mut rng);
        produced += ctx.sightings.len();
        rolls += roster.len();
    }
    produced as f64 / rolls as f64
}

#[test]
fn baseline_sighting_rate_matches_the_configured_chance() {
    let rate = observed_rate(None, 1);
    let expected = f64::from(GameConfig::default().sighting_chance);
    assert!(
        (rate - expected).abs() < TOLERANCE,
        "observed {rate:.4}, expected {expected:.2} +/- {TOLERANCE}"
    );
}

#[test]
fn lights_out_halves_the_observed_rate() {
    let cfg = GameConfig::default();
    let expected = f64::from(cfg.sighting_chance * (1.0 - cfg.lights_out_reduction));
    let rate = observed_rate(Some(SabotageKind::LightsOut), 2);
    assert!(
        (rate - expected).abs() < TOLERANCE,
        "observed {rate:.4}, expected {expected:.2} +/- {TOLERANCE}"
    );
}
