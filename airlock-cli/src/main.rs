mod interactive;
mod transcript;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs;
use std::path::PathBuf;

use airlock_game::{BallotDriver, EvidenceCatalog, Game, GameConfig, Verdict};
use interactive::InteractiveBallots;
use transcript::{ConsolePresenter, QuietPresenter};

#[derive(Debug, Parser)]
#[command(name = "airlock", version)]
#[command(about = "Round simulator for the Airlock hidden-role deduction game")]
struct Args {
    /// Seed for the simulation streams
    #[arg(long, default_value_t = 1337)]
    seed: u64,

    /// Number of participants (clamped to 4-10)
    #[arg(long, default_value_t = 6)]
    players: usize,

    /// Number of impostors (clamped to the legal range for the roster)
    #[arg(long, default_value_t = 1)]
    impostors: usize,

    /// JSON file overriding the probability table (partial files are fine)
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file describing the station rooms and tasks
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Prompt for every vote on stdin instead of the automated policy
    #[arg(short, long)]
    interactive: bool,

    /// Run this many automated games on consecutive seeds and summarize
    #[arg(long, default_value_t = 1)]
    games: u64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let cfg = load_config(&args)?;
    let catalog = load_catalog(&args)?;

    if args.games > 1 && !args.interactive {
        run_sweep(&args, &cfg, &catalog)
    } else {
        run_single(&args, cfg, catalog)
    }
}

fn load_config(args: &Args) -> Result<GameConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config in {}", path.display()))?
        }
        None => GameConfig::default(),
    };
    cfg.impostors = args.impostors;
    cfg.validate()
        .map_err(|e| anyhow::anyhow!("rejecting configuration: {e}"))?;
    Ok(cfg)
}

fn load_catalog(args: &Args) -> Result<EvidenceCatalog> {
    match &args.catalog {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let catalog = EvidenceCatalog::from_json(&raw)
                .with_context(|| format!("invalid catalog in {}", path.display()))?;
            anyhow::ensure!(!catalog.is_empty(), "catalog has no rooms");
            Ok(catalog)
        }
        None => Ok(EvidenceCatalog::default_catalog()),
    }
}

fn run_single(args: &Args, cfg: GameConfig, catalog: EvidenceCatalog) -> Result<()> {
    println!("{}", "Airlock".bright_cyan().bold());
    println!("{}", "=======".cyan());
    println!("seed {}, {} players", args.seed, args.players);

    let mut game = Game::new(cfg, catalog, args.players, args.seed);
    let mut presenter = ConsolePresenter::new();
    let verdict = if args.interactive {
        let mut source = InteractiveBallots::new();
        game.run(&mut presenter, &mut BallotDriver::External(&mut source))
    } else {
        game.run(&mut presenter, &mut BallotDriver::Automated)
    }
    .context("game aborted on an invalid ballot")?;

    log::info!("finished after {} round(s): {verdict:?}", game.round());
    Ok(())
}

fn run_sweep(args: &Args, cfg: &GameConfig, catalog: &EvidenceCatalog) -> Result<()> {
    println!("{}", "Airlock verdict sweep".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let mut tally = SweepTally::default();
    for offset in 0..args.games {
        let seed = args.seed.wrapping_add(offset);
        let mut game = Game::new(cfg.clone(), catalog.clone(), args.players, seed);
        let verdict = game
            .run(&mut QuietPresenter, &mut BallotDriver::Automated)
            .with_context(|| format!("seed {seed} aborted on an invalid ballot"))?;
        tally.record(verdict, game.round());
    }

    print!("{}", tally.summary(args.games));
    Ok(())
}

#[derive(Debug, Default)]
struct SweepTally {
    crew: u64,
    impostors: u64,
    draws: u64,
    rounds: u64,
}

impl SweepTally {
    fn record(&mut self, verdict: Verdict, rounds: u32) {
        match verdict {
            Verdict::CrewWins => self.crew += 1,
            Verdict::ImpostorsWin => self.impostors += 1,
            Verdict::Draw | Verdict::Continues => self.draws += 1,
        }
        self.rounds += u64::from(rounds);
    }

    fn summary(&self, games: u64) -> String {
        let pct = |n: u64| 100.0 * n as f64 / games.max(1) as f64;
        let mut out = String::new();
        out.push_str(&format!("games:         {games}\n"));
        out.push_str(&format!("crew wins:     {} ({:.1}%)\n", self.crew, pct(self.crew)));
        out.push_str(&format!(
            "impostor wins: {} ({:.1}%)\n",
            self.impostors,
            pct(self.impostors)
        ));
        out.push_str(&format!("draws:         {} ({:.1}%)\n", self.draws, pct(self.draws)));
        out.push_str(&format!(
            "mean rounds:   {:.2}\n",
            self.rounds as f64 / games.max(1) as f64
        ));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sweep_tally_summarizes_counts_and_rates() {
        let mut tally = SweepTally::default();
        tally.record(Verdict::CrewWins, 3);
        tally.record(Verdict::ImpostorsWin, 5);
        tally.record(Verdict::CrewWins, 4);
        tally.record(Verdict::Draw, 12);

        let summary = tally.summary(4);
        assert!(summary.contains("crew wins:     2 (50.0%)"));
        assert!(summary.contains("impostor wins: 1 (25.0%)"));
        assert!(summary.contains("draws:         1 (25.0%)"));
        assert!(summary.contains("mean rounds:   6.00"));
    }

    #[test]
    fn default_args_load_default_config_and_catalog() {
        let args = Args::parse_from(["airlock"]);
        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.impostors, 1);
        let catalog = load_catalog(&args).unwrap();
        assert!(!catalog.is_empty());
    }

    #[test]
    fn config_overlay_keeps_unlisted_defaults() {
        let temp = std::env::temp_dir().join("airlock-config.json");
        std::fs::write(&temp, r#"{ "sighting_chance": 0.9 }"#).unwrap();
        let args = Args::parse_from([
            "airlock",
            "--config",
            temp.to_str().unwrap(),
            "--impostors",
            "2",
        ]);
        let cfg = load_config(&args).unwrap();
        assert!((cfg.sighting_chance - 0.9).abs() < f32::EPSILON);
        assert_eq!(cfg.impostors, 2);
        assert!((cfg.lie_quality - GameConfig::default().lie_quality).abs() < f32::EPSILON);
    }

    #[test]
    fn out_of_range_config_is_rejected() {
        let temp = std::env::temp_dir().join("airlock-bad-config.json");
        std::fs::write(&temp, r#"{ "sighting_chance": 1.5 }"#).unwrap();
        let args = Args::parse_from(["airlock", "--config", temp.to_str().unwrap()]);
        assert!(load_config(&args).is_err());
    }
}
