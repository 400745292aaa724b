//! Console rendering of meeting reports and the final reveal.

use airlock_game::{MeetingReport, Presenter, Roster, Verdict};
use colored::Colorize;

/// Prints the full round transcript to stdout.
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Presenter for ConsolePresenter {
    fn present(&mut self, report: &MeetingReport) {
        println!();
        println!(
            "{}",
            format!("--- Round {}: emergency meeting ---", report.round)
                .bright_cyan()
                .bold()
        );

        if let (Some(victim), Some(room)) = (&report.victim, &report.body_location) {
            println!("{}", format!("{victim} has been found dead.").bright_red());
            println!("The body was discovered in {room}.");
        }
        if let Some(reporter) = &report.reporter {
            println!("Reported by {reporter}.");
        }
        if let Some(sabotage) = report.sabotage {
            println!("{}", format!("Sabotage: {}!", sabotage.label()).bright_yellow());
        }

        println!();
        println!("{}", "Statements".bold());
        for statement in &report.statements {
            println!(
                "  {} claims they were in {} ({}).",
                statement.name.bright_white(),
                statement.claimed_location,
                statement.claimed_task
            );
            if let Some(shared) = &statement.shared_finding {
                println!("    {} {shared}", "shares:".bright_magenta());
            }
        }

        if !report.sightings.is_empty() {
            println!();
            println!("{}", "Sightings".bold());
            for sighting in &report.sightings {
                println!("  {}", sighting.statement());
            }
        }
    }

    fn announce(&mut self, verdict: Verdict, roster: &Roster) {
        println!();
        let headline = verdict.headline();
        match verdict {
            Verdict::CrewWins => println!("{}", headline.bright_green().bold()),
            Verdict::ImpostorsWin => println!("{}", headline.bright_red().bold()),
            _ => println!("{}", headline.bold()),
        }

        println!();
        println!("{}", "Final reveal".bold());
        for participant in roster.iter() {
            let status = if participant.alive { "alive" } else { "dead" };
            let role = participant.role.label();
            let line = format!("  {:8} {:10} {status}", participant.name, role);
            if participant.role.is_impostor() {
                println!("{}", line.red());
            } else {
                println!("{line}");
            }
        }
    }
}

/// Swallows everything; used for sweeps where only verdicts matter.
#[derive(Debug, Default)]
pub struct QuietPresenter;

impl Presenter for QuietPresenter {
    fn present(&mut self, _report: &MeetingReport) {}

    fn announce(&mut self, _verdict: Verdict, _roster: &Roster) {}
}
