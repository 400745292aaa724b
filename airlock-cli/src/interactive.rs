//! Stdin-driven ballot source for interactive play.

use std::io::{self, BufRead, Write};

use airlock_game::{BallotRequest, BallotSource};
use colored::Colorize;

/// Prompts on stdout and reads one vote per request from stdin.
///
/// Re-prompts until the answer names an eligible target or the voter
/// abstains, so the engine only ever sees valid ballots from this source.
#[derive(Debug, Default)]
pub struct InteractiveBallots;

impl InteractiveBallots {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn prompt(request: &BallotRequest<'_>) {
        println!();
        println!(
            "{} it is {}'s turn to vote.",
            "Vote:".bold(),
            request.voter.bright_white()
        );
        if let Some(finding) = request.finding {
            println!("  (private note: {})", finding.statement().bright_magenta());
        }
        println!("  eligible: {}", request.eligible.join(", "));
        println!("  enter a name, or press enter to skip.");
    }
}

impl BallotSource for InteractiveBallots {
    fn cast(&mut self, request: &BallotRequest<'_>) -> Option<String> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();
        Self::prompt(request);
        loop {
            print!("> ");
            let _ = io::stdout().flush();
            let line = match lines.next() {
                Some(Ok(line)) => line,
                // EOF or a broken pipe counts as abstaining.
                _ => return None,
            };
            match parse_choice(&line, &request.eligible) {
                Choice::Abstain => return None,
                Choice::Target(name) => return Some(name),
                Choice::Invalid => {
                    println!(
                        "{}",
                        format!("'{}' is not on the ballot, try again.", line.trim()).yellow()
                    );
                }
            }
        }
    }
}

enum Choice {
    Abstain,
    Target(String),
    Invalid,
}

fn parse_choice(line: &str, eligible: &[&str]) -> Choice {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("skip") {
        return Choice::Abstain;
    }
    eligible
        .iter()
        .find(|name| name.eq_ignore_ascii_case(trimmed))
        .map_or(Choice::Invalid, |name| Choice::Target((*name).to_string()))
}
