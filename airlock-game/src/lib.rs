//! Airlock Game Engine
//!
//! Platform-agnostic core logic for the Airlock hidden-role deduction game.
//! This crate simulates rounds of play (murder, evidence, meeting, vote)
//! without any UI or platform-specific dependencies; presentation and
//! interactive voting plug in through the [`Presenter`] and
//! [`BallotSource`] traits.

pub mod alibi;
pub mod catalog;
pub mod config;
mod constants;
pub mod investigation;
pub mod murder;
pub mod roles;
pub mod roster;
pub mod round;
pub mod sabotage;
pub mod sighting;
pub mod vote;
pub mod win;

// Re-export commonly used types
pub use catalog::{EvidenceCatalog, FILLER_TASK, Room};
pub use config::{ConfigError, GameConfig};
pub use murder::{SetupAbort, resolve_murder};
pub use roster::{
    Finding, NAME_POOL, Participant, Role, Roster, ScanReading, TaskList, TaskSlot,
};
pub use round::{
    BallotDriver, BallotRequest, BallotSource, Game, MeetingReport, ParticipantStatement,
    Presenter, RngBundle, RoundContext,
};
pub use sabotage::SabotageKind;
pub use sighting::{Recency, SightingRecord};
pub use vote::{Ballot, BallotError, automated_ballot, tally_votes};
pub use win::{Verdict, evaluate, evaluate_stalemate};
