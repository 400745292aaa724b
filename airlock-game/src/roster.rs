//! Participant state and roster queries.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::MIN_PARTICIPANTS;

/// Fixed pool the bootstrap draws display names from, without replacement.
pub const NAME_POOL: [&str; 10] = [
    "Red", "Blue", "Green", "Yellow", "Pink", "Orange", "Black", "White", "Purple", "Cyan",
];

/// Assigned role, fixed for the life of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Crew,
    Impostor,
    Medic,
    Detective,
}

impl Role {
    #[must_use]
    pub const fn is_impostor(self) -> bool {
        matches!(self, Self::Impostor)
    }

    /// Medic and Detective count with the crew for win conditions.
    #[must_use]
    pub const fn is_crew_aligned(self) -> bool {
        !self.is_impostor()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Crew => "Crew",
            Self::Impostor => "Impostor",
            Self::Medic => "Medic",
            Self::Detective => "Detective",
        }
    }
}

/// One slot on a participant's task list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSlot {
    pub location: String,
    pub label: String,
    pub done: bool,
}

/// Maximum task slots stored inline without additional allocations.
pub type TaskList = SmallVec<[TaskSlot; 4]>;

/// What a Medic scan reported about its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanReading {
    Clear,
    Suspicious,
    /// Degraded reading produced when more than one impostor interferes.
    StrongReading,
}

impl ScanReading {
    #[must_use]
    pub const fn is_suspicious(self) -> bool {
        !matches!(self, Self::Clear)
    }
}

/// A private investigation result, visible only to the participant who
/// produced it. The target is kept as a structured reference so ballot
/// logic never has to re-parse generated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Finding {
    MedicScan { target: String, reading: ScanReading },
    DetectiveClue { target: String, suspicious: bool },
}

impl Finding {
    /// The participant this finding points at.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::MedicScan { target, .. } | Self::DetectiveClue { target, .. } => target,
        }
    }

    /// Whether the finding accuses its target.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        match self {
            Self::MedicScan { reading, .. } => reading.is_suspicious(),
            Self::DetectiveClue { suspicious, .. } => *suspicious,
        }
    }

    /// Render the finding the way its holder would state it aloud.
    #[must_use]
    pub fn statement(&self) -> String {
        match self {
            Self::MedicScan { target, reading } => {
                let verdict = match reading {
                    ScanReading::Clear => "CLEAR (not an impostor)",
                    ScanReading::Suspicious => "SUSPICIOUS (detected as impostor)",
                    ScanReading::StrongReading => "HIGHLY SUSPICIOUS (strong impostor reading)",
                };
                format!("my scan of {target} came back {verdict}")
            }
            Self::DetectiveClue { target, suspicious } => {
                let verdict = if *suspicious {
                    "seems suspicious"
                } else {
                    "seems innocent"
                };
                format!("my instincts about {target}: they {verdict}")
            }
        }
    }
}

/// A single participant and their mutable per-round state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub role: Role,
    /// Whether the assigned role may be shown externally. Separate from
    /// `role` itself so display logic never guesses from game-over state.
    pub revealed: bool,
    pub alive: bool,
    #[serde(default)]
    pub tasks: TaskList,
    pub current_location: String,
    pub current_task: String,
    pub claimed_location: String,
    pub claimed_task: String,
    #[serde(default)]
    pub finding: Option<Finding>,
}

impl Participant {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: Role::Crew,
            revealed: false,
            alive: true,
            tasks: TaskList::new(),
            current_location: String::new(),
            current_task: String::new(),
            claimed_location: String::new(),
            claimed_task: String::new(),
            finding: None,
        }
    }

    /// First incomplete task slot, if any.
    #[must_use]
    pub fn has_open_task(&self) -> bool {
        self.tasks.iter().any(|slot| !slot.done)
    }
}

/// The set of participants for one game. Exclusively owned and mutated by
/// the round orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Roster(pub Vec<Participant>);

impl Roster {
    /// Draw `count` distinct names from the fixed pool.
    ///
    /// `count` is clamped to `[MIN_PARTICIPANTS, pool size]`.
    #[must_use]
    pub fn from_name_pool<R: Rng>(count: usize, rng: &mut R) -> Self {
        let count = count.clamp(MIN_PARTICIPANTS, NAME_POOL.len());
        let mut names: Vec<&str> = NAME_POOL.to_vec();
        names.shuffle(rng);
        names.truncate(count);
        Self(names.into_iter().map(Participant::new).collect())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Participant> {
        self.0.iter()
    }

    /// Case-insensitive lookup by display name.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Participant> {
        self.0.get(index)
    }

    pub fn living(&self) -> impl Iterator<Item = (usize, &Participant)> {
        self.0.iter().enumerate().filter(|(_, p)| p.alive)
    }

    pub fn living_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.living().map(|(idx, _)| idx)
    }

    pub fn living_crew_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.living()
            .filter(|(_, p)| p.role.is_crew_aligned())
            .map(|(idx, _)| idx)
    }

    pub fn living_impostor_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.living()
            .filter(|(_, p)| p.role.is_impostor())
            .map(|(idx, _)| idx)
    }

    #[must_use]
    pub fn living_impostor_count(&self) -> usize {
        self.living_impostor_indices().count()
    }

    #[must_use]
    pub fn living_crew_count(&self) -> usize {
        self.living_crew_indices().count()
    }

    /// Mark every participant's role as externally visible.
    pub fn reveal_all(&mut self) {
        for participant in &mut self.0 {
            participant.revealed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn name_pool_draw_is_distinct_and_clamped() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let roster = Roster::from_name_pool(6, &mut rng);
        assert_eq!(roster.len(), 6);
        let mut names: Vec<_> = roster.iter().map(|p| p.name.clone()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 6, "names must be drawn without replacement");

        let tiny = Roster::from_name_pool(1, &mut rng);
        assert_eq!(tiny.len(), MIN_PARTICIPANTS);
        let huge = Roster::from_name_pool(99, &mut rng);
        assert_eq!(huge.len(), NAME_POOL.len());
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let roster = Roster(vec![Participant::new("Orange"), Participant::new("Cyan")]);
        assert_eq!(roster.index_of("orange"), Some(0));
        assert_eq!(roster.index_of("CYAN"), Some(1));
        assert_eq!(roster.index_of("Magenta"), None);
    }

    #[test]
    fn living_queries_track_alive_flag_and_role() {
        let mut roster = Roster(vec![
            Participant::new("Red"),
            Participant::new("Blue"),
            Participant::new("Green"),
        ]);
        roster.0[0].role = Role::Impostor;
        roster.0[2].alive = false;

        assert_eq!(roster.living_impostor_count(), 1);
        assert_eq!(roster.living_crew_count(), 1);
        let living: Vec<_> = roster.living_indices().collect();
        assert_eq!(living, vec![0, 1]);
    }

    #[test]
    fn finding_exposes_structured_target() {
        let scan = Finding::MedicScan {
            target: String::from("Pink"),
            reading: ScanReading::StrongReading,
        };
        assert_eq!(scan.target(), "Pink");
        assert!(scan.is_suspicious());
        assert!(scan.statement().contains("HIGHLY SUSPICIOUS"));

        let clue = Finding::DetectiveClue {
            target: String::from("Black"),
            suspicious: false,
        };
        assert!(!clue.is_suspicious());
        assert!(clue.statement().contains("seems innocent"));
    }
}
