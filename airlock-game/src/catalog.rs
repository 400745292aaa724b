//! Static catalog of station rooms, the tasks available in each, and the
//! lightweight adjacency relation used by evidence generation.

use serde::{Deserialize, Serialize};

/// Label used when a room offers no tasks of its own.
pub const FILLER_TASK: &str = "looking busy";

/// A room and the ordered set of task labels that can be performed there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    #[serde(default)]
    pub tasks: Vec<String>,
}

/// Container for the full location/task catalog.
///
/// Room order is meaningful: adjacency is derived from it, so two catalogs
/// with the same rooms in a different order describe different stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EvidenceCatalog {
    pub rooms: Vec<Room>,
}

impl EvidenceCatalog {
    /// Create an empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self { rooms: Vec::new() }
    }

    /// Load a catalog from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid catalog data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Create a catalog from pre-built rooms.
    #[must_use]
    pub fn from_rooms(rooms: Vec<Room>) -> Self {
        Self { rooms }
    }

    /// The built-in station layout.
    #[must_use]
    pub fn default_catalog() -> Self {
        let room = |name: &str, tasks: &[&str]| Room {
            name: name.to_string(),
            tasks: tasks.iter().map(|t| (*t).to_string()).collect(),
        };
        Self::from_rooms(vec![
            room(
                "Electrical",
                &["fixing wires", "diverting power", "calibrating distributor"],
            ),
            room(
                "Cafeteria",
                &["emptying trash", "downloading data", "cleaning vent"],
            ),
            room(
                "Engine Room",
                &["fueling engines", "aligning engine output", "stabilizing steering"],
            ),
            room(
                "Admin",
                &["swiping card", "uploading data", "fixing weather nodes"],
            ),
            room("Shields", &["priming shields", "clearing asteroids (manned)"]),
            room("Storage", &["organizing boxes", "fueling engines (lower/upper)"]),
            room("Medbay", &["submitting scan", "inspecting samples"]),
            room(
                "Weapons",
                &["clearing asteroids", "downloading data", "accepting diverted power"],
            ),
            room(
                "Navigation",
                &["charting course", "stabilizing steering", "downloading data"],
            ),
            room(
                "Reactor",
                &["starting reactor", "unlocking manifolds", "diverting power"],
            ),
            room("Security", &["monitoring cameras", "fixing wiring"]),
            room("Communications", &["resetting comms", "downloading data"]),
            room("O2", &["cleaning O2 filter", "emptying garbage", "filling canisters"]),
        ])
    }

    /// Ordered list of room names.
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(|room| room.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Ordered task labels at a room; empty when the room is unknown or
    /// has no tasks.
    #[must_use]
    pub fn tasks_at(&self, location: &str) -> &[String] {
        self.rooms
            .iter()
            .find(|room| room.name == location)
            .map_or(&[], |room| room.tasks.as_slice())
    }

    /// Rooms immediately before and after `location` in catalog order.
    ///
    /// Endpoints get a single neighbor; unknown rooms get none. Callers
    /// that need a guaranteed alternative room fall back to
    /// [`EvidenceCatalog::other_rooms`].
    #[must_use]
    pub fn adjacent_to(&self, location: &str) -> Vec<&str> {
        let Some(index) = self.rooms.iter().position(|room| room.name == location) else {
            return Vec::new();
        };
        let mut adjacent = Vec::with_capacity(2);
        if index > 0 {
            adjacent.push(self.rooms[index - 1].name.as_str());
        }
        if index + 1 < self.rooms.len() {
            adjacent.push(self.rooms[index + 1].name.as_str());
        }
        adjacent
    }

    /// Every room name except `location`.
    pub fn other_rooms<'a>(&'a self, location: &'a str) -> impl Iterator<Item = &'a str> {
        self.locations().filter(move |name| *name != location)
    }
}
