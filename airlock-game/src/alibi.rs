//! Per-round task assignment and alibi derivation.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::catalog::{EvidenceCatalog, FILLER_TASK};
use crate::constants::{TASKS_PER_ROUND_MAX, TASKS_PER_ROUND_MIN};
use crate::roster::{Participant, TaskList, TaskSlot};

/// Deal a fresh task list for one crew-aligned participant: 2-4 tasks
/// drawn from distinct shuffled locations. Impostors carry no tasks and
/// must not be passed here.
pub fn assign_tasks<R: Rng>(
    participant: &mut Participant,
    catalog: &EvidenceCatalog,
    rng: &mut R,
) {
    let count = rng.gen_range(TASKS_PER_ROUND_MIN..=TASKS_PER_ROUND_MAX);
    let mut locations: Vec<&str> = catalog.locations().collect();
    locations.shuffle(rng);

    let mut tasks = TaskList::new();
    for location in locations.into_iter().take(count) {
        let Some(label) = catalog.tasks_at(location).choose(rng) else {
            continue;
        };
        tasks.push(TaskSlot {
            location: location.to_string(),
            label: label.clone(),
            done: false,
        });
    }
    participant.tasks = tasks;
}

/// Derive a participant's current location/task and copy it to their
/// claimed alibi.
///
/// A participant with an open task picks one of their incomplete slots
/// uniformly at random; anyone else (impostors, or crew with every task
/// done) wanders to a uniformly random room and picks up one of its task
/// labels, or the filler label in a task-less room.
pub fn refresh_alibi<R: Rng>(
    participant: &mut Participant,
    catalog: &EvidenceCatalog,
    rng: &mut R,
) {
    let open: Vec<&TaskSlot> = participant.tasks.iter().filter(|slot| !slot.done).collect();
    let (location, task) = if let Some(slot) = open.choose(rng) {
        (slot.location.clone(), slot.label.clone())
    } else {
        let rooms: Vec<&str> = catalog.locations().collect();
        let room = rooms.choose(rng).map_or("", |r| *r);
        let label = catalog
            .tasks_at(room)
            .choose(rng)
            .cloned()
            .unwrap_or_else(|| FILLER_TASK.to_string());
        (room.to_string(), label)
    };

    participant.current_location = location;
    participant.current_task = task;
    participant.claimed_location = participant.current_location.clone();
    participant.claimed_task = participant.current_task.clone();
}
