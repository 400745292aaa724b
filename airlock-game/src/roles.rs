//! Secret role assignment at game start.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::roster::{Role, Roster};

/// Partition the roster into impostors, special roles and plain crew.
///
/// `impostor_count` must already be sanitized against the roster size
/// (see `GameConfig::sanitize_impostors`); the caller guarantees the
/// roster is large enough. Each participant's role is written exactly
/// once. Returns the indices of the assigned impostors.
pub fn assign_roles<R: Rng>(roster: &mut Roster, impostor_count: usize, rng: &mut R) -> Vec<usize> {
    let mut order: Vec<usize> = (0..roster.len()).collect();
    order.shuffle(rng);

    let impostors: Vec<usize> = order.drain(..impostor_count.min(order.len())).collect();
    for &idx in &impostors {
        roster.0[idx].role = Role::Impostor;
    }

    // Remaining candidates are crew-aligned; at most one medic and one
    // detective, skipped when the pool runs dry.
    if let Some(idx) = order.pop() {
        roster.0[idx].role = Role::Medic;
    }
    if let Some(idx) = order.pop() {
        roster.0[idx].role = Role::Detective;
    }
    for idx in order {
        roster.0[idx].role = Role::Crew;
    }

    impostors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::Participant;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn roster_of(n: usize) -> Roster {
        Roster(
            (0..n)
                .map(|i| Participant::new(&format!("P{i}")))
                .collect(),
        )
    }

    #[test]
    fn partition_counts_hold_for_all_valid_shapes() {
        for n in 4usize..=10 {
            for k in 1..n.div_ceil(2) {
                let mut rng = ChaCha20Rng::seed_from_u64((n * 31 + k) as u64);
                let mut roster = roster_of(n);
                let impostors = assign_roles(&mut roster, k, &mut rng);

                assert_eq!(impostors.len(), k);
                let impostor_count =
                    roster.iter().filter(|p| p.role == Role::Impostor).count();
                let medic_count = roster.iter().filter(|p| p.role == Role::Medic).count();
                let detective_count =
                    roster.iter().filter(|p| p.role == Role::Detective).count();

                assert_eq!(impostor_count, k);
                assert!(medic_count <= 1);
                assert!(detective_count <= 1);
                for &idx in &impostors {
                    assert_eq!(roster.0[idx].role, Role::Impostor);
                }
            }
        }
    }

    #[test]
    fn special_roles_never_overlap_impostors() {
        let mut rng = ChaCha20Rng::seed_from_u64(99);
        for _ in 0..50 {
            let mut roster = roster_of(6);
            assign_roles(&mut roster, 2, &mut rng);
            for p in roster.iter() {
                if matches!(p.role, Role::Medic | Role::Detective) {
                    assert!(p.role.is_crew_aligned());
                }
            }
        }
    }

    #[test]
    fn assignment_is_deterministic_for_a_fixed_seed() {
        let mut a = roster_of(7);
        let mut b = roster_of(7);
        assign_roles(&mut a, 2, &mut ChaCha20Rng::seed_from_u64(5));
        assign_roles(&mut b, 2, &mut ChaCha20Rng::seed_from_u64(5));
        let roles_a: Vec<_> = a.iter().map(|p| p.role).collect();
        let roles_b: Vec<_> = b.iter().map(|p| p.role).collect();
        assert_eq!(roles_a, roles_b);
    }
}
