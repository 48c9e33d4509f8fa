use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use roomlink_core::{ConnectionId, SignalMessage};
use roomlink_server::{LeaveOutcome, Notification, RoomRegistry};
use std::collections::{HashMap, HashSet};

use crate::integration::room;
use crate::utils::membership_view;

const CONNECTIONS: usize = 8;
const STEPS: usize = 400;
const SEEDS: u64 = 32;

#[derive(Default)]
struct Inboxes(HashMap<ConnectionId, Vec<SignalMessage>>);

impl Inboxes {
    fn push(&mut self, to: ConnectionId, msg: SignalMessage) {
        self.0.entry(to).or_default().push(msg);
    }

    fn deliver(&mut self, notification: Notification) {
        for to in notification.recipients {
            self.push(to, notification.message.clone());
        }
    }

    fn deliver_left(&mut self, left: Option<LeaveOutcome>) {
        if let Some(left) = left {
            self.deliver(left.user_left);
        }
    }

    /// Forget what `id` saw before a (re)join; its view restarts at the snapshot.
    fn reset(&mut self, id: ConnectionId) {
        self.0.remove(&id);
    }
}

/// Randomized join/leave/disconnect sequences on one room: the snapshot equals
/// exactly the prior members still present, and every member's reconstructed
/// view matches the real membership.
#[test]
fn test_randomized_interleavings() {
    for seed in 0..SEEDS {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut registry = RoomRegistry::new();
        let mut inboxes = Inboxes::default();
        let mut members: HashSet<ConnectionId> = HashSet::new();

        let mut ids: Vec<ConnectionId> = (0..CONNECTIONS).map(|_| ConnectionId::new()).collect();
        for id in &ids {
            registry.connect(*id);
        }

        for _ in 0..STEPS {
            let idx = rng.gen_range(0..ids.len());
            let id = ids[idx];

            match rng.gen_range(0..10) {
                0..=4 => {
                    let outcome = registry
                        .join(id, room("r"), String::new(), format!("user-{idx}"))
                        .unwrap();
                    inboxes.deliver_left(outcome.previous);
                    members.remove(&id);

                    let snapshot: HashSet<_> = outcome.snapshot.iter().map(|m| m.socket_id).collect();
                    assert_eq!(snapshot.len(), outcome.snapshot.len(), "seed {seed}: duplicate in snapshot");
                    assert_eq!(snapshot, members, "seed {seed}: snapshot mismatch");

                    inboxes.deliver(outcome.user_joined);
                    inboxes.reset(id);
                    inboxes.push(id, SignalMessage::ExistingUsers { users: outcome.snapshot });
                    members.insert(id);
                }
                5..=7 => {
                    inboxes.deliver_left(registry.leave(id));
                    members.remove(&id);
                    inboxes.reset(id);
                }
                _ => {
                    if let Some(left) = registry.disconnect(id) {
                        inboxes.deliver_left(left);
                    }
                    members.remove(&id);
                    inboxes.reset(id);

                    // The transport hands out a fresh id for the reconnect.
                    let fresh = ConnectionId::new();
                    registry.connect(fresh);
                    ids[idx] = fresh;
                }
            }

            assert!(registry.is_consistent(), "seed {seed}: registry inconsistent");

            for member in &members {
                let seen = inboxes.0.get(member).cloned().unwrap_or_default();
                let view = membership_view(&seen)
                    .unwrap_or_else(|e| panic!("seed {seed}: {e}"));
                let expected: HashSet<_> = members.iter().filter(|m| *m != member).copied().collect();
                assert_eq!(view, expected, "seed {seed}: view of {member} diverged");
            }
        }
    }
}
