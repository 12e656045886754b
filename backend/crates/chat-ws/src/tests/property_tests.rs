use super::member;
use crate::{
    BroadcastConfig, BroadcastMessage, BroadcastStats, Broadcaster, Metrics, PeerHandle, PeerId,
    Registry, ShutdownCoordinator,
};

use std::collections::HashSet;

use proptest::prelude::*;
use tokio::sync::mpsc::{self, error::TryRecvError};
use tokio::time::{Duration, timeout};

const POOL_SIZE: usize = 8;

/// Larger than any script's total forwards, so no member is ever dropped as slow
const ROOMY_MAILBOX: usize = 256;

#[derive(Debug, Clone, Copy)]
enum Step {
    Join,
    Forward,
    Leave,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![Just(Step::Join), Just(Step::Forward), Just(Step::Leave)]
}

/// Events one submitting task actually enqueued, plus the mailboxes it joined with
#[derive(Default)]
struct Submitted {
    joins: u64,
    leaves: u64,
    forwards: u64,
    mailboxes: Vec<mpsc::Receiver<BroadcastMessage>>,
}

impl Submitted {
    fn absorb(&mut self, other: Submitted) {
        self.joins += other.joins;
        self.leaves += other.leaves;
        self.forwards += other.forwards;
        self.mailboxes.extend(other.mailboxes);
    }
}

/// Leave only ever targets a peer this task joined and has not left yet
async fn submit(broadcaster: Broadcaster, steps: Vec<Step>) -> Submitted {
    let mut submitted = Submitted::default();
    let mut joined = Vec::new();

    for step in steps {
        match step {
            Step::Join => {
                let (handle, rx) = member(ROOMY_MAILBOX);
                joined.push(handle.id());
                broadcaster.join(handle).await.unwrap();
                submitted.mailboxes.push(rx);
                submitted.joins += 1;
            }
            Step::Forward => {
                broadcaster
                    .forward(BroadcastMessage::from("tick"))
                    .await
                    .unwrap();
                submitted.forwards += 1;
            }
            Step::Leave => {
                if let Some(peer_id) = joined.pop() {
                    broadcaster.leave(peer_id).await.unwrap();
                    submitted.leaves += 1;
                }
            }
        }
        tokio::task::yield_now().await;
    }

    submitted
}

/// Run every script on its own task against one control loop; returns the
/// settled stats, the stats after shutdown, and what was submitted.
async fn run_scripts(scripts: Vec<Vec<Step>>) -> (BroadcastStats, BroadcastStats, Submitted) {
    let (broadcaster, control_loop) =
        Broadcaster::new(BroadcastConfig::default(), Metrics::default());
    let shutdown = ShutdownCoordinator::new();
    let control_loop = tokio::spawn(control_loop.run(shutdown.subscribe_guard()));

    let tasks: Vec<_> = scripts
        .into_iter()
        .map(|steps| tokio::spawn(submit(broadcaster.clone(), steps)))
        .collect();

    let mut total = Submitted::default();
    for task in tasks {
        total.absorb(task.await.unwrap());
    }

    let mut stats = broadcaster.watch_stats();
    let settled = *timeout(
        Duration::from_secs(5),
        stats.wait_for(|s| {
            s.joins == total.joins && s.leaves == total.leaves && s.forwards == total.forwards
        }),
    )
    .await
    .expect("control loop did not catch up")
    .expect("control loop gone");

    shutdown.shutdown();
    let final_stats = control_loop.await.unwrap();

    (settled, final_stats, total)
}

// =========================================================================
// Property-Based Tests - Membership
// =========================================================================

proptest! {
    #[test]
    fn given_random_joins_and_leaves_when_applied_then_registry_matches_model(
        ops in prop::collection::vec((any::<bool>(), 0..POOL_SIZE), 0..64)
    ) {
        let ids: Vec<PeerId> = (0..POOL_SIZE).map(|_| PeerId::new()).collect();
        let mut registry = Registry::new();
        let mut model = HashSet::new();
        let mut mailboxes = Vec::new();

        for (is_join, slot) in ops {
            if is_join {
                let (tx, rx) = mpsc::channel(4);
                mailboxes.push(rx);
                let inserted = registry.insert(PeerHandle::new(ids[slot], tx));
                prop_assert_eq!(inserted, model.insert(slot));
            } else {
                prop_assert_eq!(registry.remove(ids[slot]), model.remove(&slot));
            }
            prop_assert_eq!(registry.len(), model.len());
        }

        for (slot, id) in ids.iter().enumerate() {
            prop_assert_eq!(registry.contains(*id), model.contains(&slot));
        }

        let outcome = registry.fan_out(&BroadcastMessage::from("after"));
        prop_assert_eq!(outcome.delivered, model.len());
        prop_assert!(outcome.dropped.is_empty());
    }

    #[test]
    fn given_undrained_mailboxes_when_fanned_out_repeatedly_then_only_roomy_members_remain(
        capacities in prop::collection::vec(1usize..6, 1..12),
        forwards in 1usize..8,
    ) {
        let mut registry = Registry::new();
        let mut mailboxes = Vec::new();
        for capacity in &capacities {
            let (tx, rx) = mpsc::channel(*capacity);
            mailboxes.push(rx);
            registry.insert(PeerHandle::new(PeerId::new(), tx));
        }

        let mut dropped = 0;
        for _ in 0..forwards {
            dropped += registry.fan_out(&BroadcastMessage::from("tick")).dropped.len();
        }

        let expected_dropped = capacities.iter().filter(|c| **c < forwards).count();
        prop_assert_eq!(dropped, expected_dropped);
        prop_assert_eq!(registry.len(), capacities.len() - expected_dropped);
    }
}

// =========================================================================
// Property-Based Tests - Concurrent submission through the control loop
// =========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn given_concurrent_join_forward_leave_scripts_when_processed_then_members_match_applied_events(
        scripts in prop::collection::vec(prop::collection::vec(step(), 1..24), 1..8)
    ) {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        let (settled, final_stats, submitted) = runtime.block_on(run_scripts(scripts));

        prop_assert_eq!(settled.members as u64, submitted.joins - submitted.leaves);
        prop_assert_eq!(settled.dropped, 0);
        prop_assert_eq!(final_stats.members, 0);

        // Every mailbox is closed: left ones by their leave, the rest on shutdown
        for mut mailbox in submitted.mailboxes {
            loop {
                match mailbox.try_recv() {
                    Ok(_) => continue,
                    Err(TryRecvError::Disconnected) => break,
                    Err(TryRecvError::Empty) => prop_assert!(false, "mailbox left open"),
                }
            }
        }
    }
}

// =========================================================================
// Unit Tests - Messages
// =========================================================================

#[test]
fn given_utf8_payload_when_viewed_as_text_then_text_returned() {
    let message = BroadcastMessage::from(String::from("héllo"));

    assert_eq!(message.as_text(), Some("héllo"));
    assert_eq!(message.len(), "héllo".len());
}

#[test]
fn given_binary_payload_when_viewed_as_text_then_none() {
    let message = BroadcastMessage::from(vec![0xff, 0xfe, 0x00]);

    assert_eq!(message.as_text(), None);
    assert!(!message.is_empty());
}

#[test]
fn given_two_new_peer_ids_when_compared_then_distinct() {
    assert_ne!(PeerId::new(), PeerId::new());
}
