//! Property tests for ledger invariants.

use std::collections::HashSet;

use chronominimal_core::storage::{
    decode_state, encode_state, PersistedState, UiPrefs, MAX_STORED_INTEGER,
};
use chronominimal_core::{Ledger, TimerId};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Step {
    Toggle,
    Tick,
}

fn step() -> impl Strategy<Value = (u64, Step)> {
    (0u64..5_000, prop_oneof![Just(Step::Toggle), Just(Step::Tick)])
}

fn ledger_of(n: usize) -> Ledger {
    let mut ledger = Ledger::empty();
    for _ in 0..n {
        ledger.create(0);
    }
    ledger
}

proptest! {
    #[test]
    fn elapsed_after_pause_is_tick_count_independent(
        steps in prop::collection::vec(step(), 0..60),
        tail in 0u64..5_000,
    ) {
        let mut ledger = Ledger::default();
        let id = TimerId(1);
        let mut now = 1_000_000u64;
        let mut running_since: Option<u64> = None;
        let mut expected = 0u64;

        for (gap, step) in steps {
            now += gap;
            match step {
                Step::Toggle => {
                    ledger.toggle_running(id, now);
                    running_since = match running_since {
                        Some(since) => {
                            expected += now - since;
                            None
                        }
                        None => Some(now),
                    };
                }
                Step::Tick => {
                    ledger.tick(now);
                }
            }
        }

        now += tail;
        if let Some(since) = running_since {
            ledger.toggle_running(id, now);
            expected += now - since;
        }

        let timer = ledger.get(id).unwrap();
        prop_assert!(!timer.is_running);
        prop_assert_eq!(timer.elapsed_ms, expected);
    }

    #[test]
    fn reset_always_zeroes(
        start in 0u64..1_000_000,
        run in 0u64..1_000_000,
        ticks in 0usize..10,
        leave_running in any::<bool>(),
    ) {
        let mut ledger = Ledger::default();
        let id = TimerId(1);
        ledger.toggle_running(id, start);
        for i in 0..ticks {
            ledger.tick(start + run * i as u64 / 10);
        }
        if !leave_running {
            ledger.toggle_running(id, start + run);
        }
        ledger.reset(id, start + run);

        let timer = ledger.get(id).unwrap();
        prop_assert!(!timer.is_running);
        prop_assert_eq!(timer.elapsed_ms, 0);
        prop_assert_eq!(ledger.elapsed_at(id, start + run + 10_000), Some(0));
    }

    #[test]
    fn remove_never_empties(n in 1usize..6, removals in prop::collection::vec(1u64..8, 0..20)) {
        let mut ledger = ledger_of(n);
        for id in removals {
            ledger.remove(TimerId(id), 0);
            prop_assert!(ledger.count() >= 1);
        }
    }

    #[test]
    fn adjacent_reorder_round_trips(n in 2usize..8, index in 0usize..7) {
        let mut ledger = ledger_of(n);
        let index = index % (n - 1);
        let a = ledger.records()[index].id;
        let b = ledger.records()[index + 1].id;
        let original = ledger.ids();

        ledger.reorder(a, b, 0);
        ledger.reorder(b, a, 0);
        prop_assert_eq!(ledger.ids(), original.clone());

        ledger.reorder(b, a, 0);
        ledger.reorder(a, b, 0);
        prop_assert_eq!(ledger.ids(), original);
    }

    #[test]
    fn reorder_preserves_membership(n in 1usize..8, moves in prop::collection::vec((1u64..9, 1u64..9), 0..20)) {
        let mut ledger = ledger_of(n);
        let mut expected = ledger.ids();
        expected.sort();
        for (source, target) in moves {
            ledger.reorder(TimerId(source), TimerId(target), 0);
        }
        let mut ids = ledger.ids();
        ids.sort();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn stopped_ledger_survives_storage(
        runs in prop::collection::vec((0u64..10_000, 0u64..10_000), 1..6),
    ) {
        let mut ledger = Ledger::empty();
        let mut now = 0;
        for (wait, run) in runs {
            let id = ledger.create(now);
            now += wait;
            ledger.toggle_running(id, now);
            now += run;
            ledger.toggle_running(id, now);
        }

        let state = PersistedState::new(&ledger, UiPrefs::default());
        let decoded = decode_state(Some(&encode_state(&state).unwrap()));
        prop_assert_eq!(Ledger::from_records(decoded.timers), ledger);
    }

    #[test]
    fn arbitrary_stored_numbers_never_break_the_ledger(
        raw in prop::collection::vec((any::<u64>(), any::<bool>(), any::<u64>(), any::<u64>()), 1..8),
        now in any::<u64>(),
        later in 0u64..100_000,
    ) {
        let items: Vec<serde_json::Value> = raw
            .iter()
            .map(|(id, running, elapsed, last)| serde_json::json!({
                "id": id,
                "isRunning": running,
                "elapsedMs": elapsed,
                "lastUpdateTime": last,
            }))
            .collect();
        let blob = serde_json::Value::Array(items).to_string();

        let decoded = decode_state(Some(&blob));
        prop_assert_eq!(decoded.timers.len(), raw.len());
        let mut seen = HashSet::new();
        for timer in &decoded.timers {
            prop_assert!(timer.id.0 > 0);
            prop_assert!(seen.insert(timer.id));
            prop_assert!(timer.elapsed_ms <= MAX_STORED_INTEGER);
            prop_assert!(timer.last_update_ms.unwrap_or(0) <= MAX_STORED_INTEGER);
        }

        let stored: Vec<u64> = decoded.timers.iter().map(|t| t.elapsed_ms).collect();
        let mut ledger = Ledger::resume_from_persisted(decoded.timers, now);
        for (timer, before) in ledger.iter().zip(&stored) {
            prop_assert!(timer.elapsed_ms >= *before);
        }

        let resumed: Vec<u64> = ledger.iter().map(|t| t.elapsed_ms).collect();
        ledger.tick(now.saturating_add(later));
        for (timer, before) in ledger.iter().zip(&resumed) {
            prop_assert!(timer.elapsed_ms >= *before);
        }

        let fresh = ledger.create(now);
        prop_assert!(!seen.contains(&fresh));
        prop_assert_eq!(ledger.count(), raw.len() + 1);
    }
}
