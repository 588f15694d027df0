//! Property-based tests for the access machine and code entry.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated codes and event sequences.

use proptest::prelude::*;
use strongbox::core::{CandidateCode, CodeEntryCollector, LogicalState, SafeState, CODE_LENGTH};
use strongbox::machine::{AccessStateMachine, MachineEvent, MachineOptions, Signal};
use strongbox::store::{MemoryStore, PersistentCodeStore};

fn machine(locked: bool) -> AccessStateMachine<MemoryStore> {
    let store = MemoryStore::new(SafeState::new("0000".parse().unwrap(), locked));
    AccessStateMachine::new(store, MachineOptions::default())
}

fn candidate(code: &str) -> CandidateCode {
    code.parse().unwrap()
}

fn set_code(m: &mut AccessStateMachine<MemoryStore>, code: &str) {
    m.begin_code_change().unwrap();
    m.submit_candidate(candidate(code)).unwrap();
    m.submit_candidate(candidate(code)).unwrap();
}

prop_compose! {
    fn arbitrary_code()(code in "[0-9]{4}") -> String {
        code
    }
}

fn arbitrary_event() -> impl Strategy<Value = MachineEvent> {
    prop_oneof![
        3 => arbitrary_code().prop_map(|c| MachineEvent::CandidateComplete(candidate(&c))),
        1 => Just(MachineEvent::BeginCodeChange),
        1 => Just(MachineEvent::LockNow),
    ]
}

proptest! {
    #[test]
    fn set_code_then_only_that_code_unlocks(code in arbitrary_code(), other in arbitrary_code()) {
        prop_assume!(code != other);

        let mut m = machine(false);
        set_code(&mut m, &code);
        prop_assert_eq!(m.current_state(), LogicalState::Locked);

        let wrong = m.unlock(&candidate(&other)).unwrap();
        prop_assert_eq!(wrong.signal(), Some(Signal::WrongCode));
        prop_assert_eq!(m.current_state(), LogicalState::Locked);

        let right = m.unlock(&candidate(&code)).unwrap();
        prop_assert!(right.is_committed());
        prop_assert_eq!(m.current_state(), LogicalState::Unlocked);
    }

    #[test]
    fn failed_confirmation_never_changes_code(new in arbitrary_code(), confirm in arbitrary_code()) {
        prop_assume!(new != confirm);

        let mut m = machine(false);
        m.begin_code_change().unwrap();
        m.submit_candidate(candidate(&new)).unwrap();
        let outcome = m.submit_candidate(candidate(&confirm)).unwrap();

        prop_assert_eq!(outcome.signal(), Some(Signal::CodeChangeMismatch));
        prop_assert_eq!(m.current_state(), LogicalState::Unlocked);
        prop_assert_eq!(m.store().load().secret_code, "0000".parse().unwrap());
        prop_assert_eq!(m.store().write_count(), 0);
    }

    #[test]
    fn restart_restores_committed_lock_state(
        locked in any::<bool>(),
        events in prop::collection::vec(arbitrary_event(), 0..40)
    ) {
        let mut m = machine(locked);
        for event in events {
            m.handle(event).unwrap();

            let rebooted = AccessStateMachine::new(m.store().clone(), MachineOptions::default());
            prop_assert_eq!(rebooted.safe_state(), m.safe_state());
            prop_assert_eq!(rebooted.is_locked(), m.current_state().is_locked());
        }
    }

    #[test]
    fn stored_code_is_always_valid(events in prop::collection::vec(arbitrary_event(), 0..40)) {
        let mut m = machine(true);
        for event in events {
            m.handle(event).unwrap();
        }
        let code = String::from(m.store().load().secret_code);
        prop_assert_eq!(code.len(), CODE_LENGTH);
        prop_assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn collector_emits_one_candidate_per_four_digits(keys in "[0-9#*A-D]{0,40}") {
        let mut entry = CodeEntryCollector::new();
        let emitted = keys.chars().filter_map(|k| entry.push(k)).count();
        let digits = keys.chars().filter(|c| c.is_ascii_digit()).count();

        prop_assert_eq!(emitted, digits / CODE_LENGTH);
        prop_assert_eq!(entry.len(), digits % CODE_LENGTH);
    }

    #[test]
    fn lock_now_while_locked_never_writes(attempts in 1..10usize) {
        let mut m = machine(true);
        for _ in 0..attempts {
            prop_assert!(!m.lock().unwrap().is_committed());
        }
        prop_assert_eq!(m.store().write_count(), 0);
    }
}
