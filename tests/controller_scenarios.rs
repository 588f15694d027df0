//! End-to-end scenarios for the controller driving a recording actuator.

use strongbox::controller::{
    Actuator, ActuatorCommand, InputEvent, KeyMap, RawInput, SafeController, ScriptedInput,
    StepResult,
};
use strongbox::core::{ChangeStep, Digit, LogicalState, SafeState};
use strongbox::machine::{AccessStateMachine, MachineOptions, Signal, TransitionOutcome};
use strongbox::store::{FileStore, MemoryStore, PersistentCodeStore, StoreFormat};

#[derive(Default)]
struct RecordingActuator {
    commands: Vec<ActuatorCommand>,
}

impl Actuator for RecordingActuator {
    fn engage(&mut self) {
        self.commands.push(ActuatorCommand::Engage);
    }

    fn disengage(&mut self) {
        self.commands.push(ActuatorCommand::Disengage);
    }
}

type Controller = SafeController<MemoryStore, RecordingActuator, Vec<Signal>>;

fn boot(store: MemoryStore) -> Controller {
    let machine = AccessStateMachine::new(store, MachineOptions::default());
    SafeController::boot(machine, RecordingActuator::default(), Vec::new())
}

fn factory(locked: bool) -> MemoryStore {
    MemoryStore::new(SafeState::new("0000".parse().unwrap(), locked))
}

fn press(c: &mut Controller, keys: &str) -> Vec<StepResult> {
    let keymap = KeyMap::default();
    keys.chars()
        .filter_map(|k| keymap.translate(RawInput::Key(k)))
        .map(|event| c.step(event))
        .collect()
}

/// Actuator commands issued after boot.
fn commands_after_boot(c: &Controller) -> &[ActuatorCommand] {
    &c.actuator().commands[1..]
}

#[test]
fn factory_code_unlocks_locked_safe() {
    let store = factory(true);
    let mut c = boot(store.clone());

    press(&mut c, "0000");

    assert_eq!(c.machine().current_state(), LogicalState::Unlocked);
    assert_eq!(commands_after_boot(&c), &[ActuatorCommand::Disengage]);
    assert!(!store.load().locked);
    assert_eq!(c.sink().last(), Some(&Signal::Unlocked));
}

#[test]
fn confirmed_code_change_locks_with_new_code() {
    let store = factory(false);
    let mut c = boot(store.clone());

    press(&mut c, "A12341234");

    assert_eq!(c.machine().current_state(), LogicalState::Locked);
    assert_eq!(store.load(), SafeState::new("1234".parse().unwrap(), true));
    assert_eq!(commands_after_boot(&c), &[ActuatorCommand::Engage]);
    assert!(c.sink().contains(&Signal::EnterNewCode));
    assert!(c.sink().contains(&Signal::ConfirmNewCode));
    assert_eq!(c.sink().last(), Some(&Signal::Locked));
}

#[test]
fn mismatched_confirmation_leaves_safe_open() {
    let store = factory(false);
    let mut c = boot(store.clone());

    let results = press(&mut c, "A12344321");

    assert_eq!(
        results.last(),
        Some(&StepResult::Applied(TransitionOutcome::Rejected {
            state: LogicalState::Unlocked,
            signal: Signal::CodeChangeMismatch,
        }))
    );
    assert_eq!(c.machine().current_state(), LogicalState::Unlocked);
    assert_eq!(store.load().secret_code, "0000".parse().unwrap());
    assert!(commands_after_boot(&c).is_empty());
    assert_eq!(store.write_count(), 0);
}

#[test]
fn lock_now_is_inert_when_locked_or_changing_code() {
    let locked_store = factory(true);
    let mut c = boot(locked_store.clone());
    let result = c.step(InputEvent::LockNow);

    assert_eq!(
        result,
        StepResult::Applied(TransitionOutcome::Ignored {
            state: LogicalState::Locked
        })
    );
    assert!(commands_after_boot(&c).is_empty());
    assert_eq!(locked_store.write_count(), 0);

    let open_store = factory(false);
    let mut c = boot(open_store.clone());
    press(&mut c, "A12");
    press(&mut c, "#");

    assert_eq!(
        c.machine().current_state(),
        LogicalState::ChangingCode(ChangeStep::AwaitingNew)
    );
    assert_eq!(c.pending_digits(), 2);
    assert!(commands_after_boot(&c).is_empty());
    assert_eq!(open_store.write_count(), 0);
}

#[test]
fn remote_power_button_locks() {
    let store = factory(false);
    let mut c = boot(store.clone());
    let keymap = KeyMap::default();

    let event = keymap.translate(RawInput::Remote(162)).unwrap();
    c.step(event);

    assert_eq!(c.machine().current_state(), LogicalState::Locked);
    assert!(store.load().locked);
    assert_eq!(commands_after_boot(&c), &[ActuatorCommand::Engage]);
}

#[test]
fn power_loss_after_each_transition_restores_state() {
    let store = factory(true);

    let mut c = boot(store.clone());
    press(&mut c, "0000");
    drop(c);

    let mut c = boot(store.clone());
    assert_eq!(c.machine().current_state(), LogicalState::Unlocked);
    assert_eq!(c.actuator().commands, vec![ActuatorCommand::Disengage]);

    press(&mut c, "A97319731");
    drop(c);

    let mut c = boot(store.clone());
    assert_eq!(c.machine().current_state(), LogicalState::Locked);
    assert_eq!(c.actuator().commands, vec![ActuatorCommand::Engage]);

    press(&mut c, "0000");
    assert_eq!(c.sink().last(), Some(&Signal::WrongCode));
    press(&mut c, "9731");
    assert_eq!(c.machine().current_state(), LogicalState::Unlocked);
}

#[test]
fn code_change_abandoned_by_power_loss_is_forgotten() {
    let store = factory(false);
    let mut c = boot(store.clone());
    press(&mut c, "A5555");
    drop(c);

    let c = boot(store.clone());
    assert_eq!(c.machine().current_state(), LogicalState::Unlocked);
    assert_eq!(store.load().secret_code, "0000".parse().unwrap());
}

#[test]
fn storage_failure_rolls_back_and_recovers() {
    let store = factory(true);
    let mut c = boot(store.clone());

    store.fail_writes(true);
    let results = press(&mut c, "0000");
    assert!(matches!(results.last(), Some(StepResult::Aborted(_))));
    assert_eq!(c.machine().current_state(), LogicalState::Locked);
    assert!(commands_after_boot(&c).is_empty());
    assert_eq!(c.sink().last(), Some(&Signal::StorageFault));

    store.fail_writes(false);
    press(&mut c, "0000");
    assert_eq!(c.machine().current_state(), LogicalState::Unlocked);
    assert_eq!(commands_after_boot(&c), &[ActuatorCommand::Disengage]);
}

#[test]
fn scripted_run_against_file_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("safe.state");
    let defaults = SafeState::new("0000".parse().unwrap(), true);

    let store = FileStore::new(&path, StoreFormat::Binary, defaults);
    let machine = AccessStateMachine::new(store, MachineOptions::default());
    let mut c = SafeController::boot(machine, RecordingActuator::default(), Vec::<Signal>::new());
    let mut input = ScriptedInput::from_keys(&KeyMap::default(), "0000A24682468");
    assert_eq!(c.run(&mut input), 13);

    let reopened = FileStore::new(&path, StoreFormat::Binary, defaults);
    assert_eq!(reopened.load(), SafeState::new("2468".parse().unwrap(), true));
}

#[test]
fn digits_typed_while_open_do_not_leak_into_next_entry() {
    let mut c = boot(factory(false));
    let results = press(&mut c, "99");
    assert_eq!(results, vec![StepResult::Discarded, StepResult::Discarded]);

    press(&mut c, "#");
    press(&mut c, "0000");
    assert_eq!(c.machine().current_state(), LogicalState::Unlocked);

    let d = Digit::new(1).unwrap();
    assert_eq!(c.step(InputEvent::Digit(d)), StepResult::Discarded);
}
