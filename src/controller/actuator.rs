//! Lock actuator abstraction.

/// The two commands a lock actuator understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActuatorCommand {
    Engage,
    Disengage,
}

impl ActuatorCommand {
    /// Command that puts the lock in the given state.
    pub fn for_locked(locked: bool) -> Self {
        if locked {
            Self::Engage
        } else {
            Self::Disengage
        }
    }
}

/// Physical lock mechanism.
///
/// Implementations must be idempotent: repeating a command has no further
/// physical effect.
pub trait Actuator {
    fn engage(&mut self);

    fn disengage(&mut self);

    fn apply(&mut self, command: ActuatorCommand) {
        match command {
            ActuatorCommand::Engage => self.engage(),
            ActuatorCommand::Disengage => self.disengage(),
        }
    }
}

/// Low-level positional drive, e.g. a hobby servo.
pub trait ServoDriver {
    fn write_angle(&mut self, degrees: u8);
}

/// Rotary lock driven by a servo between two configured angles.
///
/// Redundant commands are filtered so the driver only sees real moves.
pub struct ServoActuator<D: ServoDriver> {
    driver: D,
    lock_angle: u8,
    unlock_angle: u8,
    position: Option<u8>,
}

impl<D: ServoDriver> ServoActuator<D> {
    pub fn new(driver: D, lock_angle: u8, unlock_angle: u8) -> Self {
        Self {
            driver,
            lock_angle,
            unlock_angle,
            position: None,
        }
    }

    /// Last angle written, `None` before the first command.
    pub fn position(&self) -> Option<u8> {
        self.position
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn move_to(&mut self, degrees: u8) {
        if self.position == Some(degrees) {
            return;
        }
        tracing::debug!(degrees, "servo move");
        self.driver.write_angle(degrees);
        self.position = Some(degrees);
    }
}

impl<D: ServoDriver> Actuator for ServoActuator<D> {
    fn engage(&mut self) {
        self.move_to(self.lock_angle);
    }

    fn disengage(&mut self) {
        self.move_to(self.unlock_angle);
    }
}
