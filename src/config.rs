//! Device configuration.
//!
//! Loaded from TOML. Every field has a default, so an empty file describes
//! the stock device: factory code `0000`, unlocked at first boot, servo at
//! 20° locked / 90° unlocked, `#` or remote command 162 to lock, `A` to
//! change the code.
//!
//! ```toml
//! device_label = "CT060330"
//!
//! [actuator]
//! lock_angle = 0
//! unlock_angle = 90
//!
//! [factory]
//! code = "0000"
//! locked = false
//!
//! [keypad]
//! lock_keys = ["#"]
//! change_code_keys = ["A"]
//! remote_lock_commands = [162]
//!
//! [storage]
//! path = "strongbox.state"
//! format = "binary"
//!
//! [behavior]
//! require_code_change_before_first_lock = false
//! history_capacity = 64
//! ```
//!
//! Validation collects every problem in one pass rather than stopping at the
//! first.

use crate::controller::KeyMap;
use crate::core::{CodeError, SafeState, SecretCode, DEFAULT_HISTORY_CAPACITY};
use crate::machine::MachineOptions;
use crate::store::StoreFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Largest angle a hobby servo accepts.
pub const MAX_SERVO_ANGLE: u8 = 180;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeConfig {
    /// Shown on the display at startup.
    pub device_label: String,
    pub actuator: ActuatorConfig,
    pub factory: FactoryConfig,
    pub keypad: KeyMap,
    pub storage: StorageConfig,
    pub behavior: BehaviorConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActuatorConfig {
    pub lock_angle: u8,
    pub unlock_angle: u8,
}

/// State used when storage has never been written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub code: String,
    pub locked: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub path: PathBuf,
    pub format: StoreFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    pub require_code_change_before_first_lock: bool,
    pub history_capacity: usize,
}

impl Default for SafeConfig {
    fn default() -> Self {
        Self {
            device_label: "SMART HOME".to_string(),
            actuator: ActuatorConfig::default(),
            factory: FactoryConfig::default(),
            keypad: KeyMap::default(),
            storage: StorageConfig::default(),
            behavior: BehaviorConfig::default(),
        }
    }
}

impl Default for ActuatorConfig {
    fn default() -> Self {
        Self {
            lock_angle: 20,
            unlock_angle: 90,
        }
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            code: "0000".to_string(),
            locked: false,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("strongbox.state"),
            format: StoreFormat::Binary,
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            require_code_change_before_first_lock: false,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

/// A single problem found while validating a [`SafeConfig`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigViolation {
    #[error("{field} of {degrees} degrees exceeds 180")]
    AngleOutOfRange { field: &'static str, degrees: u8 },

    #[error("lock and unlock angles are both {0} degrees")]
    IdenticalAngles(u8),

    #[error("factory code is invalid: {0}")]
    InvalidFactoryCode(CodeError),

    #[error("digit key '{key}' cannot be bound to a command")]
    DigitKeyBinding { key: char },

    #[error("key '{key}' is bound to both lock and change-code")]
    ConflictingKeyBinding { key: char },

    #[error("history capacity must be at least 1")]
    ZeroHistoryCapacity,
}

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config at {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config ({} problems): {}", .0.len(), join_violations(.0))]
    Invalid(Vec<ConfigViolation>),
}

fn join_violations(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

type Check = Validation<(), NonEmptyVec<ConfigViolation>>;

fn require(ok: bool, violation: ConfigViolation) -> Check {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(violation)
    }
}

impl SafeConfig {
    /// Read, parse and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(?path, "configuration loaded");
        Ok(config)
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.checked()
    }

    /// Return `self` if it is valid, or every violation found.
    pub fn checked(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => {
                Err(ConfigError::Invalid(errors.iter().cloned().collect()))
            }
        }
    }

    /// Run all checks, accumulating every violation.
    pub fn validate(&self) -> Check {
        let ActuatorConfig {
            lock_angle,
            unlock_angle,
        } = self.actuator;

        let mut checks: Vec<Check> = vec![
            require(
                lock_angle <= MAX_SERVO_ANGLE,
                ConfigViolation::AngleOutOfRange {
                    field: "lock_angle",
                    degrees: lock_angle,
                },
            ),
            require(
                unlock_angle <= MAX_SERVO_ANGLE,
                ConfigViolation::AngleOutOfRange {
                    field: "unlock_angle",
                    degrees: unlock_angle,
                },
            ),
            require(
                lock_angle != unlock_angle,
                ConfigViolation::IdenticalAngles(lock_angle),
            ),
            match self.factory.code.parse::<SecretCode>() {
                Ok(_) => Validation::success(()),
                Err(e) => Validation::fail(ConfigViolation::InvalidFactoryCode(e)),
            },
            require(
                self.behavior.history_capacity > 0,
                ConfigViolation::ZeroHistoryCapacity,
            ),
        ];

        let keypad = &self.keypad;
        for &key in keypad.lock_keys.iter().chain(&keypad.change_code_keys) {
            checks.push(require(
                !key.is_ascii_digit(),
                ConfigViolation::DigitKeyBinding { key },
            ));
        }
        for &key in &keypad.lock_keys {
            checks.push(require(
                !keypad.change_code_keys.contains(&key),
                ConfigViolation::ConflictingKeyBinding { key },
            ));
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// State a blank store reports.
    pub fn factory_state(&self) -> Result<SafeState, CodeError> {
        let code = self.factory.code.parse()?;
        Ok(SafeState::new(code, self.factory.locked))
    }

    pub fn machine_options(&self) -> MachineOptions {
        MachineOptions {
            require_code_change_before_first_lock: self
                .behavior
                .require_code_change_before_first_lock,
            history_capacity: self.behavior.history_capacity,
        }
    }
}
