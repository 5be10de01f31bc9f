use crate::trigger::DEFAULT_TRIGGERS;
use serde::Deserialize;
use thiserror::Error;

pub const DEFAULT_PORT: u16 = 10000;

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Port cannot be 0")]
    InvalidPort,

    #[error("Deduplication window cannot be 0")]
    InvalidDedupWindow,

    #[error("Deduplication capacity cannot be 0")]
    InvalidDedupCapacity,

    #[error("At least one trigger phrase is required")]
    NoTriggers,

    #[error("Empty trigger phrase")]
    EmptyTrigger,
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
pub struct Listener {
    pub host: String,
    pub port: u16,
}

impl Default for Listener {
    fn default() -> Self {
        Listener {
            host: "0.0.0.0".into(),
            port: DEFAULT_PORT,
        }
    }
}

impl Listener {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        Ok(())
    }
}

#[derive(Clone, Deserialize, Debug, PartialEq)]
#[serde(default)]
pub struct IntakeConfig {
    /// How long an identical payload is suppressed.
    pub dedup_window_secs: u64,
    /// Upper bound on remembered payloads.
    pub dedup_capacity: u64,
    /// Once a secret is registered, reject requests without a signature header.
    pub require_signature: bool,
    pub triggers: Vec<String>,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        IntakeConfig {
            dedup_window_secs: 60,
            dedup_capacity: 10_000,
            require_signature: false,
            triggers: DEFAULT_TRIGGERS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl IntakeConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dedup_window_secs == 0 {
            return Err(ValidationError::InvalidDedupWindow);
        }
        if self.dedup_capacity == 0 {
            return Err(ValidationError::InvalidDedupCapacity);
        }
        if self.triggers.is_empty() {
            return Err(ValidationError::NoTriggers);
        }
        if self.triggers.iter().any(|t| t.is_empty()) {
            return Err(ValidationError::EmptyTrigger);
        }
        Ok(())
    }
}
