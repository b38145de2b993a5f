//! Unit status surface
//!
//! The orchestrator-visible state of the unit. Status is purely a function
//! of the latest reconciliation outcome; there is no history and no
//! terminal state.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitStatus {
    /// The workload is configured and the service plan is applied.
    Active,
    /// Reconciliation stopped on a validation failure; the message is the
    /// operator-facing reason.
    Blocked(String),
}

impl UnitStatus {
    pub fn blocked(reason: impl Into<String>) -> Self {
        UnitStatus::Blocked(reason.into())
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitStatus::Active => write!(f, "active"),
            UnitStatus::Blocked(reason) => write!(f, "blocked: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats() {
        assert_eq!(UnitStatus::Active.to_string(), "active");
        assert_eq!(
            UnitStatus::blocked("Invalid username defined.").to_string(),
            "blocked: Invalid username defined."
        );
    }
}
