//! Heating power state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AlthermaError;

/// Whether the heat pump is heating or idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerState {
    /// Heating is active.
    On,
    /// Heating is on standby.
    Standby,
}

impl PowerState {
    /// Returns the wire string the adapter uses for this state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "on",
            Self::Standby => "standby",
        }
    }
}

impl FromStr for PowerState {
    type Err = AlthermaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on" => Ok(Self::On),
            "standby" => Ok(Self::Standby),
            other => Err(AlthermaError::UnrecognizedPowerState(other.to_string())),
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_values() {
        assert!(matches!("on".parse::<PowerState>(), Ok(PowerState::On)));
        assert!(matches!(
            "standby".parse::<PowerState>(),
            Ok(PowerState::Standby)
        ));
    }

    #[test]
    fn rejects_anything_else() {
        for input in ["invalid", "On", "", "off"] {
            let Err(AlthermaError::UnrecognizedPowerState(value)) = input.parse::<PowerState>()
            else {
                panic!("expected UnrecognizedPowerState for {input:?}");
            };
            assert_eq!(value, input);
        }
    }

    #[test]
    fn wire_string_round_trips() {
        for state in [PowerState::On, PowerState::Standby] {
            assert!(matches!(state.as_str().parse::<PowerState>(), Ok(s) if s == state));
        }
    }
}
