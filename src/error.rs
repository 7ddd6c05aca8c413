//! Configuration errors.
//!
//! The per-step controller logic is total: no ground, no wall and an exhausted
//! bonus jump counter are ordinary outcomes. The only failure mode is a
//! character that was spawned with an unusable setup, which is reported once
//! at initialization.

use std::fmt;

use bevy::prelude::*;
use thiserror::Error;

/// Identifies one of the three probe points of a character.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProbeKind {
    /// Probe below the feet, used for grounded detection.
    Ground,
    /// Probe in front of the body, used for wall detection.
    Wall,
    /// Probe above the head, used when standing up from a crouch.
    Ceiling,
}

impl ProbeKind {
    /// All probe kinds in sampling order.
    pub const ALL: [ProbeKind; 3] = [ProbeKind::Ground, ProbeKind::Wall, ProbeKind::Ceiling];

    /// The child entity `Name` this probe is looked up by.
    pub fn child_name(self) -> &'static str {
        match self {
            ProbeKind::Ground => "GroundCheck",
            ProbeKind::Wall => "WallCheck",
            ProbeKind::Ceiling => "CeilingCheck",
        }
    }
}

impl fmt::Display for ProbeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProbeKind::Ground => "ground",
            ProbeKind::Wall => "wall",
            ProbeKind::Ceiling => "ceiling",
        };
        f.write_str(name)
    }
}

/// Error raised when a character cannot be initialized.
///
/// A character carrying this error (see [`crate::state::ControllerFault`]) is
/// never ticked.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A required probe was neither supplied nor found among the children.
    #[error(
        "missing {0} probe (expected a child named `{child}` or an explicit CharacterProbes)",
        child = .0.child_name()
    )]
    MissingProbe(ProbeKind),
    /// The probe entity exists but has no `GlobalTransform` to read a position from.
    #[error("{0} probe entity has no GlobalTransform")]
    ProbeWithoutTransform(ProbeKind),
    /// A configuration value is outside of its valid range.
    #[error("invalid `{name}`: {reason}")]
    InvalidParameter {
        /// Field name on [`crate::config::PlatformerConfig`].
        name: &'static str,
        /// Human readable constraint that was violated.
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_probe_names_the_child() {
        let err = ConfigurationError::MissingProbe(ProbeKind::Ceiling);
        let message = err.to_string();
        assert!(message.contains("ceiling"));
        assert!(message.contains("CeilingCheck"));
    }

    #[test]
    fn invalid_parameter_message() {
        let err = ConfigurationError::InvalidParameter {
            name: "crouch_speed_factor",
            reason: "must be within [0, 1]",
        };
        assert_eq!(
            err.to_string(),
            "invalid `crouch_speed_factor`: must be within [0, 1]"
        );
    }

    #[test]
    fn missing_transform_message_and_error_trait() {
        let err = ConfigurationError::ProbeWithoutTransform(ProbeKind::Wall);
        assert_eq!(err.to_string(), "wall probe entity has no GlobalTransform");

        let boxed: Box<dyn std::error::Error> = Box::new(err);
        assert!(boxed.source().is_none());
    }

    #[test]
    fn probe_kinds_have_distinct_child_names() {
        let names: Vec<_> = ProbeKind::ALL.iter().map(|k| k.child_name()).collect();
        assert_eq!(names, vec!["GroundCheck", "WallCheck", "CeilingCheck"]);
    }
}
