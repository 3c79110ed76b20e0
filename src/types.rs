//! Shared enums used across the codebase
//!
//! Wire values are SCREAMING_SNAKE_CASE, matching the payloads the portal
//! frontend sends (`internshipPhase: "ACTIVE"`). Parsing from query strings
//! and database columns goes through `FromStr`, which is case-insensitive.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name -> human readable problem, keyed by the camelCase JSON name
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} value '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! wire_enum {
    ($name:ident, $kind:literal, { $($variant:ident => $wire:literal),+ $(,)? }) => {
        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
                match normalized.as_str() {
                    $($wire => Ok($name::$variant),)+
                    _ => Err(ParseEnumError { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

/// Portal roles. Every protected route group is gated on one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Student,
    Faculty,
    Principal,
}

wire_enum!(Role, "role", {
    Student => "STUDENT",
    Faculty => "FACULTY",
    Principal => "PRINCIPAL",
});

/// Lifecycle stage of a student's internship.
///
/// Replaces the old `hasJoined` boolean: "has joined" is now exactly
/// `phase == Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InternshipPhase {
    #[default]
    NotStarted,
    Active,
    Completed,
    Terminated,
}

wire_enum!(InternshipPhase, "internship phase", {
    NotStarted => "NOT_STARTED",
    Active => "ACTIVE",
    Completed => "COMPLETED",
    Terminated => "TERMINATED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("internship is already {0}")]
    Unchanged(InternshipPhase),

    #[error("cannot move internship from {from} to {to}")]
    NotAllowed {
        from: InternshipPhase,
        to: InternshipPhase,
    },
}

impl InternshipPhase {
    pub fn is_active(&self) -> bool {
        matches!(self, InternshipPhase::Active)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InternshipPhase::Completed | InternshipPhase::Terminated)
    }

    /// Map the legacy `hasJoined` flag onto a phase
    pub fn from_has_joined(has_joined: bool) -> Self {
        if has_joined {
            InternshipPhase::Active
        } else {
            InternshipPhase::NotStarted
        }
    }

    pub fn allowed_transitions(&self) -> &'static [InternshipPhase] {
        use InternshipPhase::*;
        match self {
            NotStarted => &[Active, Terminated],
            Active => &[Completed, Terminated],
            Completed | Terminated => &[],
        }
    }

    pub fn can_transition_to(&self, next: InternshipPhase) -> bool {
        self.allowed_transitions().contains(&next)
    }

    pub fn transition(self, next: InternshipPhase) -> Result<InternshipPhase, TransitionError> {
        if self == next {
            return Err(TransitionError::Unchanged(self));
        }
        if !self.can_transition_to(next) {
            return Err(TransitionError::NotAllowed { from: self, to: next });
        }
        Ok(next)
    }
}

/// Faculty decision state of an internship application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

wire_enum!(ReviewStatus, "review status", {
    Pending => "PENDING",
    Approved => "APPROVED",
    Rejected => "REJECTED",
});

/// Decision a faculty member may record; `Pending` is not a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewDecision {
    Approved,
    Rejected,
}

impl From<ReviewDecision> for ReviewStatus {
    fn from(decision: ReviewDecision) -> Self {
        match decision {
            ReviewDecision::Approved => ReviewStatus::Approved,
            ReviewDecision::Rejected => ReviewStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DocumentKind {
    OfferLetter,
    CompletionCertificate,
    Report,
    Other,
}

wire_enum!(DocumentKind, "document kind", {
    OfferLetter => "OFFER_LETTER",
    CompletionCertificate => "COMPLETION_CERTIFICATE",
    Report => "REPORT",
    Other => "OTHER",
});
