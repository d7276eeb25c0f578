//! Identifiers for household entities
//!
//! Participants are addressed by a small integer index into
//! [`Household::participants`](super::Household). Names are resolved to ids
//! once, when a projection engine is built.

use serde::{Deserialize, Serialize};

/// Stable index of a participant within its household
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ParticipantId(pub u16);

impl ParticipantId {
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// TSP investment funds
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TspFund {
    /// Government securities
    G,
    /// Fixed income index
    F,
    /// Common stock (S&P 500)
    C,
    /// Small cap stock
    S,
    /// International stock
    I,
}

impl TspFund {
    /// All funds in their canonical sampling order
    pub const ALL: [TspFund; 5] = [TspFund::G, TspFund::F, TspFund::C, TspFund::S, TspFund::I];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            TspFund::G => "G",
            TspFund::F => "F",
            TspFund::C => "C",
            TspFund::S => "S",
            TspFund::I => "I",
        }
    }
}

impl std::fmt::Display for TspFund {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} Fund", self.label())
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
