//! Decision envelopes.
//!
//! A [`Decision`] is what a strategy produces for one context: the chosen
//! action (or a full ranking), the exact probability the logged action was
//! chosen with, and whether it should be recorded. A [`DecisionRecord`] adds
//! the decision key so the tuple can be logged and replayed offline.

use crate::ActionIndex;

/// Which strategy produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StrategyKind {
    EpsilonGreedy,
    TauFirst,
    Bagging,
    Softmax,
    Generic,
    Ranked,
}

impl StrategyKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EpsilonGreedy => "epsilon_greedy",
            Self::TauFirst => "tau_first",
            Self::Bagging => "bagging",
            Self::Softmax => "softmax",
            Self::Generic => "generic",
            Self::Ranked => "ranked",
        }
    }
}

/// Outcome of one strategy invocation. Immutable once built.
///
/// `actions` is never empty: single-action strategies hold one entry, the
/// ranked strategy holds a permutation of `1..=N` (best first).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decision {
    strategy: StrategyKind,
    actions: Vec<ActionIndex>,
    probability: f32,
    should_record: bool,
}

impl Decision {
    pub(crate) fn single(strategy: StrategyKind, action: ActionIndex, probability: f32) -> Self {
        Self {
            strategy,
            actions: vec![action],
            probability,
            should_record: true,
        }
    }

    /// `ranking` must be non-empty; the ranked sampler guarantees it.
    pub(crate) fn ranked(ranking: Vec<ActionIndex>, probability: f32) -> Self {
        debug_assert!(!ranking.is_empty());
        Self {
            strategy: StrategyKind::Ranked,
            actions: ranking,
            probability,
            should_record: true,
        }
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    /// The chosen action (top of the ranking for ranked decisions).
    pub fn action(&self) -> ActionIndex {
        self.actions.first().copied().unwrap_or_default()
    }

    /// All chosen actions, in rank order.
    pub fn actions(&self) -> &[ActionIndex] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<ActionIndex> {
        self.actions
    }

    /// Probability of the logged choice, in `(0, 1]`.
    pub fn probability(&self) -> f32 {
        self.probability
    }

    pub fn should_record(&self) -> bool {
        self.should_record
    }
}

/// A decision together with the key it was made for.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecisionRecord {
    pub key: String,
    pub decision: Decision,
}
