use thiserror::Error;

/// Failure of a single exploration decision.
///
/// Every error is local to one `choose_*` call: nothing is retried, nothing is
/// recorded, and the caller decides whether to fall back to a default action.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MwtError {
    #[error("invalid action count: {count}")]
    InvalidActionCount { count: u32 },

    #[error("unsupported context: {reason}")]
    UnsupportedContext { reason: &'static str },

    #[error("policy chose action {action}, expected a value in [1, {num_actions}]")]
    PolicyOutOfRange { action: u32, num_actions: u32 },

    #[error("invalid distribution: {reason}")]
    InvalidDistribution { reason: String },

    #[error("distribution is deterministic (all mass on action {action}); cannot produce a ranking")]
    DeterministicDistribution { action: u32 },

    #[error("invalid explorer configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl MwtError {
    /// Stable short name, used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidActionCount { .. } => "invalid_action_count",
            Self::UnsupportedContext { .. } => "unsupported_context",
            Self::PolicyOutOfRange { .. } => "policy_out_of_range",
            Self::InvalidDistribution { .. } => "invalid_distribution",
            Self::DeterministicDistribution { .. } => "deterministic_distribution",
            Self::InvalidConfig { .. } => "invalid_config",
        }
    }

    pub(crate) fn distribution(reason: impl Into<String>) -> Self {
        Self::InvalidDistribution {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MwtError>;
