//! Declarative explorer configuration.
//!
//! Strategy parameters are plain data (optionally `serde`-deserializable with
//! the `serde` feature) so they can live in a config file. The baseline
//! policy or scorer is code and is supplied separately when building the
//! [`Explorer`].
//!
//! ```rust
//! use mwt::{ActionCount, Baseline, Explorer, ExplorerConfig, FixedPolicy, StrategyConfig};
//!
//! let cfg = ExplorerConfig {
//!     strategy: StrategyConfig::EpsilonGreedy { epsilon: 0.1 },
//!     actions: ActionCount::Fixed(4),
//! };
//! let explorer: Explorer<()> = Explorer::from_config(&cfg, Baseline::policy(FixedPolicy(2))).unwrap();
//! assert_eq!(explorer.kind(), mwt::StrategyKind::EpsilonGreedy);
//! ```

use crate::{
    ActionCount, Explorer, MwtError, Policy, Result, Scorer, Strategy, StrategyKind, TauBudget,
};

/// Strategy parameters without the baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum StrategyConfig {
    EpsilonGreedy { epsilon: f32 },
    TauFirst { tau: u32 },
    Bagging { bags: u32 },
    Softmax { lambda: f32 },
    Generic,
    Ranked,
}

impl StrategyConfig {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::EpsilonGreedy { .. } => StrategyKind::EpsilonGreedy,
            Self::TauFirst { .. } => StrategyKind::TauFirst,
            Self::Bagging { .. } => StrategyKind::Bagging,
            Self::Softmax { .. } => StrategyKind::Softmax,
            Self::Generic => StrategyKind::Generic,
            Self::Ranked => StrategyKind::Ranked,
        }
    }
}

/// Full explorer configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExplorerConfig {
    pub strategy: StrategyConfig,
    pub actions: ActionCount,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            strategy: StrategyConfig::EpsilonGreedy { epsilon: 0.1 },
            actions: ActionCount::Variable,
        }
    }
}

impl ExplorerConfig {
    /// Check parameter ranges without building an explorer.
    pub fn validate(&self) -> Result<()> {
        if self.actions == ActionCount::Fixed(0) {
            return Err(MwtError::InvalidActionCount { count: 0 });
        }
        match self.strategy {
            StrategyConfig::EpsilonGreedy { epsilon } => {
                if !epsilon.is_finite() || !(0.0..=1.0).contains(&epsilon) {
                    return Err(MwtError::config(format!(
                        "epsilon must be in [0, 1], got {epsilon}"
                    )));
                }
            }
            StrategyConfig::Bagging { bags: 0 } => {
                return Err(MwtError::config("bags must be at least 1"));
            }
            StrategyConfig::Softmax { lambda } if !lambda.is_finite() => {
                return Err(MwtError::config(format!("lambda must be finite, got {lambda}")));
            }
            _ => {}
        }
        Ok(())
    }
}

/// Caller-supplied baseline matching a [`StrategyConfig`].
pub enum Baseline<C: ?Sized> {
    /// For `EpsilonGreedy` and `TauFirst`.
    Policy(Box<dyn Policy<C>>),
    /// For `Bagging`: one policy per bag.
    Policies(Vec<Box<dyn Policy<C>>>),
    /// For `Softmax`, `Generic` and `Ranked`.
    Scorer(Box<dyn Scorer<C>>),
}

impl<C: ?Sized> Baseline<C> {
    pub fn policy(policy: impl Policy<C> + 'static) -> Self {
        Self::Policy(Box::new(policy))
    }

    pub fn scorer(scorer: impl Scorer<C> + 'static) -> Self {
        Self::Scorer(Box::new(scorer))
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Policy(_) => "policy",
            Self::Policies(_) => "policies",
            Self::Scorer(_) => "scorer",
        }
    }
}

impl<C: ?Sized> Explorer<C> {
    /// Build an explorer from configuration plus its baseline.
    ///
    /// A baseline of the wrong kind, or a policy list whose length differs
    /// from the configured bag count, is `InvalidConfig`.
    pub fn from_config(cfg: &ExplorerConfig, baseline: Baseline<C>) -> Result<Self> {
        cfg.validate()?;
        let strategy = match (cfg.strategy, baseline) {
            (StrategyConfig::EpsilonGreedy { epsilon }, Baseline::Policy(policy)) => {
                Strategy::EpsilonGreedy { epsilon, policy }
            }
            (StrategyConfig::TauFirst { tau }, Baseline::Policy(policy)) => Strategy::TauFirst {
                budget: TauBudget::new(tau),
                policy,
            },
            (StrategyConfig::Bagging { bags }, Baseline::Policies(policies)) => {
                if policies.len() != bags as usize {
                    return Err(MwtError::config(format!(
                        "configured {bags} bags but {} policies were supplied",
                        policies.len()
                    )));
                }
                Strategy::Bagging { policies }
            }
            (StrategyConfig::Softmax { lambda }, Baseline::Scorer(scorer)) => {
                Strategy::Softmax { lambda, scorer }
            }
            (StrategyConfig::Generic, Baseline::Scorer(scorer)) => Strategy::Generic { scorer },
            (StrategyConfig::Ranked, Baseline::Scorer(scorer)) => Strategy::Ranked { scorer },
            (strategy, baseline) => {
                return Err(MwtError::config(format!(
                    "{} strategy cannot use a {} baseline",
                    strategy.kind().as_str(),
                    baseline.name()
                )))
            }
        };
        Self::new(strategy, cfg.actions)
    }
}
