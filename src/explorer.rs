//! Exploration strategies.
//!
//! An [`Explorer`] pairs one [`Strategy`] with an [`ActionCount`]. The
//! strategy set is closed and dispatched by `match`, so every strategy's
//! per-call state machine lives in one place: [`Explorer::decide`].
//!
//! Draw order per strategy (changing it changes logged outcomes):
//!
//! | Strategy | Draws |
//! |---|---|
//! | `EpsilonGreedy` | `uniform01`, then `uniform_int(1, N)` only on the explore branch |
//! | `TauFirst` | `uniform_int(1, N)` while budget remains, none afterwards |
//! | `Bagging` | `uniform_int(0, bags - 1)` |
//! | `Softmax`, `Generic` | `uniform01` |
//! | `Ranked` | `uniform01` per ranking slot |
//!
//! Every strategy fails before drawing when the action count resolves to zero.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use log::debug;

use crate::alloc::{normalize_pmf, sample_cdf, softmax_pmf};
use crate::context::{check_action, resolve_action_count};
use crate::rng::UniformSource;
use crate::{
    rank_without_replacement, ActionCount, ActionIndex, Context, Decision, MwtError, Policy,
    Result, Scorer, StrategyKind,
};

/// Remaining pure-exploration budget of a `TauFirst` explorer.
///
/// Shared by every decision made through the same explorer; decrements are
/// atomic so concurrent callers never explore more than `tau` times in total.
#[derive(Debug)]
pub struct TauBudget {
    tau: u32,
    remaining: AtomicU32,
}

impl TauBudget {
    pub fn new(tau: u32) -> Self {
        Self {
            tau,
            remaining: AtomicU32::new(tau),
        }
    }

    pub fn tau(&self) -> u32 {
        self.tau
    }

    pub fn remaining(&self) -> u32 {
        self.remaining.load(Ordering::Acquire)
    }

    /// Take one unit of budget. Returns `false` once exhausted.
    fn try_take(&self) -> bool {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(1) => {
                debug!("tau-first exploration budget exhausted (tau={})", self.tau);
                true
            }
            Ok(_) => true,
            Err(_) => false,
        }
    }
}

/// Exploration strategy together with its baseline policy or scorer.
pub enum Strategy<C: ?Sized> {
    EpsilonGreedy {
        epsilon: f32,
        policy: Box<dyn Policy<C>>,
    },
    TauFirst {
        budget: TauBudget,
        policy: Box<dyn Policy<C>>,
    },
    Bagging {
        policies: Vec<Box<dyn Policy<C>>>,
    },
    Softmax {
        lambda: f32,
        scorer: Box<dyn Scorer<C>>,
    },
    Generic {
        scorer: Box<dyn Scorer<C>>,
    },
    Ranked {
        scorer: Box<dyn Scorer<C>>,
    },
}

impl<C: ?Sized> Strategy<C> {
    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::EpsilonGreedy { .. } => StrategyKind::EpsilonGreedy,
            Self::TauFirst { .. } => StrategyKind::TauFirst,
            Self::Bagging { .. } => StrategyKind::Bagging,
            Self::Softmax { .. } => StrategyKind::Softmax,
            Self::Generic { .. } => StrategyKind::Generic,
            Self::Ranked { .. } => StrategyKind::Ranked,
        }
    }
}

/// A configured exploration strategy, created once and reused across decisions.
pub struct Explorer<C: ?Sized> {
    strategy: Strategy<C>,
    actions: ActionCount,
}

impl<C: ?Sized> fmt::Debug for Explorer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Explorer");
        d.field("strategy", &self.strategy.kind())
            .field("actions", &self.actions);
        match &self.strategy {
            Strategy::EpsilonGreedy { epsilon, .. } => d.field("epsilon", epsilon),
            Strategy::TauFirst { budget, .. } => d
                .field("tau", &budget.tau())
                .field("remaining", &budget.remaining()),
            Strategy::Bagging { policies } => d.field("bags", &policies.len()),
            Strategy::Softmax { lambda, .. } => d.field("lambda", lambda),
            Strategy::Generic { .. } | Strategy::Ranked { .. } => &mut d,
        };
        d.finish()
    }
}

impl<C: ?Sized> Explorer<C> {
    /// Build an explorer from an already-assembled strategy, validating its parameters.
    pub fn new(strategy: Strategy<C>, actions: ActionCount) -> Result<Self> {
        if actions == ActionCount::Fixed(0) {
            return Err(MwtError::InvalidActionCount { count: 0 });
        }
        match &strategy {
            Strategy::EpsilonGreedy { epsilon, .. } => {
                if !epsilon.is_finite() || !(0.0..=1.0).contains(epsilon) {
                    return Err(MwtError::config(format!(
                        "epsilon must be in [0, 1], got {epsilon}"
                    )));
                }
            }
            Strategy::Bagging { policies } if policies.is_empty() => {
                return Err(MwtError::config("bagging needs at least one policy"));
            }
            Strategy::Softmax { lambda, .. } if !lambda.is_finite() => {
                return Err(MwtError::config(format!("lambda must be finite, got {lambda}")));
            }
            _ => {}
        }
        Ok(Self { strategy, actions })
    }

    /// Epsilon-greedy around `policy`.
    pub fn epsilon_greedy(
        epsilon: f32,
        actions: ActionCount,
        policy: impl Policy<C> + 'static,
    ) -> Result<Self> {
        Self::new(
            Strategy::EpsilonGreedy {
                epsilon,
                policy: Box::new(policy),
            },
            actions,
        )
    }

    /// Explore uniformly for the first `tau` decisions, then follow `policy`.
    pub fn tau_first(tau: u32, actions: ActionCount, policy: impl Policy<C> + 'static) -> Result<Self> {
        Self::new(
            Strategy::TauFirst {
                budget: TauBudget::new(tau),
                policy: Box::new(policy),
            },
            actions,
        )
    }

    /// Bootstrap-ensemble exploration over one policy per bag.
    pub fn bagging(actions: ActionCount, policies: Vec<Box<dyn Policy<C>>>) -> Result<Self> {
        Self::new(Strategy::Bagging { policies }, actions)
    }

    /// Softmax over raw scores with inverse temperature `lambda`.
    pub fn softmax(lambda: f32, actions: ActionCount, scorer: impl Scorer<C> + 'static) -> Result<Self> {
        Self::new(
            Strategy::Softmax {
                lambda,
                scorer: Box::new(scorer),
            },
            actions,
        )
    }

    /// Sample directly from the pmf returned by `scorer`.
    pub fn generic(actions: ActionCount, scorer: impl Scorer<C> + 'static) -> Result<Self> {
        Self::new(
            Strategy::Generic {
                scorer: Box::new(scorer),
            },
            actions,
        )
    }

    /// Rank all actions by sampling without replacement from the pmf returned by `scorer`.
    pub fn ranked(actions: ActionCount, scorer: impl Scorer<C> + 'static) -> Result<Self> {
        Self::new(
            Strategy::Ranked {
                scorer: Box::new(scorer),
            },
            actions,
        )
    }

    pub fn kind(&self) -> StrategyKind {
        self.strategy.kind()
    }

    pub fn actions(&self) -> ActionCount {
        self.actions
    }

    pub fn strategy(&self) -> &Strategy<C> {
        &self.strategy
    }

    /// Remaining pure-exploration budget (`TauFirst` only).
    pub fn remaining_exploration(&self) -> Option<u32> {
        match &self.strategy {
            Strategy::TauFirst { budget, .. } => Some(budget.remaining()),
            _ => None,
        }
    }
}

impl<C: Context + ?Sized> Explorer<C> {
    /// Make one decision for `context`, consuming draws from `rng`.
    ///
    /// The returned probability is the probability of the branch actually
    /// taken (for `EpsilonGreedy`, a random pick that happens to equal the
    /// baseline still reports `epsilon / N`).
    pub fn decide<R: UniformSource + ?Sized>(&self, context: &C, rng: &mut R) -> Result<Decision> {
        let n = resolve_action_count(self.actions, context)?;
        let kind = self.kind();
        match &self.strategy {
            Strategy::EpsilonGreedy { epsilon, policy } => {
                let baseline = check_action(policy.choose(context), n)?;
                let eps = *epsilon;
                let r = rng.uniform01();
                if r < eps {
                    let action = rng.uniform_int(1, n);
                    Ok(Decision::single(kind, action, eps / n as f32))
                } else {
                    Ok(Decision::single(kind, baseline, 1.0 - eps + eps / n as f32))
                }
            }
            Strategy::TauFirst { budget, policy } => {
                if budget.try_take() {
                    let action = rng.uniform_int(1, n);
                    Ok(Decision::single(kind, action, 1.0 / n as f32))
                } else {
                    let action = check_action(policy.choose(context), n)?;
                    Ok(Decision::single(kind, action, 1.0))
                }
            }
            Strategy::Bagging { policies } => {
                let choices = bag_choices(policies, context, n)?;
                let bag = rng.uniform_int(0, choices.len() as u32 - 1) as usize;
                let action = choices[bag];
                let agree = choices.iter().filter(|&&a| a == action).count();
                Ok(Decision::single(
                    kind,
                    action,
                    agree as f32 / choices.len() as f32,
                ))
            }
            Strategy::Softmax { lambda, scorer } => {
                let scores = scores_for(scorer.as_ref(), context, n)?;
                let pmf = softmax_pmf(*lambda, &scores)?;
                sample_single(kind, &pmf, rng)
            }
            Strategy::Generic { scorer } => {
                let weights = scores_for(scorer.as_ref(), context, n)?;
                let pmf = normalize_pmf(&weights)?;
                sample_single(kind, &pmf, rng)
            }
            Strategy::Ranked { scorer } => {
                let weights = scores_for(scorer.as_ref(), context, n)?;
                let (ranking, probability) = rank_without_replacement(&weights, rng)?;
                Ok(Decision::ranked(ranking, probability))
            }
        }
    }

    /// Distribution the next single-action choice for `context` is drawn from.
    ///
    /// Index `i` holds the probability of action `i + 1`. For `Ranked` this is
    /// the distribution of the top slot. Does not consume `TauFirst` budget.
    pub fn pmf(&self, context: &C) -> Result<Vec<f32>> {
        let n = resolve_action_count(self.actions, context)?;
        let uniform = vec![1.0 / n as f32; n as usize];
        match &self.strategy {
            Strategy::EpsilonGreedy { epsilon, policy } => {
                let baseline = check_action(policy.choose(context), n)?;
                let eps = *epsilon;
                let mut pmf = vec![eps / n as f32; n as usize];
                pmf[baseline as usize - 1] += 1.0 - eps;
                Ok(pmf)
            }
            Strategy::TauFirst { budget, policy } => {
                if budget.remaining() > 0 {
                    return Ok(uniform);
                }
                let action = check_action(policy.choose(context), n)?;
                let mut pmf = vec![0.0; n as usize];
                pmf[action as usize - 1] = 1.0;
                Ok(pmf)
            }
            Strategy::Bagging { policies } => {
                let choices = bag_choices(policies, context, n)?;
                let mut pmf = vec![0.0; n as usize];
                for a in &choices {
                    pmf[*a as usize - 1] += 1.0 / choices.len() as f32;
                }
                Ok(pmf)
            }
            Strategy::Softmax { lambda, scorer } => {
                let scores = scores_for(scorer.as_ref(), context, n)?;
                softmax_pmf(*lambda, &scores)
            }
            Strategy::Generic { scorer } | Strategy::Ranked { scorer } => {
                let weights = scores_for(scorer.as_ref(), context, n)?;
                normalize_pmf(&weights)
            }
        }
    }
}

fn bag_choices<C: ?Sized>(
    policies: &[Box<dyn Policy<C>>],
    context: &C,
    n: u32,
) -> Result<Vec<ActionIndex>> {
    policies
        .iter()
        .map(|p| check_action(p.choose(context), n))
        .collect()
}

fn scores_for<C: ?Sized>(scorer: &dyn Scorer<C>, context: &C, n: u32) -> Result<Vec<f32>> {
    let scores = scorer.score(context);
    if scores.len() != n as usize {
        return Err(MwtError::distribution(format!(
            "scorer returned {} entries for {} actions",
            scores.len(),
            n
        )));
    }
    Ok(scores)
}

fn sample_single<R: UniformSource + ?Sized>(
    kind: StrategyKind,
    pmf: &[f32],
    rng: &mut R,
) -> Result<Decision> {
    let r = rng.uniform01();
    let idx = sample_cdf(pmf, r).ok_or_else(|| MwtError::distribution("pmf has no positive mass"))?;
    Ok(Decision::single(kind, idx as ActionIndex + 1, pmf[idx]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{DeterministicRng, ScriptedDraws};
    use crate::{FixedPolicy, FixedScorer};
    use proptest::prelude::*;

    struct Slate(u32);

    impl Context for Slate {
        fn action_count(&self) -> Option<u32> {
            Some(self.0)
        }
    }

    #[test]
    fn epsilon_greedy_exploit_branch() {
        let ex = Explorer::<()>::epsilon_greedy(0.2, ActionCount::Fixed(10), FixedPolicy(5)).unwrap();
        let mut draws = ScriptedDraws::new(vec![0.5]);
        let d = ex.decide(&(), &mut draws).unwrap();
        assert_eq!(d.action(), 5);
        assert!((d.probability() - 0.82).abs() < 1e-6);
        assert_eq!(draws.consumed(), 1);
    }

    #[test]
    fn epsilon_greedy_explore_branch_reports_branch_probability() {
        let ex = Explorer::<()>::epsilon_greedy(0.2, ActionCount::Fixed(10), FixedPolicy(5)).unwrap();
        // r = 0.1 < 0.2 explores; the integer draw 0.45 maps to action 5 == baseline.
        let mut draws = ScriptedDraws::new(vec![0.1, 0.45]);
        let d = ex.decide(&(), &mut draws).unwrap();
        assert_eq!(d.action(), 5);
        assert!((d.probability() - 0.02).abs() < 1e-7);
        assert_eq!(draws.consumed(), 2);
    }

    #[test]
    fn epsilon_greedy_zero_always_exploits_with_certainty() {
        let ex = Explorer::<()>::epsilon_greedy(0.0, ActionCount::Fixed(4), FixedPolicy(3)).unwrap();
        for seed in 0..200 {
            let d = ex.decide(&(), &mut DeterministicRng::new(seed)).unwrap();
            assert_eq!(d.action(), 3);
            assert_eq!(d.probability(), 1.0);
        }
    }

    #[test]
    fn epsilon_out_of_range_is_rejected() {
        assert!(Explorer::<()>::epsilon_greedy(1.5, ActionCount::Fixed(2), FixedPolicy(1)).is_err());
        assert!(Explorer::<()>::epsilon_greedy(f32::NAN, ActionCount::Fixed(2), FixedPolicy(1)).is_err());
    }

    #[test]
    fn policy_out_of_range_is_not_clamped() {
        let ex = Explorer::<()>::epsilon_greedy(0.1, ActionCount::Fixed(3), FixedPolicy(4)).unwrap();
        let mut draws = ScriptedDraws::new(vec![0.5]);
        let err = ex.decide(&(), &mut draws).unwrap_err();
        assert_eq!(
            err,
            MwtError::PolicyOutOfRange {
                action: 4,
                num_actions: 3
            }
        );
        assert_eq!(draws.consumed(), 0);
    }

    #[test]
    fn zero_actions_fail_before_drawing() {
        let ex = Explorer::generic(ActionCount::Variable, FixedScorer(vec![])).unwrap();
        let mut draws = ScriptedDraws::new(vec![0.5]);
        let err = ex.decide(&Slate(0), &mut draws).unwrap_err();
        assert_eq!(err, MwtError::InvalidActionCount { count: 0 });
        assert_eq!(draws.consumed(), 0);
        assert!(Explorer::<()>::generic(ActionCount::Fixed(0), FixedScorer(vec![])).is_err());
    }

    #[test]
    fn tau_first_explores_then_exploits() {
        let ex = Explorer::<()>::tau_first(3, ActionCount::Fixed(4), FixedPolicy(2)).unwrap();
        for i in 0..3 {
            let d = ex.decide(&(), &mut DeterministicRng::new(i)).unwrap();
            assert_eq!(d.probability(), 0.25);
            assert!(d.should_record());
        }
        assert_eq!(ex.remaining_exploration(), Some(0));
        for i in 0..10 {
            let d = ex.decide(&(), &mut DeterministicRng::new(100 + i)).unwrap();
            assert_eq!(d.action(), 2);
            assert_eq!(d.probability(), 1.0);
            assert!(d.should_record());
        }
    }

    #[test]
    fn tau_first_budget_survives_failed_calls() {
        let ex = Explorer::tau_first(1, ActionCount::Variable, FixedPolicy(1)).unwrap();
        assert!(ex.decide(&Slate(0), &mut DeterministicRng::new(0)).is_err());
        assert_eq!(ex.remaining_exploration(), Some(1));
    }

    #[test]
    fn bagging_probability_is_agreement_fraction() {
        let policies: Vec<Box<dyn Policy<()>>> = vec![
            Box::new(FixedPolicy(1)),
            Box::new(FixedPolicy(2)),
            Box::new(FixedPolicy(2)),
            Box::new(FixedPolicy(3)),
        ];
        let ex = Explorer::bagging(ActionCount::Fixed(3), policies).unwrap();
        // 0.3 * 4 bags -> bag index 1 -> action 2, chosen by 2 of 4 bags.
        let d = ex.decide(&(), &mut ScriptedDraws::new(vec![0.3])).unwrap();
        assert_eq!(d.action(), 2);
        assert_eq!(d.probability(), 0.5);
        let d = ex.decide(&(), &mut ScriptedDraws::new(vec![0.9])).unwrap();
        assert_eq!(d.action(), 3);
        assert_eq!(d.probability(), 0.25);
    }

    #[test]
    fn bagging_rejects_empty_ensemble() {
        assert!(Explorer::<()>::bagging(ActionCount::Fixed(2), Vec::new()).is_err());
    }

    #[test]
    fn generic_samples_first_exceeding_cdf_entry() {
        let ex = Explorer::<()>::generic(ActionCount::Fixed(3), FixedScorer(vec![0.5, 0.3, 0.2])).unwrap();
        let d = ex.decide(&(), &mut ScriptedDraws::new(vec![0.4])).unwrap();
        assert_eq!(d.action(), 1);
        assert!((d.probability() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn generic_rejects_negative_or_empty_mass() {
        let ex = Explorer::<()>::generic(ActionCount::Fixed(2), FixedScorer(vec![1.2, -0.2])).unwrap();
        let err = ex.decide(&(), &mut DeterministicRng::new(0)).unwrap_err();
        assert_eq!(err.kind(), "invalid_distribution");

        let ex = Explorer::<()>::generic(ActionCount::Fixed(2), FixedScorer(vec![0.0, 0.0])).unwrap();
        assert!(ex.decide(&(), &mut DeterministicRng::new(0)).is_err());
    }

    #[test]
    fn scorer_length_must_match_action_count() {
        let ex = Explorer::<()>::softmax(1.0, ActionCount::Fixed(3), FixedScorer(vec![1.0, 2.0])).unwrap();
        let err = ex.decide(&(), &mut DeterministicRng::new(0)).unwrap_err();
        assert_eq!(err.kind(), "invalid_distribution");
    }

    #[test]
    fn softmax_probability_matches_pmf_entry() {
        let ex = Explorer::<()>::softmax(2.0, ActionCount::Fixed(3), FixedScorer(vec![0.1, 0.7, 0.2])).unwrap();
        let pmf = ex.pmf(&()).unwrap();
        for seed in 0..50 {
            let d = ex.decide(&(), &mut DeterministicRng::new(seed)).unwrap();
            assert_eq!(d.probability(), pmf[d.action() as usize - 1]);
        }
    }

    #[test]
    fn variable_explorer_reads_count_from_context() {
        let ex = Explorer::ranked(ActionCount::Variable, |s: &Slate| -> Vec<f32> {
            (1..=s.0).map(|i| i as f32).collect()
        })
        .unwrap();
        let d = ex.decide(&Slate(5), &mut DeterministicRng::new(9)).unwrap();
        let mut sorted = d.actions().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn variable_explorer_rejects_plain_context() {
        let ex = Explorer::<()>::generic(ActionCount::Variable, FixedScorer(vec![1.0])).unwrap();
        let err = ex.decide(&(), &mut DeterministicRng::new(0)).unwrap_err();
        assert_eq!(err.kind(), "unsupported_context");
    }

    #[test]
    fn debug_shows_strategy_parameters() {
        let ex = Explorer::<()>::tau_first(3, ActionCount::Fixed(2), FixedPolicy(1)).unwrap();
        let s = format!("{ex:?}");
        assert!(s.contains("TauFirst") && s.contains("remaining: 3"), "{s}");
    }

    proptest! {
        #[test]
        fn pmfs_sum_to_one_and_decisions_are_in_range(
            seed in any::<u64>(),
            epsilon in 0.0f32..=1.0f32,
            baseline in 1u32..=6,
            lambda in -5.0f32..5.0f32,
            scores in proptest::collection::vec(0.01f32..1.0f32, 6),
        ) {
            let explorers: Vec<Explorer<()>> = vec![
                Explorer::epsilon_greedy(epsilon, ActionCount::Fixed(6), FixedPolicy(baseline)).unwrap(),
                Explorer::softmax(lambda, ActionCount::Fixed(6), FixedScorer(scores.clone())).unwrap(),
                Explorer::generic(ActionCount::Fixed(6), FixedScorer(scores.clone())).unwrap(),
                Explorer::tau_first(1, ActionCount::Fixed(6), FixedPolicy(baseline)).unwrap(),
            ];
            for ex in &explorers {
                let pmf = ex.pmf(&()).unwrap();
                let sum: f32 = pmf.iter().sum();
                prop_assert!((sum - 1.0).abs() < 1e-5, "{:?} sum={}", ex.kind(), sum);

                let d = ex.decide(&(), &mut DeterministicRng::new(seed)).unwrap();
                prop_assert!(d.action() >= 1 && d.action() <= 6);
                prop_assert!(d.probability() > 0.0 && d.probability() <= 1.0);
            }
        }
    }
}
