//! Caller-supplied baselines: a [`Policy`] picks one action, a [`Scorer`] scores all of them.
//!
//! Both are invoked synchronously on the caller's thread and are expected to
//! be fast and non-blocking. A callback that hangs blocks its decision.
//!
//! Closures implement both traits directly:
//!
//! ```rust
//! use mwt::{Policy, Scorer};
//!
//! let policy = |ctx: &Vec<f32>| -> u32 { if ctx[0] > 0.5 { 2 } else { 1 } };
//! assert_eq!(policy.choose(&vec![0.9]), 2);
//!
//! let scorer = |_: &Vec<f32>| -> Vec<f32> { vec![0.1, 0.9] };
//! assert_eq!(scorer.score(&vec![]), vec![0.1, 0.9]);
//! ```

use crate::ActionIndex;

/// Picks a single 1-based action for a context.
///
/// The result must lie in `[1, N]` for the context's action count; anything
/// else fails the decision with `PolicyOutOfRange`.
pub trait Policy<C: ?Sized>: Send + Sync {
    fn choose(&self, context: &C) -> ActionIndex;
}

/// Scores every action for a context.
///
/// The returned vector has one entry per action. Softmax treats entries as raw
/// scores; Generic and Ranked treat them as a (near-)normalized pmf.
pub trait Scorer<C: ?Sized>: Send + Sync {
    fn score(&self, context: &C) -> Vec<f32>;
}

impl<C: ?Sized, F> Policy<C> for F
where
    F: Fn(&C) -> ActionIndex + Send + Sync,
{
    fn choose(&self, context: &C) -> ActionIndex {
        self(context)
    }
}

impl<C: ?Sized, F> Scorer<C> for F
where
    F: Fn(&C) -> Vec<f32> + Send + Sync,
{
    fn score(&self, context: &C) -> Vec<f32> {
        self(context)
    }
}

/// Policy that always returns the same action, regardless of context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPolicy(pub ActionIndex);

impl<C: ?Sized> Policy<C> for FixedPolicy {
    fn choose(&self, _context: &C) -> ActionIndex {
        self.0
    }
}

/// Scorer that returns the same score vector for every context.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedScorer(pub Vec<f32>);

impl<C: ?Sized> Scorer<C> for FixedScorer {
    fn score(&self, _context: &C) -> Vec<f32> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_policy<P: Policy<str>>(p: &P, ctx: &str) -> ActionIndex {
        p.choose(ctx)
    }

    #[test]
    fn closures_and_fixed_policies_are_interchangeable() {
        let by_len = |ctx: &str| ctx.len() as ActionIndex;
        assert_eq!(run_policy(&by_len, "abc"), 3);
        assert_eq!(run_policy(&FixedPolicy(2), "abc"), 2);
    }

    #[test]
    fn boxed_policies_dispatch() {
        let mut bags: Vec<Box<dyn Policy<str>>> = Vec::new();
        bags.push(Box::new(FixedPolicy(1)));
        bags.push(Box::new(|_: &str| -> ActionIndex { 3 }));
        let picks: Vec<ActionIndex> = bags.iter().map(|p| p.choose("x")).collect();
        assert_eq!(picks, vec![1, 3]);
    }

    #[test]
    fn fixed_scorer_clones_its_scores() {
        let s = FixedScorer(vec![0.5, 0.5]);
        assert_eq!(Scorer::<()>::score(&s, &()), vec![0.5, 0.5]);
    }
}
