//! The decision "front door": key → seed → strategy → recorder.
//!
//! ```text
//! let mwt = MwtExplorer::new("my-app", &recorder);
//! let action = mwt.choose_action(&explorer, "event-123", &context)?;
//! ```
//!
//! Each call is synchronous and self-contained:
//!
//! 1. `seed = seed_hash(app_id, key)`, `rng = DeterministicRng::new(seed)`
//! 2. `decision = explorer.decide(context, &mut rng)` (validates the action space first)
//! 3. if the decision asks to be recorded, `recorder.record(...)` runs before returning
//!
//! The same `(app_id, key, explorer config, context)` always yields the same
//! action and probability. Errors are returned as-is: nothing is retried and
//! nothing is recorded. No locking is added here; a `TauFirst` explorer's
//! budget is atomic, and recorders guard their own state.

use log::{trace, warn};

use crate::{
    ActionIndex, Context, DecisionRecord, DeterministicRng, Explorer, Recorder, Result,
};

/// Orchestrates seeded exploration decisions for one application id.
///
/// The recorder is caller-owned and borrowed for the lifetime of the explorer.
#[derive(Debug)]
pub struct MwtExplorer<'r, R: ?Sized> {
    app_id: String,
    recorder: &'r R,
}

impl<'r, R: ?Sized> MwtExplorer<'r, R> {
    pub fn new(app_id: impl Into<String>, recorder: &'r R) -> Self {
        Self {
            app_id: app_id.into(),
            recorder,
        }
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn recorder(&self) -> &'r R {
        self.recorder
    }

    /// Make and record one decision, returning the full owned record.
    pub fn choose_decision<C>(
        &self,
        explorer: &Explorer<C>,
        key: &str,
        context: &C,
    ) -> Result<DecisionRecord>
    where
        C: Context + ?Sized,
        R: Recorder<C>,
    {
        let mut rng = DeterministicRng::for_decision(&self.app_id, key);
        let decision = match explorer.decide(context, &mut rng) {
            Ok(d) => d,
            Err(e) => {
                warn!(
                    "decision failed: app_id={} key={} strategy={} error={}",
                    self.app_id,
                    key,
                    explorer.kind().as_str(),
                    e.kind()
                );
                return Err(e);
            }
        };
        trace!(
            "decision: app_id={} key={} strategy={} actions={:?} probability={}",
            self.app_id,
            key,
            decision.strategy().as_str(),
            decision.actions(),
            decision.probability()
        );
        if decision.should_record() {
            self.recorder
                .record(context, decision.actions(), decision.probability(), key);
        }
        Ok(DecisionRecord {
            key: key.to_string(),
            decision,
        })
    }

    /// Choose a single action (the top-ranked one for `Ranked` explorers).
    pub fn choose_action<C>(&self, explorer: &Explorer<C>, key: &str, context: &C) -> Result<ActionIndex>
    where
        C: Context + ?Sized,
        R: Recorder<C>,
    {
        self.choose_decision(explorer, key, context)
            .map(|r| r.decision.action())
    }

    /// Choose a full ranking. Single-action explorers yield a one-element ranking.
    pub fn choose_ranking<C>(
        &self,
        explorer: &Explorer<C>,
        key: &str,
        context: &C,
    ) -> Result<Vec<ActionIndex>>
    where
        C: Context + ?Sized,
        R: Recorder<C>,
    {
        self.choose_decision(explorer, key, context)
            .map(|r| r.decision.into_actions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ActionCount, FixedPolicy, FixedScorer, MwtError, StringRecorder, UniformSource, VecRecorder};

    #[test]
    fn choose_action_matches_manual_pipeline() {
        let rec = StringRecorder::new();
        let mwt = MwtExplorer::new("mwt", &rec);
        let ex = Explorer::<str>::epsilon_greedy(0.2, ActionCount::Fixed(10), FixedPolicy(5)).unwrap();

        let action = mwt.choose_action(&ex, "k1", "ctx").unwrap();

        let mut rng = DeterministicRng::new(crate::seed_hash("mwt", "k1"));
        let r = rng.uniform01();
        let (expected, p) = if r < 0.2 {
            (rng.uniform_int(1, 10), 0.02f32)
        } else {
            (5, 0.82f32)
        };
        assert_eq!(action, expected);
        assert_eq!(
            rec.contents(),
            format!("{expected} k1 {p:.5} | ctx\n")
        );
    }

    #[test]
    fn errors_are_not_recorded() {
        let rec: VecRecorder<()> = VecRecorder::new();
        let mwt = MwtExplorer::new("app", &rec);
        let ex = Explorer::<()>::generic(ActionCount::Fixed(2), FixedScorer(vec![0.0, 0.0])).unwrap();
        let err = mwt.choose_action(&ex, "k", &()).unwrap_err();
        assert_eq!(err.kind(), "invalid_distribution");
        assert!(rec.is_empty());
    }

    #[test]
    fn out_of_range_policy_surfaces_to_caller() {
        let rec: VecRecorder<()> = VecRecorder::new();
        let mwt = MwtExplorer::new("app", &rec);
        let ex = Explorer::<()>::tau_first(0, ActionCount::Fixed(3), FixedPolicy(0)).unwrap();
        assert_eq!(
            mwt.choose_action(&ex, "k", &()),
            Err(MwtError::PolicyOutOfRange {
                action: 0,
                num_actions: 3
            })
        );
        assert!(rec.is_empty());
    }

    #[test]
    fn ranking_path_returns_permutation_and_records_it() {
        let rec: VecRecorder<()> = VecRecorder::new();
        let mwt = MwtExplorer::new("app", &rec);
        let ex = Explorer::<()>::ranked(ActionCount::Fixed(4), FixedScorer(vec![0.4, 0.3, 0.2, 0.1])).unwrap();
        let ranking = mwt.choose_ranking(&ex, "k", &()).unwrap();
        let mut sorted = ranking.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![1, 2, 3, 4]);
        let items = rec.interactions();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].actions, ranking);

        // The single-action path on the same key yields the top of the same ranking.
        assert_eq!(mwt.choose_action(&ex, "k", &()).unwrap(), ranking[0]);
    }

    #[test]
    fn single_action_explorer_ranking_has_one_entry() {
        let rec = crate::NoopRecorder;
        let mwt = MwtExplorer::new("app", &rec);
        let ex = Explorer::<()>::epsilon_greedy(0.0, ActionCount::Fixed(3), FixedPolicy(2)).unwrap();
        assert_eq!(mwt.choose_ranking(&ex, "k", &()).unwrap(), vec![2]);
    }
}
