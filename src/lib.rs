//! `mwt`: reproducible exploration for multi-world testing.
//!
//! Given a decision context and a baseline (a [`Policy`] that picks one
//! action, or a [`Scorer`] that scores every action), an [`Explorer`]
//! picks an action with a randomized exploration strategy and reports the
//! exact probability it was chosen with. [`MwtExplorer`] ties this to a
//! caller-supplied decision key: the seed is a pure function of
//! `(app_id, key)`, so any logged decision can be reproduced bit for bit later
//! and replayed for off-policy (counterfactual) evaluation.
//!
//! **Goals:**
//! - **Deterministic by construction**: no platform RNG, no hidden counters in
//!   the seed. Same `(app_id, key)` + same explorer config + same context →
//!   same action and probability, in any process.
//! - **Exact propensities**: the logged probability is the probability of the
//!   branch actually taken, never a post-hoc estimate.
//! - **Fixed or self-describing action spaces**: see [`ActionCount`] and [`Context`].
//!
//! **Strategies** ([`StrategyKind`]):
//! - `EpsilonGreedy`: follow the policy, explore uniformly with probability ε.
//! - `TauFirst`: explore uniformly for the first τ decisions, then exploit.
//! - `Bagging`: pick one of several bootstrap policies uniformly; probability is
//!   the fraction of bags agreeing with the chosen action.
//! - `Softmax`: sample from `exp(λ·score)` normalized.
//! - `Generic`: sample from a scorer-provided pmf.
//! - `Ranked`: rank every action by sampling without replacement from a pmf.
//!
//! **Recording**: [`Recorder`] receives `(context, actions, probability, key)`
//! once per decision, before `choose_*` returns. [`StringRecorder`] produces
//! `<action> <key> <probability:.5> | <context>` lines.
//!
//! **Non-goals:**
//! - No learning, model updates or persistence: baselines are caller code.
//! - No network or service plumbing, and no internal locking beyond the atomic
//!   `TauFirst` budget.
//!
//! # Example
//!
//! ```rust
//! use mwt::{ActionCount, Explorer, FixedPolicy, MwtExplorer, StringRecorder};
//!
//! let recorder = StringRecorder::new();
//! let mwt = MwtExplorer::new("my-app", &recorder);
//! let explorer = Explorer::<str>::epsilon_greedy(0.1, ActionCount::Fixed(4), FixedPolicy(2)).unwrap();
//!
//! let a = mwt.choose_action(&explorer, "user-17/request-3", "user-17").unwrap();
//! let b = mwt.choose_action(&explorer, "user-17/request-3", "user-17").unwrap();
//! assert_eq!(a, b);
//! assert!((1..=4).contains(&a));
//! assert_eq!(recorder.contents().lines().count(), 2);
//! ```

mod error;
pub use error::*;

mod stable_hash;
pub use stable_hash::*;

mod rng;
pub use rng::*;

mod context;
pub use context::{resolve_action_count, ActionCount, ActionIndex, Context};

mod policy;
pub use policy::*;

mod alloc;
pub use alloc::*;

mod decision;
pub use decision::*;

mod ranked;
pub use ranked::*;

mod explorer;
pub use explorer::*;

mod config;
pub use config::*;

mod recorder;
pub use recorder::*;

mod mwt_explorer;
pub use mwt_explorer::*;
