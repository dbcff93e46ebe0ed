//! Decision contexts and action-space cardinality.

use crate::{MwtError, Result};

/// 1-based action index in `[1, num_actions]`. `0` is reserved and never valid.
pub type ActionIndex = u32;

/// How an explorer learns the number of actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ActionCount {
    /// The action count is configured on the explorer.
    Fixed(u32),
    /// The context reports its own action count at decide time.
    Variable,
}

/// A decision context.
///
/// Contexts with a fixed action space keep the default `action_count`, which
/// returns `None`. Self-describing contexts override it.
pub trait Context {
    fn action_count(&self) -> Option<u32> {
        None
    }
}

/// Resolve the effective action count for one decision.
///
/// A count reported by the context takes precedence over the configured one.
/// Zero (configured or reported) is `InvalidActionCount`; a `Variable` explorer
/// paired with a context that does not report a count is `UnsupportedContext`.
pub fn resolve_action_count<C: Context + ?Sized>(actions: ActionCount, context: &C) -> Result<u32> {
    let n = match (context.action_count(), actions) {
        (Some(reported), _) => reported,
        (None, ActionCount::Fixed(n)) => n,
        (None, ActionCount::Variable) => {
            return Err(MwtError::UnsupportedContext {
                reason: "variable action count requires a context that reports action_count",
            })
        }
    };
    if n == 0 {
        return Err(MwtError::InvalidActionCount { count: n });
    }
    Ok(n)
}

/// Check a policy-chosen action against the action space.
pub(crate) fn check_action(action: ActionIndex, num_actions: u32) -> Result<ActionIndex> {
    if action == 0 || action > num_actions {
        return Err(MwtError::PolicyOutOfRange {
            action,
            num_actions,
        });
    }
    Ok(action)
}

// Plain data types used directly as fixed-action contexts.
impl Context for () {}
impl Context for str {}
impl Context for String {}
impl Context for [f32] {}
impl Context for Vec<f32> {}
impl<T: Context + ?Sized> Context for &T {
    fn action_count(&self) -> Option<u32> {
        (**self).action_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Menu(u32);

    impl Context for Menu {
        fn action_count(&self) -> Option<u32> {
            Some(self.0)
        }
    }

    #[test]
    fn fixed_count_is_used_for_plain_contexts() {
        assert_eq!(resolve_action_count(ActionCount::Fixed(4), &()), Ok(4));
    }

    #[test]
    fn reported_count_wins_over_configured() {
        assert_eq!(resolve_action_count(ActionCount::Fixed(4), &Menu(7)), Ok(7));
        assert_eq!(resolve_action_count(ActionCount::Variable, &Menu(2)), Ok(2));
    }

    #[test]
    fn zero_counts_fail_fast() {
        assert_eq!(
            resolve_action_count(ActionCount::Fixed(0), &()),
            Err(MwtError::InvalidActionCount { count: 0 })
        );
        assert_eq!(
            resolve_action_count(ActionCount::Variable, &Menu(0)),
            Err(MwtError::InvalidActionCount { count: 0 })
        );
    }

    #[test]
    fn variable_without_reporting_context_is_unsupported() {
        let err = resolve_action_count(ActionCount::Variable, "plain").unwrap_err();
        assert_eq!(err.kind(), "unsupported_context");
    }

    #[test]
    fn action_range_check() {
        assert_eq!(check_action(1, 3), Ok(1));
        assert_eq!(check_action(3, 3), Ok(3));
        assert!(check_action(0, 3).is_err());
        assert!(check_action(4, 3).is_err());
    }
}
