//! Decider authorization port.

use std::collections::HashSet;

/// Decides whether an actor may approve, reject or request fixes.
///
/// Consulted by the calling layer before it invokes a decision; the
/// lifecycle engine itself performs no identity checks.
pub trait DeciderAuthorization: Send + Sync {
    /// Returns `true` if `actor_id` may decide applications.
    fn is_authorized_decider(&self, actor_id: i64) -> bool;
}

/// Fixed set of administrator identities.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    deciders: HashSet<i64>,
}

impl AllowList {
    /// Creates an allow-list from the given identities.
    pub fn new(deciders: impl IntoIterator<Item = i64>) -> Self {
        Self {
            deciders: deciders.into_iter().collect(),
        }
    }
}

impl DeciderAuthorization for AllowList {
    fn is_authorized_decider(&self, actor_id: i64) -> bool {
        self.deciders.contains(&actor_id)
    }
}
