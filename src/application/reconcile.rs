// Keyed join - Classifies previous and next items as entering, updating or exiting
use std::collections::BTreeMap;

/// Result of matching two keyed sets. The three lists are disjoint and each is
/// in key order.
#[derive(Debug, Clone, PartialEq)]
pub struct Join<K, P, N> {
    /// Keys only present in `next`
    pub entering: Vec<(K, N)>,
    /// Keys present in both
    pub updating: Vec<(K, P, N)>,
    /// Keys only present in `prev`
    pub exiting: Vec<(K, P)>,
}

impl<K, P, N> Join<K, P, N> {
    pub fn is_unchanged_identity(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }
}

/// Match `prev` against `next` strictly by key, never by position.
pub fn reconcile<K: Ord, P, N>(prev: BTreeMap<K, P>, mut next: BTreeMap<K, N>) -> Join<K, P, N> {
    let mut updating = Vec::new();
    let mut exiting = Vec::new();

    for (key, old) in prev {
        match next.remove(&key) {
            Some(new) => updating.push((key, old, new)),
            None => exiting.push((key, old)),
        }
    }

    Join {
        entering: next.into_iter().collect(),
        updating,
        exiting,
    }
}
