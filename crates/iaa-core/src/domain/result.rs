//! Resolution result: problem item -> responsibility, with priority merge.

use std::collections::BTreeMap;

use crate::domain::error::{AssignerError, Result};
use crate::domain::problem::ProblemItem;
use crate::domain::user::Responsibility;

/// Mapping from problem item to the responsibility found for it.
///
/// # Invariants
///
/// A key is present at most once and an entry, once set, is never
/// overwritten. Items a heuristic could not (or deliberately did not)
/// resolve are simply absent. Iteration follows [`ProblemItem`] ordering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionResult {
    entries: BTreeMap<ProblemItem, Responsibility>,
}

impl ResolutionResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a responsibility for `item`.
    ///
    /// Fails with [`AssignerError::DuplicateAssignment`] if `item` already has
    /// an entry. That is a heuristic bug, never a control-flow signal.
    pub fn add(&mut self, item: ProblemItem, responsibility: Responsibility) -> Result<()> {
        if self.entries.contains_key(&item) {
            return Err(AssignerError::DuplicateAssignment { item });
        }
        self.entries.insert(item, responsibility);
        Ok(())
    }

    pub fn get(&self, item: &ProblemItem) -> Option<&Responsibility> {
        self.entries.get(item)
    }

    pub fn contains(&self, item: &ProblemItem) -> bool {
        self.entries.contains_key(item)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Copy every entry of `other` whose item is absent here.
    ///
    /// Existing entries always win. Returns the number of entries copied.
    pub fn merge_as_fallback(&mut self, other: ResolutionResult) -> usize {
        let mut added = 0;
        for (item, responsibility) in other.entries {
            if let std::collections::btree_map::Entry::Vacant(slot) = self.entries.entry(item) {
                slot.insert(responsibility);
                added += 1;
            }
        }
        added
    }

    /// Entries in deterministic item order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProblemItem, &Responsibility)> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ResolutionResult {
    type Item = (&'a ProblemItem, &'a Responsibility);
    type IntoIter = std::collections::btree_map::Iter<'a, ProblemItem, Responsibility>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::problem::{BuildProblemId, TestRunId};
    use crate::domain::user::User;

    fn responsibility(username: &str, why: &str) -> Responsibility {
        Responsibility::new(User::new(1, username), why)
    }

    const T1: ProblemItem = ProblemItem::TestRun(TestRunId(1));
    const T2: ProblemItem = ProblemItem::TestRun(TestRunId(2));
    const P1: ProblemItem = ProblemItem::BuildProblem(BuildProblemId(1));

    #[test]
    fn test_add_and_get() {
        let mut result = ResolutionResult::new();
        assert!(result.is_empty());

        result.add(T1, responsibility("alice", "first")).unwrap();
        assert!(!result.is_empty());
        assert_eq!(result.get(&T1).unwrap().user().username, "alice");
        assert!(result.get(&T2).is_none());
    }

    #[test]
    fn test_add_duplicate_fails_and_keeps_original() {
        let mut result = ResolutionResult::new();
        result.add(T1, responsibility("alice", "first")).unwrap();

        let err = result.add(T1, responsibility("bob", "second")).unwrap_err();
        assert!(matches!(err, AssignerError::DuplicateAssignment { item } if item == T1));
        assert_eq!(result.get(&T1).unwrap().description(), "first");
    }

    #[test]
    fn test_merge_as_fallback_never_overwrites() {
        let mut primary = ResolutionResult::new();
        primary.add(T1, responsibility("alice", "primary")).unwrap();

        let mut secondary = ResolutionResult::new();
        secondary.add(T1, responsibility("bob", "secondary")).unwrap();
        secondary.add(P1, responsibility("bob", "secondary")).unwrap();

        let added = primary.merge_as_fallback(secondary);

        assert_eq!(added, 1);
        assert_eq!(primary.len(), 2);
        assert_eq!(primary.get(&T1).unwrap().description(), "primary");
        assert_eq!(primary.get(&P1).unwrap().user().username, "bob");
    }

    #[test]
    fn test_merge_empty_is_noop() {
        let mut primary = ResolutionResult::new();
        primary.add(T2, responsibility("alice", "x")).unwrap();
        let before = primary.clone();

        assert_eq!(primary.merge_as_fallback(ResolutionResult::new()), 0);
        assert_eq!(primary, before);
    }

    #[test]
    fn test_iteration_is_item_ordered() {
        let mut result = ResolutionResult::new();
        result.add(P1, responsibility("c", "x")).unwrap();
        result.add(T2, responsibility("b", "x")).unwrap();
        result.add(T1, responsibility("a", "x")).unwrap();

        let items: Vec<ProblemItem> = result.iter().map(|(item, _)| *item).collect();
        assert_eq!(items, vec![T1, T2, P1]);
    }
}
