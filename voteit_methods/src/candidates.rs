use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

/// Anything that can identify a candidate.
///
/// Identifiers are only compared for equality and used as map keys. No
/// ordering is ever derived from them.
pub trait CandidateId: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> CandidateId for T {}

/// Dense, zero-based positions for an ordered candidate list.
///
/// The mapping is built once at the start of a computation and never changes
/// afterwards. If an identifier is repeated, it resolves to its first position.
#[derive(Debug, Clone)]
pub struct CandidateIndex<C> {
    by_position: Vec<C>,
    by_id: HashMap<C, usize>,
}

impl<C: CandidateId> CandidateIndex<C> {
    pub fn new(candidates: &[C]) -> CandidateIndex<C> {
        let mut by_id: HashMap<C, usize> = HashMap::with_capacity(candidates.len());
        for (idx, c) in candidates.iter().enumerate() {
            by_id.entry(c.clone()).or_insert(idx);
        }
        CandidateIndex {
            by_position: candidates.to_vec(),
            by_id,
        }
    }

    pub fn index_of(&self, candidate: &C) -> Option<usize> {
        self.by_id.get(candidate).copied()
    }

    /// Panics if `idx` is out of range.
    pub fn candidate(&self, idx: usize) -> &C {
        &self.by_position[idx]
    }

    pub fn len(&self) -> usize {
        self.by_position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_position.is_empty()
    }

    /// The position of the first candidate that repeats an earlier one.
    pub fn first_duplicate(candidates: &[C]) -> Option<usize> {
        let mut seen: HashMap<&C, usize> = HashMap::with_capacity(candidates.len());
        for (idx, c) in candidates.iter().enumerate() {
            if seen.insert(c, idx).is_some() {
                return Some(idx);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_bidirectional() {
        let index = CandidateIndex::new(&["a", "b", "c"]);
        assert_eq!(index.len(), 3);
        assert_eq!(index.index_of(&"b"), Some(1));
        assert_eq!(*index.candidate(2), "c");
        assert_eq!(index.index_of(&"z"), None);
    }

    #[test]
    fn repeated_ids_resolve_to_first_position() {
        let index = CandidateIndex::new(&["a", "b", "a"]);
        assert_eq!(index.index_of(&"a"), Some(0));
        assert_eq!(CandidateIndex::first_duplicate(&["a", "b", "a"]), Some(2));
        assert_eq!(CandidateIndex::first_duplicate(&["a", "b"]), None);
    }

    #[test]
    fn empty_index() {
        let index: CandidateIndex<u32> = CandidateIndex::new(&[]);
        assert!(index.is_empty());
    }
}
