use std::collections::HashMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use log::{debug, info};
use snafu::ResultExt;

use crate::candidates::{CandidateId, CandidateIndex};
use crate::config::*;
use crate::run_election;

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct ElectionId(u64);

impl Display for ElectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug)]
struct OpenElection<C> {
    kind: MethodKind,
    candidates: Vec<C>,
    votes: Vec<RankedBallot<C>>,
}

/// The open elections, by id.
///
/// Ballots are appended while an election is open. Closing removes the
/// election under the write lock, so that no ballot can arrive afterwards,
/// then tabulates it outside the lock.
#[derive(Debug)]
pub struct ElectionRegistry<C> {
    elections: RwLock<HashMap<ElectionId, OpenElection<C>>>,
    next_id: AtomicU64,
}

impl<C: CandidateId> Default for ElectionRegistry<C> {
    fn default() -> Self {
        ElectionRegistry::new()
    }
}

impl<C: CandidateId> ElectionRegistry<C> {
    pub fn new() -> ElectionRegistry<C> {
        ElectionRegistry {
            elections: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn open(&self, kind: MethodKind, candidates: &[C]) -> Result<ElectionId, ElectionError> {
        if let Some(position) = CandidateIndex::first_duplicate(candidates) {
            return Err(BuildError::DuplicateCandidate { position }).context(BuildSnafu);
        }
        let id = ElectionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let election = OpenElection {
            kind,
            candidates: candidates.to_vec(),
            votes: Vec::new(),
        };
        self.elections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, election);
        info!(
            "open: election {} ({}, {} candidates)",
            id,
            kind.name(),
            candidates.len()
        );
        Ok(id)
    }

    pub fn candidates(&self, id: ElectionId) -> Result<Vec<C>, ElectionError> {
        let elections = self.elections.read().unwrap_or_else(PoisonError::into_inner);
        match elections.get(&id) {
            Some(e) => Ok(e.candidates.clone()),
            None => Err(ElectionError::UnknownElection { id }),
        }
    }

    /// Appends a ballot. The ballot is not checked against the candidates
    /// until the election is closed.
    pub fn cast(&self, id: ElectionId, ranking: Vec<C>) -> Result<(), ElectionError> {
        let mut elections = self
            .elections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        match elections.get_mut(&id) {
            Some(e) => {
                debug!("cast: election {}: {:?}", id, ranking);
                e.votes.push(RankedBallot::new(ranking));
                Ok(())
            }
            None => Err(ElectionError::UnknownElection { id }),
        }
    }

    pub fn close(&self, id: ElectionId) -> Result<VotingResult<C>, ElectionError> {
        let election = self
            .elections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
        let election = match election {
            Some(e) => e,
            None => return Err(ElectionError::UnknownElection { id }),
        };
        info!(
            "close: election {} with {} ballots",
            id,
            election.votes.len()
        );
        run_election(election.kind, &election.candidates, &election.votes)
    }

    pub fn len(&self) -> usize {
        self.elections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn open_cast_close() {
        let registry: ElectionRegistry<&str> = ElectionRegistry::new();
        let id = registry
            .open(MethodKind::Schulze, &["pizza", "sushi", "tacos"])
            .unwrap();
        assert_eq!(registry.candidates(id).unwrap(), vec!["pizza", "sushi", "tacos"]);
        registry.cast(id, vec!["sushi", "pizza"]).unwrap();
        registry.cast(id, vec!["sushi", "tacos", "pizza"]).unwrap();
        registry.cast(id, vec!["pizza", "sushi"]).unwrap();

        let res = registry.close(id).unwrap();
        assert_eq!(res.outcome, Outcome::Winner);
        assert_eq!(res.winners, vec!["sushi"]);
        assert!(registry.is_empty());
    }

    #[test]
    fn closed_election_is_gone() {
        let registry: ElectionRegistry<u32> = ElectionRegistry::new();
        let id = registry.open(MethodKind::Majority, &[1, 2]).unwrap();
        registry.cast(id, vec![2]).unwrap();
        assert!(registry.close(id).is_ok());
        assert_eq!(
            registry.close(id).err(),
            Some(ElectionError::UnknownElection { id })
        );
        assert_eq!(
            registry.cast(id, vec![1]).err(),
            Some(ElectionError::UnknownElection { id })
        );
        assert!(registry.candidates(id).is_err());
    }

    #[test]
    fn ids_are_distinct() {
        let registry: ElectionRegistry<u32> = ElectionRegistry::new();
        let a = registry.open(MethodKind::Majority, &[1]).unwrap();
        let b = registry.open(MethodKind::Majority, &[1]).unwrap();
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn duplicate_candidates_are_rejected() {
        let registry: ElectionRegistry<u32> = ElectionRegistry::new();
        assert_eq!(
            registry.open(MethodKind::Schulze, &[1, 2, 1]).err(),
            Some(ElectionError::Build {
                source: BuildError::DuplicateCandidate { position: 2 }
            })
        );
        assert!(registry.is_empty());
    }

    #[test]
    fn bad_vote_surfaces_on_close() {
        let registry: ElectionRegistry<u32> = ElectionRegistry::new();
        let id = registry.open(MethodKind::Schulze, &[1, 2]).unwrap();
        registry.cast(id, vec![1, 2]).unwrap();
        registry.cast(id, vec![3]).unwrap();
        assert_eq!(
            registry.close(id).err(),
            Some(ElectionError::Tabulation {
                source: MethodError::BadVote { ballot: 1 }
            })
        );
    }

    #[test]
    fn concurrent_casts_are_all_counted() {
        let registry: ElectionRegistry<u32> = ElectionRegistry::new();
        let id = registry.open(MethodKind::Majority, &[1, 2]).unwrap();
        thread::scope(|s| {
            for t in 0..4 {
                let registry = &registry;
                s.spawn(move || {
                    for _ in 0..25 {
                        let choice = if t == 0 { 1 } else { 2 };
                        registry.cast(id, vec![choice]).unwrap();
                    }
                });
            }
        });
        let res = registry.close(id).unwrap();
        assert_eq!(res.winners, vec![2]);
        assert_eq!(
            res.stats,
            TallyStats::Majority {
                tally: vec![(1, 25), (2, 75)]
            }
        );
    }
}
