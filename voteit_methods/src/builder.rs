use log::{debug, warn};

use crate::candidates::{CandidateId, CandidateIndex};
use crate::config::*;
use crate::majority::MajorityMethod;
use crate::method::Method;
use crate::schulze::SchulzeMethod;

/// A builder for assembling a method from ranked votes.
///
/// The same votes can feed either method: under `Majority` each vote counts
/// for its first choice only. Every name of a vote must still be a candidate.
///
/// ```
/// use voteit_methods::builder::Builder;
/// use voteit_methods::{Method, MethodKind};
///
/// let mut builder = Builder::new(MethodKind::Schulze)
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_vote(&["Bob".to_string(), "Anna".to_string()]);
/// builder.add_vote_count(&["Anna".to_string(), "Bob".to_string()], 2);
///
/// let mut method = builder.build()?;
/// assert!(method.calculate().is_ok());
/// assert_eq!(method.winner(), vec!["Anna".to_string()]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Builder<C> {
    kind: MethodKind,
    candidates: Vec<C>,
    votes: Vec<RankedBallot<C>>,
}

impl<C: CandidateId> Builder<C> {
    pub fn new(kind: MethodKind) -> Builder<C> {
        Builder {
            kind,
            candidates: Vec::new(),
            votes: Vec::new(),
        }
    }

    /// Sets the candidates. Votes added so far are dropped.
    pub fn candidates(self, cands: &[C]) -> Result<Builder<C>, BuildError> {
        if let Some(position) = CandidateIndex::first_duplicate(cands) {
            return Err(BuildError::DuplicateCandidate { position });
        }
        Ok(Builder {
            kind: self.kind,
            candidates: cands.to_vec(),
            votes: Vec::new(),
        })
    }

    pub fn add_vote(&mut self, ranking: &[C]) {
        self.add_vote_count(ranking, 1)
    }

    /// Adds `count` identical votes, kept as a single weighted ballot.
    pub fn add_vote_count(&mut self, ranking: &[C], count: u64) {
        self.votes
            .push(RankedBallot::with_count(ranking.to_vec(), count));
    }

    pub fn add_ballot(&mut self, ballot: RankedBallot<C>) {
        self.votes.push(ballot);
    }

    /// Fails with `BadVote` under `Majority` if a vote ranks an unknown
    /// candidate anywhere, not only in first position. Under `Schulze` the
    /// same check happens when the method is calculated.
    pub fn build(self) -> Result<Tabulator<C>, MethodError> {
        debug!(
            "build: {} method, {} candidates, {} votes",
            self.kind.name(),
            self.candidates.len(),
            self.votes.len()
        );
        match self.kind {
            MethodKind::Majority => {
                let index = CandidateIndex::new(&self.candidates);
                for (ballot, v) in self.votes.iter().enumerate() {
                    if let Some(cand) = v.ranking.iter().find(|c| index.index_of(c).is_none()) {
                        warn!("build: ballot {} ranks unknown candidate {:?}", ballot, cand);
                        return Err(MethodError::BadVote { ballot });
                    }
                }
                // An empty ranking carries no plurality vote.
                let votes: Vec<PluralityBallot<C>> = self
                    .votes
                    .into_iter()
                    .filter_map(|v| {
                        let count = v.count;
                        v.ranking
                            .into_iter()
                            .next()
                            .map(|c| PluralityBallot::with_count(c, count))
                    })
                    .collect();
                Ok(Tabulator::Majority(MajorityMethod::new(
                    self.candidates,
                    votes,
                )))
            }
            MethodKind::Schulze => Ok(Tabulator::Schulze(SchulzeMethod::new(
                self.candidates,
                self.votes,
            ))),
        }
    }
}

/// Either method, behind the common contract.
#[derive(Debug, Clone)]
pub enum Tabulator<C> {
    Majority(MajorityMethod<C>),
    Schulze(SchulzeMethod<C>),
}

impl<C: CandidateId> Tabulator<C> {
    pub fn kind(&self) -> MethodKind {
        match self {
            Tabulator::Majority(_) => MethodKind::Majority,
            Tabulator::Schulze(_) => MethodKind::Schulze,
        }
    }

    /// Intermediate counts. Empty until a computation has completed.
    pub fn stats(&self) -> TallyStats<C> {
        match self {
            Tabulator::Majority(m) => TallyStats::Majority {
                tally: m.tally().unwrap_or_default(),
            },
            Tabulator::Schulze(s) => TallyStats::Schulze {
                candidates: s.options().to_vec(),
                preferences: s.preferences().map(|m| m.rows()).unwrap_or_default(),
                strongest_paths: s.strongest_paths().map(|m| m.rows()).unwrap_or_default(),
            },
        }
    }
}

impl<C: CandidateId> Method<C> for Tabulator<C> {
    fn calculate(&mut self) -> Result<(), MethodError> {
        match self {
            Tabulator::Majority(m) => m.calculate(),
            Tabulator::Schulze(s) => s.calculate(),
        }
    }

    fn options(&self) -> &[C] {
        match self {
            Tabulator::Majority(m) => m.options(),
            Tabulator::Schulze(s) => s.options(),
        }
    }

    fn winner(&self) -> Vec<C> {
        match self {
            Tabulator::Majority(m) => m.winner(),
            Tabulator::Schulze(s) => s.winner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(xs: &[&str]) -> Vec<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn duplicate_candidates_are_rejected() {
        let res = Builder::new(MethodKind::Majority).candidates(&names(&["a", "b", "a"]));
        assert_eq!(
            res.err(),
            Some(BuildError::DuplicateCandidate { position: 2 })
        );
    }

    #[test]
    fn majority_counts_first_choices() {
        let mut builder = Builder::new(MethodKind::Majority)
            .candidates(&names(&["a", "b", "c"]))
            .unwrap();
        builder.add_vote(&names(&["a", "b", "c"]));
        builder.add_vote_count(&names(&["b", "a"]), 2);
        builder.add_vote(&[]);
        let mut method = builder.build().unwrap();
        assert_eq!(method.kind(), MethodKind::Majority);
        assert_eq!(method.calculate(), Ok(()));
        assert_eq!(method.winner(), names(&["b"]));
        assert_eq!(
            method.stats(),
            TallyStats::Majority {
                tally: vec![
                    ("a".to_string(), 1),
                    ("b".to_string(), 2),
                    ("c".to_string(), 0)
                ]
            }
        );
    }

    #[test]
    fn majority_rejects_unknown_later_choices() {
        let mut builder = Builder::new(MethodKind::Majority)
            .candidates(&["x", "y"])
            .unwrap();
        builder.add_vote(&[]);
        builder.add_vote(&["x", "zzz"]);
        builder.add_vote(&["y"]);
        assert_eq!(builder.build().err(), Some(MethodError::BadVote { ballot: 1 }));
    }

    #[test]
    fn counted_votes_stay_one_ballot() {
        let mut builder = Builder::new(MethodKind::Majority)
            .candidates(&["x", "y"])
            .unwrap();
        builder.add_vote_count(&["y", "x"], 4_000_000_000);
        builder.add_vote(&["x"]);
        let mut method = builder.build().unwrap();
        assert_eq!(method.calculate(), Ok(()));
        assert_eq!(method.winner(), vec!["y"]);
        assert_eq!(
            method.stats(),
            TallyStats::Majority {
                tally: vec![("x", 1), ("y", 4_000_000_000)]
            }
        );
    }

    #[test]
    fn setting_candidates_drops_votes() {
        let mut builder: Builder<&str> = Builder::new(MethodKind::Schulze);
        builder.add_vote(&["x"]);
        let mut method = builder.candidates(&["x", "y"]).unwrap().build().unwrap();
        assert_eq!(method.calculate(), Err(MethodError::Tied {}));
        assert_eq!(method.winner(), vec!["x", "y"]);
    }

    #[test]
    fn schulze_stats_are_empty_before_calculation() {
        let method = Builder::new(MethodKind::Schulze)
            .candidates(&[1, 2])
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            method.stats(),
            TallyStats::Schulze {
                candidates: vec![1, 2],
                preferences: vec![],
                strongest_paths: vec![],
            }
        );
    }
}
