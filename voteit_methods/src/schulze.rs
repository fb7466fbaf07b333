use log::{debug, info, warn};

use crate::candidates::{CandidateId, CandidateIndex};
use crate::config::{MethodError, RankedBallot};
use crate::method::{settle, Method, State};

/// A square matrix of counts, indexed by dense candidate position.
///
/// Allocated once with the size of the candidate list and never resized.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairwiseMatrix {
    size: usize,
    cells: Vec<u64>,
}

impl PairwiseMatrix {
    pub fn new(size: usize) -> PairwiseMatrix {
        PairwiseMatrix {
            size,
            cells: vec![0; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> u64 {
        self.cells[row * self.size + col]
    }

    fn set(&mut self, row: usize, col: usize, value: u64) {
        self.cells[row * self.size + col] = value;
    }

    fn add(&mut self, row: usize, col: usize, count: u64) {
        let cell = &mut self.cells[row * self.size + col];
        *cell = cell.saturating_add(count);
    }

    pub fn rows(&self) -> Vec<Vec<u64>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.size).map(|r| r.to_vec()).collect()
    }
}

/// The Schulze method over ranked ballots.
///
/// ```
/// use voteit_methods::{Method, RankedBallot, SchulzeMethod};
///
/// let mut method = SchulzeMethod::new(
///     vec!["Anna", "Bob", "Clara"],
///     vec![
///         RankedBallot::new(vec!["Bob", "Anna"]),
///         RankedBallot::new(vec!["Bob", "Clara", "Anna"]),
///         RankedBallot::new(vec!["Anna", "Bob"]),
///     ],
/// );
/// method.calculate()?;
/// assert_eq!(method.winner(), vec!["Bob"]);
/// # Ok::<(), voteit_methods::MethodError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SchulzeMethod<C> {
    candidates: Vec<C>,
    votes: Vec<RankedBallot<C>>,

    state: State,
    // provided[i][j]: number of ballots ranking i strictly above j.
    provided: Option<PairwiseMatrix>,
    // calculated[i][j]: strength of the strongest path from i to j.
    calculated: Option<PairwiseMatrix>,
    winners: Vec<usize>,
}

impl<C: CandidateId> SchulzeMethod<C> {
    pub fn new(candidates: Vec<C>, votes: Vec<RankedBallot<C>>) -> SchulzeMethod<C> {
        SchulzeMethod {
            candidates,
            votes,
            state: State::Uncalculated,
            provided: None,
            calculated: None,
            winners: Vec::new(),
        }
    }

    /// Appends a ballot. Ballots are frozen once the method is calculated.
    pub fn add_vote(&mut self, vote: RankedBallot<C>) -> Result<(), MethodError> {
        if self.state != State::Uncalculated {
            return Err(MethodError::AlreadyCalculated {});
        }
        self.votes.push(vote);
        Ok(())
    }

    pub fn votes(&self) -> &[RankedBallot<C>] {
        &self.votes
    }

    /// Pairwise preferences, once a computation has completed.
    pub fn preferences(&self) -> Option<&PairwiseMatrix> {
        self.provided.as_ref()
    }

    /// Strongest path strengths, once a computation has completed.
    pub fn strongest_paths(&self) -> Option<&PairwiseMatrix> {
        self.calculated.as_ref()
    }
}

impl<C: CandidateId> Method<C> for SchulzeMethod<C> {
    fn calculate(&mut self) -> Result<(), MethodError> {
        if self.state != State::Uncalculated {
            return Err(MethodError::AlreadyCalculated {});
        }
        self.state = State::Failed;

        let index = CandidateIndex::new(&self.candidates);
        let provided = count_preferences(&index, &self.votes)?;
        debug!("schulze: preferences: {:?}", provided.rows());

        let calculated = strongest_paths(&provided);
        debug!("schulze: strongest paths: {:?}", calculated.rows());

        let winners = undefeated(&calculated);
        info!(
            "schulze: {} ballots over {} candidates, {} undefeated",
            self.votes.len(),
            index.len(),
            winners.len()
        );

        self.provided = Some(provided);
        self.calculated = Some(calculated);
        self.winners = winners;
        self.state = State::Calculated;
        settle(self.winners.len())
    }

    fn options(&self) -> &[C] {
        &self.candidates
    }

    fn winner(&self) -> Vec<C> {
        self.winners
            .iter()
            .map(|&idx| self.candidates[idx].clone())
            .collect()
    }
}

fn count_preferences<C: CandidateId>(
    index: &CandidateIndex<C>,
    votes: &[RankedBallot<C>],
) -> Result<PairwiseMatrix, MethodError> {
    let mut provided = PairwiseMatrix::new(index.len());
    let mut positions: Vec<usize> = Vec::new();
    for (ballot, vote) in votes.iter().enumerate() {
        // The whole ballot is checked before any of it is counted.
        positions.clear();
        for cand in vote.ranking.iter() {
            match index.index_of(cand) {
                Some(idx) => positions.push(idx),
                None => {
                    warn!(
                        "schulze: ballot {} ranks unknown candidate {:?}",
                        ballot, cand
                    );
                    return Err(MethodError::BadVote { ballot });
                }
            }
        }
        // Every ordered pair of positions, not only adjacent ones.
        for (rank, &winner) in positions.iter().enumerate() {
            for &loser in positions[rank + 1..].iter() {
                if winner != loser {
                    provided.add(winner, loser, vote.count);
                }
            }
        }
    }
    Ok(provided)
}

fn strongest_paths(provided: &PairwiseMatrix) -> PairwiseMatrix {
    let size = provided.size();
    let mut d = PairwiseMatrix::new(size);

    // Only strict pairwise majorities become edges.
    for i in 0..size {
        for j in 0..size {
            if i != j && provided.get(i, j) > provided.get(j, i) {
                d.set(i, j, provided.get(i, j));
            }
        }
    }

    // The intermediate candidate must be the outer loop.
    for i in 0..size {
        for j in 0..size {
            if j == i {
                continue;
            }
            for k in 0..size {
                if k == i || k == j {
                    continue;
                }
                let through = d.get(j, i).min(d.get(i, k));
                if through > d.get(j, k) {
                    d.set(j, k, through);
                }
            }
        }
    }
    d
}

// A candidate is beaten if some other candidate has a stronger path to it
// than it has in return.
fn undefeated(d: &PairwiseMatrix) -> Vec<usize> {
    let size = d.size();
    (0..size)
        .filter(|&i| (0..size).all(|j| j == i || d.get(j, i) <= d.get(i, j)))
        .collect()
}
