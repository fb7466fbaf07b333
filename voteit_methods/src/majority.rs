use log::{debug, info, warn};

use crate::candidates::{CandidateId, CandidateIndex};
use crate::config::{MethodError, PluralityBallot};
use crate::method::{settle, Method, State};

/// Simple plurality: the candidate(s) with the highest number of votes win.
#[derive(Debug, Clone)]
pub struct MajorityMethod<C> {
    candidates: Vec<C>,
    votes: Vec<PluralityBallot<C>>,

    state: State,
    // Indexed by position in `candidates`.
    tally: Option<Vec<u64>>,
    winners: Vec<usize>,
}

impl<C: CandidateId> MajorityMethod<C> {
    pub fn new(candidates: Vec<C>, votes: Vec<PluralityBallot<C>>) -> MajorityMethod<C> {
        MajorityMethod {
            candidates,
            votes,
            state: State::Uncalculated,
            tally: None,
            winners: Vec::new(),
        }
    }

    /// Appends a ballot. Ballots are frozen once the method is calculated.
    pub fn add_vote(&mut self, vote: PluralityBallot<C>) -> Result<(), MethodError> {
        if self.state != State::Uncalculated {
            return Err(MethodError::AlreadyCalculated {});
        }
        self.votes.push(vote);
        Ok(())
    }

    pub fn votes(&self) -> &[PluralityBallot<C>] {
        &self.votes
    }

    /// The number of votes of each candidate, in candidate order.
    ///
    /// Only available after a completed computation.
    pub fn tally(&self) -> Option<Vec<(C, u64)>> {
        self.tally.as_ref().map(|counts| {
            self.candidates
                .iter()
                .cloned()
                .zip(counts.iter().copied())
                .collect()
        })
    }
}

impl<C: CandidateId> Method<C> for MajorityMethod<C> {
    fn calculate(&mut self) -> Result<(), MethodError> {
        if self.state != State::Uncalculated {
            return Err(MethodError::AlreadyCalculated {});
        }
        self.state = State::Failed;

        let index = CandidateIndex::new(&self.candidates);
        let mut counts: Vec<u64> = vec![0; index.len()];
        for (ballot, vote) in self.votes.iter().enumerate() {
            match index.index_of(&vote.choice) {
                Some(idx) => counts[idx] = counts[idx].saturating_add(vote.count),
                None => {
                    warn!(
                        "majority: ballot {} votes for unknown candidate {:?}",
                        ballot, vote.choice
                    );
                    return Err(MethodError::BadVote { ballot });
                }
            }
        }
        debug!("majority: counts: {:?}", counts);

        let winners = leaders(&counts);
        info!(
            "majority: {} votes over {} candidates, {} leader(s)",
            self.votes.len(),
            index.len(),
            winners.len()
        );

        self.tally = Some(counts);
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

// The set of returned positions does not depend on the scan order: a count
// above the running maximum resets the leaders, an equal count joins them.
fn leaders(counts: &[u64]) -> Vec<usize> {
    let mut highest: u64 = 0;
    let mut leaders: Vec<usize> = Vec::new();
    for (idx, &count) in counts.iter().enumerate() {
        if count > highest {
            leaders.clear();
            leaders.push(idx);
            highest = count;
        } else if count == highest {
            leaders.push(idx);
        }
    }
    leaders
}
