mod candidates;
mod config;
mod majority;
mod method;
mod schulze;

pub mod builder;
pub mod manual;
pub mod registry;

use log::{debug, info};

pub use crate::builder::Tabulator;
pub use crate::candidates::{CandidateId, CandidateIndex};
pub use crate::config::*;
pub use crate::majority::MajorityMethod;
pub use crate::method::Method;
pub use crate::registry::{ElectionId, ElectionRegistry};
pub use crate::schulze::{PairwiseMatrix, SchulzeMethod};

/// Tabulates an election in one go.
///
/// Arguments:
/// * `kind` the method to apply
/// * `candidates` the candidates, in presentation order. They must be distinct.
/// * `votes` the ranked votes. Under `Majority` only the first choice counts.
///
/// A tie or the absence of a winner is reported in `VotingResult::outcome`.
/// A vote for an unknown candidate fails the whole tabulation.
pub fn run_election<C: CandidateId>(
    kind: MethodKind,
    candidates: &[C],
    votes: &[RankedBallot<C>],
) -> Result<VotingResult<C>, ElectionError> {
    info!(
        "Processing {:?} votes with the {} method, candidates: {:?}",
        votes.len(),
        kind.name(),
        candidates
    );

    let mut builder = builder::Builder::new(kind)
        .candidates(candidates)
        .map_err(|source| ElectionError::Build { source })?;
    for v in votes.iter() {
        builder.add_ballot(v.clone());
    }
    let mut tabulator = builder
        .build()
        .map_err(|source| ElectionError::Tabulation { source })?;

    let outcome = match tabulator.calculate() {
        Ok(()) => Outcome::Winner,
        Err(MethodError::Tied {}) => Outcome::Tied,
        Err(MethodError::NoWinner {}) => Outcome::NoWinner,
        Err(source) => return Err(ElectionError::Tabulation { source }),
    };
    let winners = tabulator.winner();
    info!("Outcome: {} {:?}", outcome.name(), winners);

    let stats = tabulator.stats();
    debug!("run_election: stats: {:?}", stats);
    Ok(VotingResult {
        outcome,
        winners,
        stats,
    })
}
