// ********* Input data structures ***********

use snafu::Snafu;

use crate::registry::ElectionId;

/// A vote for exactly one candidate.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct PluralityBallot<C> {
    pub choice: C,
    /// The number of identical ballots this one stands for.
    pub count: u64,
}

impl<C> PluralityBallot<C> {
    pub fn new(choice: C) -> PluralityBallot<C> {
        PluralityBallot::with_count(choice, 1)
    }

    pub fn with_count(choice: C, count: u64) -> PluralityBallot<C> {
        PluralityBallot { choice, count }
    }
}

/// A ranking of candidates, most preferred first.
///
/// The ranking may be partial: candidates that do not appear in it receive no
/// pairwise comparison from this ballot.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct RankedBallot<C> {
    pub ranking: Vec<C>,
    /// The number of identical ballots this one stands for.
    pub count: u64,
}

impl<C> RankedBallot<C> {
    pub fn new(ranking: Vec<C>) -> RankedBallot<C> {
        RankedBallot::with_count(ranking, 1)
    }

    pub fn with_count(ranking: Vec<C>, count: u64) -> RankedBallot<C> {
        RankedBallot { ranking, count }
    }
}

/// The social choice rule used to tabulate an election.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum MethodKind {
    /// Simple plurality: the candidate(s) with the most first choices.
    Majority,
    /// Schulze method over ranked ballots.
    Schulze,
}

impl MethodKind {
    pub fn name(&self) -> &'static str {
        match self {
            MethodKind::Majority => "majority",
            MethodKind::Schulze => "schulze",
        }
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum Outcome {
    /// Exactly one winner.
    Winner,
    /// More than one winner. A tie-break has to be applied by the caller.
    Tied,
    NoWinner,
}

impl Outcome {
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::Winner => "winner",
            Outcome::Tied => "tied",
            Outcome::NoWinner => "noWinner",
        }
    }
}

/// Intermediate counts of a completed computation, for reporting.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TallyStats<C> {
    /// Number of plurality ballots per candidate, in candidate order.
    Majority { tally: Vec<(C, u64)> },
    /// Rows and columns follow `candidates`.
    Schulze {
        candidates: Vec<C>,
        preferences: Vec<Vec<u64>>,
        strongest_paths: Vec<Vec<u64>>,
    },
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct VotingResult<C> {
    pub outcome: Outcome,
    /// Sorted by position in the candidate list.
    pub winners: Vec<C>,
    pub stats: TallyStats<C>,
}

// ********* Errors **********

/// Errors returned by `Method::calculate`.
///
/// `Tied` and `NoWinner` report a completed computation: the winner set is
/// published and can be read with `Method::winner`.
#[derive(Debug, Snafu, Eq, PartialEq, Clone)]
pub enum MethodError {
    #[snafu(display("the method has already been calculated"))]
    AlreadyCalculated {},

    #[snafu(display(
        "ballot {ballot} references a candidate outside the candidate set, processing stopped"
    ))]
    BadVote { ballot: usize },

    #[snafu(display("the method ended in a tie, apply a tie-break manually"))]
    Tied {},

    #[snafu(display("the method could not find a winner"))]
    NoWinner {},
}

#[derive(Debug, Snafu, Eq, PartialEq, Clone)]
pub enum BuildError {
    #[snafu(display("candidate at position {position} appears more than once"))]
    DuplicateCandidate { position: usize },
}

#[derive(Debug, Snafu, Eq, PartialEq, Clone)]
#[snafu(visibility(pub(crate)))]
pub enum ElectionError {
    #[snafu(display("invalid election setup"))]
    Build { source: BuildError },

    #[snafu(display("tabulation failed"))]
    Tabulation { source: MethodError },

    #[snafu(display("no open election with id {id}"))]
    UnknownElection { id: ElectionId },
}
