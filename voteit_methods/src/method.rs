use crate::config::MethodError;

/// A way of calculating the winner(s) of a set of ballots.
///
/// An instance is calculated exactly once. Before a computation completes
/// (or after it fails with `BadVote`) the winner set is empty.
pub trait Method<C> {
    /// Runs the tally.
    ///
    /// `Ok(())` means a unique winner. `Tied` and `NoWinner` still publish the
    /// winner set; `BadVote` and `AlreadyCalculated` publish nothing.
    fn calculate(&mut self) -> Result<(), MethodError>;

    /// The candidates, as supplied at construction.
    fn options(&self) -> &[C];

    /// The winners, in candidate order.
    fn winner(&self) -> Vec<C>;
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub(crate) enum State {
    Uncalculated,
    Calculated,
    // Dead end: the internal tallies are partially filled.
    Failed,
}

pub(crate) fn settle(num_winners: usize) -> Result<(), MethodError> {
    match num_winners {
        0 => Err(MethodError::NoWinner {}),
        1 => Ok(()),
        _ => Err(MethodError::Tied {}),
    }
}
