#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Error kinds produced by the solving engine.

use derive_more::{Display, Error};

/// Everything that can go wrong while constructing or solving a puzzle.
///
/// `InvalidState` is recovered internally by backtracking and never escapes
/// a solve under normal operation; the other variants are terminal for the
/// session that raised them. File-level I/O failures are reported through
/// `std::io::Result` by the archive collaborators and never reach this
/// enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum SolverError {
    /// The puzzle string was not exactly 81 characters long. Raised at
    /// construction; the board is unusable.
    #[display("invalid puzzle input: expected 81 characters, got {len}")]
    InvalidInput {
        /// Length of the offending input string.
        len: usize,
    },

    /// A group reached "all cells solved" with a duplicate digit. Only
    /// reachable through a wrong guess; the controller reverts and
    /// continues.
    #[display("board reached an invalid state: a completed group holds duplicate digits")]
    InvalidState,

    /// A revert was attempted with an empty guess stack: the puzzle has no
    /// solution under the implemented rule set.
    #[display("no guess left to revert: puzzle is unsolvable under the rule set")]
    NoGuessToRevert,

    /// The propagate/guess loop exceeded its safety cap without finishing.
    #[display("gave up after {limit} iterations without completing the board")]
    IterationLimitExceeded {
        /// The iteration cap that was hit.
        limit: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(
            SolverError::InvalidInput { len: 80 }.to_string(),
            "invalid puzzle input: expected 81 characters, got 80"
        );
        assert!(
            SolverError::IterationLimitExceeded { limit: 1_000_000 }
                .to_string()
                .contains("1000000")
        );
    }
}
