#![deny(missing_docs)]
//! This crate solves 9x9 Sudoku puzzles by constraint propagation (five
//! candidate-elimination rules over bitmask candidate sets) augmented with
//! backtracking search.

/// The `archive` module reads puzzle corpora from files and aggregates
/// batch-run statistics.
pub mod archive;

/// The `command_line` module implements the CLI front end around the
/// solving engine.
pub mod command_line;

/// The `puzzle` module implements the solving engine: candidate bitmasks,
/// group topology, board state, elimination rules and the search
/// controller.
pub mod puzzle;
