#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The constraint-propagation and search engine.
//!
//! Modules, leaves first: [`candidates`] holds the per-cell bitmask
//! primitives, [`topology`] the static group tables, [`board`] the mutable
//! 81-cell state with its guess stack and consistency checks, [`rules`]
//! the five elimination rules, and [`search`] the controller that drives a
//! board to a solution (or proves it dead) with either strategy.

pub mod board;
pub mod candidates;
pub mod error;
pub mod rules;
pub mod search;
pub mod topology;

pub use self::board::Board;
pub use self::error::SolverError;
pub use self::rules::{Rule, RuleStats};
pub use self::search::{SolveReport, Strategy, solve, solve_recursive, solve_with_limit};
