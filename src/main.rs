//! # `sudoku_solver`
//!
//! `sudoku_solver` is a command-line Sudoku solver. Puzzles are 81-character
//! lines (digits '1'-'9' for givens, '0' or any non-digit for blanks) read
//! from plain text, single files, or whole directories of corpus files.
//!
//! Two solving strategies are available:
//! 1.  **Rules**: five candidate-elimination rules applied in priority
//!     order, with minimum-candidate guessing and snapshot backtracking
//!     when propagation stalls. The fast default.
//! 2.  **Recursive**: plain depth-first backtracking with singleton
//!     propagation only. Roughly two orders of magnitude slower; kept for
//!     cross-validating the rule engine.
//!
//! ## Usage
//!
//! ```sh
//! # Solve every puzzle in a corpus file with default options
//! sudoku_solver puzzles.txt
//!
//! # Solve a single puzzle given inline, printing the finished grid
//! sudoku_solver text --input "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79" --print-board
//!
//! # Batch-run a corpus with aggregate statistics, recursive strategy
//! sudoku_solver archive --path data/top1465 --strategy recursive
//!
//! # Generate shell completions
//! sudoku_solver completions bash
//! ```
//!
//! Per-solve statistics tables (iterations, guesses, per-rule hit ratios,
//! allocator usage) are printed unless `--stats` is disabled. Set
//! `RUST_LOG=debug` for a trace of rule applications and backtracks.

use sudoku_solver::command_line::cli;

/// Global allocator using `tikv-jemallocator` for potentially better
/// performance and memory usage tracking.
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Main entry point: initializes logging, parses the command line and
/// dispatches to the selected command.
fn main() {
    env_logger::init();

    if let Err(e) = cli::run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
