#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Puzzle-corpus reading and batch-run statistics.
//!
//! Corpus files hold one puzzle per line: exactly 81 characters, digits
//! '1'-'9' for givens and anything else for blanks. Lines starting with
//! `#` are comments; lines of any other length are skipped silently, so a
//! file can carry headers and annotations without upsetting the reader.
//!
//! [`ArchiveStats`] accumulates the reports of a batch run and answers the
//! aggregate questions the CLI prints: success rate, timing spread, guess
//! distribution, and the hardest puzzles by guess count and by time.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use ordered_float::OrderedFloat;
use rustc_hash::FxHashMap;
use walkdir::WalkDir;

use crate::puzzle::SolveReport;

/// Reads puzzle lines from any buffered source.
///
/// Lines starting with `#` and lines not exactly 81 characters long are
/// skipped.
///
/// # Errors
///
/// Returns the underlying I/O error if a line cannot be read.
pub fn read_puzzles<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut puzzles = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.starts_with('#') || line.chars().count() != 81 {
            continue;
        }
        puzzles.push(line);
    }

    Ok(puzzles)
}

/// Reads every puzzle line from the file at `path`.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened or read.
pub fn read_puzzle_file(path: &Path) -> io::Result<Vec<String>> {
    let file = File::open(path)?;
    read_puzzles(BufReader::new(file))
}

/// Expands `path` into the list of corpus files to solve: the path itself
/// if it is a file, or every file below it if it is a directory.
#[must_use]
pub fn collect_puzzle_files(path: &Path) -> Vec<PathBuf> {
    if path.is_file() {
        return vec![path.to_path_buf()];
    }

    WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_file())
        .map(|entry| entry.path().to_path_buf())
        .collect()
}

/// Aggregated results of one batch run.
#[derive(Debug, Default)]
pub struct ArchiveStats {
    reports: Vec<SolveReport>,
}

impl ArchiveStats {
    /// An empty accumulator.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            reports: Vec::new(),
        }
    }

    /// Adds one solve report to the batch.
    pub fn record(&mut self, report: SolveReport) {
        self.reports.push(report);
    }

    /// Total puzzles run.
    #[must_use]
    pub fn runs(&self) -> usize {
        self.reports.len()
    }

    /// Puzzles that solved.
    #[must_use]
    pub fn solved(&self) -> usize {
        self.reports.iter().filter(|r| r.solved).count()
    }

    /// Reports of the puzzles that failed, in run order.
    pub fn failures(&self) -> impl Iterator<Item = &SolveReport> {
        self.reports.iter().filter(|r| !r.solved)
    }

    /// Mean solve time over solved puzzles, in milliseconds.
    #[must_use]
    pub fn average_time_ms(&self) -> f64 {
        let solved = self.solved();
        if solved == 0 {
            return 0.0;
        }
        self.solved_reports().map(SolveReport::elapsed_ms).sum::<f64>() / solved as f64
    }

    /// Fastest solve, in milliseconds.
    #[must_use]
    pub fn min_time_ms(&self) -> Option<f64> {
        self.solved_reports()
            .map(|r| OrderedFloat(r.elapsed_ms()))
            .min()
            .map(|t| t.0)
    }

    /// Slowest solve, in milliseconds.
    #[must_use]
    pub fn max_time_ms(&self) -> Option<f64> {
        self.solved_reports()
            .map(|r| OrderedFloat(r.elapsed_ms()))
            .max()
            .map(|t| t.0)
    }

    /// Mean guess count over solved puzzles.
    #[must_use]
    pub fn average_guesses(&self) -> f64 {
        let solved = self.solved();
        if solved == 0 {
            return 0.0;
        }
        self.solved_reports().map(|r| f64::from(r.guesses)).sum::<f64>() / solved as f64
    }

    /// Puzzles that solved by pure propagation, without a single guess.
    #[must_use]
    pub fn no_guess_solves(&self) -> usize {
        self.solved_reports().filter(|r| r.guesses == 0).count()
    }

    /// The largest guess count any solved puzzle needed.
    #[must_use]
    pub fn max_guesses(&self) -> u32 {
        self.solved_reports().map(|r| r.guesses).max().unwrap_or(0)
    }

    /// How many solved puzzles needed each guess count.
    #[must_use]
    pub fn guess_histogram(&self) -> FxHashMap<u32, usize> {
        let mut histogram = FxHashMap::default();
        for report in self.solved_reports() {
            *histogram.entry(report.guesses).or_insert(0) += 1;
        }
        histogram
    }

    /// The `n` solved puzzles that needed the most guesses, hardest first.
    #[must_use]
    pub fn hardest_by_guesses(&self, n: usize) -> Vec<&SolveReport> {
        self.solved_reports()
            .sorted_by_key(|r| std::cmp::Reverse(r.guesses))
            .take(n)
            .collect()
    }

    /// The `n` solved puzzles that took the longest, slowest first.
    #[must_use]
    pub fn hardest_by_time(&self, n: usize) -> Vec<&SolveReport> {
        self.solved_reports()
            .sorted_by_key(|r| std::cmp::Reverse(OrderedFloat(r.elapsed_ms())))
            .take(n)
            .collect()
    }

    fn solved_reports(&self) -> impl Iterator<Item = &SolveReport> {
        self.reports.iter().filter(|r| r.solved)
    }
}
