#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::cast_precision_loss)]
//! Argument parsing and command dispatch.
//!
//! The interface mirrors the usual solver-CLI shape: a global path
//! argument solves a whole corpus file (or directory) with defaults, and
//! subcommands cover the single-puzzle, batch-statistics and
//! shell-completion cases. All solving goes through the engine in
//! [`crate::puzzle`]; this module only reads files, formats reports and
//! prints the statistics tables.

use std::io;
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use tikv_jemalloc_ctl::{epoch, stats};

use crate::archive::{ArchiveStats, collect_puzzle_files, read_puzzle_file};
use crate::puzzle::{Board, Rule, SolveReport, Strategy, solve_recursive, solve_with_limit};

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "sudoku_solver", version, about = "A configurable Sudoku solver")]
pub struct Cli {
    /// An optional path argument. If provided without a subcommand, it's
    /// treated as a puzzle corpus file (or directory of corpus files) to
    /// solve with default options.
    pub path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `solve`, `text`, `archive`).
    #[clap(subcommand)]
    pub command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    pub common: CommonOptions,
}

/// Enumerates the available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Solve every puzzle in a corpus file, reporting each result.
    Solve {
        /// Path to the puzzle file. One 81-character puzzle per line;
        /// lines starting with '#' are comments.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a single puzzle provided as plain text.
    Text {
        /// The puzzle as an 81-character string: digits '1'-'9' for
        /// givens, '0' or '.' (or any non-digit) for blanks.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a whole corpus and print aggregate statistics.
    Archive {
        /// Path to a corpus file or a directory of corpus files.
        #[arg(long)]
        path: PathBuf,

        /// Solve at most this many puzzles from the corpus.
        #[arg(short, long)]
        limit: Option<usize>,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
pub struct CommonOptions {
    /// Enable debug output, providing more verbose logging during the
    /// solving process.
    #[arg(short, long, default_value_t = false)]
    pub debug: bool,

    /// Enable printing of performance statistics after each solve.
    #[arg(short, long, default_value_t = true)]
    pub stats: bool,

    /// Print the final board as a plain 9x9 grid.
    #[arg(short, long, default_value_t = false)]
    pub print_board: bool,

    /// Print the final board with per-cell candidate annotations.
    #[arg(short, long, default_value_t = false)]
    pub candidates: bool,

    /// Which solving strategy to use.
    #[arg(long, value_enum, default_value_t = Strategy::Rules)]
    pub strategy: Strategy,

    /// Safety cap on propagate/guess cycles before giving up.
    #[arg(long, default_value_t = crate::puzzle::search::DEFAULT_ITERATION_LIMIT)]
    pub max_iterations: u32,
}

/// Parses the command line and runs the selected command.
///
/// # Errors
///
/// Returns a human-readable message when a path does not exist, a file
/// cannot be read, or a puzzle line is malformed.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    // A bare path with no subcommand solves the corpus with defaults.
    if let Some(path) = cli.path.clone() {
        if cli.command.is_none() {
            return solve_corpus(&path, &cli.common);
        }
    }

    match cli.command {
        Some(Commands::Solve { path, common }) => solve_corpus(&path, &common),
        Some(Commands::Text { input, common }) => {
            let mut board = Board::parse(&input).map_err(|e| e.to_string())?;
            let report = dispatch(&mut board, &common);
            print_report(&board, &report, &common);
            Ok(())
        }
        Some(Commands::Archive {
            path,
            limit,
            common,
        }) => run_archive(&path, limit, &common),
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "sudoku_solver",
                &mut io::stdout(),
            );
            Ok(())
        }
        None => Err("No command provided. Use --help for more information.".to_string()),
    }
}

/// Runs the configured strategy on one board.
fn dispatch(board: &mut Board, common: &CommonOptions) -> SolveReport {
    match common.strategy {
        Strategy::Rules => solve_with_limit(board, common.max_iterations),
        Strategy::Recursive => solve_recursive(board),
    }
}

/// Solves every puzzle in a corpus file (or directory), reporting each.
fn solve_corpus(path: &PathBuf, common: &CommonOptions) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Path does not exist: {}", path.display()));
    }

    for file in collect_puzzle_files(path) {
        println!("Solving: {}", file.display());
        let puzzles = read_puzzle_file(&file).map_err(|e| e.to_string())?;

        for line in puzzles {
            let mut board = Board::parse(&line).map_err(|e| e.to_string())?;
            let report = dispatch(&mut board, common);
            print_report(&board, &report, common);
        }
    }

    Ok(())
}

/// Solves a corpus and prints the aggregate statistics tables.
fn run_archive(path: &PathBuf, limit: Option<usize>, common: &CommonOptions) -> Result<(), String> {
    if !path.exists() {
        return Err(format!("Path does not exist: {}", path.display()));
    }

    let mut puzzles = Vec::new();
    for file in collect_puzzle_files(path) {
        puzzles.extend(read_puzzle_file(&file).map_err(|e| e.to_string())?);
    }
    if let Some(limit) = limit {
        puzzles.truncate(limit);
    }
    println!("Read {} puzzles", puzzles.len());

    let mut archive = ArchiveStats::new();
    for line in puzzles {
        let mut board = Board::parse(&line).map_err(|e| e.to_string())?;
        let report = dispatch(&mut board, common);

        if common.debug {
            print_report(&board, &report, common);
        }
        archive.record(report);
    }

    print_archive_stats(&archive);
    Ok(())
}

/// Prints one solve result, plus whatever the options ask for.
fn print_report(board: &Board, report: &SolveReport, common: &CommonOptions) {
    if report.solved {
        println!(
            "Solved {} in {:.3} ms with {} guesses",
            report.input,
            report.elapsed_ms(),
            report.guesses
        );
    } else {
        let reason = report
            .error
            .map_or_else(|| "unknown".to_string(), |e| e.to_string());
        println!("FAILED to solve {}: {reason}", report.input);
        if let Some(dump) = &report.dump {
            println!("{dump}");
        }
    }

    if common.print_board {
        println!("{board}");
    }
    if common.candidates {
        println!("{}", board.render_candidates());
    }
    if common.stats {
        print_solve_stats(report);
    }
}

/// Helper function to print a single statistic line in a formatted table
/// row.
fn stat_line(label: &str, value: impl std::fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate
/// (value/second).
fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints the per-solve statistics table, including allocator usage.
fn print_solve_stats(report: &SolveReport) {
    let elapsed_secs = report.elapsed.as_secs_f64();

    // Advance the jemalloc epoch so the counters reflect the solve that
    // just finished.
    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    println!("\n========================[ Search Statistics ]========================");
    stat_line("Strategy", report.strategy);
    stat_line_with_rate("Iterations", report.iterations as usize, elapsed_secs);
    stat_line_with_rate("Guesses", report.guesses as usize, elapsed_secs);
    for rule in Rule::ALL {
        stat_line(
            &format!("Rule '{rule}'"),
            format!(
                "{}/{}",
                report.rule_stats.applies(rule),
                report.rule_stats.calls(rule)
            ),
        );
    }
    stat_line("Memory usage (MiB)", format!("{allocated_mib:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident_mib:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

/// Prints the aggregate tables of a batch run.
fn print_archive_stats(archive: &ArchiveStats) {
    println!(
        "\nSolved {}/{} puzzles, average time = {:.3} ms, avg guesses = {:.2}",
        archive.solved(),
        archive.runs(),
        archive.average_time_ms(),
        archive.average_guesses()
    );
    println!(
        "  No-guess solves: {} max guesses: {}",
        archive.no_guess_solves(),
        archive.max_guesses()
    );
    println!(
        "  Min time {:.3} ms, max time {:.3} ms",
        archive.min_time_ms().unwrap_or(0.0),
        archive.max_time_ms().unwrap_or(0.0)
    );

    println!("10 hardest puzzles by guess count");
    for report in archive.hardest_by_guesses(10) {
        println!("{}: {} guesses", report.input, report.guesses);
    }

    println!("10 hardest puzzles by solve time");
    for report in archive.hardest_by_time(10) {
        println!("{}: {:.3} ms", report.input, report.elapsed_ms());
    }

    let failures: Vec<_> = archive.failures().collect();
    if !failures.is_empty() {
        println!("FAILED to solve {} puzzles:", failures.len());
        for report in failures {
            println!("{}", report.input);
        }
    }
}
