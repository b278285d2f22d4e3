#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The mutable 81-cell board and its backtracking snapshot stack.
//!
//! A [`Board`] owns one puzzle-solving session: the live array of candidate
//! entries, the original input line (echoed in reports), and the guess
//! stack. Each stack element is a deep copy of the whole cell array taken
//! immediately before a speculative assignment, so popping restores the
//! exact pre-guess state even though the live cells kept mutating
//! afterwards.
//!
//! The consistency checks live here too: [`Board::is_valid`] is the cheap
//! soft check run after every rule application, while
//! [`Board::group_complete`] is the hard check used when testing for a
//! finished board, which reports a completed-but-duplicated group as
//! [`SolverError::InvalidState`].

use std::fmt::{self, Display, Write as _};

use crate::puzzle::candidates::{DIGIT_MASK, Entry, digit_mask, is_single, lowest_digit};
use crate::puzzle::error::SolverError;
use crate::puzzle::topology::{CELL_COUNT, GROUPS};

/// A snapshot of the full cell array, as stored on the guess stack.
pub type Cells = [Entry; CELL_COUNT];

/// One puzzle-solving session: live cells plus the guess stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// The live candidate entries, indexed row-major.
    pub(crate) cells: Cells,
    /// Saved snapshots, one per currently-active guess.
    guesses: Vec<Cells>,
    /// The 81-character line the board was built from.
    input: String,
}

impl Board {
    /// Builds a board from an 81-character puzzle line.
    ///
    /// Characters '1'-'9' seed a solved cell; '0' or any other character
    /// seeds a blank cell with all nine candidates.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidInput`] if the line is not exactly 81
    /// characters long.
    pub fn parse(input: &str) -> Result<Self, SolverError> {
        let mut cells = [DIGIT_MASK; CELL_COUNT];
        let mut len = 0;

        for c in input.chars() {
            if len < CELL_COUNT {
                cells[len] = match c.to_digit(10) {
                    Some(d @ 1..=9) => digit_mask(d as u8),
                    _ => DIGIT_MASK,
                };
            }
            len += 1;
        }

        if len != CELL_COUNT {
            return Err(SolverError::InvalidInput { len });
        }

        Ok(Self {
            cells,
            guesses: Vec::new(),
            input: input.to_string(),
        })
    }

    /// Read-only view of the live cell array.
    #[must_use]
    pub const fn cells(&self) -> &Cells {
        &self.cells
    }

    /// The puzzle line this board was parsed from.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Returns the solved digit of `cell`, or `None` while it still holds
    /// more than one candidate.
    #[must_use]
    pub const fn solved_digit(&self, cell: usize) -> Option<u8> {
        let e = self.cells[cell];
        if is_single(e) {
            Some(lowest_digit(e))
        } else {
            None
        }
    }

    /// Returns an independent copy of the live cells.
    #[must_use]
    pub const fn snapshot(&self) -> Cells {
        self.cells
    }

    /// Pushes a saved cell array onto the guess stack.
    pub fn push_guess(&mut self, saved: Cells) {
        self.guesses.push(saved);
    }

    /// Pops the most recent guess, replacing the live cells with the saved
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::NoGuessToRevert`] when the stack is empty,
    /// which proves the puzzle unsolvable under the implemented rules.
    pub fn pop_guess(&mut self) -> Result<(), SolverError> {
        match self.guesses.pop() {
            Some(saved) => {
                self.cells = saved;
                Ok(())
            }
            None => Err(SolverError::NoGuessToRevert),
        }
    }

    /// Number of currently-active guesses.
    #[must_use]
    pub fn guess_depth(&self) -> usize {
        self.guesses.len()
    }

    /// The cheap validity check run after each rule application.
    ///
    /// Returns `false` if any cell has zero candidates left, or if any
    /// group holds two solved cells with the same digit.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        if self.cells.iter().any(|&e| e & DIGIT_MASK == 0) {
            return false;
        }

        for group in GROUPS.iter() {
            let mut seen: Entry = 0;
            for &cell in group {
                let e = self.cells[cell];
                if is_single(e) {
                    let value = e & DIGIT_MASK;
                    if seen & value != 0 {
                        return false;
                    }
                    seen |= value;
                }
            }
        }

        true
    }

    /// The hard completion check for one group.
    ///
    /// Returns `Ok(false)` while any cell of the group is unsolved. Once
    /// all nine are solved, XORs their values together: every digit
    /// appearing exactly once yields the full nine-bit mask, while any
    /// repeat cancels itself out and fails to reach it.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidState`] if the group is complete but
    /// holds a duplicate, a contradiction only reachable through a wrong
    /// guess. Callers treat it exactly like an [`Board::is_valid`]
    /// failure and revert.
    pub fn group_complete(&self, group: &[usize; 9]) -> Result<bool, SolverError> {
        let mut mask: Entry = 0;

        for &cell in group {
            let e = self.cells[cell];
            if !is_single(e) {
                return Ok(false);
            }
            mask ^= e & DIGIT_MASK;
        }

        if mask == DIGIT_MASK {
            Ok(true)
        } else {
            Err(SolverError::InvalidState)
        }
    }

    /// Whether all 27 groups are complete.
    ///
    /// # Errors
    ///
    /// Propagates [`SolverError::InvalidState`] from the first group that
    /// completed with a duplicate.
    pub fn is_complete(&self) -> Result<bool, SolverError> {
        for group in GROUPS.iter() {
            if !self.group_complete(group)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// The canonical 81-character form of the current state: the solved
    /// digit per cell, or '.' where candidates remain.
    #[must_use]
    pub fn to_line(&self) -> String {
        self.cells
            .iter()
            .map(|&e| {
                if is_single(e) {
                    char::from(b'0' + lowest_digit(e))
                } else {
                    '.'
                }
            })
            .collect()
    }

    /// Renders the candidate-annotated grid: each cell is a 3x3 block of
    /// pencil marks (dimmed), or its solved value centered and highlighted.
    #[must_use]
    pub fn render_candidates(&self) -> String {
        const HEAVY: &str =
            "++=======+=======+=======++=======+=======+=======++=======+=======+=======++\n";
        const LIGHT: &str = "++\x1b[90m-------+-------+-------\x1b[0m++\x1b[90m-------+-------+-------\x1b[0m++\x1b[90m-------+-------+-------\x1b[0m++\n";

        let mut out = String::new();
        out.push_str(HEAVY);

        for row in 0..9 {
            for sub_row in 0..3 {
                out.push_str("||");
                for col in 0..9 {
                    let e = self.cells[9 * row + col];
                    let solved = is_single(e);
                    let value = lowest_digit(e);

                    for sub_col in 0..3 {
                        let mark = (3 * sub_row + sub_col + 1) as u8;
                        if solved {
                            if sub_row == 1 && sub_col == 1 {
                                let _ = write!(out, " \x1b[91m{value}\x1b[0m");
                            } else {
                                out.push_str("  ");
                            }
                        } else if e & digit_mask(mark) != 0 {
                            let _ = write!(out, " \x1b[90m{mark}\x1b[0m");
                        } else {
                            out.push_str("  ");
                        }
                    }

                    if (col + 1) % 3 == 0 {
                        out.push_str(" ||");
                    } else {
                        out.push_str("\x1b[90m |\x1b[0m");
                    }
                }
                out.push('\n');
            }
            out.push_str(if (row + 1) % 3 == 0 { HEAVY } else { LIGHT });
        }

        out
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            for col in 0..9 {
                let c = self
                    .solved_digit(9 * row + col)
                    .map_or('.', |d| char::from(b'0' + d));
                write!(f, "{c}")?;
                if col == 2 || col == 5 {
                    write!(f, " | ")?;
                } else if col < 8 {
                    write!(f, " ")?;
                }
            }
            writeln!(f)?;
            if row == 2 || row == 5 {
                writeln!(f, "------+-------+------")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::candidates::count;

    const CLASSIC: &str =
        "53..7....6..195....98....6.8...6...34..8.3..17...2...6.6....28....419..5....8..79";

    #[test]
    fn test_parse_seeds_candidates() {
        let board = Board::parse(CLASSIC).unwrap();

        // Cell 0 is a given '5': the singleton bit for 5.
        assert_eq!(board.cells()[0], digit_mask(5));
        // Cell 2 is blank: all nine candidates.
        assert_eq!(board.cells()[2], DIGIT_MASK);
        assert_eq!(count(board.cells()[2]), 9);
    }

    #[test]
    fn test_parse_accepts_zero_as_blank() {
        let zeros = "0".repeat(81);
        let board = Board::parse(&zeros).unwrap();
        assert!(board.cells().iter().all(|&e| e == DIGIT_MASK));
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        for len in [80, 82] {
            let input = ".".repeat(len);
            assert_eq!(
                Board::parse(&input),
                Err(SolverError::InvalidInput { len })
            );
        }
    }

    #[test]
    fn test_guess_stack_round_trip() {
        let mut board = Board::parse(CLASSIC).unwrap();
        let before = board.snapshot();

        // Save the pre-guess state with the guessed digit excluded, then
        // overwrite the live cell, exactly as the controller does.
        let cell = 2;
        let digit = lowest_digit(board.cells()[cell]);
        let mut saved = board.snapshot();
        saved[cell] &= !digit_mask(digit);
        board.push_guess(saved);
        board.cells[cell] = digit_mask(digit);

        assert_eq!(board.guess_depth(), 1);
        board.pop_guess().unwrap();
        assert_eq!(board.guess_depth(), 0);

        // Everything is restored except the guessed digit is gone.
        for (i, (&now, &then)) in board.cells().iter().zip(before.iter()).enumerate() {
            if i == cell {
                assert_eq!(now, then & !digit_mask(digit));
            } else {
                assert_eq!(now, then);
            }
        }
    }

    #[test]
    fn test_pop_guess_on_empty_stack() {
        let mut board = Board::parse(CLASSIC).unwrap();
        assert_eq!(board.pop_guess(), Err(SolverError::NoGuessToRevert));
    }

    #[test]
    fn test_is_valid_rejects_empty_cell() {
        let mut board = Board::parse(CLASSIC).unwrap();
        assert!(board.is_valid());
        board.cells[10] = 0;
        assert!(!board.is_valid());
    }

    #[test]
    fn test_is_valid_rejects_duplicate_in_group() {
        let mut board = Board::parse(CLASSIC).unwrap();
        // Cell 0 already holds a solved 5; planting another 5 in row 0
        // breaks the group.
        board.cells[1] = digit_mask(5);
        assert!(!board.is_valid());
    }

    #[test]
    fn test_group_complete() {
        let solved =
            "534678912672195348198342567859761423426853791713924856961537284287419635345286179";
        let board = Board::parse(solved).unwrap();
        for group in GROUPS.iter() {
            assert_eq!(board.group_complete(group), Ok(true));
        }
        assert_eq!(board.is_complete(), Ok(true));
    }

    #[test]
    fn test_group_complete_detects_duplicates() {
        // A full row of all-nines XORs to 1 0 0 ... instead of the full mask.
        let mut line = "9".repeat(9);
        line.push_str(&".".repeat(72));
        let board = Board::parse(&line).unwrap();
        assert_eq!(
            board.group_complete(&GROUPS[0]),
            Err(SolverError::InvalidState)
        );
    }

    #[test]
    fn test_to_line_round_trip() {
        let board = Board::parse(CLASSIC).unwrap();
        let expected: String = CLASSIC
            .chars()
            .map(|c| if c.is_ascii_digit() && c != '0' { c } else { '.' })
            .collect();
        assert_eq!(board.to_line(), expected);
    }
}
