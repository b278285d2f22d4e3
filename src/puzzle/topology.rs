#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The static partition of the 81-cell grid into rows, columns and boxes.
//!
//! The board is covered by 27 groups of 9 cells: group ids 0-8 are the
//! rows top to bottom, ids 9-17 the columns left to right, and ids 18-26
//! the 3x3 boxes in reading order. Each cell belongs to exactly three
//! groups, one of each kind.
//!
//! Both tables are computed once at first use and shared read-only for the
//! lifetime of the process; concurrent solving sessions may borrow them
//! freely.

use lazy_static::lazy_static;

/// Number of groups covering the board (9 rows + 9 columns + 9 boxes).
pub const GROUP_COUNT: usize = 27;

/// Number of cells on the board.
pub const CELL_COUNT: usize = 81;

lazy_static! {
    /// The 27 groups, each an ordered list of the 9 cell indices it contains.
    pub static ref GROUPS: [[usize; 9]; GROUP_COUNT] = {
        let mut groups = [[0; 9]; GROUP_COUNT];

        for r in 0..9 {
            for c in 0..9 {
                groups[r][c] = 9 * r + c;
            }
        }

        for c in 0..9 {
            for r in 0..9 {
                groups[9 + c][r] = 9 * r + c;
            }
        }

        for b in 0..9 {
            let start = 27 * (b / 3) + 3 * (b % 3);
            for (k, slot) in groups[18 + b].iter_mut().enumerate() {
                *slot = start + 9 * (k / 3) + k % 3;
            }
        }

        groups
    };

    /// For each cell, the ids of the three groups containing it, in the
    /// order row, column, box.
    pub static ref CELL_GROUPS: [[usize; 3]; CELL_COUNT] = {
        let mut map = [[0; 3]; CELL_COUNT];
        for (cell, entry) in map.iter_mut().enumerate() {
            *entry = [cell / 9, 9 + cell % 9, 18 + box_of(cell)];
        }
        map
    };
}

/// Returns the box index (0-8, reading order) of `cell`.
#[must_use]
pub const fn box_of(cell: usize) -> usize {
    3 * (cell / 27) + (cell % 9) / 3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_shapes() {
        // Row 0 is the first nine cells, column 0 the first cell of each row.
        assert_eq!(GROUPS[0], [0, 1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(GROUPS[9], [0, 9, 18, 27, 36, 45, 54, 63, 72]);
        // Box 0 is the top-left 3x3 block, box 4 the central one.
        assert_eq!(GROUPS[18], [0, 1, 2, 9, 10, 11, 18, 19, 20]);
        assert_eq!(GROUPS[22], [30, 31, 32, 39, 40, 41, 48, 49, 50]);
    }

    #[test]
    fn test_every_cell_in_three_groups() {
        let mut membership = [0u8; CELL_COUNT];
        for group in GROUPS.iter() {
            for &cell in group {
                membership[cell] += 1;
            }
        }
        assert!(membership.iter().all(|&n| n == 3));
    }

    #[test]
    fn test_cell_groups_agree_with_groups() {
        for cell in 0..CELL_COUNT {
            for &gid in &CELL_GROUPS[cell] {
                assert!(
                    GROUPS[gid].contains(&cell),
                    "cell {cell} missing from group {gid}"
                );
            }
        }
    }

    #[test]
    fn test_box_of() {
        assert_eq!(box_of(0), 0);
        assert_eq!(box_of(8), 2);
        assert_eq!(box_of(40), 4);
        assert_eq!(box_of(80), 8);
    }
}
