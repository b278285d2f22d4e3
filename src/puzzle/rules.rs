#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! The five candidate-elimination rules.
//!
//! Every rule is an independent pure function over the mutable board,
//! scanning groups or cells and clearing impossible candidates. Each
//! returns whether it changed anything; the search controller applies them
//! in the fixed priority order of [`Rule::ALL`] (cheapest first) and
//! restarts the scan from the first rule whenever one reports progress.
//!
//! The rule set is closed and known at compile time, so dispatch is a
//! plain `match` on the [`Rule`] enum rather than anything polymorphic.

use std::fmt::{self, Display};

use smallvec::SmallVec;

use crate::puzzle::board::Board;
use crate::puzzle::candidates::{
    Entry, LOCK_FLAG, count, digit_mask, has_digit, is_locked, is_single, remove,
};
use crate::puzzle::topology::{CELL_COUNT, CELL_GROUPS, GROUPS, box_of};

/// The elimination rules, in application priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// A solved cell's value is removed from every peer, then the cell is
    /// locked. The foundational constraint; idempotent per cell once
    /// locked.
    NakedSingle,
    /// A digit admitted by exactly one cell of a group is assigned there.
    HiddenSingle,
    /// N cells of a group sharing one identical N-candidate set exclude
    /// those digits from the rest of the group.
    NakedSubset,
    /// N digits of a group confined to the same N cells exclude every
    /// other candidate from those cells. The dual of [`Rule::NakedSubset`].
    HiddenSubset,
    /// A digit whose placements in one group all fall inside a second
    /// group is removed from the rest of the second group, in both the
    /// box-to-line and line-to-box directions.
    Intersection,
}

impl Rule {
    /// All rules, in the order the controller applies them.
    pub const ALL: [Self; 5] = [
        Self::NakedSingle,
        Self::HiddenSingle,
        Self::NakedSubset,
        Self::HiddenSubset,
        Self::Intersection,
    ];

    /// A short human-readable name for reporting.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NakedSingle => "naked single",
            Self::HiddenSingle => "hidden single",
            Self::NakedSubset => "naked subset",
            Self::HiddenSubset => "hidden subset",
            Self::Intersection => "intersection",
        }
    }

    /// Position of this rule in [`Rule::ALL`], used to index stat arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Applies this rule once over the whole board.
    ///
    /// Returns whether any candidate bit changed.
    pub fn apply(self, board: &mut Board) -> bool {
        match self {
            Self::NakedSingle => naked_single(board),
            Self::HiddenSingle => hidden_single(board),
            Self::NakedSubset => naked_subset(board),
            Self::HiddenSubset => hidden_subset(board),
            Self::Intersection => intersection(board),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-rule invocation and success counters, informational only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RuleStats {
    calls: [u32; 5],
    applies: [u32; 5],
}

impl RuleStats {
    /// Records one invocation of `rule` and whether it changed the board.
    pub const fn record(&mut self, rule: Rule, applied: bool) {
        self.calls[rule.index()] += 1;
        if applied {
            self.applies[rule.index()] += 1;
        }
    }

    /// Times `rule` was invoked.
    #[must_use]
    pub const fn calls(&self, rule: Rule) -> u32 {
        self.calls[rule.index()]
    }

    /// Times `rule` reported a change.
    #[must_use]
    pub const fn applies(&self, rule: Rule) -> u32 {
        self.applies[rule.index()]
    }
}

/// Rule 1: propagate every unlocked solved cell into its three groups,
/// then lock it so the work is never repeated.
fn naked_single(board: &mut Board) -> bool {
    let mut changed = false;

    for cell in 0..CELL_COUNT {
        let e = board.cells[cell];
        if is_locked(e) || !is_single(e) {
            continue;
        }

        for &gid in &CELL_GROUPS[cell] {
            for &peer in &GROUPS[gid] {
                if peer != cell {
                    changed |= remove(&mut board.cells[peer], e);
                }
            }
        }
        board.cells[cell] |= LOCK_FLAG;
    }

    changed
}

/// Rule 2: a digit with exactly one admitting cell in a group goes there.
fn hidden_single(board: &mut Board) -> bool {
    let mut changed = false;

    for group in GROUPS.iter() {
        let mut admit_count = [0u8; 9];
        let mut admit_cell = [0usize; 9];

        for &cell in group {
            let e = board.cells[cell];
            for digit in 1..=9u8 {
                if has_digit(e, digit) {
                    admit_count[(digit - 1) as usize] += 1;
                    admit_cell[(digit - 1) as usize] = cell;
                }
            }
        }

        for digit in 1..=9u8 {
            let k = (digit - 1) as usize;
            if admit_count[k] == 1 && !is_single(board.cells[admit_cell[k]]) {
                board.cells[admit_cell[k]] = digit_mask(digit);
                changed = true;
            }
        }
    }

    changed
}

/// Rule 3: N cells of a group holding one identical N-candidate set make
/// those candidates exclusive to those cells.
fn naked_subset(board: &mut Board) -> bool {
    let mut changed = false;

    for group in GROUPS.iter() {
        for i in 0..9 {
            let probe = board.cells[group[i]];

            // Only cells further along are counted, so each subset is
            // handled once, at its first member.
            let matches = 1 + (i + 1..9)
                .filter(|&j| board.cells[group[j]] == probe)
                .count();

            if matches > 1 && count(probe) as usize == matches {
                for &other in group {
                    if board.cells[other] != probe {
                        changed |= remove(&mut board.cells[other], probe);
                    }
                }
            }
        }
    }

    changed
}

/// Rule 4: N digits of a group confined to the same N cells strip every
/// other candidate from those cells.
///
/// Works on the transposed view of the group: one position bitmask per
/// digit, where bit `p` means in-group position `p` admits the digit. N
/// identical position masks of population N pin those positions to
/// exactly those digits.
fn hidden_subset(board: &mut Board) -> bool {
    let mut changed = false;

    for group in GROUPS.iter() {
        let mut positions = [0 as Entry; 9];
        for (pos, &cell) in group.iter().enumerate() {
            let e = board.cells[cell];
            for digit in 1..=9u8 {
                if has_digit(e, digit) {
                    positions[(digit - 1) as usize] |= 1 << pos;
                }
            }
        }

        for i in 0..9 {
            let mask_i = positions[i];
            let mut digit_union: Entry = 1 << i;

            let mut matches = 1;
            for (j, &mask_j) in positions.iter().enumerate().skip(i + 1) {
                if mask_i == mask_j {
                    matches += 1;
                    digit_union |= 1 << j;
                }
            }

            if matches > 1 && count(mask_i) as usize == matches {
                for (pos, &cell) in group.iter().enumerate() {
                    if mask_i & (1 << pos) != 0 {
                        let e = board.cells[cell];
                        let reduced = e & (digit_union | LOCK_FLAG);
                        if reduced != e {
                            board.cells[cell] = reduced;
                            changed = true;
                        }
                    }
                }
            }
        }
    }

    changed
}

/// Rule 5: locked candidates, both directions.
///
/// For each digit and each group J, if every admitting cell of J also lies
/// in a single other group K (a box's candidates confined to one line, or
/// a line's candidates confined to one box), the digit is removed from the
/// rest of K.
fn intersection(board: &mut Board) -> bool {
    let mut changed = false;

    for digit in 1..=9u8 {
        let mask = digit_mask(digit);

        for (gid, group) in GROUPS.iter().enumerate() {
            let mut admitting: SmallVec<[usize; 9]> = SmallVec::new();
            for &cell in group {
                if has_digit(board.cells[cell], digit) {
                    admitting.push(cell);
                }
            }

            if admitting.len() < 2 {
                continue;
            }

            let target = if gid >= 18 {
                // J is a box: are the placements confined to one line?
                let row = admitting[0] / 9;
                let col = admitting[0] % 9;
                if admitting.iter().all(|&c| c / 9 == row) {
                    Some(row)
                } else if admitting.iter().all(|&c| c % 9 == col) {
                    Some(9 + col)
                } else {
                    None
                }
            } else {
                // J is a line: are the placements confined to one box?
                let b = box_of(admitting[0]);
                admitting
                    .iter()
                    .all(|&c| box_of(c) == b)
                    .then_some(18 + b)
            };

            if let Some(k) = target {
                for &other in &GROUPS[k] {
                    if !admitting.contains(&other) {
                        changed |= remove(&mut board.cells[other], mask);
                    }
                }
            }
        }
    }

    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::candidates::lowest_digit;

    fn blank_board() -> Board {
        Board::parse(&".".repeat(81)).unwrap()
    }

    #[test]
    fn test_naked_single_propagates_and_locks() {
        let mut line = "5".to_string();
        line.push_str(&".".repeat(80));
        let mut board = Board::parse(&line).unwrap();

        assert!(Rule::NakedSingle.apply(&mut board));

        // 5 is gone from the rest of row 0, column 0 and box 0.
        assert!(!has_digit(board.cells[1], 5));
        assert!(!has_digit(board.cells[9], 5));
        assert!(!has_digit(board.cells[10], 5));
        // The source cell is locked and untouched.
        assert!(is_locked(board.cells[0]));
        assert_eq!(lowest_digit(board.cells[0]), 5);

        // A second pass finds nothing new.
        assert!(!Rule::NakedSingle.apply(&mut board));
    }

    #[test]
    fn test_hidden_single_assigns_unique_spot() {
        let mut board = blank_board();
        // Make cell 0 the only spot in row 0 that still admits 5.
        for cell in 1..9 {
            board.cells[cell] &= !digit_mask(5);
        }

        assert!(Rule::HiddenSingle.apply(&mut board));
        assert_eq!(board.cells[0], digit_mask(5));
    }

    #[test]
    fn test_naked_subset_excludes_pair() {
        let mut board = blank_board();
        let pair = digit_mask(1) | digit_mask(2);
        board.cells[0] = pair;
        board.cells[1] = pair;

        assert!(Rule::NakedSubset.apply(&mut board));

        for cell in 2..9 {
            assert!(!has_digit(board.cells[cell], 1));
            assert!(!has_digit(board.cells[cell], 2));
        }
        // The pair cells themselves are untouched.
        assert_eq!(board.cells[0], pair);
        assert_eq!(board.cells[1], pair);
    }

    #[test]
    fn test_hidden_subset_strips_pair_cells() {
        let mut board = blank_board();
        // Digits 1 and 2 are only admitted by cells 0 and 1 of row 0.
        let pair = digit_mask(1) | digit_mask(2);
        for cell in 2..9 {
            board.cells[cell] &= !pair;
        }

        assert!(Rule::HiddenSubset.apply(&mut board));
        assert_eq!(board.cells[0], pair);
        assert_eq!(board.cells[1], pair);
    }

    #[test]
    fn test_intersection_box_to_line() {
        let mut board = blank_board();
        // Confine 5 within box 0 to its top row (cells 0, 1, 2).
        for &cell in &[9, 10, 11, 18, 19, 20] {
            board.cells[cell] &= !digit_mask(5);
        }

        assert!(Rule::Intersection.apply(&mut board));

        // 5 disappears from the rest of row 0.
        for cell in 3..9 {
            assert!(!has_digit(board.cells[cell], 5), "cell {cell}");
        }
    }

    #[test]
    fn test_intersection_line_to_box() {
        let mut board = blank_board();
        // Confine 7 within row 0 to cells 0, 1, 2 - all in box 0.
        for cell in 3..9 {
            board.cells[cell] &= !digit_mask(7);
        }

        assert!(Rule::Intersection.apply(&mut board));

        // 7 disappears from the other cells of box 0.
        for &cell in &[9, 10, 11, 18, 19, 20] {
            assert!(!has_digit(board.cells[cell], 7), "cell {cell}");
        }
    }

    #[test]
    fn test_rules_report_no_change_on_blank_board() {
        // A blank board offers nothing to any rule.
        let mut board = blank_board();
        for rule in Rule::ALL {
            assert!(!rule.apply(&mut board), "{rule} changed a blank board");
        }
    }

    #[test]
    fn test_rule_stats_counters() {
        let mut stats = RuleStats::default();
        stats.record(Rule::NakedSingle, true);
        stats.record(Rule::NakedSingle, false);
        stats.record(Rule::Intersection, true);

        assert_eq!(stats.calls(Rule::NakedSingle), 2);
        assert_eq!(stats.applies(Rule::NakedSingle), 1);
        assert_eq!(stats.calls(Rule::Intersection), 1);
        assert_eq!(stats.applies(Rule::Intersection), 1);
        assert_eq!(stats.calls(Rule::HiddenSubset), 0);
    }
}
