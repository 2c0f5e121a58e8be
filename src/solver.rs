//! This module contains the resumable backtracking search over a Sudoku's
//! open cells.
//!
//! Most importantly, this module contains the definition of
//! [SolveStatus](enum.SolveStatus.html) and the implementation of
//! [Sudoku::step](../struct.Sudoku.html#method.step), which advances the
//! search by exactly one bounded unit of work. The search state itself (the
//! open cells with their resume digits and the stack of solved cells) lives
//! in the [Search](struct.Search.html) bookkeeping owned by every
//! [Sudoku](../struct.Sudoku.html).

use crate::Sudoku;

use serde::{Deserialize, Serialize};

/// An enumeration of the different outcomes one solving step can report.
/// Note that a step may change nothing visible on the grid (for example when
/// it merely accepts a pre-filled open cell) and still report
/// [SolveStatus::InProgress].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SolveStatus {

    /// Indicates that the search did one unit of work and has not finished;
    /// call [Sudoku::step](../struct.Sudoku.html#method.step) again to
    /// continue.
    InProgress,

    /// Indicates that every open cell holds a digit and no conflicts remain.
    Solved,

    /// Indicates that the search has exhausted all candidates: the remaining
    /// digits on the grid admit no completion. This is a recoverable,
    /// user-visible condition, not an error; a presentation layer typically
    /// reports it and stops auto-solving.
    Stuck
}

/// One originally-empty cell the search is responsible for, together with the
/// digit last tried for it. The resume digit doubles as the 0-based start
/// offset of the next candidate scan, so a resumed search never re-tries
/// digits it has already exhausted for this cell.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct OpenCell {
    pub(crate) row: usize,
    pub(crate) column: usize,
    pub(crate) resume_digit: usize
}

/// The bookkeeping of the step-wise search: the fixed, order-preserved list
/// of cells that were empty at the last remap, and the stack of cells the
/// search has currently assigned, in assignment order. The stack is always a
/// prefix of the open-cell list; its length is the search cursor.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Search {
    open_cells: Vec<OpenCell>,
    solved: Vec<(usize, usize)>
}

impl Search {
    pub(crate) fn new() -> Search {
        Search {
            open_cells: Vec::new(),
            solved: Vec::new()
        }
    }

    pub(crate) fn push_open(&mut self, row: usize, column: usize) {
        self.open_cells.push(OpenCell {
            row,
            column,
            resume_digit: 0
        });
    }

    fn cursor(&self) -> usize {
        self.solved.len()
    }

    fn is_complete(&self) -> bool {
        self.solved.len() == self.open_cells.len()
    }
}

impl Sudoku {

    /// Performs exactly one bounded unit of solving work and reports what the
    /// search looks like afterwards. Calling this once per display tick
    /// yields an animated solve; [Sudoku::solve_to_completion] drains it
    /// instead.
    ///
    /// One call does the first applicable of the following:
    ///
    /// 1. If any cell is recorded as conflicting, empty one such cell.
    /// Invalid state introduced by user edits is resolved before the search
    /// proceeds.
    /// 2. If every open cell is solved, report [SolveStatus::Solved].
    /// 3. If the open cell at the cursor already holds a digit (for example
    /// entered by the user), accept it unchanged.
    /// 4. If a candidate digit at or above the cell's resume digit is free in
    /// all three of its units, assign it and advance.
    /// 5. Otherwise undo the most recently solved cell and retry it later
    /// with the next candidate (classic backtracking).
    /// 6. If there is nothing left to undo but user-entered digits exist,
    /// empty every open cell and restart the search from the top, giving
    /// the remaining givens another chance.
    /// 7. Failing all of that, report [SolveStatus::Stuck]: the givens admit
    /// no completion.
    pub fn step(&mut self) -> SolveStatus {
        if let Some(&(row, column)) = self.conflicts.keys().next() {
            self.clear_cell(row, column).unwrap();
            return SolveStatus::InProgress;
        }

        if self.search.is_complete() {
            return SolveStatus::Solved;
        }

        let cursor = self.search.cursor();
        let OpenCell { row, column, resume_digit } =
            self.search.open_cells[cursor];

        if self.grid.get_cell(row, column).unwrap().is_some() {
            self.search.solved.push((row, column));
            return SolveStatus::InProgress;
        }

        if let Some(digit) =
                self.tracker.first_free_digit(row, column, resume_digit) {
            self.search.open_cells[cursor].resume_digit = digit;
            self.assign(row, column, digit).unwrap();
            self.search.solved.push((row, column));
            return SolveStatus::InProgress;
        }

        if let Some((undo_row, undo_column)) = self.search.solved.pop() {
            self.clear_cell(undo_row, undo_column).unwrap();
            self.search.open_cells[cursor].resume_digit = 0;
            return SolveStatus::InProgress;
        }

        if !self.user_cells.is_empty() {
            self.restart_search();
            return SolveStatus::InProgress;
        }

        SolveStatus::Stuck
    }

    /// Repeatedly calls [Sudoku::step] until the search reports something
    /// other than [SolveStatus::InProgress] and returns that status. The
    /// generator uses this to fill seeded grids; presentation layers that
    /// want animation call [Sudoku::step] themselves.
    pub fn solve_to_completion(&mut self) -> SolveStatus {
        loop {
            let status = self.step();

            if status != SolveStatus::InProgress {
                return status;
            }
        }
    }

    // Empties every open cell and resets all resume digits, restarting the
    // search from the first open cell. Only called with an empty undo stack.
    fn restart_search(&mut self) {
        for i in 0..self.search.open_cells.len() {
            let OpenCell { row, column, .. } = self.search.open_cells[i];
            self.clear_cell(row, column).unwrap();
            self.search.open_cells[i].resume_digit = 0;
        }
    }
}
