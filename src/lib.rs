// Code lints

#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_import_braces)]
#![warn(unused_lifetimes)]
#![warn(unused_qualifications)]

// Doc lints

#![warn(broken_intra_doc_links)]
#![warn(missing_docs)]
#![warn(missing_crate_level_docs)]
#![warn(invalid_codeblock_attributes)]

//! This crate implements an incremental 9x9 Sudoku play engine. It is the
//! game-state core behind an interactive Sudoku application and supports the
//! following key features:
//!
//! * Generating random puzzles with a requested number of empty cells
//! * Tracking digit usage per row, column and block with counters that are
//! updated on every single-cell edit, without ever rescanning the grid
//! * Detecting conflicting cells incrementally, including retroactively
//! clearing conflicts that an edit has legalized
//! * Solving the open cells with a resumable backtracking search that
//! advances one bounded step at a time, suitable for animated display
//! * Parsing and printing grids
//!
//! The engine deliberately contains no I/O, timers or rendering; a
//! presentation layer drives it through the methods on [Sudoku].
//!
//! # Generating a puzzle
//!
//! [Sudoku::new] generates a complete, valid grid and then clears the
//! requested number of cells.
//!
//! ```
//! use sudoku_play::Sudoku;
//!
//! let sudoku = Sudoku::new(20).unwrap();
//!
//! // 61 givens remain, none of them conflicting.
//! assert_eq!(61, sudoku.grid().count_clues());
//! assert!(!sudoku.has_conflicts());
//! ```
//!
//! # Editing cells and tracking conflicts
//!
//! User edits go through [Sudoku::assign_by_user] and [Sudoku::clear_cell].
//! A cell whose digit already occurs in one of its units is recorded in the
//! conflict set together with flags naming the colliding units, which a
//! presentation layer can render as highlight overlays.
//!
//! ```
//! use sudoku_play::{Sudoku, SudokuGrid};
//!
//! let mut sudoku = Sudoku::with_grid(SudokuGrid::new(), 0);
//! sudoku.assign_by_user(0, 0, 5).unwrap();
//! sudoku.assign_by_user(0, 3, 5).unwrap();
//! assert!(sudoku.has_conflicts());
//!
//! // Clearing the first 5 legalizes the second one again.
//! sudoku.clear_cell(0, 0).unwrap();
//! assert!(!sudoku.has_conflicts());
//! ```
//!
//! # Solving step by step
//!
//! [Sudoku::step] performs exactly one bounded unit of solving work, so a
//! presentation layer can call it once per display tick to animate the
//! search. [Sudoku::solve_to_completion] drains the search in one call.
//!
//! ```
//! use sudoku_play::Sudoku;
//! use sudoku_play::solver::SolveStatus;
//!
//! let mut sudoku = Sudoku::new(20).unwrap();
//! assert_eq!(SolveStatus::Solved, sudoku.solve_to_completion());
//! assert!(sudoku.grid().is_full());
//! ```

pub mod counting;
pub mod error;
pub mod generator;
pub mod solver;

use counting::{UsageTracker, block_index};
use error::{SudokuError, SudokuParseError, SudokuParseResult, SudokuResult};
use generator::Generator;
use solver::Search;

use serde::{Deserialize, Serialize};

use std::collections::{HashMap, HashSet};
use std::convert::TryFrom;
use std::fmt::{self, Display, Formatter};

/// A Sudoku grid is a 9x9 matrix of cells, divided into 9 3x3 blocks. Each
/// cell may or may not be occupied by a digit from 1 to 9. This type is raw
/// storage only: it enforces coordinate and digit ranges, but attaches no
/// rules to the stored digits. Rule tracking is the job of [Sudoku], which
/// owns a grid and mirrors every change in its usage counters.
///
/// `SudokuGrid` implements `Display`, rendering the grid with box-drawing
/// characters, and serializes as its parseable string code (see
/// [SudokuGrid::parse]).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "String")]
#[serde(try_from = "String")]
pub struct SudokuGrid {
    cells: Vec<Option<usize>>
}

pub(crate) fn index(row: usize, column: usize) -> usize {
    row * 9 + column
}

fn to_char(cell: Option<usize>) -> char {
    if let Some(digit) = cell {
        (b'0' + digit as u8) as char
    }
    else {
        ' '
    }
}

fn to_string(cell: &Option<usize>) -> String {
    if let Some(digit) = cell {
        digit.to_string()
    }
    else {
        String::from("")
    }
}

const TOP_ROW: &str =
    "╔═══╤═══╤═══╦═══╤═══╤═══╦═══╤═══╤═══╗\n";
const THIN_SEPARATOR_LINE: &str =
    "╟───┼───┼───╫───┼───┼───╫───┼───┼───╢\n";
const THICK_SEPARATOR_LINE: &str =
    "╠═══╪═══╪═══╬═══╪═══╪═══╬═══╪═══╪═══╣\n";
const BOTTOM_ROW: &str =
    "╚═══╧═══╧═══╩═══╧═══╧═══╩═══╧═══╧═══╝";

fn content_row(grid: &SudokuGrid, row: usize) -> String {
    let mut result = String::new();

    for column in 0..9 {
        if column % 3 == 0 {
            result.push('║');
        }
        else {
            result.push('│');
        }

        result.push(' ');
        result.push(to_char(grid.get_cell(row, column).unwrap()));
        result.push(' ');
    }

    result.push('║');
    result.push('\n');
    result
}

impl Display for SudokuGrid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for row in 0..9 {
            if row == 0 {
                f.write_str(TOP_ROW)?;
            }
            else if row % 3 == 0 {
                f.write_str(THICK_SEPARATOR_LINE)?;
            }
            else {
                f.write_str(THIN_SEPARATOR_LINE)?;
            }

            f.write_str(content_row(self, row).as_str())?;
        }

        f.write_str(BOTTOM_ROW)
    }
}

impl SudokuGrid {

    /// Creates a new, empty Sudoku grid.
    pub fn new() -> SudokuGrid {
        SudokuGrid {
            cells: vec![None; 81]
        }
    }

    /// Parses a code encoding a Sudoku grid. The code is a comma-separated
    /// list of 81 entries, each either empty or a digit from 1 to 9. The
    /// entries are assigned left-to-right, top-to-bottom, where each row is
    /// completed before the next one is started. Whitespace in the entries is
    /// ignored to allow for more intuitive formatting.
    ///
    /// As an example, the code
    /// `5, , , ,3, , , , ,` followed by 72 further empty entries parses to a
    /// grid holding a 5 at row 0, column 0 and a 3 at row 0, column 4.
    ///
    /// # Errors
    ///
    /// Any specialization of `SudokuParseError` (see that documentation).
    pub fn parse(code: &str) -> SudokuParseResult<SudokuGrid> {
        let entries: Vec<&str> = code.split(',').collect();

        if entries.len() != 81 {
            return Err(SudokuParseError::WrongNumberOfCells);
        }

        let mut grid = SudokuGrid::new();

        for (i, entry) in entries.iter().enumerate() {
            let entry = entry.trim();

            if entry.is_empty() {
                continue;
            }

            let digit = entry.parse::<usize>()?;

            if digit == 0 || digit > 9 {
                return Err(SudokuParseError::InvalidNumber);
            }

            grid.cells[i] = Some(digit);
        }

        Ok(grid)
    }

    /// Converts the grid into a `String` in a way that is consistent with
    /// [SudokuGrid::parse]. That is, a grid that is converted to a string and
    /// parsed again will not change.
    ///
    /// ```
    /// use sudoku_play::SudokuGrid;
    ///
    /// let mut grid = SudokuGrid::new();
    /// grid.set_cell(1, 1, 4).unwrap();
    /// grid.set_cell(2, 1, 5).unwrap();
    ///
    /// let grid_str = grid.to_parseable_string();
    /// let grid_parsed = SudokuGrid::parse(grid_str.as_str()).unwrap();
    /// assert_eq!(grid, grid_parsed);
    /// ```
    pub fn to_parseable_string(&self) -> String {
        self.cells.iter()
            .map(to_string)
            .collect::<Vec<String>>()
            .join(",")
    }

    /// Gets the content of the cell at the specified position.
    ///
    /// # Arguments
    ///
    /// * `row`: The row (y-coordinate) of the desired cell. Must be in the
    /// range `[0, 9[`.
    /// * `column`: The column (x-coordinate) of the desired cell. Must be in
    /// the range `[0, 9[`.
    ///
    /// # Errors
    ///
    /// If either `row` or `column` are not in the specified range. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn get_cell(&self, row: usize, column: usize)
            -> SudokuResult<Option<usize>> {
        if row >= 9 || column >= 9 {
            Err(SudokuError::OutOfBounds)
        }
        else {
            Ok(self.cells[index(row, column)])
        }
    }

    /// Sets the content of the cell at the specified position to the given
    /// digit. If the cell was not empty, the old digit will be overwritten.
    ///
    /// # Arguments
    ///
    /// * `row`: The row (y-coordinate) of the assigned cell. Must be in the
    /// range `[0, 9[`.
    /// * `column`: The column (x-coordinate) of the assigned cell. Must be in
    /// the range `[0, 9[`.
    /// * `digit`: The digit to assign to the specified cell. Must be in the
    /// range `[1, 9]`.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If either `row` or `column` are not in
    /// the specified range.
    /// * `SudokuError::InvalidNumber` If `digit` is not in the specified
    /// range.
    pub fn set_cell(&mut self, row: usize, column: usize, digit: usize)
            -> SudokuResult<()> {
        if row >= 9 || column >= 9 {
            return Err(SudokuError::OutOfBounds);
        }

        if digit == 0 || digit > 9 {
            return Err(SudokuError::InvalidNumber);
        }

        self.cells[index(row, column)] = Some(digit);
        Ok(())
    }

    /// Clears the content of the cell at the specified position, that is, if
    /// it contains a digit, that digit is removed. If the cell is already
    /// empty, it will be left that way.
    ///
    /// # Arguments
    ///
    /// * `row`: The row (y-coordinate) of the cleared cell. Must be in the
    /// range `[0, 9[`.
    /// * `column`: The column (x-coordinate) of the cleared cell. Must be in
    /// the range `[0, 9[`.
    ///
    /// # Errors
    ///
    /// If either `row` or `column` are not in the specified range. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn clear_cell(&mut self, row: usize, column: usize)
            -> SudokuResult<()> {
        if row >= 9 || column >= 9 {
            return Err(SudokuError::OutOfBounds);
        }

        self.cells[index(row, column)] = None;
        Ok(())
    }

    /// Counts the number of clues given by this grid. This is the number of
    /// non-empty cells.
    pub fn count_clues(&self) -> usize {
        self.cells.iter()
            .filter(|cell| cell.is_some())
            .count()
    }

    /// Indicates whether this grid is full, i.e. every cell is filled with a
    /// digit. In this case, [SudokuGrid::count_clues] returns 81.
    pub fn is_full(&self) -> bool {
        !self.cells.iter().any(|cell| cell == &None)
    }

    /// Indicates whether this grid is empty, i.e. no cell is filled with a
    /// digit. In this case, [SudokuGrid::count_clues] returns 0.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|cell| cell == &None)
    }

    /// Gets a reference to the vector which holds the cells. They are in
    /// left-to-right, top-to-bottom order, where rows are together.
    pub fn cells(&self) -> &Vec<Option<usize>> {
        &self.cells
    }
}

impl Default for SudokuGrid {
    fn default() -> SudokuGrid {
        SudokuGrid::new()
    }
}

impl From<SudokuGrid> for String {
    fn from(grid: SudokuGrid) -> String {
        grid.to_parseable_string()
    }
}

impl TryFrom<String> for SudokuGrid {
    type Error = SudokuParseError;

    fn try_from(code: String) -> SudokuParseResult<SudokuGrid> {
        SudokuGrid::parse(code.as_str())
    }
}

/// Names the units in which a conflicting cell collides with another
/// occurrence of its digit. At least one flag is set for every cell recorded
/// in the conflict set; a presentation layer can use the individual flags to
/// highlight the offending row, column and/or block.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ConflictFlags {

    /// The cell's digit already occurred in its column when it was assigned.
    pub column: bool,

    /// The cell's digit already occurred in its row when it was assigned.
    pub row: bool,

    /// The cell's digit already occurred in its block when it was assigned.
    pub block: bool
}

impl ConflictFlags {

    /// Indicates whether any of the three flags is set.
    pub fn any(&self) -> bool {
        self.column || self.row || self.block
    }
}

/// The play-state engine for one Sudoku puzzle. It owns the grid together
/// with all bookkeeping derived from it: the per-unit digit usage counters,
/// the conflict set, the set of user-changed cells and the state of the
/// step-wise search. All of that bookkeeping is maintained incrementally by
/// the entry points on this type, so there is never a full grid rescan
/// outside of [Sudoku::remap].
///
/// A `Sudoku` is an ordinary value: it can be constructed freely, cloned for
/// lookahead (cloning an engine and solving the clone does not disturb the
/// original) and dropped without ceremony. The grid is only exposed
/// immutably; every mutation must go through [Sudoku::assign_by_user],
/// [Sudoku::clear_cell] or the solver, since a direct grid mutation would
/// desynchronize the counters.
#[derive(Clone, Debug, PartialEq)]
pub struct Sudoku {
    grid: SudokuGrid,
    tracker: UsageTracker,
    conflicts: HashMap<(usize, usize), ConflictFlags>,
    user_cells: HashSet<(usize, usize)>,
    search: Search,
    empty_cell_target: usize
}

impl Sudoku {

    /// Generates a new puzzle with the given number of empty cells, using a
    /// thread-local random number generator. This is shorthand for
    /// [Generator::new_default] followed by
    /// [Generator::generate](generator::Generator::generate); see there for
    /// details on the generation procedure.
    ///
    /// # Errors
    ///
    /// * `SudokuError::TooManyEmptyCells` If `empty_cells` exceeds 81.
    /// * `SudokuError::UnsatisfiableGrid` If the seeded grid cannot be
    /// completed. This does not occur for the seeds this crate produces.
    pub fn new(empty_cells: usize) -> SudokuResult<Sudoku> {
        Generator::new_default().generate(empty_cells)
    }

    /// Creates a play-state engine over an existing grid, for example one
    /// restored from a serialized game or built up in tests. The grid's
    /// filled cells become the givens; all empty cells become the cells the
    /// solver is responsible for (see [Sudoku::remap]). The conflict and
    /// user-changed sets start out empty.
    ///
    /// # Arguments
    ///
    /// * `grid`: The initial [SudokuGrid].
    /// * `empty_cell_target`: The number of cells the puzzle expects the user
    /// to fill in, used by [Sudoku::is_win].
    pub fn with_grid(grid: SudokuGrid, empty_cell_target: usize) -> Sudoku {
        let mut sudoku = Sudoku {
            grid,
            tracker: UsageTracker::new(),
            conflicts: HashMap::new(),
            user_cells: HashSet::new(),
            search: Search::new(),
            empty_cell_target
        };
        sudoku.remap();
        sudoku
    }

    /// Gets a reference to the [SudokuGrid] of this Sudoku.
    pub fn grid(&self) -> &SudokuGrid {
        &self.grid
    }

    /// Gets the content of the cell at the specified position, `None` if it
    /// is empty.
    ///
    /// # Errors
    ///
    /// If either `row` or `column` are greater than or equal to 9. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn value_at(&self, row: usize, column: usize)
            -> SudokuResult<Option<usize>> {
        self.grid.get_cell(row, column)
    }

    /// Gets the number of cells this puzzle was generated to leave empty,
    /// i.e. the number of cells the user is expected to fill in.
    pub fn empty_cell_target(&self) -> usize {
        self.empty_cell_target
    }

    /// Gets the number of cells currently holding a digit entered through
    /// [Sudoku::assign_by_user].
    pub fn user_cell_count(&self) -> usize {
        self.user_cells.len()
    }

    /// Rebuilds the usage counters and the search bookkeeping from the
    /// current grid. Filled cells are registered in the counters; empty cells
    /// become the search's open cells, in row-major order, each with a fresh
    /// resume digit. The conflict and user-changed sets are left untouched.
    ///
    /// This is the only wholesale rebuild in the engine. It runs after
    /// generation and when a presentation layer restarts play over a modified
    /// grid; all other operations maintain the bookkeeping incrementally.
    pub fn remap(&mut self) {
        self.tracker = UsageTracker::new();
        self.search = Search::new();

        for row in 0..9 {
            for column in 0..9 {
                match self.grid.get_cell(row, column).unwrap() {
                    Some(digit) => self.tracker.add(row, column, digit),
                    None => self.search.push_open(row, column)
                }
            }
        }
    }

    /// Empties the cell at the specified position. If the cell holds a
    /// digit, the digit's counters are decremented, the cell leaves the
    /// conflict and user-changed sets, and conflicts recorded for other cells
    /// holding the same digit are reconciled: any of their flags whose unit
    /// is shared with this cell is dropped once that unit no longer contains
    /// the digit more than once, since removing this occurrence may have
    /// legalized them. If the cell is already empty, nothing happens.
    ///
    /// # Arguments
    ///
    /// * `row`: The row of the cell to empty. Must be in the range `[0, 9[`.
    /// * `column`: The column of the cell to empty. Must be in the range
    /// `[0, 9[`.
    ///
    /// # Errors
    ///
    /// If either `row` or `column` are not in the specified range. In that
    /// case, `SudokuError::OutOfBounds` is returned.
    pub fn clear_cell(&mut self, row: usize, column: usize)
            -> SudokuResult<()> {
        let digit = match self.grid.get_cell(row, column)? {
            Some(digit) => digit,
            None => return Ok(())
        };

        self.user_cells.remove(&(row, column));
        self.conflicts.remove(&(row, column));
        self.tracker.remove(row, column, digit);
        self.grid.clear_cell(row, column)?;
        self.reconcile_removed_digit(row, column, digit);
        Ok(())
    }

    // Drops conflict flags that the removal of `digit` at (row, column) has
    // legalized. A flag is dropped only if its axis is shared with the
    // removal site and the axis's counter no longer reports a repetition.
    fn reconcile_removed_digit(&mut self, row: usize, column: usize,
            digit: usize) {
        let block = block_index(row, column);
        let holders: Vec<(usize, usize)> = self.conflicts.keys()
            .copied()
            .filter(|&(conflict_row, conflict_column)|
                self.grid.get_cell(conflict_row, conflict_column).unwrap()
                    == Some(digit))
            .collect();

        for (conflict_row, conflict_column) in holders {
            let mut flags = self.conflicts[&(conflict_row, conflict_column)];

            if conflict_row == row && !self.tracker.row_repeated(row, digit) {
                flags.row = false;
            }

            if conflict_column == column &&
                    !self.tracker.column_repeated(column, digit) {
                flags.column = false;
            }

            if block_index(conflict_row, conflict_column) == block &&
                    !self.tracker.block_repeated(block, digit) {
                flags.block = false;
            }

            if flags.any() {
                self.conflicts.insert((conflict_row, conflict_column), flags);
            }
            else {
                self.conflicts.remove(&(conflict_row, conflict_column));
            }
        }
    }

    // The solver/generator mutation path. Overwrites the cell with the given
    // digit (0 empties it), computing the conflict flags against the counter
    // state before this assignment's own increment. The counters are updated
    // regardless of the conflict outcome, as they track raw occupancy.
    pub(crate) fn assign(&mut self, row: usize, column: usize, digit: usize)
            -> SudokuResult<()> {
        if digit == 0 {
            return self.clear_cell(row, column);
        }

        if digit > 9 {
            return Err(SudokuError::InvalidNumber);
        }

        if self.grid.get_cell(row, column)? == Some(digit) {
            return Ok(());
        }

        self.clear_cell(row, column)?;

        let flags = ConflictFlags {
            column: self.tracker.column_occupied(column, digit),
            row: self.tracker.row_occupied(row, digit),
            block: self.tracker
                .block_occupied(block_index(row, column), digit)
        };

        self.grid.set_cell(row, column, digit)?;

        if flags.any() {
            self.conflicts.insert((row, column), flags);
        }
        else {
            self.conflicts.remove(&(row, column));
        }

        self.tracker.add(row, column, digit);
        Ok(())
    }

    /// Assigns the given digit to the cell at the specified position on
    /// behalf of the user. A digit of 0 empties the cell (the original
    /// delete-key behavior); any other digit overwrites the cell's content,
    /// records a conflict entry if the digit already occurs in the cell's
    /// row, column or block, and marks the cell as user-changed. If the cell
    /// held a digit before, conflicts of other cells that collided with that
    /// prior digit are reconciled as described for [Sudoku::clear_cell].
    /// Assigning a cell the digit it already holds changes nothing.
    ///
    /// Conflicting assignments are accepted, not rejected: the grid and the
    /// counters always reflect what is on the board, and the conflict set
    /// (see [Sudoku::conflicts]) reports the collisions.
    ///
    /// # Arguments
    ///
    /// * `row`: The row of the assigned cell. Must be in the range `[0, 9[`.
    /// * `column`: The column of the assigned cell. Must be in the range
    /// `[0, 9[`.
    /// * `digit`: The digit to assign. Must be in the range `[0, 9]`, where 0
    /// empties the cell.
    ///
    /// # Errors
    ///
    /// * `SudokuError::OutOfBounds` If either `row` or `column` are not in
    /// the specified range.
    /// * `SudokuError::InvalidNumber` If `digit` is greater than 9.
    pub fn assign_by_user(&mut self, row: usize, column: usize, digit: usize)
            -> SudokuResult<()> {
        if digit > 9 {
            return Err(SudokuError::InvalidNumber);
        }

        let entered = if digit == 0 { None } else { Some(digit) };

        if self.grid.get_cell(row, column)? == entered {
            return Ok(());
        }

        self.assign(row, column, digit)?;

        if digit > 0 {
            self.user_cells.insert((row, column));
        }

        Ok(())
    }

    /// Returns an iterator over all currently conflicting cells as pairs of
    /// `((row, column), flags)`, in no particular order. A cell is reported
    /// here iff, at the time its current digit was assigned, at least one of
    /// its units already contained that digit and the collision has not been
    /// reconciled away since.
    pub fn conflicts(&self)
            -> impl Iterator<Item = ((usize, usize), ConflictFlags)> + '_ {
        self.conflicts.iter().map(|(&cell, &flags)| (cell, flags))
    }

    /// Indicates whether any cell is currently recorded as conflicting.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }

    /// Indicates whether the puzzle counts as won: the user has filled at
    /// least as many cells as the puzzle left empty and no conflicts remain.
    pub fn is_win(&self) -> bool {
        self.user_cells.len() >= self.empty_cell_target &&
            self.conflicts.is_empty()
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    use crate::solver::SolveStatus;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn parse_ok() {
        let mut code = String::from("5, , , ,3");
        code.push_str(&", ".repeat(76));
        let grid = SudokuGrid::parse(code.as_str()).unwrap();

        assert_eq!(Some(5), grid.get_cell(0, 0).unwrap());
        assert_eq!(None, grid.get_cell(0, 1).unwrap());
        assert_eq!(Some(3), grid.get_cell(0, 4).unwrap());
        assert_eq!(None, grid.get_cell(8, 8).unwrap());
        assert_eq!(2, grid.count_clues());
    }

    #[test]
    fn parse_wrong_number_of_cells() {
        assert_eq!(Err(SudokuParseError::WrongNumberOfCells),
            SudokuGrid::parse("1,2,3"));

        let code = ",".repeat(81);
        assert_eq!(Err(SudokuParseError::WrongNumberOfCells),
            SudokuGrid::parse(code.as_str()));
    }

    #[test]
    fn parse_number_format_error() {
        let mut code = String::from("#");
        code.push_str(&",".repeat(80));
        assert_eq!(Err(SudokuParseError::NumberFormatError),
            SudokuGrid::parse(code.as_str()));
    }

    #[test]
    fn parse_invalid_number() {
        let mut code = String::from("10");
        code.push_str(&",".repeat(80));
        assert_eq!(Err(SudokuParseError::InvalidNumber),
            SudokuGrid::parse(code.as_str()));

        let mut code = String::from("0");
        code.push_str(&",".repeat(80));
        assert_eq!(Err(SudokuParseError::InvalidNumber),
            SudokuGrid::parse(code.as_str()));
    }

    #[test]
    fn to_parseable_string_round_trip() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(0, 0, 1).unwrap();
        grid.set_cell(4, 4, 5).unwrap();
        grid.set_cell(8, 8, 9).unwrap();

        let code = grid.to_parseable_string();
        assert_eq!(grid, SudokuGrid::parse(code.as_str()).unwrap());
    }

    #[test]
    fn serde_round_trip() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(2, 7, 6).unwrap();
        grid.set_cell(6, 1, 2).unwrap();

        let json = serde_json::to_string(&grid).unwrap();
        let deserialized: SudokuGrid =
            serde_json::from_str(json.as_str()).unwrap();
        assert_eq!(grid, deserialized);
    }

    #[test]
    fn grid_bounds_are_checked() {
        let mut grid = SudokuGrid::new();

        assert_eq!(Err(SudokuError::OutOfBounds), grid.get_cell(9, 0));
        assert_eq!(Err(SudokuError::OutOfBounds), grid.set_cell(0, 9, 1));
        assert_eq!(Err(SudokuError::OutOfBounds), grid.clear_cell(10, 10));
        assert_eq!(Err(SudokuError::InvalidNumber), grid.set_cell(0, 0, 10));
        assert_eq!(Err(SudokuError::InvalidNumber), grid.set_cell(0, 0, 0));
    }

    fn empty_sudoku() -> Sudoku {
        Sudoku::with_grid(SudokuGrid::new(), 0)
    }

    // Checks that the tracker's occupancy and repetition views match the
    // digits actually present in the grid, for every unit and digit.
    fn assert_counters_consistent(sudoku: &Sudoku) {
        for unit in 0..9 {
            for digit in 1..=9 {
                let row_count = (0..9)
                    .filter(|&column| sudoku.grid
                        .get_cell(unit, column)
                        .unwrap() == Some(digit))
                    .count();
                let column_count = (0..9)
                    .filter(|&row| sudoku.grid
                        .get_cell(row, unit)
                        .unwrap() == Some(digit))
                    .count();
                let block_count = (0..9)
                    .filter(|&i| {
                        let row = 3 * (unit / 3) + i / 3;
                        let column = 3 * (unit % 3) + i % 3;
                        sudoku.grid.get_cell(row, column).unwrap()
                            == Some(digit)
                    })
                    .count();

                assert_eq!(row_count > 0,
                    sudoku.tracker.row_occupied(unit, digit));
                assert_eq!(row_count > 1,
                    sudoku.tracker.row_repeated(unit, digit));
                assert_eq!(column_count > 0,
                    sudoku.tracker.column_occupied(unit, digit));
                assert_eq!(column_count > 1,
                    sudoku.tracker.column_repeated(unit, digit));
                assert_eq!(block_count > 0,
                    sudoku.tracker.block_occupied(unit, digit));
                assert_eq!(block_count > 1,
                    sudoku.tracker.block_repeated(unit, digit));
            }
        }
    }

    #[test]
    fn counters_follow_arbitrary_edit_sequences() {
        let mut sudoku = empty_sudoku();

        sudoku.assign_by_user(0, 0, 5).unwrap();
        sudoku.assign_by_user(0, 3, 5).unwrap();
        sudoku.assign_by_user(3, 0, 5).unwrap();
        sudoku.assign_by_user(4, 4, 7).unwrap();
        sudoku.assign_by_user(0, 0, 2).unwrap();
        sudoku.clear_cell(0, 3).unwrap();
        sudoku.assign_by_user(8, 8, 0).unwrap();

        assert_counters_consistent(&sudoku);

        sudoku.clear_cell(3, 0).unwrap();
        sudoku.clear_cell(4, 4).unwrap();

        assert_counters_consistent(&sudoku);
    }

    #[test]
    fn duplicate_triple_is_tracked_through_removals() {
        let mut sudoku = empty_sudoku();

        // Three 5s in row 0, entered one after another.
        sudoku.assign_by_user(0, 0, 5).unwrap();
        sudoku.assign_by_user(0, 4, 5).unwrap();
        sudoku.assign_by_user(0, 8, 5).unwrap();

        assert!(sudoku.tracker.row_repeated(0, 5));
        assert!(!sudoku.conflicts.contains_key(&(0, 0)));
        assert!(sudoku.conflicts.contains_key(&(0, 4)));
        assert!(sudoku.conflicts.contains_key(&(0, 8)));

        // Removing one duplicate leaves the row still repeated, so the
        // remaining conflict entries survive.
        sudoku.clear_cell(0, 4).unwrap();
        assert!(sudoku.tracker.row_repeated(0, 5));
        assert!(sudoku.conflicts.contains_key(&(0, 8)));

        // Removing the next one legalizes the last entry.
        sudoku.clear_cell(0, 0).unwrap();
        assert!(!sudoku.tracker.row_repeated(0, 5));
        assert!(sudoku.tracker.row_occupied(0, 5));
        assert!(!sudoku.has_conflicts());

        sudoku.clear_cell(0, 8).unwrap();
        assert!(!sudoku.tracker.row_occupied(0, 5));
        assert_counters_consistent(&sudoku);
    }

    #[test]
    fn assign_records_exact_conflict_axes() {
        let mut sudoku = empty_sudoku();

        sudoku.assign_by_user(0, 0, 5).unwrap();
        sudoku.assign_by_user(0, 3, 5).unwrap();
        sudoku.assign_by_user(4, 0, 5).unwrap();
        sudoku.assign_by_user(1, 1, 5).unwrap();

        let row_conflict = sudoku.conflicts[&(0, 3)];
        assert!(row_conflict.row);
        assert!(!row_conflict.column);
        assert!(!row_conflict.block);

        let column_conflict = sudoku.conflicts[&(4, 0)];
        assert!(column_conflict.column);
        assert!(!column_conflict.row);
        assert!(!column_conflict.block);

        let block_conflict = sudoku.conflicts[&(1, 1)];
        assert!(block_conflict.block);
        assert!(!block_conflict.row);
        assert!(!block_conflict.column);
    }

    #[test]
    fn assign_same_value_is_a_no_op() {
        let mut sudoku = empty_sudoku();
        sudoku.assign_by_user(2, 2, 4).unwrap();
        sudoku.assign_by_user(2, 5, 4).unwrap();

        let grid_before = sudoku.grid.clone();
        let tracker_before = sudoku.tracker.clone();
        let conflicts_before = sudoku.conflicts.clone();

        sudoku.assign(2, 5, 4).unwrap();
        sudoku.assign_by_user(2, 5, 4).unwrap();

        assert_eq!(grid_before, sudoku.grid);
        assert_eq!(tracker_before, sudoku.tracker);
        assert_eq!(conflicts_before, sudoku.conflicts);
    }

    #[test]
    fn assign_then_clear_restores_state() {
        let mut sudoku = empty_sudoku();
        sudoku.assign_by_user(0, 0, 5).unwrap();
        sudoku.assign_by_user(5, 5, 3).unwrap();

        let grid_before = sudoku.grid.clone();
        let tracker_before = sudoku.tracker.clone();
        let conflicts_before = sudoku.conflicts.clone();

        // A conflicting assignment and its removal must round-trip.
        sudoku.assign(0, 7, 5).unwrap();
        assert!(sudoku.has_conflicts());
        sudoku.clear_cell(0, 7).unwrap();

        assert_eq!(grid_before, sudoku.grid);
        assert_eq!(tracker_before, sudoku.tracker);
        assert_eq!(conflicts_before, sudoku.conflicts);

        // Same for a non-conflicting assignment.
        sudoku.assign(8, 0, 1).unwrap();
        sudoku.clear_cell(8, 0).unwrap();

        assert_eq!(grid_before, sudoku.grid);
        assert_eq!(tracker_before, sudoku.tracker);
        assert_eq!(conflicts_before, sudoku.conflicts);
    }

    #[test]
    fn clearing_prior_digit_reconciles_conflicts() {
        let mut sudoku = empty_sudoku();
        sudoku.assign_by_user(0, 0, 5).unwrap();
        sudoku.assign_by_user(0, 3, 5).unwrap();

        assert!(sudoku.conflicts.contains_key(&(0, 3)));

        sudoku.clear_cell(0, 0).unwrap();

        assert!(!sudoku.has_conflicts());
        assert_eq!(Some(5), sudoku.value_at(0, 3).unwrap());
    }

    #[test]
    fn overwriting_prior_digit_reconciles_conflicts() {
        let mut sudoku = empty_sudoku();
        sudoku.assign_by_user(0, 0, 5).unwrap();
        sudoku.assign_by_user(0, 3, 5).unwrap();

        // Changing the first 5 to a 2 legalizes the second 5.
        sudoku.assign_by_user(0, 0, 2).unwrap();

        assert!(!sudoku.has_conflicts());
        assert_eq!(Some(5), sudoku.value_at(0, 3).unwrap());
        assert_eq!(Some(2), sudoku.value_at(0, 0).unwrap());
    }

    #[test]
    fn reconciliation_keeps_flags_on_other_axes() {
        let mut sudoku = empty_sudoku();
        sudoku.assign_by_user(0, 0, 5).unwrap();
        sudoku.assign_by_user(4, 3, 5).unwrap();

        // Collides with both earlier 5s: by row with (0, 0), by column with
        // (4, 3).
        sudoku.assign_by_user(0, 3, 5).unwrap();
        let flags = sudoku.conflicts[&(0, 3)];
        assert!(flags.row);
        assert!(flags.column);

        // Clearing (0, 0) only resolves the row collision.
        sudoku.clear_cell(0, 0).unwrap();
        let flags = sudoku.conflicts[&(0, 3)];
        assert!(!flags.row);
        assert!(flags.column);

        sudoku.clear_cell(4, 3).unwrap();
        assert!(!sudoku.has_conflicts());
    }

    #[test]
    fn user_cells_are_forgotten_when_emptied() {
        let mut sudoku = empty_sudoku();
        sudoku.assign_by_user(1, 2, 7).unwrap();
        assert_eq!(1, sudoku.user_cell_count());

        sudoku.assign_by_user(1, 2, 0).unwrap();
        assert_eq!(0, sudoku.user_cell_count());
        assert_eq!(None, sudoku.value_at(1, 2).unwrap());

        sudoku.assign_by_user(1, 2, 7).unwrap();
        sudoku.clear_cell(1, 2).unwrap();
        assert_eq!(0, sudoku.user_cell_count());
    }

    #[test]
    fn engine_rejects_invalid_input() {
        let mut sudoku = empty_sudoku();

        assert_eq!(Err(SudokuError::OutOfBounds),
            sudoku.assign_by_user(9, 0, 1));
        assert_eq!(Err(SudokuError::OutOfBounds), sudoku.clear_cell(0, 9));
        assert_eq!(Err(SudokuError::InvalidNumber),
            sudoku.assign_by_user(0, 0, 10));
        assert_eq!(Err(SudokuError::OutOfBounds), sudoku.value_at(9, 9));
    }

    #[test]
    fn win_requires_enough_user_cells_and_no_conflicts() {
        let mut generator =
            Generator::new(ChaCha8Rng::seed_from_u64(7));
        let sudoku = generator.generate(3).unwrap();

        let open_cells: Vec<(usize, usize)> = (0..9)
            .flat_map(|row| (0..9).map(move |column| (row, column)))
            .filter(|&(row, column)|
                sudoku.value_at(row, column).unwrap().is_none())
            .collect();
        assert_eq!(3, open_cells.len());

        // Look up the intended digits by solving a clone.
        let mut solved = sudoku.clone();
        assert_eq!(SolveStatus::Solved, solved.solve_to_completion());

        let mut played = sudoku.clone();

        for &(row, column) in &open_cells {
            assert!(!played.is_win());
            let digit = solved.value_at(row, column).unwrap().unwrap();
            played.assign_by_user(row, column, digit).unwrap();
        }

        assert!(played.is_win());
        assert!(!played.has_conflicts());

        // Entering a duplicate instead spoils the win.
        let mut misplayed = sudoku.clone();
        let (row, column) = open_cells[0];
        let duplicate = (0..9)
            .filter_map(|c| misplayed.value_at(row, c).unwrap())
            .next()
            .unwrap();
        misplayed.assign_by_user(row, column, duplicate).unwrap();

        for &(row, column) in &open_cells[1..] {
            let digit = solved.value_at(row, column).unwrap().unwrap();
            misplayed.assign_by_user(row, column, digit).unwrap();
        }

        assert!(misplayed.has_conflicts());
        assert!(!misplayed.is_win());
    }

    #[test]
    fn generated_puzzle_with_no_empty_cells_is_immediately_won() {
        let mut generator =
            Generator::new(ChaCha8Rng::seed_from_u64(3));
        let mut sudoku = generator.generate(0).unwrap();

        assert!(sudoku.grid().is_full());
        assert!(sudoku.is_win());
        assert_eq!(SolveStatus::Solved, sudoku.step());
    }

    #[test]
    fn display_draws_grid_lines() {
        let mut grid = SudokuGrid::new();
        grid.set_cell(0, 0, 8).unwrap();

        let rendered = format!("{}", grid);
        let lines: Vec<&str> = rendered.lines().collect();

        // One separator line before each of the 9 content rows, plus the
        // bottom border.
        assert_eq!(19, lines.len());
        assert!(lines[0].starts_with('╔'));
        assert!(lines[1].contains('8'));
        assert!(lines[18].starts_with('╚'));
    }
}
