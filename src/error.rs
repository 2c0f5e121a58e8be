//! This module contains some error and result definitions used in this crate.

use std::fmt::{self, Display, Formatter};
use std::num::ParseIntError;

/// Miscellaneous errors that can occur on some methods in the
/// [root module](../index.html). This does not exclude errors that occur when
/// parsing grids, see [SudokuParseError](enum.SudokuParseError.html) for
/// that.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SudokuError {

    /// Indicates that the specified coordinates (row and column) lie outside
    /// the Sudoku grid. This is the case if either of them is greater than or
    /// equal to 9.
    OutOfBounds,

    /// Indicates that some digit is invalid for a cell. This is the case if
    /// it is greater than 9. Note that 0 is accepted by the user-facing entry
    /// points, where it stands for emptying the cell.
    InvalidNumber,

    /// Indicates that a puzzle was requested with more empty cells than the
    /// grid has cells.
    TooManyEmptyCells,

    /// An error that is raised whenever the step-wise search is unable to
    /// complete a seeded grid during generation.
    UnsatisfiableGrid
}

impl Display for SudokuError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SudokuError::OutOfBounds =>
                write!(f, "cell coordinates out of bounds"),
            SudokuError::InvalidNumber =>
                write!(f, "invalid digit"),
            SudokuError::TooManyEmptyCells =>
                write!(f, "more empty cells requested than the grid has"),
            SudokuError::UnsatisfiableGrid =>
                write!(f, "seeded grid could not be completed")
        }
    }
}

/// Syntactic sugar for `Result<V, SudokuError>`.
pub type SudokuResult<V> = Result<V, SudokuError>;

/// An enumeration of the errors that may occur when parsing a
/// [SudokuGrid](../struct.SudokuGrid.html) code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SudokuParseError {

    /// Indicates that the number of cells (which are separated by commas)
    /// does not equal 81.
    WrongNumberOfCells,

    /// Indicates that one of the cell entries could not be parsed as a
    /// number.
    NumberFormatError,

    /// Indicates that a cell is filled with an invalid digit (0 or more than
    /// 9).
    InvalidNumber
}

impl Display for SudokuParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SudokuParseError::WrongNumberOfCells =>
                write!(f, "wrong number of cells"),
            SudokuParseError::NumberFormatError =>
                write!(f, "malformed cell entry"),
            SudokuParseError::InvalidNumber =>
                write!(f, "cell digit out of range")
        }
    }
}

impl From<ParseIntError> for SudokuParseError {
    fn from(_: ParseIntError) -> Self {
        SudokuParseError::NumberFormatError
    }
}

/// Syntactic sugar for `Result<V, SudokuParseError>`.
pub type SudokuParseResult<V> = Result<V, SudokuParseError>;
