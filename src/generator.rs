//! This module contains logic for generating random Sudoku puzzles.
//!
//! Generation is done by seeding a grid with a shuffled row and a shifted
//! copy of it, completing the grid with the step-wise search and then
//! clearing the requested number of cells. See [Generator::generate] for
//! details.

use crate::{Sudoku, SudokuGrid};
use crate::error::{SudokuError, SudokuResult};
use crate::solver::SolveStatus;

use rand::Rng;
use rand::rngs::ThreadRng;

use std::collections::HashSet;

/// A generator randomly generates a [Sudoku] puzzle: a full, valid grid from
/// which a requested number of cells has been cleared again. It uses a random
/// number generator to decide the content. For most cases, sensible defaults
/// are provided by [Generator::new_default].
pub struct Generator<R: Rng> {
    rng: R
}

impl Generator<ThreadRng> {

    /// Creates a new generator that uses a [ThreadRng] to generate the random
    /// digits.
    pub fn new_default() -> Generator<ThreadRng> {
        Generator::new(rand::thread_rng())
    }
}

fn shuffle<T>(rng: &mut impl Rng, values: impl Iterator<Item = T>) -> Vec<T> {
    let mut vec: Vec<T> = values.collect();
    let len = vec.len();

    for i in 0..(len - 1) {
        let j = rng.gen_range(i..len);
        vec.swap(i, j);
    }

    vec
}

impl<R: Rng> Generator<R> {

    /// Creates a new generator that uses the given random number generator to
    /// generate random digits.
    pub fn new(rng: R) -> Generator<R> {
        Generator {
            rng
        }
    }

    /// Generates a new random [Sudoku] puzzle with the given number of empty
    /// cells. The procedure is:
    ///
    /// 1. A random permutation of the digits 1 to 9 is placed, unmodified, as
    /// a row at a random index in `[3, 8]`.
    /// 2. A cyclically shifted copy of that row (shifted by a random offset
    /// in `[1, 8]`) is placed as row 0. The two rows never collide, and
    /// starting from them reduces the backtracking depth considerably
    /// compared to an empty grid.
    /// 3. The step-wise search completes the seeded grid into a full, valid
    /// grid.
    /// 4. `empty_cells` distinct cells, drawn uniformly at random, are
    /// cleared again, and the engine is remapped so exactly those cells
    /// become the open cells of the puzzle.
    ///
    /// # Arguments
    ///
    /// * `empty_cells`: The number of cells to leave empty. Must be at most
    /// 81.
    ///
    /// # Errors
    ///
    /// * `SudokuError::TooManyEmptyCells` If `empty_cells` exceeds 81.
    /// * `SudokuError::UnsatisfiableGrid` If the search cannot complete the
    /// seeded grid. The seeds produced here are always completable, so this
    /// indicates a defect rather than bad luck.
    pub fn generate(&mut self, empty_cells: usize) -> SudokuResult<Sudoku> {
        if empty_cells > 81 {
            return Err(SudokuError::TooManyEmptyCells);
        }

        let seed_row = shuffle(&mut self.rng, 1..=9);
        let mut grid = SudokuGrid::new();
        let seed_index = self.rng.gen_range(3..9);
        let shift = self.rng.gen_range(1..9);

        for (column, &digit) in seed_row.iter().enumerate() {
            grid.set_cell(seed_index, column, digit).unwrap();
            grid.set_cell(0, column, seed_row[(column + shift) % 9]).unwrap();
        }

        let mut sudoku = Sudoku::with_grid(grid, empty_cells);

        if sudoku.solve_to_completion() != SolveStatus::Solved {
            return Err(SudokuError::UnsatisfiableGrid);
        }

        let mut cleared: HashSet<(usize, usize)> = HashSet::new();

        while cleared.len() < empty_cells {
            let row = self.rng.gen_range(0..9);
            let column = self.rng.gen_range(0..9);

            if cleared.insert((row, column)) {
                sudoku.clear_cell(row, column).unwrap();
            }
        }

        sudoku.remap();
        Ok(sudoku)
    }
}
