//! 6×6 sum puzzle: circle cells so that the circled values in every row
//! and column add up to the printed targets. The solution mask is chosen
//! first with per-line count bounds, then random grids are tried against
//! it until an exhaustive solver confirms exactly one selection works.

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attempt::GenerateError;

pub const SIZE: usize = 6;

/// Circled cells per row and per column.
const MIN_PER_LINE: usize = 2;
const MAX_PER_LINE: usize = 4;

const MAX_ATTEMPTS: usize = 100;
/// Grids tried against one solution mask before starting over.
const GRID_ATTEMPTS: usize = 30;

pub type Grid = [[u8; SIZE]; SIZE];
pub type Mask = [[bool; SIZE]; SIZE];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub grid: Grid,
    pub row_targets: [u32; SIZE],
    pub col_targets: [u32; SIZE],
    pub solution: Mask,
}

// ==================== uniqueness solver ====================

struct Solver<'a> {
    grid: &'a Grid,
    row_targets: &'a [u32; SIZE],
    col_targets: &'a [u32; SIZE],
    row_sums: [u32; SIZE],
    col_sums: [u32; SIZE],
    solutions: usize,
}

impl Solver<'_> {
    fn backtrack(&mut self, row: usize, col: usize) {
        if self.solutions >= 2 {
            return;
        }
        if row == SIZE {
            let exact = (0..SIZE).all(|i| {
                self.row_sums[i] == self.row_targets[i] && self.col_sums[i] == self.col_targets[i]
            });
            if exact {
                self.solutions += 1;
            }
            return;
        }

        let (next_row, next_col) = if col == SIZE - 1 {
            (row + 1, 0)
        } else {
            (row, col + 1)
        };
        let value = self.grid[row][col] as u32;

        // Skip this cell, unless the line can no longer reach its target.
        if self.row_sums[row] <= self.row_targets[row]
            && self.col_sums[col] <= self.col_targets[col]
        {
            let row_headroom = self.row_sums[row] + (SIZE - col - 1) as u32 * 9;
            let col_headroom = self.col_sums[col] + (SIZE - row - 1) as u32 * 9;
            if row_headroom >= self.row_targets[row] && col_headroom >= self.col_targets[col] {
                self.backtrack(next_row, next_col);
                if self.solutions >= 2 {
                    return;
                }
            }
        }

        // Circle this cell.
        if self.row_sums[row] + value <= self.row_targets[row]
            && self.col_sums[col] + value <= self.col_targets[col]
        {
            self.row_sums[row] += value;
            self.col_sums[col] += value;
            self.backtrack(next_row, next_col);
            self.row_sums[row] -= value;
            self.col_sums[col] -= value;
        }
    }
}

/// Count selections matching the targets, stopping at two.
pub fn count_solutions(grid: &Grid, row_targets: &[u32; SIZE], col_targets: &[u32; SIZE]) -> usize {
    let mut solver = Solver {
        grid,
        row_targets,
        col_targets,
        row_sums: [0; SIZE],
        col_sums: [0; SIZE],
        solutions: 0,
    };
    solver.backtrack(0, 0);
    solver.solutions
}

// ==================== generation ====================

/// Pick a selection mask with 2..=4 circles per row and per column, by
/// fixing row counts, splitting the total over column quotas, and filling
/// rows greedily into columns with remaining quota.
fn random_mask<R: Rng + ?Sized>(rng: &mut R) -> Option<Mask> {
    let row_counts: Vec<usize> =
        (0..SIZE).map(|_| rng.gen_range(MIN_PER_LINE..=MAX_PER_LINE)).collect();
    let total: usize = row_counts.iter().sum();

    let mut col_quotas = Vec::with_capacity(SIZE);
    let mut remaining = total;
    for j in 0..SIZE - 1 {
        let cols_left = SIZE - j - 1;
        let lo = MIN_PER_LINE.max(remaining.saturating_sub(cols_left * MAX_PER_LINE));
        let hi = MAX_PER_LINE.min(remaining - cols_left * MIN_PER_LINE);
        if lo > hi {
            return None;
        }
        let quota = rng.gen_range(lo..=hi);
        col_quotas.push(quota);
        remaining -= quota;
    }
    if !(MIN_PER_LINE..=MAX_PER_LINE).contains(&remaining) {
        return None;
    }
    col_quotas.push(remaining);

    let mut mask = [[false; SIZE]; SIZE];
    let mut col_counts = [0usize; SIZE];
    for (i, &needed) in row_counts.iter().enumerate() {
        let mut available: Vec<usize> =
            (0..SIZE).filter(|&j| col_counts[j] < col_quotas[j]).collect();
        if available.len() < needed {
            return None;
        }
        available.shuffle(rng);
        for &j in available.iter().take(needed) {
            mask[i][j] = true;
            col_counts[j] += 1;
        }
    }
    if col_counts.iter().zip(&col_quotas).any(|(&c, &q)| c != q) {
        return None;
    }

    Some(mask)
}

fn targets_for(grid: &Grid, mask: &Mask) -> ([u32; SIZE], [u32; SIZE]) {
    let mut rows = [0u32; SIZE];
    let mut cols = [0u32; SIZE];
    for i in 0..SIZE {
        for j in 0..SIZE {
            if mask[i][j] {
                rows[i] += grid[i][j] as u32;
                cols[j] += grid[i][j] as u32;
            }
        }
    }
    (rows, cols)
}

fn random_grid<R: Rng + ?Sized>(rng: &mut R) -> Grid {
    let mut grid = [[0u8; SIZE]; SIZE];
    for row in grid.iter_mut() {
        for v in row.iter_mut() {
            *v = rng.gen_range(1..=9);
        }
    }
    grid
}

/// Generate a puzzle whose targets admit exactly one selection.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Puzzle, GenerateError> {
    for attempt in 0..MAX_ATTEMPTS {
        let Some(mask) = random_mask(rng) else {
            continue;
        };
        for _ in 0..GRID_ATTEMPTS {
            let grid = random_grid(rng);
            let (row_targets, col_targets) = targets_for(&grid, &mask);
            if count_solutions(&grid, &row_targets, &col_targets) == 1 {
                debug!("sum puzzle accepted on attempt {}", attempt + 1);
                return Ok(Puzzle {
                    grid,
                    row_targets,
                    col_targets,
                    solution: mask,
                });
            }
        }
    }
    Err(GenerateError::Exhausted {
        attempts: MAX_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn masks_respect_line_bounds() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut produced = 0;
        for _ in 0..50 {
            let Some(mask) = random_mask(&mut rng) else {
                continue;
            };
            produced += 1;
            for i in 0..SIZE {
                let row = mask[i].iter().filter(|&&b| b).count();
                let col = (0..SIZE).filter(|&r| mask[r][i]).count();
                assert!((MIN_PER_LINE..=MAX_PER_LINE).contains(&row));
                assert!((MIN_PER_LINE..=MAX_PER_LINE).contains(&col));
            }
        }
        assert!(produced > 0);
    }

    #[test]
    fn solver_counts_known_cases() {
        // Uniform grid of ones: targets are plain cell counts, and many
        // selections reach them.
        let grid = [[1u8; SIZE]; SIZE];
        let row_targets = [2u32; SIZE];
        let col_targets = [2u32; SIZE];
        assert_eq!(count_solutions(&grid, &row_targets, &col_targets), 2);

        // Targets of zero force the empty selection.
        assert_eq!(count_solutions(&grid, &[0; SIZE], &[0; SIZE]), 1);

        // Unreachable targets have no selection at all.
        assert_eq!(count_solutions(&grid, &[55; SIZE], &[55; SIZE]), 0);
    }

    #[test]
    fn generated_puzzle_is_unique_and_consistent() {
        let mut rng = StdRng::seed_from_u64(123);
        let puzzle = generate(&mut rng).unwrap();

        let (rows, cols) = targets_for(&puzzle.grid, &puzzle.solution);
        assert_eq!(rows, puzzle.row_targets);
        assert_eq!(cols, puzzle.col_targets);

        assert_eq!(
            count_solutions(&puzzle.grid, &puzzle.row_targets, &puzzle.col_targets),
            1
        );

        for i in 0..SIZE {
            let row = puzzle.solution[i].iter().filter(|&&b| b).count();
            let col = (0..SIZE).filter(|&r| puzzle.solution[r][i]).count();
            assert!((MIN_PER_LINE..=MAX_PER_LINE).contains(&row));
            assert!((MIN_PER_LINE..=MAX_PER_LINE).contains(&col));
        }

        assert!(puzzle.grid.iter().flatten().all(|&v| (1..=9).contains(&v)));
    }
}
