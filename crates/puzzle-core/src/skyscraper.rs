//! Skyscraper (building) puzzle: a 4×4 Latin square where edge clues give
//! the number of buildings visible from that side, and the clue set is
//! greedily thinned while an exhaustive solver keeps proving uniqueness.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attempt::Outcome;
use crate::latin;

/// Grid size used by the printed sheet.
pub const SIZE: usize = 4;

const MAX_ATTEMPTS: usize = 300;

/// One clue position on the border of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];
}

/// Visibility counts for all four borders; `0` means "no clue here".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clues {
    pub top: Vec<u8>,
    pub bottom: Vec<u8>,
    pub left: Vec<u8>,
    pub right: Vec<u8>,
}

impl Clues {
    pub fn get(&self, side: Side, idx: usize) -> u8 {
        match side {
            Side::Top => self.top[idx],
            Side::Bottom => self.bottom[idx],
            Side::Left => self.left[idx],
            Side::Right => self.right[idx],
        }
    }

    pub fn set(&mut self, side: Side, idx: usize, value: u8) {
        match side {
            Side::Top => self.top[idx] = value,
            Side::Bottom => self.bottom[idx] = value,
            Side::Left => self.left[idx] = value,
            Side::Right => self.right[idx] = value,
        }
    }

    /// Number of nonzero clues over all four sides.
    pub fn count(&self) -> usize {
        [&self.top, &self.bottom, &self.left, &self.right]
            .iter()
            .map(|side| side.iter().filter(|&&c| c > 0).count())
            .sum()
    }
}

/// A finished puzzle: border clues plus the unique solution grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub n: usize,
    pub clues: Clues,
    pub solution: Vec<Vec<u8>>,
}

/// Number of strictly increasing running maxima, i.e. how many buildings
/// are visible looking along `heights` from its first element.
pub fn visible_count(heights: &[u8]) -> u8 {
    let mut count = 0;
    let mut tallest = 0;
    for &h in heights {
        if h > tallest {
            tallest = h;
            count += 1;
        }
    }
    count
}

/// Recompute the full clue set from a solved grid. Pure and deterministic.
pub fn compute_clues(grid: &[Vec<u8>]) -> Clues {
    let n = grid.len();
    let mut clues = Clues {
        top: vec![0; n],
        bottom: vec![0; n],
        left: vec![0; n],
        right: vec![0; n],
    };
    for r in 0..n {
        let mut row = grid[r].clone();
        clues.left[r] = visible_count(&row);
        row.reverse();
        clues.right[r] = visible_count(&row);
    }
    for c in 0..n {
        let mut col: Vec<u8> = (0..n).map(|r| grid[r][c]).collect();
        clues.top[c] = visible_count(&col);
        col.reverse();
        clues.bottom[c] = visible_count(&col);
    }
    clues
}

struct Search<'a> {
    n: usize,
    clues: &'a Clues,
    grid: Vec<Vec<u8>>,
    possible: Vec<Vec<u16>>,
    max_solutions: usize,
    solutions: Vec<Vec<Vec<u8>>>,
}

impl<'a> Search<'a> {
    fn new(n: usize, clues: &'a Clues, max_solutions: usize) -> Self {
        let all = (1u16 << n) - 1;
        let mut search = Search {
            n,
            clues,
            grid: vec![vec![0; n]; n],
            possible: vec![vec![all; n]; n],
            max_solutions,
            solutions: Vec::new(),
        };
        search.seed_candidates();
        search
    }

    /// Forced deductions before any search: a clue of 1 pins the tallest
    /// building at the border cell, a clue of n forces the whole line to
    /// ascend away from it.
    fn seed_candidates(&mut self) {
        let n = self.n;
        let only = |v: usize| 1u16 << (v - 1);
        for i in 0..n {
            if self.clues.left[i] == 1 {
                self.possible[i][0] = only(n);
            }
            if self.clues.right[i] == 1 {
                self.possible[i][n - 1] = only(n);
            }
            if self.clues.top[i] == 1 {
                self.possible[0][i] = only(n);
            }
            if self.clues.bottom[i] == 1 {
                self.possible[n - 1][i] = only(n);
            }
            if self.clues.left[i] as usize == n {
                for j in 0..n {
                    self.possible[i][j] = only(j + 1);
                }
            }
            if self.clues.right[i] as usize == n {
                for j in 0..n {
                    self.possible[i][j] = only(n - j);
                }
            }
            if self.clues.top[i] as usize == n {
                for j in 0..n {
                    self.possible[j][i] = only(j + 1);
                }
            }
            if self.clues.bottom[i] as usize == n {
                for j in 0..n {
                    self.possible[j][i] = only(n - j);
                }
            }
        }
    }

    fn line_matches(&self, line: &[u8], forward: u8, backward: u8) -> bool {
        if forward > 0 && visible_count(line) != forward {
            return false;
        }
        if backward > 0 {
            let mut reversed = line.to_vec();
            reversed.reverse();
            if visible_count(&reversed) != backward {
                return false;
            }
        }
        true
    }

    fn solve_cell(&mut self, pos: usize) {
        if self.solutions.len() >= self.max_solutions {
            return;
        }
        let n = self.n;
        if pos == n * n {
            // Full assignment: verify every nonzero clue exactly.
            let check = compute_clues(&self.grid);
            for i in 0..n {
                for side in Side::ALL {
                    let want = self.clues.get(side, i);
                    if want > 0 && check.get(side, i) != want {
                        return;
                    }
                }
            }
            self.solutions.push(self.grid.clone());
            return;
        }

        let (r, c) = (pos / n, pos % n);
        let mut used = 0u16;
        for i in 0..n {
            if self.grid[r][i] > 0 {
                used |= 1 << (self.grid[r][i] - 1);
            }
            if self.grid[i][c] > 0 {
                used |= 1 << (self.grid[i][c] - 1);
            }
        }

        for v in 1..=n as u8 {
            let bit = 1u16 << (v - 1);
            if used & bit != 0 || self.possible[r][c] & bit == 0 {
                continue;
            }
            self.grid[r][c] = v;

            // Prune the moment a row or column is fully assigned.
            let mut valid = true;
            if c == n - 1 {
                let row = self.grid[r].clone();
                valid = self.line_matches(&row, self.clues.left[r], self.clues.right[r]);
            }
            if valid && r == n - 1 {
                let col: Vec<u8> = (0..n).map(|i| self.grid[i][c]).collect();
                valid = self.line_matches(&col, self.clues.top[c], self.clues.bottom[c]);
            }

            if valid {
                self.solve_cell(pos + 1);
            }
            self.grid[r][c] = 0;
        }
    }
}

/// Exhaustively enumerate grids consistent with the nonzero entries of
/// `clues`, stopping once `max_solutions` have been found.
pub fn solve(n: usize, clues: &Clues, max_solutions: usize) -> Vec<Vec<Vec<u8>>> {
    let mut search = Search::new(n, clues, max_solutions);
    search.solve_cell(0);
    search.solutions
}

/// Generate a puzzle whose thinned clue set still admits exactly one grid.
///
/// Clue removal is greedy and order-dependent on purpose: positions are
/// shuffled once and each is dropped only if the solver still reports a
/// unique solution without it. A candidate is accepted when the survivor
/// count is at most `2n`; after `MAX_ATTEMPTS` failures the full clue set
/// is returned as a degraded (trivially unique) puzzle.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Outcome<Puzzle> {
    let n = SIZE;
    let min_clues = (n + 2).max(n * 3 / 2 + 1);

    for attempt in 0..MAX_ATTEMPTS {
        let solution = latin::random_latin_square(n, rng);
        let full_clues = compute_clues(&solution);

        let mut clues = full_clues.clone();
        let mut positions: Vec<(Side, usize)> = (0..n)
            .flat_map(|i| Side::ALL.into_iter().map(move |side| (side, i)))
            .collect();
        positions.shuffle(rng);

        let mut remaining = n * 4;
        for (side, idx) in positions {
            if remaining <= min_clues {
                break;
            }
            let backup = clues.get(side, idx);
            if backup == 0 {
                continue;
            }
            clues.set(side, idx, 0);
            if solve(n, &clues, 2).len() == 1 {
                remaining -= 1;
            } else {
                clues.set(side, idx, backup);
            }
        }

        let final_check = solve(n, &clues, 2);
        if final_check.len() == 1 && clues.count() <= n * 2 {
            debug!(
                "skyscraper puzzle accepted after {} attempts with {} clues",
                attempt + 1,
                clues.count()
            );
            return Outcome::Valid(Puzzle {
                n,
                clues,
                solution: final_check.into_iter().next().unwrap(),
            });
        }
    }

    warn!(
        "skyscraper clue reduction failed in {} attempts; emitting full clue set",
        MAX_ATTEMPTS
    );
    let solution = latin::random_latin_square(n, rng);
    let clues = compute_clues(&solution);
    Outcome::Degraded(Puzzle { n, clues, solution })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn visible_count_running_maxima() {
        assert_eq!(visible_count(&[1, 2, 3, 4]), 4);
        assert_eq!(visible_count(&[4, 3, 2, 1]), 1);
        assert_eq!(visible_count(&[2, 1, 4, 3]), 2);
        assert_eq!(visible_count(&[3, 4, 1, 2]), 2);
        assert_eq!(visible_count(&[]), 0);
    }

    #[test]
    fn clue_recomputation_is_deterministic() {
        let grid = vec![
            vec![1, 2, 3, 4],
            vec![2, 3, 4, 1],
            vec![3, 4, 1, 2],
            vec![4, 1, 2, 3],
        ];
        let a = compute_clues(&grid);
        let b = compute_clues(&grid);
        assert_eq!(a, b);
        assert_eq!(a.left, vec![4, 3, 2, 1]);
        assert_eq!(a.top, vec![4, 3, 2, 1]);
    }

    #[test]
    fn full_clue_set_is_unique() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = latin::random_latin_square(4, &mut rng);
        let clues = compute_clues(&grid);
        let solutions = solve(4, &clues, 2);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0], grid);
    }

    #[test]
    fn zero_clues_admit_many_solutions() {
        let clues = Clues {
            top: vec![0; 4],
            bottom: vec![0; 4],
            left: vec![0; 4],
            right: vec![0; 4],
        };
        assert_eq!(solve(4, &clues, 2).len(), 2);
    }

    #[test]
    fn generated_puzzle_invariants() {
        let mut rng = StdRng::seed_from_u64(3);
        let outcome = generate(&mut rng);
        let puzzle = outcome.as_inner();

        assert!(latin::is_latin_square(&puzzle.solution));

        // Nonzero clues must match the solution exactly.
        let recomputed = compute_clues(&puzzle.solution);
        for i in 0..puzzle.n {
            for side in Side::ALL {
                let clue = puzzle.clues.get(side, i);
                if clue > 0 {
                    assert_eq!(clue, recomputed.get(side, i));
                }
            }
        }

        // The published clue set must pin down the published solution.
        let solutions = solve(puzzle.n, &puzzle.clues, 2);
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0], puzzle.solution);

        if !outcome.is_degraded() {
            assert!(puzzle.clues.count() <= puzzle.n * 2);
            assert!(puzzle.clues.count() >= (puzzle.n + 2).max(puzzle.n * 3 / 2 + 1) - 1);
        }
    }

    #[test]
    fn puzzle_serializes() {
        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = generate(&mut rng).into_inner();
        let json = serde_json::to_string(&puzzle).unwrap();
        let back: Puzzle = serde_json::from_str(&json).unwrap();
        assert_eq!(back, puzzle);
    }
}
