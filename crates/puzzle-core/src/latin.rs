//! Randomized Latin-square construction shared by the row/column puzzles.

use rand::seq::SliceRandom;
use rand::Rng;

/// Fill an `n`×`n` grid so that each row and column is a permutation of
/// `1..=n`, picking candidate values in shuffled order and backtracking on
/// dead ends. For the small sizes used here (n ≤ 6) this always succeeds.
pub fn random_latin_square<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<Vec<u8>> {
    let mut grid = vec![vec![0u8; n]; n];
    fill_from(&mut grid, n, 0, rng);
    grid
}

fn fill_from<R: Rng + ?Sized>(grid: &mut [Vec<u8>], n: usize, idx: usize, rng: &mut R) -> bool {
    if idx == n * n {
        return true;
    }
    let (r, c) = (idx / n, idx % n);

    let mut values: Vec<u8> = (1..=n as u8)
        .filter(|&v| !grid[r][..c].contains(&v) && !grid[..r].iter().any(|row| row[c] == v))
        .collect();
    values.shuffle(rng);

    for v in values {
        grid[r][c] = v;
        if fill_from(grid, n, idx + 1, rng) {
            return true;
        }
        grid[r][c] = 0;
    }
    false
}

/// True if each row and column of `grid` is a permutation of `1..=n`.
pub fn is_latin_square(grid: &[Vec<u8>]) -> bool {
    let n = grid.len();
    for i in 0..n {
        if grid[i].len() != n {
            return false;
        }
        let mut row_seen = vec![false; n];
        let mut col_seen = vec![false; n];
        for j in 0..n {
            for (seen, v) in [(&mut row_seen, grid[i][j]), (&mut col_seen, grid[j][i])] {
                let v = v as usize;
                if v == 0 || v > n || seen[v - 1] {
                    return false;
                }
                seen[v - 1] = true;
            }
        }
    }
    true
}
