//! 3×3 symbol arithmetic puzzle.
//!
//! Nine cells hold five or six distinct shapes standing for distinct digits
//! 1..=9. Each row and column reads as a three-term expression with the
//! usual operator precedence, and only the results are printed. Division
//! must be exact at every step, so the equations stay in the integers.

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attempt::Outcome;

const MAX_ATTEMPTS: usize = 3000;
/// Results must stay printable in a narrow column.
const RESULT_LIMIT: i32 = 999;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    fn precedence(self) -> u8 {
        match self {
            Op::Add | Op::Sub => 1,
            Op::Mul | Op::Div => 2,
        }
    }

    /// Exact integer application; `None` when division does not divide.
    fn apply(self, a: i32, b: i32) -> Option<i32> {
        match self {
            Op::Add => Some(a + b),
            Op::Sub => Some(a - b),
            Op::Mul => Some(a * b),
            Op::Div => {
                if b != 0 && a % b == 0 {
                    Some(a / b)
                } else {
                    None
                }
            }
        }
    }
}

/// Evaluate `a op1 b op2 c` with multiplication and division binding
/// tighter than addition and subtraction.
pub fn eval(a: i32, b: i32, c: i32, op1: Op, op2: Op) -> Option<i32> {
    if op2.precedence() > op1.precedence() {
        let middle = op2.apply(b, c)?;
        op1.apply(a, middle)
    } else {
        let left = op1.apply(a, b)?;
        op2.apply(left, c)
    }
}

/// An accepted puzzle. `symbol_indices` maps the nine cells (row-major) to
/// entries of `values`; the shapes drawn for those entries are a rendering
/// concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub num_symbols: usize,
    pub values: Vec<u8>,
    pub symbol_indices: [usize; 9],
    pub row_ops: [[Op; 2]; 3],
    pub col_ops: [[Op; 2]; 3],
    pub row_results: [i32; 3],
    pub col_results: [i32; 3],
}

impl Puzzle {
    pub fn cell_value(&self, row: usize, col: usize) -> u8 {
        self.values[self.symbol_indices[row * 3 + col]]
    }
}

fn random_values<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<u8> {
    let mut digits: Vec<u8> = (1..=9).collect();
    digits.shuffle(rng);
    digits.truncate(count);
    digits
}

/// Assign each of `num_symbols` symbols to the nine cells, every symbol at
/// least once and at most twice, then shuffle the placement.
fn random_symbol_indices<R: Rng + ?Sized>(num_symbols: usize, rng: &mut R) -> [usize; 9] {
    let mut counts = vec![1usize; num_symbols];
    let mut filled = num_symbols;
    while filled < 9 {
        let idx = rng.gen_range(0..num_symbols);
        if counts[idx] < 2 {
            counts[idx] += 1;
            filled += 1;
        }
    }

    let mut arr: Vec<usize> = counts
        .iter()
        .enumerate()
        .flat_map(|(i, &c)| std::iter::repeat(i).take(c))
        .collect();
    arr.shuffle(rng);
    arr.try_into().expect("nine cells")
}

/// Three equal symbols in a row or column give the line away.
fn has_triple(indices: &[usize; 9]) -> bool {
    for r in 0..3 {
        if indices[r * 3] == indices[r * 3 + 1] && indices[r * 3 + 1] == indices[r * 3 + 2] {
            return true;
        }
    }
    for c in 0..3 {
        if indices[c] == indices[c + 3] && indices[c + 3] == indices[c + 6] {
            return true;
        }
    }
    false
}

/// Two lines with the same symbol pattern and the same operators would be
/// the same printed equation twice.
fn has_duplicate_equation(lines: &[([usize; 3], [Op; 2])]) -> bool {
    for i in 0..lines.len() {
        for j in i + 1..lines.len() {
            if lines[i] == lines[j] {
                return true;
            }
        }
    }
    false
}

fn attempt<R: Rng + ?Sized>(rng: &mut R) -> Option<Puzzle> {
    let num_symbols = rng.gen_range(5..=6);
    let values = random_values(num_symbols, rng);
    let symbol_indices = random_symbol_indices(num_symbols, rng);

    if has_triple(&symbol_indices) {
        return None;
    }

    let mut row_ops = [[Op::Add; 2]; 3];
    let mut row_results = [0i32; 3];
    let mut row_lines = Vec::with_capacity(3);
    for r in 0..3 {
        let op1 = *Op::ALL.choose(rng).unwrap();
        let op2 = *Op::ALL.choose(rng).unwrap();
        let idx = [symbol_indices[r * 3], symbol_indices[r * 3 + 1], symbol_indices[r * 3 + 2]];
        let v: Vec<i32> = idx.iter().map(|&i| values[i] as i32).collect();
        let res = eval(v[0], v[1], v[2], op1, op2)?;
        if res == 0 || res.abs() > RESULT_LIMIT {
            return None;
        }
        row_ops[r] = [op1, op2];
        row_results[r] = res;
        row_lines.push((idx, [op1, op2]));
    }

    let mut col_ops = [[Op::Add; 2]; 3];
    let mut col_results = [0i32; 3];
    let mut col_lines = Vec::with_capacity(3);
    for c in 0..3 {
        let op1 = *Op::ALL.choose(rng).unwrap();
        let op2 = *Op::ALL.choose(rng).unwrap();
        let idx = [symbol_indices[c], symbol_indices[c + 3], symbol_indices[c + 6]];
        let v: Vec<i32> = idx.iter().map(|&i| values[i] as i32).collect();
        let res = eval(v[0], v[1], v[2], op1, op2)?;
        if res == 0 || res.abs() > RESULT_LIMIT {
            return None;
        }
        col_ops[c] = [op1, op2];
        col_results[c] = res;
        col_lines.push((idx, [op1, op2]));
    }

    // Repeated results or repeated equations make lines interchangeable.
    if row_results[0] == row_results[1]
        || row_results[0] == row_results[2]
        || row_results[1] == row_results[2]
        || col_results[0] == col_results[1]
        || col_results[0] == col_results[2]
        || col_results[1] == col_results[2]
    {
        return None;
    }
    if has_duplicate_equation(&row_lines) || has_duplicate_equation(&col_lines) {
        return None;
    }

    Some(Puzzle {
        num_symbols,
        values,
        symbol_indices,
        row_ops,
        col_ops,
        row_results,
        col_results,
    })
}

/// A known-good puzzle used only when random search exhausts its budget.
fn fallback() -> Puzzle {
    Puzzle {
        num_symbols: 5,
        values: vec![1, 2, 3, 4, 5],
        symbol_indices: [0, 1, 2, 1, 2, 3, 2, 3, 4],
        row_ops: [[Op::Add, Op::Add], [Op::Add, Op::Mul], [Op::Mul, Op::Sub]],
        col_ops: [[Op::Add, Op::Add], [Op::Mul, Op::Sub], [Op::Sub, Op::Add]],
        row_results: [6, 14, 7],
        col_results: [6, 2, 4],
    }
}

/// Generate a symbol arithmetic puzzle, falling back to a fixed degraded
/// sheet if no candidate survives the filters within the attempt budget.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Outcome<Puzzle> {
    match crate::attempt::run(MAX_ATTEMPTS, rng, attempt) {
        Some((puzzle, attempts)) => {
            debug!("calc puzzle accepted on attempt {}", attempts);
            Outcome::Valid(puzzle)
        }
        None => {
            warn!(
                "no calc puzzle in {} attempts; using fixed fallback",
                MAX_ATTEMPTS
            );
            Outcome::Degraded(fallback())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn precedence_and_exact_division() {
        assert_eq!(eval(2, 3, 4, Op::Add, Op::Mul), Some(14));
        assert_eq!(eval(2, 3, 4, Op::Mul, Op::Add), Some(10));
        assert_eq!(eval(8, 4, 2, Op::Div, Op::Div), Some(1));
        assert_eq!(eval(1, 8, 4, Op::Add, Op::Div), Some(3));
        assert_eq!(eval(7, 2, 0, Op::Div, Op::Add), None);
        assert_eq!(eval(6, 4, 2, Op::Div, Op::Mul), None);
        assert_eq!(eval(9, 3, 3, Op::Sub, Op::Sub), Some(3));
    }

    #[test]
    fn symbol_indices_respect_count_bounds() {
        let mut rng = StdRng::seed_from_u64(5);
        for num_symbols in [5, 6] {
            for _ in 0..50 {
                let indices = random_symbol_indices(num_symbols, &mut rng);
                let mut counts = vec![0usize; num_symbols];
                for &i in &indices {
                    counts[i] += 1;
                }
                assert!(counts.iter().all(|&c| (1..=2).contains(&c)));
            }
        }
    }

    #[test]
    fn triple_detection() {
        assert!(has_triple(&[0, 0, 0, 1, 2, 3, 4, 1, 2]));
        assert!(has_triple(&[1, 0, 2, 1, 3, 4, 1, 2, 0]));
        assert!(!has_triple(&[0, 1, 2, 1, 2, 3, 2, 3, 4]));
    }

    #[test]
    fn generated_equations_hold() {
        let mut rng = StdRng::seed_from_u64(77);
        let outcome = generate(&mut rng);
        assert!(!outcome.is_degraded());
        let p = outcome.into_inner();

        assert!((5..=6).contains(&p.num_symbols));
        assert_eq!(p.values.len(), p.num_symbols);
        let mut sorted = p.values.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), p.num_symbols, "values must be distinct");

        for r in 0..3 {
            let v: Vec<i32> = (0..3).map(|c| p.cell_value(r, c) as i32).collect();
            let res = eval(v[0], v[1], v[2], p.row_ops[r][0], p.row_ops[r][1]);
            assert_eq!(res, Some(p.row_results[r]));
            assert_ne!(p.row_results[r], 0);
        }
        for c in 0..3 {
            let v: Vec<i32> = (0..3).map(|r| p.cell_value(r, c) as i32).collect();
            let res = eval(v[0], v[1], v[2], p.col_ops[c][0], p.col_ops[c][1]);
            assert_eq!(res, Some(p.col_results[c]));
            assert_ne!(p.col_results[c], 0);
        }
    }

    #[test]
    fn fallback_equations_hold() {
        let p = fallback();
        for r in 0..3 {
            let v: Vec<i32> = (0..3).map(|c| p.cell_value(r, c) as i32).collect();
            assert_eq!(
                eval(v[0], v[1], v[2], p.row_ops[r][0], p.row_ops[r][1]),
                Some(p.row_results[r])
            );
        }
        for c in 0..3 {
            let v: Vec<i32> = (0..3).map(|r| p.cell_value(r, c) as i32).collect();
            assert_eq!(
                eval(v[0], v[1], v[2], p.col_ops[c][0], p.col_ops[c][1]),
                Some(p.col_results[c])
            );
        }
    }
}
