//! Countdown sheets: place +, −, ×, ÷ between four fixed digits to reach
//! each target from 5 down to 0.
//!
//! The digit quadruples come from a curated table; every entry is known to
//! reach all six targets, so generation is a plain table pick. The solver
//! still searches all 4³ operator choices per target so the answer sheet is
//! derived, not stored.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Targets in printed order, top row first.
pub const TARGETS: [u8; 6] = [5, 4, 3, 2, 1, 0];

/// Digit quadruples that reach every target in `TARGETS` with the digits
/// kept in order.
pub const PROBLEMS: [[u8; 4]; 100] = [
    [1, 1, 1, 2], [1, 1, 2, 1], [1, 1, 2, 2], [1, 2, 1, 1], [1, 2, 1, 2], [1, 2, 1, 3],
    [1, 2, 2, 1], [1, 2, 2, 3], [1, 2, 3, 1], [1, 2, 3, 2], [1, 2, 3, 3], [1, 2, 4, 1],
    [1, 2, 4, 3], [1, 2, 4, 4], [1, 2, 4, 6], [1, 2, 4, 8], [1, 2, 5, 5], [1, 2, 5, 6],
    [1, 2, 6, 4], [1, 2, 6, 7], [1, 2, 8, 4], [1, 3, 1, 1], [1, 3, 1, 2], [1, 3, 2, 1],
    [1, 3, 2, 4], [1, 4, 1, 2], [1, 4, 2, 1], [1, 4, 2, 2], [1, 6, 2, 4], [1, 6, 3, 1],
    [1, 8, 2, 4], [1, 8, 4, 1], [1, 8, 4, 2], [1, 9, 2, 6], [1, 9, 3, 2], [1, 9, 6, 2],
    [2, 1, 1, 1], [2, 1, 1, 2], [2, 1, 2, 1], [2, 1, 2, 2], [2, 1, 4, 3], [2, 1, 4, 6],
    [2, 1, 5, 5], [2, 1, 6, 7], [2, 2, 1, 1], [2, 2, 1, 2], [2, 2, 2, 2], [2, 3, 1, 2],
    [2, 3, 2, 1], [2, 3, 2, 2], [2, 3, 6, 1], [2, 4, 2, 1], [2, 4, 2, 3], [2, 4, 3, 1],
    [2, 4, 3, 2], [2, 4, 4, 2], [2, 4, 6, 2], [2, 4, 8, 1], [2, 5, 4, 1], [2, 5, 6, 1],
    [2, 5, 6, 2], [2, 6, 3, 1], [2, 6, 7, 1], [2, 8, 4, 1], [3, 1, 1, 2], [3, 1, 2, 1],
    [3, 1, 2, 2], [3, 2, 1, 1], [3, 2, 1, 2], [3, 2, 2, 1], [3, 2, 3, 2], [3, 2, 4, 1],
    [3, 4, 2, 3], [3, 5, 6, 2], [3, 6, 2, 4], [3, 6, 8, 1], [4, 2, 2, 4], [4, 2, 3, 2],
    [4, 2, 4, 2], [4, 2, 4, 4], [4, 3, 2, 2], [4, 4, 2, 2], [6, 2, 3, 1], [6, 2, 4, 1],
    [6, 2, 4, 3], [6, 3, 1, 1], [6, 3, 1, 2], [6, 3, 2, 1], [6, 6, 3, 3], [8, 1, 2, 4],
    [8, 1, 4, 2], [8, 2, 1, 4], [8, 2, 4, 1], [9, 1, 2, 6], [9, 1, 6, 2], [9, 2, 1, 6],
    [9, 2, 6, 1], [9, 3, 1, 2], [9, 3, 2, 1], [9, 3, 2, 4],
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Search order; the first matching operator triple wins, so this
    /// order is part of the answer-sheet contract.
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    /// The typographic symbol printed on the answer sheet.
    pub fn symbol(self) -> char {
        match self {
            Op::Add => '+',
            Op::Sub => '−',
            Op::Mul => '×',
            Op::Div => '÷',
        }
    }
}

/// Evaluate the expression with × and ÷ binding tighter than + and −.
/// Division is exact real division; `None` on division by zero.
fn eval(numbers: [u8; 4], ops: [Op; 3]) -> Option<f64> {
    // Fold ×/÷ into running terms, then sum the terms.
    let mut total = 0.0f64;
    let mut term = numbers[0] as f64;
    let mut term_sign = 1.0f64;

    for (op, &num) in ops.iter().zip(&numbers[1..]) {
        let value = num as f64;
        match op {
            Op::Mul => term *= value,
            Op::Div => {
                if value == 0.0 {
                    return None;
                }
                term /= value;
            }
            Op::Add => {
                total += term_sign * term;
                term = value;
                term_sign = 1.0;
            }
            Op::Sub => {
                total += term_sign * term;
                term = value;
                term_sign = -1.0;
            }
        }
    }
    Some(total + term_sign * term)
}

/// Search the 64 operator triples for one reaching `target`, tolerating
/// floating-point dust from the divisions.
pub fn find_solution(numbers: [u8; 4], target: u8) -> Option<[Op; 3]> {
    for a in Op::ALL {
        for b in Op::ALL {
            for c in Op::ALL {
                if let Some(value) = eval(numbers, [a, b, c]) {
                    if (value - target as f64).abs() < 1e-9 {
                        return Some([a, b, c]);
                    }
                }
            }
        }
    }
    None
}

/// A sheet: four digits and one solution per target, in `TARGETS` order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub numbers: [u8; 4],
    pub solutions: [Option<[Op; 3]>; 6],
}

/// Pick a quadruple from the table and solve it for every target.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Puzzle {
    let numbers = *PROBLEMS.choose(rng).expect("table is non-empty");
    let mut solutions = [None; 6];
    for (slot, &target) in TARGETS.iter().enumerate() {
        solutions[slot] = find_solution(numbers, target);
    }
    Puzzle { numbers, solutions }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn precedence_over_left_to_right() {
        // 1 + 2 × 3 − 4 = 3, not 5.
        assert_eq!(eval([1, 2, 3, 4], [Op::Add, Op::Mul, Op::Sub]), Some(3.0));
        // 8 ÷ 2 ÷ 2 + 1 = 3.
        assert_eq!(eval([8, 2, 2, 1], [Op::Div, Op::Div, Op::Add]), Some(3.0));
        assert_eq!(eval([1, 2, 0, 3], [Op::Add, Op::Div, Op::Add]), None);
    }

    #[test]
    fn fractional_intermediates_are_allowed() {
        // 1 ÷ 2 × 4 + 3 = 5 passes through 0.5.
        assert_eq!(eval([1, 2, 4, 3], [Op::Div, Op::Mul, Op::Add]), Some(5.0));
        // 2 ÷ 4 + 1 ÷ 2 = 1 only works with real division.
        assert_eq!(eval([2, 4, 1, 2], [Op::Div, Op::Add, Op::Div]), Some(1.0));
        assert!(find_solution([1, 2, 4, 3], 5).is_some());
    }

    #[test]
    fn every_table_entry_reaches_every_target() {
        for numbers in PROBLEMS {
            for target in TARGETS {
                assert!(
                    find_solution(numbers, target).is_some(),
                    "{:?} cannot reach {}",
                    numbers,
                    target
                );
            }
        }
    }

    #[test]
    fn generated_sheet_is_fully_solved() {
        let mut rng = StdRng::seed_from_u64(12);
        let puzzle = generate(&mut rng);
        assert!(PROBLEMS.contains(&puzzle.numbers));
        for (slot, &target) in TARGETS.iter().enumerate() {
            let ops = puzzle.solutions[slot].expect("table entries solve all targets");
            let value = eval(puzzle.numbers, ops).unwrap();
            assert!((value - target as f64).abs() < 1e-9);
        }
    }
}
