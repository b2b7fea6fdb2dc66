//! Long-multiplication cryptarithm in mini format: a 3-digit multiplicand
//! times a 2-digit multiplier, with the three most frequent digits replaced
//! by shapes. The remaining visible digits are capped at four in total and
//! one per row, and only worksheets with a unique shape assignment pass.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attempt::GenerateError;

/// Distinct shapes available for masking; rendering assigns the glyphs.
pub const SYMBOL_COUNT: usize = 3;

const MULTIPLICAND_DIGITS: u32 = 3;
const MULTIPLIER_DIGITS: usize = 2;
const MAX_CONFIRMED_TOTAL: usize = 4;
const MAX_ATTEMPTS: usize = 1000;
/// Candidates sampled per attempt before the uniqueness pass.
const BATCH_SIZE: usize = 50;

/// One printed character cell: a visible digit or a masking shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    Digit(u8),
    Symbol(usize),
}

/// The masked worksheet rows, most significant digit first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rows {
    pub multiplicand: Vec<Cell>,
    pub multiplier: Vec<Cell>,
    pub partials: Vec<Vec<Cell>>,
    pub result: Vec<Cell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub multiplicand: u32,
    pub multiplier: u32,
    pub partials: Vec<u32>,
    pub result: u32,
    pub rows: Rows,
    /// Digit each shape stands for, by shape index.
    pub mapping: Vec<u8>,
}

fn digits_of(mut n: u32) -> Vec<u8> {
    let mut out = Vec::new();
    loop {
        out.push((n % 10) as u8);
        n /= 10;
        if n == 0 {
            break;
        }
    }
    out.reverse();
    out
}

/// Partial products in worksheet order, lowest multiplier digit first.
fn partial_products(a: u32, b: u32) -> Vec<u32> {
    let mut digits = digits_of(b);
    digits.reverse();
    digits.into_iter().map(|d| a * d as u32).collect()
}

/// The three digits to mask: most frequent across the whole worksheet,
/// ties broken by first appearance.
fn top_digits(calc_digits: &[u8]) -> Vec<u8> {
    let mut counts = [0usize; 10];
    let mut first_seen: Vec<u8> = Vec::new();
    for &d in calc_digits {
        if counts[d as usize] == 0 {
            first_seen.push(d);
        }
        counts[d as usize] += 1;
    }
    let mut order = first_seen;
    order.sort_by_key(|&d| std::cmp::Reverse(counts[d as usize]));
    order.truncate(SYMBOL_COUNT);
    order
}

fn mask_number(n: u32, masked: &[u8]) -> Vec<Cell> {
    digits_of(n)
        .into_iter()
        .map(|d| match masked.iter().position(|&m| m == d) {
            Some(idx) => Cell::Symbol(idx),
            None => Cell::Digit(d),
        })
        .collect()
}

fn all_rows(rows: &Rows) -> impl Iterator<Item = &Vec<Cell>> {
    [&rows.multiplicand, &rows.multiplier, &rows.result]
        .into_iter()
        .chain(rows.partials.iter())
}

fn confirmed_in_row(row: &[Cell]) -> usize {
    row.iter().filter(|c| matches!(c, Cell::Digit(_))).count()
}

fn confirmed_total(rows: &Rows) -> usize {
    all_rows(rows).map(|row| confirmed_in_row(row)).sum()
}

fn row_value(row: &[Cell], assignment: &[u8]) -> u64 {
    row.iter().fold(0u64, |acc, cell| {
        let digit = match cell {
            Cell::Digit(d) => *d,
            Cell::Symbol(idx) => assignment[*idx],
        };
        acc * 10 + digit as u64
    })
}

/// Does assigning `assignment[i]` to shape `i` make the worksheet a valid
/// long multiplication? Leading zeros are tolerated; the row-value check
/// is what the solver on paper verifies.
fn verify(rows: &Rows, assignment: &[u8]) -> bool {
    let a = row_value(&rows.multiplicand, assignment);
    let b = row_value(&rows.multiplier, assignment);
    let result = row_value(&rows.result, assignment);
    if a * b != result {
        return false;
    }
    let mut b_digits = digits_of(b as u32);
    b_digits.reverse();
    if b_digits.len() < rows.partials.len() {
        return false;
    }
    rows.partials
        .iter()
        .zip(b_digits)
        .all(|(partial, d)| row_value(partial, assignment) == a * d as u64)
}

/// Find the single shape-to-digit assignment satisfying the worksheet, if
/// exactly one exists. Assignments draw from the digits not already shown
/// as confirmed, all distinct.
fn unique_solution(rows: &Rows, masked_digits: &[u8]) -> Option<Vec<u8>> {
    let confirmed: Vec<u8> = all_rows(rows)
        .flatten()
        .filter_map(|cell| match cell {
            Cell::Digit(d) => Some(*d),
            Cell::Symbol(_) => None,
        })
        .collect();
    let available: Vec<u8> = (0..10).filter(|d| !confirmed.contains(d)).collect();
    debug_assert!(masked_digits.iter().all(|d| available.contains(d)));

    let mut found: Option<Vec<u8>> = None;
    for &x in &available {
        for &y in &available {
            if y == x {
                continue;
            }
            for &z in &available {
                if z == x || z == y {
                    continue;
                }
                let assignment = [x, y, z];
                if verify(rows, &assignment) {
                    if found.is_some() {
                        return None;
                    }
                    found = Some(assignment.to_vec());
                }
            }
        }
    }
    found
}

struct Candidate {
    multiplicand: u32,
    multiplier: u32,
    rows: Rows,
    masked_digits: Vec<u8>,
    confirmed_total: usize,
}

fn build_candidate<R: Rng + ?Sized>(rng: &mut R) -> Option<Candidate> {
    let a = rng.gen_range(10u32.pow(MULTIPLICAND_DIGITS - 1)..10u32.pow(MULTIPLICAND_DIGITS));
    // Zero multiplier digits would print an all-zero partial row.
    let b = (0..MULTIPLIER_DIGITS).fold(0u32, |acc, _| acc * 10 + rng.gen_range(1..=9));

    let partials = partial_products(a, b);
    let result = a * b;

    let mut calc_digits = digits_of(a);
    calc_digits.extend(digits_of(b));
    for &p in &partials {
        calc_digits.extend(digits_of(p));
    }
    calc_digits.extend(digits_of(result));
    let masked_digits = top_digits(&calc_digits);

    let rows = Rows {
        multiplicand: mask_number(a, &masked_digits),
        multiplier: mask_number(b, &masked_digits),
        partials: partials.iter().map(|&p| mask_number(p, &masked_digits)).collect(),
        result: mask_number(result, &masked_digits),
    };

    let confirmed = confirmed_total(&rows);
    if confirmed > MAX_CONFIRMED_TOTAL {
        return None;
    }
    if all_rows(&rows).any(|row| confirmed_in_row(row) > 1) {
        return None;
    }

    Some(Candidate {
        multiplicand: a,
        multiplier: b,
        rows,
        masked_digits,
        confirmed_total: confirmed,
    })
}

/// Generate a worksheet with a unique solution.
///
/// Each attempt samples a batch of multiplications, keeps the ones passing
/// the confirmed-digit filters, and checks them for uniqueness starting
/// with the sparsest. Fails hard after the attempt budget; a non-unique
/// cryptarithm is not printable even as a fallback.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Result<Puzzle, GenerateError> {
    for attempt in 0..MAX_ATTEMPTS {
        let mut candidates: Vec<Candidate> =
            (0..BATCH_SIZE).filter_map(|_| build_candidate(rng)).collect();
        candidates.sort_by_key(|c| c.confirmed_total);

        for candidate in candidates {
            if let Some(mapping) = unique_solution(&candidate.rows, &candidate.masked_digits) {
                debug!(
                    "cryptarithm {}x{} accepted on attempt {}",
                    candidate.multiplicand,
                    candidate.multiplier,
                    attempt + 1
                );
                return Ok(Puzzle {
                    multiplicand: candidate.multiplicand,
                    multiplier: candidate.multiplier,
                    partials: partial_products(candidate.multiplicand, candidate.multiplier),
                    result: candidate.multiplicand * candidate.multiplier,
                    rows: candidate.rows,
                    mapping,
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
    fn partial_products_follow_worksheet_order() {
        assert_eq!(partial_products(123, 45), vec![615, 492]);
        assert_eq!(partial_products(200, 99), vec![1800, 1800]);
    }

    #[test]
    fn top_digits_prefer_frequency_then_first_appearance() {
        // 1 appears three times, 2 twice; 3 and 4 tie and 3 came first.
        assert_eq!(top_digits(&[1, 2, 3, 1, 4, 2, 1]), vec![1, 2, 3]);
    }

    #[test]
    fn masking_replaces_only_chosen_digits() {
        let row = mask_number(123, &[2, 9, 1]);
        assert_eq!(row, vec![Cell::Symbol(2), Cell::Symbol(0), Cell::Digit(3)]);
    }

    #[test]
    fn verify_accepts_true_assignment_only() {
        // 123 × 45 with digits 1, 2, 4 masked.
        let masked = vec![1u8, 2, 4];
        let rows = Rows {
            multiplicand: mask_number(123, &masked),
            multiplier: mask_number(45, &masked),
            partials: vec![mask_number(615, &masked), mask_number(492, &masked)],
            result: mask_number(5535, &masked),
        };
        assert!(verify(&rows, &[1, 2, 4]));
        assert!(!verify(&rows, &[2, 1, 4]));
        assert!(!verify(&rows, &[7, 8, 9]));
    }

    #[test]
    fn candidates_carry_their_own_confirmed_count() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut checked = 0;
        for _ in 0..200 {
            if let Some(candidate) = build_candidate(&mut rng) {
                assert_eq!(candidate.confirmed_total, confirmed_total(&candidate.rows));
                assert!(candidate.confirmed_total <= MAX_CONFIRMED_TOTAL);
                checked += 1;
            }
        }
        assert!(checked > 0);
    }

    #[test]
    fn generated_worksheet_is_consistent_and_unique() {
        let mut rng = StdRng::seed_from_u64(99);
        let puzzle = generate(&mut rng).unwrap();

        assert_eq!(puzzle.result, puzzle.multiplicand * puzzle.multiplier);
        assert_eq!(puzzle.partials.len(), MULTIPLIER_DIGITS);
        assert!(puzzle.multiplicand >= 100 && puzzle.multiplicand <= 999);
        assert!(puzzle.multiplier >= 11 && puzzle.multiplier <= 99);

        // The stored mapping reproduces the arithmetic.
        assert!(verify(&puzzle.rows, &puzzle.mapping));

        // Visibility constraints.
        assert!(confirmed_total(&puzzle.rows) <= MAX_CONFIRMED_TOTAL);
        for row in all_rows(&puzzle.rows) {
            assert!(confirmed_in_row(row) <= 1);
        }

        // Mapped digits are distinct and never appear as visible digits.
        let mut digits = puzzle.mapping.clone();
        digits.sort_unstable();
        digits.dedup();
        assert_eq!(digits.len(), SYMBOL_COUNT);
        for row in all_rows(&puzzle.rows) {
            for cell in row {
                if let Cell::Digit(d) = cell {
                    assert!(!puzzle.mapping.contains(d));
                }
            }
        }
    }
}
