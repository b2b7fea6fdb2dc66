//! Matchstick equation puzzles on seven-segment digits.
//!
//! A correct two-digit equation `A op B = C` is rendered in matchsticks,
//! then disturbed by moving N sticks (removals and additions drawn from
//! per-stick-count transformation tables). The printed board is the broken
//! equation; restoring the original in N moves is the puzzle.
//!
//! Segment layout per digit cell:
//! ```text
//!  aaa
//! f   b
//!  ggg
//! e   c
//!  ddd
//! ```

use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attempt::GenerateError;

pub const SEG_A: u8 = 1 << 0;
pub const SEG_B: u8 = 1 << 1;
pub const SEG_C: u8 = 1 << 2;
pub const SEG_D: u8 = 1 << 3;
pub const SEG_E: u8 = 1 << 4;
pub const SEG_F: u8 = 1 << 5;
pub const SEG_G: u8 = 1 << 6;

// Operator sticks: horizontal, vertical, forward slash, back slash.
pub const OP_H: u8 = 1 << 0;
pub const OP_V: u8 = 1 << 1;
pub const OP_FS: u8 = 1 << 2;
pub const OP_BS: u8 = 1 << 3;

/// Segment masks for the digits 0..=9.
pub const DIGIT_MASKS: [u8; 10] = [
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F,
    SEG_B | SEG_C,
    SEG_A | SEG_B | SEG_D | SEG_E | SEG_G,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_G,
    SEG_B | SEG_C | SEG_F | SEG_G,
    SEG_A | SEG_C | SEG_D | SEG_F | SEG_G,
    SEG_A | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
    SEG_A | SEG_B | SEG_C,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_E | SEG_F | SEG_G,
    SEG_A | SEG_B | SEG_C | SEG_D | SEG_F | SEG_G,
];

pub fn mask_to_digit(mask: u8) -> Option<u8> {
    DIGIT_MASKS.iter().position(|&m| m == mask).map(|d| d as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    pub const ALL: [Op; 4] = [Op::Add, Op::Sub, Op::Mul, Op::Div];

    pub fn stick_mask(self) -> u8 {
        match self {
            Op::Add => OP_H | OP_V,
            Op::Sub => OP_H,
            Op::Mul => OP_FS | OP_BS,
            Op::Div => OP_FS,
        }
    }

    pub fn from_stick_mask(mask: u8) -> Option<Op> {
        Op::ALL.into_iter().find(|op| op.stick_mask() == mask)
    }
}

/// A correct equation with all terms in 1..=99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    pub a: u8,
    pub b: u8,
    pub op: Op,
    pub c: u8,
}

/// Matchstick occupancy: six digit cells (left pair, right pair, result
/// pair) and the operator sticks. A zero cell mask is an empty cell, used
/// for the leading position of one-digit numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub cells: [u8; 6],
    pub op_sticks: u8,
}

impl Board {
    pub fn from_equation(eq: &Equation) -> Board {
        let mut cells = [0u8; 6];
        for (pair, value) in [(0, eq.a), (2, eq.b), (4, eq.c)] {
            if value >= 10 {
                cells[pair] = DIGIT_MASKS[(value / 10) as usize];
            }
            cells[pair + 1] = DIGIT_MASKS[(value % 10) as usize];
        }
        Board {
            cells,
            op_sticks: eq.op.stick_mask(),
        }
    }

    /// Read the two-cell number starting at `pair`. Leading empty cells
    /// are skipped; an empty cell after a digit, or an unrecognizable
    /// segment pattern, is unreadable.
    fn read_number(&self, pair: usize) -> Option<u32> {
        let mut value: Option<u32> = None;
        for &mask in &self.cells[pair..pair + 2] {
            if mask == 0 {
                if value.is_some() {
                    return None;
                }
                continue;
            }
            let digit = mask_to_digit(mask)? as u32;
            value = Some(value.unwrap_or(0) * 10 + digit);
        }
        value
    }

    fn read_op(&self) -> Option<Op> {
        Op::from_stick_mask(self.op_sticks)
    }

    /// Whether every row reads as a digit or operator at all.
    fn is_readable(&self) -> bool {
        self.read_number(0).is_some()
            && self.read_number(2).is_some()
            && self.read_number(4).is_some()
            && self.read_op().is_some()
    }

    /// True if the board currently shows a correct equation.
    pub fn evaluates_correctly(&self) -> bool {
        let (Some(a), Some(b), Some(c), Some(op)) = (
            self.read_number(0),
            self.read_number(2),
            self.read_number(4),
            self.read_op(),
        ) else {
            return false;
        };
        match op {
            Op::Add => a + b == c,
            Op::Sub => a >= b && a - b == c,
            Op::Mul => a * b == c,
            Op::Div => b != 0 && a % b == 0 && a / b == c,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    /// The disturbed board to print.
    pub board: Board,
    /// The restored equation shown on the answer sheet.
    pub answer: Equation,
    pub moves_required: usize,
}

// ==================== transformation tables ====================

/// Digit rewrites removing exactly `k` sticks: `(from, to, removed mask)`.
fn decrease_digit(k: usize, from: u8) -> &'static [(u8, u8)] {
    match (k, from) {
        (1, 6) => &[(5, SEG_E)],
        (1, 7) => &[(1, SEG_A)],
        (1, 8) => &[(0, SEG_G), (6, SEG_B), (9, SEG_E)],
        (1, 9) => &[(3, SEG_F), (5, SEG_B)],
        (2, 3) => &[(7, SEG_D | SEG_G)],
        (2, 4) => &[(1, SEG_F | SEG_G)],
        (2, 8) => &[(2, SEG_C | SEG_F), (3, SEG_E | SEG_F), (5, SEG_B | SEG_E)],
        (2, 9) => &[(4, SEG_A | SEG_D)],
        (3, 0) => &[(7, SEG_D | SEG_E | SEG_F)],
        (3, 3) => &[(1, SEG_A | SEG_D | SEG_G)],
        (3, 8) => &[(4, SEG_A | SEG_D | SEG_E)],
        (3, 9) => &[(7, SEG_D | SEG_F | SEG_G)],
        _ => &[],
    }
}

/// Digit rewrites adding exactly `k` sticks.
fn increase_digit(k: usize, from: u8) -> &'static [(u8, u8)] {
    match (k, from) {
        (1, 0) => &[(8, SEG_G)],
        (1, 1) => &[(7, SEG_A)],
        (1, 3) => &[(9, SEG_F)],
        (1, 5) => &[(6, SEG_E), (9, SEG_B)],
        (1, 6) => &[(8, SEG_B)],
        (1, 9) => &[(8, SEG_E)],
        (2, 1) => &[(4, SEG_F | SEG_G)],
        (2, 2) => &[(8, SEG_C | SEG_F)],
        (2, 3) => &[(8, SEG_E | SEG_F)],
        (2, 4) => &[(9, SEG_A | SEG_D)],
        (2, 5) => &[(8, SEG_B | SEG_E)],
        (2, 7) => &[(3, SEG_D | SEG_G)],
        (3, 1) => &[(3, SEG_A | SEG_D | SEG_G)],
        (3, 4) => &[(8, SEG_A | SEG_D | SEG_E)],
        (3, 7) => &[(0, SEG_D | SEG_E | SEG_F), (9, SEG_D | SEG_F | SEG_G)],
        _ => &[],
    }
}

/// Operator rewrites removing one stick; larger removals never apply.
fn decrease_op(k: usize, from: Op) -> Option<(Op, u8)> {
    match (k, from) {
        (1, Op::Add) => Some((Op::Sub, OP_V)),
        (1, Op::Mul) => Some((Op::Div, OP_BS)),
        _ => None,
    }
}

fn increase_op(k: usize, from: Op) -> Option<(Op, u8)> {
    match (k, from) {
        (1, Op::Sub) => Some((Op::Add, OP_V)),
        (1, Op::Div) => Some((Op::Mul, OP_BS)),
        _ => None,
    }
}

/// All ways to split `n` into parts of 1..=3, larger parts first.
fn partitions(n: usize) -> Vec<Vec<usize>> {
    fn dfs(rest: usize, path: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if rest == 0 {
            out.push(path.clone());
            return;
        }
        for k in (1..=rest.min(3)).rev() {
            path.push(k);
            dfs(rest - k, path, out);
            path.pop();
        }
    }
    let mut out = Vec::new();
    dfs(n, &mut Vec::new(), &mut out);
    out
}

// ==================== equation generation ====================

const EQUATION_ATTEMPTS: usize = 12_000;
const MAX_ATTEMPTS: usize = 400;

/// Sample a correct equation with every term in 1..=99.
fn random_equation<R: Rng + ?Sized>(rng: &mut R) -> Equation {
    for _ in 0..EQUATION_ATTEMPTS {
        let op = *Op::ALL.choose(rng).unwrap();
        let eq = match op {
            Op::Add => {
                let a = rng.gen_range(1..=98u8);
                let b = rng.gen_range(1..=99 - a);
                Equation { a, b, op, c: a + b }
            }
            Op::Sub => {
                let c = rng.gen_range(1..=98u8);
                let a = rng.gen_range(c + 1..=99);
                Equation { a, b: a - c, op, c }
            }
            Op::Mul => {
                let a = rng.gen_range(1..=99u8);
                let b = rng.gen_range(1..=(99 / a).max(1));
                let c = a as u32 * b as u32;
                if c > 99 {
                    continue;
                }
                Equation { a, b, op, c: c as u8 }
            }
            Op::Div => {
                let b = rng.gen_range(1..=99u8);
                let r_max = 99 / b;
                if r_max < 1 {
                    continue;
                }
                let c = rng.gen_range(1..=r_max);
                let a = b as u32 * c as u32;
                if a > 99 {
                    continue;
                }
                Equation { a: a as u8, b, op, c }
            }
        };
        if (1..=99).contains(&eq.b) && (1..=99).contains(&eq.c) {
            return eq;
        }
    }
    Equation { a: 12, b: 34, op: Op::Add, c: 46 }
}

// ==================== disturbing the board ====================

#[derive(Clone, Copy)]
enum Symbol {
    Digit { cell: usize, value: u8 },
    Operator(Op),
}

/// Move `n` sticks off the correct board: remove according to one random
/// partition of `n`, add according to another, never touching the same
/// cell twice. Returns the disturbed board if every step found a legal
/// rewrite and the result still reads as digits and an operator.
fn disturb<R: Rng + ?Sized>(eq: &Equation, n: usize, rng: &mut R) -> Option<Board> {
    let mut board = Board::from_equation(eq);

    let split_dec = partitions(n).choose(rng).cloned()?;
    let split_inc = partitions(n).choose(rng).cloned()?;

    let mut symbols: Vec<Symbol> = Vec::new();
    for (cell, &mask) in board.cells.iter().enumerate() {
        if mask != 0 {
            if let Some(value) = mask_to_digit(mask) {
                symbols.push(Symbol::Digit { cell, value });
            }
        }
    }
    if let Some(op) = board.read_op() {
        symbols.push(Symbol::Operator(op));
    }

    let mut used_cells = [false; 6];
    let mut used_op = false;

    for &k in &split_dec {
        let mut ok = false;
        for _ in 0..100 {
            let candidates: Vec<Symbol> = symbols
                .iter()
                .copied()
                .filter(|sym| match sym {
                    Symbol::Operator(op) => !used_op && decrease_op(k, *op).is_some(),
                    Symbol::Digit { cell, value } => {
                        !used_cells[*cell] && !decrease_digit(k, *value).is_empty()
                    }
                })
                .collect();
            let Some(&sym) = candidates.choose(rng) else {
                break;
            };
            match sym {
                Symbol::Operator(op) => {
                    let (_, remove) = decrease_op(k, op)?;
                    if board.op_sticks & remove != remove {
                        continue;
                    }
                    board.op_sticks &= !remove;
                    used_op = true;
                }
                Symbol::Digit { cell, value } => {
                    let &(_, remove) = decrease_digit(k, value).choose(rng)?;
                    if board.cells[cell] & remove != remove {
                        continue;
                    }
                    board.cells[cell] &= !remove;
                    used_cells[cell] = true;
                }
            }
            ok = true;
            break;
        }
        if !ok {
            return None;
        }
    }

    for &k in &split_inc {
        let mut ok = false;
        for _ in 0..100 {
            let candidates: Vec<Symbol> = symbols
                .iter()
                .copied()
                .filter(|sym| match sym {
                    Symbol::Operator(op) => !used_op && increase_op(k, *op).is_some(),
                    Symbol::Digit { cell, value } => {
                        !used_cells[*cell] && !increase_digit(k, *value).is_empty()
                    }
                })
                .collect();
            let Some(&sym) = candidates.choose(rng) else {
                break;
            };
            match sym {
                Symbol::Operator(op) => {
                    let (_, add) = increase_op(k, op)?;
                    if board.op_sticks & add != 0 {
                        continue;
                    }
                    board.op_sticks |= add;
                    used_op = true;
                }
                Symbol::Digit { cell, value } => {
                    let &(_, add) = increase_digit(k, value).choose(rng)?;
                    if board.cells[cell] & add != 0 {
                        continue;
                    }
                    board.cells[cell] |= add;
                    used_cells[cell] = true;
                }
            }
            ok = true;
            break;
        }
        if !ok {
            return None;
        }
    }

    if board.is_readable() {
        Some(board)
    } else {
        None
    }
}

/// Generate a puzzle requiring `moves_required` stick moves (clamped to
/// 1..=3). The disturbed board must not accidentally still be correct.
pub fn generate<R: Rng + ?Sized>(
    moves_required: usize,
    rng: &mut R,
) -> Result<Puzzle, GenerateError> {
    let n = moves_required.clamp(1, 3);
    for attempt in 0..MAX_ATTEMPTS {
        let eq = random_equation(rng);
        let Some(board) = disturb(&eq, n, rng) else {
            continue;
        };
        if board.evaluates_correctly() {
            continue;
        }
        debug!(
            "matchstick puzzle {} op {} = {} accepted on attempt {}",
            eq.a,
            eq.b,
            eq.c,
            attempt + 1
        );
        return Ok(Puzzle {
            board,
            answer: eq,
            moves_required,
        });
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
    fn digit_masks_round_trip() {
        for d in 0..10u8 {
            assert_eq!(mask_to_digit(DIGIT_MASKS[d as usize]), Some(d));
        }
        assert_eq!(mask_to_digit(SEG_A | SEG_G), None);
    }

    #[test]
    fn board_reads_equations_back() {
        let eq = Equation { a: 7, b: 34, op: Op::Add, c: 41 };
        let board = Board::from_equation(&eq);
        assert_eq!(board.cells[0], 0, "single-digit term keeps leading cell empty");
        assert_eq!(board.read_number(0), Some(7));
        assert_eq!(board.read_number(2), Some(34));
        assert_eq!(board.read_number(4), Some(41));
        assert_eq!(board.read_op(), Some(Op::Add));
        assert!(board.evaluates_correctly());
    }

    #[test]
    fn unreadable_boards_are_rejected() {
        let eq = Equation { a: 12, b: 3, op: Op::Mul, c: 36 };
        let mut board = Board::from_equation(&eq);
        board.cells[1] = SEG_A | SEG_G;
        assert!(!board.is_readable());
        assert!(!board.evaluates_correctly());
    }

    #[test]
    fn transformation_tables_change_stick_counts_exactly() {
        for k in 1..=3usize {
            for from in 0..10u8 {
                for &(to, mask) in decrease_digit(k, from) {
                    let before = DIGIT_MASKS[from as usize];
                    assert_eq!(before & mask, mask, "{} -> {} removes absent sticks", from, to);
                    assert_eq!(before & !mask, DIGIT_MASKS[to as usize]);
                    assert_eq!(mask.count_ones() as usize, k);
                }
                for &(to, mask) in increase_digit(k, from) {
                    let before = DIGIT_MASKS[from as usize];
                    assert_eq!(before & mask, 0, "{} -> {} adds present sticks", from, to);
                    assert_eq!(before | mask, DIGIT_MASKS[to as usize]);
                    assert_eq!(mask.count_ones() as usize, k);
                }
            }
        }
    }

    #[test]
    fn partitions_cover_expected_splits() {
        assert_eq!(partitions(2), vec![vec![2], vec![1, 1]]);
        assert_eq!(
            partitions(3),
            vec![vec![3], vec![2, 1], vec![1, 2], vec![1, 1, 1]]
        );
    }

    #[test]
    fn random_equations_are_correct() {
        let mut rng = StdRng::seed_from_u64(4);
        for _ in 0..200 {
            let eq = random_equation(&mut rng);
            assert!((1..=99).contains(&eq.a));
            assert!((1..=99).contains(&eq.b));
            assert!((1..=99).contains(&eq.c));
            assert!(Board::from_equation(&eq).evaluates_correctly());
        }
    }

    #[test]
    fn generated_puzzle_is_broken_but_readable() {
        let mut rng = StdRng::seed_from_u64(17);
        let puzzle = generate(2, &mut rng).unwrap();

        assert!(puzzle.board.is_readable());
        assert!(!puzzle.board.evaluates_correctly());
        assert!(Board::from_equation(&puzzle.answer).evaluates_correctly());

        // The disturbed board moves sticks, it never changes their count.
        let answer_board = Board::from_equation(&puzzle.answer);
        let count = |b: &Board| {
            b.cells.iter().map(|m| m.count_ones()).sum::<u32>() + b.op_sticks.count_ones()
        };
        assert_eq!(count(&puzzle.board), count(&answer_board));
    }
}
