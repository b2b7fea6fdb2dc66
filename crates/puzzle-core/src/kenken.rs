//! KenKen-style cage puzzle with hidden operators.
//!
//! Only the target number of each cage is printed, not its operator, so the
//! uniqueness validator must prove that exactly one grid is reachable across
//! the whole cross-product of operator assignments consistent with each
//! cage's size. That hypothesis space, not the grid alone, is what makes
//! these puzzles hard.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attempt::Outcome;
use crate::latin;

/// Grid size used by the printed sheet.
pub const SIZE: usize = 4;

const MAX_ATTEMPTS: usize = 200;
/// Candidates whose operator cross-product is larger than this are too
/// expensive to verify and get rejected outright.
const MAX_OPERATOR_COMBINATIONS: usize = 50_000;
/// A singleton cage may be merged into a neighbor only while the neighbor
/// cage stays below this many cells.
const MERGE_SIZE_CAP: usize = 5;

/// Cage arithmetic. `Value` is the implicit rule for single-cell cages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Op {
    Value,
    Add,
    Sub,
    Mul,
    Div,
}

impl Op {
    /// Operators a solver must consider for a cage of `len` cells.
    fn hypotheses(len: usize) -> &'static [Op] {
        match len {
            1 => &[Op::Value],
            2 => &[Op::Add, Op::Sub, Op::Mul, Op::Div],
            _ => &[Op::Add, Op::Mul],
        }
    }
}

/// A connected group of cells sharing one arithmetic constraint.
///
/// `op` records which operator produced `target` from the solution values;
/// it is generation metadata, never printed as a clue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cage {
    pub id: usize,
    pub cells: Vec<usize>,
    pub target: u32,
    pub op: Op,
}

/// A finished puzzle: flat solution board, per-cell cage ids, and cages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Puzzle {
    pub n: usize,
    pub solution: Vec<u8>,
    pub cage_of_cell: Vec<usize>,
    pub cages: Vec<Cage>,
}

fn neighbors(idx: usize, n: usize) -> Vec<usize> {
    let (r, c) = (idx / n, idx % n);
    let mut out = Vec::with_capacity(4);
    if c > 0 {
        out.push(idx - 1);
    }
    if c < n - 1 {
        out.push(idx + 1);
    }
    if r > 0 {
        out.push(idx - n);
    }
    if r < n - 1 {
        out.push(idx + n);
    }
    out
}

/// Partition the grid into connected cages by randomized region growing,
/// then absorb leftover singleton cages into a small enough neighbor.
pub fn generate_cages<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut cage_of_cell = vec![usize::MAX; n * n];
    let mut visited = vec![false; n * n];
    let mut cage_id = 0;

    for i in 0..n * n {
        if visited[i] {
            continue;
        }
        let roll: f64 = rng.gen();
        let target_size = if roll < 0.1 {
            1
        } else if roll < 0.5 {
            3
        } else if roll < 0.7 {
            4
        } else {
            2
        };

        let mut current = vec![i];
        visited[i] = true;

        let mut guard = 0;
        while current.len() < target_size && guard < 15 {
            guard += 1;
            let candidates: Vec<usize> = current
                .iter()
                .flat_map(|&cell| neighbors(cell, n))
                .filter(|&nei| !visited[nei])
                .collect();
            let Some(&next) = candidates.choose(rng) else {
                break;
            };
            visited[next] = true;
            current.push(next);
        }

        for idx in current {
            cage_of_cell[idx] = cage_id;
        }
        cage_id += 1;
    }

    // Merge singleton cages until none can be absorbed anymore.
    loop {
        let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
        for (idx, &cid) in cage_of_cell.iter().enumerate() {
            members.entry(cid).or_default().push(idx);
        }

        let mut merged = false;
        let mut singles: Vec<usize> = members
            .iter()
            .filter(|(_, cells)| cells.len() == 1)
            .map(|(&cid, _)| cid)
            .collect();
        singles.sort_unstable();

        'outer: for cid in singles {
            let idx = members[&cid][0];
            for nei in neighbors(idx, n) {
                let ncid = cage_of_cell[nei];
                if ncid != cid && members[&ncid].len() < MERGE_SIZE_CAP {
                    cage_of_cell[idx] = ncid;
                    merged = true;
                    break 'outer;
                }
            }
        }
        if !merged {
            break;
        }
    }

    cage_of_cell
}

/// Pick an operator per cage and compute its target from the solution.
pub fn calculate_targets<R: Rng + ?Sized>(
    cage_of_cell: &[usize],
    solution: &[u8],
    rng: &mut R,
) -> Vec<Cage> {
    let mut order: Vec<usize> = Vec::new();
    let mut cells_by_cage: HashMap<usize, Vec<usize>> = HashMap::new();
    for (idx, &cid) in cage_of_cell.iter().enumerate() {
        if !cells_by_cage.contains_key(&cid) {
            order.push(cid);
        }
        cells_by_cage.entry(cid).or_default().push(idx);
    }

    order
        .into_iter()
        .map(|cid| {
            let cells = cells_by_cage.remove(&cid).unwrap();
            let values: Vec<u32> = cells.iter().map(|&i| solution[i] as u32).collect();
            let (op, target) = match values.len() {
                1 => (Op::Value, values[0]),
                2 => {
                    let (a, b) = (values[0], values[1]);
                    let (big, small) = (a.max(b), a.min(b));
                    let mut ops = vec![Op::Add, Op::Mul, Op::Sub];
                    if big % small == 0 {
                        ops.push(Op::Div);
                    }
                    match *ops.choose(rng).unwrap() {
                        Op::Add => (Op::Add, a + b),
                        Op::Mul => (Op::Mul, a * b),
                        Op::Sub => (Op::Sub, big - small),
                        _ => (Op::Div, big / small),
                    }
                }
                _ => {
                    if rng.gen_bool(0.5) {
                        (Op::Add, values.iter().sum())
                    } else {
                        (Op::Mul, values.iter().product())
                    }
                }
            };
            Cage {
                id: cid,
                cells,
                target,
                op,
            }
        })
        .collect()
}

/// Does `op` applied to `values` yield `target`?
///
/// Subtraction is order-independent (|a − b|); division accepts either
/// floor quotient, matching the published-clue semantics where the solver
/// never learns the cell order.
pub fn check_cage_math(values: &[u32], target: u32, op: Op) -> bool {
    match (values.len(), op) {
        (1, _) => values[0] == target,
        (2, Op::Add) => values[0] + values[1] == target,
        (2, Op::Sub) => values[0].abs_diff(values[1]) == target,
        (2, Op::Mul) => values[0] * values[1] == target,
        (2, Op::Div) => {
            let (a, b) = (values[0], values[1]);
            a != 0 && b != 0 && (a / b == target || b / a == target)
        }
        (_, Op::Add) => values.iter().sum::<u32>() == target,
        (_, Op::Mul) => values.iter().product::<u32>() == target,
        _ => false,
    }
}

/// Latin-square backtracking with cage arithmetic as an extra constraint,
/// for one fixed operator assignment (indexed by position in `cages`).
fn solve_with_operators(
    n: usize,
    cage_of_cell: &[usize],
    cages: &[Cage],
    ops: &[Op],
    max_solutions: usize,
) -> Vec<Vec<u8>> {
    let cage_index: HashMap<usize, usize> = cages
        .iter()
        .enumerate()
        .map(|(slot, cage)| (cage.id, slot))
        .collect();

    struct Ctx<'a> {
        n: usize,
        cage_of_cell: &'a [usize],
        cages: &'a [Cage],
        cage_index: &'a HashMap<usize, usize>,
        ops: &'a [Op],
        board: Vec<u8>,
        solutions: Vec<Vec<u8>>,
        max_solutions: usize,
    }

    impl Ctx<'_> {
        fn placement_ok(&self, idx: usize, num: u8) -> bool {
            let n = self.n;
            let (r, c) = (idx / n, idx % n);
            for k in 0..c {
                if self.board[r * n + k] == num {
                    return false;
                }
            }
            for k in 0..r {
                if self.board[k * n + c] == num {
                    return false;
                }
            }

            // The cage relation is checked once its last cell gets filled.
            let slot = self.cage_index[&self.cage_of_cell[idx]];
            let cage = &self.cages[slot];
            let mut values = Vec::with_capacity(cage.cells.len());
            for &cell in &cage.cells {
                if cell == idx {
                    values.push(num as u32);
                } else if cell < idx {
                    values.push(self.board[cell] as u32);
                } else {
                    return true;
                }
            }
            check_cage_math(&values, cage.target, self.ops[slot])
        }

        fn backtrack(&mut self, idx: usize) {
            if self.solutions.len() >= self.max_solutions {
                return;
            }
            if idx == self.n * self.n {
                self.solutions.push(self.board.clone());
                return;
            }
            for num in 1..=self.n as u8 {
                if self.placement_ok(idx, num) {
                    self.board[idx] = num;
                    self.backtrack(idx + 1);
                    if self.solutions.len() >= self.max_solutions {
                        return;
                    }
                    self.board[idx] = 0;
                }
            }
        }
    }

    let mut ctx = Ctx {
        n,
        cage_of_cell,
        cages,
        cage_index: &cage_index,
        ops,
        board: vec![0; n * n],
        solutions: Vec::new(),
        max_solutions,
    };
    ctx.backtrack(0);
    ctx.solutions
}

/// Prove that the published clues (cage shapes and targets, operators
/// hidden) admit exactly one grid, and that it equals `expected`.
///
/// Enumerates the full cross-product of per-cage operator hypotheses,
/// solving under each and collecting distinct grids; bails out as soon as
/// two distinct grids exist. Returns `false` (reject, not "assume valid")
/// when the cross-product exceeds [`MAX_OPERATOR_COMBINATIONS`].
pub fn has_unique_solution(
    n: usize,
    cage_of_cell: &[usize],
    cages: &[Cage],
    expected: &[u8],
) -> bool {
    let hypotheses: Vec<&[Op]> = cages
        .iter()
        .map(|cage| Op::hypotheses(cage.cells.len()))
        .collect();

    let mut combination_count: usize = 1;
    for ops in &hypotheses {
        match combination_count.checked_mul(ops.len()) {
            Some(c) if c <= MAX_OPERATOR_COMBINATIONS => combination_count = c,
            _ => {
                debug!("operator cross-product too large; rejecting candidate");
                return false;
            }
        }
    }

    let mut found: HashSet<Vec<u8>> = HashSet::new();
    let mut indices = vec![0usize; hypotheses.len()];
    let mut ops: Vec<Op> = hypotheses.iter().map(|h| h[0]).collect();

    loop {
        for sol in solve_with_operators(n, cage_of_cell, cages, &ops, 2) {
            found.insert(sol);
        }
        if found.len() > 1 {
            return false;
        }

        // Odometer step over the per-cage hypothesis lists.
        let mut slot = 0;
        loop {
            if slot == indices.len() {
                return found.len() == 1 && found.contains(expected);
            }
            indices[slot] += 1;
            if indices[slot] < hypotheses[slot].len() {
                ops[slot] = hypotheses[slot][indices[slot]];
                break;
            }
            indices[slot] = 0;
            ops[slot] = hypotheses[slot][0];
            slot += 1;
        }
    }
}

/// Generate a 4×4 cage puzzle with a strictly unique solution.
///
/// Each attempt regenerates the Latin square, the cage partition, and the
/// targets from scratch. After `MAX_ATTEMPTS` rejections the last candidate
/// is returned as degraded, with a warning.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Outcome<Puzzle> {
    let n = SIZE;
    let mut last = None;

    for attempt in 0..MAX_ATTEMPTS {
        let solution: Vec<u8> = latin::random_latin_square(n, rng)
            .into_iter()
            .flatten()
            .collect();
        let cage_of_cell = generate_cages(n, rng);
        let cages = calculate_targets(&cage_of_cell, &solution, rng);

        if has_unique_solution(n, &cage_of_cell, &cages, &solution) {
            debug!("kenken puzzle accepted on attempt {}", attempt + 1);
            return Outcome::Valid(Puzzle {
                n,
                solution,
                cage_of_cell,
                cages,
            });
        }
        last = Some(Puzzle {
            n,
            solution,
            cage_of_cell,
            cages,
        });
    }

    warn!(
        "no unique kenken puzzle in {} attempts; emitting last candidate",
        MAX_ATTEMPTS
    );
    Outcome::Degraded(last.expect("at least one attempt ran"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn cages_partition_the_grid() {
        let mut rng = StdRng::seed_from_u64(21);
        for _ in 0..20 {
            let cage_of_cell = generate_cages(SIZE, &mut rng);
            assert_eq!(cage_of_cell.len(), SIZE * SIZE);
            assert!(cage_of_cell.iter().all(|&cid| cid != usize::MAX));

            // Every cage is 4-connected and no singleton has a small neighbor
            // it could still merge into.
            let mut members: HashMap<usize, Vec<usize>> = HashMap::new();
            for (idx, &cid) in cage_of_cell.iter().enumerate() {
                members.entry(cid).or_default().push(idx);
            }
            for (cid, cells) in &members {
                assert!(is_connected(cells, SIZE), "cage {} not connected", cid);
                if cells.len() == 1 {
                    let mergeable = neighbors(cells[0], SIZE).into_iter().any(|nei| {
                        let ncid = cage_of_cell[nei];
                        ncid != *cid && members[&ncid].len() < MERGE_SIZE_CAP
                    });
                    assert!(!mergeable, "singleton cage {} was left mergeable", cid);
                }
            }
        }
    }

    fn is_connected(cells: &[usize], n: usize) -> bool {
        let set: HashSet<usize> = cells.iter().copied().collect();
        let mut seen = HashSet::new();
        let mut stack = vec![cells[0]];
        while let Some(idx) = stack.pop() {
            if !seen.insert(idx) {
                continue;
            }
            for nei in neighbors(idx, n) {
                if set.contains(&nei) && !seen.contains(&nei) {
                    stack.push(nei);
                }
            }
        }
        seen.len() == cells.len()
    }

    #[test]
    fn cage_math_rules() {
        assert!(check_cage_math(&[3], 3, Op::Value));
        assert!(check_cage_math(&[1, 3], 4, Op::Add));
        assert!(check_cage_math(&[1, 3], 2, Op::Sub));
        assert!(check_cage_math(&[3, 1], 2, Op::Sub));
        assert!(check_cage_math(&[2, 4], 2, Op::Div));
        assert!(check_cage_math(&[4, 2], 2, Op::Div));
        assert!(!check_cage_math(&[4, 3], 2, Op::Div));
        assert!(check_cage_math(&[1, 2, 4], 7, Op::Add));
        assert!(check_cage_math(&[1, 2, 4], 8, Op::Mul));
        assert!(!check_cage_math(&[1, 2, 4], 7, Op::Sub));
    }

    #[test]
    fn targets_recompute_from_solution() {
        let mut rng = StdRng::seed_from_u64(8);
        let solution: Vec<u8> = latin::random_latin_square(SIZE, &mut rng)
            .into_iter()
            .flatten()
            .collect();
        let cage_of_cell = generate_cages(SIZE, &mut rng);
        let cages = calculate_targets(&cage_of_cell, &solution, &mut rng);

        let mut covered = vec![false; SIZE * SIZE];
        for cage in &cages {
            let values: Vec<u32> = cage.cells.iter().map(|&i| solution[i] as u32).collect();
            assert!(check_cage_math(&values, cage.target, cage.op));
            for &cell in &cage.cells {
                assert_eq!(cage_of_cell[cell], cage.id);
                covered[cell] = true;
            }
        }
        assert!(covered.iter().all(|&c| c));
    }

    #[test]
    fn single_cage_per_cell_board_is_unique() {
        // Every cell its own cage: targets are the values themselves, so
        // the board is fully determined regardless of operators.
        let solution: Vec<u8> = vec![1, 2, 3, 4, 2, 1, 4, 3, 3, 4, 1, 2, 4, 3, 2, 1];
        let cage_of_cell: Vec<usize> = (0..16).collect();
        let cages: Vec<Cage> = (0..16)
            .map(|i| Cage {
                id: i,
                cells: vec![i],
                target: solution[i] as u32,
                op: Op::Value,
            })
            .collect();
        assert!(has_unique_solution(4, &cage_of_cell, &cages, &solution));

        let mut wrong = solution.clone();
        wrong.swap(0, 1);
        assert!(!has_unique_solution(4, &cage_of_cell, &cages, &wrong));
    }

    #[test]
    fn one_big_sum_cage_is_ambiguous() {
        // A single cage summing the whole board cannot distinguish between
        // Latin squares, so uniqueness must fail.
        let solution: Vec<u8> = vec![1, 2, 3, 4, 2, 1, 4, 3, 3, 4, 1, 2, 4, 3, 2, 1];
        let cage_of_cell = vec![0; 16];
        let cages = vec![Cage {
            id: 0,
            cells: (0..16).collect(),
            target: 40,
            op: Op::Add,
        }];
        assert!(!has_unique_solution(4, &cage_of_cell, &cages, &solution));
    }

    #[test]
    fn generated_puzzle_invariants() {
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = generate(&mut rng);
        let puzzle = outcome.as_inner();

        let rows: Vec<Vec<u8>> = puzzle
            .solution
            .chunks(puzzle.n)
            .map(|r| r.to_vec())
            .collect();
        assert!(latin::is_latin_square(&rows));

        for cage in &puzzle.cages {
            let values: Vec<u32> = cage.cells.iter().map(|&i| puzzle.solution[i] as u32).collect();
            assert!(check_cage_math(&values, cage.target, cage.op));
        }

        if !outcome.is_degraded() {
            assert!(has_unique_solution(
                puzzle.n,
                &puzzle.cage_of_cell,
                &puzzle.cages,
                &puzzle.solution
            ));
        }
    }
}
