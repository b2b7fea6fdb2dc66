//! Maze sheets carved with a goal-biased randomized depth-first search.
//!
//! The carver keeps a stack of frontier cells; with probability `entropy`
//! it resumes from a random stack entry instead of the top, which breaks
//! the single long corridor a plain depth-first carve produces. Neighbor
//! choice is usually steered relative to the goal direction, occasionally
//! random. The answer path is recovered with A* over the carved walls.

use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Neighbor choice follows the goal-direction score this often; the rest
/// of the time it is random.
const GOAL_BIAS: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Walls {
    pub top: bool,
    pub right: bool,
    pub bottom: bool,
    pub left: bool,
}

impl Walls {
    fn closed() -> Walls {
        Walls {
            top: true,
            right: true,
            bottom: true,
            left: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dir {
    Up,
    Right,
    Down,
    Left,
}

impl Dir {
    const ALL: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];

    fn delta(self) -> (isize, isize) {
        match self {
            Dir::Up => (0, -1),
            Dir::Right => (1, 0),
            Dir::Down => (0, 1),
            Dir::Left => (-1, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Maze {
    pub width: usize,
    pub height: usize,
    /// Row-major wall state per cell.
    pub walls: Vec<Walls>,
    pub start: (usize, usize),
    pub end: (usize, usize),
    /// Cell path from start to end, inclusive.
    pub solution: Vec<(usize, usize)>,
}

impl Maze {
    pub fn cell(&self, x: usize, y: usize) -> &Walls {
        &self.walls[y * self.width + x]
    }

    fn neighbor(&self, x: usize, y: usize, dir: Dir) -> Option<(usize, usize)> {
        let (dx, dy) = dir.delta();
        let nx = x.checked_add_signed(dx)?;
        let ny = y.checked_add_signed(dy)?;
        if nx < self.width && ny < self.height {
            Some((nx, ny))
        } else {
            None
        }
    }

    fn open_wall(&mut self, x: usize, y: usize, dir: Dir) {
        let (nx, ny) = self.neighbor(x, y, dir).expect("wall opens to a cell");
        let idx = y * self.width + x;
        let nidx = ny * self.width + nx;
        match dir {
            Dir::Up => {
                self.walls[idx].top = false;
                self.walls[nidx].bottom = false;
            }
            Dir::Right => {
                self.walls[idx].right = false;
                self.walls[nidx].left = false;
            }
            Dir::Down => {
                self.walls[idx].bottom = false;
                self.walls[nidx].top = false;
            }
            Dir::Left => {
                self.walls[idx].left = false;
                self.walls[nidx].right = false;
            }
        }
    }

    /// Cells reachable from `(x, y)` through open walls.
    fn open_neighbors(&self, x: usize, y: usize) -> Vec<(usize, usize)> {
        let w = self.cell(x, y);
        let mut out = Vec::with_capacity(4);
        for (dir, closed) in [
            (Dir::Up, w.top),
            (Dir::Right, w.right),
            (Dir::Down, w.bottom),
            (Dir::Left, w.left),
        ] {
            if !closed {
                if let Some(n) = self.neighbor(x, y, dir) {
                    out.push(n);
                }
            }
        }
        out
    }
}

/// Carve a maze from the top-left corner to the bottom-right one and
/// solve it. The entry and exit are opened through the outer border.
pub fn generate<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    entropy: f64,
    rng: &mut R,
) -> Maze {
    let mut maze = Maze {
        width,
        height,
        walls: vec![Walls::closed(); width * height],
        start: (0, 0),
        end: (width - 1, height - 1),
        solution: Vec::new(),
    };

    carve(&mut maze, entropy, rng);

    let start_idx = maze.start.1 * width + maze.start.0;
    maze.walls[start_idx].left = false;
    maze.walls[start_idx].top = false;
    let end_idx = maze.end.1 * width + maze.end.0;
    maze.walls[end_idx].right = false;
    maze.walls[end_idx].bottom = false;

    maze.solution = find_solution(&maze);
    debug!(
        "{}x{} maze carved, answer path {} cells",
        width,
        height,
        maze.solution.len()
    );
    maze
}

fn carve<R: Rng + ?Sized>(maze: &mut Maze, entropy: f64, rng: &mut R) {
    let goal = (
        maze.end.0 as f64 - maze.start.0 as f64,
        maze.end.1 as f64 - maze.start.1 as f64,
    );
    let len = (goal.0 * goal.0 + goal.1 * goal.1).sqrt();
    let goal_dir = if len > 0.0 {
        (goal.0 / len, goal.1 / len)
    } else {
        (0.0, 0.0)
    };

    let mut visited = vec![false; maze.width * maze.height];
    visited[maze.start.1 * maze.width + maze.start.0] = true;
    let mut stack = vec![maze.start];

    while !stack.is_empty() {
        let mut index = stack.len() - 1;
        if stack.len() > 1 && rng.gen::<f64>() < entropy {
            index = rng.gen_range(0..stack.len());
        }
        let (x, y) = stack[index];

        let unvisited: Vec<(Dir, (usize, usize))> = Dir::ALL
            .into_iter()
            .filter_map(|dir| maze.neighbor(x, y, dir).map(|n| (dir, n)))
            .filter(|&(_, (nx, ny))| !visited[ny * maze.width + nx])
            .collect();

        if unvisited.is_empty() {
            stack.remove(index);
            continue;
        }

        // Score each candidate once, then take the minimum.
        let mut best: Option<(f64, Dir, (usize, usize))> = None;
        for (dir, (nx, ny)) in unvisited {
            let key = if rng.gen::<f64>() < GOAL_BIAS {
                let step = (nx as f64 - x as f64, ny as f64 - y as f64);
                step.0 * goal_dir.0 + step.1 * goal_dir.1
            } else {
                rng.gen::<f64>() - 0.5
            };
            if best.map_or(true, |(k, _, _)| key < k) {
                best = Some((key, dir, (nx, ny)));
            }
        }
        let (_, dir, (nx, ny)) = best.expect("at least one candidate");

        maze.open_wall(x, y, dir);
        visited[ny * maze.width + nx] = true;
        stack.push((nx, ny));
    }
}

/// A* from start to end with a Manhattan heuristic. The carve produces a
/// spanning tree, so the path found is the only one.
fn find_solution(maze: &Maze) -> Vec<(usize, usize)> {
    let size = maze.width * maze.height;
    let idx = |(x, y): (usize, usize)| y * maze.width + x;
    let heuristic = |(x, y): (usize, usize)| {
        maze.end.0.abs_diff(x) + maze.end.1.abs_diff(y)
    };

    let mut g = vec![usize::MAX; size];
    let mut f = vec![usize::MAX; size];
    let mut came_from: Vec<Option<(usize, usize)>> = vec![None; size];
    g[idx(maze.start)] = 0;
    f[idx(maze.start)] = heuristic(maze.start);

    let mut open = vec![maze.start];
    while !open.is_empty() {
        let best = (0..open.len())
            .min_by_key(|&i| f[idx(open[i])])
            .expect("open set is non-empty");
        let current = open.swap_remove(best);

        if current == maze.end {
            let mut path = vec![current];
            let mut cursor = current;
            while let Some(prev) = came_from[idx(cursor)] {
                path.push(prev);
                cursor = prev;
            }
            path.reverse();
            return path;
        }

        for neighbor in maze.open_neighbors(current.0, current.1) {
            let tentative = g[idx(current)] + 1;
            if tentative < g[idx(neighbor)] {
                came_from[idx(neighbor)] = Some(current);
                g[idx(neighbor)] = tentative;
                f[idx(neighbor)] = tentative + heuristic(neighbor);
                if !open.contains(&neighbor) {
                    open.push(neighbor);
                }
            }
        }
    }

    Vec::new()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn reachable_cells(maze: &Maze) -> usize {
        let mut seen = vec![false; maze.width * maze.height];
        let mut stack = vec![maze.start];
        seen[maze.start.1 * maze.width + maze.start.0] = true;
        let mut count = 0;
        while let Some((x, y)) = stack.pop() {
            count += 1;
            for (nx, ny) in maze.open_neighbors(x, y) {
                if !seen[ny * maze.width + nx] {
                    seen[ny * maze.width + nx] = true;
                    stack.push((nx, ny));
                }
            }
        }
        count
    }

    #[test]
    fn every_cell_is_reachable() {
        let mut rng = StdRng::seed_from_u64(2);
        for (w, h) in [(8, 5), (20, 13)] {
            let maze = generate(w, h, 0.5, &mut rng);
            assert_eq!(reachable_cells(&maze), w * h);
        }
    }

    #[test]
    fn entry_and_exit_are_open() {
        let mut rng = StdRng::seed_from_u64(6);
        let maze = generate(10, 10, 0.5, &mut rng);
        assert!(!maze.cell(0, 0).left);
        assert!(!maze.cell(0, 0).top);
        assert!(!maze.cell(9, 9).right);
        assert!(!maze.cell(9, 9).bottom);
    }

    #[test]
    fn solution_is_a_wall_respecting_path() {
        let mut rng = StdRng::seed_from_u64(31);
        let maze = generate(15, 10, 0.5, &mut rng);
        let path = &maze.solution;

        assert_eq!(path.first(), Some(&maze.start));
        assert_eq!(path.last(), Some(&maze.end));
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert!(
                maze.open_neighbors(a.0, a.1).contains(&b),
                "step {:?} -> {:?} crosses a wall",
                a,
                b
            );
        }

        // The carve is a spanning tree, so the path never revisits a cell.
        let mut seen = path.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), path.len());
    }

    #[test]
    fn zero_entropy_still_produces_a_valid_maze() {
        let mut rng = StdRng::seed_from_u64(40);
        let maze = generate(12, 8, 0.0, &mut rng);
        assert_eq!(reachable_cells(&maze), 12 * 8);
        assert!(!maze.solution.is_empty());
    }
}
