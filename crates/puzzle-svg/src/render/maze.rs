//! Maze sheet: one-pixel wall grid, with the solved path drawn in red on
//! the answer sheet.

use std::fmt::Write;

use puzzle_core::maze::Maze;

const CELL_SIZE: f64 = 10.0;
// Half-pixel offset keeps 1px strokes on the pixel grid.
const OFFSET: f64 = 0.5;

pub fn render(maze: &Maze, show_solution: bool) -> String {
    let width = maze.width as f64 * CELL_SIZE + 1.0;
    let height = maze.height as f64 * CELL_SIZE + 1.0;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" shape-rendering="crispEdges">"#
    );
    let _ = writeln!(svg, r#"  <rect width="{width}" height="{height}" fill="white"/>"#);

    if show_solution && !maze.solution.is_empty() {
        let stroke = (CELL_SIZE / 5.0).max(1.0);
        let points: Vec<String> = maze
            .solution
            .iter()
            .map(|&(x, y)| {
                format!(
                    "{},{}",
                    x as f64 * CELL_SIZE + CELL_SIZE / 2.0 + OFFSET,
                    y as f64 * CELL_SIZE + CELL_SIZE / 2.0 + OFFSET
                )
            })
            .collect();
        let _ = writeln!(
            svg,
            r#"  <polyline points="{}" fill="none" stroke="red" stroke-width="{stroke}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            points.join(" ")
        );
    }

    let mut walls = String::new();
    for y in 0..maze.height {
        for x in 0..maze.width {
            let cell = maze.cell(x, y);
            let px = x as f64 * CELL_SIZE + OFFSET;
            let py = y as f64 * CELL_SIZE + OFFSET;
            if cell.top {
                let _ = write!(walls, "M{px},{py}h{CELL_SIZE}");
            }
            if cell.left {
                let _ = write!(walls, "M{px},{py}v{CELL_SIZE}");
            }
            if cell.bottom {
                let _ = write!(walls, "M{px},{}h{CELL_SIZE}", py + CELL_SIZE);
            }
            if cell.right {
                let _ = write!(walls, "M{},{py}v{CELL_SIZE}", px + CELL_SIZE);
            }
        }
    }
    let _ = writeln!(svg, r#"  <path d="{walls}" fill="none" stroke="gray" stroke-width="1"/>"#);

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::maze;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn solution_path_is_only_on_the_answer_sheet() {
        let mut rng = StdRng::seed_from_u64(4);
        let maze = maze::generate(12, 8, 0.5, &mut rng);

        let question = render(&maze, false);
        let answer = render(&maze, true);

        assert!(!question.contains("polyline"));
        assert!(answer.contains("polyline"));
    }
}
