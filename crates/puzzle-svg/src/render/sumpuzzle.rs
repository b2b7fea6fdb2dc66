//! Sum puzzle sheet: a 6x6 number grid with row and column target sums;
//! the answer sheet circles the cells that make up each sum.

use std::fmt::Write;

use puzzle_core::sumpuzzle::{Puzzle, SIZE};

use super::FONT_FAMILY;

const CELL_SIZE: f64 = 40.0;
const TARGET_CELL_WIDTH: f64 = 36.0;
const TARGET_CELL_HEIGHT: f64 = 30.0;
const GAP: f64 = 2.0;
const SPACING: f64 = 5.0;

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    let grid_x = SPACING + TARGET_CELL_WIDTH + GAP;
    let grid_y = SPACING + TARGET_CELL_HEIGHT + GAP;
    let width = grid_x + CELL_SIZE * SIZE as f64 + SPACING;
    let height = grid_y + CELL_SIZE * SIZE as f64 + SPACING;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="{width}" height="{height}" fill="white"/>"#);

    for (c, &target) in puzzle.col_targets.iter().enumerate() {
        let x = grid_x + c as f64 * CELL_SIZE + CELL_SIZE / 2.0;
        let y = SPACING + TARGET_CELL_HEIGHT / 2.0;
        let _ = writeln!(
            svg,
            r#"  <text x="{x}" y="{y}" dy="0.35em" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="14" fill="black">{target}</text>"#
        );
    }
    for (r, &target) in puzzle.row_targets.iter().enumerate() {
        let x = SPACING + TARGET_CELL_WIDTH / 2.0;
        let y = grid_y + r as f64 * CELL_SIZE + CELL_SIZE / 2.0;
        let _ = writeln!(
            svg,
            r#"  <text x="{x}" y="{y}" dy="0.35em" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="14" fill="black">{target}</text>"#
        );
    }

    for r in 0..SIZE {
        for c in 0..SIZE {
            let x = grid_x + c as f64 * CELL_SIZE;
            let y = grid_y + r as f64 * CELL_SIZE;
            let _ = writeln!(
                svg,
                r#"  <rect x="{x}" y="{y}" width="{CELL_SIZE}" height="{CELL_SIZE}" fill="none" stroke="lightgray" stroke-width="1"/>"#
            );
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{}" dy="0.35em" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="18" fill="gray">{}</text>"#,
                x + CELL_SIZE / 2.0,
                y + CELL_SIZE / 2.0,
                puzzle.grid[r][c]
            );
            if show_solution && puzzle.solution[r][c] {
                let _ = writeln!(
                    svg,
                    r#"  <circle cx="{}" cy="{}" r="16" fill="none" stroke="black" stroke-width="1.5"/>"#,
                    x + CELL_SIZE / 2.0,
                    y + CELL_SIZE / 2.0
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::sumpuzzle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn answer_circles_match_the_solution_mask() {
        let mut rng = StdRng::seed_from_u64(6);
        let puzzle = sumpuzzle::generate(&mut rng).unwrap();

        let question = render(&puzzle, false);
        let answer = render(&puzzle, true);

        let circled = puzzle.solution.iter().flatten().filter(|&&v| v).count();
        assert_eq!(answer.matches("<circle").count(), circled);
        assert_eq!(question.matches("<circle").count(), 0);
    }
}
