//! Cage-arithmetic sheet: thick borders between cages, cage targets in
//! the top-left cell of each cage. No operator is printed; deducing it
//! is part of the puzzle.

use std::fmt::Write;

use puzzle_core::kenken::Puzzle;

use super::FONT_FAMILY;

const CELL_SIZE: f64 = 60.0;
const BORDER_THICK: f64 = 2.0;
const BORDER_THIN: f64 = 0.5;
const FONT_SIZE_LARGE: f64 = 36.0;
const FONT_SIZE_SMALL: f64 = 18.0;

fn line(x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: &str) -> String {
    format!(
        r#"  <line x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}" stroke="{color}" stroke-width="{width}"/>"#
    )
}

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    let n = puzzle.n;
    let span = CELL_SIZE * n as f64;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{span}" height="{span}" viewBox="0 0 {span} {span}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="{span}" height="{span}" fill="white"/>"#);

    // Interior edges: thick where the cage changes, thin otherwise.
    for r in 0..n {
        for c in 0..n {
            let idx = r * n + c;
            let x = c as f64 * CELL_SIZE;
            let y = r as f64 * CELL_SIZE;
            if r > 0 {
                let (width, color) = if puzzle.cage_of_cell[idx] != puzzle.cage_of_cell[idx - n] {
                    (BORDER_THICK, "black")
                } else {
                    (BORDER_THIN, "gray")
                };
                let _ = writeln!(svg, "{}", line(x, y, x + CELL_SIZE, y, width, color));
            }
            if c > 0 {
                let (width, color) = if puzzle.cage_of_cell[idx] != puzzle.cage_of_cell[idx - 1] {
                    (BORDER_THICK, "black")
                } else {
                    (BORDER_THIN, "gray")
                };
                let _ = writeln!(svg, "{}", line(x, y, x, y + CELL_SIZE, width, color));
            }
        }
    }

    // Outer frame, inset so the full stroke width stays inside the canvas.
    let inset = BORDER_THICK / 2.0;
    let _ = writeln!(
        svg,
        r#"  <rect x="{inset}" y="{inset}" width="{0}" height="{0}" fill="none" stroke="black" stroke-width="{BORDER_THICK}"/>"#,
        span - BORDER_THICK
    );

    // Cage target in the first cell (row-major) of each cage.
    for cage in &puzzle.cages {
        let idx = cage.cells.iter().copied().min().unwrap_or(0);
        let (r, c) = (idx / n, idx % n);
        let x = c as f64 * CELL_SIZE + 4.0;
        let y = r as f64 * CELL_SIZE + FONT_SIZE_SMALL + 2.0;
        let _ = writeln!(
            svg,
            r#"  <text x="{x}" y="{y}" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE_SMALL}" fill="black">{}</text>"#,
            cage.target
        );
    }

    if show_solution {
        for r in 0..n {
            for c in 0..n {
                let x = c as f64 * CELL_SIZE + CELL_SIZE / 2.0;
                let y = r as f64 * CELL_SIZE + CELL_SIZE / 2.0 + 12.0;
                let _ = writeln!(
                    svg,
                    r#"  <text x="{x}" y="{y}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE_LARGE}" fill="black">{}</text>"#,
                    puzzle.solution[r * n + c]
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
    use puzzle_core::kenken;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn every_cage_target_is_printed_once() {
        let mut rng = StdRng::seed_from_u64(7);
        let puzzle = kenken::generate(&mut rng).into_inner();

        let question = render(&puzzle, false);
        let targets = question.matches("<text").count();
        assert_eq!(targets, puzzle.cages.len());
        // Same font stack as every other sheet.
        assert!(question.contains(FONT_FAMILY));
    }

    #[test]
    fn answer_adds_the_board_digits() {
        let mut rng = StdRng::seed_from_u64(7);
        let puzzle = kenken::generate(&mut rng).into_inner();

        let question = render(&puzzle, false);
        let answer = render(&puzzle, true);
        let extra = answer.matches("<text").count() - question.matches("<text").count();
        assert_eq!(extra, puzzle.n * puzzle.n);
    }
}
