//! Skyscraper sheet: clue numbers sit outside the grid with a small
//! arrow pointing along the viewing direction.

use std::fmt::Write;

use puzzle_core::skyscraper::Puzzle;

use super::FONT_FAMILY;

const CELL_SIZE: f64 = 50.0;
const HINT_SIZE: f64 = 40.0;
const PADDING: f64 = 10.0;
const ARROW_SIZE: f64 = 10.0;

fn arrow_down(x: f64, y: f64) -> String {
    let half = ARROW_SIZE / 2.0;
    format!(
        r#"<path d="M{},{} L{},{} L{},{} Z" fill="black"/>"#,
        x,
        y + ARROW_SIZE,
        x - half,
        y,
        x + half,
        y
    )
}

fn arrow_up(x: f64, y: f64) -> String {
    let half = ARROW_SIZE / 2.0;
    format!(
        r#"<path d="M{},{} L{},{} L{},{} Z" fill="black"/>"#,
        x,
        y,
        x - half,
        y + ARROW_SIZE,
        x + half,
        y + ARROW_SIZE
    )
}

fn arrow_right(x: f64, y: f64) -> String {
    let half = ARROW_SIZE / 2.0;
    format!(
        r#"<path d="M{},{} L{},{} L{},{} Z" fill="black"/>"#,
        x + ARROW_SIZE,
        y,
        x,
        y - half,
        x,
        y + half
    )
}

fn arrow_left(x: f64, y: f64) -> String {
    let half = ARROW_SIZE / 2.0;
    format!(
        r#"<path d="M{},{} L{},{} L{},{} Z" fill="black"/>"#,
        x,
        y,
        x + ARROW_SIZE,
        y - half,
        x + ARROW_SIZE,
        y + half
    )
}

fn hint_text(x: f64, y: f64, value: u8) -> String {
    format!(
        r#"  <text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="middle" font-family="{FONT_FAMILY}" font-size="18" fill="black">{value}</text>"#
    )
}

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    let n = puzzle.n;
    let grid_x = PADDING + HINT_SIZE;
    let grid_y = PADDING + HINT_SIZE;
    let grid_span = CELL_SIZE * n as f64;
    let total = HINT_SIZE * 2.0 + grid_span + PADDING * 2.0;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{total}" height="{total}" viewBox="0 0 {total} {total}">"#
    );

    for i in 0..=n {
        let y = grid_y + i as f64 * CELL_SIZE;
        let _ = writeln!(
            svg,
            r#"  <line x1="{grid_x}" y1="{y}" x2="{}" y2="{y}" stroke="black" stroke-width="1.5"/>"#,
            grid_x + grid_span
        );
        let x = grid_x + i as f64 * CELL_SIZE;
        let _ = writeln!(
            svg,
            r#"  <line x1="{x}" y1="{grid_y}" x2="{x}" y2="{}" stroke="black" stroke-width="1.5"/>"#,
            grid_y + grid_span
        );
    }

    for i in 0..n {
        let cx = grid_x + i as f64 * CELL_SIZE + CELL_SIZE / 2.0;
        let cy = grid_y + i as f64 * CELL_SIZE + CELL_SIZE / 2.0;

        let top = puzzle.clues.top[i];
        if top > 0 {
            let _ = writeln!(svg, "{}", hint_text(cx, PADDING + HINT_SIZE * 0.35, top));
            let _ = writeln!(svg, "  {}", arrow_down(cx, PADDING + HINT_SIZE * 0.55));
        }

        let bottom = puzzle.clues.bottom[i];
        if bottom > 0 {
            let base_y = grid_y + grid_span;
            let _ = writeln!(svg, "  {}", arrow_up(cx, base_y + HINT_SIZE * 0.12));
            let _ = writeln!(svg, "{}", hint_text(cx, base_y + HINT_SIZE * 0.75, bottom));
        }

        let left = puzzle.clues.left[i];
        if left > 0 {
            let _ = writeln!(svg, "{}", hint_text(PADDING + HINT_SIZE * 0.3, cy, left));
            let _ = writeln!(svg, "  {}", arrow_right(PADDING + HINT_SIZE * 0.5, cy));
        }

        let right = puzzle.clues.right[i];
        if right > 0 {
            let base_x = grid_x + grid_span;
            let _ = writeln!(svg, "  {}", arrow_left(base_x + HINT_SIZE * 0.1, cy));
            let _ = writeln!(svg, "{}", hint_text(base_x + HINT_SIZE * 0.7, cy, right));
        }
    }

    if show_solution {
        for r in 0..n {
            for c in 0..n {
                let cx = grid_x + c as f64 * CELL_SIZE + CELL_SIZE / 2.0;
                let cy = grid_y + r as f64 * CELL_SIZE + CELL_SIZE / 2.0;
                let _ = writeln!(
                    svg,
                    r#"  <text x="{cx}" y="{cy}" text-anchor="middle" dominant-baseline="middle" font-family="{FONT_FAMILY}" font-size="24" fill="black">{}</text>"#,
                    puzzle.solution[r][c]
                );
            }
        }
    }

    svg.push_str("</svg>\n");
    svg
}
