//! Long-multiplication cryptarithm sheet. Known digits print as digits,
//! hidden digits print as outline shapes; the answer sheet prints the
//! digit each shape stands for.

use std::fmt::Write;

use puzzle_core::cryptarithm::{Cell, Puzzle};

use super::FONT_FAMILY;

const CELL_WIDTH: f64 = 50.0;
const CELL_HEIGHT: f64 = 60.0;
const LINE_HEIGHT: f64 = 65.0;
const SEPARATOR_HEIGHT: f64 = 20.0;
const PADDING_LEFT: f64 = 60.0;
const PADDING_TOP: f64 = 40.0;
const PADDING_RIGHT: f64 = 20.0;
const PADDING_BOTTOM: f64 = 20.0;
const FONT_SIZE: f64 = 36.0;
const SYMBOL_SIZE: f64 = 44.0;

fn shape(id: usize, cx: f64, cy: f64) -> String {
    let half = SYMBOL_SIZE / 2.0;
    let style = r#"fill="none" stroke="lightgray" stroke-width="2.5""#;
    match id {
        0 => format!(
            r#"  <polygon points="{:.1},{:.1} {:.1},{:.1} {:.1},{:.1}" {style}/>"#,
            cx,
            cy - half * 0.9,
            cx - half * 0.8,
            cy + half * 0.7,
            cx + half * 0.8,
            cy + half * 0.7
        ),
        1 => {
            let side = 0.7 * SYMBOL_SIZE;
            format!(
                r#"  <rect x="{:.1}" y="{:.1}" width="{side}" height="{side}" {style}/>"#,
                cx - side / 2.0,
                cy - side / 2.0
            )
        }
        _ => format!(
            r#"  <circle cx="{cx}" cy="{cy}" r="{:.1}" {style}/>"#,
            0.35 * SYMBOL_SIZE
        ),
    }
}

fn digit_text(x: f64, y: f64, digit: u8) -> String {
    format!(
        r#"  <text x="{x}" y="{y}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE}" fill="black">{digit}</text>"#
    )
}

fn draw_row(
    svg: &mut String,
    puzzle: &Puzzle,
    cells: &[Cell],
    shift: usize,
    max_width: usize,
    y: f64,
    show_solution: bool,
) {
    let start = max_width + 1 - cells.len() - shift;
    for (i, cell) in cells.iter().enumerate() {
        let x = PADDING_LEFT + (start + i) as f64 * CELL_WIDTH;
        let cx = x + CELL_WIDTH / 2.0;
        let text_y = y + 0.65 * CELL_HEIGHT;
        match *cell {
            Cell::Digit(d) => {
                let _ = writeln!(svg, "{}", digit_text(cx, text_y, d));
            }
            Cell::Symbol(s) => {
                if show_solution {
                    let _ = writeln!(svg, "{}", digit_text(cx, text_y, puzzle.mapping[s]));
                } else {
                    let _ = writeln!(svg, "{}", shape(s, cx, y + CELL_HEIGHT / 2.0));
                }
            }
        }
    }
}

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    let max_width = puzzle.rows.result.len();
    let number_rows = 3 + puzzle.rows.partials.len();
    let width = PADDING_LEFT + (max_width + 1) as f64 * CELL_WIDTH + PADDING_RIGHT;
    let height = PADDING_TOP
        + LINE_HEIGHT * number_rows as f64
        + SEPARATOR_HEIGHT * 2.0
        + PADDING_BOTTOM;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="{width}" height="{height}" fill="white"/>"#);

    let mut y = PADDING_TOP;
    draw_row(&mut svg, puzzle, &puzzle.rows.multiplicand, 0, max_width, y, show_solution);
    y += LINE_HEIGHT;

    draw_row(&mut svg, puzzle, &puzzle.rows.multiplier, 0, max_width, y, show_solution);
    let times_start = max_width + 1 - puzzle.rows.multiplier.len();
    let _ = writeln!(
        svg,
        r#"  <text x="{}" y="{}" text-anchor="middle" font-family="{FONT_FAMILY}" font-size="{FONT_SIZE}" fill="black">×</text>"#,
        PADDING_LEFT + times_start as f64 * CELL_WIDTH - CELL_WIDTH / 2.0,
        y + 0.65 * CELL_HEIGHT
    );
    y += LINE_HEIGHT;

    let _ = writeln!(
        svg,
        r#"  <line x1="{PADDING_LEFT}" y1="{0}" x2="{1}" y2="{0}" stroke="black" stroke-width="3"/>"#,
        y + SEPARATOR_HEIGHT / 2.0,
        width - PADDING_RIGHT
    );
    y += SEPARATOR_HEIGHT;

    for (shift, partial) in puzzle.rows.partials.iter().enumerate() {
        draw_row(&mut svg, puzzle, partial, shift, max_width, y, show_solution);
        y += LINE_HEIGHT;
    }

    let _ = writeln!(
        svg,
        r#"  <line x1="{PADDING_LEFT}" y1="{0}" x2="{1}" y2="{0}" stroke="black" stroke-width="3"/>"#,
        y + SEPARATOR_HEIGHT / 2.0,
        width - PADDING_RIGHT
    );
    y += SEPARATOR_HEIGHT;

    draw_row(&mut svg, puzzle, &puzzle.rows.result, 0, max_width, y, show_solution);

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::cryptarithm;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn answer_sheet_has_no_shapes_left() {
        let mut rng = StdRng::seed_from_u64(9);
        let puzzle = cryptarithm::generate(&mut rng).unwrap();

        let question = render(&puzzle, false);
        let answer = render(&puzzle, true);

        assert!(question.contains("lightgray"));
        assert!(!answer.contains("lightgray"));
    }

    #[test]
    fn both_sheets_draw_two_rule_lines() {
        let mut rng = StdRng::seed_from_u64(9);
        let puzzle = cryptarithm::generate(&mut rng).unwrap();
        let question = render(&puzzle, false);
        assert_eq!(question.matches("<line").count(), 2);
    }
}
