//! 6x6 number-place sheet with 2x3 blocks.

use std::fmt::Write;

use puzzle_core::minisudoku::{Puzzle, BLOCK_COLS, BLOCK_ROWS, SIZE};

use super::FONT_FAMILY;

const CELL_SIZE: f64 = 50.0;
const THICK: f64 = 3.0;
const THIN: f64 = 1.0;

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    let span = CELL_SIZE * SIZE as f64;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{span}" height="{span}" viewBox="0 0 {span} {span}">"#
    );
    let _ = writeln!(
        svg,
        "  <style>.digit {{ font-family: {FONT_FAMILY}; font-size: 36px; fill: black; }} .digit-answer {{ font-family: {FONT_FAMILY}; font-size: 36px; fill: #666666; }}</style>"
    );
    let _ = writeln!(svg, r#"  <rect width="{span}" height="{span}" fill="white"/>"#);

    for (r, row) in puzzle.hints.iter().enumerate() {
        for (c, &value) in row.iter().enumerate() {
            let x = c as f64 * CELL_SIZE + CELL_SIZE / 2.0;
            let y = r as f64 * CELL_SIZE + CELL_SIZE * 0.65;
            if value > 0 {
                let _ = writeln!(
                    svg,
                    r#"  <text x="{x}" y="{y}" text-anchor="middle" class="digit">{value}</text>"#
                );
            } else if show_solution {
                let _ = writeln!(
                    svg,
                    r#"  <text x="{x}" y="{y}" text-anchor="middle" class="digit-answer">{}</text>"#,
                    puzzle.solution[r][c]
                );
            }
        }
    }

    // Block borders thick, cell borders thin.
    for i in 0..=SIZE {
        let pos = i as f64 * CELL_SIZE;
        let (h_width, h_color) = if i % BLOCK_ROWS == 0 {
            (THICK, "black")
        } else {
            (THIN, "#999999")
        };
        let _ = writeln!(
            svg,
            r#"  <line x1="0" y1="{pos}" x2="{span}" y2="{pos}" stroke="{h_color}" stroke-width="{h_width}"/>"#
        );
        let (v_width, v_color) = if i % BLOCK_COLS == 0 {
            (THICK, "black")
        } else {
            (THIN, "#999999")
        };
        let _ = writeln!(
            svg,
            r#"  <line x1="{pos}" y1="0" x2="{pos}" y2="{span}" stroke="{v_color}" stroke-width="{v_width}"/>"#
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::minisudoku::{self, Symmetry};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn question_and_answer_cover_all_cells_between_them() {
        let mut rng = StdRng::seed_from_u64(11);
        let puzzle = minisudoku::generate(11, Symmetry::Rotational, &mut rng).unwrap();

        let question = render(&puzzle, false);
        let answer = render(&puzzle, true);

        assert_eq!(question.matches("class=\"digit\"").count(), puzzle.hint_count());
        assert_eq!(
            answer.matches("class=\"digit-answer\"").count(),
            SIZE * SIZE - puzzle.hint_count()
        );
    }
}
