//! Countdown sheet: the same four digits on every row, empty operator
//! boxes between them, and the target falling from 5 down to 0.

use std::fmt::Write;

use puzzle_core::countdown::{Puzzle, TARGETS};

use super::FONT_FAMILY;

const ROW_HEIGHT: f64 = 28.0;
const PADDING: f64 = 8.0;
const NUM_WIDTH: f64 = 18.0;
const BOX_SIZE: f64 = 22.0;
const BOX_SPACING: f64 = BOX_SIZE + 4.0;
const EQ_WIDTH: f64 = 20.0;

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    let width = PADDING * 2.0 + NUM_WIDTH * 4.0 + BOX_SPACING * 3.0 + EQ_WIDTH + NUM_WIDTH;
    let height = PADDING * 2.0 + ROW_HEIGHT * TARGETS.len() as f64;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(
        svg,
        "  <style>text {{ font-family: {FONT_FAMILY}; font-size: 18px; fill: black; }} .box {{ fill: none; stroke: lightgray; stroke-width: 1; }}</style>"
    );
    let _ = writeln!(svg, r#"  <rect width="{width}" height="{height}" fill="white"/>"#);

    for (row, &target) in TARGETS.iter().enumerate() {
        let base_y = PADDING + row as f64 * ROW_HEIGHT;
        let text_y = base_y + ROW_HEIGHT * 0.72;
        let mut x = PADDING;

        for (i, &number) in puzzle.numbers.iter().enumerate() {
            let _ = writeln!(
                svg,
                r#"  <text x="{}" y="{text_y}" text-anchor="middle">{number}</text>"#,
                x + NUM_WIDTH / 2.0
            );
            x += NUM_WIDTH;
            if i < 3 {
                let box_x = x + (BOX_SPACING - BOX_SIZE) / 2.0;
                let box_y = base_y + (ROW_HEIGHT - BOX_SIZE) / 2.0;
                let _ = writeln!(
                    svg,
                    r#"  <rect x="{box_x}" y="{box_y}" width="{BOX_SIZE}" height="{BOX_SIZE}" rx="2" class="box"/>"#
                );
                if show_solution {
                    if let Some(ops) = puzzle.solutions[row] {
                        let _ = writeln!(
                            svg,
                            r#"  <text x="{}" y="{text_y}" text-anchor="middle">{}</text>"#,
                            x + BOX_SPACING / 2.0,
                            ops[i].symbol()
                        );
                    }
                }
                x += BOX_SPACING;
            }
        }

        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{text_y}" text-anchor="middle">=</text>"#,
            x + EQ_WIDTH / 2.0
        );
        x += EQ_WIDTH;
        let _ = writeln!(
            svg,
            r#"  <text x="{}" y="{text_y}" text-anchor="middle">{target}</text>"#,
            x + NUM_WIDTH / 2.0
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::countdown;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn six_rows_of_three_operator_boxes() {
        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = countdown::generate(&mut rng);
        let question = render(&puzzle, false);
        assert_eq!(question.matches("class=\"box\"").count(), 18);
    }

    #[test]
    fn answer_fills_every_box() {
        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = countdown::generate(&mut rng);
        let answer = render(&puzzle, true);
        let question = render(&puzzle, false);
        let extra = answer.matches("<text").count() - question.matches("<text").count();
        assert_eq!(extra, 18);
    }
}
