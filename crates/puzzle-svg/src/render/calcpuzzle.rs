//! Calc puzzle sheet: a 3x3 grid of shape symbols with operators between
//! them and the row/column results at the edges. Equal shapes hold equal
//! values; the answer sheet writes each value inside its shape.

use std::f64::consts::PI;
use std::fmt::Write;

use puzzle_core::calcpuzzle::{Op, Puzzle};

use super::FONT_FAMILY;

const SYMBOL_SIZE: f64 = 48.0;
const OP_WIDTH: f64 = 28.0;
const EQ_WIDTH: f64 = 24.0;
const RESULT_WIDTH: f64 = 44.0;
const RESULT_HEIGHT: f64 = 28.0;
const ROW_GAP: f64 = 4.0;
const COL_GAP: f64 = 2.0;
const MARGIN: f64 = 12.0;
const SHAPE_STROKE: &str = "#B0B0B0";
const SYMBOL_Y_OFFSET: f64 = -3.0;

// Bands across the sheet: symbol, operator, symbol, operator, symbol,
// equals, result. Same order both horizontally and vertically.
const COL_WIDTHS: [f64; 7] = [
    SYMBOL_SIZE,
    OP_WIDTH,
    SYMBOL_SIZE,
    OP_WIDTH,
    SYMBOL_SIZE,
    EQ_WIDTH,
    RESULT_WIDTH,
];
const ROW_HEIGHTS: [f64; 7] = [
    SYMBOL_SIZE,
    OP_WIDTH,
    SYMBOL_SIZE,
    OP_WIDTH,
    SYMBOL_SIZE,
    EQ_WIDTH,
    RESULT_HEIGHT,
];

fn band_center(sizes: &[f64; 7], gap: f64, band: usize) -> f64 {
    let mut pos = MARGIN;
    for size in &sizes[..band] {
        pos += size + gap;
    }
    pos + sizes[band] / 2.0
}

fn col_center(band: usize) -> f64 {
    band_center(&COL_WIDTHS, COL_GAP, band)
}

fn row_center(band: usize) -> f64 {
    band_center(&ROW_HEIGHTS, ROW_GAP, band)
}

fn op_symbol(op: Op) -> char {
    match op {
        Op::Add => '+',
        Op::Sub => '−',
        Op::Mul => '×',
        Op::Div => '÷',
    }
}

fn polygon(points: &[(f64, f64)]) -> String {
    let coords: Vec<String> = points.iter().map(|(x, y)| format!("{x:.2},{y:.2}")).collect();
    format!(
        r#"  <polygon points="{}" fill="none" stroke="{SHAPE_STROKE}" stroke-width="2.5"/>"#,
        coords.join(" ")
    )
}

fn regular_polygon(cx: f64, cy: f64, radius: f64, sides: usize, start_deg: f64) -> String {
    let points: Vec<(f64, f64)> = (0..sides)
        .map(|i| {
            let angle = (start_deg + i as f64 * 360.0 / sides as f64) * PI / 180.0;
            (cx + radius * angle.cos(), cy + radius * angle.sin())
        })
        .collect();
    polygon(&points)
}

/// Draw shape `id` centered on (`cx`, `cy`).
fn shape(id: usize, cx: f64, cy: f64) -> String {
    let half = SYMBOL_SIZE / 2.0;
    match id {
        0 => format!(
            r#"  <circle cx="{cx}" cy="{cy}" r="{}" fill="none" stroke="{SHAPE_STROKE}" stroke-width="2.5"/>"#,
            half - 2.0
        ),
        1 => regular_polygon(cx, cy, 0.95 * (half - 2.0), 6, -90.0),
        2 => regular_polygon(cx, cy, half - 2.0, 3, -90.0),
        3 => {
            let outer = half - 2.0;
            let inner = 0.4 * outer;
            let points: Vec<(f64, f64)> = (0..10)
                .map(|i| {
                    let radius = if i % 2 == 0 { outer } else { inner };
                    let angle = (i as f64 * 36.0 - 90.0) * PI / 180.0;
                    (cx + radius * angle.cos(), cy + radius * angle.sin())
                })
                .collect();
            polygon(&points)
        }
        4 => regular_polygon(cx, cy, half - 3.0, 5, -90.0),
        _ => {
            let w = SYMBOL_SIZE - 6.0;
            let h = 0.55 * SYMBOL_SIZE;
            format!(
                r#"  <rect x="{}" y="{}" width="{w}" height="{h}" rx="{}" fill="none" stroke="{SHAPE_STROKE}" stroke-width="2.5"/>"#,
                cx - w / 2.0,
                cy - h / 2.0,
                h / 2.0
            )
        }
    }
}

fn text(x: f64, y: f64, size: f64, content: &str) -> String {
    format!(
        r#"  <text x="{x}" y="{y}" text-anchor="middle" dominant-baseline="middle" font-family="{FONT_FAMILY}" font-size="{size}" fill="black">{content}</text>"#
    )
}

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    let width = MARGIN * 2.0 + COL_WIDTHS.iter().sum::<f64>() + COL_GAP * 6.0;
    let height = MARGIN * 2.0 + ROW_HEIGHTS.iter().sum::<f64>() + ROW_GAP * 6.0;

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="{width}" height="{height}" fill="white"/>"#);

    for r in 0..3 {
        for c in 0..3 {
            let cx = col_center(c * 2);
            let cy = row_center(r * 2) + SYMBOL_Y_OFFSET;
            let symbol = puzzle.symbol_indices[r * 3 + c];
            let _ = writeln!(svg, "{}", shape(symbol, cx, cy));
            if show_solution {
                let _ = writeln!(svg, "{}", text(cx, cy, 20.0, &puzzle.values[symbol].to_string()));
            }
        }
    }

    for r in 0..3 {
        let cy = row_center(r * 2);
        for (k, &op) in puzzle.row_ops[r].iter().enumerate() {
            let _ = writeln!(
                svg,
                "{}",
                text(col_center(k * 2 + 1), cy, 18.0, &op_symbol(op).to_string())
            );
        }
        let _ = writeln!(svg, "{}", text(col_center(5), cy, 18.0, "="));
        let _ = writeln!(
            svg,
            "{}",
            text(col_center(6), cy, 20.0, &puzzle.row_results[r].to_string())
        );
    }

    for c in 0..3 {
        let cx = col_center(c * 2);
        for (k, &op) in puzzle.col_ops[c].iter().enumerate() {
            let _ = writeln!(
                svg,
                "{}",
                text(cx, row_center(k * 2 + 1), 18.0, &op_symbol(op).to_string())
            );
        }
        let _ = writeln!(svg, "{}", text(cx, row_center(5), 18.0, "="));
        let _ = writeln!(
            svg,
            "{}",
            text(cx, row_center(6), 20.0, &puzzle.col_results[c].to_string())
        );
    }

    svg.push_str("</svg>\n");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::calcpuzzle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn question_shows_results_but_not_values() {
        let mut rng = StdRng::seed_from_u64(3);
        let puzzle = calcpuzzle::generate(&mut rng).into_inner();

        let question = render(&puzzle, false);
        let answer = render(&puzzle, true);

        assert!(question.contains(&format!(">{}<", puzzle.row_results[0])));
        // Nine cell values appear only on the answer sheet.
        let extra = answer.matches("<text").count() - question.matches("<text").count();
        assert_eq!(extra, 9);
    }

    #[test]
    fn one_shape_per_cell() {
        let mut rng = StdRng::seed_from_u64(3);
        let puzzle = calcpuzzle::generate(&mut rng).into_inner();
        let question = render(&puzzle, false);
        let shapes = question.matches("<polygon").count()
            + question.matches("<circle").count()
            + question.matches(r#"rx=""#).count();
        assert_eq!(shapes, 9);
    }
}
