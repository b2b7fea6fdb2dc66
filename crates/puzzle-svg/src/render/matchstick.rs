//! Matchstick sheet: seven-segment digits drawn as stick rectangles over
//! pale ghost segments, so the solver can see where sticks may move to.

use std::fmt::Write;

use puzzle_core::matchstick::{
    Board, Puzzle, OP_BS, OP_FS, OP_H, OP_V, SEG_A, SEG_B, SEG_C, SEG_D, SEG_E, SEG_F, SEG_G,
};

const DIGIT_W: f64 = 110.0;
const DIGIT_H: f64 = 200.0;
const SEG_T: f64 = 16.0;
const GAP: f64 = 14.0;
const DIGIT_GAP: f64 = 8.0;
const OP_W: f64 = DIGIT_W;
const EQ_W: f64 = 60.0;
const MARGIN: f64 = 20.0;
const RX: f64 = 8.0;
const GHOST_DIGIT: &str = "#e8e8e8";
const GHOST_OP: &str = "#ededed";

const SEGMENTS: [u8; 7] = [SEG_A, SEG_B, SEG_C, SEG_D, SEG_E, SEG_F, SEG_G];

/// Rect (x, y, w, h) of one segment relative to the digit origin.
fn segment_rect(seg: u8, x: f64, y: f64) -> (f64, f64, f64, f64) {
    let long = DIGIT_H / 2.0 - SEG_T;
    let wide = DIGIT_W - SEG_T * 2.0;
    match seg {
        SEG_A => (x + SEG_T, y, wide, SEG_T),
        SEG_B => (x + DIGIT_W - SEG_T, y + SEG_T, SEG_T, long),
        SEG_C => (x + DIGIT_W - SEG_T, y + DIGIT_H / 2.0, SEG_T, long),
        SEG_D => (x + SEG_T, y + DIGIT_H - SEG_T, wide, SEG_T),
        SEG_E => (x, y + DIGIT_H / 2.0, SEG_T, long),
        SEG_F => (x, y + SEG_T, SEG_T, long),
        _ => (x + SEG_T, y + DIGIT_H / 2.0 - SEG_T / 2.0, wide, SEG_T),
    }
}

fn stick(x: f64, y: f64, w: f64, h: f64, fill: &str) -> String {
    format!(r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{RX}" fill="{fill}"/>"#)
}

fn rotated_bar(cx: f64, cy: f64, len: f64, angle_deg: f64, fill: &str) -> String {
    format!(
        r#"  <rect x="{}" y="{}" width="{len}" height="{SEG_T}" rx="{RX}" fill="{fill}" transform="rotate({angle_deg} {cx} {cy})"/>"#,
        cx - len / 2.0,
        cy - SEG_T / 2.0
    )
}

/// Operator sticks centered on (`cx`, `cy`); `mask` selects which.
fn op_sticks(cx: f64, cy: f64, mask: u8, fill: &str, out: &mut Vec<String>) {
    let h_len = DIGIT_W - SEG_T * 2.0;
    let v_len = DIGIT_H / 2.0 - SEG_T;
    if mask & OP_H != 0 {
        out.push(stick(cx - h_len / 2.0, cy - SEG_T / 2.0, h_len, SEG_T, fill));
    }
    if mask & OP_V != 0 {
        out.push(stick(cx - SEG_T / 2.0, cy - v_len / 2.0, SEG_T, v_len, fill));
    }
    if mask & OP_FS != 0 {
        out.push(rotated_bar(cx, cy, h_len, -45.0, fill));
    }
    if mask & OP_BS != 0 {
        out.push(rotated_bar(cx, cy, h_len, 45.0, fill));
    }
}

fn draw_board(board: &Board) -> String {
    // Cell pairs, operator, equals sign, laid out left to right.
    let mut cell_x = [0.0f64; 6];
    let mut x = MARGIN;
    cell_x[0] = x;
    x += DIGIT_W + DIGIT_GAP;
    cell_x[1] = x;
    x += DIGIT_W + GAP * 2.0;
    let op_cx = x + OP_W / 2.0;
    x += OP_W + GAP * 2.0;
    cell_x[2] = x;
    x += DIGIT_W + DIGIT_GAP;
    cell_x[3] = x;
    x += DIGIT_W + GAP * 2.0;
    let eq_x = x;
    x += EQ_W + GAP * 2.0;
    cell_x[4] = x;
    x += DIGIT_W + DIGIT_GAP;
    cell_x[5] = x;
    x += DIGIT_W + MARGIN;

    let width = x;
    let height = DIGIT_H + MARGIN * 2.0;
    let top = MARGIN;
    let center_y = top + DIGIT_H / 2.0;

    let mut ghosts = Vec::new();
    let mut sticks = Vec::new();

    for (i, &cx) in cell_x.iter().enumerate() {
        for seg in SEGMENTS {
            let (rx, ry, w, h) = segment_rect(seg, cx, top);
            if board.cells[i] & seg != 0 {
                sticks.push(stick(rx, ry, w, h, "black"));
            } else {
                ghosts.push(stick(rx, ry, w, h, GHOST_DIGIT));
            }
        }
    }

    op_sticks(op_cx, center_y, !board.op_sticks, GHOST_OP, &mut ghosts);
    op_sticks(op_cx, center_y, board.op_sticks, "black", &mut sticks);

    // The equals sign is fixed furniture, never a movable stick.
    for dy in [-24.0, 24.0] {
        sticks.push(stick(eq_x, center_y + dy - SEG_T / 2.0, EQ_W, SEG_T, "black"));
    }

    let mut svg = String::new();
    let _ = writeln!(svg, r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
    let _ = writeln!(svg, r#"  <rect width="{width}" height="{height}" fill="white"/>"#);
    for ghost in ghosts {
        let _ = writeln!(svg, "{ghost}");
    }
    for stick in sticks {
        let _ = writeln!(svg, "{stick}");
    }
    svg.push_str("</svg>\n");
    svg
}

pub fn render(puzzle: &Puzzle, show_solution: bool) -> String {
    if show_solution {
        draw_board(&Board::from_equation(&puzzle.answer))
    } else {
        draw_board(&puzzle.board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use puzzle_core::matchstick;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn question_and_answer_use_the_same_stick_total() {
        let mut rng = StdRng::seed_from_u64(2);
        let puzzle = matchstick::generate(2, &mut rng).unwrap();

        let question = render(&puzzle, false);
        let answer = render(&puzzle, true);

        let black = |s: &str| s.matches(r#"fill="black""#).count();
        assert_eq!(black(&question), black(&answer));
    }

    #[test]
    fn ghost_segments_are_present_on_the_question_sheet() {
        let mut rng = StdRng::seed_from_u64(2);
        let puzzle = matchstick::generate(2, &mut rng).unwrap();
        let question = render(&puzzle, false);
        assert!(question.contains(GHOST_DIGIT));
    }
}
