//! Pure SVG emitters, one module per puzzle type.
//!
//! Each module exposes `render(&Puzzle, show_solution) -> String`; the
//! same function draws the question sheet and the answer sheet so their
//! geometry can never drift apart.

pub mod building;
pub mod calcpuzzle;
pub mod countdown;
pub mod cryptarithm;
pub mod kenken;
pub mod matchstick;
pub mod maze;
pub mod mininumpre;
pub mod sumpuzzle;

/// Font stack that renders consistently on the print hosts.
pub(crate) const FONT_FAMILY: &str = "DejaVu Sans, Liberation Sans, Noto Sans, sans-serif";
