//! SVG sheet rendering and file output for the daily puzzle binaries.
//!
//! Every puzzle type gets one binary that generates a puzzle with
//! `puzzle-core`, renders a question sheet and an answer sheet through
//! [`render`], and writes the pair as `{date}_{type}.svg` and
//! `{date}_{type}_ans.svg` in the working directory.

pub mod date;
pub mod output;
pub mod render;
