//! Writing the question/answer sheet pair to the working directory.

use std::fs;
use std::io;
use std::path::PathBuf;

use log::info;

pub struct SheetPair {
    pub puzzle: PathBuf,
    pub answer: PathBuf,
}

/// Write `{prefix}_{kind}.svg` and `{prefix}_{kind}_ans.svg`.
pub fn write_pair(
    prefix: &str,
    kind: &str,
    puzzle_svg: &str,
    answer_svg: &str,
) -> io::Result<SheetPair> {
    let puzzle = PathBuf::from(format!("{prefix}_{kind}.svg"));
    let answer = PathBuf::from(format!("{prefix}_{kind}_ans.svg"));
    fs::write(&puzzle, puzzle_svg)?;
    info!("wrote {}", puzzle.display());
    fs::write(&answer, answer_svg)?;
    info!("wrote {}", answer.display());
    Ok(SheetPair { puzzle, answer })
}
