use clap::Parser;
use puzzle_core::minisudoku::{self, Symmetry};
use puzzle_svg::{date, output, render};

/// Generate the daily 6x6 number-place sheet pair.
#[derive(Parser)]
struct Args {
    /// Date prefix as YYYYMMDD; defaults to PUZZLE_DATE or today.
    date: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let prefix = date::resolve_prefix(args.date.as_deref());
    let mut rng = rand::thread_rng();

    // The hint symmetry rotates with the calendar date.
    let symmetry = Symmetry::from_day_number(date::day_number(&prefix));
    let target = minisudoku::random_target_hints(&mut rng);
    let puzzle = minisudoku::generate(target, symmetry, &mut rng)?;
    output::write_pair(
        &prefix,
        "mininumpre",
        &render::mininumpre::render(&puzzle, false),
        &render::mininumpre::render(&puzzle, true),
    )?;
    Ok(())
}
