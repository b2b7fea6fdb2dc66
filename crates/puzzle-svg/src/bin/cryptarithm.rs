use clap::Parser;
use puzzle_svg::{date, output, render};

/// Generate the daily cryptarithm sheet pair.
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

    let puzzle = puzzle_core::cryptarithm::generate(&mut rng)?;
    output::write_pair(
        &prefix,
        "cryptarithm",
        &render::cryptarithm::render(&puzzle, false),
        &render::cryptarithm::render(&puzzle, true),
    )?;
    Ok(())
}
