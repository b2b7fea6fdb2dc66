use clap::Parser;
use puzzle_svg::{date, output, render};

/// Generate the daily sum puzzle sheet pair.
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

    let puzzle = puzzle_core::sumpuzzle::generate(&mut rng)?;
    output::write_pair(
        &prefix,
        "sumpuzzle",
        &render::sumpuzzle::render(&puzzle, false),
        &render::sumpuzzle::render(&puzzle, true),
    )?;
    Ok(())
}
