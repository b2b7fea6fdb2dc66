use clap::Parser;
use puzzle_svg::{date, output, render};

/// Generate the daily matchstick sheet pair.
#[derive(Parser)]
struct Args {
    /// Date prefix as YYYYMMDD; defaults to PUZZLE_DATE or today.
    date: Option<String>,

    /// Sticks the solver must move to restore the equation.
    #[arg(long, default_value_t = 2)]
    moves: usize,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();
    let prefix = date::resolve_prefix(args.date.as_deref());
    let mut rng = rand::thread_rng();

    let puzzle = puzzle_core::matchstick::generate(args.moves, &mut rng)?;
    output::write_pair(
        &prefix,
        "matchstick",
        &render::matchstick::render(&puzzle, false),
        &render::matchstick::render(&puzzle, true),
    )?;
    Ok(())
}
