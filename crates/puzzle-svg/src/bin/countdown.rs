use clap::Parser;
use puzzle_svg::{date, output, render};

/// Generate the daily countdown sheet pair.
#[derive(Parser)]
struct Args {
    /// Date prefix as YYYYMMDD; defaults to PUZZLE_DATE or today.
    date: Option<String>,
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let prefix = date::resolve_prefix(args.date.as_deref());
    let mut rng = rand::thread_rng();

    let puzzle = puzzle_core::countdown::generate(&mut rng);
    output::write_pair(
        &prefix,
        "countdown",
        &render::countdown::render(&puzzle, false),
        &render::countdown::render(&puzzle, true),
    )?;
    Ok(())
}
