use clap::Parser;
use puzzle_svg::{date, output, render};

/// Generate the daily maze sheet pair.
#[derive(Parser)]
struct Args {
    /// Date prefix as YYYYMMDD; defaults to PUZZLE_DATE or today.
    date: Option<String>,

    /// Maze width in cells.
    #[arg(long, default_value_t = 75)]
    width: usize,

    /// Maze height in cells.
    #[arg(long, default_value_t = 50)]
    height: usize,

    /// Carving randomness in 0..=1; higher values branch more.
    #[arg(long, default_value_t = 0.5)]
    entropy: f64,
}

fn main() -> std::io::Result<()> {
    env_logger::init();
    let args = Args::parse();
    let prefix = date::resolve_prefix(args.date.as_deref());
    let mut rng = rand::thread_rng();

    let maze = puzzle_core::maze::generate(args.width, args.height, args.entropy, &mut rng);
    output::write_pair(
        &prefix,
        "maze",
        &render::maze::render(&maze, false),
        &render::maze::render(&maze, true),
    )?;
    Ok(())
}
