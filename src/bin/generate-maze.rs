//! CLI for maze generation

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use ascii_maze::{logging, render, Cursor, MazeGenerator, MazeSize, Session, SessionStore};

/// Perfect maze generator with ASCII output
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Maze width in cells
    #[arg(long, default_value_t = 15)]
    width: usize,

    /// Maze height in cells
    #[arg(long, default_value_t = 10)]
    height: usize,

    /// Maze size as `<width>x<height>`, overrides width and height
    #[arg(long)]
    size: Option<MazeSize>,

    /// Random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Also save the maze as a new session under this id, cursor at the entrance
    #[arg(long)]
    save: Option<String>,

    /// Directory of saved sessions
    #[arg(long, default_value = SessionStore::DEFAULT_DIR)]
    sessions_dir: PathBuf,

    /// Log more, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Generate a maze, print it
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let size = match args.size {
        Some(size) => size,
        None => MazeSize::new(args.width, args.height)?,
    };

    let grid = MazeGenerator::new(args.seed).generate(size);
    let maze = render(&grid);
    print!("{maze}");

    if let Some(id) = args.save {
        let store = SessionStore::new(args.sessions_dir);
        let session = Session::new(Cursor::entrance(size), maze);
        let path = store
            .save(&id, &session)
            .with_context(|| format!("Failed to save session `{id}`"))?;
        info!(path = %path.display(), "session saved");
    }
    Ok(())
}
