//! CLI for walking a saved maze

use std::{
    io::{self, Write},
    path::PathBuf,
    thread,
    time::Duration,
};

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use tracing::debug;

use ascii_maze::{logging, Moves, Outcome, Session, SessionStore};

/// Marks the cursor during playback
const S_CURSOR: char = '@';

/// Replay moves through a maze, with walls taken from the maze text itself
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Moves to apply in order, as letters U, D, L and R
    #[arg(short, long, default_value = "")]
    moves: Moves,

    /// Display every step on the terminal
    #[arg(short, long)]
    playback: bool,

    /// Playback frame length in milliseconds
    #[arg(short, long, default_value_t = 300)]
    frame_length: u64,

    /// Write the session with its final cursor to this file
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Load the session with this id from the sessions directory
    #[arg(long, conflicts_with = "file")]
    session: Option<String>,

    /// Directory of saved sessions
    #[arg(long, default_value = SessionStore::DEFAULT_DIR)]
    sessions_dir: PathBuf,

    /// List saved session ids and exit
    #[arg(long)]
    list: bool,

    /// Log more, repeat for even more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Session file to walk. Use `-` for stdin.
    #[arg(required_unless_present_any = ["session", "list"])]
    file: Option<PathBuf>,
}

/// Maze text with the cursor drawn on it
fn frame(session: &Session) -> String {
    session
        .maze
        .lines()
        .iter()
        .enumerate()
        .map(|(row, line)| {
            if row != session.cursor.row {
                return line.clone();
            }
            line.chars()
                .enumerate()
                .map(|(col, c)| if col == session.cursor.column { S_CURSOR } else { c })
                .collect()
        })
        .join("\n")
}

/// Clear the terminal and draw the current frame
fn write_frame<W: Write>(mut out: W, session: &Session) -> io::Result<()> {
    write!(out, "\x1B[2J\x1B[1;1H")?;
    writeln!(out, "{}", frame(session))?;
    out.flush()
}

/// Read session, apply moves, print where the cursor ended up
fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let store = SessionStore::new(&args.sessions_dir);
    if args.list {
        for id in store.list()? {
            println!("{id}");
        }
        return Ok(());
    }

    let mut session = match (&args.session, &args.file) {
        (Some(id), _) => store
            .load(id)
            .with_context(|| format!("Failed to load session `{id}`"))?,
        (None, Some(file)) if file.to_str() == Some("-") => Session::read_from(io::stdin().lock())
            .context("Failed to read session from stdin")?,
        (None, Some(file)) => Session::load(file)
            .with_context(|| format!("Failed to load session from {}", file.display()))?,
        (None, None) => anyhow::bail!("No session given"),
    };
    let navigator = session.navigator().context("Saved maze has no usable shape")?;

    if args.playback {
        write_frame(io::stdout().lock(), &session).context("Failed to draw frame")?;
    }

    let mut blocked = 0;
    for (step, &direction) in args.moves.0.iter().enumerate() {
        let outcome = session.apply(&navigator, direction).with_context(|| {
            format!(
                "Maze and cursor out of sync at move {} ({direction:?}), restart required",
                step + 1
            )
        })?;
        match outcome {
            Outcome::Moved(cursor) => debug!(%cursor, ?direction, "moved"),
            Outcome::Blocked => {
                blocked += 1;
                debug!(cursor = %session.cursor, ?direction, "blocked");
            }
        }

        if args.playback {
            thread::sleep(Duration::from_millis(args.frame_length));
            write_frame(io::stdout().lock(), &session).context("Failed to draw frame")?;
        }
    }

    println!(
        "Cursor at {} after {} moves, {} blocked.",
        session.cursor,
        args.moves.0.len(),
        blocked
    );
    if session.at_exit()? {
        println!("Exit reached.");
    }

    if let Some(path) = &args.save {
        session
            .save(path)
            .with_context(|| format!("Failed to save session to {}", path.display()))?;
    }
    Ok(())
}
