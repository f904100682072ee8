//! Saved play sessions
//!
//! A session file holds the cursor on its first line, as
//! `"<column> <row>"`, followed byte for byte by the rendered maze. Loading
//! copies the maze text straight back; nothing is regenerated.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::grid::SizeError;
use crate::navigator::{Cursor, Move, NavigationError, Navigator, Outcome};
use crate::render::Rendered;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("session is empty, expected cursor coordinates on the first line")]
    MissingHeader,
    #[error("wrong coordinates values `{0}`, expected `<column> <row>`")]
    Coordinates(String),
    #[error("wrong X coordinates value `{0}`")]
    Column(String),
    #[error("wrong Y coordinates value `{0}`")]
    Row(String),
    #[error("invalid session id `{0}`")]
    InvalidId(String),
    #[error("saved maze line {line} is not plain ASCII")]
    NonAscii { line: usize },
    #[error("saved maze has an invalid shape: {0}")]
    Shape(#[from] SizeError),
}

/// Cursor together with the maze it walks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub cursor: Cursor,
    pub maze: Rendered,
}

impl Session {
    pub fn new(cursor: Cursor, maze: Rendered) -> Self {
        Self { cursor, maze }
    }

    /// Navigator sized after the saved maze
    pub fn navigator(&self) -> Result<Navigator, SessionError> {
        Ok(Navigator::new(self.maze.size()?))
    }

    /// Whether the cursor stands on the exit cell
    pub fn at_exit(&self) -> Result<bool, SessionError> {
        Ok(self.cursor == Cursor::exit(self.maze.size()?))
    }

    /// Attempt `direction` and keep the new cursor if the move succeeds
    pub fn apply(
        &mut self,
        navigator: &Navigator,
        direction: Move,
    ) -> Result<Outcome, NavigationError> {
        let outcome = navigator.try_move(&self.maze, self.cursor, direction)?;
        if let Outcome::Moved(cursor) = outcome {
            self.cursor = cursor;
        }
        Ok(outcome)
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{} {}", self.cursor.column, self.cursor.row)?;
        write!(writer, "{}", self.maze)?;
        writer.flush()
    }

    pub fn read_from<R: BufRead>(mut reader: R) -> Result<Self, SessionError> {
        let mut header = String::new();
        if reader.read_line(&mut header)? == 0 {
            return Err(SessionError::MissingHeader);
        }

        let fields: Vec<&str> = header.split_whitespace().collect();
        let [column, row] = fields.as_slice() else {
            return Err(SessionError::Coordinates(header.trim().to_string()));
        };
        let column = column
            .parse()
            .map_err(|_| SessionError::Column(column.to_string()))?;
        let row = row
            .parse()
            .map_err(|_| SessionError::Row(row.to_string()))?;

        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        // Maze lines follow the header, so the first one is line 2
        if let Some(index) = text.lines().position(|line| !line.is_ascii()) {
            return Err(SessionError::NonAscii { line: index + 2 });
        }

        Ok(Self {
            cursor: Cursor::new(column, row),
            maze: Rendered::from_text(&text),
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let file = File::create(path.as_ref())?;
        self.write_to(BufWriter::new(file))?;
        debug!(path = %path.as_ref().display(), cursor = %self.cursor, "session saved");
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let file = File::open(path.as_ref())?;
        let session = Self::read_from(BufReader::new(file))?;
        debug!(path = %path.as_ref().display(), cursor = %session.cursor, "session loaded");
        Ok(session)
    }
}

/// Directory of named session files
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
}

impl SessionStore {
    pub const DEFAULT_DIR: &'static str = "savedsessions";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, id: &str) -> Result<PathBuf, SessionError> {
        let valid = !id.is_empty()
            && id != "."
            && id != ".."
            && !id.contains(['/', '\\'])
            && Path::new(id).file_name().is_some();
        if !valid {
            return Err(SessionError::InvalidId(id.to_string()));
        }
        Ok(self.dir.join(id))
    }

    /// Save `session` under `id`, creating the store directory if needed
    pub fn save(&self, id: &str, session: &Session) -> Result<PathBuf, SessionError> {
        let path = self.path_of(id)?;
        if !self.dir.exists() {
            info!(dir = %self.dir.display(), "creating sessions directory");
            fs::create_dir_all(&self.dir)?;
        }
        session.save(&path)?;
        Ok(path)
    }

    pub fn load(&self, id: &str) -> Result<Session, SessionError> {
        Session::load(self.path_of(id)?)
    }

    /// Ids of saved sessions, sorted. A missing directory means no sessions.
    pub fn list(&self) -> Result<Vec<String>, SessionError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(dir = %self.dir.display(), "no saved sessions");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    ids.push(name.to_string());
                }
            }
        }
        ids.sort();
        Ok(ids)
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIR)
    }
}
