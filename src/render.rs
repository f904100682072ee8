//! ASCII rendering of a maze grid
//!
//! Every cell takes two characters on its row: the south character, then
//! the boundary shared with the next cell to the right. A top border line
//! is added above the first row, with a gap above the entrance. The
//! [crate::navigator] uses this exact text as its collision map.

use std::fmt;

use itertools::Itertools;

use crate::grid::{Cell, Grid, MazeSize, SizeError};

/// Free space
pub const OPEN: char = ' ';
/// Floor below a cell: a closed south wall
pub const CLOSED: char = '_';
/// Vertical wall between two columns
pub const WALL: char = '|';

/// Rendered maze, one line of text per buffer row.
///
/// A maze of `w x h` cells renders to `h + 1` lines of `2w + 1` characters.
/// The text is plain ASCII: the navigator addresses it byte by byte, and
/// sessions refuse to load anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    lines: Vec<String>,
}

impl Rendered {
    /// Read back a buffer from its text form, as written by [fmt::Display]
    pub fn from_text(text: &str) -> Self {
        Self {
            lines: text.lines().map(String::from).collect(),
        }
    }

    /// Line at `row`, if the buffer has it
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maze size implied by the shape of the buffer
    pub fn size(&self) -> Result<MazeSize, SizeError> {
        let height = self.lines.len().saturating_sub(1);
        let width = self
            .lines
            .first()
            .map_or(0, |top| top.len().saturating_sub(1) / 2);
        MazeSize::new(width, height)
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lines.is_empty() {
            return Ok(());
        }
        writeln!(f, "{}", self.lines.iter().join("\n"))
    }
}

/// Render `grid` to text. Pure: equal grids render to equal buffers.
pub fn render(grid: &Grid) -> Rendered {
    let mut lines = Vec::with_capacity(grid.height() + 1);
    lines.push(top_border(grid.width()));
    lines.extend(grid.rows().iter().map(|row| render_row(row)));
    Rendered { lines }
}

/// `2w + 1` columns of floor, open at column 0 and at the two columns
/// `w` and `w + 1` above the entrance
fn top_border(width: usize) -> String {
    (0..=2 * width)
        .map(|col| {
            if col == 0 || col == width || col == width + 1 {
                OPEN
            } else {
                CLOSED
            }
        })
        .collect()
}

fn render_row(row: &[Cell]) -> String {
    let mut line = String::with_capacity(2 * row.len() + 1);
    line.push(WALL);

    for (x, cell) in row.iter().enumerate() {
        line.push(if cell.contains(Cell::SOUTH) {
            OPEN
        } else {
            CLOSED
        });

        let boundary = if !cell.contains(Cell::WEST) {
            WALL
        } else {
            // Floor under the boundary is open if either side is open below
            let east = row.get(x + 1).copied().unwrap_or_default();
            if (*cell | east).contains(Cell::SOUTH) {
                OPEN
            } else {
                CLOSED
            }
        };
        line.push(boundary);
    }

    line
}
