//! Movement through a rendered maze
//!
//! The navigator never looks at the [crate::grid::Grid]: walls are whatever
//! the rendered text says they are. A cursor lives in buffer coordinates,
//! so cell `(x, y)` sits at column `1 + 2x` of line `y + 1`, and every move
//! is a single character step.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::warn;

use crate::grid::{MazeSize, Point};
use crate::render::{Rendered, CLOSED, WALL};

/// Position inside the rendered buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cursor {
    pub column: usize,
    pub row: usize,
}

impl Cursor {
    pub fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }

    /// Cursor on the south character of grid cell `p`
    pub fn for_cell(p: Point) -> Self {
        Self::new(1 + 2 * p.x, p.y + 1)
    }

    /// Cursor in the top border gap, right above the entrance cell
    pub fn entrance(size: MazeSize) -> Self {
        Self::new(1 + 2 * size.entrance().x, 0)
    }

    /// Cursor on the exit cell
    pub fn exit(size: MazeSize) -> Self {
        Self::for_cell(size.exit())
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(X:{} | Y:{})", self.column, self.row)
    }
}

/// Requested move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Move from its letter, `U`, `D`, `L` or `R` in either case
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'U' => Some(Move::Up),
            'D' => Some(Move::Down),
            'L' => Some(Move::Left),
            'R' => Some(Move::Right),
            _ => None,
        }
    }
}

/// A move script contains an unknown letter
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown move `{letter}` at position {position}, expected one of U, D, L, R")]
pub struct ParseMovesError {
    pub letter: char,
    pub position: usize,
}

/// Sequence of moves, parsed from letters such as `"DDRRL"`.
///
/// Whitespace is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Moves(pub Vec<Move>);

impl FromStr for Moves {
    type Err = ParseMovesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(position, letter)| {
                Move::from_char(letter).ok_or(ParseMovesError { letter, position })
            })
            .collect::<Result<_, _>>()
            .map(Moves)
    }
}

/// Result of a legal move request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Cursor moved one step to the contained position
    Moved(Cursor),
    /// Wall or edge of the maze, cursor stays put
    Blocked,
}

/// Buffer and cursor disagree: the cursor addresses text that does not exist.
///
/// Fatal for the session. Continuing to walk such a buffer could only yield
/// an inconsistent cursor, so the caller should stop and start over.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NavigationError {
    #[error("rendered maze has no line {row} (cursor at {cursor})")]
    MissingLine { row: usize, cursor: Cursor },
    #[error("line {row} of rendered maze has no column {column} (cursor at {cursor})")]
    MissingColumn {
        row: usize,
        column: usize,
        cursor: Cursor,
    },
}

/// Collision checks against a rendered maze of known size.
///
/// Every move first reads the character under the cursor, so a cursor
/// outside of the buffer is reported as an error even where the move would
/// otherwise be blocked by the edge of the maze.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    width: usize,
    height: usize,
}

impl Navigator {
    pub fn new(size: MazeSize) -> Self {
        Self {
            width: size.width(),
            height: size.height(),
        }
    }

    /// Rightmost addressable column
    fn last_column(&self) -> usize {
        2 * self.width - 1
    }

    /// Try to move `cursor` one step towards `direction`
    pub fn try_move(
        &self,
        buffer: &Rendered,
        cursor: Cursor,
        direction: Move,
    ) -> Result<Outcome, NavigationError> {
        match direction {
            Move::Up => self.try_move_up(buffer, cursor),
            Move::Down => self.try_move_down(buffer, cursor),
            Move::Left => self.try_move_left(buffer, cursor),
            Move::Right => self.try_move_right(buffer, cursor),
        }
    }

    /// Blocked by a floor under the cursor, by the bottom of the maze, or by
    /// a vertical wall right below
    pub fn try_move_down(
        &self,
        buffer: &Rendered,
        cursor: Cursor,
    ) -> Result<Outcome, NavigationError> {
        if char_at(buffer, cursor, cursor.row, cursor.column)? == CLOSED {
            return Ok(Outcome::Blocked);
        }
        let row = cursor.row + 1;
        if row > self.height {
            return Ok(Outcome::Blocked);
        }
        if char_at(buffer, cursor, row, cursor.column)? == WALL {
            return Ok(Outcome::Blocked);
        }
        Ok(Outcome::Moved(Cursor::new(cursor.column, row)))
    }

    /// Blocked at the top line, or by any wall character right above
    pub fn try_move_up(
        &self,
        buffer: &Rendered,
        cursor: Cursor,
    ) -> Result<Outcome, NavigationError> {
        char_at(buffer, cursor, cursor.row, cursor.column)?;
        let Some(row) = cursor.row.checked_sub(1) else {
            return Ok(Outcome::Blocked);
        };
        let above = char_at(buffer, cursor, row, cursor.column)?;
        if above == CLOSED || above == WALL {
            return Ok(Outcome::Blocked);
        }
        Ok(Outcome::Moved(Cursor::new(cursor.column, row)))
    }

    pub fn try_move_right(
        &self,
        buffer: &Rendered,
        cursor: Cursor,
    ) -> Result<Outcome, NavigationError> {
        char_at(buffer, cursor, cursor.row, cursor.column)?;
        let column = cursor.column + 1;
        if column > self.last_column() {
            return Ok(Outcome::Blocked);
        }
        self.step_sideways(buffer, cursor, column)
    }

    pub fn try_move_left(
        &self,
        buffer: &Rendered,
        cursor: Cursor,
    ) -> Result<Outcome, NavigationError> {
        char_at(buffer, cursor, cursor.row, cursor.column)?;
        let Some(column) = cursor.column.checked_sub(1) else {
            return Ok(Outcome::Blocked);
        };
        self.step_sideways(buffer, cursor, column)
    }

    /// Horizontal step onto `column` of the cursor's line.
    ///
    /// On the top line the border floor also blocks, so the cursor cannot
    /// slide out of the entrance gap along the border.
    fn step_sideways(
        &self,
        buffer: &Rendered,
        cursor: Cursor,
        column: usize,
    ) -> Result<Outcome, NavigationError> {
        let next = char_at(buffer, cursor, cursor.row, column)?;
        if next == WALL || (cursor.row == 0 && next == CLOSED) {
            return Ok(Outcome::Blocked);
        }
        Ok(Outcome::Moved(Cursor::new(column, cursor.row)))
    }
}

/// Character at (`row`, `column`) of `buffer`, read on behalf of `cursor`
fn char_at(
    buffer: &Rendered,
    cursor: Cursor,
    row: usize,
    column: usize,
) -> Result<char, NavigationError> {
    let Some(line) = buffer.line(row) else {
        warn!(%cursor, row, lines = buffer.len(), "rendered maze is out of sync with cursor");
        return Err(NavigationError::MissingLine { row, cursor });
    };
    match line.as_bytes().get(column) {
        Some(&b) => Ok(char::from(b)),
        None => {
            warn!(%cursor, row, column, "rendered maze line is too short for cursor");
            Err(NavigationError::MissingColumn {
                row,
                column,
                cursor,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashSet, VecDeque};

    use super::*;
    use crate::grid::{Direction, Grid};
    use crate::maze_generator::MazeGenerator;
    use crate::render::render;

    fn size(w: usize, h: usize) -> MazeSize {
        MazeSize::new(w, h).unwrap()
    }

    fn maze(w: usize, h: usize, seed: u64) -> (Grid, Rendered, Navigator) {
        let grid = MazeGenerator::new(Some(seed)).generate(size(w, h));
        let rendered = render(&grid);
        (grid, rendered, Navigator::new(size(w, h)))
    }

    /// Cursor reached after stepping from cell `p` towards `direction`
    /// until landing on the neighbouring cell, if every step is allowed
    fn walk_to_neighbor(
        nav: &Navigator,
        buffer: &Rendered,
        p: Point,
        direction: Direction,
    ) -> Option<Cursor> {
        let (first, steps) = match direction {
            Direction::North => (Move::Up, 1),
            Direction::South => (Move::Down, 1),
            // East points towards smaller x
            Direction::East => (Move::Left, 2),
            Direction::West => (Move::Right, 2),
        };
        let mut cursor = Cursor::for_cell(p);
        for _ in 0..steps {
            match nav.try_move(buffer, cursor, first).unwrap() {
                Outcome::Moved(next) => cursor = next,
                Outcome::Blocked => return None,
            }
        }
        Some(cursor)
    }

    #[test]
    fn navigation_agrees_with_grid() {
        for (w, h, seed) in [(5, 5, 0), (2, 2, 1), (8, 3, 2), (15, 10, 3), (4, 9, 4)] {
            let (grid, rendered, nav) = maze(w, h, seed);
            for y in 0..h {
                for x in 0..w {
                    let p = Point::new(x, y);
                    for d in Direction::ALL {
                        let Some(n) = grid.neighbor(p, d) else {
                            continue;
                        };
                        let walked = walk_to_neighbor(&nav, &rendered, p, d);
                        if grid.is_open(p, d) {
                            assert_eq!(walked, Some(Cursor::for_cell(n)), "{p} towards {d:?}");
                        } else {
                            assert_eq!(walked, None, "{p} towards {d:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn first_step_decides_the_move() {
        let (grid, rendered, nav) = maze(9, 7, 21);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let p = Point::new(x, y);
                let cursor = Cursor::for_cell(p);
                for (mv, d) in [
                    (Move::Up, Direction::North),
                    (Move::Down, Direction::South),
                    (Move::Left, Direction::East),
                    (Move::Right, Direction::West),
                ] {
                    if grid.neighbor(p, d).is_none() {
                        continue;
                    }
                    let outcome = nav.try_move(&rendered, cursor, mv).unwrap();
                    assert_eq!(
                        matches!(outcome, Outcome::Moved(_)),
                        grid.is_open(p, d),
                        "{p} {mv:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn cannot_leave_through_the_entrance() {
        let (_, rendered, nav) = maze(5, 5, 8);
        let entrance = Cursor::entrance(size(5, 5));
        assert_eq!(entrance, Cursor::new(5, 0));
        assert_eq!(nav.try_move_up(&rendered, entrance), Ok(Outcome::Blocked));

        // Entrance cell connects to the gap above it
        let cell = Cursor::for_cell(Point::new(2, 0));
        assert_eq!(nav.try_move_up(&rendered, cell), Ok(Outcome::Moved(entrance)));
        assert_eq!(nav.try_move_down(&rendered, entrance), Ok(Outcome::Moved(cell)));
    }

    #[test]
    fn cannot_slide_along_the_top_border() {
        let (_, rendered, nav) = maze(5, 5, 8);
        // Gap spans columns 5 and 6
        let gap = Cursor::new(5, 0);
        assert_eq!(nav.try_move_left(&rendered, gap), Ok(Outcome::Blocked));
        let right = Cursor::new(6, 0);
        assert_eq!(nav.try_move_right(&rendered, gap), Ok(Outcome::Moved(right)));
        assert_eq!(nav.try_move_right(&rendered, right), Ok(Outcome::Blocked));
    }

    #[test]
    fn cannot_leave_through_the_exit() {
        let (grid, rendered, nav) = maze(5, 5, 13);
        let exit = Cursor::exit(grid.size());
        assert_eq!(exit, Cursor::new(5, 5));
        assert_eq!(nav.try_move_down(&rendered, exit), Ok(Outcome::Blocked));
    }

    #[test]
    fn edges_of_the_buffer_block() {
        let (_, rendered, nav) = maze(4, 4, 2);
        assert_eq!(nav.try_move_left(&rendered, Cursor::new(0, 2)), Ok(Outcome::Blocked));
        assert_eq!(nav.try_move_right(&rendered, Cursor::new(7, 2)), Ok(Outcome::Blocked));
        assert_eq!(nav.try_move_up(&rendered, Cursor::new(3, 0)), Ok(Outcome::Blocked));
    }

    #[test]
    fn cursor_beyond_buffer_is_fatal() {
        let (_, rendered, nav) = maze(5, 5, 4);
        let lost = Cursor::new(3, 10);
        for mv in Move::ALL {
            let result = nav.try_move(&rendered, lost, mv);
            assert!(
                matches!(result, Err(NavigationError::MissingLine { .. })),
                "{mv:?}: {result:?}"
            );
        }
    }

    #[test]
    fn lost_cursor_at_maze_edges_is_fatal() {
        let (_, rendered, nav) = maze(5, 5, 4);
        let cases = [
            (Cursor::new(0, 40), Move::Left),
            (Cursor::new(9, 40), Move::Right),
            (Cursor::new(3, 40), Move::Up),
            (Cursor::new(3, 6), Move::Up),
            (Cursor::new(1, 6), Move::Up),
            (Cursor::new(0, 6), Move::Left),
            (Cursor::new(9, 6), Move::Right),
        ];
        for (cursor, mv) in cases {
            let result = nav.try_move(&rendered, cursor, mv);
            assert_eq!(
                result,
                Err(NavigationError::MissingLine {
                    row: cursor.row,
                    cursor
                }),
                "{cursor} {mv:?}"
            );
        }
    }

    #[test]
    fn cursor_past_line_end_is_fatal_at_edges() {
        let buffer = Rendered::from_text(" _  _
|
|_|_|
");
        let nav = Navigator::new(size(2, 2));
        let cursor = Cursor::new(3, 1);
        for mv in [Move::Right, Move::Up] {
            assert_eq!(
                nav.try_move(&buffer, cursor, mv),
                Err(NavigationError::MissingColumn {
                    row: 1,
                    column: 3,
                    cursor
                })
            );
        }
    }

    #[test]
    fn truncated_buffer_is_fatal() {
        let (grid, rendered, nav) = maze(5, 5, 4);
        let text = rendered.to_string();
        let truncated = Rendered::from_text(&text.lines().take(3).collect::<Vec<_>>().join("\n"));

        // Find a cell on the last remaining line that is open to the south
        let open = (0..grid.width())
            .map(|x| Point::new(x, 1))
            .find(|&p| grid.is_open(p, Direction::South))
            .unwrap();
        let result = nav.try_move_down(&truncated, Cursor::for_cell(open));
        assert_eq!(
            result,
            Err(NavigationError::MissingLine {
                row: 3,
                cursor: Cursor::for_cell(open)
            })
        );
    }

    #[test]
    fn short_line_is_fatal() {
        let buffer = Rendered::from_text(" _  _\n|\n|_|_|\n");
        let nav = Navigator::new(size(2, 2));
        let result = nav.try_move_right(&buffer, Cursor::new(0, 1));
        assert!(matches!(
            result,
            Err(NavigationError::MissingColumn { row: 1, column: 1, .. })
        ));
    }

    #[test]
    fn five_by_five_walk_reaches_exit() {
        let (grid, rendered, nav) = maze(5, 5, 17);
        assert_eq!(grid.carved_edges(), 24);
        assert_eq!(rendered.len(), 6);
        assert!(rendered.lines().iter().all(|l| l.len() == 9));

        let start = Cursor::for_cell(Point::new(2, 0));
        let goal = Cursor::for_cell(Point::new(2, 4));

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(cursor) = queue.pop_front() {
            for mv in Move::ALL {
                if let Outcome::Moved(next) = nav.try_move(&rendered, cursor, mv).unwrap() {
                    if seen.insert(next) {
                        queue.push_back(next);
                    }
                }
            }
        }
        assert!(seen.contains(&goal));
        assert!(seen.contains(&Cursor::entrance(grid.size())));
    }

    #[test]
    fn rerendering_keeps_collisions() {
        let (grid, rendered, nav) = maze(6, 6, 30);
        let again = render(&grid);
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                let cursor = Cursor::for_cell(Point::new(x, y));
                for mv in Move::ALL {
                    assert_eq!(
                        nav.try_move(&rendered, cursor, mv),
                        nav.try_move(&again, cursor, mv)
                    );
                }
            }
        }
    }

    #[test]
    fn parse_moves() {
        let moves: Moves = "dDr L\nu".parse().unwrap();
        assert_eq!(
            moves,
            Moves(vec![Move::Down, Move::Down, Move::Right, Move::Left, Move::Up])
        );
        assert_eq!(
            "DDX".parse::<Moves>(),
            Err(ParseMovesError {
                letter: 'X',
                position: 2
            })
        );
        assert_eq!("".parse::<Moves>(), Ok(Moves::default()));
    }
}
