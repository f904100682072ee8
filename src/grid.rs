//! Maze grid: directions, cell bitmasks and the validated maze size

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use thiserror::Error;

/// One of the four sides of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Bit of this direction inside a [Cell]
    pub fn bit(self) -> Cell {
        match self {
            Direction::North => Cell::NORTH,
            Direction::South => Cell::SOUTH,
            Direction::East => Cell::EAST,
            Direction::West => Cell::WEST,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::South => Direction::North,
            Direction::East => Direction::West,
            Direction::West => Direction::East,
        }
    }

    /// Coordinate delta `(dx, dy)` of one step in this direction.
    ///
    /// East steps towards decreasing x and West towards increasing x. The
    /// renderer reads the West bit as "open towards the next column", so
    /// this table and [crate::render] must change together, if ever.
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, -1),
            Direction::South => (0, 1),
            Direction::East => (-1, 0),
            Direction::West => (1, 0),
        }
    }
}

bitflags! {
    /// Passable sides of a single cell. An unset bit is a wall.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Cell: u8 {
        const NORTH = 1;
        const SOUTH = 1 << 1;
        const EAST = 1 << 2;
        const WEST = 1 << 3;
    }
}

/// Location in the grid, origin at the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Invalid maze dimensions
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SizeError {
    #[error("maze must be at least 2x2, got {width}x{height}")]
    TooSmall { width: usize, height: usize },
    #[error("expected size as `<width> x <height>`, got `{0}`")]
    Malformed(String),
}

/// Width and height of a maze, in cells.
///
/// Both sides are at least [MazeSize::MIN], so that the entrance and the
/// exit are distinct cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MazeSize {
    width: usize,
    height: usize,
}

impl MazeSize {
    pub const MIN: usize = 2;

    pub fn new(width: usize, height: usize) -> Result<Self, SizeError> {
        if width < Self::MIN || height < Self::MIN {
            return Err(SizeError::TooSmall { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Entrance cell, top row centre
    pub fn entrance(&self) -> Point {
        Point::new(self.width / 2, 0)
    }

    /// Exit cell, bottom row centre
    pub fn exit(&self) -> Point {
        Point::new(self.width / 2, self.height - 1)
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x < self.width && p.y < self.height
    }
}

impl Default for MazeSize {
    fn default() -> Self {
        Self {
            width: 15,
            height: 10,
        }
    }
}

impl fmt::Display for MazeSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {}", self.width, self.height)
    }
}

/// Parse `"<width> x <height>"`; whitespace around the numbers is ignored.
impl FromStr for MazeSize {
    type Err = SizeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SizeError::Malformed(s.to_string());
        let (w, h) = s.split_once(['x', 'X']).ok_or_else(malformed)?;
        let width = w.trim().parse().map_err(|_| malformed())?;
        let height = h.trim().parse().map_err(|_| malformed())?;
        Self::new(width, height)
    }
}

/// Maze layout as one [Cell] bitmask per location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    size: MazeSize,
    /// Cells, indexed `[y][x]`
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    /// Grid of the given size with every wall closed
    pub fn new(size: MazeSize) -> Self {
        Self {
            size,
            cells: vec![vec![Cell::empty(); size.width()]; size.height()],
        }
    }

    pub fn size(&self) -> MazeSize {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width()
    }

    pub fn height(&self) -> usize {
        self.size.height()
    }

    pub fn entrance(&self) -> Point {
        self.size.entrance()
    }

    pub fn exit(&self) -> Point {
        self.size.exit()
    }

    /// Cell at `p`, or `None` outside of the grid
    pub fn get(&self, p: Point) -> Option<Cell> {
        self.cells.get(p.y).and_then(|row| row.get(p.x)).copied()
    }

    /// Rows of cells, top to bottom
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    /// Neighbouring location one step from `p` towards `direction`, if it
    /// lies inside the grid
    pub fn neighbor(&self, p: Point, direction: Direction) -> Option<Point> {
        let (dx, dy) = direction.offset();
        let x = p.x.checked_add_signed(dx)?;
        let y = p.y.checked_add_signed(dy)?;
        let n = Point::new(x, y);
        self.size.contains(n).then_some(n)
    }

    /// Whether the cell at `p` is passable towards `direction`
    pub fn is_open(&self, p: Point, direction: Direction) -> bool {
        self.get(p).is_some_and(|cell| cell.contains(direction.bit()))
    }

    /// Set bits on the cell at `p`. Out of bounds locations are ignored.
    pub(crate) fn open(&mut self, p: Point, bits: Cell) {
        if let Some(cell) = self.cells.get_mut(p.y).and_then(|row| row.get_mut(p.x)) {
            *cell |= bits;
        }
    }

    /// Open a two-way passage from `p` to `to`, the neighbour of `p`
    /// towards `direction`
    pub(crate) fn carve(&mut self, p: Point, to: Point, direction: Direction) {
        self.open(p, direction.bit());
        self.open(to, direction.opposite().bit());
    }

    /// Number of open passages between two cells of the grid.
    ///
    /// Openings towards the outside, such as the one below the exit, are
    /// not counted.
    pub fn carved_edges(&self) -> usize {
        let mut count = 0;
        for y in 0..self.height() {
            for x in 0..self.width() {
                let p = Point::new(x, y);
                for direction in [Direction::South, Direction::West] {
                    if self.is_open(p, direction) && self.neighbor(p, direction).is_some() {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}
