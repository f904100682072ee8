//! Maze generation

use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use tracing::{debug, trace};

use crate::grid::{Cell, Direction, Grid, MazeSize, Point};

/// Candidate wall to carve: a reached cell and the side to open
type Wall = (Point, Direction);

/// Perfect maze generator.
///
/// Grows a spanning tree over the grid by randomized depth-first carving,
/// starting from both a random cell and the entrance, and opens the exit
/// towards the outside once carving reaches it.
pub struct MazeGenerator {
    random: StdRng,
}

impl MazeGenerator {
    /// Generator seeded with `seed`, or from system entropy when `None`
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            random: if let Some(state) = seed {
                StdRng::seed_from_u64(state)
            } else {
                StdRng::from_entropy()
            },
        }
    }

    /// Generate a perfect maze of the given size
    ///
    /// Every cell is reachable from every other cell by exactly one simple
    /// path, and the exit cell is additionally open to the south.
    pub fn generate(&mut self, size: MazeSize) -> Grid {
        let mut grid = Grid::new(size);
        let entrance = size.entrance();
        let exit = size.exit();

        let start = Point::new(
            self.random.gen_range(0..size.width()),
            self.random.gen_range(0..size.height()),
        );
        debug!(%size, %start, "generating maze");

        // Same direction order for both seeds. The entrance goes on top, so
        // carving begins there even when the random start is elsewhere.
        let mut walls: Vec<Wall> = Vec::with_capacity(4 * size.width() * size.height());
        let directions = self.shuffled_directions();
        walls.extend(directions.iter().map(|&d| (start, d)));
        walls.extend(directions.iter().map(|&d| (entrance, d)));

        // Cells carved before the exit was reached
        let mut path = Vec::new();
        let mut exit_reached = false;
        let mut carved = 0usize;

        while let Some((p, d)) = walls.pop() {
            let Some(next) = grid.neighbor(p, d) else {
                continue;
            };
            if grid.get(next) != Some(Cell::empty()) {
                continue;
            }

            grid.carve(p, next, d);
            carved += 1;

            if !exit_reached {
                path.push(next);
            }

            if next == exit {
                grid.open(exit, Cell::SOUTH);
                exit_reached = true;
                debug!(carved, path = path.len(), "exit reached");

                path.shuffle(&mut self.random);
                for cell in path.drain(..) {
                    self.push_walls(&mut walls, cell);
                }
                continue;
            }

            if Self::redirects_to_entrance(size, next) {
                // The redirected cell still gets expanded later, otherwise
                // cells surrounded by the corner block could stay unreached.
                trace!(%next, "growth redirected to entrance");
                self.push_walls(&mut walls, next);
                self.push_walls(&mut walls, entrance);
            } else {
                self.push_walls(&mut walls, next);
            }
        }

        debug!(carved, "maze generated");
        grid
    }

    /// Whether `p` falls into the 3x3 block one cell inside the bottom-right
    /// corner, `x in [w-4, w-2]` and `y in [h-4, h-2]`
    fn redirects_to_entrance(size: MazeSize, p: Point) -> bool {
        let (w, h) = (size.width() as isize, size.height() as isize);
        let (x, y) = (p.x as isize, p.y as isize);
        (w - 4..=w - 2).contains(&x) && (h - 4..=h - 2).contains(&y)
    }

    fn shuffled_directions(&mut self) -> [Direction; 4] {
        let mut directions = Direction::ALL;
        directions.shuffle(&mut self.random);
        directions
    }

    /// Push all four walls of `cell` in random order
    fn push_walls(&mut self, walls: &mut Vec<Wall>, cell: Point) {
        let directions = self.shuffled_directions();
        walls.extend(directions.iter().map(|&d| (cell, d)));
    }
}

/// Generate a maze with a freshly seeded generator
pub fn generate(size: MazeSize) -> Grid {
    MazeGenerator::new(None).generate(size)
}
