//! Generate perfect mazes, draw them as ASCII and walk them
//!
//! A maze is generated as a [Grid] of cell bitmasks, rendered once to text,
//! and from then on the text is all that matters: the [Navigator] decides
//! whether a move is legal by looking at the characters around the cursor.
//!
//! # Examples
//! ## Generate and render
//! ```
//! use ascii_maze::{render, MazeGenerator, MazeSize};
//!
//! let size = MazeSize::new(5, 5).unwrap();
//! let grid = MazeGenerator::new(Some(1)).generate(size);
//! assert_eq!(grid.carved_edges(), 24);
//!
//! let maze = render(&grid);
//! assert_eq!(maze.len(), 6);
//! assert!(maze.lines().iter().all(|line| line.len() == 9));
//! println!("{maze}");
//! ```
//!
//! ## Walk into the maze
//! ```
//! use ascii_maze::{generate, render, Cursor, MazeSize, Navigator, Outcome};
//!
//! let size = "9 x 6".parse::<MazeSize>().unwrap();
//! let maze = render(&generate(size));
//! let navigator = Navigator::new(size);
//!
//! // Nothing above the entrance gap
//! let entrance = Cursor::entrance(size);
//! assert_eq!(navigator.try_move_up(&maze, entrance), Ok(Outcome::Blocked));
//!
//! // The entrance cell is always open towards the gap
//! let below = navigator.try_move_down(&maze, entrance).unwrap();
//! assert_eq!(below, Outcome::Moved(Cursor::new(entrance.column, 1)));
//! ```
//!
//! ## Out of sync buffers
//! ```
//! use ascii_maze::{generate, render, Cursor, MazeSize, Move, NavigationError, Navigator};
//!
//! let size = MazeSize::default();
//! let maze = render(&generate(size));
//! let navigator = Navigator::new(size);
//!
//! let lost = Cursor::new(3, 40);
//! let result = navigator.try_move(&maze, lost, Move::Left);
//! assert!(matches!(result, Err(NavigationError::MissingLine { row: 40, .. })));
//! ```

pub mod grid;
pub mod logging;
pub mod maze_generator;
pub mod navigator;
pub mod render;
pub mod session;

pub use grid::{Cell, Direction, Grid, MazeSize, Point, SizeError};
pub use maze_generator::{generate, MazeGenerator};
pub use navigator::{Cursor, Move, Moves, NavigationError, Navigator, Outcome};
pub use render::{render, Rendered};
pub use session::{Session, SessionError, SessionStore};
