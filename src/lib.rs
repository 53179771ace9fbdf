//! **sketchgrid** holds the reusable engines behind a set of generative sketches: square and
//! hexagonal cell grids with randomized maze carving, and a region quadtree for proximity
//! queries over circles, lines and rectangles.
//!
//! The two engines are independent. Neither installs a logger, they log through `log`.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_iterators;
pub mod grid_traits;
pub mod grids;
pub mod pathing;
pub mod quadtree;
pub mod shapes;
pub mod units;
pub mod vec2;
mod utils;
