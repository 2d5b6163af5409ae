//! **mazes** is a perfect maze generation and text rendering library.
//!
//! A [`grid::Grid`] of cells is carved into a maze by one of the [`generators`], then drawn
//! with its `Display` impl.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_dimensions;
pub mod grid_displays;
pub mod grid_iterators;
pub mod grids;
pub mod units;
