use std::fmt;
use std::ptr;

use smallvec::SmallVec;

use crate::grid::{Grid, IndexType};
use crate::units::{ColumnIndex, RowIndex};

/// Position of a cell on a rectangular grid. Orders row-major: row first, then column.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct CellCoordinate {
    pub row: u32,
    pub column: u32,
}

pub type CoordinateSmallVec = SmallVec<[CellCoordinate; 4]>;
pub type CoordinateOptionSmallVec = SmallVec<[Option<CellCoordinate>; 4]>;

impl CellCoordinate {
    pub fn new(row: u32, column: u32) -> CellCoordinate {
        CellCoordinate { row, column }
    }

    #[inline]
    pub fn from_row_column_indices(row_index: RowIndex, col_index: ColumnIndex) -> CellCoordinate {
        let (RowIndex(row), ColumnIndex(col)) = (row_index, col_index);
        CellCoordinate::new(row as u32, col as u32)
    }

    #[inline]
    pub fn from_row_major_index(index: usize, row_length: usize) -> CellCoordinate {
        let row = index / row_length;
        let column = index % row_length;
        CellCoordinate::new(row as u32, column as u32)
    }
}

impl From<(u32, u32)> for CellCoordinate {
    fn from(row_column_pair: (u32, u32)) -> CellCoordinate {
        CellCoordinate::new(row_column_pair.0, row_column_pair.1)
    }
}

impl fmt::Display for CellCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// North is towards row 0, west is towards column 0.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl CompassPrimary {
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::South,
                                          CompassPrimary::East,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// The direction of a single step from `from` to `to`.
    /// Returns None unless the two coordinates are orthogonally adjacent.
    pub fn between(from: CellCoordinate, to: CellCoordinate) -> Option<CompassPrimary> {
        let row_delta = i64::from(to.row) - i64::from(from.row);
        let column_delta = i64::from(to.column) - i64::from(from.column);
        match (row_delta, column_delta) {
            (0, 1) => Some(CompassPrimary::East),
            (0, -1) => Some(CompassPrimary::West),
            (1, 0) => Some(CompassPrimary::South),
            (-1, 0) => Some(CompassPrimary::North),
            _ => None,
        }
    }

    /// Creates a new coordinate offset 1 cell away in this direction.
    /// Returns None if the coordinate is not representable, e.g. north of row 0.
    /// The result is not checked against any grid's bounds.
    pub fn offset(self, coord: CellCoordinate) -> Option<CellCoordinate> {
        let CellCoordinate { row, column } = coord;
        match self {
            CompassPrimary::North => row.checked_sub(1).map(|r| CellCoordinate::new(r, column)),
            CompassPrimary::South => row.checked_add(1).map(|r| CellCoordinate::new(r, column)),
            CompassPrimary::East => column.checked_add(1).map(|c| CellCoordinate::new(row, c)),
            CompassPrimary::West => column.checked_sub(1).map(|c| CellCoordinate::new(row, c)),
        }
    }
}

/// A borrowed view of one cell of a `Grid`.
///
/// The grid owns every cell and all of the passages between them. A `Cell` only pairs a
/// coordinate with the grid it came from, so it can never outlive that grid, and the
/// passage "references" it reports are looked up in the grid's passage graph on demand.
pub struct Cell<'g, GridIndexType: IndexType> {
    grid: &'g Grid<GridIndexType>,
    coordinate: CellCoordinate,
}

impl<'g, GridIndexType: IndexType> Cell<'g, GridIndexType> {
    pub(crate) fn new(grid: &'g Grid<GridIndexType>, coordinate: CellCoordinate) -> Self {
        Cell { grid, coordinate }
    }

    #[inline]
    pub fn coordinate(&self) -> CellCoordinate {
        self.coordinate
    }

    #[inline]
    pub fn row(&self) -> u32 {
        self.coordinate.row
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.coordinate.column
    }

    /// The cell a passage from this cell leads to in `direction`, if one has been carved.
    pub fn passage(&self, direction: CompassPrimary) -> Option<Cell<'g, GridIndexType>> {
        self.grid
            .passage(self.coordinate, direction)
            .map(|coord| Cell::new(self.grid, coord))
    }

    pub fn north(&self) -> Option<Cell<'g, GridIndexType>> {
        self.passage(CompassPrimary::North)
    }

    pub fn south(&self) -> Option<Cell<'g, GridIndexType>> {
        self.passage(CompassPrimary::South)
    }

    pub fn east(&self) -> Option<Cell<'g, GridIndexType>> {
        self.passage(CompassPrimary::East)
    }

    pub fn west(&self) -> Option<Cell<'g, GridIndexType>> {
        self.passage(CompassPrimary::West)
    }

    /// Cells reachable through this cell's carved passages.
    pub fn neighbours(&self) -> SmallVec<[Cell<'g, GridIndexType>; 4]> {
        let grid = self.grid;
        grid.neighbours(self.coordinate)
            .iter()
            .map(|&coord| Cell::new(grid, coord))
            .collect()
    }

    pub fn is_linked<C: Into<Option<CellCoordinate>>>(&self, sibling: C) -> bool {
        self.grid.is_linked(self.coordinate, sibling)
    }
}

impl<'g, GridIndexType: IndexType> Clone for Cell<'g, GridIndexType> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<'g, GridIndexType: IndexType> Copy for Cell<'g, GridIndexType> {}

impl<'g, GridIndexType: IndexType> PartialEq for Cell<'g, GridIndexType> {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self.grid, other.grid) && self.coordinate == other.coordinate
    }
}
impl<'g, GridIndexType: IndexType> Eq for Cell<'g, GridIndexType> {}

impl<'g, GridIndexType: IndexType> fmt::Debug for Cell<'g, GridIndexType> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Cell :: coordinate: {:?}", self.coordinate)
    }
}
