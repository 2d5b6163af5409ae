use crate::cells::CellCoordinate;
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

/// The fixed shape of a rectangular grid.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RectGridDimensions {
    rows: RowsCount,
    columns: ColumnsCount,
}

impl RectGridDimensions {
    pub fn new(rows: RowsCount, columns: ColumnsCount) -> RectGridDimensions {
        RectGridDimensions { rows, columns }
    }

    #[inline(always)]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.rows.0 * self.columns.0)
    }

    #[inline(always)]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline(always)]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    /// Cell count and the most directed passages the grid can ever hold: every pair of
    /// orthogonally adjacent cells linked both ways.
    /// Returns None if either count overflows `usize`.
    pub fn graph_size(&self) -> Option<(NodesCount, EdgesCount)> {
        let (RowsCount(rows), ColumnsCount(columns)) = (self.rows, self.columns);
        let cells = rows.checked_mul(columns)?;
        let horizontal_pairs = rows.checked_mul(columns.saturating_sub(1))?;
        let vertical_pairs = columns.checked_mul(rows.saturating_sub(1))?;
        let edges = horizontal_pairs.checked_add(vertical_pairs)?.checked_mul(2)?;
        Some((NodesCount(cells), EdgesCount(edges)))
    }

    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellCoordinate) -> bool {
        (coord.row as usize) < self.rows.0 && (coord.column as usize) < self.columns.0
    }

    /// Convert a grid coordinate to a one dimensional row-major index in the range 0..size.
    /// Returns None if the grid coordinate is outside the grid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: CellCoordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.columns.0 + coord.column as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_grid_coordinate(&self, index: usize) -> CellCoordinate {
        CellCoordinate::from_row_major_index(index, self.columns.0)
    }
}
