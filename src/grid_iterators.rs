use crate::cells::CellCoordinate;
use crate::grid_dimensions::RectGridDimensions;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};

/// Row-major iterator over every coordinate of a grid.
///
/// Holds a copy of the grid's dimensions rather than a borrow of the grid, so a generator can
/// walk the coordinates while it mutates the grid's passages.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    dimensions: RectGridDimensions,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(dimensions: RectGridDimensions) -> CellIter {
        CellIter {
            dimensions,
            current_cell_number: 0,
            cells_count: dimensions.size().0,
        }
    }
}

impl Iterator for CellIter {
    type Item = CellCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = self.dimensions.index_to_grid_coordinate(self.current_cell_number);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for CellIter {} // default impl using size_hint()

/// Iterator over the rows of a grid, top to bottom, each row ordered west to east.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    current_index: usize,
    rows_count: RowsCount,
    columns_count: ColumnsCount,
}

impl RowIter {
    pub(crate) fn new(dimensions: RectGridDimensions) -> RowIter {
        RowIter {
            current_index: 0,
            rows_count: dimensions.rows(),
            columns_count: dimensions.columns(),
        }
    }
}

impl Iterator for RowIter {
    type Item = Vec<CellCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let RowsCount(count) = self.rows_count;
        if self.current_index < count {
            let ColumnsCount(length) = self.columns_count;
            let row = RowIndex(self.current_index);
            let coords = (0..length)
                .map(|i| CellCoordinate::from_row_column_indices(row, ColumnIndex(i)))
                .collect();
            self.current_index += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.rows_count.0 - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
impl ExactSizeIterator for RowIter {}
