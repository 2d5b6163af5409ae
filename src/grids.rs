use crate::grid::{Grid, GridError};
use crate::units::{ColumnsCount, RowsCount};

/// Up to 8x8 cells.
pub type SmallRectangularGrid = Grid<u8>;
/// Up to 128x128 cells.
pub type MediumRectangularGrid = Grid<u16>;
pub type LargeRectangularGrid = Grid<u32>;

pub fn small_rect_grid(rows: RowsCount,
                       columns: ColumnsCount)
                       -> Result<SmallRectangularGrid, GridError> {
    SmallRectangularGrid::new(rows, columns)
}

pub fn medium_rect_grid(rows: RowsCount,
                        columns: ColumnsCount)
                        -> Result<MediumRectangularGrid, GridError> {
    MediumRectangularGrid::new(rows, columns)
}

pub fn large_rect_grid(rows: RowsCount,
                       columns: ColumnsCount)
                       -> Result<LargeRectangularGrid, GridError> {
    LargeRectangularGrid::new(rows, columns)
}
