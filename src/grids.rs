use std::rc::Rc;

use crate::cells::{Cell, HexCell, SquareCell};
use crate::grid::{Grid, IndexType};
use crate::grid_dimensions::RectGridDimensions;
use crate::grid_traits::GridDimensions;
use crate::units::{ColumnLength, RowLength};
use crate::vec2::Vec2;

pub type SquareGrid<GridIndexType = u32> = Grid<GridIndexType, SquareCell>;
pub type HexGrid<GridIndexType = u32> = Grid<GridIndexType, HexCell>;

pub type SmallSquareGrid = SquareGrid<u8>;
pub type MediumSquareGrid = SquareGrid<u16>;
pub type LargeSquareGrid = SquareGrid<u32>;

pub type SmallHexGrid = HexGrid<u8>;
pub type MediumHexGrid = HexGrid<u16>;
pub type LargeHexGrid = HexGrid<u32>;

/// A `row_width` x `column_height` lattice of square cells, each `cell_height` wide and high,
/// with the top left corner of cell (0, 0) at `origin`.
///
/// None for an empty lattice or one whose cells or links would not fit `GridIndexType`.
pub fn square_grid<GridIndexType: IndexType>(origin: Vec2,
                                             row_width: RowLength,
                                             column_height: ColumnLength,
                                             cell_height: f64)
                                             -> Option<SquareGrid<GridIndexType>> {
    rect_grid(origin, row_width, column_height, cell_height)
}

/// A `row_width` x `column_height` lattice of pointy-top hexagons `cell_height` tall.
///
/// None for an empty lattice or one whose cells or links would not fit `GridIndexType`.
pub fn hex_grid<GridIndexType: IndexType>(origin: Vec2,
                                          row_width: RowLength,
                                          column_height: ColumnLength,
                                          cell_height: f64)
                                          -> Option<HexGrid<GridIndexType>> {
    rect_grid(origin, row_width, column_height, cell_height)
}

fn rect_grid<GridIndexType: IndexType, CellT: Cell>(origin: Vec2,
                                                    row_width: RowLength,
                                                    column_height: ColumnLength,
                                                    cell_height: f64)
                                                    -> Option<Grid<GridIndexType, CellT>> {
    let dimensions = RectGridDimensions::new(row_width, column_height);
    // petgraph reserves the maximum index value as its end marker
    let max_index = <GridIndexType as IndexType>::max().index();
    let cells_count = dimensions.size().0;

    if cells_count == 0 || cells_count >= max_index || CellT::max_links(&dimensions) >= max_index {
        None
    } else {
        Some(Grid::new(Rc::new(dimensions), origin, cell_height))
    }
}
