use std::cmp;
use std::fmt;
use std::marker::PhantomData;

use crate::cells::{Cell, Coordinate};
use crate::grid_traits::GridDimensions;
use crate::units::{ColumnIndex, ColumnsCount, RowIndex, RowsCount};
use crate::vec2::Vec2;

/// The sequence a `CellIter` visits a rectangular lattice in.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CellOrder {
    /// Every cell of column 0 top to bottom, then column 1...
    ColumnByColumn,
    /// Every cell of row 0 left to right, then row 1...
    LeftToRight,
}

pub struct CellIter<CellT: Cell> {
    order: CellOrder,
    current_cell_number: usize,
    columns: usize,
    rows: usize,
    cells_count: usize,
    cell_type: PhantomData<CellT>,
}

impl<CellT: Cell> CellIter<CellT> {
    pub fn new(order: CellOrder, dimensions: &dyn GridDimensions) -> CellIter<CellT> {
        let (ColumnsCount(columns), RowsCount(rows)) = (dimensions.columns(), dimensions.rows());
        CellIter {
            order,
            current_cell_number: 0,
            columns,
            rows,
            cells_count: columns * rows,
            cell_type: PhantomData,
        }
    }
}

impl<CellT: Cell> fmt::Debug for CellIter<CellT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "CellIter :: order: {:?}, current_cell_number: {:?}, cells_count: {:?}",
               self.order,
               self.current_cell_number,
               self.cells_count)
    }
}

impl<CellT: Cell> ExactSizeIterator for CellIter<CellT> {} // default impl using size_hint()
impl<CellT: Cell> Iterator for CellIter<CellT> {
    type Item = CellT::Coord;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let n = self.current_cell_number;
            let (x, y) = match self.order {
                CellOrder::ColumnByColumn => (n / self.rows, n % self.rows),
                CellOrder::LeftToRight => (n % self.columns, n / self.columns),
            };
            self.current_cell_number += 1;
            Some(CellT::Coord::from_row_column_indices(ColumnIndex(x), RowIndex(y)))
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

/// Walks the lattice one anti-diagonal (`x + y` constant) at a time, in increasing `x + y`.
/// Within a diagonal `x` increases. Drawing in this order layers isometric tiles back to front.
pub struct IsoCellIter<CellT: Cell> {
    diagonal: usize,
    x: usize,
    columns: usize,
    rows: usize,
    remaining: usize,
    cell_type: PhantomData<CellT>,
}

impl<CellT: Cell> IsoCellIter<CellT> {
    pub fn new(dimensions: &dyn GridDimensions) -> IsoCellIter<CellT> {
        let (ColumnsCount(columns), RowsCount(rows)) = (dimensions.columns(), dimensions.rows());
        IsoCellIter {
            diagonal: 0,
            x: 0,
            columns,
            rows,
            remaining: columns * rows,
            cell_type: PhantomData,
        }
    }
}

impl<CellT: Cell> fmt::Debug for IsoCellIter<CellT> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f,
               "IsoCellIter :: diagonal: {:?}, x: {:?}, remaining: {:?}",
               self.diagonal,
               self.x,
               self.remaining)
    }
}

impl<CellT: Cell> ExactSizeIterator for IsoCellIter<CellT> {}
impl<CellT: Cell> Iterator for IsoCellIter<CellT> {
    type Item = CellT::Coord;
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        // remaining > 0 means both columns and rows are at least 1
        loop {
            let x_max = cmp::min(self.columns - 1, self.diagonal);
            if self.x <= x_max {
                let (x, y) = (self.x, self.diagonal - self.x);
                self.x += 1;
                self.remaining -= 1;
                return Some(CellT::Coord::from_row_column_indices(ColumnIndex(x), RowIndex(y)));
            }
            self.diagonal += 1;
            self.x = self.diagonal.saturating_sub(self.rows - 1);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Screen position of a lattice position on the grid turned 45 degrees clockwise and squashed to
/// half height, the layout `IsoCellIter` draws in.
///
/// `(0, 0)` lands on `iso_origin` at the top. Each step along x moves half a cell right and a
/// quarter cell down, each step along y half a cell left and a quarter cell down.
pub fn iso_projection(grid_pos: Vec2, cell_size: f64, iso_origin: Vec2) -> Vec2 {
    let x = iso_origin.x + (grid_pos.x - grid_pos.y) * cell_size / 2.0;
    let y = iso_origin.y + (grid_pos.x + grid_pos.y) * cell_size / 4.0;
    Vec2::new(x, y)
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

/// Whole rows (constant y) or whole columns (constant x) at a time.
#[derive(Debug, Copy, Clone)]
pub struct BatchIter<CellT> {
    iter_type: BatchIterType,
    current_index: usize,
    columns: usize,
    rows: usize,
    cell_type: PhantomData<CellT>,
}

impl<CellT> BatchIter<CellT> {
    pub fn rows(dimensions: &dyn GridDimensions) -> BatchIter<CellT> {
        BatchIter::new(BatchIterType::Row, dimensions)
    }

    pub fn columns(dimensions: &dyn GridDimensions) -> BatchIter<CellT> {
        BatchIter::new(BatchIterType::Column, dimensions)
    }

    fn new(iter_type: BatchIterType, dimensions: &dyn GridDimensions) -> BatchIter<CellT> {
        BatchIter {
            iter_type,
            current_index: 0,
            columns: dimensions.columns().0,
            rows: dimensions.rows().0,
            cell_type: PhantomData,
        }
    }

    fn batches_count(&self) -> usize {
        match self.iter_type {
            BatchIterType::Row => self.rows,
            BatchIterType::Column => self.columns,
        }
    }
}

impl<CellT: Cell> ExactSizeIterator for BatchIter<CellT> {}
impl<CellT: Cell> Iterator for BatchIter<CellT> {
    type Item = Vec<CellT::Coord>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.batches_count() {
            return None;
        }

        let index = self.current_index;
        let coords = match self.iter_type {
            BatchIterType::Row => {
                (0..self.columns)
                    .map(|i| CellT::Coord::from_row_column_indices(ColumnIndex(i), RowIndex(index)))
                    .collect()
            }
            BatchIterType::Column => {
                (0..self.rows)
                    .map(|i| CellT::Coord::from_row_column_indices(ColumnIndex(index), RowIndex(i)))
                    .collect()
            }
        };
        self.current_index += 1;
        Some(coords)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.batches_count() - self.current_index;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}
