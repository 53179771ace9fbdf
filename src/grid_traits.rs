use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Deref;

use crate::grid::CellLinkError;
use crate::units::{ColumnIndex, ColumnLength, ColumnsCount, EdgesCount, NodesCount, RowIndex,
                   RowLength, RowsCount};

pub trait GridDimensions: Debug {
    fn size(&self) -> NodesCount;
    fn rows(&self) -> RowsCount;
    fn row_length(&self, row_index: Option<RowIndex>) -> Option<RowLength>;
    fn columns(&self) -> ColumnsCount;
    fn column_length(&self, column_index: Option<ColumnIndex>) -> ColumnLength;
    fn graph_size(&self) -> (NodesCount, EdgesCount);
}

/// The view of a cell graph that maze generation and path analysis work through.
///
/// Neighbours are geometric lattice adjacency and never change. Connections are the removed
/// walls between neighbours, always a subset of the neighbours and always symmetric.
pub trait CellGraph {
    type CellRef: Copy + Eq + Hash + Debug;
    type CellRefSmallVec: Deref<Target = [Self::CellRef]>;

    /// Does the cell belong to this graph?
    fn contains(&self, cell: Self::CellRef) -> bool;

    fn neighbours(&self, cell: Self::CellRef) -> Self::CellRefSmallVec;

    /// Cells joined to `cell`. Empty for cells not in the graph.
    fn connections(&self, cell: Self::CellRef) -> Self::CellRefSmallVec;

    /// Join two neighbouring cells in both directions.
    fn connect(&mut self, a: Self::CellRef, b: Self::CellRef) -> Result<(), CellLinkError>;

    /// Capacity hint for per-cell bookkeeping.
    fn cells_count(&self) -> usize;
}
