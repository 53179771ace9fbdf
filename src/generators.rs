use log::debug;
use rand::seq::SliceRandom;
use rand::{self, Rng};
use smallvec::SmallVec;

use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
use crate::grid::{CellLinkError, IndexType};
use crate::grid_traits::CellGraph;
use crate::grids::SquareGrid;
use crate::units::{ColumnLength, RowLength};
use crate::utils;

/// Carve a perfect maze, a spanning tree, over every cell reachable from `start`.
///
/// Randomized depth first search with an explicit stack: the cell on top of the stack links to
/// one of its unvisited neighbours, chosen uniformly, which is then pushed. A cell with nothing
/// left to visit is popped, backtracking to the cell below it. A link only ever goes to an
/// unvisited cell, so no cycle can form.
///
/// Cells that cannot be reached from `start` through lattice adjacency are left untouched.
pub fn recursive_backtracker<G, R>(graph: &mut G,
                                   start: G::CellRef,
                                   rng: &mut R)
                                   -> Result<(), CellLinkError>
    where G: CellGraph,
          R: Rng
{
    if !graph.contains(start) {
        return Err(CellLinkError::InvalidGridCoordinate);
    }

    let mut visited = utils::fnv_hashset(graph.cells_count());
    let mut stack = Vec::with_capacity(graph.cells_count());
    let mut links_made = 0;
    visited.insert(start);
    stack.push(start);

    while let Some(&current) = stack.last() {
        let unvisited = graph.neighbours(current)
            .iter()
            .cloned()
            .filter(|neighbour| !visited.contains(neighbour))
            .collect::<SmallVec<[G::CellRef; 8]>>();

        match unvisited.choose(rng) {
            Some(&next) => {
                graph.connect(current, next)?;
                visited.insert(next);
                stack.push(next);
                links_made += 1;
            }
            None => {
                stack.pop();
            }
        }
    }

    debug!("carved from {:?}: {} cells visited, {} links", start, visited.len(), links_made);
    Ok(())
}

/// `recursive_backtracker` driven by the thread local rng.
pub fn carve<G: CellGraph>(graph: &mut G, start: G::CellRef) -> Result<(), CellLinkError> {
    let mut rng = rand::thread_rng();
    recursive_backtracker(graph, start, &mut rng)
}

/// Knock down every wall inside the `width` x `height` block whose top left cell is `top_left`.
///
/// Nothing is linked if any part of the block lies outside of the grid.
pub fn open_room<GridIndexType>(grid: &mut SquareGrid<GridIndexType>,
                                top_left: Cartesian2DCoordinate,
                                width: RowLength,
                                height: ColumnLength)
                                -> Result<(), CellLinkError>
    where GridIndexType: IndexType
{
    let (RowLength(w), ColumnLength(h)) = (width, height);
    if w == 0 || h == 0 {
        return Ok(());
    }
    let bottom_right = top_left.offset(w as i64 - 1, h as i64 - 1)
        .filter(|corner| grid.is_valid_coordinate(*corner));
    if bottom_right.is_none() {
        return Err(CellLinkError::InvalidGridCoordinate);
    }

    for dy in 0..h {
        for dx in 0..w {
            let cell = Cartesian2DCoordinate::new(top_left.x + dx as u32, top_left.y + dy as u32);
            if dx + 1 < w {
                link_towards(grid, cell, CompassPrimary::East)?;
            }
            if dy + 1 < h {
                link_towards(grid, cell, CompassPrimary::South)?;
            }
        }
    }
    Ok(())
}

fn link_towards<GridIndexType: IndexType>(grid: &mut SquareGrid<GridIndexType>,
                                          cell: Cartesian2DCoordinate,
                                          direction: CompassPrimary)
                                          -> Result<(), CellLinkError> {
    let neighbour = grid.neighbour_at_direction(cell, direction)
        .ok_or(CellLinkError::InvalidGridCoordinate)?;
    grid.link(cell, neighbour)
}

/// Scatter up to `count` open `room_side` x `room_side` rooms over a grid, usually after a maze
/// has been carved through it. Rooms add cycles, the result is no longer a perfect maze.
///
/// Rooms keep at least two cells clear of the grid's edges. A candidate whose top left corner lands
/// in the padded footprint of an earlier room is skipped rather than retried, so fewer than `count`
/// rooms may be placed. Once every corner is blocked no further candidates are drawn, however large
/// `count` is. Returns the top left corners of the rooms opened.
pub fn carve_rooms<GridIndexType, R>(grid: &mut SquareGrid<GridIndexType>,
                                     count: usize,
                                     room_side: usize,
                                     rng: &mut R)
                                     -> Vec<Cartesian2DCoordinate>
    where GridIndexType: IndexType,
          R: Rng
{
    const MARGIN: usize = 2;
    let mut placed = vec![];
    if room_side == 0 {
        return placed;
    }

    let (columns, rows) = (grid.columns().0, grid.rows().0);
    let max_x = columns.checked_sub(MARGIN + room_side);
    let max_y = rows.checked_sub(MARGIN + room_side);
    let (max_x, max_y) = match (max_x, max_y) {
        (Some(x), Some(y)) if x >= MARGIN && y >= MARGIN => (x, y),
        _ => {
            debug!("no space for a {}x{} room in a {}x{} grid", room_side, room_side, columns, rows);
            return placed;
        }
    };

    // every candidate corner lies in MARGIN..=max_x x MARGIN..=max_y, none of the padding outside
    // that range can block anything
    let is_candidate = |x: usize, y: usize| x >= MARGIN && x <= max_x && y >= MARGIN && y <= max_y;
    let mut free_corners = (max_x - MARGIN + 1) * (max_y - MARGIN + 1);
    let mut blocked = utils::fnv_hashset(free_corners);

    for _ in 0..count {
        if free_corners == 0 {
            debug!("no room fits anywhere else, giving up");
            break;
        }
        let x = rng.gen_range(MARGIN..=max_x);
        let y = rng.gen_range(MARGIN..=max_y);
        if blocked.contains(&(x, y)) {
            debug!("room collision at ({}, {}), skipping", x, y);
            continue;
        }

        let corner = Cartesian2DCoordinate::new(x as u32, y as u32);
        let opened = open_room(grid, corner, RowLength(room_side), ColumnLength(room_side)).is_ok();

        // no later room may start close enough to touch this one
        let pad = if opened { room_side + 1 } else { 0 };
        let (x_end, y_end) = if opened { (x + room_side + pad, y + room_side + pad) } else { (x + 1, y + 1) };
        for bx in x.saturating_sub(pad)..x_end {
            for by in y.saturating_sub(pad)..y_end {
                if is_candidate(bx, by) && blocked.insert((bx, by)) {
                    free_corners -= 1;
                }
            }
        }
        if opened {
            placed.push(corner);
        }
    }

    debug!("opened {} of {} requested rooms", placed.len(), count);
    placed
}
