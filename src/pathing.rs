use std::fmt::{Debug, Display};
use std::hash::Hash;

use num::traits::{Bounded, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::grid_traits::CellGraph;
use crate::utils;
use crate::utils::FnvHashMap;


// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time
// Note generic parameter type aliases are not in the langauge.
// `type X = Y;` only works with concrete types.
pub trait MaxDistance: Zero + One + Bounded + Unsigned + Debug + Clone + Copy + Display + Ord {}
impl<T: Zero + One + Bounded + Unsigned + Debug + Clone + Copy + Display + Ord> MaxDistance for T {}


/// Steps along connections from a start cell to every cell reachable from it.
#[derive(Debug, Clone)]
pub struct Distances<CellRefT, MaxDistanceT = u32> {
    start_cell: CellRefT,
    distances: FnvHashMap<CellRefT, MaxDistanceT>,
    max_distance: MaxDistanceT,
}

impl<CellRefT, MaxDistanceT> Distances<CellRefT, MaxDistanceT>
    where CellRefT: Copy + Eq + Hash + Debug,
          MaxDistanceT: MaxDistance
{
    /// Flood fill outwards from `start`. None if `start` is not in the graph.
    pub fn new<G>(graph: &G, start: CellRefT) -> Option<Distances<CellRefT, MaxDistanceT>>
        where G: CellGraph<CellRef = CellRefT>
    {
        if !graph.contains(start) {
            return None;
        }

        let mut max = Zero::zero();
        let mut distances = utils::fnv_hashmap(graph.cells_count());
        distances.insert(start, Zero::zero());

        // Every link is one step, so the first distance recorded for a cell is already the
        // shortest. The distances map doubles as the visited set.
        let mut frontier = vec![start];
        while !frontier.is_empty() {

            let mut new_frontier = vec![];
            for cell in &frontier {
                let distance_to_cell: MaxDistanceT = match distances.get(cell) {
                    Some(d) => *d,
                    None => continue,
                };
                if distance_to_cell > max {
                    max = distance_to_cell;
                }

                for linked in graph.connections(*cell).iter() {
                    if !distances.contains_key(linked) {
                        distances.insert(*linked, distance_to_cell + One::one());
                        new_frontier.push(*linked);
                    }
                }
            }
            frontier = new_frontier;
        }

        Some(Distances {
            start_cell: start,
            distances,
            max_distance: max,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> CellRefT {
        self.start_cell
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, cell: CellRefT) -> Option<MaxDistanceT> {
        self.distances.get(&cell).cloned()
    }

    /// Cells reachable from the start, the start included.
    #[inline]
    pub fn reachable_count(&self) -> usize {
        self.distances.len()
    }

    pub fn furthest_points(&self) -> SmallVec<[CellRefT; 8]> {
        let furthest_distance = self.max();
        self.distances
            .iter()
            .filter(|&(_, distance)| *distance == furthest_distance)
            .map(|(cell, _)| *cell)
            .collect()
    }
}

/// Walk back from `end` towards the start of `distances_from_start`, always along a connection
/// that gets one step closer. Returns the path start first, None if `end` is unreachable.
pub fn shortest_path<G, MaxDistanceT>(graph: &G,
                                      distances_from_start: &Distances<G::CellRef, MaxDistanceT>,
                                      end_point: G::CellRef)
                                      -> Option<Vec<G::CellRef>>
    where G: CellGraph,
          MaxDistanceT: MaxDistance
{
    let mut current_distance = distances_from_start.distance_from_start_to(end_point)?;
    let start = distances_from_start.start();
    let mut path = vec![end_point];
    let mut current = end_point;

    while current != start {
        let closest_to_start = graph.connections(current)
            .iter()
            .filter_map(|linked| {
                distances_from_start.distance_from_start_to(*linked).map(|d| (*linked, d))
            })
            .min_by_key(|&(_, distance)| distance);

        match closest_to_start {
            Some((closer, closer_distance)) if closer_distance < current_distance => {
                current = closer;
                current_distance = closer_distance;
                path.push(current);
            }
            // The graph changed since the distances were measured.
            _ => return None,
        }
    }

    path.reverse();
    Some(path)
}

/// The longest path of a perfect maze: the cell furthest from `start` begins it and the cell
/// furthest from that one ends it. On graphs with cycles this is just a long path.
pub fn longest_path<G, MaxDistanceT>(graph: &G, start: G::CellRef) -> Option<Vec<G::CellRef>>
    where G: CellGraph,
          MaxDistanceT: MaxDistance
{
    let first_distances = Distances::<G::CellRef, MaxDistanceT>::new(graph, start)?;
    let long_path_start = *first_distances.furthest_points().first()?;

    let distances_from_start = Distances::<G::CellRef, MaxDistanceT>::new(graph, long_path_start)?;
    let end_point = *distances_from_start.furthest_points().first()?;

    shortest_path(graph, &distances_from_start, end_point)
}
