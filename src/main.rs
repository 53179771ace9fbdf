use docopt::Docopt;
use log::{debug, info};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use sketchgrid::{
    cells::{Cartesian2DCoordinate, Cell},
    generators,
    grid::Grid,
    grids,
    pathing,
    quadtree::{Quadtree, QuadtreeConfig},
    shapes::{Bounds, Circle},
    units,
    vec2::Vec2,
};
use std::{
    fs::File,
    io,
    io::prelude::*,
    rc::Rc,
};

const USAGE: &str = "Sketch grid

Usage:
    sketch_driver -h | --help
    sketch_driver maze (square|hex) [--width=<w> --height=<h> --cell-size=<s> --seed=<n> --rooms=<n> --save-edges=<path>]
    sketch_driver scatter [--width=<w> --height=<h> --radius=<r> --attempts=<n> --max-objects=<n> --max-levels=<n> --seed=<n>]

Options:
    -h --help              Show this screen.
    --width=<w>            Maze columns, or scatter area width. Defaults to 20 columns or 400 units.
    --height=<h>           Maze rows, or scatter area height. Defaults to 20 rows or 400 units.
    --cell-size=<s>        Cell height in world units [default: 10].
    --seed=<n>             Seed for the random number generator, random if not given.
    --rooms=<n>            Square mazes only: try to open up n 3x3 rooms after carving [default: 0].
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.
    --radius=<r>           Radius of every scattered circle [default: 4].
    --attempts=<n>         Random placements to try [default: 2000].
    --max-objects=<n>      Objects a quadtree node holds before splitting [default: 10].
    --max-levels=<n>       Deepest quadtree level [default: 4].
";

#[derive(Debug, Deserialize)]
struct DriverArgs {
    cmd_maze: bool,
    cmd_square: bool,
    cmd_hex: bool,
    cmd_scatter: bool,
    flag_width: Option<usize>,
    flag_height: Option<usize>,
    flag_cell_size: f64,
    flag_seed: Option<u64>,
    flag_rooms: usize,
    flag_save_edges: String,
    flag_radius: f64,
    flag_attempts: usize,
    flag_max_objects: usize,
    flag_max_levels: usize,
}

mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            CellLink(::sketchgrid::grid::CellLinkError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {
    env_logger::init();

    let args: DriverArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;
    debug!("{:?}", args);

    let mut rng = match args.flag_seed {
        Some(seed) => XorShiftRng::seed_from_u64(seed),
        None => XorShiftRng::from_entropy(),
    };

    if args.cmd_maze {
        run_maze(&args, &mut rng)
    } else if args.cmd_scatter {
        run_scatter(&args, &mut rng)
    } else {
        Ok(())
    }
}

fn run_maze(args: &DriverArgs, rng: &mut XorShiftRng) -> Result<()> {
    const ROOM_SIDE: usize = 3;
    let width = units::RowLength(args.flag_width.unwrap_or(20));
    let height = units::ColumnLength(args.flag_height.unwrap_or(20));

    if args.cmd_square {
        let mut grid = grids::square_grid::<u32>(Vec2::ZERO, width, height, args.flag_cell_size)
            .ok_or("Grid dimensions must be non zero and fit a 32 bit index.")?;
        carve_maze(&mut grid, rng)?;
        if args.flag_rooms > 0 {
            let rooms = generators::carve_rooms(&mut grid, args.flag_rooms, ROOM_SIDE, rng);
            println!("rooms opened: {}", rooms.len());
        }
        finish_maze(&grid, args)
    } else if args.cmd_hex {
        if args.flag_rooms > 0 {
            info!("rooms are only opened in square mazes, ignoring --rooms");
        }
        let mut grid = grids::hex_grid::<u32>(Vec2::ZERO, width, height, args.flag_cell_size)
            .ok_or("Grid dimensions must be non zero and fit a 32 bit index.")?;
        carve_maze(&mut grid, rng)?;
        finish_maze(&grid, args)
    } else {
        Err("A maze is either square or hex.".into())
    }
}

fn carve_maze<CellT>(grid: &mut Grid<u32, CellT>, rng: &mut XorShiftRng) -> Result<()>
    where CellT: Cell<Coord = Cartesian2DCoordinate>
{
    let start = grid.random_cell(rng);
    info!("carving a {:?} maze from {:?}", grid.kind(), start);
    generators::recursive_backtracker(grid, start, rng)?;
    Ok(())
}

fn finish_maze<CellT>(grid: &Grid<u32, CellT>, args: &DriverArgs) -> Result<()>
    where CellT: Cell<Coord = Cartesian2DCoordinate>
{
    let origin_cell = Cartesian2DCoordinate::new(0, 0);
    let longest = pathing::longest_path::<_, u32>(grid, origin_cell).unwrap_or_else(Vec::new);

    println!("{:?} maze: {} x {} cells, {} links", grid.kind(), grid.columns().0, grid.rows().0,
             grid.links_count());
    if let (Some(start), Some(end)) = (longest.first(), longest.last()) {
        println!("longest path: {} cells from {:?} to {:?}", longest.len(), start, end);
    }

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(grid, &args.flag_save_edges)?;
    }
    Ok(())
}

fn run_scatter(args: &DriverArgs, rng: &mut XorShiftRng) -> Result<()> {
    let width = args.flag_width.unwrap_or(400) as f64;
    let height = args.flag_height.unwrap_or(400) as f64;
    let radius = args.flag_radius;
    if radius <= 0.0 || width <= 2.0 * radius || height <= 2.0 * radius {
        return Err("The radius must be positive and a circle must fit in the area.".into());
    }

    let config = QuadtreeConfig {
        max_objects: args.flag_max_objects,
        max_levels: args.flag_max_levels,
    };
    let mut tree = Quadtree::<Circle<usize>>::new(Bounds::new(0.0, 0.0, width, height), config);
    let mut placed = 0;

    for attempt in 0..args.flag_attempts {
        let x = radius + rng.gen::<f64>() * (width - 2.0 * radius);
        let y = radius + rng.gen::<f64>() * (height - 2.0 * radius);
        let candidate = Circle::new(x, y, radius).with_data(attempt);

        // any circle overlapping the candidate has its centre within this neighbourhood
        let neighbourhood = Circle::new(x, y, 2.0 * radius);
        let overlaps = tree.retrieve(&neighbourhood)
            .iter()
            .any(|other| {
                let reach = other.r + candidate.r;
                (other.centre() - candidate.centre()).sqr_magnitude() < reach * reach
            });

        if !overlaps {
            tree.insert(Rc::new(candidate));
            placed += 1;
        }
    }

    println!("placed {} of {} circles of radius {} in {} x {}", placed, args.flag_attempts,
             radius, width, height);
    println!("quadtree root split: {}", !tree.is_leaf());
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph<CellT>(maze_grid: &Grid<u32, CellT>, file_path: &str) -> Result<()>
    where CellT: Cell<Coord = Cartesian2DCoordinate>
{
    let mut graph_data = String::new();
    let vertices_count = maze_grid.size();
    let edges_count = maze_grid.links_count();
    graph_data.push_str(&format!("{} {}\n", vertices_count, edges_count));

    for (src, dst) in maze_grid.iter_links() {
        let index_a = maze_grid.grid_coordinate_to_index(src)
            .ok_or("Links iter gave an invalid coordinate.")?;
        let index_b = maze_grid.grid_coordinate_to_index(dst)
            .ok_or("Links iter gave an invalid coordinate.")?;
        graph_data.push_str(&format!("{} {}\n", index_a + 1, index_b + 1));
    }

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
