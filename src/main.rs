use docopt::Docopt;
use itertools::Itertools;
use mazes::{
    cells::CellCoordinate,
    generators::{self, ExhaustedPolicy, GeneratorOptions, GeneratorOptionsBuilder},
    grid::LinkMode,
    grids::{large_rect_grid, LargeRectangularGrid},
    units::{ColumnsCount, RowsCount},
};
use rand::{Rng, SeedableRng};
use rand_xorshift::XorShiftRng;
use serde_derive::Deserialize;
use std::{fs::File, io, io::prelude::*};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const USAGE: &str = "Mazes

Usage:
    mazes_driver -h | --help
    mazes_driver [(binary|sidewinder)] [(--grid-size=<n>|[--rows=<r> --columns=<c>])] [--seed=<s>] [--bidirectional] [--skip-exhausted] [--text-out=<path>] [--save-edges=<path>]

Options:
    -h --help              Show this screen.
    --grid-size=<n>        The grid size is n * n.
    --rows=<r>             The number of rows in an r*c grid [default: 10].
    --columns=<c>          The number of columns in an r*c grid [default: 10].
    --seed=<s>             Seed for the random number generator. Chosen at random if not given.
    --bidirectional        Record every passage in both directions.
    --skip-exhausted       Binary tree: carry on past a cell with no south or east neighbour instead of stopping.
    --text-out=<path>      Output file path for the text rendering of the maze. Printed to stdout if not given.
    --save-edges=<path>    Serialize the maze to a text file: each line is a pair of numbers. Line 1: n(#vertices) m(#edges). Line 2+ edge between vertices. Uses 1-based vertex indices.

Logging goes to stderr, filtered by the RUST_LOG environment variable (default: warn).
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_binary: bool,
    cmd_sidewinder: bool,
    flag_grid_size: Option<usize>,
    flag_rows: usize,
    flag_columns: usize,
    flag_seed: Option<u64>,
    flag_bidirectional: bool,
    flag_skip_exhausted: bool,
    flag_text_out: String,
    flag_save_edges: String,
}

// `errors` module holds the Error, ErrorKind, ResultExt and Result types made by `error_chain!`.
// ResultExt adds the `chain_err` trait method.
mod errors {
    use error_chain::*;
    error_chain! {

        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            Grid(::mazes::grid::GridError);
        }
    }
}
use crate::errors::*;

fn main() -> Result<()> {

    init_logging();

    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    let (rows, columns) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_rows, args.flag_columns)
    };

    let seed = args.flag_seed.unwrap_or_else(|| rand::thread_rng().gen());
    let mut rng = XorShiftRng::seed_from_u64(seed);
    info!(seed, rows, columns, "generating maze");

    let mut maze_grid = large_rect_grid(RowsCount(rows), ColumnsCount(columns))
        .chain_err(|| format!("Cannot make a {} by {} grid", rows, columns))?;

    let options = generator_options(&args);
    let carved = if args.cmd_binary {
        generators::binary_tree_with(&mut maze_grid, &mut rng, &options)?
    } else {
        generators::sidewinder_with(&mut maze_grid, &mut rng, &options)?
    };
    debug!(carved, links = maze_grid.links_count(), "maze generated");

    if !args.flag_save_edges.is_empty() {
        save_maze_graph(&maze_grid, &args.flag_save_edges)?;
    }

    if args.flag_text_out.is_empty() {
        print!("{}", maze_grid);
    } else {
        write_text_to_file(&maze_grid.to_string(), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }

    Ok(())
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn generator_options(maze_args: &MazeArgs) -> GeneratorOptions {
    let link_mode = if maze_args.flag_bidirectional {
        LinkMode::Bidirectional
    } else {
        LinkMode::Directed
    };
    let exhausted_policy = if maze_args.flag_skip_exhausted {
        ExhaustedPolicy::SkipCell
    } else {
        ExhaustedPolicy::Terminate
    };

    GeneratorOptionsBuilder::new()
        .link_mode(link_mode)
        .exhausted_policy(exhausted_policy)
        .build()
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}

fn save_maze_graph(maze_grid: &LargeRectangularGrid, file_path: &str) -> Result<()> {

    let to_1_based_index = |coord: CellCoordinate| {
        maze_grid
            .grid_coordinate_to_index(coord)
            .map(|index| index + 1)
            .ok_or_else(|| Error::from(format!("Passage endpoint {} is off the grid", coord)))
    };

    let mut lines = vec![format!("{} {}", maze_grid.size(), maze_grid.links_count())];
    for (src, dst, _) in maze_grid.iter_links() {
        lines.push(format!("{} {}", to_1_based_index(src)?, to_1_based_index(dst)?));
    }

    let mut graph_data = lines.iter().join("\n");
    graph_data.push('\n');

    write_text_to_file(&graph_data, file_path)
        .chain_err(|| format!("Failed to write maze graph to text file {}", file_path))?;

    Ok(())
}
