// MIT License
//
// Copyright (c) 2024 Erik Holum
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

use geo::{polygon, Contains, Polygon};
use gridrrt::{Cell, Point, Rrt, RrtConfig, Tree, Workspace};
use plotly::common::{Fill, Line, Marker, Mode};
use plotly::{Layout, Plot, Scatter};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::env;

/// What occupies a cell of the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terrain {
    Empty,
    Obstacle,
}

/// Closed axis aligned rectangle from its lower left and upper right corners.
fn rectangle(x0: f64, y0: f64, x1: f64, y1: f64) -> Polygon {
    polygon![(x: x0, y: y0), (x: x1, y: y0), (x: x1, y: y1), (x: x0, y: y1), (x: x0, y: y0)]
}

/// Rasterizes polygon obstacles onto a `size` by `size` grid.
///
/// A cell is an obstacle if its center, or any point within `buffer` of it along
/// the axes, lies inside one of the polygons.
fn rasterize(size: usize, obstacles: &[Polygon], buffer: f64) -> Workspace<Terrain> {
    let mut world =
        Workspace::filled(size, size, Terrain::Empty).expect("size must be positive");
    let offsets = [
        (0.0, 0.0),
        (buffer, 0.0),
        (-buffer, 0.0),
        (0.0, buffer),
        (0.0, -buffer),
    ];
    for x in 0..size {
        for y in 0..size {
            let blocked = offsets.iter().any(|(dx, dy)| {
                let p = geo::Point::new(x as f64 + dx, y as f64 + dy);
                obstacles.iter().any(|obstacle| obstacle.contains(&p))
            });
            if blocked {
                world
                    .set(Cell::new(x, y), Terrain::Obstacle)
                    .expect("cell is within bounds");
            }
        }
    }
    world
}

/// Visualize the tree and the resulting path
fn visualize_rrt(
    obstacles: &[Polygon],
    path: &[Point<Terrain>],
    tree: &Tree<Point<Terrain>>,
    reached: bool,
) {
    let mut plot = Plot::new();

    // Plot obstacles
    for obstacle in obstacles {
        let (x, y): (Vec<_>, Vec<_>) = obstacle
            .exterior()
            .points()
            .map(|p| (p.x(), p.y()))
            .unzip();
        let trace = Scatter::new(x, y)
            .fill(Fill::ToSelf)
            .fill_color("black")
            .line(Line::new().color("black"))
            .opacity(1.0);
        plot.add_trace(trace);
    }

    // Plot tree
    for node in tree.iter_depth_first() {
        if let Some(parent) = tree.parent(node) {
            let (p, q) = (node.value(), parent.value());
            let trace = Scatter::new(vec![p.x(), q.x()], vec![p.y(), q.y()])
                .mode(Mode::Lines)
                .line(Line::new().color("blue"));
            plot.add_trace(trace);
        }
    }

    // Plot path
    let (path_x, path_y): (Vec<_>, Vec<_>) = path.iter().map(|p| (p.x(), p.y())).unzip();
    let path_trace = Scatter::new(path_x, path_y)
        .mode(Mode::Lines)
        .line(Line::new().color("red").width(4.0));
    plot.add_trace(path_trace);

    // Plot start and end
    if let (Some(start), Some(end)) = (path.first(), path.last()) {
        let start_trace = Scatter::new(vec![start.x()], vec![start.y()])
            .mode(Mode::Markers)
            .marker(Marker::new().color("green").size(16));
        let end_trace = Scatter::new(vec![end.x()], vec![end.y()])
            .mode(Mode::Markers)
            .marker(Marker::new().color("yellow").size(16));
        plot.add_trace(start_trace);
        plot.add_trace(end_trace);
    }

    let outcome = if reached { "reached" } else { "exhausted" };
    let layout = Layout::new()
        .title(format!("RRT Path Finding Result ({outcome})").as_str().into())
        .show_legend(false)
        .width(750)
        .height(750)
        .x_axis(plotly::layout::Axis::new().title("X".into()))
        .y_axis(plotly::layout::Axis::new().title("Y".into()));

    plot.set_layout(layout);
    plot.show();
}

pub fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 6 {
        eprintln!("Usage: program start_x start_y end_x end_y seed");
        return;
    }

    let start_x: usize = args[1].parse().expect("Invalid start_x");
    let start_y: usize = args[2].parse().expect("Invalid start_y");
    let end_x: usize = args[3].parse().expect("Invalid end_x");
    let end_y: usize = args[4].parse().expect("Invalid end_y");
    let seed: u64 = args[5].parse().expect("Invalid seed");

    let start = Cell::new(start_x, start_y);
    let end = Cell::new(end_x, end_y);

    println!("Start cell: {start}");
    println!("End cell: {end}");

    // Add a few rectangular obstacles to the world
    let obstacles = vec![
        rectangle(10.0, 10.0, 30.0, 30.0),
        rectangle(50.0, 50.0, 80.0, 80.0),
        rectangle(70.0, 20.0, 90.0, 40.0),
        rectangle(35.0, 30.0, 45.0, 90.0),
    ];

    // Constants for this particular run
    let buffer = 1.0; // Cells within 1.0 of an obstacle are blocked.
    let step_distance = 2.0; // Distance between existing nodes and new ones.
    let valid_distance = 2.0; // Success radius around goal.

    let world = rasterize(101, &obstacles, buffer);

    let config = RrtConfig::default()
        .with_step_distance(step_distance)
        .with_max_tries(100_000)
        .with_goal_bias_interval(15);

    let planner = Rrt::builder(config, StdRng::seed_from_u64(seed))
        .collision(|terrain: &Terrain| *terrain == Terrain::Obstacle)
        .stop(move |p: &Point<Terrain>, goal: &Point<Terrain>| {
            p.distance_to(goal) <= valid_distance
        })
        .build();

    let result = planner.and_then(|planner| planner.find_path(start, end, &world));
    match result {
        Ok(plan) => {
            if plan.reached() {
                println!("Path found after {} tries!", plan.tries());
            } else {
                println!("Ran out of tries, showing the path to the last node added");
            }
            for point in plan.path() {
                println!("{point}");
            }
            visualize_rrt(&obstacles, plan.path(), plan.tree(), plan.reached());
        }
        Err(e) => {
            println!("RRT failed: {e}");
        }
    }
}
