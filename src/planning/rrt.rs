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

// tries = 0
// G(V,E) = { start }
// While tries < max_tries:
//     if Stop(Xlast, Xgoal):
//         break
//     tries += 1
//     Xrand = Xgoal every k-th try, otherwise RandomCell()
//     Xnearest = Nearest(G(V,E), Xrand)
//     Xnew = Steer(Xnearest, Xrand, step)
//     if IsInObstacle(Xnew) or Visited(Xnew):
//         continue
//     G.append(Xnearest -> Xnew)
//     Xlast = Xnew
// Return Path(G, Xlast)

use crate::error::{PlanningError, Result, TreeError};
use crate::geometry::{Cell, Point};
use crate::tree::{NodeId, Tree};
use crate::workspace::Workspace;
use log::{debug, trace};
use rand::Rng;
use std::collections::HashMap;

/// Tuning parameters for a planning run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RrtConfig {
    /// Length of a single steering move, must be positive.
    pub step_distance: f64,

    /// Number of samples to attempt before giving up, must be positive.
    pub max_tries: usize,

    /// Every `goal_bias_interval`-th sample is the goal itself, must be at least 1.
    pub goal_bias_interval: usize,
}

impl Default for RrtConfig {
    fn default() -> Self {
        RrtConfig {
            step_distance: 1.0,
            max_tries: 10_000,
            goal_bias_interval: 15,
        }
    }
}

impl RrtConfig {
    #[must_use]
    pub fn with_step_distance(mut self, step_distance: f64) -> Self {
        self.step_distance = step_distance;
        self
    }

    #[must_use]
    pub fn with_max_tries(mut self, max_tries: usize) -> Self {
        self.max_tries = max_tries;
        self
    }

    #[must_use]
    pub fn with_goal_bias_interval(mut self, goal_bias_interval: usize) -> Self {
        self.goal_bias_interval = goal_bias_interval;
        self
    }

    /// # Errors
    ///
    /// [`PlanningError::Configuration`] naming the first offending parameter.
    pub fn validate(&self) -> Result<()> {
        if !self.step_distance.is_finite() || self.step_distance <= 0.0 {
            return Err(PlanningError::Configuration(format!(
                "step distance must be positive, got {}",
                self.step_distance
            )));
        }
        if self.max_tries == 0 {
            return Err(PlanningError::Configuration(
                "max tries must be positive".into(),
            ));
        }
        if self.goal_bias_interval == 0 {
            return Err(PlanningError::Configuration(
                "goal bias interval must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

type CollisionFn<'a, T> = Box<dyn Fn(&T) -> bool + 'a>;
type StopFn<'a, T> = Box<dyn Fn(&Point<T>, &Point<T>) -> bool + 'a>;

/// Assembles an [`Rrt`] from its configuration, random source and predicates.
pub struct RrtBuilder<'a, T, R> {
    config: RrtConfig,
    rng: R,
    collision: Option<CollisionFn<'a, T>>,
    stop: Option<StopFn<'a, T>>,
}

impl<'a, T, R: Rng> RrtBuilder<'a, T, R> {
    /// Predicate over cell payloads, returns `true` when the cell is blocked.
    #[must_use]
    pub fn collision<F>(mut self, collision: F) -> Self
    where
        F: Fn(&T) -> bool + 'a,
    {
        self.collision = Some(Box::new(collision));
        self
    }

    /// Predicate over the most recently added point and the goal, returns `true` when
    /// the search is close enough to stop.
    ///
    /// Called once per try before sampling. If the budget runs out right after a node
    /// was added, it is called one last time on that node to settle [`Plan::reached`].
    #[must_use]
    pub fn stop<F>(mut self, stop: F) -> Self
    where
        F: Fn(&Point<T>, &Point<T>) -> bool + 'a,
    {
        self.stop = Some(Box::new(stop));
        self
    }

    /// # Errors
    ///
    /// [`PlanningError::Configuration`] if the configuration is invalid or either
    /// predicate was not provided.
    pub fn build(self) -> Result<Rrt<'a, T, R>> {
        self.config.validate()?;
        let collision = self.collision.ok_or_else(|| {
            PlanningError::Configuration("missing collision predicate".into())
        })?;
        let stop = self
            .stop
            .ok_or_else(|| PlanningError::Configuration("missing stop predicate".into()))?;

        Ok(Rrt {
            config: self.config,
            rng: self.rng,
            collision,
            stop,
        })
    }
}

/// Outcome of a planning run.
#[derive(Debug)]
pub struct Plan<T> {
    path: Vec<Point<T>>,
    tree: Tree<Point<T>>,
    reached: bool,
    tries: usize,
}

impl<T> Plan<T> {
    /// Points from the start to the last node that was added to the tree.
    #[must_use]
    pub fn path(&self) -> &[Point<T>] {
        &self.path
    }

    /// The grown tree, for rendering or inspection.
    #[must_use]
    pub fn tree(&self) -> &Tree<Point<T>> {
        &self.tree
    }

    /// Whether the stop predicate held for the last point of the path.
    #[must_use]
    pub fn reached(&self) -> bool {
        self.reached
    }

    /// Number of samples drawn.
    #[must_use]
    pub fn tries(&self) -> usize {
        self.tries
    }

    /// Consumes the plan, keeping only the path.
    #[must_use]
    pub fn into_path(self) -> Vec<Point<T>> {
        self.path
    }
}

/// Maps each occupied cell to the node sitting in it, at most one node per cell.
#[derive(Debug, Default)]
struct VisitedIndex {
    cells: HashMap<Cell, NodeId>,
}

impl VisitedIndex {
    fn contains(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    fn insert(&mut self, cell: Cell, id: NodeId) {
        self.cells.insert(cell, id);
    }
}

/// Draws the target for the `attempt`-th try (counting from 1).
///
/// Every `goal_bias_interval`-th attempt returns the goal verbatim, the rest are
/// uniformly random cells of the workspace.
fn sample<T, R>(
    rng: &mut R,
    workspace: &Workspace<T>,
    goal: &Point<T>,
    attempt: usize,
    goal_bias_interval: usize,
) -> Result<Point<T>>
where
    T: Clone,
    R: Rng,
{
    if attempt % goal_bias_interval == 0 {
        return Ok(goal.clone());
    }

    let cell = Cell::new(
        rng.gen_range(0..workspace.rows()),
        rng.gen_range(0..workspace.cols()),
    );
    workspace.point(cell)
}

/// Returns the point `step_distance` away from `from` in the direction of `toward`.
///
/// The result is clamped into the workspace and carries the payload of the cell it
/// lands in.
#[allow(clippy::cast_precision_loss)]
fn steer<T: Clone>(
    from: &Point<T>,
    toward: &Point<T>,
    step_distance: f64,
    workspace: &Workspace<T>,
) -> Result<Point<T>> {
    let bearing = from.bearing_to(toward);
    let (x_max, y_max) = ((workspace.rows() - 1) as f64, (workspace.cols() - 1) as f64);
    let x = (from.x() + bearing.sin() * step_distance).clamp(0.0, x_max);
    let y = (from.y() + bearing.cos() * step_distance).clamp(0.0, y_max);

    let payload = workspace.payload(Cell::nearest(x, y))?.clone();
    Ok(Point::new(x, y, payload))
}

/// Rapidly-exploring random tree planner over a [`Workspace`].
///
/// Owns its random source, so two planners built with identically seeded generators
/// grow identical trees.
///
/// The predicates are not required to be `Send`, so a planner stays on the thread that
/// built it. For parallel queries build one planner per worker thread, the
/// [`Workspace`] itself can be shared by reference.
///
/// # Example
///
/// ```
/// use gridrrt::{Cell, Rrt, RrtConfig, Workspace};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let world = Workspace::filled(10, 10, false).unwrap();
/// let config = RrtConfig::default().with_step_distance(2.0);
/// let planner = Rrt::builder(config, StdRng::seed_from_u64(1))
///     .collision(|blocked: &bool| *blocked)
///     .stop(|p, goal| p.distance_to(goal) <= 1.5)
///     .build()
///     .unwrap();
///
/// let plan = planner.find_path(Cell::new(0, 0), Cell::new(9, 9), &world).unwrap();
/// assert!(plan.reached());
/// ```
pub struct Rrt<'a, T, R> {
    config: RrtConfig,
    rng: R,
    collision: CollisionFn<'a, T>,
    stop: StopFn<'a, T>,
}

impl<'a, T, R: Rng> Rrt<'a, T, R> {
    #[must_use]
    pub fn builder(config: RrtConfig, rng: R) -> RrtBuilder<'a, T, R> {
        RrtBuilder {
            config,
            rng,
            collision: None,
            stop: None,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RrtConfig {
        &self.config
    }
}

impl<T: Clone, R: Rng> Rrt<'_, T, R> {
    /// Grows a tree from `start` until the stop predicate holds for the newest node or
    /// the try budget runs out, then returns the path to the newest node.
    ///
    /// Running out of tries is not an error, check [`Plan::reached`] to tell the two
    /// outcomes apart.
    ///
    /// The planner is consumed, so its random source drives exactly one run. Build a
    /// new planner with a freshly seeded generator for every query.
    ///
    /// # Errors
    ///
    /// [`PlanningError::OutOfBounds`] if `start` or `finish` lie outside the workspace,
    /// in which case nothing is grown.
    /// [`PlanningError::Tree`] if the tree invariants are broken, which indicates a bug.
    pub fn find_path(
        mut self,
        start: Cell,
        finish: Cell,
        workspace: &Workspace<T>,
    ) -> Result<Plan<T>> {
        let start = workspace.point(start)?;
        let finish = workspace.point(finish)?;
        debug!(
            "Growing tree from {start} to {finish} over a {}x{} workspace with {:?}",
            workspace.rows(),
            workspace.cols(),
            self.config
        );

        let mut tree = Tree::new();
        let mut visited = VisitedIndex::default();
        let mut next_id: NodeId = 0;
        visited.insert(start.cell(), next_id);
        tree.add_root(next_id, start)?;

        let mut last_added = next_id;
        let mut tries = 0;
        let mut reached = false;

        // Whether a node was added since the stop predicate last looked at the tree
        let mut unchecked = true;

        while tries < self.config.max_tries {
            let last = tree
                .get(last_added)
                .ok_or(TreeError::UnknownNode(last_added))?;
            unchecked = false;
            if (self.stop)(last.value(), &finish) {
                reached = true;
                break;
            }

            tries += 1;
            let target = sample(
                &mut self.rng,
                workspace,
                &finish,
                tries,
                self.config.goal_bias_interval,
            )?;

            // The root is always present so there is always a nearest node
            let Some(nearest) = tree.nearest_neighbor(&target) else {
                break;
            };
            let parent = nearest.id();
            let step = self.config.step_distance;
            let candidate = steer(nearest.value(), &target, step, workspace)?;

            if (self.collision)(candidate.payload()) {
                trace!("Try {tries}: {candidate} is blocked");
                continue;
            }

            let cell = candidate.cell();
            if visited.contains(cell) {
                trace!("Try {tries}: cell {cell} is already in the tree");
                continue;
            }

            next_id += 1;
            tree.add(parent, next_id, candidate)?;
            visited.insert(cell, next_id);
            last_added = next_id;
            unchecked = true;
        }

        // The budget may run out right after adding a node that satisfies the predicate
        if unchecked {
            if let Some(last) = tree.get(last_added) {
                reached = (self.stop)(last.value(), &finish);
            }
        }

        debug!(
            "Finished after {tries} tries with {} nodes, goal reached: {reached}",
            tree.size()
        );

        let path = tree.path(last_added)?;
        Ok(Plan {
            path,
            tree,
            reached,
            tries,
        })
    }
}

//
// Unit tests
//
