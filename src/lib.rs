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

//! Rapidly-exploring random tree planning over discretized 2D workspaces.
//!
//! A [`Workspace`] holds the payload of every grid cell. An [`Rrt`] planner grows a
//! [`Tree`] of [`Point`]s from a start cell, occasionally aiming straight at the
//! goal, until a caller supplied stop predicate accepts the newest point or the try
//! budget runs out. Cells are classified as blocked by a caller supplied collision
//! predicate, and no two nodes of the tree ever share a cell.
//!
//! Refer to the world example or integration tests for complete usage.
pub mod error;
pub mod geometry;
pub mod planning;
pub mod tree;
pub mod workspace;

pub use error::{PlanningError, Result, TreeError};
pub use geometry::{Cell, Point};
pub use planning::rrt::{Plan, Rrt, RrtBuilder, RrtConfig};
pub use tree::{DepthFirstIterator, Distance, Node, NodeId, Tree};
pub use workspace::Workspace;
