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

//! Error types for tree manipulation and planning runs.
use crate::geometry::Cell;
use crate::tree::NodeId;
use thiserror::Error;

/// Tree invariant violations.
///
/// The planner never triggers these on its own; seeing one means a logic defect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("the tree already has a root")]
    RootAlreadySet,

    #[error("parent node {0} cannot be found in the tree")]
    OrphanNode(NodeId),

    #[error("node {0} is not present in the tree")]
    UnknownNode(NodeId),

    #[error("node {0} is already in the tree")]
    DuplicateNode(NodeId),
}

/// Errors surfaced by a planning run.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanningError {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("invalid workspace: {0}")]
    InvalidWorkspace(String),

    #[error("cell {cell} is outside the {rows}x{cols} workspace")]
    OutOfBounds { cell: Cell, rows: usize, cols: usize },

    #[error("tree invariant violated: {0}")]
    Tree(#[from] TreeError),
}

pub type Result<T> = std::result::Result<T, PlanningError>;
