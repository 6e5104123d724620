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

//! Planar points carrying the workspace content at their location.
use crate::tree::Distance;
use std::fmt;

/// Integer grid cell, `x` indexes workspace rows and `y` indexes columns.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
pub struct Cell {
    pub x: usize,
    pub y: usize,
}

impl Cell {
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Cell { x, y }
    }

    /// Quantizes real coordinates to the nearest cell, negative values saturate to zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn nearest(x: f64, y: f64) -> Self {
        Cell::new(x.round().max(0.0) as usize, y.round().max(0.0) as usize)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A point in the plane along with the payload of the workspace cell it lies in.
///
/// Coordinates are real valued so that steering moves exactly one step, the cell
/// a point occupies is obtained by rounding with [`Point::cell`].
#[derive(Debug, PartialEq, Clone)]
pub struct Point<T> {
    x: f64,
    y: f64,
    payload: T,
}

impl<T> Point<T> {
    #[must_use]
    pub fn new(x: f64, y: f64, payload: T) -> Self {
        Point { x, y, payload }
    }

    #[must_use]
    pub fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> f64 {
        self.y
    }

    #[must_use]
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Euclidean distance to another point, payloads are ignored.
    #[must_use]
    pub fn distance_to<U>(&self, other: &Point<U>) -> f64 {
        let (dx, dy) = (other.x - self.x, other.y - self.y);
        (dx * dx + dy * dy).sqrt()
    }

    /// Bearing from this point towards `other` in radians.
    ///
    /// Measured from the positive `y` axis, so that moving `d` along the bearing
    /// changes `x` by `sin(bearing) * d` and `y` by `cos(bearing) * d`.
    /// Coincident points have a bearing of zero.
    #[must_use]
    pub fn bearing_to<U>(&self, other: &Point<U>) -> f64 {
        (other.x - self.x).atan2(other.y - self.y)
    }

    /// The grid cell this point lies in.
    #[must_use]
    pub fn cell(&self) -> Cell {
        Cell::nearest(self.x, self.y)
    }
}

// Norm distance function for planar points
impl<T> Distance for Point<T> {
    fn distance(&self, other: &Self) -> f64 {
        self.distance_to(other)
    }
}

impl<T> fmt::Display for Point<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
