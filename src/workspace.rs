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

//! Rectangular grid of cell payloads that the planner searches over.
use crate::error::{PlanningError, Result};
use crate::geometry::{Cell, Point};

/// Fixed size rectangular grid.
///
/// Always has at least one row and one column, and every row has the same length.
/// Cells are addressed as `(x, y)` where `x` is the row and `y` the column.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace<T> {
    rows: usize,
    cols: usize,

    // Row major storage
    cells: Vec<T>,
}

impl<T> Workspace<T> {
    /// Builds a workspace from a vector of rows.
    ///
    /// # Errors
    ///
    /// If there are no rows, the first row is empty, or the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let cols = match rows.first() {
            Some(row) if !row.is_empty() => row.len(),
            Some(_) => {
                return Err(PlanningError::InvalidWorkspace(
                    "rows must not be empty".into(),
                ))
            }
            None => {
                return Err(PlanningError::InvalidWorkspace(
                    "workspace has no rows".into(),
                ))
            }
        };

        if let Some((i, row)) = rows.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(PlanningError::InvalidWorkspace(format!(
                "row {i} has {} cells, expected {cols}",
                row.len()
            )));
        }

        let n_rows = rows.len();
        Ok(Workspace {
            rows: n_rows,
            cols,
            cells: rows.into_iter().flatten().collect(),
        })
    }

    /// Number of rows, the extent along `x`.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns, the extent along `y`.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.rows && cell.y < self.cols
    }

    /// Returns the payload stored at the cell, or `None` when out of bounds.
    #[must_use]
    pub fn get(&self, cell: Cell) -> Option<&T> {
        if self.contains(cell) {
            self.cells.get(cell.x * self.cols + cell.y)
        } else {
            None
        }
    }

    /// Like [`Workspace::get`] but reports the offending cell.
    ///
    /// # Errors
    ///
    /// If the cell lies outside the grid.
    pub fn payload(&self, cell: Cell) -> Result<&T> {
        self.check_bounds(cell)?;
        Ok(&self.cells[cell.x * self.cols + cell.y])
    }

    /// Overwrites a single cell.
    ///
    /// # Errors
    ///
    /// If the cell lies outside the grid.
    pub fn set(&mut self, cell: Cell, value: T) -> Result<()> {
        self.check_bounds(cell)?;
        let idx = cell.x * self.cols + cell.y;
        self.cells[idx] = value;
        Ok(())
    }

    /// Iterates over every cell in row major order along with its payload.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (Cell, &T)> {
        let cols = self.cols;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, value)| (Cell::new(i / cols, i % cols), value))
    }

    /// # Errors
    ///
    /// [`PlanningError::OutOfBounds`] if the cell lies outside the grid.
    pub fn check_bounds(&self, cell: Cell) -> Result<()> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(PlanningError::OutOfBounds {
                cell,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

impl<T: Clone> Workspace<T> {
    /// Builds a `rows` by `cols` workspace with every cell set to `value`.
    ///
    /// # Errors
    ///
    /// If either dimension is zero.
    pub fn filled(rows: usize, cols: usize, value: T) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(PlanningError::InvalidWorkspace(format!(
                "dimensions must be positive, got {rows}x{cols}"
            )));
        }
        Ok(Workspace {
            rows,
            cols,
            cells: vec![value; rows * cols],
        })
    }

    /// Sets every cell of the `size` by `size` square centered on `center` to `value`.
    ///
    /// The square is cropped to the grid, so it may be placed partially outside.
    pub fn fill_square(&mut self, center: Cell, size: usize, value: &T) {
        let offset = size.saturating_sub(1) / 2;
        let x_max = (center.x + offset).min(self.rows - 1);
        let y_max = (center.y + offset).min(self.cols - 1);
        let x_range = center.x.saturating_sub(offset)..=x_max;
        let y_range = center.y.saturating_sub(offset)..=y_max;
        for x in x_range {
            for y in y_range.clone() {
                let idx = x * self.cols + y;
                self.cells[idx] = value.clone();
            }
        }
    }

    /// Materializes the point at a cell with the payload stored there.
    ///
    /// # Errors
    ///
    /// If the cell lies outside the grid.
    #[allow(clippy::cast_precision_loss)]
    pub fn point(&self, cell: Cell) -> Result<Point<T>> {
        let payload = self.payload(cell)?.clone();
        Ok(Point::new(cell.x as f64, cell.y as f64, payload))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_from_rows() {
        let ws = Workspace::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!(ws.rows(), 2);
        assert_eq!(ws.cols(), 3);
        assert_eq!(ws.get(Cell::new(0, 2)), Some(&3));
        assert_eq!(ws.get(Cell::new(1, 0)), Some(&4));
        assert_eq!(ws.get(Cell::new(2, 0)), None);
        assert_eq!(ws.get(Cell::new(0, 3)), None);
    }

    #[test]
    fn test_workspace_invalid_shapes() {
        let empty: Vec<Vec<i32>> = Vec::new();
        assert!(matches!(
            Workspace::from_rows(empty),
            Err(PlanningError::InvalidWorkspace(_))
        ));
        assert!(matches!(
            Workspace::from_rows(vec![Vec::<i32>::new()]),
            Err(PlanningError::InvalidWorkspace(_))
        ));
        assert!(matches!(
            Workspace::from_rows(vec![vec![1, 2], vec![3]]),
            Err(PlanningError::InvalidWorkspace(_))
        ));
        assert!(Workspace::filled(0, 3, 0).is_err());
    }

    #[test]
    fn test_workspace_bounds() {
        let ws = Workspace::filled(3, 2, false).unwrap();
        assert!(ws.check_bounds(Cell::new(2, 1)).is_ok());
        assert_eq!(
            ws.check_bounds(Cell::new(3, 1)),
            Err(PlanningError::OutOfBounds {
                cell: Cell::new(3, 1),
                rows: 3,
                cols: 2
            })
        );
    }

    #[test]
    fn test_workspace_fill_square() {
        let mut ws = Workspace::filled(5, 5, 0).unwrap();
        ws.fill_square(Cell::new(0, 0), 3, &1);

        // Cropped to the top left corner
        let filled: Vec<Cell> = ws
            .iter()
            .filter(|(_, v)| **v == 1)
            .map(|(c, _)| c)
            .collect();
        assert_eq!(
            filled,
            vec![Cell::new(0, 0), Cell::new(0, 1), Cell::new(1, 0), Cell::new(1, 1)]
        );

        ws.fill_square(Cell::new(3, 3), 3, &2);
        assert_eq!(ws.iter().filter(|(_, v)| **v == 2).count(), 9);
        assert_eq!(ws.get(Cell::new(4, 4)), Some(&2));
    }

    #[test]
    fn test_workspace_point() {
        let mut ws = Workspace::filled(4, 4, "empty").unwrap();
        ws.set(Cell::new(2, 3), "obstacle").unwrap();
        let p = ws.point(Cell::new(2, 3)).unwrap();
        assert_eq!(p, Point::new(2.0, 3.0, "obstacle"));
        assert!(ws.point(Cell::new(4, 0)).is_err());
        assert!(ws.set(Cell::new(0, 4), "obstacle").is_err());
    }
}
