//! Dense 2D precipitation grid container.
//!
//! Cells are indexed by integer row/column within an inclusive window
//! `[min_row, max_row] x [min_col, max_col]`. Unset or out-of-window
//! cells read as the missing-value sentinel. The grid calls into the
//! projection layer only when exporting a cell outline to vector form.

use map_common::{MapError, MapResult, Shape, Vertex, VertexList};
use projection::{project_shape_in_place, Projection};
use serde::{Deserialize, Serialize};

/// Default missing-value sentinel.
pub const MISSING_VALUE: f64 = -999.0;

/// A dense grid of cell values over an inclusive row/column window.
///
/// `max_value` and `positive_count` are bookkeeping for the layers that
/// fill the grid; they are maintained by callers, not recomputed here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecipGrid {
    min_row: i32,
    max_row: i32,
    min_col: i32,
    max_col: i32,
    /// Row-major cell values, `rows() * cols()` long.
    data: Vec<f64>,
    pub missing_value: f64,
    pub units: String,
    pub max_value: f64,
    pub positive_count: usize,
}

impl PrecipGrid {
    /// Create a grid over the window, every cell set to the sentinel.
    pub fn new(min_row: i32, max_row: i32, min_col: i32, max_col: i32) -> MapResult<Self> {
        if max_row < min_row || max_col < min_col {
            return Err(MapError::InvalidGridBounds(format!(
                "rows [{min_row}, {max_row}], cols [{min_col}, {max_col}]"
            )));
        }
        let rows = (max_row - min_row + 1) as usize;
        let cols = (max_col - min_col + 1) as usize;
        Ok(Self {
            min_row,
            max_row,
            min_col,
            max_col,
            data: vec![MISSING_VALUE; rows * cols],
            missing_value: MISSING_VALUE,
            units: String::new(),
            max_value: MISSING_VALUE,
            positive_count: 0,
        })
    }

    pub fn min_row(&self) -> i32 {
        self.min_row
    }

    pub fn max_row(&self) -> i32 {
        self.max_row
    }

    pub fn min_col(&self) -> i32 {
        self.min_col
    }

    pub fn max_col(&self) -> i32 {
        self.max_col
    }

    /// Number of rows in the window.
    pub fn rows(&self) -> usize {
        (self.max_row - self.min_row + 1) as usize
    }

    /// Number of columns in the window.
    pub fn cols(&self) -> usize {
        (self.max_col - self.min_col + 1) as usize
    }

    fn index(&self, row: i32, col: i32) -> Option<usize> {
        if row < self.min_row || row > self.max_row || col < self.min_col || col > self.max_col {
            return None;
        }
        let r = (row - self.min_row) as usize;
        let c = (col - self.min_col) as usize;
        Some(r * self.cols() + c)
    }

    /// Cell value, or the sentinel outside the window.
    pub fn get(&self, row: i32, col: i32) -> f64 {
        match self.index(row, col) {
            Some(i) => self.data[i],
            None => self.missing_value,
        }
    }

    /// Set a cell value; writes outside the window are ignored.
    pub fn set(&mut self, row: i32, col: i32, value: f64) {
        if let Some(i) = self.index(row, col) {
            self.data[i] = value;
        }
    }

    /// Resize the window, keeping the overlapping cell range and filling
    /// newly exposed cells with the sentinel.
    pub fn resize(
        &mut self,
        min_row: i32,
        max_row: i32,
        min_col: i32,
        max_col: i32,
    ) -> MapResult<()> {
        if max_row < min_row || max_col < min_col {
            return Err(MapError::InvalidGridBounds(format!(
                "rows [{min_row}, {max_row}], cols [{min_col}, {max_col}]"
            )));
        }
        let new_rows = (max_row - min_row + 1) as usize;
        let new_cols = (max_col - min_col + 1) as usize;
        let mut data = vec![self.missing_value; new_rows * new_cols];

        let overlap_min_row = self.min_row.max(min_row);
        let overlap_max_row = self.max_row.min(max_row);
        let overlap_min_col = self.min_col.max(min_col);
        let overlap_max_col = self.max_col.min(max_col);

        let old_cols = self.cols();
        for row in overlap_min_row..=overlap_max_row {
            for col in overlap_min_col..=overlap_max_col {
                let old_r = (row - self.min_row) as usize;
                let old_c = (col - self.min_col) as usize;
                let r = (row - min_row) as usize;
                let c = (col - min_col) as usize;
                data[r * new_cols + c] = self.data[old_r * old_cols + old_c];
            }
        }

        tracing::debug!(
            old_rows = self.rows(),
            old_cols = self.cols(),
            new_rows,
            new_cols,
            "resized grid"
        );

        self.min_row = min_row;
        self.max_row = max_row;
        self.min_col = min_col;
        self.max_col = max_col;
        self.data = data;
        Ok(())
    }

    /// The closed outline of one cell, re-projected for vector export.
    ///
    /// Cell `(row, col)` spans `[col, col+1] x [row, row+1]` in the
    /// grid's own projected units.
    pub fn cell_outline(
        &self,
        row: i32,
        col: i32,
        grid_projection: &Projection,
        out_projection: &Projection,
    ) -> MapResult<Shape> {
        let x = col as f64;
        let y = row as f64;
        let mut shape = Shape::Polygon(VertexList::new(vec![
            Vertex::new(x, y),
            Vertex::new(x + 1.0, y),
            Vertex::new(x + 1.0, y + 1.0),
            Vertex::new(x, y + 1.0),
            Vertex::new(x, y),
        ]));
        project_shape_in_place(grid_projection, out_projection, &mut shape)?;
        Ok(shape)
    }
}
