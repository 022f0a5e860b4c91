use serde::Serialize;
use snafu::ensure;

use super::{bbox::Rectangle, point::Point};
use crate::error::{InvalidGridSpecificationSnafu, YoloError};

/// One tile of a grid laid over an image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GridCell {
    /// Left edge of the cell, in pixels.
    pub x: u32,
    /// Top edge of the cell, in pixels.
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub row_index: usize,
    pub col_index: usize,
}

impl GridCell {
    /// Number of pixels covered by the cell.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Top-left corner of the cell.
    pub fn origin(&self) -> Point {
        Point::new(self.x as f64, self.y as f64)
    }

    /// Bounding boxes associated with the cell.
    ///
    /// Currently a single fully confident rectangle covering the pixel
    /// region of the cell.
    pub fn bbox_list(&self) -> Vec<Rectangle> {
        let origin = self.origin();
        let far = origin + Point::new(self.width as f64, self.height as f64);

        vec![Rectangle::from_corners(origin, far)]
    }
}

/// A `rows x cols` partition of an image.
///
/// Every cell is `image_width / cols` by `image_height / rows` pixels. The
/// remainder of both divisions goes to the last column and the last row, so
/// the cells cover the image exactly once.
#[derive(Clone, Debug, Serialize)]
pub struct Grid {
    image_width: u32,
    image_height: u32,
    cols: u32,
    rows: u32,
    /// Row-major.
    cells: Vec<GridCell>,
}

impl Grid {
    /// Partitions an `image_width x image_height` image into `cols x rows`
    /// cells.
    ///
    /// # Arguments
    /// * `image_width` - Image width in pixels
    /// * `image_height` - Image height in pixels
    /// * `cols` - Number of columns
    /// * `rows` - Number of rows
    ///
    /// # Errors
    /// `InvalidGridSpecification` when any argument is zero.
    ///
    /// # Example
    /// ```
    /// use yolo_core::analysis::grid::Grid;
    /// let grid = Grid::generate(450, 513, 7, 8).unwrap();
    /// assert_eq!(grid.dims(), (7, 8));
    /// assert_eq!(grid.covered_pixels(), 450 * 513);
    /// ```
    pub fn generate(
        image_width: u32,
        image_height: u32,
        cols: u32,
        rows: u32,
    ) -> Result<Self, YoloError> {
        ensure!(
            image_width > 0 && image_height > 0 && cols > 0 && rows > 0,
            InvalidGridSpecificationSnafu {
                image_width,
                image_height,
                cols,
                rows
            }
        );

        let delta_w = image_width / cols;
        let delta_h = image_height / rows;
        let extra_w = image_width % cols;
        let extra_h = image_height % rows;

        let mut cells = Vec::with_capacity(cols as usize * rows as usize);
        for row in 0..rows {
            for col in 0..cols {
                let width = if col == cols - 1 {
                    delta_w + extra_w
                } else {
                    delta_w
                };
                let height = if row == rows - 1 {
                    delta_h + extra_h
                } else {
                    delta_h
                };

                cells.push(GridCell {
                    x: col * delta_w,
                    y: row * delta_h,
                    width,
                    height,
                    row_index: row as usize,
                    col_index: col as usize,
                });
            }
        }

        Ok(Self {
            image_width,
            image_height,
            cols,
            rows,
            cells,
        })
    }

    /// Number of columns.
    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Number of rows.
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// `(cols, rows)`, the order the grid was requested in.
    pub fn dims(&self) -> (u32, u32) {
        (self.cols, self.rows)
    }

    /// `(width, height)` of the image the grid was generated for.
    pub fn image_size(&self) -> (u32, u32) {
        (self.image_width, self.image_height)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Iterates cells row by row, left to right.
    pub fn iter(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter()
    }

    /// Cells grouped by row, top to bottom.
    pub fn row_slices(&self) -> impl Iterator<Item = &[GridCell]> {
        self.cells.chunks(self.cols as usize)
    }

    /// Cell at `row`, `col`.
    ///
    /// # Arguments
    /// * `row` - Row index, from the top
    /// * `col` - Column index, from the left
    ///
    /// # Returns
    /// The cell, or `None` when either index is out of range
    pub fn cell(&self, row: usize, col: usize) -> Option<&GridCell> {
        if row >= self.rows as usize || col >= self.cols as usize {
            return None;
        }
        self.cells.get(row * self.cols as usize + col)
    }

    /// Cell owning the pixel under `p`.
    ///
    /// Used to assign an object to the cell holding its center.
    ///
    /// # Returns
    /// The cell, or `None` when `p` is outside the image or not finite
    pub fn locate(&self, p: &Point) -> Option<&GridCell> {
        if !p.x.is_finite() || !p.y.is_finite() || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let (x, y) = (p.x as u32, p.y as u32);
        if x >= self.image_width || y >= self.image_height {
            return None;
        }

        let col = Self::band_index(x, self.image_width / self.cols, self.cols);
        let row = Self::band_index(y, self.image_height / self.rows, self.rows);
        self.cell(row, col)
    }

    fn band_index(pixel: u32, delta: u32, count: u32) -> usize {
        if delta == 0 {
            // Every band but the last is empty
            return count as usize - 1;
        }
        (pixel / delta).min(count - 1) as usize
    }

    /// Left edge of every column after the first, in pixels.
    pub fn col_boundaries(&self) -> Vec<u32> {
        self.cells.iter().take(self.cols as usize).skip(1).map(|c| c.x).collect()
    }

    /// Top edge of every row after the first, in pixels.
    pub fn row_boundaries(&self) -> Vec<u32> {
        self.cells
            .iter()
            .step_by(self.cols as usize)
            .skip(1)
            .map(|c| c.y)
            .collect()
    }

    /// Total number of pixels covered by all cells.
    pub fn covered_pixels(&self) -> u64 {
        self.cells.iter().map(GridCell::area).sum()
    }
}

/// Free-function form of [`Grid::generate`].
pub fn generate_grid(
    image_width: u32,
    image_height: u32,
    cols: u32,
    rows: u32,
) -> Result<Grid, YoloError> {
    Grid::generate(image_width, image_height, cols, rows)
}
