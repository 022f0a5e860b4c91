use std::path::Path;

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_circle_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use snafu::ResultExt;
use tracing::*;

use crate::{
    analysis::{bbox::Rectangle, grid::Grid, labels::Label},
    config::RenderConfig,
    consts::*,
    error::*,
};

/// How bounding boxes are drawn.
#[derive(Debug, Clone, Copy)]
pub struct DrawOptions {
    /// Outline thickness in pixels, growing outwards.
    pub thickness: u32,
    /// Draw a marker at the center of every box.
    pub draw_midpoint: bool,
}

impl Default for DrawOptions {
    fn default() -> Self {
        Self {
            thickness: BOUNDING_BOX_THICKNESS,
            draw_midpoint: true,
        }
    }
}

impl From<&RenderConfig> for DrawOptions {
    fn from(config: &RenderConfig) -> Self {
        Self {
            thickness: config.thickness,
            draw_midpoint: config.draw_midpoint,
        }
    }
}

/// Draws every rectangle with the default bounding box color.
pub fn draw_bboxes(image: &mut RgbImage, rects: &[Rectangle], options: &DrawOptions) {
    debug!("Drawing {} bounding boxes", rects.len());

    for rect in rects {
        draw_rect(image, rect, Rgb(BOUNDING_BOX_COLOR), options);
    }
}

/// Draws annotated rectangles, colored by their VOC label.
///
/// Names that are not VOC classes use the default bounding box color.
pub fn draw_labeled_bboxes(
    image: &mut RgbImage,
    rects: &[(String, Rectangle)],
    options: &DrawOptions,
) {
    debug!("Drawing {} labeled bounding boxes", rects.len());

    for (name, rect) in rects {
        let color = name
            .parse::<Label>()
            .map(|label| label.color())
            .unwrap_or(BOUNDING_BOX_COLOR);
        draw_rect(image, rect, Rgb(color), options);
    }
}

fn draw_rect(image: &mut RgbImage, rect: &Rectangle, color: Rgb<u8>, options: &DrawOptions) {
    let (image_width, image_height) = image.dimensions();
    // Anything past the margin is off the image for every outline and marker
    let margin = options.thickness as f64 + MIDPOINT_SIZE as f64 + 1.0;
    let clamp_x = |v: f64| v.clamp(-margin, image_width as f64 + margin) as i32;
    let clamp_y = |v: f64| v.clamp(-margin, image_height as f64 + margin) as i32;

    let top_left = rect.top_left_pixel();
    let bottom_right = rect.bottom_right_pixel();
    let (x0, y0) = (clamp_x(top_left.x), clamp_y(top_left.y));
    let (x1, y1) = (clamp_x(bottom_right.x), clamp_y(bottom_right.y));

    // Snapped corners cross over for boxes thinner than a pixel
    if x1 >= x0 && y1 >= y0 {
        // Both corners are inclusive
        let width = (x1 - x0 + 1) as u32;
        let height = (y1 - y0 + 1) as u32;

        for offset in 0..options.thickness {
            let grow = offset as i32;
            let outline = Rect::at(x0 - grow, y0 - grow)
                .of_size(width + offset * 2, height + offset * 2);
            draw_hollow_rect_mut(image, outline, color);
        }
    }

    if options.draw_midpoint {
        let center = rect.center();
        draw_hollow_circle_mut(
            image,
            (clamp_x(center.x), clamp_y(center.y)),
            MIDPOINT_SIZE,
            Rgb(MIDPOINT_COLOR),
        );
    }
}

/// Draws the cell boundaries of `grid` as one-pixel lines.
///
/// Only the lines are drawn. Callers wanting the cell boxes as well can pass
/// [`crate::analysis::grid::GridCell::bbox_list`] to [`draw_bboxes`].
pub fn draw_grid(image: &mut RgbImage, grid: &Grid, color: [u8; 3]) {
    let (width, height) = image.dimensions();
    let color = Rgb(color);

    let (grid_width, grid_height) = grid.image_size();
    if (grid_width, grid_height) != (width, height) {
        warn!(
            "Grid built for {}x{} drawn on a {}x{} image",
            grid_width, grid_height, width, height
        );
    }

    let cols = grid.cols() as usize;
    for cell in grid.cells().iter().take(cols) {
        if cell.x < width {
            for y in 0..height {
                image.put_pixel(cell.x, y, color);
            }
        }
    }
    for cell in grid.cells().iter().step_by(cols) {
        if cell.y < height {
            for x in 0..width {
                image.put_pixel(x, cell.y, color);
            }
        }
    }
}

pub fn open_image<P: AsRef<Path>>(path: P) -> Result<RgbImage, YoloError> {
    let path = path.as_ref();
    info!("Opening image {}", path.display());

    let image = image::open(path).context(ImageOpenSnafu {
        path: path.to_string_lossy(),
    })?;
    Ok(image.to_rgb8())
}

pub fn save_image<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<(), YoloError> {
    let path = path.as_ref();
    image.save(path).context(ImageWriteSnafu {
        path: path.to_string_lossy(),
    })?;

    info!("Saved image to {}", path.display());
    Ok(())
}

/// Packs a color as `0xAABBGGRR`, each channel taken modulo 256.
pub fn rgba_int(r: u32, g: u32, b: u32, a: u32) -> u32 {
    ((a % 256) << 24) | ((b % 256) << 16) | ((g % 256) << 8) | (r % 256)
}
