//! Composite rendering for outfits.
//!
//! Member images are laid out on a grid chosen to keep the canvas
//! roughly square, each scaled to fit its cell without stretching,
//! in the order the ids were supplied: left-to-right, top-to-bottom.

use image::{DynamicImage, GenericImage, RgbaImage};

use crate::error::Result;

/// Grid geometry for `count` cells: `columns = ceil(sqrt(count))`
pub fn grid_dimensions(count: usize) -> (u32, u32) {
    debug_assert!(count > 0);
    let columns = (count as f64).sqrt().ceil() as u32;
    let rows = (count as u32).div_ceil(columns);
    (columns, rows)
}

/// Render member images onto one composite canvas.
///
/// Each cell is `cell_size` pixels square with `padding` pixels of
/// uniform padding around it; images keep their aspect ratio and are
/// centred within their cell.
pub fn render_composite(
    images: &[DynamicImage],
    cell_size: u32,
    padding: u32,
) -> Result<RgbaImage> {
    let (columns, rows) = grid_dimensions(images.len());
    let stride = cell_size + 2 * padding;
    let mut canvas = RgbaImage::new(columns * stride, rows * stride);

    for (index, source) in images.iter().enumerate() {
        let col = index as u32 % columns;
        let row = index as u32 / columns;

        // Fit within the cell, never stretch
        let thumb = source.thumbnail(cell_size, cell_size).to_rgba8();
        let x = col * stride + padding + (cell_size - thumb.width()) / 2;
        let y = row * stride + padding + (cell_size - thumb.height()) / 2;
        canvas.copy_from(&thumb, x, y)?;
    }

    Ok(canvas)
}

// -- Tests --

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgba, RgbaImage};

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> DynamicImage {
        let mut img = RgbaImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = Rgba(rgba);
        }
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_grid_dimensions_roughly_square() {
        assert_eq!(grid_dimensions(1), (1, 1));
        assert_eq!(grid_dimensions(2), (2, 1));
        assert_eq!(grid_dimensions(3), (2, 2));
        assert_eq!(grid_dimensions(4), (2, 2));
        assert_eq!(grid_dimensions(5), (3, 2));
        assert_eq!(grid_dimensions(9), (3, 3));
        assert_eq!(grid_dimensions(10), (4, 3));
    }

    #[test]
    fn test_canvas_size_matches_grid() {
        let images = vec![solid(64, 64, [255, 0, 0, 255]); 3];
        let canvas = render_composite(&images, 100, 10).unwrap();
        // 2 columns x 2 rows of (100 + 2*10) cells
        assert_eq!(canvas.width(), 240);
        assert_eq!(canvas.height(), 240);
    }

    #[test]
    fn test_composition_order_left_to_right() {
        let images = vec![
            solid(100, 100, [255, 0, 0, 255]),
            solid(100, 100, [0, 255, 0, 255]),
        ];
        let canvas = render_composite(&images, 100, 0).unwrap();

        // First image fills the left cell, second the right
        assert_eq!(canvas.get_pixel(50, 50), &Rgba([255, 0, 0, 255]));
        assert_eq!(canvas.get_pixel(150, 50), &Rgba([0, 255, 0, 255]));
    }

    #[test]
    fn test_aspect_ratio_preserved() {
        // A wide image must be letterboxed, not stretched: the cell's top
        // rows stay transparent
        let images = vec![solid(200, 50, [0, 0, 255, 255])];
        let canvas = render_composite(&images, 100, 0).unwrap();

        assert_eq!(canvas.get_pixel(50, 2), &Rgba([0, 0, 0, 0]));
        assert_eq!(canvas.get_pixel(50, 50), &Rgba([0, 0, 255, 255]));
    }
}
