//! Tiny overview plotters shared by the `plot_allocations`, `plot_publishers`,
//! and `plot_agencies` binaries.
//!
//! Unlike the tile generator in [`crate::tiles`], which rasterizes one
//! `BLOCK_SIZE`-square prefix block at a time, these work over the whole
//! addressable ISBN space at once, at resolutions low enough to fit in a
//! handful of small preview images.

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::Result;
use crate::isbn::{get_pos_str, HEIGHT, WIDTH};

/// Six preview images, one per ISBN digit length from 4 through 9,
/// indexed by `length - 4`.
pub struct PlotSet {
    images: [GrayImage; 6],
}

/// `(width, height)` of the preview image that holds ISBN strings of
/// `length` digits (4..=9), mirroring the source tool's
/// `WIDTH // 10**((i+2)//2), HEIGHT // 10**((i+1)//2)` sizing with `i`
/// counted down from 5 as `length` counts up from 4.
fn plot_dims(length: usize) -> (u32, u32) {
    let i = 9 - length as u32;
    let w = WIDTH / 10u32.pow((i + 2) / 2);
    let h = HEIGHT / 10u32.pow((i + 1) / 2);
    (w, h)
}

/// Maps an ISBN prefix string of any digit length (4 through 10) to its
/// pixel coordinate in the preview image sized for that length, by
/// dividing its full-resolution [`get_pos_str`] position by the
/// coordinates of a same-length probe string representing one grid cell.
pub fn get_plot_pos(isbn: &str) -> (u32, u32) {
    let (x, y) = get_pos_str(isbn);
    let probe = format!("00{}11", "0".repeat(isbn.len().saturating_sub(4)));
    let (w, h) = get_pos_str(&probe);
    ((x / w.max(1)) as u32, (y / h.max(1)) as u32)
}

impl PlotSet {
    /// Allocates one blank image per digit length 4..=9.
    pub fn new() -> Self {
        let images = std::array::from_fn(|length_minus_4| {
            let (w, h) = plot_dims(length_minus_4 + 4);
            GrayImage::new(w, h)
        });
        Self { images }
    }

    /// Sets the pixel for `isbn` (whose digit length selects the image)
    /// via [`get_plot_pos`].
    pub fn set(&mut self, isbn: &str) {
        let (x, y) = get_plot_pos(isbn);
        let image = &mut self.images[isbn.len() - 4];
        if x < image.width() && y < image.height() {
            image.put_pixel(x, y, Luma([255]));
        }
    }

    /// Sets a single pixel directly in the image for `length`-digit
    /// ISBNs, given an already-computed plot-space coordinate. Used by
    /// `plot_allocations`, which walks whole numeric ranges rather than
    /// individual ISBN strings.
    pub fn set_at(&mut self, length: usize, x: u32, y: u32) {
        let image = &mut self.images[length - 4];
        if x < image.width() && y < image.height() {
            image.put_pixel(x, y, Luma([255]));
        }
    }

    /// Writes each of the six images to `out_dir`, named `{i}.png` for
    /// even `i` and `{i}r.png` for odd `i`, rotating odd-indexed images
    /// 90 degrees first so every file is stored in landscape orientation
    /// (better PNG compression for the tall, narrow small-length images).
    pub fn save(&self, out_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(out_dir)?;
        for (i, image) in self.images.iter().enumerate() {
            let rotated = i % 2 == 1;
            let path = out_dir.join(format!("{i}{}.png", if rotated { "r" } else { "" }));
            if rotated {
                image::imageops::rotate90(image).save(path)?;
            } else {
                image.save(path)?;
            }
        }
        Ok(())
    }
}

impl Default for PlotSet {
    fn default() -> Self {
        Self::new()
    }
}
