//! Multi-scale PNG tile rasterization over a prefix's coverage bitmap or
//! attribute tensor channel.

pub mod attributes;
pub mod coverage;

use std::path::Path;

use image::{GrayImage, Luma};

use crate::error::Result;
use crate::isbn::BLOCK_SIZE;

/// `(divisions, downsample factor)` pairs shared by both the coverage
/// bitmap pyramid and the attribute tensor pyramid.
pub const ATTRIBUTE_SCALES: &[(u32, u32)] = &[(1, 50), (2, 25), (5, 10), (10, 5), (20, 2), (50, 1)];

/// The coverage-bitmap-only pyramid additionally carries a `(20, 1)`
/// full-resolution scale in place of attributes' `(20, 2)`.
pub const COVERAGE_SCALES: &[(u32, u32)] = &[(1, 50), (2, 25), (5, 10), (10, 5), (20, 1)];

/// A single-channel plane of `BLOCK_SIZE x BLOCK_SIZE` pixel values to be
/// tiled, abstracting over a coverage bitmap (0/255) and one channel of an
/// attribute tensor (arbitrary byte value).
pub trait Plane {
    fn get(&self, col: u32, row: u32) -> u8;

    /// Whether `factor >= 16` downsamples of this plane should go through
    /// the isolated-pixel float remap. Only coverage bitmaps (binary 0/255
    /// data) need it; attribute tensor channels carry meaningful byte
    /// values that the remap would distort, so they opt out.
    fn remap_large_factors(&self) -> bool {
        false
    }
}

/// Block-max downsamples one `size x size` tile at `(x0, y0)` in `plane`
/// by `factor`, combining `factor x factor` source pixels per output
/// pixel with a max reduction, then applies the low-pixel-count float
/// remap for `factor >= 16` so isolated single pixels survive
/// quantization.
pub fn downsample_tile(plane: &dyn Plane, x0: u32, y0: u32, size: u32, factor: u32) -> Vec<u8> {
    let out_side = size / factor;
    let remap = plane.remap_large_factors();
    let mut out = vec![0u8; (out_side * out_side) as usize];
    for oy in 0..out_side {
        for ox in 0..out_side {
            let mut max_val = 0u8;
            for dy in 0..factor {
                for dx in 0..factor {
                    let v = plane.get(x0 + ox * factor + dx, y0 + oy * factor + dy);
                    max_val = max_val.max(v);
                }
            }
            out[(oy * out_side + ox) as usize] = if remap {
                remap_for_factor(max_val, factor)
            } else {
                max_val
            };
        }
    }
    out
}

/// For `factor >= 16`, a block-max over that many source pixels can still
/// collapse a single surviving pixel down toward zero once later blended;
/// remapping `v` through `((v/255 - k)/(1-k))*254 + 1` with `k = 1/factor^2`
/// keeps a lone hit visible after downstream compositing.
fn remap_for_factor(v: u8, factor: u32) -> u8 {
    if factor < 16 || v == 0 {
        return v;
    }
    let k = 1.0 / (factor as f64 * factor as f64);
    let normalized = v as f64 / 255.0;
    let remapped = ((normalized - k) / (1.0 - k)) * 254.0 + 1.0;
    remapped.round().clamp(0.0, 255.0) as u8
}

/// Returns `true` if any pixel in `data` is non-zero.
pub fn has_any_pixel(data: &[u8]) -> bool {
    data.iter().any(|&v| v != 0)
}

/// Writes one tile's pixel data (row-major, `side x side`) as a grayscale
/// PNG.
pub fn write_tile_png(path: &Path, data: &[u8], side: u32) -> Result<()> {
    let mut img = GrayImage::new(side, side);
    for (i, &v) in data.iter().enumerate() {
        let x = (i as u32) % side;
        let y = (i as u32) / side;
        img.put_pixel(x, y, Luma([v]));
    }
    img.save(path)?;
    Ok(())
}

/// Walks every `(divisions, factor)` scale, tiling `plane` (assumed
/// `BLOCK_SIZE x BLOCK_SIZE`) into `divisions x divisions` tiles, skipping
/// any tile with no non-zero pixel, and writing survivors as
/// `{out_dir}/{divisions}_{prefix:02}_{row}_{col}.png` (row before column,
/// matching the original's `i`/`j` tile index order).
pub fn generate_pyramid(
    prefix: u32,
    plane: &dyn Plane,
    scales: &[(u32, u32)],
    out_dir: &Path,
) -> Result<usize> {
    std::fs::create_dir_all(out_dir)?;
    let mut written = 0;
    for &(divisions, factor) in scales {
        let tile_size = BLOCK_SIZE / divisions;
        for row in 0..divisions {
            for col in 0..divisions {
                let data = downsample_tile(plane, col * tile_size, row * tile_size, tile_size, factor);
                if !has_any_pixel(&data) {
                    continue;
                }
                let path = out_dir.join(format!("{divisions}_{prefix:02}_{row}_{col}.png"));
                write_tile_png(&path, &data, tile_size / factor)?;
                written += 1;
            }
        }
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ConstPlane(u8);
    impl Plane for ConstPlane {
        fn get(&self, _col: u32, _row: u32) -> u8 {
            self.0
        }
    }

    struct RemappingConstPlane(u8);
    impl Plane for RemappingConstPlane {
        fn get(&self, _col: u32, _row: u32) -> u8 {
            self.0
        }
        fn remap_large_factors(&self) -> bool {
            true
        }
    }

    #[test]
    fn downsample_of_all_zero_plane_is_all_zero() {
        let plane = ConstPlane(0);
        let out = downsample_tile(&plane, 0, 0, 100, 10);
        assert!(!has_any_pixel(&out));
    }

    #[test]
    fn attribute_planes_skip_the_float_remap_even_at_large_factors() {
        // A plane that opts out of remapping (the default) keeps its exact
        // byte value through a >=16 factor block-max, unlike a bitmap.
        let plane = ConstPlane(6);
        let out = downsample_tile(&plane, 0, 0, 100, 50);
        assert_eq!(out, vec![6]);
    }

    #[test]
    fn bitmap_style_planes_remap_isolated_pixels_at_large_factors() {
        let plane = RemappingConstPlane(255);
        let out = downsample_tile(&plane, 0, 0, 100, 50);
        assert_eq!(out, vec![remap_for_factor(255, 50)]);
    }

    #[test]
    fn remap_preserves_zero_and_leaves_small_factors_untouched() {
        assert_eq!(remap_for_factor(0, 50), 0);
        assert_eq!(remap_for_factor(200, 2), 200);
    }

    #[test]
    fn remap_lifts_small_values_for_large_factors() {
        let remapped = remap_for_factor(1, 50);
        assert!(remapped >= 1);
    }
}
