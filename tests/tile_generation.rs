//! End-to-end tile generation scenario: a single non-zero attribute pixel
//! must survive into exactly one tile at the full-resolution scale, with
//! every other tile skipped as empty.

use allisbns::tiles::{generate_pyramid, Plane};

struct SinglePixelPlane {
    col: u32,
    row: u32,
    value: u8,
}

impl Plane for SinglePixelPlane {
    fn get(&self, col: u32, row: u32) -> u8 {
        if col == self.col && row == self.row {
            self.value
        } else {
            0
        }
    }
}

#[test]
fn single_nonzero_pixel_lands_in_exactly_one_tile() {
    let dir = std::env::temp_dir().join(format!(
        "allisbns-tile-scenario-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);

    let plane = SinglePixelPlane {
        col: 3,
        row: 7,
        value: 6,
    };
    let written = generate_pyramid(0, &plane, &[(50, 1)], &dir).unwrap();

    assert_eq!(written, 1);
    let path = dir.join("50_00_0_0.png");
    assert!(path.exists());

    let image = image::open(&path).unwrap().into_luma8();
    assert_eq!(image.get_pixel(3, 7).0[0], 6);
    let nonzero = image.pixels().filter(|p| p.0[0] != 0).count();
    assert_eq!(nonzero, 1);

    let entries: Vec<_> = std::fs::read_dir(&dir).unwrap().collect();
    assert_eq!(entries.len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}
