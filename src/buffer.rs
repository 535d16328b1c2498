// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The shared output buffer.
//!
//! Workers write into one flat arena, indexed by `y * width + x`,
//! through a shared reference.  Each cell is a separate atomic word, so
//! two workers writing different pixels never touch the same memory and
//! no lock is needed.  Two workers writing the *same* pixel is a
//! scheduling bug; debug builds catch it with a per-cell written flag.

use image::RgbaImage;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(debug_assertions)]
use std::sync::atomic::AtomicBool;

use crate::palette::Color;
use crate::planes::Pixel;

/// Anything a scheduler can paint into.  Implementations must accept
/// concurrent `set` calls for distinct pixels.
pub trait Canvas: Sync {
    /// Number of columns.
    fn width(&self) -> usize;

    /// Number of rows.
    fn height(&self) -> usize;

    /// Stores `color` at `pixel`.  Callers guarantee each pixel is set
    /// at most once per render and lies inside the grid.
    fn set(&self, pixel: Pixel, color: Color);
}

/// A width x height grid of colours, written once per cell by the
/// schedulers and read only after they finish.
pub struct PixelBuffer {
    width: usize,
    height: usize,
    cells: Vec<AtomicU32>,
    #[cfg(debug_assertions)]
    written: Vec<AtomicBool>,
}

impl PixelBuffer {
    /// A buffer with every cell set to `background`.
    pub fn new(width: usize, height: usize, background: Color) -> Self {
        let len = width * height;
        let word = background.pack();
        PixelBuffer {
            width,
            height,
            cells: (0..len).map(|_| AtomicU32::new(word)).collect(),
            #[cfg(debug_assertions)]
            written: (0..len).map(|_| AtomicBool::new(false)).collect(),
        }
    }

    #[inline]
    fn offset(&self, pixel: Pixel) -> usize {
        debug_assert!(
            pixel.0 < self.width && pixel.1 < self.height,
            "pixel {:?} outside {}x{}",
            pixel,
            self.width,
            self.height
        );
        pixel.1 * self.width + pixel.0
    }

    /// The colour currently stored at `pixel`.
    pub fn get(&self, pixel: Pixel) -> Color {
        Color::unpack(self.cells[self.offset(pixel)].load(Ordering::Relaxed))
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// True for a zero-sized buffer.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// The cells as RGBA bytes in row-major order.
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.cells.len() * 4);
        for cell in &self.cells {
            bytes.extend_from_slice(&cell.load(Ordering::Relaxed).to_be_bytes());
        }
        bytes
    }

    /// Hands the buffer to the `image` crate.
    pub fn to_raster(&self) -> RgbaImage {
        let mut raster = RgbaImage::new(self.width as u32, self.height as u32);
        for (x, y, px) in raster.enumerate_pixels_mut() {
            let c = self.get(Pixel(x as usize, y as usize));
            px.0 = [c.r, c.g, c.b, c.a];
        }
        raster
    }
}

impl Canvas for PixelBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn set(&self, pixel: Pixel, color: Color) {
        let offset = self.offset(pixel);
        #[cfg(debug_assertions)]
        {
            let again = self.written[offset].swap(true, Ordering::Relaxed);
            assert!(!again, "pixel {:?} written twice", pixel);
        }
        self.cells[offset].store(color.pack(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_background() {
        let buffer = PixelBuffer::new(3, 2, Color::BLACK);
        assert_eq!(buffer.len(), 6);
        assert_eq!(buffer.get(Pixel(2, 1)), Color::BLACK);
        assert_eq!(
            buffer.to_rgba_bytes(),
            [0, 0, 0, 255].iter().cycle().take(24).cloned().collect::<Vec<u8>>()
        );
    }

    #[test]
    fn set_is_row_major() {
        let buffer = PixelBuffer::new(3, 2, Color::BLACK);
        buffer.set(Pixel(1, 1), Color::opaque(9, 8, 7));
        assert_eq!(buffer.get(Pixel(1, 1)), Color::opaque(9, 8, 7));
        assert_eq!(&buffer.to_rgba_bytes()[16..20], &[9, 8, 7, 255]);
        let raster = buffer.to_raster();
        assert_eq!(raster.dimensions(), (3, 2));
        assert_eq!(raster.get_pixel(1, 1).0, [9, 8, 7, 255]);
        assert_eq!(raster.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn disjoint_writes_from_many_threads() {
        let buffer = PixelBuffer::new(64, 8, Color::BLACK);
        crossbeam::scope(|spawner| {
            for row in 0..8 {
                let buffer = &buffer;
                spawner.spawn(move |_| {
                    for x in 0..64 {
                        buffer.set(Pixel(x, row), Color::opaque(x as u8, row as u8, 0));
                    }
                });
            }
        })
        .unwrap();
        assert_eq!(buffer.get(Pixel(63, 7)), Color::opaque(63, 7, 0));
        assert_eq!(buffer.get(Pixel(0, 3)), Color::opaque(0, 3, 0));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "written twice")]
    fn second_write_panics_in_debug() {
        let buffer = PixelBuffer::new(2, 2, Color::BLACK);
        buffer.set(Pixel(0, 0), Color::BLACK);
        buffer.set(Pixel(0, 0), Color::BLACK);
    }
}
