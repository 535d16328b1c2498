// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The static grid strategy.  The image is cut into a fixed set of
//! rectangles, `parallelism` across and `parallelism` down, and each
//! rectangle is one task, computed start to finish by whichever of at
//! most `parallelism` scoped threads takes it off the tile queue.
//! Nothing is shared between tiles except the canvas, and no two tiles
//! overlap, so the threads never coordinate.

use crossbeam::channel;
use itertools::iproduct;
use log::{debug, trace};

use crate::buffer::Canvas;
use crate::error::Error;
use crate::latch::Latch;
use crate::planes::Pixel;
use crate::render::Frame;
use crate::scheduler::{Report, Scheduler};

/// A half-open rectangle of pixels: `[x_start, x_end) x [y_start, y_end)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tile {
    /// First column.
    pub x_start: usize,
    /// First row.
    pub y_start: usize,
    /// One past the last column.
    pub x_end: usize,
    /// One past the last row.
    pub y_end: usize,
}

impl Tile {
    /// Number of pixels inside.
    pub fn len(&self) -> usize {
        (self.x_end - self.x_start) * (self.y_end - self.y_start)
    }

    /// True when the tile covers nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every pixel of the tile, row by row.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> {
        iproduct!(self.y_start..self.y_end, self.x_start..self.x_end).map(|(y, x)| Pixel(x, y))
    }
}

/// Splits a width x height grid into tiles of `width / parallelism` by
/// `height / parallelism` pixels.  The last column and the last row of
/// tiles are stretched to the edge of the grid, so the remainder of the
/// integer division is never dropped.  An axis shorter than
/// `parallelism` gets one tile per pixel.
pub fn partition(width: usize, height: usize, parallelism: usize) -> Vec<Tile> {
    let parallelism = parallelism.max(1);
    let across = parallelism.min(width).max(1);
    let down = parallelism.min(height).max(1);
    let (tile_w, tile_h) = (width / across, height / down);

    iproduct!(0..down, 0..across)
        .map(|(row, column)| {
            let x_start = column * tile_w;
            let y_start = row * tile_h;
            Tile {
                x_start,
                y_start,
                x_end: if column + 1 == across { width } else { x_start + tile_w },
                y_end: if row + 1 == down { height } else { y_start + tile_h },
            }
        })
        .collect()
}

/// Runs the tiles on a fixed set of threads.
#[derive(Copy, Clone, Debug)]
pub struct GridScheduler {
    parallelism: usize,
}

impl GridScheduler {
    /// Tiles the image `parallelism` ways along each axis.
    pub fn new(parallelism: usize) -> Self {
        GridScheduler {
            parallelism: parallelism.max(1),
        }
    }
}

impl Scheduler for GridScheduler {
    fn run<C: Canvas>(&self, frame: &Frame, canvas: &C) -> Result<Report, Error> {
        let tiles = partition(canvas.width(), canvas.height(), self.parallelism);
        debug!(
            "grid: {} tiles over {}x{} on {} threads",
            tiles.len(),
            canvas.width(),
            canvas.height(),
            self.parallelism.min(tiles.len())
        );

        let workers = self.parallelism.min(tiles.len()).max(1);
        let (queue, pending) = channel::unbounded::<Tile>();
        let latch = Latch::new(0);
        for tile in &tiles {
            latch.add(1);
            if queue.send(*tile).is_err() {
                return Err(Error::WorkerPanicked("tile"));
            }
        }
        drop(queue);

        let outcome = crossbeam::scope(|spawner| {
            for _ in 0..workers {
                let pending = pending.clone();
                let latch = &latch;
                spawner.spawn(move |_| {
                    let _watch = latch.watch();
                    for tile in pending.iter() {
                        trace!("tile {:?}", tile);
                        for pixel in tile.pixels() {
                            canvas.set(pixel, frame.color_at(pixel));
                        }
                        latch.count_down();
                    }
                });
            }
            latch.wait()
        });

        match outcome {
            Ok(Ok(())) => Ok(Report {
                units: tiles.len(),
                peak_backlog: 0,
            }),
            _ => Err(Error::WorkerPanicked("tile")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn covered(width: usize, height: usize, tiles: &[Tile]) -> Vec<usize> {
        let mut hits = vec![0; width * height];
        for tile in tiles {
            for Pixel(x, y) in tile.pixels() {
                hits[y * width + x] += 1;
            }
        }
        hits
    }

    #[test]
    fn single_worker_gets_one_tile() {
        assert_eq!(
            partition(10, 7, 1),
            vec![Tile {
                x_start: 0,
                y_start: 0,
                x_end: 10,
                y_end: 7
            }]
        );
    }

    #[test]
    fn remainder_goes_to_the_last_tiles() {
        let tiles = partition(10, 7, 3);
        assert_eq!(tiles.len(), 9);
        assert_eq!(tiles[2].x_end, 10);
        assert_eq!(tiles[2].x_start, 6);
        assert_eq!(tiles[8].y_start, 4);
        assert_eq!(tiles[8].y_end, 7);
        assert!(covered(10, 7, &tiles).iter().all(|&n| n == 1));
    }

    #[test]
    fn thin_images_do_not_produce_empty_tiles() {
        let tiles = partition(3, 1, 8);
        assert_eq!(tiles.len(), 3);
        assert!(tiles.iter().all(|t| !t.is_empty()));
        assert!(covered(3, 1, &tiles).iter().all(|&n| n == 1));
    }

    #[test]
    fn tile_pixels_are_row_major() {
        let tile = Tile {
            x_start: 1,
            y_start: 2,
            x_end: 3,
            y_end: 4,
        };
        let pixels: Vec<Pixel> = tile.pixels().collect();
        assert_eq!(
            pixels,
            vec![Pixel(1, 2), Pixel(2, 2), Pixel(1, 3), Pixel(2, 3)]
        );
        assert_eq!(tile.len(), 4);
    }
}
