// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The streaming pool strategy.
//!
//! A single producer walks the image in row-major order, evaluates
//! every pixel itself and pushes the result onto a bounded channel.
//! A fixed pool of workers drains the channel and writes each result
//! into the canvas.  Only the writes run in parallel; evaluation is
//! serial in the producer.  When the channel is full the producer
//! blocks, so a slow pool never lets the backlog grow past the
//! channel's capacity plus one task per worker.

use crossbeam::channel;
use itertools::iproduct;
use log::debug;

use crate::buffer::Canvas;
use crate::error::Error;
use crate::latch::Latch;
use crate::planes::Pixel;
use crate::render::Frame;
use crate::scheduler::{Report, Scheduler};

/// The default bound on queued tasks.
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// One evaluated pixel on its way to the canvas.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Task {
    /// Where it goes.
    pub pixel: Pixel,
    /// Its escape score.
    pub score: f64,
}

/// A producer thread feeding `parallelism` writer threads through a
/// channel holding at most `capacity` tasks.
#[derive(Copy, Clone, Debug)]
pub struct PoolScheduler {
    parallelism: usize,
    capacity: usize,
}

impl PoolScheduler {
    /// Both values are raised to at least one.
    pub fn new(parallelism: usize, capacity: usize) -> Self {
        PoolScheduler {
            parallelism: parallelism.max(1),
            capacity: capacity.max(1),
        }
    }
}

impl Scheduler for PoolScheduler {
    fn run<C: Canvas>(&self, frame: &Frame, canvas: &C) -> Result<Report, Error> {
        let (width, height) = (canvas.width(), canvas.height());
        let total = width * height;
        debug!(
            "pool: {} workers, queue of {}, {} tasks",
            self.parallelism, self.capacity, total
        );

        // Armed with the full count before anything is produced.
        let latch = Latch::new(total);
        let outcome = crossbeam::scope(|spawner| {
            let (tasks, queue) = channel::bounded::<Task>(self.capacity);

            for _ in 0..self.parallelism {
                let queue = queue.clone();
                let latch = &latch;
                spawner.spawn(move |_| {
                    let _watch = latch.watch();
                    for task in queue.iter() {
                        canvas.set(task.pixel, frame.palette.colorize(task.score));
                        latch.count_down();
                    }
                });
            }
            drop(queue);

            let latch = &latch;
            let sample_every = self.capacity;
            let producer = spawner.spawn(move |_| {
                let _watch = latch.watch();
                let mut produced = 0;
                let mut peak_backlog = 0;
                for (y, x) in iproduct!(0..height, 0..width) {
                    let pixel = Pixel(x, y);
                    let score = frame.score(pixel);
                    if tasks.send(Task { pixel, score }).is_err() {
                        // Every worker is gone; the latch is already poisoned.
                        break;
                    }
                    produced += 1;
                    // Sampled once per queue's worth of sends so the
                    // producer does not contend with every count_down.
                    if produced % sample_every == 0 {
                        let acknowledged = total - latch.remaining();
                        peak_backlog = peak_backlog.max(produced - acknowledged.min(produced));
                    }
                }
                peak_backlog
            });

            latch.wait().ok()?;
            producer.join().ok()
        });

        match outcome {
            Ok(Some(peak_backlog)) => {
                debug!("pool: peak backlog {}", peak_backlog);
                Ok(Report {
                    units: total,
                    peak_backlog,
                })
            }
            _ => Err(Error::WorkerPanicked("pool")),
        }
    }
}
