// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Render settings.  The defaults reproduce the classic 750 pixel wide
//! view of the whole set.

use crate::error::Error;
use crate::escape::DEFAULT_MAX_ITERATIONS;
use crate::palette::Palette;
use crate::planes::ComplexPlane;
use crate::pool::DEFAULT_QUEUE_CAPACITY;
use crate::scheduler::Strategy;

/// The default output width.
pub const DEFAULT_WIDTH: usize = 750;

/// Everything a render depends on.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RenderConfig {
    /// Iteration cap of the escape test.
    pub max_iterations: usize,
    /// Region of the complex plane to draw.
    pub plane: ComplexPlane,
    /// Output width; the height follows from the plane's aspect ratio.
    pub pixel_width: usize,
    /// Channel weights applied to each escape score.
    pub palette: Palette,
    /// Worker count: tiles per axis for the grid, writers for the pool.
    pub parallelism: usize,
    /// Bound on queued tasks.  Only the pool reads it.
    pub queue_capacity: usize,
    /// Which scheduler fills the buffer.
    pub strategy: Strategy,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            plane: ComplexPlane::default(),
            pixel_width: DEFAULT_WIDTH,
            palette: Palette::default(),
            parallelism: num_cpus::get(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            strategy: Strategy::default(),
        }
    }
}

impl RenderConfig {
    /// Rejects settings that cannot produce an image.  Plane geometry is
    /// checked when the frame is built.
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_iterations == 0 {
            return Err(Error::Config("the iteration cap must be at least 1".to_string()));
        }
        if self.parallelism == 0 {
            return Err(Error::Config("parallelism must be at least 1".to_string()));
        }
        if self.queue_capacity == 0 {
            return Err(Error::Config("the queue capacity must be at least 1".to_string()));
        }
        if !self.palette.is_valid() {
            return Err(Error::Config(format!(
                "channel weights must be finite and non-negative, not {:?}",
                self.palette
            )));
        }
        Ok(())
    }
}
