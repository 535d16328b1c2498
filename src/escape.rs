// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time function.  Everything here is pure: an Evaluator
//! holds nothing but its iteration cap and may be shared by any number
//! of threads.

use num::Complex;

/// The iteration cap used when none is configured.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Maps a point of the complex plane to an escape score in [0, 1].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Evaluator {
    max_iterations: usize,
}

impl Evaluator {
    /// An evaluator that gives up after `max_iterations`.  A cap of zero
    /// is treated as one.
    pub fn new(max_iterations: usize) -> Self {
        Evaluator {
            max_iterations: max_iterations.max(1),
        }
    }

    /// The iteration cap.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// This is our classic iterator function, which either returns the
    /// iteration at which z = z^2 + c left the radius-2 disc, counting
    /// from 1, or returns nothing at all if the orbit stayed bounded
    /// for the whole cap.
    pub fn escape_time(&self, c: Complex<f64>) -> Option<usize> {
        let mut z: Complex<f64> = Complex { re: 0.0, im: 0.0 };
        for i in 1..=self.max_iterations {
            z = z * z + c;
            if z.norm_sqr() >= 4.0 {
                return Some(i);
            }
        }
        None
    }

    /// `(M - iterations) / M`: 0 for bounded orbits, close to 1 for
    /// points that leave at once.
    pub fn evaluate(&self, c: Complex<f64>) -> f64 {
        match self.escape_time(c) {
            None => 0.0,
            Some(i) => (self.max_iterations - i) as f64 / self.max_iterations as f64,
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Evaluator::new(DEFAULT_MAX_ITERATIONS)
    }
}
