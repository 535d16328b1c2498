// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The seam between the renderer and the two ways of spreading a frame
//! across threads.  Whichever strategy runs, `run` returns only after
//! every pixel of the canvas has been set exactly once.

use std::fmt;
use std::str::FromStr;

use crate::buffer::Canvas;
use crate::error::Error;
use crate::grid::GridScheduler;
use crate::pool::PoolScheduler;
use crate::render::Frame;

/// What a finished run looked like.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Tiles launched, or tasks queued.
    pub units: usize,
    /// Largest number of tasks produced but not yet acknowledged, as
    /// sampled by the producer once every queue capacity's worth of sends.
    /// Always zero for the grid strategy, which has no queue.
    pub peak_backlog: usize,
}

/// Paints a whole frame into a canvas and blocks until it is done.
pub trait Scheduler {
    /// Computes every pixel of `canvas` from `frame`.
    fn run<C: Canvas>(&self, frame: &Frame, canvas: &C) -> Result<Report, Error>;
}

/// Selects a scheduler by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// One task per rectangular tile; evaluation runs in parallel.
    Grid,
    /// One producer evaluating every pixel, a pool of writers.
    Pool,
}

impl Strategy {
    /// Every strategy, in the order the command line lists them.
    pub const ALL: [Strategy; 2] = [Strategy::Grid, Strategy::Pool];

    /// The name used on the command line and in file names.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Grid => "grid",
            Strategy::Pool => "pool",
        }
    }
}

impl Default for Strategy {
    fn default() -> Self {
        Strategy::Grid
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .iter()
            .cloned()
            .find(|strategy| strategy.name() == s)
            .ok_or_else(|| Error::Config(format!("unknown strategy {:?}", s)))
    }
}

/// A configured scheduler of either kind.
#[derive(Copy, Clone, Debug)]
pub enum Schedule {
    /// See `GridScheduler`.
    Grid(GridScheduler),
    /// See `PoolScheduler`.
    Pool(PoolScheduler),
}

impl Schedule {
    /// Builds the scheduler a strategy names.  `queue_capacity` is only
    /// read by the pool.
    pub fn new(strategy: Strategy, parallelism: usize, queue_capacity: usize) -> Self {
        match strategy {
            Strategy::Grid => Schedule::Grid(GridScheduler::new(parallelism)),
            Strategy::Pool => Schedule::Pool(PoolScheduler::new(parallelism, queue_capacity)),
        }
    }

    /// Which strategy this is.
    pub fn strategy(&self) -> Strategy {
        match self {
            Schedule::Grid(_) => Strategy::Grid,
            Schedule::Pool(_) => Strategy::Pool,
        }
    }
}

impl Scheduler for Schedule {
    fn run<C: Canvas>(&self, frame: &Frame, canvas: &C) -> Result<Report, Error> {
        match self {
            Schedule::Grid(grid) => grid.run(frame, canvas),
            Schedule::Pool(pool) => pool.run(frame, canvas),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_parse_by_name() {
        assert_eq!("grid".parse::<Strategy>().unwrap(), Strategy::Grid);
        assert_eq!("pool".parse::<Strategy>().unwrap(), Strategy::Pool);
        assert!("tiles".parse::<Strategy>().is_err());
        assert_eq!(Strategy::Pool.to_string(), "pool");
    }

    #[test]
    fn schedule_remembers_its_strategy() {
        for strategy in &Strategy::ALL {
            assert_eq!(Schedule::new(*strategy, 2, 4).strategy(), *strategy);
        }
    }
}
