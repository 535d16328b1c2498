#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Mandelbrot renderer
//!
//! The Mandelbrot set is the set of points c on the complex plane for
//! which the orbit of z = z^2 + c, starting from zero, stays bounded.
//! An escape-time image colours every pixel by how quickly its point
//! leaves the disc of radius 2: the longer it stays, the darker it is,
//! and points that never leave within the iteration cap are black.
//!
//! Every pixel is an independent pure function of its own coordinate,
//! which makes the image embarrassingly parallel.  The interesting part
//! is how the work is spread over threads, and this crate offers two
//! answers behind one `Scheduler` trait:
//!
//! * `grid` cuts the image into a fixed set of rectangular tiles and
//!   computes each tile on its own thread.
//! * `pool` evaluates pixels in a single producer and streams them
//!   through a bounded channel to a pool of writer threads.
//!
//! Both write into the same lock-free `PixelBuffer`, relying on their
//! partitioning to never hand one pixel to two threads, and both signal
//! completion through a counting `Latch`.

pub mod buffer;
pub mod config;
pub mod error;
pub mod escape;
pub mod grid;
pub mod latch;
pub mod output;
pub mod palette;
pub mod planes;
pub mod pool;
pub mod render;
pub mod scheduler;
pub mod stats;

pub use buffer::{Canvas, PixelBuffer};
pub use config::RenderConfig;
pub use error::Error;
pub use palette::{Color, Palette};
pub use planes::{ComplexPlane, Pixel};
pub use render::{render, Renderer};
pub use scheduler::Strategy;
