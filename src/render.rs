// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Ties the pieces together: geometry, evaluator and palette make a
//! `Frame`; a `Renderer` allocates a buffer and lets the configured
//! scheduler fill it.

use log::info;
use num::Complex;
use std::time::Instant;

use crate::buffer::{Canvas, PixelBuffer};
use crate::config::RenderConfig;
use crate::error::Error;
use crate::escape::Evaluator;
use crate::palette::{Color, Palette};
use crate::planes::{ComplexPlane, Pixel, PlaneMapper};
use crate::scheduler::{Report, Schedule, Scheduler, Strategy};

/// The pure per-pixel function of a render.  Shared read-only by every
/// worker.
#[derive(Copy, Clone, Debug)]
pub struct Frame {
    /// Pixel to point mapping, and the image size.
    pub plane: PlaneMapper,
    /// The escape-time function.
    pub evaluator: Evaluator,
    /// Score to colour mapping.
    pub palette: Palette,
}

impl Frame {
    /// Fails if the plane and width do not describe a non-empty image.
    pub fn new(
        complex_plane: ComplexPlane,
        width: usize,
        max_iterations: usize,
        palette: Palette,
    ) -> Result<Self, Error> {
        Ok(Frame {
            plane: PlaneMapper::new(complex_plane, width)?,
            evaluator: Evaluator::new(max_iterations),
            palette,
        })
    }

    /// Point of the complex plane under `pixel`.
    pub fn point(&self, pixel: Pixel) -> Complex<f64> {
        self.plane.pixel_to_point(pixel)
    }

    /// Escape score of `pixel`.
    pub fn score(&self, pixel: Pixel) -> f64 {
        self.evaluator.evaluate(self.point(pixel))
    }

    /// Final colour of `pixel`.
    pub fn color_at(&self, pixel: Pixel) -> Color {
        self.palette.colorize(self.score(pixel))
    }
}

/// A validated configuration, ready to render any number of times.
#[derive(Copy, Clone, Debug)]
pub struct Renderer {
    frame: Frame,
    schedule: Schedule,
}

impl Renderer {
    /// Validates `config` and derives the image geometry.
    pub fn new(config: &RenderConfig) -> Result<Self, Error> {
        config.validate()?;
        let frame = Frame::new(
            config.plane,
            config.pixel_width,
            config.max_iterations,
            config.palette,
        )?;
        let schedule = Schedule::new(config.strategy, config.parallelism, config.queue_capacity);
        Ok(Renderer { frame, schedule })
    }

    /// The per-pixel function this renderer applies.
    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    /// The strategy filling the buffer.
    pub fn strategy(&self) -> Strategy {
        self.schedule.strategy()
    }

    /// `(width, height)` of the output.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.frame.plane.width(), self.frame.plane.height())
    }

    /// Allocates a black buffer and fills it.
    pub fn render(&self) -> Result<PixelBuffer, Error> {
        let (width, height) = self.dimensions();
        let buffer = PixelBuffer::new(width, height, Color::BLACK);
        self.render_into(&buffer)?;
        Ok(buffer)
    }

    /// Fills a caller-supplied canvas, which must match `dimensions`.
    pub fn render_into<C: Canvas>(&self, canvas: &C) -> Result<Report, Error> {
        if (canvas.width(), canvas.height()) != self.dimensions() {
            return Err(Error::Config(format!(
                "canvas is {}x{}, frame is {}x{}",
                canvas.width(),
                canvas.height(),
                self.dimensions().0,
                self.dimensions().1
            )));
        }
        info!(
            "rendering {}x{} with the {} strategy",
            canvas.width(),
            canvas.height(),
            self.strategy()
        );
        let started = Instant::now();
        let report = self.schedule.run(&self.frame, canvas)?;
        info!(
            "rendered {} units in {:?}",
            report.units,
            started.elapsed()
        );
        Ok(report)
    }
}

/// Renders `config` into a fresh buffer.
pub fn render(config: &RenderConfig) -> Result<PixelBuffer, Error> {
    Renderer::new(config)?.render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_geometry() {
        let renderer = Renderer::new(&RenderConfig::default()).unwrap();
        assert_eq!(renderer.dimensions(), (750, 600));
    }

    #[test]
    fn frame_colours_follow_the_score() {
        let frame = Frame::new(ComplexPlane::default(), 750, 100, Palette::default()).unwrap();
        // (-1, 0) sits in the period-2 bulb.
        assert_eq!(frame.point(Pixel(300, 300)), Complex::new(-1.0, 0.0));
        assert_eq!(frame.color_at(Pixel(300, 300)), Color::BLACK);
        // (-2, -1) leaves on the first iteration.
        assert_eq!(frame.color_at(Pixel(0, 0)), Color::opaque(227, 232, 252));
    }

    #[test]
    fn mismatched_canvas_is_rejected() {
        let renderer = Renderer::new(&RenderConfig {
            pixel_width: 25,
            ..RenderConfig::default()
        })
        .unwrap();
        let wrong = PixelBuffer::new(10, 10, Color::BLACK);
        assert!(renderer.render_into(&wrong).is_err());
    }

    #[test]
    fn invalid_config_never_builds() {
        let config = RenderConfig {
            parallelism: 0,
            ..RenderConfig::default()
        };
        assert!(render(&config).is_err());
    }
}
