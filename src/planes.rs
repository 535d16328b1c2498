// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane bounded by a leftlower and a
//! rightupper corner.  Only the pixel width is chosen; the height
//! follows from the aspect ratio of the complex rectangle, so a pixel
//! is always square on the complex plane.
use num::Complex;

use crate::error::Error;

/// Largest width or height, in pixels, a plane may map onto.
pub const MAX_DIMENSION: usize = 65_535;

/// Largest number of pixels in one image.
pub const MAX_PIXELS: usize = 1 << 28;

/// Describes the x, y of a pixel in the integral plane.  x runs
/// along the real axis, y along the imaginary axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pixel(pub usize, pub usize);

/// Describes the lower-left corner and upper-right corner of the
/// Complex plane, treating the real part of each value as the
/// x-component and the imaginary part of each value as the
/// y-component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ComplexPlane(pub Complex<f64>, pub Complex<f64>);

impl ComplexPlane {
    /// Builds a plane from its real and imaginary extents.
    pub fn new(real_min: f64, real_max: f64, imag_min: f64, imag_max: f64) -> Self {
        ComplexPlane(
            Complex::new(real_min, imag_min),
            Complex::new(real_max, imag_max),
        )
    }

    /// Extent along the real axis.
    pub fn width(&self) -> f64 {
        self.1.re - self.0.re
    }

    /// Extent along the imaginary axis.
    pub fn height(&self) -> f64 {
        self.1.im - self.0.im
    }
}

impl Default for ComplexPlane {
    fn default() -> Self {
        ComplexPlane::new(-2.0, 0.5, -1.0, 1.0)
    }
}

/// Maps pixels of a width x height grid onto points of a complex
/// plane.
#[derive(Copy, Clone, Debug)]
pub struct PlaneMapper {
    width: usize,
    height: usize,
    /// The complex rectangle being rendered.
    pub complex_plane: ComplexPlane,
    // Pixels per unit of the complex plane, identical on both axes.
    scale: f64,
}

impl PlaneMapper {
    /// Takes the complex rectangle and the pixel width of the output.
    /// The height is `round(scale * imaginary extent)` where scale is
    /// the number of pixels per unit along the real axis.
    pub fn new(complex_plane: ComplexPlane, width: usize) -> Result<PlaneMapper, Error> {
        let (leftlower, rightupper) = (complex_plane.0, complex_plane.1);
        let finite = [leftlower.re, leftlower.im, rightupper.re, rightupper.im]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(Error::Config(
                "The plane bounds must be finite numbers.".to_string(),
            ));
        }

        if rightupper.re <= leftlower.re {
            return Err(Error::Config(
                "The left lower corner is not to the left of the right upper corner.".to_string(),
            ));
        }

        if rightupper.im <= leftlower.im {
            return Err(Error::Config(
                "The left lower corner is not lower than the right upper corner.".to_string(),
            ));
        }

        if width == 0 {
            return Err(Error::Config("The image width must be at least 1.".to_string()));
        }

        if width > MAX_DIMENSION {
            return Err(Error::Config(format!(
                "The image width must be at most {}.",
                MAX_DIMENSION
            )));
        }

        let scale = (width as f64) / complex_plane.width();
        let rows = (scale * complex_plane.height()).round();
        if !scale.is_finite() || !rows.is_finite() || rows > MAX_DIMENSION as f64 {
            return Err(Error::Config(format!(
                "A width of {} makes this plane taller than {} rows.",
                width, MAX_DIMENSION
            )));
        }
        let height = rows as usize;
        match width.checked_mul(height) {
            Some(area) if area <= MAX_PIXELS => {}
            _ => {
                return Err(Error::Config(format!(
                    "A {}x{} image exceeds {} pixels.",
                    width, height, MAX_PIXELS
                )))
            }
        }
        if height == 0 {
            return Err(Error::Config(format!(
                "A width of {} leaves no rows for this plane.",
                width
            )));
        }

        Ok(PlaneMapper {
            width,
            height,
            complex_plane,
            scale,
        })
    }

    /// Width of the integral plane.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the integral plane, derived from the aspect ratio.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixels per unit of the complex plane.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Given a pixel on the integral cartesian plane, map that to its
    /// point on the complex cartesian plane.
    pub fn pixel_to_point(&self, pixel: Pixel) -> Complex<f64> {
        Complex::new(
            (pixel.0 as f64) / self.scale + self.complex_plane.0.re,
            (pixel.1 as f64) / self.scale + self.complex_plane.0.im,
        )
    }
}
