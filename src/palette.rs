// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns escape scores into colours by scaling each channel linearly.

use num::clamp;

/// A non-premultiplied RGBA colour, eight bits per channel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha; 255 is opaque.
    pub a: u8,
}

impl Color {
    /// Opaque black, the background every buffer starts from.
    pub const BLACK: Color = Color::opaque(0, 0, 0);

    /// A fully opaque colour.
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b, a: 255 }
    }

    /// Packs the colour into one word, red in the most significant byte.
    pub fn pack(self) -> u32 {
        u32::from_be_bytes([self.r, self.g, self.b, self.a])
    }

    /// The inverse of `pack`.
    pub fn unpack(word: u32) -> Self {
        let [r, g, b, a] = word.to_be_bytes();
        Color { r, g, b, a }
    }
}

/// Per-channel weights applied to an escape score.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Palette {
    /// Red weight.
    pub red: f64,
    /// Green weight.
    pub green: f64,
    /// Blue weight.
    pub blue: f64,
}

impl Palette {
    /// Weights for the three channels, each expected in [0, 255].
    pub fn new(red: f64, green: f64, blue: f64) -> Self {
        Palette { red, green, blue }
    }

    /// True when every weight is a finite, non-negative number.
    pub fn is_valid(&self) -> bool {
        [self.red, self.green, self.blue]
            .iter()
            .all(|w| w.is_finite() && *w >= 0.0)
    }

    /// Scales each weight by the score and truncates to eight bits.
    /// Alpha is always opaque.
    pub fn colorize(&self, score: f64) -> Color {
        let score = clamp(score, 0.0, 1.0);
        Color::opaque(
            channel(self.red, score),
            channel(self.green, score),
            channel(self.blue, score),
        )
    }
}

impl Default for Palette {
    fn default() -> Self {
        Palette::new(230.0, 235.0, 255.0)
    }
}

#[inline]
fn channel(weight: f64, score: f64) -> u8 {
    clamp(weight * score, 0.0, 255.0) as u8
}
