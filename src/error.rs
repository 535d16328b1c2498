// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The one error type shared by the renderer, the schedulers and the
//! image writer.

use failure::Fail;
use std::io;

/// Everything that can stop a render or keep its image off the disk.
#[derive(Debug, Fail)]
pub enum Error {
    /// The configuration describes an image that cannot be rendered.
    #[fail(display = "invalid configuration: {}", _0)]
    Config(String),

    /// Creating, writing or renaming the output file failed.
    #[fail(display = "i/o error: {}", _0)]
    Io(#[cause] io::Error),

    /// The encoder refused the pixel data.
    #[fail(display = "could not encode image: {}", _0)]
    Encode(String),

    /// A worker thread panicked; the render was abandoned.
    #[fail(display = "a {} worker panicked; render abandoned", _0)]
    WorkerPanicked(&'static str),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}
