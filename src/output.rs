// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Writes a finished buffer to disk as an 8-bit RGBA PNG.
//!
//! The image is encoded into a `.partial` sibling of the destination and
//! renamed into place once the encoder and the flush have succeeded, so
//! a failure never leaves a truncated file under the requested name.

use image::png::PNGEncoder;
use image::ColorType;
use log::{info, warn};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::buffer::{Canvas, PixelBuffer};
use crate::error::Error;

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".partial");
    path.with_file_name(name)
}

fn encode(path: &Path, buffer: &PixelBuffer) -> Result<(), Error> {
    let output = File::create(path)?;
    let mut writer = BufWriter::new(output);
    PNGEncoder::new(&mut writer)
        .encode(
            &buffer.to_rgba_bytes(),
            buffer.width() as u32,
            buffer.height() as u32,
            ColorType::RGBA(8),
        )
        .map_err(|e| Error::Encode(e.to_string()))?;
    writer.flush()?;
    writer.get_ref().sync_all()?;
    Ok(())
}

/// Encodes `buffer` as a PNG at `path`, replacing any existing file.
pub fn write_png<P: AsRef<Path>>(path: P, buffer: &PixelBuffer) -> Result<(), Error> {
    let path = path.as_ref();
    if path.file_name().is_none() {
        return Err(Error::Config(format!("{} is not a file name", path.display())));
    }
    let partial = partial_path(path);

    let written = encode(&partial, buffer).and_then(|()| Ok(fs::rename(&partial, path)?));
    if let Err(err) = written {
        if partial.exists() {
            if let Err(cleanup) = fs::remove_file(&partial) {
                warn!("could not remove {}: {}", partial.display(), cleanup);
            }
        }
        return Err(err);
    }

    info!(
        "wrote {}x{} image to {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}
