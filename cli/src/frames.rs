//! Decode PNG frames into packed RGBA for the movie writer.

use std::{
    fs::File,
    io::{BufReader, Read},
    path::{Path, PathBuf},
};

use png::{ColorType, Transformations};
use rayon::prelude::*;

use crate::BoxError;

/// One decoded input frame, always 8-bit RGBA.
pub struct DecodedFrame {
    pub path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl DecodedFrame {
    /// Every frame of a stream must match the first one.
    pub fn check_size(&self, width: usize, height: usize) -> Result<(), BoxError> {
        if (self.width, self.height) == (width, height) {
            Ok(())
        } else {
            Err(format!(
                "{} is {}x{}, expected {width}x{height}",
                self.path.display(),
                self.width,
                self.height
            )
            .into())
        }
    }
}

pub fn decode_file(path: &Path) -> Result<DecodedFrame, BoxError> {
    let with_path = |e: BoxError| -> BoxError { format!("{}: {e}", path.display()).into() };
    let file = File::open(path).map_err(|e| with_path(e.into()))?;
    let (width, height, rgba) = decode_rgba(BufReader::new(file)).map_err(with_path)?;
    Ok(DecodedFrame {
        path: path.to_path_buf(),
        width,
        height,
        rgba,
    })
}

/// Decode `paths` in parallel; the result keeps input order.
pub fn decode_batch(paths: &[PathBuf]) -> Result<Vec<DecodedFrame>, BoxError> {
    paths.par_iter().map(|path| decode_file(path)).collect()
}

/// Returns `(width, height, rgba)`. Palette and low bit depths are expanded, 16-bit channels
/// are cut to their high byte, and missing alpha is opaque.
pub fn decode_rgba<R: Read>(source: R) -> Result<(usize, usize, Vec<u8>), BoxError> {
    let mut decoder = png::Decoder::new(source);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader.next_frame(&mut buf)?;
    buf.truncate(info.buffer_size());

    let rgba = match info.color_type {
        ColorType::Rgba => buf,
        ColorType::Rgb => buf
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
            .collect(),
        ColorType::GrayscaleAlpha => buf
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        ColorType::Grayscale => buf.iter().flat_map(|&v| [v, v, v, u8::MAX]).collect(),
        ColorType::Indexed => return Err("palette image was not expanded".into()),
    };
    Ok((
        usize::try_from(info.width)?,
        usize::try_from(info.height)?,
        rgba,
    ))
}
