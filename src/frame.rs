//! Borrowed, size-checked RGBA input frames.

use smart_leds::RGB8;

use crate::{Result, error::Error};

/// Bytes per input pixel: R, G, B, A. Alpha is ignored.
pub const RGBA_BYTES: usize = 4;

/// A borrowed, size-checked RGBA frame.
#[derive(Clone, Copy, Debug)]
pub struct RgbaFrame<'a> {
    width: usize,
    height: usize,
    data: &'a [u8],
}

impl<'a> RgbaFrame<'a> {
    /// # Errors
    ///
    /// [`Error::FrameLength`] unless `data` holds exactly `width × height` RGBA pixels.
    pub fn new(width: usize, height: usize, data: &'a [u8]) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(RGBA_BYTES))
            .ok_or(Error::DimensionOverflow(width.max(height)))?;
        if data.len() != expected {
            return Err(Error::FrameLength {
                width,
                height,
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// `(x, y, rgb)` in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = (usize, usize, RGB8)> + 'a {
        let width = self.width;
        self.data
            .chunks_exact(RGBA_BYTES)
            .enumerate()
            .filter_map(move |(index, pixel)| match *pixel {
                [red, green, blue, _] => Some((
                    index.checked_rem(width)?,
                    index.checked_div(width)?,
                    RGB8::new(red, green, blue),
                )),
                _ => None,
            })
    }
}
