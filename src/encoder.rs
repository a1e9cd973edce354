//! Frame encoders: turn one RGBA frame into one fixed-size record.
//!
//! [`BitPlaneEncoder`] produces the LED panel layout (HLM); [`Rgb565Encoder`] produces the
//! TFT layout (HTL). Both fill a caller-owned buffer that the caller zeroes between frames.

use crate::{
    Result,
    bit_plane::BitPlanePacker,
    error::Error,
    config::ResolvedConfig,
    frame::RgbaFrame,
    geometry::{OutputOffset, PanelGeometry},
};

/// Encodes frames into records of a fixed size.
pub trait FrameEncoder {
    /// Bytes per record.
    fn frame_size(&self) -> usize;

    /// Encode `frame` into `buffer`, which is exactly [`frame_size`](Self::frame_size) bytes
    /// and already zeroed.
    ///
    /// # Errors
    ///
    /// Encoders report internal addressing defects; input problems are caught when the
    /// [`RgbaFrame`] is built.
    fn encode(&self, frame: &RgbaFrame<'_>, buffer: &mut [u8]) -> Result<()>;
}

/// Bit-plane encoder for multiplexed LED panels.
#[derive(Clone, Copy, Debug)]
pub struct BitPlaneEncoder {
    geometry: PanelGeometry,
    offset: OutputOffset,
    packer: BitPlanePacker,
}

impl BitPlaneEncoder {
    #[must_use]
    pub const fn new(config: ResolvedConfig) -> Self {
        Self {
            geometry: config.geometry,
            offset: config.offset,
            packer: BitPlanePacker::new(config.bit_map, config.geometry.bytes_per_plane()),
        }
    }

    #[must_use]
    pub const fn geometry(&self) -> &PanelGeometry {
        &self.geometry
    }

    #[must_use]
    pub const fn packer(&self) -> &BitPlanePacker {
        &self.packer
    }
}

impl FrameEncoder for BitPlaneEncoder {
    fn frame_size(&self) -> usize {
        self.geometry.frame_size()
    }

    fn encode(&self, frame: &RgbaFrame<'_>, buffer: &mut [u8]) -> Result<()> {
        let OutputOffset { x: dx, y: dy } = self.offset;
        for (x, y, rgb) in frame.pixels() {
            if let Some(address) = self.geometry.map_shifted(x, y, dx, dy) {
                self.packer.pack(buffer, address, rgb)?;
            }
        }
        Ok(())
    }
}

/// RGB565 encoder for TFT LCDs: two bytes per pixel, high byte first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb565Encoder {
    frame_size: usize,
}

impl Rgb565Encoder {
    const PIXEL_BYTES: usize = 2;

    /// # Errors
    ///
    /// [`Error::DimensionOverflow`] when a `width × height` record does not fit in memory.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        let frame_size = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(Self::PIXEL_BYTES))
            .ok_or(Error::DimensionOverflow(width.max(height)))?;
        Ok(Self { frame_size })
    }

    /// `RRRRRGGG GGGBBBBB`, keeping the top bits of each channel.
    #[must_use]
    #[expect(clippy::arithmetic_side_effects, reason = "Bit operations")]
    pub fn pack_pixel(red: u8, green: u8, blue: u8) -> u16 {
        ((u16::from(red) & 0xF8) << 8) | ((u16::from(green) & 0xFC) << 3) | (u16::from(blue) >> 3)
    }
}

impl FrameEncoder for Rgb565Encoder {
    fn frame_size(&self) -> usize {
        self.frame_size
    }

    fn encode(&self, frame: &RgbaFrame<'_>, buffer: &mut [u8]) -> Result<()> {
        for ((_, _, rgb), out) in frame.pixels().zip(buffer.chunks_exact_mut(Self::PIXEL_BYTES)) {
            out.copy_from_slice(&Self::pack_pixel(rgb.r, rgb.g, rgb.b).to_be_bytes());
        }
        Ok(())
    }
}
