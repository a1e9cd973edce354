//! Spread each 8-bit channel of a pixel across the eight bit-planes of a frame.
//!
//! Plane `i` holds bit `7 - i` of every channel, so the first plane carries the most
//! significant bits. Within a byte, each of R0,G0,B0,R1,G1,B1 owns the bit chosen by the
//! [`BitPlaneMap`].

use smart_leds::RGB8;

use crate::{
    Result,
    address::PlaneAddress,
    error::Error,
    geometry::{BitPlaneMap, PLANE_COUNT},
};

/// The channel bit each plane carries, MSB plane first.
const PLANE_BITS: [u8; PLANE_COUNT] = [0x80, 0x40, 0x20, 0x10, 0x08, 0x04, 0x02, 0x01];

const LAST_PLANE: usize = PLANE_COUNT - 1;

/// Writes and reads pixels in a bit-plane frame buffer of `bytes_per_plane × 8` bytes.
#[derive(Clone, Copy, Debug)]
pub struct BitPlanePacker {
    bit_map: BitPlaneMap,
    bytes_per_plane: usize,
}

impl BitPlanePacker {
    #[must_use]
    pub const fn new(bit_map: BitPlaneMap, bytes_per_plane: usize) -> Self {
        Self {
            bit_map,
            bytes_per_plane,
        }
    }

    /// Set or clear this pixel's bits in all eight planes.
    ///
    /// Other bits of each byte are left untouched, so the two pixels sharing a byte can be
    /// written in any order.
    ///
    /// # Errors
    ///
    /// [`Error::BoundsViolation`] if a plane byte falls outside `buffer`. The buffer is left
    /// unchanged in that case.
    pub fn pack(&self, buffer: &mut [u8], address: PlaneAddress, rgb: RGB8) -> Result<()> {
        self.check_bounds(buffer.len(), address)?;
        let masks = self.bit_map.byte_masks(address.plane.index());
        let channels = [rgb.r, rgb.g, rgb.b];

        let len = buffer.len();
        for (offset, bit) in self.plane_bytes(address) {
            let byte = buffer
                .get_mut(offset)
                .ok_or(Error::BoundsViolation { offset, len })?;
            for (&channel, &mask) in channels.iter().zip(&masks) {
                if channel & bit != 0 {
                    *byte |= mask;
                } else {
                    *byte &= !mask;
                }
            }
        }
        Ok(())
    }

    /// Reassemble the pixel stored at `address`.
    ///
    /// Channels whose bit position is 8 or above are not representable in the byte-wide
    /// buffer and read back as 0.
    ///
    /// # Errors
    ///
    /// [`Error::BoundsViolation`] if a plane byte falls outside `buffer`.
    pub fn read(&self, buffer: &[u8], address: PlaneAddress) -> Result<RGB8> {
        self.check_bounds(buffer.len(), address)?;
        let masks = self.bit_map.byte_masks(address.plane.index());
        let mut channels = [0u8; 3];

        for (offset, bit) in self.plane_bytes(address) {
            let byte = buffer.get(offset).copied().ok_or(Error::BoundsViolation {
                offset,
                len: buffer.len(),
            })?;
            for (channel, &mask) in channels.iter_mut().zip(&masks) {
                if byte & mask != 0 {
                    *channel |= bit;
                }
            }
        }
        let [red, green, blue] = channels;
        Ok(RGB8::new(red, green, blue))
    }

    /// Byte offset and channel bit of every plane, MSB plane first.
    fn plane_bytes(&self, address: PlaneAddress) -> impl Iterator<Item = (usize, u8)> {
        let stride = self.bytes_per_plane;
        core::iter::successors(Some(address.byte_offset), move |offset| {
            offset.checked_add(stride)
        })
        .zip(PLANE_BITS)
    }

    // The last plane's byte is the highest offset touched.
    fn check_bounds(&self, len: usize, address: PlaneAddress) -> Result<()> {
        let offset = self
            .plane_bytes(address)
            .nth(LAST_PLANE)
            .map_or(usize::MAX, |(offset, _)| offset);
        if address.byte_offset >= self.bytes_per_plane || offset >= len {
            return Err(Error::BoundsViolation { offset, len });
        }
        Ok(())
    }
}
