//! Pixel coordinate → (byte offset, port plane) mapping.
//!
//! Within one bit-plane the bytes are laid out scan row by scan row. Each scan row holds one
//! byte per column for every module band stacked top to bottom:
//!
//! ```text
//! byte_offset = sub_row × dest_width × module_bands + module_row × dest_width + column
//! ```
//!
//! Rows in the upper half of a module go to port plane 0 and rows in the lower half to port
//! plane 1; both share the same byte. With turnback wiring, every other band (counted from the
//! bottom of the canvas) is scanned in reverse: both the column and the row within the module
//! are mirrored.

use crate::geometry::PanelGeometry;

/// One of the two ports a module's rows are split across.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Plane {
    Upper,
    Lower,
}

impl Plane {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Upper => 0,
            Self::Lower => 1,
        }
    }
}

/// Where one pixel lives inside a single bit-plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaneAddress {
    /// Offset within one plane, always below `bytes_per_plane`.
    pub byte_offset: usize,
    pub plane: Plane,
}

impl PanelGeometry {
    /// Map a canvas coordinate.
    ///
    /// Returns `None` outside `dest_width × dest_height`; such pixels are cropped, not errors.
    #[must_use]
    pub fn map_pixel(&self, x: usize, y: usize) -> Option<PlaneAddress> {
        let width = self.dest_width();
        let height = self.dest_height();
        if x >= width || y >= height {
            return None;
        }

        let rows_per_module = self.led_rows_per_module();
        let module_row = y.checked_div(rows_per_module)?;
        let row_in_module = y.checked_rem(rows_per_module)?;
        let band_from_bottom = height
            .checked_sub(y)?
            .checked_sub(1)?
            .checked_div(rows_per_module)?;

        let (sub_row, column) = if self.turnback() && band_from_bottom & 1 == 1 {
            (
                rows_per_module.checked_sub(row_in_module)?.checked_sub(1)?,
                width.checked_sub(x)?.checked_sub(1)?,
            )
        } else {
            (row_in_module, x)
        };

        let scan_rows = self.scan_rows();
        let plane = if sub_row < scan_rows {
            Plane::Upper
        } else {
            Plane::Lower
        };
        let scan_row = sub_row.checked_rem(scan_rows)?;
        let row_start = scan_row.checked_mul(width)?.checked_mul(self.module_rows())?;
        let band_start = module_row.checked_mul(width)?;

        Some(PlaneAddress {
            byte_offset: row_start.checked_add(band_start)?.checked_add(column)?,
            plane,
        })
    }

    /// [`map_pixel`](Self::map_pixel) for a source pixel shifted by a signed offset.
    #[must_use]
    pub fn map_shifted(&self, x: usize, y: usize, dx: isize, dy: isize) -> Option<PlaneAddress> {
        self.map_pixel(x.checked_add_signed(dx)?, y.checked_add_signed(dy)?)
    }
}
