//! Panel geometry, bit allocation and output offset: the resolved form of the three option strings.

use crate::{error::ConfigError, panel_table::NamedPanel};

/// Number of output planes per frame, one per bit of an 8-bit channel, MSB first.
pub const PLANE_COUNT: usize = 8;

/// R, G, B for port 0 followed by R, G, B for port 1.
pub const PLANE_CHANNELS: usize = 6;

/// Number of rows driven by one scan line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScanDepth {
    Eight,
    Sixteen,
    ThirtyTwo,
}

impl ScanDepth {
    /// Accepts only 8, 16 and 32.
    #[must_use]
    pub const fn from_rows(rows: i64) -> Option<Self> {
        match rows {
            8 => Some(Self::Eight),
            16 => Some(Self::Sixteen),
            32 => Some(Self::ThirtyTwo),
            _ => None,
        }
    }

    #[must_use]
    pub const fn rows(self) -> usize {
        match self {
            Self::Eight => 8,
            Self::Sixteen => 16,
            Self::ThirtyTwo => 32,
        }
    }

    /// LED rows in one module: both ports, `2 × rows`.
    #[must_use]
    pub const fn module_rows(self) -> usize {
        match self {
            Self::Eight => 16,
            Self::Sixteen => 32,
            Self::ThirtyTwo => 64,
        }
    }
}

/// Where a [`PanelGeometry`] came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelSource {
    /// Legacy mode: the scan depth is given directly and the canvas is the input frame size.
    DirectScan { depth: ScanDepth },
    /// A key into [`NAMED_PANELS`](crate::panel_table::NAMED_PANELS).
    NamedModule { panel: &'static NamedPanel },
}

impl PanelSource {
    /// The configuration name recorded in the header, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&'static str> {
        match self {
            Self::DirectScan { .. } => None,
            Self::NamedModule { panel } => Some(panel.key),
        }
    }

    /// Build the geometry.
    ///
    /// Direct-scan mode takes its canvas from `width × height`; named mode ignores both and
    /// uses the table entry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCanvas`] or [`ConfigError::HeightNotMultiple`] when a
    /// direct-scan canvas cannot be split into module bands, and
    /// [`ConfigError::CanvasTooLarge`] when its frame size does not fit in memory.
    pub fn geometry(self, width: usize, height: usize) -> Result<PanelGeometry, ConfigError> {
        match self {
            Self::DirectScan { depth } => PanelGeometry::direct_scan(depth, width, height),
            Self::NamedModule { panel } => PanelGeometry::named(panel),
        }
    }
}

/// Physical layout of the destination canvas.
///
/// Each module is `led_rows_per_module` rows tall and is split across two ports: the upper
/// `scan_rows` rows go to plane 0, the lower `scan_rows` rows to plane 1. One byte therefore
/// carries two pixels, which is why a plane holds `dest_width × dest_height / 2` bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelGeometry {
    source: PanelSource,
    scan_rows: usize,
    led_rows_per_module: usize,
    module_columns: usize,
    module_rows: usize,
    dest_width: usize,
    dest_height: usize,
    turnback: bool,
    bytes_per_plane: usize,
    frame_size: usize,
}

impl PanelGeometry {
    /// Direct-scan geometry over a `width × height` canvas.
    ///
    /// The whole width is treated as a single module column.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyCanvas`] for a zero dimension,
    /// [`ConfigError::HeightNotMultiple`] when `height` is not a multiple of `2 × depth`, and
    /// [`ConfigError::CanvasTooLarge`] when the frame size overflows `usize`.
    pub fn direct_scan(depth: ScanDepth, width: usize, height: usize) -> Result<Self, ConfigError> {
        let led_rows_per_module = depth.module_rows();
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyCanvas { width, height });
        }
        let module_rows = height
            .checked_div(led_rows_per_module)
            .filter(|_| height.checked_rem(led_rows_per_module) == Some(0))
            .ok_or(ConfigError::HeightNotMultiple {
                height,
                rows: led_rows_per_module,
            })?;
        Self::build(PanelSource::DirectScan { depth }, depth, 1, module_rows, width, false)
    }

    /// Geometry of a named table entry.
    ///
    /// # Errors
    ///
    /// [`ConfigError::CanvasTooLarge`] for an entry whose frame size overflows `usize`. Entries
    /// of [`NAMED_PANELS`](crate::panel_table::NAMED_PANELS) never do.
    pub fn named(panel: &'static NamedPanel) -> Result<Self, ConfigError> {
        Self::build(
            PanelSource::NamedModule { panel },
            panel.class.scan_depth(),
            panel.module_columns,
            panel.module_rows,
            panel.width(),
            panel.turnback,
        )
    }

    fn build(
        source: PanelSource,
        depth: ScanDepth,
        module_columns: usize,
        module_rows: usize,
        dest_width: usize,
        turnback: bool,
    ) -> Result<Self, ConfigError> {
        let led_rows_per_module = depth.module_rows();
        let too_large = || ConfigError::CanvasTooLarge {
            width: dest_width,
            height: module_rows.saturating_mul(led_rows_per_module),
        };
        let dest_height = module_rows
            .checked_mul(led_rows_per_module)
            .ok_or_else(too_large)?;
        // Two pixels, one per port, share each byte of a plane.
        let bytes_per_plane = dest_width
            .checked_mul(dest_height)
            .and_then(|pixels| pixels.checked_div(2))
            .ok_or_else(too_large)?;
        let frame_size = bytes_per_plane
            .checked_mul(PLANE_COUNT)
            .ok_or_else(too_large)?;
        Ok(Self {
            source,
            scan_rows: depth.rows(),
            led_rows_per_module,
            module_columns,
            module_rows,
            dest_width,
            dest_height,
            turnback,
            bytes_per_plane,
            frame_size,
        })
    }

    #[must_use]
    pub const fn source(&self) -> PanelSource {
        self.source
    }

    #[must_use]
    pub const fn scan_rows(&self) -> usize {
        self.scan_rows
    }

    #[must_use]
    pub const fn led_rows_per_module(&self) -> usize {
        self.led_rows_per_module
    }

    #[must_use]
    pub const fn module_columns(&self) -> usize {
        self.module_columns
    }

    #[must_use]
    pub const fn module_rows(&self) -> usize {
        self.module_rows
    }

    #[must_use]
    pub const fn dest_width(&self) -> usize {
        self.dest_width
    }

    #[must_use]
    pub const fn dest_height(&self) -> usize {
        self.dest_height
    }

    #[must_use]
    pub const fn turnback(&self) -> bool {
        self.turnback
    }

    #[must_use]
    pub const fn bytes_per_plane(&self) -> usize {
        self.bytes_per_plane
    }

    /// Bytes in one packed frame record.
    #[must_use]
    pub const fn frame_size(&self) -> usize {
        self.frame_size
    }
}

/// Bit positions for R0, G0, B0, R1, G1, B1, in that order.
///
/// Positions run 0–15 but the frame buffer is byte wide, so a position of 8 or more selects no
/// bit of the output byte and that channel is never written.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BitPlaneMap([u8; PLANE_CHANNELS]);

impl BitPlaneMap {
    /// Highest accepted bit position.
    pub const MAX_POSITION: u8 = 15;

    /// `positions` must already be validated (each at most [`Self::MAX_POSITION`]).
    #[must_use]
    pub(crate) const fn new(positions: [u8; PLANE_CHANNELS]) -> Self {
        Self(positions)
    }

    #[must_use]
    pub const fn positions(&self) -> [u8; PLANE_CHANNELS] {
        self.0
    }

    /// `1 << position` for every channel.
    #[must_use]
    pub fn masks(&self) -> [u16; PLANE_CHANNELS] {
        self.0
            .map(|position| 1u16.checked_shl(u32::from(position)).unwrap_or(0))
    }

    /// The R, G, B masks of `plane` (0 or 1) narrowed to the output byte.
    #[must_use]
    pub fn byte_masks(&self, plane: usize) -> [u8; 3] {
        let port = self.0.chunks_exact(3).nth(plane).unwrap_or_default();
        core::array::from_fn(|channel| {
            port.get(channel)
                .and_then(|&position| 1u8.checked_shl(u32::from(position)))
                .unwrap_or(0)
        })
    }
}

/// Translation applied to every source pixel before address mapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutputOffset {
    pub x: isize,
    pub y: isize,
}
