//! The fixed table of named LED panel configurations.
//!
//! A named configuration tiles identical modules into a `module_columns × module_rows` canvas.
//! Each module class fixes the module's pixel size and how many rows one scan line drives:
//!
//! ```text
//! class      module   scan rows   rows per module (2 ports)
//! 32x16s8    32×16    8           16
//! 32x32s16   32×32    16          32
//! 64x32s16   64×32    16          32
//! ```
//!
//! Keys are written into the movie header's 8-byte configuration field, so every key is at
//! most 8 ASCII bytes.

use crate::geometry::ScanDepth;

/// Pixel size and scan depth of one physical module.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModuleClass {
    /// 32×16 pixels, 1/8 scan.
    Px32x16Scan8,
    /// 32×32 pixels, 1/16 scan.
    Px32x32Scan16,
    /// 64×32 pixels, 1/16 scan (double width).
    Px64x32Scan16,
}

impl ModuleClass {
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Px32x16Scan8 | Self::Px32x32Scan16 => 32,
            Self::Px64x32Scan16 => 64,
        }
    }

    #[must_use]
    pub const fn height(self) -> usize {
        match self {
            Self::Px32x16Scan8 => 16,
            Self::Px32x32Scan16 | Self::Px64x32Scan16 => 32,
        }
    }

    #[must_use]
    pub const fn scan_depth(self) -> ScanDepth {
        match self {
            Self::Px32x16Scan8 => ScanDepth::Eight,
            Self::Px32x32Scan16 | Self::Px64x32Scan16 => ScanDepth::Sixteen,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Px32x16Scan8 => "32x16s8",
            Self::Px32x32Scan16 => "32x32s16",
            Self::Px64x32Scan16 => "64x32s16",
        }
    }
}

/// One entry of [`NAMED_PANELS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedPanel {
    pub key: &'static str,
    pub module_columns: usize,
    pub module_rows: usize,
    pub class: ModuleClass,
    /// Alternate module-row bands are wired in reverse (serpentine).
    pub turnback: bool,
}

impl NamedPanel {
    const fn new(
        key: &'static str,
        module_columns: usize,
        module_rows: usize,
        class: ModuleClass,
        turnback: bool,
    ) -> Self {
        assert!(key.len() <= 8, "panel key must fit the 8-byte header field");
        assert!(module_columns > 0 && module_rows > 0, "panel must hold a module");
        Self {
            key,
            module_columns,
            module_rows,
            class,
            turnback,
        }
    }

    /// Canvas width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.module_columns.saturating_mul(self.class.width())
    }

    /// Canvas height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.module_rows.saturating_mul(self.class.height())
    }
}

pub static NAMED_PANELS: [NamedPanel; 10] = [
    NamedPanel::new("A1", 1, 1, ModuleClass::Px32x16Scan8, false),
    NamedPanel::new("A2", 2, 1, ModuleClass::Px32x16Scan8, false),
    NamedPanel::new("A4", 2, 2, ModuleClass::Px32x16Scan8, true),
    NamedPanel::new("A8", 2, 4, ModuleClass::Px32x16Scan8, true),
    NamedPanel::new("B1", 1, 1, ModuleClass::Px32x32Scan16, false),
    NamedPanel::new("B2", 2, 1, ModuleClass::Px32x32Scan16, false),
    NamedPanel::new("B4", 2, 2, ModuleClass::Px32x32Scan16, true),
    NamedPanel::new("C1", 1, 1, ModuleClass::Px64x32Scan16, false),
    NamedPanel::new("C2", 1, 2, ModuleClass::Px64x32Scan16, true),
    NamedPanel::new("C4", 2, 2, ModuleClass::Px64x32Scan16, true),
];

/// Look up a named configuration. Keys are case-sensitive.
#[must_use]
pub fn find_panel(key: &str) -> Option<&'static NamedPanel> {
    NAMED_PANELS.iter().find(|panel| panel.key == key)
}
