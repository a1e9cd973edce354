use alloc::string::String;

use derive_more::derive::{Display, Error, From};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[cfg_attr(
    not(test),
    expect(missing_docs, reason = "The variants are self-explanatory.")
)]
#[derive(Debug, Display, Error, From)]
pub enum Error {
    #[display("{_0}")]
    #[from]
    Config(ConfigError),

    #[display("malloc {bytes} bytes failed")]
    Allocation { bytes: usize },

    /// A mapped address landed outside the frame buffer. This is a geometry defect, never a
    /// cropped pixel: cropped pixels are filtered out by the address mapper before packing.
    #[display("packed write at byte {offset} is outside the {len} byte frame buffer")]
    BoundsViolation { offset: usize, len: usize },

    #[display("frame of {width}x{height} RGBA needs {expected} bytes, got {actual}")]
    FrameLength {
        width: usize,
        height: usize,
        expected: usize,
        actual: usize,
    },

    #[display("value {_0} does not fit its header field")]
    DimensionOverflow(#[error(not(source))] usize),

    #[display("{_0}")]
    #[from]
    Header(HeaderError),

    #[display("seek offset {offset} is not addressable")]
    SeekOverflow { offset: u64 },

    #[cfg(feature = "std")]
    #[display("{_0}")]
    #[from]
    Io(std::io::Error),
}

/// Malformed or out-of-range configuration text. Always reported before any byte is written.
#[cfg_attr(
    not(test),
    expect(missing_docs, reason = "The variants are self-explanatory.")
)]
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[display("led_scan must not be empty")]
    EmptyScan,

    #[display("led_scan must be 8, 16 or 32, got {scan}")]
    UnsupportedScan { scan: i64 },

    #[display("unknown LED configuration {key:?}")]
    UnknownPanel { key: String },

    #[display("-hlm_bits not defined")]
    EmptyBits,

    #[display("number expected at position {position}: {found:?}")]
    ExpectedNumber { position: usize, found: String },

    #[display("too big bit position {value} at position {position}")]
    BitTooLarge { value: u32, position: usize },

    #[display("bit position {bit} used twice (at position {position})")]
    DuplicateBit { bit: u8, position: usize },

    #[display("too many bits at position {position}, 6 bits needed")]
    TooManyBits { position: usize },

    #[display("{found} bit positions found, 6 needed")]
    TooFewBits { found: usize },

    #[display("unexpected char {ch:?} at position {position}")]
    UnexpectedChar { ch: char, position: usize },

    #[display("bad offset value {text:?}, should be ox,oy format")]
    BadOffset { text: String },

    #[display("height {height} must be a multiple of {rows}")]
    HeightNotMultiple { height: usize, rows: usize },

    #[display("canvas {width}x{height} has no pixels")]
    EmptyCanvas { width: usize, height: usize },

    #[display("canvas {width}x{height} is too large to address")]
    CanvasTooLarge { width: usize, height: usize },
}

/// A header that cannot be decoded.
#[cfg_attr(
    not(test),
    expect(missing_docs, reason = "The variants are self-explanatory.")
)]
#[derive(Debug, Display, Error, Clone, Copy, PartialEq, Eq)]
pub enum HeaderError {
    #[display("header needs {needed} bytes, only {available} available")]
    Truncated { needed: usize, available: usize },

    #[display("unknown signature {signature:?}")]
    UnknownSignature { signature: [u8; 4] },

    #[display("header declares size {declared}, expected {expected}")]
    SizeMismatch { declared: u16, expected: u16 },

    #[display("panel configuration name is not valid UTF-8")]
    PanelName,
}
