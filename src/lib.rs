//! Encode RGBA video frames into Humblesoft LED movie (HLM) and TFT movie (HTL) files.
//!
//! HLM frames are bit-plane packed for multiplexed LED panels: every 8-bit channel is spread
//! over eight planes, and each byte of a plane carries one bit of R, G and B for two pixels
//! (one per port). The byte a pixel lands in depends on the panel's scan depth, its module
//! stacking and optional turnback (serpentine) wiring. HTL frames are plain RGB565.
//!
//! The pipeline, leaves first:
//!
//! - [`config`] and [`panel_table`] resolve the scan, bit and offset option strings into a
//!   [`PanelGeometry`], a [`BitPlaneMap`] and an [`OutputOffset`].
//! - [`address`] maps a canvas pixel to a byte offset and port plane.
//! - [`bit_plane`] writes one pixel's bits across the eight planes.
//! - [`encoder`] drives the packer over a whole frame.
//! - [`header`] encodes the fixed header; [`writer`] owns the stream from open to close.
#![cfg_attr(not(feature = "std"), no_std)]
#![expect(
    clippy::module_name_repetitions,
    reason = "Types are re-exported at the crate root"
)]

extern crate alloc;

pub mod address;
pub mod bit_plane;
pub mod config;
pub mod encoder;
mod error;
pub mod frame;
pub mod geometry;
pub mod header;
pub mod panel_table;
pub mod sink;
pub mod writer;

// Re-export commonly used items
pub use address::{Plane, PlaneAddress};
pub use bit_plane::BitPlanePacker;
pub use config::{HlmOptions, ResolvedConfig};
pub use encoder::{BitPlaneEncoder, FrameEncoder, Rgb565Encoder};
pub use error::{ConfigError, Error, HeaderError, Result};
pub use frame::RgbaFrame;
pub use geometry::{BitPlaneMap, OutputOffset, PanelGeometry, PanelSource, ScanDepth};
pub use header::{Header, MovieFormat, Rational};
#[cfg(feature = "std")]
pub use sink::IoSink;
pub use sink::{FrameSink, MemorySink};
pub use smart_leds::RGB8;
pub use writer::{MovieWriter, StreamInfo};
