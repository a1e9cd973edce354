//! Resolve the three textual options (scan, bits, offset) into a validated panel setup.
//!
//! Resolution runs scan → bits → offset and stops at the first failure, so nothing is
//! allocated or written for a bad configuration.
//!
//! ```
//! use led_movie::config::HlmOptions;
//!
//! let options = HlmOptions::new("16", "0-5", "");
//! let resolved = options.resolve(32, 32).expect("valid options");
//! assert_eq!(resolved.bit_map.masks(), [1, 2, 4, 8, 16, 32]);
//! assert_eq!(resolved.geometry.bytes_per_plane(), 512);
//! ```

use alloc::string::String;

use heapless::Vec;
use itertools::{Either, Itertools};
use log::debug;

use crate::{
    error::ConfigError,
    geometry::{BitPlaneMap, OutputOffset, PLANE_CHANNELS, PanelGeometry, PanelSource, ScanDepth},
    panel_table::find_panel,
};

/// The option strings of one HLM stream, plus the repeat flag recorded in the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HlmOptions {
    /// Scan depth (`8`, `16`, `32`) or a named panel key.
    pub scan: String,
    /// Bit positions for R0,G0,B0,R1,G1,B1, e.g. `0-5` or `2,1,0,5,4,3`.
    pub bits: String,
    /// `ox,oy`, or empty for `0,0`.
    pub offset: String,
    /// Ask the player to loop the movie.
    pub repeat: bool,
}

impl Default for HlmOptions {
    fn default() -> Self {
        Self {
            scan: "16".into(),
            bits: String::new(),
            offset: String::new(),
            repeat: false,
        }
    }
}

/// Everything the bit-plane encoder needs, validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub geometry: PanelGeometry,
    pub bit_map: BitPlaneMap,
    pub offset: OutputOffset,
}

impl HlmOptions {
    #[must_use]
    pub fn new(scan: &str, bits: &str, offset: &str) -> Self {
        Self {
            scan: scan.into(),
            bits: bits.into(),
            offset: offset.into(),
            repeat: false,
        }
    }

    /// Resolve against an input stream of `width × height` pixels.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] in scan → bits → offset → canvas order.
    pub fn resolve(&self, width: usize, height: usize) -> Result<ResolvedConfig, ConfigError> {
        let source = parse_scan(&self.scan)?;
        let bit_map = parse_bits(&self.bits)?;
        let offset = parse_offset(&self.offset)?;
        let geometry = source.geometry(width, height)?;
        debug!(
            "resolved {}x{} canvas, scan {}, turnback {}, bits {:?}, offset {},{}",
            geometry.dest_width(),
            geometry.dest_height(),
            geometry.scan_rows(),
            geometry.turnback(),
            bit_map.positions(),
            offset.x,
            offset.y
        );
        Ok(ResolvedConfig {
            geometry,
            bit_map,
            offset,
        })
    }
}

/// Parse the scan specifier. Integer text selects direct-scan mode; anything else is a
/// panel key.
///
/// # Errors
///
/// [`ConfigError::EmptyScan`], [`ConfigError::UnsupportedScan`] for an integer other than
/// 8/16/32, [`ConfigError::UnknownPanel`] for a key missing from the table.
pub fn parse_scan(text: &str) -> Result<PanelSource, ConfigError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyScan);
    }
    if let Ok(scan) = trimmed.parse::<i64>() {
        return ScanDepth::from_rows(scan)
            .map(|depth| PanelSource::DirectScan { depth })
            .ok_or(ConfigError::UnsupportedScan { scan });
    }
    find_panel(trimmed)
        .map(|panel| PanelSource::NamedModule { panel })
        .ok_or_else(|| ConfigError::UnknownPanel {
            key: trimmed.into(),
        })
}

/// Parse a bit allocation such as `0-5`, `5-0` or `0,1,2,8-10`.
///
/// Ranges are inclusive and run in either direction. Exactly six distinct positions are
/// required.
///
/// # Errors
///
/// A [`ConfigError`] naming the offending byte position for malformed text, a position above
/// 15, a repeated position, or a count other than six.
pub fn parse_bits(text: &str) -> Result<BitPlaneMap, ConfigError> {
    if text.is_empty() {
        return Err(ConfigError::EmptyBits);
    }

    let mut cursor = BitCursor { text, position: 0 };
    let mut positions: Vec<u8, PLANE_CHANNELS> = Vec::new();
    loop {
        let token_start = cursor.position;
        let first = cursor.bit_position()?;
        let last = if cursor.eat(b'-') {
            cursor.bit_position()?
        } else {
            first
        };

        for bit in inclusive_range(first, last) {
            if positions.contains(&bit) {
                return Err(ConfigError::DuplicateBit {
                    bit,
                    position: token_start,
                });
            }
            positions.push(bit).map_err(|_| ConfigError::TooManyBits {
                position: token_start,
            })?;
        }

        match cursor.rest().chars().next() {
            None => break,
            Some(',') => cursor.advance(1),
            Some(ch) => {
                return Err(ConfigError::UnexpectedChar {
                    ch,
                    position: cursor.position,
                });
            }
        }
    }

    let array = <[u8; PLANE_CHANNELS]>::try_from(positions.as_slice()).map_err(|_| {
        ConfigError::TooFewBits {
            found: positions.len(),
        }
    })?;
    Ok(BitPlaneMap::new(array))
}

/// Parse `ox,oy`. Empty text is `0,0`.
///
/// # Errors
///
/// [`ConfigError::BadOffset`] for anything that is not two comma-separated integers.
pub fn parse_offset(text: &str) -> Result<OutputOffset, ConfigError> {
    if text.is_empty() {
        return Ok(OutputOffset::default());
    }
    let bad_offset = || ConfigError::BadOffset { text: text.into() };
    let (x_text, y_text) = text.split(',').collect_tuple().ok_or_else(bad_offset)?;
    let x = x_text.trim().parse().map_err(|_| bad_offset())?;
    let y = y_text.trim().parse().map_err(|_| bad_offset())?;
    Ok(OutputOffset { x, y })
}

fn inclusive_range(first: u8, last: u8) -> impl Iterator<Item = u8> {
    if first <= last {
        Either::Left(first..=last)
    } else {
        Either::Right((last..=first).rev())
    }
}

struct BitCursor<'a> {
    text: &'a str,
    position: usize,
}

impl<'a> BitCursor<'a> {
    fn rest(&self) -> &'a str {
        self.text.get(self.position..).unwrap_or_default()
    }

    const fn advance(&mut self, bytes: usize) {
        self.position = self.position.saturating_add(bytes);
    }

    fn eat(&mut self, expected: u8) -> bool {
        if self.rest().as_bytes().first() == Some(&expected) {
            self.advance(1);
            true
        } else {
            false
        }
    }

    /// A run of ASCII digits no greater than 15.
    fn bit_position(&mut self) -> Result<u8, ConfigError> {
        let start = self.position;
        let digits = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 {
            return Err(ConfigError::ExpectedNumber {
                position: start,
                found: self.rest().into(),
            });
        }
        let run = self.rest().get(..digits).unwrap_or_default();
        self.advance(digits);
        // Overlong runs saturate so they still report as too large.
        let value = run.parse::<u32>().unwrap_or(u32::MAX);
        u8::try_from(value)
            .ok()
            .filter(|&bit| bit <= BitPlaneMap::MAX_POSITION)
            .ok_or(ConfigError::BitTooLarge {
                value,
                position: start,
            })
    }
}
