//! The fixed binary header at the start of every movie file.
//!
//! Fields are little-endian and packed with no padding. HLM (LED panel, version 3):
//!
//! ```text
//! offset  size  field
//!  0      4     signature "HLM\0"
//!  4      2     header size (46)
//!  6      2     version (3)
//!  8      2     type (scan rows)
//! 10      2     width
//! 12      2     height
//! 14      2     fps numerator
//! 16      2     fps denominator
//! 18      4     frames
//! 22      4     flags
//! 26      8     panel configuration name, null padded
//! 34      4     frame size
//! 38      4     frame start (512)
//! 42      4     frame offset (stride)
//! ```
//!
//! HTL (TFT, version 1, type 1) has the same fields without the configuration name, for a
//! 38-byte header. Frame records follow back to back from `frame_start`.

use alloc::vec::Vec;

use heapless::String;

use crate::{
    Result,
    error::{Error, HeaderError},
};

/// Byte offset of the first frame record. The gap after the header is reserved.
pub const FRAME_START: u32 = 512;

/// Flag bit: the player should loop the movie.
pub const HLM_REPEAT: u32 = 0x1;

/// Length of the null-padded panel configuration field.
pub const PANEL_NAME_LEN: usize = 8;

/// Byte offset of the `frames` field in both layouts.
pub const FRAMES_FIELD_OFFSET: usize = 18;

/// The two movie layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MovieFormat {
    /// Humblesoft LED Movie: bit-plane frames for multiplexed LED panels.
    Hlm,
    /// Humblesoft TFT LCD: RGB565 frames.
    Htl,
}

impl MovieFormat {
    #[must_use]
    pub const fn signature(self) -> [u8; 4] {
        match self {
            Self::Hlm => *b"HLM\0",
            Self::Htl => *b"HTL\0",
        }
    }

    #[must_use]
    pub const fn version(self) -> u16 {
        match self {
            Self::Hlm => 3,
            Self::Htl => 1,
        }
    }

    /// Encoded header length in bytes.
    #[must_use]
    pub const fn header_size(self) -> u16 {
        match self {
            Self::Hlm => 46,
            Self::Htl => 38,
        }
    }

    /// HLM writes 0 at open and the emitted count at close. HTL writes the input's declared
    /// count at open and never touches it again.
    #[must_use]
    pub const fn patches_frame_count(self) -> bool {
        match self {
            Self::Hlm => true,
            Self::Htl => false,
        }
    }

    const fn has_panel_name(self) -> bool {
        matches!(self, Self::Hlm)
    }

    fn from_signature(signature: [u8; 4]) -> Option<Self> {
        [Self::Hlm, Self::Htl]
            .into_iter()
            .find(|format| format.signature() == signature)
    }
}

/// Frame rate as a ratio.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Rational {
    pub numerator: u16,
    pub denominator: u16,
}

impl Rational {
    #[must_use]
    pub const fn new(numerator: u16, denominator: u16) -> Self {
        Self {
            numerator,
            denominator,
        }
    }
}

/// A decoded or about-to-be-written header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub format: MovieFormat,
    pub kind: u16,
    pub width: u16,
    pub height: u16,
    pub fps: Rational,
    pub frames: u32,
    pub flags: u32,
    /// Empty for HTL and for direct-scan HLM.
    pub panel_name: String<PANEL_NAME_LEN>,
    pub frame_size: u32,
    pub frame_start: u32,
    pub frame_offset: u32,
}

impl Header {
    /// A zeroed header of `format` with the fixed fields filled in.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionOverflow`] when a dimension or the frame size does not fit its field.
    pub fn new(format: MovieFormat, width: usize, height: usize, frame_size: usize) -> Result<Self> {
        let frame_bytes = narrow(frame_size)?;
        Ok(Self {
            format,
            kind: 0,
            width: narrow(width)?,
            height: narrow(height)?,
            fps: Rational::new(0, 0),
            frames: 0,
            flags: 0,
            panel_name: String::new(),
            frame_size: frame_bytes,
            frame_start: FRAME_START,
            frame_offset: frame_bytes,
        })
    }

    /// Serialize field by field.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(usize::from(self.format.header_size()));
        bytes.extend_from_slice(&self.format.signature());
        bytes.extend_from_slice(&self.format.header_size().to_le_bytes());
        bytes.extend_from_slice(&self.format.version().to_le_bytes());
        bytes.extend_from_slice(&self.kind.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.fps.numerator.to_le_bytes());
        bytes.extend_from_slice(&self.fps.denominator.to_le_bytes());
        bytes.extend_from_slice(&self.frames.to_le_bytes());
        bytes.extend_from_slice(&self.flags.to_le_bytes());
        if self.format.has_panel_name() {
            let mut name = [0u8; PANEL_NAME_LEN];
            for (slot, &byte) in name.iter_mut().zip(self.panel_name.as_bytes()) {
                *slot = byte;
            }
            bytes.extend_from_slice(&name);
        }
        bytes.extend_from_slice(&self.frame_size.to_le_bytes());
        bytes.extend_from_slice(&self.frame_start.to_le_bytes());
        bytes.extend_from_slice(&self.frame_offset.to_le_bytes());
        bytes
    }

    /// Parse a header from the start of `bytes`; trailing bytes are ignored.
    ///
    /// # Errors
    ///
    /// [`HeaderError`] for short input, an unknown signature, a size field that disagrees
    /// with the signature, or a configuration name that is not UTF-8.
    pub fn decode(bytes: &[u8]) -> Result<Self, HeaderError> {
        let mut reader = FieldReader { bytes, position: 0 };
        let signature = reader.array::<4>()?;
        let format = MovieFormat::from_signature(signature)
            .ok_or(HeaderError::UnknownSignature { signature })?;
        let declared = reader.u16()?;
        if declared != format.header_size() {
            return Err(HeaderError::SizeMismatch {
                declared,
                expected: format.header_size(),
            });
        }
        if bytes.len() < usize::from(declared) {
            return Err(HeaderError::Truncated {
                needed: usize::from(declared),
                available: bytes.len(),
            });
        }

        let _version = reader.u16()?;
        let kind = reader.u16()?;
        let width = reader.u16()?;
        let height = reader.u16()?;
        let fps = Rational::new(reader.u16()?, reader.u16()?);
        let frames = reader.u32()?;
        let flags = reader.u32()?;
        let mut panel_name = String::new();
        if format.has_panel_name() {
            let raw = reader.array::<PANEL_NAME_LEN>()?;
            let len = raw.iter().position(|&byte| byte == 0).unwrap_or(PANEL_NAME_LEN);
            let text = core::str::from_utf8(raw.get(..len).unwrap_or_default())
                .map_err(|_| HeaderError::PanelName)?;
            panel_name
                .push_str(text)
                .map_err(|()| HeaderError::PanelName)?;
        }
        Ok(Self {
            format,
            kind,
            width,
            height,
            fps,
            frames,
            flags,
            panel_name,
            frame_size: reader.u32()?,
            frame_start: reader.u32()?,
            frame_offset: reader.u32()?,
        })
    }
}

fn narrow<T: TryFrom<usize>>(value: usize) -> Result<T> {
    T::try_from(value).map_err(|_| Error::DimensionOverflow(value))
}

struct FieldReader<'a> {
    bytes: &'a [u8],
    position: usize,
}

impl FieldReader<'_> {
    fn array<const N: usize>(&mut self) -> Result<[u8; N], HeaderError> {
        let end = self.position.saturating_add(N);
        let field = self
            .bytes
            .get(self.position..end)
            .and_then(|slice| <[u8; N]>::try_from(slice).ok())
            .ok_or(HeaderError::Truncated {
                needed: end,
                available: self.bytes.len(),
            })?;
        self.position = end;
        Ok(field)
    }

    fn u16(&mut self) -> Result<u16, HeaderError> {
        self.array().map(u16::from_le_bytes)
    }

    fn u32(&mut self) -> Result<u32, HeaderError> {
        self.array().map(u32::from_le_bytes)
    }
}
