//! One output stream: header at open, fixed-size frame records, frame count patched at close.
//!
//! ```text
//! open_hlm / open_htl  ──►  write_frame × N  ──►  finish
//!   resolve options            zero buffer          HLM: patch frames, rewrite header
//!   allocate buffer            encode               HTL: keep declared count
//!   write header, seek 512     write record
//! ```
//!
//! A configuration or allocation failure in `open_*` happens before the sink sees any byte.
//! `finish` consumes the writer, so a stream can be closed only once.
//!
//! ```
//! use led_movie::{HlmOptions, MemorySink, MovieWriter, Rational, StreamInfo};
//!
//! let stream = StreamInfo::new(32, 32, Rational::new(30, 1));
//! let options = HlmOptions::new("16", "0-5", "");
//! let mut writer = MovieWriter::open_hlm(MemorySink::new(), &options, &stream)?;
//! writer.write_frame(&[255; 32 * 32 * 4])?;
//! let bytes = writer.finish()?.into_bytes();
//! assert_eq!(bytes.len(), 512 + 4096);
//! # Ok::<(), led_movie::Error>(())
//! ```

use alloc::vec::Vec;

use log::{debug, info};

use crate::{
    Result,
    config::HlmOptions,
    encoder::{BitPlaneEncoder, FrameEncoder, Rgb565Encoder},
    error::Error,
    frame::RgbaFrame,
    header::{HLM_REPEAT, Header, MovieFormat, Rational},
    sink::FrameSink,
};

/// What the demuxer knows about the input video stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StreamInfo {
    pub width: usize,
    pub height: usize,
    pub fps: Rational,
    /// Frame count declared by the input container, 0 when unknown.
    pub declared_frames: u32,
}

impl StreamInfo {
    #[must_use]
    pub const fn new(width: usize, height: usize, fps: Rational) -> Self {
        Self {
            width,
            height,
            fps,
            declared_frames: 0,
        }
    }

    #[must_use]
    pub const fn with_declared_frames(self, declared_frames: u32) -> Self {
        Self {
            declared_frames,
            ..self
        }
    }
}

/// An open movie stream that owns its sink, encoder and frame buffer.
#[derive(Debug)]
pub struct MovieWriter<S, E> {
    sink: S,
    encoder: E,
    header: Header,
    buffer: Vec<u8>,
    source_width: usize,
    source_height: usize,
    frame_count: u32,
}

impl<S: FrameSink> MovieWriter<S, BitPlaneEncoder> {
    /// Open an HLM stream for LED panels.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] for bad options or a canvas too large to address, [`Error::Allocation`]
    /// when the frame buffer cannot be reserved (both before anything is written),
    /// [`Error::DimensionOverflow`] for a canvas too large for the header, or a sink error.
    pub fn open_hlm(sink: S, options: &HlmOptions, stream: &StreamInfo) -> Result<Self> {
        let resolved = options.resolve(stream.width, stream.height)?;
        let geometry = resolved.geometry;
        let encoder = BitPlaneEncoder::new(resolved);

        let mut header = Header::new(
            MovieFormat::Hlm,
            geometry.dest_width(),
            geometry.dest_height(),
            encoder.frame_size(),
        )?;
        header.kind = u16::try_from(geometry.scan_rows())
            .map_err(|_| Error::DimensionOverflow(geometry.scan_rows()))?;
        header.fps = stream.fps;
        if options.repeat {
            header.flags |= HLM_REPEAT;
        }
        if let Some(key) = geometry.source().key() {
            // Table keys are at most PANEL_NAME_LEN bytes.
            header
                .panel_name
                .push_str(key)
                .map_err(|()| Error::DimensionOverflow(key.len()))?;
        }

        Self::open(sink, encoder, header, stream)
    }
}

impl<S: FrameSink> MovieWriter<S, Rgb565Encoder> {
    /// Open an HTL stream for RGB565 TFT LCDs.
    ///
    /// The canvas is the input size and the header keeps the input's declared frame count.
    ///
    /// # Errors
    ///
    /// [`Error::DimensionOverflow`] when the canvas does not fit memory or the header (before
    /// anything is written), [`Error::Allocation`], or a sink error.
    pub fn open_htl(sink: S, stream: &StreamInfo) -> Result<Self> {
        let encoder = Rgb565Encoder::new(stream.width, stream.height)?;
        let mut header = Header::new(
            MovieFormat::Htl,
            stream.width,
            stream.height,
            encoder.frame_size(),
        )?;
        header.kind = 1;
        header.fps = stream.fps;
        header.frames = stream.declared_frames;

        Self::open(sink, encoder, header, stream)
    }
}

impl<S: FrameSink, E: FrameEncoder> MovieWriter<S, E> {
    fn open(mut sink: S, encoder: E, header: Header, stream: &StreamInfo) -> Result<Self> {
        let buffer = allocate_frame_buffer(encoder.frame_size())?;

        sink.write_all(&header.encode())?;
        sink.seek_to(u64::from(header.frame_start))?;
        info!(
            "{:?} stream open: {}x{} canvas, {} bytes per frame",
            header.format, header.width, header.height, header.frame_size
        );

        Ok(Self {
            sink,
            encoder,
            header,
            buffer,
            source_width: stream.width,
            source_height: stream.height,
            frame_count: 0,
        })
    }

    /// Encode one RGBA frame of the stream's input size and append its record.
    ///
    /// # Errors
    ///
    /// [`Error::FrameLength`] for a wrongly sized frame (nothing is written),
    /// [`Error::BoundsViolation`] for an addressing defect, or a sink error.
    pub fn write_frame(&mut self, rgba: &[u8]) -> Result<()> {
        let frame = RgbaFrame::new(self.source_width, self.source_height, rgba)?;
        self.buffer.fill(0);
        self.encoder.encode(&frame, &mut self.buffer)?;
        self.sink.write_all(&self.buffer)?;
        self.frame_count = self.frame_count.saturating_add(1);
        debug!("wrote frame {}", self.frame_count);
        Ok(())
    }

    /// Frames written so far.
    #[must_use]
    pub const fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// The header as written at open.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    #[must_use]
    pub const fn encoder(&self) -> &E {
        &self.encoder
    }

    /// The last record written; all zeros before the first frame.
    #[must_use]
    pub fn frame_buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Close the stream and hand back the sink.
    ///
    /// HLM patches the frame count into the header.
    ///
    /// # Errors
    ///
    /// A sink error while flushing or rewriting the header.
    pub fn finish(mut self) -> Result<S> {
        if self.header.format.patches_frame_count() {
            self.header.frames = self.frame_count;
            self.sink.seek_to(0)?;
            self.sink.write_all(&self.header.encode())?;
        }
        self.sink.flush()?;
        info!(
            "{:?} stream closed after {} frames",
            self.header.format, self.frame_count
        );
        Ok(self.sink)
    }
}

fn allocate_frame_buffer(bytes: usize) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(bytes)
        .map_err(|_| Error::Allocation { bytes })?;
    buffer.resize(bytes, 0);
    Ok(buffer)
}
