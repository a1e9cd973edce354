//! Host-level tests for whole streams: header, frame records, close-time patching.

use std::io::{Read, Seek, SeekFrom};

use led_movie::{
    ConfigError, Error, Header, HeaderError, HlmOptions, IoSink, MemorySink, MovieFormat,
    MovieWriter, RGB8, Rational, StreamInfo,
    header::{FRAME_START, FRAMES_FIELD_OFFSET, HLM_REPEAT},
};

const DATA_START: usize = FRAME_START as usize;

fn solid_frame(width: usize, height: usize, rgba: [u8; 4]) -> Vec<u8> {
    rgba.repeat(width * height)
}

fn stream(width: usize, height: usize) -> StreamInfo {
    StreamInfo::new(width, height, Rational::new(30, 1))
}

#[test]
fn white_frame_sets_every_mask_bit() {
    let options = HlmOptions::new("16", "0-5", "");
    let mut writer =
        MovieWriter::open_hlm(MemorySink::new(), &options, &stream(32, 32)).expect("open");
    writer
        .write_frame(&solid_frame(32, 32, [255, 255, 255, 255]))
        .expect("frame");

    assert_eq!(writer.frame_buffer().len(), 512 * 8);
    assert!(writer.frame_buffer().iter().all(|&byte| byte == 0x3F));

    let bytes = writer.finish().expect("close").into_bytes();
    assert_eq!(bytes.len(), DATA_START + 4096);
    assert!(bytes[DATA_START..].iter().all(|&byte| byte == 0x3F));
    // The reserved gap between header and first frame stays zero.
    assert!(bytes[46..DATA_START].iter().all(|&byte| byte == 0));
}

#[test]
fn alpha_is_ignored() {
    let options = HlmOptions::new("16", "0-5", "");
    let mut writer =
        MovieWriter::open_hlm(MemorySink::new(), &options, &stream(32, 32)).expect("open");
    writer
        .write_frame(&solid_frame(32, 32, [255, 255, 255, 0]))
        .expect("frame");
    assert!(writer.frame_buffer().iter().all(|&byte| byte == 0x3F));
}

#[test]
fn unknown_panel_fails_before_any_write() {
    let mut sink = MemorySink::new();
    let options = HlmOptions::new("Z9", "0-5", "");
    let error = MovieWriter::open_hlm(&mut sink, &options, &stream(32, 32))
        .err()
        .expect("Z9 is not a panel");
    assert!(matches!(
        error,
        Error::Config(ConfigError::UnknownPanel { ref key }) if key == "Z9"
    ));
    assert!(sink.as_bytes().is_empty());
}

#[test]
fn five_bits_fails_before_any_write() {
    let mut sink = MemorySink::new();
    let options = HlmOptions::new("16", "0,1,2,3,4", "");
    let error = MovieWriter::open_hlm(&mut sink, &options, &stream(32, 32))
        .err()
        .expect("five bits are not enough");
    assert!(matches!(
        error,
        Error::Config(ConfigError::TooFewBits { found: 5 })
    ));
    assert!(sink.as_bytes().is_empty());
}

#[test]
fn oversized_hlm_canvas_fails_before_any_write() {
    let mut sink = MemorySink::new();
    let options = HlmOptions::new("16", "0-5", "");
    let error = MovieWriter::open_hlm(&mut sink, &options, &stream(usize::MAX / 4, 32))
        .err()
        .expect("frame size overflows");
    assert!(matches!(
        error,
        Error::Config(ConfigError::CanvasTooLarge { height: 32, .. })
    ));
    assert!(sink.as_bytes().is_empty());
}

#[test]
fn oversized_htl_canvas_fails_before_any_write() {
    let mut sink = MemorySink::new();
    let error = MovieWriter::open_htl(&mut sink, &stream(usize::MAX / 2, 3))
        .err()
        .expect("frame size overflows");
    assert!(matches!(error, Error::DimensionOverflow(_)));
    assert!(sink.as_bytes().is_empty());

    // Fits in memory but not in the 16-bit width field.
    let error = MovieWriter::open_htl(&mut sink, &stream(70_000, 1))
        .err()
        .expect("width exceeds the header field");
    assert!(matches!(error, Error::DimensionOverflow(70_000)));
    assert!(sink.as_bytes().is_empty());
}

#[test]
fn hlm_header_layout() {
    let mut options = HlmOptions::new("B4", "0-5", "");
    options.repeat = true;
    let writer = MovieWriter::open_hlm(MemorySink::new(), &options, &stream(640, 480))
        .expect("open");
    let header = writer.header().clone();
    let bytes = writer.finish().expect("close").into_bytes();

    assert_eq!(&bytes[0..4], b"HLM\0");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 46);
    assert_eq!(u16::from_le_bytes([bytes[6], bytes[7]]), 3);
    assert_eq!(&bytes[26..34], b"B4\0\0\0\0\0\0");
    assert_eq!(
        u32::from_le_bytes([bytes[38], bytes[39], bytes[40], bytes[41]]),
        512
    );

    assert_eq!(header.format, MovieFormat::Hlm);
    assert_eq!(header.kind, 16);
    assert_eq!((header.width, header.height), (64, 64));
    assert_eq!(header.fps, Rational::new(30, 1));
    assert_eq!(header.flags, HLM_REPEAT);
    assert_eq!(header.panel_name.as_str(), "B4");
    assert_eq!(header.frame_size, 64 * 64 / 2 * 8);
    assert_eq!(header.frame_offset, header.frame_size);
    assert_eq!(header.frame_start, FRAME_START);
}

#[test]
fn hlm_close_patches_only_the_frame_count() {
    let options = HlmOptions::new("16", "0-5", "");
    let mut writer =
        MovieWriter::open_hlm(MemorySink::new(), &options, &stream(32, 32)).expect("open");
    let opened = writer.header().clone();
    let opened_bytes = opened.encode();
    assert_eq!(opened.frames, 0);

    let frame = solid_frame(32, 32, [10, 20, 30, 255]);
    for _ in 0..3 {
        writer.write_frame(&frame).expect("frame");
    }
    assert_eq!(writer.frame_count(), 3);
    let bytes = writer.finish().expect("close").into_bytes();

    let closed = Header::decode(&bytes).expect("decodes");
    let mut expected = opened;
    expected.frames = 3;
    assert_eq!(closed, expected);

    for (index, (&before, &after)) in opened_bytes.iter().zip(&bytes).enumerate() {
        if !(FRAMES_FIELD_OFFSET..FRAMES_FIELD_OFFSET + 4).contains(&index) {
            assert_eq!(before, after, "header byte {index} changed");
        }
    }
    assert_eq!(bytes.len(), DATA_START + 3 * 4096);
}

#[test]
fn htl_keeps_declared_frame_count() {
    let info = stream(2, 1).with_declared_frames(7);
    let mut writer = MovieWriter::open_htl(MemorySink::new(), &info).expect("open");
    writer
        .write_frame(&[255, 0, 0, 255, 0, 255, 0, 0])
        .expect("frame");
    let bytes = writer.finish().expect("close").into_bytes();

    let header = Header::decode(&bytes).expect("decodes");
    assert_eq!(&bytes[0..4], b"HTL\0");
    assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), 38);
    assert_eq!(header.format, MovieFormat::Htl);
    assert_eq!(header.kind, 1);
    assert_eq!(header.frames, 7);
    assert_eq!(header.frame_size, 4);
    assert!(header.panel_name.is_empty());
    assert_eq!(&bytes[DATA_START..], [0xF8, 0x00, 0x07, 0xE0]);
}

#[test]
fn wrong_frame_length_writes_nothing() {
    let options = HlmOptions::new("16", "0-5", "");
    let mut writer =
        MovieWriter::open_hlm(MemorySink::new(), &options, &stream(32, 32)).expect("open");
    let error = writer.write_frame(&[0; 16]).expect_err("too short");
    assert!(matches!(
        error,
        Error::FrameLength {
            expected: 4096,
            actual: 16,
            ..
        }
    ));
    assert_eq!(writer.frame_count(), 0);
    let bytes = writer.finish().expect("close").into_bytes();
    assert_eq!(bytes.len(), 46);
}

#[test]
fn offset_crops_pixels_pushed_off_canvas() {
    let options = HlmOptions::new("16", "0-5", "16,0");
    let mut writer =
        MovieWriter::open_hlm(MemorySink::new(), &options, &stream(32, 32)).expect("open");
    writer
        .write_frame(&solid_frame(32, 32, [255, 255, 255, 255]))
        .expect("frame");

    let buffer = writer.frame_buffer();
    for plane in 0..8 {
        for scan_row in 0..16 {
            for column in 0..32 {
                let byte = buffer[plane * 512 + scan_row * 32 + column];
                let expected = if column < 16 { 0 } else { 0x3F };
                assert_eq!(byte, expected, "plane {plane} row {scan_row} col {column}");
            }
        }
    }
}

#[test]
fn named_panel_accepts_other_input_sizes() {
    // A4 is 64x32 with turnback; feed a smaller frame with a red top-left pixel.
    let options = HlmOptions::new("A4", "0-5", "");
    let mut writer =
        MovieWriter::open_hlm(MemorySink::new(), &options, &stream(8, 8)).expect("open");
    let mut frame = solid_frame(8, 8, [0, 0, 0, 255]);
    frame[..4].copy_from_slice(&[255, 0, 0, 255]);
    writer.write_frame(&frame).expect("frame");

    let encoder = writer.encoder();
    let top_left = encoder.geometry().map_pixel(0, 0).expect("on canvas");
    let next = encoder.geometry().map_pixel(1, 0).expect("on canvas");
    assert_eq!(
        encoder
            .packer()
            .read(writer.frame_buffer(), top_left)
            .expect("in bounds"),
        RGB8::new(255, 0, 0)
    );
    assert_eq!(
        encoder
            .packer()
            .read(writer.frame_buffer(), next)
            .expect("in bounds"),
        RGB8::new(0, 0, 0)
    );
    assert_eq!(writer.header().width, 64);
    assert_eq!(writer.header().height, 32);
}

#[test]
fn file_sink_round_trip() {
    let file = tempfile::tempfile().expect("temp file");
    let options = HlmOptions::new("8", "0-5", "");
    let mut writer =
        MovieWriter::open_hlm(IoSink::new(file), &options, &stream(16, 16)).expect("open");
    let frame = solid_frame(16, 16, [0, 128, 255, 255]);
    writer.write_frame(&frame).expect("frame");
    writer.write_frame(&frame).expect("frame");

    let mut file = writer.finish().expect("close").into_inner();
    file.seek(SeekFrom::Start(0)).expect("rewind");
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).expect("read back");

    let header = Header::decode(&bytes).expect("decodes");
    assert_eq!(header.frames, 2);
    assert_eq!(header.frame_size, 16 * 16 / 2 * 8);
    assert_eq!(
        bytes.len(),
        DATA_START + 2 * header.frame_size as usize
    );
}

#[test]
fn truncated_or_foreign_headers_are_rejected() {
    assert_eq!(
        Header::decode(b"HL"),
        Err(HeaderError::Truncated {
            needed: 4,
            available: 2
        })
    );
    assert_eq!(
        Header::decode(b"RIFF\x2e\x00"),
        Err(HeaderError::UnknownSignature {
            signature: *b"RIFF"
        })
    );
    assert_eq!(
        Header::decode(b"HLM\0\x26\x00"),
        Err(HeaderError::SizeMismatch {
            declared: 38,
            expected: 46
        })
    );
    assert_eq!(
        Header::decode(b"HLM\0\x2e\x00\x03\x00"),
        Err(HeaderError::Truncated {
            needed: 46,
            available: 8
        })
    );
}
