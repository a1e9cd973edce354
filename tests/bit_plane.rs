//! Host-level tests for packing pixels into bit-planes.

use led_movie::{
    BitPlanePacker, Error, PanelGeometry, Plane, PlaneAddress, RGB8, ScanDepth,
    config::parse_bits,
};

const BYTES_PER_PLANE: usize = 512;

fn packer(bits: &str) -> BitPlanePacker {
    BitPlanePacker::new(parse_bits(bits).expect("valid bits"), BYTES_PER_PLANE)
}

fn frame_buffer() -> Vec<u8> {
    vec![0; BYTES_PER_PLANE * 8]
}

fn plane_bytes(buffer: &[u8], byte_offset: usize) -> Vec<u8> {
    (0..8)
        .map(|plane| buffer[byte_offset + plane * BYTES_PER_PLANE])
        .collect()
}

const UPPER: PlaneAddress = PlaneAddress {
    byte_offset: 0,
    plane: Plane::Upper,
};
const LOWER: PlaneAddress = PlaneAddress {
    byte_offset: 0,
    plane: Plane::Lower,
};

#[test]
fn msb_goes_to_first_plane() {
    let packer = packer("0-5");
    let mut buffer = frame_buffer();
    packer
        .pack(&mut buffer, UPPER, RGB8::new(0x80, 0, 0x01))
        .expect("in bounds");

    // R0 is bit 0 and B0 is bit 2.
    assert_eq!(plane_bytes(&buffer, 0), [0x01, 0, 0, 0, 0, 0, 0, 0x04]);
    assert!(buffer.iter().filter(|&&byte| byte != 0).count() == 2);
}

#[test]
fn channel_values_round_trip() {
    let geometry = PanelGeometry::direct_scan(ScanDepth::Sixteen, 32, 32).expect("geometry");
    let packer = packer("2,1,0,5,4,3");
    let mut buffer = frame_buffer();

    for value in 0..=255u8 {
        let x = usize::from(value) % 32;
        let y = usize::from(value) / 32 * 4;
        let address = geometry.map_pixel(x, y).expect("on canvas");
        let rgb = RGB8::new(value, !value, value ^ 0x5A);
        packer.pack(&mut buffer, address, rgb).expect("in bounds");
        assert_eq!(packer.read(&buffer, address).expect("in bounds"), rgb);
    }
}

#[test]
fn ports_share_a_byte_without_clobbering() {
    let packer = packer("0-5");
    let mut buffer = frame_buffer();
    let white = RGB8::new(255, 255, 255);
    let black = RGB8::new(0, 0, 0);

    packer.pack(&mut buffer, UPPER, white).expect("in bounds");
    packer.pack(&mut buffer, LOWER, black).expect("in bounds");
    assert_eq!(plane_bytes(&buffer, 0), [0x07; 8]);

    packer.pack(&mut buffer, LOWER, white).expect("in bounds");
    assert_eq!(plane_bytes(&buffer, 0), [0x3F; 8]);

    packer.pack(&mut buffer, UPPER, black).expect("in bounds");
    assert_eq!(plane_bytes(&buffer, 0), [0x38; 8]);
    assert_eq!(packer.read(&buffer, LOWER).expect("in bounds"), white);
    assert_eq!(packer.read(&buffer, UPPER).expect("in bounds"), black);
}

#[test]
fn bits_above_the_byte_are_never_written() {
    let packer = packer("8-13");
    let mut buffer = frame_buffer();
    packer
        .pack(&mut buffer, UPPER, RGB8::new(255, 255, 255))
        .expect("in bounds");
    assert!(buffer.iter().all(|&byte| byte == 0));
    assert_eq!(
        packer.read(&buffer, UPPER).expect("in bounds"),
        RGB8::new(0, 0, 0)
    );
}

#[test]
fn write_past_buffer_is_a_bounds_violation() {
    let packer = packer("0-5");
    let mut short = vec![0; BYTES_PER_PLANE * 8 - 1];
    let last = PlaneAddress {
        byte_offset: BYTES_PER_PLANE - 1,
        plane: Plane::Upper,
    };

    let error = packer
        .pack(&mut short, last, RGB8::new(255, 255, 255))
        .expect_err("last plane byte is missing");
    assert!(matches!(
        error,
        Error::BoundsViolation {
            offset: 4095,
            len: 4095
        }
    ));
    // Nothing was half-written.
    assert!(short.iter().all(|&byte| byte == 0));
}

#[test]
fn offset_beyond_one_plane_is_a_bounds_violation() {
    let packer = packer("0-5");
    let mut buffer = frame_buffer();
    let spilled = PlaneAddress {
        byte_offset: BYTES_PER_PLANE,
        plane: Plane::Lower,
    };
    assert!(matches!(
        packer.pack(&mut buffer, spilled, RGB8::new(1, 2, 3)),
        Err(Error::BoundsViolation { .. })
    ));
    assert!(matches!(
        packer.read(&buffer, spilled),
        Err(Error::BoundsViolation { .. })
    ));
}
