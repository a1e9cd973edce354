//! Print the header of an existing movie and check the file length against it.

use std::{fs::File, io::Read, path::Path};

use led_movie::{Header, MovieFormat};
use owo_colors::OwoColorize;

use crate::BoxError;

/// Covers the longest header layout.
const HEADER_READ_LEN: u64 = 64;

pub fn inspect(path: &Path) -> Result<(), BoxError> {
    let mut file = File::open(path)?;
    let file_len = file.metadata()?.len();
    let mut head = Vec::new();
    file.by_ref().take(HEADER_READ_LEN).read_to_end(&mut head)?;
    let header = Header::decode(&head)?;

    println!("{}", path.display().cyan());
    for (field, value) in describe(&header) {
        println!("  {:<13} {value}", field.bright_black());
    }

    let expected = expected_len(&header);
    if file_len == expected {
        println!("{}", format!("File length {file_len} matches the header").green());
    } else {
        println!(
            "{}",
            format!("File length {file_len}, header implies {expected}").yellow()
        );
    }
    Ok(())
}

fn describe(header: &Header) -> Vec<(&'static str, String)> {
    let format = match header.format {
        MovieFormat::Hlm => "HLM (LED panel)",
        MovieFormat::Htl => "HTL (TFT RGB565)",
    };
    let mut fields = vec![
        ("format", format.to_owned()),
        ("type", header.kind.to_string()),
        ("size", format!("{}x{}", header.width, header.height)),
        (
            "fps",
            format!("{}/{}", header.fps.numerator, header.fps.denominator),
        ),
        ("frames", header.frames.to_string()),
        ("flags", format!("{:#x}", header.flags)),
    ];
    if header.format == MovieFormat::Hlm {
        let name = if header.panel_name.is_empty() {
            "(direct scan)"
        } else {
            header.panel_name.as_str()
        };
        fields.push(("panel", name.to_owned()));
    }
    fields.extend([
        ("frame size", header.frame_size.to_string()),
        ("frame start", header.frame_start.to_string()),
        ("frame offset", header.frame_offset.to_string()),
    ]);
    fields
}

/// Length a file with `header` should have. A stream closed without frames holds only its
/// header, since nothing was written past the reserved gap.
fn expected_len(header: &Header) -> u64 {
    if header.frames == 0 {
        return u64::from(header.format.header_size());
    }
    u64::from(header.frame_start) + u64::from(header.frames) * u64::from(header.frame_offset)
}
