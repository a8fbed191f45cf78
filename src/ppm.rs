//! Plain-text PPM (`P3`) image I/O.
//!
//! ```text
//! P3
//! <width> <height>
//! 255
//! <r> <g> <b>      one line per pixel, row-major, top row first
//! ```
//!
//! Channel values are written as-is; nothing clamps them to [0, 255].

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::math::vec3::Vec3i;
use crate::render::FrameBuffer;

const MAGIC: &str = "P3";
const MAX_VALUE: u32 = 255;

#[derive(Debug, Error)]
pub enum PpmError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("unsupported PPM variant: {0}")]
    UnsupportedFormat(String),

    #[error("expected {expected} pixels, found {found}")]
    Dimensions { expected: usize, found: usize },
}

/// A decoded P3 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpmImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Vec3i>,
}

impl PpmImage {
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Vec3i> {
        if x < self.width && y < self.height {
            self.pixels
                .get(y as usize * self.width as usize + x as usize)
                .copied()
        } else {
            None
        }
    }
}

/// Serializes a row-major pixel buffer as P3.
pub fn write_ppm<W: Write>(
    writer: &mut W,
    width: u32,
    height: u32,
    pixels: &[Vec3i],
) -> Result<(), PpmError> {
    let expected = width as usize * height as usize;
    if pixels.len() != expected {
        return Err(PpmError::Dimensions {
            expected,
            found: pixels.len(),
        });
    }

    write!(writer, "{MAGIC}\n{width} {height}\n{MAX_VALUE}\n")?;
    for pixel in pixels {
        writeln!(writer, "{} {} {}", pixel.x, pixel.y, pixel.z)?;
    }
    Ok(())
}

/// Writes the framebuffer's color buffer to `path`.
pub fn save<P: AsRef<Path>>(path: P, buffer: &FrameBuffer) -> Result<(), PpmError> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_ppm(&mut writer, buffer.width(), buffer.height(), buffer.pixels())?;
    writer.flush()?;
    log::info!(
        "wrote {}x{} image to {}",
        buffer.width(),
        buffer.height(),
        path.display()
    );
    Ok(())
}

/// Parses a P3 image. `#` starts a comment running to the end of the line.
pub fn read_ppm<R: BufRead>(reader: R) -> Result<PpmImage, PpmError> {
    let mut tokens = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let content = line.split_once('#').map_or(line.as_str(), |(head, _)| head);
        tokens.extend(
            content
                .split_whitespace()
                .map(|token| (index + 1, token.to_string())),
        );
    }
    let mut tokens = tokens.into_iter();

    let (_, magic) = tokens.next().ok_or_else(|| PpmError::Parse {
        line: 1,
        message: "empty file".to_string(),
    })?;
    if magic != MAGIC {
        return Err(PpmError::UnsupportedFormat(magic));
    }

    let width: u32 = parse_header_field(&mut tokens, "width")?;
    let height: u32 = parse_header_field(&mut tokens, "height")?;
    let max_value: u32 = parse_header_field(&mut tokens, "max value")?;
    if max_value != MAX_VALUE {
        return Err(PpmError::UnsupportedFormat(format!(
            "max value {max_value}, only {MAX_VALUE} is supported"
        )));
    }

    let channels = tokens
        .map(|(line, token)| {
            token.parse::<i32>().map_err(|e| PpmError::Parse {
                line,
                message: format!("invalid channel value '{token}': {e}"),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let expected = width as usize * height as usize;
    if channels.len() != expected * 3 {
        return Err(PpmError::Dimensions {
            expected,
            found: channels.len() / 3,
        });
    }

    let pixels = channels
        .chunks_exact(3)
        .map(|c| Vec3i::new(c[0], c[1], c[2]))
        .collect();

    Ok(PpmImage {
        width,
        height,
        pixels,
    })
}

/// Reads a P3 image from `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<PpmImage, PpmError> {
    read_ppm(BufReader::new(File::open(path)?))
}

fn parse_header_field<I>(tokens: &mut I, name: &str) -> Result<u32, PpmError>
where
    I: Iterator<Item = (usize, String)>,
{
    let (line, token) = tokens.next().ok_or_else(|| PpmError::Parse {
        line: 0,
        message: format!("missing {name}"),
    })?;
    token.parse().map_err(|e| PpmError::Parse {
        line,
        message: format!("invalid {name} '{token}': {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pixels() -> Vec<Vec3i> {
        vec![
            Vec3i::new(255, 0, 0),
            Vec3i::new(0, 255, 0),
            Vec3i::new(0, 0, 255),
            Vec3i::new(10, 20, 30),
        ]
    }

    #[test]
    fn writes_header_and_one_line_per_pixel() {
        let mut out = Vec::new();
        write_ppm(&mut out, 2, 2, &sample_pixels()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "P3\n2 2\n255\n255 0 0\n0 255 0\n0 0 255\n10 20 30\n"
        );
    }

    #[test]
    fn round_trip_preserves_order() {
        let mut out = Vec::new();
        write_ppm(&mut out, 2, 2, &sample_pixels()).unwrap();
        let image = read_ppm(out.as_slice()).unwrap();
        assert_eq!(image.width, 2);
        assert_eq!(image.height, 2);
        assert_eq!(image.pixels, sample_pixels());
        assert_eq!(image.get_pixel(1, 1), Some(Vec3i::new(10, 20, 30)));
        assert_eq!(image.get_pixel(2, 0), None);
    }

    #[test]
    fn out_of_range_channels_pass_through() {
        let pixels = [Vec3i::new(300, -1, 0)];
        let mut out = Vec::new();
        write_ppm(&mut out, 1, 1, &pixels).unwrap();
        assert!(String::from_utf8(out.clone()).unwrap().ends_with("300 -1 0\n"));
        assert_eq!(read_ppm(out.as_slice()).unwrap().pixels, pixels);
    }

    #[test]
    fn mismatched_buffer_is_rejected() {
        let mut out = Vec::new();
        let err = write_ppm(&mut out, 3, 3, &sample_pixels()).unwrap_err();
        assert!(matches!(
            err,
            PpmError::Dimensions {
                expected: 9,
                found: 4
            }
        ));
    }

    #[test]
    fn reader_skips_comments_and_free_whitespace() {
        let text = "P3 # made by hand\n1 2\n255\n1 2 3 4\n5 6\n";
        let image = read_ppm(text.as_bytes()).unwrap();
        assert_eq!(
            image.pixels,
            vec![Vec3i::new(1, 2, 3), Vec3i::new(4, 5, 6)]
        );
    }

    #[test]
    fn reader_rejects_other_formats() {
        assert!(matches!(
            read_ppm("P6\n1 1\n255\n".as_bytes()),
            Err(PpmError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            read_ppm("P3\n1 1\n65535\n0 0 0\n".as_bytes()),
            Err(PpmError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn reader_reports_bad_tokens_with_line() {
        let err = read_ppm("P3\n1 1\n255\n0 x 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, PpmError::Parse { line: 4, .. }));
    }

    #[test]
    fn reader_rejects_truncated_pixel_data() {
        let err = read_ppm("P3\n2 1\n255\n0 0 0\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            PpmError::Dimensions {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn save_fails_for_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let buffer = FrameBuffer::new(1, 1);
        let result = save(dir.path().join("missing").join("out.ppm"), &buffer);
        assert!(matches!(result, Err(PpmError::Io(_))));
    }

    #[test]
    fn save_and_load_framebuffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.ppm");
        let mut buffer = FrameBuffer::new(2, 1);
        buffer.set_pixel(1, 0, Vec3i::new(7, 8, 9));
        save(&path, &buffer).unwrap();

        let image = load(&path).unwrap();
        assert_eq!(image.pixels, buffer.pixels());
    }
}
