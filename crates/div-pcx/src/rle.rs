/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The run-length state machine
//!
//! Two implicit modes per byte read: a byte with bits 6 and 7 both set
//! is a run header, anything else is a literal pixel. Decoding stops
//! when exactly `expected_len` pixels have been emitted, so the caller
//! can keep reading the trailing palette from the same stream.

use div_core::bytestream::{ByteReader, StreamError};
use div_core::palette::{ColorPalette, COLOR_TABLE_SIZE};

use crate::errors::PcxDecodeErrors;

/// Both bits set means the byte is a run header.
const RLE_COUNTER_MASK: u8 = 0xC0;
/// Clearing the counter bits yields the run length, 1..=63.
const RLE_CLEAR_MASK: u8 = 0x3F;
/// Marker preceding the 768-byte trailing palette.
pub const PALETTE_MARKER: u8 = 0x0C;

/// Decode the run-length pixel stream until exactly `expected_len`
/// bytes have been emitted.
///
/// The stream must be positioned at the first compressed byte. On
/// success the stream is left right after the pixel data, positioned on
/// the trailing palette block if the source carries one.
///
/// # Errors
/// - [`TruncatedPixels`](PcxDecodeErrors::TruncatedPixels) when the
///   stream ends before `expected_len` pixels are out
/// - [`RunOverflow`](PcxDecodeErrors::RunOverflow) when a run near the
///   boundary would emit past `expected_len`
pub fn decode_rle(
    stream: &mut ByteReader, expected_len: usize
) -> Result<Vec<u8>, PcxDecodeErrors> {
    let mut pixels = Vec::with_capacity(expected_len);

    while pixels.len() < expected_len {
        let byte = match stream.get_u8_err() {
            Ok(byte) => byte,
            Err(StreamError::NotEnoughBytes(..)) => {
                return Err(PcxDecodeErrors::TruncatedPixels(expected_len, pixels.len()))
            }
            Err(e) => return Err(e.into())
        };

        if (byte & RLE_COUNTER_MASK) == RLE_COUNTER_MASK {
            let count = usize::from(byte & RLE_CLEAR_MASK);
            let value = match stream.get_u8_err() {
                Ok(value) => value,
                Err(_) => {
                    return Err(PcxDecodeErrors::TruncatedPixels(expected_len, pixels.len()))
                }
            };

            if pixels.len() + count > expected_len {
                return Err(PcxDecodeErrors::RunOverflow(
                    expected_len,
                    pixels.len() + count
                ));
            }
            pixels.resize(pixels.len() + count, value);
        } else {
            pixels.push(byte);
        }
    }

    Ok(pixels)
}

/// Read the trailing embedded palette block: the marker byte followed
/// by exactly 768 RGB-domain bytes, converted to the DAC domain by
/// integer division by 4 per component.
pub fn read_trailing_palette(stream: &mut ByteReader) -> Result<ColorPalette, PcxDecodeErrors> {
    let marker = stream.get_u8_err()?;
    if marker != PALETTE_MARKER {
        return Err(PcxDecodeErrors::WrongPaletteMarker(marker));
    }

    let bytes = stream
        .get_as_ref(COLOR_TABLE_SIZE)
        .map_err(PcxDecodeErrors::IoErrors)?;

    Ok(ColorPalette::from_rgb_buffer(bytes)?)
}

#[cfg(test)]
mod tests {
    use div_core::bytestream::ByteReader;
    use div_core::color::Color;
    use div_core::errors::ErrorKind;

    use super::*;
    use crate::errors::PcxDecodeErrors;

    #[test]
    fn decodes_runs_and_literals() {
        // run header 0xC3 -> count=3, value=5; then literals 7, 9
        let data = [0xC3, 0x05, 0x07, 0x09];
        let mut stream = ByteReader::new(&data);

        let pixels = decode_rle(&mut stream, 5).unwrap();
        assert_eq!(pixels, vec![5, 5, 5, 7, 9]);
        assert!(stream.eof());
    }

    #[test]
    fn truncated_stream_is_an_io_error() {
        let data = [0xC3, 0x05];
        let mut stream = ByteReader::new(&data);

        let err = decode_rle(&mut stream, 10).unwrap_err();
        assert!(matches!(err, PcxDecodeErrors::TruncatedPixels(10, 3)));
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn overlong_run_is_a_format_error() {
        // the run would emit 3 pixels but only 2 are expected
        let data = [0xC3, 0x05];
        let mut stream = ByteReader::new(&data);

        let err = decode_rle(&mut stream, 2).unwrap_err();
        assert!(matches!(err, PcxDecodeErrors::RunOverflow(2, 3)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn run_header_cut_before_value_is_truncation() {
        let data = [0x01, 0xC3];
        let mut stream = ByteReader::new(&data);

        let err = decode_rle(&mut stream, 4).unwrap_err();
        assert!(matches!(err, PcxDecodeErrors::TruncatedPixels(4, 1)));
    }

    #[test]
    fn trailing_palette_is_divided_down_to_dac() {
        let mut data = vec![PALETTE_MARKER];
        data.extend((0..768).map(|i| (i % 256) as u8));
        let mut stream = ByteReader::new(&data);

        let palette = read_trailing_palette(&mut stream).unwrap();
        assert_eq!(palette.get(0).unwrap(), Color::new(0, 0, 0));
        assert_eq!(palette.get(1).unwrap(), Color::new(0, 1, 1));
        // entry 85 reads bytes 255, 0, 1 of the table
        assert_eq!(palette.get(85).unwrap(), Color::new(63, 0, 0));
    }

    #[test]
    fn wrong_marker_is_rejected() {
        let data = [0x0B; 769];
        let mut stream = ByteReader::new(&data);

        let err = read_trailing_palette(&mut stream).unwrap_err();
        assert!(matches!(err, PcxDecodeErrors::WrongPaletteMarker(0x0B)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
