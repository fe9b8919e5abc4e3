/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use div_core::bytestream::ByteReader;
use div_core::palette::{ColorPalette, COLOR_TABLE_SIZE};
use log::trace;

use crate::errors::PcxDecodeErrors;
use crate::rle::{decode_rle, read_trailing_palette, PALETTE_MARKER};

/// Fixed PCX header size.
const HEADER_LENGTH: usize = 128;

const SIGNATURE: u8 = 0x0A;
const MAX_VERSION: u8 = 5;
const RLE_ENCODED: u8 = 1;
const BPP_8: u8 = 8;

/// Offsets of the max-x / max-y words in the header.
const XMAX_POSITION: usize = 8;
const YMAX_POSITION: usize = 10;

/// Check whether `bytes` looks like an 8-bpp PCX with a trailing
/// 256-color palette, without decoding anything.
pub fn probe_pcx(bytes: &[u8]) -> bool {
    if bytes.len() < HEADER_LENGTH + COLOR_TABLE_SIZE + 1 {
        return false;
    }

    bytes[0] == SIGNATURE
        && bytes[1] <= MAX_VERSION
        && bytes[2] <= RLE_ENCODED
        && bytes[3] == BPP_8
        && bytes[bytes.len() - COLOR_TABLE_SIZE - 1] == PALETTE_MARKER
}

/// A 256-color PCX decoder.
///
/// Usage mirrors the other decoders in the family: construct with
/// `new`, then either [`decode_headers`](PcxDecoder::decode_headers)
/// for the dimensions or [`decode`](PcxDecoder::decode) for the pixel
/// buffer. The trailing palette is available from
/// [`palette`](PcxDecoder::palette) after a full decode.
pub struct PcxDecoder<'a> {
    stream:          ByteReader<'a>,
    width:           i16,
    height:          i16,
    decoded_headers: bool,
    palette:         Option<ColorPalette>
}

impl<'a> PcxDecoder<'a> {
    pub fn new(data: &'a [u8]) -> PcxDecoder<'a> {
        PcxDecoder {
            stream:          ByteReader::new(data),
            width:           0,
            height:          0,
            decoded_headers: false,
            palette:         None
        }
    }

    /// Validate the fixed header and read the image dimensions.
    pub fn decode_headers(&mut self) -> Result<(), PcxDecodeErrors> {
        let header = self.stream.read_fixed_bytes_or_error::<HEADER_LENGTH>();

        let Ok(header) = header else {
            return Err(PcxDecodeErrors::TooSmall(self.stream.remaining()));
        };

        if header[0] != SIGNATURE {
            return Err(PcxDecodeErrors::WrongSignature(header[0]));
        }
        if header[1] > MAX_VERSION {
            return Err(PcxDecodeErrors::UnsupportedVersion(header[1]));
        }
        if header[2] > RLE_ENCODED {
            return Err(PcxDecodeErrors::UnsupportedEncoding(header[2]));
        }
        if header[3] != BPP_8 {
            return Err(PcxDecodeErrors::UnsupportedBitDepth(header[3]));
        }

        // the header stores max coordinates, not sizes
        let xmax = i16::from_le_bytes([header[XMAX_POSITION], header[XMAX_POSITION + 1]]);
        let ymax = i16::from_le_bytes([header[YMAX_POSITION], header[YMAX_POSITION + 1]]);

        let width = xmax.wrapping_add(1);
        let height = ymax.wrapping_add(1);

        if width < 1 || height < 1 {
            return Err(PcxDecodeErrors::BadDimensions(width, height));
        }

        self.width = width;
        self.height = height;
        self.decoded_headers = true;

        trace!("PCX width: {}", self.width);
        trace!("PCX height: {}", self.height);

        Ok(())
    }

    /// Decode the run-length pixel stream, then the trailing palette
    /// block when one is present.
    ///
    /// Returns `width * height` palette indices.
    pub fn decode(&mut self) -> Result<Vec<u8>, PcxDecodeErrors> {
        if !self.decoded_headers {
            self.decode_headers()?;
        }

        let expected_len = usize::from(self.width.unsigned_abs()) * usize::from(self.height.unsigned_abs());

        self.stream.set_position(HEADER_LENGTH);
        let pixels = decode_rle(&mut self.stream, expected_len)?;

        // palette block is optional on the wire; when bytes follow the
        // pixel data the marker must be right
        if !self.stream.eof() {
            self.palette = Some(read_trailing_palette(&mut self.stream)?);
            trace!("PCX trailing palette decoded");
        }

        Ok(pixels)
    }

    /// Width and height, or `None` before the headers were decoded.
    pub const fn dimensions(&self) -> Option<(i16, i16)> {
        if self.decoded_headers {
            return Some((self.width, self.height));
        }
        None
    }

    /// The trailing palette in the DAC domain, present after a full
    /// [`decode`](PcxDecoder::decode) of a stream that carried one.
    pub const fn palette(&self) -> Option<&ColorPalette> {
        self.palette.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use div_core::color::Color;

    use super::*;

    /// A 2x2 image: run of 3 zeroes then a literal 7, plus palette.
    fn sample_pcx() -> Vec<u8> {
        let mut data = vec![0_u8; HEADER_LENGTH];
        data[0] = SIGNATURE;
        data[1] = 5;
        data[2] = 1;
        data[3] = 8;
        data[XMAX_POSITION] = 1; // xmax = 1 -> width 2
        data[YMAX_POSITION] = 1; // ymax = 1 -> height 2

        data.extend_from_slice(&[0xC3, 0x00, 0x07]);

        data.push(PALETTE_MARKER);
        data.extend((0..768).map(|i| if i < 3 { 200 } else { 0 }));
        data
    }

    #[test]
    fn probe_accepts_the_profile() {
        assert!(probe_pcx(&sample_pcx()));
        assert!(!probe_pcx(&[0x0A, 5, 1, 8]));

        let mut bad_marker = sample_pcx();
        let at = bad_marker.len() - COLOR_TABLE_SIZE - 1;
        bad_marker[at] = 0;
        assert!(!probe_pcx(&bad_marker));
    }

    #[test]
    fn decodes_pixels_and_palette() {
        let data = sample_pcx();
        let mut decoder = PcxDecoder::new(&data);

        let pixels = decoder.decode().unwrap();
        assert_eq!(decoder.dimensions(), Some((2, 2)));
        assert_eq!(pixels, vec![0, 0, 0, 7]);

        let palette = decoder.palette().unwrap();
        assert_eq!(palette.get(0).unwrap(), Color::new(50, 50, 50));
    }

    #[test]
    fn rejects_truecolor_headers() {
        let mut data = sample_pcx();
        data[3] = 24;

        let mut decoder = PcxDecoder::new(&data);
        assert!(matches!(
            decoder.decode_headers(),
            Err(PcxDecodeErrors::UnsupportedBitDepth(24))
        ));
    }
}
