/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Pulling palettes out of foreign image files
//!
//! [`Pal::from_image`] accepts a raw file buffer and tries each known
//! source format in a fixed order. Only formats that embed an explicit
//! 256-color table are supported; quantizing a truecolor image down to
//! a palette is the business of the external collaborators in
//! `div_core::traits`.

use div_core::bytestream::ByteReader;
use div_core::palette::{ColorPalette, COLOR_TABLE_SIZE};
use div_pcx::{probe_pcx, read_trailing_palette};
use log::trace;

use crate::errors::PalErrors;
use crate::pal::{probe_pal, Pal};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const PNG_CHUNK_CRC_SIZE: usize = 4;

/// One source format [`Pal::from_image`] can pull a palette from.
pub trait PaletteExtractor {
    /// True if `buffer` looks like this extractor's source format.
    fn probe(&self, buffer: &[u8]) -> bool;

    /// Extract the palette from a buffer that probed positive.
    fn extract(&self, buffer: &[u8]) -> Result<Pal, PalErrors>;
}

/// Reads the `PLTE` chunk of a PNG file.
pub struct PngPaletteExtractor;

impl PaletteExtractor for PngPaletteExtractor {
    fn probe(&self, buffer: &[u8]) -> bool {
        buffer.len() > PNG_SIGNATURE.len() && buffer[..PNG_SIGNATURE.len()] == PNG_SIGNATURE
    }

    fn extract(&self, buffer: &[u8]) -> Result<Pal, PalErrors> {
        let mut stream = ByteReader::new(buffer);
        stream.skip(PNG_SIGNATURE.len());

        // chunk lengths in PNG are big endian, unlike everything else
        // this crate touches
        loop {
            let length = stream.read_fixed_bytes_or_error::<4>()?;
            let length = u32::from_be_bytes(length) as usize;
            let chunk_type = stream.read_fixed_bytes_or_error::<4>()?;

            match &chunk_type {
                b"PLTE" => {
                    if length == 0 || length % 3 != 0 || length > COLOR_TABLE_SIZE {
                        return Err(PalErrors::WrongPlteLength(length));
                    }

                    // shorter palettes pad up to 256 black entries
                    let mut rgb = [0_u8; COLOR_TABLE_SIZE];
                    stream.read_exact_bytes(&mut rgb[..length])?;

                    return Ok(Pal::new(ColorPalette::from_rgb_buffer(&rgb)?));
                }
                b"IEND" => return Err(PalErrors::NoPaletteFound),
                _ => stream.skip(length + PNG_CHUNK_CRC_SIZE)
            }

            if stream.eof() {
                return Err(PalErrors::NoPaletteFound);
            }
        }
    }
}

/// Reads the trailing palette block of an 8-bpp PCX file.
pub struct PcxPaletteExtractor;

impl PaletteExtractor for PcxPaletteExtractor {
    fn probe(&self, buffer: &[u8]) -> bool {
        probe_pcx(buffer)
    }

    fn extract(&self, buffer: &[u8]) -> Result<Pal, PalErrors> {
        let mut stream = ByteReader::new(buffer);
        // the probe guarantees the buffer is long enough to back up
        // over marker + 768 palette bytes
        stream.set_position(buffer.len() - COLOR_TABLE_SIZE - 1);

        Ok(Pal::new(read_trailing_palette(&mut stream)?))
    }
}

/// Accepts a PAL file as-is.
pub struct PalPassthrough;

impl PaletteExtractor for PalPassthrough {
    fn probe(&self, buffer: &[u8]) -> bool {
        probe_pal(buffer)
    }

    fn extract(&self, buffer: &[u8]) -> Result<Pal, PalErrors> {
        Pal::decode(buffer)
    }
}

impl Pal {
    /// Extract a palette from a foreign image buffer.
    ///
    /// Extractors are tried in order: PNG `PLTE` chunk, PCX trailing
    /// palette, PAL file pass-through. The first whose probe accepts
    /// the buffer decides the outcome; a probe match followed by a
    /// failed extraction is an error, not a fall-through.
    pub fn from_image(buffer: &[u8]) -> Result<Pal, PalErrors> {
        let extractors: [&dyn PaletteExtractor; 3] =
            [&PngPaletteExtractor, &PcxPaletteExtractor, &PalPassthrough];

        for (i, extractor) in extractors.into_iter().enumerate() {
            if extractor.probe(buffer) {
                trace!("palette extractor {i} matched");
                return extractor.extract(buffer);
            }
        }

        Err(PalErrors::NoPaletteFound)
    }
}

#[cfg(test)]
mod tests {
    use div_core::color::Color;
    use div_core::errors::ErrorKind;
    use div_core::traits::SerializableAsset;

    use super::*;

    fn png_with_plte(plte: &[u8]) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();

        // IHDR with placeholder contents, the walker only reads lengths
        data.extend_from_slice(&13_u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&[0; 13 + PNG_CHUNK_CRC_SIZE]);

        data.extend_from_slice(&(plte.len() as u32).to_be_bytes());
        data.extend_from_slice(b"PLTE");
        data.extend_from_slice(plte);
        data.extend_from_slice(&[0; PNG_CHUNK_CRC_SIZE]);

        data.extend_from_slice(&0_u32.to_be_bytes());
        data.extend_from_slice(b"IEND");
        data.extend_from_slice(&[0; PNG_CHUNK_CRC_SIZE]);
        data
    }

    #[test]
    fn extracts_png_plte_with_padding() {
        let image = png_with_plte(&[255, 0, 0, 0, 128, 0]);

        let pal = Pal::from_image(&image).unwrap();
        assert_eq!(pal.colors().get(0).unwrap(), Color::new(63, 0, 0));
        assert_eq!(pal.colors().get(1).unwrap(), Color::new(0, 32, 0));
        // entries past the chunk pad with black
        assert_eq!(pal.colors().get(2).unwrap(), Color::new(0, 0, 0));
    }

    #[test]
    fn png_without_plte_yields_no_palette() {
        let mut image = PNG_SIGNATURE.to_vec();
        image.extend_from_slice(&0_u32.to_be_bytes());
        image.extend_from_slice(b"IEND");
        image.extend_from_slice(&[0; PNG_CHUNK_CRC_SIZE]);

        let err = Pal::from_image(&image).unwrap_err();
        assert!(matches!(err, PalErrors::NoPaletteFound));
    }

    #[test]
    fn rejects_malformed_plte_length() {
        let image = png_with_plte(&[255, 0, 0, 1]);

        let err = Pal::from_image(&image).unwrap_err();
        assert!(matches!(err, PalErrors::WrongPlteLength(4)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn extracts_pcx_trailing_palette() {
        let mut image = vec![0_u8; 128];
        image[0] = 0x0A;
        image[1] = 5;
        image[2] = 1;
        image[3] = 8;
        image[8] = 0; // xmax 0 -> width 1
        image[10] = 0; // ymax 0 -> height 1
        image.push(0x07); // one literal pixel

        image.push(0x0C);
        image.extend((0..768).map(|i| if i < 3 { 200 } else { 0 }));

        let pal = Pal::from_image(&image).unwrap();
        assert_eq!(pal.colors().get(0).unwrap(), Color::new(50, 50, 50));
    }

    #[test]
    fn passes_pal_files_through() {
        let mut colors = ColorPalette::new();
        colors.set(5, Color::new(10, 20, 30)).unwrap();
        let pal = Pal::new(colors);

        let extracted = Pal::from_image(&pal.serialize()).unwrap();
        assert_eq!(extracted, pal);
    }

    #[test]
    fn unknown_buffers_yield_no_palette() {
        let err = Pal::from_image(&[0_u8; 64]).unwrap_err();
        assert!(matches!(err, PalErrors::NoPaletteFound));
        assert_eq!(err.kind(), ErrorKind::Format);
    }
}
