/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use div_core::bytestream::{ByteReader, ByteWriter};
use div_core::color::Color;
use div_core::header::{DivHeader, HEADER_LENGTH};
use div_core::palette::{ColorPalette, ColorRangeTable, COLOR_TABLE_SIZE, RANGE_TABLE_SIZE};
use div_core::traits::{AssetFile, FormatValidable, SerializableAsset};

use crate::errors::PalErrors;

/// Serialized size of a PAL body: color table + range table.
pub const PAL_BODY_SIZE: usize = COLOR_TABLE_SIZE + RANGE_TABLE_SIZE;
/// Serialized size of a whole PAL file.
pub const PAL_FILE_SIZE: usize = HEADER_LENGTH + PAL_BODY_SIZE;

const PAL_HEADER: DivHeader = DivHeader::new(*b"pal");

/// Check whether `bytes` starts with a valid PAL header.
pub fn probe_pal(bytes: &[u8]) -> bool {
    PAL_HEADER.probe(bytes)
}

/// A DIV palette asset: 256 DAC colors plus the color-cycling table.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Pal {
    colors: ColorPalette,
    ranges: ColorRangeTable
}

impl Default for Pal {
    fn default() -> Self {
        Pal::new(ColorPalette::default())
    }
}

impl Pal {
    /// Wrap a color table with the editor-default range table.
    pub fn new(colors: ColorPalette) -> Pal {
        Pal {
            colors,
            ranges: ColorRangeTable::default()
        }
    }

    pub const fn with_ranges(colors: ColorPalette, ranges: ColorRangeTable) -> Pal {
        Pal { colors, ranges }
    }

    /// Build a palette from a 768-byte RGB-domain table; components are
    /// converted down to the DAC domain and the range table defaults.
    pub fn from_rgb_buffer(buffer: &[u8]) -> Result<Pal, PalErrors> {
        Ok(Pal::new(ColorPalette::from_rgb_buffer(buffer)?))
    }

    pub const fn colors(&self) -> &ColorPalette {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorPalette {
        &mut self.colors
    }

    pub const fn ranges(&self) -> &ColorRangeTable {
        &self.ranges
    }

    pub fn ranges_mut(&mut self) -> &mut ColorRangeTable {
        &mut self.ranges
    }

    /// All 256 colors converted to the RGB domain.
    pub fn to_rgb(&self) -> Vec<Color> {
        self.colors.to_rgb()
    }

    /// Decode a standalone PAL file.
    ///
    /// The body must be exactly [`PAL_BODY_SIZE`] bytes after the
    /// header; a palette embedded in another asset goes through
    /// [`decode_body`](Pal::decode_body) instead.
    pub fn decode(buffer: &[u8]) -> Result<Pal, PalErrors> {
        let mut stream = ByteReader::new(buffer);

        if !PAL_HEADER.check(&mut stream) {
            return Err(PalErrors::InvalidHeader);
        }
        if stream.remaining() != PAL_BODY_SIZE {
            return Err(PalErrors::WrongBodyLength(PAL_BODY_SIZE, stream.remaining()));
        }

        Pal::decode_body(&mut stream)
    }

    /// Decode the 1344-byte palette body from the current position.
    ///
    /// This is the section MAP and FPG embed right after their own
    /// headers, so no length check beyond the read itself happens here.
    pub fn decode_body(stream: &mut ByteReader) -> Result<Pal, PalErrors> {
        let color_bytes = stream.get_as_ref(COLOR_TABLE_SIZE)?;
        let colors = ColorPalette::from_buffer(color_bytes)?;
        let ranges = ColorRangeTable::decode(stream)?;

        Ok(Pal { colors, ranges })
    }

    /// Append the 1344-byte palette body, without the file header.
    pub fn write_body(&self, stream: &mut ByteWriter) {
        self.colors.write_to(stream);
        self.ranges.write_to(stream);
    }
}

impl SerializableAsset for Pal {
    fn write_to(&self, stream: &mut ByteWriter) {
        PAL_HEADER.write_to(stream);
        self.write_body(stream);
    }
}

impl FormatValidable for Pal {
    fn validate(buffer: &[u8]) -> bool {
        probe_pal(buffer)
    }
}

impl AssetFile for Pal {
    type Error = PalErrors;

    fn load(path: &str) -> Result<Pal, PalErrors> {
        let contents = std::fs::read(path)?;
        Pal::decode(&contents)
    }

    fn save(&self, path: &str) -> Result<(), PalErrors> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use div_core::errors::ErrorKind;

    use super::*;

    fn sample_pal() -> Pal {
        let mut colors = ColorPalette::new();
        for i in 0..256 {
            let c = (i % 64) as u8;
            colors.set(i, Color::new(c, 63 - c, c / 2)).unwrap();
        }
        Pal::new(colors)
    }

    #[test]
    fn encode_decode_round_trips() {
        let pal = sample_pal();
        let bytes = pal.serialize();

        assert_eq!(bytes.len(), PAL_FILE_SIZE);
        assert!(probe_pal(&bytes));
        assert_eq!(Pal::decode(&bytes).unwrap(), pal);
    }

    #[test]
    fn rejects_wrong_header() {
        let mut bytes = sample_pal().serialize();
        bytes[0] = b'x';

        let err = Pal::decode(&bytes).unwrap_err();
        assert!(matches!(err, PalErrors::InvalidHeader));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn rejects_wrong_body_length() {
        let mut bytes = sample_pal().serialize();
        bytes.push(0);

        let err = Pal::decode(&bytes).unwrap_err();
        assert!(matches!(
            err,
            PalErrors::WrongBodyLength(PAL_BODY_SIZE, found) if found == PAL_BODY_SIZE + 1
        ));
        assert_eq!(err.kind(), ErrorKind::Range);

        bytes.truncate(PAL_FILE_SIZE - 10);
        assert!(Pal::decode(&bytes).is_err());
    }

    #[test]
    fn rejects_non_dac_color_table() {
        let mut bytes = sample_pal().serialize();
        bytes[HEADER_LENGTH] = 64;

        let err = Pal::decode(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn from_rgb_buffer_scales_down_and_defaults_ranges() {
        let mut rgb = [0_u8; COLOR_TABLE_SIZE];
        rgb[0] = 255;
        rgb[4] = 128;

        let pal = Pal::from_rgb_buffer(&rgb).unwrap();
        assert_eq!(pal.colors().get(0).unwrap(), Color::new(63, 0, 0));
        assert_eq!(pal.colors().get(1).unwrap(), Color::new(0, 32, 0));
        assert_eq!(*pal.ranges(), ColorRangeTable::default());
    }

    #[test]
    fn body_round_trips_inside_a_larger_stream() {
        let pal = sample_pal();

        let mut writer = ByteWriter::new();
        writer.write_bytes(&[0xAA; 16]);
        pal.write_body(&mut writer);
        let bytes = writer.into_inner();

        let mut stream = ByteReader::new(&bytes);
        stream.set_position(16);
        assert_eq!(Pal::decode_body(&mut stream).unwrap(), pal);
        assert!(stream.eof());
    }
}
