/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! 256-entry palettes and color-cycling range tables
//!
//! The body of every palette asset is two fixed sections: 768 bytes of
//! DAC-domain colors (r,g,b per index) followed by 576 bytes describing
//! 16 color-cycling ranges the DIV editor uses for palette animation.
//! The codec carries the range table verbatim; only its layout and the
//! default construction rule matter here.

use core::fmt::{Debug, Formatter};

use crate::bytestream::{ByteReader, ByteWriter};
use crate::color::{Color, MAX_DAC_VALUE};
use crate::errors::ErrorKind;
use crate::traits::SerializableAsset;

/// Number of colors in a palette.
pub const PALETTE_LENGTH: usize = 256;
/// Serialized size of the color table.
pub const COLOR_TABLE_SIZE: usize = 768;
/// Number of index entries in one color range.
pub const RANGE_LENGTH: usize = 32;
/// Serialized size of one color range: 4 metadata bytes + 32 entries.
pub const RANGE_SIZE: usize = 36;
/// Number of ranges in a table.
pub const RANGE_COUNT: usize = 16;
/// Serialized size of the range table.
pub const RANGE_TABLE_SIZE: usize = RANGE_COUNT * RANGE_SIZE;

/// Errors from palette and range-table construction and access.
pub enum PaletteError {
    /// The color-table buffer was not exactly 768 bytes.
    WrongColorTableLength(usize),
    /// A decoded palette entry has a component above 63.
    NotDacColor(usize),
    /// `set` was given a color with a component above 63.
    ///
    /// Arguments: palette index, component index, offending value.
    ComponentOutOfDacRange(usize, usize, u8),
    /// A palette index outside `0..256`.
    BadColorIndex(usize),
    /// The range-table buffer was not exactly 576 bytes.
    WrongRangeTableLength(usize),
    /// A single-range buffer was not exactly 36 bytes.
    WrongRangeLength(usize),
    /// A range index outside `0..16`.
    BadRangeIndex(usize),
    /// A range entry index outside `0..32`.
    BadRangeEntryIndex(usize),
    /// The range `colors` byte was not 8, 16 or 32.
    UnknownRangeColors(u8),
    /// The range type byte was not 0, 1, 2, 4 or 8.
    UnknownRangeType(u8)
}

impl PaletteError {
    pub const fn kind(&self) -> ErrorKind {
        match self {
            PaletteError::NotDacColor(_)
            | PaletteError::UnknownRangeColors(_)
            | PaletteError::UnknownRangeType(_) => ErrorKind::Format,
            _ => ErrorKind::Range
        }
    }
}

impl Debug for PaletteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PaletteError::WrongColorTableLength(found) => {
                writeln!(
                    f,
                    "A color table must be exactly {COLOR_TABLE_SIZE} bytes, found {found}"
                )
            }
            PaletteError::NotDacColor(index) => {
                writeln!(
                    f,
                    "Palette entry {index} has a component above the DAC maximum {MAX_DAC_VALUE}"
                )
            }
            PaletteError::ComponentOutOfDacRange(index, component, value) => {
                writeln!(
                    f,
                    "Component {component} of palette entry {index} is {value}, above the DAC maximum {MAX_DAC_VALUE}"
                )
            }
            PaletteError::BadColorIndex(index) => {
                writeln!(
                    f,
                    "Palette index must be below {PALETTE_LENGTH}, found {index}"
                )
            }
            PaletteError::WrongRangeTableLength(found) => {
                writeln!(
                    f,
                    "A range table must be exactly {RANGE_TABLE_SIZE} bytes, found {found}"
                )
            }
            PaletteError::WrongRangeLength(found) => {
                writeln!(
                    f,
                    "A color range must be exactly {RANGE_SIZE} bytes, found {found}"
                )
            }
            PaletteError::BadRangeIndex(index) => {
                writeln!(f, "Range index must be below {RANGE_COUNT}, found {index}")
            }
            PaletteError::BadRangeEntryIndex(index) => {
                writeln!(
                    f,
                    "Range entry index must be below {RANGE_LENGTH}, found {index}"
                )
            }
            PaletteError::UnknownRangeColors(value) => {
                writeln!(f, "Unknown range color count {value}, expected 8, 16 or 32")
            }
            PaletteError::UnknownRangeType(value) => {
                writeln!(f, "Unknown range type {value}, expected 0, 1, 2, 4 or 8")
            }
        }
    }
}

impl core::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PaletteError {}

/// A 256-entry indexed color palette in DAC format [0..63].
///
/// The insertion order is the color index the pixel bytes refer to.
/// Every stored color is guaranteed DAC-valid; the setters and decoders
/// enforce it.
#[derive(Clone, Eq, PartialEq)]
pub struct ColorPalette {
    colors: [Color; PALETTE_LENGTH]
}

impl Default for ColorPalette {
    fn default() -> Self {
        ColorPalette {
            colors: [Color::default(); PALETTE_LENGTH]
        }
    }
}

impl ColorPalette {
    pub fn new() -> ColorPalette {
        ColorPalette::default()
    }

    /// Build a palette from 256 DAC-domain colors.
    pub fn from_colors(colors: [Color; PALETTE_LENGTH]) -> Result<ColorPalette, PaletteError> {
        for (i, color) in colors.iter().enumerate() {
            if !color.is_dac() {
                return Err(PaletteError::NotDacColor(i));
            }
        }
        Ok(ColorPalette { colors })
    }

    /// Decode a 768-byte DAC-domain color table.
    ///
    /// Fails on a length mismatch or any component above 63 and leaves
    /// no partially built palette behind.
    pub fn from_buffer(buffer: &[u8]) -> Result<ColorPalette, PaletteError> {
        if buffer.len() != COLOR_TABLE_SIZE {
            return Err(PaletteError::WrongColorTableLength(buffer.len()));
        }

        let mut palette = ColorPalette::new();

        for (i, chunk) in buffer.chunks_exact(3).enumerate() {
            let color = Color::new(chunk[0], chunk[1], chunk[2]);
            if !color.is_dac() {
                return Err(PaletteError::NotDacColor(i));
            }
            palette.colors[i] = color;
        }
        Ok(palette)
    }

    /// Build a palette from a 768-byte RGB-domain table, converting each
    /// component to the DAC domain by integer division by 4.
    pub fn from_rgb_buffer(buffer: &[u8]) -> Result<ColorPalette, PaletteError> {
        if buffer.len() != COLOR_TABLE_SIZE {
            return Err(PaletteError::WrongColorTableLength(buffer.len()));
        }

        let mut palette = ColorPalette::new();

        for (i, chunk) in buffer.chunks_exact(3).enumerate() {
            palette.colors[i] = Color::new(chunk[0], chunk[1], chunk[2]).to_dac();
        }
        Ok(palette)
    }

    pub fn get(&self, index: usize) -> Result<Color, PaletteError> {
        match self.colors.get(index) {
            Some(color) => Ok(*color),
            None => Err(PaletteError::BadColorIndex(index))
        }
    }

    /// Store a color, validating every component against the DAC range.
    pub fn set(&mut self, index: usize, color: Color) -> Result<(), PaletteError> {
        if index >= PALETTE_LENGTH {
            return Err(PaletteError::BadColorIndex(index));
        }

        for (component, value) in [color.r, color.g, color.b].into_iter().enumerate() {
            if value > MAX_DAC_VALUE {
                return Err(PaletteError::ComponentOutOfDacRange(index, component, value));
            }
        }

        self.colors[index] = color;
        Ok(())
    }

    /// All 256 colors converted to the RGB domain.
    pub fn to_rgb(&self) -> Vec<Color> {
        self.colors.iter().map(|c| c.to_rgb()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Color> {
        self.colors.iter()
    }

    pub fn as_colors(&self) -> &[Color; PALETTE_LENGTH] {
        &self.colors
    }

    /// FNV-1a over the serialized color table.
    ///
    /// Used as the cache key for quantizer configuration; two palettes
    /// hash equal iff their color tables are byte-identical, up to the
    /// usual 64-bit collision caveat.
    pub fn content_hash(&self) -> u64 {
        const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
        const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

        let mut hash = FNV_OFFSET;
        for color in &self.colors {
            for byte in [color.r, color.g, color.b] {
                hash ^= u64::from(byte);
                hash = hash.wrapping_mul(FNV_PRIME);
            }
        }
        hash
    }
}

impl SerializableAsset for ColorPalette {
    fn write_to(&self, stream: &mut ByteWriter) {
        for color in &self.colors {
            color.write_to(stream);
        }
    }
}

impl Debug for ColorPalette {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "ColorPalette {{ hash: {:#018x} }}", self.content_hash())
    }
}

/// Number of colors a cycling range spans.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RangeColors {
    Eight     = 8,
    Sixteen   = 16,
    ThirtyTwo = 32
}

impl RangeColors {
    pub fn from_byte(value: u8) -> Result<RangeColors, PaletteError> {
        match value {
            8 => Ok(RangeColors::Eight),
            16 => Ok(RangeColors::Sixteen),
            32 => Ok(RangeColors::ThirtyTwo),
            _ => Err(PaletteError::UnknownRangeColors(value))
        }
    }
}

/// Edit granularity of a cycling range.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum RangeType {
    /// Direct from palette.
    Direct = 0,
    /// Editable color by color.
    Edit1  = 1,
    /// Editable every 2 colors.
    Edit2  = 2,
    /// Editable every 4 colors.
    Edit4  = 4,
    /// Editable every 8 colors.
    Edit8  = 8
}

impl RangeType {
    pub fn from_byte(value: u8) -> Result<RangeType, PaletteError> {
        match value {
            0 => Ok(RangeType::Direct),
            1 => Ok(RangeType::Edit1),
            2 => Ok(RangeType::Edit2),
            4 => Ok(RangeType::Edit4),
            8 => Ok(RangeType::Edit8),
            _ => Err(PaletteError::UnknownRangeType(value))
        }
    }
}

/// One color-cycling range: 4 metadata bytes plus 32 palette indices.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ColorRange {
    pub colors:      RangeColors,
    pub range_type:  RangeType,
    pub is_fixed:    bool,
    pub black_color: u8,
    entries:         [u8; RANGE_LENGTH]
}

impl ColorRange {
    /// Create a range with default metadata, filling the 32 entries from
    /// a running color index that wraps 255 back to 0.
    ///
    /// The counter threads through consecutive ranges so the default
    /// table is one continuous 0..255 ramp repeated; see
    /// [`ColorRangeTable::default`].
    pub fn new(start_color_index: &mut u8) -> ColorRange {
        let mut entries = [0; RANGE_LENGTH];

        for entry in entries.iter_mut() {
            *entry = *start_color_index;
            *start_color_index = start_color_index.wrapping_add(1);
        }

        ColorRange {
            colors: RangeColors::Eight,
            range_type: RangeType::Direct,
            is_fixed: false,
            black_color: 0,
            entries
        }
    }

    /// Decode one 36-byte range record.
    pub fn from_buffer(buffer: &[u8]) -> Result<ColorRange, PaletteError> {
        if buffer.len() != RANGE_SIZE {
            return Err(PaletteError::WrongRangeLength(buffer.len()));
        }

        let mut entries = [0; RANGE_LENGTH];
        entries.copy_from_slice(&buffer[4..]);

        Ok(ColorRange {
            colors: RangeColors::from_byte(buffer[0])?,
            range_type: RangeType::from_byte(buffer[1])?,
            is_fixed: buffer[2] != 0,
            black_color: buffer[3],
            entries
        })
    }

    pub fn entry(&self, index: usize) -> Result<u8, PaletteError> {
        match self.entries.get(index) {
            Some(entry) => Ok(*entry),
            None => Err(PaletteError::BadRangeEntryIndex(index))
        }
    }

    pub fn set_entry(&mut self, index: usize, value: u8) -> Result<(), PaletteError> {
        match self.entries.get_mut(index) {
            Some(entry) => {
                *entry = value;
                Ok(())
            }
            None => Err(PaletteError::BadRangeEntryIndex(index))
        }
    }
}

impl SerializableAsset for ColorRange {
    fn write_to(&self, stream: &mut ByteWriter) {
        stream.write_u8(self.colors as u8);
        stream.write_u8(self.range_type as u8);
        stream.write_u8(u8::from(self.is_fixed));
        stream.write_u8(self.black_color);
        stream.write_bytes(&self.entries);
    }
}

/// The 16-range color-cycling table carried by every palette asset.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ColorRangeTable {
    ranges: [ColorRange; RANGE_COUNT]
}

impl Default for ColorRangeTable {
    /// The editor default: one byte counter starting at 0 threads
    /// through all 16 ranges, so entry `[i][j]` is `(i*32 + j) % 256`.
    fn default() -> Self {
        let mut counter = 0_u8;
        ColorRangeTable {
            ranges: core::array::from_fn(|_| ColorRange::new(&mut counter))
        }
    }
}

impl ColorRangeTable {
    pub fn new() -> ColorRangeTable {
        ColorRangeTable::default()
    }

    /// Decode a 576-byte range table.
    pub fn from_buffer(buffer: &[u8]) -> Result<ColorRangeTable, PaletteError> {
        if buffer.len() != RANGE_TABLE_SIZE {
            return Err(PaletteError::WrongRangeTableLength(buffer.len()));
        }

        let mut table = ColorRangeTable::default();
        for (i, chunk) in buffer.chunks_exact(RANGE_SIZE).enumerate() {
            table.ranges[i] = ColorRange::from_buffer(chunk)?;
        }
        Ok(table)
    }

    /// Decode a range table directly from a byte stream.
    pub fn decode(stream: &mut ByteReader) -> Result<ColorRangeTable, PaletteError> {
        match stream.get_as_ref(RANGE_TABLE_SIZE) {
            Ok(bytes) => ColorRangeTable::from_buffer(bytes),
            Err(_) => Err(PaletteError::WrongRangeTableLength(stream.remaining()))
        }
    }

    pub fn get(&self, index: usize) -> Result<&ColorRange, PaletteError> {
        match self.ranges.get(index) {
            Some(range) => Ok(range),
            None => Err(PaletteError::BadRangeIndex(index))
        }
    }

    pub fn set(&mut self, index: usize, range: ColorRange) -> Result<(), PaletteError> {
        match self.ranges.get_mut(index) {
            Some(slot) => {
                *slot = range;
                Ok(())
            }
            None => Err(PaletteError::BadRangeIndex(index))
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorRange> {
        self.ranges.iter()
    }
}

impl SerializableAsset for ColorRangeTable {
    fn write_to(&self, stream: &mut ByteWriter) {
        for range in &self.ranges {
            range.write_to(stream);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_range_table_is_a_wrapping_ramp() {
        let table = ColorRangeTable::default();

        for i in 0..RANGE_COUNT {
            let range = table.get(i).unwrap();
            for j in 0..RANGE_LENGTH {
                assert_eq!(
                    range.entry(j).unwrap(),
                    ((i * RANGE_LENGTH + j) % 256) as u8,
                    "range {i} entry {j}"
                );
            }
        }
    }

    #[test]
    fn range_table_round_trips() {
        let table = ColorRangeTable::default();
        let bytes = table.serialize();

        assert_eq!(bytes.len(), RANGE_TABLE_SIZE);
        assert_eq!(ColorRangeTable::from_buffer(&bytes).unwrap(), table);
    }

    #[test]
    fn range_table_rejects_wrong_length() {
        assert!(ColorRangeTable::from_buffer(&[0; RANGE_TABLE_SIZE - 1]).is_err());
        assert!(ColorRangeTable::from_buffer(&[0; RANGE_TABLE_SIZE + 1]).is_err());
    }

    #[test]
    fn palette_round_trips() {
        let mut palette = ColorPalette::new();
        for i in 0..PALETTE_LENGTH {
            let c = (i % 64) as u8;
            palette.set(i, Color::new(c, 63 - c, c / 2)).unwrap();
        }

        let bytes = palette.serialize();
        assert_eq!(bytes.len(), COLOR_TABLE_SIZE);
        assert_eq!(ColorPalette::from_buffer(&bytes).unwrap(), palette);
    }

    #[test]
    fn palette_rejects_non_dac_entries() {
        let mut bytes = [0_u8; COLOR_TABLE_SIZE];
        bytes[300] = 64;

        let err = ColorPalette::from_buffer(&bytes).unwrap_err();
        assert!(matches!(err, PaletteError::NotDacColor(100)));
    }

    #[test]
    fn palette_rejects_wrong_length() {
        assert!(ColorPalette::from_buffer(&[0; 767]).is_err());
        assert!(ColorPalette::from_buffer(&[0; 769]).is_err());
    }

    #[test]
    fn set_validates_dac_range() {
        let mut palette = ColorPalette::new();
        assert!(palette.set(0, Color::new(63, 63, 63)).is_ok());

        let err = palette.set(1, Color::new(0, 70, 0)).unwrap_err();
        assert!(matches!(
            err,
            PaletteError::ComponentOutOfDacRange(1, 1, 70)
        ));
        // the failed set must not have touched the slot
        assert_eq!(palette.get(1).unwrap(), Color::default());
    }

    #[test]
    fn rgb_buffer_is_converted_to_dac() {
        let mut bytes = [0_u8; COLOR_TABLE_SIZE];
        bytes[0] = 255;
        bytes[1] = 128;
        bytes[2] = 4;

        let palette = ColorPalette::from_rgb_buffer(&bytes).unwrap();
        assert_eq!(palette.get(0).unwrap(), Color::new(63, 32, 1));
    }

    #[test]
    fn content_hash_tracks_colors_only() {
        let mut a = ColorPalette::new();
        let b = ColorPalette::new();
        assert_eq!(a.content_hash(), b.content_hash());

        a.set(10, Color::new(1, 2, 3)).unwrap();
        assert_ne!(a.content_hash(), b.content_hash());
    }
}
