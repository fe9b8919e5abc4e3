/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::fmt::{Debug, Formatter};

use div_core::bytestream::StreamError;
use div_core::errors::ErrorKind;
use div_core::palette::PaletteError;

/// Possible errors during PCX decoding.
pub enum PcxDecodeErrors {
    /// The first byte is not the PCX signature `0x0A`.
    WrongSignature(u8),
    /// Header version outside the supported `0..=5`.
    UnsupportedVersion(u8),
    /// Encoding byte other than 0 (raw) or 1 (RLE).
    UnsupportedEncoding(u8),
    /// Bit depth other than 8.
    UnsupportedBitDepth(u8),
    /// The buffer is too small to hold header and trailing palette.
    ///
    /// Argument is the actual buffer length.
    TooSmall(usize),
    /// The header declares a non-positive width or height.
    BadDimensions(i16, i16),
    /// A run would write past the expected pixel count.
    ///
    /// # Arguments
    /// - 1st argument is the expected decoded length
    /// - 2nd argument is the length the run would have produced
    RunOverflow(usize, usize),
    /// The stream ended before the expected pixel count was reached.
    ///
    /// # Arguments
    /// - 1st argument is the expected decoded length
    /// - 2nd argument is the number of pixels actually emitted
    TruncatedPixels(usize, usize),
    /// The byte where the palette marker belongs was not `0x0C`.
    WrongPaletteMarker(u8),
    /// The trailing palette bytes could not be read in full.
    Palette(PaletteError),
    IoErrors(StreamError)
}

impl PcxDecodeErrors {
    /// Which of the shared failure classes this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            PcxDecodeErrors::TruncatedPixels(..) | PcxDecodeErrors::IoErrors(_) => ErrorKind::Io,
            PcxDecodeErrors::Palette(e) => e.kind(),
            _ => ErrorKind::Format
        }
    }
}

impl Debug for PcxDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PcxDecodeErrors::WrongSignature(found) => {
                writeln!(f, "Wrong signature byte {found:#04x}, expected 0x0a")
            }
            PcxDecodeErrors::UnsupportedVersion(found) => {
                writeln!(f, "Unsupported PCX version {found}, expected 0 to 5")
            }
            PcxDecodeErrors::UnsupportedEncoding(found) => {
                writeln!(f, "Unsupported encoding {found}, expected 0 or 1")
            }
            PcxDecodeErrors::UnsupportedBitDepth(found) => {
                writeln!(f, "Unsupported bit depth {found}, only 8 bpp is supported")
            }
            PcxDecodeErrors::TooSmall(found) => {
                writeln!(
                    f,
                    "Buffer of {found} bytes cannot hold a PCX header and trailing palette"
                )
            }
            PcxDecodeErrors::BadDimensions(width, height) => {
                writeln!(f, "Bad image dimensions {width}x{height}")
            }
            PcxDecodeErrors::RunOverflow(expected, produced) => {
                writeln!(
                    f,
                    "Malformed run near the end of pixel data, expected {expected} pixels but the run produces {produced}"
                )
            }
            PcxDecodeErrors::TruncatedPixels(expected, emitted) => {
                writeln!(
                    f,
                    "Pixel stream ended early, expected {expected} pixels but only {emitted} were emitted"
                )
            }
            PcxDecodeErrors::WrongPaletteMarker(found) => {
                writeln!(
                    f,
                    "Wrong trailing palette marker {found:#04x}, expected 0x0c"
                )
            }
            PcxDecodeErrors::Palette(err) => {
                writeln!(f, "Trailing palette error: {err:?}")
            }
            PcxDecodeErrors::IoErrors(err) => {
                writeln!(f, "I/O error: {err:?}")
            }
        }
    }
}

impl core::fmt::Display for PcxDecodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PcxDecodeErrors {}

impl From<StreamError> for PcxDecodeErrors {
    fn from(err: StreamError) -> Self {
        PcxDecodeErrors::IoErrors(err)
    }
}

impl From<PaletteError> for PcxDecodeErrors {
    fn from(err: PaletteError) -> Self {
        PcxDecodeErrors::Palette(err)
    }
}
