/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::fmt::{Debug, Formatter};

use div_core::bytestream::StreamError;
use div_core::errors::ErrorKind;
use div_core::palette::PaletteError;
use div_pcx::PcxDecodeErrors;

/// Possible errors from the PAL codec.
pub enum PalErrors {
    /// The buffer does not start with a valid `pal` header.
    InvalidHeader,
    /// The body after the header has the wrong length.
    ///
    /// # Arguments
    /// - 1st argument is the expected body length
    /// - 2nd argument is the length found
    WrongBodyLength(usize, usize),
    /// Color table or range table contents were invalid.
    Palette(PaletteError),
    /// No extractor recognized the image handed to `from_image`.
    NoPaletteFound,
    /// A PNG `PLTE` chunk whose length is not a multiple of 3 in `3..=768`.
    WrongPlteLength(usize),
    /// The PCX extractor failed on a stream that probed as PCX.
    Pcx(PcxDecodeErrors),
    /// Byte stream truncation.
    Stream(StreamError),
    /// Underlying file I/O failure.
    FileIo(std::io::Error)
}

impl PalErrors {
    /// Which of the shared failure classes this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            PalErrors::InvalidHeader
            | PalErrors::NoPaletteFound
            | PalErrors::WrongPlteLength(_) => ErrorKind::Format,
            PalErrors::WrongBodyLength(..) => ErrorKind::Range,
            PalErrors::Palette(e) => e.kind(),
            PalErrors::Pcx(e) => e.kind(),
            PalErrors::Stream(_) | PalErrors::FileIo(_) => ErrorKind::Io
        }
    }
}

impl Debug for PalErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PalErrors::InvalidHeader => {
                writeln!(f, "Invalid PAL header, expected tag `pal` with DIV magic bytes")
            }
            PalErrors::WrongBodyLength(expected, found) => {
                writeln!(
                    f,
                    "Wrong PAL body length, expected {expected} bytes but found {found}"
                )
            }
            PalErrors::Palette(err) => {
                writeln!(f, "Palette data error: {err:?}")
            }
            PalErrors::NoPaletteFound => {
                writeln!(f, "No palette could be extracted from the given image")
            }
            PalErrors::WrongPlteLength(found) => {
                writeln!(
                    f,
                    "PLTE chunk length {found} is not a multiple of 3 in 3..=768"
                )
            }
            PalErrors::Pcx(err) => {
                writeln!(f, "PCX palette extraction failed: {err:?}")
            }
            PalErrors::Stream(err) => {
                writeln!(f, "I/O error: {err:?}")
            }
            PalErrors::FileIo(err) => {
                writeln!(f, "File I/O error: {err}")
            }
        }
    }
}

impl core::fmt::Display for PalErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for PalErrors {}

impl From<PaletteError> for PalErrors {
    fn from(err: PaletteError) -> Self {
        PalErrors::Palette(err)
    }
}

impl From<PcxDecodeErrors> for PalErrors {
    fn from(err: PcxDecodeErrors) -> Self {
        PalErrors::Pcx(err)
    }
}

impl From<StreamError> for PalErrors {
    fn from(err: StreamError) -> Self {
        PalErrors::Stream(err)
    }
}

impl From<std::io::Error> for PalErrors {
    fn from(err: std::io::Error) -> Self {
        PalErrors::FileIo(err)
    }
}
