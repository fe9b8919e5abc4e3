/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::fmt::{Debug, Formatter};

use div_core::bytestream::StreamError;
use div_core::errors::ErrorKind;
use div_core::traits::ImageSourceError;
use div_pal::PalErrors;

use crate::control_point::MAX_CONTROL_POINTS;
use crate::map::{MAX_GRAPH_ID, MIN_GRAPH_ID};

/// Possible errors from the MAP codec.
pub enum MapErrors {
    /// The buffer does not start with a valid `map` header.
    InvalidHeader,
    /// Width or height below 1.
    BadDimensions(i16, i16),
    /// Graphic id outside `1..=999`.
    BadGraphId(i32),
    /// A bitmap buffer whose length is not `width * height`.
    ///
    /// # Arguments
    /// - 1st argument is the expected length
    /// - 2nd argument is the length found
    WrongBitmapLength(usize, usize),
    /// A linear pixel index outside the bitmap.
    BadPixelIndex(usize),
    /// Pixel coordinates outside the bitmap.
    BadPixelCoordinates(i16, i16),
    /// A control point index outside the current list.
    BadControlPointIndex(usize),
    /// Adding a control point past the format maximum of 1000.
    TooManyControlPoints,
    /// A control point buffer that is not exactly 4 bytes.
    WrongControlPointLength(usize),
    /// A control point component index other than 0 or 1.
    BadComponentIndex(usize),
    /// The embedded palette body was invalid.
    Palette(PalErrors),
    /// The external image collaborator failed.
    Image(ImageSourceError),
    /// Byte stream truncation.
    Stream(StreamError),
    /// Underlying file I/O failure.
    FileIo(std::io::Error)
}

impl MapErrors {
    /// Which of the shared failure classes this error belongs to.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            MapErrors::InvalidHeader => ErrorKind::Format,
            MapErrors::Palette(e) => e.kind(),
            MapErrors::Image(e) => e.kind(),
            MapErrors::Stream(_) | MapErrors::FileIo(_) => ErrorKind::Io,
            _ => ErrorKind::Range
        }
    }
}

impl Debug for MapErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            MapErrors::InvalidHeader => {
                writeln!(f, "Invalid MAP header, expected tag `map` with DIV magic bytes")
            }
            MapErrors::BadDimensions(width, height) => {
                writeln!(f, "Bad bitmap dimensions {width}x{height}, both must be at least 1")
            }
            MapErrors::BadGraphId(id) => {
                writeln!(
                    f,
                    "Graphic id {id} outside the valid range {MIN_GRAPH_ID}..={MAX_GRAPH_ID}"
                )
            }
            MapErrors::WrongBitmapLength(expected, found) => {
                writeln!(
                    f,
                    "Wrong bitmap length, expected {expected} bytes but found {found}"
                )
            }
            MapErrors::BadPixelIndex(index) => {
                writeln!(f, "Pixel index {index} outside the bitmap")
            }
            MapErrors::BadPixelCoordinates(x, y) => {
                writeln!(f, "Pixel coordinates ({x}, {y}) outside the bitmap")
            }
            MapErrors::BadControlPointIndex(index) => {
                writeln!(f, "Control point index {index} outside the current list")
            }
            MapErrors::TooManyControlPoints => {
                writeln!(
                    f,
                    "A bitmap can carry at most {MAX_CONTROL_POINTS} control points"
                )
            }
            MapErrors::WrongControlPointLength(found) => {
                writeln!(f, "A control point must be exactly 4 bytes, found {found}")
            }
            MapErrors::BadComponentIndex(index) => {
                writeln!(f, "Control point component index must be 0 or 1, found {index}")
            }
            MapErrors::Palette(err) => {
                writeln!(f, "Embedded palette error: {err:?}")
            }
            MapErrors::Image(err) => {
                writeln!(f, "Image collaborator error: {err:?}")
            }
            MapErrors::Stream(err) => {
                writeln!(f, "I/O error: {err:?}")
            }
            MapErrors::FileIo(err) => {
                writeln!(f, "File I/O error: {err}")
            }
        }
    }
}

impl core::fmt::Display for MapErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for MapErrors {}

impl From<PalErrors> for MapErrors {
    fn from(err: PalErrors) -> Self {
        MapErrors::Palette(err)
    }
}

impl From<ImageSourceError> for MapErrors {
    fn from(err: ImageSourceError) -> Self {
        MapErrors::Image(err)
    }
}

impl From<StreamError> for MapErrors {
    fn from(err: StreamError) -> Self {
        MapErrors::Stream(err)
    }
}

impl From<std::io::Error> for MapErrors {
    fn from(err: std::io::Error) -> Self {
        MapErrors::FileIo(err)
    }
}
