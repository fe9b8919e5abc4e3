/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::fmt::{Debug, Formatter};

use div_core::bytestream::StreamError;
use div_core::errors::ErrorKind;
use div_core::traits::ImageSourceError;
use div_map::{MapErrors, MAX_GRAPH_ID, MIN_GRAPH_ID};
use div_pal::PalErrors;

/// Possible errors from the FPG codec and its import pipeline.
pub enum FpgErrors {
    /// The buffer does not start with a valid `fpg` header.
    InvalidHeader,
    /// Graphic id outside `1..=999`.
    BadGraphId(i32),
    /// Width or height below 1 or above `i16::MAX`.
    BadDimensions(i32, i32),
    /// A pixel buffer whose length is not `width * height`.
    ///
    /// # Arguments
    /// - 1st argument is the expected length
    /// - 2nd argument is the length found
    WrongBitmapLength(usize, usize),
    /// A register with more than 1000 control points.
    TooManyControlPoints(usize),
    /// A negative on-wire control point count.
    BadControlPointCount(i32),
    /// A stored register length that does not match the recomputed one.
    ///
    /// # Arguments
    /// - 1st argument is the recomputed length
    /// - 2nd argument is the length stored on the wire
    WrongRegisterLength(usize, i32),
    /// `add` with a graphic id the group already holds.
    DuplicateGraphId(i32),
    /// Two on-wire registers sharing one graphic id.
    DuplicateGraphIdOnWire(i32),
    /// A remove on a group with no registers.
    EmptyGroup,
    /// No register with the given graphic id.
    NotFound(i32),
    /// A register index outside the group.
    IndexOutOfBounds(usize),
    /// `add_map` with a palette differing from the group palette.
    PaletteMismatch,
    /// Cooperative cancellation observed by the import pipeline.
    Cancelled,
    /// The external image collaborator failed.
    Image(ImageSourceError),
    /// An embedded bitmap error.
    Map(Box<MapErrors>),
    /// The shared palette body was invalid.
    Palette(PalErrors),
    /// Byte stream truncation.
    Stream(StreamError),
    /// Underlying file I/O failure.
    FileIo(std::io::Error)
}

impl FpgErrors {
    /// Which of the shared failure classes this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            FpgErrors::InvalidHeader
            | FpgErrors::BadControlPointCount(_)
            | FpgErrors::WrongRegisterLength(..)
            | FpgErrors::DuplicateGraphIdOnWire(_) => ErrorKind::Format,
            FpgErrors::BadGraphId(_)
            | FpgErrors::BadDimensions(..)
            | FpgErrors::WrongBitmapLength(..)
            | FpgErrors::TooManyControlPoints(_) => ErrorKind::Range,
            FpgErrors::DuplicateGraphId(_)
            | FpgErrors::EmptyGroup
            | FpgErrors::NotFound(_)
            | FpgErrors::IndexOutOfBounds(_)
            | FpgErrors::PaletteMismatch => ErrorKind::Operation,
            FpgErrors::Cancelled => ErrorKind::Cancelled,
            FpgErrors::Image(e) => e.kind(),
            FpgErrors::Map(e) => e.kind(),
            FpgErrors::Palette(e) => e.kind(),
            FpgErrors::Stream(_) | FpgErrors::FileIo(_) => ErrorKind::Io
        }
    }
}

impl Debug for FpgErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            FpgErrors::InvalidHeader => {
                writeln!(f, "Invalid FPG header, expected tag `fpg` with DIV magic bytes")
            }
            FpgErrors::BadGraphId(id) => {
                writeln!(
                    f,
                    "Graphic id {id} outside the valid range {MIN_GRAPH_ID}..={MAX_GRAPH_ID}"
                )
            }
            FpgErrors::BadDimensions(width, height) => {
                writeln!(f, "Bad register dimensions {width}x{height}")
            }
            FpgErrors::WrongBitmapLength(expected, found) => {
                writeln!(
                    f,
                    "Wrong pixel buffer length, expected {expected} bytes but found {found}"
                )
            }
            FpgErrors::TooManyControlPoints(found) => {
                writeln!(f, "A register can carry at most 1000 control points, found {found}")
            }
            FpgErrors::BadControlPointCount(count) => {
                writeln!(f, "Negative on-wire control point count {count}")
            }
            FpgErrors::WrongRegisterLength(expected, stored) => {
                writeln!(
                    f,
                    "Stored register length {stored} does not match the recomputed {expected}"
                )
            }
            FpgErrors::DuplicateGraphId(id) => {
                writeln!(f, "The group already contains graphic id {id}")
            }
            FpgErrors::DuplicateGraphIdOnWire(id) => {
                writeln!(f, "Two registers on the wire share graphic id {id}")
            }
            FpgErrors::EmptyGroup => {
                writeln!(f, "The group does not contain any bitmap")
            }
            FpgErrors::NotFound(id) => {
                writeln!(f, "No register with graphic id {id}")
            }
            FpgErrors::IndexOutOfBounds(index) => {
                writeln!(f, "Register index {index} outside the group")
            }
            FpgErrors::PaletteMismatch => {
                writeln!(
                    f,
                    "The bitmap palette differs from the group palette, remap it first"
                )
            }
            FpgErrors::Cancelled => {
                writeln!(f, "The import pipeline was cancelled")
            }
            FpgErrors::Image(err) => {
                writeln!(f, "Image collaborator error: {err:?}")
            }
            FpgErrors::Map(err) => {
                writeln!(f, "Bitmap error: {err:?}")
            }
            FpgErrors::Palette(err) => {
                writeln!(f, "Shared palette error: {err:?}")
            }
            FpgErrors::Stream(err) => {
                writeln!(f, "I/O error: {err:?}")
            }
            FpgErrors::FileIo(err) => {
                writeln!(f, "File I/O error: {err}")
            }
        }
    }
}

impl core::fmt::Display for FpgErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for FpgErrors {}

impl From<ImageSourceError> for FpgErrors {
    fn from(err: ImageSourceError) -> Self {
        FpgErrors::Image(err)
    }
}

impl From<MapErrors> for FpgErrors {
    fn from(err: MapErrors) -> Self {
        FpgErrors::Map(Box::new(err))
    }
}

impl From<PalErrors> for FpgErrors {
    fn from(err: PalErrors) -> Self {
        FpgErrors::Palette(err)
    }
}

impl From<StreamError> for FpgErrors {
    fn from(err: StreamError) -> Self {
        FpgErrors::Stream(err)
    }
}

impl From<std::io::Error> for FpgErrors {
    fn from(err: std::io::Error) -> Self {
        FpgErrors::FileIo(err)
    }
}
