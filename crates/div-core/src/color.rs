/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The indexed color model
//!
//! DIV Games Studio drives the VGA DAC directly, so palette colors live
//! in a 6-bit-per-channel domain \[0..63\] ("DAC") while every modern
//! image tool speaks 8-bit-per-channel \[0..255\] ("RGB"). A [`Color`]
//! is three untagged bytes; which domain they belong to is a property of
//! where the value came from, and the conversions between the two are
//! lossy in both directions.

use core::cmp::Ordering;
use core::fmt::{Debug, Formatter};

use crate::bytestream::ByteWriter;
use crate::errors::ErrorKind;
use crate::traits::SerializableAsset;

/// Factor used to stretch DAC values [0..63] into RGB [0..255].
///
/// 4.05 rather than 4.0 so that 63 maps to 255 and not 252; inherited
/// from the original exporter.
const DAC_TO_RGB_FACTOR: f32 = 4.05;
/// Divisor used to squash RGB values [0..255] into DAC [0..63].
const RGB_TO_DAC_FACTOR: u8 = 4;

/// Max supported component value in DAC format.
pub const MAX_DAC_VALUE: u8 = 63;
/// Number of components in a color.
pub const COLOR_LENGTH: usize = 3;

/// Errors from [`Color`] construction and component access.
pub enum ColorError {
    /// The source buffer was not exactly 3 bytes.
    WrongBufferLength(usize),
    /// A component index outside `0..3`.
    BadComponentIndex(usize)
}

impl ColorError {
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Range
    }
}

impl Debug for ColorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ColorError::WrongBufferLength(found) => {
                writeln!(
                    f,
                    "A color buffer must be exactly {COLOR_LENGTH} bytes, found {found}"
                )
            }
            ColorError::BadComponentIndex(index) => {
                writeln!(
                    f,
                    "Color component index must be below {COLOR_LENGTH}, found {index}"
                )
            }
        }
    }
}

impl core::fmt::Display for ColorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ColorError {}

/// A single palette entry, three untagged 8-bit components.
#[derive(Copy, Clone, Eq, PartialEq, Default, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Color {
        Color { r, g, b }
    }

    /// Build a color from a 3-byte buffer.
    pub fn from_buffer(buffer: &[u8]) -> Result<Color, ColorError> {
        if buffer.len() != COLOR_LENGTH {
            return Err(ColorError::WrongBufferLength(buffer.len()));
        }
        Ok(Color::new(buffer[0], buffer[1], buffer[2]))
    }

    /// Get a component by index (0 = red, 1 = green, 2 = blue).
    pub const fn component(&self, index: usize) -> Result<u8, ColorError> {
        match index {
            0 => Ok(self.r),
            1 => Ok(self.g),
            2 => Ok(self.b),
            _ => Err(ColorError::BadComponentIndex(index))
        }
    }

    pub fn set_component(&mut self, index: usize, value: u8) -> Result<(), ColorError> {
        match index {
            0 => self.r = value,
            1 => self.g = value,
            2 => self.b = value,
            _ => return Err(ColorError::BadComponentIndex(index))
        }
        Ok(())
    }

    /// Convert a DAC-domain color [0..63] to the RGB domain [0..255].
    ///
    /// The result is an approximation; components already above the DAC
    /// range saturate at 255.
    pub fn to_rgb(self) -> Color {
        let stretch = |c: u8| (f32::from(c) * DAC_TO_RGB_FACTOR) as u8;

        Color::new(stretch(self.r), stretch(self.g), stretch(self.b))
    }

    /// Convert an RGB-domain color [0..255] to the DAC domain [0..63].
    pub const fn to_dac(self) -> Color {
        Color::new(
            self.r / RGB_TO_DAC_FACTOR,
            self.g / RGB_TO_DAC_FACTOR,
            self.b / RGB_TO_DAC_FACTOR
        )
    }

    /// Whether all three components fit the DAC range [0..63].
    ///
    /// This is a heuristic range test, not a domain tag: an RGB-domain
    /// color that happens to be dark enough also passes it.
    pub const fn is_dac(&self) -> bool {
        self.r <= MAX_DAC_VALUE && self.g <= MAX_DAC_VALUE && self.b <= MAX_DAC_VALUE
    }

    /// The components packed as `r << 16 | g << 8 | b`.
    ///
    /// Only a tie-break convention for sorting and deduplication; it has
    /// no relation to perceptual distance.
    pub const fn packed(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | (self.b as u32)
    }
}

impl PartialOrd for Color {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Color {
    fn cmp(&self, other: &Self) -> Ordering {
        self.packed().cmp(&other.packed())
    }
}

impl SerializableAsset for Color {
    fn write_to(&self, stream: &mut ByteWriter) {
        stream.write_bytes(&[self.r, self.g, self.b]);
    }
}

impl Debug for Color {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "Color {{ r: {}, g: {}, b: {} }}", self.r, self.g, self.b)
    }
}
