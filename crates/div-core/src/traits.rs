/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Capability traits shared by the DIV asset types
//!
//! The original toolchain modeled these as a base class plus marker
//! interfaces; here each codec implements the small traits it needs and
//! shares no mutable base state.
//!
//! The second half of this module is the seam to the two external
//! collaborators the codecs consume but never implement: a
//! general-purpose image decoder and a palette quantizer. Both are black
//! boxes behind traits so the codec crates stay free of raster-format
//! knowledge beyond their own wire formats.

use core::fmt::{Debug, Formatter};

use crate::bytestream::ByteWriter;
use crate::errors::ErrorKind;
use crate::palette::ColorPalette;

/// An asset (or asset section) with a byte-exact wire form.
pub trait SerializableAsset {
    /// Append the wire form of `self` to the stream.
    fn write_to(&self, stream: &mut ByteWriter);

    /// The wire form of `self` as an owned buffer.
    fn serialize(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        self.write_to(&mut writer);
        writer.into_inner()
    }
}

/// A format whose header can be checked without decoding the body.
pub trait FormatValidable {
    /// True iff `buffer` starts with a well-formed header for this
    /// format. Body contents are not inspected.
    fn validate(buffer: &[u8]) -> bool;
}

/// An asset that can be loaded from and saved to a file path.
pub trait AssetFile: Sized {
    type Error;

    fn load(path: &str) -> Result<Self, Self::Error>;

    fn save(&self, path: &str) -> Result<(), Self::Error>;
}

/// Errors surfaced by the external collaborators.
pub enum ImageSourceError {
    /// The collaborator could not decode the buffer.
    DecodeFailed(String),
    /// The decoded image is not 8-bit indexed.
    NotIndexed
}

impl ImageSourceError {
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Format
    }
}

impl Debug for ImageSourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            ImageSourceError::DecodeFailed(msg) => {
                writeln!(f, "Image decode failed: {msg}")
            }
            ImageSourceError::NotIndexed => {
                writeln!(f, "The decoded image is not an 8-bit indexed image")
            }
        }
    }
}

impl core::fmt::Display for ImageSourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for ImageSourceError {}

/// What the external image decoder hands back: one byte per pixel plus
/// dimensions, and the embedded palette when the source format carries
/// one. Palette bytes are in the RGB domain [0..255].
pub struct DecodedImage {
    pub pixels:  Vec<u8>,
    pub width:   i16,
    pub height:  i16,
    pub mime:    &'static str,
    pub palette: Option<Box<[u8; 768]>>
}

/// The external image-decode collaborator.
///
/// Implementations wrap whatever raster library the host application
/// uses. The codecs only require indexed output; converting truecolor
/// sources down to 256 colors is the collaborator's business.
///
/// Implementations are not assumed to be safe for concurrent use; the
/// import pipeline drives one decoder from one thread.
pub trait ImageDecoder {
    fn decode(&mut self, buffer: &[u8]) -> Result<DecodedImage, ImageSourceError>;
}

/// The external palette-quantization collaborator.
///
/// `configure` fixes the target palette, `remap` rewrites indexed pixels
/// against it. Splitting the two lets callers skip reconfiguration when
/// many images share one palette; see [`CachedQuantizer`].
pub trait PaletteQuantizer {
    fn configure(&mut self, palette: &ColorPalette);

    fn remap(&mut self, pixels: &[u8], width: i16, height: i16) -> Vec<u8>;
}

/// Wraps a [`PaletteQuantizer`], calling `configure` only when the
/// palette content hash differs from the previous call.
///
/// This replaces the original exporter's process-wide "last palette
/// used" static with an explicit cache owned by the caller.
pub struct CachedQuantizer<Q: PaletteQuantizer> {
    inner:     Q,
    last_hash: Option<u64>
}

impl<Q: PaletteQuantizer> CachedQuantizer<Q> {
    pub fn new(inner: Q) -> CachedQuantizer<Q> {
        CachedQuantizer { inner, last_hash: None }
    }

    /// Configure the wrapped quantizer iff `palette` changed since the
    /// last call. Returns true when a reconfiguration happened.
    pub fn configure(&mut self, palette: &ColorPalette) -> bool {
        let hash = palette.content_hash();
        if self.last_hash == Some(hash) {
            return false;
        }
        self.inner.configure(palette);
        self.last_hash = Some(hash);
        true
    }

    pub fn remap(&mut self, pixels: &[u8], width: i16, height: i16) -> Vec<u8> {
        self.inner.remap(pixels, width, height)
    }

    pub fn into_inner(self) -> Q {
        self.inner
    }
}
