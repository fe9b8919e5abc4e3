/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! A 256-color PCX decoder
//!
//! The DIV editor's native import format is 8-bit PCX: a 128-byte
//! header, a run-length encoded pixel stream and a 769-byte tail holding
//! the marker `0x0C` plus a 768-byte RGB palette. This crate decodes
//! exactly that profile; anything that is not an 8-bpp single-plane PCX
//! with a trailing palette is rejected up front by [`probe_pcx`].
//!
//! The run-length state machine is exposed on its own as
//! [`decode_rle`] so callers with a pre-positioned stream (and tests)
//! can drive it directly.
//!
//! # Unsupported formats
//! - Truecolor (24-bit) PCX
//! - Multi-plane 4/16 color images

pub use crate::decoder::{probe_pcx, PcxDecoder};
pub use crate::errors::PcxDecodeErrors;
pub use crate::rle::{decode_rle, read_trailing_palette, PALETTE_MARKER};

mod decoder;
mod errors;
mod rle;
