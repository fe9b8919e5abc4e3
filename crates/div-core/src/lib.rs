/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Core routines shared by the DIV asset codec crates
//!
//! This crate provides the plumbing shared by the PAL, MAP and FPG
//! codecs under the `div` umbrella:
//!
//! - A little-endian byte reader and writer used by all wire formats
//! - The common 8-byte DIV file header (tag + magic + version)
//! - The indexed color model: [`Color`](color::Color),
//!   [`ColorPalette`](palette::ColorPalette) and the color-cycling
//!   [`ColorRangeTable`](palette::ColorRangeTable)
//! - Capability traits implemented by each asset type, and the traits
//!   for the external image-decode and palette-quantization collaborators
//!
//! The crate decodes nothing by itself; the per-format crates build on it.

pub mod bytestream;
pub mod color;
pub mod errors;
pub mod header;
pub mod palette;
pub mod traits;
