/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The DIV Games Studio PAL codec
//!
//! A PAL file is the common 8-byte header with tag `pal` followed by a
//! 1344-byte body: the 768-byte DAC color table and the 576-byte
//! color-cycling range table. The same body is embedded verbatim inside
//! MAP and FPG files, so the body encode/decode routines are public for
//! those codecs.
//!
//! Palettes can also be pulled out of foreign images via
//! [`Pal::from_image`], which tries a fixed list of extractors in
//! order: the PNG `PLTE` chunk, the PCX trailing palette block, and
//! finally a PAL file pass-through.

pub use crate::errors::PalErrors;
pub use crate::extractor::{
    PalPassthrough, PaletteExtractor, PcxPaletteExtractor, PngPaletteExtractor
};
pub use crate::pal::{probe_pal, Pal, PAL_BODY_SIZE, PAL_FILE_SIZE};

mod errors;
mod extractor;
mod pal;
