/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The DIV Games Studio FPG codec
//!
//! An FPG packs many bitmaps under one shared palette. Each bitmap
//! lives in a register addressed by a graphic id that is unique within
//! the group; registers carry their own description, stored filename
//! and control points, and serialize back to back with a redundant
//! length field for skip scanning.
//!
//! Building an FPG from a batch of foreign images goes through
//! [`ImportPipeline`], which drives the external decode and quantize
//! collaborators, reports progress and honors cooperative cancellation.

pub use crate::errors::FpgErrors;
pub use crate::fpg::{probe_fpg, Fpg};
pub use crate::import::{
    ImportItem, ImportPipeline, ImportState, ProgressSink
};
pub use crate::register::{Register, FILENAME_LENGTH, REGISTER_BASE_LENGTH};

mod errors;
mod fpg;
mod import;
mod register;
