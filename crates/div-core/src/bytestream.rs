/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Endian-aware byte readers and writers
//!
//! Every DIV wire format is little-endian with fixed-size sections, so
//! the reader is a thin bounds-checked cursor over `&[u8]` and the
//! writer appends to an owned `Vec<u8>`.

pub use crate::bytestream::reader::{ByteReader, StreamError};
pub use crate::bytestream::writer::ByteWriter;

mod reader;
mod writer;
