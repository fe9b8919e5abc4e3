/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Shared error classification
//!
//! Each codec crate defines its own error enum with full context
//! (expected vs. found lengths, offending indices); every one of those
//! enums also reports which of the five failure classes it belongs to
//! via a `kind()` method returning [`ErrorKind`]. Callers that only care
//! about the class match on the kind, callers that build messages match
//! on the concrete variant.

/// The failure classes shared by all DIV codec crates.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum ErrorKind {
    /// Malformed bytes: header mismatch, bad RLE marker, palette entries
    /// outside the DAC range, corrupt section lengths.
    Format,
    /// An index, coordinate, dimension or id outside its valid domain.
    Range,
    /// A collection operation that cannot proceed: duplicate graph id on
    /// add, removal of a missing entry, removal from an empty group.
    Operation,
    /// Stream truncation or an underlying file I/O failure.
    Io,
    /// A cooperative cancellation observed during a batch pipeline.
    Cancelled
}
