/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The common DIV file header
//!
//! Every DIV asset file starts with the same 8 bytes: a 3-byte lowercase
//! ASCII tag naming the format (`pal`, `map`, `fpg`), the magic sequence
//! `1A 0D 0A 00` and a version byte that never changed between DIV 1
//! and DIV 2, so it is always zero.

use crate::bytestream::{ByteReader, ByteWriter};

/// Magic signature shared by every DIV format.
pub const MAGIC_NUMBER: [u8; 4] = [0x1A, 0x0D, 0x0A, 0x00];
/// The only version ever shipped.
pub const VERSION: u8 = 0;
/// Total header size: tag + magic + version.
pub const HEADER_LENGTH: usize = 8;

/// The 8-byte header of a DIV asset file, parameterized by format tag.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DivHeader {
    tag: [u8; 3]
}

impl DivHeader {
    /// Create a header for the given 3-byte lowercase tag.
    pub const fn new(tag: [u8; 3]) -> DivHeader {
        DivHeader { tag }
    }

    pub const fn tag(&self) -> [u8; 3] {
        self.tag
    }

    /// Read 8 bytes from the stream and check them against this header.
    ///
    /// The tag comparison is ASCII case-insensitive; magic and version
    /// must match exactly. Returns `false` on a short stream.
    pub fn check(&self, stream: &mut ByteReader) -> bool {
        let Ok(bytes) = stream.read_fixed_bytes_or_error::<HEADER_LENGTH>() else {
            return false;
        };

        let tag_ok = bytes[..3]
            .iter()
            .zip(self.tag.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b));

        tag_ok && bytes[3..7] == MAGIC_NUMBER && bytes[7] == VERSION
    }

    /// Check a raw buffer without consuming a reader.
    pub fn probe(&self, buffer: &[u8]) -> bool {
        let mut reader = ByteReader::new(buffer);
        self.check(&mut reader)
    }

    pub fn write_to(&self, stream: &mut ByteWriter) {
        stream.write_bytes(&self.tag);
        stream.write_bytes(&MAGIC_NUMBER);
        stream.write_u8(VERSION);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAL: DivHeader = DivHeader::new(*b"pal");

    #[test]
    fn round_trips() {
        let mut writer = ByteWriter::new();
        PAL.write_to(&mut writer);
        let bytes = writer.into_inner();

        assert_eq!(bytes.len(), HEADER_LENGTH);
        assert!(PAL.probe(&bytes));
    }

    #[test]
    fn tag_is_case_insensitive() {
        let bytes = [b'P', b'A', b'L', 0x1A, 0x0D, 0x0A, 0x00, 0x00];
        assert!(PAL.probe(&bytes));
    }

    #[test]
    fn rejects_bad_magic_version_and_tag() {
        let good = [b'p', b'a', b'l', 0x1A, 0x0D, 0x0A, 0x00, 0x00];

        let mut bad_magic = good;
        bad_magic[4] = 0x0A;
        assert!(!PAL.probe(&bad_magic));

        let mut bad_version = good;
        bad_version[7] = 1;
        assert!(!PAL.probe(&bad_version));

        let mut bad_tag = good;
        bad_tag[0] = b'm';
        assert!(!PAL.probe(&bad_tag));

        // short buffer
        assert!(!PAL.probe(&good[..7]));
    }
}
