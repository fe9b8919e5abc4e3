/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// A growable little-endian byte writer.
///
/// All DIV formats are encoded front to back with no backpatching, so
/// the writer only ever appends and writes cannot fail.
#[derive(Default)]
pub struct ByteWriter {
    buffer: Vec<u8>
}

impl ByteWriter {
    pub fn new() -> ByteWriter {
        ByteWriter { buffer: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> ByteWriter {
        ByteWriter {
            buffer: Vec::with_capacity(capacity)
        }
    }

    /// Number of bytes written so far.
    pub fn position(&self) -> usize {
        self.buffer.len()
    }

    pub fn write_u8(&mut self, byte: u8) {
        self.buffer.push(byte);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Write `text` into a fixed-width zero-padded field.
    ///
    /// Input longer than `width` bytes is truncated; this is the only
    /// silent data loss any encoder performs.
    pub fn write_fixed_ascii(&mut self, text: &str, width: usize) {
        let bytes = text.as_bytes();
        let take = bytes.len().min(width);

        self.buffer.extend_from_slice(&bytes[..take]);
        self.buffer.resize(self.buffer.len() + (width - take), 0);
    }

    /// Destroy the writer, returning the bytes written.
    pub fn into_inner(self) -> Vec<u8> {
        self.buffer
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }
}

macro_rules! write_single_type {
    ($name:tt,$int_type:tt) => {
        impl ByteWriter {
            #[doc = concat!("Write ", stringify!($int_type), " as a little endian integer")]
            #[inline]
            pub fn $name(&mut self, value: $int_type) {
                self.buffer.extend_from_slice(&value.to_le_bytes());
            }
        }
    };
}

write_single_type!(write_u16_le, u16);
write_single_type!(write_i16_le, i16);
write_single_type!(write_u32_le, u32);
write_single_type!(write_i32_le, i32);

#[cfg(test)]
mod tests {
    use super::ByteWriter;

    #[test]
    fn fixed_ascii_pads_and_truncates() {
        let mut writer = ByteWriter::new();
        writer.write_fixed_ascii("ab", 4);
        writer.write_fixed_ascii("overlong", 4);

        assert_eq!(writer.into_inner(), b"ab\0\0over".to_vec());
    }

    #[test]
    fn writes_little_endian() {
        let mut writer = ByteWriter::new();
        writer.write_i16_le(-2);
        writer.write_u32_le(0x0A0D_1A00);
        writer.write_u8(7);

        assert_eq!(writer.position(), 7);
        assert_eq!(
            writer.into_inner(),
            vec![0xFE, 0xFF, 0x00, 0x1A, 0x0D, 0x0A, 0x07]
        );
    }
}
