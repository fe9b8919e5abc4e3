/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use core::fmt::{Debug, Formatter};

/// Errors from the byte reader.
pub enum StreamError {
    /// Requested more bytes than the stream holds.
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes requested
    /// - 2nd argument is the number of bytes remaining
    NotEnoughBytes(usize, usize),
    /// Generic message that needs no heap allocation
    Generic(&'static str)
}

impl Debug for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            StreamError::NotEnoughBytes(requested, available) => {
                writeln!(
                    f,
                    "Not enough bytes, requested {requested} but the stream has {available}"
                )
            }
            StreamError::Generic(msg) => {
                writeln!(f, "{msg}")
            }
        }
    }
}

impl core::fmt::Display for StreamError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{self:?}")
    }
}

impl std::error::Error for StreamError {}

impl From<&'static str> for StreamError {
    fn from(msg: &'static str) -> Self {
        StreamError::Generic(msg)
    }
}

/// A bounds-checked little-endian cursor over an in-memory buffer.
///
/// Fallible reads (`*_err`) return [`StreamError::NotEnoughBytes`]
/// carrying the requested vs. remaining byte counts, which the codec
/// crates bubble up into their own error enums.
pub struct ByteReader<'a> {
    buffer:   &'a [u8],
    position: usize
}

impl<'a> ByteReader<'a> {
    pub const fn new(buffer: &'a [u8]) -> ByteReader<'a> {
        ByteReader { buffer, position: 0 }
    }

    /// Number of bytes not yet consumed.
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    pub const fn position(&self) -> usize {
        self.position
    }

    /// Move the cursor to an absolute offset.
    ///
    /// Seeking past the end is allowed; the next read will fail.
    pub fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub fn skip(&mut self, num: usize) {
        self.position = self.position.saturating_add(num);
    }

    pub const fn eof(&self) -> bool {
        self.position >= self.buffer.len()
    }

    pub fn get_u8_err(&mut self) -> Result<u8, StreamError> {
        match self.buffer.get(self.position) {
            Some(byte) => {
                self.position += 1;
                Ok(*byte)
            }
            None => Err(StreamError::NotEnoughBytes(1, 0))
        }
    }

    /// Read `N` bytes or error out without moving the cursor.
    pub fn read_fixed_bytes_or_error<const N: usize>(&mut self) -> Result<[u8; N], StreamError> {
        match self.buffer.get(self.position..self.position + N) {
            Some(bytes) => {
                let mut store = [0; N];
                store.copy_from_slice(bytes);
                self.position += N;
                Ok(store)
            }
            None => Err(StreamError::NotEnoughBytes(N, self.remaining()))
        }
    }

    /// Fill `buf` exactly or error out without moving the cursor.
    pub fn read_exact_bytes(&mut self, buf: &mut [u8]) -> Result<(), StreamError> {
        match self.buffer.get(self.position..self.position + buf.len()) {
            Some(bytes) => {
                buf.copy_from_slice(bytes);
                self.position += buf.len();
                Ok(())
            }
            None => Err(StreamError::NotEnoughBytes(buf.len(), self.remaining()))
        }
    }

    /// Read a fixed-width zero-padded ASCII field into a string.
    ///
    /// Bytes after the first NUL are dropped; non-ASCII bytes map
    /// through Latin-1 so malformed fields still decode.
    pub fn read_fixed_ascii(&mut self, width: usize) -> Result<String, StreamError> {
        let bytes = self.get_as_ref(width)?;
        let end = bytes.iter().position(|b| *b == 0).unwrap_or(width);

        Ok(bytes[..end].iter().map(|b| char::from(*b)).collect())
    }

    /// Borrow `num` bytes from the current position and advance past them.
    pub fn get_as_ref(&mut self, num: usize) -> Result<&'a [u8], StreamError> {
        match self.buffer.get(self.position..self.position + num) {
            Some(bytes) => {
                self.position += num;
                Ok(bytes)
            }
            None => Err(StreamError::NotEnoughBytes(num, self.remaining()))
        }
    }
}

macro_rules! get_single_type {
    ($name:tt,$int_type:tt) => {
        impl<'a> ByteReader<'a> {
            #[doc = concat!("Read ", stringify!($int_type), " as a little endian integer")]
            #[doc = concat!("Returning an error if the stream cannot support a ", stringify!($int_type), " read.")]
            #[inline]
            pub fn $name(&mut self) -> Result<$int_type, StreamError> {
                const SIZE_OF_VAL: usize = core::mem::size_of::<$int_type>();

                let space = self.read_fixed_bytes_or_error::<SIZE_OF_VAL>()?;

                Ok($int_type::from_le_bytes(space))
            }
        }
    };
}

get_single_type!(get_u16_le_err, u16);
get_single_type!(get_i16_le_err, i16);
get_single_type!(get_u32_le_err, u32);
get_single_type!(get_i32_le_err, i32);
