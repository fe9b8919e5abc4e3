/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use div_core::bytestream::{ByteReader, ByteWriter};
use div_core::traits::SerializableAsset;

use crate::errors::MapErrors;

/// Serialized size of a control point: x and y as i16.
pub const CONTROL_POINT_SIZE: usize = 4;
/// Most control points a bitmap can carry.
pub const MAX_CONTROL_POINTS: usize = 1000;

/// A named coordinate inside a bitmap, used by the engine as an anchor
/// for positioning and attachment.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ControlPoint {
    pub x: i16,
    pub y: i16
}

impl ControlPoint {
    pub const fn new(x: i16, y: i16) -> ControlPoint {
        ControlPoint { x, y }
    }

    /// Decode a 4-byte control point record.
    pub fn from_buffer(buffer: &[u8]) -> Result<ControlPoint, MapErrors> {
        if buffer.len() != CONTROL_POINT_SIZE {
            return Err(MapErrors::WrongControlPointLength(buffer.len()));
        }

        let mut stream = ByteReader::new(buffer);
        ControlPoint::decode(&mut stream)
    }

    /// Decode a control point from the current stream position.
    pub fn decode(stream: &mut ByteReader) -> Result<ControlPoint, MapErrors> {
        Ok(ControlPoint {
            x: stream.get_i16_le_err()?,
            y: stream.get_i16_le_err()?
        })
    }

    /// Component access by index, 0 for x and 1 for y.
    pub const fn component(&self, index: usize) -> Result<i16, MapErrors> {
        match index {
            0 => Ok(self.x),
            1 => Ok(self.y),
            _ => Err(MapErrors::BadComponentIndex(index))
        }
    }

    pub fn set_component(&mut self, index: usize, value: i16) -> Result<(), MapErrors> {
        match index {
            0 => self.x = value,
            1 => self.y = value,
            _ => return Err(MapErrors::BadComponentIndex(index))
        }
        Ok(())
    }
}

impl SerializableAsset for ControlPoint {
    fn write_to(&self, stream: &mut ByteWriter) {
        stream.write_i16_le(self.x);
        stream.write_i16_le(self.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let point = ControlPoint::new(-1, 320);
        let bytes = point.serialize();

        assert_eq!(bytes.len(), CONTROL_POINT_SIZE);
        assert_eq!(ControlPoint::from_buffer(&bytes).unwrap(), point);
    }

    #[test]
    fn rejects_wrong_buffer_length() {
        assert!(matches!(
            ControlPoint::from_buffer(&[0; 3]),
            Err(MapErrors::WrongControlPointLength(3))
        ));
    }

    #[test]
    fn component_access_is_bounds_checked() {
        let mut point = ControlPoint::new(3, 7);

        assert_eq!(point.component(0).unwrap(), 3);
        assert_eq!(point.component(1).unwrap(), 7);
        assert!(point.component(2).is_err());

        point.set_component(1, 9).unwrap();
        assert_eq!(point.y, 9);
        assert!(point.set_component(5, 0).is_err());
    }
}
