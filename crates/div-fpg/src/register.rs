/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use div_core::bytestream::{ByteReader, ByteWriter};
use div_core::traits::SerializableAsset;
use div_map::{
    ControlPoint, Map, CONTROL_POINT_SIZE, DESCRIPTION_LENGTH, MAX_CONTROL_POINTS,
    MAX_GRAPH_ID, MIN_GRAPH_ID
};

use crate::errors::FpgErrors;

/// Fixed width of the stored filename field.
pub const FILENAME_LENGTH: usize = 12;
/// Bytes of register metadata before the control points and pixels:
/// graph id, stored length, description, filename, width, height and
/// control point count.
pub const REGISTER_BASE_LENGTH: usize = 64;

pub(crate) const fn check_graph_id(graph_id: i32) -> Result<(), FpgErrors> {
    if graph_id < MIN_GRAPH_ID || graph_id > MAX_GRAPH_ID {
        return Err(FpgErrors::BadGraphId(graph_id));
    }
    Ok(())
}

/// One bitmap inside an FPG: the MAP payload minus its own palette,
/// plus the filename it was imported from.
///
/// Width and height never exceed `i16` but serialize as `i32`; that is
/// what makes the 64-byte metadata block add up.
#[derive(Clone, Eq, PartialEq)]
pub struct Register {
    graph_id:       i32,
    description:    String,
    filename:       String,
    width:          i16,
    height:         i16,
    control_points: Vec<ControlPoint>,
    pixels:         Vec<u8>
}

impl Register {
    /// Create a register, validating graphic id, dimensions, control
    /// point count and pixel buffer length.
    pub fn new(
        graph_id: i32, description: &str, filename: &str, width: i16, height: i16,
        control_points: Vec<ControlPoint>, pixels: Vec<u8>
    ) -> Result<Register, FpgErrors> {
        check_graph_id(graph_id)?;

        if width < 1 || height < 1 {
            return Err(FpgErrors::BadDimensions(i32::from(width), i32::from(height)));
        }
        if control_points.len() > MAX_CONTROL_POINTS {
            return Err(FpgErrors::TooManyControlPoints(control_points.len()));
        }

        let expected = usize::from(width.unsigned_abs()) * usize::from(height.unsigned_abs());
        if pixels.len() != expected {
            return Err(FpgErrors::WrongBitmapLength(expected, pixels.len()));
        }

        Ok(Register {
            graph_id,
            description: description.to_string(),
            filename: filename.to_string(),
            width,
            height,
            control_points,
            pixels
        })
    }

    /// Repack a standalone bitmap as a register; its palette is dropped
    /// in favor of the group palette.
    pub fn from_map(map: &Map, filename: &str) -> Register {
        Register {
            graph_id:       map.graph_id(),
            description:    map.description().to_string(),
            filename:       filename.to_string(),
            width:          map.width(),
            height:         map.height(),
            control_points: map.control_points().to_vec(),
            pixels:         map.bitmap().to_vec()
        }
    }

    pub const fn graph_id(&self) -> i32 {
        self.graph_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub const fn width(&self) -> i16 {
        self.width
    }

    pub const fn height(&self) -> i16 {
        self.height
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.control_points
    }

    pub fn bitmap(&self) -> &[u8] {
        &self.pixels
    }

    /// The on-wire size of this register, stored redundantly in front
    /// of every record for skip scanning.
    pub fn byte_length(&self) -> usize {
        REGISTER_BASE_LENGTH
            + CONTROL_POINT_SIZE * self.control_points.len()
            + self.pixels.len()
    }

    /// Decode one register record from the current stream position.
    ///
    /// The stored length must match the length recomputed from the
    /// dimensions and control point count.
    pub fn decode(stream: &mut ByteReader) -> Result<Register, FpgErrors> {
        let graph_id = stream.get_i32_le_err()?;
        check_graph_id(graph_id)?;

        let stored_length = stream.get_i32_le_err()?;
        let description = stream.read_fixed_ascii(DESCRIPTION_LENGTH)?;
        let filename = stream.read_fixed_ascii(FILENAME_LENGTH)?;

        let width = stream.get_i32_le_err()?;
        let height = stream.get_i32_le_err()?;
        if !(1..=i32::from(i16::MAX)).contains(&width)
            || !(1..=i32::from(i16::MAX)).contains(&height)
        {
            return Err(FpgErrors::BadDimensions(width, height));
        }
        let width = width as i16;
        let height = height as i16;

        let count = stream.get_i32_le_err()?;
        let Ok(count) = usize::try_from(count) else {
            return Err(FpgErrors::BadControlPointCount(count));
        };

        let mut control_points = Vec::with_capacity(count.min(stream.remaining() / 4));
        for _ in 0..count {
            control_points.push(ControlPoint::decode(stream)?);
        }

        let pixel_count =
            usize::from(width.unsigned_abs()) * usize::from(height.unsigned_abs());
        let pixels = stream.get_as_ref(pixel_count)?.to_vec();

        let register = Register {
            graph_id,
            description,
            filename,
            width,
            height,
            control_points,
            pixels
        };

        if stored_length != register.byte_length() as i32 {
            return Err(FpgErrors::WrongRegisterLength(
                register.byte_length(),
                stored_length
            ));
        }

        Ok(register)
    }
}

impl SerializableAsset for Register {
    fn write_to(&self, stream: &mut ByteWriter) {
        stream.write_i32_le(self.graph_id);
        stream.write_i32_le(self.byte_length() as i32);
        stream.write_fixed_ascii(&self.description, DESCRIPTION_LENGTH);
        stream.write_fixed_ascii(&self.filename, FILENAME_LENGTH);
        stream.write_i32_le(i32::from(self.width));
        stream.write_i32_le(i32::from(self.height));

        stream.write_i32_le(self.control_points.len() as i32);
        for point in &self.control_points {
            point.write_to(stream);
        }

        stream.write_bytes(&self.pixels);
    }
}

impl core::fmt::Debug for Register {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Register {{ graph_id: {}, {}x{}, filename: {:?}, control_points: {} }}",
            self.graph_id,
            self.width,
            self.height,
            self.filename,
            self.control_points.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use div_core::errors::ErrorKind;

    use super::*;

    fn sample_register() -> Register {
        Register::new(
            7,
            "walk cycle",
            "WALK.PNG",
            3,
            2,
            vec![ControlPoint::new(1, 1)],
            vec![1, 2, 3, 4, 5, 6]
        )
        .unwrap()
    }

    #[test]
    fn round_trips_with_a_matching_length_field() {
        let register = sample_register();
        let bytes = register.serialize();

        assert_eq!(bytes.len(), register.byte_length());
        assert_eq!(register.byte_length(), 64 + 4 + 6);

        let mut stream = ByteReader::new(&bytes);
        assert_eq!(Register::decode(&mut stream).unwrap(), register);
        assert!(stream.eof());
    }

    #[test]
    fn corrupted_length_field_fails_decode() {
        let mut bytes = sample_register().serialize();
        // the stored length sits right after the graph id
        bytes[4..8].copy_from_slice(&999_i32.to_le_bytes());

        let mut stream = ByteReader::new(&bytes);
        let err = Register::decode(&mut stream).unwrap_err();
        assert!(matches!(err, FpgErrors::WrongRegisterLength(74, 999)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn filename_truncates_at_twelve_bytes() {
        let register = Register::new(
            1,
            "",
            "VERY_LONG_FILENAME.PNG",
            1,
            1,
            Vec::new(),
            vec![0]
        )
        .unwrap();

        let bytes = register.serialize();
        let mut stream = ByteReader::new(&bytes);
        let decoded = Register::decode(&mut stream).unwrap();
        assert_eq!(decoded.filename(), "VERY_LONG_FI");
    }

    #[test]
    fn validates_construction() {
        assert!(matches!(
            Register::new(0, "", "", 1, 1, Vec::new(), vec![0]),
            Err(FpgErrors::BadGraphId(0))
        ));
        assert!(matches!(
            Register::new(1, "", "", 0, 1, Vec::new(), vec![0]),
            Err(FpgErrors::BadDimensions(0, 1))
        ));
        assert!(matches!(
            Register::new(1, "", "", 2, 2, Vec::new(), vec![0; 3]),
            Err(FpgErrors::WrongBitmapLength(4, 3))
        ));
        assert!(matches!(
            Register::new(1, "", "", 1, 1, vec![ControlPoint::default(); 1001], vec![0]),
            Err(FpgErrors::TooManyControlPoints(1001))
        ));
    }
}
