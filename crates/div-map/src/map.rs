/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use div_core::bytestream::{ByteReader, ByteWriter};
use div_core::color::Color;
use div_core::header::DivHeader;
use div_core::traits::{
    AssetFile, FormatValidable, ImageDecoder, PaletteQuantizer, SerializableAsset
};
use div_pal::Pal;
use log::warn;

use crate::control_point::{ControlPoint, MAX_CONTROL_POINTS};
use crate::errors::MapErrors;

/// Lowest valid graphic id.
pub const MIN_GRAPH_ID: i32 = 1;
/// Highest valid graphic id.
pub const MAX_GRAPH_ID: i32 = 999;
/// Fixed width of the description field.
pub const DESCRIPTION_LENGTH: usize = 32;

const MAP_HEADER: DivHeader = DivHeader::new(*b"map");

/// Check whether `bytes` starts with a valid MAP header.
pub fn probe_map(bytes: &[u8]) -> bool {
    MAP_HEADER.probe(bytes)
}

const fn check_dimensions(width: i16, height: i16) -> Result<(), MapErrors> {
    if width < 1 || height < 1 {
        return Err(MapErrors::BadDimensions(width, height));
    }
    Ok(())
}

const fn check_graph_id(graph_id: i32) -> Result<(), MapErrors> {
    if graph_id < MIN_GRAPH_ID || graph_id > MAX_GRAPH_ID {
        return Err(MapErrors::BadGraphId(graph_id));
    }
    Ok(())
}

/// A DIV bitmap asset: one 256-color indexed image with its palette,
/// graphic id, description and control points.
#[derive(Clone, Eq, PartialEq)]
pub struct Map {
    width:          i16,
    height:         i16,
    graph_id:       i32,
    description:    String,
    palette:        Pal,
    control_points: Vec<ControlPoint>,
    pixels:         Vec<u8>
}

impl Map {
    /// Create a zero-filled bitmap.
    ///
    /// Fails with a Range-kind error on dimensions below 1 or a graphic
    /// id outside `1..=999`.
    pub fn new(
        palette: Pal, width: i16, height: i16, graph_id: i32, description: &str
    ) -> Result<Map, MapErrors> {
        check_dimensions(width, height)?;
        check_graph_id(graph_id)?;

        Ok(Map {
            width,
            height,
            graph_id,
            description: description.to_string(),
            palette,
            control_points: Vec::new(),
            pixels: vec![0; usize::from(width.unsigned_abs()) * usize::from(height.unsigned_abs())]
        })
    }

    pub const fn width(&self) -> i16 {
        self.width
    }

    pub const fn height(&self) -> i16 {
        self.height
    }

    pub const fn graph_id(&self) -> i32 {
        self.graph_id
    }

    pub fn set_graph_id(&mut self, graph_id: i32) -> Result<(), MapErrors> {
        check_graph_id(graph_id)?;
        self.graph_id = graph_id;
        Ok(())
    }

    /// The description as stored; anything past 32 bytes is dropped on
    /// encode, not here.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub const fn palette(&self) -> &Pal {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Pal {
        &mut self.palette
    }

    fn pixel_count(&self) -> usize {
        usize::from(self.width.unsigned_abs()) * usize::from(self.height.unsigned_abs())
    }

    /// Read a pixel by linear index, row-major.
    pub fn pixel(&self, index: usize) -> Result<u8, MapErrors> {
        match self.pixels.get(index) {
            Some(pixel) => Ok(*pixel),
            None => Err(MapErrors::BadPixelIndex(index))
        }
    }

    pub fn set_pixel(&mut self, index: usize, value: u8) -> Result<(), MapErrors> {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = value;
                Ok(())
            }
            None => Err(MapErrors::BadPixelIndex(index))
        }
    }

    fn offset_of(&self, x: i16, y: i16) -> Result<usize, MapErrors> {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return Err(MapErrors::BadPixelCoordinates(x, y));
        }
        Ok(usize::from(y.unsigned_abs()) * usize::from(self.width.unsigned_abs())
            + usize::from(x.unsigned_abs()))
    }

    pub fn pixel_at(&self, x: i16, y: i16) -> Result<u8, MapErrors> {
        let offset = self.offset_of(x, y)?;
        Ok(self.pixels[offset])
    }

    pub fn set_pixel_at(&mut self, x: i16, y: i16, value: u8) -> Result<(), MapErrors> {
        let offset = self.offset_of(x, y)?;
        self.pixels[offset] = value;
        Ok(())
    }

    /// The whole pixel buffer, row-major palette indices.
    pub fn bitmap(&self) -> &[u8] {
        &self.pixels
    }

    /// Replace the pixel buffer; the length must be exactly
    /// `width * height`.
    pub fn set_bitmap(&mut self, pixels: &[u8]) -> Result<(), MapErrors> {
        let expected = self.pixel_count();
        if pixels.len() != expected {
            return Err(MapErrors::WrongBitmapLength(expected, pixels.len()));
        }

        self.pixels.copy_from_slice(pixels);
        Ok(())
    }

    /// Zero every pixel.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.control_points
    }

    pub fn add_control_point(&mut self, point: ControlPoint) -> Result<(), MapErrors> {
        if self.control_points.len() >= MAX_CONTROL_POINTS {
            return Err(MapErrors::TooManyControlPoints);
        }
        self.control_points.push(point);
        Ok(())
    }

    /// Remove and return the control point at `index`; the list stays
    /// dense and ordered.
    pub fn remove_control_point(&mut self, index: usize) -> Result<ControlPoint, MapErrors> {
        if index >= self.control_points.len() {
            return Err(MapErrors::BadControlPointIndex(index));
        }
        Ok(self.control_points.remove(index))
    }

    /// The bitmap mapped through its palette into RGB-domain colors.
    pub fn rgb_texture(&self) -> Vec<Color> {
        let rgb = self.palette.to_rgb();
        self.pixels.iter().map(|p| rgb[usize::from(*p)]).collect()
    }

    /// Decode a MAP file.
    ///
    /// The on-wire control point count is clamped to 1000; points with
    /// a negative coordinate decode as the bitmap center, which is how
    /// the DIV editor treated "undefined" points.
    pub fn decode(buffer: &[u8]) -> Result<Map, MapErrors> {
        let mut stream = ByteReader::new(buffer);

        if !MAP_HEADER.check(&mut stream) {
            return Err(MapErrors::InvalidHeader);
        }

        let width = stream.get_i16_le_err()?;
        let height = stream.get_i16_le_err()?;
        check_dimensions(width, height)?;

        let graph_id = stream.get_i32_le_err()?;
        check_graph_id(graph_id)?;

        let description = stream.read_fixed_ascii(DESCRIPTION_LENGTH)?;
        let palette = Pal::decode_body(&mut stream)?;

        let stored_count = usize::from(stream.get_u16_le_err()?);
        if stored_count > MAX_CONTROL_POINTS {
            warn!("control point count {stored_count} clamped to {MAX_CONTROL_POINTS}");
        }

        let center = ControlPoint::new(width / 2, height / 2);
        let mut control_points = Vec::with_capacity(stored_count.min(MAX_CONTROL_POINTS));

        // every stored point is consumed to keep the stream aligned,
        // only the first 1000 are kept
        for i in 0..stored_count {
            let point = ControlPoint::decode(&mut stream)?;
            if i < MAX_CONTROL_POINTS {
                if point.x < 0 || point.y < 0 {
                    control_points.push(center);
                } else {
                    control_points.push(point);
                }
            }
        }

        let pixel_count =
            usize::from(width.unsigned_abs()) * usize::from(height.unsigned_abs());
        let pixels = stream.get_as_ref(pixel_count)?.to_vec();

        Ok(Map {
            width,
            height,
            graph_id,
            description,
            palette,
            control_points,
            pixels
        })
    }

    /// Build a bitmap from a foreign image via the external decode
    /// collaborator.
    ///
    /// The palette comes from the image itself: the embedded palette
    /// when the decoder surfaces one, otherwise whatever
    /// [`Pal::from_image`] can extract from the raw buffer. The graphic
    /// id defaults to [`MIN_GRAPH_ID`] and the description is empty.
    pub fn from_image(
        buffer: &[u8], decoder: &mut dyn ImageDecoder
    ) -> Result<Map, MapErrors> {
        let image = decoder.decode(buffer)?;
        check_dimensions(image.width, image.height)?;

        let palette = match &image.palette {
            Some(rgb) => Pal::from_rgb_buffer(&rgb[..])?,
            None => Pal::from_image(buffer)?
        };

        let mut map = Map::new(palette, image.width, image.height, MIN_GRAPH_ID, "")?;
        map.set_bitmap(&image.pixels)?;
        Ok(map)
    }

    /// Build a bitmap from a foreign image remapped against a supplied
    /// palette.
    pub fn from_image_with_palette(
        buffer: &[u8], palette: Pal, decoder: &mut dyn ImageDecoder,
        quantizer: &mut dyn PaletteQuantizer
    ) -> Result<Map, MapErrors> {
        let image = decoder.decode(buffer)?;
        check_dimensions(image.width, image.height)?;

        quantizer.configure(palette.colors());
        let pixels = quantizer.remap(&image.pixels, image.width, image.height);

        let mut map = Map::new(palette, image.width, image.height, MIN_GRAPH_ID, "")?;
        map.set_bitmap(&pixels)?;
        Ok(map)
    }
}

impl SerializableAsset for Map {
    fn write_to(&self, stream: &mut ByteWriter) {
        MAP_HEADER.write_to(stream);
        stream.write_i16_le(self.width);
        stream.write_i16_le(self.height);
        stream.write_i32_le(self.graph_id);
        stream.write_fixed_ascii(&self.description, DESCRIPTION_LENGTH);
        self.palette.write_body(stream);

        stream.write_u16_le(self.control_points.len() as u16);
        for point in &self.control_points {
            point.write_to(stream);
        }

        stream.write_bytes(&self.pixels);
    }
}

impl FormatValidable for Map {
    fn validate(buffer: &[u8]) -> bool {
        probe_map(buffer)
    }
}

impl AssetFile for Map {
    type Error = MapErrors;

    fn load(path: &str) -> Result<Map, MapErrors> {
        let contents = std::fs::read(path)?;
        Map::decode(&contents)
    }

    fn save(&self, path: &str) -> Result<(), MapErrors> {
        std::fs::write(path, self.serialize())?;
        Ok(())
    }
}

impl core::fmt::Debug for Map {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Map {{ {}x{}, graph_id: {}, description: {:?}, control_points: {} }}",
            self.width,
            self.height,
            self.graph_id,
            self.description,
            self.control_points.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use div_core::errors::ErrorKind;
    use div_core::header::HEADER_LENGTH;
    use div_core::palette::ColorPalette;
    use div_core::traits::{DecodedImage, ImageSourceError};
    use div_pal::PAL_BODY_SIZE;

    use super::*;

    fn sample_palette() -> Pal {
        let mut colors = ColorPalette::new();
        for i in 0..256 {
            let c = (i % 64) as u8;
            colors.set(i, Color::new(c, c, c)).unwrap();
        }
        Pal::new(colors)
    }

    fn sample_map() -> Map {
        let mut map = Map::new(sample_palette(), 4, 2, 123, "player sprite").unwrap();
        map.set_bitmap(&[1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        map.add_control_point(ControlPoint::new(1, 1)).unwrap();
        map.add_control_point(ControlPoint::new(3, 0)).unwrap();
        map
    }

    #[test]
    fn encode_decode_round_trips() {
        let map = sample_map();
        let bytes = map.serialize();

        assert!(probe_map(&bytes));
        assert_eq!(Map::decode(&bytes).unwrap(), map);
    }

    #[test]
    fn validates_dimensions_and_graph_id() {
        let pal = sample_palette();

        assert!(matches!(
            Map::new(pal.clone(), 0, 5, 1, ""),
            Err(MapErrors::BadDimensions(0, 5))
        ));
        assert!(matches!(
            Map::new(pal.clone(), 5, 5, 0, ""),
            Err(MapErrors::BadGraphId(0))
        ));
        assert!(matches!(
            Map::new(pal.clone(), 5, 5, 1000, ""),
            Err(MapErrors::BadGraphId(1000))
        ));
        assert!(Map::new(pal.clone(), 5, 5, MIN_GRAPH_ID, "").is_ok());
        assert!(Map::new(pal, 5, 5, MAX_GRAPH_ID, "").is_ok());
    }

    #[test]
    fn description_truncates_at_the_field_width() {
        let long = "a".repeat(40);
        let mut map = sample_map();
        map.set_description(&long);

        let decoded = Map::decode(&map.serialize()).unwrap();
        assert_eq!(decoded.description(), "a".repeat(32));
    }

    #[test]
    fn pixel_access_is_bounds_checked() {
        let mut map = sample_map();

        assert_eq!(map.pixel(0).unwrap(), 1);
        assert_eq!(map.pixel_at(3, 1).unwrap(), 8);
        map.set_pixel_at(0, 1, 42).unwrap();
        assert_eq!(map.pixel(4).unwrap(), 42);

        let err = map.pixel(8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Range);
        assert!(map.pixel_at(4, 0).is_err());
        assert!(map.pixel_at(-1, 0).is_err());
        assert!(map.set_pixel_at(0, 2, 0).is_err());
    }

    #[test]
    fn set_bitmap_requires_the_exact_length() {
        let mut map = sample_map();

        assert!(matches!(
            map.set_bitmap(&[0; 7]),
            Err(MapErrors::WrongBitmapLength(8, 7))
        ));

        map.clear();
        assert!(map.bitmap().iter().all(|p| *p == 0));
    }

    #[test]
    fn control_point_removal_keeps_order() {
        let mut map = sample_map();

        let removed = map.remove_control_point(0).unwrap();
        assert_eq!(removed, ControlPoint::new(1, 1));
        assert_eq!(map.control_points(), &[ControlPoint::new(3, 0)]);

        assert!(matches!(
            map.remove_control_point(5),
            Err(MapErrors::BadControlPointIndex(5))
        ));
    }

    #[test]
    fn negative_control_points_decode_as_the_center() {
        let mut bytes = sample_map().serialize();

        // first point sits right after header, fixed fields and palette
        let at = HEADER_LENGTH + 2 + 2 + 4 + DESCRIPTION_LENGTH + PAL_BODY_SIZE + 2;
        bytes[at..at + 2].copy_from_slice(&(-1_i16).to_le_bytes());

        let decoded = Map::decode(&bytes).unwrap();
        assert_eq!(decoded.control_points()[0], ControlPoint::new(2, 1));
        assert_eq!(decoded.control_points()[1], ControlPoint::new(3, 0));
    }

    #[test]
    fn wire_count_is_clamped_to_the_maximum() {
        let map = Map::new(sample_palette(), 1, 1, 1, "").unwrap();
        let mut bytes = map.serialize();

        // rewrite the tail: count 1001, that many points, one pixel
        bytes.truncate(HEADER_LENGTH + 2 + 2 + 4 + DESCRIPTION_LENGTH + PAL_BODY_SIZE);
        bytes.extend_from_slice(&1001_u16.to_le_bytes());
        for _ in 0..1001 {
            bytes.extend_from_slice(&[1, 0, 1, 0]);
        }
        bytes.push(9);

        let decoded = Map::decode(&bytes).unwrap();
        assert_eq!(decoded.control_points().len(), MAX_CONTROL_POINTS);
        assert_eq!(decoded.pixel(0).unwrap(), 9);
    }

    #[test]
    fn truncated_pixels_fail_with_io_kind() {
        let mut bytes = sample_map().serialize();
        bytes.truncate(bytes.len() - 3);

        let err = Map::decode(&bytes).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn rgb_texture_maps_through_the_palette() {
        let map = sample_map();
        let texture = map.rgb_texture();

        assert_eq!(texture.len(), 8);
        // pixel 0 is palette index 1, DAC 1 -> RGB 4
        assert_eq!(texture[0], Color::new(4, 4, 4));
    }

    struct FixedDecoder {
        palette: Option<Box<[u8; 768]>>
    }

    impl ImageDecoder for FixedDecoder {
        fn decode(&mut self, _buffer: &[u8]) -> Result<DecodedImage, ImageSourceError> {
            Ok(DecodedImage {
                pixels:  vec![0, 1, 2, 3],
                width:   2,
                height:  2,
                mime:    "image/png",
                palette: self.palette.take()
            })
        }
    }

    #[test]
    fn from_image_prefers_the_embedded_palette() {
        let mut rgb = Box::new([0_u8; 768]);
        rgb[0] = 255;

        let mut decoder = FixedDecoder { palette: Some(rgb) };
        let map = Map::from_image(&[0; 4], &mut decoder).unwrap();

        assert_eq!(map.width(), 2);
        assert_eq!(map.graph_id(), MIN_GRAPH_ID);
        assert_eq!(map.palette().colors().get(0).unwrap(), Color::new(63, 0, 0));
        assert_eq!(map.bitmap(), &[0, 1, 2, 3]);
    }

    #[test]
    fn from_image_falls_back_to_buffer_extraction() {
        let mut decoder = FixedDecoder { palette: None };

        // the raw buffer is not a palette-bearing image either
        let err = Map::from_image(&[0; 4], &mut decoder).unwrap_err();
        assert!(matches!(err, MapErrors::Palette(_)));
    }

    struct InvertingQuantizer;

    impl PaletteQuantizer for InvertingQuantizer {
        fn configure(&mut self, _palette: &ColorPalette) {}

        fn remap(&mut self, pixels: &[u8], _width: i16, _height: i16) -> Vec<u8> {
            pixels.iter().map(|p| 255 - p).collect()
        }
    }

    #[test]
    fn from_image_with_palette_remaps_pixels() {
        let mut decoder = FixedDecoder { palette: None };
        let map = Map::from_image_with_palette(
            &[0; 4],
            sample_palette(),
            &mut decoder,
            &mut InvertingQuantizer
        )
        .unwrap();

        assert_eq!(map.bitmap(), &[255, 254, 253, 252]);
        assert_eq!(*map.palette(), sample_palette());
    }
}
