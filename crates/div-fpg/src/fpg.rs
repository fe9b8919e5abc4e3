/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
use div_core::bytestream::{ByteReader, ByteWriter};
use div_core::header::DivHeader;
use div_core::traits::{AssetFile, FormatValidable, PaletteQuantizer, SerializableAsset};
use div_map::Map;
use div_pal::Pal;
use log::trace;

use crate::errors::FpgErrors;
use crate::register::{check_graph_id, Register};

pub(crate) const FPG_HEADER: DivHeader = DivHeader::new(*b"fpg");

/// Check whether `bytes` starts with a valid FPG header.
pub fn probe_fpg(bytes: &[u8]) -> bool {
    FPG_HEADER.probe(bytes)
}

/// A DIV graphic package: one shared palette and an ordered group of
/// bitmap registers with unique graphic ids.
///
/// The group palette is the single source of truth; a bitmap added via
/// [`add_map`](Fpg::add_map) must already use it, and
/// [`add_map_quantized`](Fpg::add_map_quantized) remaps one that does
/// not.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Fpg {
    palette:   Pal,
    registers: Vec<Register>
}

impl Fpg {
    pub fn new(palette: Pal) -> Fpg {
        Fpg {
            palette,
            registers: Vec::new()
        }
    }

    pub const fn palette(&self) -> &Pal {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Pal {
        &mut self.palette
    }

    /// Append a register.
    ///
    /// Fails with a Range-kind error on a graphic id outside `1..=999`
    /// and an Operation-kind error on a duplicate id; a failed add
    /// never mutates the group.
    pub fn add(&mut self, register: Register) -> Result<(), FpgErrors> {
        check_graph_id(register.graph_id())?;

        if self.contains_graph_id(register.graph_id()) {
            return Err(FpgErrors::DuplicateGraphId(register.graph_id()));
        }

        self.registers.push(register);
        Ok(())
    }

    /// Append a standalone bitmap whose palette already matches the
    /// group palette.
    pub fn add_map(&mut self, map: &Map, filename: &str) -> Result<(), FpgErrors> {
        if *map.palette() != self.palette {
            return Err(FpgErrors::PaletteMismatch);
        }

        self.add(Register::from_map(map, filename))
    }

    /// Append a standalone bitmap, remapping its pixels against the
    /// group palette through the external quantize collaborator.
    pub fn add_map_quantized(
        &mut self, map: &Map, filename: &str, quantizer: &mut dyn PaletteQuantizer
    ) -> Result<(), FpgErrors> {
        if *map.palette() == self.palette {
            return self.add(Register::from_map(map, filename));
        }

        quantizer.configure(self.palette.colors());
        let pixels = quantizer.remap(map.bitmap(), map.width(), map.height());

        let register = Register::new(
            map.graph_id(),
            map.description(),
            filename,
            map.width(),
            map.height(),
            map.control_points().to_vec(),
            pixels
        )?;
        self.add(register)
    }

    /// Remove and return the register with the given graphic id.
    pub fn remove_by_graph_id(&mut self, graph_id: i32) -> Result<Register, FpgErrors> {
        if self.registers.is_empty() {
            return Err(FpgErrors::EmptyGroup);
        }

        match self.registers.iter().position(|r| r.graph_id() == graph_id) {
            Some(index) => Ok(self.registers.remove(index)),
            None => Err(FpgErrors::NotFound(graph_id))
        }
    }

    /// Remove and return the register at `index`; the remaining
    /// registers keep their insertion order.
    pub fn remove_at(&mut self, index: usize) -> Result<Register, FpgErrors> {
        if self.registers.is_empty() {
            return Err(FpgErrors::EmptyGroup);
        }
        if index >= self.registers.len() {
            return Err(FpgErrors::IndexOutOfBounds(index));
        }

        Ok(self.registers.remove(index))
    }

    /// Remove and return the register structurally equal to `register`.
    pub fn remove(&mut self, register: &Register) -> Result<Register, FpgErrors> {
        if self.registers.is_empty() {
            return Err(FpgErrors::EmptyGroup);
        }

        match self.registers.iter().position(|r| r == register) {
            Some(index) => Ok(self.registers.remove(index)),
            None => Err(FpgErrors::NotFound(register.graph_id()))
        }
    }

    pub fn contains_graph_id(&self, graph_id: i32) -> bool {
        self.registers.iter().any(|r| r.graph_id() == graph_id)
    }

    pub fn contains(&self, register: &Register) -> bool {
        self.registers.iter().any(|r| r == register)
    }

    pub fn find(&self, graph_id: i32) -> Option<&Register> {
        self.registers.iter().find(|r| r.graph_id() == graph_id)
    }

    pub fn clear(&mut self) {
        self.registers.clear();
    }

    pub fn len(&self) -> usize {
        self.registers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registers.is_empty()
    }

    /// Registers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Register> {
        self.registers.iter()
    }

    /// Decode an FPG file.
    ///
    /// Registers are read back to back until the end of the buffer;
    /// a stored length mismatch or a duplicate graphic id fails the
    /// whole decode.
    pub fn decode(buffer: &[u8]) -> Result<Fpg, FpgErrors> {
        let mut stream = ByteReader::new(buffer);

        if !FPG_HEADER.check(&mut stream) {
            return Err(FpgErrors::InvalidHeader);
        }

        let palette = Pal::decode_body(&mut stream)?;
        let mut group = Fpg::new(palette);

        while !stream.eof() {
            let register = Register::decode(&mut stream)?;

            if group.contains_graph_id(register.graph_id()) {
                return Err(FpgErrors::DuplicateGraphIdOnWire(register.graph_id()));
            }
            group.registers.push(register);
        }

        trace!("FPG decoded with {} registers", group.len());
        Ok(group)
    }

    /// Serialize the group: header, palette body, then every register
    /// in insertion order with no padding.
    ///
    /// An empty group has no valid file form; encoding one is an
    /// Operation-kind error.
    pub fn encode(&self) -> Result<Vec<u8>, FpgErrors> {
        if self.registers.is_empty() {
            return Err(FpgErrors::EmptyGroup);
        }

        let mut writer = ByteWriter::new();
        FPG_HEADER.write_to(&mut writer);
        self.palette.write_body(&mut writer);

        for register in &self.registers {
            register.write_to(&mut writer);
        }

        Ok(writer.into_inner())
    }
}

impl FormatValidable for Fpg {
    fn validate(buffer: &[u8]) -> bool {
        probe_fpg(buffer)
    }
}

impl AssetFile for Fpg {
    type Error = FpgErrors;

    fn load(path: &str) -> Result<Fpg, FpgErrors> {
        let contents = std::fs::read(path)?;
        Fpg::decode(&contents)
    }

    fn save(&self, path: &str) -> Result<(), FpgErrors> {
        std::fs::write(path, self.encode()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use div_core::color::Color;
    use div_core::errors::ErrorKind;
    use div_core::palette::ColorPalette;
    use div_map::ControlPoint;

    use super::*;

    fn sample_palette() -> Pal {
        let mut colors = ColorPalette::new();
        for i in 0..256 {
            colors.set(i, Color::new((i % 64) as u8, 0, 0)).unwrap();
        }
        Pal::new(colors)
    }

    fn register(graph_id: i32) -> Register {
        Register::new(
            graph_id,
            "sprite",
            "SPR.PNG",
            2,
            2,
            vec![ControlPoint::new(1, 1)],
            vec![graph_id as u8; 4]
        )
        .unwrap()
    }

    fn sample_group() -> Fpg {
        let mut group = Fpg::new(sample_palette());
        group.add(register(1)).unwrap();
        group.add(register(500)).unwrap();
        group.add(register(999)).unwrap();
        group
    }

    #[test]
    fn encode_decode_round_trips() {
        let group = sample_group();
        let bytes = group.encode().unwrap();

        assert!(probe_fpg(&bytes));
        let decoded = Fpg::decode(&bytes).unwrap();

        assert_eq!(decoded, group);
        let ids: Vec<i32> = decoded.iter().map(Register::graph_id).collect();
        assert_eq!(ids, vec![1, 500, 999]);
    }

    #[test]
    fn add_rejects_duplicate_ids_without_mutating() {
        let mut group = Fpg::new(sample_palette());
        group.add(register(500)).unwrap();

        let err = group.add(register(500)).unwrap_err();
        assert!(matches!(err, FpgErrors::DuplicateGraphId(500)));
        assert_eq!(err.kind(), ErrorKind::Operation);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn lookups_treat_index_zero_as_found() {
        let group = sample_group();

        assert!(group.contains_graph_id(1));
        assert!(group.find(1).is_some());
        assert!(group.contains(&register(1)));
        assert!(!group.contains_graph_id(2));
    }

    #[test]
    fn removals_on_an_empty_group_fail() {
        let mut group = Fpg::new(sample_palette());

        for err in [
            group.remove_by_graph_id(1).unwrap_err(),
            group.remove_at(0).unwrap_err(),
            group.remove(&register(1)).unwrap_err()
        ] {
            assert!(matches!(err, FpgErrors::EmptyGroup));
            assert_eq!(err.kind(), ErrorKind::Operation);
        }
    }

    #[test]
    fn removals_keep_insertion_order() {
        let mut group = sample_group();

        let removed = group.remove_by_graph_id(500).unwrap();
        assert_eq!(removed.graph_id(), 500);

        let removed = group.remove_at(0).unwrap();
        assert_eq!(removed.graph_id(), 1);
        assert_eq!(group.len(), 1);

        assert!(matches!(
            group.remove_at(5),
            Err(FpgErrors::IndexOutOfBounds(5))
        ));
        assert!(matches!(
            group.remove(&register(7)),
            Err(FpgErrors::NotFound(7))
        ));

        let removed = group.remove(&register(999)).unwrap();
        assert_eq!(removed.graph_id(), 999);
        assert!(group.is_empty());
    }

    #[test]
    fn encoding_an_empty_group_fails() {
        let group = Fpg::new(sample_palette());

        let err = group.encode().unwrap_err();
        assert!(matches!(err, FpgErrors::EmptyGroup));
        assert_eq!(err.kind(), ErrorKind::Operation);
    }

    #[test]
    fn duplicate_wire_ids_fail_decode() {
        let mut bytes = sample_group().encode().unwrap();

        // duplicate the first register record at the tail
        bytes.extend_from_slice(&register(1).serialize());

        let err = Fpg::decode(&bytes).unwrap_err();
        assert!(matches!(err, FpgErrors::DuplicateGraphIdOnWire(1)));
        assert_eq!(err.kind(), ErrorKind::Format);
    }

    #[test]
    fn add_map_requires_a_matching_palette() {
        let mut group = sample_group();

        let map = Map::new(Pal::default(), 2, 2, 7, "").unwrap();
        assert!(matches!(
            group.add_map(&map, "A.PNG"),
            Err(FpgErrors::PaletteMismatch)
        ));

        let map = Map::new(sample_palette(), 2, 2, 7, "").unwrap();
        group.add_map(&map, "A.PNG").unwrap();
        assert!(group.contains_graph_id(7));
    }

    struct OffsetQuantizer;

    impl PaletteQuantizer for OffsetQuantizer {
        fn configure(&mut self, _palette: &ColorPalette) {}

        fn remap(&mut self, pixels: &[u8], _width: i16, _height: i16) -> Vec<u8> {
            pixels.iter().map(|p| p.wrapping_add(1)).collect()
        }
    }

    #[test]
    fn add_map_quantized_remaps_foreign_palettes() {
        let mut group = sample_group();

        let mut map = Map::new(Pal::default(), 2, 2, 7, "").unwrap();
        map.set_bitmap(&[10, 11, 12, 13]).unwrap();

        group
            .add_map_quantized(&map, "B.PNG", &mut OffsetQuantizer)
            .unwrap();
        assert_eq!(group.find(7).unwrap().bitmap(), &[11, 12, 13, 14]);
    }
}
