/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! Batch import of foreign images into one FPG
//!
//! The pipeline is synchronous: one call to [`ImportPipeline::run`]
//! decodes every queued item, remaps it against the shared palette and
//! serializes the group. Callers wanting a background import move the
//! whole call onto their own thread; cancellation is cooperative via a
//! callback polled between items and between register writes, and
//! progress is reported through a [`ProgressSink`] over `2*n + 1`
//! monotone steps (one per import, one for the palette, one per
//! register write).

use div_core::bytestream::ByteWriter;
use div_core::traits::{CachedQuantizer, ImageDecoder, PaletteQuantizer, SerializableAsset};
use div_map::ControlPoint;
use div_pal::Pal;
use log::trace;

use crate::errors::FpgErrors;
use crate::fpg::{Fpg, FPG_HEADER};
use crate::register::Register;

/// One queued source image with the metadata its register will carry.
pub struct ImportItem {
    pub buffer:         Vec<u8>,
    pub graph_id:       i32,
    pub description:    String,
    pub filename:       String,
    pub control_points: Vec<ControlPoint>
}

/// Where a pipeline run currently stands.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum ImportState {
    Idle,
    /// Importing the item at this position.
    Importing(usize),
    Written,
    Cancelled,
    Failed
}

/// Observer for pipeline progress.
pub trait ProgressSink {
    /// Called after every completed step with the running count and the
    /// fixed total.
    fn step(&mut self, completed: usize, total: usize);
}

/// A [`ProgressSink`] that ignores every step.
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn step(&mut self, _completed: usize, _total: usize) {}
}

/// Builds an FPG from an ordered batch of foreign images.
///
/// Any per-item failure aborts the whole batch; there is no partial
/// output. The pipeline can be rerun after a failure or cancellation,
/// the queued items are kept.
pub struct ImportPipeline {
    palette: Pal,
    items:   Vec<ImportItem>,
    state:   ImportState
}

impl ImportPipeline {
    /// A pipeline targeting the given shared palette.
    pub fn new(palette: Pal) -> ImportPipeline {
        ImportPipeline {
            palette,
            items: Vec::new(),
            state: ImportState::Idle
        }
    }

    pub fn push(&mut self, item: ImportItem) {
        self.items.push(item);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub const fn state(&self) -> ImportState {
        self.state
    }

    /// Run the batch and return the encoded FPG bytes.
    ///
    /// The quantizer is wrapped in a [`CachedQuantizer`], so it is
    /// configured once per distinct palette content, not once per item.
    /// Cancellation is polled before each import and before each
    /// register write; a register is never split by a cancellation.
    pub fn run<Q: PaletteQuantizer>(
        &mut self, decoder: &mut dyn ImageDecoder, quantizer: Q,
        progress: &mut dyn ProgressSink, cancel: &mut dyn FnMut() -> bool
    ) -> Result<Vec<u8>, FpgErrors> {
        if self.items.is_empty() {
            self.state = ImportState::Failed;
            return Err(FpgErrors::EmptyGroup);
        }

        let total = self.items.len() * 2 + 1;
        let mut completed = 0;
        let mut quantizer = CachedQuantizer::new(quantizer);
        let mut group = Fpg::new(self.palette.clone());

        for i in 0..self.items.len() {
            if cancel() {
                self.state = ImportState::Cancelled;
                return Err(FpgErrors::Cancelled);
            }
            self.state = ImportState::Importing(i);

            let item = &self.items[i];
            let image = match decoder.decode(&item.buffer) {
                Ok(image) => image,
                Err(err) => {
                    self.state = ImportState::Failed;
                    return Err(FpgErrors::Image(err));
                }
            };
            trace!("imported item {i} as {}", image.mime);

            quantizer.configure(self.palette.colors());
            let pixels = quantizer.remap(&image.pixels, image.width, image.height);

            let register = Register::new(
                item.graph_id,
                &item.description,
                &item.filename,
                image.width,
                image.height,
                item.control_points.clone(),
                pixels
            );
            let register = match register {
                Ok(register) => register,
                Err(err) => {
                    self.state = ImportState::Failed;
                    return Err(err);
                }
            };

            if let Err(err) = group.add(register) {
                self.state = ImportState::Failed;
                return Err(err);
            }

            completed += 1;
            progress.step(completed, total);
        }

        let mut writer = ByteWriter::new();
        FPG_HEADER.write_to(&mut writer);
        self.palette.write_body(&mut writer);
        completed += 1;
        progress.step(completed, total);

        for register in group.iter() {
            if cancel() {
                self.state = ImportState::Cancelled;
                return Err(FpgErrors::Cancelled);
            }
            register.write_to(&mut writer);

            completed += 1;
            progress.step(completed, total);
        }

        self.state = ImportState::Written;
        Ok(writer.into_inner())
    }

    /// Run the batch and write the encoded FPG to `path`.
    ///
    /// A failure in the middle of the file write leaves a corrupt file
    /// on disk; callers must treat an aborted write as garbage and
    /// discard it.
    pub fn run_to_file<Q: PaletteQuantizer>(
        &mut self, path: &str, decoder: &mut dyn ImageDecoder, quantizer: Q,
        progress: &mut dyn ProgressSink, cancel: &mut dyn FnMut() -> bool
    ) -> Result<(), FpgErrors> {
        let bytes = self.run(decoder, quantizer, progress, cancel)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
