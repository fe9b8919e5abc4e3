/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */
//! The DIV Games Studio MAP codec
//!
//! A MAP is a single 256-color bitmap: dimensions, a graphic id the
//! engine addresses it by, a short description, its own palette and up
//! to 1000 control points (hot spots the engine uses for positioning).
//!
//! Pixel bytes are palette indices, stored row-major with no padding.

pub use crate::control_point::{ControlPoint, CONTROL_POINT_SIZE, MAX_CONTROL_POINTS};
pub use crate::errors::MapErrors;
pub use crate::map::{
    probe_map, Map, DESCRIPTION_LENGTH, MAX_GRAPH_ID, MIN_GRAPH_ID
};

mod control_point;
mod errors;
mod map;
