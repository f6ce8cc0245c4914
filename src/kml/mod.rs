//! KML parsing and style resolution
//!
//! # Submodules
//! - `model` - Containers, placemarks, styles and geometry
//! - `parsing` - Streaming parser and container tree builder
//! - `resolve` - Style lookup over the finished tree

pub mod model;
pub mod parsing;
pub mod resolve;

pub use model::*;
pub use parsing::coerce::{parse_boolean_flag, parse_color, parse_float};
pub use parsing::{parse_coordinates, KmlParser};
pub use resolve::style_id;
