//! In-memory KML model
//!
//! # Submodules
//! - `style` - Style, sub-style and StyleMap records, ARGB colors
//! - `geometry` - Point, LineString, Polygon and MultiGeometry
//! - `placemark` - Placemarks and ground overlays
//! - `container` - Document/Folder tree and the parsed document

mod container;
mod geometry;
mod placemark;
mod style;

pub use container::{Container, ContainerKind, KmlDocument, StyleTable};
pub use geometry::{close_ring, is_closed_ring, Geometry, LatLng, Polygon};
pub use placemark::{GroundOverlay, LatLonBox, Placemark};
pub use style::{
    Argb, BalloonStyle, ColorMode, HotSpot, IconStyle, LabelStyle, LineStyle, ListItemType,
    ListStyle, PolyStyle, Style, StyleMap, StyleMapTarget, SubStyle, Units,
};
