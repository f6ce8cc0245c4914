use super::geometry::Geometry;
use super::style::{Argb, Style};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::sync::OnceLock;

/// A `<Placemark>` with its geometry, style information and properties.
///
/// The resolved style is filled at most once, by the resolution pass that
/// runs after the container tree is complete.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placemark {
    pub id: Option<String>,
    pub geometry: Option<Geometry>,
    pub inline_style: Option<Style>,
    pub style_url: Option<String>,
    /// Simple properties (`name`, `description`, ...) and extended data
    pub properties: IndexMap<String, String>,
    #[serde(serialize_with = "serialize_slot")]
    resolved_style: OnceLock<Style>,
}

impl Placemark {
    pub fn new(id: Option<String>) -> Self {
        Placemark {
            id,
            ..Default::default()
        }
    }

    pub fn resolved_style(&self) -> Option<&Style> {
        self.resolved_style.get()
    }

    /// Returns false if the slot was already filled
    pub(crate) fn set_resolved_style(&self, style: Style) -> bool {
        self.resolved_style.set(style).is_ok()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.property("name")
    }

    pub fn has_geometry(&self) -> bool {
        self.geometry.is_some()
    }

    pub fn has_style_info(&self) -> bool {
        self.inline_style.is_some() || self.style_url.is_some()
    }
}

fn serialize_slot<S: Serializer>(slot: &OnceLock<Style>, serializer: S) -> Result<S::Ok, S::Error> {
    slot.get().serialize(serializer)
}

/// Geographic bounds of a ground overlay image
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatLonBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
    pub rotation: f64,
}

/// An image draped over the map (`<GroundOverlay>`)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroundOverlay {
    pub id: Option<String>,
    pub image_url: Option<String>,
    pub lat_lon_box: Option<LatLonBox>,
    pub draw_order: Option<i32>,
    pub visibility: bool,
    pub color: Option<Argb>,
    pub properties: IndexMap<String, String>,
}
