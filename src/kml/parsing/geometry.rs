//! Geometry element parsing
//!
//! Coordinates are `lng,lat[,alt]` tuples separated by whitespace. A bad tuple
//! is reported and skipped so the rest of the geometry survives.

use super::KmlParser;
use crate::error::KmlError;
use crate::kml::model::{close_ring, Geometry, LatLng, Polygon};
use std::io::BufRead;

pub(crate) fn is_geometry_tag(tag: &str) -> bool {
    matches!(tag, "Point" | "LineString" | "LinearRing" | "Polygon" | "MultiGeometry")
}

/// Split coordinate text into points, returning the rejected tuples alongside
pub fn parse_coordinates(raw: &str) -> (Vec<LatLng>, Vec<KmlError>) {
    let mut points = Vec::new();
    let mut errors = Vec::new();

    for tuple in raw.split_whitespace() {
        match parse_tuple(tuple) {
            Some(point) => points.push(point),
            None => errors.push(KmlError::InvalidCoordinate(tuple.to_string())),
        }
    }

    (points, errors)
}

fn parse_tuple(tuple: &str) -> Option<LatLng> {
    let parts: Vec<&str> = tuple.split(',').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return None;
    }
    let lng = parts[0].parse::<f64>().ok().filter(|v| v.is_finite())?;
    let lat = parts[1].parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(LatLng { lat, lng })
}

impl<R: BufRead> KmlParser<R> {
    /// Parse the geometry element whose start tag is current.
    ///
    /// Returns `None` for unsupported elements and for geometries left with
    /// no usable coordinates.
    pub(crate) fn parse_geometry(&mut self, tag: &str) -> Result<Option<Geometry>, KmlError> {
        match tag {
            "Point" => {
                let points = self.read_coordinates_child()?;
                Ok(points.first().copied().map(Geometry::Point))
            }
            "LineString" => {
                let points = self.read_coordinates_child()?;
                Ok((!points.is_empty()).then_some(Geometry::LineString(points)))
            }
            "LinearRing" => {
                let mut points = self.read_coordinates_child()?;
                if self.options.close_rings {
                    close_ring(&mut points);
                }
                Ok((!points.is_empty()).then_some(Geometry::LineString(points)))
            }
            "Polygon" => self.parse_polygon(),
            "MultiGeometry" => self.parse_multi_geometry(),
            _ => {
                log::debug!("skipping unsupported geometry <{}>", tag);
                self.reader.skip_element()?;
                Ok(None)
            }
        }
    }

    fn parse_polygon(&mut self) -> Result<Option<Geometry>, KmlError> {
        let mut outer_boundary: Option<Vec<LatLng>> = None;
        let mut inner_boundaries = Vec::new();

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "outerBoundaryIs" => {
                    let mut rings = self.read_boundary_rings()?;
                    if !rings.is_empty() {
                        outer_boundary = Some(rings.swap_remove(0));
                    }
                }
                "innerBoundaryIs" => inner_boundaries.extend(self.read_boundary_rings()?),
                _ => self.reader.skip_element()?,
            }
        }

        let Some(mut outer_boundary) = outer_boundary else {
            log::warn!("dropping polygon without an outer boundary");
            return Ok(None);
        };

        if self.options.close_rings {
            close_ring(&mut outer_boundary);
            inner_boundaries.iter_mut().for_each(close_ring);
        }

        Ok(Some(Geometry::Polygon(Polygon {
            outer_boundary,
            inner_boundaries,
        })))
    }

    /// Every non-empty `<LinearRing>` inside a boundary element
    fn read_boundary_rings(&mut self) -> Result<Vec<Vec<LatLng>>, KmlError> {
        let mut rings = Vec::new();
        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            if tag == "LinearRing" {
                let ring = self.read_coordinates_child()?;
                if !ring.is_empty() {
                    rings.push(ring);
                }
            } else {
                self.reader.skip_element()?;
            }
        }
        Ok(rings)
    }

    fn parse_multi_geometry(&mut self) -> Result<Option<Geometry>, KmlError> {
        let mut children = Vec::new();
        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            if is_geometry_tag(&tag) {
                if let Some(child) = self.parse_geometry(&tag)? {
                    children.push(child);
                }
            } else {
                self.reader.skip_element()?;
            }
        }
        Ok(Some(Geometry::MultiGeometry(children)))
    }

    /// Points from the `<coordinates>` child of the current element
    fn read_coordinates_child(&mut self) -> Result<Vec<LatLng>, KmlError> {
        let mut points = Vec::new();
        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            if tag == "coordinates" {
                let text = self.reader.read_text()?;
                let (parsed, errors) = parse_coordinates(&text);
                points.extend(parsed);
                for err in errors {
                    self.recover(err);
                }
            } else {
                self.reader.skip_element()?;
            }
        }
        Ok(points)
    }
}
