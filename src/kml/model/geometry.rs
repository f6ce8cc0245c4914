//! Geometry variants carried by placemarks (2-D only, altitude is dropped)

use serde::Serialize;

/// A geographic coordinate in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }
}

/// Polygon with an outer ring and zero or more holes
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Polygon {
    pub outer_boundary: Vec<LatLng>,
    pub inner_boundaries: Vec<Vec<LatLng>>,
}

impl Polygon {
    pub fn is_closed(&self) -> bool {
        is_closed_ring(&self.outer_boundary) && self.inner_boundaries.iter().all(|ring| is_closed_ring(ring))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(LatLng),
    LineString(Vec<LatLng>),
    Polygon(Polygon),
    MultiGeometry(Vec<Geometry>),
}

impl Geometry {
    pub fn geometry_type(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::LineString(_) => "LineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiGeometry(_) => "MultiGeometry",
        }
    }

    /// Total number of vertices, recursing into multi-geometries
    pub fn coordinate_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::LineString(points) => points.len(),
            Geometry::Polygon(polygon) => {
                polygon.outer_boundary.len()
                    + polygon.inner_boundaries.iter().map(Vec::len).sum::<usize>()
            }
            Geometry::MultiGeometry(children) => children.iter().map(Geometry::coordinate_count).sum(),
        }
    }
}

pub fn is_closed_ring(ring: &[LatLng]) -> bool {
    match (ring.first(), ring.last()) {
        (Some(first), Some(last)) => ring.len() > 1 && first == last,
        _ => false,
    }
}

/// Repeat the first vertex at the end of the ring if it is not already there
pub fn close_ring(ring: &mut Vec<LatLng>) {
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last()) {
        if ring.len() == 1 || first != last {
            ring.push(first);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_close_ring() {
        let mut ring = vec![LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0), LatLng::new(1.0, 1.0)];
        assert!(!is_closed_ring(&ring));
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
        assert!(is_closed_ring(&ring));

        // Already closed rings are left alone
        close_ring(&mut ring);
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_coordinate_count_recurses() {
        let geometry = Geometry::MultiGeometry(vec![
            Geometry::Point(LatLng::new(1.0, 2.0)),
            Geometry::LineString(vec![LatLng::new(0.0, 0.0), LatLng::new(1.0, 1.0)]),
        ]);
        assert_eq!(geometry.coordinate_count(), 3);
        assert_eq!(geometry.geometry_type(), "MultiGeometry");
    }

    #[test]
    fn test_geometry_serializes_with_type_tag() {
        let json = serde_json::to_value(Geometry::Point(LatLng::new(45.0, -122.5))).unwrap();
        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"]["lng"], -122.5);
    }
}
