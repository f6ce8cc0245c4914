//! `<GroundOverlay>` parsing

use super::KmlParser;
use crate::error::KmlError;
use crate::kml::model::{GroundOverlay, LatLonBox};
use std::io::BufRead;

const OVERLAY_PROPERTIES: &[&str] = &["name", "description", "open", "snippet", "Snippet"];

impl<R: BufRead> KmlParser<R> {
    pub(crate) fn parse_ground_overlay(&mut self) -> Result<GroundOverlay, KmlError> {
        let mut overlay = GroundOverlay {
            id: self.reader.attribute("id").map(str::to_string),
            visibility: true,
            ..Default::default()
        };

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "Icon" => overlay.image_url = self.read_href()?,
                "LatLonBox" => overlay.lat_lon_box = Some(self.parse_lat_lon_box()?),
                "color" => overlay.color = self.read_color()?,
                "visibility" => overlay.visibility = self.read_flag()?,
                "drawOrder" => {
                    overlay.draw_order = self.read_float()?.map(|order| order as i32);
                }
                _ if OVERLAY_PROPERTIES.contains(&tag.as_str()) => {
                    let text = self.reader.read_text()?;
                    overlay.properties.insert(tag.clone(), text);
                }
                _ => self.reader.skip_element()?,
            }
        }

        if overlay.image_url.is_none() || overlay.lat_lon_box.is_none() {
            log::debug!("ground overlay {:?} is missing its image or bounds", overlay.id);
        }
        Ok(overlay)
    }

    fn parse_lat_lon_box(&mut self) -> Result<LatLonBox, KmlError> {
        let mut bounds = LatLonBox::default();

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            let edge = match tag.as_str() {
                "north" => &mut bounds.north,
                "south" => &mut bounds.south,
                "east" => &mut bounds.east,
                "west" => &mut bounds.west,
                "rotation" => &mut bounds.rotation,
                _ => {
                    self.reader.skip_element()?;
                    continue;
                }
            };
            if let Some(value) = self.read_float()? {
                *edge = value;
            }
        }

        Ok(bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::TagReader;

    #[test]
    fn test_ground_overlay() {
        let mut parser = KmlParser::new(TagReader::from_text(
            r#"<GroundOverlay id="o1">
                <name>Floor plan</name>
                <visibility>0</visibility>
                <drawOrder>2</drawOrder>
                <Icon><href>plan.png</href></Icon>
                <LatLonBox><north>37.9</north><south>37.8</south><east>-122.3</east><west>-122.5</west><rotation>12.5</rotation></LatLonBox>
            </GroundOverlay>"#,
        ));
        parser.reader.advance().unwrap();
        let overlay = parser.parse_ground_overlay().unwrap();
        assert_eq!(overlay.id.as_deref(), Some("o1"));
        assert_eq!(overlay.image_url.as_deref(), Some("plan.png"));
        assert!(!overlay.visibility);
        assert_eq!(overlay.draw_order, Some(2));
        assert_eq!(overlay.properties.get("name").map(String::as_str), Some("Floor plan"));
        let bounds = overlay.lat_lon_box.unwrap();
        assert_eq!(bounds.north, 37.9);
        assert_eq!(bounds.west, -122.5);
        assert_eq!(bounds.rotation, 12.5);
    }
}
