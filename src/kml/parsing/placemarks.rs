//! `<Placemark>` parsing

use super::geometry::is_geometry_tag;
use super::KmlParser;
use crate::error::KmlError;
use crate::kml::model::{Placemark, StyleMapTarget};
use indexmap::IndexMap;
use std::io::BufRead;

/// Placemark children stored as plain text properties
const PLACEMARK_PROPERTIES: &[&str] = &[
    "name",
    "description",
    "visibility",
    "open",
    "address",
    "phoneNumber",
    "drawOrder",
    "snippet",
    "Snippet",
];

impl<R: BufRead> KmlParser<R> {
    /// Parse a `<Placemark>`; the reader is on its start tag.
    ///
    /// Always yields a placemark, even when nothing inside it could be parsed.
    pub(crate) fn parse_placemark(&mut self) -> Result<Placemark, KmlError> {
        let mut placemark = Placemark::new(self.reader.attribute("id").map(str::to_string));

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "Style" => placemark.inline_style = Some(self.parse_style()?),
                "StyleMap" => match self.take_inline_style_map()? {
                    Some(StyleMapTarget::Inline(style)) => placemark.inline_style = Some(style),
                    Some(StyleMapTarget::Url(url)) => {
                        placemark.style_url.get_or_insert(url);
                    }
                    None => {}
                },
                "styleUrl" => {
                    if let Some(url) = self.read_optional_text()? {
                        placemark.style_url = Some(url);
                    }
                }
                "ExtendedData" => self.parse_extended_data(&mut placemark.properties)?,
                _ if is_geometry_tag(&tag) => {
                    if let Some(geometry) = self.parse_geometry(&tag)? {
                        if placemark.geometry.is_some() {
                            log::debug!("placemark {:?} has several geometries, keeping the last", placemark.id);
                        }
                        placemark.geometry = Some(geometry);
                    }
                }
                _ if PLACEMARK_PROPERTIES.contains(&tag.as_str()) => {
                    let text = self.reader.read_text()?;
                    placemark.properties.insert(tag.clone(), text);
                }
                _ => {
                    log::debug!("skipping <{}> in placemark", tag);
                    self.reader.skip_element()?;
                }
            }
        }

        Ok(placemark)
    }

    /// `<Data name><value>` and `<SchemaData><SimpleData name>` pairs; later keys win
    fn parse_extended_data(&mut self, properties: &mut IndexMap<String, String>) -> Result<(), KmlError> {
        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "Data" => {
                    let name = self.reader.attribute("name").map(str::to_string);
                    let value = self.read_data_value()?;
                    match name {
                        Some(name) => {
                            properties.insert(name, value.unwrap_or_default());
                        }
                        None => log::debug!("ignoring <Data> without a name"),
                    }
                }
                "SchemaData" => self.parse_schema_data(properties)?,
                _ => self.reader.skip_element()?,
            }
        }
        Ok(())
    }

    fn read_data_value(&mut self) -> Result<Option<String>, KmlError> {
        let mut value = None;
        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "value" => value = Some(self.reader.read_text()?),
                _ => self.reader.skip_element()?,
            }
        }
        Ok(value)
    }

    fn parse_schema_data(&mut self, properties: &mut IndexMap<String, String>) -> Result<(), KmlError> {
        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            if tag != "SimpleData" {
                self.reader.skip_element()?;
                continue;
            }
            let name = self.reader.attribute("name").map(str::to_string);
            let value = self.reader.read_text()?;
            if let Some(name) = name {
                properties.insert(name, value);
            }
        }
        Ok(())
    }
}
