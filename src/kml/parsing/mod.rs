//! Streaming KML parser
//!
//! Walks the tag stream once, building the container tree with an explicit
//! stack that mirrors `<Document>`/`<Folder>` nesting, then runs the style
//! resolution pass over the finished tree.
//!
//! # Submodules
//! - `coerce` - Color, boolean and number conversions
//! - `styles` - `<Style>` and `<StyleMap>` blocks
//! - `geometry` - Coordinates and geometry elements
//! - `placemarks` - `<Placemark>` and extended data
//! - `overlays` - `<GroundOverlay>`

pub mod coerce;
mod geometry;
mod overlays;
mod placemarks;
mod styles;

pub use geometry::parse_coordinates;

use crate::error::KmlError;
use crate::kml::model::{Argb, Container, ContainerKind, KmlDocument, StyleMapTarget};
use crate::kml::resolve::resolve_document;
use crate::options::{profile_timing, ParserOptions};
use crate::reader::{TagReader, TokenKind};
use std::io::BufRead;

/// Container children stored as plain text properties
const CONTAINER_PROPERTIES: &[&str] = &["name", "description", "visibility", "open", "snippet", "Snippet"];

pub struct KmlParser<R> {
    reader: TagReader<R>,
    options: ParserOptions,
    diagnostics: Vec<KmlError>,
}

impl<R: BufRead> KmlParser<R> {
    pub fn new(reader: TagReader<R>) -> Self {
        Self::with_options(reader, ParserOptions::default())
    }

    pub fn with_options(reader: TagReader<R>, options: ParserOptions) -> Self {
        KmlParser {
            reader,
            options,
            diagnostics: Vec::new(),
        }
    }

    /// Parse the whole document and resolve placemark styles.
    ///
    /// Fails only on malformed or unbalanced markup; everything else is
    /// reported through `KmlDocument::diagnostics`.
    pub fn parse_kml(mut self) -> Result<KmlDocument, KmlError> {
        let parse_start = std::time::Instant::now();

        // Index 0 is the document scope and is never popped
        let mut stack = vec![Container::default()];

        loop {
            match self.reader.advance()? {
                TokenKind::StartTag => {
                    let tag = self.reader.current_tag_name().to_string();
                    self.parse_top_level_element(&tag, &mut stack)?;
                }
                TokenKind::EndTag => {
                    let tag = self.reader.current_tag_name();
                    if ContainerKind::from_tag(tag).is_some() {
                        close_container(&mut stack, tag)?;
                    }
                }
                TokenKind::Text => {}
                TokenKind::EndOfDocument => break,
            }
        }

        if stack.len() != 1 {
            let open = stack.last().map(|c| c.kind.tag().to_string());
            return Err(KmlError::UnbalancedMarkup {
                expected: open,
                found: None,
            });
        }
        let parse_time = parse_start.elapsed();

        let resolve_start = std::time::Instant::now();
        let mut document = KmlDocument {
            scope: stack.remove(0),
            diagnostics: self.diagnostics,
        };
        let unresolved = resolve_document(&mut document.scope, &self.options);
        for err in &unresolved {
            log::warn!("{}", err);
        }
        document.diagnostics.extend(unresolved);

        if profile_timing() {
            log::info!(
                "KML parse: {:.2}ms, style resolution: {:.2}ms ({} placemarks, {} diagnostics)",
                parse_time.as_secs_f64() * 1000.0,
                resolve_start.elapsed().as_secs_f64() * 1000.0,
                document.placemark_count(),
                document.diagnostics.len()
            );
        }

        Ok(document)
    }

    fn parse_top_level_element(&mut self, tag: &str, stack: &mut Vec<Container>) -> Result<(), KmlError> {
        if let Some(kind) = ContainerKind::from_tag(tag) {
            let id = self.reader.attribute("id").map(str::to_string);
            stack.push(Container::new(kind, id));
            return Ok(());
        }

        let in_container = stack.len() > 1;
        let Some(current) = stack.last_mut() else {
            return Err(KmlError::UnbalancedMarkup {
                expected: None,
                found: Some(tag.to_string()),
            });
        };

        match tag {
            "kml" => {}
            "Style" => {
                let style = self.parse_style()?;
                match style.id.clone() {
                    Some(id) => current.insert_style(id, style),
                    None => log::debug!("dropping anonymous <Style> outside a placemark"),
                }
            }
            "StyleMap" => {
                let style_map = self.parse_style_map()?;
                match style_map.id.clone() {
                    Some(id) => match style_map.into_chosen() {
                        Some(target) => current.insert_style_map(id, target),
                        None => log::debug!("StyleMap {:?} has no usable pairs", id),
                    },
                    None => log::debug!("dropping anonymous <StyleMap>"),
                }
            }
            "Placemark" => {
                let placemark = self.parse_placemark()?;
                current.placemarks.push(placemark);
            }
            "GroundOverlay" => {
                let overlay = self.parse_ground_overlay()?;
                current.ground_overlays.push(overlay);
            }
            _ if CONTAINER_PROPERTIES.contains(&tag) => {
                let text = self.reader.read_text()?;
                if in_container {
                    current.properties.insert(tag.to_string(), text);
                }
            }
            _ => {
                log::debug!("skipping unsupported element <{}>", tag);
                self.reader.skip_element()?;
            }
        }
        Ok(())
    }

    /// Log a recoverable error and keep it for the caller
    pub(crate) fn recover(&mut self, err: KmlError) {
        log::warn!("{}", err);
        self.diagnostics.push(err);
    }

    /// Advance to the next direct child of the element opened at `depth`.
    ///
    /// Returns the child's tag name, or `None` once the parent's end tag is consumed.
    pub(crate) fn next_child(&mut self, depth: usize) -> Result<Option<String>, KmlError> {
        loop {
            match self.reader.advance()? {
                TokenKind::StartTag if self.reader.depth() == depth + 1 => {
                    return Ok(Some(self.reader.current_tag_name().to_string()));
                }
                TokenKind::StartTag => self.reader.skip_element()?,
                TokenKind::EndTag if self.reader.depth() < depth => return Ok(None),
                TokenKind::EndOfDocument => return Ok(None),
                _ => {}
            }
        }
    }

    /// Element text, `None` when empty
    pub(crate) fn read_optional_text(&mut self) -> Result<Option<String>, KmlError> {
        let text = self.reader.read_text()?;
        Ok(if text.is_empty() { None } else { Some(text) })
    }

    pub(crate) fn read_color(&mut self) -> Result<Option<Argb>, KmlError> {
        let text = self.reader.read_text()?;
        match coerce::parse_color(&text) {
            Ok(color) => Ok(Some(color)),
            Err(err) => {
                self.recover(err);
                Ok(None)
            }
        }
    }

    pub(crate) fn read_float(&mut self) -> Result<Option<f64>, KmlError> {
        let text = self.reader.read_text()?;
        Ok(self.coerce_float(&text))
    }

    pub(crate) fn coerce_float(&mut self, text: &str) -> Option<f64> {
        if text.trim().is_empty() {
            return None;
        }
        match coerce::parse_float(text) {
            Ok(value) => Some(value),
            Err(err) => {
                self.recover(err);
                None
            }
        }
    }

    /// Boolean flag; unreadable text counts as on
    pub(crate) fn read_flag(&mut self) -> Result<bool, KmlError> {
        let text = self.reader.read_text()?;
        match coerce::parse_boolean_flag(&text) {
            Ok(flag) => Ok(flag),
            Err(err) => {
                self.recover(err);
                Ok(true)
            }
        }
    }

    pub(crate) fn take_inline_style_map(&mut self) -> Result<Option<StyleMapTarget>, KmlError> {
        Ok(self.parse_style_map()?.into_chosen())
    }
}

fn close_container(stack: &mut Vec<Container>, tag: &str) -> Result<(), KmlError> {
    if stack.len() < 2 {
        return Err(KmlError::UnbalancedMarkup {
            expected: None,
            found: Some(tag.to_string()),
        });
    }
    let finished = stack.pop().ok_or_else(|| KmlError::UnbalancedMarkup {
        expected: None,
        found: Some(tag.to_string()),
    })?;
    if finished.kind.tag() != tag {
        return Err(KmlError::UnbalancedMarkup {
            expected: Some(finished.kind.tag().to_string()),
            found: Some(tag.to_string()),
        });
    }
    if let Some(parent) = stack.last_mut() {
        parent.containers.push(finished);
    }
    Ok(())
}
