use super::placemark::{GroundOverlay, Placemark};
use super::style::{Style, StyleMapTarget};
use crate::error::KmlError;
use indexmap::IndexMap;
use serde::Serialize;

/// Style identifiers to styles, for one lookup scope
pub type StyleTable = IndexMap<String, Style>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ContainerKind {
    #[default]
    Document,
    Folder,
}

impl ContainerKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "Document" => Some(ContainerKind::Document),
            "Folder" => Some(ContainerKind::Folder),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            ContainerKind::Document => "Document",
            ContainerKind::Folder => "Folder",
        }
    }
}

/// A `<Document>` or `<Folder>` and everything declared directly inside it
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub kind: ContainerKind,
    pub id: Option<String>,
    pub properties: IndexMap<String, String>,
    pub styles: StyleTable,
    pub placemarks: Vec<Placemark>,
    pub containers: Vec<Container>,
    pub ground_overlays: Vec<GroundOverlay>,
    /// StyleMaps waiting to be folded into `styles` during resolution
    #[serde(skip)]
    pub(crate) style_maps: IndexMap<String, StyleMapTarget>,
}

impl Container {
    pub fn new(kind: ContainerKind, id: Option<String>) -> Self {
        Container {
            kind,
            id,
            ..Default::default()
        }
    }

    pub fn container_id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_placemarks(&self) -> bool {
        !self.placemarks.is_empty()
    }

    pub fn has_containers(&self) -> bool {
        !self.containers.is_empty()
    }

    pub fn has_ground_overlays(&self) -> bool {
        !self.ground_overlays.is_empty()
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Style declared in this container, by bare id or `#id` url
    pub fn style(&self, url: &str) -> Option<&Style> {
        self.styles.get(crate::kml::resolve::style_id(url))
    }

    /// Register a named style. A later declaration replaces an earlier one.
    pub(crate) fn insert_style(&mut self, id: String, style: Style) {
        if self.styles.contains_key(&id) || self.style_maps.contains_key(&id) {
            log::warn!("duplicate style id {:?}, keeping the later declaration", id);
            self.style_maps.shift_remove(&id);
        }
        self.styles.insert(id, style);
    }

    pub(crate) fn insert_style_map(&mut self, id: String, target: StyleMapTarget) {
        if self.styles.contains_key(&id) || self.style_maps.contains_key(&id) {
            log::warn!("duplicate style id {:?}, keeping the later declaration", id);
            self.styles.shift_remove(&id);
        }
        self.style_maps.insert(id, target);
    }

    fn collect_placemarks<'a>(
        &'a self,
        owner: Option<&'a Container>,
        out: &mut Vec<(&'a Placemark, Option<&'a Container>)>,
    ) {
        out.extend(self.placemarks.iter().map(|placemark| (placemark, owner)));
        for child in &self.containers {
            child.collect_placemarks(Some(child), out);
        }
    }

    fn collect_containers<'a>(&'a self, out: &mut Vec<&'a Container>) {
        for child in &self.containers {
            out.push(child);
            child.collect_containers(out);
        }
    }
}

/// Result of parsing one KML document.
///
/// Placemarks, styles and overlays declared outside any `<Document>` or
/// `<Folder>` live in the document scope, the outermost style lookup scope.
#[derive(Debug, Default, Serialize)]
pub struct KmlDocument {
    #[serde(flatten)]
    pub(crate) scope: Container,
    #[serde(skip)]
    pub(crate) diagnostics: Vec<KmlError>,
}

impl KmlDocument {
    /// Top-level containers in document order
    pub fn containers(&self) -> &[Container] {
        &self.scope.containers
    }

    /// Every container in the tree, depth-first
    pub fn all_containers(&self) -> Vec<&Container> {
        let mut out = Vec::new();
        self.scope.collect_containers(&mut out);
        out
    }

    /// Every placemark with its owning container, `None` for the document scope
    pub fn placemarks(&self) -> Vec<(&Placemark, Option<&Container>)> {
        let mut out = Vec::new();
        self.scope.collect_placemarks(None, &mut out);
        out
    }

    pub fn placemark_count(&self) -> usize {
        fn count(container: &Container) -> usize {
            container.placemarks.len() + container.containers.iter().map(count).sum::<usize>()
        }
        count(&self.scope)
    }

    /// Placemarks declared outside any container
    pub fn document_placemarks(&self) -> &[Placemark] {
        &self.scope.placemarks
    }

    /// Styles declared outside any container
    pub fn styles(&self) -> &StyleTable {
        &self.scope.styles
    }

    pub fn ground_overlays(&self) -> &[GroundOverlay] {
        &self.scope.ground_overlays
    }

    /// Recoverable problems met while parsing and resolving
    pub fn diagnostics(&self) -> &[KmlError] {
        &self.diagnostics
    }
}
