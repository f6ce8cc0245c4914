//! Style records parsed from `<Style>` and `<StyleMap>` blocks
//!
//! Every sub-style field is optional: `None` means the document did not
//! specify it and the renderer default applies.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Packed 0xAARRGGBB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Argb(pub u32);

impl Argb {
    pub const WHITE: Argb = Argb(0xffff_ffff);
    pub const BLACK: Argb = Argb(0xff00_0000);

    pub const fn from_components(alpha: u8, red: u8, green: u8, blue: u8) -> Self {
        Argb((alpha as u32) << 24 | (red as u32) << 16 | (green as u32) << 8 | blue as u32)
    }

    pub fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn blue(self) -> u8 {
        self.0 as u8
    }

    pub fn is_opaque(self) -> bool {
        self.alpha() == 0xff
    }

    /// Normalized `[r, g, b, a]` for GPU-style consumers
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.red() as f32 / 255.0,
            self.green() as f32 / 255.0,
            self.blue() as f32 / 255.0,
            self.alpha() as f32 / 255.0,
        ]
    }
}

impl Serialize for Argb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("#{:08x}", self.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorMode {
    #[default]
    Normal,
    /// Not supported: colors under this mode are left unspecified
    Random,
}

/// Units of a hot-spot coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Units {
    #[default]
    Fraction,
    Pixels,
    InsetPixels,
}

/// Icon anchor point
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotSpot {
    pub x: f64,
    pub y: f64,
    pub x_units: Units,
    pub y_units: Units,
}

impl Default for HotSpot {
    /// Bottom center of the icon
    fn default() -> Self {
        HotSpot {
            x: 0.5,
            y: 1.0,
            x_units: Units::Fraction,
            y_units: Units::Fraction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IconStyle {
    pub scale: Option<f64>,
    pub heading: Option<f64>,
    pub hot_spot: Option<HotSpot>,
    pub icon_url: Option<String>,
    pub color: Option<Argb>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineStyle {
    pub color: Option<Argb>,
    pub width: Option<f64>,
    pub color_mode: ColorMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolyStyle {
    pub fill_color: Option<Argb>,
    /// Derived when the style closes, KML has no dedicated tag for it
    pub outline_color: Option<Argb>,
    pub fill: Option<bool>,
    pub outline: Option<bool>,
    pub color_mode: ColorMode,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalloonStyle {
    pub text: Option<String>,
    pub bg_color: Option<Argb>,
    pub text_color: Option<Argb>,
}

/// How a container and its children show up in a list view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ListItemType {
    Check,
    RadioFolder,
    CheckOffOnly,
    CheckHideChildren,
}

impl ListItemType {
    pub fn from_kml(value: &str) -> Option<Self> {
        match value {
            "check" => Some(ListItemType::Check),
            "radioFolder" => Some(ListItemType::RadioFolder),
            "checkOffOnly" => Some(ListItemType::CheckOffOnly),
            "checkHideChildren" => Some(ListItemType::CheckHideChildren),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStyle {
    pub item_type: Option<ListItemType>,
    pub bg_color: Option<Argb>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelStyle {
    pub color: Option<Argb>,
    pub scale: Option<f64>,
}

/// One parsed sub-style block
#[derive(Debug, Clone, PartialEq)]
pub enum SubStyle {
    Icon(IconStyle),
    Line(LineStyle),
    Polygon(PolyStyle),
    Balloon(BalloonStyle),
    List(ListStyle),
    Label(LabelStyle),
}

/// A `<Style>` block. Anonymous (`id == None`) styles can only be used inline.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<IconStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polygon: Option<PolyStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub balloon: Option<BalloonStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<LabelStyle>,
}

impl Style {
    pub fn with_id(id: impl Into<String>) -> Self {
        Style {
            id: Some(id.into()),
            ..Default::default()
        }
    }

    /// Store a sub-style, replacing an earlier block of the same kind
    pub fn apply(&mut self, sub_style: SubStyle) {
        match sub_style {
            SubStyle::Icon(icon) => self.icon = Some(icon),
            SubStyle::Line(line) => self.line = Some(line),
            SubStyle::Polygon(polygon) => self.polygon = Some(polygon),
            SubStyle::Balloon(balloon) => self.balloon = Some(balloon),
            SubStyle::List(list) => self.list = Some(list),
            SubStyle::Label(label) => self.label = Some(label),
        }
    }

    /// Derive values that depend on more than one sub-style.
    ///
    /// A polygon outline without its own color takes the line color, and
    /// failing that the polygon's `color` tag.
    pub fn finish(&mut self) {
        let line_color = self
            .line
            .as_ref()
            .filter(|line| line.color_mode == ColorMode::Normal)
            .and_then(|line| line.color);

        if let Some(polygon) = self.polygon.as_mut() {
            if polygon.outline_color.is_none() && polygon.color_mode == ColorMode::Normal {
                polygon.outline_color = line_color.or(polygon.fill_color);
            }
        }
    }

    /// Polygons are filled unless the style turns fill off
    pub fn has_fill(&self) -> bool {
        self.polygon.as_ref().and_then(|p| p.fill).unwrap_or(true)
    }

    /// Polygons are outlined unless the style turns outline off
    pub fn has_outline(&self) -> bool {
        self.polygon.as_ref().and_then(|p| p.outline).unwrap_or(true)
    }

    pub fn is_empty(&self) -> bool {
        self.icon.is_none()
            && self.line.is_none()
            && self.polygon.is_none()
            && self.balloon.is_none()
            && self.list.is_none()
            && self.label.is_none()
    }
}

/// What a `<StyleMap>` pair points at
#[derive(Debug, Clone, PartialEq)]
pub enum StyleMapTarget {
    Url(String),
    Inline(Style),
}

/// Parsed `<StyleMap>`: pair key ("normal" / "highlight") to target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleMap {
    pub id: Option<String>,
    pub pairs: IndexMap<String, StyleMapTarget>,
}

impl StyleMap {
    /// The "normal" pair if present, else the first pair in document order
    pub fn chosen(&self) -> Option<&StyleMapTarget> {
        self.pairs
            .get("normal")
            .or_else(|| self.pairs.values().next())
    }

    pub fn into_chosen(mut self) -> Option<StyleMapTarget> {
        match self.pairs.shift_remove("normal") {
            Some(target) => Some(target),
            None => self.pairs.shift_remove_index(0).map(|(_, target)| target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argb_channels() {
        let color = Argb::from_components(0x80, 0x11, 0x22, 0x33);
        assert_eq!(color.0, 0x8011_2233);
        assert_eq!(color.alpha(), 0x80);
        assert_eq!(color.red(), 0x11);
        assert_eq!(color.green(), 0x22);
        assert_eq!(color.blue(), 0x33);
        assert!(!color.is_opaque());
        assert_eq!(Argb::WHITE.to_rgba_f32(), [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_argb_serializes_as_hex() {
        let json = serde_json::to_string(&Argb(0xff00_ff00)).unwrap();
        assert_eq!(json, "\"#ff00ff00\"");
    }

    #[test]
    fn test_outline_color_prefers_line_color() {
        let mut style = Style::default();
        style.apply(SubStyle::Polygon(PolyStyle {
            fill_color: Some(Argb::WHITE),
            ..Default::default()
        }));
        style.apply(SubStyle::Line(LineStyle {
            color: Some(Argb::BLACK),
            ..Default::default()
        }));
        style.finish();
        let polygon = style.polygon.as_ref().unwrap();
        assert_eq!(polygon.fill_color, Some(Argb::WHITE));
        assert_eq!(polygon.outline_color, Some(Argb::BLACK));
    }

    #[test]
    fn test_outline_color_falls_back_to_fill_color() {
        let mut style = Style::default();
        style.apply(SubStyle::Polygon(PolyStyle {
            fill_color: Some(Argb(0x7f00_ff00)),
            ..Default::default()
        }));
        style.finish();
        let polygon = style.polygon.as_ref().unwrap();
        assert_eq!(polygon.outline_color, polygon.fill_color);
    }

    #[test]
    fn test_random_color_mode_leaves_outline_unspecified() {
        let mut style = Style::default();
        style.apply(SubStyle::Polygon(PolyStyle {
            color_mode: ColorMode::Random,
            ..Default::default()
        }));
        style.finish();
        assert_eq!(style.polygon.unwrap().outline_color, None);
    }

    #[test]
    fn test_fill_and_outline_default_on() {
        let style = Style::default();
        assert!(style.has_fill());
        assert!(style.has_outline());
        assert!(style.is_empty());
    }

    #[test]
    fn test_style_map_prefers_normal() {
        let mut map = StyleMap::default();
        map.pairs.insert("highlight".into(), StyleMapTarget::Url("#hot".into()));
        map.pairs.insert("normal".into(), StyleMapTarget::Url("#calm".into()));
        assert_eq!(map.chosen(), Some(&StyleMapTarget::Url("#calm".into())));

        let mut only_highlight = StyleMap::default();
        only_highlight
            .pairs
            .insert("highlight".into(), StyleMapTarget::Url("#hot".into()));
        assert_eq!(
            only_highlight.into_chosen(),
            Some(StyleMapTarget::Url("#hot".into()))
        );
    }
}
