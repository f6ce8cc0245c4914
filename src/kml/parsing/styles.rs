//! `<Style>` and `<StyleMap>` parsing
//!
//! Unknown sub-tags are skipped. Colors under `colorMode` random are not
//! supported and are left unspecified.

use super::KmlParser;
use crate::error::KmlError;
use crate::kml::model::{
    BalloonStyle, ColorMode, HotSpot, IconStyle, LabelStyle, LineStyle, ListItemType, ListStyle,
    PolyStyle, Style, StyleMap, StyleMapTarget, SubStyle, Units,
};
use std::io::BufRead;

impl<R: BufRead> KmlParser<R> {
    /// Parse a `<Style>` element; the reader is on its start tag
    pub(crate) fn parse_style(&mut self) -> Result<Style, KmlError> {
        let mut style = Style {
            id: self.reader.attribute("id").map(str::to_string),
            ..Default::default()
        };

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            let sub_style = match tag.as_str() {
                "IconStyle" => SubStyle::Icon(self.parse_icon_style()?),
                "LineStyle" => SubStyle::Line(self.parse_line_style()?),
                "PolyStyle" => SubStyle::Polygon(self.parse_poly_style()?),
                "BalloonStyle" => SubStyle::Balloon(self.parse_balloon_style()?),
                "ListStyle" => SubStyle::List(self.parse_list_style()?),
                "LabelStyle" => SubStyle::Label(self.parse_label_style()?),
                _ => {
                    log::debug!("skipping <{}> in style {:?}", tag, style.id);
                    self.reader.skip_element()?;
                    continue;
                }
            };
            style.apply(sub_style);
        }

        style.finish();
        Ok(style)
    }

    /// Parse a `<StyleMap>` into its key -> target pairs
    pub(crate) fn parse_style_map(&mut self) -> Result<StyleMap, KmlError> {
        let mut style_map = StyleMap {
            id: self.reader.attribute("id").map(str::to_string),
            ..Default::default()
        };

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            if tag != "Pair" {
                self.reader.skip_element()?;
                continue;
            }
            match self.parse_pair()? {
                (Some(key), Some(target)) => {
                    style_map.pairs.insert(key, target);
                }
                (key, _) => log::debug!("ignoring incomplete StyleMap pair (key {:?})", key),
            }
        }

        Ok(style_map)
    }

    fn parse_pair(&mut self) -> Result<(Option<String>, Option<StyleMapTarget>), KmlError> {
        let mut key = None;
        let mut target = None;

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "key" => key = self.read_optional_text()?,
                "styleUrl" => target = self.read_optional_text()?.map(StyleMapTarget::Url),
                "Style" => target = Some(StyleMapTarget::Inline(self.parse_style()?)),
                _ => self.reader.skip_element()?,
            }
        }

        Ok((key, target))
    }

    fn parse_icon_style(&mut self) -> Result<IconStyle, KmlError> {
        let mut icon = IconStyle::default();
        let mut color_mode = ColorMode::Normal;

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "scale" => icon.scale = self.read_float()?,
                "heading" => icon.heading = self.read_float()?,
                "color" => icon.color = self.read_color()?,
                "colorMode" => color_mode = self.read_color_mode()?,
                "hotSpot" => icon.hot_spot = Some(self.read_hot_spot()?),
                "Icon" => icon.icon_url = self.read_href()?,
                _ => self.reader.skip_element()?,
            }
        }

        if color_mode == ColorMode::Random {
            icon.color = None;
        }
        Ok(icon)
    }

    fn parse_line_style(&mut self) -> Result<LineStyle, KmlError> {
        let mut line = LineStyle::default();

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "color" => line.color = self.read_color()?,
                "width" => line.width = self.read_float()?,
                "colorMode" => line.color_mode = self.read_color_mode()?,
                _ => self.reader.skip_element()?,
            }
        }

        if line.color_mode == ColorMode::Random {
            line.color = None;
        }
        Ok(line)
    }

    fn parse_poly_style(&mut self) -> Result<PolyStyle, KmlError> {
        let mut polygon = PolyStyle::default();

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "color" => polygon.fill_color = self.read_color()?,
                "colorMode" => polygon.color_mode = self.read_color_mode()?,
                "fill" => polygon.fill = Some(self.read_flag()?),
                "outline" => polygon.outline = Some(self.read_flag()?),
                _ => self.reader.skip_element()?,
            }
        }

        if polygon.color_mode == ColorMode::Random {
            polygon.fill_color = None;
        }
        Ok(polygon)
    }

    fn parse_balloon_style(&mut self) -> Result<BalloonStyle, KmlError> {
        let mut balloon = BalloonStyle::default();

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "text" => balloon.text = self.read_optional_text()?,
                "bgColor" => balloon.bg_color = self.read_color()?,
                "textColor" => balloon.text_color = self.read_color()?,
                _ => self.reader.skip_element()?,
            }
        }

        Ok(balloon)
    }

    fn parse_list_style(&mut self) -> Result<ListStyle, KmlError> {
        let mut list = ListStyle::default();

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "listItemType" => {
                    let value = self.reader.read_text()?;
                    list.item_type = ListItemType::from_kml(&value);
                    if list.item_type.is_none() {
                        log::debug!("unknown listItemType {:?}", value);
                    }
                }
                "bgColor" => list.bg_color = self.read_color()?,
                _ => self.reader.skip_element()?,
            }
        }

        Ok(list)
    }

    fn parse_label_style(&mut self) -> Result<LabelStyle, KmlError> {
        let mut label = LabelStyle::default();
        let mut color_mode = ColorMode::Normal;

        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "color" => label.color = self.read_color()?,
                "scale" => label.scale = self.read_float()?,
                "colorMode" => color_mode = self.read_color_mode()?,
                _ => self.reader.skip_element()?,
            }
        }

        if color_mode == ColorMode::Random {
            label.color = None;
        }
        Ok(label)
    }

    fn read_color_mode(&mut self) -> Result<ColorMode, KmlError> {
        let value = self.reader.read_text()?;
        Ok(match value.as_str() {
            "random" => {
                log::debug!("colorMode random is not supported, color left unspecified");
                ColorMode::Random
            }
            _ => ColorMode::Normal,
        })
    }

    /// `<hotSpot x=".." y=".." xunits=".." yunits=".."/>`; missing parts keep defaults
    fn read_hot_spot(&mut self) -> Result<HotSpot, KmlError> {
        let mut hot_spot = HotSpot::default();
        let x = self.reader.attribute("x").map(str::to_string);
        let y = self.reader.attribute("y").map(str::to_string);
        let x_units = self.reader.attribute("xunits").and_then(parse_units);
        let y_units = self.reader.attribute("yunits").and_then(parse_units);

        if let Some(x) = x.and_then(|raw| self.coerce_float(&raw)) {
            hot_spot.x = x;
        }
        if let Some(y) = y.and_then(|raw| self.coerce_float(&raw)) {
            hot_spot.y = y;
        }
        if let Some(units) = x_units {
            hot_spot.x_units = units;
        }
        if let Some(units) = y_units {
            hot_spot.y_units = units;
        }

        self.reader.skip_element()?;
        Ok(hot_spot)
    }

    /// `<href>` inside an `<Icon>` element
    pub(crate) fn read_href(&mut self) -> Result<Option<String>, KmlError> {
        let mut href = None;
        let depth = self.reader.depth();
        while let Some(tag) = self.next_child(depth)? {
            match tag.as_str() {
                "href" => href = self.read_optional_text()?,
                _ => self.reader.skip_element()?,
            }
        }
        Ok(href)
    }
}

fn parse_units(value: &str) -> Option<Units> {
    match value {
        "fraction" => Some(Units::Fraction),
        "pixels" => Some(Units::Pixels),
        "insetPixels" => Some(Units::InsetPixels),
        _ => None,
    }
}
