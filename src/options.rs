//! Parser configuration

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    /// Resolve placemark styles on the rayon pool instead of sequentially
    pub parallel_resolution: bool,
    /// Repeat the first vertex of polygon rings that are not closed
    pub close_rings: bool,
    /// How many StyleMap-to-StyleMap hops are followed before giving up
    pub max_style_map_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            parallel_resolution: true,
            close_rings: true,
            max_style_map_depth: 8,
        }
    }
}

impl ParserOptions {
    /// Defaults overridden by `KML_PARALLEL_RESOLUTION` and `KML_CLOSE_RINGS`
    pub fn from_env() -> Self {
        let mut options = ParserOptions::default();
        if let Some(value) = env_flag("KML_PARALLEL_RESOLUTION") {
            options.parallel_resolution = value;
        }
        if let Some(value) = env_flag("KML_CLOSE_RINGS") {
            options.close_rings = value;
        }
        options
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    Some(!matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
}

/// Phase timings are logged when this is set
pub(crate) fn profile_timing() -> bool {
    std::env::var("KML_PROFILE_TIMING").is_ok()
}
