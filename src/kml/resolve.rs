//! Style resolution over a finished container tree
//!
//! Runs after parsing so styles may be declared before or after the
//! placemarks that use them. Lookup walks from the placemark's container
//! outward through its ancestors to the document scope, never into siblings.

use crate::error::KmlError;
use crate::kml::model::{Container, Placemark, Style, StyleMapTarget, StyleTable};
use crate::options::ParserOptions;
use indexmap::IndexMap;
use rayon::prelude::*;

/// Bare style identifier from a style url: `#id`, `file.kml#id` or `id`
pub fn style_id(url: &str) -> &str {
    url.rsplit_once('#').map_or(url, |(_, id)| id).trim()
}

/// Fold StyleMaps into style tables, then fill every placemark's resolved style.
///
/// Returns the references that resolved to nothing.
pub(crate) fn resolve_document(scope: &mut Container, options: &ParserOptions) -> Vec<KmlError> {
    let mut unresolved = Vec::new();
    fold_style_maps(scope, &[], options.max_style_map_depth, &mut unresolved);

    let mut chains: Vec<Vec<&StyleTable>> = Vec::new();
    let mut jobs: Vec<(&Placemark, usize)> = Vec::new();
    collect_jobs(scope, &[], &mut chains, &mut jobs);

    let failures: Vec<KmlError> = if options.parallel_resolution {
        jobs.par_iter()
            .filter_map(|&(placemark, chain)| resolve_placemark(placemark, &chains[chain]).err())
            .collect()
    } else {
        jobs.iter()
            .filter_map(|&(placemark, chain)| resolve_placemark(placemark, &chains[chain]).err())
            .collect()
    };

    unresolved.extend(failures);
    unresolved
}

/// Inline style wins, then the style url looked up innermost scope first
fn resolve_placemark(placemark: &Placemark, chain: &[&StyleTable]) -> Result<(), KmlError> {
    if let Some(inline) = &placemark.inline_style {
        placemark.set_resolved_style(inline.clone());
        return Ok(());
    }
    let Some(url) = placemark.style_url.as_deref() else {
        return Ok(());
    };

    let id = style_id(url);
    match chain.iter().rev().find_map(|table| table.get(id)) {
        Some(style) => {
            placemark.set_resolved_style(style.clone());
            Ok(())
        }
        None => Err(KmlError::UnresolvedStyleReference(url.to_string())),
    }
}

/// Record the scope chain of every container and which chain each placemark uses
fn collect_jobs<'a>(
    container: &'a Container,
    outer: &[&'a StyleTable],
    chains: &mut Vec<Vec<&'a StyleTable>>,
    jobs: &mut Vec<(&'a Placemark, usize)>,
) {
    let mut chain = outer.to_vec();
    chain.push(&container.styles);

    if container.has_placemarks() {
        let index = chains.len();
        chains.push(chain.clone());
        jobs.extend(container.placemarks.iter().map(|placemark| (placemark, index)));
    }
    for child in &container.containers {
        collect_jobs(child, &chain, chains, jobs);
    }
}

/// Replace each container's pending StyleMaps with the style they choose.
///
/// Parents are folded before children, so outer scopes only hold plain styles
/// by the time a child looks into them.
fn fold_style_maps(container: &mut Container, outer: &[&StyleTable], max_depth: usize, unresolved: &mut Vec<KmlError>) {
    let style_maps = std::mem::take(&mut container.style_maps);
    for (id, target) in &style_maps {
        match lookup_target(target, &container.styles, &style_maps, outer, max_depth) {
            Some(style) => {
                container.styles.insert(id.clone(), style);
            }
            None => {
                let url = match target {
                    StyleMapTarget::Url(url) => url.clone(),
                    StyleMapTarget::Inline(_) => id.clone(),
                };
                unresolved.push(KmlError::UnresolvedStyleReference(url));
            }
        }
    }

    let Container { styles, containers, .. } = container;
    let mut chain: Vec<&StyleTable> = outer.to_vec();
    chain.push(styles);
    for child in containers.iter_mut() {
        fold_style_maps(child, &chain, max_depth, unresolved);
    }
}

fn lookup_target(
    target: &StyleMapTarget,
    own_styles: &StyleTable,
    own_maps: &IndexMap<String, StyleMapTarget>,
    outer: &[&StyleTable],
    depth: usize,
) -> Option<Style> {
    let url = match target {
        StyleMapTarget::Inline(style) => return Some(style.clone()),
        StyleMapTarget::Url(url) => url,
    };
    let id = style_id(url);

    if let Some(style) = own_styles.get(id) {
        return Some(style.clone());
    }
    if depth > 0 {
        if let Some(next) = own_maps.get(id) {
            return lookup_target(next, own_styles, own_maps, outer, depth - 1);
        }
    }
    outer.iter().rev().find_map(|table| table.get(id)).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kml::model::{ContainerKind, LineStyle, SubStyle};

    fn named_style(id: &str, width: f64) -> Style {
        let mut style = Style::with_id(id);
        style.apply(SubStyle::Line(LineStyle {
            width: Some(width),
            ..Default::default()
        }));
        style
    }

    fn placemark_with_url(url: &str) -> Placemark {
        let mut placemark = Placemark::new(None);
        placemark.style_url = Some(url.to_string());
        placemark
    }

    #[test]
    fn test_style_id() {
        assert_eq!(style_id("#road"), "road");
        assert_eq!(style_id("shared.kml#road"), "road");
        assert_eq!(style_id("http://example.com/a.kml#road"), "road");
        assert_eq!(style_id("road"), "road");
    }

    #[test]
    fn test_outer_style_visible_to_inner_placemark() {
        let mut inner = Container::new(ContainerKind::Folder, None);
        inner.placemarks.push(placemark_with_url("#outer"));
        let mut scope = Container::default();
        scope.insert_style("outer".into(), named_style("outer", 2.0));
        scope.containers.push(inner);

        let unresolved = resolve_document(&mut scope, &ParserOptions::default());
        assert!(unresolved.is_empty());
        let resolved = scope.containers[0].placemarks[0].resolved_style().unwrap();
        assert_eq!(resolved.id.as_deref(), Some("outer"));
    }

    #[test]
    fn test_inner_style_shadows_outer() {
        let mut inner = Container::new(ContainerKind::Folder, None);
        inner.insert_style("s".into(), named_style("s", 5.0));
        inner.placemarks.push(placemark_with_url("#s"));
        let mut scope = Container::default();
        scope.insert_style("s".into(), named_style("s", 1.0));
        scope.containers.push(inner);

        resolve_document(&mut scope, &ParserOptions::default());
        let resolved = scope.containers[0].placemarks[0].resolved_style().unwrap();
        assert_eq!(resolved.line.as_ref().unwrap().width, Some(5.0));
    }

    #[test]
    fn test_sibling_style_not_visible() {
        let mut left = Container::new(ContainerKind::Folder, None);
        left.insert_style("private".into(), named_style("private", 1.0));
        let mut right = Container::new(ContainerKind::Folder, None);
        right.placemarks.push(placemark_with_url("#private"));
        let mut scope = Container::default();
        scope.containers.push(left);
        scope.containers.push(right);

        let options = ParserOptions {
            parallel_resolution: false,
            ..Default::default()
        };
        let unresolved = resolve_document(&mut scope, &options);
        assert_eq!(unresolved.len(), 1);
        assert!(matches!(&unresolved[0], KmlError::UnresolvedStyleReference(url) if url == "#private"));
        assert!(scope.containers[1].placemarks[0].resolved_style().is_none());
    }

    #[test]
    fn test_style_map_chain_and_forward_reference() {
        let mut scope = Container::default();
        scope.placemarks.push(placemark_with_url("#first"));
        scope.insert_style_map("first".into(), StyleMapTarget::Url("#second".into()));
        scope.insert_style_map("second".into(), StyleMapTarget::Url("#target".into()));
        scope.insert_style("target".into(), named_style("target", 3.0));

        let unresolved = resolve_document(&mut scope, &ParserOptions::default());
        assert!(unresolved.is_empty(), "{:?}", unresolved);
        assert!(scope.style_maps.is_empty());
        assert_eq!(
            scope.placemarks[0].resolved_style().unwrap().id.as_deref(),
            Some("target")
        );
    }

    #[test]
    fn test_cyclic_style_map_terminates() {
        let mut scope = Container::default();
        scope.insert_style_map("a".into(), StyleMapTarget::Url("#b".into()));
        scope.insert_style_map("b".into(), StyleMapTarget::Url("#a".into()));
        scope.placemarks.push(placemark_with_url("#a"));

        let unresolved = resolve_document(&mut scope, &ParserOptions::default());
        assert!(!unresolved.is_empty());
        assert!(scope.placemarks[0].resolved_style().is_none());
    }

    #[test]
    fn test_dangling_style_map_reported_once() {
        let mut scope = Container::default();
        scope.insert_style_map("map".into(), StyleMapTarget::Url("#missing".into()));

        let unresolved = resolve_document(&mut scope, &ParserOptions::default());
        assert_eq!(unresolved.len(), 1);
        assert!(matches!(&unresolved[0], KmlError::UnresolvedStyleReference(url) if url == "#missing"));
        assert!(scope.style("#map").is_none());
    }

    #[test]
    fn test_placemark_without_style_info_stays_empty() {
        let mut scope = Container::default();
        scope.placemarks.push(Placemark::default());
        let unresolved = resolve_document(&mut scope, &ParserOptions::default());
        assert!(unresolved.is_empty());
        assert!(scope.placemarks[0].resolved_style().is_none());
    }
}
