// Parses the KML fixtures and checks the resulting container/placemark model
use kml_engine::{
    parse_color, parse_kml_file, parse_kml_reader, parse_kml_str, Argb, Geometry, HotSpot, KmlError,
    ParserOptions,
};
use std::fs::File;
use std::io::BufReader;

#[test]
fn test_inline_style() {
    let document = parse_kml_file("tests/fixtures/amu_inline_style.kml").expect("Failed to parse KML");
    assert_eq!(document.document_placemarks().len(), 1);
    assert_eq!(document.placemark_count(), 1);

    for (placemark, owner) in document.placemarks() {
        assert!(owner.is_none());
        let inline_style = placemark.inline_style.as_ref().expect("inline style missing");
        let line = inline_style.line.as_ref().unwrap();
        let polygon = inline_style.polygon.as_ref().unwrap();

        assert_eq!(line.color, Some(parse_color("#000000").unwrap()));
        assert_eq!(polygon.fill_color, Some(parse_color("#ffffff").unwrap()));
        assert_eq!(line.color, polygon.outline_color);
        assert_eq!(placemark.geometry.as_ref().unwrap().geometry_type(), "MultiGeometry");
        assert_eq!(placemark.resolved_style(), Some(inline_style));
    }
}

#[test]
fn test_empty_hot_spot_style() {
    let document = parse_kml_file("tests/fixtures/amu_empty_hotspot.kml").expect("Failed to parse KML");
    assert_eq!(document.placemark_count(), 1);
    assert!(document.diagnostics().is_empty(), "{:?}", document.diagnostics());

    let (placemark, _) = document.placemarks()[0];
    let icon = placemark.resolved_style().unwrap().icon.as_ref().unwrap();
    assert_eq!(icon.hot_spot, Some(HotSpot::default()));
    assert!(icon.icon_url.as_deref().unwrap().ends_with("ylw-pushpin.png"));
}

#[test]
fn test_poly_style_boolean_numeric() {
    let document = parse_kml_file("tests/fixtures/amu_poly_style_boolean_numeric.kml")
        .expect("Failed to parse KML");
    assert_eq!(document.containers().len(), 1);
    let container = &document.containers()[0];
    assert!(container.has_placemarks());

    let style = container.style("#fireadvisory").expect("style not registered");
    assert!(style.has_fill());
    assert!(!style.has_outline());
    // Outline takes the LineStyle color over the PolyStyle color
    assert_eq!(style.polygon.as_ref().unwrap().outline_color, Some(Argb(0xffff_0000)));
}

#[test]
fn test_poly_style_boolean_alpha() {
    let document = parse_kml_file("tests/fixtures/amu_poly_style_boolean_alpha.kml")
        .expect("Failed to parse KML");
    assert_eq!(document.containers().len(), 1);
    let container = &document.containers()[0];
    assert!(container.has_placemarks());

    let style = container.style("#fireadvisory").expect("style not registered");
    assert!(style.has_fill());
    assert!(!style.has_outline());
    let polygon = style.polygon.as_ref().unwrap();
    assert_eq!(polygon.outline_color, polygon.fill_color);
}

#[test]
fn test_open_rings_are_closed() {
    let document = parse_kml_file("tests/fixtures/amu_poly_style_boolean_alpha.kml").unwrap();
    let placemark = &document.containers()[0].placemarks[0];
    let Some(Geometry::Polygon(polygon)) = &placemark.geometry else {
        panic!("expected a polygon");
    };
    assert_eq!(polygon.outer_boundary.len(), 5);
    assert!(polygon.is_closed());

    let options = ParserOptions {
        close_rings: false,
        ..Default::default()
    };
    let file = File::open("tests/fixtures/amu_poly_style_boolean_alpha.kml").unwrap();
    let document = parse_kml_reader(BufReader::new(file), options).unwrap();
    let placemark = &document.containers()[0].placemarks[0];
    let Some(Geometry::Polygon(polygon)) = &placemark.geometry else {
        panic!("expected a polygon");
    };
    assert_eq!(polygon.outer_boundary.len(), 4);
}

#[test]
fn test_container_hierarchy() {
    let document = parse_kml_file("tests/fixtures/amu_document_nest.kml").expect("Failed to parse KML");
    assert_eq!(document.containers().len(), 1);
    let container = &document.containers()[0];
    assert_eq!(container.container_id(), Some("hasId"));
    assert!(container.has_containers());
    assert_eq!(container.property("name"), Some("Outer document"));
    assert_eq!(container.containers[0].property("name"), Some("Nested folder"));
}

#[test]
fn test_unsupported_content_is_skipped() {
    let document = parse_kml_file("tests/fixtures/amu_unsupported.kml").expect("Failed to parse KML");
    assert_eq!(document.placemark_count(), 1);
    let (placemark, _) = document.placemarks()[0];
    assert!(!placemark.has_geometry());
    assert_eq!(placemark.name(), Some("Model placemark"));
}

#[test]
fn test_recoverable_errors_are_collected() {
    let document =
        parse_kml_file("tests/fixtures/recoverable_errors.kml").expect("recoverable errors must not abort");
    assert_eq!(document.placemark_count(), 2);

    let diagnostics = document.diagnostics();
    let count = |predicate: fn(&KmlError) -> bool| diagnostics.iter().filter(|e| predicate(e)).count();
    assert_eq!(count(|e| matches!(e, KmlError::InvalidColorFormat(_))), 1);
    assert_eq!(count(|e| matches!(e, KmlError::InvalidBooleanFormat(_))), 1);
    assert_eq!(count(|e| matches!(e, KmlError::InvalidCoordinate(_))), 2);
    assert_eq!(count(|e| matches!(e, KmlError::UnresolvedStyleReference(_))), 1);
    assert!(diagnostics.iter().all(|e| !e.is_fatal()));

    let container = &document.containers()[0];
    let line = &container.placemarks[0];
    assert_eq!(line.geometry.as_ref().unwrap().coordinate_count(), 3);
    let style = line.resolved_style().unwrap();
    assert_eq!(style.line.as_ref().unwrap().color, None);
    assert_eq!(style.line.as_ref().unwrap().width, Some(3.0));
    assert!(style.has_fill());
    assert!(!style.has_outline());

    assert!(container.placemarks[1].resolved_style().is_none());

    assert!(container.has_ground_overlays());
    let overlay = &container.ground_overlays[0];
    assert_eq!(overlay.image_url.as_deref(), Some("campus.png"));
    assert_eq!(overlay.lat_lon_box.unwrap().north, 1.0);
}

#[test]
fn test_text_split_by_markup() {
    let document = parse_kml_file("tests/fixtures/split_text.kml").expect("Failed to parse KML");
    assert!(document.diagnostics().is_empty(), "{:?}", document.diagnostics());

    let (placemark, _) = document.placemarks()[0];
    assert_eq!(placemark.property("description"), Some("Hello  world"));
    assert_eq!(
        placemark.geometry,
        Some(Geometry::LineString(vec![
            kml_engine::LatLng::new(2.0, 1.0),
            kml_engine::LatLng::new(4.0, 3.0),
            kml_engine::LatLng::new(6.0, 5.0),
        ]))
    );
}

#[test]
fn test_unbalanced_markup_is_fatal() {
    for source in [
        "<kml><Document><Placemark></Document></kml>",
        "<kml><Document></Folder></kml>",
        "<kml><Folder><Folder></Folder></kml>",
        "<kml><Document>",
    ] {
        let err = parse_kml_str(source).expect_err(source);
        assert!(matches!(err, KmlError::UnbalancedMarkup { .. }), "{}: {:?}", source, err);
    }
}

#[test]
fn test_malformed_markup_is_fatal() {
    let err = parse_kml_str("<kml><Document><!-- never closed </Document></kml>").unwrap_err();
    assert!(matches!(err, KmlError::MalformedMarkup { .. }), "{:?}", err);
}

#[test]
fn test_every_placemark_is_kept() {
    let mut source = String::from("<kml><Document>");
    for i in 0..250 {
        source.push_str(&format!(
            "<Folder><Placemark><name>p{i}</name><Point><coordinates>{i},bad</coordinates></Point></Placemark></Folder>"
        ));
    }
    source.push_str("<Placemark/></Document></kml>");

    let document = parse_kml_str(&source).unwrap();
    assert_eq!(document.placemark_count(), 251);
    assert_eq!(document.containers()[0].containers.len(), 250);
    assert_eq!(document.diagnostics().len(), 250);
}

#[test]
fn test_document_serializes_to_json() {
    let document = parse_kml_file("tests/fixtures/style_map.kml").unwrap();
    let json = serde_json::to_value(&document).unwrap();
    let container = &json["containers"][0];
    assert_eq!(container["kind"], "Document");
    assert_eq!(container["placemarks"][0]["resolvedStyle"]["id"], "style1");
    assert_eq!(container["placemarks"][0]["geometry"]["type"], "Point");
}
