//! CLI tool for inspecting a parsed KML document
//!
//! Usage:
//!   cargo run --release --bin kml_dump -- <kml_file> [options]
//!
//! Options:
//!   --summary           Container tree and counts only (default)
//!   --json              Print the parsed model as JSON
//!   --verbose           Show every placemark with its resolved style

use std::env;

use kml_engine::{parse_kml_file, Container, KmlDocument};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <kml_file> [--summary] [--json] [--verbose]", args[0]);
        eprintln!();
        eprintln!("Environment:");
        eprintln!("  RUST_LOG=debug               Log skipped elements and recoverable errors");
        eprintln!("  KML_PROFILE_TIMING=1         Log parse and resolution timings");
        eprintln!("  KML_PARALLEL_RESOLUTION=0    Resolve styles on a single thread");
        eprintln!("  KML_CLOSE_RINGS=0            Keep polygon rings as written");
        return Ok(());
    }

    let kml_path = &args[1];
    let json = args.iter().any(|a| a == "--json");
    let verbose = args.iter().any(|a| a == "--verbose");

    let document = parse_kml_file(kml_path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    print_summary(&document);
    if verbose {
        print_placemarks(&document);
    }
    Ok(())
}

fn print_summary(document: &KmlDocument) {
    println!("=== KML Summary ===");
    println!("Containers: {}", document.all_containers().len());
    println!("Placemarks: {}", document.placemark_count());
    println!("Document-scope styles: {}", document.styles().len());
    println!("Ground overlays: {}", document.ground_overlays().len());
    println!("Diagnostics: {}", document.diagnostics().len());
    for diagnostic in document.diagnostics() {
        println!("  ! {}", diagnostic);
    }

    println!();
    for container in document.containers() {
        print_container(container, 0);
    }
}

fn print_container(container: &Container, indent: usize) {
    let prefix = " ".repeat(indent);
    println!(
        "{}{} {} ({} styles, {} placemarks)",
        prefix,
        container.kind.tag(),
        container
            .property("name")
            .or(container.container_id())
            .unwrap_or("<unnamed>"),
        container.styles.len(),
        container.placemarks.len()
    );
    for child in &container.containers {
        print_container(child, indent + 2);
    }
}

fn print_placemarks(document: &KmlDocument) {
    println!();
    println!("=== Placemarks ===");
    for (placemark, owner) in document.placemarks() {
        let geometry = placemark
            .geometry
            .as_ref()
            .map(|g| format!("{} ({} coords)", g.geometry_type(), g.coordinate_count()))
            .unwrap_or_else(|| "no geometry".to_string());
        let style = match placemark.resolved_style() {
            Some(style) => style.id.clone().unwrap_or_else(|| "inline".to_string()),
            None => "default".to_string(),
        };
        println!(
            "  {:<30} {:<28} style={:<16} in={}",
            placemark.name().unwrap_or("<unnamed>"),
            geometry,
            style,
            owner.and_then(Container::container_id).unwrap_or("-")
        );
    }
}
