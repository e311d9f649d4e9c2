//! Point extraction and label synthesis
//!
//! A point-like element (`<wpt>` or `<trkpt>`) carries its position in the
//! `lat`/`lon` attributes. The display label comes from an embedded `<html>`
//! element when present, otherwise it is synthesized from the element's
//! attributes and text-bearing children.

use crate::document::{descendants_by_tag, text_content};
use crate::{OverlayError, Result};

/// A plottable position with a display label.
///
/// Immutable once constructed; coordinates are WGS84 decimal degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
    pub label: String,
}

impl Point {
    pub fn new(lat: f64, lon: f64, label: impl Into<String>) -> Self {
        Self {
            lat,
            lon,
            label: label.into(),
        }
    }

    /// Planar Euclidean distance in degree space, not geodesic.
    ///
    /// Only meaningful for nearby points, which is the regime the trackpoint
    /// decimation threshold operates in.
    #[inline]
    pub fn planar_distance(&self, other: &Point) -> f64 {
        let lat_diff = self.lat - other.lat;
        let lon_diff = self.lon - other.lon;
        (lat_diff * lat_diff + lon_diff * lon_diff).sqrt()
    }
}

/// Extract a [`Point`] from a point-like element.
///
/// Fails with [`OverlayError::MalformedPoint`] if either coordinate attribute
/// is missing, non-numeric or non-finite. Callers are expected to skip the
/// single offending point rather than abort the render.
pub fn extract_point(node: roxmltree::Node) -> Result<Point> {
    let (lat, lon) = parse_lat_lon(node)?;
    let label = explicit_description(node).unwrap_or_else(|| synthesize_label(node));
    Ok(Point { lat, lon, label })
}

/// Parse the `lat`/`lon` attribute pair of a point-like element.
pub fn parse_lat_lon(node: roxmltree::Node) -> Result<(f64, f64)> {
    let lat = parse_coord_attr(node, "lat")?;
    let lon = parse_coord_attr(node, "lon")?;
    Ok((lat, lon))
}

fn parse_coord_attr(node: roxmltree::Node, name: &str) -> Result<f64> {
    let tag = node.tag_name().name();
    let raw = node.attribute(name).ok_or_else(|| {
        OverlayError::MalformedPoint(format!("<{tag}> is missing the {name} attribute"))
    })?;
    let value: f64 = raw.trim().parse().map_err(|_| {
        OverlayError::MalformedPoint(format!("<{tag}> has non-numeric {name}=\"{raw}\""))
    })?;
    if !value.is_finite() {
        return Err(OverlayError::MalformedPoint(format!(
            "<{tag}> has non-finite {name}=\"{raw}\""
        )));
    }
    Ok(value)
}

/// The verbatim text of an embedded `<html>` description element, if any.
fn explicit_description(node: roxmltree::Node) -> Option<String> {
    descendants_by_tag(node, "html").next().map(text_content)
}

/// Build a fallback label for a point without an explicit description.
///
/// A header names the point kind, followed by one `name = value` line per
/// attribute and one `tag = text` line per direct child element that carries
/// text. Children without any text content are skipped. Lines are joined
/// with `\n`; adapters translate that to whatever their surface displays.
pub fn synthesize_label(node: roxmltree::Node) -> String {
    let mut lines: Vec<String> = Vec::new();

    if let Some(header) = kind_header(node.tag_name().name()) {
        lines.push(header.to_string());
    }

    for attr in node.attributes() {
        lines.push(format!("{} = {}", attr.name(), attr.value()));
    }

    for child in node.children().filter(|c| c.is_element()) {
        if let Some(text) = first_text(child) {
            lines.push(format!("{} = {}", child.tag_name().name(), text));
        }
    }

    lines.join("\n")
}

fn kind_header(tag: &str) -> Option<&'static str> {
    match tag {
        "wpt" => Some("Waypoint"),
        "trkpt" => Some("Track Point"),
        _ => None,
    }
}

/// First non-whitespace text child of an element, trimmed.
fn first_text<'a>(node: roxmltree::Node<'a, '_>) -> Option<&'a str> {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .map(str::trim)
        .find(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GpxDocument;

    fn first_point_node(doc: &GpxDocument, tag: &str) -> String {
        let node = doc.find_by_tag(tag).next().unwrap();
        extract_point(node).unwrap().label
    }

    #[test]
    fn test_extract_point_coordinates() {
        let doc = GpxDocument::parse(r#"<gpx><trkpt lat="49.0" lon="-123.0"/></gpx>"#).unwrap();
        let node = doc.find_by_tag("trkpt").next().unwrap();
        let point = extract_point(node).unwrap();
        assert_eq!(point.lat, 49.0);
        assert_eq!(point.lon, -123.0);
    }

    #[test]
    fn test_missing_coordinate_attribute() {
        let doc = GpxDocument::parse(r#"<gpx><wpt lat="49.0"/></gpx>"#).unwrap();
        let node = doc.find_by_tag("wpt").next().unwrap();
        let err = extract_point(node).unwrap_err();
        assert!(err.to_string().contains("lon"));
    }

    #[test]
    fn test_non_numeric_coordinate() {
        let doc = GpxDocument::parse(r#"<gpx><wpt lat="north" lon="-123.0"/></gpx>"#).unwrap();
        let node = doc.find_by_tag("wpt").next().unwrap();
        assert!(extract_point(node).is_err());
    }

    #[test]
    fn test_non_finite_coordinate_rejected() {
        // "NaN" parses as a float but must not leak into geometry
        let doc = GpxDocument::parse(r#"<gpx><wpt lat="NaN" lon="-123.0"/></gpx>"#).unwrap();
        let node = doc.find_by_tag("wpt").next().unwrap();
        assert!(extract_point(node).is_err());
    }

    #[test]
    fn test_explicit_html_description_wins() {
        let doc = GpxDocument::parse(
            r#"<gpx><wpt lat="49.1" lon="-123.1" name="Cairn"><html>Summit <b>cairn</b></html></wpt></gpx>"#,
        )
        .unwrap();
        assert_eq!(first_point_node(&doc, "wpt"), "Summit cairn");
    }

    #[test]
    fn test_synthesized_waypoint_label() {
        // Attribute lines follow document order
        let doc =
            GpxDocument::parse(r#"<gpx><wpt lat="49.1" lon="-123.1" name="Cairn"/></gpx>"#).unwrap();
        assert_eq!(
            first_point_node(&doc, "wpt"),
            "Waypoint\nlat = 49.1\nlon = -123.1\nname = Cairn"
        );
    }

    #[test]
    fn test_synthesized_trackpoint_label() {
        let doc = GpxDocument::parse(r#"<gpx><trkpt lat="1" lon="2"/></gpx>"#).unwrap();
        assert_eq!(first_point_node(&doc, "trkpt"), "Track Point\nlat = 1\nlon = 2");
    }

    #[test]
    fn test_unknown_point_kind_has_no_header() {
        let doc = GpxDocument::parse(r#"<gpx><photo lat="1" lon="2"/></gpx>"#).unwrap();
        let node = doc.find_by_tag("photo").next().unwrap();
        assert_eq!(synthesize_label(node), "lat = 1\nlon = 2");
    }

    #[test]
    fn test_text_bearing_children_are_listed() {
        let doc = GpxDocument::parse(
            "<gpx><wpt lat=\"49.1\" lon=\"-123.1\">\n  <name>Cairn</name>\n  <ele>812</ele>\n</wpt></gpx>",
        )
        .unwrap();
        assert_eq!(
            first_point_node(&doc, "wpt"),
            "Waypoint\nlat = 49.1\nlon = -123.1\nname = Cairn\nele = 812"
        );
    }

    #[test]
    fn test_children_without_text_are_skipped() {
        let doc = GpxDocument::parse(
            "<gpx><wpt lat=\"0\" lon=\"0\">\n  <extensions>\n    <speed>5</speed>\n  </extensions>\n  <name>X</name>\n</wpt></gpx>",
        )
        .unwrap();
        // <extensions> has only element children, so it contributes no line
        assert_eq!(first_point_node(&doc, "wpt"), "Waypoint\nlat = 0\nlon = 0\nname = X");
    }

    #[test]
    fn test_planar_distance() {
        let a = Point::new(49.0, -123.0, "");
        let b = Point::new(49.0, -122.9, "");
        assert!((a.planar_distance(&b) - 0.1).abs() < 1e-12);
        assert_eq!(a.planar_distance(&a), 0.0);
    }
}
