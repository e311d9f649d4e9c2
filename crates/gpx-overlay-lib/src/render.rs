//! Render orchestration: walking the document and emitting draw instructions
//!
//! The renderer owns an immutable, validated configuration and writes marker,
//! polyline and viewport instructions to a [`MapSurface`]. It never draws
//! anything itself and never mutates the input document.

use crate::bounds::{bounds_of_tags, Viewport, MAX_ZOOM};
use crate::document::{descendants_by_tag, GpxDocument};
use crate::point::{extract_point, Point};
use crate::simplify::decimate;
use crate::{OverlayError, Result};

/// Tag kinds scanned when framing the viewport.
const VIEWPORT_TAGS: [&str; 2] = ["trkpt", "wpt"];

/// Pass-through styling for track polylines.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderStyle {
    /// CSS-style color string, handed to the surface untouched.
    pub track_color: String,
    /// Line width in surface units.
    pub track_width: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            track_color: "#ff00ff".to_string(),
            track_width: 5,
        }
    }
}

/// Renderer configuration, validated once at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub style: RenderStyle,
    /// Minimum planar distance in degrees between kept trackpoints.
    pub min_track_point_delta: f64,
    /// Viewport emitted when the document contains no plottable points.
    pub fallback_viewport: Viewport,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            style: RenderStyle::default(),
            min_track_point_delta: 0.0001,
            fallback_viewport: Viewport {
                lat: 49.327667,
                lon: -122.942333,
                zoom: 14,
            },
        }
    }
}

/// The minimal drawing surface the renderer emits to.
///
/// Implementations bind these instructions to an actual map widget; the
/// marker label is shown by the surface on click.
pub trait MapSurface {
    fn add_marker(&mut self, point: Point);
    fn add_polyline(&mut self, points: Vec<Point>, style: &RenderStyle);
    fn set_viewport(&mut self, viewport: Viewport);
}

/// One recorded draw instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawInstruction {
    Marker { point: Point },
    Polyline { points: Vec<Point>, style: RenderStyle },
    Viewport(Viewport),
}

/// A [`MapSurface`] that records instructions in emission order.
///
/// Adapters replay the list against their widget; tests assert on it.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    instructions: Vec<DrawInstruction>,
}

impl DrawList {
    #[inline]
    pub fn instructions(&self) -> &[DrawInstruction] {
        &self.instructions
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// The most recently emitted viewport instruction, if any.
    pub fn viewport(&self) -> Option<Viewport> {
        self.instructions.iter().rev().find_map(|i| match i {
            DrawInstruction::Viewport(v) => Some(*v),
            _ => None,
        })
    }
}

impl MapSurface for DrawList {
    fn add_marker(&mut self, point: Point) {
        self.instructions.push(DrawInstruction::Marker { point });
    }

    fn add_polyline(&mut self, points: Vec<Point>, style: &RenderStyle) {
        self.instructions.push(DrawInstruction::Polyline {
            points,
            style: style.clone(),
        });
    }

    fn set_viewport(&mut self, viewport: Viewport) {
        self.instructions.push(DrawInstruction::Viewport(viewport));
    }
}

/// Orchestrates the GPX-to-overlay transform for one render session.
pub struct GpxRenderer {
    config: RenderConfig,
}

impl GpxRenderer {
    /// Create a renderer with a validated configuration.
    ///
    /// Fails with [`OverlayError::InvalidConfig`] on a zero track width, a
    /// negative decimation delta or an out-of-range fallback zoom.
    pub fn new(config: RenderConfig) -> Result<Self> {
        if config.style.track_width == 0 {
            return Err(OverlayError::InvalidConfig(
                "track width must be positive".to_string(),
            ));
        }
        if !(config.min_track_point_delta >= 0.0) {
            return Err(OverlayError::InvalidConfig(format!(
                "minimum trackpoint delta must be non-negative, got {}",
                config.min_track_point_delta
            )));
        }
        if config.fallback_viewport.zoom > MAX_ZOOM {
            return Err(OverlayError::InvalidConfig(format!(
                "fallback zoom {} exceeds maximum {MAX_ZOOM}",
                config.fallback_viewport.zoom
            )));
        }
        Ok(Self { config })
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Emit one polyline instruction per non-empty track segment.
    ///
    /// Each `<trkseg>` is extracted and decimated independently; a segment
    /// whose points were all malformed (or that had none) emits nothing.
    pub fn render_tracks(&self, doc: &GpxDocument, surface: &mut dyn MapSurface) {
        let mut emitted = 0usize;
        for track in doc.find_by_tag("trk") {
            for segment in descendants_by_tag(track, "trkseg") {
                let points = collect_points(segment, "trkpt");
                let path = decimate(&points, self.config.min_track_point_delta);
                if path.is_empty() {
                    continue;
                }
                surface.add_polyline(path, &self.config.style);
                emitted += 1;
            }
        }
        tracing::debug!("emitted {emitted} track polylines");
    }

    /// Emit one marker instruction per valid waypoint.
    pub fn render_waypoints(&self, doc: &GpxDocument, surface: &mut dyn MapSurface) {
        let mut emitted = 0usize;
        for node in doc.find_by_tag("wpt") {
            match extract_point(node) {
                Ok(point) => {
                    surface.add_marker(point);
                    emitted += 1;
                }
                Err(e) => tracing::warn!("skipping waypoint: {e}"),
            }
        }
        tracing::debug!("emitted {emitted} waypoint markers");
    }

    /// Emit a single viewport instruction framing every trackpoint and
    /// waypoint, or the configured fallback for an empty document.
    pub fn center_and_zoom(&self, doc: &GpxDocument, surface: &mut dyn MapSurface) {
        let bounds = bounds_of_tags(doc, &VIEWPORT_TAGS);
        let viewport = bounds.viewport_or(self.config.fallback_viewport);
        surface.set_viewport(viewport);
    }

    /// Full render pass: tracks, then waypoints, then the viewport.
    pub fn render(&self, doc: &GpxDocument, surface: &mut dyn MapSurface) {
        self.render_tracks(doc, surface);
        self.render_waypoints(doc, surface);
        self.center_and_zoom(doc, surface);
    }
}

/// Extract every point-like child with the given tag, skipping malformed
/// ones with a diagnostic.
fn collect_points(parent: roxmltree::Node, tag: &str) -> Vec<Point> {
    let mut points = Vec::new();
    for node in descendants_by_tag(parent, tag) {
        match extract_point(node) {
            Ok(point) => points.push(point),
            Err(e) => tracing::warn!("skipping trackpoint: {e}"),
        }
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_renderer() -> GpxRenderer {
        GpxRenderer::new(RenderConfig::default()).unwrap()
    }

    fn render_to_list(gpx: &str) -> DrawList {
        let doc = GpxDocument::parse(gpx).unwrap();
        let mut list = DrawList::default();
        create_test_renderer().render(&doc, &mut list);
        list
    }

    fn polylines(list: &DrawList) -> Vec<&Vec<Point>> {
        list.instructions()
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    fn markers(list: &DrawList) -> Vec<&Point> {
        list.instructions()
            .iter()
            .filter_map(|i| match i {
                DrawInstruction::Marker { point } => Some(point),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_rejects_zero_track_width() {
        let config = RenderConfig {
            style: RenderStyle {
                track_width: 0,
                ..RenderStyle::default()
            },
            ..RenderConfig::default()
        };
        assert!(matches!(
            GpxRenderer::new(config),
            Err(OverlayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_negative_delta() {
        let config = RenderConfig {
            min_track_point_delta: -0.5,
            ..RenderConfig::default()
        };
        assert!(matches!(
            GpxRenderer::new(config),
            Err(OverlayError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_nan_delta() {
        let config = RenderConfig {
            min_track_point_delta: f64::NAN,
            ..RenderConfig::default()
        };
        assert!(GpxRenderer::new(config).is_err());
    }

    #[test]
    fn test_empty_segment_emits_no_polyline() {
        // One populated segment and one empty one: exactly one polyline
        let list = render_to_list(
            r#"<gpx>
  <trk>
    <trkseg>
      <trkpt lat="49.0" lon="-123.0"/>
      <trkpt lat="49.01" lon="-123.0"/>
      <trkpt lat="49.02" lon="-123.0"/>
    </trkseg>
    <trkseg></trkseg>
  </trk>
</gpx>"#,
        );

        let lines = polylines(&list);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 3);
    }

    #[test]
    fn test_segments_are_decimated_independently() {
        let list = render_to_list(
            r#"<gpx>
  <trk>
    <trkseg>
      <trkpt lat="49.0" lon="-123.0"/>
      <trkpt lat="49.00005" lon="-123.0"/>
      <trkpt lat="49.01" lon="-123.0"/>
    </trkseg>
    <trkseg>
      <trkpt lat="50.0" lon="-123.0"/>
      <trkpt lat="50.00005" lon="-123.0"/>
    </trkseg>
  </trk>
</gpx>"#,
        );

        let lines = polylines(&list);
        assert_eq!(lines.len(), 2);
        // First segment drops its too-close middle point
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[0][0].lat, 49.0);
        assert_eq!(lines[0][1].lat, 49.01);
        // Second segment collapses onto its anchor
        assert_eq!(lines[1].len(), 1);
    }

    #[test]
    fn test_multiple_tracks() {
        let list = render_to_list(
            r#"<gpx>
  <trk><trkseg><trkpt lat="49.0" lon="-123.0"/></trkseg></trk>
  <trk><trkseg><trkpt lat="50.0" lon="-124.0"/></trkseg></trk>
</gpx>"#,
        );
        assert_eq!(polylines(&list).len(), 2);
    }

    #[test]
    fn test_waypoint_markers_carry_labels() {
        let list = render_to_list(
            r#"<gpx>
  <wpt lat="49.1" lon="-123.1" name="Cairn"/>
  <wpt lat="49.2" lon="-123.2"><html>Hut</html></wpt>
</gpx>"#,
        );

        let points = markers(&list);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].label, "Waypoint\nlat = 49.1\nlon = -123.1\nname = Cairn");
        assert_eq!(points[1].label, "Hut");
    }

    #[test]
    fn test_malformed_waypoint_degrades_only_itself() {
        let list = render_to_list(
            r#"<gpx>
  <wpt lat="bogus" lon="-123.1"/>
  <wpt lat="49.2" lon="-123.2"/>
</gpx>"#,
        );
        assert_eq!(markers(&list).len(), 1);
    }

    #[test]
    fn test_malformed_trackpoint_skipped_within_segment() {
        let list = render_to_list(
            r#"<gpx>
  <trk><trkseg>
    <trkpt lat="49.0" lon="-123.0"/>
    <trkpt lat="49.5" lon="west"/>
    <trkpt lat="49.01" lon="-123.0"/>
  </trkseg></trk>
</gpx>"#,
        );

        let lines = polylines(&list);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 2);
        assert_eq!(lines[0][1].lat, 49.01);
    }

    #[test]
    fn test_style_passes_through() {
        let config = RenderConfig {
            style: RenderStyle {
                track_color: "#00ff00".to_string(),
                track_width: 3,
            },
            ..RenderConfig::default()
        };
        let renderer = GpxRenderer::new(config).unwrap();
        let doc = GpxDocument::parse(
            r#"<gpx><trk><trkseg><trkpt lat="49.0" lon="-123.0"/></trkseg></trk></gpx>"#,
        )
        .unwrap();
        let mut list = DrawList::default();
        renderer.render_tracks(&doc, &mut list);

        match &list.instructions()[0] {
            DrawInstruction::Polyline { style, .. } => {
                assert_eq!(style.track_color, "#00ff00");
                assert_eq!(style.track_width, 3);
            }
            other => panic!("expected a polyline, got {other:?}"),
        }
    }

    #[test]
    fn test_viewport_frames_all_point_kinds() {
        let list = render_to_list(
            r#"<gpx>
  <wpt lat="49.4" lon="-123.4"/>
  <trk><trkseg>
    <trkpt lat="49.0" lon="-123.0"/>
    <trkpt lat="49.2" lon="-123.2"/>
  </trkseg></trk>
</gpx>"#,
        );

        let viewport = list.viewport().unwrap();
        assert!((viewport.lat - 49.2).abs() < 1e-9);
        assert!((viewport.lon - -123.2).abs() < 1e-9);
        assert!(viewport.zoom < MAX_ZOOM);
    }

    #[test]
    fn test_empty_document_falls_back() {
        let list = render_to_list("<gpx></gpx>");
        assert_eq!(
            list.viewport(),
            Some(RenderConfig::default().fallback_viewport)
        );
        // No markers or polylines, only the viewport instruction
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_full_render_instruction_order() {
        let list = render_to_list(
            r#"<gpx>
  <wpt lat="49.1" lon="-123.1"/>
  <trk><trkseg><trkpt lat="49.0" lon="-123.0"/></trkseg></trk>
</gpx>"#,
        );

        assert_eq!(list.len(), 3);
        assert!(matches!(list.instructions()[0], DrawInstruction::Polyline { .. }));
        assert!(matches!(list.instructions()[1], DrawInstruction::Marker { .. }));
        assert!(matches!(list.instructions()[2], DrawInstruction::Viewport(_)));
    }

    #[test]
    fn test_realistic_document_end_to_end() {
        let list = render_to_list(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="unit-test"
     xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><name>Evening loop</name></metadata>
  <wpt lat="49.3280" lon="-122.9420">
    <name>Trailhead</name>
    <ele>370</ele>
  </wpt>
  <trk>
    <name>Loop</name>
    <trkseg>
      <trkpt lat="49.3280" lon="-122.9420"><ele>370</ele></trkpt>
      <trkpt lat="49.32805" lon="-122.9420"><ele>371</ele></trkpt>
      <trkpt lat="49.3292" lon="-122.9435"><ele>380</ele></trkpt>
      <trkpt lat="49.3305" lon="-122.9451"><ele>395</ele></trkpt>
    </trkseg>
  </trk>
</gpx>"#,
        );

        let lines = polylines(&list);
        assert_eq!(lines.len(), 1);
        // The second point sits below the decimation delta and is dropped
        assert_eq!(lines[0].len(), 3);

        let points = markers(&list);
        assert_eq!(points.len(), 1);
        assert_eq!(
            points[0].label,
            "Waypoint\nlat = 49.3280\nlon = -122.9420\nname = Trailhead\nele = 370"
        );

        let viewport = list.viewport().unwrap();
        assert!(viewport.lat > 49.32 && viewport.lat < 49.34);
        assert!(viewport.lon > -122.95 && viewport.lon < -122.94);
    }
}
