//! Bounding box aggregation and viewport derivation
//!
//! The renderer frames all plotted geometry by folding every point's
//! position into a running min/max box, then deriving a center and a
//! discrete zoom level from the box's larger dimension.

use crate::document::GpxDocument;
use crate::point::{parse_lat_lon, Point};
use geo::{Coord, Rect};

/// Smallest zoom level the viewport derivation will emit.
pub const MIN_ZOOM: u8 = 0;
/// Largest zoom level the viewport derivation will emit.
pub const MAX_ZOOM: u8 = 18;

/// Span in degrees that fills the view at [`MAX_ZOOM`]; each zoom step out
/// doubles the span that fits.
const MAX_ZOOM_SPAN: f64 = 0.0035;

/// A map viewport: center position and discrete zoom level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub lat: f64,
    pub lon: f64,
    pub zoom: u8,
}

/// Axis-aligned lat/lon rectangle over an observed point set.
///
/// Empty until the first point is observed. Internally a `geo::Rect` with
/// x = longitude and y = latitude, following the lon/lat axis order the
/// `geo` crate uses throughout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BoundingBox {
    rect: Option<Rect<f64>>,
}

impl BoundingBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounding box of a point sequence.
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point>) -> Self {
        let mut bounds = Self::new();
        for point in points {
            bounds.extend(point.lat, point.lon);
        }
        bounds
    }

    /// Fold one position into the running min/max.
    pub fn extend(&mut self, lat: f64, lon: f64) {
        let coord = Coord { x: lon, y: lat };
        self.rect = Some(match self.rect {
            Some(rect) => Rect::new(
                Coord {
                    x: rect.min().x.min(lon),
                    y: rect.min().y.min(lat),
                },
                Coord {
                    x: rect.max().x.max(lon),
                    y: rect.max().y.max(lat),
                },
            ),
            None => Rect::new(coord, coord),
        });
    }

    /// Union with another box. Merging an empty box is the identity.
    pub fn merge(&mut self, other: &BoundingBox) {
        if let Some(rect) = other.rect {
            self.extend(rect.min().y, rect.min().x);
            self.extend(rect.max().y, rect.max().x);
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rect.is_none()
    }

    #[inline]
    pub fn rect(&self) -> Option<Rect<f64>> {
        self.rect
    }

    pub fn min_lat(&self) -> Option<f64> {
        self.rect.map(|r| r.min().y)
    }

    pub fn max_lat(&self) -> Option<f64> {
        self.rect.map(|r| r.max().y)
    }

    pub fn min_lon(&self) -> Option<f64> {
        self.rect.map(|r| r.min().x)
    }

    pub fn max_lon(&self) -> Option<f64> {
        self.rect.map(|r| r.max().x)
    }

    /// Arithmetic midpoint of the box as `(lat, lon)`.
    ///
    /// This is the center of the box, not a centroid of the observed points.
    pub fn center(&self) -> Option<(f64, f64)> {
        self.rect.map(|r| {
            let c = r.center();
            (c.y, c.x)
        })
    }

    /// The larger of the box's two dimensions, in degrees.
    pub fn max_span(&self) -> Option<f64> {
        self.rect.map(|r| r.width().max(r.height()))
    }

    /// Derive the viewport framing this box, or `fallback` if no point was
    /// ever observed.
    pub fn viewport_or(&self, fallback: Viewport) -> Viewport {
        match (self.center(), self.max_span()) {
            (Some((lat, lon)), Some(span)) => Viewport {
                lat,
                lon,
                zoom: zoom_for_span(span),
            },
            _ => fallback,
        }
    }
}

/// Discrete zoom level whose view comfortably contains `span` degrees.
///
/// Computed policy: [`MAX_ZOOM`] minus one step per doubling of the span
/// beyond [`MAX_ZOOM_SPAN`], clamped to the valid zoom range. A degenerate
/// span (single point) maps to [`MAX_ZOOM`].
pub fn zoom_for_span(span: f64) -> u8 {
    if span <= MAX_ZOOM_SPAN {
        return MAX_ZOOM;
    }
    let steps = (span / MAX_ZOOM_SPAN).log2().floor() as i32;
    (MAX_ZOOM as i32 - steps).clamp(MIN_ZOOM as i32, MAX_ZOOM as i32) as u8
}

/// Bounding box over every point-like element with one of the given tag
/// names, in document order across all kinds.
///
/// Malformed points are skipped with a diagnostic and do not poison the box.
pub fn bounds_of_tags(doc: &GpxDocument, tags: &[&str]) -> BoundingBox {
    let mut bounds = BoundingBox::new();
    for tag in tags {
        for node in doc.find_by_tag(tag) {
            match parse_lat_lon(node) {
                Ok((lat, lon)) => bounds.extend(lat, lon),
                Err(e) => tracing::warn!("skipping point while computing bounds: {e}"),
            }
        }
    }
    bounds
}
