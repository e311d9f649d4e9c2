//! GPX Overlay Library - GPX-to-Geometry Transform for Map Overlays
//!
//! This library turns a parsed GPX document into renderable map overlay
//! geometry: decimated track polylines, labelled waypoint markers and a
//! viewport (center + zoom) that frames everything that was plotted.
//!
//! # Architecture
//!
//! - **[`GpxDocument`]**: Read-only view over a parsed XML tree
//! - **[`Point`]**: Extracted position with a display label
//! - **[`BoundingBox`]**: Running min/max aggregation with viewport derivation
//! - **[`GpxRenderer`]**: Orchestrator emitting draw instructions to a [`MapSurface`]
//!
//! The library performs no I/O and no drawing itself: callers hand it XML
//! text and a [`MapSurface`] implementation, and it emits marker, polyline
//! and viewport instructions. [`DrawList`] is a provided surface that simply
//! records the instructions for an adapter to replay.

mod bounds;
mod document;
mod point;
mod render;
mod simplify;

// Public API exports
pub use bounds::{BoundingBox, Viewport, bounds_of_tags, zoom_for_span, MAX_ZOOM, MIN_ZOOM};
pub use document::GpxDocument;
pub use point::{extract_point, parse_lat_lon, synthesize_label, Point};
pub use render::{
    DrawInstruction, DrawList, GpxRenderer, MapSurface, RenderConfig, RenderStyle,
};
pub use simplify::decimate;

/// Error types for the overlay transform
#[derive(Debug, thiserror::Error)]
pub enum OverlayError {
    #[error("XML parsing error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("malformed point: {0}")]
    MalformedPoint(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, OverlayError>;
