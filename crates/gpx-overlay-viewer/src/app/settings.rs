use clap::Parser;
use gpx_overlay_lib::{RenderConfig, RenderStyle, Viewport};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// GPX Overlay Viewer - renders GPX tracks and waypoints on a slippy map
pub struct Settings {
    /// GPX file to render
    #[clap(value_name = "FILE")]
    pub gpx_file: PathBuf,

    /// Track line color (CSS-style color string)
    #[clap(long, default_value = "#ff00ff")]
    pub track_color: String,

    /// Track line width in pixels
    #[clap(long, default_value = "5")]
    pub track_width: u32,

    /// Minimum distance in degrees between kept trackpoints
    #[clap(long, default_value = "0.0001")]
    pub min_track_point_delta: f64,

    /// Latitude to center on when the file has no plottable points
    #[clap(long, default_value = "49.327667")]
    pub fallback_lat: f64,

    /// Longitude to center on when the file has no plottable points
    #[clap(long, default_value = "-122.942333")]
    pub fallback_lon: f64,

    /// Zoom level used together with the fallback center
    #[clap(long, default_value = "14")]
    pub fallback_zoom: u8,
}

impl Settings {
    /// Renderer configuration from the CLI values.
    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            style: RenderStyle {
                track_color: self.track_color.clone(),
                track_width: self.track_width,
            },
            min_track_point_delta: self.min_track_point_delta,
            fallback_viewport: Viewport {
                lat: self.fallback_lat,
                lon: self.fallback_lon,
                zoom: self.fallback_zoom,
            },
        }
    }
}
