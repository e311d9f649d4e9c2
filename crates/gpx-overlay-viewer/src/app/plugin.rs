//! Walkers plugin replaying overlay draw instructions onto the map
//!
//! Polylines are projected and stroked with the pass-through style, markers
//! are drawn as dots, and clicking a marker toggles a popup with its label.

use egui::{Color32, Pos2, Stroke};
use gpx_overlay_lib::{DrawInstruction, DrawList, Point};
use std::sync::{Arc, RwLock};
use walkers::{Plugin, Projector};

/// Hit radius for marker clicks, in pixels.
const MARKER_RADIUS: f32 = 6.0;

/// Stroke color used when the configured track color does not parse.
const FALLBACK_TRACK_COLOR: Color32 = Color32::from_rgb(0xff, 0x00, 0xff);

/// Plugin for rendering the recorded overlay on the map
pub struct OverlayPlugin {
    /// Instructions recorded by the core renderer
    draw_list: Arc<DrawList>,
    /// Marker whose label popup is currently open (shared with the app)
    selected_marker: Arc<RwLock<Option<usize>>>,
}

impl OverlayPlugin {
    pub fn new(draw_list: Arc<DrawList>, selected_marker: Arc<RwLock<Option<usize>>>) -> Self {
        Self {
            draw_list,
            selected_marker,
        }
    }

    /// Convert a WGS84 point to screen space.
    fn project(projector: &Projector, point: &Point) -> Pos2 {
        let screen_vec = projector.project(walkers::lat_lon(point.lat, point.lon));
        Pos2::new(screen_vec.x, screen_vec.y)
    }
}

impl Plugin for OverlayPlugin {
    fn run(
        self: Box<Self>,
        ui: &mut egui::Ui,
        response: &egui::Response,
        projector: &Projector,
        _map_memory: &walkers::MapMemory,
    ) {
        let painter = ui.painter();

        // Track polylines
        for instruction in self.draw_list.instructions() {
            if let DrawInstruction::Polyline { points, style } = instruction {
                let screen_points: Vec<Pos2> = points
                    .iter()
                    .map(|point| Self::project(projector, point))
                    .collect();

                // A single-point path has no visible extent
                if screen_points.len() >= 2 {
                    let color =
                        parse_css_color(&style.track_color).unwrap_or(FALLBACK_TRACK_COLOR);
                    let stroke = Stroke::new(style.track_width as f32, color);
                    painter.add(egui::Shape::line(screen_points, stroke));
                }
            }
        }

        // Waypoint markers
        let markers: Vec<&Point> = self
            .draw_list
            .instructions()
            .iter()
            .filter_map(|instruction| match instruction {
                DrawInstruction::Marker { point } => Some(point),
                _ => None,
            })
            .collect();

        if response.clicked()
            && let Some(click_pos) = response.interact_pointer_pos()
        {
            let hit = markers
                .iter()
                .position(|point| Self::project(projector, point).distance(click_pos) <= MARKER_RADIUS + 2.0);
            if let Ok(mut selected) = self.selected_marker.write() {
                // Clicking the open marker closes it; clicking elsewhere dismisses
                *selected = match (hit, *selected) {
                    (Some(index), Some(open)) if index == open => None,
                    (other, _) => other,
                };
            }
        }

        for point in &markers {
            let screen_pos = Self::project(projector, point);
            painter.circle(
                screen_pos,
                MARKER_RADIUS,
                Color32::from_rgb(220, 60, 60),
                Stroke::new(1.5, Color32::WHITE),
            );
        }

        // Label popup for the selected marker
        let selected = self.selected_marker.read().ok().and_then(|guard| *guard);
        if let Some(index) = selected
            && let Some(point) = markers.get(index)
        {
            let screen_pos = Self::project(projector, point);
            egui::Area::new(egui::Id::new("marker-label-popup"))
                .fixed_pos(screen_pos + egui::vec2(MARKER_RADIUS + 4.0, -MARKER_RADIUS))
                .show(ui.ctx(), |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.label(point.label.as_str());
                    });
                });
        }
    }
}

/// Parse a CSS-style color string into a [`Color32`].
///
/// Supports `#rgb` and `#rrggbb` hex notation plus the handful of named
/// colors that show up in GPX viewer configurations.
pub fn parse_css_color(value: &str) -> Option<Color32> {
    let value = value.trim().to_ascii_lowercase();

    if let Some(hex) = value.strip_prefix('#') {
        return match hex.len() {
            3 => {
                let mut channels = hex.chars().filter_map(|c| c.to_digit(16));
                let (r, g, b) = (channels.next()?, channels.next()?, channels.next()?);
                Some(Color32::from_rgb(
                    (r * 17) as u8,
                    (g * 17) as u8,
                    (b * 17) as u8,
                ))
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
                let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
                let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
                Some(Color32::from_rgb(r, g, b))
            }
            _ => None,
        };
    }

    match value.as_str() {
        "black" => Some(Color32::from_rgb(0x00, 0x00, 0x00)),
        "white" => Some(Color32::from_rgb(0xff, 0xff, 0xff)),
        "red" => Some(Color32::from_rgb(0xff, 0x00, 0x00)),
        "green" => Some(Color32::from_rgb(0x00, 0x80, 0x00)),
        "blue" => Some(Color32::from_rgb(0x00, 0x00, 0xff)),
        "yellow" => Some(Color32::from_rgb(0xff, 0xff, 0x00)),
        "cyan" => Some(Color32::from_rgb(0x00, 0xff, 0xff)),
        "magenta" | "fuchsia" => Some(Color32::from_rgb(0xff, 0x00, 0xff)),
        "orange" => Some(Color32::from_rgb(0xff, 0xa5, 0x00)),
        _ => None,
    }
}
