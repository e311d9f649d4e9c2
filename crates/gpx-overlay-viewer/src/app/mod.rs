//! Application module
//!
//! Loads the GPX file named on the command line, runs the overlay renderer
//! into a [`DrawList`], and shows the result on an OpenStreetMap-tiled
//! `walkers` map inside an `eframe` window.

mod plugin;
pub(crate) mod settings;

use crate::app::plugin::OverlayPlugin;
use crate::app::settings::Settings;
use eframe::egui;
use gpx_overlay_lib::{DrawList, GpxDocument, GpxRenderer};
use std::sync::{Arc, RwLock};
use walkers::{
    HttpTiles, Map, MapMemory,
    sources::{OpenStreetMap, TileSource},
};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("failed to read GPX file: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Overlay(#[from] gpx_overlay_lib::OverlayError),

    #[error("UI error: {0}")]
    Ui(#[from] eframe::Error),
}

/// Load the file, run the transform and hand the draw list to the UI.
pub fn run(settings: Settings) -> Result<(), ViewerError> {
    let renderer = GpxRenderer::new(settings.render_config())?;

    let text = std::fs::read_to_string(&settings.gpx_file)?;
    let doc = GpxDocument::parse(&text)?;

    let mut draw_list = DrawList::default();
    renderer.render(&doc, &mut draw_list);
    tracing::info!(
        "loaded {} ({} draw instructions)",
        settings.gpx_file.display(),
        draw_list.len()
    );

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title("GPX Overlay Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "GPX Overlay Viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, draw_list)))),
    )?;
    Ok(())
}

/// Main application structure
pub struct ViewerApp {
    /// Recorded overlay instructions, replayed by the plugin each frame
    draw_list: Arc<DrawList>,

    /// Index of the marker whose label popup is open
    selected_marker: Arc<RwLock<Option<usize>>>,

    /// Map tiles provider (OpenStreetMap)
    tiles: HttpTiles,

    /// Map state (camera position, zoom, etc.)
    map_memory: MapMemory,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, draw_list: DrawList) -> Self {
        let tiles = HttpTiles::new(OpenStreetMap, cc.egui_ctx.clone());
        let mut map_memory = MapMemory::default();

        // Apply the viewport instruction before the first frame
        if let Some(viewport) = draw_list.viewport() {
            map_memory.center_at(walkers::lat_lon(viewport.lat, viewport.lon));
            let _ = map_memory.set_zoom(viewport.zoom as f64);
        }

        Self {
            draw_list: Arc::new(draw_list),
            selected_marker: Arc::new(RwLock::new(None)),
            tiles,
            map_memory,
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let overlay =
                    OverlayPlugin::new(self.draw_list.clone(), self.selected_marker.clone());

                let map = Map::new(
                    Some(&mut self.tiles),
                    &mut self.map_memory,
                    walkers::lat_lon(0.0, 0.0),
                )
                .with_plugin(overlay);

                ui.add(map);

                let painter = ui.painter();
                let screen_rect = ui.max_rect();
                painter.text(
                    screen_rect.center_bottom() + egui::vec2(0.0, -5.0),
                    egui::Align2::CENTER_BOTTOM,
                    OpenStreetMap.attribution().text,
                    egui::FontId::proportional(10.0),
                    egui::Color32::from_black_alpha(180),
                );
            });
    }
}
