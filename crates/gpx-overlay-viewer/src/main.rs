mod app;

use app::settings::Settings;
use clap::Parser;

fn main() {
    // Setup logging
    tracing_subscriber::fmt::init();

    let settings = Settings::parse();
    if let Err(e) = app::run(settings) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}
