mod app;
mod ui;

use app::RustyScrubApp;
use eframe::egui;
use rusty_scrub::settings::Settings;
use rusty_scrub::state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let mut state = match Settings::load() {
        Ok(settings) => AppState::new(settings),
        Err(e) => {
            log::error!("Failed to load settings: {e:#}");
            let mut state = AppState::default();
            state.status_message = Some(format!("Settings ignored: {e:#}"));
            state
        }
    };

    // A path on the command line is loaded straight away.
    if let Some(path) = std::env::args_os().nth(1) {
        state.open_path(path.into());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty Scrub – CSV Cleaner",
        options,
        Box::new(|_cc| Ok(Box::new(RustyScrubApp::new(state)))),
    )
}
