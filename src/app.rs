use std::time::Duration;

use eframe::egui;
use rusty_scrub::state::AppState;

use crate::ui::plot::BoxSelect;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct RustyScrubApp {
    pub state: AppState,
    selection: BoxSelect,
}

impl RustyScrubApp {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            selection: BoxSelect::default(),
        }
    }
}

impl eframe::App for RustyScrubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pick up a finished background load; keep repainting while one runs.
        self.state.poll_ingest();
        if self.state.loading {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: axes, cleaning, window ----
        egui::SidePanel::left("control_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::scatter_plot(ui, &mut self.state, &mut self.selection);
        });
    }
}
