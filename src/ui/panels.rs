use eframe::egui::{self, Color32, RichText, Ui};
use rusty_scrub::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – axes, cleaning and window controls
// ---------------------------------------------------------------------------

/// Render the left control panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Data");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the widgets.
    let columns = state.columns().to_vec();

    // ---- Axis selectors ----
    ui.strong("X axis");
    let current_x = state.x_column.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("x_axis")
        .selected_text(&current_x)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                if ui.selectable_label(current_x == *col, col).clicked() {
                    state.set_x_column(col.clone());
                }
            }
        });

    ui.strong("Y axis");
    let current_y = state.y_column.clone().unwrap_or_default();
    egui::ComboBox::from_id_salt("y_axis")
        .selected_text(&current_y)
        .show_ui(ui, |ui: &mut Ui| {
            for col in &columns {
                if ui.selectable_label(current_y == *col, col).clicked() {
                    state.set_y_column(col.clone());
                }
            }
        });
    ui.separator();

    // ---- Cleaning ----
    ui.strong("Cleaning");
    ui.checkbox(&mut state.cleaning.remove_outliers, "Remove outliers (IQR)");
    ui.checkbox(&mut state.cleaning.remove_zeros, "Remove zeros");
    ui.checkbox(&mut state.cleaning.remove_negatives, "Remove negatives");
    if ui
        .add_enabled(state.cleaning.any(), egui::Button::new("Clean data"))
        .clicked()
    {
        state.clean();
    }
    ui.separator();

    // ---- Window ----
    let total = state.total_points();
    ui.strong("Window");
    ui.label(format!(
        "rows {}..{} of {total}",
        state.window.start, state.window.end
    ));
    let max_start = total.saturating_sub(state.window.len());
    let mut start = state.window.start;
    if ui
        .add(egui::Slider::new(&mut start, 0..=max_start).text("start"))
        .changed()
    {
        state.scroll_window_to(start);
    }
    let step = isize::try_from(state.window.len().max(1)).unwrap_or(isize::MAX);
    ui.horizontal(|ui: &mut Ui| {
        if ui.small_button("◀ Prev").clicked() {
            state.pan_window(-step);
        }
        if ui.small_button("Next ▶").clicked() {
            state.pan_window(step);
        }
    });
    ui.separator();

    ui.checkbox(&mut state.select_mode, "Box-select removes points");
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open CSV…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.dataset.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if state.loading {
            ui.spinner();
            ui.label("Loading…");
        } else if state.dataset.is_some() {
            ui.label(format!(
                "{} data points, {} visible",
                state.total_points(),
                state.window.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open CSV data")
        .add_filter("CSV", &["csv", "txt"])
        .pick_file();

    if let Some(path) = file {
        log::info!("Loading {}", path.display());
        state.open_path(path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export cleaned data")
        .set_file_name(state.settings.export_file_name.as_str())
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Failed to export: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
