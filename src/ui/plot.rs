use eframe::egui::{Color32, Ui};
use egui_plot::{Plot, PlotPoint, PlotPoints, Points, Polygon};
use rusty_scrub::state::AppState;

// ---------------------------------------------------------------------------
// Box selection
// ---------------------------------------------------------------------------

/// An in-progress drag rectangle, in plot coordinates.
#[derive(Debug, Default)]
pub struct BoxSelect {
    start: Option<PlotPoint>,
    current: Option<PlotPoint>,
}

impl BoxSelect {
    /// `(min, max)` corners of the dragged rectangle.
    fn rect(&self) -> Option<([f64; 2], [f64; 2])> {
        let (a, b) = (self.start?, self.current?);
        Some(([a.x.min(b.x), a.y.min(b.y)], [a.x.max(b.x), a.y.max(b.y)]))
    }

    fn clear(&mut self) {
        self.start = None;
        self.current = None;
    }
}

/// Window-relative indices of the points inside `rect`.
fn points_in_rect(xs: &[f64], ys: &[f64], (min, max): ([f64; 2], [f64; 2])) -> Vec<usize> {
    xs.iter()
        .zip(ys)
        .enumerate()
        .filter(|&(_, (&x, &y))| x >= min[0] && x <= max[0] && y >= min[1] && y <= max[1])
        .map(|(i, _)| i)
        .collect()
}

// ---------------------------------------------------------------------------
// Scatter plot (central panel)
// ---------------------------------------------------------------------------

/// Render the current window as a scatter plot.
pub fn scatter_plot(ui: &mut Ui, state: &mut AppState, selection: &mut BoxSelect) {
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a CSV file to start  (File → Open CSV…)");
        });
        return;
    }

    let select_mode = state.select_mode;
    let x_label = state.x_column.clone().unwrap_or_default();
    let y_label = state.y_column.clone().unwrap_or_default();

    let (xs, ys) = state.visible_points();
    let points: PlotPoints = xs.iter().zip(ys).map(|(&x, &y)| [x, y]).collect();
    let rect = selection.rect();

    let response = Plot::new("scatter_plot")
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .allow_drag(!select_mode)
        .allow_boxed_zoom(!select_mode)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(points)
                    .radius(2.0)
                    .color(Color32::LIGHT_BLUE)
                    .name("points"),
            );
            if let Some((min, max)) = rect {
                let corners = vec![
                    [min[0], min[1]],
                    [max[0], min[1]],
                    [max[0], max[1]],
                    [min[0], max[1]],
                ];
                plot_ui.polygon(
                    Polygon::new(PlotPoints::new(corners))
                        .fill_color(Color32::from_rgba_unmultiplied(255, 200, 0, 40))
                        .name("selection"),
                );
            }
        });

    if !select_mode {
        selection.clear();
        return;
    }

    let drag = &response.response;
    let pointer = drag
        .interact_pointer_pos()
        .map(|pos| response.transform.value_from_position(pos));

    if drag.drag_started() {
        selection.start = pointer;
        selection.current = pointer;
    } else if drag.dragged() && pointer.is_some() {
        selection.current = pointer;
    }

    if drag.drag_stopped() {
        if let Some(rect) = selection.rect() {
            let (xs, ys) = state.visible_points();
            let local = points_in_rect(xs, ys, rect);
            log::debug!("box selected {} points", local.len());
            state.remove_window_selection(local);
        }
        selection.clear();
    }
}
