//! UI panels for the application
//!
//! The sidebar has three tabs: filters, the grouped layer control and the
//! list of areas (with data loading). Files can also be dropped on the window.

use crate::app::state::{AppState, SidebarTab, TilesProvider};
use egui::{Color32, RichText, Ui};
use ocean_map_lib::MapCanvas;
use std::path::PathBuf;

/// Render the sidebar toggle button (overlaid on top-right of map)
pub fn sidebar_toggle_button(ui: &mut Ui, state: &mut AppState) {
    let button_size = egui::vec2(40.0, 40.0);
    let margin = 10.0;

    let rect = ui.max_rect();
    let button_pos = rect.right_top() + egui::vec2(-button_size.x - margin, margin);
    let button_rect = egui::Rect::from_min_size(button_pos, button_size);

    let response = ui.allocate_rect(button_rect, egui::Sense::click());
    if response.clicked() {
        state.ui_settings.sidebar_open = !state.ui_settings.sidebar_open;
    }

    let bg_color = if response.hovered() {
        ui.visuals().widgets.hovered.bg_fill
    } else {
        ui.visuals().widgets.inactive.bg_fill
    };
    ui.painter().rect_filled(button_rect, 5.0, bg_color);

    let icon = if state.ui_settings.sidebar_open {
        "✕"
    } else {
        "☰"
    };
    ui.painter().text(
        button_rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(20.0),
        ui.visuals().text_color(),
    );
}

/// Render the main sidebar (responsive: side on landscape, bottom on portrait)
pub fn render_sidebar(ctx: &egui::Context, state: &mut AppState) {
    if !state.ui_settings.sidebar_open {
        return;
    }

    let screen_size = ctx.viewport_rect().size();
    if screen_size.y > screen_size.x {
        egui::TopBottomPanel::bottom("main_sidebar")
            .default_height(280.0)
            .min_height(180.0)
            .max_height(ctx.viewport_rect().height() * 0.6)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    } else {
        egui::SidePanel::right("main_sidebar")
            .default_width(320.0)
            .min_width(260.0)
            .max_width(480.0)
            .resizable(true)
            .show(ctx, |ui| render_sidebar_content(ui, state));
    }
}

fn render_sidebar_content(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal(|ui| {
        let tab = &mut state.ui_settings.active_tab;
        ui.selectable_value(tab, SidebarTab::Filters, "🔍 Filters");
        ui.selectable_value(tab, SidebarTab::Layers, "🗂 Layers");
        ui.selectable_value(tab, SidebarTab::Areas, "📍 Areas");
    });

    ui.separator();

    match state.ui_settings.active_tab {
        SidebarTab::Filters => {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| render_filters_tab(ui, state));
        }
        SidebarTab::Layers => {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| render_layers_tab(ui, state));
        }
        // The area list has its own scroll area
        SidebarTab::Areas => render_areas_tab(ui, state),
    }
}

/// Render the Filters tab
fn render_filters_tab(ui: &mut Ui, state: &mut AppState) {
    let countries = state.country_values();
    let scales = state.scale_values();
    let statuses: Vec<String> = state
        .controller
        .config()
        .status_lookup
        .names()
        .map(str::to_string)
        .collect();

    let before = state.filter_form.clone();
    let form = &mut state.filter_form;

    egui::Grid::new("filters_grid")
        .num_columns(2)
        .spacing([12.0, 8.0])
        .show(ui, |ui| {
            ui.label("Country:");
            choice_combo(ui, "country_filter", &mut form.country, "All countries", &countries);
            ui.end_row();

            ui.label("Status:");
            choice_combo(ui, "status_filter", &mut form.status, "Any status", &statuses);
            ui.end_row();

            ui.label("Scale:");
            choice_combo(ui, "scale_filter", &mut form.scale, "Any scale", &scales);
            ui.end_row();

            ui.label("Location:");
            ui.add(
                egui::TextEdit::singleline(&mut form.location)
                    .hint_text("Search by name")
                    .desired_width(160.0),
            );
            ui.end_row();
        });

    if state.filter_form.country != before.country {
        state.apply_country();
    }
    if state.filter_form != before {
        state.apply_filters();
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!state.filter_form.is_empty(), egui::Button::new("Reset"))
            .clicked()
        {
            state.reset_filters();
        }
    });

    ui.add_space(8.0);
    ui.separator();
    ui.label(
        RichText::new(format!(
            "Showing {} of {} areas",
            state.controller.canvas().visible_count(),
            state.controller.len()
        ))
        .strong(),
    );
}

/// Combo box over a list of values, with an empty "any" choice
fn choice_combo<'a>(
    ui: &mut Ui,
    id: &str,
    value: &mut String,
    any_label: &str,
    choices: impl IntoIterator<Item = &'a String>,
) {
    let selected = if value.is_empty() {
        any_label.to_string()
    } else {
        value.clone()
    };
    egui::ComboBox::from_id_salt(id)
        .selected_text(selected)
        .width(160.0)
        .show_ui(ui, |ui| {
            ui.selectable_value(value, String::new(), any_label);
            for choice in choices {
                ui.selectable_value(value, choice.clone(), choice.as_str());
            }
        });
}

/// Render the Layers tab
fn render_layers_tab(ui: &mut Ui, state: &mut AppState) {
    ui.label(RichText::new("🗂 Layer Groups").strong());
    ui.add_space(6.0);

    let groups: Vec<(String, Vec<(String, bool, usize)>)> = match state.controller.layer_control()
    {
        Some(control) => control
            .countries()
            .map(|country| {
                let scales = control
                    .scales(country)
                    .map(|(scale, group)| {
                        (scale.to_string(), group.is_enabled(), group.members().len())
                    })
                    .collect();
                (country.to_string(), scales)
            })
            .collect(),
        None => Vec::new(),
    };

    if groups.is_empty() {
        ui.label(RichText::new("No areas loaded").weak());
    }

    let mut toggled = None;
    for (country, scales) in &groups {
        egui::CollapsingHeader::new(country)
            .default_open(groups.len() == 1)
            .show(ui, |ui| {
                for (scale, enabled, count) in scales {
                    let mut checked = *enabled;
                    if ui
                        .checkbox(&mut checked, format!("{} ({})", scale, count))
                        .changed()
                    {
                        toggled = Some((country.clone(), scale.clone(), checked));
                    }
                }
            });
    }
    if let Some((country, scale, enabled)) = toggled {
        state.controller.set_group_enabled(&country, &scale, enabled);
    }

    ui.add_space(12.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(RichText::new("🗺 Map Tiles").strong());
    ui.add_space(6.0);
    for provider in TilesProvider::all() {
        let selected = state.ui_settings.tiles_provider == *provider;
        if ui.selectable_label(selected, provider.name()).clicked() {
            state.ui_settings.tiles_provider = *provider;
        }
    }
    ui.add_space(4.0);
    ui.label(
        RichText::new(state.ui_settings.tiles_provider.attribution())
            .small()
            .italics()
            .weak(),
    );
}

/// Render the Areas tab
fn render_areas_tab(ui: &mut Ui, state: &mut AppState) {
    ui.horizontal_wrapped(|ui| {
        if ui.button("📂 Area Shapes...").clicked() {
            pick_polygon_files(state);
        }
        if ui.button("📄 Area Table...").clicked() {
            pick_point_file(state);
        }
        if ui
            .add_enabled(state.data_loader.has_files(), egui::Button::new("🔄 Reload"))
            .clicked()
        {
            state.request_load();
        }
        if ui
            .add_enabled(!state.controller.is_empty(), egui::Button::new("🎯 Fit"))
            .clicked()
        {
            state.pending_fit_bounds = true;
        }
        if ui.button("🗑 Clear").clicked() {
            state.clear_data();
        }
    });

    if state.data_loader.is_busy() {
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                RichText::new("Loading data files...")
                    .strong()
                    .color(ui.visuals().warn_fg_color),
            );
        });
    }

    if !state.data_loader.errors.is_empty() {
        ui.add_space(4.0);
        ui.label(
            RichText::new(format!("⚠ Errors ({} files)", state.data_loader.errors.len()))
                .strong()
                .color(Color32::RED),
        );
        egui::ScrollArea::vertical()
            .id_salt("errors_scroll")
            .max_height(80.0)
            .show(ui, |ui| {
                for (file, error) in &state.data_loader.errors {
                    ui.label(
                        RichText::new(format!("• {}: {}", file_label(file), error))
                            .small()
                            .color(Color32::RED),
                    );
                }
            });
        if ui.small_button("Clear Errors").clicked() {
            state.data_loader.errors.clear();
        }
    }

    ui.add_space(4.0);
    ui.label(
        RichText::new(format!(
            "{} shape files, {}",
            state.data_loader.polygon_paths.len(),
            state
                .data_loader
                .point_path
                .as_deref()
                .map_or("no area table".to_string(), file_label)
        ))
        .small()
        .weak(),
    );
    if state.last_ingest_ms > 0.0 {
        ui.label(
            RichText::new(format!("Last load: {:.1} ms", state.last_ingest_ms))
                .small()
                .weak(),
        );
    }

    ui.separator();

    let selected_id = state.controller.navigation().selected_id();
    let rows: Vec<(String, String, bool)> = state
        .controller
        .overlays()
        .filter_map(|overlay| {
            let id = overlay.record().id.clone()?;
            let visible = state.controller.canvas().has_layer(overlay.key());
            let country = overlay.group().0;
            Some((
                id.clone(),
                format!("{} · {} ({})", id, overlay.tooltip_text(), country),
                visible,
            ))
        })
        .collect();

    let mut clicked = None;
    let row_height = ui.text_style_height(&egui::TextStyle::Body) + 4.0;
    egui::ScrollArea::vertical()
        .id_salt("areas_scroll")
        .auto_shrink([false, false])
        .show_rows(ui, row_height, rows.len(), |ui, range| {
            for (id, label, visible) in &rows[range] {
                let selected = selected_id.as_deref() == Some(id.as_str());
                let text = if *visible {
                    RichText::new(label)
                } else {
                    RichText::new(label).weak()
                };
                if ui.selectable_label(selected, text).clicked() {
                    clicked = Some(id.clone());
                }
            }
        });

    if let Some(id) = clicked {
        state.select_area(&id);
    }
}

fn file_label(path: &std::path::Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Accept data files dropped on the window
pub fn handle_drag_and_drop(ctx: &egui::Context, state: &mut AppState) {
    let dropped: Vec<PathBuf> = ctx.input(|i| {
        i.raw
            .dropped_files
            .iter()
            .filter_map(|file| file.path.clone())
            .collect()
    });
    if dropped.is_empty() {
        return;
    }

    tracing::info!("{} files dropped", dropped.len());
    if state.data_loader.add_files(dropped) {
        state.request_load();
    }
}

fn pick_polygon_files(state: &mut AppState) {
    if let Some(paths) = rfd::FileDialog::new()
        .add_filter("GeoJSON", &["geojson", "json"])
        .set_title("Select Area Shapes")
        .pick_files()
        && state.data_loader.add_polygon_paths(paths) > 0
    {
        state.request_load();
    }
}

fn pick_point_file(state: &mut AppState) {
    if let Some(path) = rfd::FileDialog::new()
        .add_filter("CSV", &["csv"])
        .set_title("Select Area Table")
        .pick_file()
    {
        state.data_loader.point_path = Some(path);
        state.request_load();
    }
}
