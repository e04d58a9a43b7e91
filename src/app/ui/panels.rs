use std::collections::HashSet;

use cdp_topology::LayoutSession;
use chrono::Utc;
use eframe::egui::{self, Align, Color32, Context, Layout, RichText};

use crate::inputs::LoadedDiscovery;

use super::super::{AppConfig, StatusLine, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(config: AppConfig, loaded: LoadedDiscovery) -> Self {
        let mut session = LayoutSession::new(config.params, config.seed);
        session.load(loaded.graph, loaded.persisted.as_ref());

        Self {
            session,
            config,
            search: String::new(),
            search_matches: HashSet::new(),
            selected: None,
            hovered: None,
            status: None,
        }
    }

    /// Swaps in a freshly loaded discovery result. Positions survive when the device
    /// and link identities are unchanged.
    pub(in crate::app) fn replace_discovery(&mut self, loaded: LoadedDiscovery) {
        let relaid = self
            .session
            .load(loaded.graph, loaded.persisted.as_ref());

        if let Some(selected) = &self.selected
            && self.session.graph().node(selected).is_none()
        {
            self.selected = None;
        }
        self.hovered = None;
        self.refresh_search_matches();

        let text = if relaid {
            "Reloaded discovery; topology changed, layout recomputed"
        } else {
            "Reloaded discovery; topology unchanged"
        };
        self.set_status(text, false);
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("cdp-topology");
                    ui.separator();
                    self.draw_commands(ui, reload_requested, is_loading);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        self.draw_status(ui);
                    });
                });
            });

        egui::SidePanel::left("devices")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                self.draw_controls(ui);
                ui.separator();
                self.draw_details(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading discovery result...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }

    fn draw_commands(&mut self, ui: &mut egui::Ui, reload_requested: &mut bool, is_loading: bool) {
        let has_devices = !self.session.graph().is_empty();

        if ui.add_enabled(has_devices, egui::Button::new("Reset View")).clicked() {
            self.session.reset_view();
        }
        if ui
            .add_enabled(has_devices, egui::Button::new("Spread Devices"))
            .clicked()
        {
            self.session.spread_devices();
        }

        let toggle_label = if self.session.connections_visible() {
            "Hide Connections"
        } else {
            "Show Connections"
        };
        if ui.add_enabled(has_devices, egui::Button::new(toggle_label)).clicked() {
            self.session.toggle_connections();
        }

        ui.separator();
        if ui.add_enabled(has_devices, egui::Button::new("−")).clicked() {
            self.session.zoom_out();
        }
        ui.label(format!("{:.0}%", self.session.viewport().zoom() * 100.0));
        if ui.add_enabled(has_devices, egui::Button::new("+")).clicked() {
            self.session.zoom_in();
        }
        ui.separator();

        let can_save = has_devices && self.session.is_unsaved();
        if ui.add_enabled(can_save, egui::Button::new("Save Layout")).clicked() {
            self.save_layout();
        }
        if ui.add_enabled(has_devices, egui::Button::new("Export")).clicked() {
            self.export_topology();
        }

        let reload_button = ui.add_enabled(!is_loading, egui::Button::new("Reload discovery"));
        if reload_button.clicked() {
            *reload_requested = true;
        }
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        if let Some(status) = &self.status {
            let color = if status.is_error {
                Color32::from_rgb(236, 112, 99)
            } else {
                Color32::from_gray(200)
            };
            ui.label(RichText::new(status.text.as_str()).color(color));
            ui.separator();
        }

        if self.session.is_unsaved() {
            ui.label(RichText::new("unsaved layout").color(Color32::from_rgb(246, 206, 104)));
        }
        ui.label(format!("links: {}", self.session.graph().links().len()));
        ui.label(format!("devices: {}", self.session.graph().len()));
    }

    fn save_layout(&mut self) {
        match self.session.save(&self.config.store) {
            Ok(()) => {
                let text = format!("Saved layout to {}", self.config.store.path().display());
                self.set_status(text, false);
            }
            Err(error) => {
                let report = error.report();
                log::error!("failed to save layout: {report}");
                self.set_status(format!("Save failed: {report}"), true);
            }
        }
    }

    fn export_topology(&mut self) {
        let Some(bundle) = self.session.export(Utc::now()) else {
            return;
        };

        let target = self
            .config
            .graph_path
            .with_file_name(bundle.default_file_name());
        match bundle.write_to(&target) {
            Ok(()) => self.set_status(format!("Exported {}", target.display()), false),
            Err(error) => {
                let report = error.report();
                log::error!("failed to export topology: {report}");
                self.set_status(format!("Export failed: {report}"), true);
            }
        }
    }

    pub(in crate::app) fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status = Some(StatusLine {
            text: text.into(),
            is_error,
        });
    }
}
