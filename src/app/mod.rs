use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use cdp_topology::{CanvasParams, JsonFileStore, LayoutSeed, LayoutSession};
use eframe::egui::{self, Context};

use crate::inputs::{LoadedDiscovery, load_inputs};

mod graph;
mod render_utils;
mod ui;

/// Everything the viewer needs to (re)load a discovery result.
#[derive(Clone)]
pub struct AppConfig {
    pub graph_path: PathBuf,
    pub store: JsonFileStore,
    pub params: CanvasParams,
    pub seed: LayoutSeed,
}

type LoadResult = Result<LoadedDiscovery, String>;

pub struct TopologyApp {
    config: AppConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    session: LayoutSession,
    config: AppConfig,
    search: String,
    search_matches: HashSet<String>,
    selected: Option<String>,
    hovered: Option<String>,
    status: Option<StatusLine>,
}

struct StatusLine {
    text: String,
    is_error: bool,
}

impl TopologyApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let state = Self::start_load(&config);
        Self {
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(config: &AppConfig) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();
        let graph_path = config.graph_path.clone();
        let store = config.store.clone();

        thread::spawn(move || {
            let result = load_inputs(&graph_path, &store).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(config: &AppConfig) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(config),
        }
    }
}

impl eframe::App for TopologyApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(loaded)) => {
                        let model = ViewModel::new(self.config.clone(), loaded);
                        transition = Some(AppState::Ready(Box::new(model)));
                    }
                    Ok(Err(error)) => transition = Some(AppState::Error(error)),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition =
                            Some(AppState::Error("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading discovery result...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load the discovery result");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(&self.config));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(&self.config));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(loaded)) => model.replace_discovery(loaded),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                            ctx.request_repaint();
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            if let AppState::Error(error) = &next_state {
                log::error!("{error}");
            }
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
