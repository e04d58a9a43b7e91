mod app;
mod inputs;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use cdp_topology::{CanvasParams, JsonFileStore, LayoutSeed, LayoutSession};
use chrono::Utc;
use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Discovery result (JSON) to lay out.
    graph: PathBuf,

    /// Saved layout; defaults to `<graph stem>.layout.json` next to the graph.
    #[arg(long)]
    layout: Option<PathBuf>,

    /// Pins the angular offsets of the initial ring placement.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 1600.0)]
    canvas_width: f64,

    #[arg(long, default_value_t = 1000.0)]
    canvas_height: f64,

    #[arg(long, default_value_t = 180.0)]
    card_width: f64,

    #[arg(long, default_value_t = 130.0)]
    card_height: f64,

    #[arg(long, default_value_t = 40.0)]
    margin: f64,

    /// Write the export bundle to this path and exit without opening a window.
    #[arg(long)]
    export: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: log::LevelFilter,
}

impl Args {
    fn canvas_params(&self) -> CanvasParams {
        CanvasParams {
            width: self.canvas_width,
            height: self.canvas_height,
            card_width: self.card_width,
            card_height: self.card_height,
            margin: self.margin,
        }
    }

    fn layout_store(&self) -> JsonFileStore {
        match &self.layout {
            Some(path) => JsonFileStore::new(path.clone()),
            None => JsonFileStore::beside(&self.graph),
        }
    }
}

fn init_logging(level: log::LevelFilter) {
    let filter = format!("cdp_topology={}", level.as_str().to_ascii_lowercase());
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&filter)).init();
}

fn run_export(args: &Args, target: &Path) -> anyhow::Result<()> {
    let store = args.layout_store();
    let loaded = inputs::load_inputs(&args.graph, &store)?;

    let mut session = LayoutSession::new(args.canvas_params(), LayoutSeed::from_option(args.seed));
    session.load(loaded.graph, loaded.persisted.as_ref());

    let Some(bundle) = session.export(Utc::now()) else {
        bail!("{} contains no devices to export", args.graph.display());
    };
    bundle
        .write_to(target)
        .with_context(|| format!("failed to export layout to {}", target.display()))?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.log_level);

    if let Some(target) = &args.export {
        return run_export(&args, target);
    }

    let config = app::AppConfig {
        graph_path: args.graph.clone(),
        store: args.layout_store(),
        params: args.canvas_params(),
        seed: LayoutSeed::from_option(args.seed),
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "cdp-topology",
        options,
        Box::new(move |cc| Ok(Box::new(app::TopologyApp::new(cc, config)))),
    )
    .map_err(|error| anyhow::anyhow!("viewer failed: {error}"))
}
