mod app;
mod network;
mod util;

use std::path::PathBuf;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use app::SimulationConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Network file to display.
    #[arg(long, default_value = "network.json")]
    network: PathBuf,

    /// Many-body strength per node; more negative spreads the layout further.
    #[arg(long, default_value_t = -800.0, allow_negative_numbers = true)]
    charge: f32,

    /// Rest length of every link, in view-box units.
    #[arg(long, default_value_t = 30.0)]
    link_distance: f32,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build a network file from a character appearance table.
    Build {
        /// CSV with one row per comic and one 0/1 column per character.
        #[arg(long)]
        counts: PathBuf,

        /// CSV of `name,r,g,b` rows assigning node colors in selection order.
        #[arg(long)]
        colors: Option<PathBuf>,

        /// Character column to include; repeat to select several. Defaults to all.
        #[arg(long = "character")]
        characters: Vec<String>,

        #[arg(long, default_value = "network.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    if let Some(Command::Build {
        counts,
        colors,
        characters,
        output,
    }) = args.command
    {
        return network::build_network_file(&counts, colors.as_deref(), &characters, &output);
    }

    let config = SimulationConfig {
        charge: args.charge,
        link_distance: args.link_distance,
        ..SimulationConfig::default()
    };
    let network_path = args.network;
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([960.0, 640.0]),
        ..Default::default()
    };

    eframe::run_native(
        "coappear-graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::CoappearApp::new(
                cc,
                network_path.clone(),
                config,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to start viewer: {error}"))
}
