use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};
use tracing::{error, info};

use crate::network::{Network, load_network};

mod drag;
mod graph;
mod physics;
mod render_utils;
mod ui;

pub(crate) use physics::SimulationConfig;

pub struct CoappearApp {
    network_path: PathBuf,
    config: SimulationConfig,
    state: AppState,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Network, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    network: Network,
    simulation: physics::Simulation,
    scene: Rc<RefCell<graph::Scene>>,
    drag: drag::DragController,
    hovered: Option<usize>,
}

impl CoappearApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        network_path: PathBuf,
        config: SimulationConfig,
    ) -> Self {
        let state = AppState::Loading {
            rx: Self::spawn_load(network_path.clone()),
        };
        Self {
            network_path,
            config,
            state,
        }
    }

    fn spawn_load(network_path: PathBuf) -> Receiver<Result<Network, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_network(&network_path).map_err(|error| error.to_string());
            let _ = tx.send(result);
        });

        rx
    }
}

impl eframe::App for CoappearApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(Ok(network)) => {
                        info!(path = %self.network_path.display(), "network loaded");
                        transition = Some(AppState::Ready(Box::new(ViewModel::new(
                            network,
                            self.config,
                        ))));
                    }
                    Ok(Err(message)) => {
                        error!("{message}");
                        transition = Some(AppState::Error(message));
                    }
                    Err(TryRecvError::Empty) => {}
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(AppState::Error(
                            "Background load worker disconnected".to_owned(),
                        ));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading co-appearance network...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
                ctx.request_repaint();
            }
            AppState::Error(message) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load co-appearance network");
                    ui.add_space(6.0);
                    ui.label(message.as_str());
                });
            }
            AppState::Ready(model) => model.show(ctx, &self.network_path),
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}
