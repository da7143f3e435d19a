use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use eframe::egui::{self, Align, Context, Layout};
use tracing::info;

use crate::network::Network;

use super::super::ViewModel;
use super::super::drag::DragController;
use super::super::graph::Scene;
use super::super::physics::{SimLink, SimNode, Simulation, SimulationConfig};

impl ViewModel {
    pub(in crate::app) fn new(network: Network, config: SimulationConfig) -> Self {
        let nodes = network
            .nodes
            .iter()
            .map(|record| SimNode::new(record.id.clone()))
            .collect();
        let links = network
            .links
            .iter()
            .map(|link| SimLink {
                source: link.source,
                target: link.target,
            })
            .collect();
        let mut simulation = Simulation::new(nodes, links, config);

        let scene = Rc::new(RefCell::new(Scene::bind(&network)));
        scene
            .borrow_mut()
            .sync(simulation.nodes(), simulation.links());
        let listener_scene = Rc::clone(&scene);
        simulation.on_tick(move |nodes, links| listener_scene.borrow_mut().sync(nodes, links));

        info!(
            nodes = network.node_count(),
            links = network.link_count(),
            "simulation started"
        );

        Self {
            network,
            simulation,
            scene,
            drag: DragController::default(),
            hovered: None,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, network_path: &Path) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("coappear-graph");
                    ui.separator();
                    ui.label(format!("network: {}", network_path.display()));
                    ui.label(format!("nodes: {}", self.network.node_count()));
                    ui.label(format!("links: {}", self.network.link_count()));
                    ui.separator();
                    if ui
                        .button("Reheat")
                        .on_hover_text("Reset alpha to 1 and resume the layout.")
                        .clicked()
                    {
                        self.simulation.set_alpha(1.0);
                        self.simulation.restart();
                    }
                    let toggle = if self.simulation.is_running() { "Pause" } else { "Resume" };
                    if ui.button(toggle).clicked() {
                        if self.simulation.is_running() {
                            self.simulation.stop();
                        } else {
                            self.simulation.restart();
                        }
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.status_text());
                        if let Some(id) = self.hovered_id() {
                            ui.label(id);
                        }
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn status_text(&self) -> String {
        let state = if self.drag.is_dragging() {
            "dragging"
        } else if self.simulation.is_running() {
            "running"
        } else {
            "settled"
        };
        format!(
            "alpha {:.3}  |  ticks {}  |  {state}",
            self.simulation.alpha(),
            self.simulation.ticks()
        )
    }

    fn hovered_id(&self) -> Option<&str> {
        let index = self.hovered?;
        self.network.nodes.get(index).map(|node| node.id.as_str())
    }
}
