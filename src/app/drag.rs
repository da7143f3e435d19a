use std::collections::HashMap;

use eframe::egui::Vec2;
use tracing::debug;

use super::physics::Simulation;

pub(crate) const DRAG_ALPHA_TARGET: f32 = 0.3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct GestureId(pub(crate) u64);

#[derive(Clone, Copy, Debug)]
struct Gesture {
    node: usize,
    // Node position minus pointer position at gesture start.
    grab_offset: Vec2,
}

#[derive(Debug, Default)]
pub(crate) struct DragController {
    gestures: HashMap<GestureId, Gesture>,
}

impl DragController {
    pub(crate) fn is_dragging(&self) -> bool {
        !self.gestures.is_empty()
    }

    pub(crate) fn dragged_node(&self, gesture: GestureId) -> Option<usize> {
        self.gestures.get(&gesture).map(|gesture| gesture.node)
    }

    pub(crate) fn start(
        &mut self,
        simulation: &mut Simulation,
        gesture: GestureId,
        node: usize,
        pointer: Vec2,
    ) -> bool {
        if self.gestures.contains_key(&gesture) {
            self.end(simulation, gesture);
        }

        let other_gestures = self.gestures.len();
        if other_gestures == 0 && simulation.node_mut(node).is_some() {
            simulation.set_alpha_target(DRAG_ALPHA_TARGET);
            simulation.restart();
        }

        let Some(sim_node) = simulation.node_mut(node) else {
            debug!(node, "drag start on unknown node ignored");
            return false;
        };
        let position = sim_node.position;
        sim_node.pin(position);
        debug!(id = %sim_node.id, x = position.x, y = position.y, "drag started");

        self.gestures.insert(
            gesture,
            Gesture {
                node,
                grab_offset: position - pointer,
            },
        );
        true
    }

    pub(crate) fn drag(&mut self, simulation: &mut Simulation, gesture: GestureId, pointer: Vec2) -> bool {
        let Some(state) = self.gestures.get(&gesture) else {
            return false;
        };
        let Some(sim_node) = simulation.node_mut(state.node) else {
            return false;
        };
        sim_node.pin(pointer + state.grab_offset);
        true
    }

    pub(crate) fn end(&mut self, simulation: &mut Simulation, gesture: GestureId) -> bool {
        let Some(state) = self.gestures.remove(&gesture) else {
            return false;
        };

        if self.gestures.is_empty() {
            simulation.set_alpha_target(0.0);
        }
        if let Some(sim_node) = simulation.node_mut(state.node) {
            sim_node.unpin();
            debug!(id = %sim_node.id, "drag ended");
        }
        true
    }
}
