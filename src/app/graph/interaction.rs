use eframe::egui::{self, PointerButton, Rect, Ui};

use super::super::ViewModel;
use super::super::drag::GestureId;
use super::super::render_utils::screen_to_world;

const PRIMARY_POINTER: GestureId = GestureId(0);

impl ViewModel {
    pub(in crate::app) fn handle_node_drag(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) {
        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin {
                let pointer = screen_to_world(rect, origin);
                let grabbed = self.scene.borrow().node_at(pointer);
                if let Some(index) = grabbed {
                    self.drag
                        .start(&mut self.simulation, PRIMARY_POINTER, index, pointer);
                }
            }
        }

        if response.dragged_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.drag.drag(
                &mut self.simulation,
                PRIMARY_POINTER,
                screen_to_world(rect, pointer),
            );
        }

        if response.drag_stopped() {
            self.drag.end(&mut self.simulation, PRIMARY_POINTER);
        }
    }

    pub(in crate::app) fn hovered_index(&self, ui: &Ui, rect: Rect) -> Option<usize> {
        if let Some(index) = self.drag.dragged_node(PRIMARY_POINTER) {
            return Some(index);
        }
        let pointer = ui.input(|input| input.pointer.hover_pos())?;
        if !rect.contains(pointer) {
            return None;
        }
        self.scene.borrow().node_at(screen_to_world(rect, pointer))
    }
}
