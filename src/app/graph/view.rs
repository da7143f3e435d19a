use eframe::egui::{self, Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use super::super::ViewModel;
use super::super::render_utils::{draw_background, fit_scale, world_to_screen};

const LINK_COLOR: Color32 = Color32::from_rgba_premultiplied(96, 104, 116, 150);
const OUTLINE_COLOR: Color32 = Color32::from_rgba_premultiplied(15, 15, 15, 190);
const PINNED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        self.handle_node_drag(ui, rect, &response);
        self.simulation.step();

        let hovered = self.hovered_index(ui, rect);
        self.hovered = hovered;
        if hovered.is_some() {
            let icon = if self.drag.is_dragging() {
                egui::CursorIcon::Grabbing
            } else {
                egui::CursorIcon::Grab
            };
            ui.output_mut(|output| output.cursor_icon = icon);
        }

        let scale = fit_scale(rect);
        let scene = self.scene.borrow();

        for link in &scene.links {
            let width = link.stroke_width * scale;
            if width <= 0.0 {
                continue;
            }
            painter.line_segment(
                [
                    world_to_screen(rect, link.from),
                    world_to_screen(rect, link.to),
                ],
                Stroke::new(width, LINK_COLOR),
            );
        }

        for (index, node) in scene.nodes.iter().enumerate() {
            let position = world_to_screen(rect, node.center);
            let radius = node.radius * scale;
            if radius <= 0.0 {
                continue;
            }

            painter.circle_filled(position, radius, node.fill);
            let outline = if node.pinned {
                Stroke::new(2.0, PINNED_COLOR)
            } else if hovered == Some(index) {
                Stroke::new(1.5, Color32::from_gray(230))
            } else {
                Stroke::new(1.0, OUTLINE_COLOR)
            };
            painter.circle_stroke(position, radius, outline);
        }

        if let Some(node) = hovered.and_then(|index| scene.nodes.get(index)) {
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                node.id.as_str(),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }

        if self.simulation.is_running() || self.drag.is_dragging() {
            ui.ctx().request_repaint();
        }
    }
}
