use cdp_topology::{GestureStart, Point};
use eframe::egui::{self, Rect, Ui};

use super::super::ViewModel;
use super::super::render_utils::to_point;

impl ViewModel {
    /// Ctrl+wheel steps the zoom; a plain wheel scrolls the canvas.
    pub(in crate::app) fn handle_canvas_wheel(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let (ctrl, delta) = ui.input(|input| (input.modifiers.ctrl, input.raw_scroll_delta));
        if delta.length_sq() <= f32::EPSILON {
            return;
        }

        if ctrl {
            if delta.y > 0.0 {
                self.session.zoom_in();
            } else if delta.y < 0.0 {
                self.session.zoom_out();
            }
            return;
        }

        let scroll = self.session.viewport().scroll() - to_point(delta.to_pos2());
        let params = *self.session.params();
        self.session.viewport_mut().scroll_to(scroll, &params);
    }

    /// Forwards press, move and release to the session's gesture handling.
    pub(in crate::app) fn handle_canvas_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
    ) {
        let view_origin = to_point(rect.min);

        if response.drag_started()
            && let Some(press) = ui.input(|input| input.pointer.press_origin())
        {
            let start = self.session.pointer_down(to_point(press), view_origin);
            if let GestureStart::Drag(id) = start {
                self.selected = Some(id);
            }
        }

        if response.dragged()
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.session.pointer_move(to_point(pointer), view_origin);
            ui.ctx().request_repaint();
        }

        if response.drag_stopped()
            && let Some(commit) = self.session.pointer_up()
        {
            log::debug!(
                "placed {} at ({:.0}, {:.0})",
                commit.node_id,
                commit.position.x,
                commit.position.y
            );
        }

        if response.clicked() {
            self.selected = response
                .interact_pointer_pos()
                .map(|pointer| self.model_at(to_point(pointer), view_origin))
                .and_then(|model| self.session.node_at(model).map(str::to_owned));
        }

        self.hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .and_then(|pointer| {
                let model = self.model_at(to_point(pointer), view_origin);
                self.session.node_at(model).map(str::to_owned)
            });
    }

    fn model_at(&self, client: Point, view_origin: Point) -> Point {
        self.session.viewport().to_model(client, view_origin)
    }
}
