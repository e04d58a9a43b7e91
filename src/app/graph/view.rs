use cdp_topology::Point;
use cdp_topology::layout::interface_label_anchors;
use cdp_topology::topology::{Node, NodeRole};
use cdp_topology::util::truncate_label;
use eframe::egui::{
    self, Align2, Color32, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, StrokeKind, Ui, vec2,
};

use super::super::ViewModel;
use super::super::render_utils::{
    CARD_FILL, LINK_COLOR, SEARCH_COLOR, SELECTED_COLOR, blend_color, draw_background,
    edge_visible, rect_visible, role_color, to_point, to_pos2,
};

const LABEL_CHARS: usize = 22;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        let visible = to_point(rect.max) - to_point(rect.min);
        self.session.viewport_mut().set_visible_size(visible);
        // Re-clamp in case the view grew since the last frame.
        let scroll = self.session.viewport().scroll();
        let params = *self.session.params();
        self.session.viewport_mut().scroll_to(scroll, &params);

        self.handle_canvas_wheel(ui, &response);
        self.handle_canvas_pointer(ui, rect, &response);

        let viewport = *self.session.viewport();
        let view_origin = to_point(rect.min);
        let zoom = viewport.zoom() as f32;
        let canvas = Rect::from_min_max(
            to_pos2(viewport.to_client(Point::ZERO, view_origin)),
            to_pos2(viewport.to_client(Point::new(params.width, params.height), view_origin)),
        );
        draw_background(&painter, rect, canvas, zoom);

        if self.session.graph().is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "The discovery result contains no devices.",
                FontId::proportional(16.0),
                Color32::from_gray(200),
            );
            return;
        }

        if self.hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::Grab;
            });
        }

        if self.session.connections_visible() {
            self.draw_links(&painter, rect, zoom);
        }
        self.draw_cards(&painter, rect, zoom);
        Self::draw_legend(&painter, rect);
    }

    fn screen_position(&self, id: &str, view_origin: Point) -> Option<Pos2> {
        let model = self.session.position(id)?;
        Some(to_pos2(self.session.viewport().to_client(model, view_origin)))
    }

    fn draw_links(&self, painter: &Painter, rect: Rect, zoom: f32) {
        let view_origin = to_point(rect.min);
        let stroke = Stroke::new((1.4 * zoom.sqrt()).clamp(0.8, 2.6), LINK_COLOR);
        let font = FontId::proportional((11.0 * zoom).clamp(8.0, 16.0));

        for link in self.session.graph().links() {
            let (Some(start), Some(end)) = (
                self.screen_position(&link.source, view_origin),
                self.screen_position(&link.target, view_origin),
            ) else {
                continue;
            };
            if !edge_visible(rect, start, end, 40.0) {
                continue;
            }

            painter.extend(Shape::dashed_line(
                &[start, end],
                stroke,
                6.0 * zoom,
                4.0 * zoom,
            ));

            let (Some(source), Some(target)) = (
                self.session.position(&link.source),
                self.session.position(&link.target),
            ) else {
                continue;
            };
            let (source_anchor, target_anchor) = interface_label_anchors(source, target);
            let labels = [
                (source_anchor, link.source_interface.as_deref()),
                (target_anchor, link.target_interface.as_deref()),
            ];
            for (anchor, interface) in labels {
                if let Some(interface) = interface {
                    painter.text(
                        to_pos2(self.session.viewport().to_client(anchor, view_origin)),
                        Align2::CENTER_CENTER,
                        interface,
                        font.clone(),
                        Color32::from_gray(210),
                    );
                }
            }
        }
    }

    fn draw_cards(&self, painter: &Painter, rect: Rect, zoom: f32) {
        let view_origin = to_point(rect.min);
        let params = self.session.params();
        let size = vec2(
            (params.card_width * f64::from(zoom)) as f32,
            (params.card_height * f64::from(zoom)) as f32,
        );

        for node in self.session.graph().nodes() {
            let Some(center) = self.screen_position(&node.id, view_origin) else {
                continue;
            };
            let card = Rect::from_center_size(center, size);
            if !rect_visible(rect, card) {
                continue;
            }
            self.draw_card(painter, card, node, zoom);
        }
    }

    fn draw_card(&self, painter: &Painter, card: Rect, node: &Node, zoom: f32) {
        let is_selected = self.selected.as_deref() == Some(node.id.as_str());
        let is_hovered = self.hovered.as_deref() == Some(node.id.as_str());
        let is_match = self.search_matches.contains(&node.id);

        let fill = if is_hovered {
            blend_color(CARD_FILL, Color32::WHITE, 0.08)
        } else {
            CARD_FILL
        };
        let (border_width, border) = if is_selected {
            (2.4_f32, SELECTED_COLOR)
        } else if is_match {
            (2.0, SEARCH_COLOR)
        } else {
            (1.0, Color32::from_rgb(72, 82, 96))
        };

        let radius = 6.0 * zoom;
        painter.rect_filled(card, radius, fill);
        painter.rect_stroke(card, radius, Stroke::new(border_width, border), StrokeKind::Inside);

        let padding = 8.0 * zoom;
        let line = 15.0 * zoom;
        let mut cursor = card.left_top() + vec2(padding, padding);

        if let Some(role) = node.role {
            Self::draw_role_badge(painter, card, role, zoom);
        }

        painter.text(
            cursor,
            Align2::LEFT_TOP,
            truncate_label(&node.label, LABEL_CHARS),
            FontId::proportional(13.0 * zoom),
            Color32::from_gray(240),
        );
        cursor.y += line + 3.0 * zoom;

        let details = [
            node.display_address().to_owned(),
            node.device_type().to_owned(),
        ];
        for text in details {
            painter.text(
                cursor,
                Align2::LEFT_TOP,
                truncate_label(&text, LABEL_CHARS + 4),
                FontId::proportional(11.0 * zoom),
                Color32::from_gray(185),
            );
            cursor.y += line;
        }

        if !node.chips.is_empty() {
            painter.text(
                cursor,
                Align2::LEFT_TOP,
                truncate_label(&node.chips.join(" · "), LABEL_CHARS + 4),
                FontId::proportional(10.0 * zoom),
                SEARCH_COLOR,
            );
        }
    }

    fn draw_role_badge(painter: &Painter, card: Rect, role: NodeRole, zoom: f32) {
        let badge_center = card.right_top() + vec2(-10.0 * zoom, 10.0 * zoom);
        painter.circle_filled(badge_center, 5.0 * zoom, role_color(role));
    }

    fn draw_legend(painter: &Painter, rect: Rect) {
        let mut cursor = rect.left_bottom() + vec2(12.0, -16.0);
        for role in [NodeRole::Gateway, NodeRole::Destination, NodeRole::Source] {
            painter.circle_filled(cursor, 5.0, role_color(role));
            painter.text(
                cursor + vec2(10.0, 0.0),
                Align2::LEFT_CENTER,
                role.label(),
                FontId::proportional(12.0),
                Color32::from_gray(220),
            );
            cursor.y -= 18.0;
        }
    }
}
