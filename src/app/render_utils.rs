use cdp_topology::Point;
use cdp_topology::topology::NodeRole;
use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, StrokeKind};

pub(super) const CANVAS_FILL: Color32 = Color32::from_rgb(19, 23, 29);
pub(super) const CARD_FILL: Color32 = Color32::from_rgb(34, 40, 49);
pub(super) const LINK_COLOR: Color32 = Color32::from_rgb(120, 134, 150);
pub(super) const SEARCH_COLOR: Color32 = Color32::from_rgb(103, 196, 255);
pub(super) const SELECTED_COLOR: Color32 = Color32::from_rgb(245, 206, 93);

pub(super) fn to_pos2(point: Point) -> Pos2 {
    Pos2::new(point.x as f32, point.y as f32)
}

pub(super) fn to_point(pos: Pos2) -> Point {
    Point::new(f64::from(pos.x), f64::from(pos.y))
}

/// Badge colours: source green, destination purple, gateway grey.
pub(super) fn role_color(role: NodeRole) -> Color32 {
    match role {
        NodeRole::Source => Color32::from_rgb(76, 175, 80),
        NodeRole::Destination => Color32::from_rgb(156, 39, 176),
        NodeRole::Gateway => Color32::from_rgb(158, 158, 158),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

/// Grid over the whole view plus the outline of the model canvas.
pub(super) fn draw_background(painter: &Painter, rect: Rect, canvas: Rect, zoom: f32) {
    painter.rect_filled(rect, 0.0, CANVAS_FILL);

    let step = (56.0 * zoom.clamp(0.6, 1.8)).max(20.0);
    let grid = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));

    let mut x = rect.left() + (canvas.left() - rect.left()).rem_euclid(step);
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], grid);
        x += step;
    }

    let mut y = rect.top() + (canvas.top() - rect.top()).rem_euclid(step);
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], grid);
        y += step;
    }

    painter.rect_stroke(
        canvas,
        4.0,
        Stroke::new(1.0, Color32::from_rgba_unmultiplied(140, 150, 160, 90)),
        StrokeKind::Inside,
    );
}

pub(super) fn rect_visible(view: Rect, rect: Rect) -> bool {
    view.intersects(rect)
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let bounds = Rect::from_two_pos(start, end).expand(padding);
    rect.intersects(bounds)
}
