//! Canvas rendering for nodes, dots and lines.
//!
//! Everything is drawn through the current viewport transform: lines first,
//! then nodes in store order so later nodes paint on top.

use super::canvas::to_screen;
use super::state::DiagramApp;
use crate::geometry::{dot_center, Point};
use crate::types::*;
use crate::viewport::Transform;
use eframe::egui;
use eframe::epaint::StrokeKind;

const ACTIVE_COLOR: egui::Color32 = egui::Color32::from_rgb(100, 150, 255);
const HOVER_COLOR: egui::Color32 = egui::Color32::from_rgb(160, 190, 255);

impl DiagramApp {
    /// Renders all diagram elements on the canvas.
    pub fn render_diagram(&self, painter: &egui::Painter, canvas_rect: egui::Rect) {
        let transform = self.editor.transform();
        let project = |p: Point| to_screen(canvas_rect, transform.graph_to_screen(p));

        let visuals = painter.ctx().style().visuals.clone();
        painter.rect_filled(canvas_rect, 0.0, visuals.extreme_bg_color);

        let store = self.editor.store();
        let active_line = store.selection().active_line_id;
        for line in store.lines() {
            let color = if Some(line.id) == active_line {
                ACTIVE_COLOR
            } else {
                visuals.text_color()
            };
            self.draw_line(painter, line, color, &project, transform);
        }

        let hover_dot = store.selection().hover_dot;
        for node in store.nodes() {
            self.draw_node(painter, node, &project, transform, &visuals);

            let show_dots = node.status != NodeStatus::Normal
                || hover_dot.is_some_and(|d| d.node == node.id);
            if show_dots {
                for dot in &node.dots {
                    let hovered = hover_dot == Some(HoverDot {
                        node: node.id,
                        dir: dot.dir,
                    });
                    let fill = if hovered { ACTIVE_COLOR } else { visuals.window_fill };
                    painter.circle(
                        project(dot_center(node, dot)),
                        dot.radius * transform.scale,
                        fill,
                        egui::Stroke::new(1.5, ACTIVE_COLOR),
                    );
                }
            }
        }
    }

    fn draw_line(
        &self,
        painter: &egui::Painter,
        line: &Line,
        color: egui::Color32,
        project: &impl Fn(Point) -> egui::Pos2,
        transform: Transform,
    ) {
        // Cached coordinates mark the dot's corner; lines are drawn between dot centers.
        let r = self.editor.store().config().dot_radius;
        let from = project(Point::new(line.from_x + r, line.from_y + r));
        let to = if line.temp {
            project(Point::new(line.to_x, line.to_y))
        } else {
            project(Point::new(line.to_x + r, line.to_y + r))
        };
        let stroke = egui::Stroke::new(2.0 * transform.scale.max(0.5), color);
        painter.line_segment([from, to], stroke);

        if line.temp {
            return;
        }
        let dir = to - from;
        let len = dir.length();
        if len < 1.0 {
            return;
        }
        let unit = dir / len;
        let normal = egui::vec2(-unit.y, unit.x);
        let size = 10.0 * transform.scale;
        let tip = to - unit * r * transform.scale;
        let base = tip - unit * size;
        painter.add(egui::Shape::convex_polygon(
            vec![tip, base + normal * size * 0.5, base - normal * size * 0.5],
            color,
            egui::Stroke::NONE,
        ));
    }

    fn draw_node(
        &self,
        painter: &egui::Painter,
        node: &Node,
        project: &impl Fn(Point) -> egui::Pos2,
        transform: Transform,
        visuals: &egui::Visuals,
    ) {
        let rect = egui::Rect::from_min_max(
            project(node.origin()),
            project(Point::new(node.x + node.width, node.y + node.height)),
        );
        let (stroke_color, stroke_width) = match node.status {
            NodeStatus::Active => (ACTIVE_COLOR, 2.5),
            NodeStatus::Hover => (HOVER_COLOR, 2.0),
            NodeStatus::Normal => (visuals.widgets.noninteractive.fg_stroke.color, 1.5),
        };
        let stroke = egui::Stroke::new(stroke_width, stroke_color);
        let fill = visuals.faint_bg_color;

        match node.node_type {
            NodeType::Rect => {
                let rounding = 6.0 * transform.scale;
                painter.rect_filled(rect, rounding, fill);
                painter.rect_stroke(rect, rounding, stroke, StrokeKind::Inside);
            }
            NodeType::Diamond => {
                let c = rect.center();
                let points = vec![
                    egui::pos2(c.x, rect.top()),
                    egui::pos2(rect.right(), c.y),
                    egui::pos2(c.x, rect.bottom()),
                    egui::pos2(rect.left(), c.y),
                ];
                painter.add(egui::Shape::convex_polygon(points, fill, stroke));
            }
            NodeType::Circle => {
                painter.circle(rect.center(), rect.width() / 2.0, fill, stroke);
            }
        }

        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            &node.content,
            egui::FontId::proportional(14.0 * transform.scale),
            visuals.text_color(),
        );
    }
}
