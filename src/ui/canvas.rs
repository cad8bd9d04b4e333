//! Canvas input handling.
//!
//! Translates egui pointer, wheel and touch input into [`crate::Editor`] calls,
//! using coordinates relative to the canvas rectangle.

use super::state::DiagramApp;
use crate::geometry::Point;
use eframe::egui;

impl DiagramApp {
    /// Renders the canvas and handles its input.
    pub fn draw_canvas(&mut self, ui: &mut egui::Ui) {
        let (response, painter) =
            ui.allocate_painter(ui.available_size(), egui::Sense::click_and_drag());
        let rect = response.rect;

        self.handle_touches(ui, rect);
        if !self.editor.viewport().is_pinching() {
            self.handle_pointer(ui, rect);
            self.handle_wheel(ui, rect);
        }

        self.render_diagram(&painter, rect);
    }

    /// Forwards primary-button presses, motion and releases.
    ///
    /// Once a press lands on the canvas, the release is delivered even if it
    /// happens outside the canvas or the release event is lost.
    fn handle_pointer(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let (pos, pressed, released, down) = ui.input(|i| {
            (
                i.pointer.latest_pos(),
                i.pointer.primary_pressed(),
                i.pointer.primary_released(),
                i.pointer.primary_down(),
            )
        });

        if let Some(pos) = pos {
            let local = to_canvas(rect, pos);
            if pressed && rect.contains(pos) {
                self.editor.pointer_down(local);
                self.pointer_captured = true;
            } else if self.pointer_captured || rect.contains(pos) {
                self.editor.pointer_move(local);
            }
            if self.pointer_captured && (released || !down) {
                self.editor.pointer_up(local);
                self.pointer_captured = false;
            }
        } else if self.pointer_captured {
            self.editor.release();
            self.pointer_captured = false;
        }
    }

    /// Zooms around the cursor on mouse-wheel input over the canvas.
    fn handle_wheel(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let (scroll, hover) = ui.input(|i| (i.raw_scroll_delta.y, i.pointer.hover_pos()));
        if scroll == 0.0 {
            return;
        }
        if let Some(pos) = hover.filter(|p| rect.contains(*p)) {
            // egui reports scrolling up as positive; the engine expects wheel deltaY.
            self.editor.wheel(-scroll, to_canvas(rect, pos));
        }
    }

    /// Tracks touch points and drives pinch zoom while two are down.
    fn handle_touches(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let events = ui.input(|i| i.events.clone());
        for event in events {
            if let egui::Event::Touch { id, phase, pos, .. } = event {
                match phase {
                    egui::TouchPhase::Start | egui::TouchPhase::Move => {
                        self.touches.insert(id, pos);
                    }
                    egui::TouchPhase::End | egui::TouchPhase::Cancel => {
                        self.touches.remove(&id);
                    }
                }
            }
        }

        let mut points = self.touches.values().map(|p| to_canvas(rect, *p));
        match (points.next(), points.next()) {
            (Some(a), Some(b)) => {
                if self.editor.viewport().is_pinching() {
                    self.editor.pinch_move(a, b);
                } else {
                    self.pointer_captured = false;
                    self.editor.pinch_start(a, b);
                }
            }
            _ => {
                if self.editor.viewport().is_pinching() {
                    self.editor.pinch_end();
                }
            }
        }
    }
}

/// Screen position to canvas-relative position.
pub(super) fn to_canvas(rect: egui::Rect, pos: egui::Pos2) -> Point {
    Point::new(pos.x - rect.min.x, pos.y - rect.min.y)
}

/// Canvas-relative position to screen position.
pub(super) fn to_screen(rect: egui::Rect, p: Point) -> egui::Pos2 {
    egui::pos2(rect.min.x + p.x, rect.min.y + p.y)
}
