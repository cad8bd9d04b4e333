//! egui front end for the diagram editor.
//!
//! The front end is a thin collaborator: it paints the engine's state and
//! forwards input to [`crate::Editor`]. It holds no diagram data of its own.
//!
//! # Module Organization
//!
//! - `state` - The `DiagramApp` struct and its persisted document
//! - `canvas` - Pointer, wheel and touch input on the canvas
//! - `rendering` - Drawing nodes, dots and lines

mod canvas;
mod rendering;
mod state;

pub use state::DiagramApp;

use crate::types::NodeType;
use eframe::egui;

impl eframe::App for DiagramApp {
    /// Persist the diagram between restarts.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        match self.to_json() {
            Ok(json) => storage.set_string(state::STORAGE_KEY, json),
            Err(err) => log::error!("Failed to serialize diagram: {err}"),
        }
    }

    /// Main update function called by egui for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let visuals = if self.dark_mode {
            egui::Visuals::dark()
        } else {
            egui::Visuals::light()
        };
        ctx.set_visuals(visuals);

        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top_toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        egui::SidePanel::right("properties_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                self.draw_properties_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.draw_canvas(ui);
        });
    }
}

impl DiagramApp {
    /// Handles undo/redo, delete and duplicate shortcuts.
    ///
    /// Ignored while a text field has focus so typing is not hijacked.
    pub(crate) fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let (undo, redo, delete, duplicate) = ctx.input(|i| {
            let z = i.key_pressed(egui::Key::Z) && i.modifiers.command;
            (
                z && !i.modifiers.shift,
                (z && i.modifiers.shift) || (i.key_pressed(egui::Key::Y) && i.modifiers.command),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
                i.key_pressed(egui::Key::D) && i.modifiers.command,
            )
        });

        if undo {
            self.editor.undo();
        } else if redo {
            self.editor.redo();
        }
        if delete {
            self.editor.delete_selection();
        }
        if duplicate {
            self.editor.copy_selection();
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (label, node_type) in [
                ("Rectangle", NodeType::Rect),
                ("Diamond", NodeType::Diamond),
                ("Circle", NodeType::Circle),
            ] {
                if ui.button(label).clicked() {
                    self.editor.add_node(node_type);
                }
            }

            ui.separator();

            let has_node = self.editor.store().active_node().is_some();
            let has_selection = has_node || self.editor.store().active_line().is_some();
            if ui.add_enabled(has_node, egui::Button::new("Copy")).clicked() {
                self.editor.copy_selection();
            }
            if ui
                .add_enabled(has_selection, egui::Button::new("Delete"))
                .clicked()
            {
                self.editor.delete_selection();
            }

            ui.separator();

            let store = self.editor.store();
            let (can_undo, can_redo) = (store.can_undo(), store.can_redo());
            if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                self.editor.undo();
            }
            if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                self.editor.redo();
            }

            ui.separator();

            if ui.button("Reset view").clicked() {
                self.editor.viewport_mut().reset();
            }
            ui.label(format!("{:.0}%", self.editor.transform().scale * 100.0));

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let label = if self.dark_mode { "Light" } else { "Dark" };
                if ui.button(label).clicked() {
                    self.dark_mode = !self.dark_mode;
                }
            });
        });
    }

    fn draw_properties_panel(&mut self, ui: &mut egui::Ui) {
        self.sync_property_buffers();
        let Some(id) = self.properties.node else {
            ui.heading("Properties");
            ui.label("Select a node to edit it.");
            return;
        };
        let Some(node_type) = self.editor.store().node(id).map(|n| n.node_type) else {
            return;
        };

        ui.heading("Node");

        ui.label("Content");
        let content = ui.text_edit_singleline(&mut self.properties.content);
        if content.lost_focus() {
            let text = self.properties.content.clone();
            self.editor.store_mut().update_node_content(id, text);
        }

        ui.add_space(8.0);
        ui.label("Shape");
        ui.horizontal(|ui| {
            for (label, candidate) in [
                ("Rect", NodeType::Rect),
                ("Diamond", NodeType::Diamond),
                ("Circle", NodeType::Circle),
            ] {
                if ui.selectable_label(node_type == candidate, label).clicked()
                    && node_type != candidate
                {
                    self.editor.store_mut().update_node_type(id, candidate);
                    self.properties.node = None;
                }
            }
        });

        ui.add_space(8.0);
        ui.label("Size");
        let mut commit = false;
        ui.horizontal(|ui| {
            for value in [&mut self.properties.width, &mut self.properties.height] {
                let response = ui.add(egui::DragValue::new(value).range(10.0..=2000.0));
                commit |= response.drag_stopped() || response.lost_focus();
            }
        });
        let (w, h) = (self.properties.width, self.properties.height);
        let changed = self
            .editor
            .store()
            .node(id)
            .is_some_and(|n| n.width != w || n.height != h);
        if commit && changed {
            self.editor.store_mut().update_node_size(id, w, h);
            self.properties.node = None;
        }
    }
}
