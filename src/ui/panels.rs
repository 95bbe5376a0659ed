//! Dashboard windows built when no modal context is active.

use crate::picking::Selection;
use crate::structure::StructureRegistry;

/// Instances per type above which each instance starts collapsed.
const COLLAPSE_ABOVE: usize = 8;

/// Buttons pressed in the main window this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MainWindowActions {
    /// "Reset view" was pressed.
    pub reset_view: bool,
    /// "Screenshot" was pressed.
    pub screenshot: bool,
    /// A scene-affecting setting changed.
    pub changed: bool,
}

/// Live values shown and edited by the main window.
pub struct MainWindowState<'a> {
    /// Window title.
    pub title: &'a str,
    /// Scene clear color.
    pub background: &'a mut [f32; 4],
    /// Debug toggle: composite the pick buffer instead of the scene.
    pub show_pick_buffer: &'a mut bool,
    /// Smoothed milliseconds per frame.
    pub frame_ms: f32,
    /// Smoothed frames per second.
    pub fps: f32,
}

/// Main window: background color, view reset, screenshot, timing, debug.
pub fn main_window(
    ctx: &egui::Context,
    state: &mut MainWindowState<'_>,
) -> MainWindowActions {
    let mut actions = MainWindowActions::default();
    let _ = egui::Window::new(state.title)
        .default_pos([20.0, 20.0])
        .resizable(false)
        .show(ctx, |ui| {
            let _ = ui.horizontal(|ui| {
                let bg = &mut *state.background;
                let mut rgb = [bg[0], bg[1], bg[2]];
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    bg[..3].copy_from_slice(&rgb);
                    actions.changed = true;
                }
                let _ = ui.label("background color");
            });
            actions.reset_view = ui.button("Reset view").clicked();
            actions.screenshot = ui.button("Screenshot").clicked();
            let _ = ui.label(format!(
                "{:.1} ms/frame ({:.1} FPS)",
                state.frame_ms, state.fps
            ));
            let _ = egui::CollapsingHeader::new("debug")
                .default_open(false)
                .show(ui, |ui| {
                    if ui
                        .checkbox(state.show_pick_buffer, "Show pick buffer")
                        .changed()
                    {
                        actions.changed = true;
                    }
                });
        });
    actions
}

/// "Structures" window: one header per type with shared controls from the
/// first instance, then each instance's own controls.
pub fn structures_window(
    ctx: &egui::Context,
    registry: &mut StructureRegistry,
) {
    let _ = egui::Window::new("Structures")
        .default_pos([20.0, 200.0])
        .show(ctx, |ui| {
            for type_name in registry.type_names() {
                let count = registry.count_of_type(&type_name);
                let _ = egui::CollapsingHeader::new(format!(
                    "Category: {type_name} ({count})"
                ))
                .id_salt(&type_name)
                .default_open(count > 0)
                .show(ui, |ui| {
                    type_section(ui, registry, &type_name, count);
                });
            }
        });
}

fn type_section(
    ui: &mut egui::Ui,
    registry: &mut StructureRegistry,
    type_name: &str,
    count: usize,
) {
    for (i, structure) in
        registry.instances_of_type_mut(type_name).enumerate()
    {
        if i == 0 {
            structure.draw_shared_structure_ui(ui);
        }
        let name = structure.name().to_owned();
        let _ = egui::CollapsingHeader::new(&name)
            .id_salt((type_name, &name))
            .default_open(count <= COLLAPSE_ABOVE)
            .show(ui, |ui| structure.draw_ui(ui));
    }
}

/// "Selection" window for the picked element, if its structure is still
/// registered.
pub fn selection_window(
    ctx: &egui::Context,
    registry: &mut StructureRegistry,
    selection: &Selection,
) {
    let Some(structure) = registry.by_id_mut(selection.structure) else {
        return;
    };
    let _ = egui::Window::new("Selection")
        .default_pos([300.0, 20.0])
        .show(ctx, |ui| {
            let _ = ui.label(format!(
                "{}: {}",
                selection.key.type_name, selection.key.name
            ));
            let _ = ui.separator();
            structure.draw_pick_ui(ui, selection.local_index);
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structure::test_structure::Dummy;
    use crate::structure::{StructureId, StructureKey};

    fn run(ctx: &egui::Context, mut build: impl FnMut(&egui::Context)) {
        let _ = ctx.run(egui::RawInput::default(), |ctx| build(ctx));
    }

    #[test]
    fn main_window_reports_no_actions_when_idle() {
        let ctx = egui::Context::default();
        let mut bg = [1.0, 1.0, 1.0, 0.0];
        let mut show_pick = false;
        let mut actions = MainWindowActions {
            reset_view: true,
            ..Default::default()
        };
        run(&ctx, |ctx| {
            let mut state = MainWindowState {
                title: "polyview",
                background: &mut bg,
                show_pick_buffer: &mut show_pick,
                frame_ms: 16.0,
                fps: 60.0,
            };
            actions = main_window(ctx, &mut state);
        });
        assert_eq!(actions, MainWindowActions::default());
    }

    #[test]
    fn structures_window_builds_every_type() {
        let ctx = egui::Context::default();
        let mut registry = StructureRegistry::new();
        registry.declare_type("Empty Type");
        for i in 0..10 {
            let _ = registry
                .insert(Dummy::new("Points", &format!("p{i}")).boxed())
                .unwrap();
        }
        run(&ctx, |ctx| structures_window(ctx, &mut registry));
        assert_eq!(registry.len(), 10);
    }

    #[test]
    fn selection_window_skips_missing_structure() {
        let ctx = egui::Context::default();
        let mut registry = StructureRegistry::new();
        let selection = Selection {
            structure: StructureId(99),
            key: StructureKey::new("Points", "gone"),
            local_index: 0,
            double_click: false,
        };
        run(&ctx, |ctx| selection_window(ctx, &mut registry, &selection));
    }
}
