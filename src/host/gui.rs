//! Per-iteration UI construction.

use super::Host;
use crate::ui::panels::{self, MainWindowState};

impl Host {
    /// Build this iteration's UI into `ctx`: the dashboard when no modal is
    /// active, otherwise only the top modal's callback.
    pub(super) fn build_gui(&mut self, ctx: &egui::Context) {
        if self.contexts.len() > 1 {
            self.run_top_callback(ctx);
            return;
        }
        self.run_user_callback(ctx);
        self.build_main_window(ctx);
        panels::structures_window(ctx, &mut self.registry);
        if let Some(selection) = self.pick.selection().cloned() {
            panels::selection_window(ctx, &mut self.registry, &selection);
        }
        // Structure controls may change what the scene shows.
        if ctx.is_using_pointer() || ctx.input(|i| i.pointer.any_click()) {
            self.scheduler.request_redraw();
        }
    }

    fn run_user_callback(&mut self, ctx: &egui::Context) {
        let Some(mut callback) = self.user_callback.take() else {
            return;
        };
        callback(self, ctx);
        // The callback may have installed a replacement.
        if self.user_callback.is_none() {
            self.user_callback = Some(callback);
        }
    }

    fn run_top_callback(&mut self, ctx: &egui::Context) {
        let Some((id, mut callback)) = self.contexts.take_top_callback() else {
            return;
        };
        callback(self, ctx);
        self.contexts.restore_callback(id, callback);
    }

    fn build_main_window(&mut self, ctx: &egui::Context) {
        let mut state = MainWindowState {
            title: &self.options.program_name,
            background: &mut self.options.frame.background_color,
            show_pick_buffer: &mut self.options.picking.debug_draw_pick_buffer,
            frame_ms: self.scheduler.frame_ms(),
            fps: self.scheduler.fps(),
        };
        let actions = panels::main_window(ctx, &mut state);

        if actions.changed {
            self.scheduler.request_redraw();
        }
        if actions.reset_view {
            self.reset_camera();
        }
        if actions.screenshot {
            // Failures are already logged.
            let _ = self.screenshot(false);
        }
    }
}
