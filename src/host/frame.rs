//! One iteration of the main loop.

use super::Host;
use crate::backend::{PassTarget, UiFrame};
use crate::error::PolyviewError;
use crate::input::{PointerFrame, ViewCommand};
use crate::ui::messages;

impl Host {
    /// Run one iteration: pace, poll sizes and input, update the camera and
    /// pick, build the UI, redraw the scene if needed, and present.
    ///
    /// With modal contexts on the stack only the top callback's UI is
    /// built.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::NotInitialized`] before [`Host::init`].
    pub fn main_loop_iteration(&mut self) -> Result<(), PolyviewError> {
        if !self.initialized {
            return Err(PolyviewError::NotInitialized);
        }
        let _ = self.scheduler.pace();
        self.poll_sizes();
        self.show_delayed_warnings()?;

        // The callback may pop its own context; the frame still belongs to
        // the context it was built in.
        let ctx = self.contexts.current().clone();
        let context_id = self.contexts.top_id();
        let raw = match self.platform.as_deref_mut() {
            Some(platform) => platform.poll_events(&ctx),
            None => return Err(PolyviewError::NotInitialized),
        };
        ctx.begin_pass(raw);

        self.process_input(&ctx);
        self.build_gui(&ctx);

        let output = ctx.end_pass();
        self.draw_scene();

        let ui = UiFrame {
            context_id,
            retired_contexts: self.contexts.take_retired(),
            primitives: ctx.tessellate(output.shapes, output.pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        };
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.present(ui, self.options.picking.debug_draw_pick_buffer);
        }
        if let Some(platform) = self.platform.as_deref_mut() {
            platform.handle_platform_output(output.platform_output);
        }
        Ok(())
    }

    /// Compare window and framebuffer sizes against the cached ones and
    /// propagate any change.
    pub(super) fn poll_sizes(&mut self) {
        let Some(platform) = self.platform.as_deref() else {
            return;
        };
        let window = platform.window_size();
        let framebuffer = platform.framebuffer_size();
        if window == self.window_size && framebuffer == self.framebuffer_size
        {
            return;
        }
        self.window_size = window;
        self.framebuffer_size = framebuffer;
        self.scheduler.request_redraw();
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.resize(framebuffer);
        }
        self.camera.resize(framebuffer.0, framebuffer.1);
    }

    /// Show the oldest queued warning in a modal popup.
    fn show_delayed_warnings(&mut self) -> Result<(), PolyviewError> {
        if self.contexts.len() != 1 || !self.options.show_warning_popups {
            return Ok(());
        }
        let Some(warning) = self.warnings.next_to_show() else {
            return Ok(());
        };
        self.warnings.set_showing(true);
        let result = self.push_context(Box::new(move |host, ctx| {
            if messages::warning_popup(ctx, &warning) {
                let _ = host.pop_context();
            }
        }));
        self.warnings.set_showing(false);
        result
    }

    fn process_input(&mut self, ctx: &egui::Context) {
        let always_evaluate = self.options.picking.always_evaluate;
        if always_evaluate {
            self.pick.reset();
        }
        let frame = PointerFrame::capture(ctx);
        let outcome =
            self.input.process(&frame, self.window_size, always_evaluate);

        if outcome.redraw {
            self.scheduler.request_redraw();
        }
        for command in &outcome.commands {
            match *command {
                ViewCommand::Zoom(amount) => self.camera.zoom(amount),
                ViewCommand::ClipPlaneShift(amount) => {
                    self.camera.shift_clip_plane(amount);
                }
                ViewCommand::Rotate(delta) => self.camera.rotate(delta),
                ViewCommand::Translate(delta) => self.camera.translate(delta),
            }
        }
        if let Some(pixel) = outcome.pick_at {
            self.evaluate_pick_query(pixel, outcome.double_click);
        }
    }

    /// Re-rasterize the scene when a redraw is pending or forced.
    fn draw_scene(&mut self) {
        if !self.scheduler.take_redraw(self.options.frame.always_redraw) {
            return;
        }
        let view = self.camera.view_params(self.framebuffer_size);
        let clear = self.options.frame.background_color;
        let draw_pick = self.options.picking.debug_draw_pick_buffer;
        let Some(backend) = self.backend.as_deref_mut() else {
            return;
        };
        let registry = &mut self.registry;
        backend.render(PassTarget::Scene { clear }, &view, &mut |dc| {
            for (_, structure) in registry.iter_mut() {
                structure.draw(dc);
            }
        });
        if draw_pick {
            backend.render(PassTarget::Pick, &view, &mut |dc| {
                for (_, structure) in registry.iter_mut() {
                    structure.draw_pick(dc);
                }
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fake_host, test_options};
    use crate::structure::test_structure::Dummy;

    #[test]
    fn redraw_happens_only_when_requested() {
        let (mut host, _, backend) = fake_host(test_options());
        let _ = host
            .register_structure(Dummy::new("Points", "a").boxed(), false)
            .unwrap();
        host.main_loop_iteration().unwrap();
        host.main_loop_iteration().unwrap();
        assert_eq!(backend.borrow().scene_renders, 1);
        assert_eq!(backend.borrow().presents, 2);
        let dummy = host.get_structure_as::<Dummy>("Points", "a").unwrap();
        assert_eq!(dummy.scene_draws, 1);

        host.request_redraw();
        host.main_loop_iteration().unwrap();
        assert_eq!(backend.borrow().scene_renders, 2);
    }

    #[test]
    fn always_redraw_draws_every_iteration() {
        let mut options = test_options();
        options.frame.always_redraw = true;
        let (mut host, _, backend) = fake_host(options);
        for _ in 0..3 {
            host.main_loop_iteration().unwrap();
        }
        assert_eq!(backend.borrow().scene_renders, 3);
    }

    #[test]
    fn resize_requests_redraw_and_resizes_backend() {
        let (mut host, platform, backend) = fake_host(test_options());
        host.main_loop_iteration().unwrap();
        let renders = backend.borrow().scene_renders;

        platform.borrow_mut().framebuffer = (640, 480);
        host.main_loop_iteration().unwrap();
        assert_eq!(backend.borrow().resizes.last(), Some(&(640, 480)));
        assert_eq!(backend.borrow().scene_renders, renders + 1);
        assert!((host.camera().camera.aspect - 640.0 / 480.0).abs() < 1e-6);
    }

    #[test]
    fn sixty_fps_cap_spaces_iterations() {
        let mut options = test_options();
        options.frame.max_fps = Some(60);
        let (mut host, _, _) = fake_host(options);
        let min = host.scheduler().min_iteration_duration();
        let start = std::time::Instant::now();
        for _ in 0..3 {
            host.main_loop_iteration().unwrap();
        }
        assert!(start.elapsed() >= min * 2);
    }

    #[test]
    fn pending_warning_is_shown_as_modal() {
        let (mut host, platform, _) = fake_host(test_options());
        host.warning("mesh has holes", "12 boundary loops");
        platform.borrow_mut().push_events(Vec::new());
        platform.borrow_mut().push_events(vec![egui::Event::Key {
            key: egui::Key::Enter,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers: egui::Modifiers::NONE,
        }]);
        host.main_loop_iteration().unwrap();
        assert_eq!(host.pending_warnings(), 0);
        assert_eq!(host.context_depth(), 1);
        // Two modal iterations plus the outer one.
        assert_eq!(host.scheduler().iteration(), 3);
    }
}
