//! Reentrant modal UI sessions.

use super::Host;
use crate::error::PolyviewError;
use crate::ui::UiCallback;

impl Host {
    /// Push a modal context running `callback` and drive the main loop
    /// until that context is popped.
    ///
    /// While the modal is on top only its callback builds UI. The callback
    /// may push further modals; each push returns only once the stack has
    /// unwound below its own depth. If the window is closed meanwhile, the
    /// stack is cut back to its depth before this call.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::NotInitialized`] before [`Host::init`].
    pub fn push_context(
        &mut self,
        callback: UiCallback,
    ) -> Result<(), PolyviewError> {
        if !self.initialized {
            let err = PolyviewError::NotInitialized;
            self.report(&err);
            return Err(err);
        }
        let depth_before = self.contexts.len();
        let _ = self.contexts.push(callback);
        let depth_after_push = depth_before + 1;
        log::debug!(
            "{}modal context pushed (depth {})",
            self.options.print_prefix,
            depth_after_push - 1
        );

        while self.contexts.len() >= depth_after_push {
            if self.should_close() {
                self.contexts.truncate(depth_before);
                break;
            }
            if let Err(e) = self.main_loop_iteration() {
                self.contexts.truncate(depth_before);
                return Err(e);
            }
        }
        self.scheduler.request_redraw();
        Ok(())
    }

    /// Pop the top modal context.
    ///
    /// # Errors
    ///
    /// [`PolyviewError::PopRootContext`] when no modal is active; nothing
    /// changes.
    pub fn pop_context(&mut self) -> Result<(), PolyviewError> {
        let result = self.contexts.pop();
        if let Err(e) = &result {
            self.report(e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::super::test_support::{fake_host, test_options};
    use super::*;

    #[test]
    fn immediate_pop_returns_after_one_iteration() {
        let (mut host, _, _) = fake_host(test_options());
        let before = host.context_depth();
        let start = host.scheduler().iteration();
        host.push_context(Box::new(|host, _| {
            host.pop_context().unwrap();
        }))
        .unwrap();
        assert_eq!(host.scheduler().iteration() - start, 1);
        assert_eq!(host.context_depth(), before);
    }

    #[test]
    fn popping_root_is_an_error() {
        let (mut host, _, _) = fake_host(test_options());
        assert!(matches!(
            host.pop_context(),
            Err(PolyviewError::PopRootContext)
        ));
        assert_eq!(host.context_depth(), 1);
    }

    #[test]
    fn nested_modals_unwind_in_order() {
        let (mut host, _, _) = fake_host(test_options());
        let depths_a: Rc<RefCell<Vec<usize>>> = Rc::default();
        let depths_b: Rc<RefCell<Vec<usize>>> = Rc::default();

        let (seen_a, seen_b) = (Rc::clone(&depths_a), Rc::clone(&depths_b));
        let mut pushed = false;
        host.push_context(Box::new(move |host, _| {
            seen_a.borrow_mut().push(host.context_depth());
            if pushed {
                return;
            }
            pushed = true;
            let seen_b = Rc::clone(&seen_b);
            host.push_context(Box::new(move |host, _| {
                seen_b.borrow_mut().push(host.context_depth());
                host.pop_context().unwrap();
            }))
            .unwrap();
            assert_eq!(host.context_depth(), 2);
            host.pop_context().unwrap();
        }))
        .unwrap();

        assert_eq!(host.context_depth(), 1);
        assert_eq!(*depths_a.borrow(), [2]);
        assert_eq!(*depths_b.borrow(), [3]);
    }

    #[test]
    fn modal_hides_dashboard_and_user_ui() {
        let (mut host, _, _) = fake_host(test_options());
        let user_runs = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&user_runs);
        host.set_user_callback(Box::new(move |_, _| {
            *counter.borrow_mut() += 1;
        }));

        let mut frames = 0;
        host.push_context(Box::new(move |host, _| {
            frames += 1;
            if frames == 3 {
                host.pop_context().unwrap();
            }
        }))
        .unwrap();
        assert_eq!(*user_runs.borrow(), 0);

        host.main_loop_iteration().unwrap();
        assert_eq!(*user_runs.borrow(), 1);
    }

    #[test]
    fn modal_ui_textures_are_kept_apart_from_the_root() {
        let (mut host, _, backend) = fake_host(test_options());
        host.main_loop_iteration().unwrap();
        host.push_context(Box::new(|host, _| {
            host.pop_context().unwrap();
        }))
        .unwrap();
        host.main_loop_iteration().unwrap();

        let log = backend.borrow();
        let frames = &log.presented_ui;
        assert_eq!(frames.len(), 3);
        let (root, modal) = (frames[0].context_id, frames[1].context_id);
        assert_ne!(root, modal);
        assert_eq!(frames[2].context_id, root);

        // Each context starts its own atlas; the root keeps patching its own.
        let atlas = egui::TextureId::default();
        assert!(frames[0].uploads.contains(&(atlas, true)));
        assert!(frames[1].uploads.contains(&(atlas, true)));
        assert!(frames[2].uploads.iter().all(|&(_, whole)| !whole));

        // The modal's texture state is released with its last frame.
        assert_eq!(frames[1].retired_contexts, [modal]);
        assert!(frames[2].retired_contexts.is_empty());
    }

    #[test]
    fn platform_input_follows_the_running_context() {
        let (mut host, platform, _) = fake_host(test_options());
        let seen = Rc::clone(&platform);
        host.push_context(Box::new(move |host, ctx| {
            let polled = seen.borrow().polled_context.clone();
            assert_eq!(polled.as_ref(), Some(ctx));
            host.pop_context().unwrap();
        }))
        .unwrap();

        host.main_loop_iteration().unwrap();
        let polled = platform.borrow().polled_context.clone();
        assert_eq!(polled.as_ref(), Some(host.contexts.current()));
    }

    #[test]
    fn closing_the_window_unwinds_modals() {
        let (mut host, platform, _) = fake_host(test_options());
        platform.borrow_mut().close_after = Some(2);
        host.push_context(Box::new(|_, _| {})).unwrap();
        assert_eq!(host.context_depth(), 1);
        assert_eq!(host.scheduler().iteration(), 2);
    }
}
