//! Pick queries against the offscreen index buffer.

use glam::Vec2;

use super::Host;
use crate::backend::PassTarget;
use crate::picking::{self, PickState, Selection};

impl Host {
    /// Render the pick buffer and select whatever lies under `pixel`
    /// (framebuffer pixels).
    ///
    /// A pixel outside the framebuffer is ignored. Background and indices
    /// owned by no structure clear the selection.
    pub fn evaluate_pick_query(&mut self, pixel: Vec2, double_click: bool) {
        let (width, height) = self.framebuffer_size;
        if pixel.x < 0.0
            || pixel.y < 0.0
            || pixel.x >= width as f32
            || pixel.y >= height as f32
        {
            return;
        }
        let view = self.camera.view_params(self.framebuffer_size);
        let Some(backend) = self.backend.as_deref_mut() else {
            return;
        };
        let registry = &mut self.registry;
        backend.render(PassTarget::Pick, &view, &mut |dc| {
            for (_, structure) in registry.iter_mut() {
                structure.draw_pick(dc);
            }
        });
        let value = backend.read_pick_pixel(pixel.x as u32, pixel.y as u32);

        let hit = picking::resolve_pixel(&self.pick_map, value).and_then(
            |(id, local_index)| {
                self.registry.by_id_mut(id).map(|structure| Selection {
                    structure: id,
                    key: structure.key(),
                    local_index,
                    double_click,
                })
            },
        );
        self.pick = hit.map_or(PickState::NoSelection, PickState::Selected);
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{fake_host, test_options};
    use super::*;
    use crate::picking::index_to_color;
    use crate::structure::test_structure::Dummy;
    use crate::structure::StructureKey;

    fn encoded(index: u64) -> [f32; 4] {
        let [r, g, b] = index_to_color(index);
        [r, g, b, 1.0]
    }

    #[test]
    fn index_zero_is_no_selection() {
        let (mut host, _, backend) = fake_host(test_options());
        let _ = host
            .register_structure(
                Dummy::new("Points", "a").with_pick_count(4).boxed(),
                false,
            )
            .unwrap();
        backend.borrow_mut().pick_pixel = Some(encoded(0));
        host.evaluate_pick_query(Vec2::new(10.0, 10.0), false);
        assert_eq!(*host.pick_state(), PickState::NoSelection);
        assert_eq!(backend.borrow().pick_renders, 1);
    }

    #[test]
    fn hit_selects_owner_and_local_index() {
        let (mut host, _, backend) = fake_host(test_options());
        let _ = host
            .register_structure(
                Dummy::new("Points", "a").with_pick_count(4).boxed(),
                false,
            )
            .unwrap();
        let id_b = host
            .register_structure(
                Dummy::new("Points", "b").with_pick_count(4).boxed(),
                false,
            )
            .unwrap();
        // b owns [5, 9).
        backend.borrow_mut().pick_pixel = Some(encoded(7));
        host.evaluate_pick_query(Vec2::new(10.0, 10.0), true);

        let selection = host.pick_state().selection().unwrap();
        assert_eq!(selection.structure, id_b);
        assert_eq!(selection.key, StructureKey::new("Points", "b"));
        assert_eq!(selection.local_index, 2);
        assert!(selection.double_click);

        let b = host.get_structure_as::<Dummy>("Points", "b").unwrap();
        assert_eq!(b.pick_draws, 1);
    }

    #[test]
    fn pointer_outside_framebuffer_is_ignored() {
        let (mut host, _, backend) = fake_host(test_options());
        backend.borrow_mut().pick_pixel = Some(encoded(1));
        host.evaluate_pick_query(Vec2::new(5000.0, 10.0), false);
        host.evaluate_pick_query(Vec2::new(-1.0, 10.0), false);
        assert_eq!(backend.borrow().pick_renders, 0);
    }

    #[test]
    fn index_of_removed_structure_is_no_selection() {
        let (mut host, _, backend) = fake_host(test_options());
        let _ = host
            .register_structure(
                Dummy::new("Points", "a").with_pick_count(4).boxed(),
                false,
            )
            .unwrap();
        host.remove_structure("Points", "a", true).unwrap();
        backend.borrow_mut().pick_pixel = Some(encoded(2));
        host.evaluate_pick_query(Vec2::new(10.0, 10.0), false);
        assert!(!host.pick_state().is_selected());
    }

    #[test]
    fn click_in_empty_space_runs_a_pick() {
        let (mut host, platform, backend) = fake_host(test_options());
        let _ = host
            .register_structure(
                Dummy::new("Points", "a").with_pick_count(4).boxed(),
                false,
            )
            .unwrap();
        backend.borrow_mut().pick_pixel = Some(encoded(3));
        let pos = egui::pos2(900.0, 600.0);
        let button = |pressed| egui::Event::PointerButton {
            pos,
            button: egui::PointerButton::Primary,
            pressed,
            modifiers: egui::Modifiers::NONE,
        };
        platform.borrow_mut().push_events(vec![
            egui::Event::PointerMoved(pos),
            button(true),
        ]);
        platform.borrow_mut().push_events(vec![button(false)]);
        host.main_loop_iteration().unwrap();
        host.main_loop_iteration().unwrap();

        let selection = host.pick_state().selection().unwrap();
        assert_eq!(selection.local_index, 2);
        assert_eq!(backend.borrow().pick_renders, 1);
    }

    #[test]
    fn always_evaluate_resets_then_picks_each_frame() {
        let mut options = test_options();
        options.picking.always_evaluate = true;
        let (mut host, platform, backend) = fake_host(options);
        let _ = host
            .register_structure(
                Dummy::new("Points", "a").with_pick_count(4).boxed(),
                false,
            )
            .unwrap();
        backend.borrow_mut().pick_pixel = Some(encoded(1));
        platform
            .borrow_mut()
            .push_events(vec![egui::Event::PointerMoved(egui::pos2(
                900.0, 600.0,
            ))]);
        host.main_loop_iteration().unwrap();
        assert!(host.pick_state().is_selected());

        backend.borrow_mut().pick_pixel = Some(encoded(0));
        host.main_loop_iteration().unwrap();
        assert!(!host.pick_state().is_selected());
        assert_eq!(backend.borrow().pick_renders, 2);
    }
}
