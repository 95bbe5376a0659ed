use std::collections::VecDeque;

/// A warning waiting to be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    /// Headline.
    pub message: String,
    /// Extra detail; may be empty.
    pub detail: String,
    /// Identical warnings folded into this one after it was queued.
    pub repeat_count: usize,
}

/// FIFO of warnings shown one at a time as modal popups.
#[derive(Debug, Default)]
pub struct WarningQueue {
    pending: VecDeque<Warning>,
    showing: bool,
}

impl WarningQueue {
    /// Queue a warning, folding it into an identical pending one.
    pub fn push(&mut self, message: &str, detail: &str) {
        if let Some(existing) = self
            .pending
            .iter_mut()
            .find(|w| w.message == message && w.detail == detail)
        {
            existing.repeat_count += 1;
            return;
        }
        self.pending.push_back(Warning {
            message: message.to_owned(),
            detail: detail.to_owned(),
            repeat_count: 0,
        });
    }

    /// Next warning to show, unless one is already on screen.
    pub fn next_to_show(&mut self) -> Option<Warning> {
        if self.showing {
            return None;
        }
        self.pending.pop_front()
    }

    /// Mark whether a popup is on screen.
    pub fn set_showing(&mut self, showing: bool) {
        self.showing = showing;
    }

    /// Number of queued warnings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Draw `warning` as a centered popup. Returns `true` once dismissed by the
/// button, Enter, or Escape.
pub fn warning_popup(ctx: &egui::Context, warning: &Warning) -> bool {
    let mut dismissed = false;
    let _ = egui::Window::new("WARNING")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let _ = ui.label(&warning.message);
            if !warning.detail.is_empty() {
                let _ = ui.label(&warning.detail);
            }
            if warning.repeat_count > 0 {
                let _ = ui.label(format!(
                    "(and {} similar messages)",
                    warning.repeat_count
                ));
            }
            ui.add_space(6.0);
            dismissed = ui.button("OK").clicked();
        });
    dismissed
        || ctx.input(|i| {
            i.key_pressed(egui::Key::Enter) || i.key_pressed(egui::Key::Escape)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_warnings_coalesce() {
        let mut q = WarningQueue::default();
        q.push("bad mesh", "3 degenerate faces");
        q.push("other", "");
        q.push("bad mesh", "3 degenerate faces");
        assert_eq!(q.len(), 2);
        let first = q.next_to_show().unwrap();
        assert_eq!(first.repeat_count, 1);
    }

    #[test]
    fn one_popup_at_a_time() {
        let mut q = WarningQueue::default();
        q.push("a", "");
        q.push("b", "");
        q.set_showing(true);
        assert!(q.next_to_show().is_none());
        q.set_showing(false);
        assert_eq!(q.next_to_show().map(|w| w.message), Some("a".to_owned()));
    }

    #[test]
    fn enter_dismisses_popup() {
        let ctx = egui::Context::default();
        let warning = Warning {
            message: "careful".to_owned(),
            detail: String::new(),
            repeat_count: 2,
        };
        let mut dismissed = true;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            dismissed = warning_popup(ctx, &warning);
        });
        assert!(!dismissed);

        let enter = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Enter,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(enter, |ctx| {
            dismissed = warning_popup(ctx, &warning);
        });
        assert!(dismissed);
    }
}
