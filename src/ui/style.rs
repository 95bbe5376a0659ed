use egui::Color32;

/// Accent used for selections and active widgets.
pub const ACCENT: Color32 = Color32::from_rgb(52, 168, 83);

/// Host look: dark translucent windows with green accents.
pub fn apply(style: &mut egui::Style) {
    style.spacing.button_padding = egui::vec2(6.0, 3.0);
    style.spacing.item_spacing = egui::vec2(6.0, 4.0);

    let visuals = &mut style.visuals;
    visuals.dark_mode = true;
    visuals.window_fill = Color32::from_rgba_unmultiplied(20, 20, 22, 215);
    visuals.panel_fill = Color32::from_rgba_unmultiplied(20, 20, 22, 215);
    visuals.override_text_color = Some(Color32::from_gray(230));
    visuals.selection.bg_fill = ACCENT.gamma_multiply(0.6);
    visuals.hyperlink_color = ACCENT;

    let widgets = &mut visuals.widgets;
    widgets.inactive.bg_fill = Color32::from_rgb(38, 70, 48);
    widgets.inactive.weak_bg_fill = Color32::from_rgb(38, 70, 48);
    widgets.hovered.bg_fill = Color32::from_rgb(46, 110, 64);
    widgets.hovered.weak_bg_fill = Color32::from_rgb(46, 110, 64);
    widgets.active.bg_fill = ACCENT;
    widgets.active.weak_bg_fill = ACCENT;
}
