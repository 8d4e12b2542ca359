use std::time::Duration;

use eframe::egui;

use crate::ui::{theme, widgets};
use crate::{Route, StudioApp};

pub(crate) fn show(app: &mut StudioApp, ui: &mut egui::Ui) {
    let avail = ui.available_size();
    ui.add_space((avail.y * 0.16).clamp(24.0, 120.0));

    ui.vertical_centered(|ui| {
        ui.label(egui::RichText::new("Virtual Try-On App").strong().size(40.0));
        ui.add_space(4.0);
        widgets::shiny_text(ui, "Try Before You Buy", 26.0, theme::BRAND_YELLOW);
        ui.add_space(14.0);
        ui.label(
            egui::RichText::new(
                "Experience clothes virtually before making a purchase.\n\
                 Upload your photo and see how different garments look on you.",
            )
            .size(15.0),
        );
        ui.add_space(18.0);
        let get_started =
            egui::Button::new(egui::RichText::new("Get Started").strong().size(16.0))
                .fill(app.theme.accent)
                .min_size(egui::vec2(180.0, 42.0));
        if ui.add(get_started).clicked() {
            app.navigate(Route::Studio);
        }
    });

    // Keep the tagline shine moving.
    ui.ctx().request_repaint_after(Duration::from_millis(50));
}
