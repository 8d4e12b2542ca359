use eframe::egui;
use shared::domain::{ImageRole, PipelineStage};

use crate::ui::{theme, widgets};
use crate::{human_readable_bytes, StudioApp};

enum CardAction {
    Pick(ImageRole),
    Clear(ImageRole),
}

enum ResultAction {
    Copy,
    Save,
}

pub(crate) fn show(app: &mut StudioApp, ui: &mut egui::Ui) {
    ui.heading("Try-On Studio");
    ui.label(
        egui::RichText::new("Upload your photo and the garment to generate the try-on result.")
            .weak(),
    );
    ui.add_space(10.0);

    // Widgets only read the app while laying out; actions are collected and
    // applied afterwards so the cards never hold a mutable borrow.
    let mut card_action: Option<CardAction> = None;
    let mut result_action: Option<ResultAction> = None;

    ui.columns(3, |columns| {
        upload_card(app, &mut columns[0], ImageRole::Model, &mut card_action);
        upload_card(app, &mut columns[1], ImageRole::Garment, &mut card_action);
        result_card(app, &mut columns[2], &mut result_action);
    });

    ui.add_space(14.0);
    generate_control(app, ui);

    match card_action {
        Some(CardAction::Pick(role)) => app.pick_image(role),
        Some(CardAction::Clear(role)) => app.clear_upload(role),
        None => {}
    }
    match result_action {
        Some(ResultAction::Copy) => app.copy_result_to_clipboard(),
        Some(ResultAction::Save) => app.save_result_as(),
        None => {}
    }
}

fn upload_card(
    app: &StudioApp,
    ui: &mut egui::Ui,
    role: ImageRole,
    action: &mut Option<CardAction>,
) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_height(300.0);
        ui.strong(role.label());
        ui.add_space(6.0);

        if let Some(path) = app.loading.get(&role) {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                ui.add(egui::Spinner::new().size(24.0));
                ui.small(format!(
                    "Loading {}...",
                    path.file_name().and_then(|n| n.to_str()).unwrap_or("image")
                ));
            });
        } else if let Some(upload) = app.session.image(role) {
            if let Some(texture) = app.textures.get(upload.uri()) {
                ui.add(
                    egui::Image::new(texture).max_size(egui::vec2(ui.available_width(), 240.0)),
                );
            } else {
                ui.add(egui::Spinner::new().size(24.0));
            }
            if let Some(meta) = app.upload_meta.get(&role) {
                ui.small(format!(
                    "{} · {}",
                    meta.file_name,
                    human_readable_bytes(meta.byte_len)
                ));
            }
            let remove = egui::Button::new(
                egui::RichText::new("Remove").color(egui::Color32::from_rgb(239, 68, 68)),
            )
            .frame(false);
            if ui.add(remove).clicked() {
                *action = Some(CardAction::Clear(role));
            }
        } else {
            ui.vertical_centered(|ui| {
                ui.add_space(24.0);
                let label = match role {
                    ImageRole::Model => "Upload Photo",
                    ImageRole::Garment => "Upload Garment",
                };
                let pick = egui::Button::new(label).min_size(egui::vec2(140.0, 36.0));
                if ui.add(pick).clicked() {
                    *action = Some(CardAction::Pick(role));
                }
                ui.small(egui::RichText::new("PNG, JPG, GIF, WEBP, or BMP").weak());
            });
        }
    });
}

fn result_card(app: &StudioApp, ui: &mut egui::Ui, action: &mut Option<ResultAction>) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_min_height(300.0);
        ui.strong("Result");
        ui.add_space(6.0);

        let stage = app.session.stage();
        if stage == PipelineStage::Idle {
            ui.vertical_centered(|ui| {
                ui.add_space(100.0);
                ui.label(egui::RichText::new("Result will appear here").weak());
            });
            return;
        }

        let texture = app
            .session
            .result()
            .and_then(|asset| app.result_textures.get(asset.file_name()));
        match texture {
            Some(texture) => {
                let image = egui::Image::new(texture)
                    .max_size(egui::vec2(ui.available_width(), 240.0))
                    .sense(egui::Sense::click());
                let response = ui.add(image);
                response.context_menu(|ui| {
                    ui.label(egui::RichText::new("Image actions").strong());
                    ui.separator();
                    if ui.button("Copy image").clicked() {
                        *action = Some(ResultAction::Copy);
                        ui.close_menu();
                    }
                    if ui.button("Save image as…").clicked() {
                        *action = Some(ResultAction::Save);
                        ui.close_menu();
                    }
                });
            }
            None => {
                ui.vertical_centered(|ui| {
                    ui.add_space(30.0);
                    ui.add(egui::Spinner::new().size(40.0));
                    if let Some(started) = app.run_started_at {
                        let fact =
                            widgets::FASHION_FACTS[widgets::fact_index(started.elapsed().as_secs())];
                        ui.add_space(6.0);
                        ui.small(egui::RichText::new(format!("Did you know? {fact}")).weak());
                    }
                });
            }
        }

        ui.add_space(8.0);
        ui.label(
            egui::RichText::new(app.session.status())
                .color(theme::lighten(app.theme.accent, 0.3))
                .strong(),
        );
        ui.add(egui::ProgressBar::new(stage.progress_fraction()).animate(stage.is_running()));
        ui.add_space(8.0);
        widgets::step_tracker(ui, app.session.current_step(), app.theme.accent);
    });
}

pub(crate) fn generate_button_label(stage: PipelineStage) -> &'static str {
    if stage.is_running() {
        "Processing..."
    } else if stage == PipelineStage::Completed {
        "Try Another"
    } else {
        "Generate Try-On"
    }
}

/// The generate action itself is gated on `can_generate`; after completion
/// the same control becomes "Try Another" and stays clickable for the reset.
pub(crate) fn generate_button_enabled(can_generate: bool, stage: PipelineStage) -> bool {
    can_generate || stage == PipelineStage::Completed
}

fn generate_control(app: &mut StudioApp, ui: &mut egui::Ui) {
    let stage = app.session.stage();
    let enabled = generate_button_enabled(app.session.can_generate(), stage);
    let fill = if enabled {
        app.theme.accent
    } else {
        egui::Color32::from_gray(60)
    };
    let button = egui::Button::new(
        egui::RichText::new(generate_button_label(stage))
            .strong()
            .size(16.0),
    )
    .fill(fill)
    .min_size(egui::vec2(ui.available_width(), 46.0));

    if ui.add_enabled(enabled, button).clicked() {
        if stage == PipelineStage::Completed {
            app.reset_session();
        } else {
            app.start_generate();
        }
    }
}
