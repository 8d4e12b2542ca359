use chrono::{Datelike, Local};
use eframe::egui;

use super::theme::{lighten, BRAND_YELLOW, SUCCESS_GREEN};

/// The four entries of the visual step tracker shown beside the result.
pub struct TrackerStep {
    pub title: &'static str,
    pub description: &'static str,
}

pub const TRACKER_STEPS: [TrackerStep; 4] = [
    TrackerStep {
        title: "Uploading",
        description: "Processing your images...",
    },
    TrackerStep {
        title: "Segmentation",
        description: "Identifying body position...",
    },
    TrackerStep {
        title: "Garment Fitting",
        description: "Adjusting garment to body shape...",
    },
    TrackerStep {
        title: "Final Rendering",
        description: "Generating final result...",
    },
];

const FACT_ROTATION_SECS: u64 = 5;

/// Shown under the spinner while a run is in flight.
pub const FASHION_FACTS: [&str; 7] = [
    "The world's oldest known garment is a 5,000-year-old linen Tarkhan dress from Egypt.",
    "Producing one cotton T-shirt requires 2,700 liters of water.",
    "The fashion industry contributes ~10% of global carbon emissions.",
    "Silk production began in China ~2700 BCE and was kept secret for millennia.",
    "The average garment is worn only 7-10 times before disposal.",
    "Digital-only clothing is sold for avatars in the metaverse.",
    "Mushroom leather is a sustainable alternative gaining popularity.",
];

/// Which fact to display after `elapsed_secs` of processing; rotates every
/// five seconds and wraps around.
pub fn fact_index(elapsed_secs: u64) -> usize {
    (elapsed_secs / FACT_ROTATION_SECS) as usize % FASHION_FACTS.len()
}

/// Hanger-and-wordmark logo; the returned response is the click target for
/// navigating home.
pub fn logo(ui: &mut egui::Ui) -> egui::Response {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("👕").size(22.0));
        ui.add(
            egui::Button::new(
                egui::RichText::new("Trylo")
                    .color(BRAND_YELLOW)
                    .strong()
                    .size(20.0),
            )
            .frame(false),
        )
    })
    .inner
}

/// Decorative text with a highlight that sweeps across the glyphs, after the
/// landing page's animated tagline.
pub fn shiny_text(ui: &mut egui::Ui, text: &str, size: f32, base: egui::Color32) {
    use egui::text::{LayoutJob, TextFormat};

    let time = ui.input(|i| i.time);
    // One full sweep roughly every 3.5 s; starts left of the first glyph and
    // leaves past the last so the shine fully clears between passes.
    let sweep = ((time / 3.5).fract() * 1.4 - 0.2) as f32;

    let chars: Vec<char> = text.chars().collect();
    let count = chars.len().max(1) as f32;
    let mut job = LayoutJob::default();
    for (index, ch) in chars.iter().enumerate() {
        let pos = index as f32 / count;
        let brightness = (1.0 - (pos - sweep).abs() * 5.0).clamp(0.0, 1.0);
        let mut buf = [0u8; 4];
        job.append(
            ch.encode_utf8(&mut buf),
            0.0,
            TextFormat {
                font_id: egui::FontId::proportional(size),
                color: lighten(base, brightness * 0.85),
                ..Default::default()
            },
        );
    }
    ui.label(job);
}

/// The four-step tracker rendered inside the result panel. `current_step`
/// follows the session: earlier steps are check-marked, the current one is
/// highlighted with the accent color.
pub fn step_tracker(ui: &mut egui::Ui, current_step: usize, accent: egui::Color32) {
    for (index, step) in TRACKER_STEPS.iter().enumerate() {
        let done = current_step > index;
        let active = current_step == index;
        let (badge_color, title_color) = if done {
            (SUCCESS_GREEN, SUCCESS_GREEN)
        } else if active {
            (accent, lighten(accent, 0.35))
        } else {
            (
                egui::Color32::from_gray(80),
                egui::Color32::from_gray(140),
            )
        };

        egui::Frame::group(ui.style())
            .stroke(egui::Stroke::new(1.0, badge_color))
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let badge = if done {
                        "✔".to_string()
                    } else {
                        (index + 1).to_string()
                    };
                    ui.label(egui::RichText::new(badge).color(badge_color).strong());
                    ui.vertical(|ui| {
                        ui.label(egui::RichText::new(step.title).color(title_color).strong());
                        ui.small(egui::RichText::new(step.description).weak());
                    });
                });
            });
    }
}

/// App footer: attribution, social links, and the app status line.
pub fn footer(ui: &mut egui::Ui, status: &str) {
    ui.horizontal(|ui| {
        ui.small("Built by");
        ui.hyperlink_to(
            egui::RichText::new("Mayank Singhal").small(),
            "https://www.linkedin.com/in/mynkkkk/",
        );
        ui.small("·");
        ui.small(format!(
            "© {} Virtual Try-On Project - Work in Progress",
            Local::now().year()
        ));
        if !status.is_empty() {
            ui.separator();
            ui.small(egui::RichText::new(status).weak());
        }
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.hyperlink_to(
                egui::RichText::new("Email").small().color(BRAND_YELLOW),
                "mailto:singhal2004mayank@gmail.com",
            );
            ui.hyperlink_to(
                egui::RichText::new("LinkedIn").small().color(BRAND_YELLOW),
                "https://www.linkedin.com/in/mynkkkk/",
            );
            ui.hyperlink_to(
                egui::RichText::new("GitHub").small().color(BRAND_YELLOW),
                "https://github.com/MynkSinghal",
            );
        });
    });
}
