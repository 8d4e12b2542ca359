use std::collections::BTreeMap;

use eframe::egui;
use serde::{Deserialize, Serialize};

/// Indigo used for primary actions, progress, and the active tracker step.
pub const ACCENT_INDIGO: egui::Color32 = egui::Color32::from_rgb(99, 102, 241);
/// Yellow of the wordmark and footer icons.
pub const BRAND_YELLOW: egui::Color32 = egui::Color32::from_rgb(250, 204, 21);
/// Green for completed tracker steps.
pub const SUCCESS_GREEN: egui::Color32 = egui::Color32::from_rgb(34, 197, 94);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudioTheme {
    pub accent: egui::Color32,
    pub text_scale: f32,
}

impl StudioTheme {
    pub fn studio_default() -> Self {
        Self {
            accent: ACCENT_INDIGO,
            text_scale: 1.0,
        }
    }
}

/// Cosmetic settings carried across launches through eframe storage. Session
/// state (uploads, pipeline progress) is deliberately never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedStudioSettings {
    pub accent_color: [u8; 4],
    pub text_scale: f32,
}

impl Default for PersistedStudioSettings {
    fn default() -> Self {
        Self::from_runtime(StudioTheme::studio_default())
    }
}

impl PersistedStudioSettings {
    pub fn into_runtime(self) -> StudioTheme {
        StudioTheme {
            accent: egui::Color32::from_rgba_unmultiplied(
                self.accent_color[0],
                self.accent_color[1],
                self.accent_color[2],
                self.accent_color[3],
            ),
            text_scale: self.text_scale.clamp(0.8, 1.4),
        }
    }

    pub fn from_runtime(theme: StudioTheme) -> Self {
        Self {
            accent_color: [
                theme.accent.r(),
                theme.accent.g(),
                theme.accent.b(),
                theme.accent.a(),
            ],
            text_scale: theme.text_scale,
        }
    }
}

pub fn apply_theme(ctx: &egui::Context, theme: StudioTheme) {
    let mut style = (*ctx.style()).clone();
    style.visuals = egui::Visuals::dark();
    style.visuals.selection.bg_fill = theme.accent;
    style.visuals.hyperlink_color = lighten(theme.accent, 0.25);
    style.text_styles = scaled_text_styles(theme.text_scale);
    style.spacing.item_spacing = egui::vec2(8.0, 6.0);
    style.spacing.button_padding = egui::vec2(10.0, 6.0);
    ctx.set_style(style);
}

fn scaled_text_styles(scale: f32) -> BTreeMap<egui::TextStyle, egui::FontId> {
    use egui::{FontFamily, FontId, TextStyle};
    [
        (TextStyle::Small, FontId::new(10.0 * scale, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(13.5 * scale, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(13.5 * scale, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(22.0 * scale, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(12.0 * scale, FontFamily::Monospace)),
    ]
    .into_iter()
    .collect()
}

pub fn lighten(c: egui::Color32, t: f32) -> egui::Color32 {
    let t = t.clamp(0.0, 1.0);
    let mix = |channel: u8| -> u8 {
        let channel = channel as f32;
        (channel + (255.0 - channel) * t).round().clamp(0.0, 255.0) as u8
    };
    egui::Color32::from_rgba_unmultiplied(mix(c.r()), mix(c.g()), mix(c.b()), c.a())
}
