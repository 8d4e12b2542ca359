use std::collections::HashMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossbeam_channel::{bounded, Receiver, Sender};
use eframe::egui;
use session_core::{upload, TryOnSession, UploadedImage};
use shared::domain::{ImageRole, PipelineStage};

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use controller::events::{PreviewImage, UiEvent};
use controller::orchestration::dispatch_backend_command;
use ui::theme::{self, PersistedStudioSettings, StudioTheme};

const SETTINGS_STORAGE_KEY: &str = "trylo.studio.settings";
const IMAGE_FILE_EXTENSIONS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "bmp"];

#[derive(Parser, Debug)]
#[command(name = "trylo-studio", about = "Trylo virtual try-on concept demo")]
struct Args {
    /// Directory holding the fixed result images (expects an images/ subdir).
    #[arg(long, default_value = "assets")]
    assets_dir: PathBuf,
    /// Open directly in the studio view instead of the landing page.
    #[arg(long)]
    start_in_studio: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Route {
    Landing,
    Studio,
}

pub(crate) struct UploadMeta {
    pub(crate) file_name: String,
    pub(crate) byte_len: u64,
}

pub(crate) struct StudioApp {
    cmd_tx: Sender<BackendCommand>,
    ui_rx: Receiver<UiEvent>,
    // Release hooks push retired preview URIs here; the texture cache entry
    // is dropped at the top of the next frame.
    released_tx: Sender<String>,
    released_rx: Receiver<String>,

    route: Route,
    pub(crate) session: TryOnSession,
    run: u64,
    pub(crate) run_started_at: Option<Instant>,
    upload_seq: u64,

    pub(crate) loading: HashMap<ImageRole, PathBuf>,
    pub(crate) upload_meta: HashMap<ImageRole, UploadMeta>,
    pub(crate) textures: HashMap<String, egui::TextureHandle>,
    pub(crate) result_textures: HashMap<&'static str, egui::TextureHandle>,
    result_images: HashMap<&'static str, PreviewImage>,

    pub(crate) status: String,
    pub(crate) theme: StudioTheme,
    applied_theme: Option<StudioTheme>,
    settings_open: bool,
}

impl StudioApp {
    fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        route: Route,
        persisted_settings: Option<PersistedStudioSettings>,
    ) -> Self {
        let (released_tx, released_rx) = bounded::<String>(64);
        Self {
            cmd_tx,
            ui_rx,
            released_tx,
            released_rx,
            route,
            session: TryOnSession::new(),
            run: 0,
            run_started_at: None,
            upload_seq: 0,
            loading: HashMap::new(),
            upload_meta: HashMap::new(),
            textures: HashMap::new(),
            result_textures: HashMap::new(),
            result_images: HashMap::new(),
            status: String::new(),
            theme: persisted_settings.unwrap_or_default().into_runtime(),
            applied_theme: None,
            settings_open: false,
        }
    }

    fn release_hook(&self) -> impl FnOnce(&str) + Send + 'static {
        let released_tx = self.released_tx.clone();
        move |uri: &str| {
            let _ = released_tx.try_send(uri.to_string());
        }
    }

    fn drain_released_uris(&mut self) {
        while let Ok(uri) = self.released_rx.try_recv() {
            self.textures.remove(&uri);
        }
    }

    fn process_ui_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.ui_rx.try_recv() {
            match event {
                UiEvent::ImageLoaded {
                    role,
                    path,
                    byte_len,
                    image,
                } => {
                    self.loading.remove(&role);
                    let Some(base_uri) = upload::file_uri(&path) else {
                        self.status = format!("Cannot reference {}", path.display());
                        continue;
                    };
                    // Unique per selection, like a browser object URL, so
                    // re-picking the same file never aliases texture keys.
                    self.upload_seq += 1;
                    let uri = format!("{base_uri}#{}", self.upload_seq);

                    let color_image = egui::ColorImage::from_rgba_unmultiplied(
                        [image.width, image.height],
                        &image.rgba,
                    );
                    let texture =
                        ctx.load_texture(uri.clone(), color_image, egui::TextureOptions::LINEAR);
                    self.textures.insert(uri.clone(), texture);

                    let file_name = path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .unwrap_or("image")
                        .to_string();
                    self.upload_meta
                        .insert(role, UploadMeta { file_name, byte_len });

                    let hook = self.release_hook();
                    self.session
                        .select_image(role, UploadedImage::new(uri, hook));
                }
                UiEvent::ImageLoadFailed { role, path, reason } => {
                    self.loading.remove(&role);
                    self.status = format!("Could not load {}: {reason}", path.display());
                }
                UiEvent::StageAdvanced { run, advance, image } => {
                    if run != self.run {
                        tracing::debug!(run, current = self.run, "dropping stale pipeline event");
                        continue;
                    }
                    if !self.session.apply_advance(&advance) {
                        continue;
                    }
                    if let Some(image) = image {
                        let color_image = egui::ColorImage::from_rgba_unmultiplied(
                            [image.width, image.height],
                            &image.rgba,
                        );
                        let texture = ctx.load_texture(
                            format!("result:{}", advance.result.file_name()),
                            color_image,
                            egui::TextureOptions::LINEAR,
                        );
                        self.result_textures
                            .insert(advance.result.file_name(), texture);
                        self.result_images.insert(advance.result.file_name(), image);
                    }
                    if advance.stage == PipelineStage::Completed {
                        self.run_started_at = None;
                    }
                }
                UiEvent::ResultAssetMissing {
                    run,
                    file_name,
                    reason,
                } => {
                    if run == self.run {
                        self.status = format!("Result image {file_name} unavailable: {reason}");
                    }
                }
                UiEvent::BackendStartupFailed(reason) => {
                    self.status = reason;
                }
            }
        }
    }

    pub(crate) fn pick_image(&mut self, role: ImageRole) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_FILE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };
        let is_image = mime_guess::from_path(&path)
            .first()
            .map(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .unwrap_or(false);
        if !is_image {
            self.status = format!("{} does not look like an image", path.display());
            return;
        }
        self.loading.insert(role, path.clone());
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::LoadImage { role, path },
            &mut self.status,
        );
    }

    pub(crate) fn clear_upload(&mut self, role: ImageRole) {
        self.session.clear_image(role);
        self.upload_meta.remove(&role);
    }

    pub(crate) fn start_generate(&mut self) {
        if self.session.begin_generate().is_err() {
            // Guarded upstream by the disabled control; the session already
            // carries the error text as its status.
            return;
        }
        self.run += 1;
        self.run_started_at = Some(Instant::now());
        self.result_textures.clear();
        self.result_images.clear();
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::RunPipeline { run: self.run },
            &mut self.status,
        );
    }

    pub(crate) fn reset_session(&mut self) {
        // Bumping the run id orphans any straggling pipeline events.
        self.run += 1;
        self.session.reset();
        self.upload_meta.clear();
        self.loading.clear();
        self.result_textures.clear();
        self.result_images.clear();
        self.run_started_at = None;
    }

    pub(crate) fn navigate(&mut self, route: Route) {
        if self.route == route {
            return;
        }
        if self.route == Route::Studio {
            // Leaving the studio ends the session and releases both images.
            self.reset_session();
            self.status.clear();
        }
        if route == Route::Studio {
            self.session = TryOnSession::new();
        }
        self.route = route;
    }

    pub(crate) fn copy_result_to_clipboard(&mut self) {
        let Some(asset) = self.session.result() else {
            return;
        };
        let Some(image) = self.result_images.get(asset.file_name()) else {
            self.status = "Result image is not loaded yet".to_string();
            return;
        };
        match write_clipboard_image(image) {
            Ok(()) => self.status = "Copied result to clipboard".to_string(),
            Err(err) => self.status = format!("Failed to copy result: {err}"),
        }
    }

    pub(crate) fn save_result_as(&mut self) {
        let Some(asset) = self.session.result() else {
            return;
        };
        let Some(image) = self.result_images.get(asset.file_name()) else {
            self.status = "Result image is not loaded yet".to_string();
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(asset.file_name())
            .save_file()
        else {
            return;
        };
        let write = encode_rgba_png(&image.rgba, image.width, image.height)
            .and_then(|bytes| std::fs::write(&path, bytes).map_err(|err| err.to_string()));
        match write {
            Ok(()) => self.status = format!("Saved result to {}", path.display()),
            Err(err) => self.status = format!("Failed to save result: {err}"),
        }
    }

    fn apply_theme_if_needed(&mut self, ctx: &egui::Context) {
        if self.applied_theme == Some(self.theme) {
            return;
        }
        theme::apply_theme(ctx, self.theme);
        self.applied_theme = Some(self.theme);
    }

    fn show_settings_window(&mut self, ctx: &egui::Context) {
        if !self.settings_open {
            return;
        }
        let mut open = self.settings_open;
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Accent color");
                ui.color_edit_button_srgba(&mut self.theme.accent);
                ui.small("Used for primary actions, progress, and the active step.");
                ui.add(
                    egui::Slider::new(&mut self.theme.text_scale, 0.8..=1.4)
                        .text("Text scale")
                        .step_by(0.05),
                );
                if ui.button("Reset to defaults").clicked() {
                    self.theme = StudioTheme::studio_default();
                }
            });
        self.settings_open = open;
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_released_uris();
        self.process_ui_events(ctx);
        self.apply_theme_if_needed(ctx);

        egui::TopBottomPanel::top("nav").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui::widgets::logo(ui).clicked() {
                    self.navigate(Route::Landing);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.route {
                        Route::Landing => {
                            let try_studio =
                                egui::Button::new(egui::RichText::new("Try Studio").strong())
                                    .fill(self.theme.accent);
                            if ui.add(try_studio).clicked() {
                                self.navigate(Route::Studio);
                            }
                        }
                        Route::Studio => {
                            if ui.button("⚙ Settings").clicked() {
                                self.settings_open = true;
                            }
                        }
                    }
                });
            });
            ui.add_space(4.0);
        });

        egui::TopBottomPanel::bottom("footer").show(ctx, |ui| {
            ui.add_space(4.0);
            ui::widgets::footer(ui, &self.status);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink(false)
                .show(ui, |ui| match self.route {
                    Route::Landing => ui::landing::show(self, ui),
                    Route::Studio => ui::studio::show(self, ui),
                });
        });

        self.show_settings_window(ctx);

        if self.session.stage().is_running() {
            // Spinner, fact rotation, and the progress bar keep moving
            // between backend events.
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let persisted = PersistedStudioSettings::from_runtime(self.theme);
        if let Ok(text) = serde_json::to_string(&persisted) {
            storage.set_string(SETTINGS_STORAGE_KEY, text);
        }
    }
}

pub(crate) fn human_readable_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        let rounded = (value * 10.0).round() / 10.0;
        if rounded.fract() == 0.0 {
            format!("{} {}", rounded.trunc() as u64, UNITS[unit])
        } else {
            format!("{rounded:.1} {}", UNITS[unit])
        }
    }
}

fn write_clipboard_image(image: &PreviewImage) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|err| err.to_string())?;
    clipboard
        .set_image(arboard::ImageData {
            width: image.width,
            height: image.height,
            bytes: std::borrow::Cow::Borrowed(&image.rgba),
        })
        .map_err(|err| err.to_string())
}

fn encode_rgba_png(rgba: &[u8], width: usize, height: usize) -> Result<Vec<u8>, String> {
    use image::ImageEncoder as _;
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out)
        .write_image(
            rgba,
            width as u32,
            height as u32,
            image::ExtendedColorType::Rgba8,
        )
        .map_err(|err| err.to_string())?;
    Ok(out)
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let args = Args::parse();
    let route = if args.start_in_studio {
        Route::Studio
    } else {
        Route::Landing
    };

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(64);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(256);
    backend_bridge::runtime::launch(args.assets_dir, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Trylo Studio")
            .with_inner_size([1180.0, 780.0])
            .with_min_inner_size([900.0, 620.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Trylo Studio",
        options,
        Box::new(move |cc| {
            let persisted_settings = cc.storage.and_then(|storage| {
                storage
                    .get_string(SETTINGS_STORAGE_KEY)
                    .and_then(|text| serde_json::from_str::<PersistedStudioSettings>(&text).ok())
            });
            Ok(Box::new(StudioApp::new(
                cmd_tx,
                ui_rx,
                route,
                persisted_settings,
            )))
        }),
    )
}

#[cfg(test)]
mod tests {
    use session_core::STAGE_PLAN;
    use shared::domain::PipelineStage;

    use super::human_readable_bytes;
    use crate::backend_bridge::runtime::decode_preview_image;
    use crate::ui::studio::{generate_button_enabled, generate_button_label};
    use crate::ui::theme::{PersistedStudioSettings, StudioTheme};
    use crate::ui::widgets::{fact_index, FASHION_FACTS, TRACKER_STEPS};

    #[test]
    fn formats_upload_sizes_readably() {
        assert_eq!(human_readable_bytes(0), "0 B");
        assert_eq!(human_readable_bytes(1023), "1023 B");
        assert_eq!(human_readable_bytes(1024), "1 KB");
        assert_eq!(human_readable_bytes(1536), "1.5 KB");
        assert_eq!(human_readable_bytes(2 * 1024 * 1024), "2 MB");
        assert_eq!(human_readable_bytes(1572864), "1.5 MB");
        assert_eq!(human_readable_bytes(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn facts_rotate_every_five_seconds_and_wrap() {
        assert_eq!(fact_index(0), 0);
        assert_eq!(fact_index(4), 0);
        assert_eq!(fact_index(5), 1);
        assert_eq!(fact_index(34), 6);
        assert_eq!(fact_index(5 * FASHION_FACTS.len() as u64), 0);
    }

    #[test]
    fn generate_control_follows_the_session_stage() {
        assert_eq!(generate_button_label(PipelineStage::Idle), "Generate Try-On");
        assert_eq!(
            generate_button_label(PipelineStage::Processing),
            "Processing..."
        );
        assert_eq!(
            generate_button_label(PipelineStage::Segmenting),
            "Processing..."
        );
        assert_eq!(
            generate_button_label(PipelineStage::Applying),
            "Processing..."
        );
        assert_eq!(
            generate_button_label(PipelineStage::Completed),
            "Try Another"
        );

        assert!(!generate_button_enabled(false, PipelineStage::Idle));
        assert!(generate_button_enabled(true, PipelineStage::Idle));
        assert!(!generate_button_enabled(false, PipelineStage::Processing));
        assert!(generate_button_enabled(false, PipelineStage::Completed));
    }

    #[test]
    fn tracker_has_one_entry_per_pipeline_step() {
        assert_eq!(TRACKER_STEPS.len(), STAGE_PLAN.len() + 1);
        let last = STAGE_PLAN.last().unwrap();
        assert_eq!(last.step_index, TRACKER_STEPS.len() - 1);
    }

    #[test]
    fn rejects_undecodable_image_data() {
        let err = decode_preview_image(b"definitely not an image", 512.0).unwrap_err();
        assert!(err.contains("unsupported image data"));
    }

    #[test]
    fn persisted_settings_round_trip_and_clamp() {
        let theme = StudioTheme::studio_default();
        let restored = PersistedStudioSettings::from_runtime(theme).into_runtime();
        assert_eq!(restored, theme);

        let out_of_range = PersistedStudioSettings {
            text_scale: 9.0,
            ..PersistedStudioSettings::default()
        };
        assert_eq!(out_of_range.into_runtime().text_scale, 1.4);
    }
}
