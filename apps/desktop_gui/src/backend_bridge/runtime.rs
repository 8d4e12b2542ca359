//! Runtime bridge between UI command queue and backend event intake.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::Context as _;
use crossbeam_channel::{Receiver, Sender};
use image::GenericImageView;
use session_core::{drive_pipeline, SystemClock};
use shared::domain::{ImageRole, ResultAsset};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::{PreviewImage, UiEvent};

/// Longest edge of an upload preview texture.
const UPLOAD_PREVIEW_MAX_DIM: f32 = 512.0;
/// Longest edge of a result panel texture.
const RESULT_IMAGE_MAX_DIM: f32 = 768.0;

const RESULT_ASSETS: [ResultAsset; 3] = [
    ResultAsset::ModelToSegment,
    ResultAsset::ModelSegmented,
    ResultAsset::ModelResult,
];

/// Spawns the worker thread owning the tokio runtime. Commands are handled
/// on spawned tasks so a 21 s pipeline run never blocks image decoding.
pub fn launch(assets_dir: PathBuf, cmd_rx: Receiver<BackendCommand>, ui_tx: Sender<UiEvent>) {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                let _ = ui_tx.try_send(UiEvent::BackendStartupFailed(format!(
                    "failed to build backend runtime: {err}"
                )));
                return;
            }
        };

        runtime.block_on(async move {
            while let Ok(cmd) = cmd_rx.recv() {
                match cmd {
                    BackendCommand::LoadImage { role, path } => {
                        tokio::spawn(load_image(role, path, ui_tx.clone()));
                    }
                    BackendCommand::RunPipeline { run } => {
                        tokio::spawn(run_pipeline(run, assets_dir.clone(), ui_tx.clone()));
                    }
                }
            }
        });
    });
}

async fn load_image(role: ImageRole, path: PathBuf, ui_tx: Sender<UiEvent>) {
    match tokio::fs::read(&path).await {
        Ok(bytes) => match decode_preview_image(&bytes, UPLOAD_PREVIEW_MAX_DIM) {
            Ok(image) => {
                let byte_len = bytes.len() as u64;
                let _ = ui_tx.try_send(UiEvent::ImageLoaded {
                    role,
                    path,
                    byte_len,
                    image,
                });
            }
            Err(reason) => {
                let _ = ui_tx.try_send(UiEvent::ImageLoadFailed { role, path, reason });
            }
        },
        Err(err) => {
            let _ = ui_tx.try_send(UiEvent::ImageLoadFailed {
                role,
                path,
                reason: format!("failed to read file: {err}"),
            });
        }
    }
}

async fn run_pipeline(run: u64, assets_dir: PathBuf, ui_tx: Sender<UiEvent>) {
    // The three fixed result images are loaded up front; each advance then
    // only hands the right one to the UI.
    let mut result_images: HashMap<&'static str, PreviewImage> = HashMap::new();
    for asset in RESULT_ASSETS {
        match load_result_asset(&assets_dir, asset).await {
            Ok(image) => {
                result_images.insert(asset.file_name(), image);
            }
            Err(err) => {
                tracing::warn!(asset = asset.file_name(), error = %err, "result asset unavailable");
                let _ = ui_tx.try_send(UiEvent::ResultAssetMissing {
                    run,
                    file_name: asset.file_name(),
                    reason: format!("{err:#}"),
                });
            }
        }
    }

    drive_pipeline(&SystemClock, |advance| {
        let image = result_images.get(advance.result.file_name()).cloned();
        let _ = ui_tx.try_send(UiEvent::StageAdvanced {
            run,
            advance: *advance,
            image,
        });
    })
    .await;
    tracing::info!(run, "pipeline run finished");
}

async fn load_result_asset(assets_dir: &Path, asset: ResultAsset) -> anyhow::Result<PreviewImage> {
    let path = assets_dir.join("images").join(asset.file_name());
    let bytes = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    decode_preview_image(&bytes, RESULT_IMAGE_MAX_DIM).map_err(anyhow::Error::msg)
}

pub(crate) fn decode_preview_image(
    bytes: &[u8],
    max_dimension: f32,
) -> Result<PreviewImage, String> {
    let decoded =
        image::load_from_memory(bytes).map_err(|err| format!("unsupported image data: {err}"))?;
    let (orig_w, orig_h) = decoded.dimensions();
    let scale = (max_dimension / orig_w.max(orig_h) as f32).min(1.0);
    let resized = if scale < 1.0 {
        decoded.resize(
            (orig_w as f32 * scale).max(1.0) as u32,
            (orig_h as f32 * scale).max(1.0) as u32,
            image::imageops::FilterType::Triangle,
        )
    } else {
        decoded
    };
    let rgba = resized.to_rgba8();
    Ok(PreviewImage {
        width: rgba.width() as usize,
        height: rgba.height() as usize,
        rgba: rgba.into_raw(),
    })
}
