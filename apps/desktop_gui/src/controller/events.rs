//! UI/backend events for the studio controller.

use std::path::PathBuf;

use session_core::PlannedAdvance;
use shared::domain::ImageRole;

/// Decoded RGBA pixels ready to become an egui texture.
#[derive(Clone, Debug)]
pub struct PreviewImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

/// Events flowing from the backend worker to the UI thread.
pub enum UiEvent {
    ImageLoaded {
        role: ImageRole,
        path: PathBuf,
        byte_len: u64,
        image: PreviewImage,
    },
    ImageLoadFailed {
        role: ImageRole,
        path: PathBuf,
        reason: String,
    },
    /// One planned transition of the simulated pipeline, together with the
    /// fixed result image for that stage. The image is absent if the asset
    /// could not be loaded; the result panel keeps its spinner in that case.
    StageAdvanced {
        run: u64,
        advance: PlannedAdvance,
        image: Option<PreviewImage>,
    },
    ResultAssetMissing {
        run: u64,
        file_name: &'static str,
        reason: String,
    },
    BackendStartupFailed(String),
}
