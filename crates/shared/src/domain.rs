use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifies one studio session: the lifetime of one studio-view visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

/// The two upload slots of a session. Exactly one image may be active per
/// role at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRole {
    Model,
    Garment,
}

impl ImageRole {
    pub fn label(self) -> &'static str {
        match self {
            Self::Model => "Your Photo",
            Self::Garment => "Garment Photo",
        }
    }
}

/// Current stage of the simulated try-on pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    Processing,
    Segmenting,
    Applying,
    Completed,
}

impl PipelineStage {
    /// A run is in flight: the generate control stays disabled and the
    /// result panel shows live progress.
    pub fn is_running(self) -> bool {
        matches!(self, Self::Processing | Self::Segmenting | Self::Applying)
    }

    /// Fill fraction of the progress bar for this stage.
    pub fn progress_fraction(self) -> f32 {
        match self {
            Self::Idle => 0.0,
            Self::Processing => 0.25,
            Self::Segmenting => 0.50,
            Self::Applying => 0.75,
            Self::Completed => 1.0,
        }
    }
}

/// One of the three fixed result images shown during a run. These are static
/// assets selected by stage, never computed from the uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultAsset {
    ModelToSegment,
    ModelSegmented,
    ModelResult,
}

impl ResultAsset {
    /// File name under the assets image directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::ModelToSegment => "model-to-segment.png",
            Self::ModelSegmented => "model-segmented.png",
            Self::ModelResult => "model-result.png",
        }
    }
}
