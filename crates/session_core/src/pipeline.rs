use std::time::Duration;

use shared::domain::{PipelineStage, ResultAsset};

use crate::clock::Clock;

/// Status line shown the moment a run enters the pipeline.
pub const STARTING_STATUS: &str = "Starting process...";

/// One planned transition of the simulated pipeline: wait `delay`, then
/// enter `stage` with the given display state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannedAdvance {
    pub delay: Duration,
    pub stage: PipelineStage,
    pub step_index: usize,
    pub status: &'static str,
    pub result: ResultAsset,
}

/// The fixed sequence every run walks after entering `Processing`. Strictly
/// sequential and unconditional, roughly 21 s of wall clock in total. The
/// delays and result images are demo placeholders, not a backend contract.
pub const STAGE_PLAN: [PlannedAdvance; 3] = [
    PlannedAdvance {
        delay: Duration::from_millis(6000),
        stage: PipelineStage::Segmenting,
        step_index: 1,
        status: "Analyzing body structure...",
        result: ResultAsset::ModelToSegment,
    },
    PlannedAdvance {
        delay: Duration::from_millis(7000),
        stage: PipelineStage::Applying,
        step_index: 2,
        status: "Fitting garment to body...",
        result: ResultAsset::ModelSegmented,
    },
    PlannedAdvance {
        delay: Duration::from_millis(8000),
        stage: PipelineStage::Completed,
        step_index: 3,
        status: "Result generated successfully!",
        result: ResultAsset::ModelResult,
    },
];

/// Walks the plan on the given clock, reporting each advance as it is
/// entered. There is no cancellation: once started, the sequence always runs
/// through to the final stage.
pub async fn drive_pipeline<C, F>(clock: &C, mut on_advance: F)
where
    C: Clock + ?Sized,
    F: FnMut(&PlannedAdvance),
{
    for advance in STAGE_PLAN.iter() {
        clock.sleep(advance.delay).await;
        tracing::debug!(stage = ?advance.stage, step = advance.step_index, "pipeline advanced");
        on_advance(advance);
    }
}
