use shared::domain::{ImageRole, PipelineStage, ResultAsset, SessionId};
use shared::error::SessionError;

use crate::clock::Clock;
use crate::pipeline::{drive_pipeline, PlannedAdvance, STARTING_STATUS};
use crate::upload::{ImageSlots, UploadedImage};

/// State for one studio visit: the two upload slots plus the display state
/// of the simulated pipeline. All mutation goes through the operations
/// below; the view layer only reads.
#[derive(Debug)]
pub struct TryOnSession {
    id: SessionId,
    slots: ImageSlots,
    stage: PipelineStage,
    status: String,
    current_step: usize,
    result: Option<ResultAsset>,
}

impl TryOnSession {
    pub fn new() -> Self {
        Self {
            id: SessionId::new(),
            slots: ImageSlots::default(),
            stage: PipelineStage::Idle,
            status: String::new(),
            current_step: 0,
            result: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn stage(&self) -> PipelineStage {
        self.stage
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Index into the four-step visual tracker, 0 through 3.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    /// The fixed result image currently on display. `None` whenever the
    /// session is idle, and during the first stage before any image swaps in.
    pub fn result(&self) -> Option<ResultAsset> {
        self.result
    }

    pub fn image(&self, role: ImageRole) -> Option<&UploadedImage> {
        self.slots.get(role)
    }

    pub fn has_image(&self, role: ImageRole) -> bool {
        self.slots.is_filled(role)
    }

    /// Stores a newly selected image under `role`. Any previous image for
    /// that role is replaced and its resource released.
    pub fn select_image(&mut self, role: ImageRole, image: UploadedImage) {
        tracing::debug!(?role, uri = image.uri(), "image selected");
        self.slots.set(role, image);
    }

    /// Releases and removes the image for `role`.
    pub fn clear_image(&mut self, role: ImageRole) {
        self.slots.clear(role);
    }

    /// The generate control is enabled exactly when this holds.
    pub fn can_generate(&self) -> bool {
        self.slots.both_present() && self.stage == PipelineStage::Idle
    }

    /// Validates inputs and enters the first stage. On the defensive
    /// missing-input failure the session is already back in idle, with the
    /// error text as the visible status, by the time this returns.
    pub fn begin_generate(&mut self) -> Result<(), SessionError> {
        if !self.slots.both_present() {
            let err = SessionError::MissingInput;
            self.fail(err);
            return Err(err);
        }
        self.stage = PipelineStage::Processing;
        self.status = STARTING_STATUS.to_string();
        self.current_step = 0;
        self.result = None;
        tracing::info!(session = ?self.id, "pipeline started");
        Ok(())
    }

    /// Applies one planned transition. Advances that arrive after the
    /// session was torn down (back in idle, or a stale run after reset) are
    /// ignored and reported as such.
    pub fn apply_advance(&mut self, advance: &PlannedAdvance) -> bool {
        if !self.stage.is_running() {
            tracing::debug!(stage = ?advance.stage, "dropping advance for inactive session");
            return false;
        }
        debug_assert!(advance.step_index >= self.current_step);
        self.stage = advance.stage;
        self.status = advance.status.to_string();
        self.current_step = advance.step_index;
        self.result = Some(advance.result);
        true
    }

    /// Runs the full staged sequence in place, awaiting the plan's delays on
    /// `clock`. The observer sees the session after every state change. This
    /// is the headless counterpart of the GUI's command/event round trip.
    pub async fn generate<C>(
        &mut self,
        clock: &C,
        mut observer: impl FnMut(&Self),
    ) -> Result<(), SessionError>
    where
        C: Clock + ?Sized,
    {
        self.begin_generate()?;
        observer(self);
        drive_pipeline(clock, |advance| {
            self.apply_advance(advance);
            observer(self);
        })
        .await;
        Ok(())
    }

    fn fail(&mut self, err: SessionError) {
        self.stage = PipelineStage::Idle;
        self.status = err.to_string();
        self.current_step = 0;
        self.result = None;
    }

    /// "Try Another", and teardown when navigating away from the studio:
    /// back to idle with both image resources released.
    pub fn reset(&mut self) {
        self.slots.clear_all();
        self.stage = PipelineStage::Idle;
        self.status.clear();
        self.current_step = 0;
        self.result = None;
    }
}

impl Default for TryOnSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
