use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use shared::domain::{ImageRole, PipelineStage, ResultAsset};

use super::*;

/// Records every requested delay instead of sleeping.
struct RecordingClock {
    sleeps: Mutex<Vec<Duration>>,
}

impl RecordingClock {
    fn new() -> Self {
        Self {
            sleeps: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Clock for RecordingClock {
    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[tokio::test]
async fn pipeline_sleeps_the_fixed_delays_in_order() {
    let clock = RecordingClock::new();
    let mut stages = Vec::new();
    drive_pipeline(&clock, |advance| stages.push(advance.stage)).await;

    assert_eq!(
        *clock.sleeps.lock().unwrap(),
        vec![
            Duration::from_millis(6000),
            Duration::from_millis(7000),
            Duration::from_millis(8000),
        ]
    );
    assert_eq!(
        stages,
        vec![
            PipelineStage::Segmenting,
            PipelineStage::Applying,
            PipelineStage::Completed,
        ]
    );
}

#[test]
fn plan_steps_and_progress_are_strictly_increasing() {
    let mut step = 0usize;
    let mut progress = PipelineStage::Processing.progress_fraction();
    for advance in STAGE_PLAN.iter() {
        assert_eq!(advance.step_index, step + 1);
        assert!(advance.stage.progress_fraction() > progress);
        assert!(!advance.status.is_empty());
        step = advance.step_index;
        progress = advance.stage.progress_fraction();
    }
    assert_eq!(step, 3);
    assert_eq!(progress, 1.0);
}

#[test]
fn plan_ends_completed_with_the_final_result_asset() {
    let last = STAGE_PLAN.last().unwrap();
    assert_eq!(last.stage, PipelineStage::Completed);
    assert_eq!(last.result, ResultAsset::ModelResult);
    assert_eq!(last.result.file_name(), "model-result.png");
}

#[test]
fn result_assets_map_to_distinct_png_files() {
    let names: HashSet<_> = STAGE_PLAN
        .iter()
        .map(|advance| advance.result.file_name())
        .collect();
    assert_eq!(names.len(), STAGE_PLAN.len());
    assert!(names.iter().all(|name| name.ends_with(".png")));
}

#[test]
fn running_stages_are_exactly_the_three_middle_ones() {
    assert!(!PipelineStage::Idle.is_running());
    assert!(PipelineStage::Processing.is_running());
    assert!(PipelineStage::Segmenting.is_running());
    assert!(PipelineStage::Applying.is_running());
    assert!(!PipelineStage::Completed.is_running());
}

#[tokio::test(start_paused = true)]
async fn headless_round_trip_releases_everything_on_reset() {
    let releases = Arc::new(AtomicUsize::new(0));
    let hook = |releases: &Arc<AtomicUsize>| {
        let releases = Arc::clone(releases);
        move |_: &str| {
            releases.fetch_add(1, Ordering::SeqCst);
        }
    };

    let mut session = TryOnSession::new();
    session.select_image(
        ImageRole::Model,
        UploadedImage::new("file:///m.png", hook(&releases)),
    );
    session.select_image(
        ImageRole::Garment,
        UploadedImage::new("file:///g.png", hook(&releases)),
    );

    session
        .generate(&SystemClock, |_| {})
        .await
        .expect("both images present");
    assert_eq!(session.stage(), PipelineStage::Completed);
    assert_eq!(releases.load(Ordering::SeqCst), 0);

    session.reset();
    assert_eq!(releases.load(Ordering::SeqCst), 2);
    assert_eq!(session.stage(), PipelineStage::Idle);
}
