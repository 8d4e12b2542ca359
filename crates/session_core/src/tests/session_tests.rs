use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use shared::domain::{ImageRole, PipelineStage, ResultAsset};
use shared::error::SessionError;

use super::*;
use crate::clock::SystemClock;
use crate::pipeline::STAGE_PLAN;

fn plain(uri: &str) -> UploadedImage {
    UploadedImage::new(uri, |_| {})
}

fn counted(uri: &str, releases: &Arc<AtomicUsize>) -> UploadedImage {
    let releases = Arc::clone(releases);
    UploadedImage::new(uri, move |_| {
        releases.fetch_add(1, Ordering::SeqCst);
    })
}

fn loaded_session() -> TryOnSession {
    let mut session = TryOnSession::new();
    session.select_image(ImageRole::Model, plain("file:///model.png"));
    session.select_image(ImageRole::Garment, plain("file:///garment.png"));
    session
}

#[test]
fn generate_is_gated_on_both_images_and_idle() {
    let mut session = TryOnSession::new();
    assert!(!session.can_generate());

    session.select_image(ImageRole::Model, plain("file:///model.png"));
    assert!(!session.can_generate());

    session.select_image(ImageRole::Garment, plain("file:///garment.png"));
    assert!(session.can_generate());

    session.clear_image(ImageRole::Model);
    assert!(!session.can_generate());

    session.select_image(ImageRole::Model, plain("file:///model.png"));
    session.begin_generate().expect("both images present");
    assert!(!session.can_generate());
}

#[test]
fn begin_generate_without_both_images_resets_to_idle_with_error_status() {
    let mut session = TryOnSession::new();
    session.select_image(ImageRole::Model, plain("file:///model.png"));

    let err = session.begin_generate().unwrap_err();
    assert_eq!(err, SessionError::MissingInput);
    assert_eq!(session.stage(), PipelineStage::Idle);
    assert_eq!(session.current_step(), 0);
    assert_eq!(session.status(), "Please upload both model and garment images");
    assert!(session.result().is_none());
}

#[test]
fn begin_generate_enters_processing_with_starting_status() {
    let mut session = loaded_session();
    session.begin_generate().expect("both images present");

    assert_eq!(session.stage(), PipelineStage::Processing);
    assert_eq!(session.status(), STARTING_STATUS);
    assert_eq!(session.current_step(), 0);
    assert!(session.result().is_none());
}

#[test]
fn advances_apply_in_order_and_the_step_never_decreases() {
    let mut session = loaded_session();
    session.begin_generate().expect("both images present");

    let mut last_step = session.current_step();
    for advance in STAGE_PLAN.iter() {
        assert!(session.apply_advance(advance));
        assert!(session.current_step() >= last_step);
        last_step = session.current_step();
    }

    assert_eq!(session.stage(), PipelineStage::Completed);
    assert_eq!(session.current_step(), 3);
    assert_eq!(session.result(), Some(ResultAsset::ModelResult));
}

#[test]
fn advances_are_dropped_while_idle() {
    let mut session = TryOnSession::new();
    assert!(!session.apply_advance(&STAGE_PLAN[0]));
    assert_eq!(session.stage(), PipelineStage::Idle);
    assert!(session.result().is_none());
}

#[test]
fn advances_are_dropped_after_completion() {
    let mut session = loaded_session();
    session.begin_generate().expect("both images present");
    for advance in STAGE_PLAN.iter() {
        session.apply_advance(advance);
    }
    assert!(!session.apply_advance(&STAGE_PLAN[0]));
    assert_eq!(session.stage(), PipelineStage::Completed);
}

#[test]
fn replacing_through_the_session_releases_the_previous_image() {
    let releases = Arc::new(AtomicUsize::new(0));
    let mut session = TryOnSession::new();
    session.select_image(ImageRole::Model, counted("file:///a.png", &releases));
    session.select_image(ImageRole::Model, counted("file:///b.png", &releases));
    assert_eq!(releases.load(Ordering::SeqCst), 1);
}

#[test]
fn reset_returns_to_idle_and_releases_both_images() {
    let releases = Arc::new(AtomicUsize::new(0));
    let mut session = TryOnSession::new();
    session.select_image(ImageRole::Model, counted("file:///m.png", &releases));
    session.select_image(ImageRole::Garment, counted("file:///g.png", &releases));
    session.begin_generate().expect("both images present");
    for advance in STAGE_PLAN.iter() {
        session.apply_advance(advance);
    }
    assert_eq!(session.stage(), PipelineStage::Completed);

    session.reset();
    assert_eq!(releases.load(Ordering::SeqCst), 2);
    assert_eq!(session.stage(), PipelineStage::Idle);
    assert_eq!(session.current_step(), 0);
    assert!(session.status().is_empty());
    assert!(session.result().is_none());
    assert!(!session.can_generate());
}

#[tokio::test(start_paused = true)]
async fn generate_walks_all_four_stages_in_order() {
    let mut session = loaded_session();
    let mut snapshots = Vec::new();
    session
        .generate(&SystemClock, |s| {
            snapshots.push((s.stage(), s.current_step(), s.status().to_string(), s.result()))
        })
        .await
        .expect("both images present");

    assert_eq!(
        snapshots,
        vec![
            (
                PipelineStage::Processing,
                0,
                "Starting process...".to_string(),
                None
            ),
            (
                PipelineStage::Segmenting,
                1,
                "Analyzing body structure...".to_string(),
                Some(ResultAsset::ModelToSegment)
            ),
            (
                PipelineStage::Applying,
                2,
                "Fitting garment to body...".to_string(),
                Some(ResultAsset::ModelSegmented)
            ),
            (
                PipelineStage::Completed,
                3,
                "Result generated successfully!".to_string(),
                Some(ResultAsset::ModelResult)
            ),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn generate_takes_the_planned_twenty_one_seconds() {
    let mut session = loaded_session();
    let started = tokio::time::Instant::now();
    session
        .generate(&SystemClock, |_| {})
        .await
        .expect("both images present");
    assert_eq!(started.elapsed(), Duration::from_millis(21_000));
}

#[tokio::test(start_paused = true)]
async fn generate_on_an_empty_session_fails_without_advancing_time() {
    let mut session = TryOnSession::new();
    let started = tokio::time::Instant::now();
    let err = session.generate(&SystemClock, |_| {}).await.unwrap_err();
    assert_eq!(err, SessionError::MissingInput);
    assert_eq!(started.elapsed(), Duration::ZERO);
    assert_eq!(session.stage(), PipelineStage::Idle);
}
